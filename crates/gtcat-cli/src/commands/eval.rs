//! Implementation of the `gtcat eval` command.

use gtcat::{PluralExpression, PluralForms};
use miette::{miette, IntoDiagnostic, Result};
use serde::Serialize;

use crate::output::table::format_eval_table;

/// Arguments for the eval command.
#[derive(Debug, clap::Args)]
pub struct EvalArgs {
    /// Plural expression to evaluate (e.g. "n != 1")
    #[arg(long, conflicts_with = "plural_forms", required_unless_present = "plural_forms")]
    pub expr: Option<String>,

    /// Full Plural-Forms header value (e.g. "nplurals=2; plural=n != 1;")
    #[arg(long)]
    pub plural_forms: Option<String>,

    /// Counts to evaluate the expression for
    #[arg(short = 'n', num_args = 1.., required = true, allow_negative_numbers = true)]
    pub counts: Vec<i64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for eval results.
#[derive(Serialize)]
pub struct EvalResult {
    pub expression: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nplurals: Option<usize>,
    pub results: Vec<EvalForm>,
}

#[derive(Serialize)]
pub struct EvalForm {
    pub n: i64,
    pub form: i64,
}

/// Run the eval command.
pub fn run_eval(args: EvalArgs) -> Result<i32> {
    let compiled = match (&args.expr, &args.plural_forms) {
        (Some(expr), _) => PluralExpression::parse(expr.as_str())
            .map(|expression| (expression, None))
            .map_err(|e| miette!("{e}")),
        (None, Some(header)) => PluralForms::parse(header)
            .map(|forms| (forms.expression().clone(), Some(forms.count())))
            .map_err(|e| miette!("{e}")),
        (None, None) => return Ok(exitcode::USAGE),
    };

    let (expression, nplurals) = match compiled {
        Ok(compiled) => compiled,
        Err(e) => {
            if args.json {
                let output = serde_json::json!({ "error": e.to_string() });
                eprintln!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
            } else {
                eprintln!("Compile error: {e}");
            }
            return Ok(exitcode::DATAERR);
        }
    };

    let results: Vec<(i64, i64)> = args
        .counts
        .iter()
        .map(|&n| (n, expression.evaluate(n)))
        .collect();

    if let Some(count) = nplurals {
        for (n, form) in &results {
            if !usize::try_from(*form).is_ok_and(|form| form < count) {
                tracing::warn!(n, form, nplurals = count, "plural form out of range");
            }
        }
    }

    if args.json {
        let output = EvalResult {
            expression: expression.source().to_string(),
            nplurals,
            results: results
                .iter()
                .map(|&(n, form)| EvalForm { n, form })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
    } else {
        println!("{}", format_eval_table(&results));
    }
    Ok(exitcode::OK)
}
