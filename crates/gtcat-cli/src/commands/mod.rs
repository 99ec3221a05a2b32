//! CLI command implementations.

mod check;
mod convert;
mod eval;
mod stats;

pub use check::{run_check, CheckArgs};
pub use convert::{run_convert, ConvertArgs};
pub use eval::{run_eval, EvalArgs};
pub use stats::{run_stats, StatsArgs};
