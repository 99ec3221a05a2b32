mod flags;
mod headers;
mod message;

pub use flags::Flags;
pub use headers::HeaderMap;
pub use message::{CONTEXT_SEPARATOR, Message, PLURAL_SEPARATOR, message_key};
