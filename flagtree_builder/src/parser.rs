mod base;
mod interface;
mod middleware;
mod printer;

pub(crate) use self::interface::*;
pub(crate) use self::middleware::*;
pub(crate) use self::printer::*;

pub use self::base::{ArgumentCause, ArgumentError, ConfigError, ParseError};
pub use self::middleware::Command;
