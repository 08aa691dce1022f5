mod command;
mod duration;
mod flag;
mod primitive;
mod value;

pub use self::command::*;
pub use duration::DurationError;
pub use flag::*;
pub use primitive::*;
pub use value::*;
