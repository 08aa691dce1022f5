//! Builder module for `flagtree`.
//! See the `flagtree` crate root for full details.
#![deny(missing_docs)]
mod api;
mod constant;
mod matcher;
mod model;
mod parser;
pub mod prelude;

pub use api::*;
pub use matcher::CardinalityError;
pub use model::*;
pub use parser::{ArgumentCause, ArgumentError, Command, ConfigError, ParseError};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
