mod api;
mod core;
mod model;

pub(crate) use self::core::*;
pub(crate) use api::*;
pub use model::CardinalityError;
