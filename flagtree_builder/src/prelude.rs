//! Traits which, typically, may be imported without concern: `use flagtree::prelude::*`.
use crate::api::InvalidValue;
use crate::model::Nargs;

pub use crate::api::{Commander, Primitive};

/// The dynamic value behind a flag.
///
/// `set` is called once per occurrence of the flag, in command line order.
/// Implement this to declare a flag over a custom type (see [`Flag::var`](crate::Flag::var)).
pub trait Value {
    /// Accept one literal from the command line.
    fn set(&mut self, literal: &str) -> Result<(), InvalidValue>;

    /// Whether the flag may be given bare (ex: `--verbose`), implying the literal `"true"`.
    fn is_bool_flag(&self) -> bool {
        false
    }

    /// The cardinality used when the flag builder does not override it.
    fn nargs(&self) -> Nargs {
        Nargs::Between(0, 1)
    }

    /// Canonical text of the current value, or `None` for a zero value.
    fn render(&self) -> Option<String> {
        None
    }

    /// Called on every flag of the command tree before each run.
    fn rewind(&mut self) {}
}

/// Storage a value box writes into.
///
/// The storage is owned by the caller; the box only holds onto it.
/// Implemented for `&mut T` (read it once the command is dropped) and `&RefCell<T>` (read it from a handler).
pub trait Destination<T> {
    /// Mutate the stored value.
    fn update<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R;

    /// Inspect the stored value.
    fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R;
}
