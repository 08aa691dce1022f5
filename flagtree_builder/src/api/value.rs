use std::cell::RefCell;
use std::fmt::Display;

use crate::api::{InvalidValue, Primitive};
use crate::model::Nargs;
use crate::prelude::{Destination, Value};

impl<'a, T> Destination<T> for &'a mut T {
    fn update<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut **self)
    }

    fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&**self)
    }
}

impl<'a, T> Destination<T> for &'a RefCell<T> {
    fn update<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut *self.borrow_mut())
    }

    fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.borrow())
    }
}

/// A [`Value`] which holds a single primitive.
/// Each accepted literal overwrites the previous one, and each run starts from the initial value.
pub struct Scalar<T, D> {
    destination: D,
    initial: T,
}

impl<T, D> Scalar<T, D>
where
    T: Primitive,
    D: Destination<T>,
{
    /// Create a scalar value, writing `initial` into the destination immediately.
    pub fn new(mut destination: D, initial: T) -> Self {
        destination.update(|variable| *variable = initial.clone());
        Self {
            destination,
            initial,
        }
    }
}

impl<T, D> Value for Scalar<T, D>
where
    T: Primitive,
    D: Destination<T>,
{
    fn set(&mut self, literal: &str) -> Result<(), InvalidValue> {
        let value = T::parse(literal)?;
        self.destination.update(|variable| *variable = value);
        Ok(())
    }

    fn is_bool_flag(&self) -> bool {
        T::IS_BOOL
    }

    fn render(&self) -> Option<String> {
        self.destination.read(|variable| {
            if *variable == T::default() {
                None
            } else {
                Some(variable.render())
            }
        })
    }

    fn rewind(&mut self) {
        let initial = self.initial.clone();
        self.destination.update(|variable| *variable = initial);
    }
}

/// A [`Value`] which collects primitives into a `Vec`.
///
/// The first literal of each run replaces the initial contents, and every later literal appends.
/// A run without any literal leaves the initial contents.
pub struct Collection<T, D> {
    destination: D,
    initial: Vec<T>,
    hot: bool,
}

impl<T, D> Collection<T, D>
where
    T: Primitive,
    D: Destination<Vec<T>>,
{
    /// Create a collection value, writing `initial` into the destination immediately.
    pub fn new(mut destination: D, initial: Vec<T>) -> Self {
        destination.update(|variable| *variable = initial.clone());
        Self {
            destination,
            initial,
            hot: false,
        }
    }
}

impl<T, D> Value for Collection<T, D>
where
    T: Primitive,
    D: Destination<Vec<T>>,
{
    fn set(&mut self, literal: &str) -> Result<(), InvalidValue> {
        let value = T::parse(literal)?;
        let hot = std::mem::replace(&mut self.hot, true);
        self.destination.update(|variable| {
            if !hot {
                variable.clear();
            }
            variable.push(value);
        });
        Ok(())
    }

    fn nargs(&self) -> Nargs {
        Nargs::AtLeast(0)
    }

    fn render(&self) -> Option<String> {
        self.destination.read(|variable| {
            if variable.is_empty() {
                None
            } else {
                let items: Vec<String> = variable.iter().map(Primitive::render).collect();
                Some(format!("[{}]", items.join(", ")))
            }
        })
    }

    fn rewind(&mut self) {
        let initial = self.initial.clone();
        self.destination.update(|variable| *variable = initial);
        self.hot = false;
    }
}

/// A [`Value`] which hands each literal to a closure.
pub struct Func<F> {
    callback: F,
}

impl<F, E> Func<F>
where
    F: FnMut(&str) -> Result<(), E>,
    E: Display,
{
    /// Wrap a closure; its errors are reported through their `Display` form.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F, E> Value for Func<F>
where
    F: FnMut(&str) -> Result<(), E>,
    E: Display,
{
    fn set(&mut self, literal: &str) -> Result<(), InvalidValue> {
        (self.callback)(literal).map_err(|error| InvalidValue::Custom(error.to_string()))
    }
}
