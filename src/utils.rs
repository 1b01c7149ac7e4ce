use serde::{Deserialize, Serialize};
use std::cell::OnceCell;

/// Running mean of `values`: entry `i` is the average of `values[..=i]`.
pub fn running_average(values: &[f64]) -> Vec<f64> {
    let mut sum = 0.;
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            sum += v;
            sum / (i + 1) as f64
        })
        .collect()
}

/// A `OnceCell` that can be (de)serialised, used to cache derived results next to their data.
///
/// An empty cell goes through serde as `None`, a filled one as `Some(value)`.
#[derive(Debug, PartialEq, Deserialize)]
#[serde(from = "Option<T>")]
pub struct SerdeOnceCell<T> {
    cell: OnceCell<T>,
}

impl<T: Serialize> Serialize for SerdeOnceCell<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.cell.get().serialize(serializer)
    }
}

impl<T> From<Option<T>> for SerdeOnceCell<T> {
    fn from(value: Option<T>) -> Self {
        SerdeOnceCell {
            cell: value.map(OnceCell::from).unwrap_or_default(),
        }
    }
}

impl<T> Default for SerdeOnceCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SerdeOnceCell<T> {
    pub fn new() -> Self {
        SerdeOnceCell {
            cell: OnceCell::new(),
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn get_or_init<F>(&self, f: F) -> &T
    where
        F: FnOnce() -> T,
    {
        self.cell.get_or_init(f)
    }

    pub fn set(&self, value: T) -> Result<(), T> {
        self.cell.set(value)
    }
}
