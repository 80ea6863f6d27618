//! Quantized sign values.
//!
//! A [`SignValue`] is one already-quantized color sample supplied by the
//! image-decoding collaborator. The engine never sees pixels, only these
//! scalars, so the two operations defined here (`difference`, `average`) are
//! the entire numeric vocabulary of the matching pass.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One quantized color sample.
///
/// Backed by `u8`; ordering is total and is used directly for tie
/// comparisons in the matching engine.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SignValue(u8);

impl SignValue {
    /// Smallest representable sign value.
    pub const MIN: SignValue = SignValue(u8::MIN);
    /// Largest representable sign value.
    pub const MAX: SignValue = SignValue(u8::MAX);

    /// Wrap a raw quantized sample.
    pub const fn new(value: u8) -> Self {
        SignValue(value)
    }

    /// Raw sample value.
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Absolute difference between two sign values.
    ///
    /// Symmetric in its arguments, zero exactly when the values are equal,
    /// and can never exceed [`SignValue::MAX`].
    pub const fn difference(a: SignValue, b: SignValue) -> SignValue {
        SignValue(a.0.abs_diff(b.0))
    }

    /// Midpoint of two sign values, rounding down.
    pub const fn average(a: SignValue, b: SignValue) -> SignValue {
        SignValue(((a.0 as u16 + b.0 as u16) / 2) as u8)
    }
}

impl From<u8> for SignValue {
    fn from(value: u8) -> Self {
        SignValue(value)
    }
}

impl fmt::Display for SignValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
