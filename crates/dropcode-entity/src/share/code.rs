//! The bounded short-code namespace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A human-facing share code in `[1, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ShortCode(u8);

impl ShortCode {
    /// Smallest valid code.
    pub const MIN: u8 = 1;
    /// Largest valid code; also the namespace size.
    pub const MAX: u8 = 100;

    /// Returns `None` when `value` is outside `[MIN, MAX]`.
    pub fn new(value: i64) -> Option<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Some(Self(value as u8))
        } else {
            None
        }
    }

    /// Every code in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }

    /// The code as the integer stored in the `short_code` column.
    pub fn as_i32(self) -> i32 {
        i32::from(self.0)
    }

    /// The raw value.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for ShortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for ShortCode {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| {
            format!(
                "short code must be between {} and {}",
                Self::MIN,
                Self::MAX
            )
        })
    }
}

impl From<ShortCode> for i64 {
    fn from(code: ShortCode) -> Self {
        i64::from(code.0)
    }
}
