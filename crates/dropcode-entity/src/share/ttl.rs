//! Share lifetimes offered to senders.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use dropcode_core::error::AppError;

/// One of the fixed share lifetimes. Any other value is rejected rather
/// than rounded to the nearest preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum ShareTtl {
    /// 900 seconds.
    #[default]
    FifteenMinutes,
    /// 1800 seconds.
    ThirtyMinutes,
    /// 86400 seconds.
    OneDay,
}

impl ShareTtl {
    /// Every accepted preset, shortest first.
    pub const ALL: [ShareTtl; 3] = [Self::FifteenMinutes, Self::ThirtyMinutes, Self::OneDay];

    /// Rejection message for any other lifetime.
    pub const INVALID_MESSAGE: &'static str = "expiresInSeconds must be one of: 900, 1800, 86400";

    /// Parse a lifetime given in seconds.
    pub fn from_seconds(seconds: i64) -> Result<Self, AppError> {
        Self::ALL
            .into_iter()
            .find(|ttl| ttl.as_seconds() == seconds)
            .ok_or_else(|| AppError::validation(Self::INVALID_MESSAGE))
    }

    /// The lifetime in seconds.
    pub fn as_seconds(self) -> i64 {
        match self {
            Self::FifteenMinutes => 15 * 60,
            Self::ThirtyMinutes => 30 * 60,
            Self::OneDay => 24 * 60 * 60,
        }
    }

    /// The lifetime as a chrono duration.
    pub fn duration(self) -> Duration {
        Duration::seconds(self.as_seconds())
    }
}

impl TryFrom<i64> for ShareTtl {
    type Error = AppError;

    fn try_from(seconds: i64) -> Result<Self, Self::Error> {
        Self::from_seconds(seconds)
    }
}

impl From<ShareTtl> for i64 {
    fn from(ttl: ShareTtl) -> Self {
        ttl.as_seconds()
    }
}
