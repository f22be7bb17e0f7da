//! Concrete blob store providers.

pub mod local;
#[cfg(feature = "s3")]
pub mod s3;
