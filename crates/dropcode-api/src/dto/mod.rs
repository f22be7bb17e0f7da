//! Data transfer objects for request parsing and response serialization.

pub mod request;
pub mod response;
