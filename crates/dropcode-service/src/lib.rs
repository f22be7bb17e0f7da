//! # dropcode-service
//!
//! Share lifecycle services. Each service is built once at startup with
//! its collaborators passed in as `Arc` trait objects, and every operation
//! is a stateless unit of work against the row and blob stores.

pub mod allocator;
pub mod reclaim;
pub mod share;

pub use allocator::CodeAllocator;
pub use reclaim::{ReclaimReport, ReclaimService};
pub use share::{
    CreatedShare, LinkService, ResolveOutcome, ResolvedShare, SharePayload, ShareService,
};
