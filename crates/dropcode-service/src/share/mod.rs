//! Share creation and resolution.

pub mod filename;
pub mod link;
pub mod service;

pub use filename::sanitize_file_name;
pub use link::LinkService;
pub use service::{CreatedShare, ResolveOutcome, ResolvedShare, SharePayload, ShareService};
