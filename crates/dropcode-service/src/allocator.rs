//! Lowest-free short code allocation.

use std::sync::Arc;

use tracing::debug;

use dropcode_core::error::AppError;
use dropcode_core::traits::Clock;
use dropcode_database::ShareStore;
use dropcode_entity::share::ShortCode;

/// Message returned when every code is held by an active share.
pub const EXHAUSTED_MESSAGE: &str =
    "All short codes (1-100) are currently in use. Try again after some expire.";

/// Picks short codes for new shares.
///
/// The read of active codes and the later insert are not atomic: two
/// concurrent creates can be handed the same code.
#[derive(Debug, Clone)]
pub struct CodeAllocator {
    store: Arc<dyn ShareStore>,
    clock: Arc<dyn Clock>,
}

impl CodeAllocator {
    /// Creates a new allocator.
    pub fn new(store: Arc<dyn ShareStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Returns the lowest code not held by an active share.
    pub async fn allocate(&self) -> Result<ShortCode, AppError> {
        let active = self.store.active_codes(self.clock.now()).await?;
        let code = lowest_free(&active).ok_or_else(|| AppError::exhausted(EXHAUSTED_MESSAGE))?;
        debug!(code = code.get(), active = active.len(), "Allocated short code");
        Ok(code)
    }
}

/// Scan `1..=100` ascending and return the first value absent from `active`.
pub fn lowest_free(active: &[i32]) -> Option<ShortCode> {
    let mut taken = [false; ShortCode::MAX as usize + 1];
    for &code in active {
        if let Some(code) = ShortCode::new(i64::from(code)) {
            taken[code.get() as usize] = true;
        }
    }
    ShortCode::all().find(|code| !taken[code.get() as usize])
}
