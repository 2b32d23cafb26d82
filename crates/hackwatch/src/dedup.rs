use std::collections::HashSet;

use hackwatch_core::HackathonRecord;
use tracing::debug;

use crate::LOG_TARGET;
use crate::store::{RecordStore, StoreResult};

/// Keep only complete candidates whose title the store has not seen yet
///
/// The store is queried once per candidate. A title repeated on the same
/// page is only kept the first time. Order is preserved.
pub async fn filter_new(
    candidates: Vec<HackathonRecord>,
    store: &(dyn RecordStore + Send + Sync),
) -> StoreResult<Vec<HackathonRecord>> {
    let mut seen_in_batch = HashSet::new();
    let mut new_records = Vec::new();

    for candidate in candidates {
        if !candidate.is_complete() {
            debug!(target: LOG_TARGET, title = %candidate.title, "Incomplete hackathon, skipping");
            continue;
        }

        if !seen_in_batch.insert(candidate.title.clone()) {
            debug!(target: LOG_TARGET, title = %candidate.title, "Hackathon listed twice, skipping");
            continue;
        }

        if store.contains_title(&candidate.title).await? {
            debug!(target: LOG_TARGET, title = %candidate.title, "Hackathon already seen, skipping");
            continue;
        }

        new_records.push(candidate);
    }

    Ok(new_records)
}
