/// Fresh ids for columns and items.
///
/// Format: `{prefix}-{millis:x}-{seq:x}-{hash8}`. The sequence number is
/// process-wide, so two ids generated by the same process never collide even
/// within one millisecond. The hash of sequence and nanosecond clock keeps ids
/// from separate sessions apart when the clock repeats.
use std::sync::atomic::{AtomicU64, Ordering};

use sha2::{Digest, Sha256};

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

pub const COLUMN_PREFIX: &str = "col";
pub const ITEM_PREFIX: &str = "item";

fn generate_id(prefix: &str) -> String {
    let seq = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    let now = chrono::Utc::now();
    let nanos = now.timestamp_nanos_opt().unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(seq.to_le_bytes());
    hasher.update(nanos.to_le_bytes());
    let hash = hasher.finalize();

    format!(
        "{}-{:x}-{:x}-{}",
        prefix,
        now.timestamp_millis(),
        seq,
        hex::encode(&hash[..4])
    )
}

pub fn new_column_id() -> String {
    generate_id(COLUMN_PREFIX)
}

pub fn new_item_id() -> String {
    generate_id(ITEM_PREFIX)
}
