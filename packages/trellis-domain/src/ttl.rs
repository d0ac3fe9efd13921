use std::time::Duration;

/// Lifetime of a stored record, re-armed on every write. The backend enforces
/// the expiry; nothing else deletes records.
pub const RECORD_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
