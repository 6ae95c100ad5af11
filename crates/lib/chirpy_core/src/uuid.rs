// Helper for generating UUIDv7 (timestamp-sortable UUIDs).
//
// Chirps are listed by creation time, so their ids are generated app-side as
// v7 and double as a tie-breaker when two rows share a timestamp. User ids
// carry no ordering and stay v4.

use uuid::Uuid;

/// Generate a new UUIDv7 (timestamp-sortable).
pub fn uuidv7() -> Uuid {
    Uuid::now_v7()
}
