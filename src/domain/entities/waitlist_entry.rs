use chrono::NaiveDateTime;

/// A single waitlist registrant.
///
/// Entries are append-only: `id` and `created_at` are assigned by the store on
/// insert and never change afterwards. The queue position is not part of the
/// entry, it is derived from the total count at join time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitlistEntry {
    pub id: i64,
    pub email: String,
    pub created_at: NaiveDateTime,
}
