/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// The authenticated actor an operation runs on behalf of.
///
/// Passed explicitly into every core operation rather than read from
/// ambient session state, so ownership checks stay independently testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Actor {
    pub id: DbId,
}

impl Actor {
    pub fn new(id: DbId) -> Self {
        Self { id }
    }
}
