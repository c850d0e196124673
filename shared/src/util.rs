/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a collision-resistant id for sections and items.
///
/// Random (UUID v4, simple form) so two submissions in the same millisecond
/// never share an id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
