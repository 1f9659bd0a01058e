/// Result of looking up a tag in the `tags` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagBinding {
    /// Never seen before.
    Unknown,
    /// Known, but `user_id` is NULL.
    Unassigned,
    User(i64),
}

#[derive(Debug, Clone)]
pub struct TagRow {
    pub rfid_id: String,
    pub serial: String,
    pub user_id: Option<i64>,
}
