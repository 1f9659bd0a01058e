use super::country::Country;
use super::status::Status;
use serde::Serialize;

pub const UNNAMED: &str = "[Unnamed]";

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub name: Option<String>,
    pub country: String,
    pub status: Status,
}

impl User {
    /// Trimmed name, or the placeholder when unset or blank.
    pub fn display_name(&self) -> String {
        display_name(self.name.as_deref())
    }

    pub fn country(&self) -> Option<Country> {
        Country::from_code(&self.country)
    }
}

pub fn display_name(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => UNNAMED.to_string(),
    }
}
