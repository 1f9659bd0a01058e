use serde::Serialize;

/// Countries the terminal knows how to greet and hold holidays for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Country {
    Finland, // fi
    Sweden,  // se
    Norway,  // no
}

impl Country {
    pub fn code(&self) -> &'static str {
        match self {
            Country::Finland => "fi",
            Country::Sweden => "se",
            Country::Norway => "no",
        }
    }

    /// Exact match on the code stored in `users.country`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "fi" => Some(Country::Finland),
            "se" => Some(Country::Sweden),
            "no" => Some(Country::Norway),
            _ => None,
        }
    }

    pub fn welcome(&self) -> &'static str {
        match self {
            Country::Finland => "Tervetuloa.",
            Country::Sweden => "Välkommen.",
            Country::Norway => "Velkommen.",
        }
    }

    pub fn goodbye(&self) -> &'static str {
        match self {
            Country::Finland => "Näkemiin.",
            Country::Sweden => "Hej då.",
            Country::Norway => "Ha det bra.",
        }
    }
}

/// Greeting for a login (`true`) or logout, falling back to English.
pub fn greeting(country: Option<Country>, logged_in: bool) -> &'static str {
    match (country, logged_in) {
        (Some(c), true) => c.welcome(),
        (Some(c), false) => c.goodbye(),
        (None, true) => "Welcome.",
        (None, false) => "Goodbye.",
    }
}
