//! User status bitmask, stored as a single byte in `users.status`
//! and `loggings.new_status`.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;
use std::fmt;
use std::ops::BitOr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Status(u8);

impl Status {
    /// Bit 0 clear means logged out.
    pub const LOGGED_IN: Status = Status(1 << 0);
    /// Set by the closing sweep on the forced logout.
    pub const AUTO_LOG_OUT: Status = Status(1 << 1);
    /// Set by administrative edits.
    pub const LOGGED_BY_ADMIN: Status = Status(1 << 2);

    pub const LOGGED_OUT: Status = Status(0);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Status) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    pub const fn is_logged_in(self) -> bool {
        self.contains(Self::LOGGED_IN)
    }

    pub const fn is_auto_log_out(self) -> bool {
        self.contains(Self::AUTO_LOG_OUT)
    }

    pub const fn is_logged_by_admin(self) -> bool {
        self.contains(Self::LOGGED_BY_ADMIN)
    }

    /// Flip the logged-in bit, leaving annotations untouched.
    #[must_use]
    pub const fn toggled(self) -> Self {
        Status(self.0 ^ Self::LOGGED_IN.0)
    }

    #[must_use]
    pub const fn with(self, flag: Status) -> Self {
        Status(self.0 | flag.0)
    }

    #[must_use]
    pub const fn without(self, flag: Status) -> Self {
        Status(self.0 & !flag.0)
    }

    /// Drop every annotation bit, keeping only the log state.
    #[must_use]
    pub const fn normalized(self) -> Self {
        Status(self.0 & Self::LOGGED_IN.0)
    }

    /// Status written by the closing sweep for a user still logged in.
    #[must_use]
    pub const fn forced_logout(self) -> Self {
        self.without(Self::LOGGED_IN)
            .normalized()
            .with(Self::AUTO_LOG_OUT)
    }

    pub fn in_or_out(self) -> &'static str {
        if self.is_logged_in() { "in" } else { "out" }
    }
}

impl BitOr for Status {
    type Output = Status;

    fn bitor(self, rhs: Status) -> Status {
        self.with(rhs)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec![self.in_or_out()];
        if self.is_auto_log_out() {
            parts.push("auto");
        }
        if self.is_logged_by_admin() {
            parts.push("admin");
        }
        write!(f, "{}", parts.join("+"))
    }
}

impl ToSql for Status {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(i64::from(self.0)))
    }
}

impl FromSql for Status {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_i64()?;
        u8::try_from(raw)
            .map(Status)
            .map_err(|_| FromSqlError::OutOfRange(raw))
    }
}
