use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Opaque user identifier handed out by the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Seven-character `YYYY-MM` bucket key. The string form sorts
/// chronologically, so ordered maps of month keys need no extra comparator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthKey(String);

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self(format!("{year:04}-{month:02}"))
    }

    pub fn from_datetime(timestamp: &DateTime<Utc>) -> Self {
        Self::new(timestamp.year(), timestamp.month())
    }

    /// The wall-clock month right now.
    pub fn current() -> Self {
        Self::from_datetime(&Utc::now())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Access level attached to an identity. `Master` is the distinguished
/// administrative identity with read-only visibility across users.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Member,
    Master,
}

/// Identity-provider view of the signed-in user. Credentials never reach
/// this crate; the provider only reports who the user is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub role: Role,
}

impl UserProfile {
    pub fn member(id: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            display_name: None,
            email: None,
            role: Role::Member,
        }
    }

    pub fn master(id: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            display_name: None,
            email: None,
            role: Role::Master,
        }
    }
}

/// Authentication-state transition reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    SignedIn(UserProfile),
    SignedOut,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn month_key_is_zero_padded() {
        assert_eq!(MonthKey::new(2024, 3).as_str(), "2024-03");
        let timestamp = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(MonthKey::from_datetime(&timestamp).as_str(), "2024-12");
    }

    #[test]
    fn month_keys_sort_chronologically() {
        let mut keys = vec![
            MonthKey::new(2024, 10),
            MonthKey::new(2023, 12),
            MonthKey::new(2024, 2),
        ];
        keys.sort();
        let ordered: Vec<&str> = keys.iter().map(MonthKey::as_str).collect();
        assert_eq!(ordered, ["2023-12", "2024-02", "2024-10"]);
    }
}
