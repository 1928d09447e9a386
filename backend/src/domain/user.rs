//! User data model.
//!
//! A user is an integer identifier assigned by the store plus two free-form,
//! optional text fields. No validation is applied to `name` or `email`: the
//! store is the only authority on what it accepts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Store-assigned user identifier.
///
/// Identifiers are allocated by the store's auto-increment column on
/// creation and never reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    /// Wrap a raw identifier read from the store or a request path.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Access the raw integer value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for UserId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

/// Error returned when a path segment is not an integer identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("user id must be an integer, got {raw:?}")]
pub struct UserIdParseError {
    raw: String,
}

impl FromStr for UserId {
    type Err = UserIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i32>()
            .map(Self)
            .map_err(|_| UserIdParseError { raw: s.to_owned() })
    }
}

/// The writable fields of a user, as supplied by create and update requests.
///
/// Missing fields are carried as `None` and stored as SQL `NULL`.
///
/// # Examples
/// ```
/// use users_api::domain::UserDraft;
///
/// let draft = UserDraft::new(Some("Ana".into()), None);
/// assert_eq!(draft.name(), Some("Ana"));
/// assert!(draft.email().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl UserDraft {
    /// Build a draft from optional name and email values.
    #[must_use]
    pub const fn new(name: Option<String>, email: Option<String>) -> Self {
        Self { name, email }
    }

    /// Name to store, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Email to store, if any.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Attach the store-assigned identifier, producing a full [`User`].
    #[must_use]
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
        }
    }
}

/// A persisted user row.
///
/// Serialises as `{"id": 1, "name": "...", "email": "..."}` with absent text
/// fields rendered as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: Option<String>,
    email: Option<String>,
}

impl User {
    /// Construct a user from its parts.
    #[must_use]
    pub const fn new(id: UserId, name: Option<String>, email: Option<String>) -> Self {
        Self { id, name, email }
    }

    /// Store-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Stored name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Stored email.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("1", 1)]
    #[case(" 42 ", 42)]
    #[case("-3", -3)]
    fn user_id_parses_integers(#[case] raw: &str, #[case] expected: i32) {
        let id: UserId = raw.parse().expect("integer id");
        assert_eq!(id.get(), expected);
    }

    #[rstest]
    #[case("abc")]
    #[case("")]
    #[case("1.5")]
    #[case("99999999999")]
    fn user_id_rejects_non_integers(#[case] raw: &str) {
        let err = raw.parse::<UserId>().expect_err("not an i32");
        assert!(err.to_string().contains("must be an integer"));
    }

    #[rstest]
    fn user_serialises_with_nulls_for_missing_fields() {
        let user = User::new(UserId::new(7), Some("Ana".into()), None);
        let value = serde_json::to_value(&user).expect("serialise user");
        assert_eq!(value, json!({ "id": 7, "name": "Ana", "email": null }));
    }

    #[rstest]
    fn draft_accepts_missing_fields() {
        let draft: UserDraft = serde_json::from_value(json!({})).expect("empty draft");
        assert_eq!(draft, UserDraft::default());
    }

    #[rstest]
    fn draft_into_user_keeps_fields() {
        let draft = UserDraft::new(Some("Ana".into()), Some("ana@x.com".into()));
        let user = draft.into_user(UserId::new(1));
        assert_eq!(user.id(), UserId::new(1));
        assert_eq!(user.name(), Some("Ana"));
        assert_eq!(user.email(), Some("ana@x.com"));
    }
}
