//! Caller identity as seen by the shipment lifecycle.
//!
//! An [`IdentityContext`] is built once per request by the inbound identity
//! adapter and handed to every lifecycle operation explicitly.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned when parsing identity values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityValidationError {
    /// The user id was empty.
    #[error("user id must not be empty")]
    EmptyUserId,
    /// The user id was not a canonical UUID.
    #[error("user id must be a valid UUID")]
    InvalidUserId,
}

/// Stable user identifier stored as a UUID.
///
/// # Examples
/// ```
/// use shipments::domain::UserId;
///
/// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
/// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from text.
    pub fn new(id: impl AsRef<str>) -> Result<Self, IdentityValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(IdentityValidationError::EmptyUserId);
        }
        if raw.trim() != raw {
            return Err(IdentityValidationError::InvalidUserId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| IdentityValidationError::InvalidUserId)
    }

    /// Wrap an already-parsed UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Role tag asserted by the identity provider.
///
/// Roles are opaque strings; an empty role carries no privileges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Wrap a role tag, trimming surrounding whitespace.
    pub fn new(role: impl AsRef<str>) -> Self {
        Self(role.as_ref().trim().to_owned())
    }

    /// Role without privileges, used when the token carries none.
    pub fn none() -> Self {
        Self::default()
    }

    /// Borrow the role tag.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether the role tag is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated caller of a lifecycle operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    owner_id: UserId,
    role: Role,
}

impl IdentityContext {
    /// Bind a user id to the role asserted for it.
    pub const fn new(owner_id: UserId, role: Role) -> Self {
        Self { owner_id, role }
    }

    /// User on whose behalf the operation runs.
    pub const fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    /// Role asserted for the caller.
    pub const fn role(&self) -> &Role {
        &self.role
    }
}
