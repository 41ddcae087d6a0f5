//! Role-based access policy for lifecycle operations.
//!
//! The policy is a pure predicate over `(Role, Capability)`. The lifecycle
//! service consults it before touching the store.

use std::collections::BTreeSet;

use super::Role;

/// Role that may update shipment status when no other set is configured.
pub const DEFAULT_ADMIN_ROLE: &str = "admin";

/// Privileged actions a role may be granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Capability {
    /// Assign a new status to an existing shipment.
    UpdateShipmentStatus,
}

/// Decides whether a role holds a capability.
#[cfg_attr(test, mockall::automock)]
pub trait AccessPolicy: Send + Sync {
    /// Return `true` when `role` is granted `capability`.
    fn permits(&self, role: &Role, capability: Capability) -> bool;
}

/// Access policy granting every capability to a fixed set of roles.
///
/// # Examples
/// ```
/// use shipments::domain::{AccessPolicy, Capability, Role, RoleAccessPolicy};
///
/// let policy = RoleAccessPolicy::default();
/// assert!(policy.permits(&Role::new("admin"), Capability::UpdateShipmentStatus));
/// assert!(!policy.permits(&Role::new("customer"), Capability::UpdateShipmentStatus));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAccessPolicy {
    privileged: BTreeSet<String>,
}

impl RoleAccessPolicy {
    /// Build a policy from role names. Blank names are ignored.
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let privileged = roles
            .into_iter()
            .map(|role| role.as_ref().trim().to_owned())
            .filter(|role| !role.is_empty())
            .collect();
        Self { privileged }
    }

    /// Role names granted privileged capabilities, in sorted order.
    pub fn privileged_roles(&self) -> impl Iterator<Item = &str> {
        self.privileged.iter().map(String::as_str)
    }
}

impl Default for RoleAccessPolicy {
    fn default() -> Self {
        Self::new([DEFAULT_ADMIN_ROLE])
    }
}

impl AccessPolicy for RoleAccessPolicy {
    fn permits(&self, role: &Role, capability: Capability) -> bool {
        match capability {
            Capability::UpdateShipmentStatus => {
                !role.is_empty() && self.privileged.contains(role.as_str())
            }
        }
    }
}
