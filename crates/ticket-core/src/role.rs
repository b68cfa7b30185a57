//! Roles, verified identities and role resolution.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The three participants in a ticket's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Tenant,
    Landlord,
    Contractor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Tenant => "tenant",
            Role::Landlord => "landlord",
            Role::Contractor => "contractor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verified identity claim from the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    pub subject_id: String,
    #[serde(default)]
    pub name: String,
}

impl Identity {
    pub fn new(
        email: impl Into<String>,
        subject_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            subject_id: subject_id.into(),
            name: name.into(),
        }
    }
}

/// An identity acting in a resolved role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub identity: Identity,
    pub role: Role,
}

impl Actor {
    pub fn new(identity: Identity, role: Role) -> Self {
        Self { identity, role }
    }

    /// Build an actor from an email alone. The subject id mirrors the email.
    pub fn with_email(email: impl Into<String>, role: Role) -> Self {
        let email = email.into();
        Self::new(Identity::new(email.clone(), email, ""), role)
    }

    pub fn tenant(email: impl Into<String>) -> Self {
        Self::with_email(email, Role::Tenant)
    }

    pub fn landlord(email: impl Into<String>) -> Self {
        Self::with_email(email, Role::Landlord)
    }

    pub fn contractor(email: impl Into<String>) -> Self {
        Self::with_email(email, Role::Contractor)
    }

    pub fn email(&self) -> &str {
        &self.identity.email
    }
}

/// Maps a verified identity to the role it acts in.
pub trait RoleResolver: Send + Sync {
    fn resolve(&self, identity: &Identity) -> Role;

    /// Resolve and bundle into an [`Actor`].
    fn actor(&self, identity: Identity) -> Actor {
        let role = self.resolve(&identity);
        Actor::new(identity, role)
    }
}

/// Derives the role from the email domain suffix.
///
/// `@landlord.com` maps to landlord, `@contractor.com` to contractor, and
/// everything else to tenant.
#[derive(Debug, Clone)]
pub struct DomainRoleResolver {
    landlord_suffix: String,
    contractor_suffix: String,
}

impl DomainRoleResolver {
    pub fn new(landlord_suffix: impl Into<String>, contractor_suffix: impl Into<String>) -> Self {
        Self {
            landlord_suffix: landlord_suffix.into().to_ascii_lowercase(),
            contractor_suffix: contractor_suffix.into().to_ascii_lowercase(),
        }
    }
}

impl Default for DomainRoleResolver {
    fn default() -> Self {
        Self::new("@landlord.com", "@contractor.com")
    }
}

impl RoleResolver for DomainRoleResolver {
    fn resolve(&self, identity: &Identity) -> Role {
        let email = identity.email.trim().to_ascii_lowercase();
        if email.ends_with(&self.landlord_suffix) {
            Role::Landlord
        } else if email.ends_with(&self.contractor_suffix) {
            Role::Contractor
        } else {
            Role::Tenant
        }
    }
}

/// Errors loading a role directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("failed to read role directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid role directory: {0}")]
    Json(#[from] serde_json::Error),
}

/// Explicit email-to-role assignments.
///
/// Emails absent from the directory resolve to the fallback role
/// (tenant unless configured otherwise).
#[derive(Debug, Clone)]
pub struct DirectoryRoleResolver {
    roles: HashMap<String, Role>,
    fallback: Role,
}

impl DirectoryRoleResolver {
    pub fn new(roles: HashMap<String, Role>) -> Self {
        let roles = roles
            .into_iter()
            .map(|(email, role)| (email.trim().to_ascii_lowercase(), role))
            .collect();
        Self {
            roles,
            fallback: Role::Tenant,
        }
    }

    pub fn with_fallback(mut self, fallback: Role) -> Self {
        self.fallback = fallback;
        self
    }

    /// Parse a JSON object of `{"email": "role"}` pairs.
    pub fn from_json(json: &str) -> Result<Self, DirectoryError> {
        let roles: HashMap<String, Role> = serde_json::from_str(json)?;
        Ok(Self::new(roles))
    }

    /// Load a JSON role directory from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl RoleResolver for DirectoryRoleResolver {
    fn resolve(&self, identity: &Identity) -> Role {
        let email = identity.email.trim().to_ascii_lowercase();
        self.roles.get(&email).copied().unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(email: &str) -> Identity {
        Identity::new(email, "sub-1", "")
    }

    #[test]
    fn test_domain_roles() {
        let resolver = DomainRoleResolver::default();
        assert_eq!(resolver.resolve(&identity("bob@landlord.com")), Role::Landlord);
        assert_eq!(resolver.resolve(&identity("fix@contractor.com")), Role::Contractor);
        assert_eq!(resolver.resolve(&identity("a@t.com")), Role::Tenant);
        assert_eq!(resolver.resolve(&identity("Bob@Landlord.COM")), Role::Landlord);
    }

    #[test]
    fn test_domain_roles_need_full_suffix() {
        let resolver = DomainRoleResolver::default();
        assert_eq!(resolver.resolve(&identity("bob@notlandlord.co")), Role::Tenant);
        assert_eq!(resolver.resolve(&identity("landlord.com@gmail.com")), Role::Tenant);
    }

    #[test]
    fn test_directory_roles() {
        let resolver = DirectoryRoleResolver::from_json(
            r#"{"owner@gmail.com": "landlord", "Plumber@Mail.com": "contractor"}"#,
        )
        .unwrap();
        assert_eq!(resolver.len(), 2);
        assert_eq!(resolver.resolve(&identity("owner@gmail.com")), Role::Landlord);
        assert_eq!(resolver.resolve(&identity("plumber@mail.com")), Role::Contractor);
        assert_eq!(resolver.resolve(&identity("someone@landlord.com")), Role::Tenant);
    }

    #[test]
    fn test_directory_rejects_unknown_role() {
        let result = DirectoryRoleResolver::from_json(r#"{"a@b.com": "admin"}"#);
        assert!(matches!(result, Err(DirectoryError::Json(_))));
    }

    #[test]
    fn test_resolver_builds_actor() {
        let actor = DomainRoleResolver::default().actor(identity("c@contractor.com"));
        assert_eq!(actor.role, Role::Contractor);
        assert_eq!(actor.email(), "c@contractor.com");
    }
}
