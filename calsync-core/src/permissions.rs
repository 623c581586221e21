//! Token-scoped access control.
//!
//! Tokens are static entries from config, compared by exact string
//! equality. Authorization is any-of: one matching permission (or the
//! wildcard) is enough, no matter how many an operation lists.

use std::collections::HashMap;

use crate::config::Config;
use crate::error::{CalSyncError, CalSyncResult};

/// The wildcard permission, granting every operation.
pub const WILDCARD: &str = "*";

/// Every permission string a token may carry.
pub const KNOWN_PERMISSIONS: &[&str] = &["read", "create", "update", "delete", "sync", WILDCARD];

/// The set of capabilities a token grants.
///
/// Kept independent of where tokens are stored so the authorization logic
/// does not care whether the map came from a file or anywhere else.
#[derive(Debug, Clone, PartialEq)]
pub struct PermissionSet(Vec<String>);

impl PermissionSet {
    pub fn new(permissions: Vec<String>) -> Self {
        PermissionSet(permissions)
    }

    /// True when the set holds the wildcard or any element of `required`.
    pub fn allows_any(&self, required: &[&str]) -> bool {
        required
            .iter()
            .any(|perm| self.contains(WILDCARD) || self.contains(perm))
    }

    pub fn contains(&self, permission: &str) -> bool {
        self.0.iter().any(|p| p == permission)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }
}

/// Resolves bearer tokens to permission sets and checks them against the
/// permissions an operation requires.
pub struct PermissionGate {
    tokens: HashMap<String, PermissionSet>,
}

impl PermissionGate {
    pub fn new(config: &Config) -> Self {
        let tokens = config
            .tokens
            .iter()
            .map(|(token, perms)| (token.clone(), PermissionSet::new(perms.clone())))
            .collect();
        PermissionGate { tokens }
    }

    /// Resolve a token to its permission set. Unknown tokens fail.
    pub fn authenticate(&self, token: &str) -> CalSyncResult<&PermissionSet> {
        self.tokens
            .get(token)
            .ok_or(CalSyncError::UnknownToken)
    }

    /// Check a resolved permission set against the operation's required
    /// list. The failure carries both sides for the 403 diagnostic body.
    pub fn authorize(&self, set: &PermissionSet, required: &[&str]) -> CalSyncResult<()> {
        if set.allows_any(required) {
            return Ok(());
        }
        Err(CalSyncError::Forbidden {
            required: required.iter().map(|s| s.to_string()).collect(),
            has: set.to_vec(),
        })
    }

    /// All configured tokens with their permission sets.
    pub fn entries(&self) -> impl Iterator<Item = (&String, &PermissionSet)> {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn gate(entries: &[(&str, &[&str])]) -> PermissionGate {
        let tokens = entries
            .iter()
            .map(|(token, perms)| {
                (
                    token.to_string(),
                    perms.iter().map(|p| p.to_string()).collect(),
                )
            })
            .collect();
        let config = Config {
            port: 3000,
            tokens,
            events_file: PathBuf::from("events.json"),
            backup_enabled: false,
            backup_dir: PathBuf::from("backups"),
        };
        PermissionGate::new(&config)
    }

    #[test]
    fn unknown_token_is_rejected() {
        let gate = gate(&[("reader", &["read"])]);
        assert!(matches!(
            gate.authenticate("intruder"),
            Err(CalSyncError::UnknownToken)
        ));
    }

    #[test]
    fn one_matching_permission_suffices() {
        let gate = gate(&[("writer", &["update"])]);
        let set = gate.authenticate("writer").unwrap();
        // Required list is an OR: update alone passes a create-or-update check.
        assert!(gate.authorize(set, &["create", "update"]).is_ok());
    }

    #[test]
    fn read_only_token_is_denied_write_operations() {
        let gate = gate(&[("reader", &["read"])]);
        let set = gate.authenticate("reader").unwrap();
        let err = gate.authorize(set, &["create", "update"]).unwrap_err();
        match err {
            CalSyncError::Forbidden { required, has } => {
                assert_eq!(required, vec!["create", "update"]);
                assert_eq!(has, vec!["read"]);
            }
            other => panic!("expected Forbidden, got {other:?}"),
        }
    }

    #[test]
    fn wildcard_authorizes_everything() {
        let gate = gate(&[("admin", &["*"])]);
        let set = gate.authenticate("admin").unwrap();
        for perm in KNOWN_PERMISSIONS {
            assert!(gate.authorize(set, &[perm]).is_ok());
        }
    }

    #[test]
    fn wildcard_requirement_needs_a_wildcard_token() {
        let gate = gate(&[("reader", &["read"]), ("admin", &["*"])]);
        let reader = gate.authenticate("reader").unwrap();
        assert!(gate.authorize(reader, &[WILDCARD]).is_err());
        let admin = gate.authenticate("admin").unwrap();
        assert!(gate.authorize(admin, &[WILDCARD]).is_ok());
    }
}
