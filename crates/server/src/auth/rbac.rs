//! Static permission matrix, grounded on the original `pkg/httputil/rbac.go`.
//! `Owner` holds `*:*`; every other role is an explicit allow-list keyed by
//! `"resource:action"`.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::domain::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    Execute,
}

impl Action {
    fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Execute => "execute",
        }
    }
}

const RESOURCES: &[&str] = &[
    "instances",
    "vpcs",
    "storage",
    "events",
    "volumes",
    "dashboard",
    "loadbalancers",
    "databases",
    "secrets",
    "functions",
    "caches",
    "autoscaling",
];

fn grant_all_actions(perms: &mut HashSet<String>, resource: &str) {
    for action in [
        Action::Create,
        Action::Read,
        Action::Update,
        Action::Delete,
        Action::Execute,
    ] {
        perms.insert(format!("{resource}:{}", action.as_str()));
    }
}

fn developer_permissions() -> HashSet<String> {
    let mut perms = HashSet::new();
    for resource in RESOURCES {
        grant_all_actions(&mut perms, resource);
    }
    perms.insert(format!("auth:{}", Action::Read.as_str()));
    perms
}

fn admin_permissions() -> HashSet<String> {
    developer_permissions()
}

fn viewer_permissions() -> HashSet<String> {
    let mut perms = HashSet::new();
    for resource in RESOURCES {
        perms.insert(format!("{resource}:{}", Action::Read.as_str()));
    }
    perms.insert(format!("auth:{}", Action::Read.as_str()));
    perms
}

static ADMIN: LazyLock<HashSet<String>> = LazyLock::new(admin_permissions);
static DEVELOPER: LazyLock<HashSet<String>> = LazyLock::new(developer_permissions);
static VIEWER: LazyLock<HashSet<String>> = LazyLock::new(viewer_permissions);

/// Returns whether `role` may perform `action` on `resource`.
pub fn has_permission(role: Role, resource: &str, action: Action) -> bool {
    let role = role.normalize();
    if role == Role::Owner {
        return true;
    }
    let perms = match role {
        Role::Owner => return true,
        Role::Admin => &*ADMIN,
        Role::Developer => &*DEVELOPER,
        Role::Viewer => &*VIEWER,
        Role::User => unreachable!("normalize() folds User onto Developer"),
    };
    perms.contains(&format!("{resource}:{}", action.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_has_every_permission() {
        assert!(has_permission(Role::Owner, "anything", Action::Delete));
    }

    #[test]
    fn admin_gets_auth_read_on_top_of_developer() {
        assert!(has_permission(Role::Admin, "auth", Action::Read));
        assert!(has_permission(Role::Admin, "instances", Action::Delete));
    }

    #[test]
    fn viewer_is_read_only() {
        assert!(has_permission(Role::Viewer, "instances", Action::Read));
        assert!(!has_permission(Role::Viewer, "instances", Action::Delete));
    }

    #[test]
    fn legacy_user_role_normalizes_to_developer() {
        assert!(has_permission(Role::User, "instances", Action::Create));
    }

    #[test]
    fn unknown_resource_is_denied() {
        assert!(!has_permission(Role::Developer, "nope", Action::Read));
    }
}
