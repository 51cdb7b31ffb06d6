//! Ownership of orders.
//!
//! Two pieces live here:
//! - `OwnedByUser`, implemented by anything that carries an owner name.
//! - The ownership assigner: pure functions deciding which name becomes the
//!   `owner` of a created or updated order.
//!
//! A blank requested owner (empty or whitespace only) counts as "not
//! supplied"; any other requested owner is stored trimmed. The assigner never returns a blank owner as long as the
//! principal's name is non-blank, which `Principal::new` guarantees.
//!
//! The assigner does not know about scopes. Callers restricted to their own
//! records must have their requested owner filtered through
//! `Scope::permitted_owner` first.

use super::Principal;

/// Trait for records with a single named owner.
pub trait OwnedByUser {
    /// Returns the owner name of this record.
    fn owner(&self) -> &str;

    /// Checks if `name` owns this record.
    fn is_owner(&self, name: &str) -> bool {
        self.owner() == name
    }
}

fn supplied(owner: Option<&str>) -> Option<&str> {
    owner.map(str::trim).filter(|o| !o.is_empty())
}

/// Owner for a newly created order.
///
/// The requested owner wins when supplied; otherwise the order belongs to
/// the caller.
pub fn assign_owner_on_create(requested_owner: Option<&str>, principal: &Principal) -> String {
    match supplied(requested_owner) {
        Some(owner) => owner.to_string(),
        None => principal.name().to_string(),
    }
}

/// Owner for an order being overwritten by an update.
///
/// The requested owner wins when supplied. Otherwise the existing owner is
/// kept, and only a record that somehow has no owner is adopted by the
/// caller.
pub fn assign_owner_on_update(
    existing_owner: &str,
    requested_owner: Option<&str>,
    principal: &Principal,
) -> String {
    if let Some(owner) = supplied(requested_owner) {
        return owner.to_string();
    }
    if existing_owner.trim().is_empty() {
        principal.name().to_string()
    } else {
        existing_owner.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Role;
    use proptest::prelude::*;

    struct TestResource {
        owner: String,
    }

    impl OwnedByUser for TestResource {
        fn owner(&self) -> &str {
            &self.owner
        }
    }

    fn alice() -> Principal {
        Principal::new("Alice", Role::OrderOwner).unwrap()
    }

    fn admin() -> Principal {
        Principal::new("Admin", Role::Admin).unwrap()
    }

    // ============================================================
    // OwnedByUser
    // ============================================================

    #[test]
    fn is_owner_matches_exact_name() {
        let resource = TestResource {
            owner: "Alice".to_string(),
        };
        assert!(resource.is_owner("Alice"));
        assert!(!resource.is_owner("alice"));
        assert!(!resource.is_owner("Cathy"));
    }

    // ============================================================
    // assign_owner_on_create
    // ============================================================

    #[test]
    fn create_without_owner_uses_principal() {
        assert_eq!(assign_owner_on_create(None, &alice()), "Alice");
        assert_eq!(assign_owner_on_create(Some(""), &alice()), "Alice");
    }

    #[test]
    fn create_treats_whitespace_owner_as_absent() {
        assert_eq!(assign_owner_on_create(Some("   "), &alice()), "Alice");
    }

    #[test]
    fn admin_can_create_on_behalf_of_another_owner() {
        assert_eq!(assign_owner_on_create(Some("Alice"), &admin()), "Alice");
    }

    #[test]
    fn requested_owner_is_trimmed() {
        assert_eq!(assign_owner_on_create(Some(" Alice "), &admin()), "Alice");
        assert_eq!(assign_owner_on_update("Cathy", Some("\tAlice "), &admin()), "Alice");
    }

    // ============================================================
    // assign_owner_on_update
    // ============================================================

    #[test]
    fn update_without_owner_keeps_existing_owner() {
        assert_eq!(assign_owner_on_update("Cathy", None, &admin()), "Cathy");
    }

    #[test]
    fn update_of_ownerless_record_adopts_principal() {
        assert_eq!(assign_owner_on_update("", None, &alice()), "Alice");
    }

    #[test]
    fn update_with_owner_reassigns() {
        assert_eq!(assign_owner_on_update("Cathy", Some("Alice"), &admin()), "Alice");
    }

    proptest! {
        #[test]
        fn assigned_owner_is_never_blank(
            requested in proptest::option::of("[ a-zA-Z]{0,8}"),
            existing in "[ a-zA-Z]{0,8}",
        ) {
            let p = alice();
            let created = assign_owner_on_create(requested.as_deref(), &p);
            let updated = assign_owner_on_update(&existing, requested.as_deref(), &p);
            prop_assert!(!created.trim().is_empty());
            prop_assert!(!updated.trim().is_empty());
            prop_assert_eq!(created.trim(), created.as_str());
        }

        #[test]
        fn update_is_idempotent(
            requested in proptest::option::of("[a-zA-Z]{1,8}"),
            existing in "[a-zA-Z]{1,8}",
        ) {
            let p = alice();
            let first = assign_owner_on_update(&existing, requested.as_deref(), &p);
            let second = assign_owner_on_update(&first, requested.as_deref(), &p);
            prop_assert_eq!(first, second);
        }
    }
}
