//! Row-level access scoping.
//!
//! Every read goes through [`scope_to_owner`] and every mutation through
//! [`ensure_owner_or_admin`]; no service re-implements the role check.
//! Admins see the full table, everyone else only rows they created.

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Select};

use crate::auth::AuthUser;
use crate::errors::ServiceError;

/// Narrows a select to the rows the caller may see.
pub fn scope_to_owner<E, C>(select: Select<E>, owner_column: C, caller: &AuthUser) -> Select<E>
where
    E: EntityTrait,
    C: ColumnTrait,
{
    if caller.is_admin() {
        select
    } else {
        select.filter(owner_column.eq(caller.id))
    }
}

/// True when the caller may read a row owned by `owner_id`.
pub fn can_view(caller: &AuthUser, owner_id: i32) -> bool {
    caller.is_admin() || owner_id == caller.id
}

/// Gate for update/delete of an already-fetched row.
pub fn ensure_owner_or_admin(
    caller: &AuthUser,
    owner_id: i32,
    resource: &str,
) -> Result<(), ServiceError> {
    if can_view(caller, owner_id) {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(format!(
            "Not enough permissions to access this {resource}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::quotation;
    use crate::models::Role;
    use sea_orm::{DbBackend, EntityTrait, QueryTrait};

    fn caller(id: i32, role: Role) -> AuthUser {
        AuthUser {
            id,
            name: "Caller".into(),
            email: "caller@example.com".into(),
            role,
        }
    }

    #[test]
    fn admin_select_is_unrestricted() {
        let admin = caller(1, Role::Admin);
        let sql = scope_to_owner(
            quotation::Entity::find(),
            quotation::Column::CreatedBy,
            &admin,
        )
        .build(DbBackend::Sqlite)
        .to_string();
        assert!(!sql.contains("created_by"));
    }

    #[test]
    fn user_select_is_owner_filtered() {
        let user = caller(42, Role::User);
        let sql = scope_to_owner(
            quotation::Entity::find(),
            quotation::Column::CreatedBy,
            &user,
        )
        .build(DbBackend::Sqlite)
        .to_string();
        assert!(sql.contains("created_by"));
        assert!(sql.contains("42"));
    }

    #[test]
    fn mutation_gate() {
        use assert_matches::assert_matches;

        let admin = caller(1, Role::Admin);
        let owner = caller(2, Role::User);
        let other = caller(3, Role::User);

        assert!(ensure_owner_or_admin(&admin, 2, "quotation").is_ok());
        assert!(ensure_owner_or_admin(&owner, 2, "quotation").is_ok());
        assert_matches!(
            ensure_owner_or_admin(&other, 2, "quotation"),
            Err(ServiceError::Forbidden(_))
        );
    }
}
