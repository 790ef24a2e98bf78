//! The signed-in user on whose behalf a use-case runs.
//!
//! Every service call takes an [`Actor`]. Checks are expressed against the
//! organization being touched so tenant isolation lives in one place.

use super::{Error, OrganizationId, User, UserId, UserRole};

/// Authenticated caller resolved from the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub org_id: OrganizationId,
    pub role: UserRole,
}

impl Actor {
    /// Derive an actor from a stored user, rejecting inactive accounts.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use hospadmin::domain::{
    ///     Actor, Audit, DisplayName, EmailAddress, OrganizationId, User, UserId, UserRole,
    /// };
    ///
    /// let user = User {
    ///     id: UserId::random(),
    ///     org_id: OrganizationId::random(),
    ///     email: EmailAddress::new("ada@example.org").expect("email"),
    ///     display_name: DisplayName::new("Ada").expect("name"),
    ///     role: UserRole::Staff,
    ///     active: false,
    ///     audit: Audit::created(Utc::now(), None),
    /// };
    /// assert!(Actor::for_user(&user).is_err());
    /// ```
    pub fn for_user(user: &User) -> Result<Self, Error> {
        if !user.active {
            return Err(Error::forbidden("account is deactivated"));
        }
        Ok(Self {
            user_id: user.id,
            org_id: user.org_id,
            role: user.role,
        })
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == UserRole::SuperAdmin
    }

    /// Permit reading records of `org_id`.
    pub fn require_read(&self, org_id: OrganizationId) -> Result<(), Error> {
        if self.is_super_admin() || self.org_id == org_id {
            Ok(())
        } else {
            Err(Error::forbidden("organization is outside your access"))
        }
    }

    /// Permit creating, changing or deleting records of `org_id`.
    pub fn require_manage(&self, org_id: OrganizationId) -> Result<(), Error> {
        match self.role {
            UserRole::SuperAdmin => Ok(()),
            UserRole::OrgAdmin if self.org_id == org_id => Ok(()),
            UserRole::OrgAdmin => Err(Error::forbidden("organization is outside your access")),
            UserRole::Staff => Err(Error::forbidden("staff accounts are read-only")),
        }
    }

    /// Permit platform-level operations.
    pub fn require_super_admin(&self) -> Result<(), Error> {
        if self.is_super_admin() {
            Ok(())
        } else {
            Err(Error::forbidden("super admin role required"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn actor(role: UserRole, org_id: OrganizationId) -> Actor {
        Actor {
            user_id: UserId::random(),
            org_id,
            role,
        }
    }

    #[rstest]
    #[case(UserRole::SuperAdmin, false, true, true)]
    #[case(UserRole::OrgAdmin, true, true, true)]
    #[case(UserRole::OrgAdmin, false, false, false)]
    #[case(UserRole::Staff, true, true, false)]
    #[case(UserRole::Staff, false, false, false)]
    fn permissions_by_role(
        #[case] role: UserRole,
        #[case] own_org: bool,
        #[case] can_read: bool,
        #[case] can_manage: bool,
    ) {
        let home = OrganizationId::random();
        let target = if own_org { home } else { OrganizationId::random() };
        let actor = actor(role, home);
        assert_eq!(actor.require_read(target).is_ok(), can_read);
        assert_eq!(actor.require_manage(target).is_ok(), can_manage);
    }

    #[rstest]
    fn org_admins_are_not_super_admins() {
        let err = actor(UserRole::OrgAdmin, OrganizationId::random())
            .require_super_admin()
            .expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
