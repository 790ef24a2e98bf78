//! Records seeded into an empty store so the console can be signed into.

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use super::ports::{
    IdentityProvider, IdentityProviderError, OrganizationRepository, UserRepository,
};
use super::{
    Audit, DisplayName, EmailAddress, EntityName, Error, IdentitySync, Organization,
    OrganizationId, User, UserChange, UserId, UserRole,
};

/// Organization that owns the bootstrap administrator.
pub const BOOTSTRAP_ORG_ID: OrganizationId =
    OrganizationId::from_uuid(Uuid::from_u128(0x6a1f_3c2e_0000_4000_8000_0000_0000_0001));
/// Super admin available before any real users exist.
pub const BOOTSTRAP_ADMIN_ID: UserId =
    UserId::from_uuid(Uuid::from_u128(0x6a1f_3c2e_0000_4000_8000_0000_0000_0002));
/// Sign-in email of the bootstrap administrator.
pub const BOOTSTRAP_ADMIN_EMAIL: &str = "admin@example.org";

/// Build the bootstrap organization and its super admin.
pub fn bootstrap_records(now: DateTime<Utc>) -> Result<(Organization, User), Error> {
    let invalid =
        |err: super::ValueError| Error::internal(format!("invalid bootstrap record: {err}"));
    let org = Organization {
        id: BOOTSTRAP_ORG_ID,
        name: EntityName::new("Platform").map_err(invalid)?,
        active: true,
        audit: Audit::created(now, None),
    };
    let admin = User {
        id: BOOTSTRAP_ADMIN_ID,
        org_id: BOOTSTRAP_ORG_ID,
        email: EmailAddress::new(BOOTSTRAP_ADMIN_EMAIL).map_err(invalid)?,
        display_name: DisplayName::new("Platform Administrator").map_err(invalid)?,
        role: UserRole::SuperAdmin,
        active: true,
        audit: Audit::created(now, None),
    };
    Ok((org, admin))
}

async fn pending_bootstrap<O>(
    organizations: &O,
    now: DateTime<Utc>,
) -> Result<Option<(Organization, User)>, Error>
where
    O: OrganizationRepository + ?Sized,
{
    if organizations.find_by_id(BOOTSTRAP_ORG_ID).await?.is_some() {
        return Ok(None);
    }
    bootstrap_records(now).map(Some)
}

async fn store_bootstrap<O, U>(
    organizations: &O,
    users: &U,
    org: &Organization,
    admin: &User,
) -> Result<(), Error>
where
    O: OrganizationRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    organizations.insert(org).await?;
    users.insert(admin).await?;
    info!(email = BOOTSTRAP_ADMIN_EMAIL, "seeded bootstrap super admin");
    Ok(())
}

/// Insert the bootstrap records unless the organization already exists.
///
/// Returns whether anything was written.
pub async fn ensure_bootstrap<O, U>(
    organizations: &O,
    users: &U,
    now: DateTime<Utc>,
) -> Result<bool, Error>
where
    O: OrganizationRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    let Some((org, admin)) = pending_bootstrap(organizations, now).await? else {
        return Ok(false);
    };
    store_bootstrap(organizations, users, &org, &admin).await?;
    Ok(true)
}

/// Like [`ensure_bootstrap`], but first creates the administrator's account
/// in the identity provider so the seeded admin can sign in.
///
/// The provider account is created before the local rows. A rejected create
/// (usually an account left by an earlier interrupted seed) is logged and
/// seeding continues.
///
/// # Errors
/// An unreachable provider yields `service_unavailable` and nothing is
/// written locally.
pub async fn ensure_bootstrap_with_identity<O, U, P>(
    organizations: &O,
    users: &U,
    sync: &IdentitySync<P>,
    now: DateTime<Utc>,
) -> Result<bool, Error>
where
    O: OrganizationRepository + ?Sized,
    U: UserRepository + ?Sized,
    P: IdentityProvider,
{
    let Some((org, admin)) = pending_bootstrap(organizations, now).await? else {
        return Ok(false);
    };
    match sync.handle(&UserChange::Created(admin.clone())).await {
        Ok(_) => {}
        Err(IdentityProviderError::Rejected { message }) => {
            warn!(
                uid = %admin.id,
                %message,
                "identity provider rejected bootstrap admin; assuming it exists"
            );
        }
        Err(err @ IdentityProviderError::Unavailable { .. }) => {
            return Err(Error::service_unavailable(format!(
                "bootstrap admin identity: {err}"
            )));
        }
        Err(err) => {
            return Err(Error::internal(format!("bootstrap admin identity: {err}")));
        }
    }
    store_bootstrap(organizations, users, &org, &admin).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::domain::ErrorCode;
    use crate::domain::ports::{
        MockIdentityProvider, MockOrganizationRepository, MockUserRepository,
    };
    use crate::domain::test_support::{fixed_now, organization};
    use rstest::rstest;

    fn empty_org_repo() -> MockOrganizationRepository {
        let mut orgs = MockOrganizationRepository::new();
        orgs.expect_find_by_id().return_once(|_| Ok(None));
        orgs
    }

    #[rstest]
    fn bootstrap_admin_is_an_active_super_admin() {
        let (org, admin) = bootstrap_records(fixed_now()).expect("valid records");
        assert_eq!(admin.org_id, org.id);
        assert_eq!(admin.role, UserRole::SuperAdmin);
        assert!(admin.active);
        assert_eq!(admin.email.as_ref(), BOOTSTRAP_ADMIN_EMAIL);
    }

    #[rstest]
    #[tokio::test]
    async fn existing_bootstrap_org_is_left_alone() {
        let mut orgs = MockOrganizationRepository::new();
        orgs.expect_find_by_id()
            .withf(|id| *id == BOOTSTRAP_ORG_ID)
            .return_once(|_| Ok(Some(organization("Platform"))));
        orgs.expect_insert().times(0);
        let mut users = MockUserRepository::new();
        users.expect_insert().times(0);

        let seeded = ensure_bootstrap(&orgs, &users, fixed_now())
            .await
            .expect("no failure");
        assert!(!seeded);
    }

    #[rstest]
    #[tokio::test]
    async fn empty_store_gets_org_then_admin() {
        let mut orgs = MockOrganizationRepository::new();
        orgs.expect_find_by_id().return_once(|_| Ok(None));
        orgs.expect_insert().times(1).return_once(|_| Ok(()));
        let mut users = MockUserRepository::new();
        users
            .expect_insert()
            .withf(|user| user.id == BOOTSTRAP_ADMIN_ID)
            .times(1)
            .return_once(|_| Ok(()));

        let seeded = ensure_bootstrap(&orgs, &users, fixed_now())
            .await
            .expect("seeded");
        assert!(seeded);
    }

    #[rstest]
    #[tokio::test]
    async fn seeded_admin_is_created_in_identity_provider() {
        let mut orgs = empty_org_repo();
        orgs.expect_insert().times(1).return_once(|_| Ok(()));
        let mut users = MockUserRepository::new();
        users.expect_insert().times(1).return_once(|_| Ok(()));
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_create()
            .withf(|identity| {
                identity.uid == BOOTSTRAP_ADMIN_ID
                    && identity.email.as_ref() == BOOTSTRAP_ADMIN_EMAIL
                    && !identity.disabled
            })
            .times(1)
            .return_once(|_| Ok(()));
        let sync = IdentitySync::new(Arc::new(provider));

        let seeded = ensure_bootstrap_with_identity(&orgs, &users, &sync, fixed_now())
            .await
            .expect("seeded");
        assert!(seeded);
    }

    #[rstest]
    #[tokio::test]
    async fn existing_bootstrap_skips_identity_provider() {
        let mut orgs = MockOrganizationRepository::new();
        orgs.expect_find_by_id()
            .return_once(|_| Ok(Some(organization("Platform"))));
        let users = MockUserRepository::new();
        let mut provider = MockIdentityProvider::new();
        provider.expect_create().times(0);
        let sync = IdentitySync::new(Arc::new(provider));

        let seeded = ensure_bootstrap_with_identity(&orgs, &users, &sync, fixed_now())
            .await
            .expect("no failure");
        assert!(!seeded);
    }

    #[rstest]
    #[tokio::test]
    async fn rejected_identity_create_still_seeds_locally() {
        let mut orgs = empty_org_repo();
        orgs.expect_insert().times(1).return_once(|_| Ok(()));
        let mut users = MockUserRepository::new();
        users.expect_insert().times(1).return_once(|_| Ok(()));
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_create()
            .return_once(|_| Err(IdentityProviderError::rejected("EMAIL_EXISTS")));
        let sync = IdentitySync::new(Arc::new(provider));

        let seeded = ensure_bootstrap_with_identity(&orgs, &users, &sync, fixed_now())
            .await
            .expect("seeded");
        assert!(seeded);
    }

    #[rstest]
    #[tokio::test]
    async fn unreachable_identity_provider_writes_nothing() {
        let mut orgs = empty_org_repo();
        orgs.expect_insert().times(0);
        let mut users = MockUserRepository::new();
        users.expect_insert().times(0);
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_create()
            .return_once(|_| Err(IdentityProviderError::unavailable("connection refused")));
        let sync = IdentitySync::new(Arc::new(provider));

        let err = ensure_bootstrap_with_identity(&orgs, &users, &sync, fixed_now())
            .await
            .expect_err("provider down");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
