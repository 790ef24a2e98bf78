//! Storage selection and [`HttpState`] assembly.

use std::io;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use hospadmin::domain::ports::{
    FixtureLoginService, FixtureUserChangePublisher, LoginService, OrganizationRepository,
    UserChangePublisher, UserRepository,
};
use hospadmin::domain::{IdentitySync, ensure_bootstrap, ensure_bootstrap_with_identity};
use hospadmin::inbound::http::state::{HttpState, Repositories, ServiceContext};
use hospadmin::outbound::identity::{
    HttpIdentityProvider, IdentityLoginService, IdentityProviderConfig,
};
use hospadmin::outbound::memory::InMemoryStore;
use hospadmin::outbound::persistence::{
    DbPool, DieselAssignmentRepository, DieselDepartmentRepository, DieselHospitalRepository,
    DieselLocationRepository, DieselOrganizationRepository, DieselTeamRepository,
    DieselUserRepository, PoolConfig, run_migrations,
};
use hospadmin::outbound::queue::{ChannelUserChangePublisher, run_identity_sync};

/// Backing store for every repository port.
pub enum Storage {
    Database(DbPool),
    Memory(Arc<InMemoryStore>),
}

/// How `POST /auth/login` checks credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignIn {
    /// Built-in `admin@example.org` account; in-memory store only.
    Fixture,
    IdentityProvider,
}

/// Storage and sign-in combinations the server refuses to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WiringError {
    #[error("database_url requires identity_base_url; fixture sign-in is in-memory only")]
    FixtureLoginWithDatabase,
}

impl From<WiringError> for io::Error {
    fn from(err: WiringError) -> Self {
        io::Error::other(err.to_string())
    }
}

/// Pick the sign-in mode for a storage choice.
///
/// # Errors
/// Persistent storage without an identity provider is refused.
pub fn sign_in_for(persistent: bool, identity_configured: bool) -> Result<SignIn, WiringError> {
    match (persistent, identity_configured) {
        (_, true) => Ok(SignIn::IdentityProvider),
        (false, false) => Ok(SignIn::Fixture),
        (true, false) => Err(WiringError::FixtureLoginWithDatabase),
    }
}

impl Storage {
    fn is_persistent(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

async fn seed<O, U>(
    organizations: &O,
    users: &U,
    identity: Option<&IdentityWiring>,
) -> io::Result<()>
where
    O: OrganizationRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    let now = DefaultClock.utc();
    let seeded = match identity {
        Some(wiring) => {
            ensure_bootstrap_with_identity(organizations, users, &wiring.sync, now).await
        }
        None => ensure_bootstrap(organizations, users, now).await,
    };
    seeded
        .map(|_| ())
        .map_err(|err| io::Error::other(format!("bootstrap failed: {err}")))
}

/// Migrate and connect to `database_url`, or fall back to the in-memory
/// store. Either way the bootstrap organization and administrator exist
/// afterwards, mirrored into the identity provider when one is wired.
///
/// # Errors
/// Returns [`io::Error`] when the storage and sign-in combination is refused,
/// or when migrations, pool creation or seeding fail.
pub async fn prepare_storage(
    database_url: Option<&str>,
    pool_size: u32,
    identity: Option<&IdentityWiring>,
) -> io::Result<Storage> {
    sign_in_for(database_url.is_some(), identity.is_some())?;
    let Some(url) = database_url else {
        warn!("no database_url configured; using the in-memory store");
        let store = Arc::new(InMemoryStore::default());
        seed(store.as_ref(), store.as_ref(), identity).await?;
        return Ok(Storage::Memory(store));
    };

    run_migrations(url)
        .await
        .map_err(|err| io::Error::other(format!("migrations failed: {err}")))?;
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(pool_size))
        .await
        .map_err(|err| io::Error::other(format!("database pool failed: {err}")))?;
    seed(
        &DieselOrganizationRepository::new(pool.clone()),
        &DieselUserRepository::new(pool.clone()),
        identity,
    )
    .await?;
    Ok(Storage::Database(pool))
}

/// Identity provider client plus the queue feeding its sync worker.
pub struct IdentityWiring {
    provider: Arc<HttpIdentityProvider>,
    sync: IdentitySync<HttpIdentityProvider>,
    publisher: ChannelUserChangePublisher,
}

impl IdentityWiring {
    /// Build the provider client and spawn the sync worker on the current
    /// runtime. The worker exits once every publisher clone is dropped.
    ///
    /// # Errors
    /// Returns [`io::Error`] when the HTTP client cannot be built.
    pub fn start(config: IdentityProviderConfig, queue_capacity: usize) -> io::Result<Self> {
        let base_url = config.base_url.clone();
        let provider = Arc::new(
            HttpIdentityProvider::new(config)
                .map_err(|err| io::Error::other(format!("identity client failed: {err}")))?,
        );
        let (publisher, receiver) = ChannelUserChangePublisher::bounded(queue_capacity);
        let sync = IdentitySync::new(Arc::clone(&provider));
        let worker = sync.clone();
        tokio::spawn(async move {
            let processed = run_identity_sync(receiver, worker).await;
            info!(processed, "identity sync drained");
        });
        info!(%base_url, queue_capacity, "identity provider configured");
        Ok(Self {
            provider,
            sync,
            publisher,
        })
    }
}

fn service_context<U>(
    users: Arc<U>,
    sign_in: SignIn,
    identity: Option<&IdentityWiring>,
) -> ServiceContext
where
    U: UserRepository + 'static,
{
    let (login, publisher): (Arc<dyn LoginService>, Arc<dyn UserChangePublisher>) =
        match (sign_in, identity) {
            (SignIn::IdentityProvider, Some(wiring)) => (
                Arc::new(IdentityLoginService::new(
                    Arc::clone(&wiring.provider),
                    users,
                )),
                Arc::new(wiring.publisher.clone()),
            ),
            _ => (
                Arc::new(FixtureLoginService),
                Arc::new(FixtureUserChangePublisher),
            ),
        };
    ServiceContext {
        login,
        publisher,
        clock: Arc::new(DefaultClock),
    }
}

/// Wire the admin services over `storage`.
///
/// # Errors
/// Returns [`WiringError`] for database storage without an identity provider.
pub fn build_http_state(
    storage: &Storage,
    identity: Option<&IdentityWiring>,
) -> Result<HttpState, WiringError> {
    let sign_in = sign_in_for(storage.is_persistent(), identity.is_some())?;
    let state = match storage {
        Storage::Memory(store) => HttpState::from_repositories(
            Repositories::shared(Arc::clone(store)),
            service_context(Arc::clone(store), sign_in, identity),
        ),
        Storage::Database(pool) => {
            let users = Arc::new(DieselUserRepository::new(pool.clone()));
            HttpState::from_repositories(
                Repositories {
                    organizations: Arc::new(DieselOrganizationRepository::new(pool.clone())),
                    hospitals: Arc::new(DieselHospitalRepository::new(pool.clone())),
                    locations: Arc::new(DieselLocationRepository::new(pool.clone())),
                    departments: Arc::new(DieselDepartmentRepository::new(pool.clone())),
                    teams: Arc::new(DieselTeamRepository::new(pool.clone())),
                    users: Arc::clone(&users),
                    assignments: Arc::new(DieselAssignmentRepository::new(pool.clone())),
                },
                service_context(users, sign_in, identity),
            )
        }
    };
    Ok(state)
}
