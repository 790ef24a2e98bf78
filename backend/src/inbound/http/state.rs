//! Shared HTTP adapter state.
//!
//! Handlers receive `web::Data<HttpState>` and only see driving ports, so
//! tests can swap in doubles without touching storage.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    ActorResolver, AssignmentAdmin, AssignmentRepository, DepartmentAdmin, DepartmentRepository,
    HospitalAdmin, HospitalRepository, LocationAdmin, LocationRepository, LoginService,
    OrganizationAdmin, OrganizationRepository, TeamAdmin, TeamRepository, UserAdmin,
    UserChangePublisher, UserRepository,
};
use crate::domain::{
    AssignmentEndpoints, AssignmentService, DepartmentService, HospitalService, LocationService,
    OrganizationService, TeamService, UserService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub actors: Arc<dyn ActorResolver>,
    pub organizations: Arc<dyn OrganizationAdmin>,
    pub hospitals: Arc<dyn HospitalAdmin>,
    pub locations: Arc<dyn LocationAdmin>,
    pub departments: Arc<dyn DepartmentAdmin>,
    pub teams: Arc<dyn TeamAdmin>,
    pub users: Arc<dyn UserAdmin>,
    pub assignments: Arc<dyn AssignmentAdmin>,
}

/// One repository per aggregate.
///
/// The in-memory store fills every slot with the same `Arc`; the Diesel
/// adapters share one pool.
pub struct Repositories<O, H, L, D, T, U, A> {
    pub organizations: Arc<O>,
    pub hospitals: Arc<H>,
    pub locations: Arc<L>,
    pub departments: Arc<D>,
    pub teams: Arc<T>,
    pub users: Arc<U>,
    pub assignments: Arc<A>,
}

impl<R> Repositories<R, R, R, R, R, R, R> {
    /// Use a single store for every aggregate.
    pub fn shared(store: Arc<R>) -> Self {
        Self {
            organizations: Arc::clone(&store),
            hospitals: Arc::clone(&store),
            locations: Arc::clone(&store),
            departments: Arc::clone(&store),
            teams: Arc::clone(&store),
            users: Arc::clone(&store),
            assignments: store,
        }
    }
}

/// Non-repository collaborators of the admin services.
#[derive(Clone)]
pub struct ServiceContext {
    pub login: Arc<dyn LoginService>,
    pub publisher: Arc<dyn UserChangePublisher>,
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Wire every admin service over `repos`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use hospadmin::domain::ports::{FixtureLoginService, FixtureUserChangePublisher};
    /// use hospadmin::inbound::http::state::{HttpState, Repositories, ServiceContext};
    /// use hospadmin::outbound::memory::InMemoryStore;
    /// use mockable::DefaultClock;
    ///
    /// let state = HttpState::from_repositories(
    ///     Repositories::shared(Arc::new(InMemoryStore::default())),
    ///     ServiceContext {
    ///         login: Arc::new(FixtureLoginService),
    ///         publisher: Arc::new(FixtureUserChangePublisher),
    ///         clock: Arc::new(DefaultClock),
    ///     },
    /// );
    /// let _teams = state.teams.clone();
    /// ```
    pub fn from_repositories<O, H, L, D, T, U, A>(
        repos: Repositories<O, H, L, D, T, U, A>,
        context: ServiceContext,
    ) -> Self
    where
        O: OrganizationRepository + 'static,
        H: HospitalRepository + 'static,
        L: LocationRepository + 'static,
        D: DepartmentRepository + 'static,
        T: TeamRepository + 'static,
        U: UserRepository + 'static,
        A: AssignmentRepository + 'static,
    {
        let Repositories {
            organizations,
            hospitals,
            locations,
            departments,
            teams,
            users,
            assignments,
        } = repos;
        let ServiceContext {
            login,
            publisher,
            clock,
        } = context;

        let user_service = Arc::new(UserService::new(
            Arc::clone(&organizations),
            Arc::clone(&users),
            publisher,
            Arc::clone(&clock),
        ));
        let endpoints = AssignmentEndpoints {
            departments: Arc::clone(&departments),
            locations: Arc::clone(&locations),
            teams: Arc::clone(&teams),
            users: Arc::clone(&users),
        };

        Self {
            login,
            actors: user_service.clone(),
            users: user_service,
            hospitals: Arc::new(HospitalService::new(
                Arc::clone(&organizations),
                Arc::clone(&hospitals),
                Arc::clone(&clock),
            )),
            locations: Arc::new(LocationService::new(
                hospitals,
                locations,
                Arc::clone(&assignments),
                Arc::clone(&clock),
            )),
            departments: Arc::new(DepartmentService::new(
                Arc::clone(&organizations),
                Arc::clone(&departments),
                Arc::clone(&clock),
            )),
            teams: Arc::new(TeamService::new(
                departments,
                teams,
                Arc::clone(&assignments),
                users,
                Arc::clone(&clock),
            )),
            assignments: Arc::new(AssignmentService::new(
                endpoints,
                assignments,
                Arc::clone(&clock),
            )),
            organizations: Arc::new(OrganizationService::new(organizations, clock)),
        }
    }
}
