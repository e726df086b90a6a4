//! Server construction and middleware wiring.

mod config;
mod settings;

pub use config::ServerConfig;
pub use settings::ServerSettings;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use userbase::Trace;
#[cfg(debug_assertions)]
use userbase::doc::ApiDoc;
use userbase::domain::ports::{PasswordHasher, UserRepository};
use userbase::domain::{CredentialAuthenticator, UserRegistrationService};
use userbase::inbound::http::health::{HealthState, live, ready};
use userbase::inbound::http::state::HttpState;
use userbase::inbound::http::users;
use userbase::outbound::hashing::BcryptPasswordHasher;
use userbase::outbound::memory::InMemoryUserRepository;
use userbase::outbound::persistence::DieselUserRepository;

/// Wire the domain services onto the configured adapters.
///
/// # Errors
/// Returns [`std::io::Error`] when the bcrypt cost is out of range.
fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let users: Arc<dyn UserRepository> = match &config.db_pool {
        Some(pool) => Arc::new(DieselUserRepository::new(pool.clone())),
        None => {
            warn!("no database configured; registered users live in process memory");
            Arc::new(InMemoryUserRepository::new())
        }
    };
    let hasher: Arc<dyn PasswordHasher> = Arc::new(
        BcryptPasswordHasher::new(config.bcrypt_cost).map_err(std::io::Error::other)?,
    );

    let mut registration = UserRegistrationService::new(Arc::clone(&users), Arc::clone(&hasher))
        .with_persistence_timeout(config.persistence_timeout);
    if let Some(store) = &config.seed_store {
        registration = registration.with_seed_store(Arc::clone(store));
    }
    let authenticator = CredentialAuthenticator::new(users, hasher)
        .with_lookup_timeout(config.persistence_timeout);

    Ok(HttpState::new(
        Arc::new(registration),
        Arc::new(authenticator),
    ))
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(users::configure)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// Readiness is flagged once the socket is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when wiring the adapters or binding the
/// socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config)?);
    let server_health_state = health_state.clone();
    let bind_addr = config.bind_addr;

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    info!(%bind_addr, "userbase listening");
    Ok(server)
}
