//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};

use backend::domain::ports::{ComplaintRepository, UserRepository};
use backend::domain::{AccountService, ComplaintService, TokenCodec};
use backend::inbound::http::complaints::{
    create_complaint, delete_complaint, get_complaint, list_complaints, update_complaint,
};
use backend::inbound::http::health::{live, ready, HealthState};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::users::{current_user, login, register};
use backend::outbound::memory::{InMemoryComplaintRepository, InMemoryUserRepository};
use backend::outbound::persistence::{DieselComplaintRepository, DieselUserRepository};
use backend::Trace;

#[cfg(debug_assertions)]
use backend::ApiDoc;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn assemble_state(
    users: Arc<dyn UserRepository>,
    complaints: Arc<dyn ComplaintRepository>,
    codec: TokenCodec,
) -> HttpState {
    let auth = Arc::new(AccountService::new(users, codec));
    let service = Arc::new(ComplaintService::new(complaints));
    HttpState::new(auth, service.clone(), service)
}

/// Build the HTTP state from configuration.
///
/// Uses the Diesel adapters when a pool is available and the in-memory
/// stores otherwise (development fallback).
fn build_state(config: &ServerConfig) -> HttpState {
    let codec = TokenCodec::from_secret(&config.token_secret);
    match &config.db_pool {
        Some(pool) => assemble_state(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselComplaintRepository::new(pool.clone())),
            codec,
        ),
        None => {
            let users = Arc::new(InMemoryUserRepository::new());
            let complaints = Arc::new(InMemoryComplaintRepository::new(users.clone()));
            assemble_state(users, complaints, codec)
        }
    }
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let api = web::scope("/api/v1")
        .service(register)
        .service(login)
        .service(current_user)
        .service(list_complaints)
        .service(create_complaint)
        .service(get_complaint)
        .service(update_complaint)
        .service(delete_complaint);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

#[cfg(feature = "metrics")]
fn make_metrics() -> std::io::Result<actix_web_prom::PrometheusMetrics> {
    actix_web_prom::PrometheusMetricsBuilder::new("backend")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::other(format!("prometheus metrics setup failed: {e}")))
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_state(&config));
    let server_health_state = health_state.clone();

    #[cfg(feature = "metrics")]
    let prometheus = match config.prometheus {
        Some(prometheus) => prometheus,
        None => make_metrics()?,
    };

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(prometheus.clone());

        app
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
