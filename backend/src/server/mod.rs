//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use userdesk::Trace;
use userdesk::inbound::http::configure;
use userdesk::inbound::http::state::HttpState;
use userdesk::middleware::{CorsPolicy, security_headers};

fn build_app(
    http_state: web::Data<HttpState>,
    cors: CorsPolicy,
    containerised: bool,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(http_state)
        .wrap(Trace)
        .wrap(security_headers(containerised))
        .configure(configure(cors))
}

/// Construct an Actix HTTP server for the given state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(http_state: HttpState, config: ServerConfig) -> std::io::Result<Server> {
    let http_state = web::Data::new(http_state);
    let ServerConfig {
        bind_addr,
        cors,
        containerised,
    } = config;

    let server = HttpServer::new(move || build_app(http_state.clone(), cors.clone(), containerised))
        .bind(bind_addr)?
        .run();
    Ok(server)
}
