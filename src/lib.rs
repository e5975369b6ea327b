use actix_cors::Cors;
use actix_web::middleware::{Compress, Logger};
use actix_web::{http::header, web, App, HttpResponse, HttpServer, Responder};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod declaration;
pub mod generators;
pub mod state;
pub mod storage;

pub use crate::config::AppConfig;
pub use crate::state::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    #[schema(example = "2024-03-05T10:15:00+04:00")]
    pub timestamp: String,
}

#[utoipa::path(
    tag = "Health",
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Local::now().to_rfc3339(),
    })
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::declaration::handlers::submit_declaration,
        crate::declaration::handlers::download_pdf,
        crate::declaration::handlers::view_pdf,
        crate::health_check
    ),
    components(
        schemas(
            declaration::models::PassportDeclaration,
            declaration::models::SubmissionResponse,
            ErrorResponse,
            HealthResponse,
        )
    ),
    tags(
        (name = "Passport Declaration", description = "Declaration submission and PDF retrieval."),
        (name = "Health", description = "Liveness probe.")
    )
)]
pub struct ApiDoc;

/// Register every route of the service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    declaration::handlers::config(cfg);
    cfg.service(web::resource("/health").route(web::get().to(health_check)));
}

fn build_cors(config: &AppConfig) -> Cors {
    let cors = if config.cors_allowed_origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        config
            .cors_allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600)
}

pub async fn run() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let app_state = match AppState::from_config(&config) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!(
                "Failed to prepare output directory {}: {}",
                config.output_dir.display(),
                e
            );
            std::process::exit(1);
        }
    };

    let prometheus = PrometheusMetricsBuilder::new("passport_declaration_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    log::info!(
        "Using the {} renderer, writing PDFs to {}",
        config.strategy,
        config.output_dir.display()
    );
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let bind = (config.host.clone(), config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(Logger::default())
            .wrap(prometheus.clone())
            .wrap(build_cors(&config))
            .app_data(app_state.clone())
            .configure(configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind(bind)?
    .run()
    .await
}
