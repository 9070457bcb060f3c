use crate::application::use_cases::nl_service::NlModel;
use crate::domain::deployment::DeploymentConfig;
use crate::domain::error::AppError;
use actix_cors::Cors;
use actix_web::error::{InternalError, QueryPayloadError};
use actix_web::{dev::Server, get, web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use validator::Validate;

const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub model: Arc<NlModel>,
    pub deployment: DeploymentConfig,
    pub default_build: String,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SearchSvQuery {
    #[validate(length(min = 1, max = 1024))]
    pub q: String,
    #[serde(default)]
    pub build: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SearchPlacesQuery {
    #[validate(length(min = 1, max = 1024))]
    pub q: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    builds: Vec<String>,
}

pub fn error_response(err: &AppError) -> HttpResponse {
    let body = ErrorBody {
        error: err.to_string(),
    };
    match err {
        AppError::UnknownBuild(_) | AppError::ValidationError(_) => {
            HttpResponse::BadRequest().json(body)
        }
        AppError::NotFound(_) => HttpResponse::NotFound().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

#[get("/healthz")]
async fn healthz(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        builds: data.model.store().build_names(),
    })
}

#[get("/search_sv")]
async fn search_sv(data: web::Data<HttpState>, query: web::Query<SearchSvQuery>) -> impl Responder {
    let query = query.into_inner();
    if let Err(e) = query.validate() {
        return error_response(&AppError::from(e));
    }
    let build = query
        .build
        .filter(|b| !b.trim().is_empty())
        .unwrap_or_else(|| data.default_build.clone());

    add_log(
        &data.logs,
        "INFO",
        "NlApi",
        &format!("Searching stat vars (build={})", build),
    );

    let model = data.model.clone();
    let q = query.q;
    let log_build = build.clone();
    match web::block(move || model.detect_svs(&q, &build)).await {
        Ok(Ok(result)) => HttpResponse::Ok().json(result),
        Ok(Err(e)) => {
            add_log(
                &data.logs,
                "ERROR",
                "NlApi",
                &format!("Stat var search failed (build={}): {}", log_build, e),
            );
            error_response(&e)
        }
        Err(e) => error_response(&AppError::Internal(e.to_string())),
    }
}

#[get("/search_places")]
async fn search_places(
    data: web::Data<HttpState>,
    query: web::Query<SearchPlacesQuery>,
) -> impl Responder {
    let query = query.into_inner();
    if let Err(e) = query.validate() {
        return error_response(&AppError::from(e));
    }

    let model = data.model.clone();
    let q = query.q;
    match web::block(move || model.detect_place(&q)).await {
        Ok(Ok(places)) => HttpResponse::Ok().json(places),
        Ok(Err(e)) => {
            add_log(
                &data.logs,
                "ERROR",
                "NlApi",
                &format!("Place detection failed: {}", e),
            );
            error_response(&e)
        }
        Err(e) => error_response(&AppError::Internal(e.to_string())),
    }
}

#[get("/config")]
async fn get_config(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(&data.deployment)
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let response = match data.logs.lock() {
        Ok(logs) => HttpResponse::Ok().json(&*logs),
        Err(_) => error_response(&AppError::Internal("Log buffer lock poisoned".to_string())),
    };
    response
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    match level {
        "ERROR" => tracing::error!(source, "{}", message),
        "WARN" => tracing::warn!(source, "{}", message),
        _ => tracing::info!(source, "{}", message),
    }
    if let Ok(mut logs) = logs.lock() {
        logs.push(entry);
        if logs.len() > MAX_LOG_ENTRIES {
            logs.remove(0);
        }
    }
}

/// Malformed or missing query parameters get the same JSON error body as the handlers.
fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = error_response(&AppError::ValidationError(err.to_string()));
    InternalError::from_response(err, response).into()
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error))
        .service(healthz).service(
        web::scope("/api")
            .service(search_sv)
            .service(search_places)
            .service(get_config)
            .service(get_logs),
    );
}

pub fn start_server(state: HttpState, host: &str, port: u16) -> std::io::Result<Server> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((host, port))?
    .run();

    Ok(server)
}
