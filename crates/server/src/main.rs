// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod session;
mod spa;

use axum::{
    Json, Router,
    extract::{
        Path, Request, State as AxumState,
        rejection::{JsonRejection, PathRejection},
    },
    http::{HeaderMap, Method, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use stepcount_api::{
    AdminUserInfo, AdminUserRequest, ApiError, AuthenticationService, AverageInfo, CheckResponse,
    CreatedResponse, EmployeeInfo, LocationInfo, LoginOutcome, LoginRequest, NameRequest,
    RecordStepsRequest, SESSION_DURATION, StepEntryInfo, SuccessResponse, UpdateStepEntryRequest,
};
use stepcount_persistence::{DatabaseConfig, Persistence};
use time::{Date, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::session::{AdminSession, cleared_session_cookie, session_cookie, session_token};

/// Step Count Server - HTTP server for the Step Count service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// `PostgreSQL` connection URL. When set, `PostgreSQL` is used instead of `SQLite`.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Path to the `SQLite` database file.
    #[arg(long, env = "DATABASE_PATH", default_value = "steps.db")]
    database_path: PathBuf,

    /// Port to bind the server to
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0")]
    bind_address: IpAddr,

    /// Directory holding the single-page application
    #[arg(long, env = "PUBLIC_DIR", default_value = "public")]
    public_dir: PathBuf,

    /// Email of the admin created on first start
    #[arg(long, env = "ADMIN_EMAIL", default_value = "admin@example.com")]
    admin_email: String,

    /// Password of the admin created on first start
    #[arg(long, env = "ADMIN_PASSWORD", default_value = "admin123", hide_env_values = true)]
    admin_password: String,
}

/// Application state shared across handlers.
///
/// This contains the persistence layer wrapped in a Mutex to allow
/// safe concurrent access.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
    /// Directory the single-page application is served from.
    public_dir: Arc<PathBuf>,
}

impl AppState {
    fn new(persistence: Persistence, public_dir: PathBuf) -> Self {
        Self {
            persistence: Arc::new(Mutex::new(persistence)),
            public_dir: Arc::new(public_dir),
        }
    }
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error message.
    error: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl HttpError {
    fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: String::from("Not found"),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::DomainRuleViolation { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.message().to_string(),
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: format!("Invalid request body: {}", rejection.body_text()),
        }
    }
}

impl From<PathRejection> for HttpError {
    fn from(rejection: PathRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: format!("Invalid id: {}", rejection.body_text()),
        }
    }
}

/// Unwraps a numeric path id, reporting malformed ids as 400.
fn path_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, HttpError> {
    id.map(|Path(value)| value).map_err(HttpError::from)
}

/// Unwraps a JSON body, reporting decoding failures as 400.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, HttpError> {
    payload.map(|Json(body)| body).map_err(HttpError::from)
}

/// The current day in UTC, used to reject future step entries.
fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

// ============================================================================
// Public endpoints
// ============================================================================

/// Handler for GET `/api/employees`.
async fn handle_list_employees(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<EmployeeInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(stepcount_api::list_employees(&mut persistence)?))
}

/// Handler for GET `/api/locations`.
async fn handle_list_locations(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<LocationInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(stepcount_api::list_locations(&mut persistence)?))
}

/// Handler for POST `/api/steps`.
///
/// Records (or overwrites) the steps of one employee for one day.
async fn handle_record_steps(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<RecordStepsRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, HttpError> {
    let request: RecordStepsRequest = json_body(payload)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: SuccessResponse =
        stepcount_api::record_steps(&mut persistence, &request, today())?;

    Ok(Json(response))
}

/// Handler for GET `/api/averages`.
async fn handle_list_averages(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<AverageInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(stepcount_api::list_averages(&mut persistence)?))
}

// ============================================================================
// Sessions
// ============================================================================

/// Handler for POST `/admin/login`.
///
/// On success, sets the `admin_token` cookie.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let request: LoginRequest = json_body(payload)?;

    let mut persistence = app_state.persistence.lock().await;
    let outcome: LoginOutcome =
        stepcount_api::login(&mut persistence, &request, OffsetDateTime::now_utc())?;

    Ok((
        [(SET_COOKIE, session_cookie(&outcome.token, SESSION_DURATION))],
        Json(SuccessResponse::ok()),
    )
        .into_response())
}

/// Handler for POST `/admin/logout`.
///
/// Deletes the caller's session and clears the cookie.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: SuccessResponse = stepcount_api::logout(&mut persistence, &session.token)?;

    Ok(([(SET_COOKIE, cleared_session_cookie())], Json(response)).into_response())
}

/// Handler for GET `/admin/check`.
async fn handle_check_session(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Json<CheckResponse> {
    let token: Option<String> = session_token(&headers);

    let mut persistence = app_state.persistence.lock().await;
    Json(stepcount_api::check_session(
        &mut persistence,
        token.as_deref(),
        OffsetDateTime::now_utc(),
    ))
}

// ============================================================================
// Admin: employees and locations
// ============================================================================

/// Handler for GET `/admin/employees`.
async fn handle_admin_list_employees(
    AxumState(app_state): AxumState<AppState>,
    _session: AdminSession,
) -> Result<Json<Vec<EmployeeInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(stepcount_api::list_employees(&mut persistence)?))
}

/// Handler for POST `/admin/employees`.
async fn handle_create_employee(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
    payload: Result<Json<NameRequest>, JsonRejection>,
) -> Result<Json<CreatedResponse>, HttpError> {
    let request: NameRequest = json_body(payload)?;
    info!(admin_user_id = session.admin.id, "Handling create_employee request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(stepcount_api::create_employee(
        &mut persistence,
        &request,
    )?))
}

/// Handler for PUT `/admin/employees/{id}`.
async fn handle_update_employee(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<NameRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, HttpError> {
    let employee_id: i64 = path_id(id)?;
    let request: NameRequest = json_body(payload)?;
    info!(
        admin_user_id = session.admin.id,
        employee_id, "Handling update_employee request"
    );

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(stepcount_api::update_employee(
        &mut persistence,
        employee_id,
        &request,
    )?))
}

/// Handler for DELETE `/admin/employees/{id}`.
///
/// The employee's step entries are removed with it.
async fn handle_delete_employee(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<SuccessResponse>, HttpError> {
    let employee_id: i64 = path_id(id)?;
    info!(
        admin_user_id = session.admin.id,
        employee_id, "Handling delete_employee request"
    );

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(stepcount_api::delete_employee(
        &mut persistence,
        employee_id,
    )?))
}

/// Handler for GET `/admin/locations`.
async fn handle_admin_list_locations(
    AxumState(app_state): AxumState<AppState>,
    _session: AdminSession,
) -> Result<Json<Vec<LocationInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(stepcount_api::list_locations(&mut persistence)?))
}

/// Handler for POST `/admin/locations`.
async fn handle_create_location(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
    payload: Result<Json<NameRequest>, JsonRejection>,
) -> Result<Json<CreatedResponse>, HttpError> {
    let request: NameRequest = json_body(payload)?;
    info!(admin_user_id = session.admin.id, "Handling create_location request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(stepcount_api::create_location(
        &mut persistence,
        &request,
    )?))
}

/// Handler for PUT `/admin/locations/{id}`.
async fn handle_update_location(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<NameRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, HttpError> {
    let location_id: i64 = path_id(id)?;
    let request: NameRequest = json_body(payload)?;
    info!(
        admin_user_id = session.admin.id,
        location_id, "Handling update_location request"
    );

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(stepcount_api::update_location(
        &mut persistence,
        location_id,
        &request,
    )?))
}

/// Handler for DELETE `/admin/locations/{id}`.
///
/// Step entries at the location are kept with no location.
async fn handle_delete_location(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<SuccessResponse>, HttpError> {
    let location_id: i64 = path_id(id)?;
    info!(
        admin_user_id = session.admin.id,
        location_id, "Handling delete_location request"
    );

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(stepcount_api::delete_location(
        &mut persistence,
        location_id,
    )?))
}

// ============================================================================
// Admin: step entries
// ============================================================================

/// Handler for GET `/admin/steps`.
async fn handle_list_step_entries(
    AxumState(app_state): AxumState<AppState>,
    _session: AdminSession,
) -> Result<Json<Vec<StepEntryInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(stepcount_api::list_step_entries(&mut persistence)?))
}

/// Handler for PUT `/admin/steps/{id}`.
async fn handle_update_step_entry(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateStepEntryRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, HttpError> {
    let entry_id: i64 = path_id(id)?;
    let request: UpdateStepEntryRequest = json_body(payload)?;
    info!(
        admin_user_id = session.admin.id,
        entry_id, "Handling update_step_entry request"
    );

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(stepcount_api::update_step_entry(
        &mut persistence,
        entry_id,
        &request,
        today(),
    )?))
}

/// Handler for DELETE `/admin/steps/{id}`.
async fn handle_delete_step_entry(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<SuccessResponse>, HttpError> {
    let entry_id: i64 = path_id(id)?;
    info!(
        admin_user_id = session.admin.id,
        entry_id, "Handling delete_step_entry request"
    );

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(stepcount_api::delete_step_entry(
        &mut persistence,
        entry_id,
    )?))
}

// ============================================================================
// Admin: admin users
// ============================================================================

/// Handler for GET `/admin/users`.
async fn handle_list_admin_users(
    AxumState(app_state): AxumState<AppState>,
    _session: AdminSession,
) -> Result<Json<Vec<AdminUserInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(stepcount_api::list_admin_users(&mut persistence)?))
}

/// Handler for POST `/admin/users`.
async fn handle_create_admin_user(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
    payload: Result<Json<AdminUserRequest>, JsonRejection>,
) -> Result<Json<CreatedResponse>, HttpError> {
    let request: AdminUserRequest = json_body(payload)?;
    info!(admin_user_id = session.admin.id, "Handling create_admin_user request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(stepcount_api::create_admin_user(
        &mut persistence,
        &request,
    )?))
}

/// Handler for PUT `/admin/users/{id}`.
async fn handle_update_admin_user(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<AdminUserRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, HttpError> {
    let target_id: i64 = path_id(id)?;
    let request: AdminUserRequest = json_body(payload)?;
    info!(
        admin_user_id = session.admin.id,
        target_id, "Handling update_admin_user request"
    );

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(stepcount_api::update_admin_user(
        &mut persistence,
        target_id,
        &request,
    )?))
}

/// Handler for DELETE `/admin/users/{id}`.
///
/// The last remaining admin cannot be deleted.
async fn handle_delete_admin_user(
    AxumState(app_state): AxumState<AppState>,
    session: AdminSession,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<SuccessResponse>, HttpError> {
    let target_id: i64 = path_id(id)?;
    info!(
        admin_user_id = session.admin.id,
        target_id, "Handling delete_admin_user request"
    );

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(stepcount_api::delete_admin_user(
        &mut persistence,
        target_id,
    )?))
}

// ============================================================================
// Fallback
// ============================================================================

/// Serves the single-page application for unmatched GETs outside the
/// JSON endpoints; everything else is a JSON 404.
async fn handle_fallback(AxumState(app_state): AxumState<AppState>, request: Request) -> Response {
    let path: &str = request.uri().path();

    if request.method() != Method::GET || spa::is_backend_path(path) || spa::is_traversal(path) {
        return HttpError::not_found().into_response();
    }

    spa::serve(&app_state.public_dir, request).await
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/employees", get(handle_list_employees))
        .route("/api/locations", get(handle_list_locations))
        .route("/api/steps", post(handle_record_steps))
        .route("/api/averages", get(handle_list_averages))
        .route("/admin/login", post(handle_login))
        .route("/admin/logout", post(handle_logout))
        .route("/admin/check", get(handle_check_session))
        .route(
            "/admin/employees",
            get(handle_admin_list_employees).post(handle_create_employee),
        )
        .route(
            "/admin/employees/{id}",
            put(handle_update_employee).delete(handle_delete_employee),
        )
        .route(
            "/admin/locations",
            get(handle_admin_list_locations).post(handle_create_location),
        )
        .route(
            "/admin/locations/{id}",
            put(handle_update_location).delete(handle_delete_location),
        )
        .route("/admin/steps", get(handle_list_step_entries))
        .route(
            "/admin/steps/{id}",
            put(handle_update_step_entry).delete(handle_delete_step_entry),
        )
        .route(
            "/admin/users",
            get(handle_list_admin_users).post(handle_create_admin_user),
        )
        .route(
            "/admin/users/{id}",
            put(handle_update_admin_user).delete(handle_delete_admin_user),
        )
        .fallback(handle_fallback)
        .method_not_allowed_fallback(handle_fallback)
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Step Count server");

    // Schema and seed must be in place before the listener is bound
    let config: DatabaseConfig =
        DatabaseConfig::from_parts(args.database_url.as_deref(), &args.database_path);
    if let DatabaseConfig::Sqlite { path } = &config {
        info!("Using SQLite database at: {}", path.display());
    }

    let mut persistence: Persistence = Persistence::open(&config)?;
    info!(backend = persistence.backend_name(), "Database initialized");

    if persistence.ensure_default_admin(&args.admin_email, &args.admin_password)? {
        info!(email = %args.admin_email, "Created default admin user");
    }

    let purged: usize =
        AuthenticationService::purge_expired_sessions(&mut persistence, OffsetDateTime::now_utc())?;
    if purged > 0 {
        info!(purged, "Removed expired sessions");
    }

    let app_state: AppState = AppState::new(persistence, args.public_dir);

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: SocketAddr = SocketAddr::new(args.bind_address, args.port);
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
