//! HTTP request handlers for the console's JSON API.

use std::path::Path as FsPath;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderValue};
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use serde::{Deserialize, Serialize};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeader;

use super::error::ApiError;
use super::gate;
use super::AppState;
use crate::leads::followups::FollowupsByDate;
use crate::leads::linking::LinkOutcome;
use crate::leads::notes::NoteForm;
use crate::leads::{self, dashboard, detail, followups, linking, notes, reports, IdValue};
use crate::types::{
    DateRange, LeadDetail, LeadFilter, LeadKind, LeadSummary, ListKind, PageRequest,
    ProjectCount, ProjectLeadFilter,
};

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Build the axum router with all routes
pub fn router(state: Arc<AppState>) -> axum::Router {
    use axum::middleware::from_fn_with_state;
    use axum::routing::{get, post};
    use tower_http::cors::CorsLayer;
    use tower_http::trace::TraceLayer;

    axum::Router::new()
        .route("/health", get(health))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/leads", get(list_leads))
        .route("/api/leads/{id}", get(lead_detail))
        .route("/api/notes", post(add_note))
        .route("/api/enquiries/update-customer", post(update_customer))
        .route("/api/followups/today", get(followups_today))
        .route("/api/followups/upcoming", get(followups_upcoming))
        .route("/api/dashboard/stats", get(dashboard_stats))
        .route("/api/projects", get(list_projects))
        .route("/api/projects/{id}/leads", get(project_leads))
        .route("/api/reports", get(report))
        .fallback_service(static_assets(&state.config.server.static_dir))
        .layer(from_fn_with_state(state.clone(), gate::require_session))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Prebuilt console assets; unknown paths get `index.html` so client routes resolve
fn static_assets(dir: &str) -> SetResponseHeader<ServeDir<ServeFile>, HeaderValue> {
    let index = FsPath::new(dir).join("index.html");
    SetResponseHeader::overriding(
        ServeDir::new(dir).fallback(ServeFile::new(index)),
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store"),
    )
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(value)| value).map_err(ApiError::from)
}

fn parse_id(raw: &str, what: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {what} id: {raw}")))
}

/// Lenient integer query value; anything unparseable falls back to the default
fn lenient_int(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|v| v.trim().parse().ok())
}

fn page_request(state: &AppState, page: Option<&str>, limit: Option<&str>) -> PageRequest {
    PageRequest::new(
        lenient_int(page),
        lenient_int(limit),
        state.config.listing.default_limit,
        state.config.listing.max_limit,
    )
}

fn date_range(from: Option<&str>, to: Option<&str>) -> Result<DateRange, ApiError> {
    Ok(DateRange {
        from: leads::parse_date("fromDate", from)?,
        to: leads::parse_date("toDate", to)?,
    })
}

// -- /health --

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// -- /api/auth --

#[derive(Deserialize)]
struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

#[derive(Serialize)]
struct LoginUser {
    id: i64,
    name: String,
    email: String,
    role: String,
}

#[derive(Serialize)]
struct LoginResponse {
    success: bool,
    user: LoginUser,
}

#[derive(Serialize)]
struct SuccessResponse {
    success: bool,
}

async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = body(payload)?;
    let email = leads::present(request.email);
    let password = leads::present(request.password);
    let (Some(email), Some(password)) = (email, password) else {
        return Err(ApiError::BadRequest("Email and password are required".into()));
    };

    let invalid = || ApiError::Unauthorized("Invalid credentials".into());
    let Some(admin) = state.store.find_admin(&email).await? else {
        tracing::info!("Login refused for {}: no active admin", email);
        return Err(invalid());
    };
    if !crate::auth::verify_password(password, admin.password_hash.clone()).await? {
        tracing::info!("Login refused for {}: wrong password", email);
        return Err(invalid());
    }

    let token = state.sessions.issue(&admin)?;
    tracing::info!("Admin {} signed in", admin.email);
    let cookie = state.sessions.session_cookie(&token);
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(LoginResponse {
            success: true,
            user: LoginUser {
                id: admin.admin_id,
                name: admin.display_name(),
                email: admin.email,
                role: admin.role,
            },
        }),
    ))
}

async fn logout(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        AppendHeaders([(header::SET_COOKIE, state.sessions.cleared_cookie())]),
        Json(SuccessResponse { success: true }),
    )
}

// -- /api/leads --

#[derive(Deserialize)]
struct LeadsParams {
    page: Option<String>,
    limit: Option<String>,
    status: Option<String>,
    search: Option<String>,
    #[serde(rename = "projectId")]
    project_id: Option<String>,
    #[serde(rename = "fromDate")]
    from_date: Option<String>,
    #[serde(rename = "toDate")]
    to_date: Option<String>,
    r#type: Option<String>,
}

#[derive(Serialize)]
struct Pagination {
    total: u64,
    page: u64,
    limit: u64,
    #[serde(rename = "totalPages")]
    total_pages: u64,
}

#[derive(Serialize)]
struct LeadsResponse {
    leads: Vec<LeadSummary>,
    pagination: Pagination,
}

async fn list_leads(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeadsParams>,
) -> ApiResult<LeadsResponse> {
    let kind = match leads::present(params.r#type) {
        None => ListKind::Enquiry,
        Some(raw) => raw
            .parse()
            .map_err(|e: anyhow::Error| ApiError::BadRequest(e.to_string()))?,
    };
    let project_id = match leads::present(params.project_id) {
        None => None,
        Some(raw) => Some(parse_id(&raw, "project")?),
    };
    let filter = LeadFilter {
        kind,
        status: leads::present(params.status),
        search: leads::present(params.search),
        project_id,
        range: date_range(params.from_date.as_deref(), params.to_date.as_deref())?,
    };
    let page = page_request(&state, params.page.as_deref(), params.limit.as_deref());

    let found = state.store.list_leads(&filter, page).await?;
    Ok(Json(LeadsResponse {
        pagination: Pagination {
            total: found.total,
            page: page.page,
            limit: page.limit,
            total_pages: page.total_pages(found.total),
        },
        leads: found.rows,
    }))
}

// -- /api/leads/{id} --

#[derive(Deserialize)]
struct DetailParams {
    r#type: Option<String>,
}

async fn lead_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<DetailParams>,
) -> ApiResult<LeadDetail> {
    let kind = match leads::present(params.r#type) {
        None => LeadKind::Enquiry,
        Some(raw) => raw
            .parse()
            .map_err(|e: anyhow::Error| ApiError::BadRequest(e.to_string()))?,
    };
    let id = parse_id(&id, "lead")?;

    match detail::lead_detail(state.store.as_ref(), id, kind).await? {
        Some(detail) => Ok(Json(detail)),
        None => Err(ApiError::NotFound(match kind {
            LeadKind::Enquiry => "Lead not found".into(),
            LeadKind::Customer => "Customer not found".into(),
        })),
    }
}

// -- /api/notes --

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

async fn add_note(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NoteForm>, JsonRejection>,
) -> ApiResult<MessageResponse> {
    let note = body(payload)?.validate()?;
    notes::record(state.store.as_ref(), &note)
        .await
        .map_err(|e| ApiError::WriteFailed(format!("{e:#}")))?;
    Ok(Json(MessageResponse {
        message: "Note added successfully",
    }))
}

// -- /api/enquiries/update-customer --

#[derive(Deserialize)]
struct UpdateCustomerRequest {
    enq_id: Option<IdValue>,
    cust_name: Option<String>,
}

#[derive(Serialize)]
struct UpdateCustomerResponse {
    success: bool,
    #[serde(flatten)]
    outcome: LinkOutcome,
}

async fn update_customer(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UpdateCustomerRequest>, JsonRejection>,
) -> ApiResult<UpdateCustomerResponse> {
    let request = body(payload)?;
    let enq_id = leads::optional_id(request.enq_id.as_ref(), "enq_id")?;
    let (Some(enq_id), Some(cust_name)) = (enq_id, leads::present(request.cust_name)) else {
        return Err(ApiError::BadRequest("Missing required fields".into()));
    };

    match linking::rename_enquiry(state.store.as_ref(), enq_id, &cust_name).await? {
        Some(outcome) => Ok(Json(UpdateCustomerResponse {
            success: true,
            outcome,
        })),
        None => Err(ApiError::NotFound("Enquiry not found".into())),
    }
}

// -- /api/followups --

async fn followups_today(State(state): State<Arc<AppState>>) -> ApiResult<Vec<LeadSummary>> {
    let today = state.clock.today();
    let leads = followups::due_today(state.store.as_ref(), &state.config.followups, today).await?;
    Ok(Json(leads))
}

async fn followups_upcoming(State(state): State<Arc<AppState>>) -> ApiResult<FollowupsByDate> {
    let today = state.clock.today();
    let grouped = followups::upcoming(state.store.as_ref(), &state.config.followups, today).await?;
    Ok(Json(grouped))
}

// -- /api/dashboard/stats --

async fn dashboard_stats(
    State(state): State<Arc<AppState>>,
) -> ApiResult<dashboard::DashboardStats> {
    let stats = dashboard::stats(state.store.as_ref(), &state.config, state.clock.today()).await?;
    Ok(Json(stats))
}

// -- /api/projects --

#[derive(Serialize)]
struct ProjectsResponse {
    projects: Vec<ProjectCount>,
}

async fn list_projects(State(state): State<Arc<AppState>>) -> ApiResult<ProjectsResponse> {
    let projects = state.store.project_counts().await?;
    Ok(Json(ProjectsResponse { projects }))
}

#[derive(Deserialize)]
struct ProjectLeadsParams {
    page: Option<String>,
    limit: Option<String>,
    search: Option<String>,
    status: Option<String>,
    #[serde(rename = "leadType")]
    lead_type: Option<String>,
}

#[derive(Serialize)]
struct ProjectPagination {
    page: u64,
    #[serde(rename = "totalPages")]
    total_pages: u64,
    total: u64,
}

#[derive(Serialize)]
struct ProjectLeadsResponse {
    project: ProjectCount,
    leads: Vec<LeadSummary>,
    pagination: ProjectPagination,
}

async fn project_leads(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<ProjectLeadsParams>,
) -> ApiResult<ProjectLeadsResponse> {
    let project_id = parse_id(&id, "project")?;
    let kind = match leads::present(params.lead_type) {
        None => LeadKind::Enquiry,
        Some(raw) => raw
            .parse()
            .map_err(|e: anyhow::Error| ApiError::BadRequest(e.to_string()))?,
    };

    let Some(project) = state.store.project(project_id).await? else {
        return Err(ApiError::NotFound("Project not found".into()));
    };

    let filter = ProjectLeadFilter {
        project_id,
        kind,
        status: leads::present(params.status),
        search: leads::present(params.search),
    };
    let page = page_request(&state, params.page.as_deref(), params.limit.as_deref());
    let found = state.store.project_leads(&filter, page).await?;

    Ok(Json(ProjectLeadsResponse {
        project,
        pagination: ProjectPagination {
            page: page.page,
            total_pages: page.total_pages(found.total),
            total: found.total,
        },
        leads: found.rows,
    }))
}

// -- /api/reports --

#[derive(Deserialize)]
struct ReportParams {
    #[serde(rename = "fromDate")]
    from_date: Option<String>,
    #[serde(rename = "toDate")]
    to_date: Option<String>,
}

async fn report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportParams>,
) -> ApiResult<reports::Report> {
    let range = date_range(params.from_date.as_deref(), params.to_date.as_deref())?;
    let report = reports::build(state.store.as_ref(), &state.config.reports, range).await?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_int() {
        assert_eq!(lenient_int(Some("3")), Some(3));
        assert_eq!(lenient_int(Some(" 7 ")), Some(7));
        assert_eq!(lenient_int(Some("abc")), None);
        assert_eq!(lenient_int(None), None);
    }

    #[test]
    fn test_date_range_rejects_bad_dates() {
        assert!(date_range(Some("2024-01-01"), Some("2024-01-31")).is_ok());
        assert!(matches!(
            date_range(Some("01-01-2024"), None),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42", "lead").unwrap(), 42);
        assert!(matches!(parse_id("4a", "lead"), Err(ApiError::BadRequest(_))));
    }
}
