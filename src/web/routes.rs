//! Route handlers

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::server::{AppState, SharedState};
use crate::auth::models::{LoginRequest, RegisterRequest, VerifyOtpRequest};
use crate::auth::{RequestCookies, SessionStore};
use crate::backend::organisations::{EarningsQuery, Organisation};
use crate::backend::procedures::Procedure;
use crate::backend::roles::RoleRecord;
use crate::backend::salons::Salon;
use crate::backend::staff::StaffProcedure;
use crate::backend::users::{OrganisationUser, User};
use crate::error::{Error, Result};

// Request/Response types

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PageData {
    pub page: String,
}

#[derive(Debug, Serialize)]
pub struct RedirectData {
    pub redirect: String,
}

#[derive(Debug, Serialize)]
pub struct OtpSent {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct AdminUsersPage {
    pub users: Vec<User>,
    pub organisations: Vec<Organisation>,
    pub salons: Vec<Salon>,
    pub roles: Vec<RoleRecord>,
}

/// Manager pages show the first organisation the manager belongs to
#[derive(Debug, Serialize)]
pub struct ManagerSalonsPage {
    pub organisations: Vec<Organisation>,
    pub salons: Vec<Salon>,
}

#[derive(Debug, Serialize)]
pub struct EmployeesPage {
    pub organisations: Vec<Organisation>,
    pub employees: Vec<OrganisationUser>,
    pub salons: Vec<Salon>,
    pub roles: Vec<RoleRecord>,
}

#[derive(Debug, Serialize)]
pub struct StaffProceduresPage {
    pub mine: Vec<StaffProcedure>,
    pub catalogue: Vec<Procedure>,
}

#[derive(Debug, Deserialize)]
pub struct EarningsParams {
    pub month: Option<String>,
    pub year: Option<String>,
    /// Comma separated
    #[serde(rename = "salonIds")]
    pub salon_ids: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AppointmentsParams {
    pub date: Option<String>,
}

type RequestSession = SessionStore<Arc<RequestCookies>>;

fn request_session(state: &AppState, headers: &HeaderMap) -> (Arc<RequestCookies>, RequestSession) {
    let cookies = Arc::new(RequestCookies::from_headers(headers));
    let session = SessionStore::new(Arc::clone(&cookies), state.config.session.secure_cookies());
    (cookies, session)
}

fn error_status(err: &Error) -> StatusCode {
    match err {
        Error::Backend(api) => StatusCode::from_u16(api.status).unwrap_or(StatusCode::BAD_GATEWAY),
        Error::Http(_) | Error::InvalidAuthResponse(_) | Error::Json(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Envelope a result and flush any cookie writes made while producing it
fn respond<T: Serialize>(cookies: Option<&RequestCookies>, result: Result<T>) -> Response {
    let mut response = match result {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::ok(data))).into_response(),
        Err(e) => {
            let status = error_status(&e);
            if status.is_server_error() {
                tracing::error!("Request failed: {}", e);
            }
            (status, Json(ApiResponse::<()>::err(e.to_string()))).into_response()
        }
    };
    if let Some(cookies) = cookies {
        cookies.apply(&mut response);
    }
    response
}

// Health check

pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok("healthy"))
}

// Auth actions

pub async fn register(
    State(state): State<SharedState>,
    Json(req): Json<RegisterRequest>,
) -> Response {
    let result = state.auth.register(&req).await.map(|()| OtpSent {
        email: req.email.clone(),
    });
    respond(None, result)
}

pub async fn login(State(state): State<SharedState>, Json(req): Json<LoginRequest>) -> Response {
    let result = state.auth.login(&req.email).await.map(|()| OtpSent {
        email: req.email.clone(),
    });
    respond(None, result)
}

pub async fn verify_otp(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(req): Json<VerifyOtpRequest>,
) -> Response {
    let (cookies, session) = request_session(&state, &headers);
    let result = state
        .auth
        .verify_otp(&session, &req.email, &req.otp_code)
        .await
        .map(|redirect| RedirectData { redirect });
    respond(Some(&*cookies), result)
}

pub async fn logout(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (cookies, session) = request_session(&state, &headers);
    let redirect = state.auth.logout(&session).await;
    respond(Some(&*cookies), Ok(RedirectData { redirect }))
}

// Pages

pub async fn page(uri: Uri) -> impl IntoResponse {
    Json(ApiResponse::ok(PageData {
        page: uri.path().to_string(),
    }))
}

pub async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::err(format!("No page at {}", uri.path()))),
    )
}

pub async fn admin_organisations(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (cookies, session) = request_session(&state, &headers);
    let result = state.backend.list_organisations(&session).await;
    respond(Some(&*cookies), result)
}

pub async fn admin_users(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (cookies, session) = request_session(&state, &headers);
    let result = load_admin_users(&state, &session).await;
    respond(Some(&*cookies), result)
}

async fn load_admin_users(state: &AppState, session: &RequestSession) -> Result<AdminUsersPage> {
    Ok(AdminUsersPage {
        users: state.backend.list_users(session).await?,
        organisations: state.backend.list_organisations(session).await?,
        salons: state.backend.list_salons(session).await?,
        roles: state.backend.list_roles(session).await?,
    })
}

pub async fn admin_roles(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (cookies, session) = request_session(&state, &headers);
    let result = state.backend.list_roles(&session).await;
    respond(Some(&*cookies), result)
}

pub async fn admin_permissions(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (cookies, session) = request_session(&state, &headers);
    let result = state.backend.list_permissions(&session).await;
    respond(Some(&*cookies), result)
}

pub async fn manager_dashboard(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (cookies, session) = request_session(&state, &headers);
    let result = state.backend.my_organisations(&session).await;
    respond(Some(&*cookies), result)
}

pub async fn manager_salons(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (cookies, session) = request_session(&state, &headers);
    let result = load_manager_salons(&state, &session).await;
    respond(Some(&*cookies), result)
}

async fn load_manager_salons(state: &AppState, session: &RequestSession) -> Result<ManagerSalonsPage> {
    let organisations = state.backend.my_organisations(session).await?;
    let salons = match organisations.first() {
        Some(org) => state.backend.salons_by_organisation(session, &org.id).await?,
        None => Vec::new(),
    };
    Ok(ManagerSalonsPage {
        organisations,
        salons,
    })
}

pub async fn manager_employees(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (cookies, session) = request_session(&state, &headers);
    let result = load_employees(&state, &session).await;
    respond(Some(&*cookies), result)
}

async fn load_employees(state: &AppState, session: &RequestSession) -> Result<EmployeesPage> {
    let organisations = state.backend.my_organisations(session).await?;
    let Some(org_id) = organisations.first().map(|org| org.id.clone()) else {
        return Ok(EmployeesPage {
            organisations,
            employees: Vec::new(),
            salons: Vec::new(),
            roles: Vec::new(),
        });
    };
    Ok(EmployeesPage {
        employees: state.backend.users_by_organisation(session, &org_id).await?,
        salons: state.backend.salons_by_organisation(session, &org_id).await?,
        roles: state.backend.list_roles(session).await?,
        organisations,
    })
}

pub async fn organisation_salons(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let (cookies, session) = request_session(&state, &headers);
    let result = state.backend.salons_by_organisation(&session, &id).await;
    respond(Some(&*cookies), result)
}

pub async fn organisation_earnings(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(params): Query<EarningsParams>,
    headers: HeaderMap,
) -> Response {
    let (cookies, session) = request_session(&state, &headers);
    let query = EarningsQuery {
        month: params.month,
        year: params.year,
        salon_ids: params
            .salon_ids
            .map(|ids| {
                ids.split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    };
    let result = state
        .backend
        .organisation_earnings(&session, &id, &query)
        .await;
    respond(Some(&*cookies), result)
}

pub async fn staff_appointments(
    State(state): State<SharedState>,
    Query(params): Query<AppointmentsParams>,
    headers: HeaderMap,
) -> Response {
    let (cookies, session) = request_session(&state, &headers);
    let result = state
        .backend
        .staff_appointments(&session, params.date.as_deref())
        .await;
    respond(Some(&*cookies), result)
}

pub async fn staff_procedures(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (cookies, session) = request_session(&state, &headers);
    let result = load_staff_procedures(&state, &session).await;
    respond(Some(&*cookies), result)
}

async fn load_staff_procedures(
    state: &AppState,
    session: &RequestSession,
) -> Result<StaffProceduresPage> {
    Ok(StaffProceduresPage {
        mine: state.backend.my_procedures(session).await?,
        catalogue: state.backend.list_procedures(session).await?,
    })
}

pub async fn staff_availability(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (cookies, session) = request_session(&state, &headers);
    let result = state.backend.my_salons(&session).await;
    respond(Some(&*cookies), result)
}
