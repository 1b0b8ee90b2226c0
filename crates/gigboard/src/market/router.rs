use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{round_to_cents, IntentId, JobId, NewUser, NotificationId, UserId};
use super::identity::IdentityError;
use super::jobs::JobError;
use super::mailbox::MailboxError;
use super::payment::PaymentError;
use super::pricing::PricingError;
use super::service::Marketplace;
use super::store::{FreelancerStore, JobStore, NotificationStore, StoreError, UserStore};
use super::DirectoryError;

/// Router builder exposing the marketplace boundary operations over HTTP.
pub fn market_router<U, J, N, F>(service: Arc<Marketplace<U, J, N, F>>) -> Router
where
    U: UserStore + 'static,
    J: JobStore + 'static,
    N: NotificationStore + 'static,
    F: FreelancerStore + 'static,
{
    Router::new()
        .route("/api/v1/pricing/quote", post(quote_handler::<U, J, N, F>))
        .route("/api/v1/jobs", post(post_job_handler::<U, J, N, F>))
        .route("/api/v1/jobs/open", get(open_jobs_handler::<U, J, N, F>))
        .route(
            "/api/v1/jobs/:job_id/accept",
            post(accept_job_handler::<U, J, N, F>),
        )
        .route("/api/v1/users", post(register_handler::<U, J, N, F>))
        .route(
            "/api/v1/users/:user_id/inbox",
            get(inbox_handler::<U, J, N, F>),
        )
        .route("/api/v1/sessions", post(login_handler::<U, J, N, F>))
        .route("/api/v1/payments", post(request_payment_handler::<U, J, N, F>))
        .route(
            "/api/v1/payments/:intent_id/confirm",
            post(confirm_payment_handler::<U, J, N, F>),
        )
        .route("/api/v1/freelancers", get(search_handler::<U, J, N, F>))
        .with_state(service)
}

fn error_response(status: StatusCode, err: impl std::fmt::Display) -> Response {
    (status, axum::Json(json!({ "error": err.to_string() }))).into_response()
}

fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn pricing_response(err: PricingError) -> Response {
    error_response(StatusCode::UNPROCESSABLE_ENTITY, err)
}

fn job_response(err: JobError) -> Response {
    let status = match &err {
        JobError::NotFound(_) | JobError::UnknownUser(_) => StatusCode::NOT_FOUND,
        JobError::NotOpen(_) => StatusCode::CONFLICT,
        JobError::NotAClient(_)
        | JobError::NotAFreelancer(_)
        | JobError::EmptyDescription
        | JobError::Pricing(_) => StatusCode::UNPROCESSABLE_ENTITY,
        JobError::Store(err) => store_status(err),
        JobError::Event(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, err)
}

fn payment_response(err: PaymentError) -> Response {
    let status = match &err {
        PaymentError::UnknownNotification(_)
        | PaymentError::UnknownIntent(_)
        | PaymentError::JobNotFound(_) => StatusCode::NOT_FOUND,
        PaymentError::NotPayable(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PaymentError::JobNotAccepted(_) => StatusCode::CONFLICT,
        PaymentError::Store(err) => store_status(err),
        PaymentError::Mailbox(MailboxError::Store(err)) => store_status(err),
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, err)
}

fn identity_response(err: IdentityError) -> Response {
    let status = match &err {
        IdentityError::DuplicateUsername => StatusCode::CONFLICT,
        IdentityError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        IdentityError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
        IdentityError::Store(err) => store_status(err),
        IdentityError::Directory(DirectoryError::Store(err)) => store_status(err),
    };
    error_response(status, err)
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuoteRequest {
    pub(crate) service_type: String,
    pub(crate) complexity: String,
    pub(crate) hours: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostJobRequest {
    pub(crate) client_id: String,
    pub(crate) service_type: String,
    pub(crate) complexity: String,
    pub(crate) hours: f64,
    pub(crate) description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AcceptJobRequest {
    pub(crate) freelancer_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PaymentRequest {
    pub(crate) notification_id: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) username: String,
    pub(crate) secret: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchQuery {
    #[serde(default)]
    pub(crate) q: String,
}

async fn quote_handler<U, J, N, F>(
    State(service): State<Arc<Marketplace<U, J, N, F>>>,
    axum::Json(request): axum::Json<QuoteRequest>,
) -> Response
where
    U: UserStore + 'static,
    J: JobStore + 'static,
    N: NotificationStore + 'static,
    F: FreelancerStore + 'static,
{
    match service.quote_price(&request.service_type, &request.complexity, request.hours) {
        Ok(price) => {
            let payload = json!({ "price": round_to_cents(price) });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => pricing_response(err),
    }
}

async fn post_job_handler<U, J, N, F>(
    State(service): State<Arc<Marketplace<U, J, N, F>>>,
    axum::Json(request): axum::Json<PostJobRequest>,
) -> Response
where
    U: UserStore + 'static,
    J: JobStore + 'static,
    N: NotificationStore + 'static,
    F: FreelancerStore + 'static,
{
    let client = UserId(request.client_id);
    match service.post_job(
        &client,
        &request.service_type,
        &request.complexity,
        request.hours,
        &request.description,
    ) {
        Ok(job) => (StatusCode::CREATED, axum::Json(job.view())).into_response(),
        Err(err) => job_response(err),
    }
}

async fn open_jobs_handler<U, J, N, F>(
    State(service): State<Arc<Marketplace<U, J, N, F>>>,
) -> Response
where
    U: UserStore + 'static,
    J: JobStore + 'static,
    N: NotificationStore + 'static,
    F: FreelancerStore + 'static,
{
    match service.list_open_jobs() {
        Ok(jobs) => {
            let views: Vec<_> = jobs.iter().map(|job| job.view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(err) => job_response(err),
    }
}

async fn accept_job_handler<U, J, N, F>(
    State(service): State<Arc<Marketplace<U, J, N, F>>>,
    Path(job_id): Path<u64>,
    axum::Json(request): axum::Json<AcceptJobRequest>,
) -> Response
where
    U: UserStore + 'static,
    J: JobStore + 'static,
    N: NotificationStore + 'static,
    F: FreelancerStore + 'static,
{
    let freelancer = UserId(request.freelancer_id);
    match service.accept_job(JobId(job_id), &freelancer) {
        Ok(job) => (StatusCode::OK, axum::Json(job.view())).into_response(),
        Err(err) => job_response(err),
    }
}

async fn register_handler<U, J, N, F>(
    State(service): State<Arc<Marketplace<U, J, N, F>>>,
    axum::Json(signup): axum::Json<NewUser>,
) -> Response
where
    U: UserStore + 'static,
    J: JobStore + 'static,
    N: NotificationStore + 'static,
    F: FreelancerStore + 'static,
{
    match service.register_user(signup) {
        Ok(user_id) => {
            let payload = json!({ "user_id": user_id });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(err) => identity_response(err),
    }
}

async fn inbox_handler<U, J, N, F>(
    State(service): State<Arc<Marketplace<U, J, N, F>>>,
    Path(user_id): Path<String>,
) -> Response
where
    U: UserStore + 'static,
    J: JobStore + 'static,
    N: NotificationStore + 'static,
    F: FreelancerStore + 'static,
{
    match service.inbox(&UserId(user_id)) {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(MailboxError::Store(err)) => error_response(store_status(&err), err),
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, err),
    }
}

async fn login_handler<U, J, N, F>(
    State(service): State<Arc<Marketplace<U, J, N, F>>>,
    axum::Json(request): axum::Json<LoginRequest>,
) -> Response
where
    U: UserStore + 'static,
    J: JobStore + 'static,
    N: NotificationStore + 'static,
    F: FreelancerStore + 'static,
{
    match service.authenticate(&request.username, &request.secret) {
        Ok(user_id) => {
            let payload = json!({ "user_id": user_id });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => identity_response(err),
    }
}

async fn request_payment_handler<U, J, N, F>(
    State(service): State<Arc<Marketplace<U, J, N, F>>>,
    axum::Json(request): axum::Json<PaymentRequest>,
) -> Response
where
    U: UserStore + 'static,
    J: JobStore + 'static,
    N: NotificationStore + 'static,
    F: FreelancerStore + 'static,
{
    match service.request_payment(NotificationId(request.notification_id)) {
        Ok(intent) => (StatusCode::CREATED, axum::Json(intent)).into_response(),
        Err(err) => payment_response(err),
    }
}

async fn confirm_payment_handler<U, J, N, F>(
    State(service): State<Arc<Marketplace<U, J, N, F>>>,
    Path(intent_id): Path<u64>,
) -> Response
where
    U: UserStore + 'static,
    J: JobStore + 'static,
    N: NotificationStore + 'static,
    F: FreelancerStore + 'static,
{
    match service.confirm_payment(IntentId(intent_id)) {
        Ok(receipt) => (StatusCode::OK, axum::Json(receipt)).into_response(),
        Err(err) => payment_response(err),
    }
}

async fn search_handler<U, J, N, F>(
    State(service): State<Arc<Marketplace<U, J, N, F>>>,
    Query(query): Query<SearchQuery>,
) -> Response
where
    U: UserStore + 'static,
    J: JobStore + 'static,
    N: NotificationStore + 'static,
    F: FreelancerStore + 'static,
{
    match service.search_freelancers(&query.q) {
        Ok(profiles) => (StatusCode::OK, axum::Json(profiles)).into_response(),
        Err(DirectoryError::Store(err)) => error_response(store_status(&err), err),
    }
}
