use crate::Accounts;
use crate::error::AccountsError;
use crate::model::RegisterRequest;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cpark_domain::constants::AUTH_TAG;
use cpark_kernel::server::ApiState;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Successful registration response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct RegisterResponse {
    success: bool,
    message: String,
    /// Present only when the operating mode echoes verification links.
    #[serde(skip_serializing_if = "Option::is_none")]
    verification_link: Option<String>,
    data: RegisterData,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct RegisterData {
    user_id: String,
    email: String,
    name: String,
    role: String,
}

/// Failure body shared by all error statuses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorBody {
    pub success: bool,
    pub message: String,
}

pub fn auth_router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(register_handler))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = CREATED, description = "Account created; verification email queued", body = RegisterResponse),
        (status = BAD_REQUEST, description = "Missing or malformed registration fields", body = ErrorBody),
        (status = FORBIDDEN, description = "Invalid admin secret code", body = ErrorBody),
        (status = CONFLICT, description = "Email already registered", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Registration could not be completed", body = ErrorBody),
    ),
    tag = AUTH_TAG,
)]
pub(crate) async fn register_handler(
    State(state): State<ApiState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response, AccountsError> {
    let slice = state.try_get_slice::<Accounts>().map_err(|e| {
        tracing::error!(error = %e, "Accounts slice missing from API state");
        AccountsError::Infrastructure { message: e.to_string().into() }
    })?;

    let account = slice.service.register(request).await?;

    let verification_link = state
        .config
        .registration
        .expose_verification_link
        .then(|| account.verification_link.clone());

    let body = RegisterResponse {
        success: true,
        message: "Registration successful! Please check your email to verify your account."
            .to_owned(),
        verification_link,
        data: RegisterData {
            user_id: account.id,
            email: account.email,
            name: account.name,
            role: account.role.to_string(),
        },
    };

    Ok((StatusCode::CREATED, Json(body)).into_response())
}

impl IntoResponse for AccountsError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation { message } => (StatusCode::BAD_REQUEST, message.to_string()),
            Self::Authorization { message } => (StatusCode::FORBIDDEN, message.to_string()),
            Self::Conflict { message } => (StatusCode::CONFLICT, message.to_string()),
            // Internal detail stays in the logs.
            Self::Infrastructure { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Registration failed. Please try again.".to_owned(),
            ),
        };

        (status, Json(ErrorBody { success: false, message })).into_response()
    }
}
