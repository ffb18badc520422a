use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use igamx_i18n::{I18nError, Locale, Namespace};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::advisor::{AdvisorInput, AdvisorOutput, request_advice};
use crate::web::AppState;

/// Error body returned by every API endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub error: String,
    /// Human-readable description
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: String) -> Self {
        Self {
            error: error.to_string(),
            message,
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

impl From<I18nError> for ErrorResponse {
    fn from(error: I18nError) -> Self {
        let code = match error {
            I18nError::UnsupportedLocale(_) => "unsupported_locale",
            I18nError::UnknownNamespace(_) => "unknown_namespace",
            _ => "bundle_unavailable",
        };
        ErrorResponse::new(code, error.to_string())
    }
}

fn not_found(error: I18nError) -> ApiError {
    (StatusCode::NOT_FOUND, Json(error.into()))
}

/// Supported locales.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LocalesResponse {
    /// Locale codes in display order
    pub locales: Vec<String>,
    /// Locale used when nothing else matches
    pub default: String,
}

/// A locale's translation bundle, as nested namespace objects.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TranslationsResponse {
    pub locale: String,
    /// Namespace name, or absent for the whole bundle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[schema(value_type = Object)]
    pub messages: serde_json::Value,
}

/// Handler for GET /api/v1/locales
#[tracing::instrument]
#[utoipa::path(
    get,
    path = "/api/v1/locales",
    responses(
        (status = 200, description = "Supported locales", body = LocalesResponse)
    ),
    tag = "I18n"
)]
pub async fn locales_handler() -> Json<LocalesResponse> {
    Json(LocalesResponse {
        locales: Locale::ALL.iter().map(|l| l.code().to_string()).collect(),
        default: Locale::DEFAULT.code().to_string(),
    })
}

/// Handler for GET /api/v1/translations/{locale}
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/v1/translations/{locale}",
    params(
        ("locale" = String, Path, description = "Locale code, e.g. `zh`")
    ),
    responses(
        (status = 200, description = "The locale's bundle", body = TranslationsResponse),
        (status = 404, description = "Unsupported locale", body = ErrorResponse)
    ),
    tag = "I18n"
)]
pub async fn translations_handler(
    State(state): State<AppState>,
    Path(locale): Path<String>,
) -> Result<Json<TranslationsResponse>, ApiError> {
    let locale: Locale = locale.parse().map_err(not_found)?;
    let bundle = state.catalog.bundle(locale);
    Ok(Json(TranslationsResponse {
        locale: locale.code().to_string(),
        namespace: None,
        messages: bundle.document().clone(),
    }))
}

/// Handler for GET /api/v1/translations/{locale}/{namespace}
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/v1/translations/{locale}/{namespace}",
    params(
        ("locale" = String, Path, description = "Locale code, e.g. `zh`"),
        ("namespace" = String, Path, description = "Namespace, e.g. `navbar`")
    ),
    responses(
        (status = 200, description = "One namespace of the locale's bundle", body = TranslationsResponse),
        (status = 404, description = "Unsupported locale or unknown namespace", body = ErrorResponse)
    ),
    tag = "I18n"
)]
pub async fn namespace_handler(
    State(state): State<AppState>,
    Path((locale, namespace)): Path<(String, String)>,
) -> Result<Json<TranslationsResponse>, ApiError> {
    let locale: Locale = locale.parse().map_err(not_found)?;
    let namespace: Namespace = namespace.parse().map_err(not_found)?;
    let bundle = state.catalog.bundle(locale);
    let messages = bundle
        .namespace(namespace)
        .cloned()
        .ok_or_else(|| not_found(I18nError::UnknownNamespace(namespace.to_string())))?;
    Ok(Json(TranslationsResponse {
        locale: locale.code().to_string(),
        namespace: Some(namespace.to_string()),
        messages,
    }))
}

/// Handler for POST /api/v1/advisor
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/api/v1/advisor",
    request_body = AdvisorInput,
    responses(
        (status = 200, description = "Integration strategy", body = AdvisorOutput),
        (status = 422, description = "Invalid answers or malformed body", body = ErrorResponse),
        (status = 502, description = "The advisor could not answer", body = ErrorResponse)
    ),
    tag = "Advisor"
)]
pub async fn advisor_handler(
    State(state): State<AppState>,
    payload: Result<Json<AdvisorInput>, JsonRejection>,
) -> Result<Json<AdvisorOutput>, ApiError> {
    let Json(input) = payload.map_err(|rejection| {
        tracing::info!(%rejection, "Rejected advisor request body");
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::new("invalid_input", rejection.body_text())),
        )
    })?;
    match request_advice(state.advisor.as_ref(), input).await {
        Ok(output) => Ok(Json(output)),
        Err(e) if e.is_validation() => Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::new("invalid_input", e.to_string())),
        )),
        Err(_) => Err((
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse::new(
                "advisor_unavailable",
                "Could not generate integration strategy. Please try again later.".to_string(),
            )),
        )),
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        locales_handler,
        translations_handler,
        namespace_handler,
        advisor_handler
    ),
    components(schemas(
        LocalesResponse,
        TranslationsResponse,
        ErrorResponse,
        AdvisorInput,
        AdvisorOutput
    )),
    tags(
        (name = "I18n", description = "Locales and translation bundles"),
        (name = "Advisor", description = "AI integration advisor")
    )
)]
pub struct ApiDoc;

/// Handler for GET /api/v1/openapi.json
#[tracing::instrument]
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Creates the `/api/v1` routes; nest them under that prefix.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/locales", get(locales_handler))
        .route("/translations/{locale}", get(translations_handler))
        .route("/translations/{locale}/{namespace}", get(namespace_handler))
        .route("/advisor", post(advisor_handler))
        .route("/openapi.json", get(openapi_handler))
}
