pub mod api;
pub mod middleware;

use axum::{Router, ServiceExt};
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use chrono::{NaiveDate, Utc};
use igamx_i18n::{Catalog, DirectorySource, Locale};
use std::sync::Arc;
use tower::{Layer, ServiceBuilder};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::advisor::{AdvisorClient, advisor_from_config, advisor_form_handler};
use crate::config::Config;
use crate::contact::contact_form_handler;
use crate::locale::change_locale_handler;
use crate::pages::{home_handler, privacy_policy_handler, terms_of_service_handler};
use middleware::{LocaleRoutingLayer, LocaleRoutingService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<Catalog>,
    pub advisor: Arc<dyn AdvisorClient + Send + Sync>,
    /// Date shown as "last updated" on the legal pages.
    pub legal_updated: NaiveDate,
}

impl AppState {
    pub fn new(
        config: Config,
        catalog: Catalog,
        advisor: Arc<dyn AdvisorClient + Send + Sync>,
    ) -> Self {
        let legal_updated = config
            .legal_last_updated
            .unwrap_or_else(|| Utc::now().date_naive());
        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            advisor,
            legal_updated,
        }
    }

    /// Builds the bundle catalog and the advisor client from the config.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let catalog = match &config.locales_dir {
            Some(dir) => {
                tracing::info!(%dir, "Loading translation bundles from directory");
                Catalog::new(DirectorySource::new(dir))
            }
            None => Catalog::embedded(),
        };
        let advisor = Arc::from(advisor_from_config(&config)?);
        Ok(Self::new(config, catalog, advisor))
    }
}

/// Custom error type for web handler operations.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// Represents an error during template rendering.
    /// The specific `askama::Error` is captured as the source of this error.
    #[error("Template rendering failed")]
    Template(#[from] askama::Error),
}

impl axum::response::IntoResponse for WebError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!("Request failed: {:?}", self);
        let user_facing_error_message =
            "An unexpected error occurred while processing your request. Please try again later.";
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(format!(
                "<h1>Internal Server Error</h1><p>{}</p>",
                user_facing_error_message
            )),
        )
            .into_response()
    }
}

/// Creates the router with every page, form, API and asset route.
///
/// Page routes expect a locale prefix; use [`create_app`] to serve
/// unprefixed paths too.
pub fn create_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);
    Router::new()
        .route("/health", get(health_check_handler))
        .route("/{locale}", get(home_handler))
        .route("/{locale}/privacy-policy", get(privacy_policy_handler))
        .route("/{locale}/terms-of-service", get(terms_of_service_handler))
        .route("/{locale}/locale", post(change_locale_handler))
        .route("/{locale}/advisor", post(advisor_form_handler))
        .route("/{locale}/contact", post(contact_form_handler))
        .nest("/api/v1", api::create_api_router())
        .nest_service("/static", static_files)
        .fallback(not_found_handler)
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

/// Wraps the router in locale routing, which has to run before route matching.
pub fn create_app(state: AppState) -> LocaleRoutingService<Router> {
    let locale_routing = LocaleRoutingLayer::new(
        state.config.routing_strategy,
        state.config.locale_cookie.clone(),
    );
    locale_routing.layer(create_router(state))
}

/// Logs every key that is missing from some locale's bundle.
pub fn report_bundle_divergence(catalog: &Catalog) {
    match catalog.missing_keys() {
        Ok(missing) => {
            for entry in &missing {
                tracing::warn!(
                    locale = %entry.locale,
                    key = %entry.key,
                    defined_in = %entry.defined_in,
                    "translation key missing from bundle"
                );
            }
            if missing.is_empty() {
                tracing::info!("Translation bundles are consistent");
            }
        }
        Err(e) => tracing::error!("Could not compare translation bundles: {}", e),
    }
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let state = AppState::from_config(config)?;
    report_bundle_divergence(&state.catalog);
    for locale in Locale::ALL {
        state.catalog.bundle(locale);
    }
    tracing::info!(
        strategy = ?state.config.routing_strategy,
        "Locale routing enabled"
    );

    let app = create_app(state);
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;
    Ok(())
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}

#[tracing::instrument]
pub async fn not_found_handler() -> (StatusCode, Html<&'static str>) {
    (
        StatusCode::NOT_FOUND,
        Html("<h1>Not Found</h1><p>The page you are looking for does not exist.</p>"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn can_handle_template_error_with_internal_server_error() {
        let custom_error_message = "Simulated template rendering failure".to_string();
        let template_error = askama::Error::Custom(custom_error_message.into());

        let web_error = WebError::Template(template_error);
        let response = axum::response::IntoResponse::into_response(web_error);

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_text = std::str::from_utf8(&body).unwrap();

        assert_eq!(
            body_text,
            "<h1>Internal Server Error</h1><p>An unexpected error occurred while processing your request. Please try again later.</p>"
        );
    }

    #[test]
    fn can_load_bundles_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("en.json"),
            r#"{"navbar":{"services":"Offerings"}}"#,
        )
        .unwrap();
        let config = Config {
            locales_dir: Some(dir.path().display().to_string()),
            ..Config::default()
        };

        let state = AppState::from_config(config).unwrap();

        let navbar = igamx_i18n::Namespace::Navbar;
        assert_eq!(state.catalog.scoped(Locale::En, navbar).t("services"), "Offerings");
        // zh.json is absent, so the default bundle is served.
        assert_eq!(state.catalog.scoped(Locale::Zh, navbar).t("services"), "Offerings");
    }

    #[test]
    fn can_use_configured_legal_date() {
        let config = Config {
            legal_last_updated: NaiveDate::from_ymd_opt(2025, 6, 1),
            ..Config::default()
        };

        let state = AppState::new(
            config,
            Catalog::embedded(),
            Arc::new(crate::advisor::DisabledAdvisor),
        );

        assert_eq!(
            state.legal_updated,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
    }
}
