use askama::Template;
use async_trait::async_trait;
use axum::extract::State;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::Form;
use igamx_i18n::{Namespace, Translator};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;

use crate::config::Config;
use crate::web::AppState;
use crate::web::middleware::RequestLocale;

/// Service options offered by the advisor form, as `(form id, label)`.
pub const SERVICES: [(&str, &str); 6] = [
    ("casino_games", "Casino Games"),
    ("sportsbook", "Sportsbook"),
    ("payment_solutions", "Payment Solutions"),
    ("pam", "Player Account Management (PAM)"),
    ("kyc_aml", "KYC/AML Solutions"),
    ("affiliate_systems", "Affiliate Systems"),
];

/// Platform options offered by the advisor form, as `(form id, label)`.
pub const PLATFORMS: [(&str, &str); 3] = [
    ("existing_platform", "Existing Platform"),
    ("new_platform", "New Platform"),
    ("white_label", "White Label"),
];

/// Questionnaire answers sent to the advisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorInput {
    /// Service labels, at least one
    pub services_needed: Vec<String>,
    /// Platform type label
    pub platform_type: String,
}

impl AdvisorInput {
    /// Checks the answers against the offered options.
    pub fn validate(&self) -> Result<(), AdvisorError> {
        if self.services_needed.is_empty() {
            return Err(AdvisorError::NoServices);
        }
        if let Some(unknown) = self
            .services_needed
            .iter()
            .find(|service| !SERVICES.iter().any(|(_, label)| *label == service.as_str()))
        {
            return Err(AdvisorError::UnknownService(unknown.clone()));
        }
        if !PLATFORMS
            .iter()
            .any(|(_, label)| *label == self.platform_type)
        {
            return Err(AdvisorError::UnknownPlatform(self.platform_type.clone()));
        }
        Ok(())
    }

    /// Renders the fixed prompt for the language model.
    pub fn prompt(&self) -> String {
        format!(
            "You are an expert iGaming API integration advisor.\n\n\
             Based on the client's needs, provide a detailed strategy for optimal API integration.\n\
             Consider the services needed and the platform type to create a tailored approach.\n\n\
             Services Needed: {}\n\
             Platform Type: {}",
            self.services_needed.join(", "),
            self.platform_type
        )
    }
}

/// Advice returned by the advisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorOutput {
    /// Free-text integration strategy
    pub integration_strategy: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("at least one service must be selected")]
    NoServices,
    #[error("unknown service: {0}")]
    UnknownService(String),
    #[error("unknown platform type: {0}")]
    UnknownPlatform(String),
    /// No advisor endpoint is configured.
    #[error("the advisor is not configured")]
    Disabled,
    #[error("advisor request failed")]
    Request(#[from] reqwest::Error),
    #[error("advisor responded with status {0}")]
    Status(u16),
    #[error("advisor returned no strategy")]
    EmptyResponse,
    #[error("Template rendering failed")]
    Template(#[from] askama::Error),
}

impl AdvisorError {
    /// Returns true for errors caused by the submitted answers.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AdvisorError::NoServices
                | AdvisorError::UnknownService(_)
                | AdvisorError::UnknownPlatform(_)
        )
    }

    fn message_key(&self) -> &'static str {
        match self {
            AdvisorError::NoServices | AdvisorError::UnknownService(_) => "validation_services",
            AdvisorError::UnknownPlatform(_) => "validation_platform",
            _ => "error_description",
        }
    }
}

/// A hosted language model that turns answers into advice.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdvisorClient {
    /// Requests advice for already validated answers. One call, no retry.
    async fn advise(&self, input: AdvisorInput) -> Result<AdvisorOutput, AdvisorError>;
}

#[derive(Serialize)]
struct PromptRequest<'a> {
    model: &'a str,
    prompt: String,
    input: &'a AdvisorInput,
}

/// Advisor backed by an HTTP prompt endpoint.
pub struct HttpAdvisorClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl HttpAdvisorClient {
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        model: String,
        timeout: Duration,
    ) -> Result<Self, AdvisorError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl AdvisorClient for HttpAdvisorClient {
    #[tracing::instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn advise(&self, input: AdvisorInput) -> Result<AdvisorOutput, AdvisorError> {
        let body = PromptRequest {
            model: &self.model,
            prompt: input.prompt(),
            input: &input,
        };
        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AdvisorError::Status(status.as_u16()));
        }
        Ok(response.json::<AdvisorOutput>().await?)
    }
}

/// Advisor used when no endpoint is configured; every call fails.
pub struct DisabledAdvisor;

#[async_trait]
impl AdvisorClient for DisabledAdvisor {
    async fn advise(&self, _input: AdvisorInput) -> Result<AdvisorOutput, AdvisorError> {
        Err(AdvisorError::Disabled)
    }
}

/// Builds the advisor for the configured endpoint, or a disabled one.
pub fn advisor_from_config(
    config: &Config,
) -> Result<Box<dyn AdvisorClient + Send + Sync>, AdvisorError> {
    match &config.advisor_endpoint {
        Some(endpoint) => {
            tracing::info!(%endpoint, model = %config.advisor_model, "advisor enabled");
            Ok(Box::new(HttpAdvisorClient::new(
                endpoint.clone(),
                config.advisor_api_key.clone(),
                config.advisor_model.clone(),
                Duration::from_secs(config.advisor_timeout_secs),
            )?))
        }
        None => {
            tracing::warn!("ADVISOR_ENDPOINT is not set, the advisor is disabled");
            Ok(Box::new(DisabledAdvisor))
        }
    }
}

/// Validates the answers, then asks the advisor once.
#[tracing::instrument(skip(client))]
pub async fn request_advice(
    client: &(dyn AdvisorClient + Send + Sync),
    input: AdvisorInput,
) -> Result<AdvisorOutput, AdvisorError> {
    input.validate()?;
    let output = client.advise(input).await.inspect_err(|e| {
        tracing::error!("Advisor call failed: {}", e);
    })?;
    if output.integration_strategy.trim().is_empty() {
        tracing::error!("Advisor returned an empty strategy");
        return Err(AdvisorError::EmptyResponse);
    }
    Ok(output)
}

/// Advisor form as posted by the landing page: option ids, services repeated.
#[derive(Debug, Deserialize)]
pub struct AdvisorForm {
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub platform: String,
}

impl AdvisorForm {
    /// Maps option ids to labels. Unknown ids are kept so validation rejects them.
    pub fn into_input(self) -> AdvisorInput {
        fn label(options: &[(&str, &str)], id: String) -> String {
            options
                .iter()
                .find(|(option_id, _)| *option_id == id)
                .map(|(_, label)| label.to_string())
                .unwrap_or(id)
        }
        AdvisorInput {
            services_needed: self
                .services
                .into_iter()
                .map(|id| label(&SERVICES, id))
                .collect(),
            platform_type: label(&PLATFORMS, self.platform),
        }
    }
}

#[derive(Template)]
#[template(path = "partials/advisor_result.html")]
pub struct AdvisorResultTemplate {
    pub title: String,
    pub strategy: String,
}

#[derive(Template)]
#[template(path = "partials/advisor_error.html")]
pub struct AdvisorErrorTemplate {
    pub title: String,
    pub message: String,
}

/// Handles the landing page advisor form and answers with an HTML fragment.
#[tracing::instrument(skip(state, form))]
pub async fn advisor_form_handler(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Form(form): Form<AdvisorForm>,
) -> Result<Response, AdvisorError> {
    let t = state.catalog.scoped(locale, Namespace::AiAdvisorSection);
    match request_advice(state.advisor.as_ref(), form.into_input()).await {
        Ok(output) => {
            let html = AdvisorResultTemplate {
                title: t.t("result_title"),
                strategy: output.integration_strategy,
            }
            .render()?;
            Ok(Html(html).into_response())
        }
        Err(e) => advisor_error_fragment(&t, &e),
    }
}

fn advisor_error_fragment(t: &Translator, error: &AdvisorError) -> Result<Response, AdvisorError> {
    let status = if error.is_validation() {
        tracing::info!("Rejected advisor form: {}", error);
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::BAD_GATEWAY
    };
    let html = AdvisorErrorTemplate {
        title: t.t("error_title"),
        message: t.t(error.message_key()),
    }
    .render()?;
    let mut response = (status, Html(html)).into_response();
    response.headers_mut().insert(
        HeaderName::from_static("hx-reswap"),
        HeaderValue::from_static("innerHTML"),
    );
    Ok(response)
}

impl IntoResponse for AdvisorError {
    fn into_response(self) -> Response {
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

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    fn input(services: &[&str], platform: &str) -> AdvisorInput {
        AdvisorInput {
            services_needed: services.iter().map(|s| s.to_string()).collect(),
            platform_type: platform.to_string(),
        }
    }

    #[test]
    fn can_render_prompt() {
        let input = input(&["Casino Games", "Sportsbook"], "White Label");

        insta::assert_snapshot!(input.prompt(), @r"
        You are an expert iGaming API integration advisor.

        Based on the client's needs, provide a detailed strategy for optimal API integration.
        Consider the services needed and the platform type to create a tailored approach.

        Services Needed: Casino Games, Sportsbook
        Platform Type: White Label
        ");
    }

    #[test]
    fn can_reject_invalid_answers() {
        assert!(matches!(
            input(&[], "New Platform").validate(),
            Err(AdvisorError::NoServices)
        ));
        assert!(matches!(
            input(&["Poker Rooms"], "New Platform").validate(),
            Err(AdvisorError::UnknownService(s)) if s == "Poker Rooms"
        ));
        assert!(matches!(
            input(&["Sportsbook"], "").validate(),
            Err(AdvisorError::UnknownPlatform(_))
        ));
        assert!(input(&["Sportsbook"], "Existing Platform").validate().is_ok());
    }

    #[test]
    fn can_map_form_ids_to_labels() {
        let form = AdvisorForm {
            services: vec!["pam".to_string(), "kyc_aml".to_string()],
            platform: "new_platform".to_string(),
        };

        assert_eq!(
            form.into_input(),
            input(
                &["Player Account Management (PAM)", "KYC/AML Solutions"],
                "New Platform"
            )
        );
    }

    #[tokio::test]
    async fn can_request_advice_from_client() {
        let answers = input(&["Sportsbook"], "Existing Platform");
        let mut client = MockAdvisorClient::new();
        client
            .expect_advise()
            .with(eq(answers.clone()))
            .times(1)
            .returning(|_| {
                Ok(AdvisorOutput {
                    integration_strategy: "Start with the sportsbook feed.".to_string(),
                })
            });

        let output = request_advice(&client, answers).await.unwrap();

        assert_eq!(output.integration_strategy, "Start with the sportsbook feed.");
    }

    #[tokio::test]
    async fn can_skip_client_when_answers_are_invalid() {
        let mut client = MockAdvisorClient::new();
        client.expect_advise().never();

        let result = request_advice(&client, input(&[], "White Label")).await;

        assert!(matches!(result, Err(AdvisorError::NoServices)));
    }

    #[tokio::test]
    async fn can_reject_empty_strategy() {
        let mut client = MockAdvisorClient::new();
        client.expect_advise().returning(|_| {
            Ok(AdvisorOutput {
                integration_strategy: "  ".to_string(),
            })
        });

        let result = request_advice(&client, input(&["Sportsbook"], "White Label")).await;

        assert!(matches!(result, Err(AdvisorError::EmptyResponse)));
    }

    #[tokio::test]
    async fn can_fail_when_disabled() {
        let result = request_advice(&DisabledAdvisor, input(&["Sportsbook"], "White Label")).await;

        assert!(matches!(result, Err(AdvisorError::Disabled)));
    }
}
