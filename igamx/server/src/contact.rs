use askama::Template;
use axum::extract::State;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::Form;
use igamx_i18n::Namespace;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::web::AppState;
use crate::web::middleware::RequestLocale;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

/// Contact form as posted by the landing page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub services_of_interest: Vec<String>,
}

/// A rejected contact form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    NameTooShort,
    InvalidEmail,
    MessageTooShort,
}

impl FieldError {
    /// Translation key in the `contact_section` namespace.
    pub fn message_key(self) -> &'static str {
        match self {
            FieldError::NameTooShort => "errors.name_min",
            FieldError::InvalidEmail => "errors.email_invalid",
            FieldError::MessageTooShort => "errors.message_min",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("invalid contact form: {0:?}")]
    Invalid(Vec<FieldError>),
    #[error("Template rendering failed")]
    Template(#[from] askama::Error),
}

impl ContactForm {
    /// Returns every failing field, in form order.
    pub fn validate(&self) -> Result<(), ContactError> {
        let mut errors = Vec::new();
        if self.name.trim().chars().count() < 2 {
            errors.push(FieldError::NameTooShort);
        }
        if !EMAIL.is_match(self.email.trim()) {
            errors.push(FieldError::InvalidEmail);
        }
        if self.message.trim().chars().count() < 10 {
            errors.push(FieldError::MessageTooShort);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ContactError::Invalid(errors))
        }
    }

    fn company(&self) -> Option<&str> {
        self.company
            .as_deref()
            .map(str::trim)
            .filter(|company| !company.is_empty())
    }
}

/// Accepts a validated form. Nothing is sent anywhere; the submission is logged.
#[tracing::instrument(skip(form), fields(email = %form.email))]
pub fn submit_contact(form: &ContactForm) {
    tracing::info!(
        name = %form.name.trim(),
        company = form.company(),
        services = ?form.services_of_interest,
        "Contact form submitted"
    );
}

#[derive(Template)]
#[template(path = "partials/contact_success.html")]
pub struct ContactSuccessTemplate {
    pub title: String,
    pub message: String,
}

#[derive(Template)]
#[template(path = "partials/contact_errors.html")]
pub struct ContactErrorsTemplate {
    pub title: String,
    pub errors: Vec<String>,
}

/// Handles the landing page contact form and answers with an HTML fragment.
#[tracing::instrument(skip(state, form))]
pub async fn contact_form_handler(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Form(form): Form<ContactForm>,
) -> Result<Response, ContactError> {
    let t = state.catalog.scoped(locale, Namespace::ContactSection);
    match form.validate() {
        Ok(()) => {
            submit_contact(&form);
            let html = ContactSuccessTemplate {
                title: t.t("success_title"),
                message: t.t_with("success_description", &[("name", form.name.trim())]),
            }
            .render()?;
            Ok(Html(html).into_response())
        }
        Err(ContactError::Invalid(fields)) => {
            tracing::info!(?fields, "Rejected contact form");
            let html = ContactErrorsTemplate {
                title: t.t("error_title"),
                errors: fields.iter().map(|f| t.t(f.message_key())).collect(),
            }
            .render()?;
            let mut response = (StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response();
            response.headers_mut().insert(
                HeaderName::from_static("hx-reswap"),
                HeaderValue::from_static("innerHTML"),
            );
            Ok(response)
        }
        Err(e) => Err(e),
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let (status_code, user_facing_error_message) = match self {
            ContactError::Invalid(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Some fields are invalid. Please check the form and try again.",
            ),
            ContactError::Template(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred while processing your request. Please try again later.",
            ),
        };
        (
            status_code,
            Html(format!("<h1>Error</h1><p>{}</p>", user_facing_error_message)),
        )
            .into_response()
    }
}
