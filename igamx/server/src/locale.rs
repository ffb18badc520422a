use axum::Form;
use axum::extract::State;
use axum::http::uri::PathAndQuery;
use axum::response::Redirect;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use igamx_i18n::Locale;
use igamx_i18n::routing::{localized_path, split_locale_prefix};
use serde::Deserialize;

use crate::web::AppState;
pub use crate::web::middleware::RequestLocale;

/// Language switcher form: the chosen locale and the page path to return to.
#[derive(Debug, Deserialize)]
pub struct ChangeLocaleForm {
    pub locale: String,
    #[serde(default)]
    pub path: String,
}

/// Normalizes the path to return to after a locale change.
///
/// Only same-site absolute paths are kept (`//host`, backslashes and
/// anything that is not a valid URI path fall back to `/`), and an existing
/// locale prefix is dropped.
pub fn return_path(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    if !path.starts_with('/')
        || path.starts_with("//")
        || path.contains('\\')
        || path.chars().any(char::is_control)
        || PathAndQuery::try_from(path).is_err()
    {
        return "/";
    }
    match split_locale_prefix(path) {
        Some((_, rest)) => rest,
        None => path,
    }
}

/// Builds the persisted preference cookie for a locale.
pub fn locale_cookie(name: String, locale: Locale) -> Cookie<'static> {
    Cookie::build((name, locale.code()))
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(365))
        .build()
}

/// Handles the language switcher: stores the choice and sends the visitor
/// to the same page in the new locale.
#[tracing::instrument(skip(state, jar))]
pub async fn change_locale_handler(
    State(state): State<AppState>,
    RequestLocale(current): RequestLocale,
    jar: CookieJar,
    Form(form): Form<ChangeLocaleForm>,
) -> (CookieJar, Redirect) {
    let path = return_path(&form.path);
    match Locale::from_code(&form.locale) {
        Some(locale) => {
            tracing::info!(from = %current, to = %locale, "Locale changed");
            let jar = jar.add(locale_cookie(state.config.locale_cookie.clone(), locale));
            (jar, Redirect::to(&localized_path(locale, path, None)))
        }
        None => {
            tracing::warn!(locale = %form.locale, "Ignoring unsupported locale");
            (jar, Redirect::to(&localized_path(current, path, None)))
        }
    }
}
