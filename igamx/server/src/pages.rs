use askama::Template;
use axum::extract::State;
use axum::response::Html;
use chrono::{Datelike, NaiveDate, Utc};
use igamx_i18n::{Catalog, Locale, Namespace, Translator};

use crate::advisor::{PLATFORMS, SERVICES};
use crate::web::middleware::RequestLocale;
use crate::web::{AppState, WebError};

/// One entry of the language switcher.
#[derive(Debug, Clone)]
pub struct LocaleOption {
    pub code: &'static str,
    pub label: String,
    pub current: bool,
}

/// Parts shared by every page: head metadata, navbar, switcher and footer.
pub struct PageChrome {
    pub locale: Locale,
    /// Page path without the locale prefix, posted back by the switcher.
    pub path: &'static str,
    pub title: String,
    pub description: String,
    pub nav: Translator,
    pub footer: Translator,
    pub switcher_label: String,
    pub switcher: Vec<LocaleOption>,
    pub rights: String,
}

impl PageChrome {
    /// `page_title` is prefixed to the site title when given.
    pub fn new(t: &Translator, path: &'static str, page_title: Option<String>) -> Self {
        let locale = t.locale();
        let metadata = t.scoped(Namespace::Metadata);
        let switcher = t.scoped(Namespace::LanguageSwitcher);
        let footer = t.scoped(Namespace::Footer);
        let site_title = metadata.t("title");
        let year = Utc::now().year().to_string();
        Self {
            locale,
            path,
            title: match page_title {
                Some(page_title) => format!("{page_title} | {site_title}"),
                None => site_title,
            },
            description: metadata.t("description"),
            nav: t.scoped(Namespace::Navbar),
            rights: footer.t_with("rights", &[("year", year.as_str())]),
            footer,
            switcher_label: switcher.t("change_language"),
            switcher: Locale::ALL
                .into_iter()
                .map(|option| LocaleOption {
                    code: option.code(),
                    label: switcher.t(option.code()),
                    current: option == locale,
                })
                .collect(),
        }
    }
}

/// A titled block of text, as used by the landing page sections.
#[derive(Debug, Clone)]
pub struct Card {
    pub id: &'static str,
    pub title: String,
    pub description: String,
    /// Call to action; empty when the card has none.
    pub cta: String,
    /// Anchor the call to action points at.
    pub href: &'static str,
}

/// Reads `{group}.{id}.{title_key}` and `{group}.{id}.description` for each id.
fn cards(t: &Translator, group: &str, title_key: &str, ids: &[&'static str]) -> Vec<Card> {
    ids.iter()
        .map(|&id| Card {
            id,
            title: t.t(&format!("{group}.{id}.{title_key}")),
            description: t.t(&format!("{group}.{id}.description")),
            cta: String::new(),
            href: "",
        })
        .collect()
}

fn list_items(t: &Translator, group: &str, ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| t.t(&format!("{group}.{id}"))).collect()
}

/// A client quote on the landing page.
#[derive(Debug, Clone)]
pub struct Testimonial {
    pub quote: String,
    pub author: String,
    pub role: String,
}

fn testimonials(t: &Translator, ids: &[&str]) -> Vec<Testimonial> {
    ids.iter()
        .map(|id| Testimonial {
            quote: t.t(&format!("testimonials.{id}.quote")),
            author: t.t(&format!("testimonials.{id}.author")),
            role: t.t(&format!("testimonials.{id}.role")),
        })
        .collect()
}

/// A localized select or checkbox option.
#[derive(Debug, Clone)]
pub struct FormOption {
    pub id: &'static str,
    pub label: String,
}

fn form_options(t: &Translator, group: &str, options: &[(&'static str, &str)]) -> Vec<FormOption> {
    options
        .iter()
        .map(|&(id, _)| FormOption {
            id,
            label: t.t(&format!("{group}.{id}")),
        })
        .collect()
}

const SERVICE_ITEMS: [&str; 6] = [
    "casino_games",
    "sportsbook",
    "payment_solutions",
    "pam",
    "kyc_aml",
    "affiliate_systems",
];
const TECHNOLOGY_ITEMS: [&str; 4] = ["speed", "security", "scalability", "integration"];
const BENEFIT_ITEMS: [&str; 6] = [
    "time_to_market",
    "reduced_costs",
    "best_content",
    "player_experience",
    "scalable_growth",
    "security_compliance",
];
/// Item id and the landing page section its call to action opens.
const WHY_CHOOSE_US_ITEMS: [(&str, &str); 5] = [
    ("unmatched_expertise", "#about"),
    ("cutting_edge_tech", "#technology"),
    ("dedicated_support", "#contact"),
    ("proven_track_record", "#clients"),
    ("innovative_solutions", "#ai-advisor"),
];
const VALUE_ITEMS: [&str; 3] = ["innovation", "client_centricity", "integrity"];
const CLIENT_ITEMS: [&str; 5] = ["alpha", "beta", "gamma", "delta", "epsilon"];
const TESTIMONIAL_ITEMS: [&str; 3] = ["alpha_gaming", "beta_sports", "gamma_casino"];

const PERSONAL_DATA_ITEMS: [&str; 5] = ["email", "name", "phone", "company", "cookies"];
const USE_OF_DATA_ITEMS: [&str; 7] = [
    "provide_maintain",
    "notify_changes",
    "interactive_features",
    "customer_support",
    "gather_analysis",
    "monitor_usage",
    "technical_issues",
];

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub chrome: PageChrome,
    pub hero: Translator,
    pub services: Translator,
    pub service_cards: Vec<Card>,
    pub technology: Translator,
    pub technology_cards: Vec<Card>,
    pub benefits: Translator,
    pub benefit_cards: Vec<Card>,
    pub why: Translator,
    pub why_cards: Vec<Card>,
    pub advisor: Translator,
    pub advisor_services: Vec<FormOption>,
    pub advisor_platforms: Vec<FormOption>,
    pub about: Translator,
    pub value_cards: Vec<Card>,
    pub clients: Translator,
    pub client_names: Vec<String>,
    pub testimonials: Vec<Testimonial>,
    pub contact: Translator,
}

impl HomeTemplate {
    pub fn new(catalog: &Catalog, locale: Locale) -> Self {
        let t = catalog.translator(locale);
        let services = t.scoped(Namespace::ServicesSection);
        let technology = t.scoped(Namespace::TechnologySection);
        let benefits = t.scoped(Namespace::BenefitsSection);
        let why = t.scoped(Namespace::WhyChooseUsSection);
        let advisor = t.scoped(Namespace::AiAdvisorSection);
        let about = t.scoped(Namespace::AboutUsSection);
        let clients = t.scoped(Namespace::ClientsSection);
        let why_cards = WHY_CHOOSE_US_ITEMS
            .iter()
            .map(|&(id, href)| Card {
                id,
                title: why.t(&format!("{id}.name")),
                description: why.t(&format!("{id}.description")),
                cta: why.t(&format!("{id}.cta")),
                href,
            })
            .collect();
        Self {
            chrome: PageChrome::new(&t, "/", None),
            hero: t.scoped(Namespace::Hero),
            service_cards: cards(&services, "items", "title", &SERVICE_ITEMS),
            services,
            technology_cards: cards(&technology, "items", "title", &TECHNOLOGY_ITEMS),
            technology,
            benefit_cards: cards(&benefits, "items", "title", &BENEFIT_ITEMS),
            benefits,
            why_cards,
            why,
            advisor_services: form_options(&advisor, "services", &SERVICES),
            advisor_platforms: form_options(&advisor, "platforms", &PLATFORMS),
            advisor,
            value_cards: cards(&about, "values", "title", &VALUE_ITEMS),
            about,
            client_names: list_items(&clients, "clients", &CLIENT_ITEMS),
            testimonials: testimonials(&clients, &TESTIMONIAL_ITEMS),
            clients,
            contact: t.scoped(Namespace::ContactSection),
        }
    }
}

#[derive(Template)]
#[template(path = "privacy_policy.html")]
pub struct PrivacyPolicyTemplate {
    pub chrome: PageChrome,
    pub t: Translator,
    pub last_updated: String,
    pub personal_data: Vec<String>,
    pub use_of_data: Vec<String>,
}

impl PrivacyPolicyTemplate {
    pub fn new(catalog: &Catalog, locale: Locale, updated: NaiveDate) -> Self {
        let root = catalog.translator(locale);
        let t = root.scoped(Namespace::PrivacyPolicyPage);
        Self {
            chrome: PageChrome::new(&root, "/privacy-policy", Some(t.t("title"))),
            last_updated: t.t_with(
                "last_updated",
                &[("date", format_long_date(locale, updated).as_str())],
            ),
            personal_data: list_items(&t, "personal_data_list", &PERSONAL_DATA_ITEMS),
            use_of_data: list_items(&t, "use_of_data_list", &USE_OF_DATA_ITEMS),
            t,
        }
    }
}

#[derive(Template)]
#[template(path = "terms_of_service.html")]
pub struct TermsOfServiceTemplate {
    pub chrome: PageChrome,
    pub t: Translator,
    pub last_updated: String,
}

impl TermsOfServiceTemplate {
    pub fn new(catalog: &Catalog, locale: Locale, updated: NaiveDate) -> Self {
        let root = catalog.translator(locale);
        let t = root.scoped(Namespace::TermsOfServicePage);
        Self {
            chrome: PageChrome::new(&root, "/terms-of-service", Some(t.t("title"))),
            last_updated: t.t_with(
                "last_updated",
                &[("date", format_long_date(locale, updated).as_str())],
            ),
            t,
        }
    }
}

const EN_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const FR_MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// Formats a date the way each locale writes it in running text.
pub fn format_long_date(locale: Locale, date: NaiveDate) -> String {
    let month = date.month0() as usize;
    match locale {
        Locale::En => format!("{} {}, {}", EN_MONTHS[month], date.day(), date.year()),
        Locale::Zh => format!("{}年{}月{}日", date.year(), date.month(), date.day()),
        Locale::Fr => format!("{} {} {}", date.day(), FR_MONTHS[month], date.year()),
    }
}

#[tracing::instrument(skip(state))]
pub async fn home_handler(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
) -> Result<Html<String>, WebError> {
    let template = HomeTemplate::new(&state.catalog, locale);
    template.render().map(Html).map_err(WebError::from)
}

#[tracing::instrument(skip(state))]
pub async fn privacy_policy_handler(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
) -> Result<Html<String>, WebError> {
    let template = PrivacyPolicyTemplate::new(&state.catalog, locale, state.legal_updated);
    template.render().map(Html).map_err(WebError::from)
}

#[tracing::instrument(skip(state))]
pub async fn terms_of_service_handler(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
) -> Result<Html<String>, WebError> {
    let template = TermsOfServiceTemplate::new(&state.catalog, locale, state.legal_updated);
    template.render().map(Html).map_err(WebError::from)
}
