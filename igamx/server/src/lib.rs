pub mod config {
    use chrono::NaiveDate;
    use igamx_i18n::RoutingStrategy;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, Clone)]
    pub struct Config {
        #[serde(default = "default_port")]
        pub port: u16,
        /// `rewrite` or `redirect` for paths without a locale prefix.
        #[serde(default)]
        pub routing_strategy: RoutingStrategy,
        /// Name of the cookie holding the chosen locale.
        #[serde(default = "default_locale_cookie")]
        pub locale_cookie: String,
        /// Directory of `{code}.json` bundles; the embedded bundles are used when unset.
        #[serde(default)]
        pub locales_dir: Option<String>,
        #[serde(default = "default_static_dir")]
        pub static_dir: String,
        /// Date shown as "last updated" on the legal pages; start-up date when unset.
        #[serde(default)]
        pub legal_last_updated: Option<NaiveDate>,
        /// Prompt endpoint of the hosted model; the advisor is disabled when unset.
        #[serde(default)]
        pub advisor_endpoint: Option<String>,
        #[serde(default)]
        pub advisor_api_key: Option<String>,
        #[serde(default = "default_advisor_model")]
        pub advisor_model: String,
        #[serde(default = "default_advisor_timeout_secs")]
        pub advisor_timeout_secs: u64,
    }

    impl Config {
        /// Loads configuration from environment variables.
        pub fn from_env() -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(config::Environment::default())
                .build()?;

            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }
    }

    impl Default for Config {
        fn default() -> Self {
            Self {
                port: default_port(),
                routing_strategy: RoutingStrategy::default(),
                locale_cookie: default_locale_cookie(),
                locales_dir: None,
                static_dir: default_static_dir(),
                legal_last_updated: None,
                advisor_endpoint: None,
                advisor_api_key: None,
                advisor_model: default_advisor_model(),
                advisor_timeout_secs: default_advisor_timeout_secs(),
            }
        }
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_locale_cookie() -> String {
        "locale".to_string()
    }

    fn default_static_dir() -> String {
        "static".to_string()
    }

    fn default_advisor_model() -> String {
        "gemini-2.0-flash".to_string()
    }

    fn default_advisor_timeout_secs() -> u64 {
        30
    }

}

pub mod advisor;
pub mod contact;
pub mod locale;
pub mod pages;
pub mod web;
