#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use chrono::NaiveDate;
use igamx_i18n::{Catalog, RoutingStrategy};
use igamx_server::advisor::{AdvisorClient, AdvisorError, AdvisorInput, AdvisorOutput};
use igamx_server::config::Config;
use igamx_server::web::AppState;
use std::sync::{Arc, Mutex};

/// Advisor that answers with a fixed strategy, or fails when it has none,
/// and remembers the last answers it was asked about.
#[derive(Default)]
pub struct StubAdvisor {
    reply: Option<String>,
    pub last_input: Mutex<Option<AdvisorInput>>,
}

impl StubAdvisor {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            last_input: Mutex::new(None),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn last_input(&self) -> Option<AdvisorInput> {
        self.last_input.lock().unwrap().clone()
    }
}

#[async_trait]
impl AdvisorClient for StubAdvisor {
    async fn advise(&self, input: AdvisorInput) -> Result<AdvisorOutput, AdvisorError> {
        *self.last_input.lock().unwrap() = Some(input);
        match &self.reply {
            Some(reply) => Ok(AdvisorOutput {
                integration_strategy: reply.clone(),
            }),
            None => Err(AdvisorError::Status(500)),
        }
    }
}

pub fn test_config(strategy: RoutingStrategy) -> Config {
    Config {
        routing_strategy: strategy,
        static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/static").to_string(),
        legal_last_updated: NaiveDate::from_ymd_opt(2025, 6, 1),
        ..Config::default()
    }
}

pub fn test_state(strategy: RoutingStrategy, advisor: Arc<StubAdvisor>) -> AppState {
    AppState::new(test_config(strategy), Catalog::embedded(), advisor)
}

pub fn get(uri: &str) -> axum::http::request::Builder {
    Request::builder().method("GET").uri(uri)
}

pub fn form_post(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

pub fn header<'a>(response: &'a Response<Body>, name: &str) -> Option<&'a str> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
}
