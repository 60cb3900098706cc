//! One-shot HTTP round trip to the calculation service.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::request::CalculationRequest;

pub const GENERIC_TRANSPORT_ERROR: &str = "An error occurred during calculation";
pub const GENERIC_APPLICATION_ERROR: &str = "Calculation failed";

/// Which wire contract the service speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ApiFlavor {
    /// One route per scenario, `{success, results, explanation, error}` replies.
    #[default]
    Routes,
    /// Single `/calculate` route taking `{scenario, parameters}`.
    Unified,
}

/// Numeric entries of a result mapping, in the order the service sent them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet(pub Vec<(String, f64)>);

impl ResultSet {
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

impl<'de> Deserialize<'de> for ResultSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ResultSetVisitor;

        impl<'de> Visitor<'de> for ResultSetVisitor {
            type Value = ResultSet;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of result names to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ResultSet, A::Error> {
                let mut entries = Vec::new();
                while let Some((k, v)) = access.next_entry::<String, Value>()? {
                    if let Some(n) = v.as_f64() {
                        entries.push((k, n));
                    }
                }
                Ok(ResultSet(entries))
            }
        }

        deserializer.deserialize_map(ResultSetVisitor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Unreachable service, timeout, unreadable body.
    Transport,
    /// The service answered with an explicit error.
    Application,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CalculationOutcome {
    Success { results: ResultSet, explanation: String },
    Failure { kind: FailureKind, message: String },
}

impl CalculationOutcome {
    pub fn transport() -> Self {
        Self::Failure { kind: FailureKind::Transport, message: GENERIC_TRANSPORT_ERROR.to_string() }
    }

    fn application(message: Option<String>) -> Self {
        Self::Failure {
            kind: FailureKind::Application,
            message: message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_APPLICATION_ERROR.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[derive(Debug, Default, Deserialize)]
struct ResponseBody {
    success: Option<bool>,
    results: Option<ResultSet>,
    // older back-ends name the mapping this way
    calculations: Option<ResultSet>,
    explanation: Option<String>,
    error: Option<String>,
}

/// Map an HTTP status and raw body onto an outcome.
pub fn classify_response(flavor: ApiFlavor, status: u16, body: &str) -> CalculationOutcome {
    let parsed: ResponseBody = match serde_json::from_str(body) {
        Ok(b) => b,
        Err(e) => {
            warn!(status, error = %e, "calculation response is not valid JSON");
            return CalculationOutcome::transport();
        }
    };

    if !(200..300).contains(&status) {
        return CalculationOutcome::application(parsed.error);
    }
    let results = parsed.results.or(parsed.calculations);

    let succeeded = match flavor {
        ApiFlavor::Routes => parsed.success == Some(true),
        ApiFlavor::Unified => parsed.success != Some(false) && results.is_some(),
    };
    if !succeeded {
        return CalculationOutcome::application(parsed.error);
    }

    CalculationOutcome::Success {
        results: results.unwrap_or_default(),
        explanation: parsed.explanation.unwrap_or_default(),
    }
}

#[async_trait]
pub trait CalculationClient: Send + Sync {
    /// Single attempt; never returns a transport error to the caller.
    async fn submit(&self, request: &CalculationRequest) -> CalculationOutcome;
}

pub struct HttpCalculationClient {
    http: reqwest::Client,
    base_url: String,
    flavor: ApiFlavor,
}

impl HttpCalculationClient {
    pub fn new(base_url: &str, flavor: ApiFlavor, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let http = builder.build().context("building HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            flavor,
        })
    }

    pub fn url_for(&self, request: &CalculationRequest) -> String {
        match self.flavor {
            ApiFlavor::Routes => format!("{}{}", self.base_url, request.endpoint),
            ApiFlavor::Unified => format!("{}/calculate", self.base_url),
        }
    }

    pub fn body_for(&self, request: &CalculationRequest) -> Value {
        match self.flavor {
            ApiFlavor::Routes => request.payload.to_json(),
            ApiFlavor::Unified => json!({
                "scenario": request.scenario.id(),
                "parameters": request.payload.to_json(),
            }),
        }
    }

    async fn post(&self, url: &str, body: &Value) -> reqwest::Result<(u16, String)> {
        let resp = self.http.post(url).json(body).send().await?;
        let status = resp.status().as_u16();
        let text = resp.text().await?;
        Ok((status, text))
    }
}

#[async_trait]
impl CalculationClient for HttpCalculationClient {
    async fn submit(&self, request: &CalculationRequest) -> CalculationOutcome {
        let url = self.url_for(request);
        let body = self.body_for(request);
        debug!(%url, scenario = %request.scenario, "posting calculation");

        match self.post(&url, &body).await {
            Ok((status, text)) => {
                let outcome = classify_response(self.flavor, status, &text);
                debug!(status, success = outcome.is_success(), "calculation response");
                outcome
            }
            Err(e) => {
                warn!(%url, error = %e, "calculation request failed");
                CalculationOutcome::transport()
            }
        }
    }
}
