//! Wikidata SPARQL endpoint client

use std::collections::HashMap;
use std::time::Duration;

use eltec_core::QueryError;
use serde::Deserialize;

use crate::config::Config;

/// One result row: variable name → bound value.
pub type Binding = HashMap<String, BindingValue>;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BindingValue {
    pub value: String,
}

impl BindingValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    bindings: Vec<Binding>,
}

/// Something that can answer a SELECT query.
///
/// Implementations never fail: a broken query comes back as no rows.
/// `label` only identifies the query in diagnostics.
pub trait QueryService {
    fn select(&self, query: &str, label: &str) -> Vec<Binding>;
}

impl<S: QueryService + ?Sized> QueryService for &S {
    fn select(&self, query: &str, label: &str) -> Vec<Binding> {
        (**self).select(query, label)
    }
}

/// Decode a SPARQL JSON results envelope.
pub fn parse_bindings(body: &str) -> Result<Vec<Binding>, QueryError> {
    serde_json::from_str::<SparqlResponse>(body)
        .map(|r| r.results.bindings)
        .map_err(|e| QueryError::Decode(e.to_string()))
}

/// Entity id of the first row: the last path segment of its `var` URI.
pub fn first_qid(bindings: &[Binding], var: &str) -> Option<String> {
    let uri = &bindings.first()?.get(var)?.value;
    let id = uri.rsplit('/').next().unwrap_or(uri);
    (!id.is_empty()).then(|| id.to_string())
}

/// Blocking client for a SPARQL endpoint, paced by a fixed delay.
pub struct SparqlClient {
    http: reqwest::Client,
    endpoint: String,
    delay: Duration,
}

impl SparqlClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = eltec_core::http_client(&config.user_agent, config.timeout)?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            delay: config.delay,
        })
    }

    /// Run `query` and decode the bindings, without the pause.
    pub fn try_select(&self, query: &str) -> Result<Vec<Binding>, QueryError> {
        let body = eltec_core::get_text(
            &self.http,
            &self.endpoint,
            &[("query", query), ("format", "json")],
        )?;
        parse_bindings(&body)
    }
}

impl QueryService for SparqlClient {
    fn select(&self, query: &str, label: &str) -> Vec<Binding> {
        let result = self.try_select(query);
        // Every request that went out is followed by the pause, failed or not
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        match result {
            Ok(bindings) => {
                log::debug!("SPARQL {label}: {} row(s)", bindings.len());
                bindings
            }
            Err(e) => {
                if label.is_empty() {
                    log::warn!("SPARQL error: {e}");
                } else {
                    log::warn!("SPARQL error for {label}: {e}");
                }
                Vec::new()
            }
        }
    }
}
