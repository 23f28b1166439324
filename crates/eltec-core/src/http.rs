//! Blocking HTTP GET over a shared tokio runtime.
//!
//! The pipeline is strictly sequential, so requests are issued with the async
//! reqwest client and driven to completion with `block_on`.

use std::sync::LazyLock;
use std::time::Duration;

/// Connect timeout, independent of the per-request timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error from a single remote request
#[derive(Debug)]
pub enum QueryError {
    /// Transport failure or non-success status
    Http {
        status: Option<u16>,
        message: String,
    },
    /// No complete response within the request timeout
    Timeout,
    /// Response body was not the expected shape
    Decode(String),
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http {
                status: Some(s),
                message,
            } => write!(f, "HTTP {s}: {message}"),
            Self::Http {
                status: None,
                message,
            } => write!(f, "HTTP error: {message}"),
            Self::Timeout => write!(f, "request timed out"),
            Self::Decode(msg) => write!(f, "invalid response: {msg}"),
        }
    }
}

impl std::error::Error for QueryError {}

impl QueryError {
    /// Build from a reqwest error, dropping the request URL.
    ///
    /// SPARQL queries travel in the query string, so the URL would repeat
    /// the whole query in every warning.
    pub fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return Self::Timeout;
        }
        Self::Http {
            status: e.status().map(|s| s.as_u16()),
            message: e.without_url().to_string(),
        }
    }
}

/// Shared single-worker runtime for blocking on HTTP calls.
pub static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// Build an HTTP client identifying itself with `user_agent`.
///
/// `timeout` bounds the whole request, body included.
pub fn http_client(user_agent: &str, timeout: Duration) -> Result<reqwest::Client, QueryError> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .timeout(timeout)
        .build()
        .map_err(QueryError::from_reqwest)
}

/// GET `url` with the given query parameters and return the body as text.
///
/// Non-2xx statuses are errors. Must not be called from inside an async
/// context.
pub fn get_text(
    client: &reqwest::Client,
    url: &str,
    params: &[(&str, &str)],
) -> Result<String, QueryError> {
    SHARED_RUNTIME.handle().block_on(async {
        let resp = client
            .get(url)
            .query(params)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(QueryError::from_reqwest)?;
        resp.text().await.map_err(QueryError::from_reqwest)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_http_with_status() {
        let err = QueryError::Http {
            status: Some(503),
            message: "unavailable".to_string(),
        };
        assert_eq!(format!("{err}"), "HTTP 503: unavailable");
    }

    #[test]
    fn display_http_without_status() {
        let err = QueryError::Http {
            status: None,
            message: "connection refused".to_string(),
        };
        assert_eq!(format!("{err}"), "HTTP error: connection refused");
    }

    #[test]
    fn display_decode() {
        let err = QueryError::Decode("missing field `results`".to_string());
        assert!(format!("{err}").starts_with("invalid response"));
    }

    #[test]
    fn display_timeout() {
        assert_eq!(QueryError::Timeout.to_string(), "request timed out");
    }

    #[test]
    fn client_builds() {
        assert!(http_client("eltec-test/0.1", Duration::from_secs(5)).is_ok());
    }
}
