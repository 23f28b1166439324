//! Enrichment pipeline configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::sparql::{WRITTEN_WORK, is_lang_tag, is_qid};

/// Input column names the pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    pub author_name: String,
    pub author_ids: String,
    pub title: String,
    pub title_ids: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            author_name: "author-name".to_string(),
            author_ids: "author-ids".to_string(),
            title: "title".to_string(),
            title_ids: "title-ids".to_string(),
        }
    }
}

/// Runtime configuration for one enrichment run
#[derive(Debug, Clone)]
pub struct Config {
    /// Input TSV
    pub input: PathBuf,
    /// Output TSV (input columns + two QID columns)
    pub output: PathBuf,
    /// SPARQL endpoint
    pub endpoint: String,
    /// `User-Agent` sent with every request
    pub user_agent: String,
    /// Language tag for label matching
    pub lang: String,
    /// Pause after each request that reaches the endpoint
    pub delay: Duration,
    /// Per-request timeout
    pub timeout: Duration,
    /// Class bounding the type-scoped title search (with subclasses)
    pub work_class: String,
    pub columns: Columns,
    /// Process only the first N rows (for testing)
    pub limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("ELTeC-pol_metadata.tsv"),
            output: PathBuf::from("ELTeC-pol_metadata_wikidata.tsv"),
            endpoint: "https://query.wikidata.org/sparql".to_string(),
            user_agent: "ELTeC-enrichment/1.0 (research project)".to_string(),
            lang: "pl".to_string(),
            delay: Duration::from_millis(500),
            timeout: Duration::from_secs(15),
            work_class: WRITTEN_WORK.to_string(),
            columns: Columns::default(),
            limit: None,
        }
    }
}

impl Config {
    /// Reject values that would produce broken queries or requests.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://"),
            "Endpoint must be an http(s) URL: {:?}",
            self.endpoint
        );
        anyhow::ensure!(
            is_lang_tag(&self.lang),
            "Invalid label language tag: {:?}",
            self.lang
        );
        anyhow::ensure!(
            is_qid(&self.work_class),
            "Work class must be a QID like Q7725634: {:?}",
            self.work_class
        );
        anyhow::ensure!(!self.timeout.is_zero(), "Request timeout must be non-zero");
        anyhow::ensure!(!self.user_agent.trim().is_empty(), "User-Agent must not be empty");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.lang, "pl");
        assert_eq!(config.delay, Duration::from_millis(500));
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.columns.title_ids, "title-ids");
        assert!(config.limit.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn rejects_bad_lang() {
        let config = Config {
            lang: "pl\" .".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_bad_work_class() {
        let config = Config {
            work_class: "written work".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let config = Config {
            endpoint: "query.wikidata.org/sparql".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let config = Config {
            timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
