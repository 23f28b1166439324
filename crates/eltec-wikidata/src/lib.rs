//! eltec-wikidata - Wikidata enrichment for ELTeC metadata
//!
//! Resolves each row's author and work to Wikidata QIDs. Authors go through
//! their VIAF id; works through their VIAF id when present, otherwise through
//! label matching on the title, constrained by the author where known.
//!
//! # Example
//!
//! ```ignore
//! use eltec_core::ProgressContext;
//! use eltec_wikidata::{Config, run};
//!
//! let config = Config {
//!     input: "ELTeC-pol_metadata.tsv".into(),
//!     limit: Some(10),
//!     ..Default::default()
//! };
//!
//! let summary = run(&config, &ProgressContext::hidden())?;
//! println!("Authors matched: {}/{}", summary.authors_matched, summary.rows);
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod resolve;
pub mod runner;
pub mod sparql;
pub mod table;
pub mod title;
pub mod viaf;

// Re-exports
pub use cache::{LookupCache, Memo, WorkKey};
pub use client::{Binding, BindingValue, QueryService, SparqlClient, first_qid};
pub use config::{Columns, Config};
pub use resolve::Resolver;
pub use runner::{Enricher, Summary, run, run_with};
pub use table::{AUTHOR_QID_COLUMN, ResolvedIds, WORK_QID_COLUMN};
pub use title::normalize_title;
pub use viaf::extract_viaf_id;
