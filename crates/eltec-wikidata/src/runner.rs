//! Main runner: one sequential pass over the metadata rows

use std::cell::Cell;
use std::time::{Duration, Instant};

use anyhow::Result;
use eltec_core::{ProgressContext, percent};

use crate::cache::{LookupCache, WorkKey};
use crate::client::{Binding, QueryService, SparqlClient};
use crate::config::Config;
use crate::resolve::Resolver;
use crate::table::{ColumnIndex, Record, ResolvedIds, read_tsv, write_tsv};
use crate::title::is_present;
use crate::viaf::extract_viaf_id;

/// Longest title prefix shown in per-row log lines
const LOG_TITLE_CHARS: usize = 60;

/// Pipeline execution summary
#[derive(Debug, Clone)]
pub struct Summary {
    /// Rows written, including rows past the limit
    pub rows: usize,
    /// Rows that went through resolution
    pub processed: usize,
    pub authors_matched: usize,
    pub works_matched: usize,
    /// Distinct author VIAF ids looked up
    pub author_lookups: usize,
    /// Distinct work keys looked up
    pub work_lookups: usize,
    /// Queries handed to the query service
    pub remote_queries: usize,
    pub elapsed: Duration,
}

impl Summary {
    pub fn author_rate(&self) -> f64 {
        percent(self.authors_matched, self.rows)
    }

    pub fn work_rate(&self) -> f64 {
        percent(self.works_matched, self.rows)
    }
}

/// Resolves rows one at a time, memoizing every lookup for the run.
pub struct Enricher<S> {
    resolver: Resolver<S>,
    cache: LookupCache,
}

impl<S: QueryService> Enricher<S> {
    pub fn new(resolver: Resolver<S>) -> Self {
        Self {
            resolver,
            cache: LookupCache::default(),
        }
    }

    pub fn cache(&self) -> &LookupCache {
        &self.cache
    }

    /// Resolve author and work QIDs for one row.
    ///
    /// `tag` prefixes the log lines, e.g. `[3/120]`.
    pub fn resolve(&mut self, record: &Record<'_>, tag: &str) -> ResolvedIds {
        let author = extract_viaf_id(record.author_ids).and_then(|viaf| {
            self.cache.authors.get_or_resolve(viaf.to_string(), || {
                log::info!(
                    "{tag} Author VIAF {viaf}  → {}",
                    record.author_name.unwrap_or("")
                );
                self.resolver.by_viaf(viaf)
            })
        });

        let work_viaf = extract_viaf_id(record.title_ids);
        let title = record.title.unwrap_or("").trim();
        let key = match work_viaf {
            Some(viaf) => Some(WorkKey::Viaf(viaf.to_string())),
            None if is_present(title) => Some(WorkKey::Title(title.to_string())),
            None => None,
        };

        let work = key.and_then(|key| {
            let author = author.as_deref();
            self.cache.works.get_or_resolve(key, || {
                let shown: String = title.chars().take(LOG_TITLE_CHARS).collect();
                match work_viaf {
                    Some(viaf) => log::info!("{tag} Work VIAF {viaf}  → {shown}"),
                    None => log::info!("{tag} Work title search → {shown}"),
                }
                self.resolver.work(title, work_viaf, author)
            })
        });

        ResolvedIds { author, work }
    }
}

/// Counts the queries passed through to the inner service.
struct Counted<S> {
    inner: S,
    queries: Cell<usize>,
}

impl<S> Counted<S> {
    fn new(inner: S) -> Self {
        Self {
            inner,
            queries: Cell::new(0),
        }
    }
}

impl<S: QueryService> QueryService for Counted<S> {
    fn select(&self, query: &str, label: &str) -> Vec<Binding> {
        self.queries.set(self.queries.get() + 1);
        self.inner.select(query, label)
    }
}

/// Run the pipeline against the configured SPARQL endpoint.
pub fn run(config: &Config, progress: &ProgressContext) -> Result<Summary> {
    let client = SparqlClient::new(config)?;
    run_with(config, client, progress)
}

/// Run the pipeline with any [`QueryService`]. An invalid config and file
/// errors are fatal; query errors only leave cells empty.
///
/// Rows past `config.limit` are written with empty QID columns.
pub fn run_with<S: QueryService>(
    config: &Config,
    service: S,
    progress: &ProgressContext,
) -> Result<Summary> {
    config.validate()?;
    let start = Instant::now();

    let table = read_tsv(&config.input)?;
    let total = table.rows.len();
    let processed = config.limit.map_or(total, |limit| limit.min(total));
    log::info!("Loaded {total} rows.");
    if processed < total {
        log::warn!(
            "Row limit {processed}: the last {} rows are written without lookups",
            total - processed
        );
    }

    let index = ColumnIndex::new(&table.headers, &config.columns);
    let service = Counted::new(service);
    let mut enricher = Enricher::new(Resolver::new(
        &service,
        config.lang.clone(),
        config.work_class.clone(),
    ));

    let pb = progress.rows_bar(processed);
    let mut resolved = Vec::with_capacity(total);
    for (i, row) in table.rows.iter().take(processed).enumerate() {
        let record = index.record(row);
        if let Some(title) = record.title {
            pb.set_message(title.trim().chars().take(LOG_TITLE_CHARS).collect::<String>());
        }
        resolved.push(enricher.resolve(&record, &format!("[{}/{processed}]", i + 1)));
        pb.inc(1);
    }
    pb.finish_and_clear();
    resolved.resize(total, ResolvedIds::default());

    write_tsv(&config.output, &table, &resolved)?;
    log::info!("Done. Results saved to '{}'.", config.output.display());

    let summary = Summary {
        rows: total,
        processed,
        authors_matched: resolved.iter().filter(|r| r.author.is_some()).count(),
        works_matched: resolved.iter().filter(|r| r.work.is_some()).count(),
        author_lookups: enricher.cache().authors.len(),
        work_lookups: enricher.cache().works.len(),
        remote_queries: service.queries.get(),
        elapsed: start.elapsed(),
    };
    log::debug!(
        "{} author and {} work lookups, {} queries in {:.1}s",
        summary.author_lookups,
        summary.work_lookups,
        summary.remote_queries,
        summary.elapsed.as_secs_f64()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparql::WRITTEN_WORK;

    /// Finds nothing, counts calls.
    #[derive(Default)]
    struct Empty {
        calls: Cell<usize>,
    }

    impl QueryService for Empty {
        fn select(&self, _query: &str, _label: &str) -> Vec<Binding> {
            self.calls.set(self.calls.get() + 1);
            Vec::new()
        }
    }

    fn record<'a>(author_ids: &'a str, title: &'a str, title_ids: &'a str) -> Record<'a> {
        Record {
            author_name: Some("X"),
            author_ids: Some(author_ids),
            title: Some(title),
            title_ids: Some(title_ids),
        }
    }

    #[test]
    fn not_found_is_not_requeried() {
        let service = Empty::default();
        let mut enricher = Enricher::new(Resolver::new(&service, "pl", WRITTEN_WORK));
        let rec = record("https://viaf.org/viaf/7/", "Pan Tadeusz", "NA");
        enricher.resolve(&rec, "[1/2]");
        let after_first = service.calls.get();
        // author VIAF + class-scoped title search
        assert_eq!(after_first, 2);
        enricher.resolve(&rec, "[2/2]");
        assert_eq!(service.calls.get(), after_first);
    }

    #[test]
    fn placeholder_title_skips_work_lookup() {
        let service = Empty::default();
        let mut enricher = Enricher::new(Resolver::new(&service, "pl", WRITTEN_WORK));
        for t in ["", "NA", "nan", "  "] {
            let ids = enricher.resolve(&record("NA", t, ""), "[1/1]");
            assert_eq!(ids, ResolvedIds::default());
        }
        assert_eq!(service.calls.get(), 0);
        assert!(enricher.cache().works.is_empty());
    }

    #[test]
    fn same_id_as_author_and_work_uses_separate_caches() {
        let service = Empty::default();
        let mut enricher = Enricher::new(Resolver::new(&service, "pl", WRITTEN_WORK));
        let viaf = "https://viaf.org/viaf/5/";
        enricher.resolve(&record(viaf, "Lalka", viaf), "[1/1]");
        assert_eq!(service.calls.get(), 2);
    }

    #[test]
    fn title_key_is_trimmed() {
        let service = Empty::default();
        let mut enricher = Enricher::new(Resolver::new(&service, "pl", WRITTEN_WORK));
        enricher.resolve(&record("", "Lalka", ""), "[1/2]");
        enricher.resolve(&record("", " Lalka ", ""), "[2/2]");
        assert_eq!(service.calls.get(), 1);
        assert!(
            enricher
                .cache()
                .works
                .contains(&WorkKey::Title("Lalka".to_string()))
        );
    }

    #[test]
    fn summary_rates() {
        let s = Summary {
            rows: 4,
            processed: 4,
            authors_matched: 3,
            works_matched: 1,
            author_lookups: 2,
            work_lookups: 4,
            remote_queries: 7,
            elapsed: Duration::ZERO,
        };
        assert!((s.author_rate() - 75.0).abs() < 1e-9);
        assert!((s.work_rate() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn counted_passes_through_and_counts() {
        let service = Counted::new(Empty::default());
        service.select("SELECT 1", "a");
        service.select("SELECT 2", "b");
        assert_eq!(service.queries.get(), 2);
        assert_eq!(service.inner.calls.get(), 2);
    }
}
