//! Author and work resolution strategies

use crate::client::{QueryService, first_qid};
use crate::sparql::{self, ITEM_VAR};
use crate::title::normalize_title;

/// Resolves VIAF ids and titles to QIDs through a [`QueryService`].
pub struct Resolver<S> {
    service: S,
    lang: String,
    work_class: String,
}

impl<S: QueryService> Resolver<S> {
    /// `lang` is the label language tag, `work_class` the QID that bounds
    /// the type-scoped title search. Both must already be validated.
    pub fn new(service: S, lang: impl Into<String>, work_class: impl Into<String>) -> Self {
        Self {
            service,
            lang: lang.into(),
            work_class: work_class.into(),
        }
    }

    /// Item carrying this VIAF id. Used for authors and for works with a VIAF id.
    pub fn by_viaf(&self, viaf_id: &str) -> Option<String> {
        let bindings = self.service.select(&sparql::by_viaf(viaf_id), viaf_id);
        first_qid(&bindings, ITEM_VAR)
    }

    /// Resolve a literary work, most precise strategy first:
    ///
    /// 1. VIAF id, when given. Titles are not consulted at all.
    /// 2. Normalized title label + author (P50), when the author is known.
    /// 3. Normalized title label, scoped to the work class.
    /// 4. Full title label, scoped to the work class, when it differs from
    ///    the normalized one. No author constraint here.
    pub fn work(
        &self,
        title: &str,
        viaf_id: Option<&str>,
        author_qid: Option<&str>,
    ) -> Option<String> {
        if let Some(viaf_id) = viaf_id {
            return self.by_viaf(viaf_id);
        }

        let title = title.trim();
        let short = normalize_title(title);

        if let Some(author_qid) = author_qid {
            if let Some(qid) = self.by_label_and_author(short, author_qid) {
                return Some(qid);
            }
        }

        if let Some(qid) = self.by_label_in_class(short) {
            return Some(qid);
        }

        if short != title {
            return self.by_label_in_class(title);
        }
        None
    }

    fn by_label_and_author(&self, label: &str, author_qid: &str) -> Option<String> {
        if label.is_empty() {
            return None;
        }
        let Some(query) = sparql::by_label_and_author(label, &self.lang, author_qid) else {
            log::debug!("Skipping author-constrained search: {author_qid:?} is not a QID");
            return None;
        };
        first_qid(&self.service.select(&query, label), ITEM_VAR)
    }

    fn by_label_in_class(&self, label: &str) -> Option<String> {
        if label.is_empty() {
            return None;
        }
        let query = sparql::by_label_and_class(label, &self.lang, &self.work_class);
        first_qid(&self.service.select(&query, label), ITEM_VAR)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;
    use crate::client::{Binding, BindingValue};

    /// Answers by substring match on the query text and records every query.
    #[derive(Default)]
    struct Scripted {
        answers: Vec<(Vec<&'static str>, Vec<&'static str>)>,
        seen: RefCell<Vec<String>>,
    }

    impl Scripted {
        /// Rows `qids` for any query containing every needle.
        fn on(mut self, needles: &[&'static str], qids: &[&'static str]) -> Self {
            self.answers.push((needles.to_vec(), qids.to_vec()));
            self
        }

        fn calls(&self) -> usize {
            self.seen.borrow().len()
        }

        fn any_query_contains(&self, needle: &str) -> bool {
            self.seen.borrow().iter().any(|q| q.contains(needle))
        }
    }

    impl QueryService for Scripted {
        fn select(&self, query: &str, _label: &str) -> Vec<Binding> {
            self.seen.borrow_mut().push(query.to_string());
            self.answers
                .iter()
                .find(|(needles, _)| needles.iter().all(|n| query.contains(n)))
                .map(|(_, qids)| {
                    qids.iter()
                        .map(|q| {
                            HashMap::from([(
                                "item".to_string(),
                                BindingValue::new(format!("http://www.wikidata.org/entity/{q}")),
                            )])
                        })
                        .collect()
                })
                .unwrap_or_default()
        }
    }

    fn resolver(s: &Scripted) -> Resolver<&Scripted> {
        Resolver::new(s, "pl", sparql::WRITTEN_WORK)
    }

    #[test]
    fn author_by_viaf() {
        let s = Scripted::default().on(&["wdt:P214 \"111\""], &["Q1"]);
        assert_eq!(resolver(&s).by_viaf("111"), Some("Q1".to_string()));
        assert_eq!(resolver(&s).by_viaf("222"), None);
    }

    #[test]
    fn work_viaf_bypasses_title_matching() {
        let s = Scripted::default()
            .on(&["wdt:P214 \"500\""], &["Q50"])
            .on(&["rdfs:label"], &["Q99"]);
        let r = resolver(&s);
        assert_eq!(r.work("Lalka", Some("500"), Some("Q1")), Some("Q50".to_string()));
        assert_eq!(s.calls(), 1);
        assert!(!s.any_query_contains("rdfs:label"));
    }

    #[test]
    fn unresolved_work_viaf_does_not_fall_back() {
        let s = Scripted::default().on(&["rdfs:label"], &["Q99"]);
        assert_eq!(resolver(&s).work("Lalka", Some("500"), None), None);
        assert_eq!(s.calls(), 1);
    }

    #[test]
    fn author_constraint_disambiguates() {
        // Two works share the label; only Q2 is by Q1
        let s = Scripted::default()
            .on(&["\"Lalka\"@pl", "wdt:P50 wd:Q1"], &["Q2"])
            .on(&["\"Lalka\"@pl", "wdt:P279*"], &["Q3", "Q2"]);
        assert_eq!(resolver(&s).work("Lalka", None, Some("Q1")), Some("Q2".to_string()));
        assert_eq!(s.calls(), 1);
    }

    #[test]
    fn falls_back_to_class_scoped_search() {
        let s = Scripted::default().on(&["\"Faraon\"@pl", "wdt:P279* wd:Q7725634"], &["Q4"]);
        assert_eq!(resolver(&s).work("Faraon", None, Some("Q1")), Some("Q4".to_string()));
        assert_eq!(s.calls(), 2);
    }

    #[test]
    fn unknown_author_skips_constrained_search() {
        let s = Scripted::default().on(&["\"Faraon\"@pl", "wdt:P279*"], &["Q4"]);
        assert_eq!(resolver(&s).work("Faraon", None, None), Some("Q4".to_string()));
        assert_eq!(s.calls(), 1);
        assert!(!s.any_query_contains("wdt:P50"));
    }

    #[test]
    fn retries_full_title_when_normalized_differs() {
        let s = Scripted::default().on(&["\"Chłopi: powieść\"@pl", "wdt:P279*"], &["Q5"]);
        let r = resolver(&s);
        assert_eq!(r.work("Chłopi: powieść", None, Some("Q1")), Some("Q5".to_string()));
        // constrained + class-scoped on "Chłopi", then class-scoped on the full title
        assert_eq!(s.calls(), 3);
    }

    #[test]
    fn full_title_retry_is_not_author_constrained() {
        let s = Scripted::default();
        resolver(&s).work("Chłopi: powieść", None, Some("Q1"));
        let seen = s.seen.borrow();
        let last = seen.last().unwrap();
        assert!(last.contains("\"Chłopi: powieść\"@pl"));
        assert!(!last.contains("wdt:P50"));
        assert!(last.contains("wdt:P279*"));
    }

    #[test]
    fn no_retry_when_title_has_no_subtitle() {
        let s = Scripted::default();
        assert_eq!(resolver(&s).work("Pan Tadeusz", None, None), None);
        assert_eq!(s.calls(), 1);
    }

    #[test]
    fn quotes_in_title_are_escaped() {
        let s = Scripted::default();
        resolver(&s).work(r#"Pan "Wołodyjowski""#, None, None);
        assert!(s.any_query_contains(r#""Pan \"Wołodyjowski\""@pl"#));
    }

    #[test]
    fn malformed_author_qid_is_skipped() {
        let s = Scripted::default();
        resolver(&s).work("Lalka", None, Some("Q1 } #"));
        assert_eq!(s.calls(), 1);
        assert!(!s.any_query_contains("wdt:P50"));
    }
}
