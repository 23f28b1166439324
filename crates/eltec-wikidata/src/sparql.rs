//! SPARQL text for the three lookups.
//!
//! Every user-supplied string goes through [`escape_literal`] here and only
//! here. Entity ids interpolated as `wd:` terms must pass [`is_qid`].

/// VIAF ID
pub const PROP_VIAF: &str = "P214";
/// author
pub const PROP_AUTHOR: &str = "P50";
/// instance of
pub const PROP_INSTANCE_OF: &str = "P31";
/// subclass of
pub const PROP_SUBCLASS_OF: &str = "P279";
/// written work
pub const WRITTEN_WORK: &str = "Q7725634";

/// Result variable every query binds.
pub const ITEM_VAR: &str = "item";

/// Escape a string for use inside a double-quoted SPARQL literal.
pub fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// `Q` followed by digits only.
pub fn is_qid(s: &str) -> bool {
    s.strip_prefix('Q')
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// BCP 47-ish language tag: alphanumeric subtags joined by `-`.
pub fn is_lang_tag(s: &str) -> bool {
    !s.is_empty()
        && s.split('-')
            .all(|sub| !sub.is_empty() && sub.bytes().all(|b| b.is_ascii_alphanumeric()))
}

/// Item whose VIAF ID equals `viaf_id`.
pub fn by_viaf(viaf_id: &str) -> String {
    format!(
        "SELECT ?{ITEM_VAR} WHERE {{\n  ?{ITEM_VAR} wdt:{PROP_VIAF} \"{}\" .\n}} LIMIT 1",
        escape_literal(viaf_id)
    )
}

/// Item labelled `label` in `lang` whose author is `author_qid`.
///
/// Returns `None` if `author_qid` is not a plain QID.
pub fn by_label_and_author(label: &str, lang: &str, author_qid: &str) -> Option<String> {
    if !is_qid(author_qid) {
        return None;
    }
    Some(format!(
        "SELECT ?{ITEM_VAR} WHERE {{\n  ?{ITEM_VAR} rdfs:label \"{}\"@{lang} ;\n        wdt:{PROP_AUTHOR} wd:{author_qid} .\n}} LIMIT 1",
        escape_literal(label)
    ))
}

/// Item labelled `label` in `lang` that is an instance of `class_qid` or of
/// any of its subclasses.
pub fn by_label_and_class(label: &str, lang: &str, class_qid: &str) -> String {
    format!(
        "SELECT ?{ITEM_VAR} WHERE {{\n  ?{ITEM_VAR} rdfs:label \"{}\"@{lang} .\n  ?{ITEM_VAR} wdt:{PROP_INSTANCE_OF}/wdt:{PROP_SUBCLASS_OF}* wd:{class_qid} .\n}} LIMIT 1",
        escape_literal(label)
    )
}
