//! Title normalization for label matching

/// Cell values that stand for a missing title.
pub const MISSING_PLACEHOLDERS: [&str; 3] = ["", "NA", "nan"];

/// Cut a title at its first subtitle separator (`:` or `;`) and trim
/// surrounding whitespace, dots and commas.
///
/// `"Coningsby: or, The New Generation"` becomes `"Coningsby"`.
pub fn normalize_title(title: &str) -> &str {
    let head = title.split([':', ';']).next().unwrap_or(title);
    head.trim_matches(|c: char| c.is_whitespace() || c == '.' || c == ',')
}

/// Whether a (trimmed) title cell holds an actual title.
pub fn is_present(title: &str) -> bool {
    !MISSING_PLACEHOLDERS.contains(&title)
}
