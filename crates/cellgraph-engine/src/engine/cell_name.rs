//! Cell name parsing and normalization.
//!
//! A cell name (and a formula variable) is one or more ASCII letters followed by
//! one or more ASCII digits, e.g. "A1", "bc27", "longName9". Names are case
//! insensitive; the canonical form is upper case.
//!
//! # Examples
//!
//! ```
//! use cellgraph_engine::engine::{canonical_name, is_valid_name};
//!
//! assert!(is_valid_name("a1"));
//! assert!(!is_valid_name("1a"));
//! assert_eq!(canonical_name("bc27").as_deref(), Some("BC27"));
//! ```

use regex::Regex;
use std::sync::OnceLock;

/// Unanchored variable pattern, shared with the formula tokenizer.
pub(crate) const VARIABLE_PATTERN: &str = r"[a-zA-Z]+[0-9]+";

fn standalone_name_re() -> &'static Regex {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    NAME_RE.get_or_init(|| {
        Regex::new(&format!("^{VARIABLE_PATTERN}$")).expect("cell name regex must compile")
    })
}

/// Returns true if `name` matches the variable grammar.
pub fn is_valid_name(name: &str) -> bool {
    standalone_name_re().is_match(name)
}

/// Validate and upper-case a cell name.
/// Returns None if the input is not a valid name.
pub fn canonical_name(name: &str) -> Option<String> {
    is_valid_name(name).then(|| name.to_ascii_uppercase())
}
