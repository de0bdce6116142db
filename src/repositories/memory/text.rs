//! Word-level matching standing in for a MongoDB text index.
//!
//! Both sides are split on non-word characters, lowercased and reduced by a
//! crude suffix stemmer. A document matches when any query term equals any
//! indexed term, which is how `$text` treats a multi-word `$search`.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\w+").unwrap();
}

const SUFFIXES: [&str; 3] = ["ing", "ed", "s"];

fn stem(word: &str) -> String {
    for suffix in SUFFIXES.iter() {
        if let Some(base) = word.strip_suffix(suffix) {
            if base.chars().count() >= 3 && !(*suffix == "s" && base.ends_with('s')) {
                return base.to_string();
            }
        }
    }

    word.to_string()
}

pub fn terms(text: &str) -> HashSet<String> {
    WORD.find_iter(text)
        .map(|m| stem(&m.as_str().to_lowercase()))
        .collect()
}

pub fn matches<'a>(query: &str, fields: impl IntoIterator<Item = &'a str>) -> bool {
    let wanted = terms(query);
    if wanted.is_empty() {
        return false;
    }

    fields
        .into_iter()
        .flat_map(terms)
        .any(|t| wanted.contains(&t))
}
