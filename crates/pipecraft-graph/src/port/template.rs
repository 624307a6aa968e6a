//! `[[variable]]` placeholder extraction for text templates.

use std::ops::Range;
use std::sync::LazyLock;

use indexmap::IndexSet;
use regex::Regex;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\[\]]*)\]\]").expect("placeholder pattern is valid"));

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier pattern is valid")
});

/// A single `[[...]]` occurrence in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// Text between the brackets, untrimmed.
    pub name: &'a str,
    /// Byte range of the whole occurrence, brackets included.
    pub span: Range<usize>,
}

impl Placeholder<'_> {
    /// Returns whether the name is a valid variable identifier.
    #[inline]
    pub fn is_valid(&self) -> bool {
        is_identifier(self.name)
    }
}

/// Returns whether `name` is a letter, `_` or `$` followed by letters,
/// digits, `_` or `$`.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Scans `text` for every bracketed occurrence, valid or not.
pub fn scan(text: &str) -> impl Iterator<Item = Placeholder<'_>> {
    PLACEHOLDER.captures_iter(text).filter_map(|captures| {
        let whole = captures.get(0)?;
        let inner = captures.get(1)?;
        Some(Placeholder {
            name: inner.as_str(),
            span: whole.range(),
        })
    })
}

/// Returns the distinct valid variable names in order of first occurrence.
pub fn extract(text: &str) -> IndexSet<String> {
    scan(text)
        .filter(Placeholder::is_valid)
        .map(|placeholder| placeholder.name.to_owned())
        .collect()
}
