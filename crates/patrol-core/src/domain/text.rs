//! Text helpers for deriving slugs, excerpts and reading times from content.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Words read per minute when estimating reading time.
pub const WORDS_PER_MINUTE: usize = 200;

/// Characters of content kept in a derived excerpt.
pub const EXCERPT_CHARS: usize = 200;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is a valid regex"));

/// Lower-case, strip diacritics, collapse every run of non `[a-z0-9]` into a
/// single hyphen and trim hyphens at both ends.
pub fn slugify(title: &str) -> String {
    let folded: String = title
        .to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect();

    let mut slug = String::with_capacity(folded.len());
    let mut pending_hyphen = false;
    for c in folded.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Remove anything that looks like an HTML tag.
pub fn strip_tags(html: &str) -> String {
    TAG_PATTERN.replace_all(html, "").into_owned()
}

/// First [`EXCERPT_CHARS`] characters of the content, tags stripped, with an ellipsis.
pub fn derive_excerpt(content: &str) -> String {
    let head: String = content.chars().take(EXCERPT_CHARS).collect();
    format!("{}...", strip_tags(&head))
}

pub fn word_count(html: &str) -> usize {
    strip_tags(html).split_whitespace().count()
}

/// Minutes needed to read the content, rounded up.
pub fn reading_time(html: &str) -> usize {
    word_count(html).div_ceil(WORDS_PER_MINUTE)
}
