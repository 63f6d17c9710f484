// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Input sanitization for contact form text.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Maximum characters kept after sanitization.
pub const MAX_SANITIZED_LEN: usize = 5000;

fn tag_pattern() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"))
}

/// Strip markup tags, trim surrounding whitespace and cap the length at
/// [`MAX_SANITIZED_LEN`] characters.
///
/// Whitespace exposed by the cap is trimmed too, so sanitizing
/// already-sanitized text returns it unchanged.
pub fn sanitize(text: &str) -> String {
    let stripped: Cow<'_, str> = tag_pattern().replace_all(text, "");
    let trimmed = stripped.trim();

    match trimmed.char_indices().nth(MAX_SANITIZED_LEN) {
        Some((cut, _)) => trimmed[..cut].trim_end().to_string(),
        None => trimmed.to_string(),
    }
}
