//! Client portal addressing.
//!
//! Every client gets a read-only portal reachable at
//! `{PORTAL_BASE_URL}/{slug}`, where the slug is derived from the client's
//! company name when the client is created and kept stable afterwards.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Maximum slug length in characters.
pub const MAX_SLUG_LEN: usize = 64;

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("static regex is valid"));

/// Derive a URL slug from a company name.
///
/// Lowercases, collapses every run of non-alphanumeric characters into a
/// single `-`, and trims dashes from both ends.
pub fn company_slug(company: &str) -> Result<String, CoreError> {
    let lowered = company.trim().to_lowercase();
    let slug = NON_SLUG_CHARS.replace_all(&lowered, "-");
    let slug: String = slug.trim_matches('-').chars().take(MAX_SLUG_LEN).collect();
    let slug = slug.trim_end_matches('-').to_string();

    if slug.is_empty() {
        return Err(CoreError::Validation(format!(
            "Company name '{company}' does not produce a usable portal address"
        )));
    }
    Ok(slug)
}

/// First slug derived from `base` that is not in `taken`.
///
/// `base` itself when free, otherwise `base-2`, `base-3`, and so on, with
/// `base` shortened so the result stays within [`MAX_SLUG_LEN`].
pub fn free_slug(base: &str, taken: &[String]) -> String {
    let is_taken = |candidate: &str| taken.iter().any(|t| t == candidate);
    if !is_taken(base) {
        return base.to_string();
    }

    let mut n: u32 = 2;
    loop {
        let suffix = format!("-{n}");
        let stem_len = base.len().min(MAX_SLUG_LEN.saturating_sub(suffix.len()));
        let stem = base.get(..stem_len).unwrap_or(base).trim_end_matches('-');
        let candidate = format!("{stem}{suffix}");
        if !is_taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Public portal URL for a slug.
pub fn portal_url(base_url: &str, slug: &str) -> String {
    format!("{}/{slug}", base_url.trim_end_matches('/'))
}
