//! Media URL resolver for cnvsweb watch pages
//!
//! Depending on the player in use, the `.mp4` reference shows up as a
//! `<video><source>` element, as a known CDN URL inside a script, as a
//! JSON-ish `"file"`/`"src"` key, or just as a bare string somewhere in the
//! page. Each encoding is handled by one tier; tiers run in a fixed order
//! and the first hit wins.

use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use crate::error::{CnvsError, Result};

const MEDIA_MARKER: &str = ".mp4";

/// Known embedding conventions, most specific first
///
/// Only the first pattern that matches anything is used.
const PATTERN_BANK: [&str; 4] = [
    // player CDN hosts named server*
    r#"(?i)https?://server[^"\s]*?\.mp4[^"\s]*"#,
    // second CDN
    r#"(?i)https?://[^"\s]*playmycnvs[^"\s]*?\.mp4[^"\s]*"#,
    r#"(?i)"file"["\s]*:["\s]*"([^"]+\.mp4[^"]*)""#,
    r#"(?i)"src"["\s]*:["\s]*"([^"]+\.mp4[^"]*)""#,
];

/// Any absolute URL ending in the media extension
const ANY_MEDIA_URL: &str = r#"https?://[^\s<>"']+\.mp4[^\s<>"']*"#;

type Tier = fn(&str) -> Option<String>;

/// Resolver tiers in priority order
const TIERS: [(&str, Tier); 3] = [
    ("video-tag", extract_from_video_tags),
    ("pattern-bank", extract_from_pattern_bank),
    ("unconstrained", extract_any_media_url),
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parses a watch/player page and extracts the direct media URL
///
/// # Arguments
/// * `html` - Raw HTML of the watch page
///
/// # Returns
/// The first URL produced by the tiers, in order: `<video><source>` scan,
/// pattern bank, unconstrained scan.
///
/// # Errors
/// Returns `NotFound` if no tier produced a usable URL
pub fn parse_media_url(html: &str) -> Result<String> {
    for (name, tier) in TIERS {
        if let Some(url) = tier(html) {
            debug!(tier = name, url = %url, "media url resolved");
            return Ok(url);
        }
    }

    Err(CnvsError::NotFound(
        "Could not find a media URL in the watch page".to_string(),
    ))
}

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

/// Tier 1: first `<source>` inside a `<video>` whose `src` has the marker
fn extract_from_video_tags(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let video_sel = Selector::parse("video").ok()?;
    let source_sel = Selector::parse("source").ok()?;

    document
        .select(&video_sel)
        .flat_map(|video| video.select(&source_sel))
        .filter_map(|source| source.value().attr("src"))
        .find(|src| src.contains(MEDIA_MARKER))
        .map(str::to_string)
}

/// Tier 2: the first pattern of the bank that matches decides
///
/// Its first match (or first capture group) is cleaned up and must still
/// look like an absolute media URL; otherwise the tier gives up without
/// trying the remaining patterns.
fn extract_from_pattern_bank(html: &str) -> Option<String> {
    for pattern in PATTERN_BANK {
        let Ok(re) = Regex::new(pattern) else {
            continue;
        };

        let Some(caps) = re.captures(html) else {
            continue;
        };

        let raw = caps.get(1).or_else(|| caps.get(0))?.as_str();
        let candidate = normalize_url(
            raw.trim_matches(|c: char| matches!(c, '"' | '\'' | '\\'))
                .trim(),
        );

        if candidate.starts_with("http") && candidate.contains(MEDIA_MARKER) {
            return Some(candidate);
        }

        debug!(pattern, candidate = %candidate, "pattern bank match rejected");
        return None;
    }

    None
}

/// Tier 3: first absolute URL with the marker anywhere in the page
fn extract_any_media_url(html: &str) -> Option<String> {
    let re = Regex::new(ANY_MEDIA_URL).ok()?;

    re.find(html).map(|m| {
        normalize_url(m.as_str().trim_matches(|c: char| matches!(c, '"' | '\'' | '\\' | ',' | ';')))
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Undoes HTML entity and JSON slash escaping in URLs lifted from raw text
fn normalize_url(url: &str) -> String {
    url.replace("&amp;", "&").replace("\\/", "/")
}
