// src/audit/extract.rs
// =============================================================================
// This module extracts link targets from raw document bytes.
//
// We deliberately do NOT parse Markdown here. Any occurrence of the literal
// shape `](target)` counts, even inside code blocks or broken documents:
//
//   "See [the guide](start/guide) and [intro](/docs/intro)"
//        -> "start/guide", "/docs/intro"
//
// We use the `regex` crate's bytes API which:
// - Works on &[u8], so files that are not valid UTF-8 never fail
// - Returns matches left to right without overlapping
// - Gives us a lazy iterator (nothing is collected up front)
// =============================================================================

use regex::bytes::Regex;
use std::sync::OnceLock;

// `(?-u)` turns off Unicode mode so `[^)\n]` matches any single byte,
// including bytes that are not part of a valid UTF-8 sequence.
// A target never spans a line break.
const LINK_SHAPE: &str = r"(?-u)\]\(([^)\n]*)\)";

// Compiled once and shared by every scan
static LINK_REGEX: OnceLock<Regex> = OnceLock::new();

fn link_regex() -> &'static Regex {
    // LINK_SHAPE is a constant that is known to compile
    LINK_REGEX.get_or_init(|| Regex::new(LINK_SHAPE).expect("LINK_SHAPE is a valid regex"))
}

/// Yields the text inside the parentheses of every `](...)` occurrence.
///
/// The sequence is lazy and borrows `content`; calling this again on the same
/// bytes starts a fresh scan. Bytes that are not valid UTF-8 are replaced
/// with U+FFFD in the returned targets.
pub fn extract_links(content: &[u8]) -> impl Iterator<Item = String> + '_ {
    link_regex()
        .captures_iter(content)
        .filter_map(|captures| captures.get(1))
        .map(|target| String::from_utf8_lossy(target.as_bytes()).into_owned())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why regex::bytes instead of regex::Regex?
//    - regex::Regex only searches &str, which must be valid UTF-8
//    - Documentation trees contain the odd Latin-1 file or binary asset
//    - regex::bytes::Regex searches &[u8] and never fails on bad encoding
//
// 2. What is OnceLock?
//    - A cell that is written exactly once, the first time it is used
//    - Compiling a regex is slow, so we do it once instead of per file
//
// 3. What does `impl Iterator<Item = String> + '_` mean?
//    - We return "some iterator" without naming its exact type
//    - The '_ says the iterator borrows `content`, so it cannot outlive it
//    - Nothing is scanned until the caller asks for the next item
// -----------------------------------------------------------------------------
