//! Category color helpers: hex parsing, RGB distance, and near-duplicate
//! detection.
//!
//! Similarity is plain Euclidean distance in RGB space. The maximum possible
//! distance (black to white) is about 441, so the default threshold of 50
//! flags colors that are hard to tell apart at a glance. Callers use the
//! result to warn, never to block.

use rand::Rng;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Distance at or below which two colors count as similar.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 50.0;

// ---------------------------------------------------------------------------
// Rgb
// ---------------------------------------------------------------------------

/// An 8-bit-per-channel RGB triple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
}

/// Parse a `RRGGBB` color, case-insensitive, with an optional leading `#`.
///
/// Anything else (short form, alpha channel, stray characters) maps to
/// black instead of failing.
pub fn to_comparable(hex: &str) -> Rgb {
    parse_hex(hex).unwrap_or(Rgb::BLACK)
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

/// Euclidean distance between two colors in RGB space.
pub fn distance(a: Rgb, b: Rgb) -> f64 {
    let dr = f64::from(a.r) - f64::from(b.r);
    let dg = f64::from(a.g) - f64::from(b.g);
    let db = f64::from(a.b) - f64::from(b.b);
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Returns `true` if the two hex colors are within `threshold` of each other.
pub fn is_similar(a: &str, b: &str, threshold: f64) -> bool {
    distance(to_comparable(a), to_comparable(b)) <= threshold
}

/// All entries of `existing` that are similar to `candidate`, in input order.
pub fn find_similar<S: AsRef<str>>(candidate: &str, existing: &[S], threshold: f64) -> Vec<String> {
    existing
        .iter()
        .map(AsRef::as_ref)
        .filter(|color| is_similar(candidate, color, threshold))
        .map(str::to_string)
        .collect()
}

/// A uniformly random `#rrggbb` color, used to pre-fill a color picker.
pub fn random_color() -> String {
    let value: u32 = rand::rng().random_range(0..=0x00FF_FFFF);
    format!("#{value:06x}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
