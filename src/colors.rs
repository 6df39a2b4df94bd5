//! Display color palette and the legacy hex compatibility shim.
//!
//! Records persist their color as a free string so that values written by
//! older releases (raw hex literals) survive round-trips unchanged.
//! Resolution to a palette key happens here, at projection time.

use serde::{Deserialize, Serialize};

/// Named palette keys understood by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorKey {
    Blue,
    Green,
    Red,
    Orange,
    Purple,
    Pink,
    Teal,
    Yellow,
}

/// Fallback when a stored value resolves to nothing.
pub const BASELINE: ColorKey = ColorKey::Blue;

impl ColorKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Teal => "teal",
            Self::Yellow => "yellow",
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            Self::Blue => "#3b82f6",
            Self::Green => "#22c55e",
            Self::Red => "#ef4444",
            Self::Orange => "#f97316",
            Self::Purple => "#a855f7",
            Self::Pink => "#ec4899",
            Self::Teal => "#14b8a6",
            Self::Yellow => "#eab308",
        }
    }
}

/// Hex literals written by earlier releases, mapped back to palette keys.
/// Includes the current palette hexes plus the pre-rebrand values.
const LEGACY_HEX: &[(&str, ColorKey)] = &[
    ("#3b82f6", ColorKey::Blue),
    ("#22c55e", ColorKey::Green),
    ("#ef4444", ColorKey::Red),
    ("#f97316", ColorKey::Orange),
    ("#a855f7", ColorKey::Purple),
    ("#ec4899", ColorKey::Pink),
    ("#14b8a6", ColorKey::Teal),
    ("#eab308", ColorKey::Yellow),
    // Pre-rebrand palette
    ("#4a90d9", ColorKey::Blue),
    ("#2e7d32", ColorKey::Green),
    ("#c62828", ColorKey::Red),
    ("#ef6c00", ColorKey::Orange),
    ("#6a1b9a", ColorKey::Purple),
    ("#ad1457", ColorKey::Pink),
    ("#00897b", ColorKey::Teal),
    ("#f9a825", ColorKey::Yellow),
];

/// Resolve a stored color value to a palette key.
///
/// Accepts a named key (case-insensitive) or a legacy hex literal; anything
/// unrecognized resolves to [`BASELINE`].
pub fn resolve(stored: &str) -> ColorKey {
    let normalized = stored.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "blue" => return ColorKey::Blue,
        "green" => return ColorKey::Green,
        "red" => return ColorKey::Red,
        "orange" => return ColorKey::Orange,
        "purple" => return ColorKey::Purple,
        "pink" => return ColorKey::Pink,
        "teal" => return ColorKey::Teal,
        "yellow" => return ColorKey::Yellow,
        _ => {}
    }
    if normalized.starts_with('#') {
        if let Some((_, key)) = LEGACY_HEX.iter().find(|(hex, _)| *hex == normalized) {
            return *key;
        }
    }
    BASELINE
}
