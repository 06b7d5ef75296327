//! User dining preference profile.
//!
//! A single mutable record per user, with no history. Allergies are the
//! hard safety constraint: the prompt contract requires them to be framed
//! as MUST AVOID, and the validator logs any recommendation that appears
//! to mention one.

use serde::{Deserialize, Serialize};

/// How price-conscious the user is.
///
/// Rendered into the system prompt verbatim; the model calibrates the
/// price tier of its recommendations against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PriceSensitivity {
    /// Cheapest good options.
    Budget,
    /// Mid-range options.
    #[default]
    Moderate,
    /// Best options regardless of price.
    Premium,
}

impl PriceSensitivity {
    /// Returns the lowercase string used in prompts and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceSensitivity::Budget => "budget",
            PriceSensitivity::Moderate => "moderate",
            PriceSensitivity::Premium => "premium",
        }
    }
}

impl std::fmt::Display for PriceSensitivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PriceSensitivity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "budget" => Ok(PriceSensitivity::Budget),
            "moderate" => Ok(PriceSensitivity::Moderate),
            "premium" => Ok(PriceSensitivity::Premium),
            other => Err(format!("unknown price sensitivity: {other}")),
        }
    }
}

/// The user's dining preferences.
///
/// Free-text entries (cuisine styles, allergies, dislikes) are lowercased
/// on construction so prompt rendering and the allergen scan are
/// case-insensitive by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceProfile {
    /// Cuisine styles the user enjoys.
    pub cuisine_styles: Vec<String>,
    /// Price sensitivity tier.
    pub price_sensitivity: PriceSensitivity,
    /// Allergies - hard safety constraint, never to appear in output.
    pub allergies: Vec<String>,
    /// Items the user dislikes - soft constraint.
    pub dislikes: Vec<String>,
}

impl PreferenceProfile {
    /// Creates a profile, lowercasing and trimming all free-text entries.
    ///
    /// Empty entries are dropped so sentinels like "None" render correctly
    /// in the prompt.
    pub fn new(
        cuisine_styles: Vec<String>,
        price_sensitivity: PriceSensitivity,
        allergies: Vec<String>,
        dislikes: Vec<String>,
    ) -> Self {
        Self {
            cuisine_styles: normalize_entries(cuisine_styles),
            price_sensitivity,
            allergies: normalize_entries(allergies),
            dislikes: normalize_entries(dislikes),
        }
    }

    /// Returns true when no allergy is declared.
    pub fn has_allergies(&self) -> bool {
        !self.allergies.is_empty()
    }
}

impl Default for PreferenceProfile {
    /// The profile returned for a user with no saved record: moderate
    /// price sensitivity and empty lists.
    fn default() -> Self {
        Self {
            cuisine_styles: Vec::new(),
            price_sensitivity: PriceSensitivity::Moderate,
            allergies: Vec::new(),
            dislikes: Vec::new(),
        }
    }
}

fn normalize_entries(entries: Vec<String>) -> Vec<String> {
    entries
        .into_iter()
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}
