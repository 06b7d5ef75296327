//! Pairing value objects: sessions, price tiers, recommendations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Quick-select refinement instructions offered by the client. Free text is
/// equally valid; these are passed through verbatim like any other
/// instruction.
pub const QUICK_REFINEMENTS: [&str; 5] = ["Lighter", "Bolder", "Cheaper", "Red only", "White only"];

/// Opaque token identifying one generate-then-refine chain.
///
/// Minted on the first successful generation and carried by the client
/// across refinement calls. No server-side state hangs off it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a new random SessionId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a SessionId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Which captured document a set of pages belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageDocument {
    Menu,
    WineList,
}

impl ImageDocument {
    /// Label used in prompts and upload object names.
    pub fn label(&self) -> &'static str {
        match self {
            ImageDocument::Menu => "Food Menu",
            ImageDocument::WineList => "Wine List",
        }
    }

    /// Short slug used in uploaded object names.
    pub fn slug(&self) -> &'static str {
        match self {
            ImageDocument::Menu => "menu",
            ImageDocument::WineList => "wine",
        }
    }
}

/// Ordinal price tier rendered as currency-symbol repetition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriceIndicator {
    #[serde(rename = "£")]
    Low,
    #[serde(rename = "££")]
    Mid,
    #[serde(rename = "£££")]
    High,
}

impl PriceIndicator {
    /// The rendered symbol for this tier.
    pub fn symbol(&self) -> &'static str {
        match self {
            PriceIndicator::Low => "£",
            PriceIndicator::Mid => "££",
            PriceIndicator::High => "£££",
        }
    }

    /// Lenient coercion from model output: anything outside the three
    /// canonical symbols defaults to the middle tier rather than failing.
    pub fn coerce(value: &str) -> Self {
        match value {
            "£" => PriceIndicator::Low,
            "££" => PriceIndicator::Mid,
            "£££" => PriceIndicator::High,
            _ => PriceIndicator::Mid,
        }
    }
}

impl fmt::Display for PriceIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Coerces a model-supplied rank: only 1, 2 or 3 survive, anything else
/// defaults to 1. Lenient by design - availability over strictness.
pub(crate) fn coerce_rank(value: i64) -> u8 {
    match value {
        1..=3 => value as u8,
        _ => 1,
    }
}

/// One ranked food/wine pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Dish named verbatim from the menu image(s).
    pub food_name: String,
    /// Wine named verbatim from the wine list image(s).
    pub wine_name: String,
    /// 2-3 sentences on why the pairing works for taste and value.
    pub reasoning: String,
    /// Price tier of the pairing.
    pub price_indicator: PriceIndicator,
    /// Rank within the set, 1 to 3.
    pub rank: u8,
}

/// The normalized output of one generation or refinement turn: exactly
/// three recommendations bound to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingSet {
    pub recommendations: Vec<Recommendation>,
    pub session_id: SessionId,
}
