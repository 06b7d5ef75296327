//! Response Validator & Normalizer.
//!
//! Turns the model's untrusted text blob into a typed, contract-satisfying
//! [`PairingSet`], or a typed failure. Normalization is lenient by design:
//! an out-of-set price indicator defaults to the middle tier and an
//! out-of-range rank defaults to 1, favoring a usable answer over failing
//! outright on minor format drift. There is no enforcement that ranks are
//! distinct or that names are non-empty.

use serde::Deserialize;
use tracing::warn;

use crate::domain::{
    PairingError, PairingSet, PriceIndicator, Recommendation, SessionId,
};

/// Wire shape of the model's JSON payload. Every field is defaulted so
/// partial drift normalizes instead of failing.
#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    recommendations: Option<Vec<RawRecommendation>>,
}

#[derive(Debug, Deserialize)]
struct RawRecommendation {
    #[serde(default)]
    food_name: String,
    #[serde(default)]
    wine_name: String,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    price_indicator: String,
    #[serde(default)]
    rank: i64,
}

/// Parses and normalizes a raw model response.
///
/// Reuses the caller-supplied session id on refinement; mints a fresh one
/// on first generation.
pub fn normalize_response(
    raw: &str,
    existing_session: Option<SessionId>,
) -> Result<PairingSet, PairingError> {
    let payload = strip_code_fence(raw);

    let parsed: RawResponse = serde_json::from_str(payload).map_err(|e| {
        warn!(error = %e, raw_response = raw, "failed to parse model response");
        PairingError::MalformedResponse
    })?;

    if parsed.error.as_deref() == Some("unreadable") {
        return Err(PairingError::UnreadableInput {
            message: parsed.message.unwrap_or_default(),
        });
    }

    let raw_recommendations = match parsed.recommendations {
        Some(recs) if !recs.is_empty() => recs,
        _ => return Err(PairingError::EmptyRecommendations),
    };

    let recommendations = raw_recommendations
        .into_iter()
        .map(|rec| Recommendation {
            food_name: rec.food_name,
            wine_name: rec.wine_name,
            reasoning: rec.reasoning,
            price_indicator: PriceIndicator::coerce(&rec.price_indicator),
            rank: crate::domain::coerce_rank(rec.rank),
        })
        .collect();

    Ok(PairingSet {
        recommendations,
        session_id: existing_session.unwrap_or_else(SessionId::new),
    })
}

/// Case-insensitive substring scan of an accepted set against the declared
/// allergy list. Detection is logged, never enforced: the prompt remains
/// the authoritative allergen defense and user-visible behavior is
/// unchanged. Returns the hits for test inspection.
pub fn scan_for_allergen_mentions(
    set: &PairingSet,
    allergies: &[String],
) -> Vec<(usize, String)> {
    let mut hits = Vec::new();
    for (i, rec) in set.recommendations.iter().enumerate() {
        for allergen in allergies {
            let allergen_lower = allergen.to_lowercase();
            let mentioned = [&rec.food_name, &rec.wine_name, &rec.reasoning]
                .iter()
                .any(|field| field.to_lowercase().contains(&allergen_lower));
            if mentioned {
                warn!(
                    rank = rec.rank,
                    food = %rec.food_name,
                    allergen = %allergen,
                    "accepted recommendation mentions a declared allergen"
                );
                hits.push((i, allergen.clone()));
            }
        }
    }
    hits
}

/// Strips an optional fenced code block around the payload. The model
/// sometimes wraps JSON in a delimited block, with or without a language
/// tag.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        if let Some(end) = after.find("```") {
            return after[..end].trim();
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn well_formed_payload() -> String {
        r#"{
            "recommendations": [
                {"food_name": "Duck Confit", "wine_name": "Pinot Noir", "reasoning": "Earthy match.", "price_indicator": "££", "rank": 1},
                {"food_name": "Sea Bass", "wine_name": "Chablis", "reasoning": "Bright acidity.", "price_indicator": "£", "rank": 2},
                {"food_name": "Ribeye", "wine_name": "Malbec", "reasoning": "Bold tannins.", "price_indicator": "£££", "rank": 3}
            ]
        }"#
        .to_string()
    }

    #[test]
    fn well_formed_response_passes_without_coercion() {
        let set = normalize_response(&well_formed_payload(), None).unwrap();

        assert_eq!(set.recommendations.len(), 3);
        let mut ranks: Vec<u8> = set.recommendations.iter().map(|r| r.rank).collect();
        ranks.sort();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(set.recommendations[0].food_name, "Duck Confit");
        assert_eq!(set.recommendations[0].price_indicator, PriceIndicator::Mid);
        assert_eq!(set.recommendations[1].price_indicator, PriceIndicator::Low);
        assert_eq!(set.recommendations[2].price_indicator, PriceIndicator::High);
    }

    #[test]
    fn fenced_payload_is_unwrapped() {
        let fenced = format!("```json\n{}\n```", well_formed_payload());
        let set = normalize_response(&fenced, None).unwrap();
        assert_eq!(set.recommendations.len(), 3);

        let fenced_plain = format!("```\n{}\n```", well_formed_payload());
        let set = normalize_response(&fenced_plain, None).unwrap();
        assert_eq!(set.recommendations.len(), 3);
    }

    #[test]
    fn fenced_payload_with_surrounding_prose_is_unwrapped() {
        let wrapped = format!(
            "Here are your pairings:\n```json\n{}\n```\nEnjoy!",
            well_formed_payload()
        );
        let set = normalize_response(&wrapped, None).unwrap();
        assert_eq!(set.recommendations.len(), 3);
    }

    #[test]
    fn out_of_set_price_indicator_coerces_to_mid() {
        let raw = r#"{"recommendations": [
            {"food_name": "A", "wine_name": "B", "reasoning": "C", "price_indicator": "$$", "rank": 1}
        ]}"#;
        let set = normalize_response(raw, None).unwrap();
        assert_eq!(set.recommendations[0].price_indicator, PriceIndicator::Mid);
    }

    #[test]
    fn out_of_range_rank_coerces_to_one() {
        let raw = r#"{"recommendations": [
            {"food_name": "A", "wine_name": "B", "reasoning": "C", "price_indicator": "£", "rank": 5},
            {"food_name": "D", "wine_name": "E", "reasoning": "F", "price_indicator": "£", "rank": 0}
        ]}"#;
        let set = normalize_response(raw, None).unwrap();
        assert_eq!(set.recommendations[0].rank, 1);
        assert_eq!(set.recommendations[1].rank, 1);
    }

    #[test]
    fn missing_fields_default_instead_of_failing() {
        let raw = r#"{"recommendations": [{"food_name": "A"}]}"#;
        let set = normalize_response(raw, None).unwrap();
        let rec = &set.recommendations[0];
        assert_eq!(rec.food_name, "A");
        assert_eq!(rec.wine_name, "");
        assert_eq!(rec.price_indicator, PriceIndicator::Mid);
        assert_eq!(rec.rank, 1);
    }

    #[test]
    fn unreadable_sentinel_raises_distinct_failure() {
        let raw = r#"{"error": "unreadable", "message": "too dark"}"#;
        let err = normalize_response(raw, None).unwrap_err();
        match err {
            PairingError::UnreadableInput { message } => assert_eq!(message, "too dark"),
            other => panic!("expected UnreadableInput, got {other:?}"),
        }
    }

    #[test]
    fn non_json_is_malformed() {
        let err = normalize_response("I'd suggest the duck!", None).unwrap_err();
        assert!(matches!(err, PairingError::MalformedResponse));
    }

    #[test]
    fn missing_or_empty_recommendations_raise_empty_failure() {
        for raw in [r#"{}"#, r#"{"recommendations": []}"#] {
            let err = normalize_response(raw, None).unwrap_err();
            assert!(matches!(err, PairingError::EmptyRecommendations));
        }
    }

    #[test]
    fn session_is_minted_on_generation_and_reused_on_refinement() {
        let minted = normalize_response(&well_formed_payload(), None).unwrap();
        let existing = SessionId::new();
        let reused = normalize_response(&well_formed_payload(), Some(existing)).unwrap();

        assert_ne!(minted.session_id, existing);
        assert_eq!(reused.session_id, existing);
    }

    #[test]
    fn allergen_scan_reports_case_insensitive_mentions() {
        let set = normalize_response(&well_formed_payload(), None).unwrap();
        let hits = scan_for_allergen_mentions(&set, &["DUCK".to_string()]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, 0);

        let none = scan_for_allergen_mentions(&set, &["peanut".to_string()]);
        assert!(none.is_empty());
    }

    proptest! {
        #[test]
        // Backticks excluded: a backtick run inside a field would read as a
        // code fence, which is the malformed-response path, not coercion.
        fn any_price_string_coerces_to_a_valid_tier(value in "[^`]*") {
            let raw = serde_json::json!({
                "recommendations": [{
                    "food_name": "A", "wine_name": "B", "reasoning": "C",
                    "price_indicator": value, "rank": 1
                }]
            })
            .to_string();
            let set = normalize_response(&raw, None).unwrap();
            let tier = set.recommendations[0].price_indicator;
            prop_assert!(matches!(
                tier,
                PriceIndicator::Low | PriceIndicator::Mid | PriceIndicator::High
            ));
        }

        #[test]
        fn any_rank_coerces_into_range(rank in any::<i64>()) {
            let raw = serde_json::json!({
                "recommendations": [{
                    "food_name": "A", "wine_name": "B", "reasoning": "C",
                    "price_indicator": "£", "rank": rank
                }]
            })
            .to_string();
            let set = normalize_response(&raw, None).unwrap();
            prop_assert!((1..=3).contains(&set.recommendations[0].rank));
        }
    }
}
