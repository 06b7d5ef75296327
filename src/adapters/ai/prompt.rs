//! The deterministic prompt contract.
//!
//! Everything the model is told lives here, as pure string construction, so
//! the contract can be tested without a provider. The wording is part of
//! the system's behavior: the MUST AVOID framing of allergies, the
//! unreadable-image sentinel, and the exact JSON structure the validator
//! expects all come from these templates.

use crate::domain::{ImageDocument, PreferenceProfile, Recommendation};

/// The JSON structure the model is instructed to return.
const RESPONSE_STRUCTURE: &str = r#"{
  "recommendations": [
    {
      "food_name": "Exact dish name from the menu",
      "wine_name": "Exact wine name from the list",
      "reasoning": "2-3 sentences explaining why this pairing works for taste and value",
      "price_indicator": "£ or ££ or £££",
      "rank": 1
    },
    {
      "food_name": "...",
      "wine_name": "...",
      "reasoning": "...",
      "price_indicator": "...",
      "rank": 2
    },
    {
      "food_name": "...",
      "wine_name": "...",
      "reasoning": "...",
      "price_indicator": "...",
      "rank": 3
    }
  ]
}"#;

/// Renders the preference block embedded in every system prompt.
///
/// Empty lists render their sentinel ("No specific preference" for cuisine
/// styles, "None" for allergies and dislikes) so the model never sees an
/// empty slot. "MUST AVOID" immediately precedes the allergy list - that
/// framing is the hard safety constraint.
fn preference_block(preferences: &PreferenceProfile) -> String {
    let cuisine = if preferences.cuisine_styles.is_empty() {
        "No specific preference".to_string()
    } else {
        preferences.cuisine_styles.join(", ")
    };
    let allergies = if preferences.allergies.is_empty() {
        "None".to_string()
    } else {
        preferences.allergies.join(", ")
    };
    let dislikes = if preferences.dislikes.is_empty() {
        "None".to_string()
    } else {
        preferences.dislikes.join(", ")
    };

    format!(
        "USER PREFERENCES:\n\
         - Cuisine styles they enjoy: {cuisine}\n\
         - Price sensitivity: {price}\n\
         - Allergies (MUST AVOID): {allergies}\n\
         - Dislikes: {dislikes}",
        price = preferences.price_sensitivity,
    )
}

/// System prompt for the initial generation call.
pub fn system_prompt(preferences: &PreferenceProfile) -> String {
    format!(
        "You are an expert sommelier and food pairing specialist. Your job is to analyze a food menu and wine list, then recommend the best food and wine pairings.\n\
         \n\
         {preferences}\n\
         \n\
         IMPORTANT RULES:\n\
         1. NEVER recommend anything containing the user's allergens\n\
         2. Avoid items the user dislikes\n\
         3. Match price sensitivity: budget = cheapest good options, moderate = mid-range, premium = best regardless of price\n\
         4. Consider both taste pairing AND value for money\n\
         5. Provide exactly 3 recommendations ranked by how well they match the user's preferences\n\
         6. Look at ALL pages of the menu and wine list - they may span multiple images\n\
         \n\
         If you cannot read the menu or wine list (image is blurry, too dark, or doesn't contain readable text), respond with:\n\
         {{\"error\": \"unreadable\", \"message\": \"Brief description of what's wrong\"}}\n\
         \n\
         Otherwise, respond ONLY with valid JSON containing recommendations, no other text.",
        preferences = preference_block(preferences),
    )
}

/// System prompt for a refinement call. Lists the prior recommendations so
/// the model can guarantee novelty - correctness of "different from before"
/// depends entirely on re-supplying prior output here.
pub fn refinement_system_prompt(
    preferences: &PreferenceProfile,
    previous: &[Recommendation],
) -> String {
    let prior_lines = previous
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {} with {}", i + 1, r.food_name, r.wine_name))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a sommelier and food pairing expert. The user has received recommendations and wants to refine them.\n\
         \n\
         {preferences}\n\
         \n\
         Previous recommendations were:\n\
         {prior_lines}\n\
         \n\
         Based on the user's refinement request, provide 3 NEW and DIFFERENT recommendations from the menu and wine list shown in the images.\n\
         \n\
         If you cannot read the menu or wine list images, respond with:\n\
         {{\"error\": \"unreadable\", \"message\": \"Brief description of what's wrong\"}}\n\
         \n\
         Otherwise, respond in JSON format only.",
        preferences = preference_block(preferences),
    )
}

/// The page label interleaved immediately before each image reference.
pub fn page_label(document: ImageDocument, page: usize, total: usize) -> String {
    format!("{} (page {} of {}):", document.label(), page, total)
}

/// Final instruction turn for the initial generation call, optionally
/// carrying the occasion hint.
pub fn user_instruction(occasion: Option<&str>) -> String {
    let occasion_text = occasion
        .map(|o| format!("\n\nOccasion/mood: {o}"))
        .unwrap_or_default();

    format!(
        "Please analyze ALL the food menu and wine list images above. Recommend the 3 best food and wine pairings.{occasion_text}\n\
         \n\
         Respond with exactly this JSON structure:\n\
         {RESPONSE_STRUCTURE}"
    )
}

/// Final instruction turn for a refinement call, quoting the user's request
/// verbatim.
pub fn refinement_instruction(refinement: &str) -> String {
    format!(
        "Please refine the recommendations based on this request: \"{refinement}\"\n\
         \n\
         Look at ALL the menu and wine list images and provide 3 NEW pairings that better match what the user wants.\n\
         \n\
         Respond with exactly this JSON structure:\n\
         {RESPONSE_STRUCTURE}"
    )
}
