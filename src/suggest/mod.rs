//! Suggestion heuristics for failed or rejected recipe requests.
//!
//! Pure keyword matching; each rule is independent and rules are reported in
//! a fixed order.

use crate::types::{DietType, UserPreferences};

/// Ingredient count below which more ingredients are suggested.
pub const MIN_SUGGESTED_INGREDIENTS: usize = 3;
/// Allergen text longer than this is considered overly restrictive.
pub const MAX_ALLERGEN_TEXT_LEN: usize = 50;

const PROTEIN_KEYWORDS: &[&str] = &[
    "chicken", "beef", "pork", "lamb", "turkey", "duck", "fish", "salmon", "tuna", "cod",
    "shrimp", "prawn", "egg", "tofu", "tempeh", "seitan", "lentil", "bean", "chickpea",
    "cheese", "yogurt", "ham", "bacon", "sausage",
];

const CARB_KEYWORDS: &[&str] = &[
    "rice", "pasta", "noodle", "spaghetti", "bread", "potato", "quinoa", "oat", "couscous",
    "barley", "flour", "tortilla", "corn", "bulgur", "buckwheat", "millet",
];

const MEAT_KEYWORDS: &[&str] = &[
    "chicken", "beef", "pork", "lamb", "turkey", "duck", "veal", "ham", "bacon", "sausage",
    "salami", "fish", "salmon", "tuna", "cod", "shrimp", "prawn", "anchovy", "gelatin",
];

const DAIRY_KEYWORDS: &[&str] = &["milk", "cheese", "butter", "cream", "yogurt", "yoghurt", "ghee", "whey"];

const EGG_KEYWORDS: &[&str] = &["egg", "honey"];

/// Plant-based names that would otherwise trip the animal-product keywords.
/// Stripped from an ingredient before any keyword test.
const PLANT_BASED_EXCEPTIONS: &[&str] = &[
    "eggplant", "peanut butter", "almond butter", "cocoa butter", "almond milk", "oat milk",
    "soy milk", "rice milk", "coconut milk", "coconut cream",
];

/// A word that marks the whole ingredient as plant-based ("vegan cheese").
const PLANT_BASED_MARKER: &str = "vegan";

/// An ingredient split into lowercase words, exception phrases removed.
struct Ingredient<'a> {
    original: &'a str,
    words: Vec<String>,
}

impl<'a> Ingredient<'a> {
    fn new(original: &'a str) -> Self {
        let mut text = original.to_lowercase();
        for phrase in PLANT_BASED_EXCEPTIONS {
            text = text.replace(phrase, " ");
        }
        let words = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        Self { original, words }
    }

    fn mentions(&self, keywords: &[&str]) -> bool {
        self.words
            .iter()
            .any(|word| keywords.iter().any(|k| word_matches(word, k)))
    }

    fn is_plant_based(&self) -> bool {
        self.words.iter().any(|w| w == PLANT_BASED_MARKER)
    }
}

/// Whole-word match, allowing a plural "s" or "es".
fn word_matches(word: &str, keyword: &str) -> bool {
    if word == keyword {
        return true;
    }
    match word.strip_suffix('s') {
        Some(stem) => stem == keyword || stem.strip_suffix('e') == Some(keyword),
        None => false,
    }
}

/// Propose actionable hints for an ingredient list that failed to produce a recipe.
pub fn generate_suggestions(
    ingredients: &[String],
    preferences: Option<&UserPreferences>,
) -> Vec<String> {
    let parsed: Vec<Ingredient<'_>> = ingredients.iter().map(|i| Ingredient::new(i)).collect();
    let diet = preferences.and_then(|p| p.diet_type.as_ref());
    let mut suggestions = Vec::new();

    if ingredients.len() < MIN_SUGGESTED_INGREDIENTS {
        suggestions.push(format!(
            "Add more ingredients: at least {MIN_SUGGESTED_INGREDIENTS} give the recipe enough to work with."
        ));
    }

    if !parsed.iter().any(|i| i.mentions(PROTEIN_KEYWORDS)) {
        suggestions.push(format!(
            "Add a source of protein, such as {}.",
            protein_examples(diet)
        ));
    }

    if !parsed.iter().any(|i| i.mentions(CARB_KEYWORDS)) {
        suggestions.push(
            "Add a carbohydrate, such as rice, pasta, potatoes or bread.".to_string(),
        );
    }

    if let Some(allergens) = preferences.and_then(UserPreferences::allergens) {
        if allergens.chars().count() > MAX_ALLERGEN_TEXT_LEN {
            suggestions.push(
                "Your allergy list is very long; consider relaxing some restrictions to leave more options."
                    .to_string(),
            );
        }
    }

    if let Some(diet) = diet {
        let conflicts = diet_conflicts(&parsed, diet);
        if !conflicts.is_empty() {
            suggestions.push(format!(
                "These ingredients conflict with your {diet} diet: {}. Remove them or update your diet settings.",
                conflicts.join(", ")
            ));
        }
    }

    if suggestions.is_empty() {
        suggestions.extend([
            "Try a different combination of ingredients.".to_string(),
            "Add pantry staples such as onion, garlic, olive oil or canned tomatoes.".to_string(),
            "Simplify your notes or preferences and try again.".to_string(),
        ]);
    }

    suggestions
}

fn protein_examples(diet: Option<&DietType>) -> &'static str {
    match diet {
        Some(DietType::Vegan) => "tofu, tempeh, lentils or chickpeas",
        Some(DietType::Vegetarian) => "eggs, cheese, tofu or beans",
        _ => "chicken, fish, eggs or tofu",
    }
}

/// Original ingredient names that violate `diet`.
fn diet_conflicts(ingredients: &[Ingredient<'_>], diet: &DietType) -> Vec<String> {
    let forbidden: Vec<&[&str]> = match diet {
        DietType::Vegan => vec![MEAT_KEYWORDS, DAIRY_KEYWORDS, EGG_KEYWORDS],
        DietType::Vegetarian => vec![MEAT_KEYWORDS],
        _ => return Vec::new(),
    };

    ingredients
        .iter()
        .filter(|i| !i.is_plant_based())
        .filter(|i| forbidden.iter().any(|list| i.mentions(list)))
        .map(|i| i.original.trim().to_string())
        .collect()
}
