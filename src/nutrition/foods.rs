use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Macro {
    Protein,
    Carbs,
    Fats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FoodSuggestion {
    pub name: &'static str,
    pub details: &'static str,
    pub tip: &'static str,
}

const fn food(name: &'static str, details: &'static str, tip: &'static str) -> FoodSuggestion {
    FoodSuggestion { name, details, tip }
}

static PROTEIN: [FoodSuggestion; 5] = [
    food("Chicken Breast", "31g protein per 100g", "Great lean protein source"),
    food("Eggs", "13g protein per 2 large eggs", "Complete protein source"),
    food("Greek Yogurt", "10g protein per 100g", "Good for breakfast or snacks"),
    food("Salmon", "25g protein per 100g", "Rich in omega-3 fatty acids"),
    food("Tofu", "8g protein per 100g", "Versatile plant-based option"),
];

static CARBS: [FoodSuggestion; 5] = [
    food("Brown Rice", "23g carbs per 100g", "High in fiber and nutrients"),
    food("Sweet Potatoes", "20g carbs per 100g", "Rich in vitamins"),
    food("Oatmeal", "27g carbs per 100g", "Great for sustained energy"),
    food("Quinoa", "21g carbs per 100g", "Complete protein source"),
    food("Bananas", "23g carbs per medium banana", "Quick energy source"),
];

static FATS: [FoodSuggestion; 5] = [
    food("Avocado", "15g healthy fats per 100g", "Rich in monounsaturated fats"),
    food("Nuts", "49g fats per 100g", "Great snack option"),
    food("Olive Oil", "14g fats per tablespoon", "Good for cooking"),
    food("Salmon", "13g fats per 100g", "Omega-3 rich"),
    food("Chia Seeds", "31g fats per 100g", "High in omega-3"),
];

pub fn recommendations(kind: Macro) -> &'static [FoodSuggestion] {
    match kind {
        Macro::Protein => &PROTEIN,
        Macro::Carbs => &CARBS,
        Macro::Fats => &FATS,
    }
}
