//! Daily calorie and macro targets from a single weight measurement.
//!
//! Mifflin-St Jeor BMR (male form, there is no sex input), sedentary activity
//! factor and a fixed 500 kcal deficit. The constants are kept literal so the
//! numbers match what the dashboard has always shown.

use serde::Serialize;
use time::{macros::datetime, OffsetDateTime};

pub const DEFAULT_WEIGHT_LBS: f64 = 180.0;
pub const DEFAULT_BIRTH_DATE: OffsetDateTime = datetime!(1990-01-01 0:00 UTC);
pub const DEFAULT_HEIGHT_IN: f64 = 67.0;

/// Milliseconds in a Julian year (365.25 days).
pub const MS_PER_YEAR: i128 = 31_557_600_000;

const LBS_PER_KG: f64 = 2.2;
const CM_PER_IN: f64 = 2.54;
const SEDENTARY_FACTOR: f64 = 1.2;
const DAILY_DEFICIT_KCAL: f64 = 500.0;

pub const PROTEIN_SHARE: f64 = 0.30;
pub const CARBS_SHARE: f64 = 0.40;
pub const FATS_SHARE: f64 = 0.30;
const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MacroBreakdown {
    pub protein: i64,
    pub carbs: i64,
    pub fats: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionTargets {
    pub target_calories: i64,
    pub macros: MacroBreakdown,
}

/// Inputs for the calculation, with the dashboard defaults filled in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutritionInputs {
    pub weight_lbs: f64,
    pub birth_date: OffsetDateTime,
    pub height_in: f64,
}

impl Default for NutritionInputs {
    fn default() -> Self {
        Self {
            weight_lbs: DEFAULT_WEIGHT_LBS,
            birth_date: DEFAULT_BIRTH_DATE,
            height_in: DEFAULT_HEIGHT_IN,
        }
    }
}

impl NutritionInputs {
    pub fn from_parts(
        weight_lbs: Option<f64>,
        birth_date: Option<OffsetDateTime>,
        height_in: Option<f64>,
    ) -> Self {
        Self {
            weight_lbs: weight_lbs.unwrap_or(DEFAULT_WEIGHT_LBS),
            birth_date: birth_date.unwrap_or(DEFAULT_BIRTH_DATE),
            height_in: height_in.unwrap_or(DEFAULT_HEIGHT_IN),
        }
    }

    pub fn targets(&self, now: OffsetDateTime) -> NutritionTargets {
        let target_calories =
            calculate_daily_calories(self.weight_lbs, self.birth_date, self.height_in, now);
        NutritionTargets {
            target_calories,
            macros: calculate_macros(target_calories),
        }
    }
}

/// Rounds halves toward positive infinity.
fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// Whole Julian years between `birth_date` and `now`, floored.
pub fn age_years(birth_date: OffsetDateTime, now: OffsetDateTime) -> i64 {
    let elapsed_ms = (now - birth_date).whole_milliseconds();
    elapsed_ms.div_euclid(MS_PER_YEAR) as i64
}

pub fn calculate_daily_calories(
    weight_lbs: f64,
    birth_date: OffsetDateTime,
    height_in: f64,
    now: OffsetDateTime,
) -> i64 {
    let age = age_years(birth_date, now) as f64;
    let weight_kg = weight_lbs / LBS_PER_KG;
    let height_cm = height_in * CM_PER_IN;
    let bmr = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age + 5.0;
    let tdee = bmr * SEDENTARY_FACTOR;
    round_half_up(tdee - DAILY_DEFICIT_KCAL)
}

pub fn calculate_macros(calories: i64) -> MacroBreakdown {
    let kcal = calories as f64;
    MacroBreakdown {
        protein: round_half_up(kcal * PROTEIN_SHARE / KCAL_PER_G_PROTEIN),
        carbs: round_half_up(kcal * CARBS_SHARE / KCAL_PER_G_CARBS),
        fats: round_half_up(kcal * FATS_SHARE / KCAL_PER_G_FAT),
    }
}
