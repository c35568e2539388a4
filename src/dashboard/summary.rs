use serde::Serialize;
use time::{Date, OffsetDateTime, UtcOffset};

use crate::nutrition::calculator::{
    NutritionInputs, NutritionTargets, CARBS_SHARE, FATS_SHARE, PROTEIN_SHARE,
};
use crate::weights::repo_types::WeightWithProfileRow;

/// Padding, in pounds, around the observed range of the chart's y axis.
const CHART_PADDING_LBS: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestEntry {
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MacroSplit {
    pub protein: u8,
    pub carbs: u8,
    pub fats: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionSummary {
    #[serde(flatten)]
    pub targets: NutritionTargets,
    pub split: MacroSplit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Calendar day in the display offset, `YYYY-MM-DD`.
    pub day: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartDomain {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub points: Vec<ChartPoint>,
    pub domain: Option<ChartDomain>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub logged_today: bool,
    pub latest: Option<LatestEntry>,
    pub nutrition: NutritionSummary,
    pub chart: Chart,
}

fn percent(share: f64) -> u8 {
    (share * 100.0).round() as u8
}

fn chart_domain(entries: &[WeightWithProfileRow]) -> Option<ChartDomain> {
    let mut weights = entries.iter().map(|e| e.weight);
    let first = weights.next()?;
    let (lo, hi) = weights.fold((first, first), |(lo, hi), w| (lo.min(w), hi.max(w)));
    Some(ChartDomain {
        min: (lo - CHART_PADDING_LBS).floor(),
        max: (hi + CHART_PADDING_LBS).ceil(),
    })
}

/// Builds the dashboard view from entries sorted ascending by date.
pub fn summarize(
    entries: &[WeightWithProfileRow],
    now: OffsetDateTime,
    offset: UtcOffset,
) -> DashboardSummary {
    let today = now.to_offset(offset).date();
    let day_of = |at: OffsetDateTime| -> Date { at.to_offset(offset).date() };

    let latest = entries.last();
    let inputs = match latest {
        Some(e) => NutritionInputs::from_parts(Some(e.weight), e.birth_date, e.height),
        None => NutritionInputs::default(),
    };

    DashboardSummary {
        logged_today: entries.iter().any(|e| day_of(e.date) == today),
        latest: latest.map(|e| LatestEntry {
            date: e.date,
            weight: e.weight,
        }),
        nutrition: NutritionSummary {
            targets: inputs.targets(now),
            split: MacroSplit {
                protein: percent(PROTEIN_SHARE),
                carbs: percent(CARBS_SHARE),
                fats: percent(FATS_SHARE),
            },
        },
        chart: Chart {
            points: entries
                .iter()
                .map(|e| ChartPoint {
                    day: day_of(e.date).to_string(),
                    weight: e.weight,
                })
                .collect(),
            domain: chart_domain(entries),
        },
    }
}
