use serde::{Deserialize, Serialize};

use crate::state::measurement::MeasurementSeries;

/// Mean and sample standard deviation of a set of readings.
///
/// `mean` needs at least one value and `std_dev` at least two; below that
/// the field is `None` rather than a fabricated zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
}

impl Summary {
    pub fn compute(values: &[f64]) -> Self {
        let count = values.len();
        if count == 0 {
            return Summary {
                count,
                mean: None,
                std_dev: None,
            };
        }

        let mean = values.iter().sum::<f64>() / count as f64;
        let std_dev = if count < 2 {
            None
        } else {
            let variance =
                values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            Some(variance.sqrt())
        };

        Summary {
            count,
            mean: Some(mean),
            std_dev,
        }
    }
}

pub fn summarize(series: &MeasurementSeries) -> Summary {
    Summary::compute(&series.values)
}

/// How several series are merged into the synthetic "Combined" entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombineRule {
    /// Pool every raw reading, then summarize the pool.
    RowPool,
    /// Average the per-file means; root-mean-square of the per-file std devs.
    MomentCombination,
}

impl Default for CombineRule {
    fn default() -> Self {
        CombineRule::MomentCombination
    }
}

impl CombineRule {
    pub const ALL: [CombineRule; 2] = [CombineRule::MomentCombination, CombineRule::RowPool];

    pub fn label(&self) -> &'static str {
        match self {
            CombineRule::RowPool => "Pool raw rows",
            CombineRule::MomentCombination => "Average means, RMS std dev",
        }
    }
}

/// Combine the selected series. Returns `None` for an empty selection.
pub fn combine(series: &[&MeasurementSeries], rule: CombineRule) -> Option<Summary> {
    if series.is_empty() {
        return None;
    }

    match rule {
        CombineRule::RowPool => {
            let pooled: Vec<f64> = series.iter().flat_map(|s| s.values.iter().copied()).collect();
            Some(Summary::compute(&pooled))
        }
        CombineRule::MomentCombination => {
            let summaries: Vec<Summary> = series.iter().map(|s| summarize(s)).collect();
            let count = summaries.iter().map(|s| s.count).sum();

            let means: Vec<f64> = summaries.iter().filter_map(|s| s.mean).collect();
            let mean = mean_of(&means);

            let variances: Vec<f64> = summaries
                .iter()
                .filter_map(|s| s.std_dev)
                .map(|sd| sd * sd)
                .collect();
            let std_dev = mean_of(&variances).map(f64::sqrt);

            Some(Summary {
                count,
                mean,
                std_dev,
            })
        }
    }
}

fn mean_of(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
