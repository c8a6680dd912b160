use serde_json::{Number, Value};

use crate::{Category, DashboardData, Evidence, Headline, KpiBlock};

/// Shown for a card whose block is empty and for a missing overall rate.
pub const VALUE_PLACEHOLDER: &str = "—";
/// Shown for a headline value that cannot be summarised inline.
pub const VALUE_OPEN_DETAIL: &str = "View";
pub const CARD_TAG: &str = "Click to open details";

#[derive(Debug, Clone, PartialEq)]
pub struct KpiCard {
    pub category: Category,
    pub value: String,
    /// Full block handed to the detail view when the card is opened.
    pub block: KpiBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DistributionChart {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

/// 0–100 gauge of the overall sentiment rate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RateGauge {
    pub value: f64,
}

impl RateGauge {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 100.0;
}

/// KPI card grid plus the two aggregate visualizations.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiDashboardView {
    pub company: Option<String>,
    pub sentiment_rate_label: String,
    pub overall_rate: f64,
    pub cards: Vec<KpiCard>,
    pub distribution: DistributionChart,
    pub gauge: RateGauge,
    pub evidence: Option<Evidence>,
}

impl Default for KpiDashboardView {
    fn default() -> Self {
        Self {
            company: None,
            sentiment_rate_label: VALUE_PLACEHOLDER.to_string(),
            overall_rate: 0.0,
            cards: Vec::new(),
            distribution: DistributionChart::default(),
            gauge: RateGauge::default(),
            evidence: None,
        }
    }
}

impl KpiDashboardView {
    /// Replaces the grid and both visualizations from one dashboard snapshot.
    pub fn update(&mut self, data: &DashboardData) {
        let rate = data.rate_or_zero();
        self.company = data.company.clone();
        self.sentiment_rate_label = data
            .overall_sentiment_rate
            .map(format_number)
            .unwrap_or_else(|| VALUE_PLACEHOLDER.to_string());
        self.overall_rate = rate;
        self.cards = Category::ALL
            .into_iter()
            .map(|category| {
                let block = data
                    .masters
                    .get(category.name())
                    .cloned()
                    .unwrap_or_default();
                KpiCard {
                    category,
                    value: headline_value(category, &block, rate),
                    block,
                }
            })
            .collect();

        let dist = data.series.sentiment_distribution;
        self.distribution = DistributionChart {
            positive: dist.pos,
            negative: dist.neg,
            neutral: dist.neu,
        };
        self.gauge = RateGauge { value: rate };
        self.evidence = data.evidence.clone();
    }

    /// True once a dashboard has been rendered into the card grid.
    pub fn has_grid(&self) -> bool {
        !self.cards.is_empty()
    }

    pub fn card(&self, category: Category) -> Option<&KpiCard> {
        self.cards.iter().find(|card| card.category == category)
    }
}

/// Headline shown on a category card.
///
/// The category's declared sub-metric is used when present; otherwise the
/// first key of the block stands in.
pub fn headline_value(category: Category, block: &KpiBlock, overall_rate: f64) -> String {
    match category.headline() {
        Headline::OverallRate => format_number(overall_rate),
        Headline::SubMetric(key) => match block.get(key).or_else(|| block.values().next()) {
            Some(value) => summarize_value(value),
            None => VALUE_PLACEHOLDER.to_string(),
        },
    }
}

pub fn summarize_value(value: &Value) -> String {
    match value {
        Value::Number(n) => format_json_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => format!("{} items", items.len()),
        _ => VALUE_OPEN_DETAIL.to_string(),
    }
}

/// Formats a rate so that whole numbers drop their fraction (`70`, `62.5`).
pub fn format_number(value: f64) -> String {
    value.to_string()
}

pub(crate) fn format_json_number(n: &Number) -> String {
    if n.is_f64() {
        n.as_f64().map(format_number).unwrap_or_else(|| n.to_string())
    } else {
        n.to_string()
    }
}
