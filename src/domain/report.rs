use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::milk::MilkSummary;
use super::period::PeriodFilter;
use super::reproduction::ReproductionExpenses;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProfitPosition {
    Profit,
    Loss,
}

impl ProfitPosition {
    /// Break-even counts as profit.
    pub fn of(net: f64) -> Self {
        if net >= 0.0 {
            ProfitPosition::Profit
        } else {
            ProfitPosition::Loss
        }
    }
}

/// Dashboard rollup of earnings against every expense group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub period: Option<PeriodFilter>,
    pub milk: MilkSummary,
    pub feed_cost: f64,
    pub health_expenses: f64,
    pub reproduction: ReproductionExpenses,
    pub total_expenses: f64,
    pub net_profit_or_loss: f64,
    pub position: ProfitPosition,
}

/// One month on the comparison chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyComparisonPoint {
    pub month_start: NaiveDate,
    pub label: String,
    pub milk_earnings: f64,
    pub feed_expenses: f64,
    pub health_expenses: f64,
    pub reproduction_expenses: f64,
    pub total_expenses: f64,
    pub net_profit_or_loss: f64,
}
