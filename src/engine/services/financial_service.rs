use chrono::{Datelike, Months, NaiveDate};

use crate::domain::period::{month_label, MonthStyle};
use crate::domain::{
    round2, FinancialSummary, Language, MonthlyComparisonPoint, PeriodFilter, ProfitPosition,
};
use crate::storage::RecordStore;

use super::{FeedService, HealthService, MilkService, ReproductionService, ServiceResult};

/// Earnings against expenses. Holds no state of its own; every figure comes
/// from the other services for the same period.
pub struct FinancialService;

impl FinancialService {
    /// Milk earnings minus feed, health and reproduction spending.
    pub fn net_profit_or_loss(
        store: &dyn RecordStore,
        period: Option<&PeriodFilter>,
    ) -> ServiceResult<f64> {
        let earnings = MilkService::earnings_for_period(store, period)?;
        let feed = FeedService::total_cost(store, period)?;
        let health = HealthService::expenses_for_period(store, period)?;
        let reproduction = ReproductionService::expenses(store, period)?;
        Ok(earnings - feed - health - reproduction.total)
    }

    pub fn summary(
        store: &dyn RecordStore,
        period: Option<&PeriodFilter>,
    ) -> ServiceResult<FinancialSummary> {
        let milk = MilkService::summary(store, period)?;
        let feed_cost = FeedService::total_cost(store, period)?;
        let health_expenses = HealthService::expenses_for_period(store, period)?;
        let reproduction = ReproductionService::expenses(store, period)?;

        let total_expenses = round2(feed_cost + health_expenses + reproduction.total);
        let net = milk.total_earnings - feed_cost - health_expenses - reproduction.total;
        Ok(FinancialSummary {
            period: period.copied(),
            milk,
            feed_cost,
            health_expenses,
            reproduction,
            total_expenses,
            net_profit_or_loss: net,
            position: ProfitPosition::of(net),
        })
    }

    /// The last `months` calendar months ending with the month of `today`,
    /// oldest first.
    pub fn monthly_comparison(
        store: &dyn RecordStore,
        today: NaiveDate,
        months: u32,
        language: Language,
    ) -> ServiceResult<Vec<MonthlyComparisonPoint>> {
        let Some(current) = today.with_day(1) else {
            return Ok(Vec::new());
        };

        let mut points = Vec::new();
        for back in (0..months).rev() {
            let Some(month_start) = current.checked_sub_months(Months::new(back)) else {
                continue;
            };
            let period = PeriodFilter::containing(month_start);
            let summary = Self::summary(store, Some(&period))?;
            points.push(MonthlyComparisonPoint {
                month_start,
                label: month_label(
                    month_start.year(),
                    month_start.month(),
                    language,
                    MonthStyle::Short,
                )
                .unwrap_or_default(),
                milk_earnings: summary.milk.total_earnings,
                feed_expenses: summary.feed_cost,
                health_expenses: summary.health_expenses,
                reproduction_expenses: summary.reproduction.total,
                total_expenses: summary.total_expenses,
                net_profit_or_loss: summary.net_profit_or_loss,
            });
        }
        tracing::debug!(months = points.len(), "Monthly comparison computed");
        Ok(points)
    }
}
