use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Config;
use crate::domain::{
    Animal, AnimalFeedSummary, AnimalHealthSummary, AnimalMilkSummary, AnimalPatch, CalvingRecord,
    DailyIncome, FeedRecord, FeedReport, FinancialSummary, HealthRecord, InseminationPatch,
    InseminationRecord, InseminationUpdate, MilkRecord, MilkSettings, MilkSummary,
    MonthlyComparisonPoint, NewAnimal, NewCalving, NewFeedRecord, NewHealthRecord, NewInsemination,
    NewMilkRecord, NewPregnancyCheck, PeriodFilter, PeriodPreset, PregnancyCheckRecord, RecordId,
    ReproductionExpenses, UpcomingDelivery,
};
use crate::engine::clock::Clock;
use crate::engine::services::{
    AnimalService, FeedService, FinancialService, HealthService, MilkService, ReproductionService,
    ServiceResult,
};
use crate::storage::RecordStore;

/// Everything the home screen shows, computed in one pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub today: NaiveDate,
    /// Currency code the amounts below are shown in.
    pub currency: String,
    pub current_month: FinancialSummary,
    pub income_trend: Vec<DailyIncome>,
    pub upcoming_deliveries: Vec<UpcomingDelivery>,
    pub upcoming_health: Vec<HealthRecord>,
}

/// Facade that owns the record store, clock and preferences.
///
/// Mutations take `&mut self` so a manager serializes its own writes; the
/// insemination pointer updates rely on a single writer.
pub struct FarmManager {
    store: Box<dyn RecordStore>,
    clock: Box<dyn Clock>,
    config: Config,
}

impl FarmManager {
    pub fn new(store: Box<dyn RecordStore>, clock: Box<dyn Clock>, config: Config) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn resolve(&self, preset: PeriodPreset) -> Option<PeriodFilter> {
        preset.resolve(self.today())
    }

    // Animals

    pub fn register_animal(&mut self, data: NewAnimal) -> ServiceResult<Animal> {
        AnimalService::add(self.store(), self.clock.as_ref(), data)
    }

    pub fn update_animal(
        &mut self,
        id: &RecordId,
        patch: AnimalPatch,
    ) -> ServiceResult<Option<Animal>> {
        AnimalService::update(self.store(), self.clock.as_ref(), id, patch)
    }

    pub fn remove_animal(&mut self, id: &RecordId) -> ServiceResult<bool> {
        AnimalService::remove(self.store(), id)
    }

    pub fn animal(&self, id: &RecordId) -> ServiceResult<Option<Animal>> {
        AnimalService::get(self.store(), id)
    }

    pub fn animals(&self) -> ServiceResult<Vec<Animal>> {
        AnimalService::list(self.store())
    }

    // Milk

    pub fn milk_settings(&self) -> ServiceResult<MilkSettings> {
        MilkService::settings(self.store())
    }

    pub fn update_milk_settings(&mut self, settings: MilkSettings) -> ServiceResult<MilkSettings> {
        MilkService::save_settings(self.store(), settings)
    }

    /// Logs a milking priced at the currently saved rate.
    pub fn log_milk(&mut self, data: NewMilkRecord) -> ServiceResult<MilkRecord> {
        let settings = MilkService::settings(self.store())?;
        MilkService::add(self.store(), self.clock.as_ref(), data, &settings)
    }

    pub fn remove_milk(&mut self, id: &RecordId) -> ServiceResult<bool> {
        MilkService::remove(self.store(), id)
    }

    pub fn milk_summary(&self, period: Option<&PeriodFilter>) -> ServiceResult<MilkSummary> {
        MilkService::summary(self.store(), period)
    }

    pub fn milk_per_animal(
        &self,
        period: Option<&PeriodFilter>,
    ) -> ServiceResult<Vec<AnimalMilkSummary>> {
        let directory = AnimalService::directory(self.store())?;
        MilkService::per_animal(self.store(), &directory, period)
    }

    /// Daily income over the configured trend window.
    pub fn income_trend(&self) -> ServiceResult<Vec<DailyIncome>> {
        let days = self.config.income_trend_days;
        MilkService::daily_income_trend(self.store(), self.today(), days)
    }

    // Feed

    pub fn log_feed(&mut self, data: NewFeedRecord) -> ServiceResult<FeedRecord> {
        FeedService::add(self.store(), self.clock.as_ref(), data)
    }

    pub fn remove_feed(&mut self, id: &RecordId) -> ServiceResult<bool> {
        FeedService::remove(self.store(), id)
    }

    pub fn feed_report(&self, period: Option<&PeriodFilter>) -> ServiceResult<FeedReport> {
        FeedService::report(self.store(), period, self.config.language)
    }

    pub fn feed_per_animal(
        &self,
        period: Option<&PeriodFilter>,
    ) -> ServiceResult<Vec<AnimalFeedSummary>> {
        let directory = AnimalService::directory(self.store())?;
        FeedService::per_animal(self.store(), &directory, period)
    }

    // Health

    pub fn log_health(&mut self, data: NewHealthRecord) -> ServiceResult<HealthRecord> {
        HealthService::add(self.store(), self.clock.as_ref(), data)
    }

    pub fn remove_health(&mut self, id: &RecordId) -> ServiceResult<bool> {
        HealthService::remove(self.store(), id)
    }

    pub fn health_per_animal(
        &self,
        period: Option<&PeriodFilter>,
    ) -> ServiceResult<Vec<AnimalHealthSummary>> {
        let directory = AnimalService::directory(self.store())?;
        HealthService::per_animal(self.store(), &directory, period)
    }

    pub fn upcoming_health(&self) -> ServiceResult<Vec<HealthRecord>> {
        HealthService::upcoming(self.store(), self.today())
    }

    // Reproduction

    pub fn record_insemination(
        &mut self,
        data: NewInsemination,
    ) -> ServiceResult<InseminationRecord> {
        ReproductionService::add_insemination(self.store(), self.clock.as_ref(), data)
    }

    pub fn update_insemination(
        &mut self,
        id: &RecordId,
        patch: InseminationPatch,
    ) -> ServiceResult<Option<InseminationUpdate>> {
        ReproductionService::update_insemination(self.store(), self.clock.as_ref(), id, patch)
    }

    pub fn remove_insemination(&mut self, id: &RecordId) -> ServiceResult<bool> {
        ReproductionService::remove_insemination(self.store(), id)
    }

    pub fn record_pregnancy_check(
        &mut self,
        data: NewPregnancyCheck,
    ) -> ServiceResult<PregnancyCheckRecord> {
        ReproductionService::add_pregnancy_check(self.store(), self.clock.as_ref(), data)
    }

    pub fn remove_pregnancy_check(&mut self, id: &RecordId) -> ServiceResult<bool> {
        ReproductionService::remove_pregnancy_check(self.store(), self.clock.as_ref(), id)
    }

    pub fn record_calving(&mut self, data: NewCalving) -> ServiceResult<CalvingRecord> {
        ReproductionService::add_calving(self.store(), self.clock.as_ref(), data)
    }

    pub fn remove_calving(&mut self, id: &RecordId) -> ServiceResult<bool> {
        ReproductionService::remove_calving(self.store(), self.clock.as_ref(), id)
    }

    pub fn reproduction_expenses(
        &self,
        period: Option<&PeriodFilter>,
    ) -> ServiceResult<ReproductionExpenses> {
        ReproductionService::expenses(self.store(), period)
    }

    /// Deliveries inside the configured look-ahead and grace windows.
    pub fn upcoming_deliveries(&self) -> ServiceResult<Vec<UpcomingDelivery>> {
        let directory = AnimalService::directory(self.store())?;
        ReproductionService::upcoming_deliveries(
            self.store(),
            &directory,
            self.today(),
            self.config.delivery_lookahead_days,
            self.config.overdue_grace_days,
        )
    }

    // Financial

    pub fn financial_summary(
        &self,
        period: Option<&PeriodFilter>,
    ) -> ServiceResult<FinancialSummary> {
        FinancialService::summary(self.store(), period)
    }

    pub fn financial_summary_for(&self, preset: PeriodPreset) -> ServiceResult<FinancialSummary> {
        FinancialService::summary(self.store(), self.resolve(preset).as_ref())
    }

    pub fn net_profit_or_loss(&self, period: Option<&PeriodFilter>) -> ServiceResult<f64> {
        FinancialService::net_profit_or_loss(self.store(), period)
    }

    pub fn monthly_comparison(&self) -> ServiceResult<Vec<MonthlyComparisonPoint>> {
        FinancialService::monthly_comparison(
            self.store(),
            self.today(),
            self.config.comparison_months,
            self.config.language,
        )
    }

    pub fn dashboard(&self) -> ServiceResult<Dashboard> {
        let today = self.today();
        let current_month = PeriodFilter::containing(today);
        Ok(Dashboard {
            today,
            currency: self.config.currency.clone(),
            current_month: self.financial_summary(Some(&current_month))?,
            income_trend: self.income_trend()?,
            upcoming_deliveries: self.upcoming_deliveries()?,
            upcoming_health: self.upcoming_health()?,
        })
    }
}
