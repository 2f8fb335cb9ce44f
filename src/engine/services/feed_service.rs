use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::common::contribution;
use crate::domain::feed::usage_details;
use crate::domain::{
    filter_by_period, round2, AnimalDirectory, AnimalFeedSummary, DailyFeedSummary, FeedRecord,
    FeedReport, Language, NewFeedRecord, PeriodFilter, RecordId,
};
use crate::engine::clock::Clock;
use crate::storage::{Collection, RecordStore};

use super::ServiceResult;

pub struct FeedService;

impl FeedService {
    pub fn add(
        store: &dyn RecordStore,
        clock: &dyn Clock,
        data: NewFeedRecord,
    ) -> ServiceResult<FeedRecord> {
        let mut records = Collection::<FeedRecord>::load(store)?;
        let record = FeedRecord::from_new(data, clock.now());
        records.push(record.clone());
        records.save(store)?;
        tracing::info!(
            record_id = %record.id,
            feed_type = ?record.feed_type,
            cost = record.cost,
            "Feed record added"
        );
        Ok(record)
    }

    pub fn remove(store: &dyn RecordStore, id: &RecordId) -> ServiceResult<bool> {
        let mut records = Collection::<FeedRecord>::load(store)?;
        if records.retain(|record| &record.id != id) == 0 {
            return Ok(false);
        }
        records.save(store)?;
        tracing::info!(record_id = %id, "Feed record removed");
        Ok(true)
    }

    /// Newest day first, then newest entry first within a day.
    pub fn list(store: &dyn RecordStore) -> ServiceResult<Vec<FeedRecord>> {
        let mut records = Collection::<FeedRecord>::read(store)?;
        records.sort_by(|a, b| {
            b.date
                .parse()
                .cmp(&a.date.parse())
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(records)
    }

    /// Entries for one day in the order they were logged.
    pub fn list_by_date(
        store: &dyn RecordStore,
        day: NaiveDate,
    ) -> ServiceResult<Vec<FeedRecord>> {
        let mut records: Vec<FeedRecord> = Collection::<FeedRecord>::read(store)?
            .into_iter()
            .filter(|record| record.date.parse() == Some(day))
            .collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(records)
    }

    pub fn daily_summary(
        store: &dyn RecordStore,
        day: NaiveDate,
    ) -> ServiceResult<DailyFeedSummary> {
        let records = Self::list_by_date(store, day)?;
        let total_cost = summed_cost(&records);
        Ok(DailyFeedSummary {
            total_cost,
            records,
        })
    }

    /// Cost and usage breakdown for the period, titled for `language`.
    pub fn report(
        store: &dyn RecordStore,
        period: Option<&PeriodFilter>,
        language: Language,
    ) -> ServiceResult<FeedReport> {
        let records = Self::records_in(store, period)?;
        let (total_cost, usage_by_type) = usage_details(&records);
        Ok(FeedReport {
            title: PeriodFilter::title(period, language),
            total_cost,
            usage_by_type,
        })
    }

    /// One row per animal fed in the period, most expensive first.
    pub fn per_animal(
        store: &dyn RecordStore,
        directory: &AnimalDirectory,
        period: Option<&PeriodFilter>,
    ) -> ServiceResult<Vec<AnimalFeedSummary>> {
        let records = Self::records_in(store, period)?;
        let mut by_animal: HashMap<RecordId, Vec<FeedRecord>> = HashMap::new();
        for record in records {
            by_animal
                .entry(record.animal_id.clone())
                .or_default()
                .push(record);
        }

        let mut rows: Vec<AnimalFeedSummary> = by_animal
            .into_iter()
            .map(|(animal_id, records)| {
                let (total_cost, usage_by_type) = usage_details(&records);
                AnimalFeedSummary {
                    animal: directory.label(&animal_id),
                    total_cost,
                    usage_by_type,
                }
            })
            .collect();
        rows.sort_by(|a, b| {
            b.total_cost
                .total_cmp(&a.total_cost)
                .then_with(|| a.animal.animal_id.cmp(&b.animal.animal_id))
        });
        Ok(rows)
    }

    pub fn total_cost(
        store: &dyn RecordStore,
        period: Option<&PeriodFilter>,
    ) -> ServiceResult<f64> {
        let records = Self::records_in(store, period)?;
        Ok(summed_cost(&records))
    }

    fn records_in(
        store: &dyn RecordStore,
        period: Option<&PeriodFilter>,
    ) -> ServiceResult<Vec<FeedRecord>> {
        let records = Collection::<FeedRecord>::read(store)?;
        Ok(filter_by_period(records, |record| &record.date, period))
    }
}

fn summed_cost(records: &[FeedRecord]) -> f64 {
    let costs = records.iter().map(|record| contribution(record.cost));
    round2(costs.sum())
}
