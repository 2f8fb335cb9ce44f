use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use serde_json::Value;

use crate::domain::milk::MilkTally;
use crate::domain::{
    filter_by_period, round2, AnimalDirectory, AnimalMilkSummary, DailyIncome, MilkRecord,
    MilkSettings, MilkSummary, MilkUnit, NewMilkRecord, PeriodFilter, RecordId, TimeOfDay,
};
use crate::engine::clock::Clock;
use crate::errors::FarmError;
use crate::storage::{Collection, EntityKind, RecordStore};

use super::ServiceResult;

pub struct MilkService;

impl MilkService {
    /// Current milk price. Missing or unreadable settings fall back to
    /// defaults field by field.
    pub fn settings(store: &dyn RecordStore) -> ServiceResult<MilkSettings> {
        let documents = store.read_all(EntityKind::MilkSettings)?;
        Ok(documents
            .first()
            .map(settings_from_document)
            .unwrap_or_default())
    }

    pub fn save_settings(
        store: &dyn RecordStore,
        settings: MilkSettings,
    ) -> ServiceResult<MilkSettings> {
        let settings = settings.sanitized();
        store.write_all(
            EntityKind::MilkSettings,
            vec![serde_json::to_value(settings).map_err(FarmError::from)?],
        )?;
        tracing::info!(
            rate = settings.rate_per_unit,
            unit = ?settings.default_unit,
            "Milk settings saved"
        );
        Ok(settings)
    }

    /// Logs a milking using `settings` as the frozen rate snapshot.
    pub fn add(
        store: &dyn RecordStore,
        clock: &dyn Clock,
        data: NewMilkRecord,
        settings: &MilkSettings,
    ) -> ServiceResult<MilkRecord> {
        let mut records = Collection::<MilkRecord>::load(store)?;
        let record = MilkRecord::capture(data, settings, clock.now());
        records.push(record.clone());
        records.save(store)?;
        tracing::info!(
            record_id = %record.id,
            animal_id = %record.animal_id,
            quantity = record.quantity,
            "Milk record added"
        );
        Ok(record)
    }

    pub fn remove(store: &dyn RecordStore, id: &RecordId) -> ServiceResult<bool> {
        let mut records = Collection::<MilkRecord>::load(store)?;
        if records.retain(|record| &record.id != id) == 0 {
            return Ok(false);
        }
        records.save(store)?;
        tracing::info!(record_id = %id, "Milk record removed");
        Ok(true)
    }

    /// Newest day first, then newest entry first within a day.
    pub fn list(store: &dyn RecordStore) -> ServiceResult<Vec<MilkRecord>> {
        let mut records = Collection::<MilkRecord>::read(store)?;
        records.sort_by(|a, b| {
            b.date
                .parse()
                .cmp(&a.date.parse())
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(records)
    }

    /// Records for one day, morning milking before evening.
    pub fn list_by_date(
        store: &dyn RecordStore,
        day: NaiveDate,
    ) -> ServiceResult<Vec<MilkRecord>> {
        let mut records: Vec<MilkRecord> = Collection::<MilkRecord>::read(store)?
            .into_iter()
            .filter(|record| record.date.parse() == Some(day))
            .collect();
        records.sort_by(|a, b| {
            session_order(a.time_of_day, b.time_of_day)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(records)
    }

    pub fn list_by_animal(
        store: &dyn RecordStore,
        animal_id: &RecordId,
    ) -> ServiceResult<Vec<MilkRecord>> {
        Ok(Collection::<MilkRecord>::read(store)?
            .into_iter()
            .filter(|record| &record.animal_id == animal_id)
            .collect())
    }

    pub fn summary(
        store: &dyn RecordStore,
        period: Option<&PeriodFilter>,
    ) -> ServiceResult<MilkSummary> {
        let records = Self::records_in(store, period)?;
        Ok(summarize(&records))
    }

    pub fn earnings_for_period(
        store: &dyn RecordStore,
        period: Option<&PeriodFilter>,
    ) -> ServiceResult<f64> {
        let records = Self::records_in(store, period)?;
        Ok(round2(records.iter().map(MilkRecord::income).sum()))
    }

    /// One row per animal with milk in the period, highest earner first.
    pub fn per_animal(
        store: &dyn RecordStore,
        directory: &AnimalDirectory,
        period: Option<&PeriodFilter>,
    ) -> ServiceResult<Vec<AnimalMilkSummary>> {
        let records = Self::records_in(store, period)?;
        let mut tallies: HashMap<RecordId, MilkTally> = HashMap::new();
        for record in &records {
            tallies
                .entry(record.animal_id.clone())
                .or_default()
                .add(record);
        }

        let mut rows: Vec<AnimalMilkSummary> = tallies
            .into_iter()
            .map(|(animal_id, tally)| AnimalMilkSummary {
                animal: directory.label(&animal_id),
                total_earnings: round2(tally.earnings),
                total_quantity_litre: round2(tally.litres),
                total_quantity_kg: round2(tally.kilograms),
            })
            .collect();
        rows.sort_by(|a, b| {
            b.total_earnings
                .total_cmp(&a.total_earnings)
                .then_with(|| a.animal.animal_id.cmp(&b.animal.animal_id))
        });
        Ok(rows)
    }

    /// Income for each of the `days` calendar days ending on `today`, oldest
    /// first. Every day is present, with zero when nothing was logged.
    pub fn daily_income_trend(
        store: &dyn RecordStore,
        today: NaiveDate,
        days: u32,
    ) -> ServiceResult<Vec<DailyIncome>> {
        if days == 0 {
            return Ok(Vec::new());
        }
        let Some(start) = today.checked_sub_days(Days::new(u64::from(days - 1))) else {
            return Ok(Vec::new());
        };

        let mut by_day: HashMap<NaiveDate, f64> = HashMap::new();
        for record in Collection::<MilkRecord>::read(store)? {
            if let Some(day) = record.date.parse() {
                if day >= start && day <= today {
                    *by_day.entry(day).or_default() += record.income();
                }
            }
        }

        Ok(start
            .iter_days()
            .take(days as usize)
            .map(|date| DailyIncome {
                date,
                income: round2(by_day.get(&date).copied().unwrap_or(0.0)),
            })
            .collect())
    }

    fn records_in(
        store: &dyn RecordStore,
        period: Option<&PeriodFilter>,
    ) -> ServiceResult<Vec<MilkRecord>> {
        let records = Collection::<MilkRecord>::read(store)?;
        Ok(filter_by_period(records, |record| &record.date, period))
    }
}

fn summarize(records: &[MilkRecord]) -> MilkSummary {
    let mut tally = MilkTally::default();
    for record in records {
        tally.add(record);
    }
    MilkSummary {
        total_earnings: round2(tally.earnings),
        total_quantity_litre: round2(tally.litres),
        total_quantity_kg: round2(tally.kilograms),
    }
}

fn session_order(a: TimeOfDay, b: TimeOfDay) -> Ordering {
    let rank = |time: TimeOfDay| match time {
        TimeOfDay::Morning => 0,
        TimeOfDay::Evening => 1,
    };
    rank(a).cmp(&rank(b))
}

fn settings_from_document(document: &Value) -> MilkSettings {
    let rate_per_unit = document
        .get("ratePerUnit")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    let default_unit = document
        .get("defaultUnit")
        .cloned()
        .and_then(|unit| serde_json::from_value::<MilkUnit>(unit).ok())
        .unwrap_or_default();
    MilkSettings {
        rate_per_unit,
        default_unit,
    }
    .sanitized()
}
