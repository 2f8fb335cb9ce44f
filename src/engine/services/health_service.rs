use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::common::optional_contribution;
use crate::domain::{
    filter_by_period, round2, AnimalDirectory, AnimalHealthSummary, HealthRecord, NewHealthRecord,
    PeriodFilter, RecordId,
};
use crate::engine::clock::Clock;
use crate::storage::{Collection, RecordStore};

use super::ServiceResult;

pub struct HealthService;

impl HealthService {
    pub fn add(
        store: &dyn RecordStore,
        clock: &dyn Clock,
        data: NewHealthRecord,
    ) -> ServiceResult<HealthRecord> {
        let mut records = Collection::<HealthRecord>::load(store)?;
        let record = HealthRecord::from_new(data, clock.now());
        if record.is_missing_medication() {
            tracing::warn!(
                record_id = %record.id,
                animal_id = %record.animal_id,
                "Treatment logged without medication"
            );
        }
        records.push(record.clone());
        records.save(store)?;
        tracing::info!(
            record_id = %record.id,
            record_type = ?record.record_type,
            "Health record added"
        );
        Ok(record)
    }

    pub fn remove(store: &dyn RecordStore, id: &RecordId) -> ServiceResult<bool> {
        let mut records = Collection::<HealthRecord>::load(store)?;
        if records.retain(|record| &record.id != id) == 0 {
            return Ok(false);
        }
        records.save(store)?;
        tracing::info!(record_id = %id, "Health record removed");
        Ok(true)
    }

    /// Newest event first, then newest entry first.
    pub fn list(store: &dyn RecordStore) -> ServiceResult<Vec<HealthRecord>> {
        let mut records = Collection::<HealthRecord>::read(store)?;
        records.sort_by(|a, b| {
            b.date
                .parse()
                .cmp(&a.date.parse())
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(records)
    }

    pub fn list_by_animal(
        store: &dyn RecordStore,
        animal_id: &RecordId,
    ) -> ServiceResult<Vec<HealthRecord>> {
        let mut records: Vec<HealthRecord> = Collection::<HealthRecord>::read(store)?
            .into_iter()
            .filter(|record| &record.animal_id == animal_id)
            .collect();
        records.sort_by(|a, b| b.date.parse().cmp(&a.date.parse()));
        Ok(records)
    }

    pub fn list_by_date(
        store: &dyn RecordStore,
        day: NaiveDate,
    ) -> ServiceResult<Vec<HealthRecord>> {
        let mut records: Vec<HealthRecord> = Collection::<HealthRecord>::read(store)?
            .into_iter()
            .filter(|record| record.date.parse() == Some(day))
            .collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(records)
    }

    /// Records with a due date strictly after `today`, soonest first.
    pub fn upcoming(
        store: &dyn RecordStore,
        today: NaiveDate,
    ) -> ServiceResult<Vec<HealthRecord>> {
        let records = Collection::<HealthRecord>::read(store)?;
        let mut upcoming: Vec<(NaiveDate, HealthRecord)> = records
            .into_iter()
            .filter_map(|record| {
                let due = record.next_due_date.as_ref()?.parse()?;
                (due > today).then_some((due, record))
            })
            .collect();
        upcoming.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(upcoming.into_iter().map(|(_, record)| record).collect())
    }

    pub fn expenses_for_period(
        store: &dyn RecordStore,
        period: Option<&PeriodFilter>,
    ) -> ServiceResult<f64> {
        let records = Collection::<HealthRecord>::read(store)?;
        let records = filter_by_period(records, |record| &record.date, period);
        let expenses = records
            .iter()
            .map(|record| optional_contribution(record.expense));
        Ok(round2(expenses.sum()))
    }

    /// One row for every registered animal, highest cost first. Animals
    /// without events in the period appear with zeroes.
    pub fn per_animal(
        store: &dyn RecordStore,
        directory: &AnimalDirectory,
        period: Option<&PeriodFilter>,
    ) -> ServiceResult<Vec<AnimalHealthSummary>> {
        let records = Collection::<HealthRecord>::read(store)?;
        let records = filter_by_period(records, |record| &record.date, period);

        let mut by_animal: HashMap<&RecordId, Vec<&HealthRecord>> = HashMap::new();
        for record in &records {
            by_animal.entry(&record.animal_id).or_default().push(record);
        }

        let mut rows: Vec<AnimalHealthSummary> = directory
            .animals()
            .iter()
            .map(|animal| {
                let mut row = AnimalHealthSummary::empty(directory.label(&animal.id));
                let mut cost = 0.0;
                for record in by_animal.get(&animal.id).into_iter().flatten() {
                    cost += optional_contribution(record.expense);
                    row.count(record.record_type);
                }
                row.total_health_cost = round2(cost);
                row
            })
            .collect();
        rows.sort_by(|a, b| b.total_health_cost.total_cmp(&a.total_health_cost));
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HealthRecordType, Species};
    use crate::engine::services::test_support::{clock_on, date, seed_animal};
    use crate::storage::MemoryStore;

    fn event(
        animal_id: &RecordId,
        record_type: HealthRecordType,
        on: NaiveDate,
        expense: Option<f64>,
    ) -> NewHealthRecord {
        NewHealthRecord {
            animal_id: animal_id.clone(),
            record_type,
            date: on,
            notes: None,
            medication: Some("Ivermectin".into()),
            next_due_date: None,
            expense,
        }
    }

    fn checkup(animal_id: &RecordId, on: NaiveDate) -> NewHealthRecord {
        event(animal_id, HealthRecordType::Checkup, on, None)
    }

    #[test]
    fn per_animal_lists_every_animal_even_without_records() {
        let store = MemoryStore::new();
        let a = seed_animal(&store, "A", Species::Cow);
        let b = seed_animal(&store, "B", Species::Goat);
        let directory = AnimalDirectory::new(vec![a, b]);
        let rows = HealthService::per_animal(&store, &directory, None).unwrap();
        assert_eq!(rows.len(), 2);
        for row in rows {
            assert_eq!(row.total_health_cost, 0.0);
            assert_eq!(row.vaccination_count + row.treatment_count + row.checkup_count, 0);
        }
    }

    #[test]
    fn per_animal_counts_types_and_sorts_by_cost() {
        let store = MemoryStore::new();
        let clock = clock_on(2024, 6, 1);
        let a = seed_animal(&store, "A", Species::Cow);
        let b = seed_animal(&store, "B", Species::Cow);
        let day = date(2024, 5, 1);
        for data in [
            event(&a.id, HealthRecordType::Vaccination, day, Some(100.0)),
            event(&b.id, HealthRecordType::Treatment, day, Some(900.0)),
            event(&b.id, HealthRecordType::Checkup, day, None),
            event(&b.id, HealthRecordType::Checkup, date(2023, 5, 1), Some(50.0)),
        ] {
            HealthService::add(&store, &clock, data).unwrap();
        }
        let directory = AnimalDirectory::new(vec![a.clone(), b.clone()]);

        let rows = HealthService::per_animal(&store, &directory, None).unwrap();
        assert_eq!(rows[0].animal.animal_id, b.id);
        assert_eq!(rows[0].total_health_cost, 950.0);
        assert_eq!(rows[0].treatment_count, 1);
        assert_eq!(rows[0].checkup_count, 2);
        assert_eq!(rows[1].vaccination_count, 1);

        let year = PeriodFilter::for_year(2024);
        let rows = HealthService::per_animal(&store, &directory, Some(&year)).unwrap();
        assert_eq!(rows[0].total_health_cost, 900.0);
        assert_eq!(rows[0].checkup_count, 1);
    }

    #[test]
    fn expenses_treat_absent_as_zero() {
        let store = MemoryStore::new();
        let clock = clock_on(2024, 6, 1);
        let id = RecordId::generate();
        HealthService::add(&store, &clock, checkup(&id, date(2024, 2, 1))).unwrap();
        let paid = event(&id, HealthRecordType::Vaccination, date(2024, 2, 2), Some(35.5));
        HealthService::add(&store, &clock, paid).unwrap();
        let feb = PeriodFilter::for_month(2024, 2);
        assert_eq!(HealthService::expenses_for_period(&store, Some(&feb)).unwrap(), 35.5);
    }

    #[test]
    fn upcoming_excludes_today_and_past_and_sorts_ascending() {
        let store = MemoryStore::new();
        let clock = clock_on(2024, 6, 10);
        let id = RecordId::generate();
        for due in [
            date(2024, 7, 1),
            date(2024, 6, 10),
            date(2024, 6, 11),
            date(2024, 5, 1),
        ] {
            let mut data = event(&id, HealthRecordType::Vaccination, date(2024, 6, 1), None);
            data.next_due_date = Some(due);
            HealthService::add(&store, &clock, data).unwrap();
        }
        HealthService::add(&store, &clock, checkup(&id, date(2024, 6, 1))).unwrap();

        let upcoming = HealthService::upcoming(&store, date(2024, 6, 10)).unwrap();
        let dues: Vec<_> = upcoming
            .iter()
            .filter_map(|record| record.next_due_date.as_ref())
            .map(|due| due.as_str().to_string())
            .collect();
        assert_eq!(dues, vec!["2024-06-11", "2024-07-01"]);
    }

    #[test]
    fn listings_filter_by_animal_and_day() {
        let store = MemoryStore::new();
        let clock = clock_on(2024, 6, 10);
        let a = RecordId::generate();
        let b = RecordId::from("1716900000000-k2j4h5g");
        HealthService::add(&store, &clock, checkup(&a, date(2024, 1, 1))).unwrap();
        HealthService::add(&store, &clock, checkup(&a, date(2024, 3, 1))).unwrap();
        let other = HealthService::add(&store, &clock, checkup(&b, date(2024, 3, 1))).unwrap();

        let for_a = HealthService::list_by_animal(&store, &a).unwrap();
        assert_eq!(for_a.len(), 2);
        assert_eq!(for_a[0].date.as_str(), "2024-03-01");
        let on_day = HealthService::list_by_date(&store, date(2024, 3, 1)).unwrap();
        assert_eq!(on_day.len(), 2);
        assert_eq!(HealthService::list_by_animal(&store, &b).unwrap().len(), 1);

        assert!(HealthService::remove(&store, &other.id).unwrap());
        assert_eq!(HealthService::list(&store).unwrap().len(), 2);
    }
}
