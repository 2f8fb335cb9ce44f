use chrono::{Days, NaiveDate};

use crate::domain::common::optional_contribution;
use crate::domain::reproduction::expected_delivery_date;
use crate::domain::{
    filter_by_period, Animal, AnimalDirectory, CalvingRecord, DeliveryStatus, InseminationPatch,
    InseminationRecord, InseminationUpdate, InseminationWarning, NewCalving, NewInsemination,
    NewPregnancyCheck, PeriodFilter, PregnancyCheckRecord, PregnancyResult, RecordDate, RecordId,
    ReproductionExpenses, UpcomingDelivery,
};
use crate::engine::clock::Clock;
use crate::storage::{Collection, RecordStore};

use super::{ServiceError, ServiceResult};

pub struct ReproductionService;

impl ReproductionService {
    /// Records a breeding attempt and projects its delivery date from the
    /// dam's species. Nothing is written when the dam or its gestation
    /// length cannot be resolved.
    pub fn add_insemination(
        store: &dyn RecordStore,
        clock: &dyn Clock,
        data: NewInsemination,
    ) -> ServiceResult<InseminationRecord> {
        let animals = Collection::<Animal>::load(store)?;
        let dam = animals
            .find(&data.animal_id)
            .ok_or_else(|| ServiceError::AnimalNotFound(data.animal_id.clone()))?;
        let expected = expected_delivery_date(data.insemination_date, dam.species)
            .ok_or(ServiceError::GestationUnknown(dam.species))?;

        let mut records = Collection::<InseminationRecord>::load(store)?;
        let record = InseminationRecord::from_new(data, expected, clock.now());
        records.push(record.clone());
        records.save(store)?;
        tracing::info!(
            record_id = %record.id,
            dam_id = %record.animal_id,
            expected_delivery = %record.expected_delivery_date,
            "Insemination recorded"
        );
        Ok(record)
    }

    /// Applies `patch`; returns `Ok(None)` when the record does not exist.
    ///
    /// Moving the insemination date recomputes the delivery date from the
    /// dam's current species. If that is no longer possible the old date is
    /// kept and a warning is returned alongside the record.
    pub fn update_insemination(
        store: &dyn RecordStore,
        clock: &dyn Clock,
        id: &RecordId,
        patch: InseminationPatch,
    ) -> ServiceResult<Option<InseminationUpdate>> {
        let mut records = Collection::<InseminationRecord>::load(store)?;
        let Some(record) = records.find_mut(id) else {
            return Ok(None);
        };

        let mut warnings = Vec::new();
        let mut expected = None;
        if let (true, Some(new_date)) = (record.date_changes(&patch), patch.insemination_date) {
            let animals = Collection::<Animal>::load(store)?;
            match animals.find(&record.animal_id) {
                None => {
                    let dam_id = record.animal_id.clone();
                    warnings.push(InseminationWarning::DamNotFound(dam_id));
                }
                Some(dam) => match expected_delivery_date(new_date, dam.species) {
                    Some(date) => expected = Some(date),
                    None => warnings.push(InseminationWarning::GestationUnknown(dam.species)),
                },
            }
        }

        record.apply(&patch, clock.now());
        if let Some(date) = expected {
            record.expected_delivery_date = RecordDate::from(date);
        }
        for warning in &warnings {
            tracing::warn!(record_id = %id, ?warning, "Expected delivery date not recalculated");
        }
        let record = record.clone();
        records.save(store)?;
        tracing::debug!(record_id = %id, "Insemination updated");
        Ok(Some(InseminationUpdate { record, warnings }))
    }

    /// Deletes the insemination together with its checks and calvings.
    pub fn remove_insemination(store: &dyn RecordStore, id: &RecordId) -> ServiceResult<bool> {
        let mut records = Collection::<InseminationRecord>::load(store)?;
        if records.retain(|record| &record.id != id) == 0 {
            return Ok(false);
        }
        records.save(store)?;

        let mut checks = Collection::<PregnancyCheckRecord>::load(store)?;
        let removed_checks = checks.retain(|check| &check.insemination_id != id);
        if removed_checks > 0 {
            checks.save(store)?;
        }
        let mut calvings = Collection::<CalvingRecord>::load(store)?;
        let removed_calvings = calvings.retain(|calving| &calving.insemination_id != id);
        if removed_calvings > 0 {
            calvings.save(store)?;
        }
        tracing::info!(
            record_id = %id,
            removed_checks,
            removed_calvings,
            "Insemination removed"
        );
        Ok(true)
    }

    pub fn insemination(
        store: &dyn RecordStore,
        id: &RecordId,
    ) -> ServiceResult<Option<InseminationRecord>> {
        let records = Collection::<InseminationRecord>::load(store)?;
        Ok(records.find(id).cloned())
    }

    /// Most recent insemination first.
    pub fn inseminations(store: &dyn RecordStore) -> ServiceResult<Vec<InseminationRecord>> {
        let mut records = Collection::<InseminationRecord>::read(store)?;
        records.sort_by(|a, b| {
            b.insemination_date
                .parse()
                .cmp(&a.insemination_date.parse())
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(records)
    }

    pub fn inseminations_for_animal(
        store: &dyn RecordStore,
        animal_id: &RecordId,
    ) -> ServiceResult<Vec<InseminationRecord>> {
        Ok(Self::inseminations(store)?
            .into_iter()
            .filter(|record| &record.animal_id == animal_id)
            .collect())
    }

    /// Writes the check, then points its insemination at it.
    pub fn add_pregnancy_check(
        store: &dyn RecordStore,
        clock: &dyn Clock,
        data: NewPregnancyCheck,
    ) -> ServiceResult<PregnancyCheckRecord> {
        let now = clock.now();
        let mut checks = Collection::<PregnancyCheckRecord>::load(store)?;
        let check = PregnancyCheckRecord::from_new(data, now);
        checks.push(check.clone());
        checks.save(store)?;

        let mut inseminations = Collection::<InseminationRecord>::load(store)?;
        match inseminations.find_mut(&check.insemination_id) {
            Some(parent) => {
                parent.pregnancy_check_id = Some(check.id.clone());
                parent.updated_at = now;
                inseminations.save(store)?;
            }
            None => tracing::warn!(
                check_id = %check.id,
                insemination_id = %check.insemination_id,
                "Pregnancy check references a missing insemination"
            ),
        }
        tracing::info!(check_id = %check.id, result = ?check.result, "Pregnancy check recorded");
        Ok(check)
    }

    pub fn pregnancy_check(
        store: &dyn RecordStore,
        id: &RecordId,
    ) -> ServiceResult<Option<PregnancyCheckRecord>> {
        let checks = Collection::<PregnancyCheckRecord>::load(store)?;
        Ok(checks.find(id).cloned())
    }

    /// Most recent check first.
    pub fn pregnancy_checks(store: &dyn RecordStore) -> ServiceResult<Vec<PregnancyCheckRecord>> {
        let mut checks = Collection::<PregnancyCheckRecord>::read(store)?;
        checks.sort_by(|a, b| {
            b.check_date
                .parse()
                .cmp(&a.check_date.parse())
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(checks)
    }

    /// Deletes one check; the parent pointer is cleared only if it still
    /// refers to this check.
    pub fn remove_pregnancy_check(
        store: &dyn RecordStore,
        clock: &dyn Clock,
        id: &RecordId,
    ) -> ServiceResult<bool> {
        let mut checks = Collection::<PregnancyCheckRecord>::load(store)?;
        let Some(check) = checks.find(id) else {
            return Ok(false);
        };
        let parent_id = check.insemination_id.clone();
        checks.retain(|check| &check.id != id);
        checks.save(store)?;

        let mut inseminations = Collection::<InseminationRecord>::load(store)?;
        if let Some(parent) = inseminations.find_mut(&parent_id) {
            if parent.pregnancy_check_id.as_ref() == Some(id) {
                parent.pregnancy_check_id = None;
                parent.updated_at = clock.now();
                inseminations.save(store)?;
            }
        }
        tracing::info!(check_id = %id, "Pregnancy check removed");
        Ok(true)
    }

    /// Writes the calving, then points its insemination at it.
    pub fn add_calving(
        store: &dyn RecordStore,
        clock: &dyn Clock,
        data: NewCalving,
    ) -> ServiceResult<CalvingRecord> {
        let now = clock.now();
        let mut calvings = Collection::<CalvingRecord>::load(store)?;
        let calving = CalvingRecord::from_new(data, now);
        calvings.push(calving.clone());
        calvings.save(store)?;

        let mut inseminations = Collection::<InseminationRecord>::load(store)?;
        match inseminations.find_mut(&calving.insemination_id) {
            Some(parent) => {
                parent.calving_record_id = Some(calving.id.clone());
                parent.updated_at = now;
                inseminations.save(store)?;
            }
            None => tracing::warn!(
                calving_id = %calving.id,
                insemination_id = %calving.insemination_id,
                "Calving references a missing insemination"
            ),
        }
        tracing::info!(
            calving_id = %calving.id,
            calves = calving.number_of_calves,
            "Calving recorded"
        );
        Ok(calving)
    }

    pub fn calvings(store: &dyn RecordStore) -> ServiceResult<Vec<CalvingRecord>> {
        Ok(Collection::<CalvingRecord>::read(store)?)
    }

    /// Deletes one calving; the parent pointer is cleared only if it still
    /// refers to this calving.
    pub fn remove_calving(
        store: &dyn RecordStore,
        clock: &dyn Clock,
        id: &RecordId,
    ) -> ServiceResult<bool> {
        let mut calvings = Collection::<CalvingRecord>::load(store)?;
        let Some(calving) = calvings.find(id) else {
            return Ok(false);
        };
        let parent_id = calving.insemination_id.clone();
        calvings.retain(|calving| &calving.id != id);
        calvings.save(store)?;

        let mut inseminations = Collection::<InseminationRecord>::load(store)?;
        if let Some(parent) = inseminations.find_mut(&parent_id) {
            if parent.calving_record_id.as_ref() == Some(id) {
                parent.calving_record_id = None;
                parent.updated_at = clock.now();
                inseminations.save(store)?;
            }
        }
        tracing::info!(calving_id = %id, "Calving removed");
        Ok(true)
    }

    /// Insemination, check and calving spending, each filtered on its own
    /// event date.
    pub fn expenses(
        store: &dyn RecordStore,
        period: Option<&PeriodFilter>,
    ) -> ServiceResult<ReproductionExpenses> {
        let inseminations = filter_by_period(
            Collection::<InseminationRecord>::read(store)?,
            |record| &record.insemination_date,
            period,
        );
        let checks = filter_by_period(
            Collection::<PregnancyCheckRecord>::read(store)?,
            |check| &check.check_date,
            period,
        );
        let calvings = filter_by_period(
            Collection::<CalvingRecord>::read(store)?,
            |calving| &calving.calving_date,
            period,
        );

        Ok(ReproductionExpenses::from_subtotals(
            spent(&inseminations, |record| record.expense),
            spent(&checks, |check| check.expense),
            spent(&calvings, |calving| calving.expense),
        ))
    }

    /// Open pregnancies due between `grace_days` ago and `days_ahead` from
    /// `today`, soonest first.
    ///
    /// Inseminations that already calved, or whose linked check came back
    /// not pregnant, are left out.
    pub fn upcoming_deliveries(
        store: &dyn RecordStore,
        directory: &AnimalDirectory,
        today: NaiveDate,
        days_ahead: u32,
        grace_days: u32,
    ) -> ServiceResult<Vec<UpcomingDelivery>> {
        let earliest = today
            .checked_sub_days(Days::new(u64::from(grace_days)))
            .unwrap_or(NaiveDate::MIN);
        let latest = today
            .checked_add_days(Days::new(u64::from(days_ahead)))
            .unwrap_or(NaiveDate::MAX);
        let checks = Collection::<PregnancyCheckRecord>::load(store)?;
        let records = Collection::<InseminationRecord>::read(store)?;

        let mut upcoming: Vec<UpcomingDelivery> = records
            .into_iter()
            .filter(|record| record.calving_record_id.is_none())
            .filter(|record| {
                let ruled_out = record
                    .pregnancy_check_id
                    .as_ref()
                    .and_then(|check_id| checks.find(check_id))
                    .map_or(false, |check| check.result == PregnancyResult::NotPregnant);
                !ruled_out
            })
            .filter_map(|record| {
                let expected = record.expected_delivery_date.parse()?;
                if expected < earliest || expected > latest {
                    return None;
                }
                let days_until = (expected - today).num_days();
                Some(UpcomingDelivery {
                    dam: directory.label(&record.animal_id),
                    expected_delivery: expected,
                    days_until,
                    status: DeliveryStatus::from_days_until(days_until),
                    insemination: record,
                })
            })
            .collect();
        upcoming.sort_by(|a, b| a.expected_delivery.cmp(&b.expected_delivery));
        Ok(upcoming)
    }
}

fn spent<T>(records: &[T], expense: impl Fn(&T) -> Option<f64>) -> f64 {
    records
        .iter()
        .map(|record| optional_contribution(expense(record)))
        .sum()
}
