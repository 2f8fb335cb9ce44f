//! Breeding records: inseminations, the pregnancy checks and calvings that
//! hang off them, and the delivery projections derived from gestation length.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use super::animal::{AnimalLabel, Gender, Species};
use super::common::{normalize_expense, round2, Identifiable, RecordId};
use super::period::RecordDate;

/// Days ahead of the due date that still count as "due soon".
pub const DUE_SOON_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InseminationType {
    #[serde(rename = "ai")]
    Artificial,
    #[serde(rename = "natural")]
    Natural,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PregnancyResult {
    Pregnant,
    NotPregnant,
    Recheck,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CalvingEase {
    Easy,
    Assisted,
    Difficult,
}

/// Projects the expected delivery date from the insemination date.
///
/// `None` when the species has no gestation reference or the result would
/// overflow the calendar.
pub fn expected_delivery_date(insemination_date: NaiveDate, species: Species) -> Option<NaiveDate> {
    let days = species.gestation_days()?;
    insemination_date.checked_add_signed(Duration::days(days))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InseminationRecord {
    pub id: RecordId,
    /// The dam.
    pub animal_id: RecordId,
    pub insemination_date: RecordDate,
    #[serde(rename = "type")]
    pub insemination_type: InseminationType,
    pub semen_details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vet_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense: Option<f64>,
    pub expected_delivery_date: RecordDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pregnancy_check_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calving_record_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InseminationRecord {
    pub fn from_new(
        data: NewInsemination,
        expected_delivery: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RecordId::generate(),
            animal_id: data.animal_id,
            insemination_date: RecordDate::from(data.insemination_date),
            insemination_type: data.insemination_type,
            semen_details: data.semen_details,
            vet_name: data.vet_name,
            expense: normalize_expense(data.expense),
            expected_delivery_date: RecordDate::from(expected_delivery),
            pregnancy_check_id: None,
            calving_record_id: None,
            notes: data.notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the descriptive fields of `patch`. The insemination date and
    /// the derived delivery date are handled by the caller.
    pub fn apply(&mut self, patch: &InseminationPatch, now: DateTime<Utc>) {
        if let Some(date) = patch.insemination_date {
            self.insemination_date = RecordDate::from(date);
        }
        if let Some(kind) = patch.insemination_type {
            self.insemination_type = kind;
        }
        if let Some(details) = &patch.semen_details {
            self.semen_details = details.clone();
        }
        if let Some(vet_name) = &patch.vet_name {
            self.vet_name = vet_name.clone();
        }
        if let Some(expense) = patch.expense {
            self.expense = expense;
        }
        if let Some(notes) = &patch.notes {
            self.notes = notes.clone();
        }
        self.updated_at = now;
    }

    /// True when `patch` moves the insemination to a different day.
    pub fn date_changes(&self, patch: &InseminationPatch) -> bool {
        patch
            .insemination_date
            .map_or(false, |date| RecordDate::from(date) != self.insemination_date)
    }
}

impl Identifiable for InseminationRecord {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInsemination {
    pub animal_id: RecordId,
    pub insemination_date: NaiveDate,
    pub insemination_type: InseminationType,
    pub semen_details: String,
    pub vet_name: Option<String>,
    pub expense: Option<f64>,
    pub notes: Option<String>,
}

/// Partial update of an insemination. The dam cannot be changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InseminationPatch {
    pub insemination_date: Option<NaiveDate>,
    pub insemination_type: Option<InseminationType>,
    pub semen_details: Option<String>,
    pub vet_name: Option<Option<String>>,
    pub expense: Option<Option<f64>>,
    pub notes: Option<Option<String>>,
}

/// Non-fatal problems met while updating an insemination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InseminationWarning {
    /// The dam is gone, so the delivery date was left as it was.
    DamNotFound(RecordId),
    /// The dam's species has no gestation reference.
    GestationUnknown(Species),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InseminationUpdate {
    pub record: InseminationRecord,
    pub warnings: Vec<InseminationWarning>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PregnancyCheckRecord {
    pub id: RecordId,
    pub insemination_id: RecordId,
    pub animal_id: RecordId,
    pub check_date: RecordDate,
    pub result: PregnancyResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vet_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PregnancyCheckRecord {
    pub fn from_new(data: NewPregnancyCheck, now: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::generate(),
            insemination_id: data.insemination_id,
            animal_id: data.animal_id,
            check_date: RecordDate::from(data.check_date),
            result: data.result,
            vet_name: data.vet_name,
            expense: normalize_expense(data.expense),
            notes: data.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Identifiable for PregnancyCheckRecord {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPregnancyCheck {
    pub insemination_id: RecordId,
    pub animal_id: RecordId,
    pub check_date: NaiveDate,
    pub result: PregnancyResult,
    pub vet_name: Option<String>,
    pub expense: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalfData {
    pub calf_tag_number: String,
    pub calf_gender: Gender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_animal_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalvingRecord {
    pub id: RecordId,
    pub insemination_id: RecordId,
    pub animal_id: RecordId,
    pub calving_date: RecordDate,
    pub number_of_calves: u32,
    #[serde(default)]
    pub calves_data: Vec<CalfData>,
    pub calving_ease: CalvingEase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CalvingRecord {
    pub fn from_new(data: NewCalving, now: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::generate(),
            insemination_id: data.insemination_id,
            animal_id: data.animal_id,
            calving_date: RecordDate::from(data.calving_date),
            number_of_calves: data.number_of_calves,
            calves_data: data.calves_data,
            calving_ease: data.calving_ease,
            expense: normalize_expense(data.expense),
            notes: data.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Identifiable for CalvingRecord {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCalving {
    pub insemination_id: RecordId,
    pub animal_id: RecordId,
    pub calving_date: NaiveDate,
    pub number_of_calves: u32,
    pub calves_data: Vec<CalfData>,
    pub calving_ease: CalvingEase,
    pub expense: Option<f64>,
    pub notes: Option<String>,
}

/// Reproduction spending for one period.
///
/// Each subtotal is rounded to cents before the total is taken, so the
/// displayed parts always add up to the displayed total.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReproductionExpenses {
    pub insemination: f64,
    pub pregnancy_check: f64,
    pub calving: f64,
    pub total: f64,
}

impl ReproductionExpenses {
    pub fn from_subtotals(insemination: f64, pregnancy_check: f64, calving: f64) -> Self {
        let insemination = round2(insemination);
        let pregnancy_check = round2(pregnancy_check);
        let calving = round2(calving);
        Self {
            insemination,
            pregnancy_check,
            calving,
            total: round2(insemination + pregnancy_check + calving),
        }
    }
}

/// Alert tier for an expected delivery relative to today.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Overdue,
    DueToday,
    DueSoon,
    DueLater,
}

impl DeliveryStatus {
    pub fn from_days_until(days_until: i64) -> Self {
        match days_until {
            d if d < 0 => DeliveryStatus::Overdue,
            0 => DeliveryStatus::DueToday,
            d if d <= DUE_SOON_WINDOW_DAYS => DeliveryStatus::DueSoon,
            _ => DeliveryStatus::DueLater,
        }
    }

    pub fn classify(expected: NaiveDate, today: NaiveDate) -> Self {
        Self::from_days_until((expected - today).num_days())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingDelivery {
    pub insemination: InseminationRecord,
    pub dam: AnimalLabel,
    pub expected_delivery: NaiveDate,
    /// Negative when the delivery is overdue.
    pub days_until: i64,
    pub status: DeliveryStatus,
}
