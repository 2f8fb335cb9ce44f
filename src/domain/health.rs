use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use super::animal::AnimalLabel;
use super::common::{normalize_expense, Identifiable, RecordId};
use super::period::RecordDate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HealthRecordType {
    Vaccination,
    Treatment,
    Checkup,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    pub id: RecordId,
    pub animal_id: RecordId,
    #[serde(rename = "type")]
    pub record_type: HealthRecordType,
    pub date: RecordDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medication: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_due_date: Option<RecordDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl HealthRecord {
    pub fn from_new(data: NewHealthRecord, now: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::generate(),
            animal_id: data.animal_id,
            record_type: data.record_type,
            date: RecordDate::from(data.date),
            notes: data.notes,
            medication: data.medication,
            next_due_date: data.next_due_date.map(RecordDate::from),
            expense: normalize_expense(data.expense),
            created_at: now,
        }
    }

    /// Treatments are expected to name the medication given.
    pub fn is_missing_medication(&self) -> bool {
        self.record_type == HealthRecordType::Treatment
            && self
                .medication
                .as_deref()
                .map_or(true, |medication| medication.trim().is_empty())
    }
}

impl Identifiable for HealthRecord {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewHealthRecord {
    pub animal_id: RecordId,
    pub record_type: HealthRecordType,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub medication: Option<String>,
    pub next_due_date: Option<NaiveDate>,
    pub expense: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnimalHealthSummary {
    pub animal: AnimalLabel,
    pub total_health_cost: f64,
    pub vaccination_count: usize,
    pub treatment_count: usize,
    pub checkup_count: usize,
}

impl AnimalHealthSummary {
    pub fn empty(animal: AnimalLabel) -> Self {
        Self {
            animal,
            total_health_cost: 0.0,
            vaccination_count: 0,
            treatment_count: 0,
            checkup_count: 0,
        }
    }

    pub(crate) fn count(&mut self, record_type: HealthRecordType) {
        match record_type {
            HealthRecordType::Vaccination => self.vaccination_count += 1,
            HealthRecordType::Treatment => self.treatment_count += 1,
            HealthRecordType::Checkup => self.checkup_count += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_record(record_type: HealthRecordType, medication: Option<&str>) -> NewHealthRecord {
        NewHealthRecord {
            animal_id: RecordId::from("cow-1"),
            record_type,
            date: NaiveDate::from_ymd_opt(2024, 4, 10).unwrap(),
            notes: None,
            medication: medication.map(str::to_string),
            next_due_date: None,
            expense: Some(0.0),
        }
    }

    fn logged(record_type: HealthRecordType, medication: Option<&str>) -> HealthRecord {
        HealthRecord::from_new(new_record(record_type, medication), Utc::now())
    }

    #[test]
    fn zero_expense_is_stored_as_absent() {
        let record = logged(HealthRecordType::Checkup, None);
        assert_eq!(record.expense, None);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("expense").is_none());
        assert_eq!(json["type"], "checkup");
    }

    #[test]
    fn treatment_without_medication_is_flagged() {
        assert!(logged(HealthRecordType::Treatment, None).is_missing_medication());
        assert!(logged(HealthRecordType::Treatment, Some("  ")).is_missing_medication());
        assert!(!logged(HealthRecordType::Treatment, Some("Oxytet")).is_missing_medication());
        assert!(!logged(HealthRecordType::Vaccination, None).is_missing_medication());
    }
}
