use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use super::animal::AnimalLabel;
use super::common::{contribution, lenient_f64, missing_number, Identifiable, RecordId};
use super::period::RecordDate;
use super::units::to_effective_quantity;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MilkUnit {
    #[default]
    Litre,
    Kg,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Evening,
}

/// Current milk price. New records copy it into their rate snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MilkSettings {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rate_per_unit: f64,
    #[serde(default)]
    pub default_unit: MilkUnit,
}

impl Default for MilkSettings {
    fn default() -> Self {
        Self {
            rate_per_unit: 0.0,
            default_unit: MilkUnit::Litre,
        }
    }
}

impl MilkSettings {
    pub fn new(rate_per_unit: f64, default_unit: MilkUnit) -> Self {
        Self {
            rate_per_unit,
            default_unit,
        }
        .sanitized()
    }

    /// Replaces a non-numeric rate with zero.
    pub fn sanitized(self) -> Self {
        Self {
            rate_per_unit: contribution(self.rate_per_unit),
            default_unit: self.default_unit,
        }
    }
}

/// One milking event with the price in effect when it was logged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MilkRecord {
    pub id: RecordId,
    pub animal_id: RecordId,
    pub date: RecordDate,
    pub time_of_day: TimeOfDay,
    #[serde(default = "missing_number", deserialize_with = "lenient_f64")]
    pub quantity: f64,
    pub unit: MilkUnit,
    #[serde(default = "missing_number", deserialize_with = "lenient_f64")]
    pub rate_snapshot: f64,
    #[serde(default)]
    pub rate_unit_snapshot: MilkUnit,
    pub created_at: DateTime<Utc>,
}

impl MilkRecord {
    /// Builds a record, freezing `settings` as its rate snapshot.
    pub fn capture(data: NewMilkRecord, settings: &MilkSettings, now: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::generate(),
            animal_id: data.animal_id,
            date: RecordDate::from(data.date),
            time_of_day: data.time_of_day,
            quantity: data.quantity,
            unit: data.unit,
            rate_snapshot: settings.rate_per_unit,
            rate_unit_snapshot: settings.default_unit,
            created_at: now,
        }
    }

    /// Earnings for this record using its own rate snapshot.
    ///
    /// Zero when quantity or rate is not a positive number; never negative.
    pub fn income(&self) -> f64 {
        let quantity = self.quantity;
        let rate = self.rate_snapshot;
        if !quantity.is_finite() || quantity <= 0.0 || !rate.is_finite() || rate <= 0.0 {
            return 0.0;
        }
        to_effective_quantity(quantity, self.unit, self.rate_unit_snapshot) * rate
    }

    /// The logged quantity when it can be counted towards yield totals.
    pub fn countable_quantity(&self) -> Option<f64> {
        (self.quantity.is_finite() && self.quantity > 0.0).then_some(self.quantity)
    }
}

impl Identifiable for MilkRecord {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMilkRecord {
    pub animal_id: RecordId,
    pub date: NaiveDate,
    pub time_of_day: TimeOfDay,
    pub quantity: f64,
    pub unit: MilkUnit,
}

/// Running totals shared by the overall and per-animal summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct MilkTally {
    pub earnings: f64,
    pub litres: f64,
    pub kilograms: f64,
}

impl MilkTally {
    pub fn add(&mut self, record: &MilkRecord) {
        if let Some(quantity) = record.countable_quantity() {
            match record.unit {
                MilkUnit::Litre => self.litres += quantity,
                MilkUnit::Kg => self.kilograms += quantity,
            }
        }
        self.earnings += record.income();
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MilkSummary {
    pub total_earnings: f64,
    pub total_quantity_litre: f64,
    pub total_quantity_kg: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnimalMilkSummary {
    pub animal: AnimalLabel,
    pub total_earnings: f64,
    pub total_quantity_litre: f64,
    pub total_quantity_kg: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DailyIncome {
    pub date: NaiveDate,
    pub income: f64,
}
