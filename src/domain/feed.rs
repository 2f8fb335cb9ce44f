use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use super::animal::AnimalLabel;
use super::common::{contribution, lenient_f64, missing_number, round2, Identifiable, RecordId};
use super::period::RecordDate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum FeedType {
    Green,
    Dry,
    Concentrate,
    Water,
}

impl FeedType {
    /// Canonical unit reported for this feed type.
    pub fn default_unit(self) -> FeedUnit {
        match self {
            FeedType::Water => FeedUnit::Litre,
            FeedType::Green | FeedType::Dry | FeedType::Concentrate => FeedUnit::Kg,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FeedUnit {
    Kg,
    Litre,
}

/// One feeding event. `cost` is the absolute amount for this entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedRecord {
    pub id: RecordId,
    pub animal_id: RecordId,
    pub date: RecordDate,
    pub feed_type: FeedType,
    #[serde(default = "missing_number", deserialize_with = "lenient_f64")]
    pub quantity: f64,
    pub unit: FeedUnit,
    #[serde(default = "missing_number", deserialize_with = "lenient_f64")]
    pub cost: f64,
    pub created_at: DateTime<Utc>,
}

impl FeedRecord {
    pub fn from_new(data: NewFeedRecord, now: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::generate(),
            animal_id: data.animal_id,
            date: RecordDate::from(data.date),
            feed_type: data.feed_type,
            quantity: data.quantity,
            unit: data.unit,
            cost: data.cost,
            created_at: now,
        }
    }
}

impl Identifiable for FeedRecord {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFeedRecord {
    pub animal_id: RecordId,
    pub date: NaiveDate,
    pub feed_type: FeedType,
    pub quantity: f64,
    pub unit: FeedUnit,
    pub cost: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedUsageDetail {
    pub feed_type: FeedType,
    pub total_quantity: f64,
    pub unit: FeedUnit,
    pub total_cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedReport {
    pub title: String,
    pub total_cost: f64,
    pub usage_by_type: Vec<FeedUsageDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnimalFeedSummary {
    pub animal: AnimalLabel,
    pub total_cost: f64,
    pub usage_by_type: Vec<FeedUsageDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyFeedSummary {
    pub total_cost: f64,
    pub records: Vec<FeedRecord>,
}

/// Groups `records` by feed type.
///
/// Returns the overall cost and one detail per type present, sorted by cost
/// descending with ties in feed type order. Quantities and costs are rounded
/// to cents; a non-numeric quantity or cost contributes nothing.
pub fn usage_details(records: &[FeedRecord]) -> (f64, Vec<FeedUsageDetail>) {
    let mut total = 0.0;
    let mut by_type: HashMap<FeedType, (f64, f64)> = HashMap::new();
    for record in records {
        let cost = contribution(record.cost);
        total += cost;
        let entry = by_type.entry(record.feed_type).or_insert((0.0, 0.0));
        entry.0 += contribution(record.quantity);
        entry.1 += cost;
    }

    let mut details: Vec<FeedUsageDetail> = by_type
        .into_iter()
        .map(|(feed_type, (quantity, cost))| FeedUsageDetail {
            feed_type,
            total_quantity: round2(quantity),
            unit: feed_type.default_unit(),
            total_cost: round2(cost),
        })
        .collect();
    details.sort_by(|a, b| {
        b.total_cost
            .total_cmp(&a.total_cost)
            .then_with(|| a.feed_type.cmp(&b.feed_type))
    });
    (round2(total), details)
}
