pub mod animal;
pub mod common;
pub mod feed;
pub mod health;
pub mod milk;
pub mod period;
pub mod report;
pub mod reproduction;
pub mod units;

pub use animal::{
    Animal, AnimalDirectory, AnimalLabel, AnimalPatch, AnimalStatus, Gender, NewAnimal, Species,
};
pub use common::{round2, Identifiable, Language, RecordId};
pub use feed::{
    AnimalFeedSummary, DailyFeedSummary, FeedRecord, FeedReport, FeedType, FeedUnit,
    FeedUsageDetail, NewFeedRecord,
};
pub use health::{AnimalHealthSummary, HealthRecord, HealthRecordType, NewHealthRecord};
pub use milk::{
    AnimalMilkSummary, DailyIncome, MilkRecord, MilkSettings, MilkSummary, MilkUnit, NewMilkRecord,
    TimeOfDay,
};
pub use period::{filter_by_period, PeriodFilter, PeriodPreset, RecordDate};
pub use report::{FinancialSummary, MonthlyComparisonPoint, ProfitPosition};
pub use reproduction::{
    CalfData, CalvingEase, CalvingRecord, DeliveryStatus, InseminationPatch, InseminationRecord,
    InseminationType, InseminationUpdate, InseminationWarning, NewCalving, NewInsemination,
    NewPregnancyCheck, PregnancyCheckRecord, PregnancyResult, ReproductionExpenses,
    UpcomingDelivery,
};
pub use units::{to_effective_quantity, KG_PER_LITRE};
