mod common;

use common::{animal, date, manager_on, manager_with};
use farm_core::{
    domain::{
        FeedType, HealthRecordType, InseminationType, MilkSettings, MilkUnit, NewFeedRecord,
        NewHealthRecord, NewInsemination, NewMilkRecord, NewPregnancyCheck, PeriodFilter,
        PregnancyResult, RecordId, Species, TimeOfDay,
    },
    engine::services::{
        FeedService, FinancialService, HealthService, MilkService, ReproductionService,
    },
    storage::{EntityKind, MemoryStore},
};
use serde_json::json;

fn milking(animal_id: &RecordId, quantity: f64, unit: MilkUnit) -> NewMilkRecord {
    NewMilkRecord {
        animal_id: animal_id.clone(),
        date: date(2024, 5, 1),
        time_of_day: TimeOfDay::Morning,
        quantity,
        unit,
    }
}

fn insemination(animal_id: &RecordId, on: chrono::NaiveDate) -> NewInsemination {
    NewInsemination {
        animal_id: animal_id.clone(),
        insemination_date: on,
        insemination_type: InseminationType::Artificial,
        semen_details: "Holstein straw 114".into(),
        vet_name: Some("Dr. Saima".into()),
        expense: Some(800.0),
        notes: None,
    }
}

#[test]
fn cow_insemination_projects_delivery_283_days_out() {
    let mut manager = manager_on(date(2024, 1, 1));
    let cow = manager
        .register_animal(animal("Rani", Species::Cow))
        .unwrap();
    let record = manager
        .record_insemination(insemination(&cow.id, date(2024, 1, 1)))
        .unwrap();
    assert_eq!(record.expected_delivery_date.parse(), Some(date(2024, 10, 10)));
}

#[test]
fn later_rate_change_leaves_earlier_income_untouched() {
    let mut manager = manager_on(date(2024, 5, 1));
    let cow = manager
        .register_animal(animal("Rani", Species::Cow))
        .unwrap();
    manager
        .update_milk_settings(MilkSettings::new(100.0, MilkUnit::Litre))
        .unwrap();
    let record = manager
        .log_milk(milking(&cow.id, 10.0, MilkUnit::Litre))
        .unwrap();
    assert_eq!(record.rate_snapshot, 100.0);
    assert_eq!(record.rate_unit_snapshot, MilkUnit::Litre);
    assert_eq!(record.income(), 1000.0);

    manager
        .update_milk_settings(MilkSettings::new(200.0, MilkUnit::Litre))
        .unwrap();
    let may = PeriodFilter::for_month(2024, 5);
    assert_eq!(manager.milk_summary(Some(&may)).unwrap().total_earnings, 1000.0);
}

#[test]
fn kilogram_milk_priced_per_litre_converts_through_density() {
    let mut manager = manager_on(date(2024, 5, 1));
    let cow = manager
        .register_animal(animal("Rani", Species::Cow))
        .unwrap();
    manager
        .update_milk_settings(MilkSettings::new(100.0, MilkUnit::Litre))
        .unwrap();
    let record = manager
        .log_milk(milking(&cow.id, 10.0, MilkUnit::Kg))
        .unwrap();
    assert!((record.income() - 970.87).abs() < 0.01);

    let summary = manager.milk_summary(None).unwrap();
    assert_eq!(summary.total_earnings, 970.87);
    assert_eq!(summary.total_quantity_kg, 10.0);
    assert_eq!(summary.total_quantity_litre, 0.0);
}

#[test]
fn deleting_insemination_removes_its_pregnancy_check() {
    let mut manager = manager_on(date(2024, 3, 1));
    let cow = manager
        .register_animal(animal("Rani", Species::Cow))
        .unwrap();
    let parent = manager
        .record_insemination(insemination(&cow.id, date(2024, 1, 1)))
        .unwrap();
    manager
        .record_pregnancy_check(NewPregnancyCheck {
            insemination_id: parent.id.clone(),
            animal_id: cow.id.clone(),
            check_date: date(2024, 2, 15),
            result: PregnancyResult::Pregnant,
            vet_name: None,
            expense: None,
            notes: None,
        })
        .unwrap();

    assert!(manager.remove_insemination(&parent.id).unwrap());
    let checks = ReproductionService::pregnancy_checks(manager.store()).unwrap();
    assert!(checks.is_empty());
    let gone = ReproductionService::insemination(manager.store(), &parent.id).unwrap();
    assert!(gone.is_none());
}

#[test]
fn health_summary_lists_every_animal_without_records() {
    let mut manager = manager_on(date(2024, 3, 1));
    manager
        .register_animal(animal("Rani", Species::Cow))
        .unwrap();
    manager
        .register_animal(animal("Kali", Species::Buffalo))
        .unwrap();

    let rows = manager.health_per_animal(None).unwrap();
    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row.total_health_cost, 0.0);
        assert_eq!(row.vaccination_count, 0);
        assert_eq!(row.treatment_count, 0);
        assert_eq!(row.checkup_count, 0);
    }
}

#[test]
fn weekly_trend_has_one_entry_per_day() {
    let mut manager = manager_on(date(2024, 5, 7));
    let cow = manager
        .register_animal(animal("Rani", Species::Cow))
        .unwrap();
    manager
        .update_milk_settings(MilkSettings::new(100.0, MilkUnit::Litre))
        .unwrap();
    manager
        .log_milk(milking(&cow.id, 3.0, MilkUnit::Litre))
        .unwrap();

    let trend = MilkService::daily_income_trend(manager.store(), date(2024, 5, 7), 7).unwrap();
    assert_eq!(trend.len(), 7);
    assert_eq!(trend[0].date, date(2024, 5, 1));
    assert_eq!(trend[0].income, 300.0);
    assert_eq!(trend[6].date, date(2024, 5, 7));
    assert!(trend[1..].iter().all(|day| day.income == 0.0));
}

#[test]
fn net_profit_matches_its_components_for_every_period() {
    let mut manager = manager_on(date(2024, 6, 30));
    let cow = manager
        .register_animal(animal("Rani", Species::Cow))
        .unwrap();
    manager
        .update_milk_settings(MilkSettings::new(95.5, MilkUnit::Litre))
        .unwrap();
    for (month, quantity) in [(4, 12.5), (5, 9.25), (6, 14.0)] {
        let mut entry = milking(&cow.id, quantity, MilkUnit::Litre);
        entry.date = date(2024, month, 10);
        manager.log_milk(entry).unwrap();
        manager
            .log_feed(NewFeedRecord {
                animal_id: cow.id.clone(),
                date: date(2024, month, 11),
                feed_type: FeedType::Concentrate,
                quantity: 5.0,
                unit: FeedType::Concentrate.default_unit(),
                cost: 333.33,
            })
            .unwrap();
        manager
            .log_health(NewHealthRecord {
                animal_id: cow.id.clone(),
                record_type: HealthRecordType::Checkup,
                date: date(2024, month, 12),
                notes: None,
                medication: None,
                next_due_date: None,
                expense: Some(41.1),
            })
            .unwrap();
    }
    manager
        .record_insemination(insemination(&cow.id, date(2024, 5, 20)))
        .unwrap();

    let store = manager.store();
    let periods = [
        None,
        Some(PeriodFilter::for_year(2024)),
        Some(PeriodFilter::for_month(2024, 5)),
        Some(PeriodFilter::for_month(2024, 6)),
        Some(PeriodFilter::for_year(2023)),
    ];
    for period in periods.iter().map(Option::as_ref) {
        let expected = MilkService::earnings_for_period(store, period).unwrap()
            - FeedService::total_cost(store, period).unwrap()
            - HealthService::expenses_for_period(store, period).unwrap()
            - ReproductionService::expenses(store, period).unwrap().total;
        let net = FinancialService::net_profit_or_loss(store, period).unwrap();
        assert!((net - expected).abs() < 1e-9, "period {period:?}");
        let summary = FinancialService::summary(store, period).unwrap();
        assert!((summary.net_profit_or_loss - expected).abs() < 1e-9);
    }
}

#[test]
fn period_filter_only_returns_records_inside_the_period() {
    let mut manager = manager_on(date(2024, 6, 30));
    let cow = manager
        .register_animal(animal("Rani", Species::Cow))
        .unwrap();
    for (y, m) in [(2023, 12), (2024, 1), (2024, 2), (2024, 2)] {
        let mut entry = milking(&cow.id, 1.0, MilkUnit::Litre);
        entry.date = date(y, m, 5);
        manager.log_milk(entry).unwrap();
    }
    let all = MilkService::list(manager.store()).unwrap();
    let feb = PeriodFilter::for_month(2024, 2);
    let filtered: Vec<_> = all
        .iter()
        .filter(|record| feb.includes(&record.date))
        .collect();
    assert_eq!(filtered.len(), 2);
    for record in filtered {
        let month = record.date.parse().map(|d| d.format("%Y-%m").to_string());
        assert_eq!(month.as_deref(), Some("2024-02"));
    }
}

#[test]
fn imported_backup_with_timestamp_ids_feeds_every_report() {
    let dam = "1716900000000-k2j4h5g";
    let store = MemoryStore::with_documents([
        (
            EntityKind::Animal,
            vec![json!({
                "id": dam,
                "nameEn": "Rani",
                "nameUr": "رانی",
                "species": "cow",
                "breed": "Sahiwal",
                "gender": "female",
                "tagNumber": "PK-17",
                "dateOfBirth": "2021-02-03",
                "status": "active",
                "createdAt": "2024-05-28T10:00:00.000Z",
                "updatedAt": "2024-05-28T10:00:00.000Z"
            })],
        ),
        (
            EntityKind::MilkRecord,
            vec![
                json!({
                    "id": "1717000000000-abc1234",
                    "animalId": dam,
                    "date": "2024-06-01",
                    "timeOfDay": "morning",
                    "quantity": 10,
                    "unit": "litre",
                    "rateSnapshot": 100,
                    "rateUnitSnapshot": "litre",
                    "createdAt": "2024-06-01T06:00:00.000Z"
                }),
                json!({
                    "id": "1717000000001-def5678",
                    "animalId": dam,
                    "date": "2024-06-01",
                    "timeOfDay": "evening",
                    "quantity": 4,
                    "unit": "litre",
                    "rateSnapshot": null,
                    "rateUnitSnapshot": "litre",
                    "createdAt": "2024-06-01T17:00:00.000Z"
                }),
            ],
        ),
        (
            EntityKind::FeedRecord,
            vec![json!({
                "id": "1717000000002-ghi9012",
                "animalId": dam,
                "date": "2024-06-01",
                "feedType": "concentrate",
                "quantity": 3,
                "unit": "kg",
                "cost": 240,
                "createdAt": "2024-06-01T07:00:00.000Z"
            })],
        ),
    ]);
    let mut manager = manager_with(store, date(2024, 6, 2));
    let june = PeriodFilter::for_month(2024, 6);

    let milk = manager.milk_per_animal(Some(&june)).unwrap();
    assert_eq!(milk.len(), 1);
    assert_eq!(milk[0].animal.name, "Rani");
    assert_eq!(milk[0].total_quantity_litre, 14.0);
    assert_eq!(milk[0].total_earnings, 1000.0);

    let summary = manager.financial_summary(Some(&june)).unwrap();
    assert_eq!(summary.feed_cost, 240.0);
    assert_eq!(summary.net_profit_or_loss, 760.0);

    let record = manager
        .record_insemination(insemination(&RecordId::from(dam), date(2024, 6, 2)))
        .unwrap();
    assert_eq!(record.expected_delivery_date.parse(), Some(date(2025, 3, 12)));
}
