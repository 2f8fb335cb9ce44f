use chrono::NaiveDate;

use crate::domain::{Animal, AnimalStatus, Gender, NewAnimal, RecordDate, Species};
use crate::engine::clock::FixedClock;
use crate::storage::MemoryStore;

use super::AnimalService;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn clock_on(y: i32, m: u32, d: u32) -> FixedClock {
    FixedClock::on(date(y, m, d))
}

pub fn new_animal(name: &str, species: Species) -> NewAnimal {
    NewAnimal {
        name_en: name.into(),
        name_ur: String::new(),
        species,
        breed: "Local".into(),
        gender: Gender::Female,
        tag_number: format!("T-{name}"),
        date_of_birth: RecordDate::new("2019-05-01"),
        photo_data_url: None,
        status: AnimalStatus::Active,
        mother_id: None,
        father_id: None,
    }
}

pub fn seed_animal(store: &MemoryStore, name: &str, species: Species) -> Animal {
    AnimalService::add(store, &clock_on(2024, 1, 1), new_animal(name, species)).unwrap()
}
