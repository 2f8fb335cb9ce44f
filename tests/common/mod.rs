#![allow(dead_code)]

use std::sync::Mutex;

use chrono::NaiveDate;
use farm_core::{
    config::{Config, ConfigManager},
    domain::{AnimalStatus, Gender, NewAnimal, RecordDate, Species},
    engine::{FarmManager, FixedClock},
    storage::MemoryStore,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// Creates an in-memory manager pinned to `today` plus a config manager
/// rooted in a unique temp directory.
pub fn setup_test_env(today: NaiveDate) -> (FarmManager, ConfigManager) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let config_manager =
        ConfigManager::with_base_dir(base).expect("create config manager for temp dir");
    let config = config_manager.load().expect("load default config");
    let manager = FarmManager::new(
        Box::new(MemoryStore::new()),
        Box::new(FixedClock::on(today)),
        config,
    );
    (manager, config_manager)
}

pub fn manager_on(today: NaiveDate) -> FarmManager {
    manager_with(MemoryStore::new(), today)
}

/// Manager over a store that already holds data, such as an imported backup.
pub fn manager_with(store: MemoryStore, today: NaiveDate) -> FarmManager {
    FarmManager::new(
        Box::new(store),
        Box::new(FixedClock::on(today)),
        Config::default(),
    )
}

pub fn animal(name: &str, species: Species) -> NewAnimal {
    NewAnimal {
        name_en: name.into(),
        name_ur: String::new(),
        species,
        breed: "Sahiwal".into(),
        gender: Gender::Female,
        tag_number: format!("TAG-{name}"),
        date_of_birth: RecordDate::new("2020-02-14"),
        photo_data_url: None,
        status: AnimalStatus::Active,
        mother_id: None,
        father_id: None,
    }
}
