use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::common::{Identifiable, Language, RecordId};
use super::period::RecordDate;

pub const UNKNOWN_ANIMAL_NAME: &str = "Unknown Animal";
pub const UNKNOWN_TAG_NUMBER: &str = "N/A";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Cow,
    Buffalo,
    Sheep,
    Goat,
    /// A species value this build does not know about.
    #[serde(other)]
    Unrecognized,
}

impl Species {
    /// Gestation length in days, `None` for species without reference data.
    pub fn gestation_days(self) -> Option<i64> {
        match self {
            Species::Cow => Some(283),
            Species::Buffalo => Some(315),
            Species::Goat => Some(150),
            Species::Sheep => Some(147),
            Species::Unrecognized => None,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Species::Cow => "cow",
            Species::Buffalo => "buffalo",
            Species::Sheep => "sheep",
            Species::Goat => "goat",
            Species::Unrecognized => "unrecognized",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnimalStatus {
    #[default]
    Active,
    Sold,
    Deceased,
}

/// A registered animal. Parent ids are weak references and may dangle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
    pub id: RecordId,
    pub name_en: String,
    pub name_ur: String,
    pub species: Species,
    pub breed: String,
    pub gender: Gender,
    pub tag_number: String,
    pub date_of_birth: RecordDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_data_url: Option<String>,
    #[serde(default)]
    pub status: AnimalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_id: Option<RecordId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Animal {
    pub fn from_new(data: NewAnimal, now: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::generate(),
            name_en: data.name_en,
            name_ur: data.name_ur,
            species: data.species,
            breed: data.breed,
            gender: data.gender,
            tag_number: data.tag_number,
            date_of_birth: data.date_of_birth,
            photo_data_url: data.photo_data_url,
            status: data.status,
            mother_id: data.mother_id,
            father_id: data.father_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the fields present in `patch` and bumps `updated_at`.
    pub fn apply(&mut self, patch: AnimalPatch, now: DateTime<Utc>) {
        if let Some(name_en) = patch.name_en {
            self.name_en = name_en;
        }
        if let Some(name_ur) = patch.name_ur {
            self.name_ur = name_ur;
        }
        if let Some(species) = patch.species {
            self.species = species;
        }
        if let Some(breed) = patch.breed {
            self.breed = breed;
        }
        if let Some(gender) = patch.gender {
            self.gender = gender;
        }
        if let Some(tag_number) = patch.tag_number {
            self.tag_number = tag_number;
        }
        if let Some(date_of_birth) = patch.date_of_birth {
            self.date_of_birth = date_of_birth;
        }
        if let Some(photo) = patch.photo_data_url {
            self.photo_data_url = photo;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(mother_id) = patch.mother_id {
            self.mother_id = mother_id;
        }
        if let Some(father_id) = patch.father_id {
            self.father_id = father_id;
        }
        self.updated_at = now;
    }

    pub fn display_name(&self, language: Language) -> &str {
        match language {
            Language::Ur if !self.name_ur.trim().is_empty() => &self.name_ur,
            _ => &self.name_en,
        }
    }
}

impl Identifiable for Animal {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// Input for registering an animal; id and timestamps are assigned on add.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnimal {
    pub name_en: String,
    pub name_ur: String,
    pub species: Species,
    pub breed: String,
    pub gender: Gender,
    pub tag_number: String,
    pub date_of_birth: RecordDate,
    pub photo_data_url: Option<String>,
    pub status: AnimalStatus,
    pub mother_id: Option<RecordId>,
    pub father_id: Option<RecordId>,
}

/// Partial update. Nested options distinguish "leave as is" from "clear".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimalPatch {
    pub name_en: Option<String>,
    pub name_ur: Option<String>,
    pub species: Option<Species>,
    pub breed: Option<String>,
    pub gender: Option<Gender>,
    pub tag_number: Option<String>,
    pub date_of_birth: Option<RecordDate>,
    pub photo_data_url: Option<Option<String>>,
    pub status: Option<AnimalStatus>,
    pub mother_id: Option<Option<RecordId>>,
    pub father_id: Option<Option<RecordId>>,
}

/// Name and tag used to enrich report rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnimalLabel {
    pub animal_id: RecordId,
    pub name: String,
    pub tag_number: String,
}

/// Read-only snapshot of the registry used for joins inside one report.
#[derive(Debug, Clone, Default)]
pub struct AnimalDirectory {
    animals: Vec<Animal>,
    index: HashMap<RecordId, usize>,
}

impl AnimalDirectory {
    pub fn new(animals: Vec<Animal>) -> Self {
        let index = animals
            .iter()
            .enumerate()
            .map(|(position, animal)| (animal.id.clone(), position))
            .collect();
        Self { animals, index }
    }

    pub fn get(&self, id: &RecordId) -> Option<&Animal> {
        self.index.get(id).map(|position| &self.animals[*position])
    }

    pub fn animals(&self) -> &[Animal] {
        &self.animals
    }

    pub fn len(&self) -> usize {
        self.animals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animals.is_empty()
    }

    /// Resolves `id` to a label, falling back to the unknown placeholders.
    pub fn label(&self, id: &RecordId) -> AnimalLabel {
        match self.get(id) {
            Some(animal) => AnimalLabel {
                animal_id: id.clone(),
                name: animal.name_en.clone(),
                tag_number: animal.tag_number.clone(),
            },
            None => AnimalLabel {
                animal_id: id.clone(),
                name: UNKNOWN_ANIMAL_NAME.into(),
                tag_number: UNKNOWN_TAG_NUMBER.into(),
            },
        }
    }
}
