use crate::domain::{Animal, AnimalDirectory, AnimalPatch, NewAnimal, RecordId};
use crate::engine::clock::Clock;
use crate::storage::{Collection, RecordStore};

use super::{ServiceError, ServiceResult};

pub struct AnimalService;

impl AnimalService {
    pub fn add(
        store: &dyn RecordStore,
        clock: &dyn Clock,
        data: NewAnimal,
    ) -> ServiceResult<Animal> {
        Self::validate(&data.name_en, &data.tag_number)?;
        let mut animals = Collection::<Animal>::load(store)?;
        let animal = Animal::from_new(data, clock.now());
        animals.push(animal.clone());
        animals.save(store)?;
        tracing::info!(animal_id = %animal.id, species = %animal.species, "Animal registered");
        Ok(animal)
    }

    /// Returns `Ok(None)` when no animal has `id`.
    pub fn update(
        store: &dyn RecordStore,
        clock: &dyn Clock,
        id: &RecordId,
        patch: AnimalPatch,
    ) -> ServiceResult<Option<Animal>> {
        let mut animals = Collection::<Animal>::load(store)?;
        let Some(animal) = animals.find_mut(id) else {
            return Ok(None);
        };
        let name = patch.name_en.as_deref().unwrap_or(&animal.name_en);
        let tag = patch.tag_number.as_deref().unwrap_or(&animal.tag_number);
        Self::validate(name, tag)?;
        animal.apply(patch, clock.now());
        let updated = animal.clone();
        animals.save(store)?;
        tracing::debug!(animal_id = %id, "Animal updated");
        Ok(Some(updated))
    }

    /// Removes the animal only. Records that reference it are left in place.
    pub fn remove(store: &dyn RecordStore, id: &RecordId) -> ServiceResult<bool> {
        let mut animals = Collection::<Animal>::load(store)?;
        if animals.retain(|animal| &animal.id != id) == 0 {
            return Ok(false);
        }
        animals.save(store)?;
        tracing::info!(animal_id = %id, "Animal removed");
        Ok(true)
    }

    pub fn get(store: &dyn RecordStore, id: &RecordId) -> ServiceResult<Option<Animal>> {
        let animals = Collection::<Animal>::load(store)?;
        Ok(animals.find(id).cloned())
    }

    /// All animals, most recently registered first.
    pub fn list(store: &dyn RecordStore) -> ServiceResult<Vec<Animal>> {
        let mut animals = Collection::<Animal>::read(store)?;
        animals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(animals)
    }

    pub fn directory(store: &dyn RecordStore) -> ServiceResult<AnimalDirectory> {
        Ok(AnimalDirectory::new(Self::list(store)?))
    }

    fn validate(name_en: &str, tag_number: &str) -> ServiceResult<()> {
        if name_en.trim().is_empty() {
            return Err(ServiceError::Invalid("Animal name is required".into()));
        }
        if tag_number.trim().is_empty() {
            return Err(ServiceError::Invalid("Tag number is required".into()));
        }
        Ok(())
    }
}
