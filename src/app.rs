use crate::codec;
use crate::collection::WorkoutCollection;
use crate::dlog;
use crate::error::AppError;
use crate::store::{KeyValueStore, WORKOUTS_SLOT};
use crate::types::{Workout, WorkoutId, WorkoutInput};
use anyhow::{Result, bail};

/// Application state, built once at startup and handed to whoever needs it.
///
/// History is restored inside `start`, so it always lands before the first
/// `log_workout`.
pub struct AppContext<S: KeyValueStore> {
    store: S,
    workouts: WorkoutCollection,
}

impl<S: KeyValueStore> AppContext<S> {
    pub fn start(store: S) -> Result<Self> {
        let stored = store.get(WORKOUTS_SLOT)?;
        let decoded = stored.as_deref().map(codec::decode).unwrap_or_default();

        let mut workouts = WorkoutCollection::new();
        workouts.restore(decoded);
        tracing::info!(workouts = workouts.len(), "history loaded");

        Ok(Self { store, workouts })
    }

    pub const fn workouts(&self) -> &WorkoutCollection {
        &self.workouts
    }

    /// Validate, build, store and append one workout; returns what was logged.
    ///
    /// On any error nothing is added and the stored slot is untouched.
    pub fn log_workout(&mut self, input: &WorkoutInput) -> Result<Workout, AppError> {
        let valid = input.validate()?;
        let workout = Workout::from_input(&valid);

        let mut next = self.workouts.export().to_vec();
        next.push(workout.clone());
        self.write(&next)?;

        tracing::info!(
            id = %workout.id(),
            kind = %workout.kind(),
            distance_km = workout.distance_km(),
            duration_min = workout.duration_min(),
            "workout logged"
        );

        self.workouts.add(workout.clone());
        Ok(workout)
    }

    /// Resolve a UI selection; `None` means the caller should ignore it.
    pub fn select(&self, id: &str) -> Option<&Workout> {
        let found = self.workouts.find_by_id(&WorkoutId::from(id));
        if found.is_none() {
            dlog!("select_miss id={id}");
        }
        found
    }

    /// Erase the stored slot and empty the in-memory collection.
    pub fn reset(&mut self) -> Result<()> {
        self.store.remove(WORKOUTS_SLOT)?;
        let dropped = self.workouts.len();
        self.workouts.clear();
        tracing::info!(dropped, "history reset");
        Ok(())
    }

    pub fn export_text(&self) -> Result<String> {
        codec::encode(self.workouts.export())
    }

    /// Replace the whole history with the workouts found in `text`.
    pub fn import_text(&mut self, text: &str) -> Result<usize> {
        let decoded = codec::decode(text);
        if decoded.is_empty() {
            bail!("No workouts found in import; keeping current history.");
        }

        self.write(&decoded)?;
        self.workouts.restore(decoded);
        tracing::info!(workouts = self.workouts.len(), "history imported");
        Ok(self.workouts.len())
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn write(&mut self, workouts: &[Workout]) -> Result<()> {
        let text = codec::encode(workouts)?;
        self.store.set(WORKOUTS_SLOT, &text)?;
        dlog!("persisted workouts={} bytes={}", workouts.len(), text.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputError;
    use crate::store::MemoryStore;
    use crate::types::{Coordinates, DerivedMetric, WorkoutKind};

    fn input(kind: WorkoutKind, distance: &str, duration: &str, extra: &str) -> WorkoutInput {
        WorkoutInput {
            kind,
            coords: Coordinates::new(10.0, 20.0),
            distance: distance.to_string(),
            duration: duration.to_string(),
            extra: extra.to_string(),
        }
    }

    /// Accepts reads, refuses every write.
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.get(key)
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<()> {
            bail!("slot {key} is read-only")
        }

        fn remove(&mut self, key: &str) -> Result<()> {
            bail!("slot {key} is read-only")
        }
    }

    #[test]
    fn test_start_empty() {
        let app = AppContext::start(MemoryStore::new()).unwrap();
        assert!(app.workouts().is_empty());
    }

    #[test]
    fn test_start_with_garbage_is_empty() {
        let mut store = MemoryStore::new();
        store.set(WORKOUTS_SLOT, "}}garbage{{").unwrap();
        let app = AppContext::start(store).unwrap();
        assert!(app.workouts().is_empty());
    }

    #[test]
    fn test_log_workout_persists() {
        let mut app = AppContext::start(MemoryStore::new()).unwrap();
        let w = app
            .log_workout(&input(WorkoutKind::Running, "5", "25", "150"))
            .unwrap();
        assert_eq!(w.metric(), DerivedMetric::Pace(5.0));
        assert_eq!(app.select(w.id().as_str()), Some(&w));
        let id = w.id().clone();

        let store = app.into_store();
        let stored = store.get(WORKOUTS_SLOT).unwrap().unwrap();
        let decoded = codec::decode(&stored);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].id(), &id);
    }

    #[test]
    fn test_invalid_input_changes_nothing() {
        let mut app = AppContext::start(MemoryStore::new()).unwrap();
        app.log_workout(&input(WorkoutKind::Cycling, "20", "60", "200"))
            .unwrap();

        let err = app
            .log_workout(&input(WorkoutKind::Running, "0", "25", "150"))
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Invalid(InputError::NotPositive {
                field: "distance",
                ..
            })
        ));
        assert_eq!(app.workouts().len(), 1);

        let stored = app.into_store().get(WORKOUTS_SLOT).unwrap().unwrap();
        assert_eq!(codec::decode(&stored).len(), 1);
    }

    #[test]
    fn test_failed_write_changes_nothing() {
        let mut app = AppContext::start(ReadOnlyStore(MemoryStore::new())).unwrap();
        let err = app
            .log_workout(&input(WorkoutKind::Running, "5", "25", "150"))
            .unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        assert!(app.workouts().is_empty());

        assert!(app.reset().is_err());
    }

    #[test]
    fn test_history_survives_restart() {
        let mut app = AppContext::start(MemoryStore::new()).unwrap();
        app.log_workout(&input(WorkoutKind::Running, "5", "25", "150"))
            .unwrap();
        app.log_workout(&input(WorkoutKind::Cycling, "20", "60", "0"))
            .unwrap();
        let before: Vec<Workout> = app.workouts().export().to_vec();

        let app = AppContext::start(app.into_store()).unwrap();
        assert_eq!(app.workouts().export(), before.as_slice());
    }

    #[test]
    fn test_select() {
        let mut app = AppContext::start(MemoryStore::new()).unwrap();
        let id = app
            .log_workout(&input(WorkoutKind::Running, "5", "25", "150"))
            .unwrap()
            .id()
            .clone();

        assert_eq!(app.select(id.as_str()).map(Workout::id), Some(&id));
        assert!(app.select("does-not-exist").is_none());
    }

    #[test]
    fn test_reset_clears_memory_and_store() {
        let mut app = AppContext::start(MemoryStore::new()).unwrap();
        app.log_workout(&input(WorkoutKind::Running, "5", "25", "150"))
            .unwrap();

        app.reset().unwrap();
        assert!(app.workouts().is_empty());

        let store = app.into_store();
        assert_eq!(store.get(WORKOUTS_SLOT).unwrap(), None);
        assert!(AppContext::start(store).unwrap().workouts().is_empty());
    }

    #[test]
    fn test_import_replaces_history() {
        let mut source = AppContext::start(MemoryStore::new()).unwrap();
        source
            .log_workout(&input(WorkoutKind::Cycling, "20", "60", "200"))
            .unwrap();
        let text = source.export_text().unwrap();

        let mut app = AppContext::start(MemoryStore::new()).unwrap();
        app.log_workout(&input(WorkoutKind::Running, "5", "25", "150"))
            .unwrap();
        app.log_workout(&input(WorkoutKind::Running, "8", "40", "160"))
            .unwrap();

        assert_eq!(app.import_text(&text).unwrap(), 1);
        assert_eq!(app.workouts().export(), source.workouts().export());

        let app = AppContext::start(app.into_store()).unwrap();
        assert_eq!(app.workouts().len(), 1);
    }

    #[test]
    fn test_import_nothing_keeps_history() {
        let mut app = AppContext::start(MemoryStore::new()).unwrap();
        app.log_workout(&input(WorkoutKind::Running, "5", "25", "150"))
            .unwrap();

        assert!(app.import_text("not json").is_err());
        assert_eq!(app.workouts().len(), 1);
    }
}
