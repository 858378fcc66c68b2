use crate::types::{Workout, WorkoutId};
use std::collections::HashSet;

/// Ordered workouts of the current user; insertion order is display order.
#[derive(Debug, Default)]
pub struct WorkoutCollection {
    workouts: Vec<Workout>,
}

impl WorkoutCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a workout. One whose id is already present is ignored.
    pub fn add(&mut self, workout: Workout) {
        if self.find_by_id(workout.id()).is_some() {
            tracing::warn!(id = %workout.id(), "ignoring workout with duplicate id");
            return;
        }
        self.workouts.push(workout);
    }

    pub fn find_by_id(&self, id: &WorkoutId) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    /// Replace the whole contents. Later duplicates of an id are dropped.
    pub fn restore(&mut self, workouts: Vec<Workout>) {
        let total = workouts.len();
        let mut seen = HashSet::with_capacity(total);
        let kept: Vec<Workout> = workouts
            .into_iter()
            .filter(|w| seen.insert(w.id().clone()))
            .collect();

        if kept.len() != total {
            tracing::warn!(
                dropped = total - kept.len(),
                "duplicate workout ids in restored data"
            );
        }

        self.workouts = kept;
    }

    pub fn export(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn clear(&mut self) {
        self.workouts.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Workout> {
        self.workouts.iter()
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }
}

impl<'a> IntoIterator for &'a WorkoutCollection {
    type Item = &'a Workout;
    type IntoIter = std::slice::Iter<'a, Workout>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coordinates;

    fn run(distance: f64) -> Workout {
        Workout::running(Coordinates::new(10.0, 20.0), distance, 25.0, 150.0)
    }

    #[test]
    fn test_add_and_find() {
        let mut c = WorkoutCollection::new();
        let w = run(5.0);
        let id = w.id().clone();
        c.add(w.clone());

        assert_eq!(c.len(), 1);
        assert_eq!(c.find_by_id(&id), Some(&w));
        assert!(c.find_by_id(&WorkoutId::from("never-added")).is_none());
    }

    #[test]
    fn test_export_keeps_insertion_order() {
        let mut c = WorkoutCollection::new();
        let a = run(1.0);
        let b = run(2.0);
        let c_ = run(3.0);
        c.add(a.clone());
        c.add(b.clone());
        c.add(c_.clone());

        let ids: Vec<_> = c.export().iter().map(|w| w.id().clone()).collect();
        assert_eq!(ids, vec![a.id().clone(), b.id().clone(), c_.id().clone()]);
    }

    #[test]
    fn test_restore_replaces_contents() {
        let mut c = WorkoutCollection::new();
        c.add(run(1.0));
        c.add(run(2.0));

        let fresh = run(9.0);
        c.restore(vec![fresh.clone()]);
        assert_eq!(c.export(), std::slice::from_ref(&fresh));
    }

    #[test]
    fn test_restore_drops_duplicate_ids() {
        let w = run(4.0);
        let mut c = WorkoutCollection::new();
        c.restore(vec![w.clone(), w.clone(), run(5.0)]);

        assert_eq!(c.len(), 2);
        assert_eq!(c.export()[0], w);
    }

    #[test]
    fn test_add_ignores_duplicate_id() {
        let mut c = WorkoutCollection::new();
        let w = run(5.0);
        c.add(w.clone());
        c.add(w.clone());

        assert_eq!(c.len(), 1);
        assert_eq!(c.export(), std::slice::from_ref(&w));
    }

    #[test]
    fn test_clear() {
        let mut c = WorkoutCollection::new();
        c.add(run(1.0));
        c.clear();
        assert!(c.is_empty());
        assert_eq!((&c).into_iter().count(), 0);
    }
}
