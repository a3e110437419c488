//! # Collection Change Inference
//!
//! The UI surface edits state by replacing whole collections. This module
//! turns a before/after pair into a single explicit mutation intent
//! (`Insert`/`Update`/`Remove`) so the dispatcher can issue exactly one
//! remote operation per replacement.

/// Anything living in an id-keyed collection
pub trait Record {
    fn record_id(&self) -> &str;
}

macro_rules! impl_record {
    ($($ty:ty),* $(,)?) => {
        $(impl Record for $ty {
            fn record_id(&self) -> &str {
                &self.id
            }
        })*
    };
}

impl_record!(
    shared::Supervisor,
    shared::ProgramPlan,
    shared::Member,
    shared::ProgramReport,
    shared::DailyReport,
    shared::DistinguishedSupervisor,
);

/// The single mutation intent a collection replacement represents
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionChange<T> {
    Insert(T),
    Update(T),
    Remove(String),
}

/// Infer the mutation a whole-collection replacement stands for.
///
/// A shorter `new` is a deletion: the first element of `old` whose id is
/// absent from `new`. Otherwise the first element of `new` that is either
/// unknown to `old` (an insert) or known by id but changed in value (an
/// update) wins; if every element is unchanged the replacement is a no-op
/// and no remote call should be issued.
///
/// Only the first detected change is reported. A replacement that both adds
/// and edits in one call persists only the first change remotely, though
/// the caller still commits the full collection locally.
pub fn infer_change<T>(old: &[T], new: &[T]) -> Option<CollectionChange<T>>
where
    T: Record + PartialEq + Clone,
{
    if new.len() < old.len() {
        let removed = old
            .iter()
            .find(|o| !new.iter().any(|n| n.record_id() == o.record_id()))?;
        return Some(CollectionChange::Remove(removed.record_id().to_string()));
    }

    for candidate in new {
        match old.iter().find(|o| o.record_id() == candidate.record_id()) {
            None => return Some(CollectionChange::Insert(candidate.clone())),
            Some(existing) if existing != candidate => {
                return Some(CollectionChange::Update(candidate.clone()))
            }
            Some(_) => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed;
    use shared::{PlanStatus, ProgramPlan};

    fn plans_abc() -> Vec<ProgramPlan> {
        seed::plans()
    }

    #[test]
    fn test_deletion_inferred_from_shorter_collection() {
        let old = plans_abc();
        // Drop the middle element
        let new = vec![old[0].clone(), old[2].clone()];

        let change = infer_change(&old, &new);
        assert_eq!(change, Some(CollectionChange::Remove(old[1].id.clone())));
    }

    #[test]
    fn test_update_inferred_from_changed_value() {
        let old = plans_abc();
        let mut new = old.clone();
        new[1].status = PlanStatus::Executed;
        let expected = new[1].clone();

        let change = infer_change(&old, &new);
        assert_eq!(change, Some(CollectionChange::Update(expected)));
    }

    #[test]
    fn test_insert_inferred_from_unknown_id() {
        let old = plans_abc();
        let mut added = old[0].clone();
        added.id = "plan::new".to_string();
        let mut new = old.clone();
        new.push(added.clone());

        let change = infer_change(&old, &new);
        assert_eq!(change, Some(CollectionChange::Insert(added)));
    }

    #[test]
    fn test_identical_collections_are_a_noop() {
        let old = plans_abc();
        let new = old.clone();

        assert_eq!(infer_change(&old, &new), None);
    }

    #[test]
    fn test_first_detected_change_wins() {
        let old = plans_abc();
        let mut new = old.clone();
        // Edit an existing element and append a new one in the same
        // replacement; the edit comes first in iteration order
        new[0].budget += 50.0;
        let mut added = old[0].clone();
        added.id = "plan::extra".to_string();
        new.push(added);

        match infer_change(&old, &new) {
            Some(CollectionChange::Update(plan)) => assert_eq!(plan.id, old[0].id),
            other => panic!("Expected the update to win, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_collections() {
        let empty: Vec<ProgramPlan> = Vec::new();
        assert_eq!(infer_change(&empty, &empty), None);

        let one = vec![plans_abc().remove(0)];
        match infer_change(&empty, &one) {
            Some(CollectionChange::Insert(plan)) => assert_eq!(plan.id, one[0].id),
            other => panic!("Expected an insert, got {:?}", other),
        }
        assert_eq!(
            infer_change(&one, &empty),
            Some(CollectionChange::Remove(one[0].id.clone()))
        );
    }
}
