//! crates/page_builder_core/src/ordering.rs
//!
//! Sibling ordering for sections within a page and components within a section.
//! Every function here returns its siblings renumbered to a contiguous `0..n`.

use crate::domain::{Component, Section};
use std::collections::HashSet;
use uuid::Uuid;

/// Errors raised when a requested ordering cannot be applied.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum OrderingError {
    #[error("Index {index} is out of range for {len} items")]
    OutOfRange { index: usize, len: usize },
    #[error("Expected {expected} ids but got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("Unknown id {0}")]
    UnknownId(Uuid),
    #[error("Duplicate id {0}")]
    DuplicateId(Uuid),
}

/// Anything that occupies a numbered slot among its siblings.
pub trait Ordered {
    fn id(&self) -> Uuid;
    fn order(&self) -> i32;
    fn set_order(&mut self, order: i32);
}

impl Ordered for Section {
    fn id(&self) -> Uuid {
        self.id
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn set_order(&mut self, order: i32) {
        self.order = order;
    }
}

impl Ordered for Component {
    fn id(&self) -> Uuid {
        self.id
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn set_order(&mut self, order: i32) {
        self.order = order;
    }
}

/// Sorts by the current order index, then rewrites indices to `0..n`.
pub fn renumber<T: Ordered>(mut items: Vec<T>) -> Vec<T> {
    items.sort_by_key(|item| item.order());
    for (index, item) in items.iter_mut().enumerate() {
        item.set_order(index as i32);
    }
    items
}

/// Moves the item at `from` to `to` and renumbers every sibling.
///
/// `from` and `to` are positions in the current ordering, not ids.
pub fn reorder<T: Ordered>(items: Vec<T>, from: usize, to: usize) -> Result<Vec<T>, OrderingError> {
    let len = items.len();
    for index in [from, to] {
        if index >= len {
            return Err(OrderingError::OutOfRange { index, len });
        }
    }

    let mut items = renumber(items);
    let moved = items.remove(from);
    items.insert(to, moved);
    for (index, item) in items.iter_mut().enumerate() {
        item.set_order(index as i32);
    }
    Ok(items)
}

/// Applies a complete client-supplied ordering. `ids` must name every sibling
/// exactly once.
pub fn apply_order<T: Ordered>(items: Vec<T>, ids: &[Uuid]) -> Result<Vec<T>, OrderingError> {
    if ids.len() != items.len() {
        return Err(OrderingError::LengthMismatch {
            expected: items.len(),
            actual: ids.len(),
        });
    }

    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        if !seen.insert(*id) {
            return Err(OrderingError::DuplicateId(*id));
        }
    }

    let mut remaining: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(ids.len());
    for (index, id) in ids.iter().enumerate() {
        let slot = remaining
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|item| item.id() == *id))
            .ok_or(OrderingError::UnknownId(*id))?;
        if let Some(mut item) = slot.take() {
            item.set_order(index as i32);
            ordered.push(item);
        }
    }
    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SectionSettings;

    fn sections(n: usize) -> Vec<Section> {
        let page_id = Uuid::new_v4();
        (0..n)
            .map(|i| Section {
                id: Uuid::new_v4(),
                page_id,
                name: format!("section {}", i),
                order: i as i32,
                settings: SectionSettings::default(),
            })
            .collect()
    }

    fn orders<T: Ordered>(items: &[T]) -> Vec<i32> {
        items.iter().map(Ordered::order).collect()
    }

    #[test]
    fn reorder_moves_forward_and_renumbers() {
        let items = sections(4);
        let ids: Vec<Uuid> = items.iter().map(|s| s.id).collect();

        let moved = reorder(items, 0, 2).unwrap();
        assert_eq!(orders(&moved), vec![0, 1, 2, 3]);
        assert_eq!(
            moved.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![ids[1], ids[2], ids[0], ids[3]]
        );
    }

    #[test]
    fn reorder_moves_backward() {
        let items = sections(3);
        let ids: Vec<Uuid> = items.iter().map(|s| s.id).collect();

        let moved = reorder(items, 2, 0).unwrap();
        assert_eq!(
            moved.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![ids[2], ids[0], ids[1]]
        );
        assert_eq!(orders(&moved), vec![0, 1, 2]);
    }

    #[test]
    fn reorder_rejects_out_of_range() {
        let err = reorder(sections(2), 0, 2).unwrap_err();
        assert_eq!(err, OrderingError::OutOfRange { index: 2, len: 2 });
    }

    #[test]
    fn renumber_closes_gaps() {
        let mut items = sections(3);
        items[0].order = 4;
        items[1].order = 9;
        items[2].order = 1;
        let renumbered = renumber(items);
        assert_eq!(orders(&renumbered), vec![0, 1, 2]);
        assert_eq!(renumbered[0].name, "section 2");
    }

    #[test]
    fn apply_order_validates_ids() {
        let items = sections(3);
        let ids: Vec<Uuid> = items.iter().map(|s| s.id).collect();

        let dup = apply_order(items.clone(), &[ids[0], ids[0], ids[1]]).unwrap_err();
        assert_eq!(dup, OrderingError::DuplicateId(ids[0]));

        let stranger = Uuid::new_v4();
        let unknown = apply_order(items.clone(), &[ids[0], ids[1], stranger]).unwrap_err();
        assert_eq!(unknown, OrderingError::UnknownId(stranger));

        let short = apply_order(items.clone(), &ids[..2]).unwrap_err();
        assert_eq!(short, OrderingError::LengthMismatch { expected: 3, actual: 2 });

        let applied = apply_order(items, &[ids[2], ids[0], ids[1]]).unwrap();
        assert_eq!(applied[0].id, ids[2]);
        assert_eq!(orders(&applied), vec![0, 1, 2]);
    }
}
