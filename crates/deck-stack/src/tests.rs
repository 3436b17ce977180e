use std::collections::HashMap;

use deck_core::{Event, TopicKey, TopicKind};

use super::*;

fn stack_with(windows: &[WindowId]) -> ZOrderStack {
    let mut stack = ZOrderStack::new();
    for &id in windows {
        stack.add_window(id);
    }
    stack
}

#[test]
fn test_add_window_stacks_densely() {
    let stack = stack_with(&[1, 2, 3]);
    assert_eq!(stack.rank(1), Some(200));
    assert_eq!(stack.rank(2), Some(204));
    assert_eq!(stack.rank(3), Some(208));
    assert!(!stack.is_pinned(1));
}

#[test]
fn test_remove_window_closes_the_gap() {
    let mut stack = stack_with(&[1, 2, 3, 4]);
    stack.remove_window(2);
    assert_eq!(stack.rank(2), None);
    assert_eq!(stack.rank(1), Some(200));
    assert_eq!(stack.rank(3), Some(204));
    assert_eq!(stack.rank(4), Some(208));
}

#[test]
fn test_pin_moves_to_pinned_band_and_compacts() {
    let mut stack = stack_with(&[1, 2, 3, 4]);
    stack.pin(2);
    assert!(stack.is_pinned(2));
    assert_eq!(stack.rank(2), Some(1));
    // The unpinned band closes up behind the pinned window.
    assert_eq!(stack.rank(1), Some(200));
    assert_eq!(stack.rank(3), Some(204));
    assert_eq!(stack.rank(4), Some(208));

    stack.pin(4);
    assert_eq!(stack.rank(4), Some(5));
    assert_eq!(stack.unpinned().len(), 2);
}

#[test]
fn test_unpin_returns_to_top_of_unpinned() {
    let mut stack = stack_with(&[1, 2, 3]);
    stack.pin(1);
    stack.pin(2);
    assert_eq!(stack.rank(1), Some(1));
    assert_eq!(stack.rank(2), Some(5));

    stack.unpin(1);
    assert!(!stack.is_pinned(1));
    // 3 stayed at 200, so the unpinned window re-enters above it.
    assert_eq!(stack.rank(3), Some(200));
    assert_eq!(stack.rank(1), Some(204));
    // The pinned band compacts down to its base.
    assert_eq!(stack.rank(2), Some(1));
}

#[test]
fn test_bring_unpinned_to_top_swaps_ranks() {
    let mut stack = stack_with(&[1, 2, 3]);
    stack.bring_unpinned_to_top(1);
    assert_eq!(stack.rank(1), Some(208));
    assert_eq!(stack.rank(3), Some(200));
    assert_eq!(stack.rank(2), Some(204));

    // Raising the top window changes nothing.
    stack.bring_unpinned_to_top(1);
    assert_eq!(stack.rank(1), Some(208));
    assert_eq!(stack.rank(3), Some(200));
}

#[test]
fn test_temporary_top_overrides_and_restores() {
    let mut stack = stack_with(&[1, 2]);
    stack.set_temporary_top(1);
    assert_eq!(stack.temporary_top(), Some(1));
    assert_eq!(stack.rank(1), Some(496));

    // A second override sends the first window back where it was.
    stack.set_temporary_top(2);
    assert_eq!(stack.rank(1), Some(200));
    assert_eq!(stack.rank(2), Some(496));

    stack.clear_temporary_top();
    assert_eq!(stack.temporary_top(), None);
    assert_eq!(stack.rank(2), Some(204));
}

#[test]
fn test_temporary_top_works_for_pinned_windows() {
    let mut stack = stack_with(&[1, 2]);
    stack.pin(1);
    stack.set_temporary_top(1);
    assert_eq!(stack.rank(1), Some(496));
    stack.clear_temporary_top();
    assert_eq!(stack.rank(1), Some(1));
}

#[test]
fn test_pin_restores_pending_temporary_top() {
    let mut stack = stack_with(&[1, 2]);
    stack.set_temporary_top(2);
    stack.pin(1);
    // Pinning first settles the peeked window back into its band.
    assert_eq!(stack.temporary_top(), None);
    assert_eq!(stack.rank(2), Some(200));
    assert_eq!(stack.rank(1), Some(1));
}

#[test]
fn test_remove_window_drops_its_override() {
    let mut stack = stack_with(&[1, 2]);
    stack.set_temporary_top(1);
    stack.remove_window(1);
    assert_eq!(stack.temporary_top(), None);
    assert_eq!(stack.rank(2), Some(200));
}

#[test]
fn test_snapshot_undoes_temporary_top() {
    let mut stack = stack_with(&[1, 2]);
    stack.pin(2);
    stack.set_temporary_top(1);

    let (pinned, unpinned) = stack.snapshot();
    assert_eq!(unpinned[&1], 200);
    assert_eq!(pinned[&2], 1);
    // The live map still carries the override.
    assert_eq!(stack.rank(1), Some(496));
}

#[test]
fn test_load_normalizes_sparse_ranks() {
    let mut unpinned = HashMap::new();
    unpinned.insert(7, 212);
    unpinned.insert(8, 3);
    let mut pinned = HashMap::new();
    pinned.insert(9, 90);

    let stack = ZOrderStack::load(pinned, unpinned);
    assert_eq!(stack.rank(8), Some(200));
    assert_eq!(stack.rank(7), Some(204));
    assert_eq!(stack.rank(9), Some(1));
}

#[test]
fn test_reorder_renumbers_from_base() {
    let mut stack = stack_with(&[1, 2, 3]);
    stack.reorder_unpinned(&[3, 1, 2]);
    assert_eq!(stack.rank(3), Some(200));
    assert_eq!(stack.rank(1), Some(204));
    assert_eq!(stack.rank(2), Some(208));

    stack.pin(1);
    stack.pin(2);
    stack.reorder_pinned(&[2, 1]);
    assert_eq!(stack.rank(2), Some(1));
    assert_eq!(stack.rank(1), Some(5));
}

#[test]
fn test_select_window_notifies_old_and_new() {
    use std::cell::Cell;
    use std::rc::Rc;

    let mut stack = stack_with(&[1, 2]);
    let first_rank = Rc::new(Cell::new(0));
    let second_rank = Rc::new(Cell::new(0));

    let first_sub = Rc::clone(&first_rank);
    stack.events().subscribe(
        TopicKey::scoped(TopicKind::WindowRankChanged, 1),
        move |event| {
            if let Event::WindowRankChanged { rank, .. } = event {
                first_sub.set(*rank);
            }
        },
    );
    let second_sub = Rc::clone(&second_rank);
    stack.events().subscribe(
        TopicKey::scoped(TopicKind::WindowRankChanged, 2),
        move |event| {
            if let Event::WindowRankChanged { rank, .. } = event {
                second_sub.set(*rank);
            }
        },
    );

    stack.select_window(1);
    assert_eq!(first_rank.get(), 501);
    assert_eq!(stack.selected(), Some(1));

    // Selecting 2 drops 1 back to the floating base.
    stack.select_window(2);
    assert_eq!(first_rank.get(), 500);
    assert_eq!(second_rank.get(), 501);
}
