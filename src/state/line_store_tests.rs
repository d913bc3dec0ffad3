//! Tests for the body line store and its Tail/Frozen window.

use super::*;

fn store_with(max_lines: usize, count: usize) -> LineStore {
    let mut store = LineStore::new(max_lines);
    for i in 0..count {
        store.append(format!("line{i}"), true);
    }
    store
}

fn assert_invariant(store: &LineStore) {
    assert!(store.first_visible() <= store.last_visible());
    assert!(store.last_visible() <= store.len());
}

// ===== Capacity =====

#[test]
fn capacity_rounds_up_to_multiple_of_max_lines() {
    assert_eq!(LineStore::capacity_for(1), 1024);
    assert_eq!(LineStore::capacity_for(4), 1024);
    assert_eq!(LineStore::capacity_for(3), 1026);
    assert_eq!(LineStore::capacity_for(10), 1030);
    assert_eq!(LineStore::capacity_for(2000), 2000);
    assert_eq!(LineStore::capacity_for(0), MIN_BUF_SIZE);
}

#[test]
fn full_store_is_cleared_before_append() {
    let mut store = LineStore::new(2);
    for i in 0..store.capacity() {
        let outcome = store.append(format!("{i}"), true);
        assert!(!outcome.cleared);
    }
    let outcome = store.append("overflow".to_string(), true);
    assert!(outcome.cleared);
    assert!(outcome.redraw);
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(0), Some("overflow"));
}

// ===== Tail mode =====

#[test]
fn tail_shows_last_max_lines() {
    // 5 lines with a 3-line window: lines [2, 5)
    let store = store_with(3, 5);
    assert!(store.is_tail());
    assert_eq!(store.visible_range(), 2..5);
    assert_eq!(store.visible_lines(), ["line2", "line3", "line4"]);
}

#[test]
fn tail_with_fewer_lines_than_window_shows_everything() {
    let store = store_with(5, 2);
    assert_eq!(store.visible_range(), 0..2);
}

#[test]
fn append_in_tail_requests_redraw() {
    let mut store = store_with(3, 5);
    let outcome = store.append("new".to_string(), true);
    assert!(outcome.redraw);
    assert_eq!(store.visible_range(), 3..6);
}

#[test]
fn empty_store_has_empty_window() {
    let store = LineStore::new(3);
    assert_eq!(store.visible_range(), 0..0);
    assert!(store.visible_lines().is_empty());
}

// ===== Scrolling =====

#[test]
fn scroll_up_freezes_window() {
    let mut store = store_with(3, 10);
    assert!(store.scroll_up(1));
    assert_eq!(store.view(), ViewMode::Frozen { first: 6 });
    assert_eq!(store.visible_range(), 6..9);
}

#[test]
fn scroll_up_clamps_at_top() {
    let mut store = store_with(3, 10);
    assert!(store.scroll_up(100));
    assert_eq!(store.visible_range(), 0..3);
    assert!(!store.scroll_up(1), "already at top");
}

#[test]
fn scroll_down_back_to_end_returns_to_tail() {
    let mut store = store_with(3, 10);
    store.scroll_up(2);
    assert!(store.scroll_down(1));
    assert!(!store.is_tail());
    assert!(store.scroll_down(1));
    assert!(store.is_tail());
}

#[test]
fn scroll_down_at_tail_is_a_no_op() {
    let mut store = store_with(3, 10);
    assert!(!store.scroll_down(1));
    assert!(store.is_tail());
}

#[test]
fn scroll_does_nothing_when_everything_fits() {
    let mut store = store_with(5, 3);
    assert!(!store.scroll_up(1));
    assert!(!store.scroll_down(1));
    assert!(store.is_tail());
}

#[test]
fn scroll_home_returns_to_tail() {
    let mut store = store_with(3, 10);
    store.scroll_up(4);
    assert!(store.scroll_home());
    assert!(store.is_tail());
    assert_eq!(store.visible_range(), 7..10);
    assert!(!store.scroll_home(), "already at tail");
}

// ===== Frozen window and new input =====

#[test]
fn append_while_frozen_keeps_window_and_skips_redraw() {
    let mut store = store_with(3, 10);
    store.scroll_up(2);
    let before = store.visible_range();
    let outcome = store.append("new".to_string(), true);
    assert!(!outcome.redraw);
    assert_eq!(store.visible_range(), before);
    assert!(!store.is_tail());
}

#[test]
fn append_while_unmapped_resets_to_tail() {
    let mut store = store_with(3, 10);
    store.scroll_up(5);
    let outcome = store.append("new".to_string(), false);
    assert!(outcome.redraw);
    assert!(store.is_tail());
    assert_eq!(store.visible_range(), 8..11);
}

// ===== Reset =====

#[test]
fn reset_clears_lines_and_window() {
    let mut store = store_with(3, 10);
    store.scroll_up(3);
    store.reset();
    assert!(store.is_empty());
    assert!(store.is_tail());
    assert_eq!(store.visible_range(), 0..0);
    assert_invariant(&store);
}

#[test]
fn invariant_holds_through_mixed_operations() {
    let mut store = LineStore::new(4);
    for i in 0..30 {
        store.append(format!("{i}"), i % 7 != 0);
        assert_invariant(&store);
        if i % 3 == 0 {
            store.scroll_up(2);
            assert_invariant(&store);
        }
        if i % 5 == 0 {
            store.scroll_down(1);
            assert_invariant(&store);
        }
    }
    store.scroll_home();
    assert_invariant(&store);
}
