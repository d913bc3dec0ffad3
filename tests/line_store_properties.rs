//! Property-based tests for the body store's view window.
//!
//! Properties under test:
//! - `first_visible <= last_visible <= len` after every operation.
//! - The window never shows more than `max_lines` lines.
//! - Scrolling up then down by the same amount restores the window unless
//!   the upward move was clamped at the top.

use dzbar::state::LineStore;
use proptest::prelude::*;

// ===== Strategies =====

#[derive(Debug, Clone)]
enum Op {
    Append { mapped: bool },
    ScrollUp(usize),
    ScrollDown(usize),
    ScrollHome,
    Reset,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => any::<bool>().prop_map(|mapped| Op::Append { mapped }),
        2 => (1usize..6).prop_map(Op::ScrollUp),
        2 => (1usize..6).prop_map(Op::ScrollDown),
        1 => Just(Op::ScrollHome),
        1 => Just(Op::Reset),
    ]
}

fn apply(store: &mut LineStore, op: &Op, counter: &mut usize) {
    match op {
        Op::Append { mapped } => {
            *counter += 1;
            store.append(format!("line {counter}"), *mapped);
        }
        Op::ScrollUp(n) => {
            store.scroll_up(*n);
        }
        Op::ScrollDown(n) => {
            store.scroll_down(*n);
        }
        Op::ScrollHome => {
            store.scroll_home();
        }
        Op::Reset => store.reset(),
    }
}

// ===== Properties =====

proptest! {
    #[test]
    fn window_invariant_holds(max_lines in 1usize..8, ops in prop::collection::vec(arb_op(), 0..200)) {
        let mut store = LineStore::new(max_lines);
        let mut counter = 0;
        for op in &ops {
            apply(&mut store, op, &mut counter);
            prop_assert!(store.first_visible() <= store.last_visible());
            prop_assert!(store.last_visible() <= store.len());
            prop_assert!(store.visible_lines().len() <= max_lines);
            prop_assert!(store.len() <= store.capacity());
        }
    }

    #[test]
    fn scroll_up_then_down_restores_window(
        max_lines in 1usize..6,
        count in 0usize..40,
        back in 0usize..10,
        n in 1usize..6,
    ) {
        let mut store = LineStore::new(max_lines);
        for i in 0..count {
            store.append(format!("{i}"), true);
        }
        store.scroll_up(back);
        let before = store.visible_range();

        if before.start >= n {
            store.scroll_up(n);
            store.scroll_down(n);
            prop_assert_eq!(store.visible_range(), before);
        }
    }

    #[test]
    fn tail_window_shows_last_lines(max_lines in 1usize..6, count in 0usize..30) {
        let mut store = LineStore::new(max_lines);
        for i in 0..count {
            store.append(format!("{i}"), true);
        }
        prop_assert!(store.is_tail());
        let expected: Vec<String> = (count.saturating_sub(max_lines)..count)
            .map(|i| i.to_string())
            .collect();
        prop_assert_eq!(store.visible_lines(), expected.as_slice());
    }
}
