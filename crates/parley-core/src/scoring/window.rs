//! Context Windows
//!
//! Slot-range helpers shared by every scoring rule. A window never crosses a
//! pause and never extends past either end of the slice it is given.

use parley_model::{Item, Slot};

/// Slots looked at on each side of an item for coherence.
pub const WINDOW_RADIUS: usize = 3;

/// Non-pause items in the context window of the slot at `index`, excluding
/// the item itself: up to [`WINDOW_RADIUS`] slots back and forward, stopping
/// at a pause or at either end of `slots`.
pub fn context_window(slots: &[Slot], index: usize) -> Vec<&Item> {
    let mut window = preceding_run(slots, index, WINDOW_RADIUS);
    window.extend(
        slots
            .iter()
            .skip(index + 1)
            .take(WINDOW_RADIUS)
            .map_while(Slot::item),
    );
    window
}

/// Up to `limit` consecutive non-pause items immediately before `index`,
/// nearest first. Stops at the first pause.
pub fn preceding_run(slots: &[Slot], index: usize, limit: usize) -> Vec<&Item> {
    slots[..index.min(slots.len())]
        .iter()
        .rev()
        .take(limit)
        .map_while(Slot::item)
        .collect()
}

/// True if an earlier slot already finalized the item at `index`.
pub fn is_repeat(slots: &[Slot], index: usize) -> bool {
    match slots.get(index).and_then(Slot::item) {
        Some(item) => slots[..index]
            .iter()
            .filter_map(Slot::item)
            .any(|earlier| earlier.same_as(item)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_model::fixtures::{single, LogBuilder};

    fn ids(items: &[&Item]) -> Vec<u128> {
        items.iter().map(|item| item.id.0.as_u128()).collect()
    }

    #[test]
    fn test_window_at_start_has_no_preceding() {
        let slots = LogBuilder::new()
            .say(0, single(1, 0, 0.1))
            .say(1, single(2, 0, 0.1))
            .say(0, single(3, 0, 0.1))
            .say(1, single(4, 0, 0.1))
            .say(0, single(5, 0, 0.1))
            .build();

        let window = context_window(&slots, 0);
        assert_eq!(ids(&window), vec![2, 3, 4]);
    }

    #[test]
    fn test_window_stops_at_pauses() {
        let slots = LogBuilder::new()
            .say(0, single(1, 0, 0.1))
            .pause()
            .say(0, single(2, 0, 0.1))
            .say(1, single(3, 0, 0.1))
            .pause()
            .say(1, single(4, 0, 0.1))
            .build();

        assert_eq!(ids(&context_window(&slots, 2)), vec![3]);
        assert_eq!(ids(&context_window(&slots, 3)), vec![2]);
        assert!(context_window(&slots, 5).is_empty());
    }

    #[test]
    fn test_window_stops_at_end() {
        let slots = LogBuilder::new()
            .say(0, single(1, 0, 0.1))
            .say(1, single(2, 0, 0.1))
            .build();

        assert_eq!(ids(&context_window(&slots, 1)), vec![1]);
    }

    #[test]
    fn test_window_radius() {
        let mut builder = LogBuilder::new();
        for n in 0..9 {
            builder = builder.say(0, single(n, 0, 0.1));
        }
        let slots = builder.build();

        assert_eq!(ids(&context_window(&slots, 4)), vec![3, 2, 1, 5, 6, 7]);
    }

    #[test]
    fn test_repeat_detection() {
        let first = single(7, 2, 0.8);
        let slots = LogBuilder::new()
            .say(0, first)
            .pause()
            .say(1, first)
            .build();

        assert!(!is_repeat(&slots, 0));
        assert!(!is_repeat(&slots, 1));
        assert!(is_repeat(&slots, 2));
    }
}
