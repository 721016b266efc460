//! Reordering of selected entries.
//!
//! [`move_items`] accepts any selection; it sorts it, drops repeats and
//! out-of-range indices, then dispatches to one of eight behaviours. Each
//! behaviour is a pure function of the items and the sorted, unique
//! selected indices. Each one computes a target index for every selected
//! item, places them, and fills the remaining slots with the unselected items
//! in their original order. The length never changes and selected items keep
//! their relative order.
//!
//! ```
//! use pdfcombine::list::moves::{move_items, MoveDirection};
//!
//! let items = ["a", "b", "c", "d", "e"];
//! assert_eq!(move_items(&items, &[1, 3], MoveDirection::Up, false), ["b", "a", "d", "c", "e"]);
//! assert_eq!(move_items(&items, &[1, 3], MoveDirection::Down, true), ["a", "c", "b", "d", "e"]);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::config::CombineNonSequential;
use crate::error::{PdfCombineError, Result};
use crate::prompt::Confirmer;

/// Direction of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// To the start of the list.
    Top,
    /// One slot towards the start.
    Up,
    /// One slot towards the end.
    Down,
    /// To the end of the list.
    Bottom,
}

impl FromStr for MoveDirection {
    type Err = PdfCombineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "bottom" => Ok(Self::Bottom),
            _ => Err(PdfCombineError::invalid_input(
                s,
                "direction must be one of: top, up, down, bottom",
            )),
        }
    }
}

impl fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Top => "top",
            Self::Up => "up",
            Self::Down => "down",
            Self::Bottom => "bottom",
        };
        f.write_str(name)
    }
}

/// Whether the sorted selection has a gap.
pub fn is_non_sequential(selected: &[usize]) -> bool {
    selected
        .windows(2)
        .any(|pair| pair[1].saturating_sub(pair[0]) > 1)
}

/// Decide whether gaps are closed for this move.
///
/// A sequential selection has no gaps, so the policy is not consulted.
/// [`CombineNonSequential::Ask`] asks `confirmer`.
pub fn resolve_combine<C>(selected: &[usize], policy: CombineNonSequential, confirmer: &C) -> bool
where
    C: Confirmer + ?Sized,
{
    if !is_non_sequential(selected) {
        return false;
    }
    match policy {
        CombineNonSequential::Always => true,
        CombineNonSequential::Never => false,
        CombineNonSequential::Ask => confirmer.confirm(
            "Combine Selection",
            "The selected files are not next to each other.\n\
             Do you want to group them together while moving?",
        ),
    }
}

/// Move the selected items, dispatching to one of the eight behaviours.
///
/// `combine` only applies when the selection has a gap; a contiguous
/// selection always moves as a block.
pub fn move_items<T: Clone>(
    items: &[T],
    selected: &[usize],
    direction: MoveDirection,
    combine: bool,
) -> Vec<T> {
    let mut selected: Vec<usize> = selected
        .iter()
        .copied()
        .filter(|&idx| idx < items.len())
        .collect();
    selected.sort_unstable();
    selected.dedup();
    if selected.is_empty() {
        return items.to_vec();
    }

    let selected = selected.as_slice();
    let combine = combine && is_non_sequential(selected);
    match (direction, combine) {
        (MoveDirection::Top, true) => top_combined(items, selected),
        (MoveDirection::Top, false) => top_spaced(items, selected),
        (MoveDirection::Up, true) => up_combined(items, selected),
        (MoveDirection::Up, false) => up_stepwise(items, selected),
        (MoveDirection::Down, true) => down_combined(items, selected),
        (MoveDirection::Down, false) => down_stepwise(items, selected),
        (MoveDirection::Bottom, true) => bottom_combined(items, selected),
        (MoveDirection::Bottom, false) => bottom_spaced(items, selected),
    }
}

/// Selected items first, in order.
pub(crate) fn top_combined<T: Clone>(items: &[T], selected: &[usize]) -> Vec<T> {
    let targets: Vec<usize> = (0..selected.len()).collect();
    place(items, selected, &targets)
}

/// Every selected item moves up by the index of the first one.
pub(crate) fn top_spaced<T: Clone>(items: &[T], selected: &[usize]) -> Vec<T> {
    let Some(&first) = selected.first() else {
        return items.to_vec();
    };
    let targets: Vec<usize> = selected.iter().map(|&idx| idx - first).collect();
    place(items, selected, &targets)
}

/// Selected items last, in order.
pub(crate) fn bottom_combined<T: Clone>(items: &[T], selected: &[usize]) -> Vec<T> {
    let start = items.len() - selected.len();
    let targets: Vec<usize> = (start..items.len()).collect();
    place(items, selected, &targets)
}

/// Every selected item moves down by the distance of the last one to the end.
pub(crate) fn bottom_spaced<T: Clone>(items: &[T], selected: &[usize]) -> Vec<T> {
    let Some(&last) = selected.last() else {
        return items.to_vec();
    };
    let shift = items.len() - 1 - last;
    let targets: Vec<usize> = selected.iter().map(|&idx| idx + shift).collect();
    place(items, selected, &targets)
}

/// Each selected item swaps with the one above it, lowest index first.
///
/// An item at the top stays put, and so does an item directly below a
/// selected item that stayed put.
pub(crate) fn up_stepwise<T: Clone>(items: &[T], selected: &[usize]) -> Vec<T> {
    let mut targets = Vec::with_capacity(selected.len());
    let mut previous: Option<(usize, bool)> = None;

    for &idx in selected {
        let blocked = idx == 0 || previous == Some((idx - 1, true));
        targets.push(if blocked { idx } else { idx - 1 });
        previous = Some((idx, blocked));
    }

    place(items, selected, &targets)
}

/// Selected items gather directly after the first selected item, which
/// keeps its position.
pub(crate) fn up_combined<T: Clone>(items: &[T], selected: &[usize]) -> Vec<T> {
    let Some(&first) = selected.first() else {
        return items.to_vec();
    };
    let targets: Vec<usize> = (first..first + selected.len()).collect();
    place(items, selected, &targets)
}

/// Each selected item swaps with the one below it, highest index first.
///
/// Mirror of [`up_stepwise`].
pub(crate) fn down_stepwise<T: Clone>(items: &[T], selected: &[usize]) -> Vec<T> {
    let Some(last_slot) = items.len().checked_sub(1) else {
        return Vec::new();
    };
    let mut targets = vec![0; selected.len()];
    let mut previous: Option<(usize, bool)> = None;

    for (i, &idx) in selected.iter().enumerate().rev() {
        let blocked = idx == last_slot || previous == Some((idx + 1, true));
        targets[i] = if blocked { idx } else { idx + 1 };
        previous = Some((idx, blocked));
    }

    place(items, selected, &targets)
}

/// Selected items gather directly before the last selected item, which
/// keeps its position.
pub(crate) fn down_combined<T: Clone>(items: &[T], selected: &[usize]) -> Vec<T> {
    let Some(&last) = selected.last() else {
        return items.to_vec();
    };
    let start = last + 1 - selected.len();
    let targets: Vec<usize> = (start..=last).collect();
    place(items, selected, &targets)
}

/// Put `items[selected[i]]` at `targets[i]`, then fill the free slots with
/// the unselected items in their original order.
fn place<T: Clone>(items: &[T], selected: &[usize], targets: &[usize]) -> Vec<T> {
    debug_assert_eq!(selected.len(), targets.len());

    let mut slots: Vec<Option<T>> = vec![None; items.len()];
    let mut is_selected = vec![false; items.len()];

    for (&idx, &target) in selected.iter().zip(targets) {
        debug_assert!(slots[target].is_none(), "two items placed at {target}");
        slots[target] = Some(items[idx].clone());
        is_selected[idx] = true;
    }

    let mut rest = items
        .iter()
        .zip(&is_selected)
        .filter(|(_, taken)| !**taken)
        .map(|(item, _)| item.clone());

    slots
        .into_iter()
        .filter_map(|slot| slot.or_else(|| rest.next()))
        .collect()
}
