//! Bitmask layouts: bit `i` of a layout set means "the `i`-th unknown neighbor holds a mine".

use alloc::vec::Vec;
use smallvec::SmallVec;

use super::neighborhood::{Neighborhood, clue_neighbors};
use crate::*;

/// Widest layout the enumeration accepts.
pub const MAX_LAYOUT_PLACES: u32 = 32;

/// Every `places`-bit value with exactly `mines` bits set, in increasing order.
///
/// Walks the combinations with Gosper's hack, so it yields exactly `C(places, mines)` values and nothing else. Yields
/// nothing when `places` exceeds [`MAX_LAYOUT_PLACES`].
#[derive(Clone, Debug)]
pub struct Layouts {
    next: Option<u64>,
    limit: u64,
}

impl Layouts {
    pub fn new(places: u32, mines: u32) -> Self {
        let next = (places <= MAX_LAYOUT_PLACES && mines <= places).then(|| (1u64 << mines) - 1);
        let places = places.min(MAX_LAYOUT_PLACES);
        Self {
            next,
            limit: 1u64 << places,
        }
    }
}

impl Iterator for Layouts {
    type Item = u32;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        if current >= self.limit {
            return None;
        }
        if current != 0 {
            let lowest = current & current.wrapping_neg();
            let ripple = current + lowest;
            let successor = (((ripple ^ current) >> 2) / lowest) | ripple;
            self.next = Some(successor);
        }
        // below limit <= 2^32
        Some(current as u32)
    }
}

pub fn generate_layouts(places: u32, mines: u32) -> Vec<u32> {
    Layouts::new(places, mines).collect()
}

/// Bits set in every layout, `None` when there are no layouts at all.
pub fn reduce_layouts(layouts: impl IntoIterator<Item = u32>) -> Option<u32> {
    layouts.into_iter().reduce(|acc, layout| acc & layout)
}

/// Items picked by the set bits of `layout`.
pub fn apply_layout<T: Copy>(items: &[T], layout: u32) -> impl Iterator<Item = T> + '_ {
    items
        .iter()
        .enumerate()
        .filter(move |&(i, _)| (layout >> i) & 1 == 1)
        .map(|(_, &item)| item)
}

/// Whether planting mines on `layout` over `places` leaves every clue next to a planted mine within its count.
///
/// Only over-commitment is checked: a clue that ends up with too few mines may still get them from cells outside
/// `places`.
pub fn is_feasible(board: &Board<PlayerCellState>, places: &[Coord2], layout: u32) -> bool {
    let planted: SmallVec<[Coord2; 8]> = apply_layout(places, layout).collect();

    planted.iter().all(|&mine| {
        clue_neighbors(board, mine).into_iter().all(|(clue, count)| {
            let sub = Neighborhood::of(board, clue);
            let shared = planted.iter().filter(|pos| sub.unknown.contains(pos)).count();
            usize::from(count) >= usize::from(sub.flagged) + shared
        })
    })
}

/// Mask of the places holding a mine in every feasible way of planting `mines` mines among them.
pub fn forced_layout(board: &Board<PlayerCellState>, places: &[Coord2], mines: u32) -> Option<u32> {
    // places.len() is at most eight here
    let feasible = Layouts::new(places.len() as u32, mines).filter(|&layout| is_feasible(board, places, layout));
    let forced = reduce_layouts(feasible);
    if forced.is_none() {
        log::warn!(
            "No feasible layout of {} mines over {:?}, visible board is inconsistent",
            mines,
            places
        );
    }
    forced
}
