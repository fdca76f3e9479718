//! Enumeration of connected aggregates over a small candidate graph.
//!
//! Candidates are indexed `0..n` with `n <= 64`; a subset is a bit mask.

use std::collections::HashSet;

use omr_recovery_core::PixelRect;

pub(crate) const MAX_GRAPH_NODES: usize = 64;

/// Indices of the bits set in `mask`, ascending.
pub(crate) fn bits(mut mask: u64) -> impl Iterator<Item = usize> {
    std::iter::from_fn(move || {
        if mask == 0 {
            return None;
        }
        let idx = mask.trailing_zeros() as usize;
        mask &= mask - 1;
        Some(idx)
    })
}

/// Neighbour mask of every candidate: bounds grown by `gap` intersect.
pub(crate) fn adjacency_masks(bounds: &[PixelRect], gap: i32) -> Vec<u64> {
    debug_assert!(bounds.len() <= MAX_GRAPH_NODES);
    let grown: Vec<PixelRect> = bounds.iter().map(|b| b.grow(gap, gap)).collect();
    let mut adj = vec![0u64; bounds.len()];
    for i in 0..bounds.len() {
        for j in (i + 1)..bounds.len() {
            if grown[i].intersects(&bounds[j]) || grown[j].intersects(&bounds[i]) {
                adj[i] |= 1 << j;
                adj[j] |= 1 << i;
            }
        }
    }
    adj
}

fn neighbours(mask: u64, adj: &[u64]) -> u64 {
    bits(mask).fold(0u64, |acc, i| acc | adj[i]) & !mask
}

/// Maximal connected components, ordered by their lowest index.
pub(crate) fn connected_components(adj: &[u64]) -> Vec<u64> {
    let mut visited = 0u64;
    let mut out = Vec::new();
    for seed in 0..adj.len() {
        if visited & (1 << seed) != 0 {
            continue;
        }
        let mut comp = 1u64 << seed;
        loop {
            let grown = comp | neighbours(comp, adj);
            if grown == comp {
                break;
            }
            comp = grown;
        }
        visited |= comp;
        out.push(comp);
    }
    out
}

/// Connected subsets, smallest first.
///
/// Growth stops at `max_members` members or once `max_subsets` subsets are
/// collected. Every maximal component is appended afterwards if it was not
/// reached, so the largest aggregates are always part of the result.
pub(crate) fn connected_subsets(adj: &[u64], max_members: usize, max_subsets: usize) -> Vec<u64> {
    let mut seen: HashSet<u64> = HashSet::new();
    let mut out: Vec<u64> = Vec::new();

    let mut level: Vec<u64> = Vec::new();
    for i in 0..adj.len() {
        if out.len() >= max_subsets {
            break;
        }
        let mask = 1u64 << i;
        seen.insert(mask);
        out.push(mask);
        level.push(mask);
    }

    let mut size = 1;
    'grow: while size < max_members && !level.is_empty() {
        let mut next = Vec::new();
        for &mask in &level {
            for j in bits(neighbours(mask, adj)) {
                if out.len() >= max_subsets {
                    break 'grow;
                }
                let grown = mask | (1 << j);
                if seen.insert(grown) {
                    out.push(grown);
                    next.push(grown);
                }
            }
        }
        level = next;
        size += 1;
    }

    for comp in connected_components(adj) {
        if seen.insert(comp) {
            out.push(comp);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // Chain 0 - 1 - 2, isolated 3.
    fn chain() -> Vec<u64> {
        vec![0b0010, 0b0101, 0b0010, 0b0000]
    }

    #[test]
    fn bits_lists_indices() {
        assert_eq!(bits(0b1010_0001).collect::<Vec<_>>(), vec![0, 5, 7]);
        assert_eq!(bits(0).count(), 0);
    }

    #[test]
    fn adjacency_uses_gap() {
        let boxes = [
            PixelRect::new(0, 0, 10, 10),
            PixelRect::new(0, 12, 10, 10),
            PixelRect::new(50, 0, 10, 10),
        ];
        assert_eq!(adjacency_masks(&boxes, 1), vec![0, 0, 0]);
        assert_eq!(adjacency_masks(&boxes, 3), vec![0b010, 0b001, 0]);
    }

    #[test]
    fn components_of_chain() {
        assert_eq!(connected_components(&chain()), vec![0b0111, 0b1000]);
    }

    #[test]
    fn subsets_grow_smallest_first() {
        let subsets = connected_subsets(&chain(), 3, 100);
        assert_eq!(
            subsets,
            vec![0b0001, 0b0010, 0b0100, 0b1000, 0b0011, 0b0110, 0b0111]
        );
    }

    #[test]
    fn components_survive_tight_limits() {
        let subsets = connected_subsets(&chain(), 1, 2);
        assert_eq!(subsets, vec![0b0001, 0b0010, 0b0111, 0b1000]);
    }
}
