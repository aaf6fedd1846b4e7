//! Neighbor graph from geometric adjacency
//!
//! Two cells are neighbors when one's east edge lies on the other's west
//! edge (or one's south edge on the other's north edge) and the touching
//! sides overlap by at least one unit. Corner contact does not count.

use super::cell::{WorkingCell, span_overlap};

/// Check if two cells share a wall segment of positive length
pub fn are_adjacent(a: &WorkingCell, b: &WorkingCell) -> bool {
    let touch_x = a.right() == b.x || b.right() == a.x;
    let touch_y = a.bottom() == b.y || b.bottom() == a.y;
    (touch_x && span_overlap(a.y, a.height, b.y, b.height).is_some())
        || (touch_y && span_overlap(a.x, a.width, b.x, b.width).is_some())
}

/// Fill every cell's neighbor list
///
/// Each adjacency is found from both sides, so the relation is symmetric.
/// Lists are appended to, not deduplicated.
pub fn build_neighbors(cells: &mut [WorkingCell]) {
    for i in 0..cells.len() {
        for j in 0..cells.len() {
            if i != j && are_adjacent(&cells[i], &cells[j]) {
                cells[i].neighbors.push(j);
            }
        }
    }

    tracing::debug!(
        links = cells.iter().map(|c| c.neighbors.len()).sum::<usize>() / 2,
        "built neighbor graph over {} cells",
        cells.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::size::CellSize;

    fn cells(rects: &[(u32, u32, u32, u32)]) -> Vec<WorkingCell> {
        rects
            .iter()
            .enumerate()
            .map(|(i, &(x, y, w, h))| WorkingCell::new(x, y, CellSize::new(w, h), i, 0.5))
            .collect()
    }

    #[test]
    fn test_side_by_side() {
        let c = cells(&[(0, 0, 2, 2), (2, 0, 2, 2)]);
        assert!(are_adjacent(&c[0], &c[1]));
        assert!(are_adjacent(&c[1], &c[0]));
    }

    #[test]
    fn test_stacked() {
        let c = cells(&[(0, 0, 3, 1), (2, 1, 2, 2)]);
        assert!(are_adjacent(&c[0], &c[1]));
    }

    #[test]
    fn test_corner_contact_is_not_adjacent() {
        let c = cells(&[(0, 0, 2, 2), (2, 2, 2, 2)]);
        assert!(!are_adjacent(&c[0], &c[1]));
    }

    #[test]
    fn test_gap_is_not_adjacent() {
        let c = cells(&[(0, 0, 2, 2), (3, 0, 2, 2)]);
        assert!(!are_adjacent(&c[0], &c[1]));
    }

    #[test]
    fn test_build_is_symmetric() {
        // 0 1
        // 2 2
        let mut c = cells(&[(0, 0, 1, 1), (1, 0, 1, 1), (0, 1, 2, 1)]);
        build_neighbors(&mut c);
        assert_eq!(c[0].neighbors, vec![1, 2]);
        assert_eq!(c[1].neighbors, vec![0, 2]);
        assert_eq!(c[2].neighbors, vec![0, 1]);
        for cell in &c {
            for &n in &cell.neighbors {
                assert!(c[n].neighbors.contains(&cell.index));
            }
        }
    }

    #[test]
    fn test_isolated_cell_has_no_neighbors() {
        let mut c = cells(&[(0, 0, 1, 1), (5, 5, 1, 1)]);
        build_neighbors(&mut c);
        assert!(c[0].neighbors.is_empty());
        assert!(c[1].neighbors.is_empty());
    }
}
