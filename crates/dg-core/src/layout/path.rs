//! Weighted shortest path over the neighbor graph
//!
//! Dijkstra with a linear scan for the next cell, which is plenty for a
//! few hundred cells. Entering a cell costs that cell's `cost`. The search
//! stops as soon as the end cell is settled, so predecessors of cells that
//! would have been settled later are not final.

use crate::error::GenerationError;

use super::cell::WorkingCell;

/// Distances and predecessors left by one search
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    pub start: usize,
    pub distance: Vec<f64>,
    pub predecessor: Vec<Option<usize>>,
    pub visited: Vec<bool>,
}

impl ShortestPathTree {
    /// Check if `a` is the recorded predecessor of `b` or the reverse
    pub fn is_tree_edge(&self, a: usize, b: usize) -> bool {
        self.predecessor[a] == Some(b) || self.predecessor[b] == Some(a)
    }

    /// Walk predecessors back from `end` and return the path start→end
    ///
    /// A walk that runs out of predecessors before reaching the start, or
    /// that takes more steps than there are cells, means `end` was not
    /// reached.
    pub fn path_to(&self, end: usize) -> Result<Vec<usize>, GenerationError> {
        let unreachable = GenerationError::Unreachable {
            start: self.start,
            end,
        };
        let mut path = vec![end];
        let mut current = end;
        while current != self.start {
            if path.len() > self.predecessor.len() {
                return Err(unreachable);
            }
            match self.predecessor[current] {
                Some(prev) => {
                    path.push(prev);
                    current = prev;
                }
                None => return Err(unreachable),
            }
        }
        path.reverse();
        Ok(path)
    }
}

/// Run Dijkstra from `start` until `end` is settled
pub fn shortest_paths(cells: &[WorkingCell], start: usize, end: usize) -> ShortestPathTree {
    let n = cells.len();
    let mut distance = vec![f64::INFINITY; n];
    let mut predecessor = vec![None; n];
    let mut visited = vec![false; n];
    distance[start] = 0.0;

    loop {
        // Unvisited cell with the smallest finite tentative distance
        let mut current = None;
        let mut best = f64::INFINITY;
        for (idx, &d) in distance.iter().enumerate() {
            if d < best && !visited[idx] {
                current = Some(idx);
                best = d;
            }
        }
        let Some(current) = current else {
            // Everything left is unreachable
            break;
        };

        for &next in &cells[current].neighbors {
            if visited[next] {
                continue;
            }
            let through = distance[current] + cells[next].cost;
            if distance[next] > through {
                distance[next] = through;
                predecessor[next] = Some(current);
            }
        }

        visited[current] = true;
        if visited[end] || visited.iter().all(|&v| v) {
            break;
        }
    }

    ShortestPathTree {
        start,
        distance,
        predecessor,
        visited,
    }
}

/// Cheapest chain of cells from `start` to `end`, both included
pub fn direct_path(
    cells: &[WorkingCell],
    start: usize,
    end: usize,
) -> Result<(ShortestPathTree, Vec<usize>), GenerationError> {
    let tree = shortest_paths(cells, start, end);
    let path = tree.path_to(end)?;
    tracing::debug!(
        length = path.len(),
        cost = tree.distance[end],
        "direct path {} -> {}",
        start,
        end
    );
    Ok((tree, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::graph::build_neighbors;
    use crate::layout::size::CellSize;

    fn cells(rects: &[(u32, u32, u32, u32, f64)]) -> Vec<WorkingCell> {
        let mut cells: Vec<_> = rects
            .iter()
            .enumerate()
            .map(|(i, &(x, y, w, h, cost))| WorkingCell::new(x, y, CellSize::new(w, h), i, cost))
            .collect();
        build_neighbors(&mut cells);
        cells
    }

    #[test]
    fn test_start_equals_end() {
        let c = cells(&[(0, 0, 1, 1, 0.3)]);
        let (tree, path) = direct_path(&c, 0, 0).unwrap();
        assert_eq!(path, vec![0]);
        assert_eq!(tree.distance[0], 0.0);
    }

    #[test]
    fn test_prefers_cheaper_branch() {
        // 0 1 2
        // 3 4 5
        let c = cells(&[
            (0, 0, 1, 1, 0.0),
            (1, 0, 1, 1, 0.9),
            (2, 0, 1, 1, 0.1),
            (0, 1, 1, 1, 0.1),
            (1, 1, 1, 1, 0.1),
            (2, 1, 1, 1, 0.1),
        ]);
        let (tree, path) = direct_path(&c, 0, 2).unwrap();
        assert_eq!(path, vec![0, 3, 4, 5, 2]);
        assert!((tree.distance[2] - 0.4).abs() < 1e-9);
        assert!(tree.is_tree_edge(3, 0));
        assert!(tree.is_tree_edge(0, 3));
        assert!(!tree.is_tree_edge(0, 2));
    }

    #[test]
    fn test_unreachable_end() {
        let c = cells(&[(0, 0, 1, 1, 0.5), (1, 0, 1, 1, 0.5), (5, 5, 1, 1, 0.5)]);
        let err = direct_path(&c, 0, 2).unwrap_err();
        assert_eq!(err, GenerationError::Unreachable { start: 0, end: 2 });
    }

    #[test]
    fn test_early_exit_leaves_far_cells_unvisited() {
        // Long corridor; the end is the second cell
        let c = cells(&[
            (0, 0, 1, 1, 0.5),
            (1, 0, 1, 1, 0.5),
            (2, 0, 1, 1, 0.5),
            (3, 0, 1, 1, 0.5),
        ]);
        let tree = shortest_paths(&c, 0, 1);
        assert!(tree.visited[1]);
        assert!(!tree.visited[3]);
        assert_eq!(tree.path_to(1).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_cumulative_cost_is_monotonic() {
        let c = cells(&[
            (0, 0, 2, 1, 0.2),
            (2, 0, 1, 2, 0.7),
            (0, 1, 2, 1, 0.4),
            (0, 2, 3, 1, 0.1),
        ]);
        let (tree, path) = direct_path(&c, 0, 3).unwrap();
        let mut last = -1.0;
        for &idx in &path {
            assert!(tree.distance[idx] >= last);
            last = tree.distance[idx];
        }
    }
}
