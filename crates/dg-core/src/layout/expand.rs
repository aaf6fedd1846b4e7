//! Growing the room set beyond the direct path
//!
//! Two passes, both with bounded retries:
//! 1. Recruit unselected neighbors of selected cells, linking each new
//!    room to the cell that recruited it
//! 2. Add extra links between selected neighbors that are not already
//!    joined by the shortest-path tree or an earlier extra link

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::rng::MapRng;

use super::cell::WorkingCell;
use super::path::ShortestPathTree;

/// A count drawn from `area / min_divisor .. area / max_divisor`
///
/// Reads keys in snake_case, camelCase or PascalCase, like the map files
/// that carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaFraction {
    #[serde(alias = "minDivisor", alias = "MinDivisor")]
    pub min_divisor: u32,
    #[serde(alias = "maxDivisor", alias = "MaxDivisor")]
    pub max_divisor: u32,
}

impl AreaFraction {
    pub const fn new(min_divisor: u32, max_divisor: u32) -> Self {
        Self {
            min_divisor,
            max_divisor,
        }
    }

    /// Draw a count for a grid of `area` units
    pub fn draw(&self, area: u32, rng: &mut MapRng) -> u32 {
        let lo = area.checked_div(self.min_divisor).unwrap_or(0);
        let hi = area.checked_div(self.max_divisor).unwrap_or(0);
        rng.range(lo, hi)
    }
}

/// How much extra connectivity to grow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionTuning {
    #[serde(alias = "extraRooms", alias = "ExtraRooms")]
    pub extra_rooms: AreaFraction,
    #[serde(alias = "extraLinks", alias = "ExtraLinks")]
    pub extra_links: AreaFraction,
    /// Random picks per round before a pass gives up
    #[serde(alias = "maxAttempts", alias = "MaxAttempts")]
    pub max_attempts: u32,
}

impl Default for ExpansionTuning {
    fn default() -> Self {
        Self {
            extra_rooms: AreaFraction::new(15, 5),
            extra_links: AreaFraction::new(60, 40),
            max_attempts: 64,
        }
    }
}

/// Cells chosen for the floor and the links beyond the direct path
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Selected cell indices, direct path first (start→end) then recruits
    pub cells: Vec<usize>,
    /// Working-cell indices joined by a door besides the direct path
    pub extra_links: Vec<(usize, usize)>,
    is_selected: Vec<bool>,
}

impl Selection {
    /// Start from the direct path
    pub fn from_path(path: &[usize], cell_count: usize) -> Self {
        let mut is_selected = vec![false; cell_count];
        let mut cells = Vec::with_capacity(path.len());
        for &idx in path {
            if !is_selected[idx] {
                is_selected[idx] = true;
                cells.push(idx);
            }
        }
        Self {
            cells,
            extra_links: Vec::new(),
            is_selected,
        }
    }

    pub fn is_selected(&self, idx: usize) -> bool {
        self.is_selected.get(idx).copied().unwrap_or(false)
    }

    fn select(&mut self, idx: usize) {
        self.is_selected[idx] = true;
        self.cells.push(idx);
    }

    fn random_cell(&self, rng: &mut MapRng) -> usize {
        self.cells[rng.index(self.cells.len())]
    }
}

/// Recruit extra rooms next to the selected ones
///
/// Returns how many rooms were added; fewer than drawn when the retries of
/// a round run out.
pub fn recruit_rooms(
    cells: &[WorkingCell],
    selection: &mut Selection,
    area: u32,
    tuning: &ExpansionTuning,
    rng: &mut MapRng,
) -> usize {
    let wanted = tuning.extra_rooms.draw(area, rng);
    let mut added = 0;
    let mut frontier: Vec<usize> = Vec::new();

    'rounds: for _ in 0..wanted {
        for _ in 0..tuning.max_attempts {
            let from = selection.random_cell(rng);

            frontier.clear();
            for &n in &cells[from].neighbors {
                if !selection.is_selected(n) && !frontier.contains(&n) {
                    frontier.push(n);
                }
            }
            if frontier.is_empty() {
                continue;
            }

            let to = frontier[rng.index(frontier.len())];
            selection.extra_links.push((from, to));
            selection.select(to);
            added += 1;
            continue 'rounds;
        }

        tracing::debug!(added, wanted, "room recruitment ran out of candidates");
        break;
    }

    added
}

/// Add extra links between selected neighbors
///
/// Returns how many links were added.
pub fn add_extra_links(
    cells: &[WorkingCell],
    selection: &mut Selection,
    tree: &ShortestPathTree,
    area: u32,
    tuning: &ExpansionTuning,
    rng: &mut MapRng,
) -> usize {
    let wanted = tuning.extra_links.draw(area, rng);
    let mut linked: HashSet<(usize, usize)> = selection
        .extra_links
        .iter()
        .map(|&(a, b)| (a.min(b), a.max(b)))
        .collect();
    let mut added = 0;

    'rounds: for _ in 0..wanted {
        for _ in 0..tuning.max_attempts {
            let c1 = selection.random_cell(rng);
            let Some(&c2) = rng.choose(&cells[c1].neighbors) else {
                continue;
            };
            let key = (c1.min(c2), c1.max(c2));
            if c1 != c2
                && selection.is_selected(c2)
                && !tree.is_tree_edge(c1, c2)
                && !linked.contains(&key)
            {
                linked.insert(key);
                selection.extra_links.push((c1, c2));
                added += 1;
                continue 'rounds;
            }
        }

        tracing::debug!(added, wanted, "extra linking ran out of candidates");
        break;
    }

    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::graph::build_neighbors;
    use crate::layout::path::direct_path;
    use crate::layout::size::CellSize;

    /// `side` x `side` grid of 1x1 cells, row-major indices
    fn grid(side: u32) -> Vec<WorkingCell> {
        let mut cells = Vec::new();
        for y in 0..side {
            for x in 0..side {
                let idx = cells.len();
                cells.push(WorkingCell::new(x, y, CellSize::new(1, 1), idx, 0.5));
            }
        }
        build_neighbors(&mut cells);
        cells
    }

    #[test]
    fn test_tuning_key_case() {
        let snake: ExpansionTuning = serde_json::from_str(
            r#"{"extra_rooms":{"min_divisor":10,"max_divisor":4},"max_attempts":8}"#,
        )
        .unwrap();
        let camel: ExpansionTuning = serde_json::from_str(
            r#"{"extraRooms":{"minDivisor":10,"maxDivisor":4},"maxAttempts":8}"#,
        )
        .unwrap();
        let pascal: ExpansionTuning = serde_json::from_str(
            r#"{"ExtraRooms":{"MinDivisor":10,"MaxDivisor":4},"MaxAttempts":8}"#,
        )
        .unwrap();
        assert_eq!(snake, camel);
        assert_eq!(snake, pascal);
        assert_eq!(pascal.extra_rooms, AreaFraction::new(10, 4));
        assert_eq!(pascal.extra_links, ExpansionTuning::default().extra_links);
        assert_eq!(pascal.max_attempts, 8);
    }

    #[test]
    fn test_area_fraction_draw() {
        let mut rng = MapRng::new(4);
        let fraction = AreaFraction::new(15, 5);
        for _ in 0..100 {
            let n = fraction.draw(150, &mut rng);
            assert!((10..30).contains(&n));
        }
        assert_eq!(fraction.draw(1, &mut rng), 0);
        assert_eq!(AreaFraction::new(0, 0).draw(100, &mut rng), 0);
    }

    #[test]
    fn test_selection_from_path() {
        let sel = Selection::from_path(&[3, 1, 2], 5);
        assert_eq!(sel.cells, vec![3, 1, 2]);
        assert!(sel.is_selected(1));
        assert!(!sel.is_selected(0));
        assert!(!sel.is_selected(99));
    }

    #[test]
    fn test_recruits_are_neighbors_of_selected() {
        let cells = grid(6);
        let (_, path) = direct_path(&cells, 0, 35).unwrap();
        let mut sel = Selection::from_path(&path, cells.len());
        let mut rng = MapRng::new(9);
        let added = recruit_rooms(&cells, &mut sel, 36, &ExpansionTuning::default(), &mut rng);

        assert_eq!(sel.cells.len(), path.len() + added);
        assert_eq!(sel.extra_links.len(), added);
        for (i, &(from, to)) in sel.extra_links.iter().enumerate() {
            assert!(cells[from].neighbors.contains(&to));
            // The recruiter was selected before the recruit
            let from_pos = sel.cells.iter().position(|&c| c == from).unwrap();
            let to_pos = sel.cells.iter().position(|&c| c == to).unwrap();
            assert!(from_pos < to_pos);
            assert_eq!(to_pos, path.len() + i);
        }
        let unique: HashSet<_> = sel.cells.iter().collect();
        assert_eq!(unique.len(), sel.cells.len());
    }

    #[test]
    fn test_recruitment_stops_when_saturated() {
        // Two cells, both on the path: nothing left to recruit
        let mut cells = vec![
            WorkingCell::new(0, 0, CellSize::new(1, 1), 0, 0.5),
            WorkingCell::new(1, 0, CellSize::new(1, 1), 1, 0.5),
        ];
        build_neighbors(&mut cells);
        let mut sel = Selection::from_path(&[0, 1], 2);
        let tuning = ExpansionTuning {
            extra_rooms: AreaFraction::new(10, 1),
            ..ExpansionTuning::default()
        };
        let mut rng = MapRng::new(1);
        let added = recruit_rooms(&cells, &mut sel, 100, &tuning, &mut rng);
        assert_eq!(added, 0);
        assert_eq!(sel.cells, vec![0, 1]);
        assert!(sel.extra_links.is_empty());
    }

    #[test]
    fn test_extra_links_are_unique_and_off_tree() {
        let cells = grid(8);
        let (tree, path) = direct_path(&cells, 0, 63).unwrap();
        let mut sel = Selection::from_path(&path, cells.len());
        let mut rng = MapRng::new(21);
        let tuning = ExpansionTuning {
            extra_rooms: AreaFraction::new(4, 2),
            extra_links: AreaFraction::new(8, 4),
            max_attempts: 64,
        };
        recruit_rooms(&cells, &mut sel, 64, &tuning, &mut rng);
        let recruited_links = sel.extra_links.len();
        let added = add_extra_links(&cells, &mut sel, &tree, 64, &tuning, &mut rng);
        assert_eq!(sel.extra_links.len(), recruited_links + added);

        let mut seen = HashSet::new();
        for &(a, b) in &sel.extra_links {
            assert_ne!(a, b);
            assert!(sel.is_selected(a) && sel.is_selected(b));
            assert!(cells[a].neighbors.contains(&b));
            assert!(seen.insert((a.min(b), a.max(b))), "duplicate link {a}-{b}");
        }
        for &(a, b) in &sel.extra_links[recruited_links..] {
            assert!(!tree.is_tree_edge(a, b));
        }
    }

    #[test]
    fn test_extra_links_give_up_on_single_cell() {
        let cells = grid(1);
        let (tree, path) = direct_path(&cells, 0, 0).unwrap();
        let mut sel = Selection::from_path(&path, 1);
        let tuning = ExpansionTuning {
            extra_links: AreaFraction::new(1, 1),
            max_attempts: 5,
            ..ExpansionTuning::default()
        };
        let mut rng = MapRng::new(2);
        let added = add_extra_links(&cells, &mut sel, &tree, 10, &tuning, &mut rng);
        assert_eq!(added, 0);
        assert!(sel.extra_links.is_empty());
    }
}
