//! Floor generation (packing, routing, expansion, doors)
//!
//! One run draws everything from a single [`MapRng`] in a fixed order:
//! grid size, start point, end point, cells, recruitment, extra links and
//! finally doors. [`generate`] wraps single runs in a retry loop.

use crate::config::GeneratorConfig;
use crate::error::{ConfigError, GenerationError};
use crate::floor::{Floor, MapCell};
use crate::layout::{
    Selection, add_extra_links, build_neighbors, direct_path, pack_grid, pick_endpoints,
    plan_doors, recruit_rooms,
};
use crate::rng::MapRng;

/// Odd constant spreading attempt numbers over the seed space
const SEED_STEP: u64 = 0x9E37_79B9_7F4A_7C15;

/// Seed used by the given attempt of a run started with `seed`
///
/// Attempt 0 uses `seed` itself.
pub fn attempt_seed(seed: u64, attempt: u32) -> u64 {
    seed.wrapping_add(SEED_STEP.wrapping_mul(attempt as u64))
}

/// Generate a floor, retrying with fresh seeds on recoverable failures
///
/// The configuration is validated first. The returned floor records the
/// seed of the attempt that produced it, so `generate_once` with
/// `MapRng::new(floor.seed)` reproduces it exactly.
pub fn generate(config: &GeneratorConfig, seed: u64) -> Result<Floor, GenerationError> {
    config.validate()?;

    let mut last = GenerationError::Config(ConfigError::NoAttempts);
    for attempt in 0..config.max_attempts {
        let mut rng = MapRng::new(attempt_seed(seed, attempt));
        match generate_once(config, &mut rng) {
            Ok(floor) => {
                tracing::debug!(
                    attempt,
                    seed = floor.seed,
                    cells = floor.cells.len(),
                    "generated floor"
                );
                return Ok(floor);
            }
            Err(e) if e.is_retryable() => {
                tracing::warn!(attempt, seed = rng.seed(), "generation attempt failed: {}", e);
                last = e;
            }
            Err(e) => return Err(e),
        }
    }

    Err(GenerationError::Exhausted {
        attempts: config.max_attempts,
        last: Box::new(last),
    })
}

/// Run the pipeline once
///
/// Does not validate `config`; callers going through [`generate`] get that
/// for free.
pub fn generate_once(config: &GeneratorConfig, rng: &mut MapRng) -> Result<Floor, GenerationError> {
    let width = config.width.pick(rng);
    let height = config.height.pick(rng);
    let (start_point, end_point) = pick_endpoints(width, height, rng);

    let mut packing = pack_grid(width, height, &config.catalog, start_point, end_point, rng);
    let start = packing.start_cell.ok_or(GenerationError::StartUncovered {
        x: start_point.x,
        y: start_point.y,
    })?;
    let end = packing.end_cell.ok_or(GenerationError::EndUncovered {
        x: end_point.x,
        y: end_point.y,
    })?;

    let cells = &mut packing.cells;
    build_neighbors(cells);
    let (tree, path) = direct_path(cells, start, end)?;

    let area = width * height;
    let mut selection = Selection::from_path(&path, cells.len());
    let recruited = recruit_rooms(cells, &mut selection, area, &config.tuning, rng);
    let linked = add_extra_links(cells, &mut selection, &tree, area, &config.tuning, rng);
    tracing::debug!(
        path = path.len(),
        recruited,
        linked,
        "expanded {} cells to {}",
        cells.len(),
        selection.cells.len()
    );

    let mut links: Vec<(usize, usize)> = path.windows(2).map(|w| (w[0], w[1])).collect();
    links.extend_from_slice(&selection.extra_links);
    let doors = plan_doors(cells, &links, rng)?;

    // Working index -> position in the floor's cell list
    let mut position = vec![0; cells.len()];
    for (pos, &idx) in selection.cells.iter().enumerate() {
        position[idx] = pos;
    }

    Ok(Floor {
        width,
        height,
        seed: rng.seed(),
        cells: selection
            .cells
            .iter()
            .map(|&idx| MapCell::from_working(&cells[idx], doors[idx]))
            .collect(),
        start: position[start],
        end: position[end],
        path: path.iter().map(|&idx| position[idx]).collect(),
        extra_links: selection
            .extra_links
            .iter()
            .map(|&(a, b)| (position[a], position[b]))
            .collect(),
    })
}
