//! Greedy downhill river walks from the top edge of the map.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::GenerationSettings;
use crate::seed::Seed;
use crate::terrain_generator::TerrainMap;

/// Why a river walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// The walk arrived on the last row.
    ReachedBottom,
    /// The walk used up its step budget first.
    StepCap,
    /// Every cell below was higher than the current one.
    Stuck,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiverPath {
    pub cells: Vec<(usize, usize)>,
    pub termination: Termination,
}

impl RiverPath {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.cells.contains(&(x, y))
    }
}

/// Walks one river down from `(start_x, 0)`.
///
/// Each step moves one row down, to the lowest of the three cells below.
/// Straight down wins ties; a diagonal must be strictly lower to be taken.
pub fn trace_river(
    map: &TerrainMap,
    start_x: usize,
    max_steps: usize,
    stop_when_stuck: bool,
) -> RiverPath {
    let mut cells = Vec::new();
    if map.width == 0 || map.height == 0 || max_steps == 0 {
        return RiverPath {
            cells,
            termination: Termination::StepCap,
        };
    }

    let mut x = start_x.min(map.width - 1);
    let mut y = 0;
    cells.push((x, y));

    let termination = loop {
        if y + 1 >= map.height {
            break Termination::ReachedBottom;
        }
        if cells.len() >= max_steps {
            break Termination::StepCap;
        }

        let below = y + 1;
        let mut next_x = x;
        let mut lowest = map.height_at(x, below);

        if x > 0 && map.height_at(x - 1, below) < lowest {
            next_x = x - 1;
            lowest = map.height_at(x - 1, below);
        }
        if x + 1 < map.width && map.height_at(x + 1, below) < lowest {
            next_x = x + 1;
            lowest = map.height_at(x + 1, below);
        }

        if stop_when_stuck && lowest >= map.height_at(x, y) {
            break Termination::Stuck;
        }

        x = next_x;
        y = below;
        cells.push((x, y));
    };

    RiverPath { cells, termination }
}

/// Traces `river_count` independent rivers from random columns on the top row.
///
/// Start columns come from a generator seeded with the map seed, so the same
/// seed always yields the same rivers.
pub fn trace_rivers(map: &TerrainMap, seed: Seed, settings: &GenerationSettings) -> Vec<RiverPath> {
    if map.width == 0 || map.height == 0 {
        return Vec::new();
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed as u32 as u64);
    let max_steps = settings.max_river_steps();

    (0..settings.river_count)
        .map(|_| {
            let start_x = rng.gen_range(0..map.width);
            let river = trace_river(map, start_x, max_steps, settings.stop_when_stuck);
            if river.termination != Termination::ReachedBottom {
                tracing::debug!(
                    start_x,
                    length = river.len(),
                    termination = ?river.termination,
                    "river stopped early"
                );
            }
            river
        })
        .collect()
}
