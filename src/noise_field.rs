//! Seeded scalar noise fields over continuous 2D coordinates.

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::seed::Seed;

/// A deterministic scalar field. Implementations return values in `[-1, 1]`
/// and depend only on their seed and the queried coordinate.
pub trait NoiseField {
    fn sample(&self, x: f64, y: f64) -> f64;
}

/// Which noise strategy a session samples from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseKind {
    /// Smooth gradient noise.
    #[default]
    Perlin,
    /// Sine-based hash. Cheap and repeatable but not continuous.
    SineHash,
}

impl NoiseKind {
    pub fn build(self, seed: Seed) -> Box<dyn NoiseField> {
        match self {
            NoiseKind::Perlin => Box::new(PerlinField::new(seed)),
            NoiseKind::SineHash => Box::new(SineHashField::new(seed)),
        }
    }
}

/// Gradient noise keyed by a seed; the seed picks the lattice permutation.
#[derive(Clone)]
pub struct PerlinField {
    perlin: Perlin,
}

impl PerlinField {
    pub fn new(seed: Seed) -> Self {
        // Perlin takes an unsigned seed; reinterpret the bits so negative seeds stay distinct.
        PerlinField {
            perlin: Perlin::new(seed as u32),
        }
    }
}

impl NoiseField for PerlinField {
    fn sample(&self, x: f64, y: f64) -> f64 {
        self.perlin.get([x, y]).clamp(-1.0, 1.0)
    }
}

/// `|sin(seed*12.9898 + x*78.233 + y*37.719) * 43758.5453| mod 1`.
#[derive(Debug, Clone, Copy)]
pub struct SineHashField {
    seed: Seed,
}

impl SineHashField {
    pub fn new(seed: Seed) -> Self {
        SineHashField { seed }
    }

    /// Raw hash value in `[0, 1)`.
    pub fn unit(&self, x: f64, y: f64) -> f64 {
        let phase = self.seed as f64 * 12.9898 + x * 78.233 + y * 37.719;
        (phase.sin() * 43758.5453).abs() % 1.0
    }
}

impl NoiseField for SineHashField {
    fn sample(&self, x: f64, y: f64) -> f64 {
        self.unit(x, y) * 2.0 - 1.0
    }
}
