use serde::{Deserialize, Serialize};

use crate::biome::{classify_sample, Biome};
use crate::config::GenerationSettings;
use crate::noise_field::NoiseField;
use crate::river::{trace_rivers, RiverPath};
use crate::seed::Seed;

/// Climate and elevation at one coordinate, each normalized to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldSample {
    pub height: f64,
    pub temperature: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainPoint {
    pub sample: FieldSample,
    pub biome: Biome,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TerrainMap {
    pub seed: Seed,
    pub width: usize,
    pub height: usize,
    pub terrain: Vec<Vec<TerrainPoint>>,
    pub rivers: Vec<RiverPath>,
}

impl TerrainMap {
    pub fn get(&self, x: usize, y: usize) -> Option<&TerrainPoint> {
        self.terrain.get(y).and_then(|row| row.get(x))
    }

    /// Height of an in-bounds cell.
    pub(crate) fn height_at(&self, x: usize, y: usize) -> f64 {
        self.terrain[y][x].sample.height
    }

    pub fn biome_at(&self, x: usize, y: usize) -> Option<Biome> {
        self.get(x, y).map(|point| point.biome)
    }

    pub fn is_river(&self, x: usize, y: usize) -> bool {
        self.rivers.iter().any(|river| river.contains(x, y))
    }
}

/// Samples the height, temperature and humidity fields for one seed.
pub struct TerrainGenerator {
    seed: Seed,
    settings: GenerationSettings,
    height_noise: Box<dyn NoiseField>,
    humidity_noise: Box<dyn NoiseField>,
}

impl TerrainGenerator {
    pub fn new(seed: Seed) -> Self {
        Self::new_with_settings(seed, GenerationSettings::default())
    }

    pub fn new_with_settings(seed: Seed, settings: GenerationSettings) -> Self {
        let height_noise = settings.noise.build(seed);
        let humidity_noise = settings.noise.build(seed.wrapping_add(1));

        TerrainGenerator {
            seed,
            settings,
            height_noise,
            humidity_noise,
        }
    }

    pub fn seed(&self) -> Seed {
        self.seed
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Fractal sum of `octaves` noise layers remapped by `(v + 1) / 2`.
    ///
    /// Each octave doubles the frequency and scales the amplitude by
    /// `persistence`, so the raw sum can exceed `[-1, 1]`. The result is
    /// clamped into `[0, 1]` unless `clamp_height` is off.
    pub fn height(&self, x: f64, y: f64) -> f64 {
        let scale = self.settings.scale;
        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;

        for _ in 0..self.settings.octaves {
            value += amplitude
                * self
                    .height_noise
                    .sample(x * frequency * scale, y * frequency * scale);
            amplitude *= self.settings.persistence;
            frequency *= 2.0;
        }

        let height = (value + 1.0) / 2.0;
        if self.settings.clamp_height {
            height.clamp(0.0, 1.0)
        } else {
            height
        }
    }

    /// Cold (0) on the top row, warming linearly toward the bottom edge.
    pub fn temperature(&self, y: f64) -> f64 {
        (y / self.settings.height as f64).clamp(0.0, 1.0)
    }

    /// One noise evaluation at the base noise-space coordinate.
    pub fn humidity(&self, x: f64, y: f64) -> f64 {
        let scale = self.settings.scale;
        let value = self.humidity_noise.sample(x * scale, y * scale);
        ((value + 1.0) / 2.0).clamp(0.0, 1.0)
    }

    pub fn sample(&self, x: f64, y: f64) -> FieldSample {
        FieldSample {
            height: self.height(x, y),
            temperature: self.temperature(y),
            humidity: self.humidity(x, y),
        }
    }

    pub fn point(&self, x: f64, y: f64) -> TerrainPoint {
        let sample = self.sample(x, y);
        TerrainPoint {
            sample,
            biome: classify_sample(&sample),
        }
    }

    /// Samples every cell of the map and traces the rivers over the result.
    pub fn generate(&self) -> TerrainMap {
        let width = self.settings.width;
        let height = self.settings.height;

        let terrain: Vec<Vec<TerrainPoint>> = (0..height)
            .map(|y| (0..width).map(|x| self.point(x as f64, y as f64)).collect())
            .collect();

        let mut map = TerrainMap {
            seed: self.seed,
            width,
            height,
            terrain,
            rivers: Vec::new(),
        };
        map.rivers = trace_rivers(&map, self.seed, &self.settings);

        tracing::debug!(
            seed = self.seed,
            width,
            height,
            rivers = map.rivers.len(),
            "generated terrain"
        );
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise_field::NoiseKind;
    use crate::seed::hash_seed;

    fn small_settings() -> GenerationSettings {
        GenerationSettings::with_size(64, 48)
    }

    #[test]
    fn test_sampling_is_deterministic() {
        let a = TerrainGenerator::new_with_settings(hash_seed("test"), small_settings());
        let b = TerrainGenerator::new_with_settings(hash_seed("test"), small_settings());
        for y in 0..48 {
            for x in 0..64 {
                let (x, y) = (x as f64, y as f64);
                assert_eq!(a.sample(x, y), b.sample(x, y));
            }
        }
    }

    #[test]
    fn test_fields_in_unit_range() {
        for noise in [NoiseKind::Perlin, NoiseKind::SineHash] {
            let mut settings = small_settings();
            settings.noise = noise;
            let generator = TerrainGenerator::new_with_settings(-31, settings);
            for y in 0..48 {
                for x in 0..64 {
                    let s = generator.sample(x as f64, y as f64);
                    assert!((0.0..=1.0).contains(&s.height));
                    assert!((0.0..=1.0).contains(&s.temperature));
                    assert!((0.0..=1.0).contains(&s.humidity));
                }
            }
        }
    }

    #[test]
    fn test_unclamped_height_keeps_raw_remap() {
        let mut settings = small_settings();
        settings.clamp_height = false;
        settings.noise = NoiseKind::SineHash;
        let generator = TerrainGenerator::new_with_settings(3, settings);
        // Four octaves at persistence 0.5 sum to at most 1.875 in magnitude.
        for y in 0..48 {
            for x in 0..64 {
                let h = generator.height(x as f64, y as f64);
                assert!(h > -0.5 && h < 1.5);
            }
        }
    }

    #[test]
    fn test_single_octave_matches_noise() {
        let mut settings = small_settings();
        settings.octaves = 1;
        settings.clamp_height = false;
        let generator = TerrainGenerator::new_with_settings(11, settings.clone());
        let noise = settings.noise.build(11);
        let expected = (noise.sample(10.0 * settings.scale, 20.0 * settings.scale) + 1.0) / 2.0;
        assert_eq!(generator.height(10.0, 20.0), expected);
    }

    #[test]
    fn test_temperature_is_linear_in_y() {
        let generator = TerrainGenerator::new_with_settings(1, GenerationSettings::with_size(10, 100));
        assert_eq!(generator.temperature(0.0), 0.0);
        assert_eq!(generator.temperature(50.0), 0.5);
        assert!(generator.temperature(99.0) > generator.temperature(98.0));
    }

    #[test]
    fn test_generate_fills_every_cell() {
        let generator = TerrainGenerator::new_with_settings(5, small_settings());
        let map = generator.generate();
        assert_eq!(map.terrain.len(), 48);
        assert!(map.terrain.iter().all(|row| row.len() == 64));
        assert_eq!(map.rivers.len(), 5);
        assert_eq!(map.biome_at(0, 0), Some(map.terrain[0][0].biome));
        assert_eq!(map.get(64, 0), None);
    }

    #[test]
    fn test_out_of_range_lookups_return_none() {
        let map = TerrainGenerator::new_with_settings(5, small_settings()).generate();
        assert_eq!(map.get(63, 47).map(|p| p.sample.height), Some(map.height_at(63, 47)));
        assert_eq!(map.get(0, 48), None);
        assert_eq!(map.biome_at(64, 47), None);
        assert!(!map.is_river(64, 0));
    }
}
