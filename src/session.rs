//! A generation session: one seed, one set of settings, and everything
//! derived from them.
//!
//! UI layers hold a `MapSession` instead of ambient globals and call into it
//! with coordinates; the session answers with samples, biomes and pixels.

use crate::biome::{classify_seeded, Biome};
use crate::claims::ClaimStore;
use crate::config::{GenerationSettings, RenderMode};
use crate::error::{MapError, Result};
use crate::river::{trace_rivers, RiverPath};
use crate::seed::{resolve_seed, Seed};
use crate::terrain_generator::{FieldSample, TerrainGenerator, TerrainMap};
use crate::terrain_renderer::{PaintCommand, Raster, TerrainRenderer};

/// Output of a render request, in the form the session's mode produces.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Raster(Raster),
    Commands(Vec<PaintCommand>),
}

impl Rendered {
    /// Flattens either form into pixels of the given size.
    pub fn into_raster(self, width: usize, height: usize) -> Raster {
        match self {
            Rendered::Raster(raster) => raster,
            Rendered::Commands(commands) => TerrainRenderer::render_commands(width, height, &commands),
        }
    }
}

pub struct MapSession {
    seed: Seed,
    seed_text: String,
    generator: TerrainGenerator,
}

impl MapSession {
    pub fn new(seed: Seed, settings: GenerationSettings) -> Result<Self> {
        Self::with_text(seed, seed.to_string(), settings)
    }

    /// Resolves user text (possibly empty) into a seed and opens a session.
    pub fn from_text(input: Option<&str>, settings: GenerationSettings) -> Result<Self> {
        let (text, seed) = resolve_seed(input);
        Self::with_text(seed, text, settings)
    }

    fn with_text(seed: Seed, seed_text: String, settings: GenerationSettings) -> Result<Self> {
        settings.validate()?;
        tracing::debug!(seed, seed_text = %seed_text, ?settings, "opening map session");
        Ok(MapSession {
            seed,
            seed_text,
            generator: TerrainGenerator::new_with_settings(seed, settings),
        })
    }

    pub fn seed(&self) -> Seed {
        self.seed
    }

    pub fn seed_text(&self) -> &str {
        &self.seed_text
    }

    pub fn settings(&self) -> &GenerationSettings {
        self.generator.settings()
    }

    pub fn width(&self) -> usize {
        self.settings().width
    }

    pub fn height(&self) -> usize {
        self.settings().height
    }

    /// Converts a signed coordinate into a cell, rejecting anything off the map.
    fn cell(&self, x: i64, y: i64) -> Result<(usize, usize)> {
        let (width, height) = (self.width(), self.height());
        if x < 0 || y < 0 || x as u64 >= width as u64 || y as u64 >= height as u64 {
            return Err(MapError::OutOfBounds { x, y, width, height });
        }
        Ok((x as usize, y as usize))
    }

    pub fn sample(&self, x: i64, y: i64) -> Result<FieldSample> {
        let (x, y) = self.cell(x, y)?;
        Ok(self.generator.sample(x as f64, y as f64))
    }

    /// Biome at a cell, using the classifier that matches the render mode.
    ///
    /// Grid mode hashes the corner of the grid cell holding the point, the
    /// same coordinate its paint command is colored from.
    pub fn classify(&self, x: i64, y: i64) -> Result<Biome> {
        let (cx, cy) = self.cell(x, y)?;
        Ok(match self.settings().mode {
            RenderMode::Raster => self.generator.point(cx as f64, cy as f64).biome,
            RenderMode::Grid => {
                let size = self.settings().cell_size.max(1);
                classify_seeded(self.seed, (cx - cx % size) as f64, (cy - cy % size) as f64)
            }
        })
    }

    pub fn generate(&self) -> TerrainMap {
        self.generator.generate()
    }

    pub fn trace_rivers(&self, map: &TerrainMap) -> Vec<RiverPath> {
        trace_rivers(map, self.seed, self.settings())
    }

    /// Renders the map. Grid mode overlays the claims read from `claims`.
    pub fn render(&self, claims: Option<&dyn ClaimStore>) -> Rendered {
        match self.settings().mode {
            RenderMode::Raster => {
                let map = self.generate();
                Rendered::Raster(TerrainRenderer::render_to_raster(&map))
            }
            RenderMode::Grid => {
                let claims = claims.map(|store| store.claims(self.seed)).unwrap_or_default();
                Rendered::Commands(TerrainRenderer::grid_commands(
                    self.seed,
                    self.width(),
                    self.height(),
                    self.settings().cell_size,
                    &claims,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::{Claim, MemoryClaimStore};
    use crate::seed::hash_seed;
    use crate::terrain_renderer::CLAIM_COLOR;

    fn test_session(mode: RenderMode) -> MapSession {
        let settings = GenerationSettings {
            mode,
            ..GenerationSettings::with_size(100, 100)
        };
        MapSession::from_text(Some("test"), settings).unwrap()
    }

    #[test]
    fn test_seed_text_is_hashed() {
        let session = test_session(RenderMode::Raster);
        assert_eq!(session.seed(), hash_seed("test"));
        assert_eq!(session.seed_text(), "test");
    }

    #[test]
    fn test_invalid_dimensions() {
        let result = MapSession::new(1, GenerationSettings::with_size(10, 0));
        assert!(matches!(result, Err(MapError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let session = test_session(RenderMode::Raster);
        for (x, y) in [(-1, 0), (0, -1), (100, 0), (0, 100)] {
            assert!(matches!(
                session.classify(x, y),
                Err(MapError::OutOfBounds { width: 100, height: 100, .. })
            ));
        }
        assert!(session.sample(99, 99).is_ok());
    }

    #[test]
    fn test_end_to_end_test_seed() {
        let session = test_session(RenderMode::Raster);
        let map = session.generate();
        let raster = TerrainRenderer::render_to_raster(&map);
        assert_eq!(raster.as_bytes().len(), 100 * 100 * 4);

        // Near the top it is too cold for desert.
        assert_ne!(session.classify(50, 5).unwrap(), Biome::Desert);
        assert_ne!(map.biome_at(50, 5), Some(Biome::Desert));

        let any_low = map
            .terrain
            .iter()
            .flatten()
            .any(|point| point.sample.height < 0.3);
        let ocean = Biome::Ocean.color();
        let any_ocean_pixel = (0..100)
            .flat_map(|y| (0..100).map(move |x| (x, y)))
            .any(|(x, y)| raster.pixel(x, y) == Some(ocean));
        let any_ocean_cell = map.terrain.iter().flatten().any(|p| p.biome == Biome::Ocean);
        assert_eq!(any_low, any_ocean_cell);
        assert!(!any_low || any_ocean_pixel, "low ground never drawn as ocean");
    }

    #[test]
    fn test_generation_is_repeatable() {
        let a = test_session(RenderMode::Raster).render(None);
        let b = test_session(RenderMode::Raster).render(None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_classify_matches_generated_map() {
        let session = test_session(RenderMode::Raster);
        let map = session.generate();
        for (x, y) in [(0, 0), (13, 77), (99, 99), (50, 50)] {
            assert_eq!(
                Some(session.classify(x, y).unwrap()),
                map.biome_at(x as usize, y as usize)
            );
        }
        assert_eq!(session.trace_rivers(&map), map.rivers);
    }

    #[test]
    fn test_grid_mode_overlays_claims() {
        let session = test_session(RenderMode::Grid);
        let mut store = MemoryClaimStore::new();
        store.add_claim(session.seed(), Claim::new(12.0, 34.0)).unwrap();
        store.add_claim(session.seed().wrapping_add(1), Claim::new(80.0, 80.0)).unwrap();

        let Rendered::Commands(commands) = session.render(Some(&store as &dyn ClaimStore)) else {
            panic!("grid mode should produce paint commands");
        };
        let markers: Vec<_> = commands.iter().filter(|c| c.color == CLAIM_COLOR).collect();
        assert_eq!(markers.len(), 1);
        assert_eq!((markers[0].x, markers[0].y), (2.0, 24.0));

        let raster = Rendered::Commands(commands).into_raster(100, 100);
        assert_eq!(raster.as_bytes().len(), 100 * 100 * 4);
    }

    #[test]
    fn test_grid_mode_classify_uses_seed_hash() {
        let session = test_session(RenderMode::Grid);
        assert_eq!(
            session.classify(16, 24).unwrap(),
            classify_seeded(session.seed(), 16.0, 24.0)
        );
        // Any point inside the cell answers with the cell's corner.
        assert_eq!(
            session.classify(21, 30).unwrap(),
            classify_seeded(session.seed(), 16.0, 24.0)
        );
    }

    #[test]
    fn test_grid_classify_matches_drawn_cell() {
        let session = test_session(RenderMode::Grid);
        let raster = session.render(None).into_raster(100, 100);
        for y in 0..100 {
            for x in 0..100 {
                let biome = session.classify(x, y).unwrap();
                assert_eq!(
                    raster.pixel(x as usize, y as usize),
                    Some(biome.color()),
                    "cell color differs at ({}, {})",
                    x,
                    y
                );
            }
        }
    }
}
