//! Seeded terrain maps: coherent noise fields, biome classification,
//! river tracing and raster output.

pub mod biome;
pub mod claims;
pub mod config;
pub mod error;
pub mod noise_field;
pub mod river;
pub mod seed;
pub mod session;
pub mod terrain_generator;
pub mod terrain_renderer;

pub use biome::{classify, classify_seeded, Biome};
pub use claims::{Claim, ClaimStore, JsonClaimStore, MemoryClaimStore};
pub use config::{GenerationSettings, RenderMode, SettingsOverrides};
pub use error::{MapError, Result};
pub use noise_field::{NoiseField, NoiseKind, PerlinField, SineHashField};
pub use river::{trace_river, trace_rivers, RiverPath, Termination};
pub use seed::{hash_seed, resolve_seed, Seed, SeedRecord};
pub use session::{MapSession, Rendered};
pub use terrain_generator::{FieldSample, TerrainGenerator, TerrainMap, TerrainPoint};
pub use terrain_renderer::{PaintCommand, Raster, TerrainRenderer};
