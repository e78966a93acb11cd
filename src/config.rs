//! Generation settings with defaults, JSON persistence and CLI overrides.

use std::fs;
use std::path::Path;

use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};
use crate::noise_field::NoiseKind;

/// How a map is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Per-pixel RGBA buffer from the continuous height/temperature/humidity fields.
    #[default]
    Raster,
    /// Coarse cells colored by seed hash, plus claim markers.
    Grid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Raster width in pixels.
    pub width: usize,
    /// Raster height in pixels.
    pub height: usize,
    /// Noise layers summed into the height field.
    pub octaves: u32,
    /// Amplitude decay per octave.
    pub persistence: f64,
    /// Pixel to noise-space scale factor.
    pub scale: f64,
    /// Number of river traces.
    pub river_count: usize,
    /// Step cap for a single trace; the map height when unset.
    pub river_max_steps: Option<usize>,
    /// End a trace once every cell below it is higher than the current one.
    pub stop_when_stuck: bool,
    /// Clamp the remapped height into `[0, 1]`.
    pub clamp_height: bool,
    pub noise: NoiseKind,
    pub mode: RenderMode,
    /// Cell edge length in grid mode.
    pub cell_size: usize,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        GenerationSettings {
            width: 256,
            height: 256,
            octaves: 4,
            persistence: 0.5,
            scale: 0.02,
            river_count: 5,
            river_max_steps: None,
            stop_when_stuck: false,
            clamp_height: true,
            noise: NoiseKind::Perlin,
            mode: RenderMode::Raster,
            cell_size: 8,
        }
    }
}

impl GenerationSettings {
    /// Settings for a map of the given size, everything else default.
    pub fn with_size(width: usize, height: usize) -> Self {
        GenerationSettings {
            width,
            height,
            ..Default::default()
        }
    }

    /// Rejects rasters with a zero dimension.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(MapError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Effective step cap for river traces.
    pub fn max_river_steps(&self) -> usize {
        self.river_max_steps.unwrap_or(self.height)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let settings: GenerationSettings = serde_json::from_str(&contents)?;
        tracing::info!(path = %path.display(), "loaded generation settings");
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Apply command-line overrides on top of loaded settings.
    pub fn apply_cli_overrides(&mut self, overrides: &SettingsOverrides) {
        if let Some(w) = overrides.width {
            self.width = w;
        }
        if let Some(h) = overrides.height {
            self.height = h;
        }
        if let Some(octaves) = overrides.octaves {
            self.octaves = octaves;
        }
        if let Some(persistence) = overrides.persistence {
            self.persistence = persistence;
        }
        if let Some(scale) = overrides.scale {
            self.scale = scale;
        }
        if let Some(rivers) = overrides.rivers {
            self.river_count = rivers;
        }
        if let Some(mode) = overrides.mode {
            self.mode = mode;
        }
        if let Some(cell_size) = overrides.cell_size {
            self.cell_size = cell_size.max(1);
        }
        if overrides.sine_noise {
            self.noise = NoiseKind::SineHash;
        }
        if overrides.unclamped {
            self.clamp_height = false;
        }
        if overrides.stop_when_stuck {
            self.stop_when_stuck = true;
        }
    }
}

/// Generation options accepted on the command line.
///
/// Values given here override the settings file.
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsOverrides {
    /// Map width in pixels
    #[arg(short = 'W', long)]
    pub width: Option<usize>,

    /// Map height in pixels
    #[arg(short = 'H', long)]
    pub height: Option<usize>,

    /// Number of noise octaves
    #[arg(long)]
    pub octaves: Option<u32>,

    /// Amplitude decay per octave
    #[arg(long)]
    pub persistence: Option<f64>,

    /// Pixel to noise-space scale factor
    #[arg(long)]
    pub scale: Option<f64>,

    /// Number of rivers to trace
    #[arg(long)]
    pub rivers: Option<usize>,

    /// Render mode
    #[arg(long, value_enum)]
    pub mode: Option<RenderMode>,

    /// Cell size in grid mode
    #[arg(long)]
    pub cell_size: Option<usize>,

    /// Use the sine-hash noise instead of gradient noise
    #[arg(long)]
    pub sine_noise: bool,

    /// Keep heights outside [0, 1] instead of clamping
    #[arg(long)]
    pub unclamped: bool,

    /// Stop rivers that can only flow uphill
    #[arg(long)]
    pub stop_when_stuck: bool,
}
