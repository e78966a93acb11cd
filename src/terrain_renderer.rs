use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;

use image::{ImageBuffer, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::biome::{classify_seeded, Biome, ALL_BIOMES};
use crate::claims::Claim;
use crate::error::Result;
use crate::seed::Seed;
use crate::terrain_generator::TerrainMap;

pub const RIVER_COLOR: [u8; 4] = [30, 90, 200, 255];
pub const CLAIM_COLOR: [u8; 4] = [255, 0, 0, 128];
/// Edge length of the square drawn centred on a claim.
pub const CLAIM_MARKER_SIZE: f64 = 20.0;

/// A filled rectangle in map coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaintCommand {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub color: [u8; 4],
}

impl PaintCommand {
    pub fn claim_marker(claim: &Claim) -> Self {
        let half = CLAIM_MARKER_SIZE / 2.0;
        PaintCommand {
            x: claim.x - half,
            y: claim.y - half,
            w: CLAIM_MARKER_SIZE,
            h: CLAIM_MARKER_SIZE,
            color: CLAIM_COLOR,
        }
    }
}

/// Row-major RGBA pixels, four bytes per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Raster {
    /// A fully transparent raster.
    pub fn new(width: usize, height: usize) -> Self {
        Raster {
            width,
            height,
            pixels: vec![0u8; width * height * 4],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&self.pixels[idx..idx + 4]);
        Some(rgba)
    }

    /// Overwrites a pixel; out-of-range coordinates are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: [u8; 4]) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color);
        }
    }

    /// Source-over blends `color` onto a pixel.
    pub fn blend_pixel(&mut self, x: usize, y: usize, color: [u8; 4]) {
        let Some(dst) = self.pixel(x, y) else {
            return;
        };
        let a = color[3] as u32;
        let inv = 255 - a;
        let mut out = [0u8; 4];
        for i in 0..3 {
            out[i] = ((color[i] as u32 * a + dst[i] as u32 * inv + 127) / 255) as u8;
        }
        out[3] = (a + (dst[3] as u32 * inv + 127) / 255).min(255) as u8;
        self.set_pixel(x, y, out);
    }

    /// Paints rectangles in order, clipped to the raster.
    ///
    /// A pixel is covered when its centre lies inside the rectangle.
    pub fn apply(&mut self, commands: &[PaintCommand]) {
        for cmd in commands {
            let x0 = cmd.x.round().max(0.0) as usize;
            let y0 = cmd.y.round().max(0.0) as usize;
            let x1 = ((cmd.x + cmd.w).round().max(0.0) as usize).min(self.width);
            let y1 = ((cmd.y + cmd.h).round().max(0.0) as usize).min(self.height);

            for y in y0..y1 {
                for x in x0..x1 {
                    if cmd.color[3] == 255 {
                        self.set_pixel(x, y, cmd.color);
                    } else {
                        self.blend_pixel(x, y, cmd.color);
                    }
                }
            }
        }
    }

    pub fn to_image(&self) -> RgbaImage {
        ImageBuffer::from_fn(self.width as u32, self.height as u32, |x, y| {
            // from_fn only visits in-range coordinates
            let idx = (y as usize * self.width + x as usize) * 4;
            image::Rgba([
                self.pixels[idx],
                self.pixels[idx + 1],
                self.pixels[idx + 2],
                self.pixels[idx + 3],
            ])
        })
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.to_image().save(path)?;
        tracing::info!(path = %path.display(), width = self.width, height = self.height, "map saved");
        Ok(())
    }
}

pub struct TerrainRenderer;

impl TerrainRenderer {
    /// Paints every cell with its biome color, then the rivers on top.
    pub fn render_to_raster(map: &TerrainMap) -> Raster {
        let mut raster = Raster::new(map.width, map.height);

        for (y, row) in map.terrain.iter().enumerate() {
            for (x, point) in row.iter().enumerate() {
                raster.set_pixel(x, y, point.biome.color());
            }
        }

        for river in &map.rivers {
            for &(x, y) in &river.cells {
                raster.set_pixel(x, y, RIVER_COLOR);
            }
        }

        raster
    }

    /// Coarse cells colored by the seed-hash classifier, followed by one
    /// marker per claim.
    pub fn grid_commands(
        seed: Seed,
        width: usize,
        height: usize,
        cell_size: usize,
        claims: &[Claim],
    ) -> Vec<PaintCommand> {
        let cell_size = cell_size.max(1);
        let mut commands = Vec::new();

        for x in (0..width).step_by(cell_size) {
            for y in (0..height).step_by(cell_size) {
                let biome = classify_seeded(seed, x as f64, y as f64);
                commands.push(PaintCommand {
                    x: x as f64,
                    y: y as f64,
                    w: cell_size as f64,
                    h: cell_size as f64,
                    color: biome.color(),
                });
            }
        }

        commands.extend(claims.iter().map(PaintCommand::claim_marker));
        commands
    }

    pub fn render_commands(width: usize, height: usize, commands: &[PaintCommand]) -> Raster {
        let mut raster = Raster::new(width, height);
        raster.apply(commands);
        raster
    }

    /// Terminal preview, downsampled to at most `max_cols` columns.
    pub fn ascii_preview(map: &TerrainMap, max_cols: usize) -> String {
        let step = (map.width / max_cols.max(1)).max(1);
        let mut out = String::new();

        // Characters are roughly twice as tall as wide.
        for y in (0..map.height).step_by(step * 2) {
            for x in (0..map.width).step_by(step) {
                let ch = if map.is_river(x, y) {
                    '≈'
                } else {
                    map.terrain[y][x].biome.glyph()
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }

    /// Cell count per biome, most common first.
    pub fn biome_histogram(map: &TerrainMap) -> Vec<(Biome, usize)> {
        let mut counts: HashMap<Biome, usize> = HashMap::new();
        for point in map.terrain.iter().flatten() {
            *counts.entry(point.biome).or_insert(0) += 1;
        }

        let mut histogram: Vec<(Biome, usize)> = ALL_BIOMES
            .iter()
            .filter_map(|biome| counts.get(biome).map(|&count| (*biome, count)))
            .collect();
        histogram.sort_by(|a, b| b.1.cmp(&a.1));
        histogram
    }

    pub fn summary(map: &TerrainMap) -> String {
        let total = (map.width * map.height).max(1) as f64;
        let mut info = String::new();

        let _ = writeln!(info, "Biome Distribution:");
        for (biome, count) in Self::biome_histogram(map) {
            let _ = writeln!(info, "  {} - {:.1}%", biome.name(), count as f64 / total * 100.0);
        }

        let _ = writeln!(info, "\nRivers: {}", map.rivers.len());
        for (i, river) in map.rivers.iter().enumerate() {
            let _ = writeln!(
                info,
                "  #{} from x={} - {} cells ({:?})",
                i + 1,
                river.cells.first().map(|c| c.0).unwrap_or_default(),
                river.len(),
                river.termination
            );
        }
        info
    }
}
