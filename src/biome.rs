use serde::{Deserialize, Serialize};

use crate::noise_field::SineHashField;
use crate::seed::Seed;
use crate::terrain_generator::FieldSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    Ocean,
    Beach,
    Plains,
    Forest,
    Desert,
    Mountain,
    Snow,
    Taiga,
    Jungle,
    Savanna,
    Swamp,
}

/// Biomes picked from by the seed-hash classifier, in lookup order.
pub const SEEDED_BIOMES: [Biome; 8] = [
    Biome::Plains,
    Biome::Forest,
    Biome::Desert,
    Biome::Taiga,
    Biome::Jungle,
    Biome::Savanna,
    Biome::Snow,
    Biome::Swamp,
];

pub const ALL_BIOMES: [Biome; 11] = [
    Biome::Ocean,
    Biome::Beach,
    Biome::Plains,
    Biome::Forest,
    Biome::Desert,
    Biome::Mountain,
    Biome::Snow,
    Biome::Taiga,
    Biome::Jungle,
    Biome::Savanna,
    Biome::Swamp,
];

/// Classifies a field sample with ordered threshold rules; the first match wins.
pub fn classify(height: f64, temperature: f64, humidity: f64) -> Biome {
    if height < 0.3 {
        Biome::Ocean
    } else if height < 0.35 {
        Biome::Beach
    } else if height > 0.8 {
        if temperature < 0.5 {
            Biome::Snow
        } else {
            Biome::Mountain
        }
    } else if temperature > 0.7 {
        if humidity < 0.3 {
            Biome::Desert
        } else {
            Biome::Plains
        }
    } else if humidity > 0.6 {
        Biome::Forest
    } else {
        Biome::Plains
    }
}

pub fn classify_sample(sample: &FieldSample) -> Biome {
    classify(sample.height, sample.temperature, sample.humidity)
}

/// Picks a biome straight from a hash of `(seed, x, y)`, without any terrain fields.
pub fn classify_seeded(seed: Seed, x: f64, y: f64) -> Biome {
    let value = SineHashField::new(seed).unit(x, y);
    let index = (value * SEEDED_BIOMES.len() as f64).floor() as usize;
    SEEDED_BIOMES[index.min(SEEDED_BIOMES.len() - 1)]
}

impl Biome {
    pub fn name(&self) -> &'static str {
        match self {
            Biome::Ocean => "Ocean",
            Biome::Beach => "Beach",
            Biome::Plains => "Plains",
            Biome::Forest => "Forest",
            Biome::Desert => "Desert",
            Biome::Mountain => "Mountain",
            Biome::Snow => "Snowy Tundra",
            Biome::Taiga => "Taiga",
            Biome::Jungle => "Jungle",
            Biome::Savanna => "Savanna",
            Biome::Swamp => "Swamp",
        }
    }

    pub fn color(&self) -> [u8; 4] {
        match self {
            Biome::Ocean => [5, 40, 120, 255],       // Dark ocean blue
            Biome::Beach => [220, 200, 160, 255],    // Tan sand
            Biome::Plains => [136, 192, 112, 255],   // #88c070
            Biome::Forest => [34, 139, 34, 255],     // #228B22
            Biome::Desert => [237, 201, 175, 255],   // #EDC9AF
            Biome::Mountain => [140, 130, 120, 255], // Gray-brown
            Biome::Snow => [255, 255, 255, 255],
            Biome::Taiga => [160, 208, 160, 255],   // #A0D0A0
            Biome::Jungle => [0, 127, 14, 255],     // #007F0E
            Biome::Savanna => [194, 178, 128, 255], // #C2B280
            Biome::Swamp => [85, 107, 47, 255],     // #556B2F
        }
    }

    /// Single character used in terminal previews.
    pub fn glyph(&self) -> char {
        match self {
            Biome::Ocean => '~',
            Biome::Beach => '.',
            Biome::Plains => ',',
            Biome::Forest => '♣',
            Biome::Desert => '=',
            Biome::Mountain => '▲',
            Biome::Snow => '△',
            Biome::Taiga => 't',
            Biome::Jungle => 'J',
            Biome::Savanna => ';',
            Biome::Swamp => '%',
        }
    }
}
