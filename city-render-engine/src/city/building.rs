use serde::{Deserialize, Serialize};

/// Placeable building kinds. The string ids match the toolbar `data-type`
/// attributes used by the web frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildingType {
    Residential,
    Commercial,
    Industrial,
    Road,
    PowerPlant,
    PowerLine,
}

impl BuildingType {
    pub const ALL: [BuildingType; 6] = [
        Self::Residential,
        Self::Commercial,
        Self::Industrial,
        Self::Road,
        Self::PowerPlant,
        Self::PowerLine,
    ];

    /// Convert string identifier to building type for RPC compatibility.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "residential" => Some(Self::Residential),
            "commercial" => Some(Self::Commercial),
            "industrial" => Some(Self::Industrial),
            "road" => Some(Self::Road),
            "power-plant" => Some(Self::PowerPlant),
            "power-line" => Some(Self::PowerLine),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Residential => "residential",
            Self::Commercial => "commercial",
            Self::Industrial => "industrial",
            Self::Road => "road",
            Self::PowerPlant => "power-plant",
            Self::PowerLine => "power-line",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Residential => "Residential Zone",
            Self::Commercial => "Commercial Zone",
            Self::Industrial => "Industrial Zone",
            Self::Road => "Road",
            Self::PowerPlant => "Power Plant",
            Self::PowerLine => "Power Line",
        }
    }

    /// Zones house residents; infrastructure does not.
    pub fn is_zone(&self) -> bool {
        matches!(self, Self::Residential | Self::Commercial | Self::Industrial)
    }

    /// Footprint of the rendered model on a unit tile, as (width, height, depth).
    pub fn model_size(&self) -> [f32; 3] {
        match self {
            Self::Residential => [0.8, 0.6, 0.8],
            Self::Commercial => [0.8, 0.9, 0.8],
            Self::Industrial => [0.9, 0.5, 0.9],
            Self::Road => [1.0, 0.02, 1.0],
            Self::PowerPlant => [0.9, 1.1, 0.9],
            Self::PowerLine => [0.1, 1.2, 0.1],
        }
    }

    /// sRGB base colour of the rendered model.
    pub fn colour(&self) -> [f32; 3] {
        match self {
            Self::Residential => [0.35, 0.6, 0.9],
            Self::Commercial => [0.3, 0.45, 0.95],
            Self::Industrial => [0.9, 0.75, 0.25],
            Self::Road => [0.2, 0.2, 0.22],
            Self::PowerPlant => [0.6, 0.6, 0.65],
            Self::PowerLine => [0.45, 0.3, 0.2],
        }
    }
}
