//! Session configuration and difficulty tuning
//!
//! Supplied once by the menu layer before a session starts and never
//! mutated afterwards.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::assets::SpriteId;
use crate::error::SimError;

/// Map selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MapId {
    #[default]
    City,
    Forest,
}

impl MapId {
    pub fn as_str(&self) -> &'static str {
        match self {
            MapId::City => "CITY",
            MapId::Forest => "FOREST",
        }
    }

    /// Scrolling background for this map
    pub fn background_sprite(&self) -> SpriteId {
        match self {
            MapId::City => SpriteId::CityBackground,
            MapId::Forest => SpriteId::ForestBackground,
        }
    }
}

impl FromStr for MapId {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "city" => Ok(MapId::City),
            "forest" => Ok(MapId::Forest),
            _ => Err(SimError::UnknownId {
                kind: "map",
                value: s.to_string(),
            }),
        }
    }
}

/// Plane color (sprite choice only, no effect on physics)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PlaneColor {
    #[default]
    White,
    Red,
    Blue,
    Yellow,
}

impl PlaneColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaneColor::White => "WHITE",
            PlaneColor::Red => "RED",
            PlaneColor::Blue => "BLUE",
            PlaneColor::Yellow => "YELLOW",
        }
    }

    pub fn sprite(&self) -> SpriteId {
        match self {
            PlaneColor::White => SpriteId::WhitePlane,
            PlaneColor::Red => SpriteId::RedPlane,
            PlaneColor::Blue => SpriteId::BluePlane,
            PlaneColor::Yellow => SpriteId::YellowPlane,
        }
    }
}

impl FromStr for PlaneColor {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "white" => Ok(PlaneColor::White),
            "red" => Ok(PlaneColor::Red),
            "blue" => Ok(PlaneColor::Blue),
            "yellow" => Ok(PlaneColor::Yellow),
            _ => Err(SimError::UnknownId {
                kind: "plane color",
                value: s.to_string(),
            }),
        }
    }
}

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Normal => "NORMAL",
            Difficulty::Hard => "HARD",
        }
    }

    /// Fixed tuning table for this difficulty
    pub fn tuning(&self) -> DifficultyTuning {
        match self {
            Difficulty::Normal => DifficultyTuning {
                lift_force: 1500.0,
                forward_thrust: 100.0,
                drag_coefficient: 0.005,
                max_speed: 1200.0,
                obstacle_spawn_interval_ms: 2500.0,
            },
            // Roughly 1.5 obstacles on screen at once
            Difficulty::Hard => DifficultyTuning {
                lift_force: 2000.0,
                forward_thrust: 200.0,
                drag_coefficient: 0.008,
                max_speed: 2000.0,
                obstacle_spawn_interval_ms: 1500.0,
            },
        }
    }
}

impl FromStr for Difficulty {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(SimError::UnknownId {
                kind: "difficulty",
                value: s.to_string(),
            }),
        }
    }
}

/// Physics and spawn tuning selected by difficulty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTuning {
    /// Upward force while climb is held
    pub lift_force: f32,
    /// Constant forward force while flying
    pub forward_thrust: f32,
    pub drag_coefficient: f32,
    pub max_speed: f32,
    /// Simulated milliseconds between obstacle spawns
    pub obstacle_spawn_interval_ms: f32,
}

/// Everything the menu layer hands over at session start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SessionConfig {
    pub map: MapId,
    pub plane_color: PlaneColor,
    pub difficulty: Difficulty,
}

impl SessionConfig {
    pub fn new(map: MapId, plane_color: PlaneColor, difficulty: Difficulty) -> Self {
        Self {
            map,
            plane_color,
            difficulty,
        }
    }

    pub fn tuning(&self) -> DifficultyTuning {
        self.difficulty.tuning()
    }

    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config = serde_json::from_str(json)?;
        log::info!("Loaded session config: {:?}", config);
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_parse_case_insensitively() {
        assert_eq!("forest".parse::<MapId>().unwrap(), MapId::Forest);
        assert_eq!("CITY".parse::<MapId>().unwrap(), MapId::City);
        assert_eq!("Yellow".parse::<PlaneColor>().unwrap(), PlaneColor::Yellow);
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("desert".parse::<MapId>().is_err());
    }

    #[test]
    fn test_tuning_table() {
        let normal = Difficulty::Normal.tuning();
        assert_eq!(normal.lift_force, 1500.0);
        assert_eq!(normal.max_speed, 1200.0);
        assert_eq!(normal.obstacle_spawn_interval_ms, 2500.0);

        let hard = Difficulty::Hard.tuning();
        assert_eq!(hard.forward_thrust, 200.0);
        assert_eq!(hard.drag_coefficient, 0.008);
        assert_eq!(hard.obstacle_spawn_interval_ms, 1500.0);
    }

    #[test]
    fn test_config_json() {
        let config = SessionConfig::new(MapId::Forest, PlaneColor::Red, Difficulty::Hard);
        let json = config.to_json().unwrap();
        assert_eq!(SessionConfig::from_json(&json).unwrap(), config);
        assert!(SessionConfig::from_json("{\"map\":\"Moon\"}").is_err());
    }
}
