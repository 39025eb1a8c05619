//! World and run configuration
//!
//! Loaded from JSON; every field falls back to the defaults in `consts`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Agent kinematics and presentation tilt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Velocity set by an impulse (negative is up)
    pub impulse_velocity: f32,
    /// Largest downward displacement in one tick. Only descent is clamped;
    /// the rise right after an impulse may move further per tick.
    pub max_fall_speed: f32,
    /// Quadratic term of the displacement arc
    pub gravity: f32,
    /// Extra lift added to any upward displacement
    pub ascent_boost: f32,
    pub max_tilt: f32,
    pub min_tilt: f32,
    pub tilt_rate: f32,
    /// Height above the last impulse that still counts as climbing
    pub tilt_band: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            impulse_velocity: IMPULSE_VELOCITY,
            max_fall_speed: MAX_FALL_SPEED,
            gravity: GRAVITY,
            ascent_boost: ASCENT_BOOST,
            max_tilt: MAX_TILT,
            min_tilt: MIN_TILT,
            tilt_rate: TILT_RATE,
            tilt_band: TILT_BAND,
        }
    }
}

/// Fitness deltas handed to each member's accumulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessConfig {
    /// Granted to every live agent each tick
    pub survival: f32,
    /// Applied once to an agent that hits a barrier
    pub collision: f32,
    /// Granted to every live agent when an obstacle is passed
    pub pass_bonus: f32,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            survival: SURVIVAL_REWARD,
            collision: COLLISION_PENALTY,
            pass_bonus: PASS_BONUS,
        }
    }
}

/// Constants of the simulated world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub ground_line: f32,
    pub gap: f32,
    pub obstacle_velocity: f32,
    pub gap_center_min: f32,
    pub gap_center_max: f32,
    pub initial_obstacle_x: f32,
    pub obstacle_spawn_x: f32,
    pub action_threshold: f32,
    /// Optional per-generation tick budget
    pub max_ticks: Option<u64>,
    pub agent: AgentConfig,
    pub fitness: FitnessConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            spawn_x: SPAWN_X,
            spawn_y: SPAWN_Y,
            ground_line: GROUND_LINE,
            gap: OBSTACLE_GAP,
            obstacle_velocity: OBSTACLE_VELOCITY,
            gap_center_min: GAP_CENTER_MIN,
            gap_center_max: GAP_CENTER_MAX,
            initial_obstacle_x: INITIAL_OBSTACLE_X,
            obstacle_spawn_x: OBSTACLE_SPAWN_X,
            action_threshold: ACTION_THRESHOLD,
            max_ticks: None,
            agent: AgentConfig::default(),
            fitness: FitnessConfig::default(),
        }
    }
}

fn require(ok: bool, field: &'static str, reason: &str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, reason))
    }
}

impl WorldConfig {
    /// Reject constants that would make the world meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            self.width,
            self.height,
            self.spawn_x,
            self.spawn_y,
            self.ground_line,
            self.gap,
            self.obstacle_velocity,
            self.gap_center_min,
            self.gap_center_max,
            self.initial_obstacle_x,
            self.obstacle_spawn_x,
            self.action_threshold,
            self.agent.impulse_velocity,
            self.agent.max_fall_speed,
            self.agent.gravity,
            self.agent.ascent_boost,
            self.agent.max_tilt,
            self.agent.min_tilt,
            self.agent.tilt_rate,
            self.agent.tilt_band,
            self.fitness.survival,
            self.fitness.collision,
            self.fitness.pass_bonus,
        ];
        require(
            finite.iter().all(|v| v.is_finite()),
            "world",
            "all values must be finite",
        )?;

        require(self.width > 0.0, "width", "must be positive")?;
        require(self.height > 0.0, "height", "must be positive")?;
        require(
            self.ground_line > 0.0 && self.ground_line <= self.height,
            "ground_line",
            "must lie inside the world height",
        )?;
        require(
            self.spawn_x >= 0.0 && self.spawn_x < self.width,
            "spawn_x",
            "must lie inside the world width",
        )?;
        require(
            self.spawn_y >= 0.0 && self.spawn_y < self.ground_line,
            "spawn_y",
            "must lie between the top and the ground line",
        )?;
        require(self.gap > 0.0, "gap", "must be positive")?;
        require(self.obstacle_velocity > 0.0, "obstacle_velocity", "must be positive")?;
        require(
            self.gap_center_min <= self.gap_center_max,
            "gap_center_min",
            "must not exceed gap_center_max",
        )?;
        require(
            self.gap_center_min - self.gap / 2.0 >= 0.0,
            "gap_center_min",
            "gap must open below the top of the world",
        )?;
        require(
            self.gap_center_max + self.gap / 2.0 <= self.ground_line,
            "gap_center_max",
            "gap must close above the ground line",
        )?;
        require(
            self.initial_obstacle_x > self.spawn_x,
            "initial_obstacle_x",
            "must spawn ahead of the agents",
        )?;
        require(
            self.obstacle_spawn_x > self.spawn_x,
            "obstacle_spawn_x",
            "must spawn ahead of the agents",
        )?;
        require(
            self.agent.impulse_velocity < 0.0,
            "agent.impulse_velocity",
            "must point upward (negative)",
        )?;
        require(self.agent.max_fall_speed > 0.0, "agent.max_fall_speed", "must be positive")?;
        require(self.agent.gravity > 0.0, "agent.gravity", "must be positive")?;
        require(self.agent.ascent_boost >= 0.0, "agent.ascent_boost", "must not be negative")?;
        require(
            self.agent.min_tilt <= self.agent.max_tilt,
            "agent.min_tilt",
            "must not exceed max_tilt",
        )?;
        require(self.max_ticks != Some(0), "max_ticks", "must be positive when set")?;
        Ok(())
    }
}

/// Process-level settings for a full evolutionary run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub world: WorldConfig,
    /// Base seed; each generation derives its own obstacle seed from it
    pub seed: u64,
    pub population_size: usize,
    pub max_generations: u32,
    /// Stop early once the best member reaches this fitness
    pub fitness_threshold: Option<f32>,
    /// Where to write the best member as JSON
    pub winner_path: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            seed: 0x5eed,
            population_size: 50,
            max_generations: 50,
            fitness_threshold: Some(100.0),
            winner_path: None,
        }
    }
}

impl RunConfig {
    /// Read and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;
        require(self.population_size > 0, "population_size", "must be positive")?;
        require(self.max_generations > 0, "max_generations", "must be positive")?;
        if let Some(threshold) = self.fitness_threshold {
            require(threshold.is_finite(), "fitness_threshold", "must be finite")?;
        }
        Ok(())
    }
}
