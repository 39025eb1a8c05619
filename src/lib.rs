//! Flappy Evolve - a deterministic evaluation world for evolving agents
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, per-pixel collisions, world state)
//! - `evaluate`: One generation of the closed evaluation loop
//! - `policy`: Decision and fitness capabilities bound to each agent
//! - `renderer`: Read-only presentation adapters
//! - `driver`: Generation harness for an external optimizer
//! - `config`: Data-driven world constants

pub mod config;
pub mod driver;
pub mod error;
pub mod evaluate;
pub mod network;
pub mod policy;
pub mod population;
pub mod renderer;
pub mod sim;
pub mod stats;

pub use config::{AgentConfig, FitnessConfig, RunConfig, WorldConfig};
pub use driver::{Harness, Optimizer};
pub use error::{ConfigError, EvalError, PolicyError, RenderError};
pub use evaluate::{EndReason, EvaluationReport, Evaluator, MemberOutcome, StopSignal};
pub use policy::{Fitness, Observation, Policy};
pub use stats::Statistics;

/// World configuration defaults
pub mod consts {
    /// Visible world dimensions
    pub const WORLD_WIDTH: f32 = 500.0;
    pub const WORLD_HEIGHT: f32 = 800.0;

    /// Agent spawn point (agents never move horizontally)
    pub const SPAWN_X: f32 = 230.0;
    pub const SPAWN_Y: f32 = 350.0;

    /// Floor line; an agent whose footprint reaches it is retired
    pub const GROUND_LINE: f32 = 730.0;

    /// Vertical opening between the two barriers of an obstacle
    pub const OBSTACLE_GAP: f32 = 160.0;
    /// Obstacle and ground scroll speed (units/tick)
    pub const OBSTACLE_VELOCITY: f32 = 5.0;
    /// Safe range for the gap center (inclusive)
    pub const GAP_CENTER_MIN: f32 = 120.0;
    pub const GAP_CENTER_MAX: f32 = 530.0;
    /// Horizontal position of the first obstacle of a generation
    pub const INITIAL_OBSTACLE_X: f32 = 700.0;
    /// Horizontal position of every obstacle spawned after a pass
    pub const OBSTACLE_SPAWN_X: f32 = 600.0;

    /// Agent kinematics
    pub const IMPULSE_VELOCITY: f32 = -10.5;
    pub const MAX_FALL_SPEED: f32 = 16.0;
    pub const GRAVITY: f32 = 1.5;
    /// Extra lift applied to any upward displacement
    pub const ASCENT_BOOST: f32 = 2.0;

    /// Presentation-only tilt (degrees)
    pub const MAX_TILT: f32 = 25.0;
    pub const MIN_TILT: f32 = -90.0;
    pub const TILT_RATE: f32 = 20.0;
    pub const TILT_BAND: f32 = 50.0;

    /// Any policy output strictly above this triggers an impulse
    pub const ACTION_THRESHOLD: f32 = 0.5;

    /// Fitness adjustments
    pub const SURVIVAL_REWARD: f32 = 0.1;
    pub const COLLISION_PENALTY: f32 = -1.0;
    pub const PASS_BONUS: f32 = 5.0;
}

/// Knuth multiplicative hash used to derive per-generation seeds
#[inline]
pub fn mix_seed(seed: u64, salt: u64) -> u64 {
    salt.wrapping_mul(2654435761).wrapping_add(seed)
}
