//! Deterministic simulation module
//!
//! All world mechanics live here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Retirement keyed by agent ID, never by position
//! - No rendering or platform dependencies

pub mod agent;
pub mod ground;
pub mod mask;
pub mod obstacle;
pub mod sprites;
pub mod state;
pub mod tick;

pub use agent::{Agent, AgentId};
pub use ground::Ground;
pub use mask::Mask;
pub use obstacle::Obstacle;
pub use sprites::{SpriteSet, WingFrame};
pub use state::WorldState;
pub use tick::{Binding, RetireCause, Retirement, TickReport, tick};
