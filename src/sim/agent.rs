//! Agent kinematics
//!
//! Agents only move vertically; the world scrolls past them. Displacement
//! follows a closed-form arc measured from the last impulse, so the same
//! impulse history always produces the same trajectory.

use serde::{Deserialize, Serialize};

use super::mask::Mask;
use super::sprites::{SpriteSet, WingFrame};
use crate::config::AgentConfig;

/// Stable identity of an agent within one generation
pub type AgentId = u32;

/// Ticks each wing frame is held
pub const ANIMATION_TICKS: u32 = 5;
/// Nose-down tilt at which the wings stop flapping
pub const GLIDE_TILT: f32 = -80.0;

/// A single simulated flier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub x: f32,
    pub y: f32,
    pub vel: f32,
    /// Ticks since the last impulse (or since spawn)
    pub ticks_since_impulse: u32,
    /// Height at the last impulse, used for tilt
    pub reference_height: f32,
    /// Presentation-only orientation in degrees (positive is nose-up)
    pub tilt: f32,
    /// Wing animation counter
    pub anim_ticks: u32,
    /// Current wing pose; selects the collision footprint
    pub frame: WingFrame,
}

impl Agent {
    pub fn new(id: AgentId, x: f32, y: f32) -> Self {
        Self {
            id,
            x,
            y,
            vel: 0.0,
            ticks_since_impulse: 0,
            reference_height: y,
            tilt: 0.0,
            anim_ticks: 0,
            frame: WingFrame::Up,
        }
    }

    /// Kick the agent upward
    pub fn apply_impulse(&mut self, velocity: f32) {
        self.vel = velocity;
        self.ticks_since_impulse = 0;
        self.reference_height = self.y;
    }

    /// Integrate one tick and return the vertical displacement applied
    pub fn advance(&mut self, config: &AgentConfig) -> f32 {
        self.ticks_since_impulse += 1;
        let t = self.ticks_since_impulse as f32;

        let mut d = self.vel * t + config.gravity * t * t;
        d = d.min(config.max_fall_speed);
        if d < 0.0 {
            d -= config.ascent_boost;
        }
        self.y += d;

        if d < 0.0 || self.y < self.reference_height + config.tilt_band {
            self.tilt = self.tilt.max(config.max_tilt);
        } else if self.tilt > config.min_tilt {
            self.tilt -= config.tilt_rate;
        }

        self.animate();
        d
    }

    /// Step the wing cycle: up, mid, down, mid, then back to up
    fn animate(&mut self) {
        self.anim_ticks += 1;
        if self.anim_ticks > ANIMATION_TICKS * 4 {
            self.anim_ticks = 0;
        }
        self.frame = match self.anim_ticks / ANIMATION_TICKS {
            0 => WingFrame::Up,
            1 | 3 | 4 => WingFrame::Mid,
            _ => WingFrame::Down,
        };

        // Diving agents glide; flapping resumes mid-cycle after the next impulse
        if self.tilt <= GLIDE_TILT {
            self.frame = WingFrame::Mid;
            self.anim_ticks = ANIMATION_TICKS * 2;
        }
    }

    /// Per-pixel footprint for the current pose
    #[inline]
    pub fn footprint<'a>(&self, sprites: &'a SpriteSet) -> &'a Mask {
        sprites.agent(self.frame)
    }

    /// Bottom edge of the footprint's bounding rectangle
    #[inline]
    pub fn bottom(&self, sprites: &SpriteSet) -> f32 {
        self.y + self.footprint(sprites).height() as f32
    }
}
