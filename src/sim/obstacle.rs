//! Paired barriers with a randomized gap

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::agent::Agent;
use super::sprites::SpriteSet;
use crate::config::WorldConfig;

/// A top and bottom barrier scrolling left together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge of both barriers
    pub x: f32,
    pub width: f32,
    /// Fixed for the obstacle's lifetime
    pub gap_center: f32,
    /// Lower edge of the top barrier
    pub gap_top: f32,
    /// Upper edge of the bottom barrier
    pub gap_bottom: f32,
    /// Sprite origin of the top barrier
    pub top: f32,
    pub passed: bool,
}

impl Obstacle {
    /// Spawn at `x` with a gap drawn uniformly from the configured safe range
    pub fn new(
        id: u32,
        x: f32,
        config: &WorldConfig,
        sprites: &SpriteSet,
        rng: &mut impl Rng,
    ) -> Self {
        let gap_center = rng.random_range(config.gap_center_min..=config.gap_center_max);
        Self::with_gap_center(id, x, gap_center, config.gap, sprites)
    }

    pub fn with_gap_center(
        id: u32,
        x: f32,
        gap_center: f32,
        gap: f32,
        sprites: &SpriteSet,
    ) -> Self {
        let gap_top = gap_center - gap / 2.0;
        Self {
            id,
            x,
            width: sprites.barrier_width(),
            gap_center,
            gap_top,
            gap_bottom: gap_top + gap,
            top: gap_top - sprites.barrier_height(),
            passed: false,
        }
    }

    /// Right edge of both barriers
    #[inline]
    pub fn trailing_edge(&self) -> f32 {
        self.x + self.width
    }

    /// Scroll left by one tick
    #[inline]
    pub fn advance(&mut self, velocity: f32) {
        self.x -= velocity;
    }

    /// Whether the obstacle has scrolled fully past the left world edge
    #[inline]
    pub fn is_offscreen(&self) -> bool {
        self.trailing_edge() < 0.0
    }

    /// Per-pixel overlap between the agent footprint and either barrier
    pub fn overlaps(&self, agent: &Agent, sprites: &SpriteSet) -> bool {
        let footprint = agent.footprint(sprites);
        let dx = self.x.round() as i32 - agent.x.round() as i32;
        let agent_y = agent.y.round() as i32;

        let top_offset = IVec2::new(dx, self.top.round() as i32 - agent_y);
        let bottom_offset = IVec2::new(dx, self.gap_bottom.round() as i32 - agent_y);

        footprint.overlaps(sprites.barrier_top(), top_offset)
            || footprint.overlaps(sprites.barrier_bottom(), bottom_offset)
    }
}
