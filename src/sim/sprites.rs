//! Collision footprints for agents and barriers
//!
//! The default set is generated procedurally at the scale of the classic
//! 2x sprites. An asset loader can build its own `SpriteSet` from alpha
//! channels with `Mask::from_alpha`.

use serde::{Deserialize, Serialize};

use super::mask::Mask;

pub const AGENT_WIDTH: u32 = 68;
pub const AGENT_HEIGHT: u32 = 48;
pub const BARRIER_WIDTH: u32 = 104;
pub const BARRIER_HEIGHT: u32 = 640;
/// Depth of the wider cap at the open end of a barrier
pub const BARRIER_LIP: u32 = 48;
/// Horizontal inset of the barrier shaft relative to its cap
pub const BARRIER_INSET: u32 = 4;
pub const GROUND_TILE_WIDTH: f32 = 672.0;

/// Wing pose of an agent; each pose has its own footprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WingFrame {
    #[default]
    Up,
    Mid,
    Down,
}

impl WingFrame {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            WingFrame::Up => 0,
            WingFrame::Mid => 1,
            WingFrame::Down => 2,
        }
    }
}

/// Every footprint the simulation needs
#[derive(Debug, Clone)]
pub struct SpriteSet {
    agent: [Mask; 3],
    barrier_top: Mask,
    barrier_bottom: Mask,
    ground_tile_width: f32,
}

impl Default for SpriteSet {
    fn default() -> Self {
        Self::procedural()
    }
}

impl SpriteSet {
    /// Assemble a set from externally loaded masks. The top barrier is the
    /// bottom barrier mirrored vertically.
    pub fn new(agent: [Mask; 3], barrier_bottom: Mask, ground_tile_width: f32) -> Self {
        Self {
            agent,
            barrier_top: barrier_bottom.flipped_vertical(),
            barrier_bottom,
            ground_tile_width,
        }
    }

    /// Built-in footprints with transparent margins around every shape
    pub fn procedural() -> Self {
        let agent = [
            agent_mask(WingFrame::Up),
            agent_mask(WingFrame::Mid),
            agent_mask(WingFrame::Down),
        ];
        let barrier_bottom = Mask::from_fn(BARRIER_WIDTH, BARRIER_HEIGHT, |x, y| {
            y < BARRIER_LIP || (x >= BARRIER_INSET && x < BARRIER_WIDTH - BARRIER_INSET)
        });
        Self::new(agent, barrier_bottom, GROUND_TILE_WIDTH)
    }

    #[inline]
    pub fn agent(&self, frame: WingFrame) -> &Mask {
        &self.agent[frame.index()]
    }

    #[inline]
    pub fn barrier_top(&self) -> &Mask {
        &self.barrier_top
    }

    #[inline]
    pub fn barrier_bottom(&self) -> &Mask {
        &self.barrier_bottom
    }

    #[inline]
    pub fn barrier_width(&self) -> f32 {
        self.barrier_bottom.width() as f32
    }

    #[inline]
    pub fn barrier_height(&self) -> f32 {
        self.barrier_bottom.height() as f32
    }

    #[inline]
    pub fn ground_tile_width(&self) -> f32 {
        self.ground_tile_width
    }
}

fn inside_ellipse(x: u32, y: u32, cx: f32, cy: f32, rx: f32, ry: f32) -> bool {
    let dx = (x as f32 + 0.5 - cx) / rx;
    let dy = (y as f32 + 0.5 - cy) / ry;
    dx * dx + dy * dy <= 1.0
}

fn agent_mask(frame: WingFrame) -> Mask {
    let wing_y = match frame {
        WingFrame::Up => 14.0,
        WingFrame::Mid => 24.0,
        WingFrame::Down => 34.0,
    };
    Mask::from_fn(AGENT_WIDTH, AGENT_HEIGHT, |x, y| {
        let body = inside_ellipse(x, y, 34.0, 24.0, 30.0, 20.0);
        let wing = inside_ellipse(x, y, 18.0, wing_y, 10.0, 6.0);
        let beak = (56..66).contains(&x) && (26..32).contains(&y);
        body || wing || beak
    })
}
