//! Scrolling floor strip made of two congruent tiles

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ground {
    pub y: f32,
    pub x1: f32,
    pub x2: f32,
    pub tile_width: f32,
    pub velocity: f32,
}

impl Ground {
    pub fn new(y: f32, tile_width: f32, velocity: f32) -> Self {
        Self {
            y,
            x1: 0.0,
            x2: tile_width,
            tile_width,
            velocity,
        }
    }

    /// Scroll both tiles, wrapping whichever leaves the screen to the right of the other
    pub fn advance(&mut self) {
        self.x1 -= self.velocity;
        self.x2 -= self.velocity;

        if self.x1 + self.tile_width < 0.0 {
            self.x1 = self.x2 + self.tile_width;
        }
        if self.x2 + self.tile_width < 0.0 {
            self.x2 = self.x1 + self.tile_width;
        }
    }
}
