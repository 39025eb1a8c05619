//! Capabilities bound to every agent: a decision policy and a fitness accumulator

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::sim::Agent;

/// What an agent sees each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Agent's vertical position
    pub y: f32,
    /// Distance to the lower edge of the focus obstacle's top barrier
    pub to_gap_top: f32,
    /// Distance to the upper edge of the focus obstacle's bottom barrier
    pub to_gap_bottom: f32,
}

impl Observation {
    pub const LEN: usize = 3;

    pub fn new(agent: &Agent, gap_top: f32, gap_bottom: f32) -> Self {
        Self {
            y: agent.y,
            to_gap_top: (agent.y - gap_top).abs(),
            to_gap_bottom: (agent.y - gap_bottom).abs(),
        }
    }

    #[inline]
    pub fn to_array(self) -> [f32; Self::LEN] {
        [self.y, self.to_gap_top, self.to_gap_bottom]
    }
}

/// Maps an observation to an action; anything above the world's action
/// threshold triggers an impulse.
///
/// Implementations must be synchronous and must not block.
pub trait Policy {
    fn decide(&self, observation: &Observation) -> Result<f32, PolicyError>;
}

/// Receives fitness deltas for one population member
pub trait Fitness {
    fn adjust(&mut self, delta: f32);
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn decide(&self, observation: &Observation) -> Result<f32, PolicyError> {
        (**self).decide(observation)
    }
}

impl<F: Fitness + ?Sized> Fitness for Box<F> {
    fn adjust(&mut self, delta: f32) {
        (**self).adjust(delta)
    }
}
