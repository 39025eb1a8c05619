//! World state owned by one evaluation
//!
//! Everything here is deterministic given the seed: obstacle gaps come from a
//! seeded `Pcg32` and entity ids are allocated in order.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::agent::{Agent, AgentId};
use super::ground::Ground;
use super::obstacle::Obstacle;
use super::sprites::SpriteSet;
use crate::config::WorldConfig;

/// Obstacles, floor, score and the RNG for one generation
#[derive(Debug, Clone)]
pub struct WorldState {
    /// Seed the obstacle RNG was created from
    pub seed: u64,
    rng: Pcg32,
    /// Live obstacles, oldest first
    pub obstacles: Vec<Obstacle>,
    pub ground: Ground,
    /// Obstacles passed by the surviving population
    pub score: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    next_id: u32,
}

impl WorldState {
    /// Fresh world with a single obstacle at the initial offset
    pub fn new(seed: u64, config: &WorldConfig, sprites: &SpriteSet) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            obstacles: Vec::new(),
            ground: Ground::new(
                config.ground_line,
                sprites.ground_tile_width(),
                config.obstacle_velocity,
            ),
            score: 0,
            time_ticks: 0,
            next_id: 1,
        };
        state.spawn_obstacle(config.initial_obstacle_x, config, sprites);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Create an agent at the spawn point
    pub fn spawn_agent(&mut self, config: &WorldConfig) -> Agent {
        let id: AgentId = self.next_entity_id();
        Agent::new(id, config.spawn_x, config.spawn_y)
    }

    /// Append an obstacle at `x` with a fresh random gap
    pub fn spawn_obstacle(&mut self, x: f32, config: &WorldConfig, sprites: &SpriteSet) {
        let id = self.next_entity_id();
        let obstacle = Obstacle::new(id, x, config, sprites, &mut self.rng);
        log::debug!(
            "Obstacle {} spawned at x={} gap_center={:.1}",
            id,
            x,
            obstacle.gap_center
        );
        self.obstacles.push(obstacle);
    }

    /// Index of the obstacle agents should reason about: the first one whose
    /// trailing edge is not yet behind `lead_x`, or the newest if all are.
    pub fn focus_index(&self, lead_x: f32) -> Option<usize> {
        self.obstacles
            .iter()
            .position(|o| o.trailing_edge() >= lead_x)
            .or_else(|| self.obstacles.len().checked_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world() {
        let config = WorldConfig::default();
        let state = WorldState::new(42, &config, &SpriteSet::procedural());
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].x, config.initial_obstacle_x);
        assert_eq!(state.score, 0);
        assert_eq!(state.ground.y, config.ground_line);
    }

    #[test]
    fn test_same_seed_same_gaps() {
        let config = WorldConfig::default();
        let sprites = SpriteSet::procedural();
        let mut a = WorldState::new(7, &config, &sprites);
        let mut b = WorldState::new(7, &config, &sprites);
        for _ in 0..10 {
            a.spawn_obstacle(600.0, &config, &sprites);
            b.spawn_obstacle(600.0, &config, &sprites);
        }
        assert_eq!(a.obstacles, b.obstacles);
    }

    #[test]
    fn test_focus_moves_past_cleared_obstacle() {
        let config = WorldConfig::default();
        let sprites = SpriteSet::procedural();
        let mut state = WorldState::new(1, &config, &sprites);
        state.spawn_obstacle(600.0, &config, &sprites);

        assert_eq!(state.focus_index(config.spawn_x), Some(0));
        state.obstacles[0].x = config.spawn_x - state.obstacles[0].width - 1.0;
        assert_eq!(state.focus_index(config.spawn_x), Some(1));

        state.obstacles.clear();
        assert_eq!(state.focus_index(config.spawn_x), None);
    }
}
