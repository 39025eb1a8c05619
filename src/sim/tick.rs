//! Fixed timestep simulation tick
//!
//! Advances every live agent and obstacle by one step. All agents are
//! evaluated against the same obstacle snapshot; retirements are collected
//! during the scan and applied by agent id afterwards.

use serde::{Deserialize, Serialize};

use super::agent::{Agent, AgentId};
use super::sprites::SpriteSet;
use super::state::WorldState;
use crate::config::WorldConfig;
use crate::error::{EvalError, PolicyError};
use crate::policy::{Fitness, Observation, Policy};

/// Why an agent left the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetireCause {
    /// Hit a barrier
    Collision,
    /// Footprint reached the ground line
    Ground,
    /// Rose above the top of the world
    Ceiling,
}

/// An agent together with the population member that drives it
#[derive(Debug)]
pub struct Binding<'p, M> {
    pub agent: Agent,
    /// Position of the member in the population slice
    pub member_index: usize,
    pub member: &'p mut M,
    /// Sum of every delta handed to the member this generation
    pub fitness: f32,
    pub ticks_survived: u64,
}

impl<'p, M: Fitness> Binding<'p, M> {
    pub fn new(agent: Agent, member_index: usize, member: &'p mut M) -> Self {
        Self {
            agent,
            member_index,
            member,
            fitness: 0.0,
            ticks_survived: 0,
        }
    }

    /// Forward a fitness delta to the member and keep a tally
    pub fn reward(&mut self, delta: f32) {
        self.member.adjust(delta);
        self.fitness += delta;
    }
}

/// An agent removed during a tick
#[derive(Debug, Clone, PartialEq)]
pub struct Retirement {
    pub agent_id: AgentId,
    pub member_index: usize,
    pub cause: RetireCause,
    pub fitness: f32,
    pub ticks_survived: u64,
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// An obstacle was passed and the score incremented
    pub passed: bool,
    pub retired: Vec<Retirement>,
}

/// Advance the world and every live binding by one fixed timestep
pub fn tick<M: Policy + Fitness>(
    state: &mut WorldState,
    live: &mut Vec<Binding<'_, M>>,
    config: &WorldConfig,
    sprites: &SpriteSet,
) -> Result<TickReport, EvalError> {
    let mut report = TickReport::default();
    let Some(lead_x) = live.first().map(|b| b.agent.x) else {
        return Ok(report);
    };

    state.time_ticks += 1;

    if state.obstacles.is_empty() {
        state.spawn_obstacle(config.obstacle_spawn_x, config, sprites);
    }

    // Focus is chosen from the lead agent before anyone moves or retires
    let focus = &state.obstacles[state.focus_index(lead_x).unwrap_or(0)];
    let (gap_top, gap_bottom) = (focus.gap_top, focus.gap_bottom);

    // Decide and move
    for binding in live.iter_mut() {
        binding.reward(config.fitness.survival);
        binding.ticks_survived += 1;

        let observation = Observation::new(&binding.agent, gap_top, gap_bottom);
        let action = binding
            .member
            .decide(&observation)
            .and_then(|a| {
                if a.is_finite() {
                    Ok(a)
                } else {
                    Err(PolicyError::NonFinite(a))
                }
            })
            .map_err(|source| EvalError::Policy {
                member: binding.member_index,
                source,
            })?;

        if action > config.action_threshold {
            binding.agent.apply_impulse(config.agent.impulse_velocity);
        }
        binding.agent.advance(&config.agent);
    }

    // Collisions and passes
    let mut collided: Vec<AgentId> = Vec::new();
    let mut add_obstacle = false;
    for obstacle in state.obstacles.iter_mut() {
        for binding in live.iter_mut() {
            let id = binding.agent.id;
            if !collided.contains(&id) && obstacle.overlaps(&binding.agent, sprites) {
                binding.reward(config.fitness.collision);
                collided.push(id);
            }

            if !obstacle.passed && obstacle.trailing_edge() < binding.agent.x {
                obstacle.passed = true;
                add_obstacle = true;
            }
        }
    }

    state.obstacles.retain(|o| !o.is_offscreen());

    for obstacle in state.obstacles.iter_mut() {
        obstacle.advance(config.obstacle_velocity);
    }
    state.ground.advance();

    if add_obstacle {
        state.score += 1;
        for binding in live.iter_mut().filter(|b| !collided.contains(&b.agent.id)) {
            binding.reward(config.fitness.pass_bonus);
        }
        state.spawn_obstacle(config.obstacle_spawn_x, config, sprites);
        report.passed = true;
        log::debug!("Tick {}: obstacle passed, score {}", state.time_ticks, state.score);
    }

    // Retire by identity in one pass
    let mut retiring: Vec<(AgentId, RetireCause)> = collided
        .iter()
        .map(|&id| (id, RetireCause::Collision))
        .collect();
    for binding in live.iter() {
        let agent = &binding.agent;
        if collided.contains(&agent.id) {
            continue;
        }
        if agent.bottom(sprites) >= config.ground_line {
            retiring.push((agent.id, RetireCause::Ground));
        } else if agent.y < 0.0 {
            retiring.push((agent.id, RetireCause::Ceiling));
        }
    }

    if !retiring.is_empty() {
        let mut kept = Vec::with_capacity(live.len());
        for binding in live.drain(..) {
            let cause = retiring
                .iter()
                .find_map(|&(id, cause)| (id == binding.agent.id).then_some(cause));
            let Some(cause) = cause else {
                kept.push(binding);
                continue;
            };
            log::debug!(
                "Tick {}: member {} retired ({:?}) fitness {:.1}",
                state.time_ticks,
                binding.member_index,
                cause,
                binding.fitness
            );
            report.retired.push(Retirement {
                agent_id: binding.agent.id,
                member_index: binding.member_index,
                cause,
                fitness: binding.fitness,
                ticks_survived: binding.ticks_survived,
            });
        }
        *live = kept;
    }

    Ok(report)
}
