//! One generation of the evaluation loop
//!
//! Binds one agent to every population member, ticks the world until the
//! population is gone (or the budget or stop signal ends it), and reports
//! per-member fitness back to the caller.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::config::WorldConfig;
use crate::error::{ConfigError, EvalError};
use crate::policy::{Fitness, Policy};
use crate::renderer::{Frame, Renderer};
use crate::sim::{Binding, RetireCause, SpriteSet, WorldState, tick};

/// Cooperative cancellation flag, checked once per tick
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Why an evaluation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Every agent was retired
    Extinct,
    /// The configured tick budget ran out
    TickBudget,
    /// The stop signal was raised
    Cancelled,
}

/// Final tally for one population member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberOutcome {
    pub member_index: usize,
    /// Sum of every adjustment delivered this generation
    pub fitness: f32,
    pub ticks_survived: u64,
    /// `None` if the agent was still alive when the evaluation ended
    pub cause: Option<RetireCause>,
}

/// Result of one generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub generation: u32,
    pub seed: u64,
    pub score: u32,
    pub ticks: u64,
    pub end: EndReason,
    /// One entry per member, in population order
    pub outcomes: Vec<MemberOutcome>,
}

impl EvaluationReport {
    pub fn best(&self) -> Option<&MemberOutcome> {
        self.outcomes
            .iter()
            .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
    }

    pub fn best_fitness(&self) -> Option<f32> {
        self.best().map(|o| o.fitness)
    }

    pub fn mean_fitness(&self) -> Option<f32> {
        if self.outcomes.is_empty() {
            return None;
        }
        let sum: f32 = self.outcomes.iter().map(|o| o.fitness).sum();
        Some(sum / self.outcomes.len() as f32)
    }
}

/// Runs generations against a fixed world configuration
#[derive(Debug, Clone)]
pub struct Evaluator {
    config: WorldConfig,
    sprites: SpriteSet,
    stop: StopSignal,
}

impl Evaluator {
    /// Validates the configuration up front so no generation runs on bad constants
    pub fn new(config: WorldConfig, sprites: SpriteSet) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            sprites,
            stop: StopSignal::new(),
        })
    }

    /// Handle for requesting a stop from elsewhere
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Evaluate `population` for one generation.
    ///
    /// `seed` drives obstacle gaps; the same seed and the same policies
    /// reproduce the same report.
    pub fn evaluate<M, R>(
        &self,
        population: &mut [M],
        generation: u32,
        seed: u64,
        renderer: &mut R,
    ) -> Result<EvaluationReport, EvalError>
    where
        M: Policy + Fitness,
        R: Renderer + ?Sized,
    {
        let config = &self.config;
        let sprites = &self.sprites;

        let mut state = WorldState::new(seed, config, sprites);
        let mut outcomes: Vec<Option<MemberOutcome>> = vec![None; population.len()];
        let mut live: Vec<Binding<'_, M>> = population
            .iter_mut()
            .enumerate()
            .map(|(i, member)| Binding::new(state.spawn_agent(config), i, member))
            .collect();

        log::info!(
            "Generation {}: evaluating {} members (seed {})",
            generation,
            live.len(),
            seed
        );

        let end = loop {
            if live.is_empty() {
                break EndReason::Extinct;
            }
            if self.stop.is_stopped() {
                break EndReason::Cancelled;
            }
            if config.max_ticks.is_some_and(|max| state.time_ticks >= max) {
                break EndReason::TickBudget;
            }

            let report = tick(&mut state, &mut live, config, sprites)?;
            for retired in report.retired {
                outcomes[retired.member_index] = Some(MemberOutcome {
                    member_index: retired.member_index,
                    fitness: retired.fitness,
                    ticks_survived: retired.ticks_survived,
                    cause: Some(retired.cause),
                });
            }

            let frame = Frame {
                agents: live.iter().map(|b| &b.agent).collect(),
                obstacles: &state.obstacles,
                ground: &state.ground,
                score: state.score,
                generation,
                tick: state.time_ticks,
            };
            renderer.render(&frame)?;
        };

        for binding in &live {
            outcomes[binding.member_index] = Some(MemberOutcome {
                member_index: binding.member_index,
                fitness: binding.fitness,
                ticks_survived: binding.ticks_survived,
                cause: None,
            });
        }
        drop(live);

        let outcomes: Vec<MemberOutcome> = outcomes
            .into_iter()
            .enumerate()
            .map(|(i, o)| {
                o.unwrap_or(MemberOutcome {
                    member_index: i,
                    fitness: 0.0,
                    ticks_survived: 0,
                    cause: None,
                })
            })
            .collect();

        let report = EvaluationReport {
            generation,
            seed,
            score: state.score,
            ticks: state.time_ticks,
            end,
            outcomes,
        };
        log::info!(
            "Generation {} ended ({:?}) after {} ticks: score {}, best {:.1}",
            generation,
            end,
            report.ticks,
            report.score,
            report.best_fitness().unwrap_or(0.0)
        );
        Ok(report)
    }
}
