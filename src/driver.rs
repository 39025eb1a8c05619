//! Generation harness
//!
//! Owns the generation counter and statistics, and hands each generation's
//! report to the optimizer so it can breed the next population.

use crate::error::EvalError;
use crate::evaluate::{EndReason, EvaluationReport, Evaluator};
use crate::mix_seed;
use crate::policy::{Fitness, Policy};
use crate::renderer::Renderer;
use crate::stats::Statistics;

/// An external evolutionary optimizer
pub trait Optimizer {
    type Member: Policy + Fitness;

    /// Current population; members are evaluated in this order
    fn population_mut(&mut self) -> &mut [Self::Member];

    /// Called after every generation with that generation's results
    fn next_generation(&mut self, report: &EvaluationReport) -> Result<(), EvalError>;
}

/// Runs generations until the limit, the fitness threshold, or a stop
#[derive(Debug)]
pub struct Harness {
    evaluator: Evaluator,
    seed: u64,
    fitness_threshold: Option<f32>,
    generation: u32,
    stats: Statistics,
}

impl Harness {
    pub fn new(evaluator: Evaluator, seed: u64) -> Self {
        Self {
            evaluator,
            seed,
            fitness_threshold: None,
            generation: 0,
            stats: Statistics::new(),
        }
    }

    pub fn with_fitness_threshold(mut self, threshold: Option<f32>) -> Self {
        self.fitness_threshold = threshold;
        self
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Generations completed so far
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    /// Obstacle seed for a generation
    pub fn generation_seed(&self, generation: u32) -> u64 {
        mix_seed(self.seed, generation as u64)
    }

    /// Evaluate up to `max_generations` generations
    pub fn run<O, R>(
        &mut self,
        optimizer: &mut O,
        max_generations: u32,
        renderer: &mut R,
    ) -> Result<&Statistics, EvalError>
    where
        O: Optimizer,
        R: Renderer + ?Sized,
    {
        for _ in 0..max_generations {
            self.generation += 1;
            let generation = self.generation;
            let seed = self.generation_seed(generation);

            let report =
                self.evaluator
                    .evaluate(optimizer.population_mut(), generation, seed, renderer)?;

            if let Some(rank) = self.stats.record(&report) {
                log::info!("Generation {} placed #{} on the leaderboard", generation, rank);
            }

            if report.end == EndReason::Cancelled {
                log::warn!("Run cancelled during generation {}", generation);
                break;
            }

            let best = report.best_fitness().unwrap_or(f32::NEG_INFINITY);
            if self.fitness_threshold.is_some_and(|t| best >= t) {
                log::info!(
                    "Fitness threshold reached in generation {} (best {:.1})",
                    generation,
                    best
                );
                break;
            }

            optimizer.next_generation(&report)?;
        }
        Ok(&self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::error::PolicyError;
    use crate::policy::Observation;
    use crate::renderer::NullRenderer;
    use crate::sim::SpriteSet;

    #[derive(Debug, Default)]
    struct Flapper {
        fitness: f32,
    }

    impl Policy for Flapper {
        fn decide(&self, _observation: &Observation) -> Result<f32, PolicyError> {
            Ok(1.0)
        }
    }

    impl Fitness for Flapper {
        fn adjust(&mut self, delta: f32) {
            self.fitness += delta;
        }
    }

    #[derive(Default)]
    struct Counting {
        members: Vec<Flapper>,
        reports: Vec<EvaluationReport>,
    }

    impl Optimizer for Counting {
        type Member = Flapper;

        fn population_mut(&mut self) -> &mut [Flapper] {
            &mut self.members
        }

        fn next_generation(&mut self, report: &EvaluationReport) -> Result<(), EvalError> {
            self.reports.push(report.clone());
            for m in &mut self.members {
                m.fitness = 0.0;
            }
            Ok(())
        }
    }

    fn harness() -> Harness {
        let evaluator = Evaluator::new(WorldConfig::default(), SpriteSet::procedural()).unwrap();
        Harness::new(evaluator, 11)
    }

    #[test]
    fn test_runs_all_generations() {
        let mut optimizer = Counting {
            members: vec![Flapper::default(), Flapper::default()],
            ..Default::default()
        };
        let mut harness = harness();
        let stats = harness.run(&mut optimizer, 3, &mut NullRenderer).unwrap();
        assert_eq!(stats.generations(), 3);
        assert_eq!(harness.generation(), 3);
        assert_eq!(optimizer.reports.len(), 3);
        assert_eq!(
            optimizer.reports.iter().map(|r| r.generation).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_ne!(optimizer.reports[0].seed, optimizer.reports[1].seed);
    }

    #[test]
    fn test_threshold_stops_early() {
        let mut optimizer = Counting {
            members: vec![Flapper::default()],
            ..Default::default()
        };
        let mut harness = harness().with_fitness_threshold(Some(0.05));
        harness.run(&mut optimizer, 10, &mut NullRenderer).unwrap();
        assert_eq!(harness.generation(), 1);
        assert!(optimizer.reports.is_empty());
    }

    #[test]
    fn test_cancel_stops_run() {
        let mut optimizer = Counting {
            members: vec![Flapper::default()],
            ..Default::default()
        };
        let mut harness = harness();
        harness.evaluator().stop_signal().stop();
        let stats = harness.run(&mut optimizer, 10, &mut NullRenderer).unwrap();
        assert_eq!(stats.generations(), 1);
        assert_eq!(stats.history[0].end, EndReason::Cancelled);
    }
}
