//! Reference optimizer: elitist truncation selection over perceptrons
//!
//! Deliberately small. Real runs are expected to plug in their own
//! `Optimizer`; this one exists so the binary has something to evolve.

use rand::seq::IndexedRandom;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::driver::Optimizer;
use crate::error::EvalError;
use crate::evaluate::EvaluationReport;
use crate::network::Perceptron;

#[derive(Debug, Clone)]
pub struct MutationOptimizer {
    members: Vec<Perceptron>,
    rng: Pcg32,
    /// Fraction of the population kept unchanged
    pub elite_fraction: f32,
    pub mutation_rate: f64,
    pub mutation_power: f32,
    champion: Option<Perceptron>,
}

impl MutationOptimizer {
    pub fn new(size: usize, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let members = (0..size).map(|_| Perceptron::random(&mut rng)).collect();
        Self {
            members,
            rng,
            elite_fraction: 0.2,
            mutation_rate: 0.8,
            mutation_power: 0.5,
            champion: None,
        }
    }

    pub fn members(&self) -> &[Perceptron] {
        &self.members
    }

    /// Fittest member seen so far, including the generation just evaluated
    pub fn best(&self) -> Option<&Perceptron> {
        let current = self
            .members
            .iter()
            .max_by(|a, b| a.fitness.total_cmp(&b.fitness));
        match (self.champion.as_ref(), current) {
            (Some(c), Some(m)) if m.fitness > c.fitness => Some(m),
            (Some(c), _) => Some(c),
            (None, m) => m,
        }
    }
}

impl Optimizer for MutationOptimizer {
    type Member = Perceptron;

    fn population_mut(&mut self) -> &mut [Perceptron] {
        &mut self.members
    }

    fn next_generation(&mut self, report: &EvaluationReport) -> Result<(), EvalError> {
        if report.outcomes.len() != self.members.len() {
            return Err(EvalError::Optimizer(format!(
                "report covers {} members, population has {}",
                report.outcomes.len(),
                self.members.len()
            )));
        }
        if self.members.is_empty() {
            return Ok(());
        }

        let mut ranked = self.members.clone();
        ranked.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));

        if self
            .champion
            .as_ref()
            .is_none_or(|c| ranked[0].fitness > c.fitness)
        {
            self.champion = Some(ranked[0].clone());
        }

        let elite = (ranked.len() as f32 * self.elite_fraction).ceil() as usize;
        let parents = &ranked[..elite.clamp(1, ranked.len())];

        let mut next: Vec<Perceptron> = parents.to_vec();
        while next.len() < self.members.len() {
            let Some(parent) = parents.choose(&mut self.rng) else {
                break;
            };
            let mut child = parent.clone();
            child.mutate(&mut self.rng, self.mutation_rate, self.mutation_power);
            next.push(child);
        }
        for member in &mut next {
            member.fitness = 0.0;
        }
        self.members = next;
        Ok(())
    }
}
