//! Reference decision policy: a single tanh neuron over the observation
//!
//! Enough for the bundled optimizer to learn to fly; any other `Policy`
//! implementation can be evaluated the same way.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::policy::{Fitness, Observation, Policy};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Perceptron {
    pub weights: [f32; Observation::LEN],
    pub bias: f32,
    /// Accumulated by the evaluator; reset before each generation
    #[serde(default)]
    pub fitness: f32,
}

impl Perceptron {
    pub fn new(weights: [f32; Observation::LEN], bias: f32) -> Self {
        Self {
            weights,
            bias,
            fitness: 0.0,
        }
    }

    /// Weights and bias drawn uniformly from [-1, 1]
    pub fn random(rng: &mut impl Rng) -> Self {
        let mut weights = [0.0; Observation::LEN];
        for w in &mut weights {
            *w = rng.random_range(-1.0..=1.0);
        }
        Self::new(weights, rng.random_range(-1.0..=1.0))
    }

    pub fn activate(&self, inputs: [f32; Observation::LEN]) -> f32 {
        let sum: f32 = self.weights.iter().zip(inputs).map(|(w, x)| w * x).sum();
        (sum + self.bias).tanh()
    }

    /// Perturb every parameter with probability `rate` by up to `±power`
    pub fn mutate(&mut self, rng: &mut impl Rng, rate: f64, power: f32) {
        for w in &mut self.weights {
            if rng.random_bool(rate) {
                *w += rng.random_range(-power..=power);
            }
        }
        if rng.random_bool(rate) {
            self.bias += rng.random_range(-power..=power);
        }
    }
}

impl Policy for Perceptron {
    fn decide(&self, observation: &Observation) -> Result<f32, PolicyError> {
        Ok(self.activate(observation.to_array()))
    }
}

impl Fitness for Perceptron {
    fn adjust(&mut self, delta: f32) {
        self.fitness += delta;
    }
}
