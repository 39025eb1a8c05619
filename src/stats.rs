//! Per-generation statistics
//!
//! Keeps the full history plus a leaderboard of the best generations.

use serde::{Deserialize, Serialize};

use crate::evaluate::{EndReason, EvaluationReport};

/// Maximum number of generations kept on the leaderboard
pub const MAX_LEADERS: usize = 10;

/// Summary of one generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub generation: u32,
    pub best_fitness: f32,
    pub mean_fitness: f32,
    pub score: u32,
    pub ticks: u64,
    pub end: EndReason,
}

impl GenerationRecord {
    pub fn from_report(report: &EvaluationReport) -> Self {
        Self {
            generation: report.generation,
            best_fitness: report.best_fitness().unwrap_or(0.0),
            mean_fitness: report.mean_fitness().unwrap_or(0.0),
            score: report.score,
            ticks: report.ticks,
            end: report.end,
        }
    }
}

/// History of a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Statistics {
    /// Every generation, in order
    pub history: Vec<GenerationRecord>,
    /// Best generations by best fitness, descending
    pub leaders: Vec<GenerationRecord>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a generation; returns its leaderboard rank (1-indexed) if it placed
    pub fn record(&mut self, report: &EvaluationReport) -> Option<usize> {
        let record = GenerationRecord::from_report(report);
        self.history.push(record.clone());

        let qualifies = self.leaders.len() < MAX_LEADERS
            || self
                .leaders
                .last()
                .map(|e| record.best_fitness > e.best_fitness)
                .unwrap_or(true);
        if !qualifies {
            return None;
        }

        // Ties keep the earlier generation ahead
        let pos = self
            .leaders
            .iter()
            .position(|e| record.best_fitness > e.best_fitness);
        let rank = match pos {
            Some(i) => {
                self.leaders.insert(i, record);
                i + 1
            }
            None => {
                self.leaders.push(record);
                self.leaders.len()
            }
        };
        self.leaders.truncate(MAX_LEADERS);
        Some(rank)
    }

    pub fn generations(&self) -> usize {
        self.history.len()
    }

    /// Best fitness seen in any generation
    pub fn best_fitness(&self) -> Option<f32> {
        self.leaders.first().map(|e| e.best_fitness)
    }

    /// Highest score reached in any generation
    pub fn best_score(&self) -> Option<u32> {
        self.history.iter().map(|r| r.score).max()
    }
}
