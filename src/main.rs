//! Flappy Evolve - native entry point
//!
//! Usage: `flappy-evolve [config.json]`. Without a config file the built-in
//! defaults are used. Set `RUST_LOG=debug` to follow individual generations.

use std::process::ExitCode;

use flappy_evolve::population::MutationOptimizer;
use flappy_evolve::renderer::LogRenderer;
use flappy_evolve::sim::SpriteSet;
use flappy_evolve::{EvalError, Evaluator, Harness, RunConfig};

fn run() -> Result<(), EvalError> {
    let config = match std::env::args().nth(1) {
        Some(path) => RunConfig::load(path)?,
        None => {
            let config = RunConfig::default();
            config.validate()?;
            config
        }
    };

    log::info!(
        "Population {} for up to {} generations (seed {})",
        config.population_size,
        config.max_generations,
        config.seed
    );

    let evaluator = Evaluator::new(config.world.clone(), SpriteSet::procedural())?;
    let mut harness =
        Harness::new(evaluator, config.seed).with_fitness_threshold(config.fitness_threshold);
    let mut optimizer = MutationOptimizer::new(config.population_size, config.seed);
    let mut renderer = LogRenderer::default();

    let stats = harness.run(&mut optimizer, config.max_generations, &mut renderer)?;
    log::info!(
        "Finished {} generations: best fitness {:.1}, best score {}",
        stats.generations(),
        stats.best_fitness().unwrap_or(0.0),
        stats.best_score().unwrap_or(0)
    );
    for (rank, record) in stats.leaders.iter().enumerate() {
        log::info!(
            "#{:<2} gen {:>3}  best {:>8.1}  mean {:>7.1}  score {}",
            rank + 1,
            record.generation,
            record.best_fitness,
            record.mean_fitness,
            record.score
        );
    }

    if let Some(path) = &config.winner_path {
        if let Some(winner) = optimizer.best() {
            let json = serde_json::to_string_pretty(winner)
                .map_err(|e| EvalError::Optimizer(e.to_string()))?;
            std::fs::write(path, json).map_err(|e| EvalError::Optimizer(e.to_string()))?;
            log::info!("Winner saved to {}", path.display());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Flappy Evolve starting...");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
