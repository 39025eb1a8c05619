//! End-to-end generations against the default world

use flappy_evolve::network::Perceptron;
use flappy_evolve::renderer::{Frame, NullRenderer, Renderer};
use flappy_evolve::sim::{RetireCause, SpriteSet};
use flappy_evolve::{
    EndReason, Evaluator, Fitness, Observation, Policy, PolicyError, RenderError, WorldConfig,
};
use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Records every fitness delta it receives
#[derive(Debug, Default)]
struct Ledger {
    adjustments: Vec<f32>,
}

impl Ledger {
    fn total(&self) -> f32 {
        self.adjustments.iter().sum()
    }

    fn count(&self, delta: f32) -> usize {
        self.adjustments.iter().filter(|&&d| d == delta).count()
    }
}

/// Always returns the same action
#[derive(Debug, Default)]
struct Constant {
    action: f32,
    ledger: Ledger,
}

impl Policy for Constant {
    fn decide(&self, _observation: &Observation) -> Result<f32, PolicyError> {
        Ok(self.action)
    }
}

impl Fitness for Constant {
    fn adjust(&mut self, delta: f32) {
        self.ledger.adjustments.push(delta);
    }
}

/// Flaps whenever it sinks below a target height
#[derive(Debug)]
struct Hover {
    target_y: f32,
    ledger: Ledger,
}

impl Hover {
    fn new(target_y: f32) -> Self {
        Self {
            target_y,
            ledger: Ledger::default(),
        }
    }
}

impl Policy for Hover {
    fn decide(&self, observation: &Observation) -> Result<f32, PolicyError> {
        Ok(if observation.y > self.target_y { 1.0 } else { 0.0 })
    }
}

impl Fitness for Hover {
    fn adjust(&mut self, delta: f32) {
        self.ledger.adjustments.push(delta);
    }
}

/// Keeps the lead agent's height and the score of every frame
#[derive(Debug, Default)]
struct Recorder {
    heights: Vec<f32>,
    scores: Vec<u32>,
}

impl Renderer for Recorder {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), RenderError> {
        if let Some(agent) = frame.agents.first() {
            self.heights.push(agent.y);
        }
        self.scores.push(frame.score);
        Ok(())
    }
}

struct Failing;

impl Renderer for Failing {
    fn render(&mut self, _frame: &Frame<'_>) -> Result<(), RenderError> {
        Err(RenderError("display lost".into()))
    }
}

fn evaluator(config: WorldConfig) -> Evaluator {
    Evaluator::new(config, SpriteSet::procedural()).unwrap()
}

/// Fixed gap centered on y=350, weak impulses so a hovering agent barely
/// moves, and a budget that ends the run shortly after the first pass.
fn hover_world() -> WorldConfig {
    let mut config = WorldConfig {
        gap_center_min: 350.0,
        gap_center_max: 350.0,
        max_ticks: Some(120),
        ..Default::default()
    };
    config.agent.impulse_velocity = -3.0;
    config
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn never_flapping_agent_hits_the_ground() {
    let evaluator = evaluator(WorldConfig::default());
    let mut population = vec![Constant::default()];
    let report = evaluator
        .evaluate(&mut population, 1, 42, &mut NullRenderer)
        .unwrap();

    let outcome = &report.outcomes[0];
    assert_eq!(report.end, EndReason::Extinct);
    assert_eq!(outcome.cause, Some(RetireCause::Ground));
    // 350 -> 351.5, 357.5, 371, 387, then 16 per tick until y + 48 >= 730
    assert_eq!(outcome.ticks_survived, 23);
    assert_close(outcome.fitness, 0.1 * 23.0);
    assert_close(population[0].ledger.total(), 0.1 * 23.0);
    assert_eq!(report.score, 0);
}

#[test]
fn always_flapping_agent_leaves_through_the_top() {
    let evaluator = evaluator(WorldConfig::default());
    let mut population = vec![Constant {
        action: 1.0,
        ..Default::default()
    }];
    let mut recorder = Recorder::default();
    let report = evaluator
        .evaluate(&mut population, 1, 42, &mut recorder)
        .unwrap();

    let outcome = &report.outcomes[0];
    assert_eq!(outcome.cause, Some(RetireCause::Ceiling));
    // 11 units up per tick from 350
    assert_eq!(outcome.ticks_survived, 32);
    assert_close(outcome.fitness, 0.1 * 32.0);
    assert_eq!(population[0].ledger.count(-1.0), 0);
    assert_eq!(report.score, 0);

    assert!(recorder.heights.windows(2).all(|w| w[1] < w[0]));
}

#[test]
fn threading_agent_earns_the_pass_and_the_other_collides() {
    let evaluator = evaluator(hover_world());
    let mut population = vec![Hover::new(326.0), Hover::new(476.0)];
    let report = evaluator
        .evaluate(&mut population, 1, 7, &mut NullRenderer)
        .unwrap();

    assert_eq!(report.end, EndReason::TickBudget);
    assert_eq!(report.score, 1);

    let threader = &report.outcomes[0];
    assert_eq!(threader.cause, None);
    assert_eq!(threader.ticks_survived, 120);
    assert_close(threader.fitness, 0.1 * 120.0 + 5.0);
    assert_eq!(population[0].ledger.count(5.0), 1);
    assert_eq!(population[0].ledger.count(-1.0), 0);

    let crasher = &report.outcomes[1];
    assert_eq!(crasher.cause, Some(RetireCause::Collision));
    assert!(crasher.ticks_survived < 116, "crashed before the pass");
    assert_close(crasher.fitness, 0.1 * crasher.ticks_survived as f32 - 1.0);
    let ledger = &population[1].ledger;
    assert_eq!(ledger.count(-1.0), 1);
    assert_eq!(ledger.count(5.0), 0);
    // Nothing accrues after the penalty
    assert_eq!(ledger.adjustments.last(), Some(&-1.0));
}

#[test]
fn pass_scores_once_for_many_agents() {
    let evaluator = evaluator(hover_world());
    let mut population: Vec<Hover> = (0..5).map(|_| Hover::new(326.0)).collect();
    let mut recorder = Recorder::default();
    let report = evaluator
        .evaluate(&mut population, 3, 7, &mut recorder)
        .unwrap();

    assert_eq!(report.score, 1);
    assert_eq!(recorder.scores.len(), 120);
    assert_eq!(recorder.scores.iter().filter(|&&s| s == 1).count(), 5);
    for member in &population {
        assert_eq!(member.ledger.count(5.0), 1);
        assert_close(member.ledger.total(), 17.0);
    }
}

#[test]
fn every_member_is_adjusted_at_least_once() {
    let evaluator = evaluator(WorldConfig::default());
    let mut population = vec![
        Constant::default(),
        Constant {
            action: 1.0,
            ..Default::default()
        },
        Constant::default(),
    ];
    let report = evaluator
        .evaluate(&mut population, 1, 0, &mut NullRenderer)
        .unwrap();
    assert_eq!(report.outcomes.len(), 3);
    for (i, member) in population.iter().enumerate() {
        assert!(!member.ledger.adjustments.is_empty());
        assert_eq!(report.outcomes[i].member_index, i);
    }
}

#[test]
fn same_seed_same_generation() {
    let config = WorldConfig {
        max_ticks: Some(2_000),
        ..Default::default()
    };
    let evaluator = evaluator(config);

    let population = |seed| -> Vec<Perceptron> {
        let mut rng = Pcg32::seed_from_u64(seed);
        (0..30).map(|_| Perceptron::random(&mut rng)).collect()
    };

    let mut first = population(5);
    let mut second = population(5);
    let mut rec_a = Recorder::default();
    let mut rec_b = Recorder::default();
    let a = evaluator.evaluate(&mut first, 1, 1234, &mut rec_a).unwrap();
    let b = evaluator.evaluate(&mut second, 1, 1234, &mut rec_b).unwrap();

    assert_eq!(a, b);
    assert_eq!(rec_a.scores, rec_b.scores);
    assert_eq!(rec_a.heights, rec_b.heights);
    assert_eq!(first, second);
}

#[test]
fn render_failure_halts_the_generation() {
    let evaluator = evaluator(WorldConfig::default());
    let mut population = vec![Constant::default()];
    let err = evaluator
        .evaluate(&mut population, 1, 0, &mut Failing)
        .unwrap_err();
    assert!(matches!(err, flappy_evolve::EvalError::Render(_)));
    assert_eq!(population[0].ledger.adjustments.len(), 1);
}
