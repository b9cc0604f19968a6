//! Batch duels for balance tuning.
//!
//! Each trial resolves one attack between fresh clones of the two
//! combatants with its own RNG, seeded from the master seed and the trial
//! index. Trials therefore run in parallel and the aggregate is identical
//! for identical seeds no matter how rayon schedules them.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::entity::Combatant;
use crate::output::AttackOutcome;
use crate::pipeline::{AttackContext, CombatPipeline};

// =============================================================================
// DuelStats
// =============================================================================

/// Aggregated results of a batch of attacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DuelStats {
    /// Attacks resolved.
    pub trials: u64,
    /// Attacks that connected.
    pub hits: u64,
    /// Successful critical rolls.
    pub criticals: u64,
    /// Successful shield blocks.
    pub blocks: u64,
    /// Backstabs that applied.
    pub backstabs: u64,
    /// Sum of damage dealt.
    pub total_damage: i64,
    /// Largest single hit.
    pub max_damage: i32,
}

impl DuelStats {
    /// Adds one outcome.
    pub fn record(&mut self, outcome: &AttackOutcome) {
        self.trials += 1;
        self.hits += u64::from(outcome.hit);
        self.criticals += u64::from(outcome.critical);
        self.blocks += u64::from(outcome.shield_block_success);
        self.backstabs += u64::from(outcome.backstab);
        self.total_damage += i64::from(outcome.damage);
        self.max_damage = self.max_damage.max(outcome.damage);
    }

    /// Combines two partial aggregates.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            trials: self.trials + other.trials,
            hits: self.hits + other.hits,
            criticals: self.criticals + other.criticals,
            blocks: self.blocks + other.blocks,
            backstabs: self.backstabs + other.backstabs,
            total_damage: self.total_damage + other.total_damage,
            max_damage: self.max_damage.max(other.max_damage),
        }
    }

    /// Fraction of attacks that hit.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        ratio(self.hits, self.trials)
    }

    /// Fraction of hits that were critical.
    #[must_use]
    pub fn crit_rate(&self) -> f64 {
        ratio(self.criticals, self.hits)
    }

    /// Fraction of hits that were blocked.
    #[must_use]
    pub fn block_rate(&self) -> f64 {
        ratio(self.blocks, self.hits)
    }

    /// Mean damage per attack, misses included.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_damage(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.total_damage as f64 / self.trials as f64
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

impl From<&AttackOutcome> for DuelStats {
    fn from(outcome: &AttackOutcome) -> Self {
        let mut stats = Self::default();
        stats.record(outcome);
        stats
    }
}

// =============================================================================
// DuelSimulation
// =============================================================================

/// Repeats one attacker-versus-target setup many times.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use riposte_core::entity::{Character, CombatantId};
/// use riposte_core::pipeline::{AttackContext, CombatPipeline};
/// use riposte_core::registry::FormulaRegistry;
/// use riposte_core::simulation::DuelSimulation;
///
/// let pipeline = CombatPipeline::new(Arc::new(FormulaRegistry::new()));
/// let duel = DuelSimulation::new(
///     &pipeline,
///     Character::humanoid(CombatantId::new(1)),
///     Character::humanoid(CombatantId::new(2)),
///     AttackContext::unarmed(),
///     42,
/// );
/// let stats = duel.run(200);
/// assert_eq!(stats.trials, 200);
/// assert_eq!(stats, duel.run(200));
/// ```
#[derive(Debug)]
pub struct DuelSimulation<'a, A, T> {
    pipeline: &'a CombatPipeline,
    attacker: A,
    target: T,
    context: AttackContext,
    master_seed: u64,
}

impl<'a, A, T> DuelSimulation<'a, A, T>
where
    A: Combatant + Clone + Sync,
    T: Combatant + Clone + Sync,
{
    /// Creates a simulation.
    #[must_use]
    pub fn new(
        pipeline: &'a CombatPipeline,
        attacker: A,
        target: T,
        context: AttackContext,
        master_seed: u64,
    ) -> Self {
        Self {
            pipeline,
            attacker,
            target,
            context,
            master_seed,
        }
    }

    /// Seed of trial `trial`.
    #[must_use]
    pub fn trial_seed(&self, trial: u64) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.master_seed.hash(&mut hasher);
        trial.hash(&mut hasher);
        hasher.finish()
    }

    /// Resolves trial `trial` against fresh clones of both sides.
    #[must_use]
    pub fn run_trial(&self, trial: u64) -> AttackOutcome {
        let mut attacker = self.attacker.clone();
        let mut target = self.target.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(self.trial_seed(trial));
        self.pipeline
            .resolve_attack(Some(&mut attacker), Some(&mut target), &self.context, &mut rng)
    }

    /// Runs `trials` independent attacks in parallel.
    #[must_use]
    pub fn run(&self, trials: u64) -> DuelStats {
        (0..trials)
            .into_par_iter()
            .map(|trial| DuelStats::from(&self.run_trial(trial)))
            .reduce(DuelStats::default, DuelStats::merge)
    }
}
