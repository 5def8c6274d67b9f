//! Coupled update laws for the four ecosystem metrics.
//!
//! Every update site clamps to [0,1] explicitly; callers never observe an
//! out-of-range metric regardless of command ordering.

use bee_meadow_core::{MetricsSnapshot, TICK_SECONDS};

const PESTICIDE_RISE_PER_SECOND: f64 = 0.018;
const PESTICIDE_DAMAGE_FACTOR: f64 = 0.016;
const FLOWER_DECAY_FACTOR: f64 = 0.022;
const FLOWER_DECAY_THRESHOLD: f64 = 0.3;
const BIODIVERSITY_LOSS_PER_SECOND: f64 = 0.008;
const RECOVERY_FACTOR: f64 = 0.009;
const DECAY_FACTOR: f64 = 0.012;
const FLOWER_REGROWTH_FACTOR: f64 = 0.006;
const FLOWER_REGROWTH_THRESHOLD: f64 = 0.25;
const HABITAT_BONUS_MULTIPLIER: f64 = 1.7;
const HABITAT_BONUS_THRESHOLD: usize = 3;

/// Process-wide scalar state of the ecosystem, each value held in [0,1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Metrics {
    pub(crate) bee_population: f64,
    pub(crate) flower_health: f64,
    pub(crate) biodiversity: f64,
    pub(crate) pesticide_level: f64,
}

impl Metrics {
    /// Population baseline the simulation (re)starts from.
    pub(crate) const fn baseline() -> Self {
        Self {
            bee_population: 1.0,
            flower_health: 1.0,
            biodiversity: 1.0,
            pesticide_level: 0.0,
        }
    }

    pub(crate) const fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            bee_population: self.bee_population,
            flower_health: self.flower_health,
            biodiversity: self.biodiversity,
            pesticide_level: self.pesticide_level,
        }
    }
}

/// Applies one Decline tick: pesticides rise, bees fall, and once the bee
/// population drops below the pollination threshold the flowers cascade.
pub(crate) fn decline_step(metrics: &mut Metrics) {
    metrics.pesticide_level =
        (metrics.pesticide_level + TICK_SECONDS * PESTICIDE_RISE_PER_SECOND).min(1.0);

    let pesticide_damage = metrics.pesticide_level * PESTICIDE_DAMAGE_FACTOR;
    metrics.bee_population = (metrics.bee_population - pesticide_damage * TICK_SECONDS).max(0.0);

    if metrics.bee_population < FLOWER_DECAY_THRESHOLD {
        let flower_decay =
            (FLOWER_DECAY_THRESHOLD - metrics.bee_population) * FLOWER_DECAY_FACTOR;
        metrics.flower_health = (metrics.flower_health - flower_decay * TICK_SECONDS).max(0.0);
    }

    metrics.biodiversity =
        (metrics.biodiversity - TICK_SECONDS * BIODIVERSITY_LOSS_PER_SECOND).max(0.0);
}

/// Applies one Recovery tick: the bee population follows the net of the
/// habitat-boosted recovery rate against pesticide decay, and flowers regrow
/// once enough bees are back.
pub(crate) fn recovery_step(metrics: &mut Metrics, placed_habitat_count: usize) {
    let net_rate = recovery_rate(metrics, placed_habitat_count) - decay_rate(metrics);
    metrics.bee_population = (metrics.bee_population + net_rate * TICK_SECONDS).clamp(0.0, 1.0);

    if metrics.bee_population > FLOWER_REGROWTH_THRESHOLD {
        metrics.flower_health = (metrics.flower_health
            + TICK_SECONDS * FLOWER_REGROWTH_FACTOR * metrics.bee_population)
            .min(1.0);
    }
}

/// Rate at which bees return, scaled by clean air, biodiversity, and habitat.
pub(crate) fn recovery_rate(metrics: &Metrics, placed_habitat_count: usize) -> f64 {
    (1.0 - metrics.pesticide_level)
        * metrics.biodiversity
        * habitat_bonus(placed_habitat_count)
        * RECOVERY_FACTOR
}

fn decay_rate(metrics: &Metrics) -> f64 {
    metrics.pesticide_level * DECAY_FACTOR
}

/// Multiplier unlocked once enough habitat blocks are placed.
pub(crate) fn habitat_bonus(placed_habitat_count: usize) -> f64 {
    if placed_habitat_count >= HABITAT_BONUS_THRESHOLD {
        HABITAT_BONUS_MULTIPLIER
    } else {
        1.0
    }
}
