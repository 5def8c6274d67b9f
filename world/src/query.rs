//! Read-only access to the world, expressed in `bee-meadow-core` types.

use bee_meadow_core::{
    BeeSnapshot, BurstSnapshot, ChallengeView, CloudSnapshot, FlowerSnapshot,
    HabitatBlockSnapshot, MetricsSnapshot, Phase, PlantedFlowerSnapshot, PollenSnapshot,
    TimeSpeed, WorldSnapshot,
};

use crate::World;

/// Captures a complete immutable snapshot of the current world state.
#[must_use]
pub fn snapshot(world: &World) -> WorldSnapshot {
    WorldSnapshot {
        metrics: metrics(world),
        phase: phase(world),
        phase_elapsed: world.phase_elapsed,
        phase_completed: world.phase_completed,
        balance_restored: world.balance_restored,
        bees: world
            .bees
            .iter()
            .map(|bee| BeeSnapshot {
                id: bee.id,
                position: bee.position,
                velocity: bee.velocity,
                size: bee.size,
                target: bee.target,
                activity: bee.activity,
            })
            .collect(),
        flowers: world
            .flowers
            .iter()
            .map(|flower| FlowerSnapshot {
                id: flower.id,
                position: flower.position,
                size: flower.size,
            })
            .collect(),
        pollen: world
            .pollen
            .iter()
            .map(|pollen| PollenSnapshot {
                id: pollen.id,
                position: pollen.position,
                velocity: pollen.velocity,
                opacity: pollen.opacity,
                size: pollen.size,
            })
            .collect(),
        bursts: world
            .bursts
            .iter()
            .map(|burst| BurstSnapshot {
                id: burst.id,
                position: burst.position,
                life: burst.life,
                size: burst.size,
                opacity: burst.opacity,
            })
            .collect(),
        clouds: world
            .clouds
            .iter()
            .map(|cloud| CloudSnapshot {
                id: cloud.id,
                position: cloud.position,
                width: cloud.width,
                height: cloud.height,
            })
            .collect(),
        planted_flowers: world
            .planted_flowers
            .iter()
            .map(|planted| PlantedFlowerSnapshot {
                id: planted.id,
                position: planted.position,
                size: planted.size,
            })
            .collect(),
        habitat_blocks: world
            .habitat_blocks
            .iter()
            .map(|block| HabitatBlockSnapshot {
                id: block.id,
                position: block.position,
                placed: block.placed,
            })
            .collect(),
        placed_habitat_count: world.placed_habitat_count,
        challenges: challenge_view(world),
        paused: world.paused,
        speed: world.speed,
        hint_visible: world.hint_visible,
    }
}

/// Current values of the four ecosystem metrics.
#[must_use]
pub fn metrics(world: &World) -> MetricsSnapshot {
    world.metrics.snapshot()
}

/// Phase the simulation currently runs under.
#[must_use]
pub fn phase(world: &World) -> Phase {
    world.phase
}

/// Simulated seconds elapsed since the current phase was entered.
#[must_use]
pub fn phase_elapsed(world: &World) -> f64 {
    world.phase_elapsed
}

/// Latched completion flag for the active phase.
#[must_use]
pub fn phase_completed(world: &World) -> bool {
    world.phase_completed
}

/// Latched Recovery flag set once the bee population recovers.
#[must_use]
pub fn balance_restored(world: &World) -> bool {
    world.balance_restored
}

/// Number of habitat blocks the user has placed.
#[must_use]
pub fn placed_habitat_count(world: &World) -> usize {
    world.placed_habitat_count
}

/// Progress through the Recovery challenge sequence.
#[must_use]
pub fn challenge_view(world: &World) -> ChallengeView {
    world.challenges.view()
}

/// Indicates whether ticks are currently suspended.
#[must_use]
pub fn is_paused(world: &World) -> bool {
    world.paused
}

/// Speed multiplier the scheduler should honor.
#[must_use]
pub fn time_speed(world: &World) -> TimeSpeed {
    world.speed
}

/// Display-only hint flag toggled by the user.
#[must_use]
pub fn hint_visible(world: &World) -> bool {
    world.hint_visible
}
