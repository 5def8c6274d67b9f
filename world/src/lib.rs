#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state for the Bee Meadow engine.
//!
//! All mutation flows through [`apply`]: adapters and systems submit
//! [`Command`] values, the world executes them against its private state, and
//! emits [`Event`] values describing what actually happened. Read access goes
//! through the [`query`] module, which hands out immutable snapshots built
//! from `bee-meadow-core` types.

use bee_meadow_core::{
    BeeId, BlockId, ChallengeView, CloudId, Command, Event, FlowerId, Phase, PlantedFlowerId,
    PollenId, Position, TimeSpeed, TICK_SECONDS,
};
use rand::Rng;

use crate::bees::Bee;
use crate::metrics::Metrics;
use crate::particles::{Burst, Cloud, Pollen};

mod bees;
mod metrics;
mod particles;
pub mod query;

pub(crate) const BEE_COUNT: usize = 20;
pub(crate) const FLOWER_COUNT: usize = 16;
pub(crate) const POLLEN_COUNT: usize = 32;
pub(crate) const CLOUD_COUNT: usize = 7;
pub(crate) const HABITAT_BLOCK_COUNT: usize = 5;

/// Simulated seconds after which Abundance has shown enough of the baseline.
const ABUNDANCE_DURATION_SECONDS: f64 = 20.0;
/// Bee population below which the Decline phase counts as complete.
const DECLINE_COMPLETION_THRESHOLD: f64 = 0.2;
/// Bee population at which Recovery declares ecological balance restored.
const BALANCE_RESTORED_THRESHOLD: f64 = 0.8;
/// Contamination relief granted per dismissed pesticide cloud.
const CLOUD_REMOVAL_RELIEF: f64 = 0.14;
/// Biodiversity gained per flower the user plants.
const PLANTING_DIVERSITY_GAIN: f64 = 0.06;
/// Terminal challenge ordinal; indices below it are hypothesis challenges.
const SYNTHESIS_INDEX: usize = 4;

const HABITAT_SEED_X: f64 = 0.88;
const HABITAT_SEED_BASE_Y: f64 = 0.18;
const HABITAT_SEED_SPACING: f64 = 0.13;

/// Stationary flower the meadow starts with.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Flower {
    pub(crate) id: FlowerId,
    pub(crate) position: Position,
    pub(crate) size: f64,
}

impl Flower {
    fn spawn(id: FlowerId, rng: &mut impl Rng) -> Self {
        Self {
            id,
            position: Position::new(rng.gen_range(0.05..=0.92), rng.gen_range(0.05..=0.88)),
            size: rng.gen_range(16.0..=28.0),
        }
    }
}

/// Flower the user planted during Recovery.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PlantedFlower {
    pub(crate) id: PlantedFlowerId,
    pub(crate) position: Position,
    pub(crate) size: f64,
}

impl PlantedFlower {
    fn spawn(id: PlantedFlowerId, position: Position, rng: &mut impl Rng) -> Self {
        Self {
            id,
            position,
            size: rng.gen_range(18.0..=26.0),
        }
    }
}

/// Draggable habitat block seeded in a column along the right edge.
#[derive(Clone, Copy, Debug)]
pub(crate) struct HabitatBlock {
    pub(crate) id: BlockId,
    pub(crate) position: Position,
    pub(crate) placed: bool,
}

impl HabitatBlock {
    fn seeded(id: BlockId, index: usize) -> Self {
        Self {
            id,
            position: Position::new(
                HABITAT_SEED_X,
                HABITAT_SEED_BASE_Y + HABITAT_SEED_SPACING * index as f64,
            ),
            placed: false,
        }
    }
}

/// Tally of the Recovery challenge sequence.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ChallengeRecord {
    pub(crate) current_index: usize,
    pub(crate) committed: usize,
    pub(crate) favorable: usize,
}

impl ChallengeRecord {
    fn record(&mut self, outcome: bee_meadow_core::ChallengeOutcome) {
        self.committed += 1;
        if outcome.is_favorable() {
            self.favorable += 1;
        }
        self.current_index = (self.current_index + 1).min(SYNTHESIS_INDEX);
    }

    pub(crate) const fn view(&self) -> ChallengeView {
        ChallengeView {
            current_index: self.current_index,
            committed: self.committed,
            favorable: self.favorable,
        }
    }
}

/// Authoritative simulation state; mutable only through [`apply`].
#[derive(Clone, Debug)]
pub struct World {
    pub(crate) metrics: Metrics,
    pub(crate) phase: Phase,
    pub(crate) phase_elapsed: f64,
    pub(crate) phase_completed: bool,
    pub(crate) balance_restored: bool,
    pub(crate) paused: bool,
    pub(crate) speed: TimeSpeed,
    pub(crate) hint_visible: bool,
    pub(crate) bees: Vec<Bee>,
    pub(crate) flowers: Vec<Flower>,
    pub(crate) pollen: Vec<Pollen>,
    pub(crate) bursts: Vec<Burst>,
    pub(crate) clouds: Vec<Cloud>,
    pub(crate) planted_flowers: Vec<PlantedFlower>,
    pub(crate) habitat_blocks: Vec<HabitatBlock>,
    pub(crate) placed_habitat_count: usize,
    pub(crate) challenges: ChallengeRecord,
    pub(crate) next_burst_id: u32,
    pub(crate) next_planted_id: u32,
}

impl World {
    /// Creates a fresh world resting at the Abundance baseline.
    #[must_use]
    pub fn new() -> Self {
        let mut world = Self {
            metrics: Metrics::baseline(),
            phase: Phase::Abundance,
            phase_elapsed: 0.0,
            phase_completed: false,
            balance_restored: false,
            paused: false,
            speed: TimeSpeed::Single,
            hint_visible: false,
            bees: Vec::new(),
            flowers: Vec::new(),
            pollen: Vec::new(),
            bursts: Vec::new(),
            clouds: Vec::new(),
            planted_flowers: Vec::new(),
            habitat_blocks: Vec::new(),
            placed_habitat_count: 0,
            challenges: ChallengeRecord::default(),
            next_burst_id: 0,
            next_planted_id: 0,
        };
        world.init_abundance();
        world
    }

    /// Restores the Abundance baseline: metrics reset, every entity
    /// population respawns, and all Recovery progress is discarded.
    fn init_abundance(&mut self) {
        let mut rng = rand::thread_rng();

        self.metrics = Metrics::baseline();
        self.phase = Phase::Abundance;
        self.phase_elapsed = 0.0;
        self.phase_completed = false;
        self.balance_restored = false;

        self.bees = (0..BEE_COUNT)
            .map(|index| Bee::spawn(BeeId::new(index as u32), &mut rng))
            .collect();
        self.flowers = (0..FLOWER_COUNT)
            .map(|index| Flower::spawn(FlowerId::new(index as u32), &mut rng))
            .collect();
        self.pollen = (0..POLLEN_COUNT)
            .map(|index| Pollen::spawn(PollenId::new(index as u32), &mut rng))
            .collect();
        self.bursts.clear();
        self.clouds.clear();
        self.planted_flowers.clear();
        self.habitat_blocks.clear();
        self.placed_habitat_count = 0;
        self.challenges = ChallengeRecord::default();

        self.rewire_bee_targets();
    }

    /// Enters Recovery: pesticide clouds and habitat blocks appear, challenge
    /// progress resets, and bees retarget over the surviving flower pool.
    fn init_recovery(&mut self) {
        let mut rng = rand::thread_rng();

        self.phase = Phase::Recovery;
        self.phase_elapsed = 0.0;
        self.phase_completed = false;
        self.balance_restored = false;

        self.clouds = (0..CLOUD_COUNT)
            .map(|index| Cloud::spawn(CloudId::new(index as u32), &mut rng))
            .collect();
        self.habitat_blocks = (0..HABITAT_BLOCK_COUNT)
            .map(|index| HabitatBlock::seeded(BlockId::new(index as u32), index))
            .collect();
        self.planted_flowers.clear();
        self.placed_habitat_count = 0;
        self.challenges = ChallengeRecord::default();

        self.rewire_bee_targets();
    }

    fn tick_abundance(&mut self, out_events: &mut Vec<Event>) {
        self.advance_bees();
        self.drift_pollen();
        self.decay_bursts();

        if !self.phase_completed && self.phase_elapsed >= ABUNDANCE_DURATION_SECONDS {
            self.phase_completed = true;
            out_events.push(Event::PhaseCompleted {
                phase: Phase::Abundance,
            });
        }
    }

    fn tick_decline(&mut self, out_events: &mut Vec<Event>) {
        metrics::decline_step(&mut self.metrics);
        self.advance_bees();
        self.drift_pollen();
        self.decay_bursts();

        if !self.phase_completed && self.metrics.bee_population < DECLINE_COMPLETION_THRESHOLD {
            self.phase_completed = true;
            out_events.push(Event::PhaseCompleted {
                phase: Phase::Decline,
            });
        }
    }

    fn tick_recovery(&mut self, out_events: &mut Vec<Event>) {
        metrics::recovery_step(&mut self.metrics, self.placed_habitat_count);
        self.advance_bees();
        // Ambient pollen stays static during Recovery.
        self.drift_clouds();
        self.decay_bursts();

        if !self.balance_restored && self.metrics.bee_population >= BALANCE_RESTORED_THRESHOLD {
            self.balance_restored = true;
            self.phase_completed = true;
            out_events.push(Event::BalanceRestored);
            out_events.push(Event::PhaseCompleted {
                phase: Phase::Recovery,
            });
        }
    }

    /// Forces the world into the Recovery phase through the public command
    /// path, so tests can exercise Recovery-only behavior.
    #[cfg(test)]
    pub(crate) fn enter_recovery_for_tests(&mut self) {
        let mut events = Vec::new();
        apply(self, Command::AdvancePhase, &mut events);
        apply(self, Command::AdvancePhase, &mut events);
        assert_eq!(self.phase, Phase::Recovery);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Executes a command against the world and pushes the resulting events.
///
/// Commands referencing unknown identifiers, and commands issued outside the
/// phase they belong to, are complete no-ops: no state changes and no events.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            if world.paused {
                return;
            }
            world.phase_elapsed += TICK_SECONDS;
            out_events.push(Event::TimeAdvanced);
            match world.phase {
                Phase::Abundance => world.tick_abundance(out_events),
                Phase::Decline => world.tick_decline(out_events),
                Phase::Recovery => world.tick_recovery(out_events),
            }
        }
        Command::TogglePause => {
            world.paused = !world.paused;
            out_events.push(Event::PauseToggled {
                paused: world.paused,
            });
        }
        Command::CycleTimeSpeed => {
            world.speed = world.speed.cycled();
            out_events.push(Event::TimeSpeedChanged { speed: world.speed });
        }
        Command::ToggleHint => {
            world.hint_visible = !world.hint_visible;
            out_events.push(Event::HintToggled {
                visible: world.hint_visible,
            });
        }
        Command::RemovePesticideCloud { cloud } => {
            let Some(index) = world.clouds.iter().position(|candidate| candidate.id == cloud)
            else {
                return;
            };
            let _ = world.clouds.remove(index);
            world.metrics.pesticide_level =
                (world.metrics.pesticide_level - CLOUD_REMOVAL_RELIEF).max(0.0);
            out_events.push(Event::PesticideCloudRemoved { cloud });
        }
        Command::PlantFlower { position } => {
            if world.phase != Phase::Recovery {
                return;
            }
            let position = position.clamped_to_canvas();
            let id = PlantedFlowerId::new(world.next_planted_id);
            world.next_planted_id = world.next_planted_id.wrapping_add(1);
            world
                .planted_flowers
                .push(PlantedFlower::spawn(id, position, &mut rand::thread_rng()));
            world.metrics.biodiversity =
                (world.metrics.biodiversity + PLANTING_DIVERSITY_GAIN).min(1.0);
            out_events.push(Event::FlowerPlanted {
                flower: id,
                position,
            });
        }
        Command::PlaceHabitatBlock { block } => {
            let newly_placed = world
                .habitat_blocks
                .iter_mut()
                .find(|candidate| candidate.id == block)
                .map(|candidate| {
                    if candidate.placed {
                        false
                    } else {
                        candidate.placed = true;
                        true
                    }
                });
            if newly_placed != Some(true) {
                return;
            }
            world.placed_habitat_count = world
                .habitat_blocks
                .iter()
                .filter(|candidate| candidate.placed)
                .count();
            out_events.push(Event::HabitatBlockPlaced {
                block,
                placed_count: world.placed_habitat_count,
            });
        }
        Command::AdvanceChallenge { outcome } => {
            if world.phase != Phase::Recovery {
                return;
            }
            if world.challenges.current_index >= SYNTHESIS_INDEX {
                return;
            }
            world.challenges.record(outcome);
            out_events.push(Event::ChallengeAdvanced {
                index: world.challenges.current_index,
                outcome,
            });
        }
        Command::AdvancePhase => {
            world.hint_visible = false;
            match world.phase {
                Phase::Abundance => {
                    world.phase = Phase::Decline;
                    world.phase_elapsed = 0.0;
                    world.phase_completed = false;
                }
                Phase::Decline => world.init_recovery(),
                Phase::Recovery => world.init_abundance(),
            }
            out_events.push(Event::PhaseChanged { phase: world.phase });
        }
        Command::RewindPhase => {
            if world.phase == Phase::Abundance {
                return;
            }
            world.hint_visible = false;
            world.phase = match world.phase {
                Phase::Abundance | Phase::Decline => Phase::Abundance,
                Phase::Recovery => Phase::Decline,
            };
            world.phase_elapsed = 0.0;
            world.phase_completed = false;
            world.balance_restored = false;
            out_events.push(Event::PhaseChanged { phase: world.phase });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bee_meadow_core::ChallengeOutcome;

    fn drain(world: &mut World, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, command, &mut events);
        events
    }

    #[test]
    fn ticks_are_no_ops_while_paused() {
        let mut world = World::new();
        let _ = drain(&mut world, Command::TogglePause);
        let before = world.phase_elapsed;

        let events = drain(&mut world, Command::Tick);

        assert!(events.is_empty());
        assert_eq!(world.phase_elapsed, before);
    }

    #[test]
    fn decline_completion_latches_and_fires_once() {
        let mut world = World::new();
        let _ = drain(&mut world, Command::AdvancePhase);
        world.metrics.bee_population = DECLINE_COMPLETION_THRESHOLD - 0.01;

        let first = drain(&mut world, Command::Tick);
        assert!(first.contains(&Event::PhaseCompleted {
            phase: Phase::Decline
        }));

        // Forcing the population back up must not rearm the latch.
        world.metrics.bee_population = 0.9;
        let second = drain(&mut world, Command::Tick);
        assert!(world.phase_completed);
        assert!(!second
            .iter()
            .any(|event| matches!(event, Event::PhaseCompleted { .. })));
    }

    #[test]
    fn recovery_balance_latch_emits_both_events_once() {
        let mut world = World::new();
        world.enter_recovery_for_tests();
        world.metrics.bee_population = BALANCE_RESTORED_THRESHOLD + 0.05;

        let first = drain(&mut world, Command::Tick);
        assert!(first.contains(&Event::BalanceRestored));
        assert!(first.contains(&Event::PhaseCompleted {
            phase: Phase::Recovery
        }));
        assert!(world.balance_restored);

        let second = drain(&mut world, Command::Tick);
        assert!(!second.contains(&Event::BalanceRestored));
    }

    #[test]
    fn abundance_completes_only_after_its_full_duration() {
        let mut world = World::new();
        world.phase_elapsed = ABUNDANCE_DURATION_SECONDS - TICK_SECONDS * 1.5;

        let early = drain(&mut world, Command::Tick);
        assert!(!early
            .iter()
            .any(|event| matches!(event, Event::PhaseCompleted { .. })));

        let late = drain(&mut world, Command::Tick);
        assert!(late.contains(&Event::PhaseCompleted {
            phase: Phase::Abundance
        }));
    }

    #[test]
    fn removing_a_known_cloud_relieves_contamination() {
        let mut world = World::new();
        world.enter_recovery_for_tests();
        world.metrics.pesticide_level = 0.5;
        let target = world.clouds[0].id;
        let count_before = world.clouds.len();

        let events = drain(&mut world, Command::RemovePesticideCloud { cloud: target });

        assert_eq!(events, vec![Event::PesticideCloudRemoved { cloud: target }]);
        assert_eq!(world.clouds.len(), count_before - 1);
        assert!((world.metrics.pesticide_level - (0.5 - CLOUD_REMOVAL_RELIEF)).abs() < 1e-12);
    }

    #[test]
    fn removing_an_unknown_cloud_is_a_complete_no_op() {
        let mut world = World::new();
        world.enter_recovery_for_tests();
        world.metrics.pesticide_level = 0.5;
        let count_before = world.clouds.len();

        let events = drain(
            &mut world,
            Command::RemovePesticideCloud {
                cloud: CloudId::new(999),
            },
        );

        assert!(events.is_empty());
        assert_eq!(world.clouds.len(), count_before);
        assert!((world.metrics.pesticide_level - 0.5).abs() < 1e-12);
    }

    #[test]
    fn cloud_relief_never_drives_pesticide_negative() {
        let mut world = World::new();
        world.enter_recovery_for_tests();
        world.metrics.pesticide_level = 0.05;
        let target = world.clouds[0].id;

        let _ = drain(&mut world, Command::RemovePesticideCloud { cloud: target });

        assert_eq!(world.metrics.pesticide_level, 0.0);
    }

    #[test]
    fn planting_is_rejected_outside_recovery() {
        let mut world = World::new();

        let events = drain(
            &mut world,
            Command::PlantFlower {
                position: Position::new(0.5, 0.5),
            },
        );

        assert!(events.is_empty());
        assert!(world.planted_flowers.is_empty());
    }

    #[test]
    fn planting_clamps_positions_and_raises_biodiversity() {
        let mut world = World::new();
        world.enter_recovery_for_tests();
        world.metrics.biodiversity = 0.5;

        let events = drain(
            &mut world,
            Command::PlantFlower {
                position: Position::new(1.4, -0.2),
            },
        );

        assert_eq!(world.planted_flowers.len(), 1);
        let planted = world.planted_flowers[0];
        assert_eq!(planted.position, Position::new(1.0, 0.0));
        assert!((world.metrics.biodiversity - 0.56).abs() < 1e-12);
        assert!(matches!(events[0], Event::FlowerPlanted { .. }));
    }

    #[test]
    fn planted_flower_ids_are_unique_across_commands() {
        let mut world = World::new();
        world.enter_recovery_for_tests();

        for _ in 0..3 {
            let _ = drain(
                &mut world,
                Command::PlantFlower {
                    position: Position::new(0.5, 0.5),
                },
            );
        }

        assert_eq!(world.planted_flowers[0].id, PlantedFlowerId::new(0));
        assert_eq!(world.planted_flowers[1].id, PlantedFlowerId::new(1));
        assert_eq!(world.planted_flowers[2].id, PlantedFlowerId::new(2));
    }

    #[test]
    fn placing_the_same_block_twice_counts_once() {
        let mut world = World::new();
        world.enter_recovery_for_tests();
        let block = world.habitat_blocks[0].id;

        let first = drain(&mut world, Command::PlaceHabitatBlock { block });
        let second = drain(&mut world, Command::PlaceHabitatBlock { block });

        assert_eq!(
            first,
            vec![Event::HabitatBlockPlaced {
                block,
                placed_count: 1
            }]
        );
        assert!(second.is_empty());
        assert_eq!(world.placed_habitat_count, 1);
    }

    #[test]
    fn challenges_advance_to_synthesis_and_stop() {
        let mut world = World::new();
        world.enter_recovery_for_tests();

        for expected_index in 1..=SYNTHESIS_INDEX {
            let events = drain(
                &mut world,
                Command::AdvanceChallenge {
                    outcome: ChallengeOutcome::Favorable,
                },
            );
            assert_eq!(
                events,
                vec![Event::ChallengeAdvanced {
                    index: expected_index,
                    outcome: ChallengeOutcome::Favorable,
                }]
            );
        }

        // The synthesis step is terminal.
        let extra = drain(
            &mut world,
            Command::AdvanceChallenge {
                outcome: ChallengeOutcome::Detrimental,
            },
        );
        assert!(extra.is_empty());
        assert_eq!(world.challenges.committed, SYNTHESIS_INDEX);
        assert_eq!(world.challenges.favorable, SYNTHESIS_INDEX);
    }

    #[test]
    fn advancing_from_recovery_restarts_the_full_cycle() {
        let mut world = World::new();
        world.enter_recovery_for_tests();
        world.metrics.bee_population = 0.1;
        let _ = drain(
            &mut world,
            Command::PlantFlower {
                position: Position::new(0.5, 0.5),
            },
        );

        let events = drain(&mut world, Command::AdvancePhase);

        assert_eq!(
            events,
            vec![Event::PhaseChanged {
                phase: Phase::Abundance
            }]
        );
        assert_eq!(world.metrics.snapshot(), Metrics::baseline().snapshot());
        assert!(world.planted_flowers.is_empty());
        assert!(world.clouds.is_empty());
        assert_eq!(world.bees.len(), BEE_COUNT);
        assert_eq!(world.flowers.len(), FLOWER_COUNT);
        assert_eq!(world.pollen.len(), POLLEN_COUNT);
    }

    #[test]
    fn rewinding_in_abundance_is_rejected() {
        let mut world = World::new();
        world.phase_elapsed = 5.0;

        let events = drain(&mut world, Command::RewindPhase);

        assert!(events.is_empty());
        assert_eq!(world.phase, Phase::Abundance);
        assert_eq!(world.phase_elapsed, 5.0);
    }

    #[test]
    fn rewinding_from_decline_keeps_damaged_metrics() {
        let mut world = World::new();
        let _ = drain(&mut world, Command::AdvancePhase);
        world.metrics.bee_population = 0.4;
        world.metrics.pesticide_level = 0.6;

        let events = drain(&mut world, Command::RewindPhase);

        assert_eq!(
            events,
            vec![Event::PhaseChanged {
                phase: Phase::Abundance
            }]
        );
        assert_eq!(world.phase_elapsed, 0.0);
        assert!((world.metrics.bee_population - 0.4).abs() < 1e-12);
        assert!((world.metrics.pesticide_level - 0.6).abs() < 1e-12);
    }

    #[test]
    fn phase_transitions_clear_the_hint_flag() {
        let mut world = World::new();
        let _ = drain(&mut world, Command::ToggleHint);
        assert!(world.hint_visible);

        let _ = drain(&mut world, Command::AdvancePhase);

        assert!(!world.hint_visible);
    }

    #[test]
    fn entering_recovery_seeds_clouds_and_blocks() {
        let mut world = World::new();
        world.enter_recovery_for_tests();

        assert_eq!(world.clouds.len(), CLOUD_COUNT);
        assert_eq!(world.habitat_blocks.len(), HABITAT_BLOCK_COUNT);
        assert!(world.habitat_blocks.iter().all(|block| !block.placed));
        assert_eq!(world.placed_habitat_count, 0);
        assert_eq!(world.challenges.committed, 0);
    }
}
