//! End-to-end scenarios driven exclusively through the public command surface.

use bee_meadow_core::{BlockId, ChallengeOutcome, Command, Event, Phase, Position, TimeSpeed};
use bee_meadow_world::{apply, query, World};

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    apply(world, command, &mut events);
    events
}

fn tick_times(world: &mut World, count: usize) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..count {
        apply(world, Command::Tick, &mut events);
    }
    events
}

/// Drives the world into Recovery through the regular phase progression.
fn enter_recovery(world: &mut World) {
    let _ = run(world, Command::AdvancePhase);
    let _ = run(world, Command::AdvancePhase);
    assert_eq!(query::phase(world), Phase::Recovery);
}

#[test]
fn advancing_three_times_closes_the_phase_cycle() {
    let mut world = World::new();

    let first = run(&mut world, Command::AdvancePhase);
    assert_eq!(
        first,
        vec![Event::PhaseChanged {
            phase: Phase::Decline
        }]
    );

    let second = run(&mut world, Command::AdvancePhase);
    assert_eq!(
        second,
        vec![Event::PhaseChanged {
            phase: Phase::Recovery
        }]
    );

    let third = run(&mut world, Command::AdvancePhase);
    assert_eq!(
        third,
        vec![Event::PhaseChanged {
            phase: Phase::Abundance
        }]
    );

    let view = query::snapshot(&world);
    assert_eq!(view.bees.len(), 20);
    assert_eq!(view.flowers.len(), 16);
    assert_eq!(view.pollen.len(), 32);
    assert!(view.clouds.is_empty());
    assert!(view.planted_flowers.is_empty());
    assert_eq!(view.metrics.bee_population, 1.0);
    assert_eq!(view.metrics.flower_health, 1.0);
    assert_eq!(view.metrics.biodiversity, 1.0);
    assert_eq!(view.metrics.pesticide_level, 0.0);
}

#[test]
fn paused_worlds_ignore_ticks_entirely() {
    let mut world = World::new();
    let toggled = run(&mut world, Command::TogglePause);
    assert_eq!(toggled, vec![Event::PauseToggled { paused: true }]);

    let before = query::snapshot(&world);
    let events = tick_times(&mut world, 50);
    let after = query::snapshot(&world);

    assert!(events.is_empty());
    assert_eq!(before, after);

    let resumed = run(&mut world, Command::TogglePause);
    assert_eq!(resumed, vec![Event::PauseToggled { paused: false }]);
    let running = tick_times(&mut world, 1);
    assert!(running.contains(&Event::TimeAdvanced));
}

#[test]
fn abundance_completes_near_the_twenty_second_mark() {
    let mut world = World::new();

    // 395 ticks put the clock just short of the phase duration.
    let early = tick_times(&mut world, 395);
    assert!(!early
        .iter()
        .any(|event| matches!(event, Event::PhaseCompleted { .. })));
    assert!(!query::phase_completed(&world));

    let late = tick_times(&mut world, 10);
    assert!(late.contains(&Event::PhaseCompleted {
        phase: Phase::Abundance
    }));
    assert!(query::phase_completed(&world));
    assert_eq!(query::phase(&world), Phase::Abundance);
}

#[test]
fn decline_erodes_every_metric_it_touches() {
    let mut world = World::new();
    let _ = run(&mut world, Command::AdvancePhase);

    let _ = tick_times(&mut world, 200);
    let metrics = query::metrics(&world);

    assert!(metrics.bee_population < 1.0);
    assert!(metrics.pesticide_level > 0.0);
    assert!(metrics.biodiversity < 1.0);
    for value in [
        metrics.bee_population,
        metrics.flower_health,
        metrics.biodiversity,
        metrics.pesticide_level,
    ] {
        assert!((0.0..=1.0).contains(&value));
    }
}

#[test]
fn speed_cycles_through_all_multipliers_and_wraps() {
    let mut world = World::new();

    let first = run(&mut world, Command::CycleTimeSpeed);
    assert_eq!(
        first,
        vec![Event::TimeSpeedChanged {
            speed: TimeSpeed::Double
        }]
    );
    let _ = run(&mut world, Command::CycleTimeSpeed);
    assert_eq!(query::time_speed(&world), TimeSpeed::Triple);
    let _ = run(&mut world, Command::CycleTimeSpeed);
    assert_eq!(query::time_speed(&world), TimeSpeed::Single);
}

#[test]
fn recovery_interactions_only_work_during_recovery() {
    let mut world = World::new();

    assert!(run(
        &mut world,
        Command::PlantFlower {
            position: Position::new(0.4, 0.4),
        },
    )
    .is_empty());
    assert!(run(
        &mut world,
        Command::AdvanceChallenge {
            outcome: ChallengeOutcome::Favorable,
        },
    )
    .is_empty());
    assert!(run(
        &mut world,
        Command::PlaceHabitatBlock {
            block: BlockId::new(0),
        },
    )
    .is_empty());

    let view = query::snapshot(&world);
    assert!(view.planted_flowers.is_empty());
    assert_eq!(view.challenges.committed, 0);
    assert_eq!(view.placed_habitat_count, 0);
}

#[test]
fn habitat_blocks_accumulate_through_distinct_placements() {
    let mut world = World::new();
    enter_recovery(&mut world);

    let blocks: Vec<BlockId> = query::snapshot(&world)
        .habitat_blocks
        .iter()
        .map(|block| block.id)
        .collect();
    assert_eq!(blocks.len(), 5);

    for (placed_so_far, block) in blocks.iter().enumerate() {
        let events = run(&mut world, Command::PlaceHabitatBlock { block: *block });
        assert_eq!(
            events,
            vec![Event::HabitatBlockPlaced {
                block: *block,
                placed_count: placed_so_far + 1,
            }]
        );
    }
    assert_eq!(query::placed_habitat_count(&world), 5);

    // Unknown block ids change nothing.
    assert!(run(
        &mut world,
        Command::PlaceHabitatBlock {
            block: BlockId::new(42),
        },
    )
    .is_empty());
    assert_eq!(query::placed_habitat_count(&world), 5);
}

/// Runs two worlds through an identical Decline, then compares Recovery with
/// and without the habitat bonus unlocked. The metric laws are deterministic,
/// so the only difference between the runs is the number of placed blocks.
#[test]
fn three_placed_blocks_speed_up_the_bee_recovery() {
    let mut boosted = World::new();
    let mut plain = World::new();

    for world in [&mut boosted, &mut plain] {
        let _ = run(world, Command::AdvancePhase);
        let _ = tick_times(world, 1_200);
        let _ = run(world, Command::AdvancePhase);
        // Dismiss every cloud so contamination stops masking the bonus.
        let clouds: Vec<_> = query::snapshot(world)
            .clouds
            .iter()
            .map(|cloud| cloud.id)
            .collect();
        for cloud in clouds {
            let _ = run(world, Command::RemovePesticideCloud { cloud });
        }
    }
    assert_eq!(query::metrics(&boosted), query::metrics(&plain));

    let blocks: Vec<BlockId> = query::snapshot(&boosted)
        .habitat_blocks
        .iter()
        .map(|block| block.id)
        .collect();
    for block in &blocks[..3] {
        let _ = run(&mut boosted, Command::PlaceHabitatBlock { block: *block });
    }
    for block in &blocks[..2] {
        let _ = run(&mut plain, Command::PlaceHabitatBlock { block: *block });
    }

    let _ = tick_times(&mut boosted, 200);
    let _ = tick_times(&mut plain, 200);

    let boosted_bees = query::metrics(&boosted).bee_population;
    let plain_bees = query::metrics(&plain).bee_population;
    assert!(
        boosted_bees > plain_bees,
        "expected {boosted_bees} > {plain_bees}"
    );
}

#[test]
fn sustained_recovery_eventually_restores_balance() {
    let mut world = World::new();
    let _ = run(&mut world, Command::AdvancePhase);
    let _ = tick_times(&mut world, 1_200);
    let _ = run(&mut world, Command::AdvancePhase);

    let clouds: Vec<_> = query::snapshot(&world)
        .clouds
        .iter()
        .map(|cloud| cloud.id)
        .collect();
    for cloud in clouds {
        let _ = run(&mut world, Command::RemovePesticideCloud { cloud });
    }
    let blocks: Vec<BlockId> = query::snapshot(&world)
        .habitat_blocks
        .iter()
        .map(|block| block.id)
        .collect();
    for block in blocks {
        let _ = run(&mut world, Command::PlaceHabitatBlock { block });
    }

    let mut restored = false;
    for _ in 0..12_000 {
        let events = run(&mut world, Command::Tick);
        if events.contains(&Event::BalanceRestored) {
            restored = true;
            break;
        }
    }

    assert!(restored, "balance never restored within the tick budget");
    assert!(query::balance_restored(&world));
    assert!(query::phase_completed(&world));
    assert!(query::metrics(&world).bee_population >= 0.8);
}

#[test]
fn challenge_progress_surfaces_through_the_snapshot() {
    let mut world = World::new();
    enter_recovery(&mut world);

    let _ = run(
        &mut world,
        Command::AdvanceChallenge {
            outcome: ChallengeOutcome::Favorable,
        },
    );
    let _ = run(
        &mut world,
        Command::AdvanceChallenge {
            outcome: ChallengeOutcome::Detrimental,
        },
    );

    let challenges = query::challenge_view(&world);
    assert_eq!(challenges.current_index, 2);
    assert_eq!(challenges.committed, 2);
    assert_eq!(challenges.favorable, 1);
}

#[test]
fn rewinding_from_recovery_returns_to_decline() {
    let mut world = World::new();
    enter_recovery(&mut world);
    let _ = tick_times(&mut world, 10);

    let events = run(&mut world, Command::RewindPhase);

    assert_eq!(
        events,
        vec![Event::PhaseChanged {
            phase: Phase::Decline
        }]
    );
    assert_eq!(query::phase(&world), Phase::Decline);
    assert_eq!(query::phase_elapsed(&world), 0.0);
}

#[test]
fn hint_toggle_round_trips_and_clears_on_transition() {
    let mut world = World::new();

    let shown = run(&mut world, Command::ToggleHint);
    assert_eq!(shown, vec![Event::HintToggled { visible: true }]);
    assert!(query::hint_visible(&world));

    let _ = run(&mut world, Command::AdvancePhase);
    assert!(!query::hint_visible(&world));
}
