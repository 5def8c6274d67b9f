#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the Bee Meadow simulation headless.
//!
//! The default mode drives one full Abundance -> Decline -> Recovery cycle
//! as fast as the machine allows, applying every Recovery intervention and
//! reporting metrics at each milestone. Realtime mode instead hosts the
//! world on the background scheduler and samples it against the wall clock.

mod runtime;

use std::thread;
use std::time::Duration;

use anyhow::{bail, Result};
use bee_meadow_core::{ChallengeOutcome, Command, Event, MetricsSnapshot, Phase};
use bee_meadow_rendering::{compose_scene, CanvasPresentation, Color};
use bee_meadow_system_diagnosis::Diagnosis;
use bee_meadow_world::{apply, query, World};
use clap::Parser;

use crate::runtime::Runtime;

/// Upper bound on ticks spent waiting for any single phase to complete.
const TICK_BUDGET: usize = 200_000;

#[derive(Debug, Parser)]
#[command(name = "bee-meadow", about = "Interactive bee ecosystem simulation")]
struct Args {
    /// Pace the world against the wall clock instead of running flat out.
    #[arg(long)]
    realtime: bool,
    /// Wall-clock seconds to observe the world in realtime mode.
    #[arg(long, default_value_t = 10.0)]
    seconds: f64,
    /// Speed multiplier applied in realtime mode (1, 2, or 3).
    #[arg(long, default_value_t = 1)]
    speed: u8,
}

/// Entry point for the Bee Meadow command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    if args.realtime {
        run_realtime(&args)
    } else {
        run_full_cycle()
    }
}

fn run_realtime(args: &Args) -> Result<()> {
    if !(1..=3).contains(&args.speed) {
        bail!("speed must be 1, 2, or 3 (received {})", args.speed);
    }
    if !(args.seconds > 0.0) {
        bail!("seconds must be positive (received {})", args.seconds);
    }

    let runtime = Runtime::spawn(World::new());
    for _ in 1..args.speed {
        runtime.submit(Command::CycleTimeSpeed)?;
    }

    thread::sleep(Duration::from_secs_f64(args.seconds));
    let view = runtime.snapshot();
    println!(
        "observed {:.2} simulated seconds at {}x speed",
        view.phase_elapsed,
        view.speed.factor()
    );
    report("realtime", &view.metrics);

    let canvas = CanvasPresentation::new(800.0, 600.0, Color::from_rgb_u8(0x1c, 0x2b, 0x1a))?;
    let scene = compose_scene(&view, canvas);
    println!(
        "scene: {} bees, {} flowers, {} particles",
        scene.bees.len(),
        scene.flowers.len(),
        scene.pollen.len() + scene.bursts.len()
    );

    let _ = runtime.stop()?;
    Ok(())
}

fn run_full_cycle() -> Result<()> {
    let mut world = World::new();

    run_until(&mut world, |event| {
        matches!(
            event,
            Event::PhaseCompleted {
                phase: Phase::Abundance
            }
        )
    })?;
    report("abundance complete", &query::metrics(&world));

    advance(&mut world);
    run_until(&mut world, |event| {
        matches!(
            event,
            Event::PhaseCompleted {
                phase: Phase::Decline
            }
        )
    })?;
    report("decline complete", &query::metrics(&world));

    advance(&mut world);
    intervene(&mut world)?;
    run_until(&mut world, |event| matches!(event, Event::BalanceRestored))?;
    report("balance restored", &query::metrics(&world));

    Ok(())
}

/// Applies every Recovery intervention: dismisses the pesticide clouds,
/// places all habitat blocks, plants flowers, and commits the challenges.
fn intervene(world: &mut World) -> Result<()> {
    let mut events = Vec::new();
    let view = query::snapshot(world);

    for cloud in &view.clouds {
        apply(
            world,
            Command::RemovePesticideCloud { cloud: cloud.id },
            &mut events,
        );
    }
    for block in &view.habitat_blocks {
        apply(
            world,
            Command::PlaceHabitatBlock { block: block.id },
            &mut events,
        );
    }
    for position in [
        bee_meadow_core::Position::new(0.3, 0.6),
        bee_meadow_core::Position::new(0.55, 0.4),
        bee_meadow_core::Position::new(0.7, 0.7),
    ] {
        apply(world, Command::PlantFlower { position }, &mut events);
    }

    let mut diagnosis = Diagnosis::new();
    let mut verdicts = Vec::new();
    for _ in 0..4 {
        events.clear();
        apply(
            world,
            Command::AdvanceChallenge {
                outcome: ChallengeOutcome::Favorable,
            },
            &mut events,
        );
        diagnosis.handle(&events, query::challenge_view(world), &mut verdicts);
    }
    match diagnosis.last_status() {
        Some(status) => println!("challenge verdict: {status:?}"),
        None => bail!("challenges were rejected outside Recovery"),
    }

    Ok(())
}

fn run_until<F>(world: &mut World, mut done: F) -> Result<()>
where
    F: FnMut(&Event) -> bool,
{
    let mut events = Vec::new();
    for _ in 0..TICK_BUDGET {
        events.clear();
        apply(world, Command::Tick, &mut events);
        if events.iter().any(&mut done) {
            return Ok(());
        }
    }
    bail!("phase failed to complete within {TICK_BUDGET} ticks")
}

fn advance(world: &mut World) {
    let mut events = Vec::new();
    apply(world, Command::AdvancePhase, &mut events);
    for event in &events {
        if let Event::PhaseChanged { phase } = event {
            println!("entered {phase:?}");
        }
    }
}

fn report(label: &str, metrics: &MetricsSnapshot) {
    println!(
        "{label}: bees {:.3} | flowers {:.3} | biodiversity {:.3} | pesticides {:.3}",
        metrics.bee_population,
        metrics.flower_health,
        metrics.biodiversity,
        metrics.pesticide_level
    );
}
