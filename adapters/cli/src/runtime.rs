//! Background scheduler that owns the world and paces it in wall-clock time.
//!
//! The runtime thread is the only owner of the [`World`]; collaborators
//! submit commands over a channel and observe state through the snapshot the
//! thread republishes after every batch. Stopping the runtime joins the
//! thread and hands the world back.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use bee_meadow_core::{Command, Event, WorldSnapshot};
use bee_meadow_system_cadence::{Cadence, Config};
use bee_meadow_world::{apply, query, World};

/// Sleep granularity of the scheduler loop between firings.
const LOOP_REST: Duration = Duration::from_millis(5);

/// Handle to the background scheduler thread.
pub(crate) struct Runtime {
    commands: Sender<Command>,
    snapshot: Arc<Mutex<WorldSnapshot>>,
    stop: Arc<AtomicBool>,
    handle: JoinHandle<World>,
}

impl Runtime {
    /// Moves the world onto a scheduler thread and starts ticking it.
    pub(crate) fn spawn(world: World) -> Self {
        let (commands, inbox) = mpsc::channel();
        let snapshot = Arc::new(Mutex::new(query::snapshot(&world)));
        let stop = Arc::new(AtomicBool::new(false));

        let published = Arc::clone(&snapshot);
        let stop_flag = Arc::clone(&stop);
        let handle = thread::spawn(move || drive(world, inbox, published, stop_flag));

        Self {
            commands,
            snapshot,
            stop,
            handle,
        }
    }

    /// Queues a command for the scheduler's next iteration.
    pub(crate) fn submit(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| anyhow!("runtime thread is no longer accepting commands"))
    }

    /// Most recent snapshot published by the scheduler thread.
    pub(crate) fn snapshot(&self) -> WorldSnapshot {
        match self.snapshot.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Stops the scheduler, joins the thread, and returns the world.
    pub(crate) fn stop(self) -> Result<World> {
        self.stop.store(true, Ordering::SeqCst);
        self.handle
            .join()
            .map_err(|_| anyhow!("runtime thread panicked"))
    }
}

fn drive(
    mut world: World,
    inbox: Receiver<Command>,
    published: Arc<Mutex<WorldSnapshot>>,
    stop: Arc<AtomicBool>,
) -> World {
    let mut cadence = Cadence::new(Config::base_rate());
    let mut pending = Vec::new();
    let mut events: Vec<Event> = Vec::new();
    let mut last_firing = Instant::now();

    while !stop.load(Ordering::SeqCst) {
        // User commands land before any tick from the same iteration.
        for command in inbox.try_iter() {
            pending.push(command);
        }

        let now = Instant::now();
        cadence.handle(
            now.duration_since(last_firing),
            query::is_paused(&world),
            query::time_speed(&world),
            &mut pending,
        );
        last_firing = now;

        events.clear();
        for command in pending.drain(..) {
            apply(&mut world, command, &mut events);
        }

        match published.lock() {
            Ok(mut guard) => *guard = query::snapshot(&world),
            Err(poisoned) => *poisoned.into_inner() = query::snapshot(&world),
        }

        thread::sleep(LOOP_REST);
    }

    world
}
