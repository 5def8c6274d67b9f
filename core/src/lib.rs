#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Bee Meadow engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values that adapters
//! translate into user feedback. Systems consume event streams, query
//! immutable snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Simulated seconds advanced by a single logical tick.
pub const TICK_SECONDS: f64 = 0.05;

/// Wall-clock interval between scheduler firings at the base rate.
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Logical ticks executed per wall-clock second at 1x speed.
pub const BASE_TICK_RATE: u32 = 20;

/// Top-level simulation regime the meadow is currently in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The opening equilibrium: metrics hold steady while entities roam.
    Abundance,
    /// Rising pesticides drag the bee population and flower health down.
    Decline,
    /// User interventions rebuild the conditions bees need to return.
    Recovery,
}

/// Simulation speed applied as consecutive logical ticks per firing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeSpeed {
    /// One logical tick per scheduler firing.
    Single,
    /// Two logical ticks per scheduler firing.
    Double,
    /// Three logical ticks per scheduler firing.
    Triple,
}

impl TimeSpeed {
    /// Number of logical ticks executed back-to-back per firing.
    #[must_use]
    pub const fn factor(self) -> u32 {
        match self {
            Self::Single => 1,
            Self::Double => 2,
            Self::Triple => 3,
        }
    }

    /// Next speed in the 1x -> 2x -> 3x -> 1x cycle.
    #[must_use]
    pub const fn cycled(self) -> Self {
        match self {
            Self::Single => Self::Double,
            Self::Double => Self::Triple,
            Self::Triple => Self::Single,
        }
    }
}

/// Outcome the user committed for a single Recovery challenge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChallengeOutcome {
    /// The choice supports the ecosystem's recovery.
    Favorable,
    /// The choice works against the ecosystem's recovery.
    Detrimental,
}

impl ChallengeOutcome {
    /// Reports whether the outcome counts toward the favorable tally.
    #[must_use]
    pub const fn is_favorable(self) -> bool {
        matches!(self, Self::Favorable)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by one fixed quantum of [`TICK_SECONDS`].
    Tick,
    /// Flips the pause flag; ticks are no-ops while paused.
    TogglePause,
    /// Advances the speed multiplier through the 1x/2x/3x cycle.
    CycleTimeSpeed,
    /// Flips the display-only hint flag; no simulation effect.
    ToggleHint,
    /// Dismisses a drifting pesticide cloud and lowers contamination.
    RemovePesticideCloud {
        /// Identifier of the cloud the user tapped.
        cloud: CloudId,
    },
    /// Plants a new flower at the tapped canvas position.
    PlantFlower {
        /// Normalized canvas position of the tap.
        position: Position,
    },
    /// Marks a habitat block as placed inside the habitat zone.
    PlaceHabitatBlock {
        /// Identifier of the block that was dragged into place.
        block: BlockId,
    },
    /// Commits the current Recovery challenge and moves to the next.
    AdvanceChallenge {
        /// Outcome the user committed for the current challenge.
        outcome: ChallengeOutcome,
    },
    /// Moves to the next phase, or restarts the cycle from Abundance.
    AdvancePhase,
    /// Moves back one phase; rejected while already in Abundance.
    RewindPhase,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced by one tick.
    TimeAdvanced,
    /// Confirms that the pause flag flipped.
    PauseToggled {
        /// Pause state after processing the command.
        paused: bool,
    },
    /// Confirms that the speed multiplier advanced through its cycle.
    TimeSpeedChanged {
        /// Speed active after processing the command.
        speed: TimeSpeed,
    },
    /// Confirms that the hint flag flipped.
    HintToggled {
        /// Hint visibility after processing the command.
        visible: bool,
    },
    /// Announces that the simulation entered a new phase.
    PhaseChanged {
        /// Phase that became active after the transition.
        phase: Phase,
    },
    /// Announces that the active phase reached its completion condition.
    PhaseCompleted {
        /// Phase whose completion condition latched.
        phase: Phase,
    },
    /// Announces that the Recovery phase restored ecological balance.
    BalanceRestored,
    /// Confirms that a pesticide cloud was dismissed by the user.
    PesticideCloudRemoved {
        /// Identifier of the cloud that was removed.
        cloud: CloudId,
    },
    /// Confirms that a flower was planted by the user.
    FlowerPlanted {
        /// Identifier allocated to the planted flower by the world.
        flower: PlantedFlowerId,
        /// Normalized canvas position the flower was planted at.
        position: Position,
    },
    /// Confirms that a habitat block was placed.
    HabitatBlockPlaced {
        /// Identifier of the block that was placed.
        block: BlockId,
        /// Total placed blocks after processing the command.
        placed_count: usize,
    },
    /// Confirms that a Recovery challenge outcome was committed.
    ChallengeAdvanced {
        /// Challenge index active after advancing (4 is synthesis).
        index: usize,
        /// Outcome recorded for the challenge that was committed.
        outcome: ChallengeOutcome,
    },
}

/// Unique identifier assigned to a bee.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BeeId(u32);

impl BeeId {
    /// Creates a new bee identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an original (non-planted) flower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlowerId(u32);

impl FlowerId {
    /// Creates a new flower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an ambient pollen particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PollenId(u32);

impl PollenId {
    /// Creates a new pollen identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a bee-emitted pollen burst particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BurstId(u32);

impl BurstId {
    /// Creates a new burst identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a pesticide cloud.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CloudId(u32);

impl CloudId {
    /// Creates a new cloud identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a user-planted flower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlantedFlowerId(u32);

impl PlantedFlowerId {
    /// Creates a new planted-flower identifier with the provided value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a habitat block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(u32);

impl BlockId {
    /// Creates a new block identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location on the normalized [0,1] x [0,1] meadow canvas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f64,
    y: f64,
}

impl Position {
    /// Creates a new canvas position from normalized coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate in normalized canvas space.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Vertical coordinate in normalized canvas space.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Position displaced by the provided velocity over one tick.
    #[must_use]
    pub fn offset_by(self, velocity: Velocity) -> Self {
        Self::new(self.x + velocity.dx(), self.y + velocity.dy())
    }

    /// Euclidean distance to another canvas position.
    #[must_use]
    pub fn distance_to(self, other: Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Position with both coordinates clamped to the unit canvas.
    #[must_use]
    pub fn clamped_to_canvas(self) -> Self {
        Self::new(self.x.clamp(0.0, 1.0), self.y.clamp(0.0, 1.0))
    }
}

/// Per-tick displacement in normalized canvas units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    dx: f64,
    dy: f64,
}

impl Velocity {
    /// Velocity with no displacement on either axis.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a new velocity from per-tick axis displacements.
    #[must_use]
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Horizontal displacement applied per tick.
    #[must_use]
    pub const fn dx(&self) -> f64 {
        self.dx
    }

    /// Vertical displacement applied per tick.
    #[must_use]
    pub const fn dy(&self) -> f64 {
        self.dy
    }
}

/// Behavior state a bee occupies, carrying only the fields that state needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BeeActivity {
    /// Flying toward the current target.
    Seeking,
    /// Hovering stationary at a flower; position never changes here.
    Pollinating {
        /// Seconds remaining before the bee leaves the flower.
        remaining: f64,
    },
    /// Flew away from a flower and may still emit pollen bursts.
    TrailEmitting {
        /// Seconds remaining in the post-flower emission window.
        remaining: f64,
    },
}

/// Immutable representation of a single bee's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeeSnapshot {
    /// Unique identifier assigned to the bee.
    pub id: BeeId,
    /// Normalized canvas position the bee occupies.
    pub position: Position,
    /// Per-tick displacement the bee currently carries.
    pub velocity: Velocity,
    /// Fixed visual size in presentation units.
    pub size: f64,
    /// Target position the bee is flying toward.
    pub target: Position,
    /// Behavior state the bee occupies this tick.
    pub activity: BeeActivity,
}

/// Immutable representation of an original flower used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowerSnapshot {
    /// Unique identifier assigned to the flower.
    pub id: FlowerId,
    /// Fixed normalized canvas position.
    pub position: Position,
    /// Fixed visual size in presentation units.
    pub size: f64,
}

/// Immutable representation of an ambient pollen particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PollenSnapshot {
    /// Unique identifier assigned to the particle.
    pub id: PollenId,
    /// Normalized canvas position the particle occupies.
    pub position: Position,
    /// Fixed drift velocity the particle carries.
    pub velocity: Velocity,
    /// Fixed rendering opacity in the range 0.0..=1.0.
    pub opacity: f64,
    /// Fixed visual size in presentation units.
    pub size: f64,
}

/// Immutable representation of a bee-emitted pollen burst particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BurstSnapshot {
    /// Unique identifier assigned to the particle.
    pub id: BurstId,
    /// Normalized canvas position the particle occupies.
    pub position: Position,
    /// Seconds of lifetime the particle has left.
    pub life: f64,
    /// Fixed visual size in presentation units.
    pub size: f64,
    /// Fixed rendering opacity in the range 0.0..=1.0.
    pub opacity: f64,
}

/// Immutable representation of a drifting pesticide cloud.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CloudSnapshot {
    /// Unique identifier assigned to the cloud.
    pub id: CloudId,
    /// Normalized canvas position of the cloud center.
    pub position: Position,
    /// Fixed visual width in presentation units.
    pub width: f64,
    /// Fixed visual height in presentation units.
    pub height: f64,
}

/// Immutable representation of a user-planted flower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlantedFlowerSnapshot {
    /// Unique identifier assigned to the planted flower.
    pub id: PlantedFlowerId,
    /// Fixed normalized canvas position from the user's tap.
    pub position: Position,
    /// Fixed visual size in presentation units.
    pub size: f64,
}

/// Immutable representation of a habitat block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HabitatBlockSnapshot {
    /// Unique identifier assigned to the block.
    pub id: BlockId,
    /// Fixed normalized canvas position the block was seeded at.
    pub position: Position,
    /// Indicates whether the user dragged the block into the habitat zone.
    pub placed: bool,
}

/// Progress through the Recovery phase's challenge sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChallengeView {
    /// Challenge ordinal in 0..=4, where 4 is the terminal synthesis step.
    pub current_index: usize,
    /// Number of hypothesis challenges committed so far.
    pub committed: usize,
    /// Number of committed challenges answered favorably.
    pub favorable: usize,
}

/// Read-only copy of the four ecosystem metrics, each in [0,1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetricsSnapshot {
    /// Relative size of the bee population.
    pub bee_population: f64,
    /// Relative health of the flower population.
    pub flower_health: f64,
    /// Relative variety of species in the meadow.
    pub biodiversity: f64,
    /// Relative pesticide contamination.
    pub pesticide_level: f64,
}

/// Complete read-only snapshot published to external collaborators each tick.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldSnapshot {
    /// Ecosystem metrics after the most recent tick.
    pub metrics: MetricsSnapshot,
    /// Phase the simulation currently runs under.
    pub phase: Phase,
    /// Simulated seconds elapsed since the phase was entered.
    pub phase_elapsed: f64,
    /// Latched completion flag for the active phase.
    pub phase_completed: bool,
    /// Latched Recovery flag set once the bee population recovers.
    pub balance_restored: bool,
    /// Bees in deterministic id order.
    pub bees: Vec<BeeSnapshot>,
    /// Original flowers in deterministic id order.
    pub flowers: Vec<FlowerSnapshot>,
    /// Ambient pollen particles in deterministic id order.
    pub pollen: Vec<PollenSnapshot>,
    /// Live bee-emitted burst particles in deterministic id order.
    pub bursts: Vec<BurstSnapshot>,
    /// Remaining pesticide clouds in deterministic id order.
    pub clouds: Vec<CloudSnapshot>,
    /// User-planted flowers in deterministic id order.
    pub planted_flowers: Vec<PlantedFlowerSnapshot>,
    /// Habitat blocks in deterministic id order.
    pub habitat_blocks: Vec<HabitatBlockSnapshot>,
    /// Number of habitat blocks currently placed.
    pub placed_habitat_count: usize,
    /// Progress through the Recovery challenge sequence.
    pub challenges: ChallengeView,
    /// Indicates whether ticks are currently suspended.
    pub paused: bool,
    /// Speed multiplier the scheduler should honor.
    pub speed: TimeSpeed,
    /// Display-only hint flag toggled by the user.
    pub hint_visible: bool,
}
