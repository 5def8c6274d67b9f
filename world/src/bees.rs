//! Per-bee behavior: the seek / pollinate / trail-emit state machine and the
//! steering that couples agent motion to the flower population.

use bee_meadow_core::{BeeActivity, BeeId, Phase, Position, Velocity, TICK_SECONDS};
use rand::Rng;

use crate::World;

const MAX_SPEED: f64 = 0.008;
const STEER_STRENGTH: f64 = 0.10;
const ARRIVAL_RADIUS: f64 = 0.04;
const BRAKING_RADIUS: f64 = 0.12;
const JITTER: f64 = 0.000_12;
const EDGE_MARGIN: f64 = 0.03;
const EDGE_NUDGE: f64 = 0.001;
const TRAIL_WINDOW: f64 = 4.0;
const TRAIL_DELAY: f64 = 1.0;
const EMIT_PROBABILITY: f64 = 0.18;
const POLLINATE_MIN_SECONDS: f64 = 1.5;
const POLLINATE_MAX_SECONDS: f64 = 3.5;

/// Mobile agent seeking flowers across the meadow canvas.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Bee {
    pub(crate) id: BeeId,
    pub(crate) position: Position,
    pub(crate) velocity: Velocity,
    pub(crate) size: f64,
    pub(crate) target: Position,
    pub(crate) activity: BeeActivity,
}

impl Bee {
    pub(crate) fn spawn(id: BeeId, rng: &mut impl Rng) -> Self {
        Self {
            id,
            position: Position::new(rng.gen_range(0.05..=0.95), rng.gen_range(0.05..=0.95)),
            velocity: Velocity::ZERO,
            size: rng.gen_range(9.0..=15.0),
            // Placeholder target; the world rewires every bee right after
            // the batch is created.
            target: Position::new(rng.gen_range(0.05..=0.95), rng.gen_range(0.05..=0.95)),
            activity: BeeActivity::Seeking,
        }
    }
}

impl World {
    /// Advances every bee by one tick through its behavior state machine.
    pub(crate) fn advance_bees(&mut self) {
        let mut rng = rand::thread_rng();
        for index in 0..self.bees.len() {
            let mut bee = self.bees[index];

            match bee.activity {
                BeeActivity::Pollinating { remaining } => {
                    let remaining = remaining - TICK_SECONDS;
                    if remaining <= 0.0 {
                        // Leaving the flower opens the delayed trail window
                        // and picks the next destination.
                        bee.activity = BeeActivity::TrailEmitting {
                            remaining: TRAIL_WINDOW,
                        };
                        bee.target = self.random_target(&mut rng);
                    } else {
                        bee.activity = BeeActivity::Pollinating { remaining };
                    }
                    // Hovering: position and velocity stay untouched.
                }
                BeeActivity::TrailEmitting { remaining } => {
                    let remaining = remaining - TICK_SECONDS;
                    if remaining <= 0.0 {
                        bee.activity = BeeActivity::Seeking;
                    } else {
                        bee.activity = BeeActivity::TrailEmitting { remaining };
                        let since_leaving = TRAIL_WINDOW - remaining;
                        if since_leaving >= TRAIL_DELAY
                            && rng.gen_range(0.0..1.0) < EMIT_PROBABILITY
                        {
                            self.emit_burst(bee.position, &mut rng);
                        }
                    }
                    steer(&mut bee, &mut rng);
                }
                BeeActivity::Seeking => {
                    steer(&mut bee, &mut rng);
                }
            }

            self.bees[index] = bee;
        }
    }

    /// Picks a uniformly random flower position as the bee's next target.
    ///
    /// Planted flowers join the pool during Recovery. With no candidates at
    /// all the bee wanders to a random interior point instead.
    pub(crate) fn random_target(&self, rng: &mut impl Rng) -> Position {
        let planted = if self.phase == Phase::Recovery {
            self.planted_flowers.as_slice()
        } else {
            &[]
        };

        let candidates = self.flowers.len() + planted.len();
        if candidates == 0 {
            return Position::new(rng.gen_range(0.1..=0.9), rng.gen_range(0.1..=0.9));
        }

        let pick = rng.gen_range(0..candidates);
        if pick < self.flowers.len() {
            self.flowers[pick].position
        } else {
            planted[pick - self.flowers.len()].position
        }
    }

    /// Rewires every bee toward a freshly drawn target.
    pub(crate) fn rewire_bee_targets(&mut self) {
        let mut rng = rand::thread_rng();
        for index in 0..self.bees.len() {
            self.bees[index].target = self.random_target(&mut rng);
        }
    }
}

/// Steers a bee toward its target, landing on arrival.
///
/// A target occupying the bee's exact position yields zero distance, which
/// falls inside the arrival radius before any division happens.
fn steer(bee: &mut Bee, rng: &mut impl Rng) {
    let distance = bee.position.distance_to(bee.target);

    if distance < ARRIVAL_RADIUS {
        bee.activity = BeeActivity::Pollinating {
            remaining: rng.gen_range(POLLINATE_MIN_SECONDS..=POLLINATE_MAX_SECONDS),
        };
        bee.velocity = Velocity::ZERO;
        return;
    }

    // Slow down linearly inside the braking zone.
    let approach = if distance < BRAKING_RADIUS {
        distance / BRAKING_RADIUS
    } else {
        1.0
    };
    let speed = MAX_SPEED * approach;
    let desired_dx = (bee.target.x() - bee.position.x()) / distance * speed;
    let desired_dy = (bee.target.y() - bee.position.y()) / distance * speed;

    let mut dx = bee.velocity.dx() + (desired_dx - bee.velocity.dx()) * STEER_STRENGTH;
    let mut dy = bee.velocity.dy() + (desired_dy - bee.velocity.dy()) * STEER_STRENGTH;

    // Wing-beat jitter keeps the flight organic.
    dx += rng.gen_range(-JITTER..=JITTER);
    dy += rng.gen_range(-JITTER..=JITTER);

    dx = dx.clamp(-MAX_SPEED, MAX_SPEED);
    dy = dy.clamp(-MAX_SPEED, MAX_SPEED);

    let mut position = bee.position.offset_by(Velocity::new(dx, dy));

    // Soft repulsion near the canvas edges, applied to the carried velocity
    // so the push unfolds over the following ticks.
    if position.x() < EDGE_MARGIN {
        dx += EDGE_NUDGE;
    }
    if position.x() > 1.0 - EDGE_MARGIN {
        dx -= EDGE_NUDGE;
    }
    if position.y() < EDGE_MARGIN {
        dy += EDGE_NUDGE;
    }
    if position.y() > 1.0 - EDGE_MARGIN {
        dy -= EDGE_NUDGE;
    }

    position = position.clamped_to_canvas();

    bee.velocity = Velocity::new(dx, dy);
    bee.position = position;
}
