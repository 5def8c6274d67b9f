//! Particle lifecycles: ambient pollen, bee-emitted bursts, pesticide clouds.

use bee_meadow_core::{BurstId, CloudId, PollenId, Position, Velocity, TICK_SECONDS};
use rand::Rng;

use crate::World;

/// Hard cap on concurrent burst particles; emission truncates at the cap.
pub(crate) const BURST_CAP: usize = 700;

const BURST_MIN_PER_EMISSION: u32 = 3;
const BURST_MAX_PER_EMISSION: u32 = 6;

const POLLEN_RECYCLE_TOP: f64 = -0.02;
const POLLEN_RECYCLE_LEFT: f64 = -0.05;
const POLLEN_RECYCLE_RIGHT: f64 = 1.05;
const POLLEN_RESTART_Y: f64 = 1.05;

const CLOUD_MIN_X: f64 = 0.05;
const CLOUD_MAX_X: f64 = 0.92;
const CLOUD_MIN_Y: f64 = 0.05;
const CLOUD_MAX_Y: f64 = 0.75;

/// Ambient pollen particle drifting upward on a fixed velocity.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Pollen {
    pub(crate) id: PollenId,
    pub(crate) position: Position,
    pub(crate) velocity: Velocity,
    pub(crate) opacity: f64,
    pub(crate) size: f64,
}

impl Pollen {
    pub(crate) fn spawn(id: PollenId, rng: &mut impl Rng) -> Self {
        Self {
            id,
            position: Position::new(rng.gen_range(0.0..=1.0), rng.gen_range(0.0..=1.0)),
            velocity: Velocity::new(
                rng.gen_range(-0.0008..=0.0008),
                rng.gen_range(-0.0025..=-0.0006),
            ),
            opacity: rng.gen_range(0.25..=0.65),
            size: rng.gen_range(3.0..=7.0),
        }
    }
}

/// Short-lived particle emitted beneath a bee leaving a flower.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Burst {
    pub(crate) id: BurstId,
    pub(crate) position: Position,
    pub(crate) velocity: Velocity,
    pub(crate) life: f64,
    pub(crate) size: f64,
    pub(crate) opacity: f64,
}

impl Burst {
    fn spawn(id: BurstId, origin: Position, rng: &mut impl Rng) -> Self {
        Self {
            id,
            position: Position::new(
                origin.x() + rng.gen_range(-0.01..=0.01),
                origin.y() + rng.gen_range(0.01..=0.03),
            ),
            velocity: Velocity::new(
                rng.gen_range(-0.0006..=0.0006),
                rng.gen_range(0.0002..=0.0012),
            ),
            life: rng.gen_range(1.4..=2.6),
            size: rng.gen_range(0.7..=1.6),
            opacity: rng.gen_range(0.65..=0.95),
        }
    }
}

/// Drifting pesticide cloud bouncing inside its canvas band.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Cloud {
    pub(crate) id: CloudId,
    pub(crate) position: Position,
    pub(crate) velocity: Velocity,
    pub(crate) width: f64,
    pub(crate) height: f64,
}

impl Cloud {
    pub(crate) fn spawn(id: CloudId, rng: &mut impl Rng) -> Self {
        Self {
            id,
            position: Position::new(rng.gen_range(0.1..=0.85), rng.gen_range(0.08..=0.68)),
            velocity: Velocity::new(
                rng.gen_range(-0.0008..=0.0008),
                rng.gen_range(-0.0005..=0.0005),
            ),
            width: rng.gen_range(72.0..=112.0),
            height: rng.gen_range(36.0..=56.0),
        }
    }
}

impl World {
    /// Integrates ambient pollen and recycles particles that drift off-bounds
    /// back to the top edge, keeping the stream infinite.
    pub(crate) fn drift_pollen(&mut self) {
        let mut rng = rand::thread_rng();
        for pollen in &mut self.pollen {
            pollen.position = pollen.position.offset_by(pollen.velocity);
            if pollen.position.y() < POLLEN_RECYCLE_TOP
                || pollen.position.x() < POLLEN_RECYCLE_LEFT
                || pollen.position.x() > POLLEN_RECYCLE_RIGHT
            {
                pollen.position = Position::new(rng.gen_range(0.0..=1.0), POLLEN_RESTART_Y);
            }
        }
    }

    /// Integrates burst particles, ages them, and drops the expired ones.
    pub(crate) fn decay_bursts(&mut self) {
        if self.bursts.is_empty() {
            return;
        }

        for burst in &mut self.bursts {
            burst.life -= TICK_SECONDS;
            burst.position = burst.position.offset_by(burst.velocity);
        }

        self.bursts.retain(|burst| burst.life > 0.0);
    }

    /// Integrates pesticide clouds with elastic reflection at the band edges.
    pub(crate) fn drift_clouds(&mut self) {
        for cloud in &mut self.clouds {
            cloud.position = cloud.position.offset_by(cloud.velocity);
            if cloud.position.x() < CLOUD_MIN_X || cloud.position.x() > CLOUD_MAX_X {
                cloud.velocity = Velocity::new(-cloud.velocity.dx(), cloud.velocity.dy());
            }
            if cloud.position.y() < CLOUD_MIN_Y || cloud.position.y() > CLOUD_MAX_Y {
                cloud.velocity = Velocity::new(cloud.velocity.dx(), -cloud.velocity.dy());
            }
        }
    }

    /// Emits a small cloud of burst particles beneath the provided origin,
    /// truncated so the collection never exceeds [`BURST_CAP`].
    pub(crate) fn emit_burst(&mut self, origin: Position, rng: &mut impl Rng) {
        let headroom = BURST_CAP.saturating_sub(self.bursts.len());
        if headroom == 0 {
            return;
        }

        let requested = rng.gen_range(BURST_MIN_PER_EMISSION..=BURST_MAX_PER_EMISSION) as usize;
        for _ in 0..requested.min(headroom) {
            let id = BurstId::new(self.next_burst_id);
            self.next_burst_id = self.next_burst_id.wrapping_add(1);
            self.bursts.push(Burst::spawn(id, origin, rng));
        }
    }
}
