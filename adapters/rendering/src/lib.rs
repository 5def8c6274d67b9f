#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Bee Meadow adapters.
//!
//! Backends never touch the world directly: they receive a [`Scene`] composed
//! from a [`WorldSnapshot`] and draw whatever it describes. All positions in
//! a scene are pixel coordinates produced by projecting the normalized canvas
//! through a validated [`CanvasPresentation`].

use anyhow::Result as AnyResult;
use bee_meadow_core::{
    BeeActivity, BeeId, MetricsSnapshot, Phase, Position, TimeSpeed, WorldSnapshot,
};
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a copy of the color with the provided alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Validated pixel dimensions of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasPresentation {
    width: f32,
    height: f32,
    background: Color,
}

impl CanvasPresentation {
    /// Creates a new canvas descriptor from pixel dimensions.
    pub fn new(
        width: f32,
        height: f32,
        background: Color,
    ) -> std::result::Result<Self, RenderingError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(RenderingError::InvalidCanvasSize { width, height });
        }

        Ok(Self {
            width,
            height,
            background,
        })
    }

    /// Canvas width in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Canvas height in pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Color the backend clears the surface with each frame.
    #[must_use]
    pub const fn background(&self) -> Color {
        self.background
    }

    /// Projects a normalized world position into pixel coordinates.
    #[must_use]
    pub fn project(&self, position: Position) -> Vec2 {
        Vec2::new(
            position.x() as f32 * self.width,
            position.y() as f32 * self.height,
        )
    }
}

/// Bee ready to be drawn at a pixel position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneBee {
    /// Identifier allocated to the bee by the world.
    pub id: BeeId,
    /// Center of the bee in pixel coordinates.
    pub center: Vec2,
    /// Diameter of the bee body in pixels.
    pub size: f32,
    /// Whether the bee is hovering at a flower this frame.
    pub hovering: bool,
}

/// Flower ready to be drawn, covering both original and planted flowers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneFlower {
    /// Center of the flower in pixel coordinates.
    pub center: Vec2,
    /// Diameter of the flower head in pixels, scaled by flower health.
    pub size: f32,
    /// Whether the user planted this flower during Recovery.
    pub planted: bool,
}

/// Ambient pollen particle ready to be drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScenePollen {
    /// Center of the particle in pixel coordinates.
    pub center: Vec2,
    /// Diameter of the particle in pixels.
    pub size: f32,
    /// Opacity the particle is drawn at.
    pub opacity: f32,
}

/// Bee-emitted burst particle ready to be drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneBurst {
    /// Center of the particle in pixel coordinates.
    pub center: Vec2,
    /// Diameter of the particle in pixels.
    pub size: f32,
    /// Opacity the particle is drawn at, fading as the particle ages.
    pub opacity: f32,
}

/// Pesticide cloud ready to be drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneCloud {
    /// Center of the cloud in pixel coordinates.
    pub center: Vec2,
    /// Width of the cloud in pixels.
    pub width: f32,
    /// Height of the cloud in pixels.
    pub height: f32,
}

/// Habitat block ready to be drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneHabitatBlock {
    /// Center of the block in pixel coordinates.
    pub center: Vec2,
    /// Whether the user already dragged the block into the habitat zone.
    pub placed: bool,
}

/// Complete description of a frame, detached from world internals.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Validated surface the frame is drawn on.
    pub canvas: CanvasPresentation,
    /// Phase the simulation currently runs under.
    pub phase: Phase,
    /// Ecosystem metrics backing the overlay gauges.
    pub metrics: MetricsSnapshot,
    /// Bees to draw this frame.
    pub bees: Vec<SceneBee>,
    /// Flowers to draw this frame, original and planted together.
    pub flowers: Vec<SceneFlower>,
    /// Ambient pollen particles to draw this frame.
    pub pollen: Vec<ScenePollen>,
    /// Burst particles to draw this frame.
    pub bursts: Vec<SceneBurst>,
    /// Pesticide clouds to draw this frame.
    pub clouds: Vec<SceneCloud>,
    /// Habitat blocks to draw this frame.
    pub habitat_blocks: Vec<SceneHabitatBlock>,
    /// Whether the pause chrome should be shown.
    pub paused: bool,
    /// Speed multiplier to surface in the overlay.
    pub speed: TimeSpeed,
    /// Whether the hint overlay should be shown.
    pub hint_visible: bool,
}

/// Minimum fraction of a flower's base size kept at zero flower health.
const FLOWER_PROMINENCE_FLOOR: f32 = 0.45;
/// Burst lifetime at which the particle is drawn at full opacity.
const BURST_FULL_OPACITY_LIFE: f32 = 1.0;

/// Composes a drawable scene from a world snapshot.
///
/// Flower prominence tracks the flower-health metric so the meadow visibly
/// wilts during Decline, and planted flowers join the same list as the
/// originals. Burst opacity fades linearly over the particle's final second.
#[must_use]
pub fn compose_scene(snapshot: &WorldSnapshot, canvas: CanvasPresentation) -> Scene {
    let vitality = FLOWER_PROMINENCE_FLOOR
        + (1.0 - FLOWER_PROMINENCE_FLOOR) * snapshot.metrics.flower_health as f32;

    let mut flowers: Vec<SceneFlower> = snapshot
        .flowers
        .iter()
        .map(|flower| SceneFlower {
            center: canvas.project(flower.position),
            size: flower.size as f32 * vitality,
            planted: false,
        })
        .collect();
    flowers.extend(snapshot.planted_flowers.iter().map(|flower| SceneFlower {
        center: canvas.project(flower.position),
        size: flower.size as f32,
        planted: true,
    }));

    Scene {
        canvas,
        phase: snapshot.phase,
        metrics: snapshot.metrics,
        bees: snapshot
            .bees
            .iter()
            .map(|bee| SceneBee {
                id: bee.id,
                center: canvas.project(bee.position),
                size: bee.size as f32,
                hovering: matches!(bee.activity, BeeActivity::Pollinating { .. }),
            })
            .collect(),
        flowers,
        pollen: snapshot
            .pollen
            .iter()
            .map(|pollen| ScenePollen {
                center: canvas.project(pollen.position),
                size: pollen.size as f32,
                opacity: pollen.opacity as f32,
            })
            .collect(),
        bursts: snapshot
            .bursts
            .iter()
            .map(|burst| SceneBurst {
                center: canvas.project(burst.position),
                size: burst.size as f32,
                opacity: burst.opacity as f32
                    * (burst.life as f32 / BURST_FULL_OPACITY_LIFE).clamp(0.0, 1.0),
            })
            .collect(),
        clouds: snapshot
            .clouds
            .iter()
            .map(|cloud| SceneCloud {
                center: canvas.project(cloud.position),
                width: cloud.width as f32,
                height: cloud.height as f32,
            })
            .collect(),
        habitat_blocks: snapshot
            .habitat_blocks
            .iter()
            .map(|block| SceneHabitatBlock {
                center: canvas.project(block.position),
                placed: block.placed,
            })
            .collect(),
        paused: snapshot.paused,
        speed: snapshot.speed,
        hint_visible: snapshot.hint_visible,
    }
}

/// Rendering backend capable of presenting Bee Meadow scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and may
    /// replace the scene before it is rendered, allowing adapters to push
    /// freshly composed snapshots each frame.
    fn run<F>(self, scene: Scene, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Canvas dimensions must both be positive.
    InvalidCanvasSize {
        /// Provided width that failed validation.
        width: f32,
        /// Provided height that failed validation.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCanvasSize { width, height } => {
                write!(
                    f,
                    "canvas dimensions must be positive (received {width}x{height})"
                )
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use bee_meadow_core::{
        BeeSnapshot, BurstId, BurstSnapshot, ChallengeView, FlowerId, FlowerSnapshot,
        PlantedFlowerId, PlantedFlowerSnapshot, Velocity,
    };

    const BACKGROUND: Color = Color::from_rgb_u8(0x1c, 0x2b, 0x1a);

    fn canvas() -> CanvasPresentation {
        CanvasPresentation::new(800.0, 600.0, BACKGROUND).expect("valid canvas")
    }

    fn empty_snapshot() -> WorldSnapshot {
        WorldSnapshot {
            metrics: MetricsSnapshot {
                bee_population: 1.0,
                flower_health: 1.0,
                biodiversity: 1.0,
                pesticide_level: 0.0,
            },
            phase: Phase::Abundance,
            phase_elapsed: 0.0,
            phase_completed: false,
            balance_restored: false,
            bees: Vec::new(),
            flowers: Vec::new(),
            pollen: Vec::new(),
            bursts: Vec::new(),
            clouds: Vec::new(),
            planted_flowers: Vec::new(),
            habitat_blocks: Vec::new(),
            placed_habitat_count: 0,
            challenges: ChallengeView::default(),
            paused: false,
            speed: TimeSpeed::Single,
            hint_visible: false,
        }
    }

    #[test]
    fn canvas_construction_rejects_non_positive_dimensions() {
        assert!(matches!(
            CanvasPresentation::new(0.0, 600.0, BACKGROUND),
            Err(RenderingError::InvalidCanvasSize { .. })
        ));
        assert!(matches!(
            CanvasPresentation::new(800.0, -1.0, BACKGROUND),
            Err(RenderingError::InvalidCanvasSize { .. })
        ));
    }

    #[test]
    fn projection_scales_normalized_positions_to_pixels() {
        let projected = canvas().project(Position::new(0.5, 0.25));
        assert_eq!(projected, Vec2::new(400.0, 150.0));
    }

    #[test]
    fn flower_prominence_tracks_flower_health() {
        let mut snapshot = empty_snapshot();
        snapshot.flowers.push(FlowerSnapshot {
            id: FlowerId::new(0),
            position: Position::new(0.5, 0.5),
            size: 20.0,
        });

        snapshot.metrics.flower_health = 1.0;
        let healthy = compose_scene(&snapshot, canvas());
        snapshot.metrics.flower_health = 0.0;
        let wilted = compose_scene(&snapshot, canvas());

        assert!((healthy.flowers[0].size - 20.0).abs() < 1e-5);
        assert!((wilted.flowers[0].size - 20.0 * FLOWER_PROMINENCE_FLOOR).abs() < 1e-5);
    }

    #[test]
    fn planted_flowers_join_the_flower_list_at_full_size() {
        let mut snapshot = empty_snapshot();
        snapshot.planted_flowers.push(PlantedFlowerSnapshot {
            id: PlantedFlowerId::new(0),
            position: Position::new(0.3, 0.3),
            size: 22.0,
        });
        snapshot.metrics.flower_health = 0.1;

        let scene = compose_scene(&snapshot, canvas());

        assert_eq!(scene.flowers.len(), 1);
        assert!(scene.flowers[0].planted);
        assert_eq!(scene.flowers[0].size, 22.0);
    }

    #[test]
    fn burst_opacity_fades_over_the_final_second() {
        let mut snapshot = empty_snapshot();
        for (id, life) in [(0, 2.0), (1, 0.5)] {
            snapshot.bursts.push(BurstSnapshot {
                id: BurstId::new(id),
                position: Position::new(0.5, 0.5),
                life,
                size: 1.0,
                opacity: 0.8,
            });
        }

        let scene = compose_scene(&snapshot, canvas());

        assert_eq!(scene.bursts[0].opacity, 0.8);
        assert!((scene.bursts[1].opacity - 0.4).abs() < 1e-6);
    }

    #[test]
    fn hovering_bees_are_flagged_for_the_backend() {
        let mut snapshot = empty_snapshot();
        for (id, activity) in [
            (0, BeeActivity::Seeking),
            (1, BeeActivity::Pollinating { remaining: 1.0 }),
        ] {
            snapshot.bees.push(BeeSnapshot {
                id: BeeId::new(id),
                position: Position::new(0.5, 0.5),
                velocity: Velocity::ZERO,
                size: 10.0,
                target: Position::new(0.5, 0.5),
                activity,
            });
        }

        let scene = compose_scene(&snapshot, canvas());

        assert!(!scene.bees[0].hovering);
        assert!(scene.bees[1].hovering);
    }

    #[test]
    fn lighten_moves_channels_towards_white() {
        let color = Color::from_rgb_u8(100, 150, 200).lighten(0.5);
        assert!(color.red > 100.0 / 255.0);
        assert!(color.green > 150.0 / 255.0);
        assert!(color.blue > 200.0 / 255.0);
        assert_eq!(color.alpha, 1.0);
    }
}
