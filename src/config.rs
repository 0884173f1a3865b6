/// Static game configuration: screen geometry, tuning constants and the
/// phase table that drives the finite state machine.

use std::fmt;
use std::time::Duration;

use crate::entities::Outcome;
use crate::error::ConfigError;
use crate::sprites::{self, Point, Sprite};

// ── Screen geometry ───────────────────────────────────────────────────────────

pub const WIDTH: i32 = 84;
pub const HEIGHT: i32 = 48;

/// Row of the separator line under the HUD text.
pub const HUD_LINE_Y: i32 = 8;

// ── Ship ──────────────────────────────────────────────────────────────────────

/// Ship collision radius, also its distance from the side walls.
pub const SHIP_OFFSET: i32 = 3;
pub const SHIP_MIN_X: i32 = SHIP_OFFSET;
pub const SHIP_MAX_X: i32 = WIDTH - SHIP_OFFSET - 1;
pub const SHIP_MIN_Y: i32 = 12;
pub const SHIP_MAX_Y: i32 = HEIGHT - SHIP_OFFSET - 1;
pub const SHIP_START_X: i32 = SHIP_OFFSET + 1;
pub const SHIP_START_Y: i32 = HEIGHT / 2;
pub const STARTING_LIVES: u32 = 3;

/// Stick dead zone. Below LOW moves left/up, above HIGH moves right/down.
pub const AXIS_LOW: f32 = 0.4;
pub const AXIS_HIGH: f32 = 0.6;

pub const SHIP_INTERVAL_MIN: Duration = Duration::from_millis(20);
pub const SHIP_INTERVAL_SPAN: Duration = Duration::from_millis(980);
pub const SHIP_START_INTERVAL: Duration = Duration::from_millis(100);

// ── Bullets ───────────────────────────────────────────────────────────────────

pub const MUZZLE: Point = Point { x: SHIP_OFFSET, y: 0 };
pub const BULLET_INTERVAL: Duration = Duration::from_millis(20);
pub const TRAIL_CAP: u8 = 3;
/// One in this many enemy-bullet ticks arms an eligible entity's gun.
pub const ENEMY_FIRE_ODDS: u32 = 400;

// ── Registry & waves ──────────────────────────────────────────────────────────

pub const MAX_ENTITIES: usize = 20;
pub const SPAWN_X: i32 = WIDTH - 1;
pub const SPAWN_Y_MIN: i32 = 10;
pub const SPAWN_Y_SPAN: i32 = 37;
pub const SPAWN_DELAY_STEPS: u32 = 6;
pub const SPAWN_DELAY_STRIDE: u32 = 5;
/// x at which a wave entity is fully off the left edge.
pub const OFFSCREEN_X: i32 = -2;

// ── Boss ──────────────────────────────────────────────────────────────────────

pub const BOSS_SPAWN_X: i32 = WIDTH - 1;
pub const BOSS_SPAWN_Y: i32 = HEIGHT / 2;
pub const BOSS_DOCK_X: i32 = 68;
pub const BOSS_LOW_Y: i32 = 33;
pub const BOSS_HIGH_Y: i32 = 13;
pub const BOSS_GONE_Y: i32 = HEIGHT + 4;

pub const FSM_START_INTERVAL: Duration = Duration::from_millis(200);

// ── Phase table ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhaseId(pub usize);

impl PhaseId {
    pub const START: PhaseId = PhaseId(0);
    pub const ASTEROIDS: PhaseId = PhaseId(1);
    pub const ALIENS: PhaseId = PhaseId(2);
    pub const BOSS: PhaseId = PhaseId(3);
    pub const DEATH: PhaseId = PhaseId(4);
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which movement policy a phase runs on its timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Behavior {
    /// Nothing to do; the terminal phase.
    Idle,
    /// Place the ship and move straight on.
    Start,
    /// Stream entities in from the right edge.
    Wave,
    /// Multi-slot boss steered from its `driver` slot.
    Boss { driver: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct HalfExtents {
    /// Pixels of the entity above its anchor (towards y = 0).
    pub above: i32,
    /// Pixels of the entity below its anchor.
    pub below: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transitions {
    pub on_destroyed: PhaseId,
    pub on_cleared: PhaseId,
    pub on_exhausted: PhaseId,
}

impl Transitions {
    pub fn target(&self, outcome: Outcome) -> PhaseId {
        match outcome {
            Outcome::PhaseCleared => self.on_cleared,
            Outcome::ShipDestroyed => self.on_destroyed,
            Outcome::LivesExhausted => self.on_exhausted,
        }
    }

    fn targets(&self) -> [PhaseId; 3] {
        [self.on_destroyed, self.on_cleared, self.on_exhausted]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Phase {
    pub name: &'static str,
    pub interval: Duration,
    pub capacity: usize,
    pub score_value: u32,
    pub can_shoot: bool,
    pub half_extents: HalfExtents,
    /// Per-slot bullet origins relative to the boss centre. Empty for waves.
    pub shot_offsets: &'static [Point],
    pub behavior: Behavior,
    pub sprite: Sprite,
    pub next: Transitions,
}

/// The fixed phase graph. Read-only once the engine starts.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseTable {
    phases: Vec<Phase>,
    start: PhaseId,
}

impl PhaseTable {
    pub fn new(phases: Vec<Phase>, start: PhaseId) -> Self {
        Self { phases, start }
    }

    /// Start → asteroids → aliens → boss, looping back to asteroids after
    /// the boss. Losing a life always goes back through Start.
    pub fn standard() -> Self {
        let extents = |n| HalfExtents { above: n, below: n };
        let next = |cleared| Transitions {
            on_destroyed: PhaseId::START,
            on_cleared: cleared,
            on_exhausted: PhaseId::DEATH,
        };
        Self::new(
            vec![
                Phase {
                    name: "start",
                    interval: Duration::from_millis(3000),
                    capacity: 0,
                    score_value: 0,
                    can_shoot: false,
                    half_extents: HalfExtents::default(),
                    shot_offsets: &[],
                    behavior: Behavior::Start,
                    sprite: Sprite::EMPTY,
                    next: next(PhaseId::ASTEROIDS),
                },
                Phase {
                    name: "asteroids",
                    interval: Duration::from_millis(200),
                    capacity: 10,
                    score_value: 5,
                    can_shoot: false,
                    half_extents: extents(2),
                    shot_offsets: &[],
                    behavior: Behavior::Wave,
                    sprite: sprites::ASTEROID,
                    next: next(PhaseId::ALIENS),
                },
                Phase {
                    name: "aliens",
                    interval: Duration::from_millis(200),
                    capacity: 15,
                    score_value: 10,
                    can_shoot: true,
                    half_extents: extents(2),
                    shot_offsets: &[],
                    behavior: Behavior::Wave,
                    sprite: sprites::ENEMY_SPACESHIP,
                    next: next(PhaseId::BOSS),
                },
                Phase {
                    name: "boss",
                    interval: Duration::from_millis(300),
                    capacity: 9,
                    score_value: 100,
                    can_shoot: true,
                    half_extents: extents(4),
                    shot_offsets: sprites::BOSS_GUNS,
                    behavior: Behavior::Boss { driver: 4 },
                    sprite: sprites::BOSS,
                    next: next(PhaseId::ASTEROIDS),
                },
                Phase {
                    name: "death",
                    interval: Duration::ZERO,
                    capacity: 0,
                    score_value: 0,
                    can_shoot: false,
                    half_extents: HalfExtents::default(),
                    shot_offsets: &[],
                    behavior: Behavior::Idle,
                    sprite: Sprite::EMPTY,
                    next: Transitions {
                        on_destroyed: PhaseId::DEATH,
                        on_cleared: PhaseId::DEATH,
                        on_exhausted: PhaseId::DEATH,
                    },
                },
            ],
            PhaseId::START,
        )
    }

    pub fn start(&self) -> PhaseId {
        self.start
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Look up a phase. Ids come from a validated table, so this only
    /// panics on a table that skipped [`PhaseTable::validate`].
    pub fn get(&self, id: PhaseId) -> &Phase {
        &self.phases[id.0]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.phases.is_empty() {
            return Err(ConfigError::EmptyTable);
        }
        if self.start.0 >= self.phases.len() {
            return Err(ConfigError::MissingStart(self.start));
        }

        for (i, phase) in self.phases.iter().enumerate() {
            let id = PhaseId(i);

            if let Some(&target) = phase.next.targets().iter().find(|t| t.0 >= self.phases.len()) {
                return Err(ConfigError::DanglingTransition { phase: id, target });
            }
            if phase.capacity > MAX_ENTITIES {
                return Err(ConfigError::CapacityTooLarge {
                    phase: id,
                    capacity: phase.capacity,
                    max: MAX_ENTITIES,
                });
            }

            match phase.behavior {
                Behavior::Idle => {}
                Behavior::Start => {
                    if phase.interval.is_zero() {
                        return Err(ConfigError::ZeroInterval(id));
                    }
                }
                Behavior::Wave | Behavior::Boss { .. } => {
                    if phase.interval.is_zero() {
                        return Err(ConfigError::ZeroInterval(id));
                    }
                    if phase.sprite.is_empty() {
                        return Err(ConfigError::MissingSprite(id));
                    }
                }
            }

            if let Behavior::Boss { driver } = phase.behavior {
                if phase.shot_offsets.len() != phase.capacity {
                    return Err(ConfigError::ShotOffsetMismatch {
                        phase: id,
                        offsets: phase.shot_offsets.len(),
                        capacity: phase.capacity,
                    });
                }
                if driver >= phase.capacity {
                    return Err(ConfigError::DriverOutOfRange {
                        phase: id,
                        driver,
                        capacity: phase.capacity,
                    });
                }
            }
        }

        Ok(())
    }
}
