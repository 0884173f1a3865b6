/// All mutable game state: plain data plus the small helpers that keep
/// its invariants. Behavior lives in the handler modules.

use crate::board::Board;
use crate::config::{HalfExtents, PhaseId, SHIP_START_X, SHIP_START_Y};

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// What a finished phase reports to the state machine. Ordered by
/// severity so concurrent requests merge to the worst one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    PhaseCleared,
    ShipDestroyed,
    LivesExhausted,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// The player's single bullet. `length == 0` means nothing is in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerBullet {
    pub x: i32,
    pub y: i32,
    pub length: u8,
}

impl PlayerBullet {
    pub fn in_flight(&self) -> bool {
        self.length > 0
    }

    /// Clear the head and every trailing pixel still on the panel.
    pub fn erase_trail<B: Board + ?Sized>(&self, board: &mut B) {
        let len = self.length as i32;
        for j in 0..=len {
            board.clear_pixel(self.x - (len - j), self.y);
        }
    }
}

/// Per-entity projectile travelling towards the left edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnemyBullet {
    pub x: i32,
    pub y: i32,
    pub active: bool,
    pub length: u8,
}

impl EnemyBullet {
    pub fn erase_trail<B: Board + ?Sized>(&self, board: &mut B) {
        let len = self.length as i32;
        for j in 0..=len {
            board.clear_pixel(self.x + (len - j), self.y);
        }
    }

    pub fn reset(&mut self) {
        *self = EnemyBullet::default();
    }
}

// ── Ship ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ship {
    pub x: i32,
    pub y: i32,
    pub alive: bool,
    pub lives: u32,
}

impl Ship {
    pub fn new(lives: u32) -> Self {
        Self {
            x: SHIP_START_X,
            y: SHIP_START_Y,
            alive: true,
            lives,
        }
    }

    /// Take one life. Returns false if the ship was already down this
    /// iteration, so a single crash never costs two lives.
    pub fn destroy(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        self.lives = self.lives.saturating_sub(1);
        true
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

/// One enemy, or one part of a boss.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Entity {
    pub x: i32,
    pub y: i32,
    pub extents: HalfExtents,
    pub alive: bool,
    /// Wave ticks to wait before this entity starts moving.
    pub spawn_delay: u32,
    /// Retire once `x` drops below this.
    pub cutoff: i32,
    /// Erase the sprite on death. Boss parts stay drawn.
    pub clear_on_death: bool,
    pub bullet: EnemyBullet,
}

impl Entity {
    /// Alive and past its spawn delay.
    pub fn is_active(&self, phase_ticks: u32) -> bool {
        self.alive && phase_ticks >= self.spawn_delay
    }

    /// Vertical span `[top, bottom]` occupied by the entity.
    pub fn span(&self) -> (i32, i32) {
        (self.y - self.extents.above, self.y + self.extents.below)
    }
}

/// Fixed-capacity slot table, emptied and refilled wholesale on every
/// phase entry. Slots are positions, not identities.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registry {
    slots: Vec<Entity>,
    live: usize,
}

impl Registry {
    pub fn reset(&mut self, capacity: usize) {
        self.slots.clear();
        self.slots.resize(capacity, Entity::default());
        self.live = 0;
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Entity] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [Entity] {
        &mut self.slots
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Entity> {
        self.slots.get_mut(index)
    }

    /// Live-object count as tracked by spawns and retirements.
    pub fn live(&self) -> usize {
        self.live
    }

    /// Refill every slot from `make` and count the live ones. This and
    /// [`Registry::retire`] are the only writers of the live count.
    pub fn fill<F>(&mut self, capacity: usize, make: F)
    where
        F: FnMut(usize) -> Entity,
    {
        self.slots.clear();
        self.slots.extend((0..capacity).map(make));
        self.live = self.slots.iter().filter(|e| e.alive).count();
    }

    pub fn any_alive(&self) -> bool {
        self.slots.iter().any(|e| e.alive)
    }

    /// Mark slot `index` dead and drop the live count. A wave entity's
    /// bullet dies with it; boss parts keep firing what is in the air.
    /// Returns false if the slot was not alive.
    pub fn retire<B: Board + ?Sized>(&mut self, index: usize, board: &mut B) -> bool {
        let Some(entity) = self.slots.get_mut(index) else {
            return false;
        };
        if !entity.alive {
            return false;
        }
        entity.alive = false;
        if entity.clear_on_death && entity.bullet.active {
            entity.bullet.erase_trail(board);
            entity.bullet.reset();
        }
        self.live = self.live.saturating_sub(1);
        true
    }
}

// ── Boss movement ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BossMotion {
    /// Slide in from the right edge to the docking column.
    #[default]
    Approach,
    Descend,
    Ascend,
    /// All gun ports gone; sink off the bottom edge.
    DeathDescent,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The single owned world every handler mutates in turn.
#[derive(Clone, Debug, PartialEq)]
pub struct World {
    pub phase: PhaseId,
    pub ship: Ship,
    pub bullet: PlayerBullet,
    pub registry: Registry,
    pub score: u32,
    /// False until the current phase's behavior has spawned its entities.
    pub phase_entered: bool,
    /// Behavior ticks since the phase was entered.
    pub phase_ticks: u32,
    pub boss: BossMotion,
    pending: Option<Outcome>,
    /// Lives exhausted while dead; the loop stops after this iteration.
    pub run_over: bool,
}

impl World {
    pub fn new(start: PhaseId, lives: u32) -> Self {
        Self {
            phase: start,
            ship: Ship::new(lives),
            bullet: PlayerBullet::default(),
            registry: Registry::default(),
            score: 0,
            phase_entered: false,
            phase_ticks: 0,
            boss: BossMotion::default(),
            pending: None,
            run_over: false,
        }
    }

    /// Ask the state machine to leave the current phase. Requests made in
    /// the same iteration merge to the most severe outcome.
    pub fn request_transition(&mut self, outcome: Outcome) {
        self.pending = Some(self.pending.map_or(outcome, |p| p.max(outcome)));
    }

    pub fn pending_transition(&self) -> Option<Outcome> {
        self.pending
    }

    pub fn take_transition(&mut self) -> Option<Outcome> {
        self.pending.take()
    }

    /// Ship down, its life taken, and a transition requested.
    pub fn kill_ship(&mut self) -> bool {
        if !self.ship.destroy() {
            return false;
        }
        let ship = self.ship;
        tracing::debug!(lives = ship.lives, x = ship.x, y = ship.y, "ship destroyed");
        self.request_transition(Outcome::ShipDestroyed);
        true
    }

    /// Reset everything that belongs to a single phase visit.
    pub fn enter_phase(&mut self, phase: PhaseId, capacity: usize) {
        self.phase = phase;
        self.registry.reset(capacity);
        self.phase_entered = false;
        self.phase_ticks = 0;
        self.boss = BossMotion::default();
    }
}
