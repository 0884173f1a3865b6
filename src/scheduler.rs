/// Cooperative scheduler.
///
/// Periodic sources and the button never touch the world: they only
/// raise a flag in [`Signals`]. The loop is the single consumer. Each
/// iteration it clears and handles every pending flag in a fixed order,
/// then settles deaths and phase transitions, then waits for the next
/// deadline.
///
/// Timers are one-shot deadlines. A handler that wants to run again
/// re-arms its own timer, which is also how the ship timer follows the
/// speed knob. Detaching a timer is the only way to cancel it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::board::{Board, Controls};
use crate::config::{PhaseTable, FSM_START_INTERVAL, HUD_LINE_Y, WIDTH};
use crate::entities::World;
use crate::error::ConfigError;
use crate::{bullets, compute, fsm};

/// Longest the loop sleeps without re-checking asynchronous signals.
const IDLE_POLL: Duration = Duration::from_millis(5);

// ── Signals ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Source {
    Ship,
    Phase,
    PlayerBullet,
    EnemyBullet,
    Button,
}

impl Source {
    const ALL: [Source; 5] = [
        Source::Ship,
        Source::Phase,
        Source::PlayerBullet,
        Source::EnemyBullet,
        Source::Button,
    ];

    fn index(self) -> usize {
        match self {
            Source::Ship => 0,
            Source::Phase => 1,
            Source::PlayerBullet => 2,
            Source::EnemyBullet => 3,
            Source::Button => 4,
        }
    }
}

/// One single-bit flag per source, safe to raise from any thread.
#[derive(Debug, Default)]
pub struct Signals {
    flags: [AtomicBool; 5],
    quit: AtomicBool,
}

impl Signals {
    pub fn raise(&self, source: Source) {
        self.flags[source.index()].store(true, Ordering::Release);
    }

    /// Clear the flag, returning whether it was set.
    pub fn take(&self, source: Source) -> bool {
        self.flags[source.index()].swap(false, Ordering::AcqRel)
    }

    pub fn is_raised(&self, source: Source) -> bool {
        self.flags[source.index()].load(Ordering::Acquire)
    }

    pub fn pending(&self) -> bool {
        Source::ALL.iter().any(|&s| self.is_raised(s)) || self.quit_requested()
    }

    pub fn request_quit(&self) {
        self.quit.store(true, Ordering::Release);
    }

    pub fn quit_requested(&self) -> bool {
        self.quit.load(Ordering::Acquire)
    }
}

// ── Timers ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Timer {
    Ship,
    Phase,
    PlayerBullet,
    EnemyBullet,
}

impl Timer {
    const ALL: [Timer; 4] = [Timer::Ship, Timer::Phase, Timer::PlayerBullet, Timer::EnemyBullet];

    pub fn source(self) -> Source {
        match self {
            Timer::Ship => Source::Ship,
            Timer::Phase => Source::Phase,
            Timer::PlayerBullet => Source::PlayerBullet,
            Timer::EnemyBullet => Source::EnemyBullet,
        }
    }

    fn index(self) -> usize {
        self.source().index()
    }
}

/// Deadlines for the periodic sources, measured from the start of the run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Timers {
    now: Duration,
    deadlines: [Option<Duration>; 4],
}

impl Timers {
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `timer` to fire `interval` after the current time.
    /// Re-arming replaces any earlier deadline.
    pub fn arm(&mut self, timer: Timer, interval: Duration) {
        self.deadlines[timer.index()] = Some(self.now + interval);
    }

    pub fn detach(&mut self, timer: Timer) {
        self.deadlines[timer.index()] = None;
    }

    pub fn is_armed(&self, timer: Timer) -> bool {
        self.deadlines[timer.index()].is_some()
    }

    pub fn deadline(&self, timer: Timer) -> Option<Duration> {
        self.deadlines[timer.index()]
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.deadlines.iter().flatten().min().copied()
    }

    /// Advance to `now` and raise the flag of every expired timer. Each
    /// expiry disarms its timer until a handler re-arms it.
    pub fn fire_due(&mut self, now: Duration, signals: &Signals) -> usize {
        self.now = self.now.max(now);
        let mut fired = 0;
        for timer in Timer::ALL {
            let slot = &mut self.deadlines[timer.index()];
            if slot.is_some_and(|d| d <= self.now) {
                *slot = None;
                signals.raise(timer.source());
                fired += 1;
            }
        }
        fired
    }
}

// ── Clock ─────────────────────────────────────────────────────────────────────

pub trait Clock {
    fn now(&self) -> Duration;
    /// Low-power wait. May return early.
    fn sleep_until(&self, deadline: Duration);
}

#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep_until(&self, deadline: Duration) {
        let now = self.now();
        if deadline > now {
            thread::sleep(deadline - now);
        }
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunEnd {
    /// Lives exhausted; carries the final score.
    GameOver(u32),
    Quit,
}

pub struct Engine<R: Rng> {
    world: World,
    table: PhaseTable,
    timers: Timers,
    signals: Arc<Signals>,
    rng: R,
    low_lives: bool,
}

impl<R: Rng> Engine<R> {
    /// Validate the table and set up a fresh run in its start phase.
    pub fn new(table: PhaseTable, lives: u32, rng: R) -> Result<Self, ConfigError> {
        table.validate()?;

        let start = table.start();
        let mut world = World::new(start, lives);
        world.enter_phase(start, table.get(start).capacity);

        let mut timers = Timers::default();
        timers.arm(Timer::Phase, FSM_START_INTERVAL);

        Ok(Self {
            world,
            table,
            timers,
            signals: Arc::new(Signals::default()),
            rng,
            low_lives: false,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn table(&self) -> &PhaseTable {
        &self.table
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    /// Handle for producers (input thread, tests) to raise flags.
    pub fn signals(&self) -> Arc<Signals> {
        Arc::clone(&self.signals)
    }

    /// Fire whatever timers are due at `now`, then run one iteration.
    pub fn step<B, C>(&mut self, now: Duration, board: &mut B, controls: &C) -> Flow
    where
        B: Board + ?Sized,
        C: Controls + ?Sized,
    {
        self.timers.fire_due(now, &self.signals);
        self.iterate(board, controls)
    }

    /// One pass over the pending flags. Handlers run to completion in a
    /// fixed order; deaths and transitions are settled last so they see
    /// every hit from this pass.
    pub fn iterate<B, C>(&mut self, board: &mut B, controls: &C) -> Flow
    where
        B: Board + ?Sized,
        C: Controls + ?Sized,
    {
        board.show_status(self.world.score, self.world.ship.lives);
        board.draw_line(0, HUD_LINE_Y, WIDTH - 1, HUD_LINE_Y);

        if self.signals.take(Source::Ship) {
            let input = controls.sample();
            compute::steer_ship(&mut self.world, board, &input);
            self.timers.arm(Timer::Ship, compute::ship_interval(&input));
        }

        if self.signals.take(Source::Phase) {
            let world = &mut self.world;
            fsm::advance_phase(world, &self.table, board, &mut self.rng, &mut self.timers);
        }

        let pressed = self.signals.take(Source::Button);
        let bullet_tick = self.signals.take(Source::PlayerBullet);
        if pressed || bullet_tick {
            let phase = self.table.get(self.world.phase);
            let fired = pressed && bullets::fire(&mut self.world, board, phase, &mut self.timers);
            if !fired && bullet_tick {
                bullets::advance_player(&mut self.world, board, phase, &mut self.timers);
            }
        }

        if self.signals.take(Source::EnemyBullet) && self.table.get(self.world.phase).can_shoot {
            bullets::advance_enemies(&mut self.world, board, &mut self.rng, &mut self.timers);
        }

        let ship = self.world.ship;
        if ship.lives == 0 && !ship.alive {
            self.world.run_over = true;
        }

        fsm::apply_transition(&mut self.world, &self.table, &mut self.timers);

        let ship = &mut self.world.ship;
        if ship.lives > 0 && !ship.alive {
            ship.alive = true;
            tracing::debug!(lives = ship.lives, "ship respawned");
        }

        let low = self.world.ship.lives <= 1;
        if low != self.low_lives {
            self.low_lives = low;
            board.set_low_lives(low);
        }

        board.flush();

        if self.world.run_over {
            Flow::Finished
        } else {
            Flow::Continue
        }
    }

    /// Drive the loop until the lives run out or a quit is requested.
    pub fn run<B, C, K>(&mut self, board: &mut B, controls: &C, clock: &K) -> RunEnd
    where
        B: Board + ?Sized,
        C: Controls + ?Sized,
        K: Clock + ?Sized,
    {
        tracing::info!(lives = self.world.ship.lives, "run started");
        loop {
            if self.signals.quit_requested() {
                tracing::info!(score = self.world.score, "run abandoned");
                return RunEnd::Quit;
            }

            if self.step(clock.now(), board, controls) == Flow::Finished {
                let score = self.world.score;
                board.show_end_screen(score);
                board.flush();
                tracing::info!(score, "game over");
                return RunEnd::GameOver(score);
            }

            if !self.signals.pending() {
                let poll = clock.now() + IDLE_POLL;
                let wake = self.timers.next_deadline().map_or(poll, |d| d.min(poll));
                clock.sleep_until(wake);
            }
        }
    }
}
