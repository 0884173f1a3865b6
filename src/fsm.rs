/// Finite state machine dispatcher: runs the current phase's behavior on
/// every phase tick and applies at most one transition per iteration.

use rand::Rng;

use crate::board::Board;
use crate::config::{
    Behavior, Phase, PhaseId, PhaseTable, SHIP_START_INTERVAL, SHIP_START_X, SHIP_START_Y,
};
use crate::entities::{Outcome, World};
use crate::scheduler::{Timer, Timers};
use crate::sprites::{self, SPACESHIP};
use crate::{boss, wave};

/// Phase-timer tick: run the behavior, then re-arm the phase timer with
/// the interval of the phase that just ran.
pub fn advance_phase<B, R>(
    world: &mut World,
    table: &PhaseTable,
    board: &mut B,
    rng: &mut R,
    timers: &mut Timers,
) where
    B: Board + ?Sized,
    R: Rng,
{
    let phase = table.get(world.phase);
    match phase.behavior {
        Behavior::Idle => {}
        Behavior::Start => start(world, board, phase, timers),
        Behavior::Wave => wave::tick(world, board, phase, rng, timers),
        Behavior::Boss { driver } => boss::tick(world, board, phase, driver, timers),
    }

    if phase.interval.is_zero() {
        timers.detach(Timer::Phase);
    } else {
        timers.arm(Timer::Phase, phase.interval);
    }
}

/// Put the ship back on its launch spot, blank the panel and move on.
pub fn start<B>(world: &mut World, board: &mut B, phase: &Phase, timers: &mut Timers)
where
    B: Board + ?Sized,
{
    world.ship.x = SHIP_START_X;
    world.ship.y = SHIP_START_Y;
    timers.detach(Timer::Ship);
    board.clear();
    sprites::paint(board, world.ship.x, world.ship.y, SPACESHIP, true);
    world.request_transition(Outcome::PhaseCleared);
    timers.arm(Timer::Ship, SHIP_START_INTERVAL);
    world.registry.reset(phase.capacity);
}

/// Consume a pending transition request, if any, and enter the phase the
/// outcome table points at. A finished run always takes the
/// lives-exhausted edge.
pub fn apply_transition(
    world: &mut World,
    table: &PhaseTable,
    timers: &mut Timers,
) -> Option<PhaseId> {
    let requested = world.take_transition()?;
    let outcome = if world.run_over {
        Outcome::LivesExhausted
    } else {
        requested
    };

    let from = world.phase;
    let to = table.get(from).next.target(outcome);
    let next = table.get(to);
    world.enter_phase(to, next.capacity);
    timers.detach(Timer::EnemyBullet);

    tracing::info!(
        from = table.get(from).name,
        to = next.name,
        ?outcome,
        score = world.score,
        lives = world.ship.lives,
        "phase transition"
    );
    Some(to)
}
