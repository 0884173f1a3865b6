/// Wave behavior: entities stream in from the right edge at staggered
/// times and drift left one pixel per phase tick until they are shot,
/// leave the screen, or hit the ship.

use rand::Rng;

use crate::board::Board;
use crate::compute::{crash_ship, ship_touches};
use crate::config::{
    Phase, BULLET_INTERVAL, OFFSCREEN_X, SPAWN_DELAY_STEPS, SPAWN_DELAY_STRIDE, SPAWN_X,
    SPAWN_Y_MIN, SPAWN_Y_SPAN,
};
use crate::entities::{Entity, Outcome, World};
use crate::scheduler::{Timer, Timers};
use crate::sprites;

/// Fill every slot of the registry with a fresh entity waiting off the
/// right edge.
pub fn spawn<R: Rng>(world: &mut World, phase: &Phase, rng: &mut R, timers: &mut Timers) {
    world.phase_entered = true;
    world.phase_ticks = 0;
    world.registry.fill(phase.capacity, |_| Entity {
        x: SPAWN_X,
        y: rng.gen_range(0..SPAWN_Y_SPAN) + SPAWN_Y_MIN,
        extents: phase.half_extents,
        alive: true,
        spawn_delay: rng.gen_range(0..SPAWN_DELAY_STEPS) * SPAWN_DELAY_STRIDE,
        cutoff: OFFSCREEN_X,
        clear_on_death: true,
        ..Entity::default()
    });

    if phase.can_shoot {
        timers.arm(Timer::EnemyBullet, BULLET_INTERVAL);
    }
    tracing::info!(phase = phase.name, entities = phase.capacity, "wave spawned");
}

/// One phase tick of the wave.
pub fn tick<B, R>(world: &mut World, board: &mut B, phase: &Phase, rng: &mut R, timers: &mut Timers)
where
    B: Board + ?Sized,
    R: Rng,
{
    if !world.phase_entered {
        spawn(world, phase, rng, timers);
    }
    world.phase_ticks += 1;
    let ticks = world.phase_ticks;

    for i in 0..world.registry.capacity() {
        let entity = &mut world.registry.slots_mut()[i];
        if !entity.is_active(ticks) {
            continue;
        }

        sprites::paint(board, entity.x, entity.y, phase.sprite, false);
        entity.x -= 1;
        let moved = *entity;

        if moved.x < moved.cutoff {
            world.registry.retire(i, board);
            continue;
        }

        sprites::paint(board, moved.x, moved.y, phase.sprite, true);
        if world.ship.alive && ship_touches(&world.ship, &moved) {
            crash_ship(world, board);
        }
    }

    if world.registry.live() == 0 || !world.ship.alive {
        let outcome = if world.ship.alive {
            Outcome::PhaseCleared
        } else {
            Outcome::ShipDestroyed
        };
        world.request_transition(outcome);
        finish(world, phase, timers);
    }
}

/// Leave the phase ready to respawn cleanly on its next entry.
fn finish(world: &mut World, phase: &Phase, timers: &mut Timers) {
    world.phase_entered = false;
    world.phase_ticks = 0;
    if phase.can_shoot {
        timers.detach(Timer::EnemyBullet);
    }
}
