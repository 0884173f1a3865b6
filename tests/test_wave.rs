use rand::rngs::StdRng;
use rand::SeedableRng;

use pixel_raider::board::FrameBuffer;
use pixel_raider::config::*;
use pixel_raider::entities::{Entity, Outcome, World};
use pixel_raider::scheduler::{Timer, Timers};
use pixel_raider::wave;

fn phase(id: PhaseId) -> Phase {
    PhaseTable::standard().get(id).clone()
}

fn entered_world(entity: Entity) -> World {
    let mut world = World::new(PhaseId::ASTEROIDS, 3);
    world.registry.fill(1, |_| entity);
    world.phase_entered = true;
    world
}

fn asteroid_at(x: i32, y: i32) -> Entity {
    Entity {
        x,
        y,
        extents: HalfExtents { above: 2, below: 2 },
        alive: true,
        cutoff: OFFSCREEN_X,
        clear_on_death: true,
        ..Entity::default()
    }
}

#[test]
fn spawn_fills_every_slot_off_the_right_edge() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut timers = Timers::default();
    let mut world = World::new(PhaseId::ASTEROIDS, 3);

    wave::spawn(&mut world, &phase(PhaseId::ASTEROIDS), &mut rng, &mut timers);

    assert!(world.phase_entered);
    assert_eq!(world.registry.capacity(), 10);
    assert_eq!(world.registry.live(), 10);
    for e in world.registry.slots() {
        assert!(e.alive);
        assert_eq!(e.x, 83);
        assert!((10..47).contains(&e.y), "y = {}", e.y);
        assert_eq!(e.spawn_delay % 5, 0);
        assert!(e.spawn_delay <= 25);
        assert_eq!(e.extents, HalfExtents { above: 2, below: 2 });
        assert_eq!(e.cutoff, -2);
        assert!(e.clear_on_death);
    }
    assert!(!timers.is_armed(Timer::EnemyBullet));
}

#[test]
fn spawn_staggers_arrivals() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut timers = Timers::default();
    let mut world = World::new(PhaseId::ALIENS, 3);

    wave::spawn(&mut world, &phase(PhaseId::ALIENS), &mut rng, &mut timers);

    let first = world.registry.slots()[0].spawn_delay;
    assert!(world.registry.slots().iter().any(|e| e.spawn_delay != first));
}

#[test]
fn shooting_wave_arms_enemy_timer() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut timers = Timers::default();
    let mut world = World::new(PhaseId::ALIENS, 3);

    wave::spawn(&mut world, &phase(PhaseId::ALIENS), &mut rng, &mut timers);

    assert_eq!(world.registry.live(), 15);
    assert!(timers.is_armed(Timer::EnemyBullet));
}

#[test]
fn first_tick_spawns_the_wave() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut timers = Timers::default();
    let mut fb = FrameBuffer::new();
    let mut world = World::new(PhaseId::ASTEROIDS, 3);

    wave::tick(&mut world, &mut fb, &phase(PhaseId::ASTEROIDS), &mut rng, &mut timers);

    assert_eq!(world.phase_ticks, 1);
    for e in world.registry.slots() {
        let expected = if e.spawn_delay == 0 { 82 } else { 83 };
        assert_eq!(e.x, expected);
    }
}

#[test]
fn entity_holds_until_its_delay_elapses() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut timers = Timers::default();
    let mut fb = FrameBuffer::new();
    let mut world = entered_world(Entity { spawn_delay: 5, ..asteroid_at(83, 30) });
    let asteroids = phase(PhaseId::ASTEROIDS);

    for _ in 0..4 {
        wave::tick(&mut world, &mut fb, &asteroids, &mut rng, &mut timers);
    }
    assert_eq!(world.registry.slots()[0].x, 83);

    wave::tick(&mut world, &mut fb, &asteroids, &mut rng, &mut timers);
    assert_eq!(world.registry.slots()[0].x, 82);
}

#[test]
fn last_entity_leaving_clears_phase() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut timers = Timers::default();
    let mut fb = FrameBuffer::new();
    let mut world = entered_world(asteroid_at(-1, 30));
    let asteroids = phase(PhaseId::ASTEROIDS);

    wave::tick(&mut world, &mut fb, &asteroids, &mut rng, &mut timers);
    assert_eq!(world.registry.slots()[0].x, -2);
    assert_eq!(world.pending_transition(), None);

    wave::tick(&mut world, &mut fb, &asteroids, &mut rng, &mut timers);
    assert_eq!(world.registry.live(), 0);
    assert_eq!(world.pending_transition(), Some(Outcome::PhaseCleared));
    assert!(!world.phase_entered);
    assert_eq!(world.phase_ticks, 0);
    assert_eq!(fb.lit_count(), 0);
}

#[test]
fn drifting_into_ship_destroys_it() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut timers = Timers::default();
    let mut fb = FrameBuffer::new();
    let mut world = entered_world(asteroid_at(71, 20));
    world.ship.x = 70;
    world.ship.y = 20;
    let aliens = phase(PhaseId::ALIENS);
    timers.arm(Timer::EnemyBullet, BULLET_INTERVAL);

    wave::tick(&mut world, &mut fb, &aliens, &mut rng, &mut timers);

    assert_eq!(world.ship.lives, 2);
    assert!(!world.ship.alive);
    assert_eq!(world.pending_transition(), Some(Outcome::ShipDestroyed));
    assert!(!timers.is_armed(Timer::EnemyBullet));
}
