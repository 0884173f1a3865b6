use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use pixel_raider::board::FrameBuffer;
use pixel_raider::bullets::*;
use pixel_raider::config::*;
use pixel_raider::entities::{EnemyBullet, Entity, Outcome, PlayerBullet, World};
use pixel_raider::scheduler::{Timer, Timers};
use pixel_raider::sprites::{self, ASTEROID};
use pixel_raider::Board;

fn asteroids() -> Phase {
    PhaseTable::standard().get(PhaseId::ASTEROIDS).clone()
}

fn world_with_ship(x: i32, y: i32) -> World {
    let mut world = World::new(PhaseId::ASTEROIDS, 3);
    world.ship.x = x;
    world.ship.y = y;
    world
}

fn place(world: &mut World, entity: Entity) {
    world.registry.fill(1, |_| entity);
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

fn fly_out(world: &mut World, fb: &mut FrameBuffer, phase: &Phase, timers: &mut Timers) {
    for _ in 0..200 {
        if !world.bullet.in_flight() {
            return;
        }
        advance_player(world, fb, phase, timers);
    }
    panic!("bullet never came to rest");
}

// ── Player bullet ─────────────────────────────────────────────────────────────

#[test]
fn bullet_trail_grows_then_slides() {
    let (phase, mut fb, mut timers) = (asteroids(), FrameBuffer::new(), Timers::default());
    let mut world = world_with_ship(7, 20);

    assert!(fire(&mut world, &mut fb, &phase, &mut timers));
    advance_player(&mut world, &mut fb, &phase, &mut timers);
    advance_player(&mut world, &mut fb, &phase, &mut timers);

    assert_eq!(world.bullet, PlayerBullet { x: 13, y: 20, length: 3 });
    assert!(fb.pixel(10, 20) && fb.pixel(11, 20) && fb.pixel(12, 20));

    advance_player(&mut world, &mut fb, &phase, &mut timers);
    assert!(!fb.pixel(10, 20));
    assert!(fb.pixel(13, 20));
    assert_eq!(world.bullet.x, 14);
}

#[test]
fn second_shot_rejected_while_in_flight() {
    let (phase, mut fb, mut timers) = (asteroids(), FrameBuffer::new(), Timers::default());
    let mut world = world_with_ship(7, 20);

    assert!(fire(&mut world, &mut fb, &phase, &mut timers));
    let before = world.bullet;
    assert!(!fire(&mut world, &mut fb, &phase, &mut timers));
    assert_eq!(world.bullet, before);
}

#[test]
fn firing_arms_bullet_timer() {
    let (phase, mut fb, mut timers) = (asteroids(), FrameBuffer::new(), Timers::default());
    let mut world = world_with_ship(7, 20);

    fire(&mut world, &mut fb, &phase, &mut timers);

    assert_eq!(timers.deadline(Timer::PlayerBullet), Some(Duration::from_millis(20)));
}

#[test]
fn bullet_leaves_clean_screen() {
    let (phase, mut fb, mut timers) = (asteroids(), FrameBuffer::new(), Timers::default());
    let mut world = world_with_ship(7, 20);

    fire(&mut world, &mut fb, &phase, &mut timers);
    fly_out(&mut world, &mut fb, &phase, &mut timers);

    assert_eq!(fb.lit_count(), 0);
    assert_eq!(world.bullet, PlayerBullet::default());
    assert!(!timers.is_armed(Timer::PlayerBullet));
}

#[test]
fn idle_tick_detaches_timer() {
    let (phase, mut fb, mut timers) = (asteroids(), FrameBuffer::new(), Timers::default());
    let mut world = world_with_ship(7, 20);
    timers.arm(Timer::PlayerBullet, Duration::from_millis(20));

    advance_player(&mut world, &mut fb, &phase, &mut timers);

    assert!(!timers.is_armed(Timer::PlayerBullet));
}

#[test]
fn shooting_asteroid_scores_and_erases_it() {
    let (phase, mut fb, mut timers) = (asteroids(), FrameBuffer::new(), Timers::default());
    let mut world = world_with_ship(7, 20);
    place(&mut world, asteroid_at(20, 20));
    sprites::paint(&mut fb, 20, 20, ASTEROID, true);

    fire(&mut world, &mut fb, &phase, &mut timers);
    fly_out(&mut world, &mut fb, &phase, &mut timers);

    assert_eq!(world.score, 5);
    assert_eq!(world.registry.live(), 0);
    assert!(!world.registry.slots()[0].alive);
    assert_eq!(fb.lit_count(), 0);
}

#[test]
fn bullet_passes_above_asteroid() {
    let (phase, mut fb, mut timers) = (asteroids(), FrameBuffer::new(), Timers::default());
    let mut world = world_with_ship(7, 20);
    place(&mut world, asteroid_at(20, 30));

    fire(&mut world, &mut fb, &phase, &mut timers);
    fly_out(&mut world, &mut fb, &phase, &mut timers);

    assert_eq!(world.score, 0);
    assert!(world.registry.slots()[0].alive);
}

#[test]
fn boss_part_stays_drawn_when_shot() {
    let (phase, mut fb, mut timers) = (asteroids(), FrameBuffer::new(), Timers::default());
    let mut world = world_with_ship(7, 20);
    place(&mut world, Entity { clear_on_death: false, ..asteroid_at(20, 20) });
    sprites::paint(&mut fb, 20, 20, ASTEROID, true);

    fire(&mut world, &mut fb, &phase, &mut timers);
    fly_out(&mut world, &mut fb, &phase, &mut timers);

    assert!(!world.registry.slots()[0].alive);
    assert!(fb.pixel(21, 22));
}

#[test]
fn bullets_cancel_each_other() {
    let (phase, mut fb, mut timers) = (asteroids(), FrameBuffer::new(), Timers::default());
    let mut world = world_with_ship(7, 20);
    let enemy = EnemyBullet { x: 30, y: 20, active: true, length: 1 };
    place(&mut world, Entity { alive: false, bullet: enemy, ..asteroid_at(60, 40) });
    fb.set_pixel(30, 20);
    fb.set_pixel(31, 20);

    fire(&mut world, &mut fb, &phase, &mut timers);
    fly_out(&mut world, &mut fb, &phase, &mut timers);

    assert_eq!(world.registry.slots()[0].bullet, EnemyBullet::default());
    assert_eq!(world.score, 0);
    assert_eq!(fb.lit_count(), 0);
}

#[test]
fn bullet_hits_asteroid_it_just_passed() {
    let (phase, mut fb, mut timers) = (asteroids(), FrameBuffer::new(), Timers::default());
    let mut world = world_with_ship(7, 20);
    place(&mut world, asteroid_at(20, 20));
    world.bullet = PlayerBullet { x: 20, y: 20, length: 1 };

    advance_player(&mut world, &mut fb, &phase, &mut timers);

    assert_eq!(world.score, 5);
    assert!(!world.registry.slots()[0].alive);
    assert!(!world.bullet.in_flight());
}

#[test]
fn crossing_bullets_cannot_slip_past_each_other() {
    let (phase, mut fb, mut timers) = (asteroids(), FrameBuffer::new(), Timers::default());
    let mut rng = StdRng::seed_from_u64(42);
    let mut world = world_with_ship(7, 20);
    let enemy = EnemyBullet { x: 30, y: 20, active: true, length: 1 };
    place(&mut world, Entity { alive: false, bullet: enemy, ..asteroid_at(60, 40) });
    world.bullet = PlayerBullet { x: 28, y: 20, length: 1 };

    advance_player(&mut world, &mut fb, &phase, &mut timers);
    advance_enemies(&mut world, &mut fb, &mut rng, &mut timers);
    assert_eq!((world.bullet.x, world.registry.slots()[0].bullet.x), (29, 29));

    advance_player(&mut world, &mut fb, &phase, &mut timers);

    assert!(!world.bullet.in_flight());
    assert_eq!(world.registry.slots()[0].bullet, EnemyBullet::default());
    assert_eq!(world.score, 0);
}

// ── Enemy bullets ─────────────────────────────────────────────────────────────

#[test]
fn enemy_bullet_downs_ship() {
    let (mut fb, mut timers) = (FrameBuffer::new(), Timers::default());
    let mut rng = StdRng::seed_from_u64(42);
    let mut world = world_with_ship(10, 20);
    let armed = EnemyBullet { active: true, ..EnemyBullet::default() };
    place(&mut world, Entity { bullet: armed, ..asteroid_at(20, 20) });

    for _ in 0..9 {
        advance_enemies(&mut world, &mut fb, &mut rng, &mut timers);
    }
    assert!(world.ship.alive);

    advance_enemies(&mut world, &mut fb, &mut rng, &mut timers);
    assert!(!world.ship.alive);
    assert_eq!(world.ship.lives, 2);
    assert_eq!(world.pending_transition(), Some(Outcome::ShipDestroyed));
    assert!(!world.registry.slots()[0].bullet.active);
}

#[test]
fn enemy_bullet_misses_and_retracts() {
    let (mut fb, mut timers) = (FrameBuffer::new(), Timers::default());
    let mut rng = StdRng::seed_from_u64(42);
    let mut world = world_with_ship(10, 24);
    let armed = EnemyBullet { active: true, ..EnemyBullet::default() };
    place(&mut world, Entity { bullet: armed, ..asteroid_at(20, 20) });

    for _ in 0..30 {
        if world.registry.slots()[0].bullet.active || fb.lit_count() > 0 {
            advance_enemies(&mut world, &mut fb, &mut rng, &mut timers);
        }
    }

    assert!(world.ship.alive);
    assert_eq!(fb.lit_count(), 0);
    assert_eq!(world.registry.slots()[0].bullet, EnemyBullet::default());
}

#[test]
fn guns_arm_at_random() {
    let (mut fb, mut timers) = (FrameBuffer::new(), Timers::default());
    let mut rng = StdRng::seed_from_u64(42);
    let mut world = world_with_ship(4, 24);
    place(&mut world, asteroid_at(60, 40));

    let mut fired = false;
    for _ in 0..10_000 {
        advance_enemies(&mut world, &mut fb, &mut rng, &mut timers);
        if world.registry.slots()[0].bullet.active {
            fired = true;
            break;
        }
    }
    assert!(fired);
}

#[test]
fn dead_entities_never_fire() {
    let (mut fb, mut timers) = (FrameBuffer::new(), Timers::default());
    let mut rng = StdRng::seed_from_u64(42);
    let mut world = world_with_ship(4, 24);
    place(&mut world, Entity { alive: false, ..asteroid_at(60, 40) });

    for _ in 0..10_000 {
        advance_enemies(&mut world, &mut fb, &mut rng, &mut timers);
    }
    assert!(!world.registry.slots()[0].bullet.active);
}

#[test]
fn enemy_tick_rearms_timer() {
    let (mut fb, mut timers) = (FrameBuffer::new(), Timers::default());
    let mut rng = StdRng::seed_from_u64(42);
    let mut world = world_with_ship(4, 24);

    advance_enemies(&mut world, &mut fb, &mut rng, &mut timers);

    assert_eq!(timers.deadline(Timer::EnemyBullet), Some(Duration::from_millis(20)));
}

#[test]
fn enemy_bullet_hits_ship_it_just_passed() {
    let (mut fb, mut timers) = (FrameBuffer::new(), Timers::default());
    let mut rng = StdRng::seed_from_u64(42);
    let mut world = world_with_ship(10, 20);
    let armed = EnemyBullet { x: 10, y: 20, active: true, length: 1 };
    place(&mut world, Entity { alive: false, bullet: armed, ..asteroid_at(60, 40) });

    advance_enemies(&mut world, &mut fb, &mut rng, &mut timers);

    assert!(!world.ship.alive);
    assert_eq!(world.ship.lives, 2);
    assert_eq!(world.pending_transition(), Some(Outcome::ShipDestroyed));
    assert!(!world.registry.slots()[0].bullet.active);
}
