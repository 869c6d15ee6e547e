/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` and returns a brand-new `GameState`.  Side effects are limited
/// to the injected RNG and, on restart, the injected key-value store.

use std::collections::VecDeque;
use std::f32::consts::TAU;
use std::sync::Arc;

use glam::Vec2;
use log::{debug, info, warn};
use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{
    Direction, Enemy, EntityId, FrameInput, GameState, GameStatus, HudSnapshot, IdAllocator, Player,
    Projectile, ProjectileKind,
};
use crate::error::ConfigError;
use crate::events::{route, GameEvent};
use crate::level::LevelContainer;
use crate::persistence::{load_max_score, KeyValueStore, MAX_SCORE_KEY};
use crate::physics::{detect_contacts, first_wall_hit, slide_against_walls};

// ── Constructors ─────────────────────────────────────────────────────────────

fn fresh_player(config: &GameConfig) -> Player {
    Player {
        pos: Vec2::ZERO,
        facing: Direction::Down,
        held: None,
        velocity: Vec2::ZERO,
        lives: config.player.max_lives,
        last_aimed_shot: None,
        hurt_until: None,
    }
}

/// Build the initial game state: validate the config, read the stored max
/// score and spawn the first level.
pub fn init_state(
    config: GameConfig,
    store: &dyn KeyValueStore,
    rng: &mut impl Rng,
) -> Result<GameState, ConfigError> {
    config.validate()?;

    let mut state = GameState {
        player: fresh_player(&config),
        enemies: Vec::new(),
        projectiles: Vec::new(),
        level: LevelContainer::new(config.levels.clone()),
        touching: Default::default(),
        ids: IdAllocator::default(),
        score: 0,
        max_score: load_max_score(store),
        kills: 0,
        restarts: 0,
        status: GameStatus::Playing,
        time: 0.0,
        frame: 0,
        config: Arc::new(config),
    };
    regenerate(&mut state, rng);
    Ok(state)
}

// ── Read-only views ──────────────────────────────────────────────────────────

pub fn hud(state: &GameState) -> HudSnapshot {
    HudSnapshot {
        lives_remaining: state.player.lives,
        max_lives: state.config.player.max_lives,
        score: state.score,
        max_score: state.max_score,
        paused: state.status == GameStatus::Paused,
        damage_flash: state.player.hurt_until.is_some(),
    }
}

/// Movement vector for this tick: a held discrete direction wins over the
/// analog axis.
pub fn movement_direction(axis: Vec2, held: Option<Direction>) -> Vec2 {
    match held {
        Some(dir) => dir.to_vec(),
        None => axis.normalize_or_zero(),
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Hold a direction. Clears the other three and turns the player at once.
pub fn press_direction(state: &GameState, dir: Direction) -> GameState {
    GameState {
        player: Player {
            held: Some(dir),
            facing: dir,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

/// Release a direction. Releasing one that is not held changes nothing.
pub fn release_direction(state: &GameState, dir: Direction) -> GameState {
    let held = if state.player.held == Some(dir) {
        None
    } else {
        state.player.held
    };
    GameState {
        player: Player {
            held,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

pub fn toggle_pause(state: &GameState) -> GameState {
    let status = match state.status {
        GameStatus::Playing => GameStatus::Paused,
        GameStatus::Paused => GameStatus::Playing,
    };
    info!("game {:?}", status);
    GameState {
        status,
        ..state.clone()
    }
}

/// Fire a bullet along the facing direction, subject to the aimed cooldown.
pub fn fire_aimed(state: &GameState) -> GameState {
    let mut next = state.clone();
    shoot_aimed(&mut next);
    next
}

/// Fire a bullet in a uniformly random direction and face that way.
/// Not subject to any cooldown.
pub fn fire_random(state: &GameState, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    shoot_random(&mut next, rng);
    next
}

/// Start a new game: persist a beaten max score, reset the player and
/// regenerate the level.
pub fn restart(
    state: &GameState,
    store: &mut dyn KeyValueStore,
    rng: &mut impl Rng,
) -> GameState {
    let mut next = state.clone();
    new_game(&mut next, store, rng);
    next
}

/// Swap the active level for a random template.
pub fn regenerate_level(state: &GameState, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    regenerate(&mut next, rng);
    next
}

/// Apply a single gameplay event outside of `tick`.
pub fn apply_event(
    state: &GameState,
    event: GameEvent,
    store: &mut dyn KeyValueStore,
    rng: &mut impl Rng,
) -> GameState {
    let mut next = state.clone();
    handle_event(&mut next, event, store, rng);
    next
}

// ── Per-frame tick ──────────────────────────────────────────────────────────

/// Advance the simulation by `dt` seconds.
///
/// While paused the state comes back unchanged: no movement, no firing, no
/// contacts, and the clock does not advance.
pub fn tick(
    state: &GameState,
    input: &FrameInput,
    dt: f32,
    store: &mut dyn KeyValueStore,
    rng: &mut impl Rng,
) -> GameState {
    if state.status == GameStatus::Paused {
        return state.clone();
    }
    let mut next = state.clone();

    // ── 1. Player ────────────────────────────────────────────────────────────
    move_player(&mut next, input.axis, dt);
    if input.fire_aimed {
        shoot_aimed(&mut next);
    }
    if input.fire_random {
        shoot_random(&mut next, rng);
    }

    // ── 2. Enemies ───────────────────────────────────────────────────────────
    step_enemies(&mut next, dt);

    // ── 3. Projectiles ───────────────────────────────────────────────────────
    step_projectiles(&mut next, dt);

    // ── 4. Contacts → event queue ────────────────────────────────────────────
    let (entered, _) = detect_contacts(&next);
    let mut queue: VecDeque<GameEvent> = entered.iter().flat_map(route).collect();
    queue.extend(input.events.iter().copied());

    let restarts = next.restarts;
    while let Some(event) = queue.pop_front() {
        handle_event(&mut next, event, store, rng);
        if next.restarts != restarts {
            // The rest of the queue refers to the game that just ended.
            queue.clear();
        }
    }

    // Anything spawned by the events above counts as already touching.
    let (_, touching) = detect_contacts(&next);
    next.touching = touching;

    // ── 5. Clock ─────────────────────────────────────────────────────────────
    next.time += dt;
    next.frame += 1;
    if matches!(next.player.hurt_until, Some(until) if next.time >= until) {
        next.player.hurt_until = None;
    }

    next
}

// ── In-place helpers shared by the public transitions ───────────────────────

fn move_player(state: &mut GameState, axis: Vec2, dt: f32) {
    let cfg = Arc::clone(&state.config);
    let dir = movement_direction(axis, state.player.held);
    if let Some(facing) = Direction::from_vector(dir) {
        state.player.facing = facing;
    }

    let velocity = dir * cfg.player.speed;
    let target = state.player.pos + velocity * dt;
    let walls = state
        .level
        .active()
        .map(|l| l.walls.as_slice())
        .unwrap_or(&[]);
    let slid = slide_against_walls(state.player.pos, target, cfg.player.radius, walls);

    state.player.pos = cfg.arena.clamp(slid, cfg.player.radius);
    state.player.velocity = velocity;
}

fn spawn_projectile(state: &mut GameState, kind: ProjectileKind, pos: Vec2, dir: Vec2) {
    let tuning = match kind {
        ProjectileKind::Bullet => state.config.bullet,
        ProjectileKind::Arrow => state.config.arrow,
    };
    let id = state.ids.allocate();
    state.projectiles.push(Projectile {
        id,
        kind,
        pos,
        dir: dir.normalize_or_zero(),
        speed: tuning.speed,
        age: 0.0,
    });
}

fn shoot_aimed(state: &mut GameState) {
    let now = state.time;
    let dir = state.player.facing.to_vec();
    // No shot yet means no cooldown, so the very first aimed shot is accepted at t=0.
    let cooling = state
        .player
        .last_aimed_shot
        .is_some_and(|last| now - last < state.config.player.aimed_cooldown);
    if dir == Vec2::ZERO || cooling {
        return;
    }

    state.player.last_aimed_shot = Some(now);
    let pos = state.player.pos;
    spawn_projectile(state, ProjectileKind::Bullet, pos, dir);
    debug!("aimed shot {:?} at t={:.2}", state.player.facing, now);
}

fn shoot_random(state: &mut GameState, rng: &mut impl Rng) {
    let dir = Vec2::from_angle(rng.gen_range(0.0..TAU));
    if let Some(facing) = Direction::from_vector(dir) {
        state.player.facing = facing;
    }
    let pos = state.player.pos;
    spawn_projectile(state, ProjectileKind::Bullet, pos, dir);
    debug!("random shot ({:.2}, {:.2})", dir.x, dir.y);
}

fn step_enemies(state: &mut GameState, dt: f32) {
    let now = state.time;
    let target = state.player.pos;
    let arena = state.config.arena;
    let radius = state.config.enemy.radius;
    let mut arrows = Vec::new();

    for enemy in &mut state.enemies {
        let to_player = target - enemy.pos;
        let distance = to_player.length();
        let dir = to_player.normalize_or_zero();

        let ready = enemy
            .last_shot
            .map_or(true, |last| now - last >= enemy.shoot_interval);
        if distance <= enemy.shoot_range && ready && dir != Vec2::ZERO {
            arrows.push((enemy.pos, dir));
            enemy.last_shot = Some(now);
        }

        let step = (enemy.move_speed * dt).min(distance);
        enemy.pos = arena.clamp(enemy.pos + dir * step, radius);
    }

    for (pos, dir) in arrows {
        spawn_projectile(state, ProjectileKind::Arrow, pos, dir);
    }
}

fn step_projectiles(state: &mut GameState, dt: f32) {
    let cfg = Arc::clone(&state.config);
    let tuning = |kind| match kind {
        ProjectileKind::Bullet => cfg.bullet,
        ProjectileKind::Arrow => cfg.arrow,
    };
    let walls = state
        .level
        .active()
        .map(|l| l.walls.as_slice())
        .unwrap_or(&[]);

    for p in &mut state.projectiles {
        let target = p.pos + p.dir * p.speed * dt;
        // Stop at the first wall on the way; the contact pass removes it.
        p.pos = first_wall_hit(p.pos, target, tuning(p.kind).radius, walls).unwrap_or(target);
        p.age += dt;
    }
    state
        .projectiles
        .retain(|p| p.age <= tuning(p.kind).max_lifetime && cfg.arena.contains(p.pos));
}

fn regenerate(state: &mut GameState, rng: &mut impl Rng) {
    if let Some(old) = state.level.clear() {
        state.enemies.retain(|e| e.level != old.id);
    }

    let door_radius = state.config.door_radius;
    let Ok(spawned) = state.level.regenerate(&mut state.ids, door_radius, rng) else {
        return;
    };

    let tuning = &state.config.enemy;
    let level_id = spawned.instance.id;
    state
        .enemies
        .extend(spawned.enemy_spawns.into_iter().map(|(id, pos)| Enemy {
            id,
            pos,
            level: level_id,
            move_speed: tuning.speed,
            shoot_range: tuning.shoot_range,
            shoot_interval: tuning.shoot_interval,
            last_shot: None,
        }));
}

fn new_game(state: &mut GameState, store: &mut dyn KeyValueStore, rng: &mut impl Rng) {
    if state.score > state.max_score {
        state.max_score = state.score;
        if let Err(e) = store.set_int(MAX_SCORE_KEY, i64::from(state.max_score)) {
            warn!("could not save max score {}: {}", state.max_score, e);
        }
    }
    info!(
        "new game: final score {}, best {}, kills {}",
        state.score, state.max_score, state.kills
    );

    state.score = 0;
    state.kills = 0;
    state.restarts += 1;
    state.player = fresh_player(&state.config);
    state.enemies.clear();
    state.projectiles.clear();
    state.touching.clear();
    regenerate(state, rng);
}

fn take_damage(state: &mut GameState, store: &mut dyn KeyValueStore, rng: &mut impl Rng) {
    state.player.lives = state.player.lives.saturating_sub(1);
    state.player.hurt_until = Some(state.time + state.config.player.damage_flash);
    debug!("player hit, {} lives left", state.player.lives);

    if state.player.lives == 0 {
        new_game(state, store, rng);
    }
}

fn remove_enemy(state: &mut GameState, id: EntityId) -> bool {
    let before = state.enemies.len();
    state.enemies.retain(|e| e.id != id);
    state.enemies.len() != before
}

fn handle_event(
    state: &mut GameState,
    event: GameEvent,
    store: &mut dyn KeyValueStore,
    rng: &mut impl Rng,
) {
    match event {
        GameEvent::ProjectileImpact { projectile, .. } => {
            state.projectiles.retain(|p| p.id != projectile);
        }
        GameEvent::EnemyHit { enemy } => {
            if remove_enemy(state, enemy) {
                state.kills += 1;
                state.score += state.config.player.kill_score;
                debug!("enemy {:?} destroyed, score {}", enemy, state.score);
            }
        }
        GameEvent::PlayerHit { enemy } => {
            if remove_enemy(state, enemy) {
                take_damage(state, store, rng);
            }
        }
        GameEvent::LevelDoor => {
            if state.level.active().is_some() {
                regenerate(state, rng);
            }
        }
        GameEvent::WallBump => {
            state.player.velocity = Vec2::ZERO;
        }
    }
}
