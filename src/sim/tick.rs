//! Fixed timestep simulation tick
//!
//! One call advances every component once, in dependency order:
//! menu → obstacles → player → collisions → score → intents.

use super::collision::{CollisionResult, PlayerBounds, check};
use super::effects::{Effect, HudState, SoundKind};
use super::menu::{HitRegions, MenuAction, MenuState};
use super::obstacles::{ObstacleEvent, ObstacleStyle};
use super::player::{cycle_skin, load_skin};
use super::score::Achievement;
use super::state::GameState;
use crate::assets::{FrameTable, SkinCatalog};
use crate::error::GameError;
use crate::platform::InputEvent;

/// Input batch for a single tick, in arrival order
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub events: Vec<InputEvent>,
}

impl TickInput {
    pub fn from_events(events: Vec<InputEvent>) -> Self {
        Self { events }
    }
}

/// Intents produced by one tick
#[derive(Debug, Clone, Default)]
pub struct TickOutput {
    pub effects: Vec<Effect>,
    /// A quit event arrived; the loop should stop after this tick
    pub quit: bool,
}

/// Advance the game state by one fixed timestep.
///
/// Only a configuration error (no loadable skin left) is returned as `Err`.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    skins: &mut dyn SkinCatalog,
) -> Result<TickOutput, GameError> {
    let mut out = TickOutput::default();
    let mut sounds: Vec<SoundKind> = Vec::new();

    state.time_ticks += 1;
    state.score.tick_warning();

    // Menu
    let regions = HitRegions::for_screen(state.tuning.screen_width, state.tuning.screen_height);
    let mut impulse = false;
    for event in &input.events {
        match state.menu.handle(event, &regions) {
            MenuAction::Ignored => {}
            MenuAction::StartRun | MenuAction::Impulse => impulse = true,
            MenuAction::Restart => {
                state.restart();
                if state.score.save_pending {
                    out.effects.push(Effect::PersistBest(state.score.best));
                }
            }
            MenuAction::ToggleSound => {
                state.sound_on = !state.sound_on;
                log::info!("Sound {}", if state.sound_on { "on" } else { "off" });
            }
            MenuAction::OpenTool(key) => out.effects.push(Effect::OpenTool(key)),
            MenuAction::CloseTool => {
                if let Err(e) = skins.rescan() {
                    log::warn!("Skin rescan failed: {e}");
                }
                let current = state.player.skin.skin.clone();
                let table = load_skin(&*skins, &current)?;
                switch_skin(state, table, &mut out);
            }
            MenuAction::CycleSkin(delta) => {
                let current = state.player.skin.skin.clone();
                if let Some(next) = cycle_skin(&skins.list_skins(), &current, delta) {
                    let table = load_skin(&*skins, &next)?;
                    switch_skin(state, table, &mut out);
                }
            }
            MenuAction::Quit => out.quit = true,
        }
    }
    let menu = state.menu.state();
    state.player.alive = menu.player_alive();

    // Obstacles
    let style = ObstacleStyle::for_skin(&state.player.skin.skin);
    let events = state.obstacles.advance(
        menu,
        state.player.vx,
        style,
        &mut state.rng,
        &state.tuning,
    );
    for event in events {
        match event {
            ObstacleEvent::Cleared { count } if count > 0 => log::debug!("Cleared {count} obstacles"),
            ObstacleEvent::Spawned { id, .. } => log::debug!("Obstacle {id} spawned"),
            _ => {}
        }
    }

    // Player
    if menu.shows_field() {
        let step = state
            .player
            .advance(impulse, menu == MenuState::Main, &state.tuning.player);
        if step.flapped {
            sounds.push(SoundKind::Flap);
        }
        if step.death_sound {
            sounds.push(SoundKind::Die);
        }
        if state.player.alive {
            state.ground_offset =
                (state.ground_offset + state.player.vx).rem_euclid(state.tuning.ground_width);
        }
    }

    // Collisions. Only a run can be lost; the attract bounce is harmless.
    let playing = menu == MenuState::Play;
    if playing {
        let bounds = PlayerBounds::from_position(state.player.pos, &state.tuning.player);
        let result = check(
            &bounds,
            &state.obstacles.obstacles,
            state.tuning.screen_height,
            state.tuning.player.ground_y,
        );
        if result != CollisionResult::None {
            log::info!(
                "Run over ({result:?}) with score {} after {:.0}px",
                state.score.score,
                state.player.distance
            );
            state.menu.player_lost();
            state.player.die();
            sounds.push(SoundKind::Hit);
        }
    }

    // Score
    if playing {
        let passed = state
            .score
            .on_tick(state.player.pos.x, &mut state.obstacles.obstacles);
        sounds.extend(std::iter::repeat_n(SoundKind::Point, passed as usize));
    }
    if let Some(best) = state.score.update_best() {
        out.effects.push(Effect::PersistBest(best));
    }
    for achievement in state.score.evaluate_achievements() {
        log::info!("Achievement unlocked: {}", achievement.as_str());
        out.effects.push(Effect::AchievementUnlocked(achievement));
    }

    // Intents
    push_draws(state, &mut out.effects);
    if state.sound_on {
        out.effects.extend(sounds.into_iter().map(Effect::PlaySound));
    }

    Ok(out)
}

fn switch_skin(state: &mut GameState, table: FrameTable, out: &mut TickOutput) {
    if table != state.player.skin {
        log::info!("Skin '{}' ({} frames)", table.skin, table.len());
        out.effects.push(Effect::SkinChanged(table.skin.clone()));
    }
    state.player.set_skin(table);
}

fn push_draws(state: &GameState, effects: &mut Vec<Effect>) {
    let menu = state.menu.state();

    effects.push(Effect::DrawBackdrop(state.backdrop));
    if menu.shows_field() {
        for obstacle in &state.obstacles.obstacles {
            effects.push(Effect::DrawObstacle {
                x: obstacle.x,
                gap_y: obstacle.gap_y,
                gap: obstacle.gap,
                width: obstacle.width,
                style: obstacle.style,
            });
        }
    }
    effects.push(Effect::DrawGround {
        offset: state.ground_offset,
    });
    if menu.shows_field() {
        let pose = state.player.snapshot();
        effects.push(Effect::DrawPlayer {
            pos: pose.pos,
            angle: pose.angle,
            frame: pose.frame,
        });
    }
    effects.push(Effect::DrawHud(HudState {
        menu,
        score: state.score.score,
        best: state.score.best,
        badge: match menu {
            MenuState::Death => Achievement::badge_for(state.score.score),
            _ => None,
        },
        decrypt_warning: state.score.warning_visible() && menu != MenuState::Death,
        sound_on: state.sound_on,
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemorySkinCatalog;
    use crate::platform::MenuKey;
    use crate::sim::obstacles::Obstacle;
    use crate::sim::state::GameMode;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn catalog() -> MemorySkinCatalog {
        MemorySkinCatalog::new()
            .with_skin("yellow", 3)
            .with_stationary_skin("mario", 1)
            .with_broken_skin("red", 3)
            .with_skin("plane", 2)
    }

    fn new_state(seed: u64) -> GameState {
        let table = load_skin(&catalog(), "yellow").unwrap();
        GameState::new(seed, Tuning::default(), GameMode::Normal, table)
    }

    fn step(state: &mut GameState, skins: &mut MemorySkinCatalog, events: Vec<InputEvent>) -> TickOutput {
        tick(state, &TickInput::from_events(events), skins).unwrap()
    }

    fn sounds(out: &TickOutput) -> Vec<SoundKind> {
        out.effects
            .iter()
            .filter_map(|e| match e {
                Effect::PlaySound(kind) => Some(*kind),
                _ => None,
            })
            .collect()
    }

    fn wall_at_player() -> Obstacle {
        Obstacle {
            id: 99,
            x: 60.0,
            gap_y: 450.0,
            gap: 100.0,
            width: 104.0,
            scored: false,
            style: ObstacleStyle::Pipe,
        }
    }

    #[test]
    fn test_tick_main_to_play() {
        let mut skins = catalog();
        let mut state = new_state(1);

        let out = step(&mut state, &mut skins, vec![]);
        assert_eq!(state.menu.state(), MenuState::Main);
        assert!(out.effects.iter().any(|e| matches!(e, Effect::DrawPlayer { .. })));

        let out = step(&mut state, &mut skins, vec![InputEvent::space()]);
        assert_eq!(state.menu.state(), MenuState::Play);
        assert_eq!(sounds(&out), vec![SoundKind::Flap]);
        assert!(state.player.vy < 0.0);
    }

    #[test]
    fn test_many_presses_one_impulse() {
        let mut skins = catalog();
        let mut state = new_state(1);
        let out = step(
            &mut state,
            &mut skins,
            vec![InputEvent::space(), InputEvent::space(), InputEvent::click(10.0, 10.0)],
        );
        assert_eq!(sounds(&out), vec![SoundKind::Flap]);
    }

    #[test]
    fn test_idle_mode_never_scores_or_dies() {
        let mut skins = catalog();
        let mut state = new_state(1);
        step(&mut state, &mut skins, vec![]);

        // A wall dropped onto the title screen survives (cleared only on entry)
        state.obstacles.obstacles.push(wall_at_player());
        let mut flaps = 0;
        for _ in 0..2000 {
            let out = step(&mut state, &mut skins, vec![]);
            flaps += sounds(&out).iter().filter(|s| **s == SoundKind::Flap).count();
            assert_eq!(state.menu.state(), MenuState::Main);
            assert!(state.player.alive);
            assert!(state.player.pos.y < state.tuning.player.ground_y);
        }
        assert!(flaps > 10);
        assert_eq!(state.score.score, 0);
        assert_eq!(state.obstacles.obstacles.len(), 1);
    }

    #[test]
    fn test_collision_ends_run() {
        let mut skins = catalog();
        let mut state = new_state(1);
        step(&mut state, &mut skins, vec![InputEvent::space()]);

        state.obstacles.obstacles.push(wall_at_player());
        let out = step(&mut state, &mut skins, vec![]);
        assert_eq!(state.menu.state(), MenuState::Death);
        assert!(!state.player.alive);
        assert!(sounds(&out).contains(&SoundKind::Hit));

        // Flapping on the score board does nothing
        let vy = state.player.vy;
        step(&mut state, &mut skins, vec![InputEvent::space()]);
        assert_eq!(state.menu.state(), MenuState::Death);
        assert!(state.player.vy > vy);
    }

    #[test]
    fn test_ground_ends_run() {
        let mut skins = catalog();
        let mut state = new_state(1);
        step(&mut state, &mut skins, vec![InputEvent::space()]);
        for _ in 0..200 {
            step(&mut state, &mut skins, vec![]);
            if state.menu.state() == MenuState::Death {
                break;
            }
        }
        assert_eq!(state.menu.state(), MenuState::Death);
        assert_eq!(state.player.pos.y, state.tuning.player.ground_y);
    }

    #[test]
    fn test_pass_scores_and_persists() {
        let mut skins = catalog();
        let mut state = new_state(1);
        step(&mut state, &mut skins, vec![InputEvent::space()]);

        state.obstacles.obstacles.push(Obstacle {
            id: 7,
            x: 52.0,
            gap_y: 200.0,
            gap: 200.0,
            width: 104.0,
            scored: false,
            style: ObstacleStyle::Pipe,
        });
        let out = step(&mut state, &mut skins, vec![InputEvent::space()]);
        assert_eq!(state.menu.state(), MenuState::Play);
        assert_eq!(state.score.score, 1);
        assert_eq!(state.score.best, 1);
        assert!(out.effects.contains(&Effect::PersistBest(1)));
        assert!(sounds(&out).contains(&SoundKind::Point));

        // Same gate, later ticks: no more points
        let out = step(&mut state, &mut skins, vec![]);
        assert_eq!(state.score.score, 1);
        assert!(!out.effects.contains(&Effect::PersistBest(1)));
    }

    #[test]
    fn test_restart_resets_run() {
        let mut skins = catalog();
        let mut state = new_state(1);
        step(&mut state, &mut skins, vec![InputEvent::space()]);
        state.score.score = 12;
        state.obstacles.obstacles.push(wall_at_player());
        step(&mut state, &mut skins, vec![]);
        assert_eq!(state.menu.state(), MenuState::Death);

        let out = step(&mut state, &mut skins, vec![InputEvent::Restart]);
        assert_eq!(state.menu.state(), MenuState::Main);
        assert_eq!(state.score.score, 0);
        assert_eq!(state.score.best, 12);
        assert!(state.player.alive);
        assert!(state.obstacles.obstacles.is_empty());
        let hud = out.effects.iter().find_map(|e| match e {
            Effect::DrawHud(hud) => Some(hud.clone()),
            _ => None,
        });
        assert_eq!(hud.map(|h| h.menu), Some(MenuState::Main));
        assert!(!out.effects.iter().any(|e| matches!(e, Effect::PersistBest(_))));
    }

    #[test]
    fn test_restart_retries_pending_save() {
        let mut skins = catalog();
        let mut state = new_state(1);
        step(&mut state, &mut skins, vec![InputEvent::space()]);
        state.obstacles.obstacles.push(wall_at_player());
        step(&mut state, &mut skins, vec![]);
        assert_eq!(state.menu.state(), MenuState::Death);

        state.score.best = 7;
        state.score.save_pending = true;
        let out = step(&mut state, &mut skins, vec![InputEvent::Restart]);
        assert_eq!(state.menu.state(), MenuState::Main);
        assert!(out.effects.contains(&Effect::PersistBest(7)));
    }

    #[test]
    fn test_death_hud_shows_badge() {
        let mut skins = catalog();
        let mut state = new_state(1);
        step(&mut state, &mut skins, vec![InputEvent::space()]);
        state.score.score = 21;
        state.obstacles.obstacles.push(wall_at_player());
        let out = step(&mut state, &mut skins, vec![]);
        let badge = out.effects.iter().find_map(|e| match e {
            Effect::DrawHud(hud) => Some(hud.badge),
            _ => None,
        });
        assert_eq!(badge, Some(Some(Achievement::Silver)));
    }

    #[test]
    fn test_sound_toggle_mutes() {
        let mut skins = catalog();
        let mut state = new_state(1);
        step(&mut state, &mut skins, vec![InputEvent::click(745.0, 40.0)]);
        assert!(!state.sound_on);
        assert_eq!(state.menu.state(), MenuState::Main);

        let out = step(&mut state, &mut skins, vec![InputEvent::space()]);
        assert!(sounds(&out).is_empty());
    }

    #[test]
    fn test_skin_cycle_skips_broken() {
        let mut skins = catalog();
        let mut state = new_state(1);
        // yellow → mario
        let out = step(&mut state, &mut skins, vec![InputEvent::SkinCycle(1)]);
        assert_eq!(state.player.skin.skin, "mario");
        assert!(out.effects.contains(&Effect::SkinChanged("mario".into())));

        // mario → red is broken → plane
        step(&mut state, &mut skins, vec![InputEvent::SkinCycle(1)]);
        assert_eq!(state.player.skin.skin, "plane");
        assert_eq!(state.player.frame, 1.0);

        // plane wraps back to yellow
        step(&mut state, &mut skins, vec![InputEvent::SkinCycle(1)]);
        assert_eq!(state.player.skin.skin, "yellow");
    }

    #[test]
    fn test_stationary_skin_in_play() {
        let mut skins = catalog();
        let mut state = new_state(1);
        step(&mut state, &mut skins, vec![InputEvent::SkinCycle(1)]);
        step(&mut state, &mut skins, vec![InputEvent::space()]);
        for _ in 0..20 {
            step(&mut state, &mut skins, vec![]);
            assert_eq!(state.player.angle, 0.0);
        }
    }

    #[test]
    fn test_plane_flies_through_buildings() {
        let mut skins = catalog();
        let mut state = new_state(3);
        step(&mut state, &mut skins, vec![InputEvent::SkinCycle(-1)]);
        assert_eq!(state.player.skin.skin, "plane");
        step(&mut state, &mut skins, vec![InputEvent::space()]);
        for i in 0..400 {
            let events = if i % 20 == 0 { vec![InputEvent::space()] } else { vec![] };
            step(&mut state, &mut skins, events);
            if !state.obstacles.obstacles.is_empty() {
                break;
            }
        }
        let first = state.obstacles.obstacles.first().map(|o| o.style);
        assert_eq!(first, Some(ObstacleStyle::Building));
    }

    #[test]
    fn test_tool_side_path() {
        let mut skins = catalog();
        let mut state = new_state(1);
        let out = step(
            &mut state,
            &mut skins,
            vec![InputEvent::MenuShortcut(MenuKey::Creator)],
        );
        assert!(out.effects.contains(&Effect::OpenTool(MenuKey::Creator)));
        assert_eq!(state.menu.state(), MenuState::Creator);
        assert!(!state.player.alive);
        assert!(!out.effects.iter().any(|e| matches!(e, Effect::DrawPlayer { .. })));

        step(&mut state, &mut skins, vec![InputEvent::ToolClosed]);
        assert_eq!(state.menu.state(), MenuState::Main);
        assert!(state.player.alive);
    }

    #[test]
    fn test_tool_closing_with_no_skins_is_fatal() {
        let mut skins = catalog();
        let mut state = new_state(1);
        step(&mut state, &mut skins, vec![InputEvent::MenuShortcut(MenuKey::Delete)]);

        let mut empty = MemorySkinCatalog::new();
        let err = tick(
            &mut state,
            &TickInput::from_events(vec![InputEvent::ToolClosed]),
            &mut empty,
        )
        .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_quit_flag() {
        let mut skins = catalog();
        let mut state = new_state(1);
        assert!(step(&mut state, &mut skins, vec![InputEvent::Quit]).quit);
    }

    #[test]
    fn test_ground_scrolls_until_death() {
        let mut skins = catalog();
        let mut state = new_state(1);
        step(&mut state, &mut skins, vec![]);
        assert_eq!(state.ground_offset, 4.0);

        step(&mut state, &mut skins, vec![InputEvent::space()]);
        state.obstacles.obstacles.push(wall_at_player());
        step(&mut state, &mut skins, vec![]);
        let frozen = state.ground_offset;
        step(&mut state, &mut skins, vec![]);
        assert_eq!(state.ground_offset, frozen);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut skins = catalog();
        let mut a = new_state(99999);
        let mut b = new_state(99999);

        for i in 0..1500 {
            let events = if i % 25 == 0 { vec![InputEvent::space()] } else { vec![] };
            let out_a = step(&mut a, &mut skins, events.clone());
            let out_b = step(&mut b, &mut skins, events);
            assert_eq!(out_a.effects, out_b.effects);
        }
        assert_eq!(a.obstacles.obstacles, b.obstacles.obstacles);
        assert_eq!(a.player.pos, b.player.pos);
    }

    fn arb_event() -> impl Strategy<Value = InputEvent> {
        prop_oneof![
            4 => Just(InputEvent::space()),
            1 => Just(InputEvent::Restart),
            1 => Just(InputEvent::click(745.0, 40.0)),
            1 => Just(InputEvent::click(400.0, 500.0)),
            1 => Just(InputEvent::MenuShortcut(MenuKey::Creator)),
            1 => Just(InputEvent::MenuShortcut(MenuKey::Delete)),
            1 => Just(InputEvent::ToolClosed),
            1 => (-1i32..=1).prop_map(InputEvent::SkinCycle),
        ]
    }

    proptest! {
        #[test]
        fn prop_state_invariants_hold(
            seed in any::<u64>(),
            batches in prop::collection::vec(prop::collection::vec(arb_event(), 0..3), 1..400),
        ) {
            let mut skins = catalog();
            let mut state = new_state(seed);
            let mut last_score = 0;
            for batch in batches {
                let was_restart = batch.iter().any(|e| matches!(e, InputEvent::Restart))
                    || state.menu.state() == MenuState::Death;
                let out = tick(&mut state, &TickInput::from_events(batch), &mut skins).unwrap();
                let menu = state.menu.state();

                prop_assert_eq!(state.player.alive, menu.player_alive());
                if !menu.shows_field() {
                    prop_assert!(state.obstacles.obstacles.is_empty());
                }
                prop_assert!(state.player.pos.y <= state.tuning.player.ground_y);
                prop_assert!(state.score.best >= state.score.score);
                if !was_restart {
                    prop_assert!(state.score.score >= last_score);
                }
                last_score = state.score.score;
                prop_assert_eq!(
                    out.effects.iter().filter(|e| matches!(e, Effect::DrawHud(_))).count(),
                    1
                );
            }
        }
    }
}
