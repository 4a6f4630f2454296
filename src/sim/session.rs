//! Top-level game session
//!
//! Owns the player, the platform run and the peripheral entities, and drives
//! them in a fixed order each tick:
//! input (already latched) → player → platforms → pickups / enemies → loss check.
//! Sound cues raised during the tick are flushed to the audio manager at the end.

use glam::Vec2;

use super::entities::{Angel, Enemy, Sparkle, Star, Title};
use super::input::InputState;
use super::platforms::{PlatformGenerator, difficulty_at};
use super::player::{Player, PlayerState};
use super::rect::check_collision;
use super::state::{GameEvent, SessionStatus, SimulationContext};
use crate::audio::{AudioManager, SoundEffect, SoundTrigger};
use crate::highscores::HighScores;
use crate::platform::{Renderer, TextOutput, TextX, TextY};
use crate::tuning::{Tuning, TuningError};

/// One game session: title screen, runs and game over screens
pub struct GameSession {
    ctx: SimulationContext,
    status: SessionStatus,
    paused: bool,
    /// Ticks spent in the current status
    status_ticks: u64,
    show_prompt: bool,

    score: u64,
    score_increment: u64,
    high_scores: HighScores,

    player: Player,
    platforms: PlatformGenerator,
    stars: Vec<Star>,
    angel: Angel,
    enemies: Vec<Enemy>,
    sparkles: Vec<Sparkle>,
    title: Title,

    audio: AudioManager,
}

impl GameSession {
    /// Create a session on the title screen
    pub fn new(tuning: Tuning, seed: u64, sound: Box<dyn SoundTrigger>) -> Result<Self, TuningError> {
        tuning.validate()?;

        let mut ctx = SimulationContext::new(tuning, seed);
        let stars = Star::field(&mut ctx.rng, ctx.tuning.star_count);
        let platforms = PlatformGenerator::new(ctx.tuning.initial_tiles, ctx.tuning.initial_tile_y);
        let mut angel = Angel::default();
        angel.reset(platforms.tiles(), &mut ctx.rng);
        let enemy_count = ctx.tuning.enemy_count;
        let enemies = (0..enemy_count).map(|_| Enemy::new(&mut ctx.rng)).collect();

        log::info!("Session created (seed {})", seed);

        Ok(Self {
            ctx,
            status: SessionStatus::Start,
            paused: false,
            status_ticks: 0,
            show_prompt: true,
            score: 0,
            score_increment: 1,
            high_scores: HighScores::new(),
            player: Player::new(),
            platforms,
            stars,
            angel,
            enemies,
            sparkles: Vec::new(),
            title: Title::default(),
            audio: AudioManager::new(sound),
        })
    }

    // === Accessors ===

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn status_ticks(&self) -> u64 {
        self.status_ticks
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn score_increment(&self) -> u64 {
        self.score_increment
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn platforms(&self) -> &PlatformGenerator {
        &self.platforms
    }

    pub fn angel(&self) -> &Angel {
        &self.angel
    }

    pub fn angel_mut(&mut self) -> &mut Angel {
        &mut self.angel
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    pub fn sparkles(&self) -> &[Sparkle] {
        &self.sparkles
    }

    pub fn context(&self) -> &SimulationContext {
        &self.ctx
    }

    pub fn tuning(&self) -> &Tuning {
        &self.ctx.tuning
    }

    pub fn scroll_speed(&self) -> f32 {
        self.ctx.scroll_speed
    }

    /// Button state the host writes into before each tick
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.ctx.input
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager {
        &mut self.audio
    }

    /// Difficulty stage of the current run
    pub fn stage(&self) -> usize {
        difficulty_at(&self.ctx.tuning.difficulty, self.ctx.elapsed_secs()).0
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            log::info!("{}", if paused { "Paused" } else { "Resumed" });
        }
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) {
        self.set_paused(!self.paused);
    }

    fn enemies_active(&self) -> bool {
        self.ctx.elapsed_secs() >= self.ctx.tuning.enemy_activation_secs
    }

    // === Tick ===

    /// Advance the session by one tick
    pub fn update(&mut self) {
        if self.paused {
            return;
        }

        if self.ctx.input.sound_toggle {
            self.ctx.input.sound_toggle = false;
            self.audio.toggle_muted();
        }

        for star in &mut self.stars {
            star.update();
        }

        self.status_ticks += 1;
        match self.status {
            SessionStatus::Start => self.update_start(),
            SessionStatus::Playing => self.update_playing(),
            SessionStatus::GameOver => self.update_game_over(),
        }

        self.flush_events();
    }

    fn update_start(&mut self) {
        self.title.flash();

        let blink = u64::from(self.ctx.tuning.prompt_blink_ticks.max(1));
        if self.status_ticks % blink == 0 {
            self.show_prompt = !self.show_prompt;
        }

        if self.ctx.input.any_direction() {
            // The press that starts the run must not steer the first tick of it
            self.ctx.input.clear_directions();
            self.start_run();
        }
    }

    fn update_playing(&mut self) {
        self.ctx.elapsed_ticks += 1;

        if !self.title.is_hidden() {
            self.title.slide_out();
        }

        self.player.update(&mut self.ctx, self.platforms.tiles());
        self.platforms.update(&mut self.ctx);

        let scroll = self.ctx.scroll_speed;
        let alive = self.player.state != PlayerState::Obliterating;

        // Distance score, worth more in later stages
        self.score_increment = self.stage() as u64 + 1;
        let interval = self.ctx.tuning.score_interval_ticks.max(1);
        if alive && self.ctx.elapsed_ticks % interval == 0 {
            self.score += self.score_increment;
        }

        self.angel.update(scroll);
        if alive && check_collision(&self.player.rect(), &self.angel.hitbox()).collided {
            self.collect_angel();
        } else if self.angel.is_offscreen() {
            self.angel.reset(self.platforms.tiles(), &mut self.ctx.rng);
        }

        if self.enemies_active() {
            for enemy in &mut self.enemies {
                enemy.update(scroll);
                if self.player.state != PlayerState::Obliterating
                    && check_collision(&self.player.rect(), &enemy.rect()).collided
                {
                    log::debug!("Enemy hit at ({}, {})", enemy.x, enemy.y);
                    self.player.obliterate();
                    self.ctx.emit(GameEvent::Crash);
                }
                if enemy.is_offscreen() {
                    enemy.recycle(&mut self.ctx.rng);
                }
            }
        }

        for sparkle in &mut self.sparkles {
            sparkle.update(scroll);
        }
        self.sparkles.retain(|s| !s.is_finished());

        if self.player.is_dead || self.player.y > self.ctx.tuning.out_of_bounds_y {
            self.game_over();
        }
    }

    fn update_game_over(&mut self) {
        if self.status_ticks <= u64::from(self.ctx.tuning.game_over_cooldown_ticks) {
            self.ctx.input.clear_directions();
            return;
        }

        let input = self.ctx.input;
        if input.up {
            self.ctx.input.clear_directions();
            self.return_to_title();
        } else if input.left || input.right {
            self.ctx.input.clear_directions();
            self.start_run();
        }
    }

    fn collect_angel(&mut self) {
        let center = self.angel.hitbox().center();
        self.player.air_jumps += 1;
        self.score += self.ctx.tuning.angel_bonus;
        self.sparkles.extend(Sparkle::burst(Vec2::new(center.x, center.y)));
        self.ctx.emit(GameEvent::PowerUp);
        log::debug!("Angel collected, {} air jumps banked", self.player.air_jumps);

        self.angel.reset(self.platforms.tiles(), &mut self.ctx.rng);
    }

    /// Rebuild the world for a fresh run
    fn reset_world(&mut self) {
        self.ctx.reset_run();
        self.player.reset();
        self.platforms =
            PlatformGenerator::new(self.ctx.tuning.initial_tiles, self.ctx.tuning.initial_tile_y);
        self.angel.reset(self.platforms.tiles(), &mut self.ctx.rng);
        for enemy in &mut self.enemies {
            enemy.recycle(&mut self.ctx.rng);
        }
        self.sparkles.clear();
        self.score = 0;
        self.score_increment = 1;
    }

    fn start_run(&mut self) {
        self.reset_world();
        self.status = SessionStatus::Playing;
        self.status_ticks = 0;
        self.show_prompt = false;
        self.ctx.emit(GameEvent::RunStarted);
        log::info!("Run started");
    }

    fn game_over(&mut self) {
        let stage = self.stage();
        self.status = SessionStatus::GameOver;
        self.status_ticks = 0;
        self.ctx.scroll_speed = 0.0;
        self.ctx.input.clear_directions();

        let rank = self
            .high_scores
            .add_score(self.score, stage, self.ctx.elapsed_ticks);
        log::info!(
            "Game over: score {} (stage {}, {} ticks, rank {:?})",
            self.score,
            stage,
            self.ctx.elapsed_ticks,
            rank
        );
        self.ctx.emit(GameEvent::GameOver);
    }

    fn return_to_title(&mut self) {
        self.reset_world();
        self.title.reset();
        self.status = SessionStatus::Start;
        self.status_ticks = 0;
        self.show_prompt = true;
        log::info!("Back to title");
    }

    fn flush_events(&mut self) {
        for event in self.ctx.events.drain(..) {
            self.audio.play(SoundEffect::for_event(event));
        }
    }

    // === Draw ===

    /// Draw the current frame (runs every frame, paused or not)
    pub fn draw(&self, renderer: &mut dyn Renderer, text: &mut dyn TextOutput) {
        renderer.clear();

        for star in &self.stars {
            star.draw(renderer);
        }

        match self.status {
            SessionStatus::Start => {
                self.title.draw(renderer);
                if self.show_prompt {
                    text.print("press left or up", TextX::Center, TextY::At(156.0));
                    text.print("key to start", TextX::Center, TextY::At(168.0));
                }
                if !self.high_scores.is_empty() {
                    let best = format!("best {}", self.high_scores.top_score());
                    text.print(&best, TextX::Center, TextY::At(200.0));
                }
            }
            SessionStatus::Playing => {
                if !self.title.is_hidden() {
                    self.title.draw(renderer);
                }
                self.platforms.draw(renderer);
                self.angel.draw(renderer);
                if self.enemies_active() {
                    for enemy in &self.enemies {
                        enemy.draw(renderer);
                    }
                }
                for sparkle in &self.sparkles {
                    sparkle.draw(renderer);
                }
                self.player.draw(renderer);

                text.print(&format!("score {}", self.score), TextX::At(4.0), TextY::At(4.0));
                if self.player.air_jumps > 0 {
                    let jumps = format!("wings {}", self.player.air_jumps);
                    text.print(&jumps, TextX::At(4.0), TextY::At(16.0));
                }
            }
            SessionStatus::GameOver => {
                self.platforms.draw(renderer);
                self.player.draw(renderer);

                text.print("game over", TextX::Center, TextY::Middle);
                text.print(&format!("score {}", self.score), TextX::Center, TextY::At(144.0));
                let best = format!("best {}", self.high_scores.top_score());
                text.print(&best, TextX::Center, TextY::At(156.0));
                if self.status_ticks > u64::from(self.ctx.tuning.game_over_cooldown_ticks) {
                    text.print("left or right to retry", TextX::Center, TextY::At(184.0));
                    text.print("up for title", TextX::Center, TextY::At(196.0));
                }
            }
        }

        if self.paused {
            text.print("paused", TextX::Center, TextY::At(32.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::LogSound;
    use crate::audio::tests::RecordingSound;
    use crate::platform::{DrawRecorder, SpriteSheet};
    use crate::sim::platforms::{SPAWN_THRESHOLD_X, Tile};

    fn session(seed: u64) -> GameSession {
        GameSession::new(Tuning::default(), seed, Box::new(LogSound)).unwrap()
    }

    fn playing_session(seed: u64) -> GameSession {
        let mut session = session(seed);
        session.input_mut().up = true;
        session.update();
        assert_eq!(session.status(), SessionStatus::Playing);
        session
    }

    #[test]
    fn test_rejects_invalid_tuning() {
        let tuning = Tuning {
            difficulty: Vec::new(),
            ..Default::default()
        };
        assert!(GameSession::new(tuning, 1, Box::new(LogSound)).is_err());
    }

    #[test]
    fn test_starts_idle() {
        let mut s = session(1);
        assert_eq!(s.status(), SessionStatus::Start);
        for _ in 0..100 {
            s.update();
        }
        assert_eq!(s.status(), SessionStatus::Start);
        assert_eq!(s.context().elapsed_ticks, 0);
    }

    #[test]
    fn test_press_starts_run_and_clears_input() {
        let mut s = session(1);
        {
            let input = s.input_mut();
            input.up = true;
            input.left = true;
            input.right = true;
        }
        s.update();
        assert_eq!(s.status(), SessionStatus::Playing);
        let input = s.context().input;
        assert!(!input.up && !input.left && !input.right);
    }

    #[test]
    fn test_sound_toggle_consumed() {
        let mut s = session(1);
        s.input_mut().sound_toggle = true;
        s.update();
        assert!(s.audio_mut().is_muted());
        assert!(!s.context().input.sound_toggle);
    }

    #[test]
    fn test_dead_player_ends_run() {
        let mut s = playing_session(1);
        s.update();
        s.player_mut().is_dead = true;
        s.update();
        assert_eq!(s.status(), SessionStatus::GameOver);
        assert_eq!(s.scroll_speed(), 0.0);
    }

    #[test]
    fn test_falling_out_of_bounds_ends_run() {
        let mut s = playing_session(1);
        s.player_mut().y = 501.0;
        s.update();
        assert_eq!(s.status(), SessionStatus::GameOver);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut s = playing_session(1);
        for _ in 0..10 {
            s.update();
        }
        let ticks = s.context().elapsed_ticks;
        let tiles = s.platforms().tiles().to_vec();
        let player = s.player().clone();

        s.set_paused(true);
        s.input_mut().up = true;
        for _ in 0..50 {
            s.update();
        }
        assert_eq!(s.context().elapsed_ticks, ticks);
        assert_eq!(s.platforms().tiles(), tiles.as_slice());
        assert_eq!(s.player(), &player);
        assert!(s.context().input.up);

        // Draw still runs while paused
        let mut recorder = DrawRecorder::default();
        let mut text = DrawRecorder::default();
        s.draw(&mut recorder, &mut text);
        assert!(text.printed("paused"));
        assert!(recorder.count(SpriteSheet::Tiles) > 0);

        s.toggle_pause();
        s.update();
        assert_eq!(s.context().elapsed_ticks, ticks + 1);
    }

    #[test]
    fn test_player_lands_on_opening_runway() {
        let mut s = playing_session(3);
        for _ in 0..200 {
            s.update();
        }
        let player = s.player();
        assert_eq!(s.status(), SessionStatus::Playing);
        assert_eq!(player.state, PlayerState::Skating);
        assert_eq!(player.y, s.tuning().initial_tile_y - Player::HEIGHT);
        assert_eq!(s.scroll_speed(), s.tuning().skating_speed);
    }

    #[test]
    fn test_score_accumulates_while_alive() {
        let mut s = playing_session(3);
        for _ in 0..100 {
            s.update();
        }
        assert_eq!(s.score(), 10);
        assert_eq!(s.score_increment(), 1);
    }

    #[test]
    fn test_angel_grants_air_jump() {
        let mut s = playing_session(5);
        for _ in 0..60 {
            s.update();
        }
        let score = s.score();
        let player = s.player().rect();
        let angel = s.angel_mut();
        angel.x = player.x + 5.0;
        angel.base_y = player.y + 10.0;

        s.update();
        assert_eq!(s.player().air_jumps, 1);
        assert!(s.score() >= score + s.tuning().angel_bonus);
        assert_eq!(s.sparkles().len(), 4);
        // Re-placed ahead of the player
        assert!(s.angel().x > crate::consts::SCREEN_WIDTH - 4.0);
    }

    #[test]
    fn test_enemy_obliterates_player() {
        let mut s = playing_session(5);
        for _ in 0..80 {
            s.update();
        }
        assert!(!s.enemies_active());
        let activation = (s.tuning().enemy_activation_secs * 60.0) as u64;
        s.ctx.elapsed_ticks = activation;
        assert!(s.enemies_active());

        let player = s.player().rect();
        let enemy = &mut s.enemies_mut()[0];
        enemy.x = player.x + 2.0;
        enemy.y = player.y + 2.0;
        enemy.speed = 0.0;

        s.update();
        assert_eq!(s.player().state, PlayerState::Obliterating);
        // The world stops on the next player step
        s.update();
        assert_eq!(s.scroll_speed(), 0.0);

        for _ in 0..60 {
            s.update();
        }
        assert_eq!(s.status(), SessionStatus::GameOver);
        assert!(s.player().is_dead);
    }

    #[test]
    fn test_game_over_restart_and_title() {
        let mut s = playing_session(1);
        for _ in 0..50 {
            s.update();
        }
        s.player_mut().is_dead = true;
        s.update();
        assert_eq!(s.status(), SessionStatus::GameOver);
        let final_score = s.score();
        assert_eq!(s.high_scores().top_score(), final_score);

        // Presses during the cooldown are swallowed
        s.input_mut().right = true;
        s.update();
        assert_eq!(s.status(), SessionStatus::GameOver);
        assert!(!s.context().input.right);

        for _ in 0..s.tuning().game_over_cooldown_ticks {
            s.update();
        }
        s.input_mut().right = true;
        s.update();
        assert_eq!(s.status(), SessionStatus::Playing);
        assert_eq!(s.score(), 0);
        assert_eq!(s.player(), &Player::new());
        assert_eq!(s.context().elapsed_ticks, 0);
        assert_eq!(s.high_scores().top_score(), final_score);

        // Die again and go back to the title
        s.player_mut().is_dead = true;
        s.update();
        for _ in 0..=s.tuning().game_over_cooldown_ticks {
            s.update();
        }
        s.input_mut().up = true;
        s.update();
        assert_eq!(s.status(), SessionStatus::Start);
        assert!(!s.context().input.up);
    }

    #[test]
    fn test_events_reach_sound_output() {
        let sink = RecordingSound::default();
        let mut s = GameSession::new(Tuning::default(), 1, Box::new(sink.clone())).unwrap();
        s.input_mut().up = true;
        s.update();
        assert_eq!(sink.played.borrow()[0].0, SoundEffect::Start);

        for _ in 0..s.tuning().player_activation_ticks + 30 {
            s.update();
        }
        s.input_mut().up = true;
        s.update();
        let played: Vec<SoundEffect> = sink.played.borrow().iter().map(|p| p.0).collect();
        assert!(played.contains(&SoundEffect::Jump));
    }

    #[test]
    fn test_locked_audio_does_not_disturb_simulation() {
        let locked = RecordingSound {
            locked: true,
            ..Default::default()
        };
        let mut quiet = GameSession::new(Tuning::default(), 8, Box::new(locked)).unwrap();
        let mut loud = session(8);
        for s in [&mut quiet, &mut loud] {
            s.input_mut().up = true;
            for _ in 0..300 {
                s.update();
            }
        }
        assert_eq!(quiet.player(), loud.player());
        assert_eq!(quiet.platforms().tiles(), loud.platforms().tiles());
    }

    #[test]
    fn test_runway_always_ahead() {
        let mut s = playing_session(9);
        let mut short_last = false;
        for _ in 0..5000 {
            s.update();
            if s.status() != SessionStatus::Playing {
                break;
            }
            let last = s.platforms().last_tile_x().unwrap();
            let short = last < SPAWN_THRESHOLD_X;
            assert!(!(short && short_last));
            short_last = short;
        }
    }

    #[test]
    fn test_draw_per_status() {
        let mut s = session(2);
        let mut renderer = DrawRecorder::default();
        let mut text = DrawRecorder::default();

        s.draw(&mut renderer, &mut text);
        assert_eq!(renderer.count(SpriteSheet::Title), 1);
        assert_eq!(renderer.count(SpriteSheet::Tiles), 0);
        assert!(text.printed("key to start"));

        s.input_mut().left = true;
        s.update();
        text = DrawRecorder::default();
        s.draw(&mut renderer, &mut text);
        assert_eq!(renderer.count(SpriteSheet::Player), 1);
        assert_eq!(renderer.count(SpriteSheet::Tiles), s.platforms().tiles().len());
        assert!(text.printed("score 0"));

        s.player_mut().is_dead = true;
        s.update();
        text = DrawRecorder::default();
        s.draw(&mut renderer, &mut text);
        assert!(text.printed("game over"));
        assert!(!text.printed("retry"));
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = session(77);
        let mut b = session(77);
        for tick in 0..1500u32 {
            for s in [&mut a, &mut b] {
                let input = s.input_mut();
                input.up = tick % 45 == 0;
                input.right = tick % 200 < 50;
                s.update();
            }
        }
        assert_eq!(a.status(), b.status());
        assert_eq!(a.score(), b.score());
        assert_eq!(a.player(), b.player());
        assert_eq!(a.platforms().tiles(), b.platforms().tiles());
        assert_eq!(a.angel(), b.angel());
    }

    #[test]
    fn test_empty_tiles_have_no_collisions() {
        let mut s = playing_session(4);
        s.platforms = PlatformGenerator::from_tiles(Vec::<Tile>::new());
        for _ in 0..s.tuning().player_activation_ticks + 5 {
            s.update();
        }
        assert_eq!(s.player().x, crate::consts::PLAYER_START_X);
    }
}
