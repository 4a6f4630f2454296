//! Demo driver
//!
//! Produces the buttons a simple player would press for the current frame.
//! Used by the headless runner and for attract-mode style soak testing.

use super::entities::Enemy;
use super::input::InputState;
use super::platforms::Tile;
use super::player::Player;
use super::session::GameSession;
use super::state::SessionStatus;

/// How far ahead of the front foot enemies are considered a threat
const ENEMY_LOOKAHEAD: f32 = 48.0;
/// How far ahead a raised tile counts as a wall to hop
const WALL_LOOKAHEAD: f32 = 12.0;
/// Falling speed at which a banked jump gets spent
const RESCUE_DY: f32 = 2.0;

/// Buttons for this tick
pub fn autopilot(session: &GameSession) -> InputState {
    let mut input = InputState::default();
    match session.status() {
        SessionStatus::Start => input.up = true,
        SessionStatus::GameOver => {
            let cooldown = u64::from(session.tuning().game_over_cooldown_ticks);
            input.right = session.status_ticks() > cooldown;
        }
        SessionStatus::Playing => {
            let enemies: &[Enemy] = if session.context().elapsed_secs()
                >= session.tuning().enemy_activation_secs
            {
                session.enemies()
            } else {
                &[]
            };
            input = steer(session.player(), session.platforms().tiles(), enemies);
        }
    }
    input
}

/// Run with speed, hop gaps, walls and enemies
pub fn steer(player: &Player, tiles: &[Tile], enemies: &[Enemy]) -> InputState {
    let mut input = InputState::default();
    let feet = player.y + Player::HEIGHT;
    let front = player.x + Player::WIDTH;

    if player.state.is_grounded() {
        input.right = true;

        let ground_ahead = tiles
            .iter()
            .any(|t| t.x <= front && t.x + Tile::WIDTH > front && (t.y - feet).abs() <= 1.0);
        let wall_ahead = tiles
            .iter()
            .any(|t| t.x >= front && t.x <= front + WALL_LOOKAHEAD && t.y < feet - 1.0);
        let enemy_ahead = enemies.iter().any(|e| {
            e.x + Enemy::SIZE >= player.x
                && e.x <= front + ENEMY_LOOKAHEAD
                && e.y < feet
                && e.y + Enemy::SIZE > player.y
        });

        input.up = !ground_ahead || wall_ahead || enemy_ahead;
    } else if player.air_jumps > 0 && player.dy > RESCUE_DY {
        let ground_below = tiles
            .iter()
            .any(|t| t.x < front && t.x + Tile::WIDTH > player.x && t.y >= feet);
        input.up = !ground_below;
    }

    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::LogSound;
    use crate::sim::player::PlayerState;
    use crate::tuning::Tuning;

    fn grounded_player() -> Player {
        let mut player = Player::new();
        player.y = 160.0 - Player::HEIGHT;
        player
    }

    fn floor(from: f32, to: f32, y: f32) -> Vec<Tile> {
        let mut tiles = Vec::new();
        let mut x = from;
        while x < to {
            tiles.push(Tile::new(x, y));
            x += Tile::WIDTH;
        }
        tiles
    }

    #[test]
    fn test_start_presses_up() {
        let session = GameSession::new(Tuning::default(), 1, Box::new(LogSound)).unwrap();
        let input = autopilot(&session);
        assert!(input.up);
    }

    #[test]
    fn test_game_over_waits_for_cooldown() {
        let mut session = GameSession::new(Tuning::default(), 1, Box::new(LogSound)).unwrap();
        session.input_mut().up = true;
        session.update();
        session.player_mut().is_dead = true;
        session.update();
        assert_eq!(session.status(), SessionStatus::GameOver);
        assert!(!autopilot(&session).right);

        for _ in 0..=session.tuning().game_over_cooldown_ticks {
            session.update();
        }
        assert!(autopilot(&session).right);
    }

    #[test]
    fn test_runs_on_solid_ground() {
        let input = steer(&grounded_player(), &floor(0.0, 300.0, 160.0), &[]);
        assert!(input.right);
        assert!(!input.up);
    }

    #[test]
    fn test_jumps_at_edge() {
        // Floor ends under the player, front foot over the gap
        let input = steer(&grounded_player(), &floor(0.0, 60.0, 160.0), &[]);
        assert!(input.up);
    }

    #[test]
    fn test_jumps_wall() {
        let mut tiles = floor(0.0, 300.0, 160.0);
        tiles.push(Tile::new(80.0, 130.0));
        tiles.sort_by(|a, b| a.x.total_cmp(&b.x));
        let input = steer(&grounded_player(), &tiles, &[]);
        assert!(input.up);
    }

    #[test]
    fn test_air_jump_only_when_falling_into_gap() {
        let mut player = grounded_player();
        player.state = PlayerState::Airborne;
        player.dy = 3.0;
        player.air_jumps = 1;

        assert!(steer(&player, &[], &[]).up);
        assert!(!steer(&player, &floor(0.0, 300.0, 160.0), &[]).up);

        player.air_jumps = 0;
        assert!(!steer(&player, &[], &[]).up);
    }
}
