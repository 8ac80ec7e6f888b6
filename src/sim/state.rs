//! Session state and phase transitions
//!
//! One `GameState` value owns everything a play-through mutates. It is
//! constructed explicitly and handed to the frame loop.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::avatar::Avatar;
use super::obstacle::Obstacle;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Welcome screen, avatar bobbing, no obstacles
    Idle,
    /// Physics active
    Running,
    /// Running suspended; resumes to Running only
    Paused,
    /// Terminal until an explicit restart
    GameOver,
}

/// Things collaborators react to (audio cues, HUD, persistence)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Flap,
    Scored { score: u32 },
    GameOver { score: u32, best: u32, new_best: bool },
}

#[derive(Debug, Clone)]
pub struct GameState {
    /// Screen size in CSS pixels
    pub width: f32,
    pub height: f32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub avatar: Avatar,
    /// Active obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Milliseconds since the last spawn
    pub spawn_timer_ms: f32,
    pub score: u32,
    /// Never decreases across sessions
    pub best_score: u32,
    /// Simulated frames in the current session
    pub frames: u64,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Timestamp of the previous frame; `None` right after (re)arming
    pub(crate) last_frame_ms: Option<f64>,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Idle session on a screen of the given size
    pub fn new(width: f32, height: f32, tuning: Tuning, seed: u64, best_score: u32) -> Self {
        let avatar = Avatar::new(width, height, &tuning);
        Self {
            width,
            height,
            tuning,
            phase: GamePhase::Idle,
            avatar,
            obstacles: Vec::new(),
            spawn_timer_ms: 0.0,
            score: 0,
            best_score,
            frames: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            last_frame_ms: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new obstacle ID
    pub fn next_obstacle_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Begin a session from the welcome screen or after a game over
    pub fn start(&mut self, now_ms: f64) -> bool {
        if !matches!(self.phase, GamePhase::Idle | GamePhase::GameOver) {
            return false;
        }
        self.score = 0;
        self.obstacles.clear();
        self.spawn_timer_ms = 0.0;
        self.frames = 0;
        self.avatar = Avatar::new(self.width, self.height, &self.tuning);
        self.phase = GamePhase::Running;
        self.last_frame_ms = Some(now_ms);
        log::info!("Session started (best {})", self.best_score);
        true
    }

    /// Start over after a game over
    pub fn restart(&mut self, now_ms: f64) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        self.start(now_ms)
    }

    /// Running <-> Paused. Resuming re-arms the frame clock at `now_ms`.
    pub fn toggle_pause(&mut self, now_ms: f64) -> bool {
        match self.phase {
            GamePhase::Running => {
                self.phase = GamePhase::Paused;
                log::info!("Paused at score {}", self.score);
                true
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Running;
                self.last_frame_ms = Some(now_ms);
                log::info!("Resumed");
                true
            }
            _ => false,
        }
    }

    /// Terminate the session. A second call is a no-op.
    pub fn game_over(&mut self) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        self.phase = GamePhase::GameOver;

        let new_best = self.score > self.best_score;
        if new_best {
            self.best_score = self.score;
        }
        self.events.push(GameEvent::GameOver {
            score: self.score,
            best: self.best_score,
            new_best,
        });
        log::info!(
            "Game over: score {} best {}{}",
            self.score,
            self.best_score,
            if new_best { " (new best)" } else { "" }
        );
        true
    }

    /// Flap. Has no effect unless running.
    pub fn flap(&mut self) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        self.avatar.impulse();
        self.events.push(GameEvent::Flap);
        true
    }

    /// Screen resized. Outside of play the avatar follows the new centre.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        if matches!(self.phase, GamePhase::Idle | GamePhase::GameOver) {
            self.avatar
                .recenter(width, height, self.tuning.avatar_x_fraction);
        }
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(400.0, 600.0, Tuning::default(), 42, 0)
    }

    #[test]
    fn test_starts_idle() {
        let s = state();
        assert_eq!(s.phase, GamePhase::Idle);
        assert!(s.obstacles.is_empty());
        assert_eq!(s.avatar.pos.y, 300.0);
    }

    #[test]
    fn test_pause_only_from_running() {
        let mut s = state();
        assert!(!s.toggle_pause(0.0));
        assert_eq!(s.phase, GamePhase::Idle);

        assert!(s.start(0.0));
        assert!(s.toggle_pause(10.0));
        assert_eq!(s.phase, GamePhase::Paused);
        // start is not a way out of pause
        assert!(!s.start(20.0));
        assert!(s.toggle_pause(500.0));
        assert_eq!(s.phase, GamePhase::Running);
        assert_eq!(s.last_frame_ms, Some(500.0));
    }

    #[test]
    fn test_game_over_only_from_running() {
        let mut s = state();
        assert!(!s.game_over());
        assert_eq!(s.phase, GamePhase::Idle);

        s.start(0.0);
        s.toggle_pause(0.0);
        assert!(!s.game_over());
        assert_eq!(s.phase, GamePhase::Paused);
    }

    #[test]
    fn test_game_over_is_idempotent() {
        let mut s = state();
        s.start(0.0);
        s.score = 3;
        assert!(s.game_over());
        assert!(!s.game_over());
        assert_eq!(
            s.drain_events(),
            vec![GameEvent::GameOver {
                score: 3,
                best: 3,
                new_best: true
            }]
        );
    }

    #[test]
    fn test_best_score_never_decreases() {
        let mut s = GameState::new(400.0, 600.0, Tuning::default(), 1, 10);
        s.start(0.0);
        s.score = 4;
        s.game_over();
        assert_eq!(s.best_score, 10);
        assert_eq!(
            s.drain_events(),
            vec![GameEvent::GameOver {
                score: 4,
                best: 10,
                new_best: false
            }]
        );
    }

    #[test]
    fn test_restart_resets_session() {
        let mut s = state();
        s.start(0.0);
        s.score = 7;
        s.avatar.velocity = 3.0;
        s.avatar.pos.y = 500.0;
        let id = s.next_obstacle_id();
        s.obstacles
            .push(Obstacle::with_top_height(id, 100.0, 200.0, &s.tuning));
        s.spawn_timer_ms = 900.0;

        assert!(!s.restart(0.0));
        s.game_over();
        assert!(s.restart(1000.0));

        assert_eq!(s.phase, GamePhase::Running);
        assert_eq!(s.score, 0);
        assert_eq!(s.best_score, 7);
        assert!(s.obstacles.is_empty());
        assert_eq!(s.spawn_timer_ms, 0.0);
        assert_eq!(s.avatar.velocity, 0.0);
        assert_eq!(s.avatar.pos.y, 300.0);
    }

    #[test]
    fn test_flap_only_while_running() {
        let mut s = state();
        assert!(!s.flap());
        s.start(0.0);
        assert!(s.flap());
        assert_eq!(s.avatar.velocity, s.tuning.impulse_velocity);
        assert_eq!(s.drain_events(), vec![GameEvent::Flap]);
        s.game_over();
        s.drain_events();
        assert!(!s.flap());
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_resize_recenters_outside_play() {
        let mut s = state();
        s.resize(1000.0, 800.0);
        assert_eq!(s.avatar.pos.x, 200.0);
        assert_eq!(s.avatar.pos.y, 400.0);

        s.start(0.0);
        s.avatar.pos.y = 123.0;
        s.resize(500.0, 500.0);
        assert_eq!(s.avatar.pos.y, 123.0);
        assert_eq!(s.height, 500.0);
    }
}
