//! Sound effects
//!
//! Three fire-and-forget cues. Each trigger rewinds its clip and plays it
//! again; failures (autoplay policy, missing file) are dropped silently.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Avatar flapped
    Jump,
    /// Obstacle passed
    Score,
    /// Session ended
    GameOver,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 3] = [SoundEffect::Jump, SoundEffect::Score, SoundEffect::GameOver];

    pub fn name(&self) -> &'static str {
        match self {
            SoundEffect::Jump => "jump",
            SoundEffect::Score => "score",
            SoundEffect::GameOver => "gameover",
        }
    }

    pub fn asset_path(&self) -> &'static str {
        match self {
            SoundEffect::Jump => "assets/jump.mp3",
            SoundEffect::Score => "assets/score.mp3",
            SoundEffect::GameOver => "assets/gameover.mp3",
        }
    }

    /// Cue for a session event
    pub fn for_event(event: &GameEvent) -> SoundEffect {
        match event {
            GameEvent::Flap => SoundEffect::Jump,
            GameEvent::Scored { .. } => SoundEffect::Score,
            GameEvent::GameOver { .. } => SoundEffect::GameOver,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::HtmlAudioElement;

    use super::SoundEffect;

    /// Audio manager for the game
    pub struct AudioManager {
        /// Indexed like `SoundEffect::ALL`; `None` when the element could not be created
        clips: Vec<Option<HtmlAudioElement>>,
        volume: f32,
    }

    impl AudioManager {
        /// Create and preload one element per cue
        pub fn new(volume: f32) -> Self {
            let clips = SoundEffect::ALL
                .iter()
                .map(|effect| match HtmlAudioElement::new_with_src(effect.asset_path()) {
                    Ok(clip) => {
                        clip.set_preload("auto");
                        clip.load();
                        clip.set_volume(volume as f64);
                        Some(clip)
                    }
                    Err(_) => {
                        log::warn!("Failed to create audio element for {}", effect.name());
                        None
                    }
                })
                .collect();
            Self { clips, volume }
        }

        pub fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
            for clip in self.clips.iter().flatten() {
                clip.set_volume(self.volume as f64);
            }
        }

        /// Play a sound effect from the start
        pub fn play(&self, effect: SoundEffect) {
            if self.volume <= 0.0 {
                return;
            }
            let index = SoundEffect::ALL
                .iter()
                .position(|e| *e == effect)
                .unwrap_or_default();
            let Some(Some(clip)) = self.clips.get(index) else {
                return;
            };
            clip.set_current_time(0.0);
            // Autoplay rejections are swallowed
            if let Ok(promise) = clip.play() {
                wasm_bindgen_futures::spawn_local(async move {
                    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
                });
            }
        }
    }
}
