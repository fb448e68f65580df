use serde::Serialize;

use crate::api::error::LoadError;
use crate::api::types::{GameEvent, ImageHandle};
use crate::assets::error::GenerationError;
use crate::assets::manifest::AssetManifest;
use crate::input::queue::InputQueue;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Play surface width in scene units.
    pub world_width: f32,
    /// Play surface height in scene units.
    pub world_height: f32,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_width: 800.0,
            world_height: 600.0,
            max_events: 32,
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state.
    fn init(&mut self, ctx: &mut EngineContext);

    /// The game loop tick. `ctx.frame_dt_ms()` is the wall time since the last tick.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Serialize the current frame for the host. Only called after the game
    /// marked the frame dirty.
    fn render(&self, _ctx: &mut RenderContext) {}

    /// Apply a JSON configuration document.
    fn load_config(&mut self, _json: &str) -> Result<(), LoadError> {
        Ok(())
    }

    /// Replace the game's scripted content with a JSON document.
    fn load_content(&mut self, _json: &str) -> Result<(), LoadError> {
        Ok(())
    }

    /// The host wants to generate asset `key`. Returns the prompt to send to the
    /// image service, or `None` if the request is refused.
    fn request_asset(&mut self, _ctx: &mut EngineContext, _key: &str) -> Option<String> {
        None
    }

    /// The image service produced `handle` for asset `key`.
    fn asset_ready(&mut self, _ctx: &mut EngineContext, _key: &str, _handle: ImageHandle) {}

    /// The image service failed for an asset.
    fn asset_failed(&mut self, _ctx: &mut EngineContext, _error: GenerationError) {}

    /// The host already holds images for some assets.
    fn load_manifest(&mut self, _ctx: &mut EngineContext, _manifest: AssetManifest) {}
}

/// Mutable access to engine state, passed to every `Game` hook.
pub struct EngineContext {
    pub events: Vec<GameEvent>,
    max_events: usize,
    frame_dt_ms: f64,
    dirty: bool,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::with_config(&GameConfig::default())
    }

    pub fn with_config(config: &GameConfig) -> Self {
        Self {
            events: Vec::with_capacity(config.max_events),
            max_events: config.max_events,
            frame_dt_ms: 0.0,
            dirty: true,
        }
    }

    /// Emit a game event to be forwarded to TypeScript.
    /// Events past the per-frame capacity are dropped.
    pub fn emit_event(&mut self, event: GameEvent) {
        if self.events.len() >= self.max_events {
            log::warn!("event buffer full ({}), dropping {:?}", self.max_events, event);
            return;
        }
        self.events.push(event);
    }

    /// Request a fresh `Game::render` at the end of this frame.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Milliseconds elapsed since the previous tick.
    pub fn frame_dt_ms(&self) -> f64 {
        self.frame_dt_ms
    }

    /// Start a new frame: clear transient data and record the frame delta.
    pub fn begin_frame(&mut self, dt_ms: f64) {
        self.events.clear();
        self.frame_dt_ms = dt_ms.max(0.0);
    }

    /// Consume the dirty flag. Returns whether it was set.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Render context handed to `Game::render`.
pub struct RenderContext<'a> {
    pub frame: &'a mut String,
}

impl RenderContext<'_> {
    /// Replace the frame with the JSON encoding of `value`.
    pub fn write_json<T: Serialize>(&mut self, value: &T) -> Result<(), serde_json::Error> {
        *self.frame = serde_json::to_string(value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_event_respects_capacity() {
        let config = GameConfig { max_events: 2, ..GameConfig::default() };
        let mut ctx = EngineContext::with_config(&config);
        for i in 0..5 {
            ctx.emit_event(GameEvent::new(i, 0.0, 0.0, 0.0));
        }
        assert_eq!(ctx.events.len(), 2);
        assert_eq!(ctx.events[1].kind, 1.0);
    }

    #[test]
    fn begin_frame_clears_events_and_records_dt() {
        let mut ctx = EngineContext::new();
        ctx.emit_event(GameEvent::new(1, 0.0, 0.0, 0.0));
        ctx.begin_frame(16.5);
        assert!(ctx.events.is_empty());
        assert_eq!(ctx.frame_dt_ms(), 16.5);

        ctx.begin_frame(-3.0);
        assert_eq!(ctx.frame_dt_ms(), 0.0);
    }

    #[test]
    fn dirty_flag_is_consumed_once() {
        let mut ctx = EngineContext::new();
        assert!(ctx.take_dirty(), "fresh context starts dirty");
        assert!(!ctx.take_dirty());
        ctx.mark_dirty();
        assert!(ctx.is_dirty());
        assert!(ctx.take_dirty());
    }

    #[test]
    fn render_context_writes_json() {
        let mut frame = String::new();
        let mut rc = RenderContext { frame: &mut frame };
        rc.write_json(&vec![1, 2, 3]).unwrap();
        assert_eq!(frame, "[1,2,3]");
    }
}
