use bloom_engine::{
    AssetManifest, EngineContext, Game, GameConfig, GenerationError, ImageHandle, InputEvent,
    InputQueue, RenderContext,
};

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export generic
/// structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    config: GameConfig,
    initialized: bool,
    /// Last rendered frame (JSON) and how many times it was rebuilt.
    frame: String,
    frame_version: u32,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        Self {
            game,
            ctx: EngineContext::with_config(&config),
            input: InputQueue::new(),
            config,
            initialized: false,
            frame: String::new(),
            frame_version: 0,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.config = self.game.config();
        self.ctx = EngineContext::with_config(&self.config);
        self.game.init(&mut self.ctx);
        self.initialized = true;
        self.refresh_frame();
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: update the game with the frame delta (seconds), drain
    /// input, and re-render if the game changed anything visible.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        self.ctx.begin_frame(f64::from(dt) * 1000.0);
        self.game.update(&mut self.ctx, &self.input);
        self.input.drain();
        self.refresh_frame();
    }

    pub fn load_config(&mut self, json: &str) {
        match self.game.load_config(json) {
            Ok(()) => {
                log::info!("config loaded");
                self.ctx.mark_dirty();
                self.refresh_frame();
            }
            Err(err) => log::error!("config rejected: {}", err),
        }
    }

    pub fn load_content(&mut self, json: &str) {
        match self.game.load_content(json) {
            Ok(()) => {
                log::info!("content loaded");
                self.ctx.mark_dirty();
                self.refresh_frame();
            }
            Err(err) => log::error!("content rejected: {}", err),
        }
    }

    pub fn load_manifest(&mut self, json: &str) {
        match AssetManifest::from_json(json) {
            Ok(manifest) => {
                self.game.load_manifest(&mut self.ctx, manifest);
                self.refresh_frame();
            }
            Err(err) => log::error!("manifest rejected: {}", err),
        }
    }

    pub fn request_asset(&mut self, key: &str) -> Option<String> {
        let prompt = self.game.request_asset(&mut self.ctx, key);
        self.refresh_frame();
        prompt
    }

    pub fn asset_ready(&mut self, key: &str, handle: &str) {
        self.game.asset_ready(&mut self.ctx, key, ImageHandle::new(handle));
        self.refresh_frame();
    }

    pub fn asset_failed(&mut self, key: &str, message: &str) {
        self.game
            .asset_failed(&mut self.ctx, GenerationError::new(key, message));
        self.refresh_frame();
    }

    fn refresh_frame(&mut self) {
        if !self.ctx.take_dirty() {
            return;
        }
        let mut render_ctx = RenderContext {
            frame: &mut self.frame,
        };
        self.game.render(&mut render_ctx);
        self.frame_version = self.frame_version.wrapping_add(1);
    }

    // ---- Accessors read by TypeScript via wasm_bindgen exports ----

    pub fn frame_json(&self) -> String {
        self.frame.clone()
    }

    pub fn frame_version(&self) -> u32 {
        self.frame_version
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }

    pub fn max_events(&self) -> u32 {
        self.config.max_events as u32
    }

    pub fn game(&self) -> &G {
        &self.game
    }
}
