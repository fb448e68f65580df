use bloom_engine::*;

use crate::assets::AssetId;
use crate::config::PlayConfig;
use crate::controller::{ControllerSignal, PhaseController};
use crate::frame::RenderFrame;
use crate::generation::AssetGeneration;
use crate::router::{Screen, ScreenRouter};
use crate::script::PhaseScript;

// Custom event kinds (page → Rust)
pub const CUSTOM_TRIGGER: u32 = 1;
pub const CUSTOM_START: u32 = 2;
pub const CUSTOM_RESTART: u32 = 3;

// Game event kinds (Rust → page)
pub const EVENT_PHASE_ADVANCED: u32 = 1;
pub const EVENT_GAME_COMPLETE: u32 = 2;

pub struct ButterflySneeze {
    router: ScreenRouter,
    generation: AssetGeneration,
    /// Present from the first start; shut down while on the end screen.
    controller: Option<PhaseController>,
    script: PhaseScript,
    config: PlayConfig,
    surface_origin: Vec2,
}

impl ButterflySneeze {
    pub fn new() -> Self {
        Self {
            router: ScreenRouter::new(),
            generation: AssetGeneration::new(),
            controller: None,
            script: PhaseScript::reference(),
            config: PlayConfig::default(),
            surface_origin: Vec2::ZERO,
        }
    }

    pub fn screen(&self) -> Screen {
        self.router.screen()
    }

    pub fn generation(&self) -> &AssetGeneration {
        &self.generation
    }

    pub fn controller(&self) -> Option<&PhaseController> {
        self.controller.as_ref()
    }

    pub fn play_config(&self) -> &PlayConfig {
        &self.config
    }

    pub fn script(&self) -> &PhaseScript {
        &self.script
    }

    /// "Start game" on the generation screen.
    fn start(&mut self, ctx: &mut EngineContext) {
        if self.router.screen() != Screen::AssetGeneration {
            log::warn!("start ignored on the {} screen", self.router.screen());
            return;
        }
        if !self.generation.all_done() {
            log::warn!(
                "start ignored: {}/{} assets ready",
                self.generation.done_count(),
                AssetId::COUNT
            );
            return;
        }
        if let Err((err, _)) = self.router.on_assets_ready(self.generation.store().clone()) {
            log::warn!("start refused: {}", err);
            return;
        }
        self.generation = AssetGeneration::new();

        // Reuse the previous run's controller when nothing it was built from changed.
        let mut controller = match self.controller.take() {
            Some(mut old) if old.script() == &self.script && old.config() == &self.config => {
                old.restart();
                old
            }
            _ => PhaseController::new(self.script.clone(), self.config.clone()),
        };
        controller.set_surface_origin(self.surface_origin);
        self.controller = Some(controller);
        ctx.mark_dirty();
    }

    /// "Play again" on the end screen.
    fn restart(&mut self, ctx: &mut EngineContext) {
        if self.router.on_restart().is_ok() {
            self.generation = AssetGeneration::new();
            ctx.mark_dirty();
        }
    }

    fn playing(&mut self) -> Option<&mut PhaseController> {
        if self.router.screen() == Screen::Playing {
            self.controller.as_mut()
        } else {
            None
        }
    }

    fn handle_signals(&mut self, ctx: &mut EngineContext) {
        let Some(controller) = self.controller.as_mut() else {
            return;
        };
        for signal in controller.drain_signals() {
            match signal {
                ControllerSignal::PhaseAdvanced { from, to } => {
                    ctx.emit_event(GameEvent::new(
                        EVENT_PHASE_ADVANCED,
                        from as f32,
                        to as f32,
                        0.0,
                    ));
                }
                ControllerSignal::GameComplete => {
                    ctx.emit_event(GameEvent::new(EVENT_GAME_COMPLETE, 0.0, 0.0, 0.0));
                    controller.shutdown();
                    if let Err(err) = self.router.on_game_end() {
                        log::error!("game end: {}", err);
                    }
                    ctx.mark_dirty();
                }
            }
        }
    }
}

impl Default for ButterflySneeze {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for ButterflySneeze {
    fn config(&self) -> GameConfig {
        GameConfig {
            world_width: 800.0,
            world_height: 600.0,
            max_events: 32,
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        log::info!(
            "{} phases, {} assets to generate",
            self.script.len(),
            AssetId::COUNT
        );
        ctx.mark_dirty();
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        let version = self.controller.as_ref().map(PhaseController::version);

        for event in input.iter() {
            match *event {
                InputEvent::SurfaceOrigin { x, y } => {
                    self.surface_origin = Vec2::new(x, y);
                    if let Some(controller) = self.controller.as_mut() {
                        controller.set_surface_origin(self.surface_origin);
                    }
                }
                InputEvent::PointerMove { x, y } => {
                    if let Some(controller) = self.playing() {
                        controller.pointer_moved(Vec2::new(x, y));
                    }
                }
                InputEvent::PointerDown { x, y } => {
                    if let Some(controller) = self.playing() {
                        controller.pointer_pressed(Vec2::new(x, y));
                    }
                }
                InputEvent::Custom { kind, .. } => match kind {
                    CUSTOM_TRIGGER => {
                        if let Some(controller) = self.playing() {
                            controller.trigger();
                        }
                    }
                    CUSTOM_START => self.start(ctx),
                    CUSTOM_RESTART => self.restart(ctx),
                    other => log::debug!("unknown custom event {}", other),
                },
            }
        }

        let dt_ms = ctx.frame_dt_ms();
        if let Some(controller) = self.playing() {
            controller.tick(dt_ms);
            // Particles move every frame without publishing.
            if !controller.particles().is_empty() {
                ctx.mark_dirty();
            }
        }
        self.handle_signals(ctx);

        if self.controller.as_ref().map(PhaseController::version) != version {
            ctx.mark_dirty();
        }
    }

    fn render(&self, ctx: &mut RenderContext) {
        let frame = match (self.router.screen(), self.controller.as_ref()) {
            (Screen::AssetGeneration, _) => RenderFrame::generation(&self.generation),
            (Screen::Playing, Some(controller)) => {
                RenderFrame::playing(controller, self.router.store())
            }
            (Screen::Playing, None) => {
                log::error!("playing without a controller");
                return;
            }
            (Screen::Finished, _) => RenderFrame::finished(self.router.store()),
        };
        if let Err(err) = ctx.write_json(&frame) {
            log::error!("frame serialization failed: {}", err);
        }
    }

    fn load_config(&mut self, json: &str) -> Result<(), LoadError> {
        if self.router.screen() == Screen::Playing {
            return Err(LoadError::Busy("playing"));
        }
        self.config = PlayConfig::from_json(json)?;
        Ok(())
    }

    fn load_content(&mut self, json: &str) -> Result<(), LoadError> {
        if self.router.screen() == Screen::Playing {
            return Err(LoadError::Busy("playing"));
        }
        self.script = PhaseScript::from_json(json)?;
        log::info!(
            "script loaded: {} phases using {} assets",
            self.script.len(),
            self.script.referenced_assets().len()
        );
        Ok(())
    }

    fn request_asset(&mut self, ctx: &mut EngineContext, key: &str) -> Option<String> {
        if self.router.screen() != Screen::AssetGeneration {
            log::warn!("asset request for `{}` outside generation", key);
            return None;
        }
        let id = parse_asset(key)?;
        let prompt = self.generation.request(id)?;
        ctx.mark_dirty();
        Some(prompt.to_string())
    }

    fn asset_ready(&mut self, ctx: &mut EngineContext, key: &str, handle: ImageHandle) {
        if self.router.screen() != Screen::AssetGeneration {
            log::warn!("late image for `{}` dropped", key);
            return;
        }
        if let Some(id) = parse_asset(key) {
            self.generation.complete(id, handle);
            ctx.mark_dirty();
        }
    }

    fn asset_failed(&mut self, ctx: &mut EngineContext, error: GenerationError) {
        if self.router.screen() != Screen::AssetGeneration {
            return;
        }
        if let Some(id) = parse_asset(&error.key) {
            self.generation.fail(id, &error);
            ctx.mark_dirty();
        }
    }

    fn load_manifest(&mut self, ctx: &mut EngineContext, manifest: AssetManifest) {
        if self.router.screen() != Screen::AssetGeneration {
            log::warn!("manifest ignored outside generation");
            return;
        }
        let store = AssetStore::<AssetId>::from_manifest(&manifest);
        for id in AssetId::ALL {
            if let Some(handle) = store.get(id) {
                self.generation.complete(id, handle.clone());
            }
        }
        log::info!("manifest supplied {} assets", store.len());
        ctx.mark_dirty();
    }
}

fn parse_asset(key: &str) -> Option<AssetId> {
    match key.parse() {
        Ok(id) => Some(id),
        Err(err) => {
            log::warn!("{}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{ButterflyMood, SequenceState};
    use crate::generation::GenerationStatus;

    /// Long enough for any single sequence to finish.
    const LONG_FRAME_MS: f64 = 10_000.0;

    fn custom(kind: u32) -> InputEvent {
        InputEvent::Custom { kind, a: 0.0, b: 0.0, c: 0.0 }
    }

    /// Run one frame and return the events it emitted.
    fn frame(
        game: &mut ButterflySneeze,
        ctx: &mut EngineContext,
        dt_ms: f64,
        events: &[InputEvent],
    ) -> Vec<GameEvent> {
        let mut input = InputQueue::new();
        for event in events {
            input.push(*event);
        }
        ctx.begin_frame(dt_ms);
        game.update(ctx, &input);
        ctx.events.clone()
    }

    fn generate_all(game: &mut ButterflySneeze, ctx: &mut EngineContext) {
        for id in AssetId::ALL {
            assert!(game.request_asset(ctx, id.tag()).is_some());
            game.asset_ready(ctx, id.tag(), ImageHandle::new(format!("img://{}", id)));
        }
    }

    fn started() -> (ButterflySneeze, EngineContext) {
        let mut game = ButterflySneeze::new();
        let mut ctx = EngineContext::new();
        game.init(&mut ctx);
        generate_all(&mut game, &mut ctx);
        frame(&mut game, &mut ctx, 0.0, &[custom(CUSTOM_START)]);
        assert_eq!(game.screen(), Screen::Playing);
        (game, ctx)
    }

    fn render_json(game: &ButterflySneeze) -> serde_json::Value {
        let mut out = String::new();
        game.render(&mut RenderContext { frame: &mut out });
        serde_json::from_str(&out).unwrap()
    }

    #[test]
    fn start_needs_every_asset() {
        let mut game = ButterflySneeze::new();
        let mut ctx = EngineContext::new();
        game.init(&mut ctx);
        for id in &AssetId::ALL[..AssetId::COUNT - 1] {
            game.request_asset(&mut ctx, id.tag());
            game.asset_ready(&mut ctx, id.tag(), ImageHandle::new("img://x"));
        }
        frame(&mut game, &mut ctx, 16.0, &[custom(CUSTOM_START)]);
        assert_eq!(game.screen(), Screen::AssetGeneration);
        assert!(game.controller().is_none());
    }

    #[test]
    fn failed_asset_can_be_retried() {
        let mut game = ButterflySneeze::new();
        let mut ctx = EngineContext::new();
        assert!(game.request_asset(&mut ctx, "rosa_feliz").is_some());
        assert!(game.request_asset(&mut ctx, "rosa_feliz").is_none());
        game.asset_failed(&mut ctx, GenerationError::new("rosa_feliz", "timeout"));
        assert_eq!(game.generation().status(AssetId::RoseHappy), GenerationStatus::Error);
        assert!(game.request_asset(&mut ctx, "rosa_feliz").is_some());
        assert!(game.request_asset(&mut ctx, "sunflower").is_none());
    }

    #[test]
    fn manifest_fills_generation() {
        let mut game = ButterflySneeze::new();
        let mut ctx = EngineContext::new();
        let mut manifest = AssetManifest::default();
        for id in AssetId::ALL {
            manifest.images.insert(id.tag().to_string(), ImageHandle::new("img://cached"));
        }
        manifest.images.insert("sunflower".into(), ImageHandle::new("img://nope"));
        game.load_manifest(&mut ctx, manifest);
        assert!(game.generation().all_done());
    }

    #[test]
    fn full_playthrough_emits_two_advances_and_one_completion() {
        let (mut game, mut ctx) = started();
        let mut emitted = Vec::new();
        for _ in 0..3 {
            emitted.extend(frame(&mut game, &mut ctx, LONG_FRAME_MS, &[custom(CUSTOM_TRIGGER)]));
        }
        emitted.extend(frame(&mut game, &mut ctx, LONG_FRAME_MS, &[custom(CUSTOM_TRIGGER)]));

        let kinds: Vec<u32> = emitted.iter().map(|e| e.kind as u32).collect();
        assert_eq!(
            kinds,
            vec![EVENT_PHASE_ADVANCED, EVENT_PHASE_ADVANCED, EVENT_GAME_COMPLETE]
        );
        assert_eq!((emitted[1].a, emitted[1].b), (1.0, 2.0));
        assert_eq!(game.screen(), Screen::Finished);
        assert_eq!(game.controller().unwrap().pending_timers(), 0);

        let json = render_json(&game);
        assert_eq!(json["screen"], "finished");
        assert_eq!(json["flower"], "img://rosa_feliz");
    }

    #[test]
    fn clicking_the_flower_starts_the_sequence() {
        let (mut game, mut ctx) = started();
        frame(
            &mut game,
            &mut ctx,
            16.0,
            &[
                InputEvent::SurfaceOrigin { x: 20.0, y: 10.0 },
                InputEvent::PointerMove { x: 500.0, y: 380.0 },
                InputEvent::PointerDown { x: 620.0, y: 410.0 },
            ],
        );
        let controller = game.controller().unwrap();
        assert!(controller.is_locked());
        assert_eq!(controller.pointer().position(), Vec2::new(480.0, 370.0));
        assert_eq!(controller.state(), SequenceState::DialogueInitial);
    }

    #[test]
    fn click_off_the_flower_does_nothing() {
        let (mut game, mut ctx) = started();
        frame(&mut game, &mut ctx, 16.0, &[InputEvent::PointerDown { x: 10.0, y: 10.0 }]);
        assert!(!game.controller().unwrap().is_locked());
    }

    #[test]
    fn inputs_before_start_are_ignored() {
        let mut game = ButterflySneeze::new();
        let mut ctx = EngineContext::new();
        let events = frame(
            &mut game,
            &mut ctx,
            LONG_FRAME_MS,
            &[custom(CUSTOM_TRIGGER), InputEvent::PointerDown { x: 600.0, y: 400.0 }],
        );
        assert!(events.is_empty());
        assert_eq!(game.screen(), Screen::AssetGeneration);
    }

    #[test]
    fn frames_are_dirty_while_particles_fly() {
        let (mut game, mut ctx) = started();
        frame(&mut game, &mut ctx, 3000.0, &[custom(CUSTOM_TRIGGER)]);
        ctx.take_dirty();
        frame(&mut game, &mut ctx, 16.0, &[]);
        assert!(ctx.take_dirty());

        frame(&mut game, &mut ctx, 1000.0, &[]);
        ctx.take_dirty();
        frame(&mut game, &mut ctx, 16.0, &[]);
        assert!(!ctx.take_dirty(), "idle reaction hold needs no redraw");
    }

    #[test]
    fn restart_returns_to_generation_with_empty_store() {
        let (mut game, mut ctx) = started();
        for _ in 0..3 {
            frame(&mut game, &mut ctx, LONG_FRAME_MS, &[custom(CUSTOM_TRIGGER)]);
        }
        assert_eq!(game.screen(), Screen::Finished);

        frame(&mut game, &mut ctx, 16.0, &[custom(CUSTOM_RESTART)]);
        assert_eq!(game.screen(), Screen::AssetGeneration);
        assert_eq!(game.generation().done_count(), 0);
        assert_eq!(render_json(&game)["can_start"], false);

        // Second run starts clean on the first flower.
        generate_all(&mut game, &mut ctx);
        frame(&mut game, &mut ctx, 0.0, &[custom(CUSTOM_START)]);
        let controller = game.controller().unwrap();
        assert_eq!(controller.progress().phase_index, 0);
        assert_eq!(controller.progress().mood, ButterflyMood::Happy);
        assert!(!controller.is_locked());
    }

    #[test]
    fn restart_is_refused_mid_game() {
        let (mut game, mut ctx) = started();
        frame(&mut game, &mut ctx, 16.0, &[custom(CUSTOM_RESTART)]);
        assert_eq!(game.screen(), Screen::Playing);
    }

    #[test]
    fn loads_are_refused_during_play() {
        let (mut game, _ctx) = started();
        assert!(matches!(game.load_config("{}"), Err(LoadError::Busy(_))));
        assert!(matches!(game.load_content("[]"), Err(LoadError::Busy(_))));
    }

    #[test]
    fn loaded_config_and_script_apply_to_the_next_run() {
        let mut game = ButterflySneeze::new();
        let mut ctx = EngineContext::new();
        game.load_config(r#"{ "particle_count": 3 }"#).unwrap();
        assert_eq!(game.play_config().particle_count, 3);
        game.load_content(
            r#"[{
                "id": "daisy", "phase": 1, "position": [400.0, 300.0],
                "initial_asset": "rosa_triste", "reaction_asset": "rosa_feliz",
                "background_asset": "fundo_campo_seco",
                "initial_dialogue": "Oi", "reaction_dialogue": "Obrigada"
            }]"#,
        )
        .unwrap();
        assert!(game.load_content("[]").is_err());
        assert_eq!(game.script().len(), 1);

        generate_all(&mut game, &mut ctx);
        frame(&mut game, &mut ctx, 0.0, &[custom(CUSTOM_START)]);
        frame(&mut game, &mut ctx, 3000.0, &[custom(CUSTOM_TRIGGER)]);
        assert_eq!(game.controller().unwrap().particles().len(), 3);

        let events = frame(&mut game, &mut ctx, LONG_FRAME_MS, &[]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind as u32, EVENT_GAME_COMPLETE);
    }

    #[test]
    fn playing_frame_serializes_snapshot() {
        let (mut game, mut ctx) = started();
        frame(&mut game, &mut ctx, 16.0, &[InputEvent::PointerMove { x: 550.0, y: 400.0 }]);
        let json = render_json(&game);
        assert_eq!(json["screen"], "playing");
        assert_eq!(json["phase"], 1);
        assert_eq!(json["is_near"], true);
        assert_eq!(json["mood"], "happy");
        assert_eq!(json["butterfly"]["image"], "img://butterfly_happy");
        assert!(json["dialogue"].is_null());
    }

    #[test]
    fn runner_redraws_only_on_change() {
        let mut runner = bloom_web::GameRunner::new(ButterflySneeze::new());
        runner.init();
        for id in AssetId::ALL {
            assert!(runner.request_asset(id.tag()).is_some());
            runner.asset_ready(id.tag(), "img://x");
        }
        runner.push_input(custom(CUSTOM_START));
        runner.tick(0.016);
        let json: serde_json::Value = serde_json::from_str(&runner.frame_json()).unwrap();
        assert_eq!(json["screen"], "playing");

        let version = runner.frame_version();
        runner.tick(0.016);
        assert_eq!(runner.frame_version(), version);

        runner.push_input(custom(CUSTOM_TRIGGER));
        runner.tick(0.016);
        assert_eq!(runner.frame_version(), version + 1);
    }
}
