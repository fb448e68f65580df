//! JSON frame handed to the browser after every visible change.
//!
//! Images are resolved here; a missing asset becomes `null` and the page
//! draws a placeholder. Particle motion is derived from the burst age.

use bloom_engine::{AssetStore, ImageHandle, ParticleId, Vec2};
use serde::Serialize;

use crate::assets::AssetId;
use crate::controller::{ButterflyMood, PhaseController, SequenceState};
use crate::generation::{AssetGeneration, GenerationStatus};
use crate::script::{END_MESSAGE, END_TITLE};

const HIGHLIGHT_SCALE: f32 = 1.1;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum RenderFrame {
    AssetGeneration(GenerationFrame),
    Playing(PlayFrame),
    Finished(EndFrame),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetCard {
    pub id: AssetId,
    pub name: &'static str,
    pub prompt: &'static str,
    pub status: GenerationStatus,
    pub image: Option<ImageHandle>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationFrame {
    pub cards: Vec<AssetCard>,
    pub done: usize,
    pub total: usize,
    pub can_start: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sprite {
    pub image: Option<ImageHandle>,
    pub pos: Vec2,
    pub size: f32,
    pub scale: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogueFrame {
    pub text: String,
    pub image: Option<ImageHandle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleSprite {
    pub id: ParticleId,
    pub pos: Vec2,
    pub scale: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayFrame {
    /// 1-based ordinal of the current flower.
    pub phase: u32,
    pub state: SequenceState,
    pub background: Option<ImageHandle>,
    /// `None` when the phase has no position.
    pub flower: Option<Sprite>,
    pub butterfly: Sprite,
    pub mood: ButterflyMood,
    pub dialogue: Option<DialogueFrame>,
    pub particle_image: Option<ImageHandle>,
    pub particles: Vec<ParticleSprite>,
    pub is_near: bool,
    pub locked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndFrame {
    pub title: &'static str,
    pub message: &'static str,
    pub background: Option<ImageHandle>,
    pub butterfly: Option<ImageHandle>,
    pub flower: Option<ImageHandle>,
}

fn image(store: &AssetStore<AssetId>, id: AssetId) -> Option<ImageHandle> {
    store.resolve(id).cloned()
}

impl RenderFrame {
    pub fn generation(generation: &AssetGeneration) -> Self {
        let cards: Vec<AssetCard> = AssetId::ALL
            .iter()
            .map(|&id| AssetCard {
                id,
                name: id.name(),
                prompt: id.prompt(),
                status: generation.status(id),
                image: generation.store().get(id).cloned(),
                error: generation.error(id).map(str::to_string),
            })
            .collect();
        RenderFrame::AssetGeneration(GenerationFrame {
            done: generation.done_count(),
            total: cards.len(),
            can_start: generation.all_done(),
            cards,
        })
    }

    pub fn playing(controller: &PhaseController, store: &AssetStore<AssetId>) -> Self {
        let config = controller.config();
        let phase = controller.current_phase();
        let progress = controller.progress();
        let is_near = controller.is_near();
        let locked = controller.is_locked();

        let flower = phase.position.map(|pos| Sprite {
            image: image(store, progress.flower_asset),
            pos,
            size: config.flower_size,
            scale: if is_near { HIGHLIGHT_SCALE } else { 1.0 },
        });

        let butterfly = Sprite {
            image: image(store, progress.mood.asset()),
            pos: controller.pointer().position(),
            size: config.butterfly_size,
            scale: if locked { HIGHLIGHT_SCALE } else { 1.0 },
        };

        let dialogue = progress.dialogue.as_ref().map(|text| DialogueFrame {
            text: text.clone(),
            image: image(store, AssetId::DialogueBox),
        });

        let t = match controller.particle_age_ms() {
            Some(age) if config.timing.particle_clear_ms > 0.0 => {
                (age / config.timing.particle_clear_ms) as f32
            }
            _ => 1.0,
        };
        let particles = controller
            .particles()
            .iter()
            .map(|p| {
                let drift = p.drift(phase.position.unwrap_or(p.origin), t);
                ParticleSprite {
                    id: p.id,
                    pos: drift.pos,
                    scale: drift.scale,
                    alpha: drift.alpha,
                }
            })
            .collect();

        RenderFrame::Playing(PlayFrame {
            phase: phase.phase,
            state: controller.state(),
            background: image(store, phase.background_asset),
            flower,
            butterfly,
            mood: progress.mood,
            dialogue,
            particle_image: image(store, AssetId::SneezeParticle),
            particles,
            is_near,
            locked,
        })
    }

    pub fn finished(store: &AssetStore<AssetId>) -> Self {
        RenderFrame::Finished(EndFrame {
            title: END_TITLE,
            message: END_MESSAGE,
            background: image(store, AssetId::DryFieldBackground),
            butterfly: image(store, AssetId::ButterflyHappy),
            flower: image(store, AssetId::RoseHappy),
        })
    }
}
