pub mod api;
pub mod core;
pub mod systems;
pub mod input;
pub mod assets;

// Re-export key types at crate root for convenience
pub use api::error::LoadError;
pub use api::game::{Game, GameConfig, EngineContext, RenderContext};
pub use api::types::{GameEvent, ImageHandle};
pub use core::observer::{Subject, SubscriptionId};
pub use core::timeline::{Timeline, TimerId};
pub use input::queue::{InputEvent, InputQueue};
pub use assets::error::{GenerationError, MissingAssetError};
pub use assets::manifest::AssetManifest;
pub use assets::store::AssetStore;
pub use systems::effects::{Particle, ParticleBurst, ParticleDrift, ParticleId};

pub use glam::Vec2;
