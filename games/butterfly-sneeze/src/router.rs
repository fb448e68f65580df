use std::fmt;

use bloom_engine::AssetStore;
use serde::Serialize;
use thiserror::Error;

use crate::assets::AssetId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    AssetGeneration,
    Playing,
    Finished,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Screen::AssetGeneration => "asset generation",
            Screen::Playing => "playing",
            Screen::Finished => "finished",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("`{action}` is not allowed on the {from} screen")]
    Illegal { from: Screen, action: &'static str },
    #[error("cannot start: {} asset(s) missing", .0.len())]
    MissingAssets(Vec<AssetId>),
}

/// Strict three-screen cycle: generation → playing → finished → generation.
/// Owns the asset store once generation hands it over.
#[derive(Debug, Default)]
pub struct ScreenRouter {
    screen: Screen,
    store: AssetStore<AssetId>,
}

impl ScreenRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn store(&self) -> &AssetStore<AssetId> {
        &self.store
    }

    /// AssetGeneration → Playing. Every catalogue asset must be present.
    /// On refusal the store is handed back untouched.
    pub fn on_assets_ready(
        &mut self,
        store: AssetStore<AssetId>,
    ) -> Result<(), (TransitionError, AssetStore<AssetId>)> {
        if let Err(err) = self.require(Screen::AssetGeneration, "assets ready") {
            return Err((err, store));
        }
        let missing = store.missing(AssetId::ALL);
        if !missing.is_empty() {
            log::warn!("start refused, missing {:?}", missing);
            return Err((TransitionError::MissingAssets(missing), store));
        }
        self.store = store;
        self.screen = Screen::Playing;
        log::info!("screen: playing");
        Ok(())
    }

    /// Playing → Finished.
    pub fn on_game_end(&mut self) -> Result<(), TransitionError> {
        self.require(Screen::Playing, "game end")?;
        self.screen = Screen::Finished;
        log::info!("screen: finished");
        Ok(())
    }

    /// Finished → AssetGeneration. Clears the store.
    pub fn on_restart(&mut self) -> Result<(), TransitionError> {
        self.require(Screen::Finished, "restart")?;
        self.store.clear();
        self.screen = Screen::AssetGeneration;
        log::info!("screen: asset generation");
        Ok(())
    }

    fn require(&self, screen: Screen, action: &'static str) -> Result<(), TransitionError> {
        if self.screen == screen {
            Ok(())
        } else {
            log::warn!("refused `{}` on the {} screen", action, self.screen);
            Err(TransitionError::Illegal {
                from: self.screen,
                action,
            })
        }
    }
}
