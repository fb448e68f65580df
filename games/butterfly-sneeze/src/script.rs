//! Phase script: which flower appears where, and what it says.

use std::collections::BTreeSet;

use bloom_engine::{LoadError, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assets::AssetId;

pub const END_TITLE: &str = "Fim!";
pub const END_MESSAGE: &str = "Um pouco de gentileza faz tudo florescer.";

/// One flower encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseDefinition {
    /// Content name, e.g. `tulip`.
    pub id: String,
    /// 1-based ordinal shown to players.
    pub phase: u32,
    /// Flower centre in scene coordinates, as `[x, y]`. A phase without a
    /// position still plays; it just can't be clicked or approached.
    #[serde(default)]
    pub position: Option<Vec2>,
    pub initial_asset: AssetId,
    pub reaction_asset: AssetId,
    pub background_asset: AssetId,
    pub initial_dialogue: String,
    pub reaction_dialogue: String,
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("a phase script needs at least one phase")]
    Empty,
    #[error("malformed phase script: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ScriptError> for LoadError {
    fn from(err: ScriptError) -> Self {
        match err {
            ScriptError::Json(e) => LoadError::Json(e),
            other => LoadError::Invalid(other.to_string()),
        }
    }
}

/// Ordered, non-empty list of phases.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseScript {
    phases: Vec<PhaseDefinition>,
}

impl PhaseScript {
    pub fn new(phases: Vec<PhaseDefinition>) -> Result<Self, ScriptError> {
        if phases.is_empty() {
            return Err(ScriptError::Empty);
        }
        Ok(Self { phases })
    }

    /// Parse a JSON array of phases.
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let phases: Vec<PhaseDefinition> = serde_json::from_str(json)?;
        Self::new(phases)
    }

    /// Tulip, calla lily, rose.
    pub fn reference() -> Self {
        Self {
            phases: vec![
                PhaseDefinition {
                    id: "tulip".into(),
                    phase: 1,
                    position: Some(Vec2::new(600.0, 400.0)),
                    initial_asset: AssetId::TulipArrogant,
                    reaction_asset: AssetId::TulipFurious,
                    background_asset: AssetId::GardenBackground,
                    initial_dialogue: "Hmpf. Cuidado por onde voa, coisinha.".into(),
                    reaction_dialogue: "Atchim! Você me molhou toda! Que falta de educação!".into(),
                },
                PhaseDefinition {
                    id: "calla_lily".into(),
                    phase: 2,
                    position: Some(Vec2::new(200.0, 350.0)),
                    initial_asset: AssetId::CallaLilyElegant,
                    reaction_asset: AssetId::CallaLilyIndignant,
                    background_asset: AssetId::WhiteGardenBackground,
                    initial_dialogue: "Nossa, tenha cuidado com minhas pétalas imaculadas.".into(),
                    reaction_dialogue: "Oh, que indignidade! Estou simplesmente encharcado!".into(),
                },
                PhaseDefinition {
                    id: "rose".into(),
                    phase: 3,
                    position: Some(Vec2::new(400.0, 450.0)),
                    initial_asset: AssetId::RoseSad,
                    reaction_asset: AssetId::RoseHappy,
                    background_asset: AssetId::DryFieldBackground,
                    initial_dialogue: "Oh... olá. Está tão seco e empoeirado aqui...".into(),
                    reaction_dialogue: "Oh, obrigada! Seu espirro foi como uma chuva suave! Sinto-me tão revigorada!".into(),
                },
            ],
        }
    }

    pub fn get(&self, index: usize) -> Option<&PhaseDefinition> {
        self.phases.get(index)
    }

    pub fn first(&self) -> &PhaseDefinition {
        &self.phases[0]
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn is_last(&self, index: usize) -> bool {
        index + 1 >= self.phases.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhaseDefinition> {
        self.phases.iter()
    }

    /// Every asset a phase displays.
    pub fn referenced_assets(&self) -> BTreeSet<AssetId> {
        self.phases
            .iter()
            .flat_map(|p| [p.initial_asset, p.reaction_asset, p.background_asset])
            .collect()
    }
}

impl Default for PhaseScript {
    fn default() -> Self {
        Self::reference()
    }
}
