//! The closed set of images the game needs, with the prompt used to generate each.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetId {
    #[serde(rename = "butterfly_happy")]
    ButterflyHappy,
    #[serde(rename = "butterfly_sneezing")]
    ButterflySneezing,
    #[serde(rename = "butterfly_sad")]
    ButterflySad,
    #[serde(rename = "butterfly_surprised")]
    ButterflySurprised,
    #[serde(rename = "tulip_arrogant")]
    TulipArrogant,
    #[serde(rename = "tulip_furious")]
    TulipFurious,
    #[serde(rename = "copo_de_leite_elegante")]
    CallaLilyElegant,
    #[serde(rename = "copo_de_leite_indignado")]
    CallaLilyIndignant,
    #[serde(rename = "rosa_triste")]
    RoseSad,
    #[serde(rename = "rosa_feliz")]
    RoseHappy,
    #[serde(rename = "fundo_jardim_colorido")]
    GardenBackground,
    #[serde(rename = "fundo_jardim_branco")]
    WhiteGardenBackground,
    #[serde(rename = "fundo_campo_seco")]
    DryFieldBackground,
    #[serde(rename = "caixa_dialogo")]
    DialogueBox,
    #[serde(rename = "particula_espirro")]
    SneezeParticle,
}

/// Catalogue entry: wire tag, card title and generation prompt.
#[derive(Debug, Clone, Copy)]
pub struct AssetPrompt {
    pub id: AssetId,
    pub tag: &'static str,
    pub name: &'static str,
    pub prompt: &'static str,
}

// Order matches the AssetId declaration order; `AssetId::entry` indexes by discriminant.
pub const ASSET_PROMPTS: [AssetPrompt; AssetId::COUNT] = [
    AssetPrompt {
        id: AssetId::ButterflyHappy,
        tag: "butterfly_happy",
        name: "Borboleta Feliz",
        prompt: "A cute butterfly smiling, looking curious. Children's cartoon style, colorful, with soft outlines and clear facial expressions. Transparent background.",
    },
    AssetPrompt {
        id: AssetId::ButterflySneezing,
        tag: "butterfly_sneezing",
        name: "Borboleta Espirrando",
        prompt: "The same cute butterfly with eyes closed, cheeks puffed up, mid-sneeze. Children's cartoon style. Transparent background.",
    },
    AssetPrompt {
        id: AssetId::ButterflySad,
        tag: "butterfly_sad",
        name: "Borboleta Triste",
        prompt: "The same cute butterfly with a sad, droopy expression. Children's cartoon style. Transparent background.",
    },
    AssetPrompt {
        id: AssetId::ButterflySurprised,
        tag: "butterfly_surprised",
        name: "Borboleta Surpresa",
        prompt: "The same cute butterfly with wide, surprised eyes. Children's cartoon style. Transparent background.",
    },
    AssetPrompt {
        id: AssetId::TulipArrogant,
        tag: "tulip_arrogant",
        name: "Tulipa Arrogante",
        prompt: "A red tulip with a superior, arrogant expression on its face. Children's cartoon style. Transparent background.",
    },
    AssetPrompt {
        id: AssetId::TulipFurious,
        tag: "tulip_furious",
        name: "Tulipa Furiosa",
        prompt: "The same red tulip, now looking drenched and with an angry expression. Children's cartoon style. Transparent background.",
    },
    AssetPrompt {
        id: AssetId::CallaLilyElegant,
        tag: "copo_de_leite_elegante",
        name: "Copo-de-leite Elegante",
        prompt: "A white Calla Lily with a noble and elegant expression. Children's cartoon style. Transparent background.",
    },
    AssetPrompt {
        id: AssetId::CallaLilyIndignant,
        tag: "copo_de_leite_indignado",
        name: "Copo-de-leite Indignado",
        prompt: "The same white Calla Lily, now splattered with water and with a shocked, indignant expression. Children's cartoon style. Transparent background.",
    },
    AssetPrompt {
        id: AssetId::RoseSad,
        tag: "rosa_triste",
        name: "Rosa Triste",
        prompt: "A red rose with slightly droopy, withered petals and a melancholic expression. Children's cartoon style. Transparent background.",
    },
    AssetPrompt {
        id: AssetId::RoseHappy,
        tag: "rosa_feliz",
        name: "Rosa Feliz",
        prompt: "The same red rose, now vibrant, with perky petals and a radiant smile. Children's cartoon style. Transparent background.",
    },
    AssetPrompt {
        id: AssetId::GardenBackground,
        tag: "fundo_jardim_colorido",
        name: "Jardim Colorido",
        prompt: "A vibrant garden with many colorful flowers blurred in the background. Children's storybook illustration style.",
    },
    AssetPrompt {
        id: AssetId::WhiteGardenBackground,
        tag: "fundo_jardim_branco",
        name: "Jardim Branco",
        prompt: "A corner of a garden with predominantly white and pastel-colored flowers. Children's storybook illustration style.",
    },
    AssetPrompt {
        id: AssetId::DryFieldBackground,
        tag: "fundo_campo_seco",
        name: "Campo Seco",
        prompt: "A more open field with short, somewhat dry-looking grass. Children's storybook illustration style.",
    },
    AssetPrompt {
        id: AssetId::DialogueBox,
        tag: "caixa_dialogo",
        name: "Caixa de Diálogo",
        prompt: "A simple, cloud-like dialogue box. Clean design suitable for a children's game UI. Transparent background.",
    },
    AssetPrompt {
        id: AssetId::SneezeParticle,
        tag: "particula_espirro",
        name: "Partícula de Espirro",
        prompt: "A single, small, shiny droplet of water for a sneeze animation effect. Simple and clean. Transparent background.",
    },
];

impl AssetId {
    pub const COUNT: usize = 15;

    pub const ALL: [AssetId; AssetId::COUNT] = [
        AssetId::ButterflyHappy,
        AssetId::ButterflySneezing,
        AssetId::ButterflySad,
        AssetId::ButterflySurprised,
        AssetId::TulipArrogant,
        AssetId::TulipFurious,
        AssetId::CallaLilyElegant,
        AssetId::CallaLilyIndignant,
        AssetId::RoseSad,
        AssetId::RoseHappy,
        AssetId::GardenBackground,
        AssetId::WhiteGardenBackground,
        AssetId::DryFieldBackground,
        AssetId::DialogueBox,
        AssetId::SneezeParticle,
    ];

    pub fn entry(self) -> &'static AssetPrompt {
        &ASSET_PROMPTS[self as usize]
    }

    /// Wire tag, e.g. `rosa_feliz`.
    pub fn tag(self) -> &'static str {
        self.entry().tag
    }

    pub fn name(self) -> &'static str {
        self.entry().name
    }

    pub fn prompt(self) -> &'static str {
        self.entry().prompt
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown asset `{0}`")]
pub struct UnknownAsset(pub String);

impl FromStr for AssetId {
    type Err = UnknownAsset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ASSET_PROMPTS
            .iter()
            .find(|p| p.tag == s)
            .map(|p| p.id)
            .ok_or_else(|| UnknownAsset(s.to_string()))
    }
}
