use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::api::types::ImageHandle;

/// Image handles the host already holds, keyed by asset tag.
/// Loaded from a JSON document at runtime:
///
/// ```json
/// { "images": { "butterfly_happy": "blob:https://…" } }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetManifest {
    #[serde(default)]
    pub images: BTreeMap<String, ImageHandle>,
}

impl AssetManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
