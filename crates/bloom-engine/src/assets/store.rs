use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::str::FromStr;

use crate::api::types::ImageHandle;
use crate::assets::error::MissingAssetError;
use crate::assets::manifest::AssetManifest;

/// In-memory map from a game's asset key to its generated image.
/// Filled during asset generation, then handed to the game screen and only
/// read from there on.
#[derive(Debug, Clone)]
pub struct AssetStore<K> {
    images: HashMap<K, ImageHandle>,
}

impl<K> AssetStore<K>
where
    K: Copy + Eq + Hash + Display,
{
    pub fn new() -> Self {
        Self {
            images: HashMap::new(),
        }
    }

    /// Build a store from a parsed manifest. Tags that do not name a known
    /// key are skipped with a warning.
    pub fn from_manifest(manifest: &AssetManifest) -> Self
    where
        K: FromStr,
    {
        let mut store = Self::new();
        for (tag, handle) in &manifest.images {
            match tag.parse::<K>() {
                Ok(key) => {
                    store.insert(key, handle.clone());
                }
                Err(_) => log::warn!("manifest: ignoring unknown asset `{}`", tag),
            }
        }
        store
    }

    /// Store an image, returning the handle it replaced.
    pub fn insert(&mut self, key: K, handle: ImageHandle) -> Option<ImageHandle> {
        self.images.insert(key, handle)
    }

    /// Look up an image. Returns None if not stored.
    pub fn get(&self, key: K) -> Option<&ImageHandle> {
        self.images.get(&key)
    }

    /// Look up an image that is expected to exist.
    pub fn require(&self, key: K) -> Result<&ImageHandle, MissingAssetError> {
        self.images.get(&key).ok_or_else(|| MissingAssetError {
            key: key.to_string(),
        })
    }

    /// Renderer lookup: a missing image is logged and becomes a gap.
    pub fn resolve(&self, key: K) -> Option<&ImageHandle> {
        match self.require(key) {
            Ok(handle) => Some(handle),
            Err(err) => {
                log::debug!("{}; rendering placeholder", err);
                None
            }
        }
    }

    pub fn contains(&self, key: K) -> bool {
        self.images.contains_key(&key)
    }

    /// Keys from `expected` that have no image, in the given order.
    pub fn missing(&self, expected: impl IntoIterator<Item = K>) -> Vec<K> {
        expected.into_iter().filter(|k| !self.contains(*k)).collect()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }
}

impl<K> Default for AssetStore<K>
where
    K: Copy + Eq + Hash + Display,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Key {
        Sky,
        Sun,
    }

    impl fmt::Display for Key {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(match self {
                Key::Sky => "sky",
                Key::Sun => "sun",
            })
        }
    }

    impl FromStr for Key {
        type Err = ();
        fn from_str(s: &str) -> Result<Self, ()> {
            match s {
                "sky" => Ok(Key::Sky),
                "sun" => Ok(Key::Sun),
                _ => Err(()),
            }
        }
    }

    #[test]
    fn loads_from_manifest_and_skips_unknown() {
        let json = r#"{ "images": { "sky": "sky.png", "moon": "moon.png" } }"#;
        let manifest = AssetManifest::from_json(json).unwrap();
        let store: AssetStore<Key> = AssetStore::from_manifest(&manifest);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(Key::Sky).map(ImageHandle::as_str), Some("sky.png"));
        assert!(store.get(Key::Sun).is_none());
    }

    #[test]
    fn require_reports_missing_key() {
        let store: AssetStore<Key> = AssetStore::new();
        let err = store.require(Key::Sun).unwrap_err();
        assert_eq!(err.key, "sun");
        assert!(store.resolve(Key::Sun).is_none());
    }

    #[test]
    fn missing_lists_gaps_in_order() {
        let mut store = AssetStore::new();
        store.insert(Key::Sun, ImageHandle::new("sun.png"));
        assert_eq!(store.missing([Key::Sky, Key::Sun]), vec![Key::Sky]);
        store.clear();
        assert!(store.is_empty());
    }
}
