//! Asset generation screen state: one status per catalogue asset.
//!
//! The image service itself lives outside the game. In the browser the host
//! asks for a prompt (`request`), calls the service, then reports back with
//! `complete` or `fail`. Native hosts and tests can drive an `ImageGenerator`
//! directly through `generate_with`.

use std::collections::HashMap;

use bloom_engine::{AssetStore, GenerationError, ImageHandle};
use serde::Serialize;

use crate::assets::AssetId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenerationStatus {
    #[default]
    Idle,
    Generating,
    Done,
    Error,
}

/// Produces an image for a text prompt.
pub trait ImageGenerator {
    fn generate(&mut self, prompt: &str) -> Result<ImageHandle, GenerationError>;
}

#[derive(Debug, Default)]
pub struct AssetGeneration {
    status: HashMap<AssetId, GenerationStatus>,
    errors: HashMap<AssetId, String>,
    store: AssetStore<AssetId>,
}

impl AssetGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, id: AssetId) -> GenerationStatus {
        self.status.get(&id).copied().unwrap_or_default()
    }

    /// Message of the last failure, while the asset is in `Error`.
    pub fn error(&self, id: AssetId) -> Option<&str> {
        self.errors.get(&id).map(String::as_str)
    }

    /// Start generating `id`. Returns the prompt for the image service, or
    /// `None` when the asset is already generating or done. Retrying after
    /// an error is allowed.
    pub fn request(&mut self, id: AssetId) -> Option<&'static str> {
        match self.status(id) {
            GenerationStatus::Idle | GenerationStatus::Error => {
                self.status.insert(id, GenerationStatus::Generating);
                self.errors.remove(&id);
                log::debug!("generating {}", id);
                Some(id.prompt())
            }
            GenerationStatus::Generating | GenerationStatus::Done => None,
        }
    }

    /// The service returned an image. A late success wins over an earlier
    /// failure for the same asset.
    pub fn complete(&mut self, id: AssetId, handle: ImageHandle) {
        self.store.insert(id, handle);
        self.status.insert(id, GenerationStatus::Done);
        self.errors.remove(&id);
        log::debug!("{} done", id);
    }

    /// The service failed. Only an in-flight request can fail; a stale
    /// report for an idle or finished asset is ignored.
    pub fn fail(&mut self, id: AssetId, error: &GenerationError) {
        if self.status(id) != GenerationStatus::Generating {
            log::warn!("ignoring failure for {} ({:?})", id, self.status(id));
            return;
        }
        log::warn!("{}", error);
        self.status.insert(id, GenerationStatus::Error);
        self.errors.insert(id, error.message.clone());
    }

    /// Request and run one asset synchronously. `Ok(false)` when the request
    /// was refused (already generating or done).
    pub fn generate_with(
        &mut self,
        id: AssetId,
        generator: &mut impl ImageGenerator,
    ) -> Result<bool, GenerationError> {
        let Some(prompt) = self.request(id) else {
            return Ok(false);
        };
        match generator.generate(prompt) {
            Ok(handle) => {
                self.complete(id, handle);
                Ok(true)
            }
            Err(err) => {
                self.fail(id, &err);
                Err(err)
            }
        }
    }

    pub fn all_done(&self) -> bool {
        AssetId::ALL
            .iter()
            .all(|id| self.status(*id) == GenerationStatus::Done)
    }

    pub fn done_count(&self) -> usize {
        AssetId::ALL
            .iter()
            .filter(|id| self.status(**id) == GenerationStatus::Done)
            .count()
    }

    pub fn store(&self) -> &AssetStore<AssetId> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hands out `img://N` handles; fails on prompts containing `fail_on`.
    struct FakeService {
        calls: u32,
        fail_on: Option<&'static str>,
    }

    impl ImageGenerator for FakeService {
        fn generate(&mut self, prompt: &str) -> Result<ImageHandle, GenerationError> {
            self.calls += 1;
            match self.fail_on {
                Some(needle) if prompt.contains(needle) => {
                    Err(GenerationError::new(needle, "service unavailable"))
                }
                _ => Ok(ImageHandle::new(format!("img://{}", self.calls))),
            }
        }
    }

    #[test]
    fn everything_starts_idle() {
        let generation = AssetGeneration::new();
        assert!(AssetId::ALL.iter().all(|id| generation.status(*id) == GenerationStatus::Idle));
        assert!(!generation.all_done());
        assert_eq!(generation.done_count(), 0);
    }

    #[test]
    fn request_is_refused_while_generating_or_done() {
        let mut generation = AssetGeneration::new();
        assert_eq!(generation.request(AssetId::RoseSad), Some(AssetId::RoseSad.prompt()));
        assert_eq!(generation.request(AssetId::RoseSad), None);

        generation.complete(AssetId::RoseSad, ImageHandle::new("img://rose"));
        assert_eq!(generation.status(AssetId::RoseSad), GenerationStatus::Done);
        assert_eq!(generation.request(AssetId::RoseSad), None);
        assert_eq!(
            generation.store().get(AssetId::RoseSad),
            Some(&ImageHandle::new("img://rose"))
        );
    }

    #[test]
    fn failure_is_recorded_and_retry_allowed() {
        let mut generation = AssetGeneration::new();
        generation.request(AssetId::TulipFurious);
        generation.fail(
            AssetId::TulipFurious,
            &GenerationError::new("tulip_furious", "quota exceeded"),
        );
        assert_eq!(generation.status(AssetId::TulipFurious), GenerationStatus::Error);
        assert_eq!(generation.error(AssetId::TulipFurious), Some("quota exceeded"));

        assert!(generation.request(AssetId::TulipFurious).is_some());
        assert_eq!(generation.error(AssetId::TulipFurious), None);
    }

    #[test]
    fn stale_failure_does_not_undo_success() {
        let mut generation = AssetGeneration::new();
        generation.request(AssetId::DialogueBox);
        generation.complete(AssetId::DialogueBox, ImageHandle::new("img://box"));
        generation.fail(AssetId::DialogueBox, &GenerationError::new("caixa_dialogo", "late"));
        assert_eq!(generation.status(AssetId::DialogueBox), GenerationStatus::Done);
    }

    #[test]
    fn generate_with_runs_the_whole_catalogue() {
        let mut generation = AssetGeneration::new();
        let mut service = FakeService { calls: 0, fail_on: None };
        for id in AssetId::ALL {
            assert_eq!(generation.generate_with(id, &mut service), Ok(true));
        }
        assert!(generation.all_done());
        assert_eq!(service.calls, AssetId::COUNT as u32);

        assert_eq!(generation.generate_with(AssetId::RoseHappy, &mut service), Ok(false));
        assert_eq!(service.calls, AssetId::COUNT as u32, "done assets are not regenerated");
        assert_eq!(generation.store().len(), AssetId::COUNT);
    }

    #[test]
    fn generate_with_surfaces_the_error() {
        let mut generation = AssetGeneration::new();
        let mut service = FakeService {
            calls: 0,
            fail_on: Some("droplet"),
        };
        let err = generation
            .generate_with(AssetId::SneezeParticle, &mut service)
            .unwrap_err();
        assert_eq!(err.message, "service unavailable");
        assert_eq!(generation.status(AssetId::SneezeParticle), GenerationStatus::Error);
        assert!(!generation.all_done());
    }

    #[test]
    fn status_serializes_in_caps() {
        let json = serde_json::to_string(&GenerationStatus::Generating).unwrap();
        assert_eq!(json, "\"GENERATING\"");
    }
}
