use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::config::OcrConfig;
use crate::error::Result;

use super::TesseractEngine;

/// Normalized cache key for a language set: lowercased, deduplicated,
/// sorted, and joined with `-` so that `["de","en"]` and `["EN","de"]`
/// resolve to the same engine.
pub fn normalize_key(languages: &[String]) -> String {
    let mut codes: Vec<String> = languages
        .iter()
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .collect();
    codes.sort();
    codes.dedup();
    codes.join("-")
}

/// Language-set-keyed cache of initialized OCR engines.
///
/// Engines are built lazily on first use and never evicted. Construction
/// happens under the map lock so concurrent cold starts for the same
/// language set do not build duplicate engines.
#[derive(Clone)]
pub struct EngineRegistry {
    config: OcrConfig,
    engines: Arc<Mutex<HashMap<String, Arc<TesseractEngine>>>>,
}

impl EngineRegistry {
    pub fn new(config: OcrConfig) -> Self {
        Self {
            config,
            engines: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Fetch the engine for a language set, initializing it on first use.
    pub async fn get_or_init(&self, languages: &[String]) -> Result<Arc<TesseractEngine>> {
        let key = normalize_key(languages);

        let mut engines = self.engines.lock().await;
        if let Some(engine) = engines.get(&key) {
            return Ok(Arc::clone(engine));
        }

        info!(languages = %key, "initializing OCR engine");
        let engine = Arc::new(TesseractEngine::new(languages, &self.config)?);
        engines.insert(key, Arc::clone(&engine));
        Ok(engine)
    }

    /// Number of engines currently cached.
    #[allow(dead_code)]
    pub async fn len(&self) -> usize {
        self.engines.lock().await.len()
    }
}
