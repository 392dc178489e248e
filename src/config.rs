//! Scene configuration. Every field has a default so the page can pass a
//! partial JSON object (or nothing at all) to `start_scene`.

use serde::Deserialize;

use crate::audio::sequencer::DEFAULT_BPM;
use crate::error::{Result, SceneError};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneConfig {
    // --- DOM wiring ---
    pub canvas_id: String,
    pub start_button_id: String,
    pub overlay_id: String,
    pub poem_button_id: String,

    // --- Poem collaborator ---
    pub poem_endpoint: String,
    pub greeting: Vec<String>,
    pub fallback_poem: Vec<String>,

    // --- Scene population ---
    pub sunflower_count: usize,
    pub star_count: usize,
    pub firefly_count: usize,
    pub shooting_star_count: usize,
    pub ground_margin: f64, // ground level = viewport height - margin

    // --- Timing ---
    pub typing_cadence: u64, // frames per revealed character
    pub bpm: f64,

    /// Fixed RNG seed; `None` draws one from the browser at start.
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            canvas_id: "sunflower-canvas".into(),
            start_button_id: "start-button".into(),
            overlay_id: "audio-overlay".into(),
            poem_button_id: "gemini-button".into(),
            poem_endpoint: "/.netlify/functions/get-poem".into(),
            greeting: vec!["Você é o meu sol".into()],
            fallback_poem: vec![
                "Não foi possível gerar um poema.".into(),
                "Tente novamente.".into(),
            ],
            sunflower_count: 11,
            star_count: 150,
            firefly_count: 20,
            shooting_star_count: 2,
            ground_margin: 70.0,
            typing_cadence: 3,
            bpm: DEFAULT_BPM,
            seed: None,
        }
    }
}

impl SceneConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sunflower_count == 0 {
            return Err(SceneError::ConfigValue("sunflowerCount must be at least 1".into()));
        }
        if self.typing_cadence == 0 {
            return Err(SceneError::ConfigValue("typingCadence must be at least 1".into()));
        }
        if !(self.bpm.is_finite() && self.bpm > 0.0) {
            return Err(SceneError::ConfigValue(format!("bpm must be positive, got {}", self.bpm)));
        }
        if !(self.ground_margin.is_finite() && self.ground_margin >= 0.0) {
            return Err(SceneError::ConfigValue(format!(
                "groundMargin must be non-negative, got {}",
                self.ground_margin
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg = SceneConfig::from_json(r#"{ "sunflowerCount": 5, "seed": 7 }"#).unwrap();
        assert_eq!(cfg.sunflower_count, 5);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.star_count, 150);
        assert_eq!(cfg.poem_endpoint, "/.netlify/functions/get-poem");
    }

    #[test]
    fn test_rejects_zero_cadence() {
        let err = SceneConfig::from_json(r#"{ "typingCadence": 0 }"#).unwrap_err();
        assert!(matches!(err, SceneError::ConfigValue(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            SceneConfig::from_json("{ sunflowerCount: }"),
            Err(SceneError::ConfigParse(_))
        ));
    }
}
