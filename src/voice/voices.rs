//! Voice catalog for local synthesis fallback
//!
//! The catalog mirrors the voices the execution environment exposes. It is
//! loaded once and only re-read on an engine change notification.

use crate::lang::primary_subtag;
use crate::Result;

/// One synthesis voice exposed by the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceEntry {
    /// BCP-47 language tag (e.g. "hi-IN")
    pub language_tag: String,
    /// Engine-specific voice handle
    pub handle: String,
}

impl VoiceEntry {
    #[must_use]
    pub fn new(language_tag: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            language_tag: language_tag.into(),
            handle: handle.into(),
        }
    }
}

/// Source of synthesis voices and audio, implemented per platform engine
pub trait SynthesisEngine: Send + Sync {
    /// Voices currently available
    fn voices(&self) -> Vec<VoiceEntry>;

    /// Synthesize text with the given voice (engine default when `None`)
    ///
    /// # Errors
    ///
    /// Returns error if the engine cannot produce audio
    fn synthesize(&self, text: &str, voice: Option<&VoiceEntry>) -> Result<Vec<f32>>;
}

/// Read-only snapshot of the environment's voices
pub struct VoiceCatalog {
    entries: Vec<VoiceEntry>,
}

impl VoiceCatalog {
    /// Load the catalog from an engine
    #[must_use]
    pub fn load(engine: &dyn SynthesisEngine) -> Self {
        let entries = engine.voices();
        tracing::debug!(voices = entries.len(), "voice catalog loaded");
        Self { entries }
    }

    /// Build a catalog from explicit entries
    #[must_use]
    pub fn from_entries(entries: Vec<VoiceEntry>) -> Self {
        Self { entries }
    }

    /// Re-read the catalog after an engine change notification
    pub fn refresh(&mut self, engine: &dyn SynthesisEngine) {
        self.entries = engine.voices();
        tracing::debug!(voices = self.entries.len(), "voice catalog refreshed");
    }

    /// Select a voice for a language code
    ///
    /// Resolution order: exact tag match, same primary subtag, any English
    /// voice, then `None` (engine default).
    #[must_use]
    pub fn select(&self, language_code: &str) -> Option<&VoiceEntry> {
        let exact = self
            .entries
            .iter()
            .find(|v| v.language_tag.eq_ignore_ascii_case(language_code));
        if exact.is_some() {
            return exact;
        }

        let primary = primary_subtag(language_code).to_ascii_lowercase();
        let subtag = self
            .entries
            .iter()
            .find(|v| v.language_tag.to_ascii_lowercase().contains(&primary));
        if subtag.is_some() {
            return subtag;
        }

        self.entries
            .iter()
            .find(|v| v.language_tag.to_ascii_lowercase().contains("en"))
    }

    /// All catalog entries
    #[must_use]
    pub fn entries(&self) -> &[VoiceEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> VoiceCatalog {
        VoiceCatalog::from_entries(vec![
            VoiceEntry::new("en-US", "Samantha"),
            VoiceEntry::new("hi-IN", "Lekha"),
            VoiceEntry::new("ta-IN", "Valluvar"),
        ])
    }

    #[test]
    fn exact_tag_wins() {
        let c = catalog();
        assert_eq!(c.select("hi-IN").unwrap().handle, "Lekha");
    }

    #[test]
    fn primary_subtag_matches_when_region_differs() {
        let c = VoiceCatalog::from_entries(vec![
            VoiceEntry::new("en-US", "Samantha"),
            VoiceEntry::new("hi-Deva", "Lekha"),
        ]);
        assert_eq!(c.select("hi-IN").unwrap().handle, "Lekha");
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        let c = catalog();
        assert_eq!(c.select("pa-IN").unwrap().handle, "Samantha");
    }

    #[test]
    fn empty_catalog_selects_nothing() {
        let c = VoiceCatalog::from_entries(vec![]);
        assert!(c.select("en-IN").is_none());
    }
}
