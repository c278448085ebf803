//! Voice-query pipeline
//!
//! Strictly sequential: transcription must complete before generation, which
//! must complete before synthesis dispatch. Transcription failure is terminal
//! for the attempt; generation and synthesis failures are absorbed by their
//! stages.

use crate::generate::ResponseGenerator;
use crate::voice::{SpeechSynthesis, SpeechToText};
use crate::Result;

/// Result of one voice-query round trip
#[derive(Debug, Clone)]
pub struct VoiceQueryResult {
    pub transcription: String,
    pub response_text: String,
    pub language_code: String,
    /// Server-synthesized audio as a data URL; `None` means the client
    /// should fall back to local synthesis
    pub audio_url: Option<String>,
}

/// Runs the transcribe → generate → synthesize round trip
pub struct VoiceQueryPipeline {
    stt: SpeechToText,
    generator: ResponseGenerator,
    synthesis: SpeechSynthesis,
}

impl VoiceQueryPipeline {
    #[must_use]
    pub fn new(
        stt: SpeechToText,
        generator: ResponseGenerator,
        synthesis: SpeechSynthesis,
    ) -> Self {
        Self {
            stt,
            generator,
            synthesis,
        }
    }

    /// Process one recorded audio blob
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Stt`] when transcription fails; later stages
    /// never fail the round trip.
    pub async fn run(&self, audio: &[u8]) -> Result<VoiceQueryResult> {
        let transcription = self.stt.transcribe(audio).await?;

        let reply = self.generator.generate(&transcription).await;

        let audio_url = self
            .synthesis
            .synthesize_data_url(&reply.text, &reply.language_code)
            .await;

        Ok(VoiceQueryResult {
            transcription,
            response_text: reply.text,
            language_code: reply.language_code,
            audio_url,
        })
    }

    /// The generator, shared with the chat surface
    #[must_use]
    pub fn generator(&self) -> &ResponseGenerator {
        &self.generator
    }
}
