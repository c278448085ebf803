//! Voice processing module
//!
//! Handles microphone capture, transcription and synthesis gateways, the
//! playback dispatcher, and the voice-query state machine.

mod capture;
mod dispatcher;
mod playback;
mod session;
mod stt;
mod tts;
mod voices;

pub use capture::{AudioCapture, SAMPLE_RATE, samples_to_wav};
pub use dispatcher::{AudioSink, CpalSink, PlaybackEvent, SpeechDispatcher};
pub use playback::{AudioPlayback, decode_mp3};
pub use session::{SessionState, VoiceSession};
pub use stt::SpeechToText;
pub use tts::{SpeechSynthesis, decode_data_url};
pub use voices::{SynthesisEngine, VoiceCatalog, VoiceEntry};
