//! Speech synthesis dispatcher
//!
//! Plays server-provided reply audio when the pipeline produced it, otherwise
//! falls back to local synthesis with a voice picked from the catalog.
//! Invariant: at most one utterance plays at a time — starting a new one
//! cancels the in-flight one, and every `Started` event is paired with
//! exactly one `Ended` event, including on cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use super::playback::decode_mp3;
use super::tts::decode_data_url;
use super::voices::{SynthesisEngine, VoiceCatalog};
use crate::Result;

/// Playback state transitions for driving UI status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    Started { utterance: u64 },
    Ended { utterance: u64 },
}

/// Output for synthesized samples, implemented by the hardware sink and by
/// test doubles
pub trait AudioSink: Send + Sync {
    /// Play samples until done or `cancel` flips
    ///
    /// # Errors
    ///
    /// Returns error if the output device fails
    fn play(&self, samples: Vec<f32>, cancel: &AtomicBool) -> Result<()>;
}

/// Hardware sink backed by [`super::AudioPlayback`]
pub struct CpalSink {
    playback: super::AudioPlayback,
}

impl CpalSink {
    /// Create a sink on the default output device
    ///
    /// # Errors
    ///
    /// Returns error if the device cannot be opened
    pub fn new() -> Result<Self> {
        Ok(Self {
            playback: super::AudioPlayback::new()?,
        })
    }
}

impl AudioSink for CpalSink {
    fn play(&self, samples: Vec<f32>, cancel: &AtomicBool) -> Result<()> {
        self.playback.play(samples, cancel)
    }
}

/// One in-flight utterance
struct ActiveUtterance {
    id: u64,
    cancel: Arc<AtomicBool>,
    /// Set by whichever side (playback thread or canceller) emits `Ended`
    ended: Arc<AtomicBool>,
}

/// Dispatches reply audio to the speech-output channel
pub struct SpeechDispatcher {
    engine: Arc<dyn SynthesisEngine>,
    catalog: VoiceCatalog,
    sink: Arc<dyn AudioSink>,
    events: mpsc::UnboundedSender<PlaybackEvent>,
    current: Option<ActiveUtterance>,
    next_id: u64,
}

impl SpeechDispatcher {
    /// Create a dispatcher; the returned receiver yields playback events
    pub fn new(
        engine: Arc<dyn SynthesisEngine>,
        sink: Arc<dyn AudioSink>,
    ) -> (Self, mpsc::UnboundedReceiver<PlaybackEvent>) {
        let catalog = VoiceCatalog::load(engine.as_ref());
        let (events, receiver) = mpsc::unbounded_channel();

        (
            Self {
                engine,
                catalog,
                sink,
                events,
                current: None,
                next_id: 1,
            },
            receiver,
        )
    }

    /// Re-read the voice catalog after an engine change notification
    pub fn refresh_voices(&mut self) {
        self.catalog.refresh(self.engine.as_ref());
    }

    /// Speak reply text, preferring server-provided audio
    ///
    /// Cancels any in-flight utterance first. Returns the utterance id.
    /// Missing audio and synthesis failures degrade silently: the utterance
    /// still starts and ends, it just produces no sound.
    pub fn speak(
        &mut self,
        text: &str,
        language_code: &str,
        server_audio_url: Option<&str>,
    ) -> u64 {
        self.cancel_current();

        let id = self.next_id;
        self.next_id += 1;

        let cancel = Arc::new(AtomicBool::new(false));
        let ended = Arc::new(AtomicBool::new(false));

        let _ = self.events.send(PlaybackEvent::Started { utterance: id });

        let samples = self.resolve_audio(text, language_code, server_audio_url);

        self.current = Some(ActiveUtterance {
            id,
            cancel: Arc::clone(&cancel),
            ended: Arc::clone(&ended),
        });

        let sink = Arc::clone(&self.sink);
        let events = self.events.clone();
        std::thread::spawn(move || {
            if let Some(samples) = samples {
                if let Err(e) = sink.play(samples, &cancel) {
                    tracing::error!(error = %e, "utterance playback failed");
                }
            }
            if !ended.swap(true, Ordering::AcqRel) {
                let _ = events.send(PlaybackEvent::Ended { utterance: id });
            }
        });

        id
    }

    /// Cancel the in-flight utterance, if any
    pub fn cancel_current(&mut self) {
        if let Some(active) = self.current.take() {
            active.cancel.store(true, Ordering::Release);
            if !active.ended.swap(true, Ordering::AcqRel) {
                let _ = self.events.send(PlaybackEvent::Ended {
                    utterance: active.id,
                });
            }
        }
    }

    /// Decode server audio or synthesize locally; `None` means silence
    fn resolve_audio(
        &self,
        text: &str,
        language_code: &str,
        server_audio_url: Option<&str>,
    ) -> Option<Vec<f32>> {
        if let Some(url) = server_audio_url {
            match decode_data_url(url).and_then(|mp3| decode_mp3(&mp3)) {
                Ok(samples) => return Some(samples),
                Err(e) => {
                    tracing::warn!(error = %e, "server audio unusable, falling back to local synthesis");
                }
            }
        }

        let voice = self.catalog.select(language_code);
        match voice {
            Some(v) => tracing::debug!(voice = %v.handle, tag = %v.language_tag, "voice selected"),
            None => tracing::debug!(language = %language_code, "no catalog voice, using engine default"),
        }

        match self.engine.synthesize(text, voice) {
            Ok(samples) => Some(samples),
            Err(e) => {
                // Silent degradation: logged only, no user-visible fallback
                tracing::error!(error = %e, "local synthesis failed");
                None
            }
        }
    }

    /// The voice catalog currently in use
    #[must_use]
    pub fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }
}
