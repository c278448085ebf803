//! Microphone capture for voice queries
//!
//! The microphone is an exclusive resource: at most one recording session is
//! active at a time, and the device is released on every exit path.

use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, Stream, StreamConfig};

use crate::{Error, Result};

/// Sample rate for audio capture (16kHz for speech)
pub const SAMPLE_RATE: u32 = 16000;

/// Captures one recording session from the default input device
pub struct AudioCapture {
    #[allow(dead_code)]
    device: Device,
    config: StreamConfig,
    chunks: Arc<Mutex<Vec<f32>>>,
    stream: Option<Stream>,
}

impl AudioCapture {
    /// Create a new audio capture instance
    ///
    /// # Errors
    ///
    /// Returns [`Error::Audio`] if no input device is available or no config
    /// fits — the "permission denied / device unavailable" surface the UI
    /// shows as a blocking notice.
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| Error::Audio("no input device available".to_string()))?;

        let supported_config = device
            .supported_input_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .find(|c| {
                c.channels() == 1
                    && c.min_sample_rate() <= SampleRate(SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(SAMPLE_RATE)
            })
            .ok_or_else(|| Error::Audio("no suitable audio config found".to_string()))?;

        let config = supported_config
            .with_sample_rate(SampleRate(SAMPLE_RATE))
            .config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = SAMPLE_RATE,
            channels = config.channels,
            "audio capture initialized"
        );

        Ok(Self {
            device,
            config,
            chunks: Arc::new(Mutex::new(Vec::new())),
            stream: None,
        })
    }

    /// Start a recording session
    ///
    /// Starting while a session is already active is ignored.
    ///
    /// # Errors
    ///
    /// Returns error if the input stream cannot be built or started; no
    /// stream is retained on failure, so the device is not left locked.
    pub fn start(&mut self) -> Result<()> {
        if self.stream.is_some() {
            tracing::debug!("recording session already active, start ignored");
            return Ok(());
        }

        self.clear();

        let chunks = Arc::clone(&self.chunks);
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| Error::Audio("no input device".to_string()))?;

        let config = self.config.clone();

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut buf) = chunks.lock() {
                        buf.extend_from_slice(data);
                    }
                },
                |err| {
                    tracing::error!(error = %err, "audio capture error");
                },
                None,
            )
            .map_err(|e| Error::Audio(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;
        self.stream = Some(stream);

        tracing::debug!("recording session started");
        Ok(())
    }

    /// Stop the session and release the microphone
    pub fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            drop(stream);
            tracing::debug!("recording session stopped, microphone released");
        }
    }

    /// Stop the session and finalize the buffered chunks into one WAV blob
    ///
    /// The buffer is consumed; the session is over afterwards.
    ///
    /// # Errors
    ///
    /// Returns error if WAV encoding fails
    pub fn finish_wav(&mut self) -> Result<Vec<u8>> {
        self.stop();
        let samples = self
            .chunks
            .lock()
            .map(|mut buf| std::mem::take(&mut *buf))
            .unwrap_or_default();
        samples_to_wav(&samples, SAMPLE_RATE)
    }

    /// Get buffered audio without ending the session
    #[must_use]
    pub fn peek_buffer(&self) -> Vec<f32> {
        self.chunks
            .lock()
            .map(|buf| buf.clone())
            .unwrap_or_default()
    }

    /// Discard buffered audio
    pub fn clear(&self) {
        if let Ok(mut buf) = self.chunks.lock() {
            buf.clear();
        }
    }

    /// Check if a recording session is active
    #[must_use]
    pub const fn is_capturing(&self) -> bool {
        self.stream.is_some()
    }

    /// Get the sample rate
    #[must_use]
    pub const fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }
}

impl Drop for AudioCapture {
    fn drop(&mut self) {
        // Release the device even if the owner forgot to stop
        self.stop();
    }
}

/// Convert f32 samples to WAV bytes for the transcription upload
///
/// # Errors
///
/// Returns error if WAV encoding fails
pub fn samples_to_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).map_err(|e| Error::Audio(e.to_string()))?;

        for &sample in samples {
            // Convert f32 [-1.0, 1.0] to i16
            #[allow(clippy::cast_possible_truncation)]
            let sample_i16 = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            writer
                .write_sample(sample_i16)
                .map_err(|e| Error::Audio(e.to_string()))?;
        }

        writer.finalize().map_err(|e| Error::Audio(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}
