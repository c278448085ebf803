//! Voice pipeline integration tests
//!
//! Tests voice components without requiring audio hardware

use std::io::Cursor;

use ecovoice_gateway::voice::{
    samples_to_wav, SessionState, VoiceCatalog, VoiceEntry, VoiceSession, SAMPLE_RATE,
};

/// Generate sine wave audio samples
fn generate_sine_samples(frequency: f32, duration_secs: f32, amplitude: f32) -> Vec<f32> {
    let num_samples = (SAMPLE_RATE as f32 * duration_secs) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

#[test]
fn samples_to_wav_produces_riff_container() {
    let samples = generate_sine_samples(440.0, 0.1, 0.5);
    let wav_data = samples_to_wav(&samples, SAMPLE_RATE).unwrap();

    assert_eq!(&wav_data[0..4], b"RIFF");
    assert_eq!(&wav_data[8..12], b"WAVE");
    assert!(wav_data.len() > 44); // WAV header is 44 bytes
}

#[test]
fn wav_roundtrip_preserves_sample_count() {
    let original_samples: Vec<f32> = vec![0.0, 0.5, -0.5, 1.0, -1.0, 0.25];
    let wav_data = samples_to_wav(&original_samples, SAMPLE_RATE).unwrap();

    let cursor = Cursor::new(wav_data);
    let mut reader = hound::WavReader::new(cursor).unwrap();

    let spec = reader.spec();
    assert_eq!(spec.sample_rate, SAMPLE_RATE);
    assert_eq!(spec.channels, 1);

    let read_samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(read_samples.len(), original_samples.len());
}

#[test]
fn empty_recording_still_encodes() {
    let wav_data = samples_to_wav(&[], SAMPLE_RATE).unwrap();
    assert_eq!(&wav_data[0..4], b"RIFF");
}

#[test]
fn voice_session_never_sticks_in_processing() {
    // Success branch
    let mut session = VoiceSession::new();
    assert!(session.start_recording());
    assert!(session.stop_recording());
    assert_eq!(session.state(), SessionState::Processing);
    session.reply_ready();
    session.playback_complete();
    assert_eq!(session.state(), SessionState::Idle);

    // Failure branch
    assert!(session.start_recording());
    assert!(session.stop_recording());
    session.failed();
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn voice_session_rejects_concurrent_recordings() {
    let mut session = VoiceSession::new();
    assert!(session.start_recording());
    assert!(!session.start_recording());

    session.stop_recording();
    // Still not startable while processing
    assert!(!session.start_recording());
}

#[test]
fn catalog_selection_order() {
    let catalog = VoiceCatalog::from_entries(vec![
        VoiceEntry::new("en-GB", "Daniel"),
        VoiceEntry::new("hi-IN", "Lekha"),
        VoiceEntry::new("pa-IN", "Geet"),
    ]);

    // Exact tag
    assert_eq!(catalog.select("pa-IN").unwrap().handle, "Geet");
    // Primary subtag
    assert_eq!(catalog.select("hi-Deva").unwrap().handle, "Lekha");
    // English fallback
    assert_eq!(catalog.select("ta-IN").unwrap().handle, "Daniel");
}
