//! Voice-query session state machine
//!
//! `Idle → Recording → Processing → (Speaking | Idle)`. Processing has no
//! user cancellation; the per-request timeouts on the pipeline stages bound
//! how long it can last.

/// State of one voice-query session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the user to start a recording
    Idle,
    /// Microphone held, buffering audio
    Recording,
    /// Round trip in flight (transcribe, generate, synthesize)
    Processing,
    /// Reply playback in progress
    Speaking,
}

/// Tracks the voice-query flow for one UI surface
#[derive(Debug)]
pub struct VoiceSession {
    state: SessionState,
}

impl Default for VoiceSession {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceSession {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Start recording
    ///
    /// Only valid from Idle; a second start while a session is active is
    /// rejected (returns false, state unchanged).
    pub fn start_recording(&mut self) -> bool {
        if self.state == SessionState::Idle {
            self.state = SessionState::Recording;
            true
        } else {
            tracing::debug!(state = ?self.state, "start rejected, session active");
            false
        }
    }

    /// Stop recording; always transitions to Processing
    pub fn stop_recording(&mut self) -> bool {
        if self.state == SessionState::Recording {
            self.state = SessionState::Processing;
            true
        } else {
            false
        }
    }

    /// Round trip succeeded and playback is starting
    pub fn reply_ready(&mut self) {
        if self.state == SessionState::Processing {
            self.state = SessionState::Speaking;
        }
    }

    /// Round trip failed; an inline error is shown in place of a reply
    pub fn failed(&mut self) {
        if self.state == SessionState::Processing {
            self.state = SessionState::Idle;
        }
    }

    /// Playback finished
    pub fn playback_complete(&mut self) {
        if self.state == SessionState::Speaking {
            self.state = SessionState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_reaches_idle() {
        let mut s = VoiceSession::new();
        assert!(s.start_recording());
        assert!(s.stop_recording());
        assert_eq!(s.state(), SessionState::Processing);
        s.reply_ready();
        assert_eq!(s.state(), SessionState::Speaking);
        s.playback_complete();
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn second_start_is_rejected() {
        let mut s = VoiceSession::new();
        assert!(s.start_recording());
        assert!(!s.start_recording());
        assert_eq!(s.state(), SessionState::Recording);
    }

    #[test]
    fn failure_returns_to_idle() {
        let mut s = VoiceSession::new();
        s.start_recording();
        s.stop_recording();
        s.failed();
        assert_eq!(s.state(), SessionState::Idle);

        // A fresh attempt is possible afterwards
        assert!(s.start_recording());
    }

    #[test]
    fn stop_without_recording_is_a_no_op() {
        let mut s = VoiceSession::new();
        assert!(!s.stop_recording());
        assert_eq!(s.state(), SessionState::Idle);
    }
}
