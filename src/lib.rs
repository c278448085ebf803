//! EcoVoice Gateway - Voice and chat gateway for a waste-management companion
//!
//! This library provides the core functionality for the EcoVoice gateway:
//! - Voice-query pipeline (capture, STT, reply generation, TTS)
//! - Waste-segregation chatbot with an append-only session store
//! - HTTP API surface for the companion app
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  Companion App                       │
//! │   Voice button  │  Chat view  │  Replay control     │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                EcoVoice Gateway                      │
//! │   Capture  │  Pipeline  │  Dispatcher  │  Chat     │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │              Hosted services                         │
//! │   Sarvam ASR  │  Gemini (text + audio)              │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod generate;
pub mod lang;
pub mod pipeline;
pub mod voice;

pub use chat::{ChatMessage, ChatSession, Sender, SUGGESTED_QUESTIONS};
pub use config::Config;
pub use error::{Error, Result};
pub use generate::{Reply, ResponseGenerator, APOLOGY};
pub use lang::{detect_language, DEFAULT_LANGUAGE};
pub use pipeline::{VoiceQueryPipeline, VoiceQueryResult};
