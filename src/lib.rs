//! # FAQ Harness
//!
//! A multilingual FAQ matching service. Free-text customer questions are
//! matched against a fixed corpus of question/answer records and answered
//! with the closest entry, or with a localized "no answer found" message.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌────────────┐   ┌───────────┐   ┌─────────────┐
//! │ question │──▶│  language  │──▶│  matcher  │──▶│ conversation│
//! │ (HTTP/CLI)│  │ identifier │   │ exact+cos │   │     log     │
//! └──────────┘   └────────────┘   └─────┬─────┘   └─────────────┘
//!                                       │
//!                                 ┌─────▼─────┐
//!                                 │ FAQ index │ ◀── built once at startup
//!                                 │ per lang  │     from corpus + embeddings
//!                                 └───────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! faq check                       # validate config and corpus
//! faq detect "ขออภัย ไม่พบคำตอบ"    # print detected language
//! faq ask "How do I reset my password?"
//! faq serve                       # start HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`error`] | Error taxonomy |
//! | [`embedding`] | Embedding provider abstraction and vector math |
//! | [`language`] | Language identification |
//! | [`corpus`] | Corpus file loading |
//! | [`index`] | Per-language FAQ index |
//! | [`matcher`] | Exact and similarity matching |
//! | [`conversation_log`] | Append-only audit trail |
//! | [`engine`] | Bootstrap and per-question pipeline |
//! | [`server`] | HTTP server |

pub mod config;
pub mod conversation_log;
pub mod corpus;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod index;
pub mod language;
pub mod matcher;
pub mod models;
pub mod server;
