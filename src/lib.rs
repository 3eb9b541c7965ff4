//! # Grounded
//!
//! Retrieval-augmented question answering over a semantic document store.
//!
//! Grounded ingests documents into a namespaced store, waits for the
//! store's background indexing, retrieves ranked passages for a question,
//! assembles grounding context from them, and asks a language model for an
//! answer bound to that context.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────┐   ┌──────────────┐   ┌───────────┐
//! │ ingest │──▶│  document    │◀──│ retrieve  │
//! │ (add)  │   │  store (HTTP)│   │  (find)   │
//! └────────┘   └──────────────┘   └─────┬─────┘
//!                                       ▼
//!                               ┌───────────────┐   ┌────────┐
//!                               │ context       │──▶│ answer │
//!                               │ assembly      │   │ (LLM)  │
//!                               └───────────────┘   └────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! grounded add ./docs                  # ingest a directory
//! grounded ask "what are the rules?"   # one-shot question
//! grounded chat                        # interactive session
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`store`] | Document store client (external black box) |
//! | [`ingest`] | File and directory ingestion |
//! | [`gate`] | Background-processing barrier |
//! | [`retrieve`] | Scoped ranked retrieval |
//! | [`context`] | Grounding context assembly |
//! | [`answer`] | Prompt construction and generation |
//! | [`session`] | Interactive session loop |
//! | [`get`] | Raw resource retrieval by URI |

pub mod answer;
pub mod config;
pub mod context;
pub mod gate;
pub mod get;
pub mod ingest;
pub mod models;
pub mod retrieve;
pub mod session;
pub mod store;
