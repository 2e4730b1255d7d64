//! Pipeline stages for contract analysis.
//!
//! ```text
//! input ──▶ extract ──▶ (prompt) ──▶ client
//! (upload)   (lopdf)                 (OpenAI)
//! ```
//!
//! 1. [`input`]  : hold an uploaded file in memory, or read one from disk,
//!    and check the `%PDF` signature
//! 2. [`extract`]: concatenate per-page text layers; runs in
//!    `spawn_blocking` because parsing is CPU-bound
//!
//! The network stage lives in [`crate::client`] and is driven by
//! [`crate::analyze::dispatch`].

pub mod extract;
pub mod input;
