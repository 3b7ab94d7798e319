//! Gateway that forwards text, image, and audio prompts to Gemini
//!
//! Each HTTP endpoint validates its input, sends a single `generateContent`
//! call to the provider, and reshapes the answer into a JSON payload.

pub mod ai;
pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
pub mod upload;

pub use error::{Error, Result};
