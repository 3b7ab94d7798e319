//! # Route Handlers
//!
//! One handler per endpoint. Each validates its input, makes at most one
//! provider call, and converts every failure into its own JSON error body
//! through [`ApiError`].

pub mod audio;
pub mod error;
pub mod image;
pub mod status;
pub mod text;

pub use audio::generate_from_audio;
pub use error::ApiError;
pub use image::generate_text_from_image;
pub use status::root;
pub use text::generate_text;
