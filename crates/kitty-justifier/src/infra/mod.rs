//! External service clients
pub mod gemini;

pub use self::gemini::{GeminiClient, GeminiSettings};
