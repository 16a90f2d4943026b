//! Renderers for the supported output dialects.

mod banner;
mod emphasis;
mod gemini;
mod layout;
mod micron;
mod text;

pub use gemini::GeminiRenderer;
pub use micron::MicronRenderer;
pub use text::TextRenderer;
