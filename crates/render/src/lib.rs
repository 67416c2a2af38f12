//! Rendering for dbgtrace: source reconstruction plus the trace text layout.

pub mod pretty;
pub mod renderer;
pub mod style;

// --- Public API ---
pub use pretty::{flat_fragment, fragment_source, node_source, pattern_source, PrettyCtx};
pub use renderer::{render, RenderOptions};
pub use style::Palette;
