mod frame;
mod null_renderer;

pub use frame::{LayoutBody, LayoutFrame};
pub use null_renderer::NullRenderer;

use crate::error::LayoutResult;

/// Contract implemented by any drawing backend.
///
/// Backends receive a fully resolved, deterministic `LayoutFrame` so drawing
/// code stays isolated from domain, scale and label placement logic.
pub trait Renderer {
    fn render(&mut self, frame: &LayoutFrame) -> LayoutResult<()>;
}
