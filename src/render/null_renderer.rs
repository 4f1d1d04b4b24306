use crate::error::LayoutResult;
use crate::render::{LayoutFrame, Renderer};

/// No-op renderer used by tests and headless engine usage.
///
/// It still validates frame content so tests can catch invalid geometry before
/// a real backend is attached.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_bar_count: usize,
    pub last_label_count: usize,
    pub render_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &LayoutFrame) -> LayoutResult<()> {
        frame.validate()?;
        self.last_bar_count = frame.bar_count();
        self.last_label_count = frame.label_count();
        self.render_count += 1;
        Ok(())
    }
}
