use tracing::debug;

use crate::core::label_position::{LabelPositionShift, PolicyPositionShift};
use crate::core::settings::ChartSettings;
use crate::core::text_metrics::{HeuristicTextMeasurer, TextMeasurer};
use crate::core::types::{DataPoint, Size, Viewport};
use crate::core::windowing::{ScrollState, shift_offset};
use crate::error::{LayoutError, LayoutResult};
use crate::render::{LayoutBody, LayoutFrame, Renderer};

use super::axis_layout_pass_resolver::{ChartLayoutRequest, resolve_chart_layout};
use super::engine_config::ChartEngineConfig;
use super::layout_pipeline::LayoutServices;
use super::small_multiple_layout::{SmallMultipleRequest, resolve_small_multiple_layout};

/// Main orchestration facade consumed by host applications.
///
/// `ChartEngine` owns the current data, settings, viewport and scroll
/// offset, runs the layout pipeline on [`ChartEngine::update`] and hands the
/// resulting frame to its renderer. Every update replaces the previous frame.
pub struct ChartEngine<R: Renderer> {
    pub(super) renderer: R,
    pub(super) config: ChartEngineConfig,
    pub(super) points: Vec<DataPoint>,
    pub(super) measurer: Box<dyn TextMeasurer>,
    pub(super) position_shift: Option<Box<dyn LabelPositionShift>>,
    pub(super) frame: Option<LayoutFrame>,
}

impl<R: Renderer> ChartEngine<R> {
    pub fn new(renderer: R, config: ChartEngineConfig) -> LayoutResult<Self> {
        config.validate()?;
        let mut config = config;
        config.settings = config.settings.sanitized();
        Ok(Self {
            renderer,
            config,
            points: Vec::new(),
            measurer: Box::new(HeuristicTextMeasurer),
            position_shift: None,
            frame: None,
        })
    }

    /// Replaces the text measurer used for every label and margin.
    #[must_use]
    pub fn with_text_measurer(mut self, measurer: Box<dyn TextMeasurer>) -> Self {
        self.measurer = measurer;
        self
    }

    /// Replaces the default label position policy.
    #[must_use]
    pub fn with_position_shift(mut self, shift: Box<dyn LabelPositionShift>) -> Self {
        self.position_shift = Some(shift);
        self
    }

    #[must_use]
    pub fn config(&self) -> &ChartEngineConfig {
        &self.config
    }

    #[must_use]
    pub fn settings(&self) -> &ChartSettings {
        &self.config.settings
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.config.viewport
    }

    #[must_use]
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    #[must_use]
    pub fn frame(&self) -> Option<&LayoutFrame> {
        self.frame.as_ref()
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Stores sanitized settings; takes effect on the next update.
    pub fn set_settings(&mut self, settings: ChartSettings) {
        self.config.settings = settings.sanitized();
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> LayoutResult<()> {
        if !viewport.is_valid() {
            return Err(LayoutError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        self.config.viewport = viewport;
        Ok(())
    }

    pub fn set_legend(&mut self, legend: Option<Size>) -> LayoutResult<()> {
        let candidate = ChartEngineConfig {
            legend,
            ..self.config.clone()
        };
        candidate.validate()?;
        self.config.legend = legend;
        Ok(())
    }

    /// Current scroll state, as of the last update.
    #[must_use]
    pub fn scroll_state(&self) -> ScrollState {
        match self.frame.as_ref().map(|frame| &frame.body) {
            Some(LayoutBody::Single(chart)) => chart.scroll,
            _ => ScrollState::default(),
        }
    }

    /// Moves the category window by `delta` categories and re-runs layout.
    ///
    /// Before any layout exists the delta applies to the requested offset,
    /// which the update then clamps.
    pub fn scroll_by(&mut self, delta: i64) -> LayoutResult<ScrollState> {
        let state = self.scroll_state();
        let offset = if state.total == 0 {
            shift_offset(self.config.scroll_offset, delta)
        } else {
            state.scrolled_by(delta).offset
        };
        self.scroll_to(offset)
    }

    /// Places the category window at `offset` and re-runs layout.
    pub fn scroll_to(&mut self, offset: usize) -> LayoutResult<ScrollState> {
        self.config.scroll_offset = offset;
        self.update()?;
        Ok(self.scroll_state())
    }

    /// Whether the current data asks for small-multiple layout.
    #[must_use]
    pub fn is_small_multiple(&self) -> bool {
        self.points
            .iter()
            .any(|point| point.row_key.is_some() || point.column_key.is_some())
    }

    /// Runs the full layout pipeline and stores the resulting frame.
    pub fn update(&mut self) -> LayoutResult<&LayoutFrame> {
        let viewport = self.config.viewport;
        let legend = self.config.legend.unwrap_or_default();
        let settings = &self.config.settings;
        let policy = PolicyPositionShift::new(
            settings.data_labels.position,
            settings.data_labels.overflow_text,
        );
        let position_shift: &dyn LabelPositionShift = match self.position_shift.as_deref() {
            Some(shift) => shift,
            None => &policy,
        };
        let services = LayoutServices {
            measurer: self.measurer.as_ref(),
            position_shift,
            legend_present: self.config.legend.is_some(),
        };

        let body = if self.is_small_multiple() {
            debug!(
                points = self.points.len(),
                layout_mode = ?settings.small_multiple.layout_mode,
                "update small multiple layout"
            );
            LayoutBody::SmallMultiple(resolve_small_multiple_layout(
                &SmallMultipleRequest {
                    viewport: viewport.size(),
                    legend,
                    points: &self.points,
                    settings,
                },
                services,
            ))
        } else {
            debug!(
                points = self.points.len(),
                scroll_offset = self.config.scroll_offset,
                "update chart layout"
            );
            let chart_size = Size::new(
                viewport.size().width - legend.width,
                viewport.size().height - legend.height,
            )
            .non_negative();
            LayoutBody::Single(resolve_chart_layout(
                &ChartLayoutRequest {
                    chart_size,
                    points: &self.points,
                    settings,
                    scroll_offset: self.config.scroll_offset,
                },
                services,
            ))
        };

        if let LayoutBody::Single(chart) = &body {
            if chart.scroll_active {
                self.config.scroll_offset = chart.scroll.offset;
            }
        }

        let frame = self
            .frame
            .insert(LayoutFrame::new(viewport, self.config.legend, body));
        Ok(frame)
    }

    /// Updates and hands the frame to the renderer.
    pub fn render(&mut self) -> LayoutResult<()> {
        self.update()?;
        match self.frame.as_ref() {
            Some(frame) => self.renderer.render(frame),
            None => Ok(()),
        }
    }
}
