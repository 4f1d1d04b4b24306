use serde::{Deserialize, Serialize};

use crate::core::settings::ChartSettings;
use crate::core::types::{Size, Viewport};
use crate::error::{LayoutError, LayoutResult};

/// Public engine bootstrap configuration.
///
/// This type is serializable so host applications can persist/load chart setup
/// without inventing their own ad-hoc format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEngineConfig {
    pub viewport: Viewport,
    #[serde(default)]
    pub settings: ChartSettings,
    /// Space taken by a legend docked to the chart, if any.
    #[serde(default)]
    pub legend: Option<Size>,
    #[serde(default)]
    pub scroll_offset: usize,
}

impl ChartEngineConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            settings: ChartSettings::default(),
            legend: None,
            scroll_offset: 0,
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: ChartSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn with_legend(mut self, legend: Size) -> Self {
        self.legend = Some(legend);
        self
    }

    #[must_use]
    pub fn with_scroll_offset(mut self, scroll_offset: usize) -> Self {
        self.scroll_offset = scroll_offset;
        self
    }

    pub fn validate(&self) -> LayoutResult<()> {
        if !self.viewport.is_valid() {
            return Err(LayoutError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        if let Some(legend) = self.legend {
            if !(legend.width.is_finite() && legend.height.is_finite())
                || legend.width < 0.0
                || legend.height < 0.0
            {
                return Err(LayoutError::InvalidSettings(
                    "legend size must be finite and non-negative".to_owned(),
                ));
            }
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> LayoutResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            LayoutError::InvalidSettings(format!("failed to serialize engine config: {e}"))
        })
    }

    /// Parses a config; settings are sanitized and the result validated.
    pub fn from_json_str(input: &str) -> LayoutResult<Self> {
        let mut config: Self = serde_json::from_str(input).map_err(|e| {
            LayoutError::InvalidSettings(format!("failed to parse engine config: {e}"))
        })?;
        config.settings = config.settings.sanitized();
        config.validate()?;
        Ok(config)
    }
}
