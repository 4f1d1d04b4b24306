use tracing::{debug, warn};

use crate::core::types::DataPoint;
use crate::error::LayoutResult;
use crate::render::Renderer;

use super::ChartEngine;

impl<R: Renderer> ChartEngine<R> {
    /// Replaces all data points.
    ///
    /// The whole batch is rejected when any point carries a non-finite
    /// number; the previous data stays in place.
    pub fn set_data(&mut self, points: Vec<DataPoint>) -> LayoutResult<()> {
        for (index, point) in points.iter().enumerate() {
            if let Err(err) = point.validate() {
                warn!(index, error = %err, "rejecting data batch");
                return Err(err);
            }
        }
        debug!(count = points.len(), "set data points");
        self.points = points;
        Ok(())
    }

    pub fn clear_data(&mut self) {
        debug!(previous = self.points.len(), "clear data points");
        self.points.clear();
        self.frame = None;
    }
}
