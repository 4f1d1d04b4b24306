pub mod bar_geometry;
pub mod bar_thickness;
pub mod domain;
pub mod label_format;
pub mod label_placement;
pub mod label_position;
pub mod primitives;
pub mod scale;
pub mod settings;
pub mod small_multiple;
pub mod text_metrics;
pub mod types;
pub mod windowing;

pub use bar_geometry::{RangeMarker, ScoreMarker, compute_bar_rects, compute_markers};
pub use domain::{AxesDomains, CategoryDomain, Domain, calculate_axes_domains};
pub use label_format::{DisplayUnits, ResolvedValueFormat, ValueFormat};
pub use label_placement::{PlacedLabel, place_labels};
pub use label_position::{LabelPosition, LabelPositionShift, PolicyPositionShift};
pub use scale::{BandScale, CategoryAxis, CategoryScale, LinearScale, ResolvedAxes, ValueAxis};
pub use settings::{
    AxisType, CategoryAxisSettings, ChartSettings, DataLabelSettings, RangeMode,
    ScrollDomainMode, ScrollSettings, SmallMultipleLayoutMode, SmallMultipleSettings,
    ValueAxisSettings,
};
pub use small_multiple::{GridPartition, GroupKeys, ScrollbarFlags, partition_viewport};
pub use text_metrics::{HeuristicTextMeasurer, TextMeasurer, TextSize, TextStyle};
pub use types::{CategoryValue, DataPoint, GroupKey, Point, Rect, Size, Viewport};
pub use windowing::ScrollState;
