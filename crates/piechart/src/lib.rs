//! Pie and donut chart model: slice layout, hit testing and selection animation.
//!
//! Drawing is left to the host; everything here is plain geometry and state.

pub mod animator;
pub mod chart;
pub mod color;
pub mod geometry;
pub mod keyed;
pub mod label;
pub mod layout;
pub mod normalize;
pub mod source;
pub mod style;

pub use animator::{Phase, SelectionAnimator, SelectionEvent};
pub use chart::{ChartError, PieChart};
pub use color::{Color, ColorParseError};
pub use geometry::{Point, Quadrant, Rect};
pub use hit_test::{Hit, HitTester};
pub use keyed::{KeyedDataSource, LegendEntry, SliceKey};
pub use layout::{PieGeometry, Slice, SliceGeometryBuilder, SliceInput};
pub use source::{PieChartDataSource, PieChartDelegate};
pub use style::{ChartStyle, LabelFont};
