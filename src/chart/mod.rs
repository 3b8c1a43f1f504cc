// Chart specs, renderer-neutral options and the adapter between them

pub mod adapter;
pub mod option;
pub mod renderer;
pub mod spec;

pub use adapter::{adapt, UnhandledChart, HEATMAP_SCALE, PIE_RADIUS};
pub use option::{Axis, AxisKind, ChartOption, Series};
pub use renderer::{ChartHost, Surface, SurfaceFactory};
pub use spec::{ChartSpec, HeatCell, SeriesRow};
