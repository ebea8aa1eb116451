// Library exports for scattergraph

pub mod csv_reader;
pub mod dataset;
pub mod config;
pub mod error;
pub mod palette;
pub mod telemetry;

// Chart pipeline
pub mod scale;
pub mod transition;
pub mod axis;
pub mod points;
pub mod tooltip;
pub mod selector;
pub mod controller;
pub mod ir;
pub mod render;

pub use config::{Axis, AxisField, ChartConfig};
pub use controller::{ChartController, ChartEvent, Selection};
pub use dataset::{Dataset, Record, RecordId};
pub use error::{ChartError, ChartResult};
