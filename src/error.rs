use thiserror::Error;

use crate::config::Axis;
use crate::dataset::RecordId;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("'{key}' is not a selectable {axis} field")]
    UnknownField { axis: Axis, key: String },

    #[error("dataset has no numeric column '{0}'")]
    MissingColumn(String),

    #[error("cannot compute a scale domain from an empty dataset")]
    EmptyDataset,

    #[error("no record with id {0:?}")]
    UnknownRecord(RecordId),
}
