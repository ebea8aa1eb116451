// Typed records loaded from the census table

use anyhow::{Context, Result};
use indexmap::IndexMap;
use std::path::Path;
use tracing::info;

use crate::csv_reader::{self, CsvData};
use crate::error::{ChartError, ChartResult};

/// Stable identity of a record: its row position at load time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub usize);

/// Which columns the loader reads and how it uses them
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSchema {
    /// Short text drawn on each mark (e.g. "AL")
    pub label_column: String,
    /// Long display name used in tooltips (e.g. "Alabama")
    pub name_column: String,
    pub numeric_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: RecordId,
    label: String,
    name: String,
    fields: IndexMap<String, f64>,
}

impl Record {
    pub fn new(id: RecordId, label: &str, name: &str, fields: IndexMap<String, f64>) -> Self {
        Record {
            id,
            label: label.to_string(),
            name: name.to_string(),
            fields,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self, key: &str) -> ChartResult<f64> {
        self.fields
            .get(key)
            .copied()
            .ok_or_else(|| ChartError::MissingColumn(key.to_string()))
    }
}

/// Ordered, immutable sequence of records sharing one field set
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
    field_keys: Vec<String>,
}

impl Dataset {
    pub fn load(path: &Path, schema: &DatasetSchema) -> Result<Self> {
        let csv = csv_reader::read_csv_from_path(path)?;
        let dataset = Dataset::from_csv(&csv, schema)
            .with_context(|| format!("Invalid data in '{}'", path.display()))?;
        info!(
            path = %path.display(),
            records = dataset.len(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    /// Coerce every numeric column up front so no parse error can surface
    /// after the chart exists.
    pub fn from_csv(data: &CsvData, schema: &DatasetSchema) -> Result<Self> {
        if data.rows.is_empty() {
            anyhow::bail!("Dataset must contain at least one data row");
        }

        let labels = csv_reader::extract_column_as_string(data, &schema.label_column)
            .context("Failed to read record labels")?;
        let names = csv_reader::extract_column_as_string(data, &schema.name_column)
            .context("Failed to read record names")?;

        let mut columns = Vec::with_capacity(schema.numeric_columns.len());
        for key in &schema.numeric_columns {
            let values = csv_reader::extract_column(data, key)
                .with_context(|| format!("Failed to load numeric field '{}'", key))?;
            columns.push((key.clone(), values));
        }

        let records = labels
            .iter()
            .zip(names.iter())
            .enumerate()
            .map(|(row, (label, name))| {
                let fields = columns
                    .iter()
                    .map(|(key, values)| (key.clone(), values[row]))
                    .collect();
                Record::new(RecordId(row), label, name, fields)
            })
            .collect();

        Ok(Dataset {
            records,
            field_keys: schema.numeric_columns.clone(),
        })
    }

    pub fn from_records(field_keys: Vec<String>, records: Vec<Record>) -> Self {
        Dataset { records, field_keys }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn get(&self, id: RecordId) -> ChartResult<&Record> {
        self.records
            .get(id.0)
            .filter(|r| r.id == id)
            .ok_or(ChartError::UnknownRecord(id))
    }

    pub fn find_by_label(&self, label: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.label.eq_ignore_ascii_case(label))
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.field_keys.iter().any(|k| k == key)
    }

    pub fn values(&self, key: &str) -> ChartResult<Vec<f64>> {
        if !self.has_field(key) {
            return Err(ChartError::MissingColumn(key.to_string()));
        }
        self.records.iter().map(|r| r.value(key)).collect()
    }
}

#[cfg(test)]
pub(crate) fn sample_dataset() -> Dataset {
    let csv = csv_reader::read_csv(std::io::Cursor::new(
        "state,abbr,poverty,age,income,healthcare,smokes,obesity\n\
         Alabama,AL,18.6,38.1,43253,11.1,20.6,32.7\n\
         Alaska,AK,11.2,33.6,61286,13.2,18.4,26.7\n",
    ))
    .unwrap();
    Dataset::from_csv(&csv, &crate::config::ChartConfig::default().schema()).unwrap()
}
