// Hover tooltips bound to the current field selection

use indexmap::IndexMap;
use tracing::debug;

use crate::controller::Selection;
use crate::dataset::{Dataset, Record, RecordId};
use crate::error::ChartResult;
use crate::ir::TooltipFrame;

/// Field key to the text shown beside its value.
///
/// Keys missing from the table resolve to the per-axis fallback, so an
/// extended axis enumeration still gets a label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTable {
    x: IndexMap<String, String>,
    y: IndexMap<String, String>,
    x_fallback: String,
    y_fallback: String,
}

impl Default for LabelTable {
    fn default() -> Self {
        let income = "Household Income (Median)";
        let obese = "Obese (%)";
        LabelTable {
            x: [
                ("poverty", "In Poverty (%)"),
                ("age", "Age (Median)"),
                ("income", income),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
            y: [
                ("healthcare", "Lacks Healthcare (%)"),
                ("smokes", "Smokes (%)"),
                ("obesity", obese),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
            x_fallback: income.to_string(),
            y_fallback: obese.to_string(),
        }
    }
}

impl LabelTable {
    pub fn x_label(&self, key: &str) -> &str {
        self.x.get(key).map(String::as_str).unwrap_or(&self.x_fallback)
    }

    pub fn y_label(&self, key: &str) -> &str {
        self.y.get(key).map(String::as_str).unwrap_or(&self.y_fallback)
    }
}

/// Accessors and labels for one selection; replaced on every redraw
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipBinding {
    pub x_field: String,
    pub y_field: String,
    pub x_label: String,
    pub y_label: String,
}

impl TooltipBinding {
    pub fn lines(&self, record: &Record) -> ChartResult<Vec<String>> {
        let x = record.value(&self.x_field)?;
        let y = record.value(&self.y_field)?;
        Ok(vec![
            record.name().to_string(),
            format!("{} {}", self.y_label, y),
            format!("{} {}", self.x_label, x),
        ])
    }

    /// `"<name>\n<yLabel> <yValue>\n<xLabel> <xValue>"`
    pub fn format(&self, record: &Record) -> ChartResult<String> {
        Ok(self.lines(record)?.join("\n"))
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Hover {
    record: RecordId,
    anchor: (f64, f64),
    lines: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TooltipController {
    table: LabelTable,
    offset: (f64, f64),
    binding: Option<TooltipBinding>,
    hover: Option<Hover>,
}

impl TooltipController {
    pub fn new(table: LabelTable, offset: (f64, f64)) -> Self {
        TooltipController {
            table,
            offset,
            binding: None,
            hover: None,
        }
    }

    pub fn binding(&self) -> Option<&TooltipBinding> {
        self.binding.as_ref()
    }

    pub fn hovered(&self) -> Option<RecordId> {
        self.hover.as_ref().map(|h| h.record)
    }

    /// Rebind to `selection`. A tooltip that is showing is re-rendered with
    /// the new labels and values so it never describes the previous fields.
    pub fn attach(&mut self, selection: &Selection, dataset: &Dataset) -> ChartResult<()> {
        let binding = TooltipBinding {
            x_field: selection.x().to_string(),
            y_field: selection.y().to_string(),
            x_label: self.table.x_label(selection.x()).to_string(),
            y_label: self.table.y_label(selection.y()).to_string(),
        };

        if let Some(hover) = &mut self.hover {
            hover.lines = binding.lines(dataset.get(hover.record)?)?;
        }
        self.binding = Some(binding);
        Ok(())
    }

    pub fn hover_enter(&mut self, record: &Record, pointer: (f64, f64)) -> ChartResult<()> {
        let Some(binding) = &self.binding else {
            return Ok(());
        };
        let lines = binding.lines(record)?;
        debug!(record = record.label(), "tooltip shown");
        self.hover = Some(Hover {
            record: record.id(),
            anchor: pointer,
            lines,
        });
        Ok(())
    }

    pub fn hover_leave(&mut self) {
        if let Some(hover) = self.hover.take() {
            debug!(record = ?hover.record, "tooltip hidden");
        }
    }

    pub fn sample(&self) -> Option<TooltipFrame> {
        self.hover.as_ref().map(|hover| TooltipFrame {
            record: hover.record,
            x: hover.anchor.0 + self.offset.0,
            y: hover.anchor.1 + self.offset.1,
            lines: hover.lines.clone(),
        })
    }
}
