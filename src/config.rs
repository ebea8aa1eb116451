// Chart configuration: canvas geometry, visual constants and axis choices

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::dataset::DatasetSchema;
use crate::transition::{Easing, Timing};

/// Which chart axis a field or selector belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

impl FromStr for Axis {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            other => Err(anyhow!("Unknown axis '{}' (expected 'x' or 'y')", other)),
        }
    }
}

/// One selectable numeric column plus the text shown for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisField {
    pub key: String,
    pub label: String,
}

impl AxisField {
    pub fn new(key: &str, label: &str) -> Self {
        AxisField {
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub bottom: f64,
    pub right: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Margin {
            top: 50.0,
            bottom: 80.0,
            right: 50.0,
            left: 85.0,
        }
    }
}

/// Everything the chart needs besides the data itself.
///
/// `Default` reproduces the census scatter plot exactly. A JSON file may
/// override any subset of fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub margin: Margin,

    pub mark_radius: f64,
    pub mark_opacity: f64,
    pub mark_fill: String,

    pub label_fill: String,
    pub label_font_family: String,
    pub label_font_size: f64,
    /// Pixel shift applied to the text decoration's x position
    pub label_dx: f64,
    /// Subtracted from the y value in data units before scaling
    pub label_dy_domain: f64,

    pub selector_font_size: f64,

    pub transition_ms: u64,
    pub x_padding_low: f64,
    pub x_padding_high: f64,
    pub tick_count: usize,

    /// (dx, dy) from the hovered point to the tooltip box
    pub tooltip_offset: (f64, f64),

    pub label_column: String,
    pub name_column: String,

    pub x_fields: Vec<AxisField>,
    pub y_fields: Vec<AxisField>,
    pub default_x: String,
    pub default_y: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            width: 960,
            height: 500,
            margin: Margin::default(),
            mark_radius: 10.0,
            mark_opacity: 0.5,
            mark_fill: "lightskyblue".to_string(),
            label_fill: "grey".to_string(),
            label_font_family: "sans-serif".to_string(),
            label_font_size: 10.0,
            label_dx: -7.0,
            label_dy_domain: 0.2,
            selector_font_size: 16.0,
            transition_ms: 1000,
            x_padding_low: 0.8,
            x_padding_high: 1.2,
            tick_count: 10,
            tooltip_offset: (-60.0, 80.0),
            label_column: "abbr".to_string(),
            name_column: "state".to_string(),
            x_fields: vec![
                AxisField::new("poverty", "In Poverty (%)"),
                AxisField::new("age", "Age (Median)"),
                AxisField::new("income", "Household Income (Median)"),
            ],
            y_fields: vec![
                AxisField::new("healthcare", "Lacks Healthcare (%)"),
                AxisField::new("smokes", "Smokes (%)"),
                AxisField::new("obesity", "Obese (%)"),
            ],
            default_x: "poverty".to_string(),
            default_y: "healthcare".to_string(),
        }
    }
}

impl ChartConfig {
    /// Read a JSON override file; missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let config: ChartConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.plot_width() <= 0.0 || self.plot_height() <= 0.0 {
            bail!(
                "Margins leave no plotting area on a {}x{} canvas",
                self.width,
                self.height
            );
        }
        for axis in [Axis::X, Axis::Y] {
            let fields = self.fields(axis);
            if fields.is_empty() {
                bail!("No selectable fields configured for the {} axis", axis);
            }
            let default = self.default_field(axis);
            if !fields.iter().any(|f| f.key == default) {
                bail!(
                    "Default {} field '{}' is not one of: {}",
                    axis,
                    default,
                    fields.iter().map(|f| f.key.as_str()).collect::<Vec<_>>().join(", ")
                );
            }
        }
        Ok(())
    }

    pub fn plot_width(&self) -> f64 {
        self.width as f64 - self.margin.left - self.margin.right
    }

    pub fn plot_height(&self) -> f64 {
        self.height as f64 - self.margin.top - self.margin.bottom
    }

    pub fn fields(&self, axis: Axis) -> &[AxisField] {
        match axis {
            Axis::X => &self.x_fields,
            Axis::Y => &self.y_fields,
        }
    }

    pub fn default_field(&self, axis: Axis) -> &str {
        match axis {
            Axis::X => &self.default_x,
            Axis::Y => &self.default_y,
        }
    }

    pub fn timing(&self) -> Timing {
        Timing {
            duration: Duration::from_millis(self.transition_ms),
            easing: Easing::CubicInOut,
        }
    }

    /// Columns the loader must find: labels plus every selectable field
    pub fn schema(&self) -> DatasetSchema {
        let numeric_columns = self
            .x_fields
            .iter()
            .chain(self.y_fields.iter())
            .map(|f| f.key.clone())
            .collect();
        DatasetSchema {
            label_column: self.label_column.clone(),
            name_column: self.name_column.clone(),
            numeric_columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plot_area() {
        let config = ChartConfig::default();
        assert_eq!(config.plot_width(), 825.0);
        assert_eq!(config.plot_height(), 370.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_axis_choices() {
        let config = ChartConfig::default();
        let x: Vec<&str> = config.fields(Axis::X).iter().map(|f| f.key.as_str()).collect();
        let y: Vec<&str> = config.fields(Axis::Y).iter().map(|f| f.key.as_str()).collect();
        assert_eq!(x, vec!["poverty", "age", "income"]);
        assert_eq!(y, vec!["healthcare", "smokes", "obesity"]);
        assert_eq!(config.default_field(Axis::X), "poverty");
        assert_eq!(config.default_field(Axis::Y), "healthcare");
    }

    #[test]
    fn test_schema_lists_all_fields() {
        let schema = ChartConfig::default().schema();
        assert_eq!(schema.label_column, "abbr");
        assert_eq!(schema.name_column, "state");
        assert_eq!(schema.numeric_columns.len(), 6);
    }

    #[test]
    fn test_partial_json_override() {
        let config: ChartConfig = serde_json::from_str(r#"{"width": 1200, "mark_radius": 6}"#).unwrap();
        assert_eq!(config.width, 1200);
        assert_eq!(config.mark_radius, 6.0);
        assert_eq!(config.height, 500);
        assert_eq!(config.default_x, "poverty");
    }

    #[test]
    fn test_validate_rejects_unknown_default() {
        let config = ChartConfig {
            default_y: "income".to_string(),
            ..ChartConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Default y field 'income'"));
    }

    #[test]
    fn test_validate_rejects_oversized_margins() {
        let config = ChartConfig {
            width: 100,
            ..ChartConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_axis_from_str() {
        assert_eq!("x".parse::<Axis>().unwrap(), Axis::X);
        assert_eq!("Y".parse::<Axis>().unwrap(), Axis::Y);
        assert!("z".parse::<Axis>().is_err());
    }
}
