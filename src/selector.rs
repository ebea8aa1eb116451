// Clickable axis label groups

use std::time::Duration;
use tracing::warn;

use crate::config::{Axis, AxisField, ChartConfig};
use crate::error::{ChartError, ChartResult};
use crate::ir::SelectorLabelFrame;
use crate::transition::{Timing, Tween};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelClass {
    Active,
    Inactive,
}

/// Emitted when a click asks for a field other than the active one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub axis: Axis,
    pub previous: String,
    pub key: String,
}

#[derive(Debug, Clone)]
struct SelectorLabel {
    field: AxisField,
    x: Tween,
    y: f64,
}

/// Where a label group sits and how its labels are stacked.
///
/// The X group hangs below the plot; the Y group is rotated -90 degrees so
/// its local x runs up the left edge and its local y points away from the plot.
#[derive(Debug, Clone, PartialEq)]
struct GroupLayout {
    translate: (f64, f64),
    rotation: f64,
    /// Local x every label settles on after the first restyle
    settled_x: f64,
}

// Initial per-row placement of the three default labels
const X_ROW_X: [f64; 3] = [0.0, -50.0, -95.0];
const X_ROW_Y: [f64; 3] = [-45.0, -25.0, -5.0];
const Y_ROW_DY_EM: [f64; 3] = [-1.5, -3.0, -4.5];

#[derive(Debug, Clone)]
pub struct AxisSelector {
    axis: Axis,
    labels: Vec<SelectorLabel>,
    active: usize,
    layout: GroupLayout,
    font_size: f64,
    timing: Timing,
}

impl AxisSelector {
    /// Lay out one label per configured field.
    ///
    /// Rows past the third have no fixed slot: X rows keep stepping down by
    /// 20 px from the first row, and Y rows sit on the centre line, each a
    /// further 1.5 em away from the plot.
    pub fn new(axis: Axis, config: &ChartConfig, active_key: &str) -> ChartResult<Self> {
        let fields = config.fields(axis);
        let active = fields
            .iter()
            .position(|f| f.key == active_key)
            .ok_or_else(|| ChartError::UnknownField {
                axis,
                key: active_key.to_string(),
            })?;

        let (width, height) = (config.plot_width(), config.plot_height());
        let em = config.selector_font_size;
        let layout = match axis {
            Axis::X => GroupLayout {
                translate: (width / 2.0, height + config.margin.bottom),
                rotation: 0.0,
                settled_x: 0.0,
            },
            Axis::Y => GroupLayout {
                translate: (0.0, 0.0),
                rotation: -90.0,
                settled_x: -height / 2.0,
            },
        };

        let labels = fields
            .iter()
            .enumerate()
            .map(|(row, field)| {
                let (x, y) = match axis {
                    Axis::X => (
                        X_ROW_X.get(row).copied().unwrap_or(0.0),
                        X_ROW_Y.get(row).copied().unwrap_or(-45.0 + 20.0 * row as f64),
                    ),
                    Axis::Y => {
                        let x = match row {
                            0 => -height / 2.0,
                            1 => -height / 2.0 - config.margin.left + 35.0,
                            2 => -height / 2.0 - config.margin.left + 38.0,
                            _ => -height / 2.0,
                        };
                        let dy = Y_ROW_DY_EM
                            .get(row)
                            .copied()
                            .unwrap_or(-1.5 * (row as f64 + 1.0));
                        (x, dy * em)
                    }
                };
                SelectorLabel {
                    field: field.clone(),
                    x: Tween::fixed(x),
                    y,
                }
            })
            .collect();

        Ok(AxisSelector {
            axis,
            labels,
            active,
            layout,
            font_size: em,
            timing: config.timing(),
        })
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn active_key(&self) -> &str {
        &self.labels[self.active].field.key
    }

    pub fn class_of(&self, key: &str) -> Option<LabelClass> {
        self.labels.iter().position(|l| l.field.key == key).map(|idx| {
            if idx == self.active {
                LabelClass::Active
            } else {
                LabelClass::Inactive
            }
        })
    }

    pub fn fields(&self) -> impl Iterator<Item = &AxisField> {
        self.labels.iter().map(|l| &l.field)
    }

    /// Resolve a click into a change request without touching any state.
    ///
    /// Clicking the active label, or something that is not one of this
    /// group's labels, yields nothing.
    pub fn on_label_clicked(&self, key: &str) -> Option<FieldChange> {
        if !self.labels.iter().any(|l| l.field.key == key) {
            warn!(axis = %self.axis, key, "click on unknown axis label ignored");
            return None;
        }
        if self.active_key() == key {
            return None;
        }
        Some(FieldChange {
            axis: self.axis,
            previous: self.active_key().to_string(),
            key: key.to_string(),
        })
    }

    /// Mark `key` active and every other label inactive. Label positions
    /// are left alone.
    pub fn activate(&mut self, key: &str) -> ChartResult<()> {
        let idx = self
            .labels
            .iter()
            .position(|l| l.field.key == key)
            .ok_or_else(|| ChartError::UnknownField {
                axis: self.axis,
                key: key.to_string(),
            })?;
        self.active = idx;
        Ok(())
    }

    /// Activate `key` and slide every label of this group to the settled x.
    /// Called on the clicked group once the redraw has succeeded.
    pub fn restyle(&mut self, key: &str, now: Duration) -> ChartResult<()> {
        self.activate(key)?;
        let settled = self.layout.settled_x;
        for label in &mut self.labels {
            label.x.retarget(settled, now, self.timing);
        }
        Ok(())
    }

    /// Labels in plot coordinates, with the group transform applied
    pub fn sample(&self, now: Duration) -> Vec<SelectorLabelFrame> {
        self.labels
            .iter()
            .enumerate()
            .map(|(idx, label)| {
                let local = (label.x.sample(now), label.y);
                // rotate(-90): (x, y) -> (y, -x)
                let (x, y) = if self.layout.rotation == -90.0 {
                    (local.1, -local.0)
                } else {
                    local
                };
                SelectorLabelFrame {
                    axis: self.axis,
                    key: label.field.key.clone(),
                    text: label.field.label.clone(),
                    x: self.layout.translate.0 + x,
                    y: self.layout.translate.1 + y,
                    rotation: self.layout.rotation,
                    font_size: self.font_size,
                    class: if idx == self.active {
                        LabelClass::Active
                    } else {
                        LabelClass::Inactive
                    },
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn selector(axis: Axis) -> AxisSelector {
        let config = ChartConfig::default();
        AxisSelector::new(axis, &config, config.default_field(axis)).unwrap()
    }

    fn active_count(selector: &AxisSelector) -> usize {
        selector
            .fields()
            .filter(|f| selector.class_of(&f.key) == Some(LabelClass::Active))
            .count()
    }

    #[test]
    fn test_initial_state() {
        let x = selector(Axis::X);
        assert_eq!(x.active_key(), "poverty");
        assert_eq!(x.class_of("poverty"), Some(LabelClass::Active));
        assert_eq!(x.class_of("age"), Some(LabelClass::Inactive));
        assert_eq!(x.class_of("healthcare"), None);
        assert_eq!(active_count(&x), 1);
    }

    #[test]
    fn test_unknown_active_key_rejected() {
        let config = ChartConfig::default();
        assert!(AxisSelector::new(Axis::Y, &config, "poverty").is_err());
    }

    #[test]
    fn test_click_on_active_label_is_noop() {
        let y = selector(Axis::Y);
        assert_eq!(y.on_label_clicked("healthcare"), None);
    }

    #[test]
    fn test_click_on_other_label_requests_change() {
        let x = selector(Axis::X);
        let change = x.on_label_clicked("age").unwrap();
        assert_eq!(
            change,
            FieldChange {
                axis: Axis::X,
                previous: "poverty".to_string(),
                key: "age".to_string(),
            }
        );
        // state is untouched until restyle
        assert_eq!(x.active_key(), "poverty");
    }

    #[test]
    fn test_click_on_foreign_label_ignored() {
        let x = selector(Axis::X);
        assert_eq!(x.on_label_clicked("smokes"), None);
    }

    #[test]
    fn test_restyle_swaps_active_label() {
        let mut x = selector(Axis::X);
        x.restyle("income", ms(0)).unwrap();
        assert_eq!(x.active_key(), "income");
        assert_eq!(x.class_of("income"), Some(LabelClass::Active));
        assert_eq!(x.class_of("poverty"), Some(LabelClass::Inactive));
        assert_eq!(active_count(&x), 1);
        assert!(x.restyle("smokes", ms(0)).is_err());
        assert_eq!(x.active_key(), "income");
    }

    #[test]
    fn test_x_label_layout() {
        let x = selector(Axis::X);
        let frames = x.sample(ms(0));
        // group origin: (825 / 2, 370 + 80)
        assert_eq!((frames[0].x, frames[0].y), (412.5, 405.0));
        assert_eq!((frames[1].x, frames[1].y), (362.5, 425.0));
        assert_eq!((frames[2].x, frames[2].y), (317.5, 445.0));
        assert_eq!(frames[0].class, LabelClass::Active);
        assert_eq!(frames[0].text, "In Poverty (%)");
    }

    #[test]
    fn test_labels_settle_after_restyle() {
        let mut x = selector(Axis::X);
        x.restyle("age", ms(0)).unwrap();
        let frames = x.sample(ms(1000));
        assert!(frames.iter().all(|f| f.x == 412.5));
        assert_eq!(frames[1].class, LabelClass::Active);
    }

    #[test]
    fn test_activate_keeps_positions() {
        let mut x = selector(Axis::X);
        let before = x.sample(ms(0));
        x.activate("age").unwrap();
        let after = x.sample(ms(1000));
        assert_eq!(x.active_key(), "age");
        for (b, a) in before.iter().zip(&after) {
            assert_eq!((b.x, b.y), (a.x, a.y));
        }
        assert!(x.activate("smokes").is_err());
    }

    #[test]
    fn test_extra_rows_follow_fallback_layout() {
        let mut config = ChartConfig::default();
        config.x_fields.push(AxisField::new("smokes", "Smokes (%)"));
        config.y_fields.push(AxisField::new("age", "Age (Median)"));
        let x = AxisSelector::new(Axis::X, &config, "poverty").unwrap();
        let y = AxisSelector::new(Axis::Y, &config, "healthcare").unwrap();
        // -45 + 20 * 3 below the group origin at 370 + 80
        assert_eq!((x.sample(ms(0))[3].x, x.sample(ms(0))[3].y), (412.5, 465.0));
        // -1.5 * 4 em at 16 px, on the centre line
        assert_eq!((y.sample(ms(0))[3].x, y.sample(ms(0))[3].y), (-96.0, 185.0));
    }

    #[test]
    fn test_y_label_layout_is_rotated() {
        let y = selector(Axis::Y);
        let frames = y.sample(ms(0));
        assert!(frames.iter().all(|f| f.rotation == -90.0));
        // x = -370 / 2 in rotated space -> 185 down the left edge, 1.5em left of it
        assert_eq!((frames[0].x, frames[0].y), (-24.0, 185.0));
        assert_eq!((frames[1].x, frames[1].y), (-48.0, 235.0));
        assert_eq!(frames[2].x, -72.0);
    }

    proptest! {
        #[test]
        fn prop_exactly_one_active(clicks in prop::collection::vec(0usize..3, 0..30)) {
            let mut y = selector(Axis::Y);
            let keys: Vec<String> = y.fields().map(|f| f.key.clone()).collect();
            for (step, idx) in clicks.into_iter().enumerate() {
                if let Some(change) = y.on_label_clicked(&keys[idx]) {
                    let previous = change.previous.clone();
                    y.restyle(&change.key, ms(step as u64 * 100)).unwrap();
                    prop_assert_eq!(y.class_of(&previous), Some(LabelClass::Inactive));
                }
                prop_assert_eq!(active_count(&y), 1);
                prop_assert_eq!(y.active_key(), keys[idx].as_str());
            }
        }
    }
}
