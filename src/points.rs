// Point layer: one mark and one text decoration per record

use indexmap::IndexMap;
use std::time::Duration;

use crate::config::ChartConfig;
use crate::controller::Selection;
use crate::dataset::{Dataset, Record, RecordId};
use crate::error::ChartResult;
use crate::ir::{MarkFrame, TextFrame};
use crate::scale::LinearScale;
use crate::transition::{Timing, Tween};

#[derive(Debug, Clone, PartialEq)]
pub struct MarkStyle {
    pub radius: f64,
    pub fill: String,
    pub opacity: f64,
    pub label_fill: String,
    pub font_family: String,
    pub font_size: f64,
    pub label_dx: f64,
    pub label_dy_domain: f64,
}

impl MarkStyle {
    pub fn from_config(config: &ChartConfig) -> Self {
        MarkStyle {
            radius: config.mark_radius,
            fill: config.mark_fill.clone(),
            opacity: config.mark_opacity,
            label_fill: config.label_fill.clone(),
            font_family: config.label_font_family.clone(),
            font_size: config.label_font_size,
            label_dx: config.label_dx,
            label_dy_domain: config.label_dy_domain,
        }
    }
}

/// Pixel targets for one record under one selection
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    cx: f64,
    cy: f64,
    text_x: f64,
    text_y: f64,
}

/// A mark and its text decoration; both always belong to `record`
#[derive(Debug, Clone)]
pub struct MarkNode {
    record: RecordId,
    label: String,
    cx: Tween,
    cy: Tween,
    text_x: Tween,
    text_y: Tween,
}

impl MarkNode {
    pub fn record(&self) -> RecordId {
        self.record
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn center(&self, now: Duration) -> (f64, f64) {
        (self.cx.sample(now), self.cy.sample(now))
    }

    pub fn text_position(&self, now: Duration) -> (f64, f64) {
        (self.text_x.sample(now), self.text_y.sample(now))
    }
}

/// Retained marks keyed by record, in drawing order
#[derive(Debug, Clone, Default)]
pub struct PointLayer {
    marks: IndexMap<RecordId, MarkNode>,
}

impl PointLayer {
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn mark(&self, record: RecordId) -> Option<&MarkNode> {
        self.marks.get(&record)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &MarkNode> {
        self.marks.values()
    }

    pub fn is_animating(&self, now: Duration) -> bool {
        self.marks.values().any(|m| {
            [&m.cx, &m.cy, &m.text_x, &m.text_y]
                .iter()
                .any(|t| !t.is_finished(now))
        })
    }

    /// Topmost mark under `point`; later marks are drawn over earlier ones
    pub fn hit_test(&self, point: (f64, f64), radius: f64, now: Duration) -> Option<RecordId> {
        self.marks
            .values()
            .rev()
            .find(|m| {
                let (cx, cy) = m.center(now);
                let (dx, dy) = (point.0 - cx, point.1 - cy);
                dx * dx + dy * dy <= radius * radius
            })
            .map(|m| m.record)
    }

    pub fn sample(&self, now: Duration, style: &MarkStyle) -> Vec<MarkFrame> {
        self.marks
            .values()
            .map(|m| {
                let (cx, cy) = m.center(now);
                let (x, y) = m.text_position(now);
                MarkFrame {
                    record: m.record,
                    cx,
                    cy,
                    radius: style.radius,
                    fill: style.fill.clone(),
                    opacity: style.opacity,
                    label: TextFrame {
                        x,
                        y,
                        text: m.label.clone(),
                        font_family: style.font_family.clone(),
                        font_size: style.font_size,
                        fill: style.label_fill.clone(),
                    },
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct PointRenderer {
    style: MarkStyle,
    timing: Timing,
}

impl PointRenderer {
    pub fn new(style: MarkStyle, timing: Timing) -> Self {
        PointRenderer { style, timing }
    }

    pub fn style(&self) -> &MarkStyle {
        &self.style
    }

    fn place(
        &self,
        record: &Record,
        selection: &Selection,
        x_scale: &LinearScale,
        y_scale: &LinearScale,
    ) -> ChartResult<Placement> {
        let x = record.value(selection.x())?;
        let y = record.value(selection.y())?;
        let cx = x_scale.map(x);
        // The text shift is a pixel offset on x but a data-unit offset on y.
        Ok(Placement {
            cx,
            cy: y_scale.map(y),
            text_x: cx + self.style.label_dx,
            text_y: y_scale.map(y - self.style.label_dy_domain),
        })
    }

    /// Lay out every record for `selection`.
    ///
    /// Without a previous layer marks are placed at once; otherwise every mark
    /// and text moves to its new position in parallel.
    pub fn render_points(
        &self,
        dataset: &Dataset,
        selection: &Selection,
        x_scale: &LinearScale,
        y_scale: &LinearScale,
        existing: Option<&PointLayer>,
        now: Duration,
    ) -> ChartResult<PointLayer> {
        let mut marks = IndexMap::with_capacity(dataset.len());

        for record in dataset.iter() {
            let target = self.place(record, selection, x_scale, y_scale)?;
            let previous = existing.and_then(|layer| layer.marks.get(&record.id()));

            let node = match previous {
                Some(previous) => {
                    let mut node = previous.clone();
                    node.cx.retarget(target.cx, now, self.timing);
                    node.cy.retarget(target.cy, now, self.timing);
                    node.text_x.retarget(target.text_x, now, self.timing);
                    node.text_y.retarget(target.text_y, now, self.timing);
                    node
                }
                None => MarkNode {
                    record: record.id(),
                    label: record.label().to_string(),
                    cx: Tween::fixed(target.cx),
                    cy: Tween::fixed(target.cy),
                    text_x: Tween::fixed(target.text_x),
                    text_y: Tween::fixed(target.text_y),
                },
            };
            marks.insert(record.id(), node);
        }

        Ok(PointLayer { marks })
    }
}
