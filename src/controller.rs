//! The interactive chart.
//!
//! [`ChartController`] owns the only mutable state of the chart, the current
//! [`Selection`], together with the retained nodes it drives. Every accepted
//! selection change runs one full redraw pass:
//!
//! 1. recompute both scales
//! 2. re-render both axes
//! 3. re-render the point layer
//! 4. re-attach the tooltip
//! 5. restyle both axis selectors (labels only move in the clicked group)
//!
//! All fallible work happens before anything is committed, so a failed pass
//! leaves the previous chart intact.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::axis::{AxisNode, AxisRenderer};
use crate::config::{Axis, ChartConfig};
use crate::dataset::{Dataset, RecordId};
use crate::error::{ChartError, ChartResult};
use crate::ir::Frame;
use crate::points::{MarkStyle, PointLayer, PointRenderer};
use crate::scale::{compute_scale, DomainPadding, LinearScale};
use crate::selector::AxisSelector;
use crate::tooltip::{LabelTable, TooltipController};

/// The active field key for each axis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    x: String,
    y: String,
}

impl Selection {
    pub fn new(x: &str, y: &str) -> Self {
        Selection {
            x: x.to_string(),
            y: y.to_string(),
        }
    }

    pub fn x(&self) -> &str {
        &self.x
    }

    pub fn y(&self) -> &str {
        &self.y
    }

    pub fn field(&self, axis: Axis) -> &str {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    fn with(&self, axis: Axis, key: &str) -> Self {
        let mut next = self.clone();
        match axis {
            Axis::X => next.x = key.to_string(),
            Axis::Y => next.y = key.to_string(),
        }
        next
    }
}

/// Input delivered to the chart by whatever hosts it
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    /// A selector label was clicked; `field_key` is the label's declared key
    LabelClicked { axis: Axis, field_key: String },
    HoverEnter { record: RecordId, pointer: (f64, f64) },
    HoverLeave,
}

pub struct ChartController {
    dataset: Arc<Dataset>,
    config: ChartConfig,
    selection: Selection,

    x_scale: LinearScale,
    y_scale: LinearScale,

    x_axis_renderer: AxisRenderer,
    y_axis_renderer: AxisRenderer,
    point_renderer: PointRenderer,

    x_axis: AxisNode,
    y_axis: AxisNode,
    points: PointLayer,
    tooltip: TooltipController,
    x_selector: AxisSelector,
    y_selector: AxisSelector,

    redraws: u64,
}

/// Output of the fallible half of a redraw pass
struct Pass {
    x_scale: LinearScale,
    y_scale: LinearScale,
    x_axis: AxisNode,
    y_axis: AxisNode,
    points: PointLayer,
    tooltip: TooltipController,
}

impl ChartController {
    /// Build and draw the chart for the configured default selection at t = 0
    pub fn new(dataset: Arc<Dataset>, config: ChartConfig) -> ChartResult<Self> {
        if dataset.is_empty() {
            return Err(ChartError::EmptyDataset);
        }
        for axis in [Axis::X, Axis::Y] {
            if let Some(field) = config.fields(axis).iter().find(|f| !dataset.has_field(&f.key)) {
                return Err(ChartError::MissingColumn(field.key.clone()));
            }
        }

        let selection = Selection::new(config.default_field(Axis::X), config.default_field(Axis::Y));
        let timing = config.timing();
        let x_axis_renderer = AxisRenderer::bottom(config.plot_height(), config.tick_count, timing);
        let y_axis_renderer = AxisRenderer::left(config.tick_count, timing);
        let point_renderer = PointRenderer::new(MarkStyle::from_config(&config), timing);
        let x_selector = AxisSelector::new(Axis::X, &config, selection.x())?;
        let y_selector = AxisSelector::new(Axis::Y, &config, selection.y())?;
        let tooltip = TooltipController::new(LabelTable::default(), config.tooltip_offset);

        let x_scale = x_scale_for(&dataset, &config, selection.x())?;
        let y_scale = y_scale_for(&dataset, &config, selection.y())?;
        let now = Duration::ZERO;
        let x_axis = x_axis_renderer.render_axis(&x_scale, None, now);
        let y_axis = y_axis_renderer.render_axis(&y_scale, None, now);
        let points = point_renderer.render_points(&dataset, &selection, &x_scale, &y_scale, None, now)?;

        let mut chart = ChartController {
            dataset,
            config,
            selection,
            x_scale,
            y_scale,
            x_axis_renderer,
            y_axis_renderer,
            point_renderer,
            x_axis,
            y_axis,
            points,
            tooltip,
            x_selector,
            y_selector,
            redraws: 1,
        };
        chart.tooltip.attach(&chart.selection, &chart.dataset)?;

        info!(
            records = chart.dataset.len(),
            x = chart.selection.x(),
            y = chart.selection.y(),
            "chart drawn"
        );
        Ok(chart)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn x_scale(&self) -> &LinearScale {
        &self.x_scale
    }

    pub fn y_scale(&self) -> &LinearScale {
        &self.y_scale
    }

    pub fn points(&self) -> &PointLayer {
        &self.points
    }

    pub fn tooltip(&self) -> &TooltipController {
        &self.tooltip
    }

    pub fn selector(&self, axis: Axis) -> &AxisSelector {
        match axis {
            Axis::X => &self.x_selector,
            Axis::Y => &self.y_selector,
        }
    }

    /// Completed redraw passes, including the initial draw
    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    /// Make `field_key` the active field for `axis`.
    ///
    /// Returns `Ok(false)` without touching anything when the field is
    /// already active, `Ok(true)` after a completed redraw.
    pub fn select_field(&mut self, axis: Axis, field_key: &str, now: Duration) -> ChartResult<bool> {
        if self.selection.field(axis) == field_key {
            debug!(%axis, field_key, "field already selected");
            return Ok(false);
        }
        if !self.config.fields(axis).iter().any(|f| f.key == field_key) {
            return Err(ChartError::UnknownField {
                axis,
                key: field_key.to_string(),
            });
        }

        let next = self.selection.with(axis, field_key);
        let pass = self.redraw(&next, now)?;

        self.x_scale = pass.x_scale;
        self.y_scale = pass.y_scale;
        self.x_axis = pass.x_axis;
        self.y_axis = pass.y_axis;
        self.points = pass.points;
        self.tooltip = pass.tooltip;
        self.selection = next;
        self.redraws += 1;

        // only the clicked group's labels move
        match axis {
            Axis::X => {
                self.x_selector.restyle(self.selection.x(), now)?;
                self.y_selector.activate(self.selection.y())?;
            }
            Axis::Y => {
                self.x_selector.activate(self.selection.x())?;
                self.y_selector.restyle(self.selection.y(), now)?;
            }
        }

        info!(
            %axis,
            field = field_key,
            x_domain = ?self.x_scale.domain(),
            y_domain = ?self.y_scale.domain(),
            "selection changed"
        );
        Ok(true)
    }

    fn redraw(&self, selection: &Selection, now: Duration) -> ChartResult<Pass> {
        debug!(x = selection.x(), y = selection.y(), ?now, "redraw pass");

        // both scales are rebuilt whichever axis changed
        let x_scale = x_scale_for(&self.dataset, &self.config, selection.x())?;
        let y_scale = y_scale_for(&self.dataset, &self.config, selection.y())?;

        let x_axis = self.x_axis_renderer.render_axis(&x_scale, Some(&self.x_axis), now);
        let y_axis = self.y_axis_renderer.render_axis(&y_scale, Some(&self.y_axis), now);

        let points = self.point_renderer.render_points(
            &self.dataset,
            selection,
            &x_scale,
            &y_scale,
            Some(&self.points),
            now,
        )?;

        let mut tooltip = self.tooltip.clone();
        tooltip.attach(selection, &self.dataset)?;

        Ok(Pass {
            x_scale,
            y_scale,
            x_axis,
            y_axis,
            points,
            tooltip,
        })
    }

    /// Single entry point for host input.
    ///
    /// Label clicks go through the owning selector first, so clicks on the
    /// active label never reach `select_field`. Returns whether a redraw ran.
    pub fn handle_event(&mut self, event: ChartEvent, now: Duration) -> ChartResult<bool> {
        match event {
            ChartEvent::LabelClicked { axis, field_key } => {
                match self.selector(axis).on_label_clicked(&field_key) {
                    Some(change) => self.select_field(change.axis, &change.key, now),
                    None => Ok(false),
                }
            }
            ChartEvent::HoverEnter { record, pointer } => {
                self.hover_enter(record, pointer)?;
                Ok(false)
            }
            ChartEvent::HoverLeave => {
                self.hover_leave();
                Ok(false)
            }
        }
    }

    pub fn hover_enter(&mut self, record: RecordId, pointer: (f64, f64)) -> ChartResult<()> {
        let record = self.dataset.get(record)?;
        self.tooltip.hover_enter(record, pointer)
    }

    pub fn hover_leave(&mut self) {
        self.tooltip.hover_leave();
    }

    /// Where a record's mark is drawn at `now`, in plot coordinates
    pub fn mark_center(&self, record: RecordId, now: Duration) -> Option<(f64, f64)> {
        self.points.mark(record).map(|m| m.center(now))
    }

    /// The record whose mark lies under `pointer` at `now`, topmost first
    pub fn record_at(&self, pointer: (f64, f64), now: Duration) -> Option<RecordId> {
        self.points.hit_test(pointer, self.config.mark_radius, now)
    }

    pub fn is_animating(&self, now: Duration) -> bool {
        self.x_axis.is_animating(now) || self.y_axis.is_animating(now) || self.points.is_animating(now)
    }

    /// Sample the whole chart at `now`
    pub fn frame(&self, now: Duration) -> Frame {
        let mut selector_labels = self.x_selector.sample(now);
        selector_labels.extend(self.y_selector.sample(now));

        Frame {
            width: self.config.width,
            height: self.config.height,
            origin: (self.config.margin.left, self.config.margin.top),
            plot_size: (self.config.plot_width(), self.config.plot_height()),
            x_axis: self.x_axis.sample(now),
            y_axis: self.y_axis.sample(now),
            marks: self.points.sample(now, self.point_renderer.style()),
            selector_labels,
            tooltip: self.tooltip.sample(),
        }
    }
}

fn x_scale_for(dataset: &Dataset, config: &ChartConfig, field: &str) -> ChartResult<LinearScale> {
    compute_scale(
        dataset,
        field,
        (0.0, config.plot_width()),
        DomainPadding::Multiplicative {
            low: config.x_padding_low,
            high: config.x_padding_high,
        },
    )
}

fn y_scale_for(dataset: &Dataset, config: &ChartConfig, field: &str) -> ChartResult<LinearScale> {
    compute_scale(dataset, field, (config.plot_height(), 0.0), DomainPadding::ZeroBaseline)
}
