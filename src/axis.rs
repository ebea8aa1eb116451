// Animated axis: tick marks keyed by value, moved between scales

use std::time::Duration;

use crate::ir::{AxisFrame, Orientation, TickFrame};
use crate::scale::LinearScale;
use crate::transition::{Timing, Tween};

#[derive(Debug, Clone)]
struct TickNode {
    value: f64,
    text: String,
    position: Tween,
    opacity: Tween,
    exiting: bool,
}

/// Retained state of one drawn axis
#[derive(Debug, Clone)]
pub struct AxisNode {
    orientation: Orientation,
    translate: (f64, f64),
    scale: LinearScale,
    extent: (Tween, Tween),
    ticks: Vec<TickNode>,
}

impl AxisNode {
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// The scale this axis is animating toward
    pub fn scale(&self) -> &LinearScale {
        &self.scale
    }

    pub fn is_animating(&self, now: Duration) -> bool {
        !self.extent.0.is_finished(now)
            || !self.extent.1.is_finished(now)
            || self
                .ticks
                .iter()
                .any(|t| !t.position.is_finished(now) || !t.opacity.is_finished(now))
    }

    pub fn sample(&self, now: Duration) -> AxisFrame {
        let mut ticks: Vec<TickFrame> = self
            .ticks
            .iter()
            .map(|tick| TickFrame {
                value: tick.value,
                position: tick.position.sample(now),
                opacity: tick.opacity.sample(now),
                text: tick.text.clone(),
            })
            .filter(|tick| tick.opacity > 0.0)
            .collect();
        ticks.sort_by(|a, b| a.value.total_cmp(&b.value));

        AxisFrame {
            orientation: self.orientation,
            translate: self.translate,
            extent: (self.extent.0.sample(now), self.extent.1.sample(now)),
            ticks,
        }
    }
}

/// Draws one axis orientation; X uses `bottom`, Y uses `left`
#[derive(Debug, Clone)]
pub struct AxisRenderer {
    orientation: Orientation,
    translate: (f64, f64),
    tick_count: usize,
    timing: Timing,
}

impl AxisRenderer {
    /// Horizontal axis attached along the bottom edge of a plot of `plot_height`
    pub fn bottom(plot_height: f64, tick_count: usize, timing: Timing) -> Self {
        AxisRenderer {
            orientation: Orientation::Bottom,
            translate: (0.0, plot_height),
            tick_count,
            timing,
        }
    }

    pub fn left(tick_count: usize, timing: Timing) -> Self {
        AxisRenderer {
            orientation: Orientation::Left,
            translate: (0.0, 0.0),
            tick_count,
            timing,
        }
    }

    /// Build the axis for `scale`.
    ///
    /// With no previous node the ticks are placed immediately. Otherwise
    /// surviving ticks slide to their new position, entering ticks start where
    /// the previous scale would have put them and fade in, and exiting ticks
    /// slide to where the new scale puts them while fading out.
    pub fn render_axis(
        &self,
        scale: &LinearScale,
        existing: Option<&AxisNode>,
        now: Duration,
    ) -> AxisNode {
        let step = scale.tick_step(self.tick_count);
        let values = scale.ticks(self.tick_count);
        let (r0, r1) = scale.range();

        let previous = match existing {
            Some(previous) => previous,
            None => {
                let ticks = values
                    .iter()
                    .map(|&value| TickNode {
                        value,
                        text: format_tick(value, step),
                        position: Tween::fixed(scale.map(value)),
                        opacity: Tween::fixed(1.0),
                        exiting: false,
                    })
                    .collect();
                return AxisNode {
                    orientation: self.orientation,
                    translate: self.translate,
                    scale: *scale,
                    extent: (Tween::fixed(r0), Tween::fixed(r1)),
                    ticks,
                };
            }
        };

        let old_scale = previous.scale;
        let mut remaining: Vec<TickNode> = previous
            .ticks
            .iter()
            .filter(|t| !(t.exiting && t.opacity.is_finished(now)))
            .cloned()
            .collect();

        let mut ticks = Vec::with_capacity(values.len() + remaining.len());
        for &value in &values {
            let target = scale.map(value);
            let tick = match remaining.iter().position(|t| same_tick(t.value, value)) {
                Some(idx) => {
                    let mut tick = remaining.swap_remove(idx);
                    tick.position.retarget(target, now, self.timing);
                    tick.opacity.retarget(1.0, now, self.timing);
                    tick.exiting = false;
                    tick.text = format_tick(value, step);
                    tick
                }
                None => TickNode {
                    value,
                    text: format_tick(value, step),
                    position: Tween::new(old_scale.map(value), target, now, self.timing),
                    opacity: Tween::new(0.0, 1.0, now, self.timing),
                    exiting: false,
                },
            };
            ticks.push(tick);
        }

        for mut tick in remaining {
            tick.position.retarget(scale.map(tick.value), now, self.timing);
            tick.opacity.retarget(0.0, now, self.timing);
            tick.exiting = true;
            ticks.push(tick);
        }

        let mut extent = previous.extent;
        extent.0.retarget(r0, now, self.timing);
        extent.1.retarget(r1, now, self.timing);

        AxisNode {
            orientation: self.orientation,
            translate: self.translate,
            scale: *scale,
            extent,
            ticks,
        }
    }
}

fn same_tick(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

/// Fixed-point label with just enough decimals for `step`, grouped by thousands
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step > 0.0 && step < 1.0 {
        (-step.log10().floor()) as usize
    } else {
        0
    };
    let text = format!("{:.*}", decimals, value);
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) if rest.chars().any(|c| c != '0' && c != '.') => ("-", rest),
        Some(rest) => ("", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}
