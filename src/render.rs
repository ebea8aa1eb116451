use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontStyle, FontTransform};

use crate::ir::{AxisFrame, Frame, Orientation, SelectorLabelFrame, TooltipFrame};
use crate::palette::parse_color;
use crate::selector::LabelClass;

type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;
const AXIS_FONT_SIZE: f64 = 10.0;
const INACTIVE_LABEL: RGBColor = RGBColor(201, 201, 201);

/// Rasterize a sampled frame and encode it as PNG
pub fn render_png(frame: &Frame) -> Result<Vec<u8>> {
    let mut buffer = vec![0u8; (frame.width * frame.height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (frame.width, frame.height))
            .into_drawing_area();

        root.fill(&WHITE).context("Failed to fill background")?;

        draw_axis(&root, frame.origin, &frame.x_axis).context("Failed to draw x axis")?;
        draw_axis(&root, frame.origin, &frame.y_axis).context("Failed to draw y axis")?;
        draw_marks(&root, frame).context("Failed to draw marks")?;
        for label in &frame.selector_labels {
            draw_selector_label(&root, frame.origin, label)
                .with_context(|| format!("Failed to draw axis label '{}'", label.key))?;
        }
        if let Some(tooltip) = &frame.tooltip {
            draw_tooltip(&root, frame.origin, tooltip).context("Failed to draw tooltip")?;
        }

        root.present().context("Failed to present drawing")?;
    }

    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(&buffer, frame.width, frame.height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }

    Ok(png_bytes)
}

fn px(origin: f64, offset: f64) -> i32 {
    (origin + offset).round() as i32
}

fn draw_axis(root: &Canvas, origin: (f64, f64), axis: &AxisFrame) -> Result<()> {
    let (ox, oy) = (origin.0 + axis.translate.0, origin.1 + axis.translate.1);
    let (e0, e1) = axis.extent;

    let domain = match axis.orientation {
        Orientation::Bottom => vec![(px(ox, e0), px(oy, 0.0)), (px(ox, e1), px(oy, 0.0))],
        Orientation::Left => vec![(px(ox, 0.0), px(oy, e0)), (px(ox, 0.0), px(oy, e1))],
    };
    root.draw(&PathElement::new(domain, BLACK.stroke_width(1)))?;

    for tick in &axis.ticks {
        let color = BLACK.mix(tick.opacity);
        let (line, anchor, pos) = match axis.orientation {
            Orientation::Bottom => (
                [(px(ox, tick.position), px(oy, 0.0)), (px(ox, tick.position), px(oy, TICK_SIZE))],
                (px(ox, tick.position), px(oy, TICK_SIZE + TICK_PADDING)),
                Pos::new(HPos::Center, VPos::Top),
            ),
            Orientation::Left => (
                [(px(ox, 0.0), px(oy, tick.position)), (px(ox, -TICK_SIZE), px(oy, tick.position))],
                (px(ox, -TICK_SIZE - TICK_PADDING), px(oy, tick.position)),
                Pos::new(HPos::Right, VPos::Center),
            ),
        };
        root.draw(&PathElement::new(line.to_vec(), color.stroke_width(1)))?;

        let style = ("sans-serif", AXIS_FONT_SIZE).into_font().color(&color).pos(pos);
        root.draw(&Text::new(tick.text.clone(), anchor, style))?;
    }

    Ok(())
}

fn draw_marks(root: &Canvas, frame: &Frame) -> Result<()> {
    let (ox, oy) = frame.origin;

    for mark in &frame.marks {
        let fill = parse_color(&mark.fill)?;
        root.draw(&Circle::new(
            (px(ox, mark.cx), px(oy, mark.cy)),
            mark.radius.round() as i32,
            fill.mix(mark.opacity).filled(),
        ))?;

        let label = &mark.label;
        let style = (label.font_family.as_str(), label.font_size)
            .into_font()
            .color(&parse_color(&label.fill)?)
            .pos(Pos::new(HPos::Left, VPos::Bottom));
        root.draw(&Text::new(
            label.text.clone(),
            (px(ox, label.x), px(oy, label.y)),
            style,
        ))?;
    }

    Ok(())
}

fn draw_selector_label(root: &Canvas, origin: (f64, f64), label: &SelectorLabelFrame) -> Result<()> {
    let font = ("sans-serif", label.font_size).into_font();
    let style = match label.class {
        LabelClass::Active => font.style(FontStyle::Bold).color(&BLACK),
        LabelClass::Inactive => font.color(&INACTIVE_LABEL),
    };
    let style = if label.rotation == -90.0 {
        style.transform(FontTransform::Rotate270)
    } else {
        style
    };
    let style = style.pos(Pos::new(HPos::Center, VPos::Bottom));

    root.draw(&Text::new(
        label.text.clone(),
        (px(origin.0, label.x), px(origin.1, label.y)),
        style,
    ))?;
    Ok(())
}

fn draw_tooltip(root: &Canvas, origin: (f64, f64), tooltip: &TooltipFrame) -> Result<()> {
    const LINE_HEIGHT: f64 = 16.0;
    const PADDING: f64 = 8.0;

    let widest = tooltip.lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let width = widest as f64 * 7.0 + 2.0 * PADDING;
    let height = tooltip.lines.len() as f64 * LINE_HEIGHT + 2.0 * PADDING;
    let (x, y) = (origin.0 + tooltip.x, origin.1 + tooltip.y);

    root.draw(&Rectangle::new(
        [(px(x, 0.0), px(y, 0.0)), (px(x, width), px(y, height))],
        BLACK.mix(0.8).filled(),
    ))?;

    for (i, line) in tooltip.lines.iter().enumerate() {
        let font = ("sans-serif", 12.0).into_font();
        // first line is the record name
        let font = if i == 0 { font.style(FontStyle::Bold) } else { font };
        root.draw(&Text::new(
            line.clone(),
            (px(x, PADDING), px(y, PADDING + i as f64 * LINE_HEIGHT)),
            font.color(&WHITE),
        ))?;
    }

    Ok(())
}
