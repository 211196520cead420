use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::markers::MarkerStyle;
use super::state::{CountryPath, CountryTooltip, MapFrame};

const OCEAN: &str = "#f4f7fb";
const BORDER: &str = "#9aa5b1";
const MARKER_RGB: &str = "220, 53, 69";

pub fn render(frame: &MapFrame<'_>, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(OCEAN);
	ctx.fill_rect(0.0, 0.0, frame.width, frame.height);

	ctx.set_stroke_style_str(BORDER);
	ctx.set_line_width(0.5);
	for country in frame.countries {
		draw_country(country, ctx);
	}
	for marker in &frame.markers {
		draw_marker(marker, ctx);
	}
	if let Some(tooltip) = &frame.tooltip {
		draw_tooltip(tooltip, ctx);
	}
}

fn draw_country(country: &CountryPath, ctx: &CanvasRenderingContext2d) {
	ctx.begin_path();
	for segment in &country.segments {
		let mut points = segment.iter();
		if let Some(&(x, y)) = points.next() {
			ctx.move_to(x, y);
		}
		for &(x, y) in points {
			ctx.line_to(x, y);
		}
	}
	ctx.stroke();
}

fn draw_marker(marker: &MarkerStyle, ctx: &CanvasRenderingContext2d) {
	if marker.radius <= 0.0 {
		return;
	}
	ctx.begin_path();
	let _ = ctx.arc(marker.x, marker.y, marker.radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&format!("rgba({MARKER_RGB}, {})", marker.opacity));
	ctx.fill();
}

fn draw_tooltip(tooltip: &CountryTooltip<'_>, ctx: &CanvasRenderingContext2d) {
	ctx.set_font("12px sans-serif");
	let width = ctx
		.measure_text(tooltip.name)
		.map(|m| m.width())
		.unwrap_or(100.0)
		+ 12.0;
	let (x, y) = (tooltip.x + 10.0, tooltip.y - 24.0);
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.9)");
	ctx.fill_rect(x, y, width, 20.0);
	ctx.set_stroke_style_str("rgba(0, 0, 0, 0.25)");
	ctx.set_line_width(1.0);
	ctx.stroke_rect(x, y, width, 20.0);
	ctx.set_fill_style_str("#222222");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(tooltip.name, x + 6.0, y + 10.0);
}
