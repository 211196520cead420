use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::{GraphFrame, LinkShape, NodeShape, Tooltip};

const BACKGROUND: &str = "#fafafa";
const LINK_RGB: &str = "51, 51, 51";
const LABEL_RGB: &str = "34, 34, 34";

pub fn render(frame: &GraphFrame<'_>, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, frame.width, frame.height);
	for link in &frame.links {
		draw_link(link, ctx);
	}
	for node in &frame.nodes {
		draw_node(node, ctx);
	}
	for node in &frame.nodes {
		draw_label(node, ctx);
	}
	if let Some(tooltip) = &frame.tooltip {
		draw_tooltip(tooltip, ctx);
	}
}

fn draw_link(link: &LinkShape, ctx: &CanvasRenderingContext2d) {
	ctx.set_stroke_style_str(&format!("rgba({LINK_RGB}, {})", link.style.opacity));
	ctx.set_line_width(link.style.width);
	ctx.begin_path();
	ctx.move_to(link.x1, link.y1);
	ctx.line_to(link.x2, link.y2);
	ctx.stroke();
}

fn draw_node(node: &NodeShape<'_>, ctx: &CanvasRenderingContext2d) {
	ctx.set_global_alpha(node.style.opacity);
	ctx.begin_path();
	let _ = ctx.arc(node.x, node.y, node.style.radius.max(0.0), 0.0, 2.0 * PI);
	ctx.set_fill_style_str(node.color);
	ctx.fill();
	ctx.set_stroke_style_str("#ffffff");
	ctx.set_line_width(1.5);
	ctx.stroke();
	ctx.set_global_alpha(1.0);
}

fn draw_label(node: &NodeShape<'_>, ctx: &CanvasRenderingContext2d) {
	let weight = if node.style.bold { "bold " } else { "" };
	ctx.set_font(&format!("{weight}12px sans-serif"));
	ctx.set_fill_style_str(&format!("rgba({LABEL_RGB}, {})", node.style.label_opacity));
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(node.label, node.x + node.style.radius + 4.0, node.y);
}

fn draw_tooltip(tooltip: &Tooltip<'_>, ctx: &CanvasRenderingContext2d) {
	let kind = format!("Type: {}", tooltip.kind);
	ctx.set_font("bold 12px sans-serif");
	let title_width = ctx
		.measure_text(tooltip.title)
		.map(|m| m.width())
		.unwrap_or(120.0);
	ctx.set_font("12px sans-serif");
	let kind_width = ctx.measure_text(&kind).map(|m| m.width()).unwrap_or(80.0);

	let (x, y) = (tooltip.x + 10.0, tooltip.y - 28.0);
	let width = title_width.max(kind_width) + 16.0;
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.9)");
	ctx.fill_rect(x, y, width, 40.0);
	ctx.set_stroke_style_str("rgba(0, 0, 0, 0.25)");
	ctx.set_line_width(1.0);
	ctx.stroke_rect(x, y, width, 40.0);

	ctx.set_text_baseline("top");
	ctx.set_fill_style_str("#222222");
	ctx.set_font("bold 12px sans-serif");
	let _ = ctx.fill_text(tooltip.title, x + 8.0, y + 6.0);
	ctx.set_font("12px sans-serif");
	let _ = ctx.fill_text(&kind, x + 8.0, y + 22.0);
}
