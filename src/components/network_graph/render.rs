//! Canvas rendering of a [`Scene`].
//!
//! The renderer is a thin adapter: all geometry comes from the scene
//! description. Passes, back to front:
//! 1. Background (screen space)
//! 2. Namespace containers and their labels (world space)
//! 3. Aggregate edges, inner and direct edges, then count badges
//! 4. Nodes, rings and labels
//! 5. Vignette (screen space)

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::geometry::Point;
use super::scale::ScaledValues;
use super::scene::{ContainerShape, EdgeKind, EdgeShape, NodeShape, Scene};
use super::theme::{Color, Theme};
use super::types::EntityType;
use super::zoom::ViewTransform;

/// Everything one frame needs besides the scene itself.
pub struct Frame<'a> {
	pub ctx: &'a CanvasRenderingContext2d,
	pub width: f64,
	pub height: f64,
	pub transform: ViewTransform,
	pub scale: &'a ScaledValues,
	pub theme: &'a Theme,
}

pub fn render(scene: &Scene, frame: &Frame) {
	let ctx = frame.ctx;
	draw_background(frame);

	ctx.save();
	let _ = ctx.translate(frame.transform.x, frame.transform.y);
	let _ = ctx.scale(frame.transform.k, frame.transform.k);

	for container in &scene.containers {
		draw_container(frame, container);
	}
	for edge in scene.edges_of(EdgeKind::Namespace) {
		draw_edge(frame, edge);
	}
	for edge in scene.edges.iter().filter(|e| e.kind != EdgeKind::Namespace) {
		draw_edge(frame, edge);
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
	for edge in scene.edges_of(EdgeKind::Namespace) {
		draw_count(frame, edge);
	}
	// Background nodes first so the focused ones stay on top.
	for node in scene.nodes.iter().filter(|n| n.background) {
		draw_node(frame, node);
	}
	for node in scene.nodes.iter().filter(|n| !n.background) {
		draw_node(frame, node);
	}

	ctx.restore();

	if frame.theme.background.vignette > 0.0 {
		draw_vignette(frame);
	}
}

fn draw_background(frame: &Frame) {
	let (ctx, theme, w, h) = (frame.ctx, frame.theme, frame.width, frame.height);
	let gradient = if theme.background.use_gradient {
		ctx.create_radial_gradient(w / 2.0, h / 2.0, 0.0, w / 2.0, h / 2.0, w.max(h) * 0.8)
			.ok()
	} else {
		None
	};
	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &theme.background.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &theme.background.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&theme.background.color.to_css()),
	}
	ctx.fill_rect(0.0, 0.0, w, h);
}

fn draw_vignette(frame: &Frame) {
	let (ctx, w, h) = (frame.ctx, frame.width, frame.height);
	let Ok(gradient) =
		ctx.create_radial_gradient(w / 2.0, h / 2.0, w.min(h) * 0.3, w / 2.0, h / 2.0, w.max(h) * 0.7)
	else {
		return;
	};
	let _ = gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)");
	let _ = gradient.add_color_stop(
		1.0,
		&format!("rgba(0, 0, 0, {})", frame.theme.background.vignette),
	);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, w, h);
}

fn dim(frame: &Frame, background: bool) -> f64 {
	if background { frame.theme.dim_alpha } else { 1.0 }
}

fn draw_container(frame: &Frame, container: &ContainerShape) {
	let (ctx, style, scale) = (frame.ctx, &frame.theme.container, frame.scale);
	let b = container.bounds;
	ctx.set_global_alpha(dim(frame, container.background));

	rounded_rect(ctx, b.min_x, b.min_y, b.width(), b.height(), style.corner_radius);
	let fill = if container.internet_access {
		style.internet_fill
	} else {
		style.fill
	};
	ctx.set_fill_style_str(&fill.to_css());
	ctx.fill();

	let (border, width) = if container.selected {
		(style.selected_border, scale.selected_border_width)
	} else if container.is_active {
		(style.active_border, scale.border_width)
	} else {
		(style.border, scale.border_width)
	};
	ctx.set_stroke_style_str(&border.to_css());
	ctx.set_line_width(width);
	ctx.stroke();

	ctx.set_fill_style_str(&style.anchor.to_css());
	for anchor in &container.anchors {
		ctx.begin_path();
		let _ = ctx.arc(anchor.position.x, anchor.position.y, scale.anchor_radius, 0.0, 2.0 * PI);
		ctx.fill();
	}

	ctx.set_fill_style_str(&style.label.to_css());
	ctx.set_font(&scale.container_font);
	let _ = ctx.fill_text(&container.label, b.min_x, b.min_y - 6.0 / scale.k);
	ctx.set_global_alpha(1.0);
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	let r = r.min(w / 2.0).min(h / 2.0).max(0.0);
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

fn edge_color(frame: &Frame, edge: &EdgeShape) -> Color {
	let style = &frame.theme.edge;
	match (edge.kind, edge.is_active) {
		(EdgeKind::Namespace, true) => style.namespace_active,
		(EdgeKind::Namespace, false) => style.namespace,
		(_, true) => style.active,
		(_, false) => style.inactive,
	}
}

/// Inactive edges are dashed, fading to solid when zoomed out.
fn draw_edge(frame: &Frame, edge: &EdgeShape) {
	let (ctx, scale) = (frame.ctx, frame.scale);
	let (from, to) = (edge.from, edge.to);
	let (dx, dy) = (to.x - from.x, to.y - from.y);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 || !dist.is_finite() {
		return;
	}
	let (ux, uy) = (dx / dist, dy / dist);

	// Node ends stop at the circle; anchor ends touch the border.
	let start_trim = if edge.source_is_node { scale.node_radius } else { 0.0 };
	let end_trim = if edge.target_is_node { scale.node_radius } else { 0.0 };
	let arrow = if edge.bidirectional || (edge.kind == EdgeKind::Inner && !edge.target_is_node) {
		0.0
	} else {
		scale.arrow_size
	};

	let width = match edge.kind {
		EdgeKind::Namespace => scale.namespace_line_width(edge.count),
		_ => scale.edge_line_width,
	};
	let color = edge_color(frame, edge);
	ctx.set_global_alpha(dim(frame, edge.background));
	ctx.set_stroke_style_str(&color.to_css());
	ctx.set_line_width(width * (1.0 + 0.3 * (1.0 - scale.dash_alpha)));

	let effective_gap = scale.dash_pattern.1 * scale.dash_alpha;
	if !edge.is_active && effective_gap > 0.1 {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(scale.dash_pattern.0),
			&JsValue::from_f64(effective_gap),
		));
	} else {
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}

	ctx.begin_path();
	ctx.move_to(from.x + ux * start_trim, from.y + uy * start_trim);
	ctx.line_to(to.x - ux * (end_trim + arrow), to.y - uy * (end_trim + arrow));
	ctx.stroke();

	if arrow > 0.0 && !scale.cull_arrows {
		let _ = ctx.set_line_dash(&js_sys::Array::new());
		ctx.set_fill_style_str(&color.with_alpha(color.a * scale.arrow_alpha).to_css());
		let tip = Point::new(to.x - ux * end_trim, to.y - uy * end_trim);
		let back = Point::new(tip.x - ux * arrow, tip.y - uy * arrow);
		let (px, py) = (-uy * arrow * 0.5, ux * arrow * 0.5);
		ctx.begin_path();
		ctx.move_to(tip.x, tip.y);
		ctx.line_to(back.x + px, back.y + py);
		ctx.line_to(back.x - px, back.y - py);
		ctx.close_path();
		ctx.fill();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_count(frame: &Frame, edge: &EdgeShape) {
	if edge.count < 2 {
		return;
	}
	let (ctx, scale) = (frame.ctx, frame.scale);
	let mid = Point::new((edge.from.x + edge.to.x) / 2.0, (edge.from.y + edge.to.y) / 2.0);
	let r = 7.0 / scale.k;
	ctx.set_global_alpha(dim(frame, edge.background));
	ctx.begin_path();
	let _ = ctx.arc(mid.x, mid.y, r, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&edge_color(frame, edge).with_alpha(1.0).to_css());
	ctx.fill();
	ctx.set_fill_style_str(&frame.theme.edge.count_label.to_css());
	ctx.set_font(&scale.label_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(&edge.count.to_string(), mid.x, mid.y);
	ctx.set_text_align("start");
	ctx.set_text_baseline("alphabetic");
	ctx.set_global_alpha(1.0);
}

fn draw_node(frame: &Frame, node: &NodeShape) {
	let (ctx, scale, style) = (frame.ctx, frame.scale, &frame.theme.node);
	let Point { x, y } = node.position;
	let radius = scale.node_radius;
	let base = match node.kind {
		EntityType::Deployment => style.deployment,
		_ => style.external,
	};
	let alpha = dim(frame, node.background);
	ctx.set_global_alpha(alpha);

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	let gradient = if style.use_gradient {
		ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
			.ok()
	} else {
		None
	};
	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &base.lighten(0.4).to_css());
			let _ = gradient.add_color_stop(0.7, &base.to_css());
			let _ = gradient.add_color_stop(1.0, &base.darken(0.2).to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&base.to_css()),
	}
	ctx.fill();

	let mut ring = radius + scale.ring_offset;
	let mut stroke_ring = |color: Color| {
		ctx.begin_path();
		let _ = ctx.arc(x, y, ring, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&color.to_css());
		ctx.set_line_width(scale.ring_width);
		ctx.stroke();
		ring += scale.ring_width + scale.ring_offset;
	};
	if node.selected {
		stroke_ring(style.selected_ring);
	} else if node.hovered {
		stroke_ring(Color::rgba(255, 255, 255, 0.8));
	}
	if node.is_active {
		stroke_ring(style.active_ring);
	}
	if node.internet_access {
		stroke_ring(style.internet_ring);
	}

	if scale.show_labels && (alpha > 0.5 || node.hovered) {
		ctx.set_fill_style_str(&style.label.to_css());
		ctx.set_font(&scale.label_font);
		let _ = ctx.fill_text(&node.label, x + radius + 4.0 / scale.k, y + 3.0 / scale.k);
	}
	ctx.set_global_alpha(1.0);
}
