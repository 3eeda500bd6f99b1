//! Zoom-dependent scaling of graph visuals.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: layout coordinates. Values scale with zoom.
//! - **Screen-space**: canvas pixels. Values stay constant regardless of zoom.
//!
//! Every size handed to the renderer is in world-space, ready to use after the
//! canvas transform has been applied.

/// How a visual size follows the zoom level `k`.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant screen-space size (pixels).
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// How an opacity multiplier follows the zoom level.
#[derive(Clone, Debug)]
pub enum AlphaBehavior {
	/// Alpha equals `k`, clamped to [0, 1].
	ScaleWithZoom,
	/// Fully visible at `full_alpha_k`, invisible at `zero_alpha_k`.
	Fade { zero_alpha_k: f64, full_alpha_k: f64 },
}

impl AlphaBehavior {
	pub fn apply(&self, k: f64) -> f64 {
		match self {
			AlphaBehavior::ScaleWithZoom => k.clamp(0.0, 1.0),
			AlphaBehavior::Fade {
				zero_alpha_k,
				full_alpha_k,
			} => {
				if zero_alpha_k == full_alpha_k {
					return 1.0;
				}
				((k - zero_alpha_k) / (full_alpha_k - zero_alpha_k)).clamp(0.0, 1.0)
			}
		}
	}
}

#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// Applied to the layout's world-space node radius.
	pub radius_behavior: ScaleBehavior,
	/// Hit detection radius in world units.
	pub hit_radius: f64,
	pub hit_behavior: ScaleBehavior,
	/// Label font size in screen pixels.
	pub label_size: f64,
	/// Below this zoom labels stop growing in world-space.
	pub label_min_k: f64,
	/// Labels are hidden below this zoom.
	pub label_cull_k: f64,
}

#[derive(Clone, Debug)]
pub struct EdgeScaleConfig {
	/// Line width in screen pixels.
	pub line_width: f64,
	/// Extra screen pixels per doubling of an aggregate's link count.
	pub count_width: f64,
	/// Dash pattern (dash, gap) in world units, used for inactive edges.
	pub dash_pattern: (f64, f64),
	/// When faded out, dashed edges become solid lines.
	pub dash_alpha_behavior: AlphaBehavior,
}

#[derive(Clone, Debug)]
pub struct ArrowScaleConfig {
	pub size: f64,
	pub size_behavior: ScaleBehavior,
	pub alpha_behavior: AlphaBehavior,
	/// Minimum alpha to bother drawing.
	pub cull_alpha: f64,
}

#[derive(Clone, Debug)]
pub struct ContainerScaleConfig {
	/// Namespace label font size in screen pixels.
	pub label_size: f64,
	pub border_width: f64,
	/// Border width of the selected container, in screen pixels.
	pub selected_border_width: f64,
	/// Anchor dot radius in screen pixels.
	pub anchor_radius: f64,
}

#[derive(Clone, Debug)]
pub struct RingScaleConfig {
	/// Ring stroke width in screen pixels.
	pub width: f64,
	/// Ring offset from the node edge in screen pixels.
	pub offset: f64,
}

/// Complete scale configuration for all graph elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub node: NodeScaleConfig,
	pub edge: EdgeScaleConfig,
	pub arrow: ArrowScaleConfig,
	pub container: ContainerScaleConfig,
	pub ring: RingScaleConfig,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				radius_behavior: ScaleBehavior::Clamped {
					min_screen: 4.0,
					max_screen: f64::INFINITY,
				},
				hit_radius: 12.0,
				hit_behavior: ScaleBehavior::Clamped {
					min_screen: 6.0,
					max_screen: f64::INFINITY,
				},
				label_size: 10.0,
				label_min_k: 0.5,
				label_cull_k: 0.35,
			},
			edge: EdgeScaleConfig {
				line_width: 1.25,
				count_width: 0.75,
				dash_pattern: (6.0, 4.0),
				dash_alpha_behavior: AlphaBehavior::Fade {
					zero_alpha_k: 0.4,
					full_alpha_k: 0.9,
				},
			},
			arrow: ArrowScaleConfig {
				size: 5.0,
				size_behavior: ScaleBehavior::Clamped {
					min_screen: 0.0,
					max_screen: 18.0,
				},
				alpha_behavior: AlphaBehavior::ScaleWithZoom,
				cull_alpha: 0.05,
			},
			container: ContainerScaleConfig {
				label_size: 12.0,
				border_width: 1.0,
				selected_border_width: 2.5,
				anchor_radius: 2.0,
			},
			ring: RingScaleConfig {
				width: 1.5,
				offset: 2.0,
			},
		}
	}
}

/// Scale values for one zoom level. Create once per frame.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	pub k: f64,
	pub node_radius: f64,
	pub hit_radius: f64,
	pub label_font: String,
	pub show_labels: bool,
	pub container_font: String,
	pub edge_line_width: f64,
	count_width: f64,
	pub dash_pattern: (f64, f64),
	/// Dash visibility in [0, 1]. At 0, inactive edges are solid.
	pub dash_alpha: f64,
	pub arrow_size: f64,
	pub arrow_alpha: f64,
	pub cull_arrows: bool,
	pub border_width: f64,
	pub selected_border_width: f64,
	pub anchor_radius: f64,
	pub ring_width: f64,
	pub ring_offset: f64,
}

impl ScaledValues {
	/// `node_radius` is the layout's world-space radius.
	pub fn new(config: &ScaleConfig, k: f64, node_radius: f64) -> Self {
		let label_font_size = config.node.label_size / k.max(config.node.label_min_k);
		let container_font_size = config.container.label_size / k.max(config.node.label_min_k);
		let arrow_alpha = config.arrow.alpha_behavior.apply(k);
		let screen = |px: f64| ScaleBehavior::Screen.apply(px, k);

		Self {
			k,
			node_radius: config.node.radius_behavior.apply(node_radius, k),
			hit_radius: config.node.hit_behavior.apply(config.node.hit_radius, k),
			label_font: format!("{}px sans-serif", label_font_size),
			show_labels: k >= config.node.label_cull_k,
			container_font: format!("bold {}px sans-serif", container_font_size),
			edge_line_width: screen(config.edge.line_width),
			count_width: screen(config.edge.count_width),
			dash_pattern: config.edge.dash_pattern,
			dash_alpha: config.edge.dash_alpha_behavior.apply(k),
			arrow_size: config.arrow.size_behavior.apply(config.arrow.size, k),
			arrow_alpha,
			cull_arrows: arrow_alpha < config.arrow.cull_alpha,
			border_width: screen(config.container.border_width),
			selected_border_width: screen(config.container.selected_border_width),
			anchor_radius: screen(config.container.anchor_radius),
			ring_width: screen(config.ring.width),
			ring_offset: screen(config.ring.offset),
		}
	}

	/// Line width of an aggregate edge summarizing `count` links.
	pub fn namespace_line_width(&self, count: usize) -> f64 {
		self.edge_line_width + self.count_width * (count.max(1) as f64).log2()
	}
}
