//! Visual theming for the network graph.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	pub color: Color,
	/// Center color of the radial gradient.
	pub color_secondary: Color,
	pub use_gradient: bool,
	/// Vignette intensity (0.0 = none, 1.0 = strong)
	pub vignette: f64,
}

/// Namespace container style.
#[derive(Clone, Debug)]
pub struct ContainerStyle {
	pub fill: Color,
	pub border: Color,
	/// Border of a container with at least one active member.
	pub active_border: Color,
	pub selected_border: Color,
	/// Fill tint of containers with an internet-exposed member.
	pub internet_fill: Color,
	pub label: Color,
	pub anchor: Color,
	pub corner_radius: f64,
}

#[derive(Clone, Debug)]
pub struct EdgeStyle {
	pub active: Color,
	pub inactive: Color,
	/// Aggregate edges between containers.
	pub namespace: Color,
	pub namespace_active: Color,
	pub count_label: Color,
}

#[derive(Clone, Debug)]
pub struct NodeStyle {
	pub use_gradient: bool,
	pub deployment: Color,
	/// External entities and CIDR blocks.
	pub external: Color,
	/// Ring drawn around internet-exposed nodes.
	pub internet_ring: Color,
	pub active_ring: Color,
	pub selected_ring: Color,
	pub label: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Preset name.
	pub name: &'static str,
	/// Canvas background.
	pub background: BackgroundStyle,
	/// Namespace containers and their anchors.
	pub container: ContainerStyle,
	/// Node, inner and aggregate edges.
	pub edge: EdgeStyle,
	/// Node fill and rings.
	pub node: NodeStyle,
	/// Global alpha of elements flagged `background` by the selection.
	pub dim_alpha: f64,
}

impl Theme {
	/// Dark slate theme with subtle gradients (default)
	pub fn default_theme() -> Self {
		Self {
			name: "default",
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				color_secondary: Color::rgb(30, 35, 42),
				use_gradient: true,
				vignette: 0.15,
			},
			container: ContainerStyle {
				fill: Color::rgba(94, 129, 172, 0.08),
				border: Color::rgba(129, 161, 193, 0.45),
				active_border: Color::rgba(100, 180, 160, 0.8),
				selected_border: Color::rgb(235, 203, 139),
				internet_fill: Color::rgba(191, 97, 106, 0.08),
				label: Color::rgba(216, 222, 233, 0.9),
				anchor: Color::rgba(129, 161, 193, 0.6),
				corner_radius: 6.0,
			},
			edge: EdgeStyle {
				active: Color::rgba(100, 180, 160, 0.85),
				inactive: Color::rgba(140, 160, 180, 0.45),
				namespace: Color::rgba(140, 160, 180, 0.6),
				namespace_active: Color::rgba(100, 180, 160, 0.9),
				count_label: Color::rgb(236, 239, 244),
			},
			node: NodeStyle {
				use_gradient: true,
				deployment: Color::rgb(94, 129, 172),
				external: Color::rgb(180, 136, 100),
				internet_ring: Color::rgb(191, 97, 106),
				active_ring: Color::rgb(100, 180, 160),
				selected_ring: Color::rgb(235, 203, 139),
				label: Color::rgba(255, 255, 255, 0.85),
			},
			dim_alpha: 0.25,
		}
	}

	/// Flat theme without gradients or vignette
	pub fn minimal() -> Self {
		let base = Self::default_theme();
		Self {
			name: "minimal",
			background: BackgroundStyle {
				color: Color::rgb(25, 28, 35),
				color_secondary: Color::rgb(25, 28, 35),
				use_gradient: false,
				vignette: 0.0,
			},
			node: NodeStyle {
				use_gradient: false,
				..base.node
			},
			..base
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}
