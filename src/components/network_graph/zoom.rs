//! View transform and zoom/pan controller.

use super::config::LayoutConfig;
use super::geometry::{Point, Rect};

/// Pan and zoom transform: `screen = graph * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal translation in screen pixels.
	pub x: f64,
	/// Vertical translation in screen pixels.
	pub y: f64,
	/// Zoom factor.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Converts a canvas pixel position to graph coordinates.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		Point::new((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Converts a graph position to canvas pixels.
	pub fn graph_to_screen(&self, p: Point) -> (f64, f64) {
		(p.x * self.k + self.x, p.y * self.k + self.y)
	}
}

/// Owns the view transform and keeps its scale inside the zoom limits.
#[derive(Clone, Debug)]
pub struct ZoomController {
	transform: ViewTransform,
	width: f64,
	height: f64,
	min_zoom: f64,
	max_zoom: f64,
	step: f64,
	padding: f64,
}

impl ZoomController {
	pub fn new(config: &LayoutConfig, width: f64, height: f64) -> Self {
		let min_zoom = config.min_zoom.max(f64::MIN_POSITIVE);
		Self {
			transform: ViewTransform::default(),
			width,
			height,
			min_zoom,
			max_zoom: config.max_zoom.max(min_zoom),
			step: config.zoom_step.max(1.0),
			padding: config.fit_padding.max(0.0),
		}
	}

	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	/// Current lower zoom bound; zoom-to-fit may have lowered it.
	#[cfg(test)]
	pub fn min_zoom(&self) -> f64 {
		self.min_zoom
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	fn clamp(&self, k: f64) -> f64 {
		k.clamp(self.min_zoom, self.max_zoom)
	}

	/// Rescales around a fixed screen point.
	fn scale_about(&mut self, sx: f64, sy: f64, k: f64) -> ViewTransform {
		let new_k = self.clamp(k);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
		self.transform
	}

	pub fn zoom_in(&mut self) -> ViewTransform {
		let k = self.transform.k * self.step;
		self.scale_about(self.width / 2.0, self.height / 2.0, k)
	}

	pub fn zoom_out(&mut self) -> ViewTransform {
		let k = self.transform.k / self.step;
		self.scale_about(self.width / 2.0, self.height / 2.0, k)
	}

	/// Wheel zoom around the cursor.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) -> ViewTransform {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let k = self.transform.k * factor;
		self.scale_about(sx, sy, k)
	}

	pub fn pan_to(&mut self, x: f64, y: f64) {
		if x.is_finite() && y.is_finite() {
			self.transform.x = x;
			self.transform.y = y;
		}
	}

	/// Centers `bounds` in the viewport at the largest scale that keeps it
	/// inside the padded viewport. Lowers the minimum zoom when the fitted
	/// scale is below it.
	pub fn zoom_to_fit(&mut self, bounds: Option<Rect>) -> ViewTransform {
		let Some(bounds) = bounds.filter(|b| b.width().is_finite() && b.height().is_finite()) else {
			return self.transform;
		};
		let avail_w = (self.width - 2.0 * self.padding).max(1.0);
		let avail_h = (self.height - 2.0 * self.padding).max(1.0);
		let fit = (avail_w / bounds.width()).min(avail_h / bounds.height());
		let mut k = fit.min(self.max_zoom);
		if k < self.min_zoom {
			self.min_zoom = k;
		}
		if !(k.is_finite() && k > 0.0) {
			k = self.transform.k;
		}
		let c = bounds.center();
		self.transform = ViewTransform {
			x: self.width / 2.0 - c.x * k,
			y: self.height / 2.0 - c.y * k,
			k,
		};
		self.transform
	}
}
