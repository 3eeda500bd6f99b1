//! Geometry primitives shared by every layout step.
//!
//! Screen convention: `y` grows downwards, so the `Top` side of a rectangle
//! sits at `min_y`.

use serde::Deserialize;

/// A point in graph (world) space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate, growing downwards.
	pub y: f64,
}

impl Point {
	/// Creates a point.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance to `other`.
	pub fn distance(self, other: Point) -> f64 {
		let (dx, dy) = ((self.x - other.x).abs(), (self.y - other.y).abs());
		(dx * dx + dy * dy).sqrt()
	}

	/// This point translated by `(dx, dy)`.
	pub fn offset(self, dx: f64, dy: f64) -> Self {
		Self::new(self.x + dx, self.y + dy)
	}

	/// Whether both coordinates are finite.
	pub fn is_finite(self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}

	/// Arithmetic mean of a set of points, `None` when empty.
	pub fn mean<I: IntoIterator<Item = Point>>(points: I) -> Option<Point> {
		let (mut sx, mut sy, mut n) = (0.0, 0.0, 0usize);
		for p in points {
			sx += p.x;
			sy += p.y;
			n += 1;
		}
		(n > 0).then(|| Point::new(sx / n as f64, sy / n as f64))
	}
}

/// One of the four boundary sides of a namespace container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Side {
	Top,
	Left,
	Right,
	Bottom,
}

impl Side {
	/// Iteration order used everywhere sides are enumerated. Ties in the
	/// router resolve to the earliest side in this order.
	pub const ALL: [Side; 4] = [Side::Top, Side::Left, Side::Right, Side::Bottom];

	/// The only side an anchor on `self` may pair with.
	pub fn opposite(self) -> Side {
		match self {
			Side::Top => Side::Bottom,
			Side::Bottom => Side::Top,
			Side::Left => Side::Right,
			Side::Right => Side::Left,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Side::Top => "top",
			Side::Left => "left",
			Side::Right => "right",
			Side::Bottom => "bottom",
		}
	}
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
	pub min_x: f64,
	pub min_y: f64,
	pub max_x: f64,
	pub max_y: f64,
}

impl Rect {
	/// Tight bounding box of a point set, `None` when empty.
	pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Option<Rect> {
		let mut iter = points.into_iter();
		let first = iter.next()?;
		let init = Rect {
			min_x: first.x,
			min_y: first.y,
			max_x: first.x,
			max_y: first.y,
		};
		Some(iter.fold(init, |r, p| Rect {
			min_x: r.min_x.min(p.x),
			min_y: r.min_y.min(p.y),
			max_x: r.max_x.max(p.x),
			max_y: r.max_y.max(p.y),
		}))
	}

	pub fn padded(self, pad: f64) -> Rect {
		Rect {
			min_x: self.min_x - pad,
			min_y: self.min_y - pad,
			max_x: self.max_x + pad,
			max_y: self.max_y + pad,
		}
	}

	pub fn union(self, other: Rect) -> Rect {
		Rect {
			min_x: self.min_x.min(other.min_x),
			min_y: self.min_y.min(other.min_y),
			max_x: self.max_x.max(other.max_x),
			max_y: self.max_y.max(other.max_y),
		}
	}

	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}

	pub fn center(&self) -> Point {
		Point::new(
			(self.min_x + self.max_x) / 2.0,
			(self.min_y + self.max_y) / 2.0,
		)
	}

	pub fn contains(&self, p: Point) -> bool {
		p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
	}

	/// Midpoint of the given boundary side.
	pub fn anchor(&self, side: Side) -> Point {
		let c = self.center();
		match side {
			Side::Top => Point::new(c.x, self.min_y),
			Side::Bottom => Point::new(c.x, self.max_y),
			Side::Left => Point::new(self.min_x, c.y),
			Side::Right => Point::new(self.max_x, c.y),
		}
	}
}

/// Displacement that separates two overlapping circles, split evenly.
///
/// Returns the push applied to `a`; `b` receives the negation. Coincident
/// centers are separated along a direction derived from `tiebreak` so the
/// result stays deterministic and finite.
pub fn collision_push(a: Point, b: Point, min_distance: f64, tiebreak: usize) -> Option<(f64, f64)> {
	let (dx, dy) = (a.x - b.x, a.y - b.y);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist >= min_distance {
		return None;
	}
	let (ux, uy) = if dist < 1e-9 {
		let angle = tiebreak as f64 * 2.399_963_229_728_653; // golden angle
		(angle.cos(), angle.sin())
	} else {
		(dx / dist, dy / dist)
	};
	let overlap = (min_distance - dist) / 2.0;
	Some((ux * overlap, uy * overlap))
}

/// Linear pull of `from` towards `to`, scaled by `strength * alpha`.
pub fn attraction(from: Point, to: Point, strength: f64, alpha: f64) -> (f64, f64) {
	let k = strength * alpha;
	((to.x - from.x) * k, (to.y - from.y) * k)
}
