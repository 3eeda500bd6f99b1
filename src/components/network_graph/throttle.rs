//! Rate limiting for drag and resize refreshes.

/// Leading-edge throttle with a trailing flush.
///
/// Calls inside the interval are suppressed but remembered, so the caller can
/// run one final refresh once the interval has passed.
#[derive(Clone, Debug)]
pub struct Throttle {
	interval_ms: f64,
	last: Option<f64>,
	pending: bool,
}

impl Throttle {
	pub fn new(interval_ms: f64) -> Self {
		Self {
			interval_ms: interval_ms.max(0.0),
			last: None,
			pending: false,
		}
	}

	fn ready(&self, now_ms: f64) -> bool {
		self.last.is_none_or(|t| now_ms - t >= self.interval_ms)
	}

	/// Whether the action may run at `now_ms`.
	pub fn poll(&mut self, now_ms: f64) -> bool {
		if self.ready(now_ms) {
			self.last = Some(now_ms);
			self.pending = false;
			true
		} else {
			self.pending = true;
			false
		}
	}

	/// Whether a suppressed call is owed and may run now.
	pub fn flush(&mut self, now_ms: f64) -> bool {
		if self.pending && self.ready(now_ms) {
			self.pending = false;
			self.last = Some(now_ms);
			true
		} else {
			false
		}
	}
}
