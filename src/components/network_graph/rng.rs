//! Seeded pseudo-random source for initial node placement.

/// xorshift64* generator. Same seed, same sequence.
#[derive(Clone, Debug)]
pub struct SeededRng {
	state: u64,
}

impl SeededRng {
	pub fn new(seed: u64) -> Self {
		Self { state: seed.max(1) }
	}

	fn next_u64(&mut self) -> u64 {
		let mut x = self.state;
		x ^= x >> 12;
		x ^= x << 25;
		x ^= x >> 27;
		self.state = x;
		x.wrapping_mul(0x2545F4914F6CDD1D_u64)
	}

	/// Uniform value in `[-1, 1)`.
	pub fn next_signed(&mut self) -> f64 {
		let v = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
		v * 2.0 - 1.0
	}
}
