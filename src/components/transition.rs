//! Eased interpolation between two visual states.

pub fn mix(a: f64, b: f64, t: f64) -> f64 {
	a + (b - a) * t
}

fn ease_cubic_in_out(t: f64) -> f64 {
	if t < 0.5 {
		4.0 * t * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
	}
}

pub trait Lerp {
	fn lerp(&self, to: &Self, t: f64) -> Self;
}

/// A value easing from one state to another over a fixed duration.
#[derive(Clone, Debug)]
pub struct Transition<T> {
	from: T,
	to: T,
	elapsed_ms: f64,
	duration_ms: f64,
}

impl<T: Lerp + Copy> Transition<T> {
	pub fn settled(value: T) -> Self {
		Self {
			from: value,
			to: value,
			elapsed_ms: 0.0,
			duration_ms: 0.0,
		}
	}

	/// Animate from `from` to `to`, ignoring where the value currently is.
	pub fn between(from: T, to: T, duration_ms: f64) -> Self {
		Self {
			from,
			to,
			elapsed_ms: 0.0,
			duration_ms: duration_ms.max(0.0),
		}
	}

	/// Start animating toward `to` from wherever the value currently is, so
	/// interrupted transitions continue smoothly.
	pub fn retarget(&mut self, to: T, duration_ms: f64) {
		self.from = self.current();
		self.to = to;
		self.elapsed_ms = 0.0;
		self.duration_ms = duration_ms.max(0.0);
	}

	pub fn advance(&mut self, dt_ms: f64) {
		self.elapsed_ms = (self.elapsed_ms + dt_ms).min(self.duration_ms);
	}

	/// Jump to the target, dropping any animation in flight.
	pub fn snap(&mut self) {
		self.from = self.to;
		self.elapsed_ms = 0.0;
		self.duration_ms = 0.0;
	}

	pub fn is_settled(&self) -> bool {
		self.elapsed_ms >= self.duration_ms
	}

	pub fn current(&self) -> T {
		if self.is_settled() {
			return self.to;
		}
		let t = ease_cubic_in_out(self.elapsed_ms / self.duration_ms);
		self.from.lerp(&self.to, t)
	}
}
