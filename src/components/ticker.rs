//! Timer abstraction shared by the animated widgets.
//!
//! Widgets never read the clock themselves. The component drives them from a
//! `requestAnimationFrame` loop and passes the current time in; tests pass
//! synthetic timestamps instead.

/// Something advanced by a periodic driver.
pub trait Tick {
	/// Advance to `now_ms` (milliseconds on a monotonic clock).
	fn tick(&mut self, now_ms: f64);
}

/// A fixed-period timer polled with the current time.
///
/// Fires at most once per poll. When the caller falls more than a full period
/// behind (a throttled background tab, say) the missed periods are dropped
/// rather than replayed in a burst.
#[derive(Clone, Debug)]
pub struct Interval {
	period_ms: f64,
	next_due_ms: Option<f64>,
}

impl Interval {
	pub fn new(period_ms: f64) -> Self {
		Self {
			period_ms: period_ms.max(1.0),
			next_due_ms: None,
		}
	}

	pub fn period_ms(&self) -> f64 {
		self.period_ms
	}

	/// Returns true when a period has elapsed since the last firing. The first
	/// poll only arms the timer.
	pub fn poll(&mut self, now_ms: f64) -> bool {
		let Some(due) = self.next_due_ms else {
			self.next_due_ms = Some(now_ms + self.period_ms);
			return false;
		};
		if now_ms < due {
			return false;
		}
		let mut next = due + self.period_ms;
		if next <= now_ms {
			next = now_ms + self.period_ms;
		}
		self.next_due_ms = Some(next);
		true
	}
}
