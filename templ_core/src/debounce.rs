use std::time::Duration;
use std::time::Instant;

/// Collapses bursts of calls into a single invocation once the calls stop
/// for `wait`.
///
/// The debouncer holds no timer of its own. Callers report calls with
/// [`Debouncer::call`] and check for the end of the quiet period with
/// [`Debouncer::poll`], typically while waiting until
/// [`Debouncer::deadline`].
///
/// With `leading` set, the first call of a burst runs immediately and the
/// trailing invocation is suppressed.
#[derive(Debug, Clone)]
pub struct Debouncer {
	wait: Duration,
	leading: bool,
	deadline: Option<Instant>,
}

impl Debouncer {
	/// A debouncer that invokes on the trailing edge only.
	pub fn new(wait: Duration) -> Self {
		Self {
			wait,
			leading: false,
			deadline: None,
		}
	}

	/// A debouncer that invokes on the leading edge only.
	pub fn leading(wait: Duration) -> Self {
		Self {
			wait,
			leading: true,
			deadline: None,
		}
	}

	pub fn wait(&self) -> Duration {
		self.wait
	}

	/// Record a call at `now` and restart the quiet period. Returns `true`
	/// when the wrapped action should run right away.
	pub fn call(&mut self, now: Instant) -> bool {
		let call_now = self.leading && self.deadline.is_none();
		self.deadline = Some(now + self.wait);
		call_now
	}

	/// Returns `true` once, when the quiet period has elapsed at `now` and a
	/// trailing invocation is due.
	pub fn poll(&mut self, now: Instant) -> bool {
		match self.deadline {
			Some(deadline) if now >= deadline => {
				self.deadline = None;
				!self.leading
			}
			_ => false,
		}
	}

	/// When the current quiet period ends, if one is running.
	pub fn deadline(&self) -> Option<Instant> {
		self.deadline
	}

	pub fn is_pending(&self) -> bool {
		self.deadline.is_some()
	}
}
