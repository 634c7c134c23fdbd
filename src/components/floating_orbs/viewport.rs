//! Drawing-surface geometry.
//!
//! The simulation works in logical (CSS) pixels. The canvas backing store is
//! scaled by the device pixel ratio so discs stay sharp on dense screens, and
//! the context transform maps logical coordinates back onto it.

/// Quiet period before a burst of resize signals is acted on.
pub const RESIZE_DEBOUNCE_MS: i32 = 120;

/// Logical size of the drawing surface plus its device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
	/// Device pixel ratio, never below 1.
	pub dpr: f64,
}

impl Viewport {
	pub fn new(width: f64, height: f64, dpr: f64) -> Self {
		let dpr = if dpr.is_finite() { dpr.max(1.0) } else { 1.0 };
		Self {
			width: width.max(0.0),
			height: height.max(0.0),
			dpr,
		}
	}

	pub fn area(&self) -> f64 {
		self.width * self.height
	}

	/// Backing-store size in device pixels.
	pub fn backing_size(&self) -> (u32, u32) {
		(
			(self.width * self.dpr).round() as u32,
			(self.height * self.dpr).round() as u32,
		)
	}
}

/// Coalesces resize signals so only the last one in a quiet window is handled.
///
/// Every signal hands out a new token; a settle attempt only succeeds for the
/// most recent token, and only once.
#[derive(Clone, Debug, Default)]
pub struct ResizeDebounce {
	latest: u64,
	settled: u64,
}

impl ResizeDebounce {
	/// Records a resize signal and returns the token its timer must present.
	pub fn signal(&mut self) -> u64 {
		self.latest += 1;
		self.latest
	}

	/// Whether `token` is the newest unsettled signal. Marks it settled if so.
	pub fn settle(&mut self, token: u64) -> bool {
		if token != self.latest || token == self.settled {
			return false;
		}
		self.settled = token;
		true
	}

	#[cfg(test)]
	pub fn pending(&self) -> bool {
		self.latest != self.settled
	}
}
