//! Orb field state and loop scheduling.
//!
//! One [`OrbField`] exists per canvas. It owns the particle list, the last
//! pointer position, the viewport and the frame scheduling state, and is
//! mutated only from the animation loop and the host's event handlers.

use log::debug;
use rand::rngs::SmallRng;

use super::config::OrbConfig;
use super::particles::{self, Particle};
use super::viewport::{ResizeDebounce, Viewport};

/// Animation loop lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopState {
	/// No frame callback is pending.
	#[default]
	Stopped,
	/// A frame callback has been requested and not yet run.
	Scheduled,
	/// A frame callback is executing.
	Running,
}

/// Decides when the host should request another animation frame.
///
/// Guarantees at most one pending frame callback, so repeated resume signals
/// can never start a second loop.
#[derive(Clone, Debug)]
pub struct FrameScheduler {
	state: LoopState,
	/// False when the user prefers reduced motion.
	animate: bool,
	/// Set while the page is hidden.
	suspended: bool,
}

impl FrameScheduler {
	pub fn new(animate: bool) -> Self {
		Self {
			state: LoopState::Stopped,
			animate,
			suspended: false,
		}
	}

	#[cfg(test)]
	pub fn state(&self) -> LoopState {
		self.state
	}

	pub fn animates(&self) -> bool {
		self.animate
	}

	/// Returns true if the caller must request a frame now.
	pub fn request(&mut self) -> bool {
		if !self.animate || self.suspended || self.state != LoopState::Stopped {
			return false;
		}
		self.state = LoopState::Scheduled;
		true
	}

	pub fn begin_frame(&mut self) {
		self.state = LoopState::Running;
	}

	/// Finishes a frame. Returns true if the caller must request the next one.
	pub fn end_frame(&mut self) -> bool {
		if self.animate && !self.suspended {
			self.state = LoopState::Scheduled;
			true
		} else {
			debug!("floating-orbs: loop stopped");
			self.state = LoopState::Stopped;
			false
		}
	}

	/// Page hidden. Any pending callback is left alone; it just won't reschedule.
	pub fn suspend(&mut self) {
		self.suspended = true;
	}

	/// Stops the loop for good. Returns true if a frame callback was still pending.
	pub fn shutdown(&mut self) -> bool {
		let pending = self.state == LoopState::Scheduled;
		self.animate = false;
		self.state = LoopState::Stopped;
		pending
	}

	/// Page visible again. Returns true if the caller must request a frame.
	pub fn resume(&mut self) -> bool {
		self.suspended = false;
		self.request()
	}
}

/// Last known pointer location in logical pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
	pub x: f64,
	pub y: f64,
}

/// A self-contained instance of the effect.
pub struct OrbField {
	pub config: OrbConfig,
	pub viewport: Viewport,
	pub particles: Vec<Particle>,
	pub pointer: Pointer,
	pub scheduler: FrameScheduler,
	resize: ResizeDebounce,
	generation: u64,
	rng: SmallRng,
}

impl OrbField {
	pub fn new(config: OrbConfig, viewport: Viewport, reduced_motion: bool, rng: SmallRng) -> Self {
		let mut field = Self {
			config,
			viewport,
			particles: Vec::new(),
			pointer: Pointer::default(),
			scheduler: FrameScheduler::new(!reduced_motion),
			resize: ResizeDebounce::default(),
			generation: 0,
			rng,
		};
		field.regenerate();
		field
	}

	#[cfg(test)]
	pub fn with_seed(config: OrbConfig, viewport: Viewport, reduced_motion: bool, seed: u64) -> Self {
		Self::new(config, viewport, reduced_motion, <SmallRng as rand::SeedableRng>::seed_from_u64(seed))
	}

	/// Throws the population away and builds a new one for the current viewport.
	pub fn regenerate(&mut self) {
		self.particles = particles::populate(&self.viewport, &self.config, &mut self.rng);
		self.generation += 1;
		debug!(
			"floating-orbs: generated {} orbs for {}x{} (generation {})",
			self.particles.len(),
			self.viewport.width,
			self.viewport.height,
			self.generation
		);
	}

	/// How many times the population has been built.
	#[cfg(test)]
	pub fn generation(&self) -> u64 {
		self.generation
	}

	pub fn set_pointer(&mut self, x: f64, y: f64) {
		self.pointer = Pointer { x, y };
	}

	/// Registers a resize signal; returns the token the debounce timer must settle with.
	pub fn request_resize(&mut self) -> u64 {
		self.resize.signal()
	}

	/// Applies `viewport` if `token` is the latest resize signal.
	///
	/// Returns true if the population was rebuilt.
	pub fn settle_resize(&mut self, token: u64, viewport: Viewport) -> bool {
		if !self.resize.settle(token) {
			return false;
		}
		self.viewport = viewport;
		self.regenerate();
		true
	}

	/// Pointer-driven offset, zero when the pointer sits at the viewport center.
	pub fn parallax_offset(&self) -> (f64, f64) {
		let strength = self.config.mouse_parallax;
		let axis = |pos: f64, extent: f64| {
			if extent > 0.0 {
				(pos / extent - 0.5) * extent * strength
			} else {
				0.0
			}
		};
		(
			axis(self.pointer.x, self.viewport.width),
			axis(self.pointer.y, self.viewport.height),
		)
	}

	pub fn advance_twinkles(&mut self) {
		for p in &mut self.particles {
			p.advance_twinkle(&mut self.rng);
		}
	}

	/// Moves every orb one frame and recycles those that left the screen.
	pub fn step(&mut self, now: f64) {
		for p in &mut self.particles {
			p.integrate(now);
			if p.is_out_of_bounds(&self.viewport) {
				p.recycle(&self.viewport, &self.config, &mut self.rng);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn field(reduced_motion: bool) -> OrbField {
		OrbField::with_seed(
			OrbConfig::default(),
			Viewport::new(1366.0, 768.0, 1.0),
			reduced_motion,
			99,
		)
	}

	#[test]
	fn test_new_field_is_populated() {
		let f = field(false);
		assert_eq!(f.particles.len(), 10);
		assert_eq!(f.generation(), 1);
		assert_eq!(f.scheduler.state(), LoopState::Stopped);
	}

	#[test]
	fn test_parallax_zero_at_center() {
		for strength in [0.0, 0.02, 0.5, 3.0] {
			let mut f = field(false);
			f.config.mouse_parallax = strength;
			f.set_pointer(683.0, 384.0);
			assert_eq!(f.parallax_offset(), (0.0, 0.0));
		}
	}

	#[test]
	fn test_parallax_at_edges() {
		let mut f = field(false);
		f.set_pointer(0.0, 768.0);
		let (px, py) = f.parallax_offset();
		assert!((px - (-0.5 * 1366.0 * 0.02)).abs() < 1e-9);
		assert!((py - (0.5 * 768.0 * 0.02)).abs() < 1e-9);
	}

	#[test]
	fn test_parallax_zero_viewport() {
		let mut f = OrbField::with_seed(OrbConfig::default(), Viewport::new(0.0, 0.0, 1.0), false, 1);
		f.set_pointer(10.0, 10.0);
		assert_eq!(f.parallax_offset(), (0.0, 0.0));
	}

	#[test]
	fn test_duplicate_resize_regenerates_once() {
		let mut f = field(false);
		let size = Viewport::new(800.0, 600.0, 1.0);
		let first = f.request_resize();
		let second = f.request_resize();
		assert!(!f.settle_resize(first, size));
		assert!(f.settle_resize(second, size));
		assert!(!f.settle_resize(second, size));
		assert_eq!(f.generation(), 2);
		assert_eq!(f.viewport, size);
	}

	#[test]
	fn test_resize_rebuilds_for_new_area() {
		let mut f = field(false);
		let token = f.request_resize();
		assert!(f.settle_resize(token, Viewport::new(1366.0 * 2.0, 768.0 * 2.0, 2.0)));
		assert_eq!(f.particles.len(), 20);
	}

	#[test]
	fn test_step_keeps_population_size() {
		let mut f = field(false);
		let count = f.particles.len();
		for frame in 0..5_000 {
			f.step(frame as f64 * 16.0);
			assert_eq!(f.particles.len(), count);
		}
	}

	#[test]
	fn test_step_recycles_escaped_orb() {
		let mut f = field(false);
		f.particles[0].y = -f.particles[0].radius - 100.0;
		f.step(0.0);
		let p = &f.particles[0];
		assert!(p.y >= 768.0 + 10.0 && p.y <= 768.0 * 1.5);
		assert!(p.x >= -50.0 && p.x <= 1366.0 + 50.0);
	}

	#[test]
	fn test_scheduler_single_loop() {
		let mut s = FrameScheduler::new(true);
		assert!(s.request());
		assert!(!s.request());
		assert!(!s.resume());
		s.begin_frame();
		assert!(!s.resume());
		assert!(s.end_frame());
		assert_eq!(s.state(), LoopState::Scheduled);
	}

	#[test]
	fn test_scheduler_suspend_and_resume() {
		let mut s = FrameScheduler::new(true);
		assert!(s.request());
		s.suspend();
		s.begin_frame();
		assert!(!s.end_frame());
		assert_eq!(s.state(), LoopState::Stopped);
		assert!(s.resume());
		assert!(!s.resume());
		assert_eq!(s.state(), LoopState::Scheduled);
	}

	#[test]
	fn test_scheduler_resume_before_pending_frame() {
		let mut s = FrameScheduler::new(true);
		assert!(s.request());
		s.suspend();
		assert!(!s.resume());
		s.begin_frame();
		assert!(s.end_frame());
	}

	#[test]
	fn test_shutdown_ends_loop() {
		let mut s = FrameScheduler::new(true);
		assert!(s.request());
		assert!(s.shutdown());
		assert_eq!(s.state(), LoopState::Stopped);
		assert!(!s.request());
		assert!(!s.resume());
		s.begin_frame();
		assert!(!s.end_frame());
		assert!(!s.shutdown());
	}

	#[test]
	fn test_reduced_motion_never_schedules() {
		let mut f = field(true);
		assert!(!f.scheduler.animates());
		assert!(!f.scheduler.request());
		assert!(!f.scheduler.resume());
		assert_eq!(f.scheduler.state(), LoopState::Stopped);
	}
}
