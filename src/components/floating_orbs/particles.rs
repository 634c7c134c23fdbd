//! Orb population: how many there are, how they are born and reborn.

use std::f64::consts::TAU;

use rand::Rng;

use super::config::{OrbConfig, Swatch};
use super::viewport::Viewport;

/// Screen area the configured count is tuned for (1366 × 768).
pub const BASELINE_AREA: f64 = 1366.0 * 768.0;

/// Never simulate fewer orbs than this.
pub const MIN_PARTICLES: usize = 8;

/// Fraction of orbs that pulse in opacity.
const TWINKLE_CHANCE: f64 = 0.06;

// Recycling margins, tuned by eye to avoid visible popping.
const EXIT_TOP_MARGIN: f64 = 50.0;
const EXIT_SIDE_MARGIN: f64 = 200.0;
const RESPAWN_SIDE_MARGIN: f64 = 50.0;

/// A single floating orb.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	/// Upward speed; subtracted from `y` each frame.
	pub vy: f64,
	pub radius: f64,
	pub swatch: Swatch,
	/// Baseline opacity.
	pub alpha: f64,
	/// Twinkle amplitude, 0 for steady orbs.
	pub twinkle: f64,
	pub phase: f64,
}

/// `min + u * (max - min)` for `u` in `[0, 1)`.
///
/// Unlike `gen_range` this tolerates collapsed or inverted ranges.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
	min + rng.gen_range(0.0..1.0) * (max - min)
}

/// Number of orbs for a surface of `area`, scaled sub-linearly from `base_count`.
pub fn derive_count(area: f64, baseline_area: f64, base_count: usize) -> usize {
	if !(baseline_area > 0.0) {
		return base_count.max(MIN_PARTICLES);
	}
	let factor = (area / baseline_area).max(0.0);
	let scaled = (base_count as f64 * factor.sqrt()).round();
	// NaN casts to 0
	(scaled as usize).max(MIN_PARTICLES)
}

/// Builds a fresh population sized for `viewport`.
pub fn populate<R: Rng + ?Sized>(viewport: &Viewport, config: &OrbConfig, rng: &mut R) -> Vec<Particle> {
	let count = derive_count(viewport.area(), BASELINE_AREA, config.count);
	generate(count, viewport, config, rng)
}

/// Samples `count` independent orbs.
pub fn generate<R: Rng + ?Sized>(
	count: usize,
	viewport: &Viewport,
	config: &OrbConfig,
	rng: &mut R,
) -> Vec<Particle> {
	(0..count).map(|_| Particle::spawn(viewport, config, rng)).collect()
}

fn rising_speed<R: Rng + ?Sized>(rng: &mut R, config: &OrbConfig) -> f64 {
	uniform(rng, 0.08, 0.8) * config.speed
}

fn drift_speed<R: Rng + ?Sized>(rng: &mut R, config: &OrbConfig) -> f64 {
	uniform(rng, -0.4, 0.4) * config.drift
}

impl Particle {
	/// A new orb scattered anywhere from half a screen above to half below the viewport.
	pub fn spawn<R: Rng + ?Sized>(viewport: &Viewport, config: &OrbConfig, rng: &mut R) -> Self {
		let (width, height) = (viewport.width, viewport.height);
		let radius = (config.base_size + uniform(rng, -config.size_variance, config.size_variance)).max(2.0);
		let x = uniform(rng, -radius, width + radius);
		let y = uniform(rng, -height * 0.5, height * 1.5);
		let vy = rising_speed(rng, config) * (0.6 + uniform(rng, 0.0, 1.0));
		let vx = drift_speed(rng, config);
		let swatch = config.palette.pick(rng);
		let alpha = uniform(rng, 0.02, 0.18);
		let twinkle = if rng.gen_bool(TWINKLE_CHANCE) {
			uniform(rng, 0.2, 0.7)
		} else {
			0.0
		};

		Self {
			x,
			y,
			vx,
			vy,
			radius,
			swatch,
			alpha,
			twinkle,
			phase: uniform(rng, 0.0, TAU),
		}
	}

	/// Opacity for the current twinkle phase.
	pub fn current_alpha(&self) -> f64 {
		if self.twinkle > 0.0 {
			self.alpha * (0.7 + 0.6 * self.phase.sin())
		} else {
			self.alpha
		}
	}

	/// Advances the twinkle phase by one jittered frame step. Steady orbs are untouched.
	pub fn advance_twinkle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
		if self.twinkle > 0.0 {
			self.phase += 0.016 * (0.6 + rng.gen_range(0.0..1.0) * 0.8);
		}
	}

	/// Where the orb is drawn given the frame's parallax offset.
	///
	/// Bigger orbs shift more, as if closer to the viewer.
	pub fn draw_position(&self, offset: (f64, f64), base_size: f64) -> (f64, f64) {
		let depth = self.radius / (base_size + 1.0);
		(self.x + offset.0 * depth, self.y + offset.1 * depth)
	}

	/// Radius of the unblurred core.
	pub fn core_radius(&self) -> f64 {
		(self.radius * 0.25).max(0.6)
	}

	/// One frame of motion: drift, rise and a slow position/time dependent sway.
	pub fn integrate(&mut self, now: f64) {
		self.x += self.vx;
		self.y -= self.vy;
		self.vx += ((self.x + now * 0.0002) * 0.002).sin() * 0.0005;
	}

	pub fn is_out_of_bounds(&self, viewport: &Viewport) -> bool {
		self.y + self.radius < -EXIT_TOP_MARGIN
			|| self.x < -EXIT_SIDE_MARGIN
			|| self.x > viewport.width + EXIT_SIDE_MARGIN
	}

	/// Sends the orb back below the bottom edge with fresh kinematics.
	///
	/// Radius, color, opacity and twinkle are kept.
	pub fn recycle<R: Rng + ?Sized>(&mut self, viewport: &Viewport, config: &OrbConfig, rng: &mut R) {
		let (width, height) = (viewport.width, viewport.height);
		self.x = uniform(rng, -RESPAWN_SIDE_MARGIN, width + RESPAWN_SIDE_MARGIN);
		self.y = height + uniform(rng, 10.0, height * 0.5);
		self.vy = rising_speed(rng, config);
		self.vx = drift_speed(rng, config);
	}
}
