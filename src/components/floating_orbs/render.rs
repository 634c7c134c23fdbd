//! Canvas rendering for the orb field.
//!
//! Each frame draws every orb twice inside one additive-blending section:
//! 1. A blurred disc at the orb's radius (the glow)
//! 2. A small crisp disc at the same spot (the core)
//!
//! Physics runs after drawing, in the same frame.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::OrbField;

/// A filled circle to put on the surface.
#[derive(Clone, Debug, PartialEq)]
pub struct Disc {
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	/// CSS fill style.
	pub fill: String,
	/// Gaussian blur radius in CSS pixels, if any.
	pub blur: Option<f64>,
	/// Opacity multiplier applied on top of the fill.
	pub opacity: f64,
}

/// The drawing operations the orb field needs from its backend.
pub trait OrbSurface {
	fn clear(&mut self, width: f64, height: f64);
	/// Starts a section where overlapping draws add up their light.
	fn begin_additive(&mut self);
	fn end_additive(&mut self);
	fn fill_disc(&mut self, disc: &Disc);
}

impl OrbSurface for CanvasRenderingContext2d {
	fn clear(&mut self, width: f64, height: f64) {
		self.clear_rect(0.0, 0.0, width, height);
	}

	fn begin_additive(&mut self) {
		self.save();
		let _ = self.set_global_composite_operation("lighter");
	}

	fn end_additive(&mut self) {
		self.restore();
	}

	fn fill_disc(&mut self, disc: &Disc) {
		self.begin_path();
		self.set_fill_style_str(&disc.fill);
		match disc.blur {
			Some(blur) => self.set_filter(&format!("blur({}px)", blur)),
			None => self.set_filter("none"),
		}
		self.set_global_alpha(disc.opacity);
		let _ = self.arc(disc.x, disc.y, disc.radius, 0.0, PI * 2.0);
		self.fill();
		self.set_global_alpha(1.0);
	}
}

/// Renders one animation frame and advances the simulation.
///
/// Fields that don't animate get the frozen frame and never move.
pub fn render<S: OrbSurface + ?Sized>(field: &mut OrbField, surface: &mut S, now: f64) {
	if !field.scheduler.animates() {
		draw(field, surface, false);
		return;
	}
	field.advance_twinkles();
	draw(field, surface, true);
	field.step(now);
}

/// Renders a frozen frame: no twinkle, no motion.
pub fn render_static<S: OrbSurface + ?Sized>(field: &OrbField, surface: &mut S) {
	draw(field, surface, false);
}

fn draw<S: OrbSurface + ?Sized>(field: &OrbField, surface: &mut S, twinkle: bool) {
	let viewport = &field.viewport;
	surface.clear(viewport.width, viewport.height);

	let offset = field.parallax_offset();
	let config = &field.config;

	surface.begin_additive();
	for p in &field.particles {
		let alpha = if twinkle { p.current_alpha() } else { p.alpha };
		let (x, y) = p.draw_position(offset, config.base_size);
		let fill = p.swatch.fill(alpha);

		surface.fill_disc(&Disc {
			x,
			y,
			radius: p.radius,
			fill: fill.clone(),
			blur: Some(config.blur),
			opacity: 1.0,
		});

		// Crisp core keeps the orb anchored under the heavy blur
		surface.fill_disc(&Disc {
			x,
			y,
			radius: p.core_radius(),
			fill,
			blur: None,
			opacity: (alpha * 6.0).min(1.0),
		});
	}
	surface.end_additive();
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::floating_orbs::config::OrbConfig;
	use crate::components::floating_orbs::viewport::Viewport;

	#[derive(Debug, PartialEq)]
	enum Op {
		Clear(f64, f64),
		BeginAdditive,
		EndAdditive,
		Fill(Disc),
	}

	#[derive(Default)]
	struct Recorder {
		ops: Vec<Op>,
	}

	impl OrbSurface for Recorder {
		fn clear(&mut self, width: f64, height: f64) {
			self.ops.push(Op::Clear(width, height));
		}

		fn begin_additive(&mut self) {
			self.ops.push(Op::BeginAdditive);
		}

		fn end_additive(&mut self) {
			self.ops.push(Op::EndAdditive);
		}

		fn fill_disc(&mut self, disc: &Disc) {
			self.ops.push(Op::Fill(disc.clone()));
		}
	}

	fn field(reduced_motion: bool) -> OrbField {
		OrbField::with_seed(
			OrbConfig::default(),
			Viewport::new(1366.0, 768.0, 1.0),
			reduced_motion,
			2024,
		)
	}

	#[test]
	fn test_frame_structure() {
		let mut f = field(false);
		let mut surface = Recorder::default();
		render(&mut f, &mut surface, 16.0);

		let n = f.particles.len();
		assert_eq!(surface.ops.len(), 2 * n + 3);
		assert_eq!(surface.ops[0], Op::Clear(1366.0, 768.0));
		assert_eq!(surface.ops[1], Op::BeginAdditive);
		assert_eq!(surface.ops[2 * n + 2], Op::EndAdditive);

		for pair in surface.ops[2..2 + 2 * n].chunks(2) {
			let (Op::Fill(glow), Op::Fill(core)) = (&pair[0], &pair[1]) else {
				panic!("expected glow and core fills");
			};
			assert_eq!(glow.blur, Some(20.0));
			assert_eq!(glow.opacity, 1.0);
			assert_eq!(core.blur, None);
			assert_eq!((glow.x, glow.y), (core.x, core.y));
			assert_eq!(glow.fill, core.fill);
			assert_eq!(core.radius, (glow.radius * 0.25).max(0.6));
			assert!(core.opacity > 0.0 && core.opacity <= 1.0);
		}
	}

	#[test]
	fn test_centered_pointer_draws_at_position() {
		let mut f = field(true);
		f.set_pointer(683.0, 384.0);
		let mut surface = Recorder::default();
		render_static(&f, &mut surface);

		for (i, p) in f.particles.iter().enumerate() {
			let Op::Fill(glow) = &surface.ops[2 + 2 * i] else {
				panic!("expected glow fill");
			};
			assert_eq!((glow.x, glow.y), (p.x, p.y));
			assert_eq!(glow.fill, p.swatch.fill(p.alpha));
		}
	}

	#[test]
	fn test_animated_frame_moves_orbs() {
		let mut f = field(false);
		let before: Vec<(f64, f64)> = f.particles.iter().map(|p| (p.x, p.y)).collect();
		render(&mut f, &mut Recorder::default(), 0.0);
		let moved = f
			.particles
			.iter()
			.zip(&before)
			.filter(|(p, b)| (p.x, p.y) != **b)
			.count();
		assert_eq!(moved, f.particles.len());
	}

	#[test]
	fn test_fills_follow_current_alpha() {
		let mut f = field(false);
		let mut surface = Recorder::default();
		render(&mut f, &mut surface, 16.0);

		for (i, p) in f.particles.iter().enumerate() {
			let (Op::Fill(glow), Op::Fill(core)) = (&surface.ops[2 + 2 * i], &surface.ops[3 + 2 * i]) else {
				panic!("expected glow and core fills");
			};
			let alpha = p.current_alpha();
			assert_eq!(glow.fill, p.swatch.fill(alpha));
			assert_eq!(core.opacity, (alpha * 6.0).min(1.0));
		}
	}

	#[test]
	fn test_twinkling_orb_fill() {
		let mut f = field(false);
		{
			let p = &mut f.particles[0];
			p.alpha = 0.1;
			p.twinkle = 0.5;
			p.phase = 1.0;
		}
		let mut surface = Recorder::default();
		render(&mut f, &mut surface, 0.0);

		let p = &f.particles[0];
		assert!(p.phase > 1.0);
		let expected = 0.1 * (0.7 + 0.6 * p.phase.sin());
		let (Op::Fill(glow), Op::Fill(core)) = (&surface.ops[2], &surface.ops[3]) else {
			panic!("expected glow and core fills");
		};
		assert_eq!(glow.fill, p.swatch.fill(expected));
		assert_ne!(glow.fill, p.swatch.fill(0.1));
		assert_eq!(core.opacity, (expected * 6.0).min(1.0));
	}

	#[test]
	fn test_off_center_pointer_shifts_discs() {
		let mut f = field(false);
		f.set_pointer(0.0, 0.0);
		let offset = f.parallax_offset();
		assert!(offset.0 < 0.0 && offset.1 < 0.0);
		let expected: Vec<(f64, f64)> = f
			.particles
			.iter()
			.map(|p| p.draw_position(offset, f.config.base_size))
			.collect();

		let mut surface = Recorder::default();
		render(&mut f, &mut surface, 0.0);

		for (i, pos) in expected.iter().enumerate() {
			let (Op::Fill(glow), Op::Fill(core)) = (&surface.ops[2 + 2 * i], &surface.ops[3 + 2 * i]) else {
				panic!("expected glow and core fills");
			};
			assert_eq!((glow.x, glow.y), *pos);
			assert_eq!((core.x, core.y), *pos);
		}
	}

	#[test]
	fn test_render_without_motion_keeps_orbs_still() {
		let mut f = field(true);
		for p in &mut f.particles {
			p.twinkle = 0.5;
		}
		let snapshot = f.particles.clone();
		for frame in 0..50 {
			render(&mut f, &mut Recorder::default(), frame as f64 * 16.0);
		}
		assert_eq!(f.particles, snapshot);
	}

	#[test]
	fn test_reduced_motion_is_frozen() {
		let mut f = field(true);
		let snapshot = f.particles.clone();
		render_static(&f, &mut Recorder::default());
		for _ in 0..100 {
			if f.scheduler.request() || f.scheduler.resume() {
				render(&mut f, &mut Recorder::default(), 0.0);
			}
		}
		assert_eq!(f.particles, snapshot);
	}
}
