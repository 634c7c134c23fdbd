//! Visual configuration for the orb field.
//!
//! Provides structured colors, swatch palettes and the named presets the
//! effect can start from.

use rand::Rng;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel
	pub r: u8,
	/// Green channel
	pub g: u8,
	/// Blue channel
	pub b: u8,
	/// Opacity, 0.0 to 1.0
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with explicit opacity.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color at opacity `a`.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// `rgba(r, g, b, a)` notation.
	pub fn to_css(self) -> String {
		format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}

	/// Parses a CSS color string.
	/// Supports hex (`#RGB`, `#RRGGBB`) and `rgb()`/`rgba()` functional notation.
	pub fn parse(color_str: &str) -> Option<Self> {
		let s = color_str.trim();
		if let Some(hex) = s.strip_prefix('#') {
			if !hex.is_ascii() {
				return None;
			}
			return match hex.len() {
				3 => {
					let digit = |i: usize| {
						u8::from_str_radix(&hex[i..i + 1], 16)
							.ok()
							.map(|v| v * 17)
					};
					Some(Self::rgb(digit(0)?, digit(1)?, digit(2)?))
				}
				6 => {
					let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
					Some(Self::rgb(pair(0)?, pair(2)?, pair(4)?))
				}
				_ => None,
			};
		}

		let body = s
			.strip_prefix("rgba(")
			.or_else(|| s.strip_prefix("rgb("))?
			.strip_suffix(')')?;
		let nums: Vec<&str> = body.split(',').map(str::trim).collect();
		if !(3..=4).contains(&nums.len()) {
			return None;
		}
		let r = nums[0].parse().ok()?;
		let g = nums[1].parse().ok()?;
		let b = nums[2].parse().ok()?;
		let a = match nums.get(3) {
			Some(a) => a.parse().ok()?,
			None => 1.0,
		};
		Some(Self::rgba(r, g, b, a))
	}
}

/// One entry of the orb palette.
///
/// Parsed colors get their alpha replaced per frame. Strings that could not be
/// parsed are kept verbatim and drawn at whatever opacity they carry.
#[derive(Clone, Debug, PartialEq)]
pub enum Swatch {
	/// A parsed color whose alpha follows the orb.
	Rgb(Color),
	/// An unrecognized CSS color, drawn verbatim.
	Css(String),
}

impl Swatch {
	/// Builds a swatch from a CSS color string, keeping it raw if it is not understood.
	pub fn from_css(color_str: &str) -> Self {
		match Color::parse(color_str) {
			Some(color) => Swatch::Rgb(color),
			None => Swatch::Css(color_str.to_string()),
		}
	}

	/// CSS fill for this swatch at the given opacity.
	pub fn fill(&self, alpha: f64) -> String {
		match self {
			Swatch::Rgb(color) => color.with_alpha(alpha).to_css(),
			Swatch::Css(raw) => raw.clone(),
		}
	}
}

impl Default for Swatch {
	fn default() -> Self {
		Swatch::Rgb(Color::rgb(255, 255, 255))
	}
}

/// Ordered set of swatches particles pick their color from.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbPalette {
	/// Swatches in configuration order.
	pub swatches: Vec<Swatch>,
}

impl OrbPalette {
	/// Pale white, blue, pink and green haze (default)
	pub fn mist() -> Self {
		Self {
			swatches: vec![
				Swatch::Rgb(Color::rgba(255, 255, 255, 0.07)), // White
				Swatch::Rgb(Color::rgba(173, 216, 230, 0.06)), // Light blue
				Swatch::Rgb(Color::rgba(255, 182, 193, 0.05)), // Light pink
				Swatch::Rgb(Color::rgba(144, 238, 144, 0.04)), // Light green
			],
		}
	}

	/// Cool teals and purples
	pub fn aurora() -> Self {
		Self {
			swatches: vec![
				Swatch::Rgb(Color::rgb(100, 145, 135)), // Eucalyptus
				Swatch::Rgb(Color::rgb(130, 120, 150)), // Wisteria
				Swatch::Rgb(Color::rgb(120, 130, 160)), // Periwinkle
				Swatch::Rgb(Color::rgb(105, 190, 185)), // Glacier
			],
		}
	}

	/// Warm embers
	pub fn ember() -> Self {
		Self {
			swatches: vec![
				Swatch::Rgb(Color::rgb(255, 170, 90)),  // Amber
				Swatch::Rgb(Color::rgb(240, 120, 80)),  // Coral
				Swatch::Rgb(Color::rgb(255, 210, 150)), // Candle
			],
		}
	}

	/// Palette from CSS color strings.
	pub fn from_css<S: AsRef<str>>(colors: &[S]) -> Self {
		Self {
			swatches: colors.iter().map(|c| Swatch::from_css(c.as_ref())).collect(),
		}
	}

	/// Uniform random pick. An empty palette yields plain white.
	pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Swatch {
		if self.swatches.is_empty() {
			return Swatch::default();
		}
		self.swatches[rng.gen_range(0..self.swatches.len())].clone()
	}
}

/// Complete effect configuration, fixed for the lifetime of a field.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbConfig {
	/// Preset the configuration started from.
	pub name: &'static str,
	/// Particle count at the reference screen area
	pub count: usize,
	/// Typical radius in CSS pixels
	pub base_size: f64,
	/// How far radii may stray from `base_size` either way
	pub size_variance: f64,
	/// Upward speed multiplier
	pub speed: f64,
	/// Horizontal drift multiplier
	pub drift: f64,
	/// Colors orbs pick from
	pub palette: OrbPalette,
	/// Glow blur radius in CSS pixels (higher = softer)
	pub blur: f64,
	/// How strongly orbs shift with the pointer (0 disables parallax)
	pub mouse_parallax: f64,
}

impl OrbConfig {
	/// Sparse, faint orbs drifting slowly upward (default)
	pub fn mist() -> Self {
		Self {
			name: "mist",
			count: 10,
			base_size: 18.0,
			size_variance: 28.0,
			speed: 0.2,
			drift: 0.5,
			palette: OrbPalette::mist(),
			blur: 20.0,
			mouse_parallax: 0.02,
		}
	}

	/// Denser field of small cool-toned orbs
	pub fn aurora() -> Self {
		Self {
			name: "aurora",
			count: 16,
			base_size: 12.0,
			size_variance: 18.0,
			speed: 0.25,
			drift: 0.4,
			palette: OrbPalette::aurora(),
			blur: 16.0,
			mouse_parallax: 0.03,
		}
	}

	/// Warm sparks rising a little faster
	pub fn ember() -> Self {
		Self {
			name: "ember",
			count: 14,
			base_size: 10.0,
			size_variance: 12.0,
			speed: 0.35,
			drift: 0.6,
			palette: OrbPalette::ember(),
			blur: 12.0,
			mouse_parallax: 0.015,
		}
	}

	/// Looks up a preset by name.
	pub fn preset(name: &str) -> Option<Self> {
		match name {
			"mist" => Some(Self::mist()),
			"aurora" => Some(Self::aurora()),
			"ember" => Some(Self::ember()),
			_ => None,
		}
	}
}

impl Default for OrbConfig {
	fn default() -> Self {
		Self::mist()
	}
}
