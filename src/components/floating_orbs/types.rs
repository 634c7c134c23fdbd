//! Settings accepted from the host page.

use log::warn;
use serde::Deserialize;

use super::config::{OrbConfig, OrbPalette};

/// Optional overrides layered onto a preset.
///
/// Keys use the page-facing camelCase names, e.g.
/// `{ "preset": "aurora", "baseSize": 12, "colors": ["#fff"] }`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrbSettings {
	/// Preset to start from ("mist", "aurora", "ember"). Defaults to "mist".
	pub preset: Option<String>,
	/// Orb count at the reference screen area.
	pub count: Option<usize>,
	/// Typical radius in CSS pixels.
	pub base_size: Option<f64>,
	/// Radius spread either side of `baseSize`.
	pub size_variance: Option<f64>,
	/// Upward speed multiplier.
	pub speed: Option<f64>,
	/// Horizontal drift multiplier.
	pub drift: Option<f64>,
	/// CSS color strings (hex, `rgb()` or `rgba()`).
	pub colors: Option<Vec<String>>,
	/// Glow blur radius in CSS pixels.
	pub blur: Option<f64>,
	/// Pointer parallax strength.
	pub mouse_parallax: Option<f64>,
}

impl OrbSettings {
	/// Parses settings from a JSON document.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	/// Applies the overrides to the selected preset.
	pub fn resolve(self) -> OrbConfig {
		let mut config = match self.preset.as_deref() {
			Some(name) => OrbConfig::preset(name).unwrap_or_else(|| {
				warn!("floating-orbs: unknown preset {:?}, using default", name);
				OrbConfig::default()
			}),
			None => OrbConfig::default(),
		};

		if let Some(count) = self.count {
			config.count = count;
		}
		if let Some(base_size) = self.base_size {
			config.base_size = base_size;
		}
		if let Some(size_variance) = self.size_variance {
			config.size_variance = size_variance;
		}
		if let Some(speed) = self.speed {
			config.speed = speed;
		}
		if let Some(drift) = self.drift {
			config.drift = drift;
		}
		// An empty list would leave nothing to pick from; keep the preset's colors.
		if let Some(colors) = self.colors.filter(|c| !c.is_empty()) {
			config.palette = OrbPalette::from_css(&colors);
		}
		if let Some(blur) = self.blur {
			config.blur = blur;
		}
		if let Some(mouse_parallax) = self.mouse_parallax {
			config.mouse_parallax = mouse_parallax;
		}
		config
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::floating_orbs::config::{Color, Swatch};

	#[test]
	fn test_empty_settings_resolve_to_default() {
		let config = OrbSettings::from_json("{}").unwrap().resolve();
		assert_eq!(config, OrbConfig::default());
	}

	#[test]
	fn test_overrides_apply_on_preset() {
		let json = r##"{
			"preset": "ember",
			"count": 30,
			"baseSize": 9.5,
			"mouseParallax": 0,
			"colors": ["#ff0000", "rgba(0, 0, 255, 0.2)"]
		}"##;
		let config = OrbSettings::from_json(json).unwrap().resolve();
		assert_eq!(config.name, "ember");
		assert_eq!(config.count, 30);
		assert_eq!(config.base_size, 9.5);
		assert_eq!(config.mouse_parallax, 0.0);
		assert_eq!(config.size_variance, OrbConfig::ember().size_variance);
		assert_eq!(
			config.palette.swatches,
			vec![
				Swatch::Rgb(Color::rgb(255, 0, 0)),
				Swatch::Rgb(Color::rgba(0, 0, 255, 0.2)),
			]
		);
	}

	#[test]
	fn test_unknown_preset_falls_back() {
		let config = OrbSettings::from_json(r#"{ "preset": "neon" }"#)
			.unwrap()
			.resolve();
		assert_eq!(config.name, "mist");
	}

	#[test]
	fn test_empty_colors_keep_preset_palette() {
		let config = OrbSettings::from_json(r#"{ "colors": [] }"#)
			.unwrap()
			.resolve();
		assert_eq!(config.palette, OrbConfig::mist().palette);
	}

	#[test]
	fn test_malformed_json_is_error() {
		assert!(OrbSettings::from_json("{ count: ").is_err());
	}
}
