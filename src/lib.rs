//! floating-orbs: Ambient floating-orb canvas background.
//!
//! This crate provides a WASM-based page background that renders soft glowing
//! orbs drifting upward, with pointer parallax, occasional twinkle and a static
//! fallback for users who prefer reduced motion.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::floating_orbs::{FloatingOrbs, OrbConfig, OrbSettings};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("floating-orbs: logging initialized");
}

/// Load orb settings from a script element with id="orb-config".
/// Expected format: JSON such as { "preset": "aurora", "count": 12 }
fn load_orb_config() -> Option<OrbConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("orb-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match OrbSettings::from_json(&json_text) {
		Ok(settings) => {
			let config = settings.resolve();
			info!(
				"floating-orbs: loaded settings, preset {:?}, base count {}",
				config.name, config.count
			);
			Some(config)
		}
		Err(e) => {
			warn!("floating-orbs: failed to parse orb settings: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads orb settings from the DOM and mounts the background canvas.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_orb_config().unwrap_or_default();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Floating Orbs" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<FloatingOrbs config=config />
	}
}
