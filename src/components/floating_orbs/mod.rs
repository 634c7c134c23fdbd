//! Ambient floating-orb background component.
//!
//! Renders soft translucent orbs drifting upward on an HTML canvas with:
//! - Population sized to the viewport area, rebuilt after resizing settles
//! - Additive blur glow plus a crisp core per orb
//! - Subtle pointer parallax, stronger for larger orbs
//! - Occasional twinkling orbs
//! - A single frozen frame when the user prefers reduced motion
//!
//! # Example
//!
//! ```ignore
//! use floating_orbs::{FloatingOrbs, OrbConfig};
//!
//! view! { <FloatingOrbs config=OrbConfig::aurora() /> }
//! ```

mod component;
mod config;
mod particles;
mod render;
mod state;
mod types;
mod viewport;

pub use component::FloatingOrbs;
pub use config::{Color, OrbConfig, OrbPalette, Swatch};
pub use types::OrbSettings;
