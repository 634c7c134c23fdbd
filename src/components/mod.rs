//! UI components.

pub mod floating_orbs;
