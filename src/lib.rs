//! Pixelpad: a fixed 36×36 pixel-art editor built on egui.
//!
//! The library holds everything except process startup, so the editing
//! model can be driven from tests without a window.

#[macro_use]
pub mod i18n;
#[macro_use]
pub mod logger;

pub mod app;
pub mod canvas;
pub mod cli;
pub mod components;
pub mod editor;
pub mod keybindings;
pub mod ops;
pub mod project;
pub mod settings;
