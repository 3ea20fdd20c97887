//! Asteroids for the terminal: a state-driven arcade core (ship, rocks,
//! scoring, lives) behind small rendering, audio and input capabilities, plus
//! a braille renderer and event pump to drive it from a TUI.

pub mod app;
pub mod audio;
pub mod config;
pub mod entities;
pub mod error;
pub mod event;
pub mod field;
pub mod geometry;
pub mod input;
pub mod lives;
pub mod particles;
pub mod render;
pub mod scores;
pub mod states;
pub mod ui;

pub use error::{GameError, GameResult};
