//! Simulation core for a pointer-aimed arcade shooter.
//!
//! Everything in here is terminal-agnostic except `display`, which the
//! binary uses to draw a `Game` with crossterm.

pub mod assets;
pub mod collision;
pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod error;
pub mod events;
pub mod hud;
pub mod managers;
pub mod player;
pub mod timer;
pub mod weighted;
