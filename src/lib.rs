//! `segue`: a single-session audio playback engine.
//!
//! [`playback`] holds the engine itself; [`audio`] is the `rodio` backend it
//! plays through; [`library`] produces the tracks it plays.

pub mod audio;
pub mod config;
pub mod error;
pub mod library;
pub mod logging;
pub mod playback;
