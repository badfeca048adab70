//! The `rodio` decode/render backend.

mod backend;
mod sink;

pub use backend::{RodioBackend, RodioHandle};
