//! Track values and the collaborators that produce them.
//!
//! `scan` turns a directory into `Track`s, `TrackStore` keeps a library of them
//! keyed by id, and the `Catalog` trait is the search seam a remote catalog would
//! implement. Everything here hands out plain `Track` values that can go straight
//! into a playback `Load` command.

mod display;
mod model;
mod scan;
mod store;

pub use display::{display_from_fields, format_duration};
pub use model::{Track, TrackId};
pub(crate) use model::is_remote_locator;
pub use scan::scan;
pub use store::{Catalog, TrackStore};

#[cfg(test)]
mod tests;
