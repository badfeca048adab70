//! Playback session engine.
//!
//! A [`Player`] owns one session thread. Commands from any surface and signals
//! from the decode backend are funnelled through a single channel into a
//! [`PlaybackSession`], which drives the [`Playlist`] cursor and the live decode
//! handle, then publishes a [`PlaybackState`] snapshot through the
//! [`StateBroadcaster`]. While playing, a [`ProgressTicker`] posts position ticks
//! onto the same channel.
//!
//! Every decode handle carries a generation number. Signals and ticks tagged
//! with a generation other than the live handle's are dropped, which is how a
//! superseded load can never act on the session.

mod backend;
mod broadcast;
mod messages;
mod player;
mod playlist;
mod session;
mod state;
mod ticker;

pub use backend::{Backend, DecodeHandle};
pub use broadcast::{SUBSCRIBER_BACKLOG, StateBroadcaster, SubscriberId, Subscription};
pub use messages::{BackendSignal, BackendSignals, Command, Generation};
pub use player::Player;
pub use playlist::Playlist;
pub use session::PlaybackSession;
pub use state::{PlaybackState, SessionStatus};
pub use ticker::{ProgressTicker, TICK_INTERVAL};

pub(crate) use messages::SessionMsg;
