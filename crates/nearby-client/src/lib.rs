pub mod chat;
pub mod error;
pub mod feed;
pub mod gateway;

pub use chat::{ChatPoller, DEFAULT_POLL_INTERVAL};
pub use error::GatewayError;
pub use feed::SequencedSlot;
pub use gateway::{Gateway, NewListing};
