pub mod affix;
pub mod config;
pub mod events;
pub mod generator;
pub mod item;
pub mod legendary;
pub mod rarity;
pub mod requirements;
pub mod sockets;
pub mod types;
pub mod unique;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use events::{ChannelSink, ItemEvent, ItemEventSink, NullSink};
pub use generator::{ForgeError, Generator};
pub use item::{Affix, AffixValue, ItemData, ItemOptions, SocketData};
pub use types::*;
