use crate::item::ItemData;
use std::sync::mpsc::{self, Receiver, Sender};

/// Receives notifications about generated items.
///
/// Implementations must not block; generation calls this inline and ignores
/// whatever happens downstream.
pub trait ItemEventSink: Send + Sync {
    fn item_created(&self, item: &ItemData);
}

/// Discards every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ItemEventSink for NullSink {
    fn item_created(&self, _item: &ItemData) {}
}

#[derive(Debug, Clone)]
pub enum ItemEvent {
    Created(Box<ItemData>),
}

/// Forwards notifications over an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<ItemEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, Receiver<ItemEvent>) {
        let (sender, receiver) = mpsc::channel();
        (ChannelSink { sender }, receiver)
    }
}

impl ItemEventSink for ChannelSink {
    fn item_created(&self, item: &ItemData) {
        if self
            .sender
            .send(ItemEvent::Created(Box::new(item.clone())))
            .is_err()
        {
            log::trace!("Item event receiver dropped, discarding {}", item.id);
        }
    }
}
