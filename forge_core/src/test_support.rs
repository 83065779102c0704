use crate::config::Config;
use crate::events::ItemEventSink;
use crate::generator::Generator;
use crate::item::{ItemData, ItemOptions};
use crate::types::*;
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

/// The data tables shipped at the workspace root
pub fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("config")
}

pub fn fixture_config() -> Config {
    init_logging();
    Config::load_from_dir(&fixture_dir()).expect("fixture config should load")
}

pub fn fixture_generator() -> Generator {
    Generator::new(fixture_config())
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn blank_item(item_type: ItemType, width: u32, height: u32) -> ItemData {
    ItemOptions {
        item_type,
        width,
        height,
        ..ItemOptions::default()
    }
    .into_item(Uuid::nil(), Requirements::default())
}

/// Keeps every announced item
#[derive(Default)]
pub struct RecordingSink {
    pub items: Mutex<Vec<ItemData>>,
}

impl RecordingSink {
    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }
}

impl ItemEventSink for RecordingSink {
    fn item_created(&self, item: &ItemData) {
        if let Ok(mut items) = self.items.lock() {
            items.push(item.clone());
        }
    }
}
