use crate::types::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Complete static data set loaded from TOML files.
///
/// Loaded once and then shared read-only; nothing in the generation path
/// mutates it.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub base_items: BaseItemDatabase,
    pub affixes: AffixDatabase,
    pub uniques: UniqueItemDatabase,
    pub legendary_effects: LegendaryEffectPools,
    pub requirements: RequirementTable,
}

impl Config {
    /// Load configuration from a directory containing subdirectories for each table
    /// Expected structure:
    ///   config/
    ///     base_items/         - .toml files containing [[base_items]] arrays
    ///     affixes/            - .toml files containing [[affixes]] arrays
    ///     uniques/            - .toml files each containing a [unique] table
    ///     legendary_effects/  - .toml files containing [[pools]] arrays
    ///     requirements/       - .toml files containing [[requirements]] arrays
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let base_items: Vec<BaseItemConfig> =
            Self::load_entries(&dir.join("base_items"), |w: BaseItemsWrapper| w.base_items)?;
        let affixes: Vec<AffixTemplate> =
            Self::load_entries(&dir.join("affixes"), |w: AffixesWrapper| w.affixes)?;
        let uniques: Vec<UniqueItemTemplate> =
            Self::load_entries(&dir.join("uniques"), |w: UniqueFileConfig| vec![w.unique])?;
        let pools: Vec<LegendaryEffectPool> =
            Self::load_entries(&dir.join("legendary_effects"), |w: PoolsWrapper| w.pools)?;
        let requirements: Vec<AttributeSpread> =
            Self::load_entries(&dir.join("requirements"), |w: RequirementsWrapper| {
                w.requirements
            })?;

        let config = Config {
            base_items: BaseItemDatabase::from_entries(base_items),
            affixes: AffixDatabase::from_templates(affixes),
            uniques: UniqueItemDatabase::from_templates(uniques),
            legendary_effects: LegendaryEffectPools::from_pools(pools),
            requirements: RequirementTable::from_entries(requirements),
        };

        log::info!(
            "Loaded config from {}: {} base items, {} affix slots, {} uniques",
            dir.display(),
            config.base_items.len(),
            config.affixes.len(),
            config.uniques.len()
        );

        Ok(config)
    }

    /// Read every .toml file in a directory (sorted by path) and flatten its entries.
    /// A missing directory is an empty table.
    fn load_entries<W, T>(dir: &Path, extract: impl Fn(W) -> Vec<T>) -> Result<Vec<T>, ConfigError>
    where
        W: DeserializeOwned,
    {
        let mut result = Vec::new();

        if !dir.exists() {
            return Ok(result);
        }

        let mut paths = Vec::new();
        for entry in Self::read_dir_with_context(dir)? {
            let entry = entry.map_err(|e| ConfigError::Io {
                source: e,
                path: dir.to_path_buf(),
            })?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "toml") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            let content = Self::read_file_with_context(&path)?;
            let wrapper: W = Self::parse_toml_with_context(&content, &path)?;
            result.extend(extract(wrapper));
        }

        Ok(result)
    }

    // Helper functions for error context

    fn read_dir_with_context(dir: &Path) -> Result<std::fs::ReadDir, ConfigError> {
        std::fs::read_dir(dir).map_err(|e| ConfigError::Io {
            source: e,
            path: dir.to_path_buf(),
        })
    }

    fn read_file_with_context(path: &Path) -> Result<String, ConfigError> {
        std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            source: e,
            path: path.to_path_buf(),
        })
    }

    fn parse_toml_with_context<T: DeserializeOwned>(content: &str, path: &Path) -> Result<T, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            source: e,
            path: path.to_path_buf(),
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error in '{}': {source}", .path.display())]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("Parse error in '{}': {source}", .path.display())]
    Parse {
        source: toml::de::Error,
        path: PathBuf,
    },
}

impl ConfigError {
    /// Get the file path associated with this error
    pub fn file_path(&self) -> &Path {
        match self {
            ConfigError::Io { path, .. } => path,
            ConfigError::Parse { path, .. } => path,
        }
    }
}

// Wrapper types for TOML parsing

#[derive(Deserialize)]
struct BaseItemsWrapper {
    #[serde(default)]
    base_items: Vec<BaseItemConfig>,
}

#[derive(Deserialize)]
struct AffixesWrapper {
    #[serde(default)]
    affixes: Vec<AffixTemplate>,
}

#[derive(Deserialize)]
struct PoolsWrapper {
    #[serde(default)]
    pools: Vec<LegendaryEffectPool>,
}

#[derive(Deserialize)]
struct RequirementsWrapper {
    #[serde(default)]
    requirements: Vec<AttributeSpread>,
}

/// Each unique lives in its own file
#[derive(Deserialize)]
struct UniqueFileConfig {
    unique: UniqueItemTemplate,
}

/// A value as written in a data table: a constant, an inclusive `[min, max]`
/// range, or (uniques only) a descriptive effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueSpec {
    Constant(i32),
    Range([i32; 2]),
    Effect(String),
}

/// Base item template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseItemConfig {
    pub id: String,
    pub name: String,
    pub item_type: ItemType,
    #[serde(default)]
    pub sub_type: Option<String>,
    #[serde(default = "default_footprint")]
    pub width: u32,
    #[serde(default = "default_footprint")]
    pub height: u32,
    #[serde(default)]
    pub min_level: u32,
    #[serde(default = "default_max_level")]
    pub max_level: u32,
    /// Physical damage `[min, max]` for weapons
    #[serde(default)]
    pub damage: Option<[i32; 2]>,
    #[serde(default)]
    pub armor: Option<i32>,
    #[serde(default)]
    pub evasion: Option<i32>,
    #[serde(default)]
    pub energy_shield: Option<i32>,
    #[serde(default)]
    pub attack_speed: f32,
    #[serde(default)]
    pub critical_chance: f32,
    #[serde(default)]
    pub weight: f32,
    #[serde(default)]
    pub stackable: bool,
}

impl BaseItemConfig {
    pub fn contains_level(&self, item_level: u32) -> bool {
        self.min_level <= item_level && item_level <= self.max_level
    }

    pub fn footprint(&self) -> u32 {
        self.width.saturating_mul(self.height)
    }
}

fn default_footprint() -> u32 {
    1
}

fn default_max_level() -> u32 {
    100
}

/// Base item templates grouped by item type, in load order
#[derive(Debug, Clone, Default)]
pub struct BaseItemDatabase {
    by_type: HashMap<ItemType, Vec<BaseItemConfig>>,
}

impl BaseItemDatabase {
    pub fn from_entries(entries: impl IntoIterator<Item = BaseItemConfig>) -> Self {
        let mut by_type: HashMap<ItemType, Vec<BaseItemConfig>> = HashMap::new();
        for entry in entries {
            by_type.entry(entry.item_type).or_default().push(entry);
        }
        BaseItemDatabase { by_type }
    }

    pub fn get(&self, item_type: ItemType) -> &[BaseItemConfig] {
        self.by_type.get(&item_type).map_or(&[], |v| v.as_slice())
    }

    /// Find a base item by ID across all types
    pub fn find(&self, id: &str) -> Option<&BaseItemConfig> {
        self.by_type.values().flatten().find(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.by_type.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Affix template with ordered tiers (tier 1 first)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffixTemplate {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub affix_type: AffixType,
    pub stat: String,
    pub item_types: Vec<ItemType>,
    #[serde(default)]
    pub min_level: u32,
    pub tiers: Vec<AffixTierConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AffixTierConfig {
    pub values: BTreeMap<String, ValueSpec>,
}

/// Affix templates indexed by (slot kind, item type)
#[derive(Debug, Clone, Default)]
pub struct AffixDatabase {
    by_slot: HashMap<(AffixType, ItemType), Vec<AffixTemplate>>,
}

impl AffixDatabase {
    pub fn from_templates(templates: impl IntoIterator<Item = AffixTemplate>) -> Self {
        let mut by_slot: HashMap<(AffixType, ItemType), Vec<AffixTemplate>> = HashMap::new();
        for template in templates {
            for &item_type in &template.item_types {
                by_slot
                    .entry((template.affix_type, item_type))
                    .or_default()
                    .push(template.clone());
            }
        }
        AffixDatabase { by_slot }
    }

    pub fn get(&self, affix_type: AffixType, item_type: ItemType) -> &[AffixTemplate] {
        self.by_slot
            .get(&(affix_type, item_type))
            .map_or(&[], |v| v.as_slice())
    }

    /// Number of populated (slot kind, item type) pairs
    pub fn len(&self) -> usize {
        self.by_slot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_slot.is_empty()
    }
}

/// Unique item template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniqueItemTemplate {
    pub name: String,
    pub item_type: ItemType,
    #[serde(default)]
    pub sub_type: Option<String>,
    #[serde(default = "default_footprint")]
    pub width: u32,
    #[serde(default = "default_footprint")]
    pub height: u32,
    #[serde(default = "default_unique_level")]
    pub item_level: u32,
    /// Base item whose stats the unique inherits
    #[serde(default)]
    pub base_item: Option<String>,
    #[serde(default)]
    pub flavor_text: Option<String>,
    #[serde(default)]
    pub requirements: Requirements,
    pub fixed_affixes: Vec<UniqueAffixConfig>,
}

fn default_unique_level() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniqueAffixConfig {
    #[serde(rename = "type", default = "default_unique_affix_type")]
    pub affix_type: AffixType,
    pub stat: String,
    pub values: BTreeMap<String, ValueSpec>,
}

fn default_unique_affix_type() -> AffixType {
    AffixType::Prefix
}

/// Unique templates keyed by lowercase name
#[derive(Debug, Clone, Default)]
pub struct UniqueItemDatabase {
    by_name: HashMap<String, UniqueItemTemplate>,
}

impl UniqueItemDatabase {
    pub fn from_templates(templates: impl IntoIterator<Item = UniqueItemTemplate>) -> Self {
        let by_name = templates
            .into_iter()
            .map(|t| (t.name.to_lowercase(), t))
            .collect();
        UniqueItemDatabase { by_name }
    }

    /// Case-insensitive lookup. Returns the lowercase key alongside the template.
    pub fn get(&self, name: &str) -> Option<(&str, &UniqueItemTemplate)> {
        self.by_name
            .get_key_value(&name.to_lowercase())
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Unique keys of the given item type, sorted for deterministic selection
    pub fn keys_of_type(&self, item_type: ItemType) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .by_name
            .iter()
            .filter(|(_, t)| t.item_type == item_type)
            .map(|(k, _)| k.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegendaryEffectPool {
    pub item_type: ItemType,
    pub effects: Vec<String>,
}

/// Flavour effects that legendary items roll from, per item type
#[derive(Debug, Clone, Default)]
pub struct LegendaryEffectPools {
    by_type: HashMap<ItemType, Vec<String>>,
}

impl LegendaryEffectPools {
    pub fn from_pools(pools: impl IntoIterator<Item = LegendaryEffectPool>) -> Self {
        let mut by_type: HashMap<ItemType, Vec<String>> = HashMap::new();
        for pool in pools {
            by_type.entry(pool.item_type).or_default().extend(pool.effects);
        }
        LegendaryEffectPools { by_type }
    }

    pub fn get(&self, item_type: ItemType) -> &[String] {
        self.by_type.get(&item_type).map_or(&[], |v| v.as_slice())
    }
}

/// Base attribute requirements for one item subtype
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeSpread {
    pub sub_type: String,
    #[serde(default)]
    pub strength: u32,
    #[serde(default)]
    pub dexterity: u32,
    #[serde(default)]
    pub intelligence: u32,
}

/// Per-subtype base attribute table
#[derive(Debug, Clone, Default)]
pub struct RequirementTable {
    by_sub_type: HashMap<String, AttributeSpread>,
}

impl RequirementTable {
    pub fn from_entries(entries: impl IntoIterator<Item = AttributeSpread>) -> Self {
        let by_sub_type = entries
            .into_iter()
            .map(|e| (e.sub_type.to_lowercase(), e))
            .collect();
        RequirementTable { by_sub_type }
    }

    pub fn get(&self, sub_type: &str) -> Option<&AttributeSpread> {
        self.by_sub_type.get(&sub_type.to_lowercase())
    }
}
