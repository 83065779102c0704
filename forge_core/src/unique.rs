use crate::affix::resolve_values;
use crate::generator::{ForgeError, Generator};
use crate::item::{Affix, ItemData, ItemOptions};
use crate::sockets::{generate_sockets, SocketOptions};
use crate::types::*;
use rand::Rng;

/// Build a unique from its template. The template's fixed affixes are copied
/// in order at tier 1; ranged values are rolled within their range, but no
/// affix is ever added or chosen at random.
pub fn create_unique_item(
    generator: &Generator,
    name: &str,
    rng: &mut impl Rng,
) -> Result<ItemData, ForgeError> {
    let config = generator.config();
    let (key, template) = config
        .uniques
        .get(name)
        .ok_or_else(|| ForgeError::UniqueNotFound(name.to_string()))?;

    let base = template.base_item.as_deref().and_then(|id| {
        let found = config.base_items.find(id);
        if found.is_none() {
            log::warn!("Unique '{}' names missing base item '{}'", template.name, id);
        }
        found
    });

    let options = match base {
        Some(base) => Generator::options_from_base(base, template.item_level),
        None => ItemOptions::default(),
    };

    let options = ItemOptions {
        name: Some(template.name.clone()),
        base_name: options.base_name.or_else(|| Some(template.name.clone())),
        item_type: template.item_type,
        sub_type: template.sub_type.clone().or(options.sub_type),
        rarity: Rarity::Unique,
        width: template.width,
        height: template.height,
        item_level: template.item_level,
        requirements: Some(template.requirements),
        identified: true,
        unique_id: Some(key.to_string()),
        flavor_text: template.flavor_text.clone(),
        ..options
    };

    let mut item = generator.assemble(options, rng);

    for fixed in &template.fixed_affixes {
        item.affixes.push(Affix {
            affix_type: fixed.affix_type,
            name: template.name.clone(),
            stat: fixed.stat.clone(),
            tier: 1,
            values: resolve_values(&fixed.values, rng),
            legendary: false,
        });
    }

    if item.item_type.is_socketable() {
        item.sockets = Some(generate_sockets(&item, &SocketOptions::default(), rng));
    }

    Ok(item)
}
