//! Recognizing protection flags on arbitrary items.
//!
//! Two predicates with different strictness:
//! [`is_guard_marker`] accepts anything that looks like a display marker from
//! any shop, so foreign markers are left alone; [`belongs_to`] accepts only
//! genuine flags written for one particular shop.
//!
//! Amounts are never consulted, so a stack of 64 classifies like a single
//! item. Lore lines that fail to decode are skipped.

use crate::display::flag::{self, ProtectionFlag, FLAG_OPEN_DELIMITER};
use crate::display::signature;
use crate::entities::item::ItemStack;
use crate::entities::shop::ShopView;
use lru::LruCache;
use std::num::NonZeroUsize;

fn lore_flags(item: &ItemStack) -> impl Iterator<Item = ProtectionFlag> + '_ {
    item.lore()
        .unwrap_or_default()
        .iter()
        .filter_map(|line| flag::decode(line).ok())
}

pub fn is_guard_marker(item: Option<&ItemStack>) -> bool {
    let Some(item) = item else {
        return false;
    };
    lore_flags(item).any(|flag| flag.has_default_mark() || flag.has_payload())
}

pub fn belongs_to(item: &ItemStack, shop: &impl ShopView) -> bool {
    belongs_to_location(item, &shop.location_key())
}

pub fn belongs_to_location(item: &ItemStack, shop_location: &str) -> bool {
    lore_flags(item).any(|flag| flag.is_for_location(shop_location))
}

/// The unflagged item recorded in the first genuine flag that carries a
/// readable signature.
pub fn recover_original(item: &ItemStack) -> Option<ItemStack> {
    lore_flags(item)
        .filter(ProtectionFlag::has_default_mark)
        .filter_map(|flag| flag.item_stack_signature)
        .find_map(|sig| signature::restore(&sig).ok())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagCacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Bounded memo of decoded lore lines.
///
/// Markers repeat one flag on every line and a region holds many markers for
/// the same few shops, so world scans decode the same text over and over.
pub struct FlagCache {
    cache: LruCache<String, Option<ProtectionFlag>>,
    stats: FlagCacheStats,
}

impl FlagCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            stats: FlagCacheStats::default(),
        }
    }

    pub fn decode(&mut self, line: &str) -> Option<ProtectionFlag> {
        if !line.starts_with(FLAG_OPEN_DELIMITER) {
            return None;
        }
        if let Some(cached) = self.cache.get(line) {
            self.stats.hits += 1;
            return cached.clone();
        }
        self.stats.misses += 1;
        let decoded = flag::decode(line).ok();
        self.cache.put(line.to_string(), decoded.clone());
        decoded
    }

    pub fn belongs_to_location(&mut self, item: &ItemStack, shop_location: &str) -> bool {
        let Some(lore) = item.lore() else {
            return false;
        };
        lore.iter().any(|line| {
            self.decode(line)
                .is_some_and(|flag| flag.is_for_location(shop_location))
        })
    }

    pub fn stats(&self) -> &FlagCacheStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
