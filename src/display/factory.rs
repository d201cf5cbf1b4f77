use crate::config::DisplayConfig;
use crate::display::flag::{self, ProtectionFlag};
use crate::display::signature::{self, SignatureError};
use crate::entities::item::ItemStack;
use crate::entities::shop::ShopView;
use thiserror::Error;

/// Copies of the flag written to each marker. Other plugins trim or rewrite
/// lore; one surviving line is enough to recognize the marker.
pub const GUARD_LORE_LINES: usize = 21;

#[derive(Debug, Error)]
pub enum GuardError {
    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error("flag encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct MarkerFactory {
    use_custom_name: bool,
}

impl MarkerFactory {
    pub fn new(config: &DisplayConfig) -> Self {
        Self {
            use_custom_name: config.use_custom_name,
        }
    }

    /// Single-unit copy of `source` named per configuration, with its lore
    /// replaced by [`GUARD_LORE_LINES`] copies of the shop's flag.
    pub fn create_guarded(
        &self,
        source: &ItemStack,
        shop: &impl ShopView,
    ) -> Result<ItemStack, GuardError> {
        let mut item = source.with_amount(1);
        let flag = self.build_flag(&item, shop)?;
        let name = if self.use_custom_name {
            Some(item.item_name())
        } else {
            None
        };
        item.set_display_name(name);
        let line = flag::encode(&flag)?;
        item.set_lore(vec![line; GUARD_LORE_LINES]);
        Ok(item)
    }

    pub fn build_flag(
        &self,
        item: &ItemStack,
        shop: &impl ShopView,
    ) -> Result<ProtectionFlag, SignatureError> {
        let signature = signature::signature(item)?;
        Ok(ProtectionFlag::new(shop.location_key(), signature))
    }

    /// Rewrites `item` into a guarded copy; the original amount is kept.
    pub fn guard_in_place(
        &self,
        item: &mut ItemStack,
        shop: &impl ShopView,
    ) -> Result<(), GuardError> {
        let amount = item.amount;
        let mut guarded = self.create_guarded(item, shop)?;
        guarded.amount = amount;
        *item = guarded;
        Ok(())
    }
}
