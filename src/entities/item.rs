use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Item type identifier in `UPPER_SNAKE` form, e.g. `DIAMOND_SWORD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Material(pub String);

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Material(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `DIAMOND_SWORD` -> `Diamond Sword`.
    pub fn readable_name(&self) -> String {
        self.0
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let lower = word.to_ascii_lowercase();
                let mut chars = lower.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lore: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub enchantments: BTreeMap<String, u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub material: Material,
    pub amount: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ItemMeta>,
}

impl ItemStack {
    pub fn new(material: impl Into<String>, amount: u16) -> Self {
        Self {
            material: Material::new(material),
            amount,
            meta: None,
        }
    }

    /// Copy of this stack with `amount` replaced.
    pub fn with_amount(&self, amount: u16) -> Self {
        let mut item = self.clone();
        item.amount = amount;
        item
    }

    pub fn has_meta(&self) -> bool {
        self.meta.is_some()
    }

    pub fn meta_mut(&mut self) -> &mut ItemMeta {
        self.meta.get_or_insert_with(ItemMeta::default)
    }

    pub fn lore(&self) -> Option<&[String]> {
        self.meta.as_ref()?.lore.as_deref()
    }

    pub fn has_lore(&self) -> bool {
        self.lore().is_some()
    }

    pub fn set_lore(&mut self, lore: Vec<String>) {
        self.meta_mut().lore = Some(lore);
    }

    pub fn display_name(&self) -> Option<&str> {
        self.meta.as_ref()?.display_name.as_deref()
    }

    pub fn has_display_name(&self) -> bool {
        self.display_name().is_some()
    }

    pub fn set_display_name(&mut self, name: Option<String>) {
        self.meta_mut().display_name = name;
    }

    /// Custom name if set, otherwise the material's readable name.
    pub fn item_name(&self) -> String {
        match self.display_name() {
            Some(name) => name.to_string(),
            None => self.material.readable_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readable_name_title_cases_words() {
        assert_eq!(Material::new("DIAMOND").readable_name(), "Diamond");
        assert_eq!(
            Material::new("DIAMOND_SWORD").readable_name(),
            "Diamond Sword"
        );
        assert_eq!(Material::new("__ODD__NAME").readable_name(), "Odd Name");
    }

    #[test]
    fn item_without_meta_has_no_lore() {
        let item = ItemStack::new("STONE", 64);
        assert!(!item.has_meta());
        assert!(!item.has_lore());
        assert_eq!(item.lore(), None);
        assert_eq!(item.item_name(), "Stone");
    }

    #[test]
    fn set_lore_creates_meta() {
        let mut item = ItemStack::new("STONE", 1);
        item.set_lore(vec!["line".to_string()]);
        assert!(item.has_meta());
        assert_eq!(item.lore(), Some(&["line".to_string()][..]));
    }

    #[test]
    fn custom_name_wins_over_material() {
        let mut item = ItemStack::new("DIAMOND", 3);
        item.set_display_name(Some("Shiny".to_string()));
        assert_eq!(item.item_name(), "Shiny");
        item.set_display_name(None);
        assert!(!item.has_display_name());
        assert_eq!(item.item_name(), "Diamond");
    }

    #[test]
    fn with_amount_keeps_meta() {
        let mut item = ItemStack::new("DIAMOND", 3);
        item.set_display_name(Some("Shiny".to_string()));
        let single = item.with_amount(1);
        assert_eq!(single.amount, 1);
        assert_eq!(single.display_name(), Some("Shiny"));
        assert_eq!(item.amount, 3);
    }
}
