use crate::entities::item::ItemStack;
use base64::engine::general_purpose::STANDARD as BASE64_ENGINE;
use base64::Engine as _;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("item serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("signature is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("signature is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Single-line fingerprint of an item: base64 over its YAML form.
///
/// The YAML document is what a host would write to disk for the item, so a
/// signature can be turned back into the original stack.
pub fn signature(item: &ItemStack) -> Result<String, SignatureError> {
    let yaml = serde_yaml::to_string(item)?;
    Ok(BASE64_ENGINE.encode(yaml.as_bytes()))
}

pub fn restore(signature: &str) -> Result<ItemStack, SignatureError> {
    let bytes = BASE64_ENGINE.decode(signature.trim())?;
    let yaml = String::from_utf8(bytes)?;
    Ok(serde_yaml::from_str(&yaml)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_single_line_and_restorable() {
        let mut item = ItemStack::new("DIAMOND_SWORD", 1);
        item.set_display_name(Some("Edge".to_string()));
        item.set_lore(vec!["first".to_string(), "second: line".to_string()]);
        item.meta_mut().enchantments.insert("SHARPNESS".to_string(), 5);

        let sig = signature(&item).expect("signature");
        assert!(!sig.contains('\n'));
        assert_eq!(restore(&sig).expect("restore"), item);
    }

    #[test]
    fn signature_is_deterministic() {
        let item = ItemStack::new("DIAMOND", 1);
        assert_eq!(
            signature(&item).expect("signature"),
            signature(&item.clone()).expect("signature")
        );
        assert_ne!(
            signature(&item).expect("signature"),
            signature(&ItemStack::new("EMERALD", 1)).expect("signature")
        );
    }

    #[test]
    fn restore_rejects_garbage() {
        assert!(matches!(restore("***"), Err(SignatureError::Base64(_))));
        let not_an_item = BASE64_ENGINE.encode("- just\n- a list\n");
        assert!(matches!(restore(&not_an_item), Err(SignatureError::Yaml(_))));
    }
}
