//! Protection flag payload and its lore-line codec.
//!
//! A flag is a compact JSON object written verbatim into an item's lore.
//! Markers placed by older builds must keep decoding, so the field names are
//! frozen and unknown fields are ignored.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Constant mark carried by every genuine flag.
pub const DEFAULT_MARK: &str = "QuickShop DisplayItem";

/// First character of every encoded flag.
pub const FLAG_OPEN_DELIMITER: char = '{';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectionFlag {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub mark: String,
    #[serde(
        rename = "shopLocation",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub shop_location: Option<String>,
    #[serde(
        rename = "itemStackString",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub item_stack_signature: Option<String>,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("text does not start with '{{'")]
    NotDelimited,

    #[error("malformed protection flag: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl ProtectionFlag {
    pub fn new(shop_location: impl Into<String>, item_stack_signature: impl Into<String>) -> Self {
        Self {
            mark: DEFAULT_MARK.to_string(),
            shop_location: Some(shop_location.into()),
            item_stack_signature: Some(item_stack_signature.into()),
        }
    }

    pub fn has_default_mark(&self) -> bool {
        self.mark == DEFAULT_MARK
    }

    /// Carries a non-empty location or signature, whatever its mark.
    pub fn has_payload(&self) -> bool {
        let present = |field: &Option<String>| {
            field.as_deref().is_some_and(|value| !value.is_empty())
        };
        present(&self.shop_location) || present(&self.item_stack_signature)
    }

    /// Genuine flag written for the shop at `shop_location`.
    pub fn is_for_location(&self, shop_location: &str) -> bool {
        self.has_default_mark() && self.shop_location.as_deref() == Some(shop_location)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn encode(flag: &ProtectionFlag) -> Result<String, serde_json::Error> {
    serde_json::to_string(flag)
}

pub fn decode(text: &str) -> Result<ProtectionFlag, DecodeError> {
    if !text.starts_with(FLAG_OPEN_DELIMITER) {
        return Err(DecodeError::NotDelimited);
    }
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_roundtrip() {
        let flags = [
            ProtectionFlag::new("world,10,64,10", "c2lnbmF0dXJl"),
            ProtectionFlag::new("", ""),
            ProtectionFlag {
                mark: "other".to_string(),
                shop_location: None,
                item_stack_signature: Some("x\"y\\z\n".to_string()),
            },
        ];
        for flag in flags {
            let encoded = encode(&flag).expect("encode");
            assert!(encoded.starts_with(FLAG_OPEN_DELIMITER));
            assert!(!encoded.contains('\n'));
            assert_eq!(decode(&encoded).expect("decode"), flag);
        }
    }

    #[test]
    fn encoded_field_names_are_stable() {
        let encoded = encode(&ProtectionFlag::new("world,1,2,3", "sig")).expect("encode");
        assert_eq!(
            encoded,
            r#"{"mark":"QuickShop DisplayItem","shopLocation":"world,1,2,3","itemStackString":"sig"}"#
        );
    }

    #[test]
    fn decode_rejects_undelimited_text() {
        assert!(matches!(decode("A fine diamond"), Err(DecodeError::NotDelimited)));
        assert!(matches!(decode(""), Err(DecodeError::NotDelimited)));
        assert!(matches!(
            decode(r#" {"mark":"QuickShop DisplayItem"}"#),
            Err(DecodeError::NotDelimited)
        ));
    }

    #[test]
    fn decode_reports_malformed_json() {
        assert!(matches!(decode("{not json"), Err(DecodeError::Malformed(_))));
        assert!(matches!(decode(r#"{"mark": 5}"#), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn decode_tolerates_missing_and_unknown_fields() {
        let flag = decode(r#"{"future":"field"}"#).expect("decode");
        assert_eq!(flag.mark, "");
        assert_eq!(flag.shop_location, None);
        assert!(!flag.has_default_mark());
        assert!(!flag.has_payload());

        let flag = decode(r#"{"mark":null,"itemStackString":"sig"}"#).expect("decode");
        assert_eq!(flag.mark, "");
        assert!(flag.has_payload());

        let flag = decode(r#"{"mark":"QuickShop DisplayItem","shopLocation":null}"#)
            .expect("decode");
        assert!(flag.has_default_mark());
        assert_eq!(flag.shop_location, None);
    }

    #[test]
    fn is_for_location_requires_mark_and_location() {
        let flag = ProtectionFlag::new("world,10,64,10", "sig");
        assert!(flag.is_for_location("world,10,64,10"));
        assert!(!flag.is_for_location("world,11,64,10"));

        let forged = ProtectionFlag {
            mark: "Impostor".to_string(),
            ..flag
        };
        assert!(!forged.is_for_location("world,10,64,10"));
        assert!(forged.has_payload());
    }
}
