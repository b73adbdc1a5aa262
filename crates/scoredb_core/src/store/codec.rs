//! Document encoding and validation.

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::types::Document;
use serde::Serialize;

/// Converts a serializable value into a document.
///
/// Rejects values that serialize to `null`: there is no document to store.
pub(crate) fn to_document<T>(document: &T) -> CoreResult<Document>
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(document).map_err(|e| {
        CoreError::invalid_argument(format!("document is not serializable: {e}"))
    })?;
    if value.is_null() {
        return Err(CoreError::invalid_argument(
            "document is unset and cannot be stored",
        ));
    }
    Ok(value)
}

/// Serializes a document to its stored content string.
///
/// Content is canonical: the value is converted to a [`Document`] first, so
/// object keys are always written in sorted order whatever the source type.
/// Rejects `null` documents and content longer than `config.max_content_len`
/// characters.
pub(crate) fn encode<T>(collection: &str, document: &T, config: &Config) -> CoreResult<String>
where
    T: Serialize + ?Sized,
{
    let value = to_document(document)?;
    let content = serde_json::to_string(&value).map_err(|e| {
        CoreError::invalid_argument(format!("document is not serializable: {e}"))
    })?;

    let len = content.chars().count();
    if len > config.max_content_len {
        return Err(CoreError::SizeLimitExceeded {
            collection: collection.to_string(),
            len,
            max: config.max_content_len,
        });
    }

    Ok(content)
}

/// Parses stored content. Returns `None` for anything that is not JSON.
pub(crate) fn decode(content: &str) -> Option<Document> {
    serde_json::from_str(content).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn encode_object() {
        let content = encode("t", &json!({"b": 1, "a": "x"}), &Config::default()).unwrap();
        assert_eq!(content, r#"{"a":"x","b":1}"#);
    }

    #[test]
    fn encode_is_canonical_for_structs() {
        #[derive(Serialize)]
        struct Unsorted {
            zeta: u8,
            alpha: u8,
        }
        let content = encode("t", &Unsorted { zeta: 1, alpha: 2 }, &Config::default()).unwrap();
        assert_eq!(content, r#"{"alpha":2,"zeta":1}"#);
    }

    #[test]
    fn encode_rejects_null() {
        let none: Option<u32> = None;
        let err = encode("t", &none, &Config::default()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));
    }

    #[test]
    fn encode_rejects_unserializable() {
        let mut map = HashMap::new();
        map.insert((1, 2), "tuple keys are not valid JSON keys");
        let err = encode("t", &map, &Config::default()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));
    }

    #[test]
    fn encode_enforces_bound_in_characters() {
        let config = Config::new().max_content_len(8);
        // "\"éééééé\"" is 8 characters but 14 bytes
        assert!(encode("t", &json!("éééééé"), &config).is_ok());
        let err = encode("t", &json!("ééééééé"), &config).unwrap_err();
        assert!(matches!(
            err,
            CoreError::SizeLimitExceeded { len: 9, max: 8, .. }
        ));
    }

    #[test]
    fn decode_malformed_is_none() {
        assert!(decode("{not json").is_none());
        assert!(decode("").is_none());
        assert_eq!(decode("[1]"), Some(json!([1])));
    }
}
