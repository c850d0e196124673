//! Common serde helpers for documents written by older clients

use serde::{Deserialize, Deserializer};

/// Deserialize bool that treats null as true
pub fn bool_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(|opt| opt.unwrap_or(true))
}

/// Default for display flags that were never written
pub fn default_true() -> bool {
    true
}

/// Distinguish an absent field from an explicit `null` in patch payloads.
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`:
/// absent -> `None`, `null` -> `Some(None)`, value -> `Some(Some(v))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Treat empty strings as absent (legacy documents stored `""`)
pub fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|opt| opt.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Flags {
        #[serde(default = "default_true", deserialize_with = "bool_true")]
        show: bool,
    }

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        logo: Option<Option<String>>,
        #[serde(default, deserialize_with = "empty_as_none")]
        note: Option<String>,
    }

    #[test]
    fn test_bool_true_null_and_missing() {
        let f: Flags = serde_json::from_str(r#"{"show":null}"#).unwrap();
        assert!(f.show);
        let f: Flags = serde_json::from_str("{}").unwrap();
        assert!(f.show);
        let f: Flags = serde_json::from_str(r#"{"show":false}"#).unwrap();
        assert!(!f.show);
    }

    #[test]
    fn test_double_option() {
        let p: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(p.logo, None);
        let p: Patch = serde_json::from_str(r#"{"logo":null}"#).unwrap();
        assert_eq!(p.logo, Some(None));
        let p: Patch = serde_json::from_str(r#"{"logo":"a.png"}"#).unwrap();
        assert_eq!(p.logo, Some(Some("a.png".to_string())));
    }

    #[test]
    fn test_empty_as_none() {
        let p: Patch = serde_json::from_str(r#"{"note":"  "}"#).unwrap();
        assert_eq!(p.note, None);
        let p: Patch = serde_json::from_str(r#"{"note":"spicy"}"#).unwrap();
        assert_eq!(p.note.as_deref(), Some("spicy"));
    }
}
