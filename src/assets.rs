//! The asset mapping handed between the loader and the application.
//!
//! An [`AssetMap`] starts out with every entry pointing at a URL. The loader
//! swaps each URL for the bytes it fetched, then the whole map is moved into
//! the initialization hook, which usually turns it into [`Assets`].

use hashbrown::HashMap;

use crate::error::LoadError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetValue {
    Url(String),
    Bytes(Vec<u8>),
}

impl AssetValue {
    pub fn as_url(&self) -> Option<&str> {
        match self {
            AssetValue::Url(url) => Some(url),
            AssetValue::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            AssetValue::Url(_) => None,
            AssetValue::Bytes(bytes) => Some(bytes),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, AssetValue::Bytes(_))
    }
}

/// Ordered identifier -> URL/bytes table with unique keys.
///
/// Small by nature (a handful of fonts and textures), so lookups are a linear
/// scan over a `Vec` that keeps the caller's insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetMap {
    entries: Vec<(String, AssetValue)>,
}

impl AssetMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: AssetValue) -> Option<AssetValue> {
        let key = key.into();
        match self.position(&key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn insert_url(&mut self, key: impl Into<String>, url: impl Into<String>) {
        self.insert(key, AssetValue::Url(url.into()));
    }

    /// Overwrite an existing entry with fetched bytes. Returns false for an
    /// unknown key.
    pub fn set_bytes(&mut self, key: &str, bytes: Vec<u8>) -> bool {
        match self.position(key) {
            Some(i) => {
                self.entries[i].1 = AssetValue::Bytes(bytes);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, key: &str) -> Option<&AssetValue> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AssetValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries still waiting on a fetch, in order, as owned `(key, url)` pairs.
    pub fn pending(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_url().map(|url| (k.clone(), url.to_string())))
            .collect()
    }

    pub fn is_resolved(&self) -> bool {
        self.entries.iter().all(|(_, v)| v.is_resolved())
    }

    /// Convert a fully fetched map into an [`Assets`] table.
    pub fn into_assets(self) -> Result<Assets, LoadError> {
        let mut out = HashMap::with_capacity(self.entries.len());
        for (key, value) in self.entries {
            match value {
                AssetValue::Bytes(bytes) => {
                    out.insert(key, bytes);
                }
                AssetValue::Url(_) => return Err(LoadError::Unresolved(key)),
            }
        }
        Ok(Assets(out))
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }
}

/// Resolved asset bytes keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assets(pub HashMap<String, Vec<u8>>);

impl Assets {
    /// Bytes for `name`, or an empty slice when the asset is unknown.
    pub fn get(&self, name: &str) -> &[u8] {
        self.0.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Ordered list of `(name, url)` pairs an application wants loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetManifest {
    entries: Vec<(String, String)>,
}

impl AssetManifest {
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut manifest = Self::default();
        for (name, url) in pairs {
            manifest.push(*name, *url);
        }
        manifest
    }

    /// Append an entry. Returns false (and keeps the first url) when `name`
    /// is already present.
    pub fn push(&mut self, name: impl Into<String>, url: impl Into<String>) -> bool {
        let name = name.into();
        if self.entries.iter().any(|(n, _)| *n == name) {
            return false;
        }
        self.entries.push((name, url.into()));
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, u)| (n.as_str(), u.as_str()))
    }

    pub fn to_asset_map(&self) -> AssetMap {
        let mut map = AssetMap::new();
        for (name, url) in &self.entries {
            map.insert_url(name.clone(), url.clone());
        }
        map
    }

    /// Parse either `{"name": "url", ...}` (document order kept) or
    /// `[["name", "url"], ...]`.
    #[cfg(feature = "serde")]
    pub fn from_json(raw: &str) -> Result<Self, crate::error::ManifestError> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[cfg(feature = "serde")]
mod manifest_serde {
    use std::fmt;

    use serde::de::{self, MapAccess, SeqAccess, Visitor};
    use serde::{Deserialize, Deserializer};

    use super::AssetManifest;

    struct ManifestVisitor;

    impl ManifestVisitor {
        fn add<E: de::Error>(
            manifest: &mut AssetManifest,
            name: String,
            url: String,
        ) -> Result<(), E> {
            if manifest.push(name.clone(), url) {
                Ok(())
            } else {
                Err(E::custom(format!("duplicate asset name `{name}`")))
            }
        }
    }

    impl<'de> Visitor<'de> for ManifestVisitor {
        type Value = AssetManifest;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an object of name -> url or a list of [name, url] pairs")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut manifest = AssetManifest::default();
            while let Some((name, url)) = access.next_entry::<String, String>()? {
                Self::add(&mut manifest, name, url)?;
            }
            Ok(manifest)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut manifest = AssetManifest::default();
            while let Some((name, url)) = access.next_element::<(String, String)>()? {
                Self::add(&mut manifest, name, url)?;
            }
            Ok(manifest)
        }
    }

    impl<'de> Deserialize<'de> for AssetManifest {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(ManifestVisitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_order_and_replaces_in_place() {
        let mut map = AssetMap::new();
        map.insert_url("regular", "assets/RobotoSlab-Regular.ttf");
        map.insert_url("heightmap", "assets/heightmap.jpeg");
        let old = map.insert("regular", AssetValue::Url("assets/other.ttf".into()));

        assert_eq!(
            old,
            Some(AssetValue::Url("assets/RobotoSlab-Regular.ttf".into()))
        );
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["regular", "heightmap"]);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn set_bytes_only_touches_known_keys() {
        let mut map = AssetMap::new();
        map.insert_url("a", "a.bin");
        assert!(map.set_bytes("a", vec![1, 2, 3]));
        assert!(!map.set_bytes("missing", vec![9]));
        assert_eq!(map.get("a").and_then(AssetValue::as_bytes), Some(&[1u8, 2, 3][..]));
        assert!(map.is_resolved());
    }

    #[test]
    fn pending_skips_resolved_entries() {
        let mut map = AssetMap::new();
        map.insert_url("a", "a.bin");
        map.insert("b", AssetValue::Bytes(vec![0]));
        map.insert_url("c", "c.bin");

        assert_eq!(
            map.pending(),
            vec![
                ("a".to_string(), "a.bin".to_string()),
                ("c".to_string(), "c.bin".to_string())
            ]
        );
        assert!(!map.is_resolved());
    }

    #[test]
    fn into_assets_rejects_unfetched_entries() {
        let mut map = AssetMap::new();
        map.insert("font", AssetValue::Bytes(vec![7; 4]));
        map.insert_url("heightmap", "assets/heightmap.jpeg");

        let err = map.into_assets().unwrap_err();
        assert_eq!(err, LoadError::Unresolved("heightmap".to_string()));
    }

    #[test]
    fn assets_get_unknown_is_empty() {
        let mut map = AssetMap::new();
        map.insert("font", AssetValue::Bytes(vec![7; 4]));
        let assets = map.into_assets().unwrap();

        assert_eq!(assets.get("font"), &[7, 7, 7, 7]);
        assert!(assets.get("nope").is_empty());
        assert!(assets.contains("font"));
    }

    #[test]
    fn manifest_rejects_duplicate_names() {
        let mut manifest = AssetManifest::from_pairs(&[("regular", "a.ttf")]);
        assert!(!manifest.push("regular", "b.ttf"));
        assert_eq!(manifest.iter().collect::<Vec<_>>(), vec![("regular", "a.ttf")]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn manifest_json_object_keeps_document_order() {
        let manifest =
            AssetManifest::from_json(r#"{"zeta": "z.bin", "alpha": "a.bin", "mid": "m.bin"}"#)
                .unwrap();
        let map = manifest.to_asset_map();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn manifest_json_accepts_pair_list() {
        let manifest =
            AssetManifest::from_json(r#"[["regular", "assets/r.ttf"], ["heightmap", "h.jpeg"]]"#)
                .unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.iter().nth(1), Some(("heightmap", "h.jpeg")));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn manifest_json_duplicate_is_an_error() {
        let err = AssetManifest::from_json(r#"[["a", "1"], ["a", "2"]]"#).unwrap_err();
        assert!(err.to_string().contains("duplicate asset name `a`"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn manifest_json_errors_name_the_manifest() {
        let err = AssetManifest::from_json("{").unwrap_err();
        assert!(err.to_string().starts_with("invalid asset manifest: "));
        assert!(!err.to_string().contains("config"));
    }
}
