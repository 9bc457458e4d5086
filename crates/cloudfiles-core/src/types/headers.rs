//! Request header collections.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{HEADER_CONTENT_TYPE, METADATA_OBJECT_HEADER};

/// User metadata attached to an object, sent as `X-Object-Meta-{key}` headers.
pub type ObjectMetadata = BTreeMap<String, String>;

/// Ordered collection of request headers with case-insensitive names.
///
/// Inserting a header whose name matches an existing one (ignoring ASCII
/// case) replaces the existing entry, so a name is never sent twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectHeaders {
    entries: Vec<(String, String)>,
}

impl ObjectHeaders {
    /// Creates an empty header collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a header, replacing any entry with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.entries
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.entries.push((name, value.into()));
    }

    /// Adds a header and returns the collection.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Returns the value of a header, ignoring name case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns whether a header is present, ignoring name case.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Adds one `X-Object-Meta-{key}` header per metadata entry.
    pub fn extend_metadata(&mut self, metadata: &ObjectMetadata) {
        for (key, value) in metadata {
            self.insert(format!("{METADATA_OBJECT_HEADER}{key}"), value.clone());
        }
    }

    /// Iterates over headers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ObjectHeaders
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl<K, V> Extend<(K, V)> for ObjectHeaders
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

/// Headers supplied to an upload.
///
/// A bare string is the content type alone, kept for callers that only ever
/// set `Content-Type`; a full map is used as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadHeaders {
    /// Only the `Content-Type` value.
    ContentType(String),
    /// Arbitrary headers.
    Headers(ObjectHeaders),
}

impl UploadHeaders {
    /// Resolves into a header collection.
    pub fn into_headers(self) -> ObjectHeaders {
        match self {
            Self::ContentType(content_type) => {
                ObjectHeaders::new().with(HEADER_CONTENT_TYPE, content_type)
            }
            Self::Headers(headers) => headers,
        }
    }
}

impl Default for UploadHeaders {
    fn default() -> Self {
        Self::Headers(ObjectHeaders::new())
    }
}

impl From<&str> for UploadHeaders {
    fn from(content_type: &str) -> Self {
        Self::ContentType(content_type.to_owned())
    }
}

impl From<String> for UploadHeaders {
    fn from(content_type: String) -> Self {
        Self::ContentType(content_type)
    }
}

impl From<ObjectHeaders> for UploadHeaders {
    fn from(headers: ObjectHeaders) -> Self {
        Self::Headers(headers)
    }
}

impl From<Option<ObjectHeaders>> for UploadHeaders {
    fn from(headers: Option<ObjectHeaders>) -> Self {
        headers.map(Self::Headers).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::HEADER_CONTENT_DISPOSITION;

    #[test]
    fn test_insert_replaces_case_insensitively() {
        let mut headers = ObjectHeaders::new();
        headers.insert("etag", "caller");
        headers.insert("ETag", "computed");

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("ETAG"), Some("computed"));
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let headers: ObjectHeaders = [("B", "2"), ("A", "1"), ("C", "3")].into_iter().collect();
        let names: Vec<_> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["B", "A", "C"]);
    }

    #[test]
    fn test_extend_metadata() {
        let mut metadata = ObjectMetadata::new();
        metadata.insert("color".into(), "blue".into());

        let mut headers = ObjectHeaders::new();
        headers.extend_metadata(&metadata);

        assert_eq!(headers.get("X-Object-Meta-color"), Some("blue"));
    }

    #[test]
    fn test_string_headers_equal_content_type_map() {
        let from_str = UploadHeaders::from("text/plain").into_headers();
        let from_map =
            UploadHeaders::from(ObjectHeaders::new().with(HEADER_CONTENT_TYPE, "text/plain"))
                .into_headers();
        assert_eq!(from_str, from_map);
    }

    #[test]
    fn test_default_upload_headers_are_empty() {
        assert!(UploadHeaders::default().into_headers().is_empty());
        assert!(UploadHeaders::from(None::<ObjectHeaders>).into_headers().is_empty());
    }

    #[test]
    fn test_map_headers_pass_through() {
        let headers = ObjectHeaders::new()
            .with(HEADER_CONTENT_TYPE, "text/plain")
            .with(HEADER_CONTENT_DISPOSITION, "attachment; filename=\"new.txt\"");
        let resolved = UploadHeaders::from(headers.clone()).into_headers();
        assert_eq!(resolved, headers);
    }
}
