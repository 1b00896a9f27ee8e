//! The loaded portfolio document
//!
//! The document is kept as raw JSON and decoded per section on demand. The
//! composer only needs the `enabled`/`index` pair of each section, and a
//! renderer should be able to skip one broken section while rendering the
//! rest.

use crate::model::{
    CodeElement, Contact, ContactForm, CustomSection, Footer, Header, Meta, Stats, Tracking,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Key of the dynamic custom section array
pub const CUSTOM_SECTIONS_KEY: &str = "customSections";

/// An immutable portfolio document
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioDocument {
    root: Value,
}

impl PortfolioDocument {
    /// Wrap an already parsed JSON value
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// Parse a document from JSON text
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text).map(Self::new)
    }

    /// The raw JSON root
    pub fn raw(&self) -> &Value {
        &self.root
    }

    /// The root as an object, if it is one
    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        self.root.as_object()
    }

    /// Raw value of a top-level key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// Decode a top-level key into its typed payload
    ///
    /// # Returns
    /// * `Ok(None)` - The key is absent or null
    /// * `Ok(Some(T))` - The payload decoded
    /// * `Err(serde_json::Error)` - The payload is present but does not match `T`
    pub fn section<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, serde_json::Error> {
        match self.root.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::deserialize(value).map(Some),
        }
    }

    /// Decode one element of the custom section array
    pub fn custom_section(&self, position: usize) -> Result<Option<CustomSection>, serde_json::Error> {
        match self
            .root
            .get(CUSTOM_SECTIONS_KEY)
            .and_then(Value::as_array)
            .and_then(|sections| sections.get(position))
        {
            None => Ok(None),
            Some(value) => CustomSection::deserialize(value).map(Some),
        }
    }

    /// Page metadata, falling back to an empty title
    pub fn meta(&self) -> Meta {
        self.lenient("meta").unwrap_or_default()
    }

    pub fn header(&self) -> Option<Header> {
        self.lenient("header")
    }

    pub fn stats(&self) -> Option<Stats> {
        self.lenient("stats")
    }

    pub fn footer(&self) -> Option<Footer> {
        self.lenient("footer")
    }

    pub fn contact_form(&self) -> Option<ContactForm> {
        self.lenient("contactForm")
    }

    pub fn tracking(&self) -> Option<Tracking> {
        self.lenient("tracking")
    }

    /// Background snippets; empty when absent or malformed
    pub fn code_elements(&self) -> Vec<CodeElement> {
        self.lenient("codeElements").unwrap_or_default()
    }

    /// Contact details, also used for the social icons under the intro
    pub fn contact(&self) -> Option<Contact> {
        self.lenient("contact")
    }

    /// Page chrome is optional; a malformed entry is dropped with a warning
    fn lenient<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.section(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Ignoring malformed '{}' entry: {}", key, e);
                None
            }
        }
    }
}

impl From<Value> for PortfolioDocument {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Quote;
    use serde_json::json;

    #[test]
    fn test_section_absent_and_null() {
        let doc = PortfolioDocument::new(json!({"quote": null}));
        assert!(doc.section::<Quote>("quote").unwrap().is_none());
        assert!(doc.section::<Quote>("missing").unwrap().is_none());
    }

    #[test]
    fn test_section_malformed_is_error() {
        let doc = PortfolioDocument::new(json!({"quote": {"enabled": true}}));
        assert!(doc.section::<Quote>("quote").is_err());
    }

    #[test]
    fn test_meta_falls_back() {
        let doc = PortfolioDocument::new(json!({"meta": 42}));
        assert_eq!(doc.meta().title, "");

        let doc = PortfolioDocument::new(json!({"meta": {"title": "Jane"}}));
        assert_eq!(doc.meta().title, "Jane");
    }

    #[test]
    fn test_custom_section_by_position() {
        let doc = PortfolioDocument::from_json_str(
            r#"{"customSections":[{"id":"a","title":"A"},{"id":"b","title":"B","type":"info"}]}"#,
        )
        .unwrap();
        let second = doc.custom_section(1).unwrap().unwrap();
        assert_eq!(second.id, "b");
        assert_eq!(second.kind, "info");
        assert!(doc.custom_section(2).unwrap().is_none());
    }
}
