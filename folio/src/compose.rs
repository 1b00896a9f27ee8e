//! Section composition
//!
//! Turns a loaded [`PortfolioDocument`] into the ordered list of sections to
//! render. Only the `enabled` and `index` fields of each section are read here;
//! payloads are decoded later by the renderers.
//!
//! Ordering rules:
//! - a section participates only when `enabled` is `true`
//! - sections sort ascending by `index`
//! - sections without an `index` sort after every indexed one
//! - ties keep declaration order (fixed sections first, then custom sections)

use crate::document::{PortfolioDocument, CUSTOM_SECTIONS_KEY};
use clap::ValueEnum;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Sort key for sections that did not ask for a position
pub const UNINDEXED: i64 = i64::MAX;

/// The fixed sections of a portfolio, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
    About,
    Skills,
    Publications,
    Experience,
    Education,
    Projects,
    Achievements,
    Testimonials,
    Contact,
    Quote,
}

impl SectionKey {
    /// Every fixed section in declaration order
    pub const ALL: [SectionKey; 10] = [
        SectionKey::About,
        SectionKey::Skills,
        SectionKey::Publications,
        SectionKey::Experience,
        SectionKey::Education,
        SectionKey::Projects,
        SectionKey::Achievements,
        SectionKey::Testimonials,
        SectionKey::Contact,
        SectionKey::Quote,
    ];

    /// Top-level key of the section in the JSON document
    pub fn json_key(self) -> &'static str {
        match self {
            SectionKey::About => "intro",
            SectionKey::Skills => "skills",
            SectionKey::Publications => "publications",
            SectionKey::Experience => "experience",
            SectionKey::Education => "education",
            SectionKey::Projects => "projects",
            SectionKey::Achievements => "achievements",
            SectionKey::Testimonials => "testimonials",
            SectionKey::Contact => "contact",
            SectionKey::Quote => "quote",
        }
    }

    /// Anchor id of the rendered section, which navigation links target
    pub fn anchor_id(self) -> &'static str {
        match self {
            SectionKey::About => "about",
            SectionKey::Projects => "portfolio",
            other => other.json_key(),
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.anchor_id())
    }
}

/// What a descriptor renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "key", rename_all = "snake_case")]
pub enum SectionKind {
    /// One of the fixed sections
    Fixed(SectionKey),
    /// Position within the `customSections` array
    Custom(usize),
}

/// One section selected for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionDescriptor {
    /// Unique, stable anchor id
    pub id: String,
    /// Sort key; [`UNINDEXED`] when the section has no `index`
    pub resolved_index: i64,
    pub kind: SectionKind,
}

impl SectionDescriptor {
    pub fn is_indexed(&self) -> bool {
        self.resolved_index != UNINDEXED
    }
}

/// How to treat structurally invalid sections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ComposeMode {
    /// Fail on the first malformed section
    Strict,
    /// Skip malformed sections with a warning
    #[default]
    Lenient,
}

/// Composition errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    #[error("Invalid configuration in '{section}': {reason}")]
    InvalidConfiguration { section: String, reason: String },
}

impl ComposeError {
    fn invalid(section: impl Into<String>, reason: impl Into<String>) -> Self {
        ComposeError::InvalidConfiguration {
            section: section.into(),
            reason: reason.into(),
        }
    }
}

/// Produce the ordered list of enabled sections
///
/// # Parameters
/// * `doc` - The loaded portfolio document
/// * `mode` - Whether malformed sections fail the composition or are skipped
///
/// # Returns
/// * `Ok(Vec<SectionDescriptor>)` - Enabled sections, stably sorted by index
/// * `Err(ComposeError)` - The document root is not an object, or a section is
///   malformed in [`ComposeMode::Strict`]
pub fn compose_sections(
    doc: &PortfolioDocument,
    mode: ComposeMode,
) -> Result<Vec<SectionDescriptor>, ComposeError> {
    let root = doc
        .as_object()
        .ok_or_else(|| ComposeError::invalid("<root>", "document must be a JSON object"))?;

    let mut descriptors = Vec::new();

    for key in SectionKey::ALL {
        let Some(value) = root.get(key.json_key()).filter(|v| !v.is_null()) else {
            continue;
        };
        let resolved = read_header(value).map(|header| {
            header.map(|resolved_index| SectionDescriptor {
                id: key.anchor_id().to_string(),
                resolved_index,
                kind: SectionKind::Fixed(key),
            })
        });
        if let Some(descriptor) = settle(resolved, key.json_key(), mode)? {
            descriptors.push(descriptor);
        }
    }

    collect_custom_sections(root, mode, &mut descriptors)?;

    let mut descriptors = dedup_ids(descriptors, mode)?;

    // slice::sort_by_key is stable, so ties keep declaration order
    descriptors.sort_by_key(|d| d.resolved_index);

    log::debug!(
        "Composed sections: {}",
        descriptors.iter().map(|d| d.id.as_str()).join(", ")
    );

    Ok(descriptors)
}

/// Apply the same filter to each element of the custom section array
fn collect_custom_sections(
    root: &Map<String, Value>,
    mode: ComposeMode,
    descriptors: &mut Vec<SectionDescriptor>,
) -> Result<(), ComposeError> {
    let sections = match root.get(CUSTOM_SECTIONS_KEY) {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::Array(sections)) => sections,
        Some(_) => {
            let err = ComposeError::invalid(CUSTOM_SECTIONS_KEY, "expected an array");
            return match mode {
                ComposeMode::Strict => Err(err),
                ComposeMode::Lenient => {
                    log::warn!("Skipping custom sections: {}", err);
                    Ok(())
                }
            };
        }
    };

    for (position, value) in sections.iter().enumerate() {
        let label = format!("{}[{}]", CUSTOM_SECTIONS_KEY, position);
        let resolved = read_header(value).and_then(|header| match header {
            None => Ok(None),
            Some(resolved_index) => {
                let id = value
                    .get("id")
                    .and_then(Value::as_str)
                    .filter(|id| !id.is_empty())
                    .ok_or_else(|| ComposeError::invalid(&label, "missing string 'id'"))?;
                Ok(Some(SectionDescriptor {
                    id: id.to_string(),
                    resolved_index,
                    kind: SectionKind::Custom(position),
                }))
            }
        });
        if let Some(descriptor) = settle(resolved, &label, mode)? {
            descriptors.push(descriptor);
        }
    }

    Ok(())
}

/// Read `enabled` and `index` from one section value
///
/// # Returns
/// * `Ok(None)` - The section is disabled
/// * `Ok(Some(index))` - The section is enabled with its sort key
/// * `Err(ComposeError)` - The header fields are malformed
fn read_header(value: &Value) -> Result<Option<i64>, ComposeError> {
    let obj = value
        .as_object()
        .ok_or_else(|| ComposeError::invalid("", "section must be a JSON object"))?;

    match obj.get("enabled") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => return Ok(None),
        Some(Value::Bool(true)) => {}
        Some(other) => {
            return Err(ComposeError::invalid(
                "",
                format!("'enabled' must be a boolean, found {}", other),
            ))
        }
    }

    match obj.get("index") {
        None | Some(Value::Null) => Ok(Some(UNINDEXED)),
        Some(Value::Number(n)) => n.as_i64().map(Some).ok_or_else(|| {
            ComposeError::invalid("", format!("'index' must be an integer, found {}", n))
        }),
        Some(other) => Err(ComposeError::invalid(
            "",
            format!("'index' must be a number, found {}", other),
        )),
    }
}

/// Resolve a per-section result according to the mode
fn settle(
    resolved: Result<Option<SectionDescriptor>, ComposeError>,
    section: &str,
    mode: ComposeMode,
) -> Result<Option<SectionDescriptor>, ComposeError> {
    match resolved {
        Ok(descriptor) => Ok(descriptor),
        Err(ComposeError::InvalidConfiguration { reason, .. }) => {
            let err = ComposeError::invalid(section, reason);
            match mode {
                ComposeMode::Strict => Err(err),
                ComposeMode::Lenient => {
                    log::warn!("Skipping section: {}", err);
                    Ok(None)
                }
            }
        }
    }
}

/// Ids are anchors, so two sections may not share one
fn dedup_ids(
    descriptors: Vec<SectionDescriptor>,
    mode: ComposeMode,
) -> Result<Vec<SectionDescriptor>, ComposeError> {
    if mode == ComposeMode::Strict {
        if let Some(duplicate) = descriptors.iter().map(|d| d.id.as_str()).duplicates().next() {
            return Err(ComposeError::invalid(
                duplicate,
                "section id is used more than once",
            ));
        }
        return Ok(descriptors);
    }

    let mut seen = HashSet::new();
    Ok(descriptors
        .into_iter()
        .filter(|d| {
            let first = seen.insert(d.id.clone());
            if !first {
                log::warn!("Skipping section with duplicate id '{}'", d.id);
            }
            first
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(descriptors: &[SectionDescriptor]) -> Vec<&str> {
        descriptors.iter().map(|d| d.id.as_str()).collect()
    }

    fn compose(value: Value) -> Vec<SectionDescriptor> {
        compose_sections(&PortfolioDocument::new(value), ComposeMode::Strict).unwrap()
    }

    #[test]
    fn test_index_order_with_unindexed_last() {
        // A = skills (2), B = education (no index), C = contact (1), D = quote (disabled)
        let out = compose(json!({
            "skills": {"enabled": true, "index": 2},
            "education": {"enabled": true},
            "contact": {"enabled": true, "index": 1},
            "quote": {"enabled": false, "index": 0}
        }));
        assert_eq!(ids(&out), vec!["contact", "skills", "education"]);
        assert_eq!(out[2].resolved_index, UNINDEXED);
        assert!(!out[2].is_indexed());
    }

    #[test]
    fn test_ties_keep_declaration_order() {
        let out = compose(json!({
            "quote": {"enabled": true},
            "intro": {"enabled": true},
            "contact": {"enabled": true, "index": 5},
            "skills": {"enabled": true, "index": 5},
            "customSections": [
                {"id": "news", "title": "News", "enabled": true},
                {"id": "talks", "title": "Talks", "enabled": true, "index": 5}
            ]
        }));
        assert_eq!(
            ids(&out),
            vec!["skills", "contact", "talks", "about", "quote", "news"]
        );
    }

    #[test]
    fn test_disabled_and_missing_flag_excluded() {
        let out = compose(json!({
            "intro": {"index": 1},
            "skills": {"enabled": null},
            "projects": {"enabled": true}
        }));
        assert_eq!(ids(&out), vec!["portfolio"]);
        assert_eq!(out[0].kind, SectionKind::Fixed(SectionKey::Projects));
    }

    #[test]
    fn test_deterministic() {
        let doc = PortfolioDocument::new(json!({
            "intro": {"enabled": true},
            "skills": {"enabled": true},
            "quote": {"enabled": true, "index": -1}
        }));
        let first = compose_sections(&doc, ComposeMode::Strict).unwrap();
        let second = compose_sections(&doc, ComposeMode::Strict).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_disabled_section_index_is_irrelevant() {
        let base = json!({
            "intro": {"enabled": true, "index": 3},
            "skills": {"enabled": true},
            "quote": {"enabled": false, "index": 0}
        });
        let mut changed = base.clone();
        changed["quote"]["index"] = json!("not even a number");
        assert_eq!(compose(base), compose(changed));
    }

    #[test]
    fn test_custom_sections_carry_position() {
        let out = compose(json!({
            "customSections": [
                {"id": "off", "title": "Off", "enabled": false},
                {"id": "on", "title": "On", "enabled": true, "index": 0}
            ]
        }));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, SectionKind::Custom(1));
    }

    #[test]
    fn test_root_must_be_object() {
        let err = compose_sections(&PortfolioDocument::new(json!([1, 2])), ComposeMode::Lenient)
            .unwrap_err();
        assert!(matches!(err, ComposeError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_strict_rejects_malformed_section() {
        let doc = PortfolioDocument::new(json!({
            "intro": {"enabled": true},
            "skills": {"enabled": "yes"}
        }));
        let err = compose_sections(&doc, ComposeMode::Strict).unwrap_err();
        assert_eq!(
            err,
            ComposeError::InvalidConfiguration {
                section: "skills".to_string(),
                reason: "'enabled' must be a boolean, found \"yes\"".to_string(),
            }
        );
    }

    #[test]
    fn test_lenient_skips_malformed_sections() {
        let doc = PortfolioDocument::new(json!({
            "intro": {"enabled": true},
            "skills": "broken",
            "education": {"enabled": true, "index": 1.5},
            "customSections": [
                {"title": "no id", "enabled": true},
                {"id": "ok", "title": "Ok", "enabled": true}
            ]
        }));
        let out = compose_sections(&doc, ComposeMode::Lenient).unwrap();
        assert_eq!(ids(&out), vec!["about", "ok"]);
    }

    #[test]
    fn test_custom_sections_must_be_array() {
        let doc = PortfolioDocument::new(json!({"customSections": {"id": "x"}}));
        assert!(compose_sections(&doc, ComposeMode::Strict).is_err());
        assert!(compose_sections(&doc, ComposeMode::Lenient)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_duplicate_ids() {
        let doc = PortfolioDocument::new(json!({
            "quote": {"enabled": true},
            "customSections": [{"id": "quote", "title": "Again", "enabled": true, "index": 0}]
        }));
        assert!(compose_sections(&doc, ComposeMode::Strict).is_err());

        let out = compose_sections(&doc, ComposeMode::Lenient).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, SectionKind::Fixed(SectionKey::Quote));
    }
}
