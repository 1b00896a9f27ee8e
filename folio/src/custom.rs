//! Content of user-defined custom sections
//!
//! A custom section names its layout with a `type` string and carries a free
//! form `content` object. Known layouts decode into typed variants; anything
//! else is kept as raw JSON and shown verbatim.

use crate::model::{CustomSection, Stat};
use serde::Deserialize;
use serde_json::Value;

const DEFAULT_BUTTON_DESCRIPTION: &str =
    "Stay in touch for collaborations, consulting, or speaking gigs.";
const DEFAULT_BUTTON_LABEL: &str = "Learn more";

/// Decoded content of a custom section
#[derive(Debug, Clone, PartialEq)]
pub enum CustomContent {
    /// Bulleted rich-text items
    Info(Vec<String>),
    /// Cards linking elsewhere
    Links(Vec<LinkItem>),
    /// One call-to-action button
    Button(ButtonContent),
    /// Newsletter sign-up panel
    Newsletter(Newsletter),
    /// Unknown layout, rendered as pretty-printed JSON
    Raw(Value),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinkItem {
    pub label: String,
    pub url: String,

    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonContent {
    pub label: String,
    pub url: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawButton {
    label: Option<String>,
    url: Option<String>,
    description: Option<String>,
}

/// Newsletter panel with every fallback already applied
#[derive(Debug, Clone, PartialEq)]
pub struct Newsletter {
    pub eyebrow: String,
    pub heading: String,
    pub subcopy: Option<String>,
    pub placeholder: String,
    pub cta_label: String,
    pub cta_url: String,
    pub note: Option<String>,
    pub pitch: Option<String>,
    pub stats: Vec<Stat>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNewsletter {
    heading: Option<String>,
    subcopy: Option<String>,
    placeholder: Option<String>,
    cta_label: Option<String>,
    cta_url: Option<String>,
    note: Option<String>,
    pitch: Option<String>,

    #[serde(default)]
    stats: Vec<Stat>,
}

impl CustomContent {
    /// Decode the content of `section` according to its `type`
    ///
    /// Never fails: content that does not fit the declared layout degrades to
    /// an empty list or default values, and unknown layouts become
    /// [`CustomContent::Raw`].
    pub fn from_section(section: &CustomSection) -> Self {
        let content = &section.content;
        match section.kind.as_str() {
            "info" => CustomContent::Info(string_list(keyed_or_bare_array(content, "list"))),
            "links" => CustomContent::Links(
                keyed_or_bare_array(content, "links")
                    .iter()
                    .filter_map(|item| decode_or_warn::<LinkItem>(item, &section.id))
                    .collect(),
            ),
            "button" => {
                let raw = content.get("button").unwrap_or(content);
                let raw: RawButton = decode_or_warn(raw, &section.id).unwrap_or_default();
                CustomContent::Button(ButtonContent {
                    label: raw.label.unwrap_or_else(|| DEFAULT_BUTTON_LABEL.to_string()),
                    url: raw.url,
                    description: raw
                        .description
                        .unwrap_or_else(|| DEFAULT_BUTTON_DESCRIPTION.to_string()),
                })
            }
            "newsletter" => {
                let raw: RawNewsletter = content
                    .get("newsletter")
                    .and_then(|value| decode_or_warn(value, &section.id))
                    .unwrap_or_default();
                CustomContent::Newsletter(Newsletter {
                    eyebrow: section
                        .eyebrow
                        .clone()
                        .unwrap_or_else(|| "Newsletter".to_string()),
                    heading: raw.heading.unwrap_or_else(|| section.title.clone()),
                    subcopy: raw.subcopy.or_else(|| section.description.clone()),
                    placeholder: raw.placeholder.unwrap_or_else(|| "Your email".to_string()),
                    cta_label: raw.cta_label.unwrap_or_else(|| "Subscribe".to_string()),
                    cta_url: raw.cta_url.unwrap_or_else(|| "#".to_string()),
                    note: raw.note,
                    pitch: raw.pitch,
                    stats: raw.stats,
                })
            }
            _ => CustomContent::Raw(content.clone()),
        }
    }

    /// Layout name, for logging
    pub fn layout(&self) -> &'static str {
        match self {
            CustomContent::Info(_) => "info",
            CustomContent::Links(_) => "links",
            CustomContent::Button(_) => "button",
            CustomContent::Newsletter(_) => "newsletter",
            CustomContent::Raw(_) => "raw",
        }
    }
}

/// `content.<key>` when it is an array, else `content` itself when it is one
fn keyed_or_bare_array<'a>(content: &'a Value, key: &str) -> &'a [Value] {
    content
        .get(key)
        .and_then(Value::as_array)
        .or_else(|| content.as_array())
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn string_list(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item.as_str().map(str::to_string))
        .collect()
}

fn decode_or_warn<T: for<'de> Deserialize<'de>>(value: &Value, section_id: &str) -> Option<T> {
    match T::deserialize(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            log::warn!("Ignoring malformed content in custom section '{}': {}", section_id, e);
            None
        }
    }
}
