//! Typed payloads of the portfolio document
//!
//! Each top-level section of the JSON document decodes independently into one
//! of these structs (see [`crate::document::PortfolioDocument::section`]), so a
//! malformed section can be reported or skipped without affecting the others.
//! The `enabled`/`index` pair is read by the composer from the raw document and
//! is not repeated here.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Page metadata used for `<head>`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub favicon: Option<String>,
}

/// Top navigation bar
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub logo: Logo,

    #[serde(default)]
    pub nav_links: Vec<NavLink>,
}

/// Text logo shown in the navigation bar
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Logo {
    #[serde(default)]
    pub text: String,
}

/// One navigation entry pointing at a section id
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavLink {
    pub label: String,
    pub section: String,

    #[serde(default)]
    pub nav_eligible_for_desktop: bool,

    #[serde(default)]
    pub nav_eligible_for_mobile: bool,
}

impl NavLink {
    /// Whether the link shows up in any navigation layout
    pub fn is_eligible(&self) -> bool {
        self.nav_eligible_for_desktop || self.nav_eligible_for_mobile
    }
}

/// A string-or-number field; the document uses both for coordinates and delays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => write!(f, "{}", s),
            Scalar::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Decorative snippet floating in the page background
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeElement {
    pub text: String,
    pub x: Scalar,
    pub y: Scalar,

    #[serde(default)]
    pub delay: Option<Scalar>,
}

/// Payload of the `intro` key (rendered as the "about" section)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intro {
    pub tagline: String,

    #[serde(default)]
    pub professional: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub avatar: Option<Avatar>,

    #[serde(default)]
    pub cta: Option<Cta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Avatar {
    #[serde(default)]
    pub enabled: bool,
    pub image: String,

    #[serde(default)]
    pub alt: String,
}

/// Resume download call-to-action
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cta {
    pub resume_url: String,
    pub button_text: String,

    #[serde(default)]
    pub resume_file_name: Option<String>,
}

/// Headline numbers shown under the intro
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub items: Vec<Stat>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skills {
    pub title: String,

    #[serde(default)]
    pub highlight: String,
    pub categories: Vec<SkillCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCategory {
    pub name: String,

    #[serde(default)]
    pub highlight: String,

    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,

    #[serde(default)]
    pub highlight: String,
    pub items: Vec<ExperienceItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceItem {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,

    #[serde(default)]
    pub period: String,

    #[serde(default)]
    pub company: String,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub description: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
    pub title: String,

    #[serde(default)]
    pub highlight: String,
    pub items: Vec<EducationItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationItem {
    pub degree: String,

    #[serde(default)]
    pub stream: String,

    #[serde(default)]
    pub institute: String,

    #[serde(default)]
    pub result: String,

    #[serde(default)]
    pub duration: String,

    #[serde(default)]
    pub location: String,
}

/// Number of publications shown on the main page when unset
pub const DEFAULT_PUBLICATION_LIMIT: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publications {
    /// Also gates the full listing page
    #[serde(default)]
    pub enabled: bool,
    pub title: String,

    #[serde(default)]
    pub highlight: String,

    #[serde(default)]
    pub display_limit: Option<usize>,

    #[serde(default)]
    pub show_more_text: Option<String>,

    pub items: Vec<Publication>,
}

impl Publications {
    pub fn display_limit(&self) -> usize {
        self.display_limit.unwrap_or(DEFAULT_PUBLICATION_LIMIT)
    }

    pub fn show_more_text(&self) -> &str {
        self.show_more_text.as_deref().unwrap_or("Show More")
    }

    /// Items shown on the main page
    pub fn displayed(&self) -> &[Publication] {
        let limit = self.display_limit().min(self.items.len());
        &self.items[..limit]
    }

    /// Whether the full listing page has more than the main page shows
    pub fn has_more(&self) -> bool {
        self.items.len() > self.display_limit()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publication {
    pub title: String,

    #[serde(default)]
    pub description: String,
    pub url: String,

    #[serde(default)]
    pub platform: String,

    #[serde(default)]
    pub date: String,

    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub authors: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projects {
    pub title: String,

    #[serde(default)]
    pub highlight: String,
    pub items: Vec<Project>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub github_link: Option<String>,

    #[serde(default)]
    pub technologies: Vec<String>,

    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievements {
    pub title: String,

    #[serde(default)]
    pub highlight: String,

    #[serde(default)]
    pub description: Vec<String>,

    #[serde(default)]
    pub certifications: Vec<Certification>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certification {
    pub name: String,

    #[serde(default)]
    pub issuer: String,

    #[serde(default)]
    pub icon: Option<String>,

    #[serde(default)]
    pub url: Option<String>,
}

impl Certification {
    /// Icon path when one is configured and non-blank
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// URL to link the card to, only for absolute http(s) URLs
    pub fn link_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| is_web_url(url))
    }
}

/// Whether `s` is an absolute `http`/`https` URL with a host
pub fn is_web_url(s: &str) -> bool {
    let rest = if let Some(rest) = s.strip_prefix("https://") {
        rest
    } else if let Some(rest) = s.strip_prefix("http://") {
        rest
    } else {
        return false;
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    !host.is_empty() && !host.contains(char::is_whitespace)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Testimonials {
    pub title: String,

    #[serde(default)]
    pub highlight: String,
    pub items: Vec<Testimonial>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub received_from: String,

    #[serde(default)]
    pub designation: String,

    #[serde(default)]
    pub linkedin_user_name: String,
    pub message: String,
}

impl Testimonial {
    /// Up to two initials, taken from the last words of the name
    pub fn initials(&self) -> String {
        let letters: Vec<char> = self
            .received_from
            .split(' ')
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .collect();
        let skip = letters.len().saturating_sub(2);
        letters[skip..].iter().collect()
    }

    pub fn profile_url(&self) -> Option<String> {
        if self.linkedin_user_name.is_empty() {
            None
        } else {
            Some(format!(
                "https://www.linkedin.com/in/{}",
                self.linkedin_user_name
            ))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub title: String,

    #[serde(default)]
    pub highlight: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub social_links: Vec<SocialLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialLink {
    pub name: String,
    pub url: String,

    #[serde(default)]
    pub icon: String,
}

/// Labels for the static contact form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub form_fields: FormFieldLabels,
    pub submit_button: SubmitButton,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormFieldLabels {
    pub name: FieldLabel,
    pub email: FieldLabel,

    #[serde(default)]
    pub phone: Option<FieldLabel>,
    pub subject: FieldLabel,
    pub message: FieldLabel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldLabel {
    pub label: String,

    #[serde(default)]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitButton {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Footer {
    #[serde(default)]
    pub enabled: bool,
    pub text: String,
}

impl Footer {
    /// Footer text with `{year}` replaced
    pub fn render_text(&self, year: i32) -> String {
        self.text.replacen("{year}", &year.to_string(), 1)
    }
}

/// One entry of the `customSections` array
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomSection {
    pub id: String,
    pub title: String,

    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub index: Option<i64>,

    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub eyebrow: Option<String>,

    #[serde(default)]
    pub content: serde_json::Value,
}

/// Analytics beacon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tracking {
    #[serde(default)]
    pub enabled: bool,
    pub google_form: FormEndpoint,
    pub ip_services: IpServices,
    pub source_detection: SourceDetection,
}

/// Form endpoint that receives events and the field ids for each value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormEndpoint {
    #[serde(default)]
    pub enabled: bool,
    pub action_url: String,
    pub fields: FormFields,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFields {
    pub timestamp: String,
    pub event_type: String,
    pub ip_address: String,
    pub user_agent: String,
    pub country: String,
    pub additional_data: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpServices {
    pub ip_lookup: String,

    /// URL template; `{ip}` is replaced with the looked-up address
    pub geo_lookup: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDetection {
    pub ignore_param: String,
    pub ignore_value: String,

    /// Source name to referrer substring, checked in declaration order
    #[serde(default)]
    pub referrers: IndexMap<String, String>,
    pub default_source: String,
}

/// A section title split around its highlighted part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleParts<'a> {
    pub before: &'a str,
    pub highlight: &'a str,
    pub after: &'a str,
}

/// Split `title` at the first occurrence of `highlight`
///
/// An empty or missing highlight leaves the whole title in `before`.
pub fn split_highlight<'a>(title: &'a str, highlight: &str) -> TitleParts<'a> {
    match title.find(highlight).filter(|_| !highlight.is_empty()) {
        Some(start) => {
            let end = start + highlight.len();
            TitleParts {
                before: &title[..start],
                highlight: &title[start..end],
                after: &title[end..],
            }
        }
        None => TitleParts {
            before: title,
            highlight: "",
            after: "",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_highlight() {
        let parts = split_highlight("My Skills & Tools", "Skills");
        assert_eq!(parts.before, "My ");
        assert_eq!(parts.highlight, "Skills");
        assert_eq!(parts.after, " & Tools");

        let parts = split_highlight("Experience", "Missing");
        assert_eq!(parts.before, "Experience");
        assert_eq!(parts.highlight, "");

        let parts = split_highlight("Anything", "");
        assert_eq!(parts.before, "Anything");
    }

    #[test]
    fn test_publications_display_limit() {
        let json = serde_json::json!({
            "title": "Publications",
            "highlight": "Publications",
            "items": [
                {"title": "a", "url": "u"},
                {"title": "b", "url": "u"},
                {"title": "c", "url": "u"},
                {"title": "d", "url": "u"}
            ]
        });
        let publications: Publications = serde_json::from_value(json).unwrap();
        assert_eq!(publications.display_limit(), 3);
        assert_eq!(publications.displayed().len(), 3);
        assert!(publications.has_more());
        assert_eq!(publications.show_more_text(), "Show More");
        assert!(!publications.enabled);
    }

    #[test]
    fn test_testimonial_initials() {
        let t = Testimonial {
            received_from: "ada king lovelace".to_string(),
            designation: String::new(),
            linkedin_user_name: "ada".to_string(),
            message: String::new(),
        };
        assert_eq!(t.initials(), "KL");
        assert_eq!(
            t.profile_url().as_deref(),
            Some("https://www.linkedin.com/in/ada")
        );
    }

    #[test]
    fn test_certification_link_requires_web_url() {
        let mut cert = Certification {
            name: "Cert".to_string(),
            issuer: "Org".to_string(),
            icon: Some("  ".to_string()),
            url: Some("https://example.com/c/1".to_string()),
        };
        assert_eq!(cert.link_url(), Some("https://example.com/c/1"));
        assert_eq!(cert.icon(), None);

        cert.url = Some("javascript:alert(1)".to_string());
        assert_eq!(cert.link_url(), None);

        cert.url = Some("https://".to_string());
        assert_eq!(cert.link_url(), None);
    }

    #[test]
    fn test_footer_year() {
        let footer = Footer {
            enabled: true,
            text: "© {year} Jane".to_string(),
        };
        assert_eq!(footer.render_text(2026), "© 2026 Jane");
    }

    #[test]
    fn test_code_element_accepts_numbers_and_strings() {
        let el: CodeElement =
            serde_json::from_str(r#"{"text":"fn main()","x":"10","y":20,"delay":0.5}"#).unwrap();
        assert_eq!(el.x.to_string(), "10");
        assert_eq!(el.y.to_string(), "20");
        assert_eq!(el.delay.map(|d| d.to_string()).as_deref(), Some("0.5"));
    }

    #[test]
    fn test_referrers_keep_declaration_order() {
        let detection: SourceDetection = serde_json::from_str(
            r#"{"ignoreParam":"src","ignoreValue":"me","defaultSource":"direct",
                "referrers":{"zeta":"z.com","alpha":"a.com"}}"#,
        )
        .unwrap();
        let keys: Vec<&str> = detection.referrers.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }
}
