//! Icon registry for social and education links
//!
//! Documents refer to icons by symbolic name (`"FiGithub"`, `"SiLeetcode"`,
//! ...). The registry maps the closed set of known names to inline SVG. An
//! unknown name renders nothing.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Known icon names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconName {
    FiGithub,
    FiLinkedin,
    FiTwitter,
    FiMail,
    SiLeetcode,
    SiStackoverflow,
    SiMedium,
    FaGraduationCap,
    FaKaggle,
    FaDev,
}

impl IconName {
    pub const ALL: [IconName; 10] = [
        IconName::FiGithub,
        IconName::FiLinkedin,
        IconName::FiTwitter,
        IconName::FiMail,
        IconName::SiLeetcode,
        IconName::SiStackoverflow,
        IconName::SiMedium,
        IconName::FaGraduationCap,
        IconName::FaKaggle,
        IconName::FaDev,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IconName::FiGithub => "FiGithub",
            IconName::FiLinkedin => "FiLinkedin",
            IconName::FiTwitter => "FiTwitter",
            IconName::FiMail => "FiMail",
            IconName::SiLeetcode => "SiLeetcode",
            IconName::SiStackoverflow => "SiStackoverflow",
            IconName::SiMedium => "SiMedium",
            IconName::FaGraduationCap => "FaGraduationCap",
            IconName::FaKaggle => "FaKaggle",
            IconName::FaDev => "FaDev",
        }
    }

    /// Human-readable name, used as the SVG title
    fn title(self) -> &'static str {
        match self {
            IconName::FiGithub => "GitHub",
            IconName::FiLinkedin => "LinkedIn",
            IconName::FiTwitter => "Twitter",
            IconName::FiMail => "Email",
            IconName::SiLeetcode => "LeetCode",
            IconName::SiStackoverflow => "Stack Overflow",
            IconName::SiMedium => "Medium",
            IconName::FaGraduationCap => "Education",
            IconName::FaKaggle => "Kaggle",
            IconName::FaDev => "DEV",
        }
    }

    /// Stroke outline for line icons, or `None` for monogram badges
    fn outline(self) -> Option<&'static str> {
        match self {
            IconName::FiGithub => Some(
                "<path d=\"M9 19c-5 1.5-5-2.5-7-3m14 6v-3.87a3.37 3.37 0 0 0-.94-2.61c3.14-.35 6.44-1.54 6.44-7A5.44 5.44 0 0 0 20 4.77 5.07 5.07 0 0 0 19.91 1S18.73.65 16 2.48a13.38 13.38 0 0 0-7 0C6.27.65 5.09 1 5.09 1A5.07 5.07 0 0 0 5 4.77a5.44 5.44 0 0 0-1.5 3.78c0 5.42 3.3 6.61 6.44 7A3.37 3.37 0 0 0 9 18.13V22\"/>",
            ),
            IconName::FiLinkedin => Some(
                "<path d=\"M16 8a6 6 0 0 1 6 6v7h-4v-7a2 2 0 0 0-4 0v7h-4v-7a6 6 0 0 1 6-6z\"/><rect x=\"2\" y=\"9\" width=\"4\" height=\"12\"/><circle cx=\"4\" cy=\"4\" r=\"2\"/>",
            ),
            IconName::FiTwitter => Some(
                "<path d=\"M23 3a10.9 10.9 0 0 1-3.14 1.53 4.48 4.48 0 0 0-7.86 3v1A10.66 10.66 0 0 1 3 4s-4 9 5 13a11.64 11.64 0 0 1-7 2c9 5 20 0 20-11.5a4.5 4.5 0 0 0-.08-.83A7.72 7.72 0 0 0 23 3z\"/>",
            ),
            IconName::FiMail => Some(
                "<path d=\"M4 4h16c1.1 0 2 .9 2 2v12c0 1.1-.9 2-2 2H4c-1.1 0-2-.9-2-2V6c0-1.1.9-2 2-2z\"/><polyline points=\"22,6 12,13 2,6\"/>",
            ),
            IconName::FaGraduationCap => Some(
                "<path d=\"M22 10 12 5 2 10l10 5 10-5z\"/><path d=\"M6 12v5c3 2 9 2 12 0v-5\"/>",
            ),
            _ => None,
        }
    }

    /// Short text for monogram badges
    fn monogram(self) -> &'static str {
        match self {
            IconName::SiLeetcode => "LC",
            IconName::SiStackoverflow => "SO",
            IconName::SiMedium => "M",
            IconName::FaKaggle => "k",
            IconName::FaDev => "DEV",
            _ => "",
        }
    }

    fn to_svg(self) -> String {
        let body = match self.outline() {
            Some(outline) => outline.to_string(),
            None => format!(
                "<rect x=\"1\" y=\"1\" width=\"22\" height=\"22\" rx=\"5\"/><text x=\"12\" y=\"16\" text-anchor=\"middle\" font-size=\"9\" fill=\"currentColor\" stroke=\"none\">{}</text>",
                self.monogram()
            ),
        };
        format!(
            "<svg class=\"icon\" viewBox=\"0 0 24 24\" width=\"20\" height=\"20\" fill=\"none\" stroke=\"currentColor\" stroke-width=\"2\" stroke-linecap=\"round\" stroke-linejoin=\"round\" role=\"img\"><title>{}</title>{}</svg>",
            self.title(),
            body
        )
    }
}

impl fmt::Display for IconName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IconName {
    type Err = UnknownIcon;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IconName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownIcon(s.to_string()))
    }
}

/// An icon name outside the known set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown icon '{0}'")]
pub struct UnknownIcon(pub String);

/// Icon name to rendered SVG
#[derive(Debug, Clone)]
pub struct IconRegistry {
    icons: HashMap<IconName, String>,
}

impl IconRegistry {
    /// Registry with every built-in icon
    pub fn builtin() -> Self {
        let icons = IconName::ALL
            .into_iter()
            .map(|name| (name, name.to_svg()))
            .collect();
        Self { icons }
    }

    /// SVG markup for a symbolic name; `None` when the name is unknown
    pub fn render(&self, key: &str) -> Option<&str> {
        let name = match key.parse::<IconName>() {
            Ok(name) => name,
            Err(e) => {
                log::debug!("{}", e);
                return None;
            }
        };
        self.icons.get(&name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

impl Default for IconRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
