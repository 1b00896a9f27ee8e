//! HTML exporter for portfolio documents
//!
//! This module renders a composed portfolio to static HTML:
//! - `index.html` with every enabled section in resolved order
//! - `publications.html` listing every publication
//! - a terminal failure page when the document could not be loaded
//!
//! Free-text fields go through the inline markup parser. Local avatar images
//! can be embedded as data URLs (base64 encoded).

use crate::compose::{ComposeMode, SectionDescriptor, SectionKey, SectionKind};
use crate::custom::CustomContent;
use crate::document::PortfolioDocument;
use crate::icons::{IconName, IconRegistry};
use crate::markup::{self, escape_html};
use crate::model::{
    split_highlight, Achievements, Avatar, Contact, CustomSection, Education, Experience, Intro,
    Meta, Projects, Publication, Publications, Quote, Skills, SocialLink, Testimonials,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Datelike;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Message shown when the portfolio document cannot be loaded
pub const LOAD_FAILURE_MESSAGE: &str = "Failed to load data. Please try again later.";

/// File name of the full publication listing
pub const PUBLICATIONS_PAGE: &str = "publications.html";

/// Shown on the listing page when publications are turned off
pub const PUBLICATIONS_UNAVAILABLE_MESSAGE: &str =
    "Failed to load publications. Please try again later.";

/// Errors that can occur during HTML export
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Section '{section}' is malformed: {source}")]
    Section {
        section: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Image read error for {path}: {source}", path = .path.display())]
    ImageReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Rendering settings
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// How a section whose payload fails to decode is handled
    pub mode: ComposeMode,

    /// Inline local images as data URLs
    pub embed_images: bool,

    /// Directory relative image paths are resolved against
    pub asset_root: PathBuf,

    /// Substituted for `{year}` in the footer
    pub year: i32,
}

impl ExportOptions {
    pub fn new(mode: ComposeMode) -> Self {
        Self {
            mode,
            embed_images: false,
            asset_root: PathBuf::from("."),
            year: chrono::Local::now().year(),
        }
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::new(ComposeMode::default())
    }
}

/// Export the main portfolio page
///
/// # Parameters
/// * `doc` - The loaded portfolio document
/// * `sections` - Composed sections, in render order
/// * `options` - Rendering settings
/// * `output_path` - Path where the HTML file will be written
///
/// # Returns
/// * `Ok(())` - Successfully exported to HTML
/// * `Err(ExportError)` - A section was malformed in strict mode, or writing failed
pub fn to_html(
    doc: &PortfolioDocument,
    sections: &[SectionDescriptor],
    options: &ExportOptions,
    output_path: &Path,
) -> Result<(), ExportError> {
    let output = render_page(doc, sections, options)?;
    write_file(output_path, &output)
}

/// Export the publications listing page
///
/// # Returns
/// * `Ok(true)` - The page was written
/// * `Ok(false)` - The document has no publications; nothing was written
/// * `Err(ExportError)` - Publications were malformed in strict mode, or writing failed
pub fn to_publications_html(
    doc: &PortfolioDocument,
    options: &ExportOptions,
    output_path: &Path,
) -> Result<bool, ExportError> {
    match render_publications_page(doc, options)? {
        Some(output) => {
            write_file(output_path, &output)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Export the page shown when loading the document failed
pub fn to_failure_html(output_path: &Path) -> Result<(), ExportError> {
    write_file(output_path, &render_failure_page())
}

/// Render the main portfolio page to a string
pub fn render_page(
    doc: &PortfolioDocument,
    sections: &[SectionDescriptor],
    options: &ExportOptions,
) -> Result<String, ExportError> {
    let renderer = Renderer::new(doc, options);
    let meta = doc.meta();
    let mut output = String::new();

    write_html_header(&mut output, &meta);
    output.push_str("<body>\n");
    renderer.write_background(&mut output);
    renderer.write_navbar(&mut output);
    output.push_str("<main class=\"container\">\n");

    for section in sections {
        renderer.write_section(&mut output, section)?;
    }

    output.push_str("</main>\n");
    renderer.write_footer(&mut output);
    output.push_str("</body>\n");
    output.push_str("</html>\n");

    Ok(output)
}

/// Render the publications listing page; `None` when there are no publications
///
/// A disabled publications section yields a page carrying only
/// [`PUBLICATIONS_UNAVAILABLE_MESSAGE`], never the items.
pub fn render_publications_page(
    doc: &PortfolioDocument,
    options: &ExportOptions,
) -> Result<Option<String>, ExportError> {
    let renderer = Renderer::new(doc, options);
    let Some(publications) = renderer.decode::<Publications>(SectionKey::Publications)? else {
        return Ok(None);
    };

    let meta = doc.meta();
    if !publications.enabled {
        log::info!("Publications are disabled; writing the unavailable page");
        return Ok(Some(render_message_page(
            &meta,
            PUBLICATIONS_UNAVAILABLE_MESSAGE,
        )));
    }
    let mut output = String::new();
    write_html_header(&mut output, &meta);
    output.push_str("<body>\n");
    renderer.write_background(&mut output);
    output.push_str("<main class=\"container\">\n");
    output.push_str("<p class=\"back-link\"><a href=\"index.html#publications\">&larr; Back</a></p>\n");
    output.push_str("<section id=\"publications\" class=\"section\">\n");
    write_heading(&mut output, &publications.title, &publications.highlight);
    for publication in &publications.items {
        write_publication(&mut output, publication);
    }
    output.push_str("</section>\n");
    output.push_str("</main>\n");
    renderer.write_footer(&mut output);
    output.push_str("</body>\n");
    output.push_str("</html>\n");

    Ok(Some(output))
}

/// Render the terminal load-failure page
pub fn render_failure_page() -> String {
    render_message_page(
        &Meta {
            title: "Portfolio".to_string(),
            ..Meta::default()
        },
        LOAD_FAILURE_MESSAGE,
    )
}

/// A page with nothing but a centred error message
fn render_message_page(meta: &Meta, message: &str) -> String {
    let mut output = String::new();
    write_html_header(&mut output, meta);
    output.push_str("<body>\n");
    output.push_str("<main class=\"container failure\">\n");
    output.push_str(&format!(
        "<p class=\"error-message\">{}</p>\n",
        escape_html(message)
    ));
    output.push_str("</main>\n");
    output.push_str("</body>\n");
    output.push_str("</html>\n");
    output
}

fn write_file(output_path: &Path, content: &str) -> Result<(), ExportError> {
    // Write to file - create parent directories if they don't exist
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(output_path)?;
    file.write_all(content.as_bytes())?;
    log::info!("Wrote {}", output_path.display());
    Ok(())
}

/// Shared state for rendering one page
struct Renderer<'a> {
    doc: &'a PortfolioDocument,
    options: &'a ExportOptions,
    icons: IconRegistry,
}

impl<'a> Renderer<'a> {
    fn new(doc: &'a PortfolioDocument, options: &'a ExportOptions) -> Self {
        Self {
            doc,
            options,
            icons: IconRegistry::builtin(),
        }
    }

    /// Decode a fixed section, applying the strict/lenient policy
    fn decode<T: DeserializeOwned>(&self, key: SectionKey) -> Result<Option<T>, ExportError> {
        self.settle(key.anchor_id(), self.doc.section(key.json_key()))
    }

    fn settle<T>(
        &self,
        section: &str,
        result: Result<Option<T>, serde_json::Error>,
    ) -> Result<Option<T>, ExportError> {
        match result {
            Ok(value) => Ok(value),
            Err(source) => match self.options.mode {
                ComposeMode::Strict => Err(ExportError::Section {
                    section: section.to_string(),
                    source,
                }),
                ComposeMode::Lenient => {
                    log::warn!("Skipping malformed section '{}': {}", section, source);
                    Ok(None)
                }
            },
        }
    }

    fn icon(&self, name: &str) -> &str {
        self.icons.render(name).unwrap_or_default()
    }

    fn write_section(
        &self,
        output: &mut String,
        descriptor: &SectionDescriptor,
    ) -> Result<(), ExportError> {
        log::debug!("Rendering section '{}'", descriptor.id);
        match descriptor.kind {
            SectionKind::Fixed(key) => self.write_fixed(output, key),
            SectionKind::Custom(position) => {
                let section = self.settle(&descriptor.id, self.doc.custom_section(position))?;
                if let Some(section) = section {
                    self.write_custom(output, &section);
                }
                Ok(())
            }
        }
    }

    fn write_fixed(&self, output: &mut String, key: SectionKey) -> Result<(), ExportError> {
        match key {
            SectionKey::About => {
                if let Some(intro) = self.decode::<Intro>(key)? {
                    self.write_about(output, &intro);
                }
            }
            SectionKey::Skills => {
                if let Some(skills) = self.decode::<Skills>(key)? {
                    write_skills(output, &skills);
                }
            }
            SectionKey::Publications => {
                if let Some(publications) = self.decode::<Publications>(key)? {
                    write_publications(output, &publications);
                }
            }
            SectionKey::Experience => {
                if let Some(experience) = self.decode::<Experience>(key)? {
                    write_experience(output, &experience);
                }
            }
            SectionKey::Education => {
                if let Some(education) = self.decode::<Education>(key)? {
                    self.write_education(output, &education);
                }
            }
            SectionKey::Projects => {
                if let Some(projects) = self.decode::<Projects>(key)? {
                    self.write_projects(output, &projects);
                }
            }
            SectionKey::Achievements => {
                if let Some(achievements) = self.decode::<Achievements>(key)? {
                    write_achievements(output, &achievements);
                }
            }
            SectionKey::Testimonials => {
                if let Some(testimonials) = self.decode::<Testimonials>(key)? {
                    write_testimonials(output, &testimonials);
                }
            }
            SectionKey::Contact => {
                if let Some(contact) = self.decode::<Contact>(key)? {
                    self.write_contact(output, &contact);
                }
            }
            SectionKey::Quote => {
                if let Some(quote) = self.decode::<Quote>(key)? {
                    output.push_str("<section id=\"quote\" class=\"section quote\">\n");
                    output.push_str(&format!("<blockquote>{}</blockquote>\n", rich(&quote.text)));
                    output.push_str("</section>\n");
                }
            }
        }
        Ok(())
    }

    /// Floating code snippets behind the page content
    fn write_background(&self, output: &mut String) {
        let elements = self.doc.code_elements();
        if elements.is_empty() {
            return;
        }
        output.push_str("<div class=\"background\" aria-hidden=\"true\">\n");
        for element in &elements {
            let delay = element
                .delay
                .as_ref()
                .map(|d| format!(" animation-delay: {}s;", escape_html(&d.to_string())))
                .unwrap_or_default();
            output.push_str(&format!(
                "<span class=\"code-element\" style=\"left: {}%; top: {}%;{}\">{}</span>\n",
                escape_html(&element.x.to_string()),
                escape_html(&element.y.to_string()),
                delay,
                escape_html(&element.text)
            ));
        }
        output.push_str("</div>\n");
    }

    fn write_navbar(&self, output: &mut String) {
        let Some(header) = self.doc.header().filter(|h| h.enabled) else {
            return;
        };
        output.push_str("<nav class=\"navbar\">\n");
        output.push_str(&format!(
            "<a class=\"logo\" href=\"#about\">{}</a>\n",
            escape_html(&header.logo.text)
        ));
        output.push_str("<ul class=\"nav-links\">\n");
        for link in header.nav_links.iter().filter(|l| l.is_eligible()) {
            output.push_str(&format!(
                "<li><a href=\"#{}\">{}</a></li>\n",
                escape_html(&link.section),
                escape_html(&link.label)
            ));
        }
        output.push_str("</ul>\n");
        output.push_str("</nav>\n");
    }

    fn write_footer(&self, output: &mut String) {
        let Some(footer) = self.doc.footer().filter(|f| f.enabled) else {
            return;
        };
        output.push_str(&format!(
            "<footer class=\"footer\"><p>{}</p></footer>\n",
            escape_html(&footer.render_text(self.options.year))
        ));
    }

    fn write_about(&self, output: &mut String, intro: &Intro) {
        output.push_str("<section id=\"about\" class=\"section about\">\n");

        if let Some(avatar) = intro.avatar.as_ref().filter(|a| a.enabled) {
            output.push_str(&format!(
                "<img class=\"avatar\" src=\"{}\" alt=\"{}\">\n",
                escape_html(&self.image_src(avatar)),
                escape_html(&avatar.alt)
            ));
        }

        output.push_str(&format!(
            "<h1 class=\"tagline\">{}</h1>\n",
            escape_html(&intro.tagline)
        ));
        if !intro.professional.is_empty() {
            output.push_str(&format!(
                "<p class=\"professional\">{}</p>\n",
                escape_html(&intro.professional)
            ));
        }
        if !intro.description.is_empty() {
            output.push_str(&format!(
                "<p class=\"description\">{}</p>\n",
                rich(&intro.description)
            ));
        }

        if let Some(cta) = &intro.cta {
            let download = cta
                .resume_file_name
                .as_ref()
                .map(|name| format!(" download=\"{}\"", escape_html(name)))
                .unwrap_or_else(|| " download".to_string());
            output.push_str(&format!(
                "<a class=\"button\" href=\"{}\"{} data-event=\"resume_downloaded\">{}</a>\n",
                escape_html(&cta.resume_url),
                download,
                escape_html(&cta.button_text)
            ));
        }

        if let Some(contact) = self.doc.contact() {
            self.write_social_links(output, &contact.social_links);
        }

        if let Some(stats) = self.doc.stats().filter(|s| s.enabled) {
            output.push_str("<dl class=\"stats\">\n");
            for stat in &stats.items {
                output.push_str(&format!(
                    "<div class=\"stat\"><dt>{}</dt><dd>{}</dd></div>\n",
                    escape_html(&stat.value),
                    escape_html(&stat.label)
                ));
            }
            output.push_str("</dl>\n");
        }

        output.push_str("</section>\n");
    }

    /// Avatar source, inlined when embedding is enabled and the image is local
    fn image_src(&self, avatar: &Avatar) -> String {
        if !self.options.embed_images || is_remote(&avatar.image) {
            return avatar.image.clone();
        }
        let path = self
            .options
            .asset_root
            .join(avatar.image.trim_start_matches('/'));
        match embed_image(&path) {
            Ok(data_url) => data_url,
            Err(e) => {
                log::warn!("{}; linking the image instead", e);
                avatar.image.clone()
            }
        }
    }

    fn write_social_links(&self, output: &mut String, links: &[SocialLink]) {
        if links.is_empty() {
            return;
        }
        output.push_str("<div class=\"social-links\">\n");
        for link in links {
            output.push_str(&format!(
                "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" aria-label=\"{}\">{}</a>\n",
                escape_html(&link.url),
                escape_html(&link.name),
                self.icon(&link.icon)
            ));
        }
        output.push_str("</div>\n");
    }

    fn write_education(&self, output: &mut String, education: &Education) {
        output.push_str("<section id=\"education\" class=\"section\">\n");
        write_heading(output, &education.title, &education.highlight);
        for item in &education.items {
            output.push_str("<article class=\"card\">\n");
            output.push_str(&format!(
                "<h3>{}{}</h3>\n",
                self.icon(IconName::FaGraduationCap.as_str()),
                escape_html(&item.degree)
            ));
            if !item.stream.is_empty() {
                output.push_str(&format!(
                    "<p class=\"stream\">{}</p>\n",
                    escape_html(&item.stream)
                ));
            }
            output.push_str(&format!(
                "<p class=\"institute\">{}</p>\n",
                escape_html(&item.institute)
            ));
            write_meta_line(
                output,
                &[
                    item.duration.as_str(),
                    item.location.as_str(),
                    item.result.as_str(),
                ],
            );
            output.push_str("</article>\n");
        }
        output.push_str("</section>\n");
    }

    fn write_projects(&self, output: &mut String, projects: &Projects) {
        output.push_str("<section id=\"portfolio\" class=\"section\">\n");
        write_heading(output, &projects.title, &projects.highlight);
        output.push_str("<div class=\"grid\">\n");
        for project in &projects.items {
            output.push_str("<article class=\"card\">\n");
            output.push_str(&format!("<h3>{}</h3>\n", escape_html(&project.title)));
            if !project.kind.is_empty() {
                output.push_str(&format!(
                    "<span class=\"badge\">{}</span>\n",
                    escape_html(&project.kind)
                ));
            }
            output.push_str(&format!("<p>{}</p>\n", rich(&project.description)));
            write_tags(output, &project.technologies);
            if let Some(link) = project.github_link.as_deref().filter(|l| !l.is_empty()) {
                output.push_str(&format!(
                    "<a class=\"icon-link\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{} Source</a>\n",
                    escape_html(link),
                    self.icon(IconName::FiGithub.as_str())
                ));
            }
            output.push_str("</article>\n");
        }
        output.push_str("</div>\n");
        output.push_str("</section>\n");
    }

    fn write_contact(&self, output: &mut String, contact: &Contact) {
        output.push_str("<section id=\"contact\" class=\"section contact\">\n");
        write_heading(output, &contact.title, &contact.highlight);

        if !contact.email.is_empty() {
            output.push_str(&format!(
                "<p class=\"icon-link\">{}<a href=\"mailto:{}\">{}</a></p>\n",
                self.icon(IconName::FiMail.as_str()),
                escape_html(&contact.email),
                escape_html(&contact.email)
            ));
        }
        if !contact.location.is_empty() {
            output.push_str(&format!(
                "<p class=\"location\">{}</p>\n",
                escape_html(&contact.location)
            ));
        }
        self.write_social_links(output, &contact.social_links);

        if let Some(form) = self.doc.contact_form() {
            let labels = &form.form_fields;
            output.push_str("<form class=\"contact-form\">\n");
            write_form_field(output, "name", "text", &labels.name);
            write_form_field(output, "email", "email", &labels.email);
            if let Some(phone) = &labels.phone {
                write_form_field(output, "phone", "tel", phone);
            }
            write_form_field(output, "subject", "text", &labels.subject);
            output.push_str(&format!(
                "<label>{}<textarea name=\"message\" placeholder=\"{}\"></textarea></label>\n",
                escape_html(&labels.message.label),
                escape_html(labels.message.placeholder.as_deref().unwrap_or_default())
            ));
            output.push_str(&format!(
                "<button type=\"submit\">{}</button>\n",
                escape_html(&form.submit_button.text)
            ));
            output.push_str("</form>\n");
        }

        output.push_str("</section>\n");
    }

    fn write_custom(&self, output: &mut String, section: &CustomSection) {
        let content = CustomContent::from_section(section);
        log::debug!(
            "Custom section '{}' uses the {} layout",
            section.id,
            content.layout()
        );

        output.push_str(&format!(
            "<section id=\"{}\" class=\"section custom custom-{}\">\n",
            escape_html(&section.id),
            content.layout()
        ));

        if let CustomContent::Newsletter(newsletter) = &content {
            output.push_str(&format!(
                "<p class=\"eyebrow\">{}</p>\n",
                escape_html(&newsletter.eyebrow)
            ));
            output.push_str(&format!(
                "<h2 class=\"section-title\">{}</h2>\n",
                escape_html(&newsletter.heading)
            ));
            if let Some(subcopy) = &newsletter.subcopy {
                output.push_str(&format!(
                    "<p class=\"description\">{}</p>\n",
                    escape_html(subcopy)
                ));
            }
            if let Some(pitch) = &newsletter.pitch {
                output.push_str(&format!("<p class=\"pitch\">{}</p>\n", rich(pitch)));
            }
            if !newsletter.stats.is_empty() {
                output.push_str("<dl class=\"stats\">\n");
                for stat in &newsletter.stats {
                    output.push_str(&format!(
                        "<div class=\"stat\"><dt>{}</dt><dd>{}</dd></div>\n",
                        escape_html(&stat.value),
                        escape_html(&stat.label)
                    ));
                }
                output.push_str("</dl>\n");
            }
            output.push_str(&format!(
                "<form class=\"newsletter\" action=\"{}\" method=\"get\"><input type=\"email\" name=\"email\" placeholder=\"{}\"><button type=\"submit\">{}</button></form>\n",
                escape_html(&newsletter.cta_url),
                escape_html(&newsletter.placeholder),
                escape_html(&newsletter.cta_label)
            ));
            if let Some(note) = &newsletter.note {
                output.push_str(&format!("<p class=\"note\">{}</p>\n", rich(note)));
            }
            output.push_str("</section>\n");
            return;
        }

        output.push_str(&format!(
            "<h2 class=\"section-title\">{}</h2>\n",
            escape_html(&section.title)
        ));

        match &content {
            CustomContent::Button(button) => {
                output.push_str(&format!(
                    "<p class=\"description\">{}</p>\n",
                    rich(&button.description)
                ));
                match &button.url {
                    Some(url) => output.push_str(&format!(
                        "<a class=\"button\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>\n",
                        escape_html(url),
                        escape_html(&button.label)
                    )),
                    None => output.push_str(&format!(
                        "<span class=\"button disabled\">{}</span>\n",
                        escape_html(&button.label)
                    )),
                }
            }
            other => {
                if let Some(description) = &section.description {
                    output.push_str(&format!(
                        "<p class=\"description\">{}</p>\n",
                        rich(description)
                    ));
                }
                write_custom_body(output, other);
            }
        }

        output.push_str("</section>\n");
    }
}

fn write_custom_body(output: &mut String, content: &CustomContent) {
    match content {
        CustomContent::Info(items) => {
            output.push_str("<ul class=\"info-list\">\n");
            for item in items {
                output.push_str(&format!("<li>{}</li>\n", rich(item)));
            }
            output.push_str("</ul>\n");
        }
        CustomContent::Links(links) => {
            output.push_str("<div class=\"grid\">\n");
            for link in links {
                output.push_str(&format!(
                    "<a class=\"card link-card\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">\n",
                    escape_html(&link.url)
                ));
                output.push_str(&format!("<h3>{}</h3>\n", escape_html(&link.label)));
                if let Some(description) = &link.description {
                    output.push_str(&format!("<p>{}</p>\n", escape_html(description)));
                }
                output.push_str("</a>\n");
            }
            output.push_str("</div>\n");
        }
        CustomContent::Raw(value) => {
            let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
            output.push_str(&format!("<pre class=\"raw\">{}</pre>\n", escape_html(&pretty)));
        }
        CustomContent::Button(_) | CustomContent::Newsletter(_) => {}
    }
}

/// Write HTML header with CSS styling
fn write_html_header(output: &mut String, meta: &Meta) {
    output.push_str("<!DOCTYPE html>\n");
    output.push_str("<html lang=\"en\">\n");
    output.push_str("<head>\n");
    output.push_str("<meta charset=\"UTF-8\">\n");
    output.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    output.push_str(&format!("<title>{}</title>\n", escape_html(&meta.title)));
    if !meta.description.is_empty() {
        output.push_str(&format!(
            "<meta name=\"description\" content=\"{}\">\n",
            escape_html(&meta.description)
        ));
    }
    if let Some(favicon) = &meta.favicon {
        output.push_str(&format!(
            "<link rel=\"icon\" href=\"{}\">\n",
            escape_html(favicon)
        ));
    }
    output.push_str("<style>\n");
    output.push_str(CSS_STYLES);
    output.push_str("</style>\n");
    output.push_str("</head>\n");
}

/// Section title with the highlighted part wrapped in a span
fn write_heading(output: &mut String, title: &str, highlight: &str) {
    let parts = split_highlight(title, highlight);
    output.push_str(&format!(
        "<h2 class=\"section-title\">{}<span class=\"highlight\">{}</span>{}</h2>\n",
        escape_html(parts.before),
        escape_html(parts.highlight),
        escape_html(parts.after)
    ));
}

fn write_skills(output: &mut String, skills: &Skills) {
    output.push_str("<section id=\"skills\" class=\"section\">\n");
    write_heading(output, &skills.title, &skills.highlight);
    output.push_str("<div class=\"grid\">\n");
    for category in &skills.categories {
        output.push_str("<article class=\"card\">\n");
        let parts = split_highlight(&category.name, &category.highlight);
        output.push_str(&format!(
            "<h3>{}<span class=\"highlight\">{}</span>{}</h3>\n",
            escape_html(parts.before),
            escape_html(parts.highlight),
            escape_html(parts.after)
        ));
        write_tags(output, &category.items);
        output.push_str("</article>\n");
    }
    output.push_str("</div>\n");
    output.push_str("</section>\n");
}

fn write_publications(output: &mut String, publications: &Publications) {
    output.push_str("<section id=\"publications\" class=\"section\">\n");
    write_heading(output, &publications.title, &publications.highlight);
    for publication in publications.displayed() {
        write_publication(output, publication);
    }
    if publications.has_more() {
        output.push_str(&format!(
            "<p class=\"show-more\"><a href=\"{}\">{}</a></p>\n",
            PUBLICATIONS_PAGE,
            escape_html(publications.show_more_text())
        ));
    }
    output.push_str("</section>\n");
}

fn write_publication(output: &mut String, publication: &Publication) {
    output.push_str("<article class=\"card publication\">\n");
    if let Some(image) = publication.image.as_deref().filter(|i| !i.is_empty()) {
        output.push_str(&format!(
            "<img class=\"thumbnail\" src=\"{}\" alt=\"{}\">\n",
            escape_html(image),
            escape_html(&publication.title)
        ));
    }
    output.push_str(&format!(
        "<h3><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a></h3>\n",
        escape_html(&publication.url),
        escape_html(&publication.title)
    ));
    if !publication.kind.is_empty() {
        output.push_str(&format!(
            "<span class=\"badge\">{}</span>\n",
            escape_html(&publication.kind)
        ));
    }
    if let Some(authors) = publication.authors.as_deref().filter(|a| !a.is_empty()) {
        output.push_str(&format!(
            "<p class=\"authors\">{}</p>\n",
            escape_html(authors)
        ));
    }
    output.push_str(&format!("<p>{}</p>\n", rich(&publication.description)));
    write_tags(output, &publication.tags);
    write_meta_line(
        output,
        &[publication.platform.as_str(), publication.date.as_str()],
    );
    output.push_str("</article>\n");
}

fn write_experience(output: &mut String, experience: &Experience) {
    output.push_str("<section id=\"experience\" class=\"section\">\n");
    write_heading(output, &experience.title, &experience.highlight);
    output.push_str("<ol class=\"timeline\">\n");
    for item in &experience.items {
        output.push_str("<li class=\"card\">\n");
        output.push_str(&format!("<h3>{}</h3>\n", escape_html(&item.title)));
        write_meta_line(
            output,
            &[
                item.company.as_str(),
                item.period.as_str(),
                item.location.as_str(),
            ],
        );
        if !item.description.is_empty() {
            output.push_str("<ul>\n");
            for line in &item.description {
                output.push_str(&format!("<li>{}</li>\n", rich(line)));
            }
            output.push_str("</ul>\n");
        }
        write_tags(output, &item.tags);
        output.push_str("</li>\n");
    }
    output.push_str("</ol>\n");
    output.push_str("</section>\n");
}

fn write_achievements(output: &mut String, achievements: &Achievements) {
    output.push_str("<section id=\"achievements\" class=\"section\">\n");
    write_heading(output, &achievements.title, &achievements.highlight);
    if !achievements.description.is_empty() {
        output.push_str("<ul class=\"achievement-list\">\n");
        for line in &achievements.description {
            output.push_str(&format!("<li>{}</li>\n", rich(line)));
        }
        output.push_str("</ul>\n");
    }
    if !achievements.certifications.is_empty() {
        output.push_str("<div class=\"grid\">\n");
        for cert in &achievements.certifications {
            let (open, close) = match cert.link_url() {
                Some(url) => (
                    format!(
                        "<a class=\"card certification\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">",
                        escape_html(url)
                    ),
                    "</a>",
                ),
                None => ("<div class=\"card certification\">".to_string(), "</div>"),
            };
            output.push_str(&open);
            match cert.icon() {
                Some(icon) => output.push_str(&format!(
                    "<img class=\"cert-icon\" src=\"{}\" alt=\"{}\">",
                    escape_html(icon),
                    escape_html(&cert.name)
                )),
                None => output.push_str(DEFAULT_CERTIFICATE_ICON),
            }
            output.push_str(&format!(
                "<h3>{}</h3><p>{}</p>{}\n",
                escape_html(&cert.name),
                escape_html(&cert.issuer),
                close
            ));
        }
        output.push_str("</div>\n");
    }
    output.push_str("</section>\n");
}

fn write_testimonials(output: &mut String, testimonials: &Testimonials) {
    output.push_str("<section id=\"testimonials\" class=\"section\">\n");
    write_heading(output, &testimonials.title, &testimonials.highlight);
    output.push_str("<div class=\"grid\">\n");
    for item in &testimonials.items {
        output.push_str("<figure class=\"card testimonial\">\n");
        output.push_str(&format!("<blockquote>{}</blockquote>\n", rich(&item.message)));
        output.push_str("<figcaption>");
        output.push_str(&format!(
            "<span class=\"initials\">{}</span>",
            escape_html(&item.initials())
        ));
        match item.profile_url() {
            Some(url) => output.push_str(&format!(
                "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                escape_html(&url),
                escape_html(&item.received_from)
            )),
            None => output.push_str(&escape_html(&item.received_from)),
        }
        if !item.designation.is_empty() {
            output.push_str(&format!(
                " <span class=\"designation\">{}</span>",
                escape_html(&item.designation)
            ));
        }
        output.push_str("</figcaption>\n");
        output.push_str("</figure>\n");
    }
    output.push_str("</div>\n");
    output.push_str("</section>\n");
}

fn write_tags(output: &mut String, tags: &[String]) {
    if tags.is_empty() {
        return;
    }
    output.push_str("<ul class=\"tags\">");
    for tag in tags {
        output.push_str(&format!("<li>{}</li>", escape_html(tag)));
    }
    output.push_str("</ul>\n");
}

/// Non-empty values joined with a separator
fn write_meta_line(output: &mut String, values: &[&str]) {
    let values: Vec<String> = values
        .iter()
        .filter(|v| !v.is_empty())
        .map(|v| escape_html(v))
        .collect();
    if !values.is_empty() {
        output.push_str(&format!("<p class=\"meta\">{}</p>\n", values.join(" &bull; ")));
    }
}

fn write_form_field(
    output: &mut String,
    name: &str,
    input_type: &str,
    field: &crate::model::FieldLabel,
) {
    output.push_str(&format!(
        "<label>{}<input type=\"{}\" name=\"{}\" placeholder=\"{}\"></label>\n",
        escape_html(&field.label),
        input_type,
        name,
        escape_html(field.placeholder.as_deref().unwrap_or_default())
    ));
}

/// Authored text rendered through the inline markup parser
fn rich(text: &str) -> String {
    markup::to_html(&markup::parse(text))
}

fn is_remote(src: &str) -> bool {
    let lower = src.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("data:")
}

/// Read a local image and encode it as a data URL
fn embed_image(path: &Path) -> Result<String, ExportError> {
    let data = fs::read(path).map_err(|e| ExportError::ImageReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let mime_type = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    };

    Ok(format!("data:{};base64,{}", mime_type, STANDARD.encode(&data)))
}

const DEFAULT_CERTIFICATE_ICON: &str = r#"<svg class="cert-icon" width="40" height="40" viewBox="0 0 40 40" fill="none"><path d="M8 6C6.9 6 6 6.9 6 8V32C6 33.1 6.9 34 8 34H32C33.1 34 34 33.1 34 32V8C34 6.9 33.1 6 32 6H8Z" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"/><path d="M12 14H28M12 20H28M12 26H20" stroke="currentColor" stroke-width="2" stroke-linecap="round"/><circle cx="30" cy="10" r="3" fill="currentColor"/></svg>"#;

/// Dark theme with a purple accent
const CSS_STYLES: &str = r#"
* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Roboto', 'Oxygen',
                 'Ubuntu', 'Cantarell', 'Fira Sans', 'Droid Sans', 'Helvetica Neue',
                 sans-serif;
    line-height: 1.6;
    color: #e5e7eb;
    background-color: #111827;
}

a {
    color: #c084fc;
    text-decoration: none;
}

a:hover {
    color: #d8b4fe;
}

.container {
    position: relative;
    max-width: 1100px;
    margin: 0 auto;
    padding: 40px 24px;
}

.background {
    position: fixed;
    inset: 0;
    overflow: hidden;
    pointer-events: none;
    z-index: -1;
}

.code-element {
    position: absolute;
    font-family: 'SF Mono', Monaco, 'Cascadia Code', 'Courier New', monospace;
    font-size: 0.85em;
    color: rgba(192, 132, 252, 0.15);
    animation: float 12s ease-in-out infinite;
}

@keyframes float {
    0%, 100% { transform: translateY(0); }
    50% { transform: translateY(-20px); }
}

.navbar {
    position: sticky;
    top: 0;
    display: flex;
    justify-content: space-between;
    align-items: center;
    padding: 16px 24px;
    background: rgba(17, 24, 39, 0.9);
    border-bottom: 1px solid #374151;
    z-index: 10;
}

.logo {
    font-weight: 700;
    font-size: 1.2em;
}

.nav-links {
    display: flex;
    gap: 20px;
    list-style: none;
}

.nav-links a {
    color: #d1d5db;
}

.section {
    padding: 60px 0;
}

.section-title {
    font-size: 2em;
    font-weight: 700;
    text-align: center;
    margin-bottom: 32px;
}

.highlight {
    color: #c084fc;
}

.about {
    text-align: center;
}

.avatar {
    width: 160px;
    height: 160px;
    border-radius: 50%;
    object-fit: cover;
    border: 3px solid #a855f7;
    margin-bottom: 20px;
}

.tagline {
    font-size: 2.5em;
    font-weight: 700;
}

.professional {
    font-size: 1.3em;
    color: #c084fc;
    margin-bottom: 16px;
}

.description {
    max-width: 720px;
    margin: 0 auto 20px;
    color: #d1d5db;
}

.button {
    display: inline-block;
    padding: 10px 24px;
    border-radius: 8px;
    background: #9333ea;
    color: white;
    font-weight: 600;
}

.button.disabled {
    background: #4b5563;
}

.social-links {
    display: flex;
    justify-content: center;
    gap: 16px;
    margin: 20px 0;
}

.icon {
    vertical-align: middle;
    margin-right: 6px;
}

.stats {
    display: flex;
    justify-content: center;
    gap: 40px;
    margin-top: 24px;
}

.stat dt {
    font-size: 1.8em;
    font-weight: 700;
    color: #c084fc;
}

.stat dd {
    color: #9ca3af;
}

.grid {
    display: grid;
    grid-template-columns: repeat(auto-fill, minmax(300px, 1fr));
    gap: 20px;
}

.card {
    display: block;
    background: rgba(31, 41, 55, 0.5);
    border: 1px solid #374151;
    border-radius: 12px;
    padding: 20px;
    margin-bottom: 16px;
    color: inherit;
}

.card:hover {
    border-color: #a855f7;
}

.card h3 {
    font-size: 1.15em;
    margin-bottom: 8px;
}

.badge {
    display: inline-block;
    font-size: 0.75em;
    text-transform: uppercase;
    letter-spacing: 0.05em;
    color: #9ca3af;
    background: #1f2937;
    padding: 2px 10px;
    border-radius: 999px;
    margin-bottom: 8px;
}

.tags {
    display: flex;
    flex-wrap: wrap;
    gap: 8px;
    list-style: none;
    margin: 12px 0;
}

.tags li {
    font-size: 0.8em;
    background: rgba(88, 28, 135, 0.3);
    color: #e9d5ff;
    padding: 2px 10px;
    border-radius: 999px;
}

.meta {
    font-size: 0.85em;
    color: #9ca3af;
}

.timeline {
    list-style: none;
}

.timeline ul,
.achievement-list,
.info-list {
    margin: 12px 0 12px 20px;
}

.thumbnail {
    float: right;
    width: 120px;
    height: 80px;
    object-fit: contain;
    margin-left: 16px;
}

.show-more {
    text-align: right;
}

.cert-icon {
    width: 40px;
    height: 40px;
    color: #c084fc;
    margin-bottom: 12px;
}

.testimonial blockquote {
    font-style: italic;
    margin-bottom: 16px;
}

.initials {
    display: inline-flex;
    justify-content: center;
    align-items: center;
    width: 40px;
    height: 40px;
    border-radius: 50%;
    background: #7e22ce;
    color: white;
    font-weight: 700;
    margin-right: 10px;
}

.designation {
    color: #9ca3af;
    font-size: 0.9em;
}

.contact-form {
    display: grid;
    gap: 16px;
    max-width: 600px;
    margin: 24px auto 0;
}

.contact-form label {
    display: grid;
    gap: 6px;
}

input,
textarea {
    background: #1f2937;
    border: 1px solid #374151;
    border-radius: 8px;
    padding: 10px;
    color: inherit;
    font: inherit;
}

button {
    padding: 10px 24px;
    border: none;
    border-radius: 8px;
    background: #9333ea;
    color: white;
    font-weight: 600;
    cursor: pointer;
}

.quote blockquote {
    font-size: 1.5em;
    font-style: italic;
    text-align: center;
    max-width: 800px;
    margin: 0 auto;
}

.eyebrow {
    text-align: center;
    text-transform: uppercase;
    letter-spacing: 0.1em;
    color: #c084fc;
}

.newsletter {
    display: flex;
    justify-content: center;
    gap: 8px;
    margin-top: 20px;
}

.note,
.pitch {
    text-align: center;
    color: #9ca3af;
}

pre.raw {
    font-family: 'SF Mono', Monaco, 'Cascadia Code', 'Courier New', monospace;
    background: #1f2937;
    padding: 16px;
    border-radius: 8px;
    overflow-x: auto;
}

.footer {
    text-align: center;
    padding: 24px;
    color: #6b7280;
    border-top: 1px solid #374151;
}

.failure {
    display: flex;
    justify-content: center;
    align-items: center;
    min-height: 100vh;
}

.error-message {
    color: #f87171;
    font-size: 1.2em;
}

@media (max-width: 768px) {
    .nav-links {
        display: none;
    }

    .tagline {
        font-size: 1.8em;
    }

    .stats {
        gap: 20px;
    }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::compose_sections;
    use serde_json::json;

    fn render(value: serde_json::Value, mode: ComposeMode) -> Result<String, ExportError> {
        let doc = PortfolioDocument::new(value);
        let sections = compose_sections(&doc, mode).unwrap();
        let mut options = ExportOptions::new(mode);
        options.year = 2024;
        render_page(&doc, &sections, &options)
    }

    #[test]
    fn test_sections_render_in_composed_order() {
        let html = render(
            json!({
                "meta": {"title": "Jane"},
                "quote": {"enabled": true, "index": 0, "text": "<i>Ship it</i>"},
                "intro": {"enabled": true, "index": 5, "tagline": "Hi, I'm Jane"}
            }),
            ComposeMode::Lenient,
        )
        .unwrap();

        let quote = html.find("id=\"quote\"").unwrap();
        let about = html.find("id=\"about\"").unwrap();
        assert!(quote < about);
        assert!(html.contains("<blockquote><em>Ship it</em></blockquote>"));
        assert!(html.contains("<title>Jane</title>"));
    }

    #[test]
    fn test_markup_is_applied_to_descriptions() {
        let html = render(
            json!({
                "achievements": {
                    "enabled": true,
                    "title": "Achievements",
                    "highlight": "",
                    "description": ["Won <b>first</b> place\\nSee (post)[https://x.dev]"]
                }
            }),
            ComposeMode::Lenient,
        )
        .unwrap();

        assert!(html.contains("<strong>first</strong>"));
        assert!(html.contains("<br>"));
        assert!(html.contains("href=\"https://x.dev\""));
    }

    #[test]
    fn test_publications_show_more_link() {
        let items: Vec<_> = (0..5)
            .map(|i| json!({"title": format!("Post {}", i), "description": "", "url": "#"}))
            .collect();
        let html = render(
            json!({"publications": {"enabled": true, "title": "Publications", "items": items}}),
            ComposeMode::Lenient,
        )
        .unwrap();

        assert!(html.contains("Post 2"));
        assert!(!html.contains("Post 3"));
        assert!(html.contains("<a href=\"publications.html\">Show More</a>"));
    }

    #[test]
    fn test_malformed_section_strict_vs_lenient() {
        let value = json!({
            "skills": {"enabled": true, "title": 42},
            "quote": {"enabled": true, "text": "still here"}
        });

        let html = render(value.clone(), ComposeMode::Lenient).unwrap();
        assert!(!html.contains("id=\"skills\""));
        assert!(html.contains("still here"));

        let err = render(value, ComposeMode::Strict).unwrap_err();
        assert!(matches!(err, ExportError::Section { ref section, .. } if section == "skills"));
    }

    #[test]
    fn test_navbar_footer_and_icons() {
        let html = render(
            json!({
                "header": {
                    "enabled": true,
                    "logo": {"text": "JD"},
                    "navLinks": [
                        {"label": "About", "section": "about", "navEligibleForDesktop": true},
                        {"label": "Hidden", "section": "x"}
                    ]
                },
                "footer": {"enabled": true, "text": "(c) {year} Jane"},
                "contact": {
                    "enabled": true,
                    "title": "Contact",
                    "email": "jane@x.dev",
                    "socialLinks": [
                        {"name": "GitHub", "url": "https://github.com/jane", "icon": "FiGithub"},
                        {"name": "Other", "url": "https://other.dev", "icon": "FiNope"}
                    ]
                }
            }),
            ComposeMode::Lenient,
        )
        .unwrap();

        assert!(html.contains("<a href=\"#about\">About</a>"));
        assert!(!html.contains("Hidden"));
        assert!(html.contains("(c) 2024 Jane"));
        assert!(html.contains("<title>GitHub</title>"));
        assert!(html.contains("aria-label=\"Other\"></a>"));
        assert!(html.contains("mailto:jane@x.dev"));
    }

    #[test]
    fn test_custom_sections_render() {
        let html = render(
            json!({
                "customSections": [
                    {"id": "now", "title": "Now", "enabled": true, "type": "info",
                     "content": {"list": ["Writing <u>a book</u>"]}},
                    {"id": "misc", "title": "Misc", "enabled": true, "type": "mystery",
                     "content": {"a": "<b>"}}
                ]
            }),
            ComposeMode::Lenient,
        )
        .unwrap();

        assert!(html.contains("<li>Writing <u>a book</u></li>"));
        assert!(html.contains("id=\"misc\""));
        assert!(html.contains("&quot;a&quot;: &quot;&lt;b&gt;&quot;"));
    }

    #[test]
    fn test_failure_page_message() {
        let html = render_failure_page();
        assert!(html.contains(LOAD_FAILURE_MESSAGE));
    }

    #[test]
    fn test_publications_page_lists_everything() {
        let items: Vec<_> = (0..5)
            .map(|i| json!({"title": format!("Post {}", i), "description": "", "url": "#"}))
            .collect();
        let doc = PortfolioDocument::new(json!({
            "publications": {"enabled": true, "title": "Publications", "items": items}
        }));
        let html = render_publications_page(&doc, &ExportOptions::default())
            .unwrap()
            .unwrap();
        assert!(html.contains("Post 4"));

        let empty = PortfolioDocument::new(json!({}));
        assert!(render_publications_page(&empty, &ExportOptions::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_disabled_publications_page_shows_message() {
        let doc = PortfolioDocument::new(json!({
            "publications": {
                "enabled": false,
                "title": "Publications",
                "items": [{"title": "Secret Draft", "description": "", "url": "#"}]
            }
        }));
        let html = render_publications_page(&doc, &ExportOptions::default())
            .unwrap()
            .unwrap();
        assert!(html.contains(PUBLICATIONS_UNAVAILABLE_MESSAGE));
        assert!(!html.contains("Secret Draft"));
    }

    #[test]
    fn test_background_positions_are_percentages() {
        let html = render(
            json!({
                "codeElements": [
                    {"text": "fn", "x": 10, "y": 20},
                    {"text": "let", "x": "35", "y": "5", "delay": 1}
                ]
            }),
            ComposeMode::Lenient,
        )
        .unwrap();

        assert!(html.contains("style=\"left: 10%; top: 20%;\">fn</span>"));
        assert!(html.contains("style=\"left: 35%; top: 5%; animation-delay: 1s;\">let</span>"));
    }

    #[test]
    fn test_newsletter_subcopy_and_link_descriptions_are_plain() {
        let html = render(
            json!({
                "customSections": [
                    {"id": "letters", "title": "Letters", "enabled": true, "type": "newsletter",
                     "content": {"newsletter": {"subcopy": "Monthly <b>notes</b>"}}},
                    {"id": "elsewhere", "title": "Elsewhere", "enabled": true, "type": "links",
                     "content": {"links": [
                         {"label": "Blog", "url": "https://x.dev", "description": "My <i>blog</i>"}
                     ]}}
                ]
            }),
            ComposeMode::Lenient,
        )
        .unwrap();

        assert!(html.contains("Monthly &lt;b&gt;notes&lt;/b&gt;"));
        assert!(!html.contains("<strong>notes</strong>"));
        assert!(html.contains("<p>My &lt;i&gt;blog&lt;/i&gt;</p>"));
    }

    #[test]
    fn test_embed_image_data_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("me.png");
        fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let data_url = embed_image(&path).unwrap();
        assert!(data_url.starts_with("data:image/png;base64,"));

        let missing = embed_image(&dir.path().join("gone.jpg"));
        assert!(matches!(missing, Err(ExportError::ImageReadError { .. })));
    }
}
