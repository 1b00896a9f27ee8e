//! Visit and download analytics beacon
//!
//! Events are submitted as a form POST to the endpoint configured under
//! `tracking.googleForm`. Recording is best effort: [`Beacon::record_event`]
//! logs failures and never returns an error, and a visit is recorded at most
//! once per [`SessionContext`].

use crate::model::{SourceDetection, Tracking};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Kind of event being reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EventKind {
    /// A page view
    Visit,
    /// A resume download
    Download,
}

impl EventKind {
    /// Value submitted in the event type field
    pub fn wire_name(self) -> &'static str {
        match self {
            EventKind::Visit => "page_visited",
            EventKind::Download => "resume_downloaded",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

/// Per-session state owned by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Whether a visit has already been reported in this session
    #[serde(default)]
    pub visit_recorded: bool,
}

impl SessionContext {
    /// Load session state; a missing file is a fresh session
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, BeaconError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| BeaconError::Session(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| BeaconError::Session(format!("{}: {}", path.display(), e)))
    }

    /// Persist session state
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), BeaconError> {
        let path = path.as_ref();
        let content =
            toml::to_string_pretty(self).map_err(|e| BeaconError::Session(e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| BeaconError::Session(format!("{}: {}", path.display(), e)))
    }
}

/// What the visitor's browser would report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitContext {
    /// Value of the configured source query parameter
    pub source_param: Option<String>,
    /// Referring page
    pub referrer: Option<String>,
    pub user_agent: String,
}

/// Errors raised while submitting an event
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BeaconError {
    #[error("Request to {url} failed with status {status}")]
    Http { url: String, status: u16 },

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Malformed response from {url}: {message}")]
    Response { url: String, message: String },

    #[error("Session state error: {0}")]
    Session(String),
}

/// Result of one recording attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The form submission went out
    Sent,
    /// Tracking is turned off in the document
    Disabled,
    /// The visitor carries the configured ignore marker
    Ignored,
    /// A visit was already recorded in this session
    AlreadyRecorded,
    /// Submission failed; the failure was logged
    Failed,
}

/// Network operations used by the beacon
pub trait Transport {
    /// GET `url` and parse the body as JSON
    fn get_json(&self, url: &str) -> Result<Value, BeaconError>;

    /// POST `fields` form-encoded to `url`; the response body is ignored
    fn post_form(&self, url: &str, fields: &[(String, String)]) -> Result<(), BeaconError>;
}

/// Blocking HTTP transport
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpTransport;

impl Transport for HttpTransport {
    fn get_json(&self, url: &str) -> Result<Value, BeaconError> {
        let body = ureq::get(url)
            .call()
            .map_err(|e| http_error(url, e))?
            .into_string()
            .map_err(|e| BeaconError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        serde_json::from_str(&body).map_err(|e| BeaconError::Response {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    fn post_form(&self, url: &str, fields: &[(String, String)]) -> Result<(), BeaconError> {
        let pairs: Vec<(&str, &str)> = fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        ureq::post(url)
            .send_form(&pairs)
            .map(|_| ())
            .map_err(|e| http_error(url, e))
    }
}

fn http_error(url: &str, err: ureq::Error) -> BeaconError {
    match err {
        ureq::Error::Status(status, _) => BeaconError::Http {
            url: url.to_string(),
            status,
        },
        ureq::Error::Transport(transport) => BeaconError::Transport {
            url: url.to_string(),
            message: transport.to_string(),
        },
    }
}

/// Reports events for one portfolio
pub struct Beacon<'a, T: Transport> {
    tracking: &'a Tracking,
    transport: T,
}

impl<'a, T: Transport> Beacon<'a, T> {
    pub fn new(tracking: &'a Tracking, transport: T) -> Self {
        Self {
            tracking,
            transport,
        }
    }

    /// Record an event, swallowing any failure
    ///
    /// For [`EventKind::Visit`] the session is marked as recorded once an
    /// attempt has been made, whether or not it succeeded.
    pub fn record_event(
        &self,
        kind: EventKind,
        ctx: &VisitContext,
        session: &mut SessionContext,
    ) -> Outcome {
        if kind == EventKind::Visit && session.visit_recorded {
            log::debug!("Visit already recorded for this session");
            return Outcome::AlreadyRecorded;
        }
        if !self.tracking.enabled {
            log::debug!("Tracking disabled; not recording {}", kind);
            return Outcome::Disabled;
        }

        let outcome = match self.try_record(kind, ctx) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("Tracking error: {}", e);
                Outcome::Failed
            }
        };

        if kind == EventKind::Visit {
            session.visit_recorded = true;
        }
        outcome
    }

    /// Record an event, returning the first failure
    pub fn try_record(&self, kind: EventKind, ctx: &VisitContext) -> Result<Outcome, BeaconError> {
        if !self.tracking.enabled {
            return Ok(Outcome::Disabled);
        }
        match kind {
            EventKind::Visit => self.record_visit(ctx),
            EventKind::Download => self.record_download(ctx),
        }
    }

    fn record_visit(&self, ctx: &VisitContext) -> Result<Outcome, BeaconError> {
        let Some(source) = detect_source(&self.tracking.source_detection, ctx) else {
            log::info!("Visit carries the ignore marker; not recording");
            return Ok(Outcome::Ignored);
        };

        let ip = self.lookup_ip()?;
        let geo_url = self.tracking.ip_services.geo_lookup.replace("{ip}", &ip);
        let geo = self.transport.get_json(&geo_url)?;

        let additional = [
            format!("Source: {}", source),
            format!("City: {}", geo_field(&geo, "city")),
            format!("Region: {}", geo_field(&geo, "region")),
            format!("TimeZone: {}", geo_field(&geo, "timezone")),
            format!("Latitude: {}", geo_field(&geo, "latitude")),
            format!("Longitude: {}", geo_field(&geo, "longitude")),
            format!("Postal: {}", geo_field(&geo, "postal")),
            format!("Org: {}", geo_field(&geo, "org")),
        ]
        .join(" | ");

        self.submit(
            EventKind::Visit,
            &ip,
            ctx,
            &geo_field(&geo, "country_name"),
            &additional,
        )?;
        Ok(Outcome::Sent)
    }

    fn record_download(&self, ctx: &VisitContext) -> Result<Outcome, BeaconError> {
        let detection = &self.tracking.source_detection;
        if ctx.source_param.as_deref() == Some(detection.ignore_value.as_str()) {
            log::info!("Download carries the ignore marker; not recording");
            return Ok(Outcome::Ignored);
        }

        let ip = self.lookup_ip()?;
        self.submit(EventKind::Download, &ip, ctx, "", "")?;
        Ok(Outcome::Sent)
    }

    fn lookup_ip(&self) -> Result<String, BeaconError> {
        let url = &self.tracking.ip_services.ip_lookup;
        let response = self.transport.get_json(url)?;
        response
            .get("ip")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| BeaconError::Response {
                url: url.clone(),
                message: "missing 'ip' field".to_string(),
            })
    }

    fn submit(
        &self,
        kind: EventKind,
        ip: &str,
        ctx: &VisitContext,
        country: &str,
        additional: &str,
    ) -> Result<(), BeaconError> {
        let form = &self.tracking.google_form;
        let fields = vec![
            (
                form.fields.timestamp.clone(),
                Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
            (form.fields.event_type.clone(), kind.wire_name().to_string()),
            (form.fields.ip_address.clone(), ip.to_string()),
            (form.fields.user_agent.clone(), ctx.user_agent.clone()),
            (form.fields.country.clone(), country.to_string()),
            (form.fields.additional_data.clone(), additional.to_string()),
        ];
        log::info!("Submitting {} event", kind);
        self.transport.post_form(&form.action_url, &fields)
    }
}

/// Attribute a visit to a source
///
/// # Returns
/// * `None` - The source parameter equals the ignore value
/// * `Some(source)` - The explicit source parameter, else the first referrer
///   rule whose pattern occurs in the referrer, else the default source
pub fn detect_source(detection: &SourceDetection, ctx: &VisitContext) -> Option<String> {
    match ctx.source_param.as_deref().filter(|s| !s.is_empty()) {
        Some(source) if source == detection.ignore_value => None,
        Some(source) => Some(source.to_string()),
        None => {
            let referrer = ctx.referrer.as_deref().unwrap_or_default().to_lowercase();
            let source = detection
                .referrers
                .iter()
                .find(|(_, pattern)| referrer.contains(pattern.as_str()))
                .map(|(name, _)| name.clone())
                .unwrap_or_else(|| detection.default_source.clone());
            Some(source)
        }
    }
}

/// Geo lookup field as display text; absent fields are empty
fn geo_field(geo: &Value, key: &str) -> String {
    match geo.get(key) {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
    }
}
