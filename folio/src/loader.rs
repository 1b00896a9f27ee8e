//! Loading the portfolio document
//!
//! The document is fetched once per build from either an HTTP(S) URL or a
//! local file. There is no caching and no retry: a failed load is terminal.

use crate::document::PortfolioDocument;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable consulted when no source is given on the command line
pub const DATA_URL_ENV: &str = "FOLIO_DATA_URL";

/// Where the portfolio document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Fetched with an HTTP GET
    Url(String),
    /// Read from the local filesystem
    Path(PathBuf),
}

impl Source {
    /// Classify a user-supplied location
    ///
    /// Anything starting with `http://` or `https://` is a URL; everything
    /// else is a path.
    pub fn parse(location: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Source::Url(location.to_string())
        } else {
            Source::Path(PathBuf::from(location))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{}", url),
            Source::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Pick the document source by precedence
///
/// # Parameters
/// * `cli` - Location given on the command line
/// * `env` - Value of [`DATA_URL_ENV`]
/// * `config` - `data_source` from folio.toml
///
/// # Returns
/// The first non-blank location, classified with [`Source::parse`], or `None`
/// when no location is configured anywhere.
pub fn select_source(
    cli: Option<&str>,
    env: Option<&str>,
    config: Option<&str>,
) -> Option<Source> {
    [cli, env, config]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|location| !location.is_empty())
        .map(Source::parse)
}

/// Errors that can occur while loading the portfolio document
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to read {path}: {source}", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Request to {url} failed with status {status}")]
    Http { url: String, status: u16 },

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Malformed JSON from {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Load the portfolio document from `source`
///
/// # Parameters
/// * `source` - URL or path of the JSON document
///
/// # Returns
/// * `Ok(PortfolioDocument)` - The parsed document
/// * `Err(FetchError)` - The request failed, returned a non-success status, or
///   the body is not valid JSON
pub fn load_configuration(source: &Source) -> Result<PortfolioDocument, FetchError> {
    log::info!("Loading portfolio data from {}", source);

    let body = match source {
        Source::Path(path) => std::fs::read_to_string(path).map_err(|e| FetchError::Io {
            path: path.clone(),
            source: e,
        })?,
        Source::Url(url) => fetch_url(url)?,
    };

    let doc = PortfolioDocument::from_json_str(&body).map_err(|e| FetchError::Json {
        origin: source.to_string(),
        source: e,
    })?;

    log::info!("Loaded {} bytes of portfolio data", body.len());
    Ok(doc)
}

fn fetch_url(url: &str) -> Result<String, FetchError> {
    let response = match ureq::get(url).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(status, _)) => {
            return Err(FetchError::Http {
                url: url.to_string(),
                status,
            })
        }
        Err(ureq::Error::Transport(transport)) => {
            return Err(FetchError::Transport {
                url: url.to_string(),
                message: transport.to_string(),
            })
        }
    };

    response.into_string().map_err(|e| FetchError::Transport {
        url: url.to_string(),
        message: e.to_string(),
    })
}
