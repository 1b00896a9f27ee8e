//! folio - static portfolio site generator
//!
//! Loads a portfolio JSON document, composes its enabled sections in order,
//! and renders them to static HTML. Free-text fields use a small inline
//! markup language; visits and resume downloads can be reported to a form
//! endpoint.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod beacon;
pub mod compose;
pub mod custom;
pub mod document;
pub mod html_exporter;
pub mod icons;
pub mod loader;
pub mod markup;
pub mod model;
pub mod site_config;

pub use compose::{compose_sections, ComposeError, ComposeMode, SectionDescriptor};
pub use document::PortfolioDocument;
pub use loader::{load_configuration, FetchError, Source};
