//! Shell side of the isbdm toolchain.
//!
//! The conversion logic lives in isbdm-babel. This crate wires it to the file system: finding
//! pages, reading and writing documents, installing the log subscriber and counting outcomes.
//!
//! - `convert`: HTML pages to MDX documents
//! - `sidebar`: sidebar front matter for existing MDX documents
//! - `inspect`: printable views of one reconstructed section
//! - `batch`: per-document outcomes, summaries and the worker pool
//! - `logging`: stderr plus optional file subscriber

pub mod batch;
pub mod convert;
pub mod inspect;
pub mod logging;
pub mod sidebar;
