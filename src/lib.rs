//! Astrogation - an adaptive transfer table overlay.
//!
//! Astrogation lays out a sortable table of interplanetary transfer
//! opportunities and places its window on a host whose UI scale distorts
//! surface positions unpredictably. Window placement is corrected by a
//! measure-then-commit protocol with a per-scale calibration cache.
//!
//! # Features
//!
//! - Context-dependent column registry with spanning headers
//! - Stable, reversible sorting with missing values last
//! - Probe-based window placement calibration
//! - Persisted settings with a settings panel
//! - Terminal host with clipboard export
//!
//! # Example
//!
//! ```ignore
//! use astrogation::columns::ViewContext;
//! use astrogation::model::{StaticModel, TransferRecord};
//! use astrogation::projection::{project, ProjectionOptions};
//! use astrogation::sorting::SortState;
//!
//! let model = StaticModel::new("Kerbin", vec![TransferRecord::new("Duna")]);
//! let table = project(&model, &ViewContext::default(), &SortState::default(), &ProjectionOptions::default());
//! print!("{}", table.to_tsv());
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod app;
pub mod clipboard;
pub mod columns;
pub mod error;
pub mod geometry;
pub mod host;
pub mod model;
pub mod projection;
pub mod settings;
pub mod sorting;
pub mod ui;
pub mod util;
pub mod view;

pub use error::{AstrogationError, Result};
