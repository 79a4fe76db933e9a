//! Reporting and plotting helpers.
//!
//! `plots` turns tables and fitted surfaces into `plotly::Plot`s; `html`
//! lays them out as a single-page dashboard; `dashboard` assembles the
//! standard four-section page from a dataset.
pub mod dashboard;
pub mod html;
pub mod plots;
