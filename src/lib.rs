//! Tyre listing scraper: extracts product listings from search result pages,
//! validates and normalizes them into `Tyre` records, stores and exports them.

pub mod assembler;
pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod extraction;
pub mod models;
pub mod normalizer;
pub mod pages;
pub mod scrapers;
pub mod traits;
pub mod tyre_finder;
pub mod validation;

pub use assembler::EntityAssembler;
pub use error::AggregateFieldError;
pub use models::{RawRecord, RawValue, Tyre};
pub use tyre_finder::TyreFinder;
