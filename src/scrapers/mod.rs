pub mod national;

pub use national::NationalTyresScraper;
