//! Environment-driven configuration for a scraping run.

use anyhow::{Context, Result, anyhow};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_DATABASE_URL: &str = "sqlite:tyres.db";
const DEFAULT_CSV_PATH: &str = "tyres_export.csv";
const DEFAULT_QUERIES: &str = "205-55-16,225-50-16,185-16-14";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;
const DEFAULT_SCRAPE_DELAY_SECS: u64 = 3;

/// One tyre size to search for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TyreQuery {
    pub width: u32,
    pub aspect_ratio: u32,
    pub rim_size: u32,
}

impl fmt::Display for TyreQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} R{}", self.width, self.aspect_ratio, self.rim_size)
    }
}

impl FromStr for TyreQuery {
    type Err = anyhow::Error;

    /// Parses `width-aspect-rim`, e.g. `205-55-16` (`/` also accepted).
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split(['-', '/']).map(str::trim).collect();
        let [width, aspect_ratio, rim_size] = parts.as_slice() else {
            return Err(anyhow!("expected width-aspect-rim, got '{s}'"));
        };

        let number = |part: &str, what: &str| -> Result<u32> {
            part.parse()
                .with_context(|| format!("invalid {what} '{part}' in tyre query '{s}'"))
        };

        Ok(Self {
            width: number(*width, "width")?,
            aspect_ratio: number(*aspect_ratio, "aspect ratio")?,
            rim_size: number(*rim_size, "rim size")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub csv_path: String,
    pub queries: Vec<TyreQuery>,
    pub request_timeout: Duration,
    pub scrape_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            csv_path: DEFAULT_CSV_PATH.to_string(),
            queries: parse_queries(DEFAULT_QUERIES).unwrap_or_default(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            scrape_delay: Duration::from_secs(DEFAULT_SCRAPE_DELAY_SECS),
        }
    }
}

impl AppConfig {
    /// Reads `TYRES_*` variables, falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let queries = match lookup("TYRES_QUERIES") {
            Some(value) => parse_queries(&value).context("TYRES_QUERIES")?,
            None => defaults.queries,
        };

        Ok(Self {
            database_url: lookup("TYRES_DATABASE_URL").unwrap_or(defaults.database_url),
            csv_path: lookup("TYRES_CSV_PATH").unwrap_or(defaults.csv_path),
            queries,
            request_timeout: seconds(&lookup, "TYRES_REQUEST_TIMEOUT")?
                .unwrap_or(defaults.request_timeout),
            scrape_delay: seconds(&lookup, "TYRES_SCRAPE_DELAY")?.unwrap_or(defaults.scrape_delay),
        })
    }
}

fn seconds(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<Duration>> {
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .with_context(|| format!("{key} must be a whole number of seconds, got '{value}'"))
        })
        .transpose()
}

pub fn parse_queries(value: &str) -> Result<Vec<TyreQuery>> {
    value
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn parses_query_lists() {
        let queries = parse_queries("205-55-16, 225/50/16,").unwrap();
        assert_eq!(
            queries,
            vec![
                TyreQuery {
                    width: 205,
                    aspect_ratio: 55,
                    rim_size: 16,
                },
                TyreQuery {
                    width: 225,
                    aspect_ratio: 50,
                    rim_size: 16,
                },
            ]
        );
        assert_eq!(queries[0].to_string(), "205/55 R16");
        assert!(parse_queries("205-55").is_err());
        assert!(parse_queries("205-xx-16").is_err());
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.database_url, "sqlite:tyres.db");
        assert_eq!(config.queries.len(), 3);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.scrape_delay, Duration::from_secs(3));
    }

    #[test]
    fn environment_overrides_defaults() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("TYRES_CSV_PATH", "out.csv"),
            ("TYRES_QUERIES", "195-65-15"),
            ("TYRES_SCRAPE_DELAY", "0"),
        ]);
        let config = AppConfig::from_lookup(|key| env.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.csv_path, "out.csv");
        assert_eq!(
            config.queries,
            vec![TyreQuery {
                width: 195,
                aspect_ratio: 65,
                rim_size: 15,
            }]
        );
        assert_eq!(config.scrape_delay, Duration::ZERO);

        let bad = AppConfig::from_lookup(|key| {
            (key == "TYRES_REQUEST_TIMEOUT").then(|| "soon".to_string())
        });
        assert!(bad.is_err());
    }
}
