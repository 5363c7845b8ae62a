//! Data models for tyre listings: the raw field map pulled out of a listing
//! fragment and the validated `Tyre` entity handed to storage.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::LazyLock;

/// A single raw value pulled out of a listing fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(f64),
}

impl RawValue {
    /// Textual form of the value, numbers rendered the way they would be printed.
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(number) => number.to_string(),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text:?}"),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

/// Unvalidated field map extracted from one listing fragment.
///
/// Keys are either attribute names with the marker prefix stripped or one of the
/// derived keys in [`RawRecord::DERIVED_KEYS`]. Unknown keys are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: BTreeMap<String, RawValue>,
}

impl RawRecord {
    pub const DERIVED_KEYS: [&'static str; 6] = [
        "pattern",
        "size",
        "load_index",
        "speed_rating",
        "fitment",
        "details_text",
    ];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: RawValue) {
        self.fields.insert(key.into(), value);
    }

    pub fn insert_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.insert(key, RawValue::Text(value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.fields.get(key)
    }

    /// Text form of a field, if present.
    pub fn text(&self, key: &str) -> Option<String> {
        self.fields.get(key).map(RawValue::to_text)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Replaces a text `price` with its numeric form when it parses.
    /// Unparseable prices stay as text and are rejected later by validation.
    pub fn coerce_price(&mut self) {
        if let Some(RawValue::Text(text)) = self.fields.get("price")
            && let Ok(price) = text.trim().parse::<f64>()
        {
            self.fields.insert("price".to_string(), RawValue::Number(price));
        }
    }
}

impl fmt::Display for RawRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key:?}: {value}")?;
        }
        write!(f, "}}")
    }
}

impl<K: Into<String>> FromIterator<(K, RawValue)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, RawValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seasonality {
    Summer,
    Winter,
    AllSeason,
}

impl Seasonality {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Summer => "Summer",
            Self::Winter => "Winter",
            Self::AllSeason => "All Season",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TyreType {
    Car,
    FourByFour,
    Van,
}

impl TyreType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Car => "Car",
            Self::FourByFour => "4x4",
            Self::Van => "Van",
        }
    }
}

/// EU label grade, used for both wet grip and fuel efficiency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
}

impl Grade {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            'E' => Some(Self::E),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeedRating {
    L,
    M,
    N,
    P,
    Q,
    R,
    S,
    T,
    U,
    H,
    V,
    W,
    Y,
    ZR,
}

static SPEED_RATINGS: LazyLock<HashMap<&'static str, SpeedRating>> = LazyLock::new(|| {
    SpeedRating::ALL
        .iter()
        .map(|rating| (rating.as_str(), *rating))
        .collect()
});

impl SpeedRating {
    pub const ALL: [SpeedRating; 14] = [
        Self::L,
        Self::M,
        Self::N,
        Self::P,
        Self::Q,
        Self::R,
        Self::S,
        Self::T,
        Self::U,
        Self::H,
        Self::V,
        Self::W,
        Self::Y,
        Self::ZR,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::L => "L",
            Self::M => "M",
            Self::N => "N",
            Self::P => "P",
            Self::Q => "Q",
            Self::R => "R",
            Self::S => "S",
            Self::T => "T",
            Self::U => "U",
            Self::H => "H",
            Self::V => "V",
            Self::W => "W",
            Self::Y => "Y",
            Self::ZR => "ZR",
        }
    }

    /// Looks up a canonical symbol. Case and surrounding whitespace must already be
    /// normalized by the caller; unknown symbols return `None`.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        SPEED_RATINGS.get(symbol).copied()
    }
}

/// A validated tyre listing. The scrape time is stamped when the tyre is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tyre {
    pub website: String,
    pub brand: String,
    pub name: String,
    pub size: String,
    pub price: f64,

    pub seasonality: Option<Seasonality>,
    pub tyre_type: Option<TyreType>,
    pub wet_grip: Option<Grade>,
    pub fuel_efficiency: Option<Grade>,
    pub speed_rating: Option<SpeedRating>,
    pub load_index: Option<u32>,
    pub electric: Option<bool>,
    pub self_seal: Option<bool>,
    pub run_flat: Option<bool>,
    pub noise_reduction: Option<bool>,
}
