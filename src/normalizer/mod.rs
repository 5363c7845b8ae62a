//! Optional-field normalization. Every function here is total: a raw value that
//! cannot be mapped yields `None`, never an error.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::{Grade, RawRecord, Seasonality, SpeedRating, TyreType};

static GRADE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-E])\b").expect("grade pattern is valid"));

/// Combined load-index/speed-rating suffix as printed after a tyre size, e.g. `91V`.
static LOAD_SPEED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{2,3})([A-Z])\b").expect("load/speed pattern is valid"));

const AFFIRMATIVE: &str = "yes";

/// Optional tyre attributes derived from a raw record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedFields {
    pub seasonality: Option<Seasonality>,
    pub tyre_type: Option<TyreType>,
    pub wet_grip: Option<Grade>,
    pub fuel_efficiency: Option<Grade>,
    pub speed_rating: Option<SpeedRating>,
    pub load_index: Option<u32>,
    pub features: BooleanFeatures,
}

/// Feature flags. Absent and explicitly negative source values both map to
/// `Some(false)`; the source markup cannot tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BooleanFeatures {
    pub electric: Option<bool>,
    pub self_seal: Option<bool>,
    pub run_flat: Option<bool>,
    pub noise_reduction: Option<bool>,
}

pub fn normalize(raw: &RawRecord, size: Option<&str>) -> NormalizedFields {
    let (load_index, speed_rating) = parse_load_index_and_speed_rating(raw, size);

    NormalizedFields {
        seasonality: parse_seasonality(raw.text("tyre-season").as_deref()),
        tyre_type: parse_tyre_type(raw.text("tyre-type").as_deref()),
        wet_grip: parse_grade(raw.text("grip").as_deref()),
        fuel_efficiency: parse_grade(raw.text("fuel").as_deref()),
        speed_rating,
        load_index,
        features: parse_boolean_features(raw),
    }
}

pub fn parse_seasonality(text: Option<&str>) -> Option<Seasonality> {
    let lower = text.filter(|t| !t.is_empty())?.to_lowercase();
    if lower.starts_with("summer") {
        Some(Seasonality::Summer)
    } else if lower.starts_with("winter") {
        Some(Seasonality::Winter)
    } else if lower.contains("all") {
        Some(Seasonality::AllSeason)
    } else {
        None
    }
}

/// Any non-empty value that is not a recognised van or 4x4 marker is a car tyre;
/// listings rarely say "car" explicitly.
pub fn parse_tyre_type(text: Option<&str>) -> Option<TyreType> {
    let lower = text.filter(|t| !t.is_empty())?.to_lowercase();
    match lower.as_str() {
        "van" => Some(TyreType::Van),
        "4x4" | "suv" => Some(TyreType::FourByFour),
        _ => Some(TyreType::Car),
    }
}

pub fn parse_grade(text: Option<&str>) -> Option<Grade> {
    let upper = text?.trim().to_uppercase();
    let captures = GRADE_RE.captures(&upper)?;
    captures
        .get(1)
        .and_then(|m| m.as_str().chars().next())
        .and_then(Grade::from_letter)
}

fn parse_speed_rating(text: &str) -> Option<SpeedRating> {
    SpeedRating::from_symbol(&text.trim().to_uppercase())
}

fn parse_explicit_load_index(text: &str) -> Option<u32> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Explicit `load_index`/`speed_rating` fields win. Whichever is still missing is
/// filled from the suffix printed after the size (e.g. `205/55 R16 91V`). A load
/// index of zero is treated as missing.
pub fn parse_load_index_and_speed_rating(
    raw: &RawRecord,
    size: Option<&str>,
) -> (Option<u32>, Option<SpeedRating>) {
    let mut load_index = raw
        .text("load_index")
        .and_then(|text| parse_explicit_load_index(&text))
        .filter(|&index| index > 0);
    let mut speed_rating = raw
        .text("speed_rating")
        .and_then(|text| parse_speed_rating(&text));

    if (load_index.is_none() || speed_rating.is_none())
        && let Some(captures) = size.and_then(|size| LOAD_SPEED_RE.captures(size))
    {
        if load_index.is_none() {
            load_index = captures[1].parse::<u32>().ok().filter(|&index| index > 0);
        }
        if speed_rating.is_none() {
            speed_rating = parse_speed_rating(&captures[2]);
        }
    }

    (load_index, speed_rating)
}

fn is_affirmative(raw: &RawRecord, key: &str) -> Option<bool> {
    Some(raw.text(key).unwrap_or_default().to_lowercase() == AFFIRMATIVE)
}

pub fn parse_boolean_features(raw: &RawRecord) -> BooleanFeatures {
    BooleanFeatures {
        electric: is_affirmative(raw, "electric"),
        self_seal: is_affirmative(raw, "selfseal"),
        run_flat: is_affirmative(raw, "runflat"),
        noise_reduction: is_affirmative(raw, "noisereduction"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(fields: &[(&str, &str)]) -> RawRecord {
        let mut raw = RawRecord::new();
        for (key, value) in fields {
            raw.insert_text(*key, *value);
        }
        raw
    }

    #[test]
    fn seasonality() {
        assert_eq!(parse_seasonality(Some("Summer tyre")), Some(Seasonality::Summer));
        assert_eq!(parse_seasonality(Some("All Season")), Some(Seasonality::AllSeason));
        assert_eq!(parse_seasonality(Some("Winter Performance")), Some(Seasonality::Winter));
        assert_eq!(parse_seasonality(Some("Track")), None);
        assert_eq!(parse_seasonality(Some("")), None);
        assert_eq!(parse_seasonality(None), None);
    }

    #[test]
    fn tyre_type_defaults_to_car_for_unmapped_values() {
        assert_eq!(parse_tyre_type(Some("4x4")), Some(TyreType::FourByFour));
        assert_eq!(parse_tyre_type(Some("SUV")), Some(TyreType::FourByFour));
        assert_eq!(parse_tyre_type(Some("van")), Some(TyreType::Van));
        assert_eq!(parse_tyre_type(Some("Car")), Some(TyreType::Car));
        assert_eq!(parse_tyre_type(Some("estate")), Some(TyreType::Car));
        assert_eq!(parse_tyre_type(Some("")), None);
        assert_eq!(parse_tyre_type(None), None);
    }

    #[test]
    fn grade() {
        assert_eq!(parse_grade(Some("Grade: C rating")), Some(Grade::C));
        assert_eq!(parse_grade(Some("xyz")), None);
        assert_eq!(parse_grade(Some("a")), Some(Grade::A));
        assert_eq!(parse_grade(Some(" b ")), Some(Grade::B));
        assert_eq!(parse_grade(Some("F")), None);
        assert_eq!(parse_grade(Some("")), None);
        assert_eq!(parse_grade(None), None);
    }

    #[test]
    fn explicit_load_and_speed_need_no_fallback() {
        let raw = raw(&[("load_index", "91"), ("speed_rating", "V")]);
        assert_eq!(
            parse_load_index_and_speed_rating(&raw, Some("205/55 R16")),
            (Some(91), Some(SpeedRating::V))
        );
    }

    #[test]
    fn size_suffix_fills_missing_load_and_speed() {
        let raw = RawRecord::new();
        assert_eq!(
            parse_load_index_and_speed_rating(&raw, Some("205/55 R16 91V")),
            (Some(91), Some(SpeedRating::V))
        );
    }

    #[test]
    fn explicit_load_index_wins_and_fallback_fills_speed_only() {
        let raw = raw(&[("load_index", "91")]);
        assert_eq!(
            parse_load_index_and_speed_rating(&raw, Some("225/50 R16 94H")),
            (Some(91), Some(SpeedRating::H))
        );
    }

    #[test]
    fn explicit_speed_rating_wins_over_size_suffix() {
        let raw = raw(&[("speed_rating", " w ")]);
        assert_eq!(
            parse_load_index_and_speed_rating(&raw, Some("225/50 R16 94H")),
            (Some(94), Some(SpeedRating::W))
        );
    }

    #[test]
    fn invalid_explicit_values_fall_back_to_size() {
        let raw = raw(&[("load_index", "91kg"), ("speed_rating", "X")]);
        assert_eq!(
            parse_load_index_and_speed_rating(&raw, Some("205/55 R16 88T")),
            (Some(88), Some(SpeedRating::T))
        );
    }

    #[test]
    fn zero_load_index_is_absent() {
        let raw = raw(&[("load_index", "0")]);
        assert_eq!(
            parse_load_index_and_speed_rating(&raw, Some("205/55 R16")),
            (None, None)
        );
        assert_eq!(
            parse_load_index_and_speed_rating(&raw, Some("205/55 R16 00V")),
            (None, Some(SpeedRating::V))
        );
    }

    #[test]
    fn unknown_size_suffix_letter_is_ignored() {
        let raw = RawRecord::new();
        assert_eq!(
            parse_load_index_and_speed_rating(&raw, Some("205/55 R16 91X")),
            (Some(91), None)
        );
        assert_eq!(parse_load_index_and_speed_rating(&raw, None), (None, None));
    }

    #[test]
    fn boolean_features_need_exact_affirmative() {
        let raw = raw(&[
            ("electric", "YES"),
            ("selfseal", "no"),
            ("runflat", "yes please"),
        ]);
        let features = parse_boolean_features(&raw);
        assert_eq!(features.electric, Some(true));
        assert_eq!(features.self_seal, Some(false));
        assert_eq!(features.run_flat, Some(false));
        assert_eq!(features.noise_reduction, Some(false));
    }

    #[test]
    fn normalize_reads_the_expected_keys() {
        let raw = raw(&[
            ("tyre-season", "All Season"),
            ("tyre-type", "suv"),
            ("grip", "B"),
            ("fuel", "Fuel: E"),
            ("noisereduction", "Yes"),
        ]);
        let fields = normalize(&raw, Some("235/60 R18 107V"));
        assert_eq!(fields.seasonality, Some(Seasonality::AllSeason));
        assert_eq!(fields.tyre_type, Some(TyreType::FourByFour));
        assert_eq!(fields.wet_grip, Some(Grade::B));
        assert_eq!(fields.fuel_efficiency, Some(Grade::E));
        assert_eq!(fields.load_index, Some(107));
        assert_eq!(fields.speed_rating, Some(SpeedRating::V));
        assert_eq!(fields.features.noise_reduction, Some(true));
    }

    #[test]
    fn normalize_is_idempotent() {
        let raw = raw(&[("tyre-season", "winter"), ("load_index", "95"), ("grip", "c")]);
        let first = normalize(&raw, Some("215/65 R16 98H"));
        let second = normalize(&raw, Some("215/65 R16 98H"));
        assert_eq!(first, second);
    }
}
