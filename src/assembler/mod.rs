//! Listing fragment -> validated `Tyre`, all or nothing.

use tracing::debug;

use crate::error::AggregateFieldError;
use crate::extraction::RawRecordExtractor;
use crate::models::{RawRecord, Tyre};
use crate::normalizer;
use crate::traits::{MarkupFragment, SiteLayout};
use crate::validation;

#[derive(Debug, Clone)]
pub struct EntityAssembler {
    website: String,
    extractor: RawRecordExtractor,
}

impl EntityAssembler {
    pub fn new(website: impl Into<String>, layout: SiteLayout) -> Self {
        Self {
            website: website.into(),
            extractor: RawRecordExtractor::new(layout),
        }
    }

    pub fn extractor(&self) -> &RawRecordExtractor {
        &self.extractor
    }

    pub fn assemble<F: MarkupFragment>(&self, listing: &F) -> Result<Tyre, AggregateFieldError> {
        self.assemble_record(self.extractor.extract(listing))
    }

    /// Validates and normalizes an already extracted record. Deterministic: the
    /// same record always yields the same `Tyre`.
    pub fn assemble_record(&self, raw: RawRecord) -> Result<Tyre, AggregateFieldError> {
        let mandatory = validation::validate(&raw)?;
        let optional = normalizer::normalize(&raw, Some(mandatory.size.as_str()));

        debug!(
            "Assembled {} {} ({}) at {:.2}",
            mandatory.brand, mandatory.name, mandatory.size, mandatory.price
        );

        Ok(Tyre {
            website: self.website.clone(),
            brand: title_case(&mandatory.brand),
            name: mandatory.name,
            size: mandatory.size,
            price: mandatory.price,
            seasonality: optional.seasonality,
            tyre_type: optional.tyre_type,
            wet_grip: optional.wet_grip,
            fuel_efficiency: optional.fuel_efficiency,
            speed_rating: optional.speed_rating,
            load_index: optional.load_index,
            electric: optional.features.electric,
            self_seal: optional.features.self_seal,
            run_flat: optional.features.run_flat,
            noise_reduction: optional.features.noise_reduction,
        })
    }
}

/// Upper-cases the first letter of every run of letters and lower-cases the rest,
/// so `BF GOODRICH` and `bf goodrich` both become `Bf Goodrich`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MandatoryField;
    use crate::models::{Grade, Seasonality, SpeedRating, TyreType};
    use scraper::{Html, Selector};

    fn assemble(html: &str) -> Result<Tyre, AggregateFieldError> {
        let document = Html::parse_fragment(html);
        let selector = Selector::parse("div.tyreDisplay").unwrap();
        let listing = document.select(&selector).next().unwrap();
        EntityAssembler::new("www.national.co.uk", SiteLayout::national()).assemble(&listing)
    }

    #[test]
    fn assembles_a_complete_listing() {
        let tyre = assemble(
            r#"<div class="tyreDisplay" data-brand="GOODYEAR" data-price="72.40"
                    data-tyre-season="Summer" data-tyre-type="car" data-grip="B"
                    data-fuel="C" data-electric="yes" data-selfseal="no">
                 <div class="tyreresult">
                   <a class="pattern_link">EfficientGrip Performance 2</a>
                   <p>205/55 R16 91V</p>
                   <p>Load Index: <span class="red">91</span></p>
                 </div>
               </div>"#,
        )
        .unwrap();

        assert_eq!(tyre.website, "www.national.co.uk");
        assert_eq!(tyre.brand, "Goodyear");
        assert_eq!(tyre.name, "EfficientGrip Performance 2");
        assert_eq!(tyre.size, "205/55 R16 91V");
        assert_eq!(tyre.price, 72.40);
        assert_eq!(tyre.seasonality, Some(Seasonality::Summer));
        assert_eq!(tyre.tyre_type, Some(TyreType::Car));
        assert_eq!(tyre.wet_grip, Some(Grade::B));
        assert_eq!(tyre.fuel_efficiency, Some(Grade::C));
        assert_eq!(tyre.load_index, Some(91));
        assert_eq!(tyre.speed_rating, Some(SpeedRating::V));
        assert_eq!(tyre.electric, Some(true));
        assert_eq!(tyre.self_seal, Some(false));
        assert_eq!(tyre.run_flat, Some(false));
    }

    #[test]
    fn missing_brand_and_price_are_both_reported() {
        let err = assemble(
            r#"<div class="tyreDisplay">
                 <div class="tyreresult">
                   <a class="pattern_link">Turanza T005</a>
                   <p>225/50 R16 92W</p>
                 </div>
               </div>"#,
        )
        .unwrap_err();

        assert_eq!(err.field_names(), vec!["brand", "price"]);
        assert!(err.has_violation(MandatoryField::Price));
        assert_eq!(err.raw.text("pattern").as_deref(), Some("Turanza T005"));
    }

    #[test]
    fn optional_fields_never_fail_a_listing() {
        let tyre = assemble(
            r#"<div class="tyreDisplay" data-brand="avon" data-price="45.99"
                    data-tyre-season="Track" data-grip="xyz">
                 <div class="tyreresult">
                   <a class="pattern_link">ZV7</a>
                   <p>185/65 R15</p>
                 </div>
               </div>"#,
        )
        .unwrap();

        assert_eq!(tyre.price, 45.99);
        assert_eq!(tyre.seasonality, None);
        assert_eq!(tyre.tyre_type, None);
        assert_eq!(tyre.wet_grip, None);
        assert_eq!(tyre.load_index, None);
        assert_eq!(tyre.speed_rating, None);
    }

    #[test]
    fn assembling_the_same_listing_twice_gives_equal_tyres() {
        let html = r#"<div class="tyreDisplay" data-brand="bridgestone" data-price="88.00"
                          data-tyre-season="Winter" data-runflat="Yes">
                        <div class="tyreresult">
                          <a class="pattern_link">Blizzak LM005</a>
                          <p>205/55 R16 94H</p>
                        </div>
                      </div>"#;

        let first = assemble(html).unwrap();
        let second = assemble(html).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("MICHELIN"), "Michelin");
        assert_eq!(title_case("bf goodrich"), "Bf Goodrich");
        assert_eq!(title_case("falken-azenis"), "Falken-Azenis");
        assert_eq!(title_case("o'neil 2x"), "O'Neil 2X");
    }
}
