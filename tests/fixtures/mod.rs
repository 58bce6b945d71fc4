//! Sample property inputs and form bodies

#![allow(dead_code)]

use immo_price_predictor::models::property::{EpcScore, PropertyInput, PropertyType, Province};

/// A detached house in Liège with a garden but no terrace surface.
pub fn liege_house() -> PropertyInput {
    PropertyInput {
        property_type: PropertyType::House,
        bedroom_count: 3,
        bathroom_count: 2,
        habitable_surface: 150,
        province: Province::Liege,
        post_code: "4000".to_string(),
        epc_score: EpcScore::APlus,
        toilet_count: 2,
        terrace_surface: 0,
        garden_surface: 300,
        has_garden: true,
        has_lift: true,
        has_living_room: false,
        ..PropertyInput::default()
    }
}

/// `liege_house()` as the browser posts it: unchecked boxes are absent.
pub const LIEGE_HOUSE_FORM: &str = "property_type=HOUSE&bedroom_count=3&bathroom_count=2\
&habitable_surface=150&province=Li%C3%A8ge&post_code=4000&epc_score=A%2B&toilet_count=2\
&terrace_surface=0&garden_surface=300&has_garden=true&has_lift=true";

/// A small Namur apartment, submitted by a second browser in concurrency tests.
pub const NAMUR_APARTMENT_FORM: &str = "property_type=APARTMENT&bedroom_count=1&bathroom_count=1\
&habitable_surface=70&province=Namur&post_code=5000&epc_score=C&toilet_count=1\
&terrace_surface=8&garden_surface=0&has_terrace=true&has_living_room=true";

/// Same house with more bedrooms than the form allows.
pub const TOO_MANY_BEDROOMS_FORM: &str = "property_type=HOUSE&bedroom_count=25&bathroom_count=2\
&habitable_surface=150&province=Namur&post_code=5000&epc_score=C&toilet_count=2\
&terrace_surface=0&garden_surface=0";

/// Form with a count that is not a number at all.
pub const MALFORMED_FORM: &str = "property_type=HOUSE&bedroom_count=lots&bathroom_count=2\
&habitable_surface=150&province=Namur&post_code=5000&epc_score=C&toilet_count=2";
