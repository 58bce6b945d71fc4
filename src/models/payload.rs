use serde::Serialize;

use crate::models::property::{EpcScore, PropertyInput, PropertyType, Province};

/// JSON body for `POST /predict`, in the field names the prediction API expects.
///
/// Surfaces are optional on the wire: the API treats a missing terrace or
/// garden surface as "no terrace/garden area known", so zero is never sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionPayload {
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub bedroom_count: u32,
    pub bathroom_count: u32,
    pub habitable_surface: u32,
    pub province: Province,
    pub post_code: String,
    pub epc_score: EpcScore,
    pub toilet_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terrace_surface: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub garden_surface: Option<u32>,
    pub has_garden: bool,
    pub has_terrace: bool,
    pub has_fireplace: bool,
    pub has_living_room: bool,
    pub has_attic: bool,
    pub has_basement: bool,
    pub has_office: bool,
    pub has_dining_room: bool,
    pub has_dressing_room: bool,
    pub has_lift: bool,
    pub has_swimming_pool: bool,
    pub has_air_conditioning: bool,
    pub has_armored_door: bool,
    pub has_visiophone: bool,
    pub has_heat_pump: bool,
    pub has_photovoltaic_panels: bool,
}

/// Build the prediction request body from form state.
pub fn build_payload(input: &PropertyInput) -> PredictionPayload {
    PredictionPayload {
        property_type: input.property_type,
        bedroom_count: input.bedroom_count,
        bathroom_count: input.bathroom_count,
        habitable_surface: input.habitable_surface,
        province: input.province,
        post_code: input.post_code.clone(),
        epc_score: input.epc_score,
        toilet_count: input.toilet_count,
        terrace_surface: present_surface(input.terrace_surface),
        garden_surface: present_surface(input.garden_surface),
        has_garden: input.has_garden,
        has_terrace: input.has_terrace,
        has_fireplace: input.has_fireplace,
        has_living_room: input.has_living_room,
        has_attic: input.has_attic,
        has_basement: input.has_basement,
        has_office: input.has_office,
        has_dining_room: input.has_dining_room,
        has_dressing_room: input.has_dressing_room,
        has_lift: input.has_lift,
        has_swimming_pool: input.has_swimming_pool,
        has_air_conditioning: input.has_air_conditioning,
        has_armored_door: input.has_armored_door,
        has_visiophone: input.has_visiophone,
        has_heat_pump: input.has_heat_pump,
        has_photovoltaic_panels: input.has_photovoltaic_panels,
    }
}

fn present_surface(area: u32) -> Option<u32> {
    (area > 0).then_some(area)
}
