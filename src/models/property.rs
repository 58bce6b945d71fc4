use std::str::FromStr;

use garde::Validate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

pub const MAX_BEDROOMS: u32 = 20;
pub const MAX_BATHROOMS: u32 = 10;
pub const MAX_TOILETS: u32 = 5;
pub const MAX_HABITABLE_SURFACE: u32 = 1000;
pub const MAX_TERRACE_SURFACE: u32 = 200;
pub const MAX_GARDEN_SURFACE: u32 = 2000;
pub const MAX_POST_CODE_LEN: usize = 10;

/// Controls the page form always posts. Surfaces and checkboxes may be absent.
const REQUIRED_FORM_FIELDS: [&str; 8] = [
    "property_type",
    "bedroom_count",
    "bathroom_count",
    "habitable_surface",
    "province",
    "post_code",
    "epc_score",
    "toilet_count",
];

/// Property types accepted by the prediction model.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum PropertyType {
    #[default]
    Apartment,
    House,
}

/// The eleven Belgian provinces, spelled the way the model was trained on them.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum Province {
    #[default]
    Brussels,
    Antwerp,
    #[serde(rename = "East Flanders")]
    #[strum(serialize = "East Flanders")]
    EastFlanders,
    #[serde(rename = "West Flanders")]
    #[strum(serialize = "West Flanders")]
    WestFlanders,
    #[serde(rename = "Flemish Brabant")]
    #[strum(serialize = "Flemish Brabant")]
    FlemishBrabant,
    #[serde(rename = "Walloon Brabant")]
    #[strum(serialize = "Walloon Brabant")]
    WalloonBrabant,
    Hainaut,
    #[serde(rename = "Liège")]
    #[strum(serialize = "Liège")]
    Liege,
    Luxembourg,
    Namur,
    Limburg,
}

/// Energy Performance Certificate grade, best to worst.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum EpcScore {
    #[serde(rename = "A+")]
    #[strum(serialize = "A+")]
    APlus,
    A,
    #[default]
    B,
    C,
    D,
    E,
    F,
    G,
}

/// Boolean amenities the model takes into account.
///
/// The first four are shown in the main form; the rest live under
/// "Advanced Features".
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum FeatureFlag {
    Garden,
    Terrace,
    Fireplace,
    LivingRoom,
    Attic,
    Basement,
    Office,
    DiningRoom,
    DressingRoom,
    Lift,
    SwimmingPool,
    AirConditioning,
    ArmoredDoor,
    Visiophone,
    HeatPump,
    PhotovoltaicPanels,
}

impl FeatureFlag {
    /// Key used by the prediction API.
    pub fn api_key(self) -> &'static str {
        match self {
            Self::Garden => "hasGarden",
            Self::Terrace => "hasTerrace",
            Self::Fireplace => "hasFireplace",
            Self::LivingRoom => "hasLivingRoom",
            Self::Attic => "hasAttic",
            Self::Basement => "hasBasement",
            Self::Office => "hasOffice",
            Self::DiningRoom => "hasDiningRoom",
            Self::DressingRoom => "hasDressingRoom",
            Self::Lift => "hasLift",
            Self::SwimmingPool => "hasSwimmingPool",
            Self::AirConditioning => "hasAirConditioning",
            Self::ArmoredDoor => "hasArmoredDoor",
            Self::Visiophone => "hasVisiophone",
            Self::HeatPump => "hasHeatPump",
            Self::PhotovoltaicPanels => "hasPhotovoltaicPanels",
        }
    }

    /// Name of the HTML form control (matches the `PropertyInput` field).
    pub fn form_name(self) -> &'static str {
        match self {
            Self::Garden => "has_garden",
            Self::Terrace => "has_terrace",
            Self::Fireplace => "has_fireplace",
            Self::LivingRoom => "has_living_room",
            Self::Attic => "has_attic",
            Self::Basement => "has_basement",
            Self::Office => "has_office",
            Self::DiningRoom => "has_dining_room",
            Self::DressingRoom => "has_dressing_room",
            Self::Lift => "has_lift",
            Self::SwimmingPool => "has_swimming_pool",
            Self::AirConditioning => "has_air_conditioning",
            Self::ArmoredDoor => "has_armored_door",
            Self::Visiophone => "has_visiophone",
            Self::HeatPump => "has_heat_pump",
            Self::PhotovoltaicPanels => "has_photovoltaic_panels",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Garden => "Has Garden",
            Self::Terrace => "Has Terrace",
            Self::Fireplace => "Has Fireplace",
            Self::LivingRoom => "Has Living Room",
            Self::Attic => "Has Attic",
            Self::Basement => "Has Basement",
            Self::Office => "Has Office",
            Self::DiningRoom => "Has Dining Room",
            Self::DressingRoom => "Has Dressing Room",
            Self::Lift => "Has Lift/Elevator",
            Self::SwimmingPool => "Has Swimming Pool",
            Self::AirConditioning => "Has Air Conditioning",
            Self::ArmoredDoor => "Has Armored Door",
            Self::Visiophone => "Has Visiophone",
            Self::HeatPump => "Has Heat Pump",
            Self::PhotovoltaicPanels => "Has Solar Panels",
        }
    }

    pub fn is_advanced(self) -> bool {
        !matches!(
            self,
            Self::Garden | Self::Terrace | Self::Fireplace | Self::LivingRoom
        )
    }
}

/// Every user-editable property attribute.
///
/// Booleans default to `false` when missing from a request, because HTML
/// forms omit unchecked checkboxes entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PropertyInput {
    #[garde(skip)]
    pub property_type: PropertyType,

    #[garde(range(min = 0, max = MAX_BEDROOMS))]
    pub bedroom_count: u32,

    #[garde(range(min = 0, max = MAX_BATHROOMS))]
    pub bathroom_count: u32,

    #[garde(range(min = 0, max = MAX_HABITABLE_SURFACE))]
    pub habitable_surface: u32,

    #[garde(skip)]
    pub province: Province,

    #[garde(length(min = 1, max = MAX_POST_CODE_LEN))]
    pub post_code: String,

    #[garde(skip)]
    pub epc_score: EpcScore,

    #[garde(range(min = 0, max = MAX_TOILETS))]
    pub toilet_count: u32,

    #[serde(default)]
    #[garde(range(min = 0, max = MAX_TERRACE_SURFACE))]
    pub terrace_surface: u32,

    #[serde(default)]
    #[garde(range(min = 0, max = MAX_GARDEN_SURFACE))]
    pub garden_surface: u32,

    #[serde(default)]
    #[garde(skip)]
    pub has_garden: bool,
    #[serde(default)]
    #[garde(skip)]
    pub has_terrace: bool,
    #[serde(default)]
    #[garde(skip)]
    pub has_fireplace: bool,
    #[serde(default)]
    #[garde(skip)]
    pub has_living_room: bool,
    #[serde(default)]
    #[garde(skip)]
    pub has_attic: bool,
    #[serde(default)]
    #[garde(skip)]
    pub has_basement: bool,
    #[serde(default)]
    #[garde(skip)]
    pub has_office: bool,
    #[serde(default)]
    #[garde(skip)]
    pub has_dining_room: bool,
    #[serde(default)]
    #[garde(skip)]
    pub has_dressing_room: bool,
    #[serde(default)]
    #[garde(skip)]
    pub has_lift: bool,
    #[serde(default)]
    #[garde(skip)]
    pub has_swimming_pool: bool,
    #[serde(default)]
    #[garde(skip)]
    pub has_air_conditioning: bool,
    #[serde(default)]
    #[garde(skip)]
    pub has_armored_door: bool,
    #[serde(default)]
    #[garde(skip)]
    pub has_visiophone: bool,
    #[serde(default)]
    #[garde(skip)]
    pub has_heat_pump: bool,
    #[serde(default)]
    #[garde(skip)]
    pub has_photovoltaic_panels: bool,
}

impl Default for PropertyInput {
    /// Values the form starts out with.
    fn default() -> Self {
        Self {
            property_type: PropertyType::default(),
            bedroom_count: 2,
            bathroom_count: 1,
            habitable_surface: 85,
            province: Province::default(),
            post_code: "1000".to_string(),
            epc_score: EpcScore::default(),
            toilet_count: 1,
            terrace_surface: 0,
            garden_surface: 0,
            has_garden: false,
            has_terrace: false,
            has_fireplace: false,
            has_living_room: true,
            has_attic: false,
            has_basement: false,
            has_office: false,
            has_dining_room: false,
            has_dressing_room: false,
            has_lift: false,
            has_swimming_pool: false,
            has_air_conditioning: false,
            has_armored_door: false,
            has_visiophone: false,
            has_heat_pump: false,
            has_photovoltaic_panels: false,
        }
    }
}

impl PropertyInput {
    pub fn flag(&self, flag: FeatureFlag) -> bool {
        match flag {
            FeatureFlag::Garden => self.has_garden,
            FeatureFlag::Terrace => self.has_terrace,
            FeatureFlag::Fireplace => self.has_fireplace,
            FeatureFlag::LivingRoom => self.has_living_room,
            FeatureFlag::Attic => self.has_attic,
            FeatureFlag::Basement => self.has_basement,
            FeatureFlag::Office => self.has_office,
            FeatureFlag::DiningRoom => self.has_dining_room,
            FeatureFlag::DressingRoom => self.has_dressing_room,
            FeatureFlag::Lift => self.has_lift,
            FeatureFlag::SwimmingPool => self.has_swimming_pool,
            FeatureFlag::AirConditioning => self.has_air_conditioning,
            FeatureFlag::ArmoredDoor => self.has_armored_door,
            FeatureFlag::Visiophone => self.has_visiophone,
            FeatureFlag::HeatPump => self.has_heat_pump,
            FeatureFlag::PhotovoltaicPanels => self.has_photovoltaic_panels,
        }
    }

    pub fn set_flag(&mut self, flag: FeatureFlag, value: bool) {
        let slot = match flag {
            FeatureFlag::Garden => &mut self.has_garden,
            FeatureFlag::Terrace => &mut self.has_terrace,
            FeatureFlag::Fireplace => &mut self.has_fireplace,
            FeatureFlag::LivingRoom => &mut self.has_living_room,
            FeatureFlag::Attic => &mut self.has_attic,
            FeatureFlag::Basement => &mut self.has_basement,
            FeatureFlag::Office => &mut self.has_office,
            FeatureFlag::DiningRoom => &mut self.has_dining_room,
            FeatureFlag::DressingRoom => &mut self.has_dressing_room,
            FeatureFlag::Lift => &mut self.has_lift,
            FeatureFlag::SwimmingPool => &mut self.has_swimming_pool,
            FeatureFlag::AirConditioning => &mut self.has_air_conditioning,
            FeatureFlag::ArmoredDoor => &mut self.has_armored_door,
            FeatureFlag::Visiophone => &mut self.has_visiophone,
            FeatureFlag::HeatPump => &mut self.has_heat_pump,
            FeatureFlag::PhotovoltaicPanels => &mut self.has_photovoltaic_panels,
        };
        *slot = value;
    }

    /// Validate field bounds, returning one readable message per violation.
    pub fn check(&self) -> Result<(), Vec<String>> {
        self.validate().map_err(|report| {
            report
                .iter()
                .map(|(path, error)| format!("{path}: {error}"))
                .collect()
        })
    }
}

impl PropertyInput {
    /// Decode raw `name=value` pairs from the page form.
    ///
    /// Every field that parses is kept even when another one does not, so a
    /// rejected form can be shown again with what the user entered. Unchecked
    /// checkboxes are absent from a form post and read as `false`.
    pub fn from_form_fields<'a, I>(fields: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut input = Self::default();
        for flag in feature_flags() {
            input.set_flag(flag, false);
        }

        let mut seen = Vec::new();
        let mut errors = Vec::new();
        for (name, value) in fields {
            seen.push(name);
            let parsed = match name {
                "property_type" => parse_into(value, &mut input.property_type),
                "bedroom_count" => parse_into(value, &mut input.bedroom_count),
                "bathroom_count" => parse_into(value, &mut input.bathroom_count),
                "habitable_surface" => parse_into(value, &mut input.habitable_surface),
                "province" => parse_into(value, &mut input.province),
                "post_code" => {
                    input.post_code = value.to_string();
                    Ok(())
                }
                "epc_score" => parse_into(value, &mut input.epc_score),
                "toilet_count" => parse_into(value, &mut input.toilet_count),
                "terrace_surface" => parse_into(value, &mut input.terrace_surface),
                "garden_surface" => parse_into(value, &mut input.garden_surface),
                other => {
                    if let Some(flag) = feature_flags().find(|flag| flag.form_name() == other) {
                        input.set_flag(flag, matches!(value, "true" | "on"));
                    }
                    Ok(())
                }
            };
            if let Err(reason) = parsed {
                errors.push(format!("{name}: {reason}"));
            }
        }

        errors.extend(
            REQUIRED_FORM_FIELDS
                .iter()
                .filter(|field| !seen.contains(*field))
                .map(|field| format!("{field}: missing")),
        );

        (input, errors)
    }
}

fn parse_into<T: FromStr>(value: &str, slot: &mut T) -> Result<(), String> {
    *slot = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid value '{value}'"))?;
    Ok(())
}

/// All feature flags in display order.
pub fn feature_flags() -> impl Iterator<Item = FeatureFlag> {
    FeatureFlag::iter()
}
