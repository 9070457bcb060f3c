use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Child place types a chart can be broken down by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaceType {
    Continent,
    Country,
    State,
    County,
    City,
    Town,
    Village,
    Borough,
    CensusZipCodeTabulationArea,
    SchoolDistrict,
    AdministrativeArea1,
    AdministrativeArea2,
    EurostatNUTS1,
    EurostatNUTS2,
    EurostatNUTS3,
}

impl PlaceType {
    pub fn value(&self) -> &'static str {
        match self {
            PlaceType::Continent => "Continent",
            PlaceType::Country => "Country",
            PlaceType::State => "State",
            PlaceType::County => "County",
            PlaceType::City => "City",
            PlaceType::Town => "Town",
            PlaceType::Village => "Village",
            PlaceType::Borough => "Borough",
            PlaceType::CensusZipCodeTabulationArea => "CensusZipCodeTabulationArea",
            PlaceType::SchoolDistrict => "SchoolDistrict",
            PlaceType::AdministrativeArea1 => "AdministrativeArea1",
            PlaceType::AdministrativeArea2 => "AdministrativeArea2",
            PlaceType::EurostatNUTS1 => "EurostatNUTS1",
            PlaceType::EurostatNUTS2 => "EurostatNUTS2",
            PlaceType::EurostatNUTS3 => "EurostatNUTS3",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub dcid: String,
    pub name: String,
    pub place_type: String,
}

impl Place {
    pub fn new(dcid: &str, name: &str, place_type: &str) -> Self {
        Self {
            dcid: dcid.to_string(),
            name: name.to_string(),
            place_type: place_type.to_string(),
        }
    }
}

/// The parsed user utterance; only the detected places matter here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Utterance {
    pub places: Vec<Place>,
}

/// Which (stat var, place + child type) combinations have child-place data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExistChecks {
    by_sv: HashMap<String, HashSet<String>>,
}

impl ExistChecks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place_key(place_dcid: &str, place_type: PlaceType) -> String {
        format!("{}{}", place_dcid, place_type.value())
    }

    pub fn record(&mut self, sv: &str, place_key: &str) {
        self.by_sv
            .entry(sv.to_string())
            .or_default()
            .insert(place_key.to_string());
    }

    pub fn exists(&self, sv: &str, place_key: &str) -> bool {
        self.by_sv
            .get(sv)
            .map(|keys| keys.contains(place_key))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PopulateState {
    pub uttr: Utterance,
    pub place_type: Option<PlaceType>,
    pub exist_checks: ExistChecks,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartVars {
    pub svs: Vec<String>,
    pub block_id: Option<u32>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl ChartVars {
    pub fn new(svs: &[&str]) -> Self {
        Self {
            svs: svs.iter().map(|sv| sv.to_string()).collect(),
            ..Self::default()
        }
    }
}

/// Display metadata for a stat var.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatVarInfo {
    pub name: String,
    pub description: Option<String>,
    pub unit: Option<String>,
}

pub type Sv2Thing = HashMap<String, StatVarInfo>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartAttrs {
    pub include_percapita: bool,
    pub child_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TileType {
    Scatter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatVarSpec {
    pub key: String,
    pub stat_var: String,
    pub name: String,
    pub unit: Option<String>,
    pub denom: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScatterTileSpec {
    pub highlight_top_right: bool,
    pub highlight_top_left: bool,
    pub highlight_bottom_right: bool,
    pub highlight_bottom_left: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub title: String,
    pub tile_type: TileType,
    pub stat_var_key: Vec<String>,
    pub stat_var_specs: Vec<StatVarSpec>,
    pub scatter_tile_spec: Option<ScatterTileSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub tiles: Vec<Tile>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: Option<u32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub columns: Vec<Column>,
}

/// Summary of one emitted chart, handed back to the page assembler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBlock {
    pub tile_type: TileType,
    pub title: String,
    pub place_dcid: String,
    pub stat_vars: Vec<String>,
    pub child_type: String,
    pub per_capita: bool,
}
