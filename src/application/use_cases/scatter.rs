//! Scatter chart construction shared by the insight page types.

use crate::domain::chart::{
    ChartAttrs, ChartBlock, Column, Place, ScatterTileSpec, StatVarInfo, StatVarSpec, Sv2Thing,
    Tile, TileType,
};

const PER_CAPITA_DENOM: &str = "Count_Person";

fn sv_name(sv: &str, sv2thing: &Sv2Thing) -> String {
    sv2thing
        .get(sv)
        .map(|info: &StatVarInfo| info.name.clone())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| sv.to_string())
}

fn sv_spec(sv: &str, sv2thing: &Sv2Thing, per_capita: bool) -> StatVarSpec {
    let info = sv2thing.get(sv);
    StatVarSpec {
        key: format!("{}_scatter", sv),
        stat_var: sv.to_string(),
        name: sv_name(sv, sv2thing),
        unit: info.and_then(|i| i.unit.clone()),
        denom: per_capita.then(|| PER_CAPITA_DENOM.to_string()),
    }
}

/// Appends a two-variable scatter tile to `column` and describes it.
///
/// `svs` must hold exactly the x and y variables, in that order.
pub fn scatter_chart_block(
    column: &mut Column,
    place: &Place,
    svs: &[String],
    sv2thing: &Sv2Thing,
    attr: &ChartAttrs,
    nopc: bool,
) -> ChartBlock {
    let per_capita = attr.include_percapita && !nopc;

    let specs: Vec<StatVarSpec> = svs
        .iter()
        .map(|sv| sv_spec(sv, sv2thing, per_capita))
        .collect();

    let names: Vec<String> = specs.iter().map(|spec| spec.name.clone()).collect();
    let mut title = names
        .iter()
        .map(|name| format!("{} (${{date}})", name))
        .collect::<Vec<_>>()
        .join(" vs. ");
    if per_capita {
        title.push_str(" Per Capita");
    }

    column.tiles.push(Tile {
        title: title.clone(),
        tile_type: TileType::Scatter,
        stat_var_key: specs.iter().map(|spec| spec.key.clone()).collect(),
        stat_var_specs: specs,
        scatter_tile_spec: Some(ScatterTileSpec {
            highlight_top_right: true,
            ..ScatterTileSpec::default()
        }),
    });

    ChartBlock {
        tile_type: TileType::Scatter,
        title,
        place_dcid: place.dcid.clone(),
        stat_vars: svs.to_vec(),
        child_type: attr.child_type.clone(),
        per_capita,
    }
}
