//! Chart structure for the variable correlation page.

use crate::application::use_cases::page_builder::Builder;
use crate::application::use_cases::scatter::scatter_chart_block;
use crate::domain::chart::{ChartAttrs, ChartBlock, ChartVars, ExistChecks, PopulateState};
use tracing::debug;

/// Emits a scatter of the two requested stat vars across child places.
///
/// Returns `None` when the request is not eligible; that is an expected
/// outcome, not a failure.
pub fn add_chart(
    chart_vars: &ChartVars,
    state: &PopulateState,
    builder: &mut Builder,
) -> Option<ChartBlock> {
    let place_type = match state.place_type {
        Some(place_type) if chart_vars.svs.len() == 2 => place_type,
        _ => return None,
    };

    let Some(place) = state.uttr.places.first() else {
        debug!("var correlation skipped: no place in utterance");
        return None;
    };

    // Child existence check for both SVs.
    let place_key = ExistChecks::place_key(&place.dcid, place_type);
    let has_child_places = chart_vars
        .svs
        .iter()
        .all(|sv| state.exist_checks.exists(sv, &place_key));
    if !has_child_places {
        debug!(place_key = %place_key, "var correlation skipped: missing child data");
        return None;
    }

    let attr = ChartAttrs {
        include_percapita: false,
        child_type: place_type.value().to_string(),
    };
    let nopc = builder.nopc();
    let column = builder.page.new_column(chart_vars);
    Some(scatter_chart_block(
        column,
        place,
        &chart_vars.svs,
        &builder.sv2thing,
        &attr,
        nopc,
    ))
}
