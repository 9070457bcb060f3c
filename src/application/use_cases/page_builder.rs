use crate::domain::chart::{Block, ChartVars, Column, Sv2Thing};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub blocks: Vec<Block>,
}

impl PageConfig {
    /// Allocates a fresh column for `chart_vars`.
    ///
    /// Chart vars sharing a `block_id` with the last block land in that block;
    /// anything else opens a new block titled from the chart vars.
    pub fn new_column(&mut self, chart_vars: &ChartVars) -> &mut Column {
        let reuse_last = matches!(
            (self.blocks.last(), chart_vars.block_id),
            (Some(last), Some(id)) if last.id == Some(id)
        );
        if !reuse_last {
            self.blocks.push(Block {
                id: chart_vars.block_id,
                title: chart_vars.title.clone(),
                description: chart_vars.description.clone(),
                columns: Vec::new(),
            });
        }

        let block_index = self.blocks.len() - 1;
        let block = &mut self.blocks[block_index];
        block.columns.push(Column::default());
        let column_index = block.columns.len() - 1;
        &mut block.columns[column_index]
    }

    pub fn tile_count(&self) -> usize {
        self.blocks
            .iter()
            .flat_map(|block| block.columns.iter())
            .map(|column| column.tiles.len())
            .sum()
    }
}

/// Accumulates the page for one insight response.
pub struct Builder {
    pub page: PageConfig,
    pub sv2thing: Sv2Thing,
    no_per_capita: bool,
}

impl Builder {
    pub fn new(sv2thing: Sv2Thing, no_per_capita: bool) -> Self {
        Self {
            page: PageConfig::default(),
            sv2thing,
            no_per_capita,
        }
    }

    /// True when per-capita variants must not be offered for this page.
    pub fn nopc(&self) -> bool {
        self.no_per_capita
    }
}
