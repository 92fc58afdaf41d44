//! Which block states go into which atlas cell.
//!
//! A sheet with one block and two or more keys is a grid: the first key's
//! values run across, the combinations of the other keys run down. Any
//! other sheet has one row per block with one column per state.

use crate::error::{RenderError, Result};
use crate::resolver::state_combinations;
use crate::resource_pack::BlockstateDefinition;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Drops states whose property takes one of the listed values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateFilter {
    pub property: String,
    pub values: Vec<String>,
}

impl StateFilter {
    /// Parse `key=value`, where `value` may list alternatives as `a|b`.
    pub fn parse(s: &str) -> Result<Self> {
        let (property, values) = s
            .split_once('=')
            .filter(|(k, v)| !k.is_empty() && !v.is_empty())
            .ok_or_else(|| {
                RenderError::InvalidStateSpec(format!("filter '{}' is not key=value", s))
            })?;

        Ok(Self {
            property: property.to_string(),
            values: values.split('|').map(String::from).collect(),
        })
    }

    pub fn rejects(&self, state: &HashMap<String, String>) -> bool {
        state
            .get(&self.property)
            .is_some_and(|v| self.values.iter().any(|rejected| rejected == v))
    }
}

/// One rendered cell of a sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetCell {
    /// Namespaced block name.
    pub block: String,
    pub state: HashMap<String, String>,
}

/// Cells of a sheet in row-major order. `None` cells stay empty.
#[derive(Debug, Clone)]
pub struct SheetPlan {
    pub columns: u32,
    pub cells: Vec<Option<SheetCell>>,
}

/// Property keys, value overrides and filters shared by every block of a sheet.
#[derive(Debug, Clone, Default)]
pub struct SheetLayout {
    keys: Vec<String>,
    values: HashMap<String, Vec<String>>,
    filters: Vec<StateFilter>,
}

impl SheetLayout {
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            keys,
            ..Default::default()
        }
    }

    /// Use `values` for `key` instead of the values found in the blockstate.
    pub fn with_values(mut self, key: impl Into<String>, values: Vec<String>) -> Self {
        self.values.insert(key.into(), values);
        self
    }

    pub fn with_filter(mut self, filter: StateFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Lay out every state of `blocks`.
    pub fn plan(&self, blocks: &[(String, &BlockstateDefinition)]) -> Result<SheetPlan> {
        let known: BTreeSet<&String> = self.keys.iter().collect();
        if let Some(filter) = self.filters.iter().find(|f| !known.contains(&f.property)) {
            return Err(RenderError::InvalidStateSpec(format!(
                "filter on '{}' which is not one of the keys {:?}",
                filter.property, self.keys
            )));
        }

        if let [(name, definition)] = blocks {
            if self.keys.len() >= 2 {
                return self.plan_grid(name, definition);
            }
        }

        let mut rows = Vec::with_capacity(blocks.len());
        for (name, definition) in blocks {
            rows.push((name, self.states(definition, &self.keys)?));
        }

        let columns = rows.iter().map(|(_, states)| states.len()).max().unwrap_or(0).max(1);
        let mut cells = Vec::with_capacity(columns * rows.len());
        for (name, states) in rows {
            let filled = states.len();
            cells.extend(states.into_iter().map(|state| {
                Some(SheetCell {
                    block: name.clone(),
                    state,
                })
            }));
            cells.extend((filled..columns).map(|_| None));
        }

        Ok(SheetPlan {
            columns: columns as u32,
            cells,
        })
    }

    /// Single block: the first key varies fastest, so its values form the
    /// columns. Filtered states do not take a cell.
    fn plan_grid(&self, name: &str, definition: &BlockstateDefinition) -> Result<SheetPlan> {
        let mut order = self.keys[1..].to_vec();
        order.push(self.keys[0].clone());

        let states = self.states(definition, &order)?;
        let columns = states
            .iter()
            .map(|state| &state[&self.keys[0]])
            .collect::<BTreeSet<_>>()
            .len()
            .max(1);

        Ok(SheetPlan {
            columns: columns as u32,
            cells: states
                .into_iter()
                .map(|state| {
                    Some(SheetCell {
                        block: name.to_string(),
                        state,
                    })
                })
                .collect(),
        })
    }

    fn states(
        &self,
        definition: &BlockstateDefinition,
        order: &[String],
    ) -> Result<Vec<HashMap<String, String>>> {
        let mut values: BTreeMap<String, Vec<String>> = definition.property_values()?;
        for (key, overridden) in &self.values {
            values.insert(key.clone(), overridden.clone());
        }

        let mut states = state_combinations(&values, order)?;
        states.retain(|state| !self.filters.iter().any(|f| f.rejects(state)));
        Ok(states)
    }
}
