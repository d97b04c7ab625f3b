//! Symbol table: string symbol ids ↔ dense numeric ids

use std::collections::HashMap;

use crate::config::GameConfig;

/// Dense numeric symbol id used on boards
pub type SymbolId = u32;

/// Every symbol a game can name, with stable numeric ids.
///
/// Ids are assigned in weight-table order (sorted by name), then any symbol
/// that only has a pay value, then the wild if it is not drawable.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    names: Vec<String>,
    ids: HashMap<String, SymbolId>,
}

impl SymbolTable {
    /// Build the table for a config
    pub fn from_config(config: &GameConfig) -> Self {
        let mut table = Self::default();
        for name in config.symbol_weights.keys() {
            table.insert(name);
        }
        for name in config.symbol_values.keys() {
            table.insert(name);
        }
        table.insert(&config.wild);
        table
    }

    pub(crate) fn insert(&mut self, name: &str) -> SymbolId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.names.len() as SymbolId;
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    /// Get id by name
    pub fn id(&self, name: &str) -> Option<SymbolId> {
        self.ids.get(name).copied()
    }

    /// Get name by id
    pub fn name(&self, id: SymbolId) -> &str {
        self.names.get(id as usize).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate (id, name) pairs in id order
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(id, name)| (id as SymbolId, name.as_str()))
    }
}
