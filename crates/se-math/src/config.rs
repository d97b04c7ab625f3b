//! Game configuration

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ConfigError, SlotError, SlotResult};
use crate::paytable::{Payline, standard_paylines};

/// Grid specification (reels × rows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of reels (columns)
    pub reels: u8,
    /// Number of visible rows per reel
    pub rows: u8,
}

impl GridSpec {
    /// Standard 5×3
    pub fn standard_5x3() -> Self {
        Self { reels: 5, rows: 3 }
    }

    /// Total grid positions
    pub fn total_positions(&self) -> usize {
        self.reels as usize * self.rows as usize
    }

    /// Check both dimensions are non-zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reels == 0 {
            return Err(ConfigError::InvalidDimension {
                name: "reel count",
                value: self.reels as usize,
            });
        }
        if self.rows == 0 {
            return Err(ConfigError::InvalidDimension {
                name: "row count",
                value: self.rows as usize,
            });
        }
        Ok(())
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::standard_5x3()
    }
}

/// Descriptive game metadata. Carried through to results, never enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameInfo {
    #[serde(default)]
    pub game_id: String,
    #[serde(default)]
    pub provider_name: String,
    #[serde(default)]
    pub game_name: String,
    /// Target RTP (e.g., 0.96 = 96%)
    #[serde(default)]
    pub rtp: f64,
    #[serde(default)]
    pub house_edge: f64,
    /// Maximum accepted bet (0 = unlimited)
    #[serde(default)]
    pub max_bet: f64,
}

impl Default for GameInfo {
    fn default() -> Self {
        Self {
            game_id: "slot_basic".into(),
            provider_name: "StakeEngine".into(),
            game_name: "Basic Slot".into(),
            rtp: 0.96,
            house_edge: 0.04,
            max_bet: 1000.0,
        }
    }
}

/// Complete game configuration as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(flatten)]
    pub info: GameInfo,
    /// Grid specification
    #[serde(default)]
    pub grid: GridSpec,
    /// Relative sampling weight per symbol. Signed so that a negative
    /// entry is reported as a weight error rather than a parse error.
    #[serde(default)]
    pub symbol_weights: BTreeMap<String, i64>,
    /// Base pay value per symbol (absent = 0)
    #[serde(default)]
    pub symbol_values: BTreeMap<String, f64>,
    /// Combined `{name: {value, frequency}}` table. Folded into the weight
    /// and value tables by [`GameConfig::fold_symbols`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbols: Option<BTreeMap<String, SymbolSpec>>,
    /// Payline table, evaluated in order
    #[serde(default = "standard_paylines", deserialize_with = "deserialize_paylines")]
    pub paylines: Vec<Payline>,
    /// Wild symbol id
    #[serde(default = "default_wild")]
    pub wild: String,
}

/// One entry of the combined symbol table
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SymbolSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Relative draw probability, scaled by [`FREQUENCY_SCALE`] into a weight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
}

/// Integer weight per unit of frequency
pub const FREQUENCY_SCALE: f64 = 1_000_000.0;

fn frequency_weight(frequency: f64) -> i64 {
    // NaN rounds to 0 and is rejected as a non-positive weight
    (frequency * FREQUENCY_SCALE).round() as i64
}

fn default_wild() -> String {
    "W".into()
}

/// Paylines arrive either as a list or as the `{"0": [...], "1": [...]}` map
/// form, which is ordered by its numeric keys.
fn deserialize_paylines<'de, D>(deserializer: D) -> Result<Vec<Payline>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PaylineTable {
        List(Vec<Payline>),
        Map(BTreeMap<String, Payline>),
    }

    match PaylineTable::deserialize(deserializer)? {
        PaylineTable::List(lines) => Ok(lines),
        PaylineTable::Map(map) => {
            let mut keyed = Vec::with_capacity(map.len());
            for (key, line) in map {
                let idx: usize = key.trim().parse().map_err(|_| {
                    serde::de::Error::custom(format!("payline key '{}' is not an index", key))
                })?;
                keyed.push((idx, line));
            }
            keyed.sort_by_key(|(idx, _)| *idx);
            Ok(keyed.into_iter().map(|(_, line)| line).collect())
        }
    }
}

fn builtin_weights() -> BTreeMap<String, i64> {
    [
        ("A", 10),
        ("K", 15),
        ("Q", 20),
        ("J", 25),
        ("10", 30),
        ("9", 35),
        ("W", 5),
    ]
    .into_iter()
    .map(|(s, w)| (s.to_string(), w))
    .collect()
}

fn builtin_values() -> BTreeMap<String, f64> {
    [
        ("A", 50.0),
        ("K", 25.0),
        ("Q", 15.0),
        ("J", 10.0),
        ("10", 5.0),
        ("9", 3.0),
    ]
    .into_iter()
    .map(|(s, v)| (s.to_string(), v))
    .collect()
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            info: GameInfo::default(),
            grid: GridSpec::default(),
            symbol_weights: builtin_weights(),
            symbol_values: builtin_values(),
            symbols: None,
            paylines: standard_paylines(),
            wild: default_wild(),
        }
    }
}

impl GameConfig {
    /// Parse, fold and validate a JSON config
    pub fn from_json(json: &str) -> SlotResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SlotError::Parse(e.to_string()))?;
        config.accepted()
    }

    /// Parse, fold and validate a YAML config
    pub fn from_yaml(yaml: &str) -> SlotResult<Self> {
        let config: Self =
            serde_yml::from_str(yaml).map_err(|e| SlotError::Parse(e.to_string()))?;
        config.accepted()
    }

    fn accepted(self) -> SlotResult<Self> {
        let config = self.folded();
        config.validate()?;
        Ok(config)
    }

    /// Resolve the symbol tables into `symbol_weights` and `symbol_values`.
    ///
    /// Entries of the combined `symbols` table override the separate tables
    /// per symbol; a `frequency` becomes a weight of
    /// `round(frequency × FREQUENCY_SCALE)`. A config carrying no symbol
    /// table at all gets the built-in "Basic Slot" set. Idempotent.
    pub fn fold_symbols(&mut self) {
        if let Some(symbols) = self.symbols.take() {
            for (name, spec) in symbols {
                if let Some(value) = spec.value {
                    self.symbol_values.insert(name.clone(), value);
                }
                if let Some(frequency) = spec.frequency {
                    self.symbol_weights.insert(name, frequency_weight(frequency));
                }
            }
        } else if self.symbol_weights.is_empty() && self.symbol_values.is_empty() {
            log::debug!(
                "Game '{}' has no symbol table, using the built-in set",
                self.info.game_id
            );
            self.symbol_weights = builtin_weights();
            self.symbol_values = builtin_values();
        }
    }

    /// Folded copy, see [`GameConfig::fold_symbols`]
    pub fn folded(mut self) -> Self {
        self.fold_symbols();
        self
    }

    /// Load a config file, picking the format from its extension
    pub fn load(path: impl AsRef<Path>) -> SlotResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SlotError::Parse(format!("{}: {}", path.display(), e)))?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&text),
            _ => Self::from_json(&text),
        }
    }

    /// Export as pretty JSON
    pub fn to_json_pretty(&self) -> SlotResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SlotError::Parse(e.to_string()))
    }

    /// Export as YAML
    pub fn to_yaml(&self) -> SlotResult<String> {
        serde_yml::to_string(self).map_err(|e| SlotError::Parse(e.to_string()))
    }

    /// Check every structural invariant. Touches no randomness.
    /// Expects a folded config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;

        if self.symbol_weights.is_empty() {
            return Err(ConfigError::EmptyWeights);
        }
        if let Some((symbol, _)) = self.symbol_weights.iter().find(|(_, w)| **w <= 0) {
            return Err(ConfigError::NonPositiveWeight {
                symbol: symbol.clone(),
            });
        }
        if let Some((symbol, value)) = self
            .symbol_values
            .iter()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(ConfigError::NegativeValue {
                symbol: symbol.clone(),
                value: *value,
            });
        }
        if self.wild.is_empty() {
            return Err(ConfigError::EmptyWild);
        }
        if self.paylines.is_empty() {
            return Err(ConfigError::NoPaylines);
        }

        let reels = self.grid.reels as usize;
        let rows = self.grid.rows as usize;
        for (index, line) in self.paylines.iter().enumerate() {
            line.validate(index, reels, rows)?;
        }

        Ok(())
    }

    /// Check a bet against this config
    pub fn validate_bet(&self, bet: f64) -> Result<(), ConfigError> {
        let max_bet = self.info.max_bet;
        let over_max = max_bet > 0.0 && bet > max_bet;
        if !bet.is_finite() || bet <= 0.0 || over_max {
            return Err(ConfigError::InvalidBet { bet, max_bet });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid.total_positions(), 15);
        assert_eq!(config.paylines.len(), 5);
        assert_eq!(config.symbol_weights["W"], 5);
        assert!(!config.symbol_values.contains_key("W"));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let mut config = GameConfig::default();
        config.grid.rows = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidDimension {
                name: "row count",
                value: 0
            })
        );
    }

    #[test]
    fn test_zero_weight_rejected() {
        let mut config = GameConfig::default();
        config.symbol_weights.insert("Q".into(), 0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveWeight { symbol: "Q".into() })
        );
    }

    #[test]
    fn test_empty_weights_rejected() {
        let mut config = GameConfig::default();
        config.symbol_weights.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyWeights));
    }

    #[test]
    fn test_short_payline_rejected() {
        let mut config = GameConfig::default();
        config.paylines.push(Payline::new(vec![0, 0, 0, 0]));
        assert_eq!(
            config.validate(),
            Err(ConfigError::PaylineLength {
                index: 5,
                expected: 5,
                actual: 4
            })
        );
    }

    #[test]
    fn test_row_out_of_range_rejected() {
        let mut config = GameConfig::default();
        config.paylines[1] = Payline::new(vec![1, 1, 3, 1, 1]);
        assert_eq!(
            config.validate(),
            Err(ConfigError::RowOutOfRange {
                payline: 1,
                reel: 2,
                row: 3,
                rows: 3
            })
        );
    }

    #[test]
    fn test_bet_validation() {
        let config = GameConfig::default();
        assert!(config.validate_bet(1.0).is_ok());
        assert!(config.validate_bet(1000.0).is_ok());
        assert!(config.validate_bet(1000.5).is_err());
        assert!(config.validate_bet(0.0).is_err());
        assert!(config.validate_bet(-2.0).is_err());
        assert!(config.validate_bet(f64::NAN).is_err());

        let mut unlimited = GameConfig::default();
        unlimited.info.max_bet = 0.0;
        assert!(unlimited.validate_bet(1_000_000.0).is_ok());
    }

    #[test]
    fn test_parse_flat_json_with_payline_map() {
        let json = r#"{
            "game_id": "slot_basic",
            "provider_name": "StakeEngine",
            "game_name": "Basic Slot",
            "rtp": 0.96,
            "house_edge": 0.04,
            "max_bet": 1000,
            "symbol_weights": {"A": 1, "K": 2},
            "symbol_values": {"A": 100},
            "paylines": {"1": [1, 1, 1, 1, 1], "0": [0, 0, 0, 0, 0], "10": [2, 2, 2, 2, 2]}
        }"#;

        let config = GameConfig::from_json(json).unwrap();
        assert_eq!(config.info.max_bet, 1000.0);
        assert_eq!(config.grid, GridSpec::standard_5x3());
        assert_eq!(config.wild, "W");
        assert_eq!(config.paylines[0].positions, vec![0; 5]);
        assert_eq!(config.paylines[1].positions, vec![1; 5]);
        assert_eq!(config.paylines[2].positions, vec![2; 5]);
    }

    #[test]
    fn test_parse_yaml_with_payline_list() {
        let yaml = "
game_name: Yaml Slot
grid:
  reels: 3
  rows: 1
symbol_weights:
  A: 3
  B: 1
symbol_values:
  A: 4.5
paylines:
  - [0, 0, 0]
wild: B
";
        let config = GameConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.info.game_name, "Yaml Slot");
        assert_eq!(config.grid.reels, 3);
        assert_eq!(config.paylines.len(), 1);
        assert_eq!(config.wild, "B");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_payline_key_is_parse_error() {
        let json = r#"{"symbol_weights": {"A": 1}, "paylines": {"first": [0, 0, 0, 0, 0]}}"#;
        assert!(matches!(GameConfig::from_json(json), Err(SlotError::Parse(_))));
    }

    #[test]
    fn test_negative_weight_is_config_error() {
        let json = r#"{"symbol_weights": {"A": -1, "K": 2}}"#;
        assert_eq!(
            GameConfig::from_json(json),
            Err(SlotError::InvalidConfig(ConfigError::NonPositiveWeight {
                symbol: "A".into()
            }))
        );

        let mut config = GameConfig::default();
        config.symbol_weights.insert("J".into(), -25);
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveWeight { symbol: "J".into() })
        );
    }

    #[test]
    fn test_combined_symbol_table_is_folded() {
        // Shape served by the math API's default-config endpoint
        let json = r#"{
            "game_id": "slot_basic",
            "provider_name": "StakeEngine",
            "game_name": "Basic Slot",
            "rtp": 0.96,
            "house_edge": 0.04,
            "max_bet": 1000,
            "paylines": {
                "0": [0, 0, 0, 0, 0],
                "1": [1, 1, 1, 1, 1],
                "2": [2, 2, 2, 2, 2],
                "3": [0, 1, 2, 1, 0],
                "4": [2, 1, 0, 1, 2]
            },
            "symbols": {
                "A": {"value": 100, "frequency": 0.1},
                "K": {"value": 50, "frequency": 0.15},
                "Q": {"value": 25, "frequency": 0.2},
                "J": {"value": 15, "frequency": 0.25},
                "10": {"value": 10, "frequency": 0.3}
            }
        }"#;

        let config = GameConfig::from_json(json).unwrap();
        assert!(config.symbols.is_none());
        assert_eq!(config.paylines, standard_paylines());
        assert_eq!(config.symbol_weights.len(), 5);
        assert_eq!(config.symbol_weights["A"], 100_000);
        assert_eq!(config.symbol_weights["10"], 300_000);
        assert_eq!(config.symbol_values["A"], 100.0);
        assert_eq!(config.symbol_values["J"], 15.0);

        // Folding again changes nothing
        assert_eq!(config.clone().folded(), config);
    }

    #[test]
    fn test_symbol_entries_override_separate_tables() {
        let yaml = "
symbol_weights:
  A: 5
  B: 7
symbol_values:
  A: 1.0
symbols:
  A:
    value: 9.0
  B:
    frequency: 0.000002
";
        let config = GameConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.symbol_weights["A"], 5);
        assert_eq!(config.symbol_weights["B"], 2);
        assert_eq!(config.symbol_values["A"], 9.0);
        assert!(!config.symbol_values.contains_key("B"));
    }

    #[test]
    fn test_zero_frequency_is_rejected() {
        let json = r#"{"symbols": {"A": {"value": 1, "frequency": 0.0}, "K": {"frequency": 0.5}}}"#;
        assert_eq!(
            GameConfig::from_json(json),
            Err(SlotError::InvalidConfig(ConfigError::NonPositiveWeight {
                symbol: "A".into()
            }))
        );
    }

    #[test]
    fn test_metadata_only_config_uses_builtin_symbols() {
        // Shape written by the config generator: no symbol or payline tables
        let json = r#"{
            "game_id": "0_0_asample",
            "provider_name": "sample_provider",
            "game_name": "sample_lines",
            "rtp": 0.97,
            "house_edge": 0.03,
            "max_bet": 1000
        }"#;

        let config = GameConfig::from_json(json).unwrap();
        let builtin = GameConfig::default();
        assert_eq!(config.info.game_id, "0_0_asample");
        assert_eq!(config.info.rtp, 0.97);
        assert_eq!(config.symbol_weights, builtin.symbol_weights);
        assert_eq!(config.symbol_values, builtin.symbol_values);
        assert_eq!(config.paylines, builtin.paylines);
    }

    #[test]
    fn test_json_export_reimports() {
        let config = GameConfig::default();
        let json = config.to_json_pretty().unwrap();
        assert_eq!(GameConfig::from_json(&json).unwrap(), config);
    }
}
