//! Configuration types for the statutory tax tables.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. The tables are plain data
//! so a yearly statutory update is a new file, not a code change.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Metadata about the jurisdiction the tables belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionMetadata {
    /// Short code for the rule set (e.g., "CLT").
    pub code: String,
    /// The human-readable name of the rule set.
    pub name: String,
    /// The version of the configuration.
    pub version: String,
    /// URL to the official documentation.
    pub source_url: String,
}

/// How the brackets of a table are combined into a withholding amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketMethod {
    /// Each slice of the base is taxed at its own bracket's rate and the
    /// slices are summed. Nothing is added above the last finite ceiling.
    Progressive,
    /// The whole base is taxed at the rate of the single bracket that
    /// contains it, minus that bracket's fixed deduction.
    FlatWithDeduction,
}

/// One bracket of a tax table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Upper bound of the bracket (inclusive). `None` means unbounded.
    #[serde(default)]
    pub ceiling: Option<Decimal>,
    /// The rate applied within this bracket (e.g., 0.075 for 7.5%).
    pub rate: Decimal,
    /// Fixed amount subtracted from the flat result.
    #[serde(default)]
    pub deduction: Decimal,
}

impl TaxBracket {
    fn bounded(ceiling: Decimal, rate: Decimal, deduction: Decimal) -> Self {
        Self {
            ceiling: Some(ceiling),
            rate,
            deduction,
        }
    }
}

/// An ordered list of brackets and the method used to evaluate them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTable {
    /// The evaluation method.
    pub method: BracketMethod,
    /// Brackets ordered by ascending ceiling.
    pub brackets: Vec<TaxBracket>,
}

impl BracketTable {
    /// Returns the highest finite ceiling of the table, if any.
    pub fn top_ceiling(&self) -> Option<Decimal> {
        self.brackets.iter().filter_map(|b| b.ceiling).max()
    }

    /// Checks that the table is well formed.
    ///
    /// Ceilings must be strictly ascending, only the last bracket may be
    /// unbounded and every rate must lie in `[0, 1]`.
    pub fn validate(&self) -> Result<(), String> {
        if self.brackets.is_empty() {
            return Err("table has no brackets".to_string());
        }

        let mut previous: Option<Decimal> = None;
        for (index, bracket) in self.brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(format!(
                    "bracket {} has rate {} outside [0, 1]",
                    index + 1,
                    bracket.rate
                ));
            }
            if bracket.deduction < Decimal::ZERO {
                return Err(format!("bracket {} has a negative deduction", index + 1));
            }

            match bracket.ceiling {
                Some(ceiling) => {
                    if previous.is_some_and(|p| ceiling <= p) {
                        return Err(format!(
                            "bracket {} ceiling {} is not above the previous ceiling",
                            index + 1,
                            ceiling
                        ));
                    }
                    previous = Some(ceiling);
                }
                None if index + 1 != self.brackets.len() => {
                    return Err(format!(
                        "bracket {} is unbounded but is not the last bracket",
                        index + 1
                    ));
                }
                None => {}
            }
        }

        Ok(())
    }
}

/// The INSS and IRRF tables effective from a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTables {
    /// The first date these tables apply to.
    pub effective_date: NaiveDate,
    /// Social-security (INSS) contribution table.
    pub inss: BracketTable,
    /// Withholding income-tax (IRRF) table.
    pub irrf: BracketTable,
}

impl TaxTables {
    /// The 2024 CLT reference tables.
    ///
    /// INSS: 7.5% up to 1412.00, 9% up to 2666.68, 12% up to 4000.03 and
    /// 14% up to the 7786.02 ceiling. IRRF: exempt up to 2259.20, then
    /// 7.5%/15%/22.5%/27.5% with deductions 169.44/381.44/662.77/896.00.
    ///
    /// # Example
    ///
    /// ```
    /// use ferias_engine::config::TaxTables;
    /// use rust_decimal::Decimal;
    ///
    /// let tables = TaxTables::clt_2024();
    /// assert_eq!(tables.inss.top_ceiling(), Some(Decimal::new(778602, 2)));
    /// ```
    pub fn clt_2024() -> Self {
        Self {
            effective_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            inss: BracketTable {
                method: BracketMethod::Progressive,
                brackets: vec![
                    TaxBracket::bounded(Decimal::new(141200, 2), Decimal::new(75, 3), Decimal::ZERO),
                    TaxBracket::bounded(Decimal::new(266668, 2), Decimal::new(9, 2), Decimal::ZERO),
                    TaxBracket::bounded(Decimal::new(400003, 2), Decimal::new(12, 2), Decimal::ZERO),
                    TaxBracket::bounded(Decimal::new(778602, 2), Decimal::new(14, 2), Decimal::ZERO),
                ],
            },
            irrf: BracketTable {
                method: BracketMethod::FlatWithDeduction,
                brackets: vec![
                    TaxBracket::bounded(Decimal::new(225920, 2), Decimal::ZERO, Decimal::ZERO),
                    TaxBracket::bounded(
                        Decimal::new(282665, 2),
                        Decimal::new(75, 3),
                        Decimal::new(16944, 2),
                    ),
                    TaxBracket::bounded(
                        Decimal::new(375105, 2),
                        Decimal::new(15, 2),
                        Decimal::new(38144, 2),
                    ),
                    TaxBracket::bounded(
                        Decimal::new(466468, 2),
                        Decimal::new(225, 3),
                        Decimal::new(66277, 2),
                    ),
                    TaxBracket {
                        ceiling: None,
                        rate: Decimal::new(275, 3),
                        deduction: Decimal::new(89600, 2),
                    },
                ],
            },
        }
    }

    /// Validates both tables.
    pub fn validate(&self) -> Result<(), String> {
        self.inss.validate().map_err(|e| format!("inss: {}", e))?;
        self.irrf.validate().map_err(|e| format!("irrf: {}", e))
    }
}

/// The complete configuration loaded from a jurisdiction directory.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Jurisdiction metadata.
    metadata: JurisdictionMetadata,
    /// Tax tables by effective date (sorted oldest first).
    tables: Vec<TaxTables>,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(metadata: JurisdictionMetadata, tables: Vec<TaxTables>) -> Self {
        let mut sorted_tables = tables;
        sorted_tables.sort_by(|a, b| a.effective_date.cmp(&b.effective_date));
        Self {
            metadata,
            tables: sorted_tables,
        }
    }

    /// Returns the jurisdiction metadata.
    pub fn jurisdiction(&self) -> &JurisdictionMetadata {
        &self.metadata
    }

    /// Returns all tax tables, oldest first.
    pub fn tables(&self) -> &[TaxTables] {
        &self.tables
    }
}
