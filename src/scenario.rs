pub mod hextris;

use crate::matcher::{self, MatchError};
use crate::record::Record;
use crate::terraform::ConfigTree;
use crate::value::Value;

/// How a scenario picks its record out of a block-type's sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// The first declared block, for singleton blocks such as `terraform`.
    First,
    /// Exactly one block must be declared.
    Sole,
    /// The block whose metadata path equals the given string.
    Path(String),
}

impl Selector {
    pub fn path(path: impl Into<String>) -> Self {
        Selector::Path(path.into())
    }

    fn select<'a>(&self, block_type: &str, records: &'a [Record]) -> Result<&'a Record, MatchError> {
        match self {
            Selector::First => records.first().ok_or_else(|| MatchError::ResourceNotFound {
                path: block_type.to_string(),
            }),
            Selector::Sole => match records {
                [record] => Ok(record),
                _ => Err(MatchError::LengthMismatch {
                    key: block_type.to_string(),
                    expected: 1,
                    actual: records.len(),
                }),
            },
            Selector::Path(path) => {
                matcher::find_by_path(records, path).ok_or_else(|| MatchError::ResourceNotFound {
                    path: path.clone(),
                })
            }
        }
    }
}

/// A fixed expectation checked against a loaded configuration.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub block_type: String,
    pub selector: Selector,
    /// Expected metadata label of the selected block.
    pub label: Option<String>,
    pub expected: Record,
}

impl Scenario {
    pub fn new(
        name: impl Into<String>,
        block_type: impl Into<String>,
        selector: Selector,
        expected: Record,
    ) -> Self {
        Self {
            name: name.into(),
            block_type: block_type.into(),
            selector,
            label: None,
            expected,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn check(&self, tree: &ConfigTree) -> Result<(), MatchError> {
        let records = tree
            .get(&self.block_type)
            .ok_or_else(|| MatchError::MissingBlockType {
                block_type: self.block_type.clone(),
            })?;

        let record = self.selector.select(&self.block_type, records)?;
        matcher::matches(record, &self.expected)?;

        if let Some(want) = &self.label {
            let got = record.label();
            if got != Some(want.as_str()) {
                return Err(MatchError::ValueMismatch {
                    key: "label".to_string(),
                    expected: Value::from(want.as_str()),
                    actual: got.map_or_else(Value::null, Value::from),
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug)]
pub struct Outcome {
    pub scenario: String,
    pub result: Result<(), MatchError>,
}

impl Outcome {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Default)]
pub struct Report {
    pub outcomes: Vec<Outcome>,
}

impl Report {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// First failure, if any.
    pub fn into_result(self) -> Result<(), MatchError> {
        self.outcomes.into_iter().try_for_each(|o| o.result)
    }
}

/// Runs every scenario against the tree. A failing scenario does not stop
/// the others.
pub fn run(tree: &ConfigTree, scenarios: &[Scenario]) -> Report {
    let outcomes = scenarios
        .iter()
        .map(|scenario| {
            let result = scenario.check(tree);
            match &result {
                Ok(()) => tracing::debug!(scenario = %scenario.name, "scenario passed"),
                Err(err) => tracing::warn!(scenario = %scenario.name, error = %err, "scenario failed"),
            }
            Outcome {
                scenario: scenario.name.clone(),
                result,
            }
        })
        .collect();

    Report { outcomes }
}
