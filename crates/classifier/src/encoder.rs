//! Feature encoding for observations
//!
//! Numeric fields pass through unchanged; categorical fields become
//! `field:VALUE` indicator columns. Column order is fixed by the schema
//! (field declaration order, then declared domain order), so encoding never
//! depends on row order.

use classvent_types::{ClimateMode, Observation, WindowState};
use std::collections::HashMap;

use crate::errors::{ClassifierError, Result};

/// Encoded rows, one `Vec<i64>` per observation
pub type FeatureMatrix = Vec<Vec<i64>>;

/// An observation field as seen by the encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    StudentCount,
    LessonDuration,
    WindowState,
    ClimateMode,
    OutsideTemperature,
}

impl Field {
    /// Declaration order; also the column order of every encoding.
    pub const ALL: [Field; 5] = [
        Field::StudentCount,
        Field::LessonDuration,
        Field::WindowState,
        Field::ClimateMode,
        Field::OutsideTemperature,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::StudentCount => "student_count",
            Field::LessonDuration => "lesson_duration_minutes",
            Field::WindowState => "window_state",
            Field::ClimateMode => "climate_mode",
            Field::OutsideTemperature => "outside_temperature_celsius",
        }
    }

    /// Declared values of a categorical field; `None` for numeric fields.
    pub fn domain(&self) -> Option<Vec<&'static str>> {
        match self {
            Field::WindowState => Some(WindowState::ALL.iter().map(|v| v.as_str()).collect()),
            Field::ClimateMode => Some(ClimateMode::ALL.iter().map(|v| v.as_str()).collect()),
            _ => None,
        }
    }

    fn numeric(&self, obs: &Observation) -> i64 {
        match self {
            Field::StudentCount => obs.student_count as i64,
            Field::LessonDuration => obs.lesson_duration_minutes as i64,
            Field::OutsideTemperature => obs.outside_temperature_celsius as i64,
            Field::WindowState | Field::ClimateMode => 0,
        }
    }

    fn category(&self, obs: &Observation) -> Option<&'static str> {
        match self {
            Field::WindowState => Some(obs.window_state.as_str()),
            Field::ClimateMode => Some(obs.climate_mode.as_str()),
            _ => None,
        }
    }
}

/// One encoded column: a numeric field, or one value of a categorical field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Column {
    pub field: Field,
    pub value: Option<&'static str>,
}

impl Column {
    pub fn name(&self) -> String {
        match self.value {
            Some(value) => format!("{}:{}", self.field.name(), value),
            None => self.field.name().to_string(),
        }
    }

    fn encode(&self, obs: &Observation) -> i64 {
        match self.value {
            None => self.field.numeric(obs),
            Some(value) => i64::from(self.field.category(obs) == Some(value)),
        }
    }
}

/// Ordered (field, domain) declaration driving column generation
pub struct FeatureSchema;

impl FeatureSchema {
    /// Every column the schema can produce, in schema order
    pub fn all_columns() -> Vec<Column> {
        Self::columns_where(|_, _| true)
    }

    /// Numeric columns plus an indicator for each categorical value that
    /// occurs somewhere in `observations`, in schema order
    pub fn observed_columns(observations: &[Observation]) -> Vec<Column> {
        Self::columns_where(|field, value| {
            observations
                .iter()
                .any(|obs| field.category(obs) == Some(value))
        })
    }

    fn columns_where<F>(mut keep: F) -> Vec<Column>
    where
        F: FnMut(Field, &'static str) -> bool,
    {
        let mut columns = Vec::new();
        for field in Field::ALL {
            match field.domain() {
                None => columns.push(Column { field, value: None }),
                Some(domain) => columns.extend(
                    domain
                        .into_iter()
                        .filter(|value| keep(field, *value))
                        .map(|value| Column {
                            field,
                            value: Some(value),
                        }),
                ),
            }
        }
        columns
    }
}

/// Encode a batch of observations
///
/// Without `reference_columns` the columns are learned from the batch. With a
/// reference, the output has exactly the reference columns in reference
/// order: reference columns the batch did not produce are zero-filled and
/// batch columns outside the reference are dropped.
pub fn encode(
    observations: &[Observation],
    reference_columns: Option<&[String]>,
) -> Result<(FeatureMatrix, Vec<String>)> {
    let columns = FeatureSchema::observed_columns(observations);
    let names: Vec<String> = columns.iter().map(Column::name).collect();

    let matrix: FeatureMatrix = observations
        .iter()
        .map(|obs| columns.iter().map(|c| c.encode(obs)).collect())
        .collect();

    match reference_columns {
        None => Ok((matrix, names)),
        Some(reference) => {
            let aligned = align(&matrix, &names, reference)?;
            Ok((aligned, reference.to_vec()))
        }
    }
}

/// Encode a single observation against a known column list
pub fn encode_row(observation: &Observation, reference_columns: &[String]) -> Result<Vec<i64>> {
    let (mut matrix, _) = encode(std::slice::from_ref(observation), Some(reference_columns))?;
    matrix
        .pop()
        .ok_or_else(|| ClassifierError::EncodingMismatch("encoder produced no row".to_string()))
}

fn align(matrix: &FeatureMatrix, names: &[String], reference: &[String]) -> Result<FeatureMatrix> {
    let position: HashMap<&str, usize> = names
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.as_str(), idx))
        .collect();

    let mut seen = HashMap::with_capacity(reference.len());
    for (idx, name) in reference.iter().enumerate() {
        if let Some(first) = seen.insert(name.as_str(), idx) {
            return Err(ClassifierError::EncodingMismatch(format!(
                "reference column {:?} appears at positions {} and {}",
                name, first, idx
            )));
        }
    }

    let sources: Vec<Option<usize>> = reference
        .iter()
        .map(|name| position.get(name.as_str()).copied())
        .collect();

    Ok(matrix
        .iter()
        .map(|row| {
            sources
                .iter()
                .map(|source| source.map_or(0, |idx| row[idx]))
                .collect()
        })
        .collect())
}
