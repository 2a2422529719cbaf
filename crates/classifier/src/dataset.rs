//! Labeled observation dataset
//!
//! Provides the built-in historical table and a CSV loader. A dataset is
//! immutable once constructed and is shared by reference across evaluations.

use anyhow::{Context, Result};
use classvent_types::{
    ClimateMode, LabeledObservation, Observation, VentilationLabel, WindowState,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use classvent_types::ClimateMode::{Cooling, Heating};
use classvent_types::VentilationLabel::{No, Yes};
use classvent_types::WindowState::{Closed, Open};

/// Header expected (and skipped) by [`Dataset::from_csv`]
pub const CSV_HEADER: [&str; 6] = [
    "student_count",
    "lesson_duration_minutes",
    "window_state",
    "climate_mode",
    "outside_temperature_celsius",
    "ventilation_label",
];

const BUILTIN_ROWS: [(i32, i32, WindowState, ClimateMode, i32, VentilationLabel); 30] = [
    (30, 45, Closed, Cooling, 32, No),
    (28, 50, Closed, Heating, 20, Yes),
    (35, 60, Closed, Cooling, 33, No),
    (22, 30, Open, Heating, 18, Yes),
    (25, 40, Open, Heating, 15, Yes),
    (31, 55, Closed, Cooling, 30, No),
    (34, 50, Closed, Cooling, 29, No),
    (20, 30, Open, Heating, 13, Yes),
    (27, 35, Closed, Heating, 25, Yes),
    (26, 40, Open, Cooling, 31, No),
    (32, 60, Closed, Cooling, 34, No),
    (29, 50, Closed, Heating, 21, Yes),
    (21, 30, Open, Heating, 14, No),
    (33, 55, Closed, Cooling, 32, No),
    (23, 35, Open, Heating, 17, Yes),
    (24, 40, Open, Heating, 16, Yes),
    (26, 45, Closed, Cooling, 33, No),
    (30, 60, Closed, Cooling, 30, No),
    (28, 50, Closed, Heating, 19, Yes),
    (25, 40, Open, Cooling, 31, No),
    (22, 35, Open, Heating, 18, Yes),
    (27, 45, Closed, Cooling, 26, No),
    (29, 50, Closed, Cooling, 22, Yes),
    (31, 60, Closed, Heating, 30, No),
    (20, 30, Open, Heating, 15, Yes),
    (21, 40, Open, Heating, 17, Yes),
    (32, 55, Closed, Cooling, 32, No),
    (34, 60, Closed, Cooling, 33, No),
    (26, 45, Closed, Cooling, 28, No),
    (25, 35, Open, Heating, 19, Yes),
];

/// Number of examples per class
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCounts {
    pub no: usize,
    pub yes: usize,
}

/// Observed range of one numeric field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FieldRange {
    pub field: &'static str,
    pub min: i32,
    pub max: i32,
}

/// Immutable table of labeled observations
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    rows: Vec<LabeledObservation>,
}

impl Dataset {
    pub fn new(rows: Vec<LabeledObservation>) -> Self {
        Self { rows }
    }

    /// The 30 historical classroom observations shipped with the advisor
    pub fn builtin() -> Self {
        let rows = BUILTIN_ROWS
            .iter()
            .map(|&(students, minutes, window, mode, temperature, label)| {
                Observation::new(students, minutes, window, mode, temperature).with_label(label)
            })
            .collect();
        Self { rows }
    }

    /// Load dataset from CSV file
    ///
    /// Expected columns follow [`CSV_HEADER`]; the header line, blank lines
    /// and `#` comments are skipped. Categorical values are case-insensitive.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read CSV file {}", path.as_ref().display())
        })?;

        let mut rows = Vec::new();

        for (line_idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split(',').map(|s| s.trim()).collect();
            if parts.len() != CSV_HEADER.len() {
                anyhow::bail!(
                    "Line {}: expected {} columns, got {}",
                    line_idx + 1,
                    CSV_HEADER.len(),
                    parts.len()
                );
            }

            if parts
                .iter()
                .zip(CSV_HEADER.iter())
                .all(|(got, want)| got.eq_ignore_ascii_case(want))
            {
                continue;
            }

            rows.push(parse_row(&parts).with_context(|| format!("Line {}", line_idx + 1))?);
        }

        if rows.is_empty() {
            anyhow::bail!("Dataset is empty");
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[LabeledObservation] {
        &self.rows
    }

    /// Unlabeled view of every row, in table order
    pub fn observations(&self) -> Vec<Observation> {
        self.rows.iter().map(|r| r.observation).collect()
    }

    pub fn labels(&self) -> Vec<VentilationLabel> {
        self.rows.iter().map(|r| r.ventilation_label).collect()
    }

    /// Get number of samples
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if dataset is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn label_counts(&self) -> LabelCounts {
        self.rows.iter().fold(LabelCounts::default(), |mut acc, row| {
            match row.ventilation_label {
                VentilationLabel::No => acc.no += 1,
                VentilationLabel::Yes => acc.yes += 1,
            }
            acc
        })
    }

    /// Min/max of each numeric field; empty for an empty dataset
    pub fn numeric_ranges(&self) -> Vec<FieldRange> {
        if self.rows.is_empty() {
            return Vec::new();
        }

        let extractors: [(&'static str, fn(&Observation) -> i32); 3] = [
            ("student_count", |o| o.student_count),
            ("lesson_duration_minutes", |o| o.lesson_duration_minutes),
            ("outside_temperature_celsius", |o| o.outside_temperature_celsius),
        ];

        extractors
            .iter()
            .map(|&(field, get)| {
                let values = self.rows.iter().map(|r| get(&r.observation));
                FieldRange {
                    field,
                    min: values.clone().min().unwrap_or_default(),
                    max: values.max().unwrap_or_default(),
                }
            })
            .collect()
    }

    /// Blake3 hex digest of the rows in CSV form
    ///
    /// Each row is hashed as one `\n`-terminated line with its fields in
    /// [`CSV_HEADER`] order, so a dataset and the CSV file it was loaded
    /// from share a digest. Any change to any row or to row order changes it.
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for row in &self.rows {
            hasher.update(csv_line(row).as_bytes());
        }
        hex::encode(hasher.finalize().as_bytes())
    }
}

fn csv_line(row: &LabeledObservation) -> String {
    let o = &row.observation;
    format!(
        "{},{},{},{},{},{}\n",
        o.student_count,
        o.lesson_duration_minutes,
        o.window_state,
        o.climate_mode,
        o.outside_temperature_celsius,
        row.ventilation_label
    )
}

fn parse_row(parts: &[&str]) -> Result<LabeledObservation> {
    let int = |idx: usize| -> Result<i32> {
        parts[idx]
            .parse::<i32>()
            .with_context(|| format!("column {} ({}): invalid integer", idx + 1, CSV_HEADER[idx]))
    };

    let observation = Observation::new(
        int(0)?,
        int(1)?,
        parts[2].parse()?,
        parts[3].parse()?,
        int(4)?,
    );
    Ok(observation.with_label(parts[5].parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv(body: &str) -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        write!(file, "{}", body)?;
        file.flush()?;
        Ok(file)
    }

    #[test]
    fn builtin_table_matches_history() {
        let dataset = Dataset::builtin();
        assert_eq!(dataset.len(), 30);
        assert_eq!(dataset.label_counts(), LabelCounts { no: 16, yes: 14 });

        let first = dataset.rows()[0];
        assert_eq!(
            first.observation,
            Observation::new(30, 45, WindowState::Closed, ClimateMode::Cooling, 32)
        );
        assert_eq!(first.ventilation_label, VentilationLabel::No);

        // The historical table never records a room without heating or cooling.
        assert!(dataset
            .observations()
            .iter()
            .all(|o| o.climate_mode != ClimateMode::None));
        assert!(dataset.observations().iter().all(|o| o.validate().is_ok()));
    }

    #[test]
    fn test_load_csv() -> Result<()> {
        let file = create_test_csv(
            "student_count,lesson_duration_minutes,window_state,climate_mode,outside_temperature_celsius,ventilation_label\n\
             # comment\n\
             30,45,CLOSED,COOLING,32,NO\n\
             \n\
             22,30,open,heating,18,yes\n",
        )?;
        let dataset = Dataset::from_csv(file.path())?;

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.rows()[1].observation.window_state, WindowState::Open);
        assert_eq!(dataset.rows()[1].observation.climate_mode, ClimateMode::Heating);
        assert_eq!(dataset.rows()[1].ventilation_label, VentilationLabel::Yes);
        Ok(())
    }

    #[test]
    fn csv_errors_name_the_line() -> Result<()> {
        let file = create_test_csv("30,45,CLOSED,COOLING,32,NO\n30,45,AJAR,COOLING,32,NO\n")?;
        let err = Dataset::from_csv(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Line 2"));

        let file = create_test_csv("30,45,CLOSED,COOLING\n")?;
        assert!(Dataset::from_csv(file.path()).is_err());

        let file = create_test_csv("thirty,45,CLOSED,COOLING,32,NO\n")?;
        let err = Dataset::from_csv(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid integer"));
        Ok(())
    }

    #[test]
    fn header_only_csv_is_empty() -> Result<()> {
        let file = create_test_csv(&format!("{}\n", CSV_HEADER.join(",")))?;
        assert!(Dataset::from_csv(file.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_numeric_ranges() {
        let ranges = Dataset::builtin().numeric_ranges();
        assert_eq!(
            ranges,
            vec![
                FieldRange { field: "student_count", min: 20, max: 35 },
                FieldRange { field: "lesson_duration_minutes", min: 30, max: 60 },
                FieldRange { field: "outside_temperature_celsius", min: 13, max: 34 },
            ]
        );
        assert!(Dataset::default().numeric_ranges().is_empty());
    }

    #[test]
    fn content_hash_tracks_contents() {
        let a = Dataset::builtin();
        let b = Dataset::builtin();
        assert_eq!(a.content_hash(), b.content_hash());
        assert_eq!(a.content_hash().len(), 64);

        let mut rows = a.rows().to_vec();
        rows[0].ventilation_label = VentilationLabel::Yes;
        let changed = Dataset::new(rows);
        assert_ne!(a.content_hash(), changed.content_hash());

        let mut rows = a.rows().to_vec();
        rows.swap(0, 1);
        assert_ne!(a.content_hash(), Dataset::new(rows).content_hash());
    }

    #[test]
    fn content_hash_covers_csv_lines_in_header_order() {
        let dataset = Dataset::new(vec![
            Observation::new(30, 45, WindowState::Closed, ClimateMode::Cooling, -4)
                .with_label(VentilationLabel::No),
            Observation::new(22, 30, WindowState::Open, ClimateMode::None, 18)
                .with_label(VentilationLabel::Yes),
        ]);

        let expected = blake3::hash(b"30,45,CLOSED,COOLING,-4,NO\n22,30,OPEN,NONE,18,YES\n");
        assert_eq!(dataset.content_hash(), hex::encode(expected.as_bytes()));
    }
}
