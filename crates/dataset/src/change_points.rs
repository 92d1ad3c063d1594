use crate::error::DataError;
use chrono::NaiveDate;
use core_types::{ChangePoint, ChangePointKind};
use std::collections::HashSet;
use std::path::Path;

const fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid change point date"),
    }
}

#[rustfmt::skip]
const PUBLISHED: [(u32, NaiveDate, f64, ChangePointKind, f64, &str); 4] = [
    (1, ymd(1990, 8, 15), 0.95, ChangePointKind::MeanShift, 0.45,
        "Major structural break during Gulf crisis"),
    (2, ymd(2008, 9, 20), 0.89, ChangePointKind::MeanShift, -0.75,
        "Financial crisis impact on oil markets"),
    (3, ymd(2014, 12, 1), 0.92, ChangePointKind::TrendChange, -0.50,
        "OPEC policy shift and shale oil impact"),
    (4, ymd(2020, 3, 15), 0.98, ChangePointKind::VolatilityShift, -0.65,
        "COVID-19 pandemic demand shock"),
];

/// Precomputed structural breaks. The service never computes or alters them.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangePointRegistry {
    points: Vec<ChangePoint>,
}

impl ChangePointRegistry {
    pub fn new(points: Vec<ChangePoint>) -> Result<Self, DataError> {
        let mut seen = HashSet::with_capacity(points.len());
        for point in &points {
            if !(0.0..=1.0).contains(&point.confidence) {
                return Err(DataError::InvalidCatalog(format!(
                    "change point {} has confidence {} outside [0, 1]",
                    point.id, point.confidence
                )));
            }
            if !seen.insert(point.id) {
                return Err(DataError::InvalidCatalog(format!(
                    "change point id {} is used more than once",
                    point.id
                )));
            }
        }
        Ok(Self { points })
    }

    /// The four breaks identified by the offline Bayesian analysis.
    pub fn published() -> Self {
        let points = PUBLISHED
            .iter()
            .map(|&(id, date, confidence, kind, magnitude, description)| ChangePoint {
                id,
                date,
                confidence,
                kind,
                magnitude,
                description: description.to_string(),
            })
            .collect();
        Self { points }
    }

    pub fn from_json(path: &Path) -> Result<Self, DataError> {
        if !path.exists() {
            return Err(DataError::MissingFile(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        Self::new(serde_json::from_str(&raw)?)
    }

    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::published();
        };
        match Self::from_json(path) {
            Ok(registry) => {
                tracing::info!(
                    path = %path.display(),
                    points = registry.len(),
                    "Loaded change points."
                );
                registry
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Change points rejected, using the published set."
                );
                Self::published()
            }
        }
    }

    pub fn all(&self) -> &[ChangePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
