use crate::error::DataError;
use chrono::NaiveDate;
use core_types::{Event, EventCategory, ImpactLevel};
use std::collections::HashSet;
use std::path::Path;

const fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid catalog date"),
    }
}

/// `(id, name, date, category, impact level, description, nominal impact)`
type EventRow = (
    u32,
    &'static str,
    NaiveDate,
    EventCategory,
    ImpactLevel,
    &'static str,
    &'static str,
);

#[rustfmt::skip]
const HISTORICAL_EVENTS: [EventRow; 13] = [
    (1, "Iraq invades Kuwait", ymd(1990, 8, 2), EventCategory::MilitaryConflict, ImpactLevel::High,
        "Iraq invades Kuwait, leading to Gulf War and major oil supply disruption", "+45%"),
    (2, "Gulf War begins", ymd(1991, 1, 17), EventCategory::MilitaryConflict, ImpactLevel::High,
        "Allied forces begin Operation Desert Storm against Iraq", "-15%"),
    (3, "Asian Financial Crisis", ymd(1997, 7, 1), EventCategory::EconomicCrisis, ImpactLevel::Medium,
        "Asian financial crisis begins, reducing global oil demand", "-25%"),
    (4, "September 11 Attacks", ymd(2001, 9, 11), EventCategory::TerroristAttack, ImpactLevel::Medium,
        "Terrorist attacks in US cause global market disruption", "+8%"),
    (5, "Iraq War begins", ymd(2003, 3, 20), EventCategory::MilitaryConflict, ImpactLevel::High,
        "US-led invasion of Iraq begins, affecting major oil producer", "+35%"),
    (6, "Lehman Brothers collapse", ymd(2008, 9, 15), EventCategory::EconomicCrisis, ImpactLevel::VeryHigh,
        "Lehman Brothers bankruptcy triggers global financial crisis", "-75%"),
    (7, "Arab Spring begins", ymd(2010, 12, 17), EventCategory::PoliticalUnrest, ImpactLevel::Medium,
        "Arab Spring protests begin in Tunisia, spreading regional instability", "+20%"),
    (8, "Libyan Civil War", ymd(2011, 2, 15), EventCategory::PoliticalUnrest, ImpactLevel::High,
        "Libyan Civil War severely disrupts oil production", "+15%"),
    (9, "OPEC maintains production", ymd(2014, 11, 27), EventCategory::OpecDecision, ImpactLevel::High,
        "OPEC decides not to cut production despite falling prices", "-50%"),
    (10, "OPEC production cut", ymd(2016, 11, 30), EventCategory::OpecDecision, ImpactLevel::Medium,
        "OPEC agrees to first production cut since 2008", "+25%"),
    (11, "US exits Iran nuclear deal", ymd(2018, 5, 8), EventCategory::Sanctions, ImpactLevel::Medium,
        "US withdraws from Iran nuclear deal, reimposing sanctions", "+12%"),
    (12, "COVID-19 pandemic declared", ymd(2020, 3, 11), EventCategory::Pandemic, ImpactLevel::VeryHigh,
        "WHO declares COVID-19 pandemic, causing massive demand destruction", "-65%"),
    (13, "Russia invades Ukraine", ymd(2022, 2, 24), EventCategory::MilitaryConflict, ImpactLevel::VeryHigh,
        "Russia invades Ukraine, major oil and gas producer involved in conflict", "+40%"),
];

/// A fixed, ordered set of geopolitical events with unique positive ids.
#[derive(Debug, Clone, PartialEq)]
pub struct EventCatalog {
    events: Vec<Event>,
}

impl EventCatalog {
    /// Validates and wraps a list of events, keeping their order.
    pub fn new(events: Vec<Event>) -> Result<Self, DataError> {
        let mut seen = HashSet::with_capacity(events.len());
        for event in &events {
            if event.id == 0 {
                return Err(DataError::InvalidCatalog(format!(
                    "event '{}' has id 0; ids must be positive",
                    event.name
                )));
            }
            if !seen.insert(event.id) {
                return Err(DataError::InvalidCatalog(format!(
                    "event id {} is used more than once",
                    event.id
                )));
            }
        }
        Ok(Self { events })
    }

    /// The built-in catalog of thirteen market-moving events since 1990.
    pub fn historical() -> Self {
        let events = HISTORICAL_EVENTS
            .iter()
            .map(|&(id, name, date, category, impact_level, description, nominal)| Event {
                id,
                name: name.to_string(),
                date,
                category,
                impact_level,
                description: description.to_string(),
                nominal_price_impact: nominal.to_string(),
            })
            .collect();
        Self { events }
    }

    /// Reads a JSON array of events in the API's wire shape.
    pub fn from_json(path: &Path) -> Result<Self, DataError> {
        if !path.exists() {
            return Err(DataError::MissingFile(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        let events: Vec<Event> = serde_json::from_str(&raw)?;
        Self::new(events)
    }

    /// Uses the override file when one is configured and valid, the built-in
    /// catalog otherwise.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::historical();
        };
        match Self::from_json(path) {
            Ok(catalog) => {
                tracing::info!(
                    path = %path.display(),
                    events = catalog.len(),
                    "Loaded event catalog."
                );
                catalog
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Event catalog rejected, using the built-in catalog."
                );
                Self::historical()
            }
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events matching every supplied filter, in catalog order.
    pub fn query(
        &self,
        category: Option<EventCategory>,
        impact_level: Option<ImpactLevel>,
    ) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| category.is_none_or(|c| e.category == c))
            .filter(|e| impact_level.is_none_or(|l| e.impact_level == l))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: u32) -> Result<&Event, DataError> {
        self.events
            .iter()
            .find(|e| e.id == id)
            .ok_or(DataError::EventNotFound(id))
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> Vec<EventCategory> {
        let mut distinct = Vec::new();
        for event in &self.events {
            if !distinct.contains(&event.category) {
                distinct.push(event.category);
            }
        }
        distinct
    }

    /// Distinct impact levels in order of first appearance.
    pub fn impact_levels(&self) -> Vec<ImpactLevel> {
        let mut distinct = Vec::new();
        for event in &self.events {
            if !distinct.contains(&event.impact_level) {
                distinct.push(event.impact_level);
            }
        }
        distinct
    }
}
