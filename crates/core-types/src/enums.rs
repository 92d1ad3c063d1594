use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The broad class of a geopolitical event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    #[serde(rename = "Military_Conflict")]
    MilitaryConflict,
    #[serde(rename = "Economic_Crisis")]
    EconomicCrisis,
    #[serde(rename = "Terrorist_Attack")]
    TerroristAttack,
    #[serde(rename = "Political_Unrest")]
    PoliticalUnrest,
    #[serde(rename = "OPEC_Decision")]
    OpecDecision,
    #[serde(rename = "Sanctions")]
    Sanctions,
    #[serde(rename = "Pandemic")]
    Pandemic,
}

impl EventCategory {
    pub const ALL: [EventCategory; 7] = [
        EventCategory::MilitaryConflict,
        EventCategory::EconomicCrisis,
        EventCategory::TerroristAttack,
        EventCategory::PoliticalUnrest,
        EventCategory::OpecDecision,
        EventCategory::Sanctions,
        EventCategory::Pandemic,
    ];

    /// The wire label, identical to the serde representation.
    pub fn label(&self) -> &'static str {
        match self {
            EventCategory::MilitaryConflict => "Military_Conflict",
            EventCategory::EconomicCrisis => "Economic_Crisis",
            EventCategory::TerroristAttack => "Terrorist_Attack",
            EventCategory::PoliticalUnrest => "Political_Unrest",
            EventCategory::OpecDecision => "OPEC_Decision",
            EventCategory::Sanctions => "Sanctions",
            EventCategory::Pandemic => "Pandemic",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EventCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventCategory::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| CoreError::InvalidInput("event category".to_string(), s.to_string()))
    }
}

/// How strongly an event is expected to move the market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ImpactLevel {
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl ImpactLevel {
    pub const ALL: [ImpactLevel; 3] = [
        ImpactLevel::Medium,
        ImpactLevel::High,
        ImpactLevel::VeryHigh,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ImpactLevel::Medium => "Medium",
            ImpactLevel::High => "High",
            ImpactLevel::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ImpactLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImpactLevel::ALL
            .into_iter()
            .find(|l| l.label() == s)
            .ok_or_else(|| CoreError::InvalidInput("impact level".to_string(), s.to_string()))
    }
}

/// The kind of structural break a change point annotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangePointKind {
    MeanShift,
    TrendChange,
    VolatilityShift,
}
