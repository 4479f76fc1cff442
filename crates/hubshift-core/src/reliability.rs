//! Reliability badge shown on professional profiles and applications

use serde::Serialize;

/// Strike count at which a professional is suspended from applying
pub const SUSPENSION_STRIKES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReliabilityBadge {
    Reliable,
    Good,
    AtRisk,
    Suspended,
}

impl ReliabilityBadge {
    pub fn from_strikes(strikes: u32) -> Self {
        match strikes {
            0 => ReliabilityBadge::Reliable,
            1 => ReliabilityBadge::Good,
            s if s < SUSPENSION_STRIKES => ReliabilityBadge::AtRisk,
            _ => ReliabilityBadge::Suspended,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReliabilityBadge::Reliable => "Reliable",
            ReliabilityBadge::Good => "Good standing",
            ReliabilityBadge::AtRisk => "At risk",
            ReliabilityBadge::Suspended => "Suspended",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ReliabilityBadge::Reliable => "green",
            ReliabilityBadge::Good => "blue",
            ReliabilityBadge::AtRisk => "amber",
            ReliabilityBadge::Suspended => "red",
        }
    }

    pub fn can_apply(&self) -> bool {
        !matches!(self, ReliabilityBadge::Suspended)
    }
}

/// Badge plus the figures behind it, as returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReliabilitySummary {
    pub badge: ReliabilityBadge,
    pub label: &'static str,
    pub color: &'static str,
    pub strikes: u32,
    pub strikes_until_suspension: u32,
    pub completed_shifts: u32,
    pub can_apply: bool,
}

impl ReliabilitySummary {
    pub fn new(strikes: u32, completed_shifts: u32) -> Self {
        let badge = ReliabilityBadge::from_strikes(strikes);
        Self {
            badge,
            label: badge.label(),
            color: badge.color(),
            strikes,
            strikes_until_suspension: SUSPENSION_STRIKES.saturating_sub(strikes),
            completed_shifts,
            can_apply: badge.can_apply(),
        }
    }
}
