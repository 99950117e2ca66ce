//! Alert — a discrete event raised against the latest bar of a series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What condition an alert reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    PriceBreakout,
    AbnormalAmplitude,
    FundFlow,
}

/// Direction of a directional alert (breakout or fund flow).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertDirection {
    Up,
    Down,
    Inflow,
    Outflow,
}

/// Severity of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Info,
    Warning,
}

/// An informational alert. `message` is a human-readable rendering of the
/// breached numeric condition; consumers should branch on the structured
/// fields, not parse the text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub direction: Option<AlertDirection>,
    pub date: NaiveDate,
    pub message: String,
    pub level: AlertLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_serialization_roundtrip() {
        let alert = Alert {
            kind: AlertKind::PriceBreakout,
            direction: Some(AlertDirection::Up),
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            message: "price breakout up: close 103.00 above 5-day high 100.00".into(),
            level: AlertLevel::Warning,
        };
        let json = serde_json::to_string(&alert).unwrap();
        let deser: Alert = serde_json::from_str(&json).unwrap();
        assert_eq!(deser.kind, AlertKind::PriceBreakout);
        assert_eq!(deser.direction, Some(AlertDirection::Up));
        assert_eq!(deser.level, AlertLevel::Warning);
    }

    #[test]
    fn kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&AlertKind::AbnormalAmplitude).unwrap(),
            "\"abnormal_amplitude\""
        );
    }
}
