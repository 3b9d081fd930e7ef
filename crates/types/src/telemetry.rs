//! Device telemetry records from the external ingestion feed
//!
//! The feed is an unrelated read-only JSON endpoint polled on a fixed
//! interval; it is independent of the reconciliation core.

use serde::{Deserialize, Serialize};

/// One periodic meter reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub timestamp: String,
    #[serde(rename = "energyMeterID")]
    pub energy_meter_id: String,
    pub voltage: f64,
    pub current: f64,
    pub power: f64,
    pub energy: f64,
    pub frequency: f64,
    /// Power factor.
    pub pf: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_feed_field_names() {
        let raw = r#"{
            "timestamp": "2025-08-25 10:15:00",
            "energyMeterID": "EM-042",
            "voltage": 229.8,
            "current": 4.31,
            "power": 986.2,
            "energy": 12.47,
            "frequency": 50.02,
            "pf": 0.97
        }"#;
        let record: TelemetryRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.energy_meter_id, "EM-042");
        assert_eq!(record.pf, 0.97);
    }
}
