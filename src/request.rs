//! Form values -> validated numeric request payload.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::format::format_label;
use crate::scenario::{FieldKind, Scenario};

/// Raw form input, as typed.
pub type FormValues = BTreeMap<String, String>;

pub const MODULATION_ORDERS: [u32; 4] = [4, 16, 64, 256];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{} is required", format_label(.0))]
    MissingField(String),
    #[error("{} must be a number", format_label(.0))]
    InvalidNumber(String),
    #[error("Invalid modulation order '{0}'. Must be 4, 16, 64, or 256.")]
    InvalidModulationOrder(String),
    #[error("Unknown scenario '{0}'")]
    UnknownScenario(String),
}

/// Every problem found in one form, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// One line per error.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("\n"))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(e: ValidationError) -> Self {
        Self(vec![e])
    }
}

/// Field name -> number, in field-table order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestPayload(pub Vec<(String, f64)>);

impl Serialize for RequestPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

impl RequestPayload {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.iter().find(|(k, _)| k == name).map(|(_, v)| *v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .0
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::json!(v)))
            .collect();
        serde_json::Value::Object(map)
    }
}

/// A validated request, ready for the client.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationRequest {
    pub scenario: Scenario,
    pub endpoint: &'static str,
    pub payload: RequestPayload,
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn modulation_bits(raw: &str) -> Option<f64> {
    let order = parse_finite(raw)?;
    MODULATION_ORDERS
        .iter()
        .find(|o| f64::from(**o) == order)
        .map(|o| f64::from(*o).log2())
}

/// Validate `raw` against the scenario's field table and build the payload.
///
/// Unknown ids fail before any field is looked at. Otherwise all missing and
/// malformed fields are reported together; keys outside the table are dropped.
pub fn build(scenario_id: &str, raw: &FormValues) -> Result<CalculationRequest, ValidationErrors> {
    let scenario = Scenario::from_id(scenario_id)?;
    build_for(scenario, raw)
}

pub fn build_for(scenario: Scenario, raw: &FormValues) -> Result<CalculationRequest, ValidationErrors> {
    let mut errors = Vec::new();
    let mut payload = Vec::new();

    for spec in scenario.fields() {
        let value = raw.get(spec.name).map(|v| v.trim()).unwrap_or("");
        if value.is_empty() {
            if spec.required {
                errors.push(ValidationError::MissingField(spec.name.to_string()));
            }
            continue;
        }

        match spec.kind {
            FieldKind::Numeric => match parse_finite(value) {
                Some(n) => payload.push((spec.name.to_string(), n)),
                None => errors.push(ValidationError::InvalidNumber(spec.name.to_string())),
            },
            FieldKind::ModulationOrder => match modulation_bits(value) {
                Some(bits) => payload.push((spec.name.to_string(), bits)),
                None => errors.push(ValidationError::InvalidModulationOrder(value.to_string())),
            },
        }
    }

    if !errors.is_empty() {
        return Err(ValidationErrors(errors));
    }

    Ok(CalculationRequest {
        scenario,
        endpoint: scenario.endpoint(),
        payload: RequestPayload(payload),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> FormValues {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn ofdm_with(order: &str) -> FormValues {
        values(&[
            ("subcarrier_spacing", "15000"),
            ("symbol_duration", "0.0000667"),
            ("modulation_order", order),
            ("coding_rate", "0.75"),
            ("num_subcarriers", "1200"),
        ])
    }

    #[test]
    fn complete_form_becomes_numeric_payload() {
        let raw = values(&[
            ("transmit_power_dbm", "30"),
            ("frequency_mhz", "2400"),
            ("distance_km", " 1.5 "),
        ]);
        let req = build("link-budget", &raw).unwrap();
        assert_eq!(req.endpoint, "/api/link-budget");
        assert_eq!(req.payload.len(), 3);
        assert_eq!(req.payload.get("transmit_power_dbm"), Some(30.0));
        assert_eq!(req.payload.get("frequency_mhz"), Some(2400.0));
        assert_eq!(req.payload.get("distance_km"), Some(1.5));
    }

    #[test]
    fn each_missing_field_is_named() {
        let full = values(&[
            ("transmit_power_dbm", "30"),
            ("frequency_mhz", "2400"),
            ("distance_km", "1"),
        ]);
        for field in Scenario::LinkBudget.required_fields() {
            let mut raw = full.clone();
            raw.remove(field);
            let err = build("link-budget", &raw).unwrap_err();
            assert_eq!(err.errors(), &[ValidationError::MissingField(field.to_string())]);
        }
    }

    #[test]
    fn validation_is_exhaustive() {
        let err = build("wireless-comm", &FormValues::new()).unwrap_err();
        assert_eq!(err.errors().len(), 5);
        assert_eq!(err.messages()[0], "Input Rate is required");
    }

    #[test]
    fn blank_values_count_as_missing() {
        let raw = values(&[("transmit_power_dbm", "   "), ("frequency_mhz", "2400"), ("distance_km", "1")]);
        let err = build("link-budget", &raw).unwrap_err();
        assert_eq!(err.errors(), &[ValidationError::MissingField("transmit_power_dbm".into())]);
    }

    #[test]
    fn modulation_order_becomes_bits_per_symbol() {
        for (order, bits) in [("4", 2.0), ("16", 4.0), ("64", 6.0), ("256", 8.0)] {
            let req = build("ofdm", &ofdm_with(order)).unwrap();
            assert_eq!(req.payload.get("modulation_order"), Some(bits));
        }
    }

    #[test]
    fn bad_modulation_order_is_rejected() {
        for order in ["8", "2", "32", "qpsk", "-16"] {
            let err = build("ofdm", &ofdm_with(order)).unwrap_err();
            assert_eq!(
                err.errors(),
                &[ValidationError::InvalidModulationOrder(order.to_string())]
            );
        }
    }

    #[test]
    fn missing_and_modulation_errors_aggregate() {
        let mut raw = ofdm_with("12");
        raw.remove("coding_rate");
        let err = build("ofdm", &raw).unwrap_err();
        assert_eq!(
            err.errors(),
            &[
                ValidationError::InvalidModulationOrder("12".into()),
                ValidationError::MissingField("coding_rate".into()),
            ]
        );
    }

    #[test]
    fn non_numeric_and_unknown_fields() {
        let mut raw = values(&[
            ("transmit_power_dbm", "thirty"),
            ("frequency_mhz", "2400"),
            ("distance_km", "1"),
            ("site_name", "north-ridge"),
        ]);
        let err = build("link-budget", &raw).unwrap_err();
        assert_eq!(err.errors(), &[ValidationError::InvalidNumber("transmit_power_dbm".into())]);

        raw.insert("transmit_power_dbm".into(), "30".into());
        let req = build("link-budget", &raw).unwrap();
        assert!(req.payload.keys().all(|k| k != "site_name"));
    }

    #[test]
    fn optional_fields_are_included_when_present() {
        let raw = values(&[
            ("transmit_power_dbm", "30"),
            ("frequency_mhz", "2400"),
            ("distance_km", "1"),
            ("noise_figure_db", "5"),
        ]);
        let req = build("link-budget", &raw).unwrap();
        assert_eq!(req.payload.get("noise_figure_db"), Some(5.0));
    }

    #[test]
    fn unknown_scenario_fails_first() {
        let err = build("satellite", &FormValues::new()).unwrap_err();
        assert_eq!(err.errors(), &[ValidationError::UnknownScenario("satellite".into())]);
    }

    #[test]
    fn infinite_input_is_not_a_number() {
        let raw = values(&[("transmit_power_dbm", "inf"), ("frequency_mhz", "2400"), ("distance_km", "1")]);
        assert!(build("link-budget", &raw).is_err());
    }

    #[test]
    fn payload_serializes_as_object() {
        let raw = values(&[("transmit_power_dbm", "30"), ("frequency_mhz", "2400"), ("distance_km", "1")]);
        let req = build("link-budget", &raw).unwrap();
        assert_eq!(
            req.payload.to_json(),
            serde_json::json!({"transmit_power_dbm": 30.0, "frequency_mhz": 2400.0, "distance_km": 1.0})
        );
    }
}
