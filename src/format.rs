//! Display helpers for result values: SI-scaled numbers, labels, units.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Case-sensitive replacements applied after word capitalization, in order.
const ACRONYMS: &[(&str, &str)] = &[
    ("Db", "dB"),
    ("Snr", "SNR"),
    ("Eirp", "EIRP"),
    ("Fspl", "FSPL"),
    ("Ofdm", "OFDM"),
    ("Rb", "RB"),
    ("Re", "RE"),
    ("Km2", "km²"),
];

const UNITS: &[(&str, &str)] = &[
    ("sampler_output_rate", "samples/sec"),
    ("quantizer_output_rate", "bits/sec"),
    ("source_encoder_output_rate", "bits/sec"),
    ("channel_encoder_output_rate", "bits/sec"),
    ("interleaver_output_rate", "bits/sec"),
    ("burst_formatting_output_rate", "bits/sec"),
    ("resource_element_rate", "bits/RE"),
    ("ofdm_symbol_rate", "bits/symbol"),
    ("ofdm_symbol_rate_hz", "Hz"),
    ("resource_block_rate", "bits/sec"),
    ("max_transmission_capacity", "bits/sec"),
    ("spectral_efficiency", "bits/sec/Hz"),
    ("fspl_db", "dB"),
    ("received_power_dbm", "dBm"),
    ("noise_power_dbm", "dBm"),
    ("snr_db", "dB"),
    ("total_users", "users"),
    ("total_traffic_erlang", "Mbps"),
    ("cell_area_km2", "km²"),
    ("link_margin_db", "dB"),
    ("required_cells", "cells"),
];

/// Scaled, human-readable number. Never fails: non-finite input is "Invalid".
///
/// Exact ties round away from zero (`2.125` -> `2.13`).
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return "Invalid".to_string();
    }
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{}G", fixed2(value / 1e9))
    } else if abs >= 1e6 {
        format!("{}M", fixed2(value / 1e6))
    } else if abs >= 1e3 {
        format!("{}k", fixed2(value / 1e3))
    } else if value == 0.0 {
        // also catches -0.0
        "0.00".to_string()
    } else if abs < 1.0 {
        sci3(value)
    } else {
        fixed2(value)
    }
}

/// Below this no double sits exactly on a 4-digit tie.
const TIE_FLOOR: f64 = 1e-12;

fn fixed2(x: f64) -> String {
    match Decimal::from_f64_retain(x) {
        Some(d) => format!("{:.2}", d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)),
        // beyond Decimal's range every double is an integer, so no ties
        None => format!("{x:.2}"),
    }
}

fn sci3(x: f64) -> String {
    if x.abs() < TIE_FLOOR {
        return format!("{x:.3e}");
    }
    let rounded = Decimal::from_f64_retain(x)
        .and_then(|d| d.round_sf_with_strategy(4, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64());
    // the rounded value is a 4-digit decimal, so `{:.3e}` reproduces it
    format!("{:.3e}", rounded.unwrap_or(x))
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// `snr_db` -> `SNR dB`, `cell_area_km2` -> `Cell Area km²`.
pub fn format_label(key: &str) -> String {
    let spaced = key.replace('_', " ");

    let mut out = String::with_capacity(spaced.len());
    let mut prev_word = false;
    for c in spaced.chars() {
        let word = is_word_char(c);
        if word && !prev_word {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        prev_word = word;
    }

    ACRONYMS
        .iter()
        .fold(out, |acc, (from, to)| acc.replace(from, to))
}

/// Unit for a known result key, or "" when the key is not in the table.
pub fn unit_for(key: &str) -> &'static str {
    UNITS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, u)| *u)
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_ladder() {
        assert_eq!(format_value(1500.0), "1.50k");
        assert_eq!(format_value(2_500_000.0), "2.50M");
        assert_eq!(format_value(3.2e9), "3.20G");
        assert_eq!(format_value(42.0), "42.00");
        assert_eq!(format_value(-1500.0), "-1.50k");
        assert_eq!(format_value(999.0), "999.00");
    }

    #[test]
    fn exact_ties_round_away_from_zero() {
        assert_eq!(format_value(2125.0), "2.13k");
        assert_eq!(format_value(3_125_000.0), "3.13M");
        assert_eq!(format_value(2.125), "2.13");
        assert_eq!(format_value(-2.125), "-2.13");
        assert_eq!(format_value(0.0078125), "7.813e-3");
        assert_eq!(format_value(-0.0078125), "-7.813e-3");
        // not a tie in binary: 2.675 is stored just below
        assert_eq!(format_value(2.675), "2.67");
    }

    #[test]
    fn small_values_use_scientific_notation() {
        assert_eq!(format_value(0.0005), "5.000e-4");
        assert_eq!(format_value(-0.25), "-2.500e-1");
    }

    #[test]
    fn zero_and_non_finite() {
        assert_eq!(format_value(0.0), "0.00");
        assert_eq!(format_value(-0.0), "0.00");
        assert_eq!(format_value(f64::NAN), "Invalid");
        assert_eq!(format_value(f64::INFINITY), "Invalid");
        assert_eq!(format_value(f64::NEG_INFINITY), "Invalid");
    }

    #[test]
    fn labels_apply_acronyms() {
        assert_eq!(format_label("snr_db"), "SNR dB");
        assert_eq!(format_label("fspl_db"), "FSPL dB");
        assert_eq!(format_label("cell_area_km2"), "Cell Area km²");
        assert_eq!(format_label("ofdm_symbol_rate_hz"), "OFDM Symbol Rate Hz");
        assert_eq!(format_label("transmit_power_dbm"), "Transmit Power dBm");
    }

    #[test]
    fn acronym_table_matches_inside_words() {
        // "Re" also hits "Required"/"Resource"; kept for parity with existing output.
        assert_eq!(format_label("required_snr_db"), "REquired SNR dB");
        assert_eq!(format_label("resource_block_rate"), "REsource Block Rate");
        assert_eq!(format_label("subcarriers_per_rb"), "Subcarriers Per RB");
    }

    #[test]
    fn labels_capitalize_after_any_separator() {
        assert_eq!(format_label("link-margin"), "Link-Margin");
        assert_eq!(format_label("input_rate"), "Input Rate");
    }

    #[test]
    fn units() {
        assert_eq!(unit_for("fspl_db"), "dB");
        assert_eq!(unit_for("cell_area_km2"), "km²");
        assert_eq!(unit_for("unknown_key"), "");
    }
}
