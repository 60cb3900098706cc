//! Fixed catalog of calculation scenarios: field tables, endpoints, tab order.

use std::fmt;

use crate::request::ValidationError;

/// How a form field is coerced before it goes into a request payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Numeric,
    /// Must be one of 4/16/64/256; sent as log2(order).
    ModulationOrder,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub kind: FieldKind,
    pub tooltip: &'static str,
}

const fn req(name: &'static str, tooltip: &'static str) -> FieldSpec {
    FieldSpec { name, required: true, kind: FieldKind::Numeric, tooltip }
}

const fn opt(name: &'static str, tooltip: &'static str) -> FieldSpec {
    FieldSpec { name, required: false, kind: FieldKind::Numeric, tooltip }
}

const WIRELESS_COMM_FIELDS: &[FieldSpec] = &[
    req("input_rate", "The rate of the input signal in Hz"),
    req("sampling_rate", "The frequency at which the analog signal is sampled"),
    req("quantization_levels", "Number of discrete levels for quantization (e.g., 256 for 8-bit)"),
    req("source_coding_rate", "Compression ratio (0-1, where 1 means no compression)"),
    req("channel_coding_rate", "Error correction coding rate (0-1)"),
    opt("interleaver_depth", "Interleaver depth in bits"),
    opt("burst_format_overhead", "Burst formatting overhead in percent"),
];

const OFDM_FIELDS: &[FieldSpec] = &[
    req("subcarrier_spacing", "Frequency spacing between OFDM subcarriers"),
    req("symbol_duration", "Duration of one OFDM symbol in seconds"),
    FieldSpec {
        name: "modulation_order",
        required: true,
        kind: FieldKind::ModulationOrder,
        tooltip: "Number of symbols in the modulation scheme (4, 16, 64 or 256)",
    },
    req("coding_rate", "Channel coding rate (0-1)"),
    req("num_subcarriers", "Number of data subcarriers"),
    opt("num_resource_blocks", "Number of parallel resource blocks"),
    opt("bandwidth", "Occupied bandwidth in Hz"),
    opt("cyclic_prefix_duration", "Cyclic prefix duration in seconds"),
    opt("subcarriers_per_rb", "Subcarriers per resource block"),
    opt("symbols_per_slot", "OFDM symbols per slot"),
];

const LINK_BUDGET_FIELDS: &[FieldSpec] = &[
    req("transmit_power_dbm", "Transmitter output power in dBm"),
    req("frequency_mhz", "Operating frequency in MHz"),
    req("distance_km", "Distance between transmitter and receiver"),
    opt("transmit_antenna_gain_dbi", "Transmit antenna gain in dBi"),
    opt("receive_antenna_gain_dbi", "Receive antenna gain in dBi"),
    opt("noise_figure_db", "Receiver noise figure in dB"),
    opt("bandwidth_hz", "Receiver bandwidth in Hz"),
    opt("transmit_cable_loss_db", "Transmit-side cable loss in dB"),
    opt("receive_cable_loss_db", "Receive-side cable loss in dB"),
    opt("required_snr_db", "Minimum SNR required at the receiver in dB"),
];

const CELLULAR_FIELDS: &[FieldSpec] = &[
    req("coverage_area_km2", "Total area to be covered by the cellular system"),
    req("user_density_per_km2", "Number of users per square kilometer"),
    req("traffic_per_user_erlang", "Average traffic generated by each user in Erlang"),
    opt("frequency_mhz_cellular", "Operating frequency in MHz"),
    opt("base_station_power_w", "Base station transmit power in W"),
    opt("blocking_probability", "Target blocking probability (0-1)"),
    opt("frequency_reuse_factor", "Frequency reuse factor"),
    opt("total_spectrum_mhz", "Total available spectrum in MHz"),
    opt("channel_bandwidth_khz", "Channel bandwidth in kHz"),
    opt("antenna_height_m", "Base station antenna height in meters"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scenario {
    WirelessComm,
    Ofdm,
    LinkBudget,
    Cellular,
}

impl Scenario {
    /// Tab order; also the order of the Ctrl+1..4 shortcuts.
    pub const ALL: [Scenario; 4] = [
        Scenario::WirelessComm,
        Scenario::Ofdm,
        Scenario::LinkBudget,
        Scenario::Cellular,
    ];

    pub const DEFAULT: Scenario = Scenario::WirelessComm;

    pub fn id(self) -> &'static str {
        match self {
            Scenario::WirelessComm => "wireless-comm",
            Scenario::Ofdm => "ofdm",
            Scenario::LinkBudget => "link-budget",
            Scenario::Cellular => "cellular",
        }
    }

    pub fn from_id(id: &str) -> Result<Self, ValidationError> {
        Scenario::ALL
            .into_iter()
            .find(|s| s.id() == id)
            .ok_or_else(|| ValidationError::UnknownScenario(id.to_string()))
    }

    pub fn title(self) -> &'static str {
        match self {
            Scenario::WirelessComm => "Wireless Communication",
            Scenario::Ofdm => "OFDM Systems",
            Scenario::LinkBudget => "Link Budget",
            Scenario::Cellular => "Cellular Design",
        }
    }

    pub fn endpoint(self) -> &'static str {
        match self {
            Scenario::WirelessComm => "/api/wireless-communication",
            Scenario::Ofdm => "/api/ofdm-systems",
            Scenario::LinkBudget => "/api/link-budget",
            Scenario::Cellular => "/api/cellular-design",
        }
    }

    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Scenario::WirelessComm => WIRELESS_COMM_FIELDS,
            Scenario::Ofdm => OFDM_FIELDS,
            Scenario::LinkBudget => LINK_BUDGET_FIELDS,
            Scenario::Cellular => CELLULAR_FIELDS,
        }
    }

    pub fn field(self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|f| f.name == name)
    }

    pub fn required_fields(self) -> Vec<&'static str> {
        self.fields().iter().filter(|f| f.required).map(|f| f.name).collect()
    }

    /// Digit '1'..='4' -> tab.
    pub fn from_shortcut(digit: char) -> Option<Self> {
        let idx = digit.to_digit(10)? as usize;
        idx.checked_sub(1).and_then(|i| Scenario::ALL.get(i).copied())
    }

    pub fn index(self) -> usize {
        Scenario::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Required field names for a scenario id.
pub fn required_fields(scenario_id: &str) -> Result<Vec<&'static str>, ValidationError> {
    Ok(Scenario::from_id(scenario_id)?.required_fields())
}
