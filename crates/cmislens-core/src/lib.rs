//! Core decode engine for CMIS/QSFP-DD transceiver memory dumps.
//!
//! One call turns a raw byte snapshot of a module's management memory into an
//! immutable, engineering-unit [`ModuleReport`]: identity and vendor data,
//! power characteristics, cable assembly and media properties, and (for
//! fiber modules captured with the full six-page dump) per-lane monitors,
//! alarm/warning state and threshold tables. Byte positions live in
//! [`decode::layout`], access conventions in the reader, domain decoding in
//! the parsers.
//!
//! Invariants:
//! - The input buffer is never mutated and no read crosses the declared
//!   length; crossing it aborts the decode with [`DecodeError`].
//! - Reports are never partially populated: optional sections are present
//!   whole or absent whole, decided before extraction starts.
//!
//! # Examples
//! ```
//! use cmislens_core::decode_module;
//!
//! let mut dump = vec![0u8; 768];
//! dump[0x55] = 0x02; // single-mode fiber
//! let report = decode_module(&dump, dump.len())?;
//! assert_eq!(report.diagnostics.extended.unwrap().lanes.len(), 8);
//! # Ok::<(), cmislens_core::DecodeError>(())
//! ```

use serde::{Deserialize, Serialize};

pub mod decode;

pub use decode::decode_module;
pub use decode::error::DecodeError;

/// Complete decoded view of one module memory snapshot.
///
/// Built once per decode call and immutable afterwards. `link_lengths` and
/// `signal_integrity` come from the advertising page and are absent for
/// 256-byte dumps; the lane/threshold block inside `diagnostics` is absent
/// unless the module is fiber AND the dump has all six pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleReport {
    /// Raw media-type byte (0x01 = MMF, 0x02 = SMF).
    pub media_type: u8,
    pub identity: Identity,
    pub power: PowerProfile,
    pub cable_length: CableAssemblyLength,
    pub media: MediaInterface,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_lengths: Option<LinkLengths>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_integrity: Option<SignalIntegrity>,
    pub diagnostics: Diagnostics,
}

/// Identifier, revision and vendor data from page 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Raw identifier code (SFF-8024 name tables are the presenter's job).
    pub identifier: u8,
    pub revision: RevisionCompliance,
    /// Raw connector code.
    pub connector: u8,
    pub vendor_name: String,
    pub vendor_oui: [u8; 3],
    pub vendor_part_number: String,
    pub vendor_revision: String,
    pub vendor_serial: String,
    pub date_code: String,
    /// Present only when the CLEI presence flag is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clei_code: Option<String>,
}

/// Management memory map revision, major/minor nibbles of one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionCompliance {
    pub major: u8,
    pub minor: u8,
}

/// Power class (1–8) and maximum power draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerProfile {
    pub power_class: u8,
    pub max_power_w: f32,
}

/// Cable assembly length, or the reserved "longer than 6.3 km" marker.
///
/// # Examples
/// ```
/// use cmislens_core::CableAssemblyLength;
///
/// let length = CableAssemblyLength::Length { km: 2.0 };
/// assert_ne!(length, CableAssemblyLength::ExceedsMax);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CableAssemblyLength {
    Length { km: f32 },
    ExceedsMax,
}

/// Transmitter technology, split by family.
///
/// Exactly one family's fields are meaningful for a given code: optical
/// codes carry wavelength data, copper codes carry attenuation data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum MediaInterface {
    Optical {
        technology: u8,
        description: String,
        /// Absent when the advertising page is not in the dump.
        #[serde(skip_serializing_if = "Option::is_none")]
        wavelength: Option<Wavelength>,
    },
    Copper {
        technology: u8,
        description: String,
        attenuation: CopperAttenuation,
    },
    Unrecognized {
        technology: u8,
    },
}

/// Nominal laser wavelength and tolerance in nanometres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wavelength {
    pub nominal_nm: f32,
    pub tolerance_nm: f32,
}

/// Copper cable attenuation in dB at the four advertised frequencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopperAttenuation {
    pub db_at_5ghz: u8,
    pub db_at_7ghz: u8,
    pub db_at_12p9ghz: u8,
    pub db_at_25p8ghz: u8,
}

/// Per-direction CDR capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalIntegrity {
    pub tx: CdrControl,
    pub rx: CdrControl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CdrControl {
    /// CDR circuitry implemented for this direction.
    pub cdr: bool,
    /// CDR bypass is controllable.
    pub bypass_control: bool,
}

/// Supported link lengths advertised on page 0x01.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkLengths {
    pub smf_km: f32,
    pub om5_m: u16,
    pub om4_m: u16,
    pub om3_m: u16,
    pub om2_m: u16,
}

/// Module monitors: always-present temperature and voltage, plus the
/// all-or-nothing lane/threshold block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Current module temperature in degrees Celsius.
    pub temperature_c: f32,
    /// Current supply voltage in volts.
    pub voltage_v: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended: Option<ExtendedDiagnostics>,
}

/// Lane monitors and threshold tables from the extended pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedDiagnostics {
    /// One entry per lane, always all eight.
    pub lanes: Vec<LaneDiagnostics>,
    pub thresholds: ThresholdTable,
}

/// Live monitors and alarm state for one lane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneDiagnostics {
    pub bias_current_ma: f32,
    pub tx_power_mw: f32,
    pub rx_power_mw: f32,
    pub tx_state: AlarmState,
    pub rx_state: AlarmState,
}

/// The four alarm/warning flags of one lane and direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmState {
    pub high_alarm: bool,
    pub low_alarm: bool,
    pub high_warning: bool,
    pub low_warning: bool,
}

/// One threshold set per monitored quantity, in that quantity's unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable {
    pub temperature_c: Thresholds,
    pub voltage_v: Thresholds,
    pub bias_current_ma: Thresholds,
    pub tx_power_mw: Thresholds,
    pub rx_power_mw: Thresholds,
}

/// Threshold classes in the fixed hardware order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub high_alarm: f32,
    pub low_alarm: f32,
    pub high_warning: f32,
    pub low_warning: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_omits_optional_sections_when_none() {
        let dump = vec![0u8; 256];
        let report = decode_module(&dump, dump.len()).expect("decode base dump");

        let value = serde_json::to_value(&report).expect("report json");
        assert!(value.get("link_lengths").is_none());
        assert!(value.get("signal_integrity").is_none());
        assert!(value["diagnostics"].get("extended").is_none());
        assert!(value["identity"].get("clei_code").is_none());
    }

    #[test]
    fn report_round_trips_through_json() {
        let mut dump = vec![0u8; 768];
        dump[0x55] = 0x02;
        let report = decode_module(&dump, dump.len()).expect("decode paged dump");

        let json = serde_json::to_string(&report).expect("serialize");
        let back: ModuleReport = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, report);
    }
}
