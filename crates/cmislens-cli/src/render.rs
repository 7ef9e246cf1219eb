//! Text presentation of a decoded module report.
//!
//! Formatting only; every value is taken from the report as decoded. Lines
//! follow the classic `<label> : <value>` EEPROM dump layout with a 41-column
//! label field.

use std::fmt::Write;

use cmislens_core::{AlarmState, CableAssemblyLength, MediaInterface, ModuleReport, Thresholds};

pub fn render_text(report: &ModuleReport) -> String {
    let mut out = String::new();
    render_static(&mut out, report);
    render_diagnostics(&mut out, report);
    render_vendor(&mut out, report);
    line(
        &mut out,
        "Revision compliance",
        format!(
            "Rev. {}.{}",
            report.identity.revision.major, report.identity.revision.minor
        ),
    );
    out
}

fn render_static(out: &mut String, report: &ModuleReport) {
    line(out, "Identifier", format!("{:#04x}", report.identity.identifier));
    line(out, "Power class", report.power.power_class.to_string());
    line(out, "Max power", format!("{:.2} W", report.power.max_power_w));
    line(out, "Connector", format!("{:#04x}", report.identity.connector));
    match report.cable_length {
        CableAssemblyLength::Length { km } => {
            line(out, "Cable assembly length", format!("{km:.2} km"));
        }
        CableAssemblyLength::ExceedsMax => line(out, "Cable assembly length", "> 6.3 km"),
    }

    if let Some(sig) = &report.signal_integrity {
        line(out, "Tx CDR", yesno(sig.tx.cdr));
        line(out, "Tx CDR bypass control", yesno(sig.tx.bypass_control));
        line(out, "Rx CDR", yesno(sig.rx.cdr));
        line(out, "Rx CDR bypass control", yesno(sig.rx.bypass_control));
    }

    match &report.media {
        MediaInterface::Optical {
            technology,
            description,
            wavelength,
        } => {
            line(
                out,
                "Transmitter technology",
                format!("{technology:#04x} ({description})"),
            );
            if let Some(wavelength) = wavelength {
                line(
                    out,
                    "Laser wavelength",
                    format!("{:.3} nm", wavelength.nominal_nm),
                );
                line(
                    out,
                    "Laser wavelength tolerance",
                    format!("{:.3} nm", wavelength.tolerance_nm),
                );
            }
        }
        MediaInterface::Copper {
            technology,
            description,
            attenuation,
        } => {
            line(
                out,
                "Transmitter technology",
                format!("{technology:#04x} ({description})"),
            );
            line(out, "Attenuation at 5GHz", format!("{} dB", attenuation.db_at_5ghz));
            line(out, "Attenuation at 7GHz", format!("{} dB", attenuation.db_at_7ghz));
            line(
                out,
                "Attenuation at 12.9GHz",
                format!("{} dB", attenuation.db_at_12p9ghz),
            );
            line(
                out,
                "Attenuation at 25.8GHz",
                format!("{} dB", attenuation.db_at_25p8ghz),
            );
        }
        MediaInterface::Unrecognized { technology } => {
            line(out, "Transmitter technology", format!("{technology:#04x}"));
        }
    }

    if let Some(lengths) = &report.link_lengths {
        line(out, "Length (SMF)", format!("{:.2} km", lengths.smf_km));
        line(out, "Length (OM5)", format!("{} m", lengths.om5_m));
        line(out, "Length (OM4)", format!("{} m", lengths.om4_m));
        line(out, "Length (OM3 50/125um)", format!("{} m", lengths.om3_m));
        line(out, "Length (OM2 50/125um)", format!("{} m", lengths.om2_m));
    }
}

fn render_diagnostics(out: &mut String, report: &ModuleReport) {
    line(
        out,
        "Module temperature",
        format!("{:.2} degrees C", report.diagnostics.temperature_c),
    );
    line(
        out,
        "Module voltage",
        format!("{:.4} V", report.diagnostics.voltage_v),
    );

    let Some(extended) = &report.diagnostics.extended else {
        return;
    };

    for (index, lane) in extended.lanes.iter().enumerate() {
        line(
            out,
            &format!("Tx bias current monitor (Channel {})", index + 1),
            format!("{:.3} mA", lane.bias_current_ma),
        );
    }
    for (index, lane) in extended.lanes.iter().enumerate() {
        line(
            out,
            &format!("Tx output optical power (Channel {})", index + 1),
            format!("{:.4} mW", lane.tx_power_mw),
        );
    }
    for (index, lane) in extended.lanes.iter().enumerate() {
        line(
            out,
            &format!("Rx input optical power (Channel {})", index + 1),
            format!("{:.4} mW", lane.rx_power_mw),
        );
    }
    for (index, lane) in extended.lanes.iter().enumerate() {
        render_alarms(out, "Rx", index, &lane.rx_state);
    }
    for (index, lane) in extended.lanes.iter().enumerate() {
        render_alarms(out, "Tx", index, &lane.tx_state);
    }

    render_thresholds(out, "Laser bias current", "mA", 3, &extended.thresholds.bias_current_ma);
    render_thresholds(out, "Laser output power", "mW", 4, &extended.thresholds.tx_power_mw);
    render_thresholds(
        out,
        "Module temperature",
        "degrees C",
        2,
        &extended.thresholds.temperature_c,
    );
    render_thresholds(out, "Module voltage", "V", 4, &extended.thresholds.voltage_v);
    render_thresholds(out, "Laser rx power", "mW", 4, &extended.thresholds.rx_power_mw);
}

fn render_alarms(out: &mut String, direction: &str, index: usize, state: &AlarmState) {
    let channel = index + 1;
    line(
        out,
        &format!("{direction} power high alarm (Channel {channel})"),
        onoff(state.high_alarm),
    );
    line(
        out,
        &format!("{direction} power low alarm (Channel {channel})"),
        onoff(state.low_alarm),
    );
    line(
        out,
        &format!("{direction} power high warning (Channel {channel})"),
        onoff(state.high_warning),
    );
    line(
        out,
        &format!("{direction} power low warning (Channel {channel})"),
        onoff(state.low_warning),
    );
}

fn render_thresholds(out: &mut String, label: &str, unit: &str, precision: usize, set: &Thresholds) {
    line(
        out,
        &format!("{label} high alarm threshold"),
        format!("{:.precision$} {unit}", set.high_alarm),
    );
    line(
        out,
        &format!("{label} low alarm threshold"),
        format!("{:.precision$} {unit}", set.low_alarm),
    );
    line(
        out,
        &format!("{label} high warning threshold"),
        format!("{:.precision$} {unit}", set.high_warning),
    );
    line(
        out,
        &format!("{label} low warning threshold"),
        format!("{:.precision$} {unit}", set.low_warning),
    );
}

fn render_vendor(out: &mut String, report: &ModuleReport) {
    let identity = &report.identity;
    line(out, "Vendor name", &identity.vendor_name);
    line(
        out,
        "Vendor OUI",
        format!(
            "{:02x}:{:02x}:{:02x}",
            identity.vendor_oui[0], identity.vendor_oui[1], identity.vendor_oui[2]
        ),
    );
    line(out, "Vendor PN", &identity.vendor_part_number);
    line(out, "Vendor rev", &identity.vendor_revision);
    line(out, "Vendor SN", &identity.vendor_serial);
    line(out, "Date code", &identity.date_code);
    if let Some(clei) = &identity.clei_code {
        line(out, "CLEI code", clei);
    }
}

fn line(out: &mut String, label: &str, value: impl AsRef<str>) {
    let _ = writeln!(out, "\t{:<41} : {}", label, value.as_ref());
}

fn yesno(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

fn onoff(value: bool) -> &'static str {
    if value { "On" } else { "Off" }
}

#[cfg(test)]
mod tests {
    use super::render_text;
    use cmislens_core::decode_module;

    #[test]
    fn base_report_renders_without_extended_lines() {
        let dump = vec![0u8; 256];
        let report = decode_module(&dump, dump.len()).expect("decode");
        let text = render_text(&report);

        assert!(text.contains("Module temperature"));
        assert!(text.contains("Module voltage"));
        assert!(!text.contains("Channel 1"));
        assert!(!text.contains("threshold"));
    }

    #[test]
    fn fiber_report_renders_all_channels_and_directions() {
        let mut dump = vec![0u8; 768];
        dump[0x55] = 0x02; // SMF
        dump[0x28B] = 0b0000_0001; // channel 1 tx high alarm
        let report = decode_module(&dump, dump.len()).expect("decode");
        let text = render_text(&report);

        for channel in 1..=8 {
            assert!(text.contains(&format!("Tx bias current monitor (Channel {channel})")));
        }
        let tx_line = format!("\t{:<41} : On", "Tx power high alarm (Channel 1)");
        let rx_line = format!("\t{:<41} : Off", "Rx power high alarm (Channel 1)");
        assert!(text.contains(&tx_line));
        assert!(text.contains(&rx_line));
        assert!(text.contains("Module temperature high alarm threshold"));
    }

    #[test]
    fn sentinel_cable_length_renders_as_over_max() {
        let mut dump = vec![0u8; 256];
        dump[0xCA] = 0xFF;
        let report = decode_module(&dump, dump.len()).expect("decode");
        assert!(render_text(&report).contains("> 6.3 km"));
    }
}
