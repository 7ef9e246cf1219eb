use cmislens_core::decode::layout;
use cmislens_core::{CableAssemblyLength, DecodeError, MediaInterface, decode_module};

fn base_dump() -> Vec<u8> {
    vec![0u8; layout::BASE_LEN]
}

fn paged_dump(media_type: u8) -> Vec<u8> {
    let mut dump = vec![0u8; layout::PAGED_LEN];
    dump[layout::MEDIA_TYPE_OFFSET] = media_type;
    dump
}

fn put_u16(dump: &mut [u8], offset: usize, value: u16) {
    dump[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}

#[test]
fn base_dump_always_decodes_without_extended_sections() {
    // regardless of what the media-type byte claims
    for media_type in [0x00u8, layout::MEDIA_TYPE_MMF, layout::MEDIA_TYPE_SMF, 0x03, 0xFF] {
        let mut dump = base_dump();
        dump[layout::MEDIA_TYPE_OFFSET] = media_type;

        let report = decode_module(&dump, dump.len()).expect("base dump decodes");
        assert!(report.diagnostics.extended.is_none());
        assert!(report.link_lengths.is_none());
        assert!(report.signal_integrity.is_none());
    }
}

#[test]
fn fiber_paged_dump_populates_all_eight_lanes() {
    for media_type in [layout::MEDIA_TYPE_MMF, layout::MEDIA_TYPE_SMF] {
        let dump = paged_dump(media_type);
        let report = decode_module(&dump, dump.len()).expect("paged dump decodes");

        let extended = report.diagnostics.extended.expect("extended block");
        assert_eq!(extended.lanes.len(), layout::MAX_LANES);
    }
}

#[test]
fn non_fiber_paged_dump_keeps_extended_absent() {
    // length alone must not open the gate
    let dump = paged_dump(0x03);
    let report = decode_module(&dump, dump.len()).expect("paged copper dump decodes");
    assert!(report.diagnostics.extended.is_none());
    // advertising data gates on length only
    assert!(report.link_lengths.is_some());
    assert!(report.signal_integrity.is_some());
}

#[test]
fn declared_length_is_authoritative_not_buffer_length() {
    // 768 bytes of buffer, but the interface only vouches for 256
    let dump = paged_dump(layout::MEDIA_TYPE_SMF);
    let report = decode_module(&dump, layout::BASE_LEN).expect("short declared length decodes");
    assert!(report.diagnostics.extended.is_none());
}

#[test]
fn declared_length_beyond_buffer_fails_out_of_range() {
    let dump = base_dump();
    let err = decode_module(&dump, layout::PAGED_LEN).unwrap_err();
    let DecodeError::OutOfRange { needed, declared } = err;
    assert!(needed > dump.len());
    assert_eq!(declared, layout::PAGED_LEN);
}

#[test]
fn truncated_dump_fails_without_partial_report() {
    let dump = vec![0u8; 0x40];
    assert!(matches!(
        decode_module(&dump, dump.len()),
        Err(DecodeError::OutOfRange { .. })
    ));
}

#[test]
fn cable_sentinel_wins_over_any_bit_pattern() {
    // 0xFF also parses as multiplier code 3 + magnitude 0x3F; the sentinel
    // must take precedence over that reading.
    let mut dump = base_dump();
    dump[layout::CABLE_LEN_OFFSET] = layout::CABLE_LEN_MAX_SENTINEL;
    let report = decode_module(&dump, dump.len()).expect("decode");
    assert_eq!(report.cable_length, CableAssemblyLength::ExceedsMax);
}

#[test]
fn cable_length_multiplier_grid() {
    for magnitude in 0x01..=0x3Fu8 {
        for (code, multiplier) in [(0x00u8, 0.1f32), (0x40, 1.0), (0x80, 10.0), (0xC0, 100.0)] {
            let byte = code | magnitude;
            if byte == layout::CABLE_LEN_MAX_SENTINEL {
                continue;
            }
            let mut dump = base_dump();
            dump[layout::CABLE_LEN_OFFSET] = byte;

            let report = decode_module(&dump, dump.len()).expect("decode");
            assert_eq!(
                report.cable_length,
                CableAssemblyLength::Length {
                    km: f32::from(magnitude) * multiplier
                },
                "byte {byte:#04x}"
            );
        }
    }
}

#[test]
fn media_families_are_exclusive() {
    for code in 0x00..=0x09u8 {
        let mut dump = paged_dump(layout::MEDIA_TYPE_SMF);
        dump[layout::MEDIA_TECH_OFFSET] = code;
        let report = decode_module(&dump, dump.len()).expect("decode");
        assert!(
            matches!(report.media, MediaInterface::Optical { technology, .. } if technology == code)
        );
    }
    for code in 0x0A..=0x0Fu8 {
        let mut dump = paged_dump(layout::MEDIA_TYPE_SMF);
        dump[layout::MEDIA_TECH_OFFSET] = code;
        let report = decode_module(&dump, dump.len()).expect("decode");
        assert!(
            matches!(report.media, MediaInterface::Copper { technology, .. } if technology == code)
        );
    }
}

#[test]
fn temperature_example_from_datasheet() {
    // 0x1980 = 6528 LSB at 1/256 C -> 25.5 C
    let mut dump = paged_dump(layout::MEDIA_TYPE_SMF);
    dump[layout::TEMPERATURE_OFFSET] = 0x19;
    dump[layout::TEMPERATURE_OFFSET + 1] = 0x80;

    let report = decode_module(&dump, dump.len()).expect("decode");
    assert_eq!(report.diagnostics.temperature_c, 25.5);
}

#[test]
fn alarm_bits_map_lane_for_lane() {
    for lane in 0..layout::MAX_LANES {
        let mut dump = paged_dump(layout::MEDIA_TYPE_MMF);
        dump[layout::RX_ALARM_CLASS_OFFSETS[1]] = 1 << lane; // rx low alarm

        let report = decode_module(&dump, dump.len()).expect("decode");
        let extended = report.diagnostics.extended.expect("extended block");
        for (index, diag) in extended.lanes.iter().enumerate() {
            assert_eq!(diag.rx_state.low_alarm, index == lane);
            assert!(!diag.rx_state.high_alarm);
            assert!(!diag.tx_state.low_alarm);
        }
    }
}

#[test]
fn fully_populated_fiber_dump_decodes_end_to_end() {
    let mut dump = paged_dump(layout::MEDIA_TYPE_SMF);
    dump[layout::IDENTIFIER_OFFSET] = 0x18;
    dump[layout::REV_COMPLIANCE_OFFSET] = 0x40;
    dump[layout::CLEI_PRESENT_OFFSET] = 1 << layout::CLEI_PRESENT_BIT;
    put_u16(&mut dump, layout::TEMPERATURE_OFFSET, 0x1980);
    put_u16(&mut dump, layout::VOLTAGE_OFFSET, 33_000);
    dump[layout::VENDOR_NAME_RANGE][..9].copy_from_slice(b"ACME CORP");
    dump[layout::VENDOR_OUI_RANGE].copy_from_slice(&[0x00, 0x17, 0x6A]);
    dump[layout::VENDOR_PN_RANGE][..8].copy_from_slice(b"ACME-400");
    dump[layout::VENDOR_REV_RANGE].copy_from_slice(b"1A");
    dump[layout::VENDOR_SN_RANGE][..6].copy_from_slice(b"SN4242");
    dump[layout::DATE_CODE_RANGE].copy_from_slice(b"20260315");
    dump[layout::CLEI_RANGE].copy_from_slice(b"CLEI000ABC");
    dump[layout::POWER_CLASS_OFFSET] = 0b0100_0000; // class 3
    dump[layout::MAX_POWER_OFFSET] = 10; // 2.5 W
    dump[layout::CABLE_LEN_OFFSET] = 0x40 | 0x02; // 2 km
    dump[layout::CONNECTOR_OFFSET] = 0x27;
    dump[layout::MEDIA_TECH_OFFSET] = 0x04; // 1310 nm DFB
    put_u16(&mut dump, layout::NOMINAL_WAVELENGTH_OFFSET, 26_200);
    put_u16(&mut dump, layout::WAVELENGTH_TOLERANCE_OFFSET, 1_000);
    dump[layout::SIG_INTEG_TX_OFFSET] = 0b11;
    dump[layout::SIG_INTEG_RX_OFFSET] = 0b01;
    dump[layout::SMF_LEN_OFFSET] = 0x40 | 10;
    for lane in 0..layout::MAX_LANES {
        put_u16(&mut dump, layout::TX_BIAS_BASE + lane * 2, 4_000); // 8 mA
        put_u16(&mut dump, layout::TX_POWER_BASE + lane * 2, 10_000); // 1 mW
        put_u16(&mut dump, layout::RX_POWER_BASE + lane * 2, 8_000); // 0.8 mW
    }
    put_u16(&mut dump, layout::TEMP_THRESHOLDS_BASE, 80 * 256);
    put_u16(&mut dump, layout::VOLTAGE_THRESHOLDS_BASE, 36_000);

    let report = decode_module(&dump, dump.len()).expect("decode");

    assert_eq!(report.identity.identifier, 0x18);
    assert_eq!(report.identity.revision.major, 4);
    assert_eq!(report.identity.revision.minor, 0);
    assert_eq!(report.identity.vendor_name, "ACME CORP");
    assert_eq!(report.identity.vendor_part_number, "ACME-400");
    assert_eq!(report.identity.vendor_serial, "SN4242");
    assert_eq!(report.identity.date_code, "20260315");
    assert_eq!(report.identity.clei_code.as_deref(), Some("CLEI000ABC"));
    assert_eq!(report.identity.connector, 0x27);
    assert_eq!(report.power.power_class, 3);
    assert_eq!(report.power.max_power_w, 2.5);
    assert_eq!(report.cable_length, CableAssemblyLength::Length { km: 2.0 });
    match &report.media {
        MediaInterface::Optical {
            description,
            wavelength,
            ..
        } => {
            assert_eq!(description, "1310 nm DFB");
            let wavelength = wavelength.expect("wavelength present");
            assert!((wavelength.nominal_nm - 1310.0).abs() < 1e-3);
        }
        other => panic!("expected optical media, got {other:?}"),
    }
    let sig = report.signal_integrity.expect("signal integrity");
    assert!(sig.tx.cdr && sig.tx.bypass_control);
    assert!(sig.rx.cdr && !sig.rx.bypass_control);
    assert_eq!(report.link_lengths.expect("link lengths").smf_km, 10.0);

    assert_eq!(report.diagnostics.temperature_c, 25.5);
    assert!((report.diagnostics.voltage_v - 3.3).abs() < 1e-4);
    let extended = report.diagnostics.extended.expect("extended block");
    for diag in &extended.lanes {
        assert!((diag.bias_current_ma - 8.0).abs() < 1e-4);
        assert!((diag.tx_power_mw - 1.0).abs() < 1e-4);
        assert!((diag.rx_power_mw - 0.8).abs() < 1e-4);
    }
    assert_eq!(extended.thresholds.temperature_c.high_alarm, 80.0);
    assert!((extended.thresholds.voltage_v.high_alarm - 3.6).abs() < 1e-4);
}
