//! Lane monitor, alarm and threshold extraction.
//!
//! Monitors occupy one u16 per lane, contiguous by quantity; alarm flags are
//! one bit per lane inside a shared per-class byte. Threshold sets store four
//! consecutive u16 values per quantity in the fixed class order high alarm,
//! low alarm, high warning, low warning.

use super::error::DecodeError;
use super::layout;
use super::reader::MemoryReader;
use crate::{
    AlarmState, Diagnostics, ExtendedDiagnostics, LaneDiagnostics, ThresholdTable, Thresholds,
};

pub(crate) fn parse_diagnostics(
    reader: &MemoryReader,
    extended_present: bool,
) -> Result<Diagnostics, DecodeError> {
    let extended = if extended_present {
        Some(parse_extended(reader)?)
    } else {
        None
    };
    Ok(Diagnostics {
        temperature_c: f32::from(reader.read_i16_be(layout::TEMPERATURE_OFFSET)?)
            * layout::TEMP_SCALE_C,
        voltage_v: f32::from(reader.read_u16_be(layout::VOLTAGE_OFFSET)?)
            * layout::VOLTAGE_SCALE_V,
        extended,
    })
}

fn parse_extended(reader: &MemoryReader) -> Result<ExtendedDiagnostics, DecodeError> {
    let mut lanes = Vec::with_capacity(layout::MAX_LANES);
    for lane in 0..layout::MAX_LANES {
        lanes.push(parse_lane(reader, lane)?);
    }
    Ok(ExtendedDiagnostics {
        lanes,
        thresholds: parse_thresholds(reader)?,
    })
}

fn parse_lane(reader: &MemoryReader, lane: usize) -> Result<LaneDiagnostics, DecodeError> {
    let bias = reader.read_u16_be(layout::TX_BIAS_BASE + lane * 2)?;
    let tx_power = reader.read_u16_be(layout::TX_POWER_BASE + lane * 2)?;
    let rx_power = reader.read_u16_be(layout::RX_POWER_BASE + lane * 2)?;
    Ok(LaneDiagnostics {
        bias_current_ma: f32::from(bias) * layout::BIAS_SCALE_MA,
        tx_power_mw: f32::from(tx_power) * layout::POWER_SCALE_MW,
        rx_power_mw: f32::from(rx_power) * layout::POWER_SCALE_MW,
        tx_state: parse_alarm_state(reader, &layout::TX_ALARM_CLASS_OFFSETS, lane)?,
        rx_state: parse_alarm_state(reader, &layout::RX_ALARM_CLASS_OFFSETS, lane)?,
    })
}

fn parse_alarm_state(
    reader: &MemoryReader,
    class_offsets: &[usize; 4],
    lane: usize,
) -> Result<AlarmState, DecodeError> {
    Ok(AlarmState {
        high_alarm: reader.read_bit(class_offsets[0], lane as u8)?,
        low_alarm: reader.read_bit(class_offsets[1], lane as u8)?,
        high_warning: reader.read_bit(class_offsets[2], lane as u8)?,
        low_warning: reader.read_bit(class_offsets[3], lane as u8)?,
    })
}

fn parse_thresholds(reader: &MemoryReader) -> Result<ThresholdTable, DecodeError> {
    Ok(ThresholdTable {
        temperature_c: signed_threshold_set(
            reader,
            layout::TEMP_THRESHOLDS_BASE,
            layout::TEMP_SCALE_C,
        )?,
        voltage_v: threshold_set(reader, layout::VOLTAGE_THRESHOLDS_BASE, layout::VOLTAGE_SCALE_V)?,
        bias_current_ma: threshold_set(reader, layout::BIAS_THRESHOLDS_BASE, layout::BIAS_SCALE_MA)?,
        tx_power_mw: threshold_set(reader, layout::TX_POWER_THRESHOLDS_BASE, layout::POWER_SCALE_MW)?,
        rx_power_mw: threshold_set(reader, layout::RX_POWER_THRESHOLDS_BASE, layout::POWER_SCALE_MW)?,
    })
}

fn threshold_set(
    reader: &MemoryReader,
    base: usize,
    scale: f32,
) -> Result<Thresholds, DecodeError> {
    Ok(Thresholds {
        high_alarm: f32::from(reader.read_u16_be(base)?) * scale,
        low_alarm: f32::from(reader.read_u16_be(base + 2)?) * scale,
        high_warning: f32::from(reader.read_u16_be(base + 4)?) * scale,
        low_warning: f32::from(reader.read_u16_be(base + 6)?) * scale,
    })
}

fn signed_threshold_set(
    reader: &MemoryReader,
    base: usize,
    scale: f32,
) -> Result<Thresholds, DecodeError> {
    Ok(Thresholds {
        high_alarm: f32::from(reader.read_i16_be(base)?) * scale,
        low_alarm: f32::from(reader.read_i16_be(base + 2)?) * scale,
        high_warning: f32::from(reader.read_i16_be(base + 4)?) * scale,
        low_warning: f32::from(reader.read_i16_be(base + 6)?) * scale,
    })
}
