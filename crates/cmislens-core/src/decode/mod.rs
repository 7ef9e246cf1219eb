//! Module memory decoding.
//!
//! Layered structure:
//! - `layout`: page map, byte offsets and scale factors (source of truth)
//! - `reader`: bounds-checked byte access over (buffer, declared length)
//! - `identity` / `diagnostics`: domain-level decoding (no direct indexing)
//! - `error`: the single out-of-range decode failure
//!
//! Decoding is pure and side-effect free; the caller owns buffer acquisition
//! and presentation. Availability of the extended pages is decided once, up
//! front: a 256-byte dump always decodes to a base report, and the
//! lane/threshold block is populated only for fiber modules with the full
//! six-page dump, all-or-nothing.

pub mod error;
pub mod layout;
pub mod reader;

mod diagnostics;
mod identity;

use error::DecodeError;
use reader::MemoryReader;

use crate::ModuleReport;

/// Decode one raw memory snapshot into a [`ModuleReport`].
///
/// `declared_len` is the length the management interface reported for the
/// dump and is authoritative for bounds checking; it is never inferred from
/// the buffer contents. Lengths other than the 256/768-byte configurations
/// degrade to a report without the extended sections, as long as page 0 is
/// readable.
///
/// # Examples
/// ```
/// use cmislens_core::decode_module;
///
/// let dump = vec![0u8; 256];
/// let report = decode_module(&dump, dump.len())?;
/// assert!(report.diagnostics.extended.is_none());
/// # Ok::<(), cmislens_core::DecodeError>(())
/// ```
pub fn decode_module(data: &[u8], declared_len: usize) -> Result<ModuleReport, DecodeError> {
    let reader = MemoryReader::new(data, declared_len);
    let media_type = reader.read_u8(layout::MEDIA_TYPE_OFFSET)?;
    let advertising = has_advertising_pages(declared_len);
    let lane_diagnostics = has_lane_diagnostics(media_type, declared_len);

    let link_lengths = if advertising {
        Some(identity::parse_link_lengths(&reader)?)
    } else {
        None
    };
    let signal_integrity = if advertising {
        Some(identity::parse_signal_integrity(&reader)?)
    } else {
        None
    };

    Ok(ModuleReport {
        media_type,
        identity: identity::parse_identity(&reader)?,
        power: identity::parse_power(&reader)?,
        cable_length: identity::parse_cable_length(&reader)?,
        media: identity::parse_media(&reader, advertising)?,
        link_lengths,
        signal_integrity,
        diagnostics: diagnostics::parse_diagnostics(&reader, lane_diagnostics)?,
    })
}

/// Advertising data (page 0x01) exists only in the six-page configuration.
fn has_advertising_pages(declared_len: usize) -> bool {
    declared_len == layout::PAGED_LEN
}

/// Lane monitors and thresholds require a fiber module AND the six-page
/// configuration; either condition alone is not enough.
fn has_lane_diagnostics(media_type: u8, declared_len: usize) -> bool {
    matches!(media_type, layout::MEDIA_TYPE_MMF | layout::MEDIA_TYPE_SMF)
        && declared_len == layout::PAGED_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lane_diagnostics_gate_is_conjunctive() {
        assert!(has_lane_diagnostics(layout::MEDIA_TYPE_MMF, layout::PAGED_LEN));
        assert!(has_lane_diagnostics(layout::MEDIA_TYPE_SMF, layout::PAGED_LEN));
        assert!(!has_lane_diagnostics(layout::MEDIA_TYPE_SMF, layout::BASE_LEN));
        assert!(!has_lane_diagnostics(0x03, layout::PAGED_LEN));
        assert!(!has_lane_diagnostics(0x00, layout::BASE_LEN));
    }

    #[test]
    fn advertising_gate_needs_full_length_only() {
        assert!(has_advertising_pages(layout::PAGED_LEN));
        assert!(!has_advertising_pages(layout::BASE_LEN));
        assert!(!has_advertising_pages(512));
    }
}
