//! Static-page parsers: identity, power, cable assembly, media technology,
//! signal integrity and supported link lengths. No direct byte indexing;
//! positions come from `layout`, access goes through the reader.

use super::error::DecodeError;
use super::layout;
use super::reader::MemoryReader;
use crate::{
    CableAssemblyLength, CdrControl, CopperAttenuation, Identity, LinkLengths, MediaInterface,
    PowerProfile, RevisionCompliance, SignalIntegrity, Wavelength,
};

pub(crate) fn parse_identity(reader: &MemoryReader) -> Result<Identity, DecodeError> {
    let oui = reader.read_slice(layout::VENDOR_OUI_RANGE)?;
    let clei_code = if reader.read_bit(layout::CLEI_PRESENT_OFFSET, layout::CLEI_PRESENT_BIT)? {
        Some(reader.read_ascii(layout::CLEI_RANGE)?)
    } else {
        None
    };

    Ok(Identity {
        identifier: reader.read_u8(layout::IDENTIFIER_OFFSET)?,
        revision: RevisionCompliance {
            major: reader.read_bitfield(layout::REV_COMPLIANCE_OFFSET, 0xF0, 4)?,
            minor: reader.read_bitfield(layout::REV_COMPLIANCE_OFFSET, 0x0F, 0)?,
        },
        connector: reader.read_u8(layout::CONNECTOR_OFFSET)?,
        vendor_name: reader.read_ascii(layout::VENDOR_NAME_RANGE)?,
        vendor_oui: [oui[0], oui[1], oui[2]],
        vendor_part_number: reader.read_ascii(layout::VENDOR_PN_RANGE)?,
        vendor_revision: reader.read_ascii(layout::VENDOR_REV_RANGE)?,
        vendor_serial: reader.read_ascii(layout::VENDOR_SN_RANGE)?,
        date_code: reader.read_ascii(layout::DATE_CODE_RANGE)?,
        clei_code,
    })
}

pub(crate) fn parse_power(reader: &MemoryReader) -> Result<PowerProfile, DecodeError> {
    let class = reader.read_bitfield(
        layout::POWER_CLASS_OFFSET,
        layout::POWER_CLASS_MASK,
        layout::POWER_CLASS_SHIFT,
    )?;
    let base = reader.read_u8(layout::MAX_POWER_OFFSET)?;
    Ok(PowerProfile {
        // field values 0..=7 name classes 1..=8
        power_class: class + 1,
        max_power_w: f32::from(base) * layout::MAX_POWER_SCALE_W,
    })
}

pub(crate) fn parse_cable_length(reader: &MemoryReader) -> Result<CableAssemblyLength, DecodeError> {
    let decoded =
        reader.read_scaled_km_capped(layout::CABLE_LEN_OFFSET, layout::CABLE_LEN_MAX_SENTINEL)?;
    Ok(match decoded {
        Some(km) => CableAssemblyLength::Length { km },
        None => CableAssemblyLength::ExceedsMax,
    })
}

/// Split the transmitter technology code into its optical/copper family and
/// decode the family's fields. Wavelength bytes live on the advertising page
/// and are only read when that page is present.
pub(crate) fn parse_media(
    reader: &MemoryReader,
    advertising_present: bool,
) -> Result<MediaInterface, DecodeError> {
    let technology = reader.read_u8(layout::MEDIA_TECH_OFFSET)?;
    if technology >= layout::TECH_UNALLOCATED_MIN {
        return Ok(MediaInterface::Unrecognized { technology });
    }

    let description = layout::TECH_DESCRIPTIONS[technology as usize].to_string();
    if technology >= layout::TECH_COPPER_MIN {
        return Ok(MediaInterface::Copper {
            technology,
            description,
            attenuation: CopperAttenuation {
                db_at_5ghz: reader.read_u8(layout::COPPER_ATT_5GHZ_OFFSET)?,
                db_at_7ghz: reader.read_u8(layout::COPPER_ATT_7GHZ_OFFSET)?,
                db_at_12p9ghz: reader.read_u8(layout::COPPER_ATT_12P9GHZ_OFFSET)?,
                db_at_25p8ghz: reader.read_u8(layout::COPPER_ATT_25P8GHZ_OFFSET)?,
            },
        });
    }

    let wavelength = if advertising_present {
        Some(Wavelength {
            nominal_nm: f32::from(reader.read_u16_be(layout::NOMINAL_WAVELENGTH_OFFSET)?)
                * layout::WAVELENGTH_SCALE_NM,
            tolerance_nm: f32::from(reader.read_u16_be(layout::WAVELENGTH_TOLERANCE_OFFSET)?)
                * layout::WAVELENGTH_TOLERANCE_SCALE_NM,
        })
    } else {
        None
    };
    Ok(MediaInterface::Optical {
        technology,
        description,
        wavelength,
    })
}

pub(crate) fn parse_signal_integrity(reader: &MemoryReader) -> Result<SignalIntegrity, DecodeError> {
    Ok(SignalIntegrity {
        tx: parse_cdr(reader, layout::SIG_INTEG_TX_OFFSET)?,
        rx: parse_cdr(reader, layout::SIG_INTEG_RX_OFFSET)?,
    })
}

fn parse_cdr(reader: &MemoryReader, offset: usize) -> Result<CdrControl, DecodeError> {
    Ok(CdrControl {
        cdr: reader.read_bit(offset, layout::CDR_PRESENT_BIT)?,
        bypass_control: reader.read_bit(offset, layout::CDR_BYPASS_BIT)?,
    })
}

pub(crate) fn parse_link_lengths(reader: &MemoryReader) -> Result<LinkLengths, DecodeError> {
    Ok(LinkLengths {
        smf_km: reader.read_scaled_km(layout::SMF_LEN_OFFSET)?,
        om5_m: u16::from(reader.read_u8(layout::OM5_LEN_OFFSET)?) * layout::OM_LEN_SCALE_M,
        om4_m: u16::from(reader.read_u8(layout::OM4_LEN_OFFSET)?) * layout::OM_LEN_SCALE_M,
        om3_m: u16::from(reader.read_u8(layout::OM3_LEN_OFFSET)?) * layout::OM_LEN_SCALE_M,
        om2_m: u16::from(reader.read_u8(layout::OM2_LEN_OFFSET)?),
    })
}
