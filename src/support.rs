use binrw::BinResult;

/// String from Big Endian `u32` value.
pub(crate) fn string_from_be_u32(value: u32, ignore_null: bool) -> String {
    match ignore_null {
        true => value.to_be_bytes().iter()
            .filter_map(|b| if b == &0 {None} else {Some(*b as char)})
            .collect(),
        false => value.to_be_bytes().iter()
            .map(|b| *b as char)
            .collect(),
    }
}

/// Reads a 32-bit value for version 0 atoms,
/// and a 64-bit value otherwise.
#[binrw::parser(reader, endian)]
pub(crate) fn version_u64(version: u8) -> BinResult<u64> {
    match version {
        0 => Ok(<u32 as binrw::BinRead>::read_options(reader, endian, ())? as u64),
        _ => <u64 as binrw::BinRead>::read_options(reader, endian, ()),
    }
}

/// Signed equivalent of `version_u64`.
#[binrw::parser(reader, endian)]
pub(crate) fn version_i64(version: u8) -> BinResult<i64> {
    match version {
        0 => Ok(<i32 as binrw::BinRead>::read_options(reader, endian, ())? as i64),
        _ => <i64 as binrw::BinRead>::read_options(reader, endian, ()),
    }
}

/// Big endian unsigned integer stored in `size` bytes (1-4),
/// as used for the variable width fields in `tfra`.
#[binrw::parser(reader)]
pub(crate) fn sized_u32(size: u8) -> BinResult<u32> {
    let size = size.clamp(1, 4) as usize;
    let mut buf = [0_u8; 4];
    reader.read_exact(&mut buf[4 - size ..])?;
    Ok(u32::from_be_bytes(buf))
}

/// Three flag bytes as a single value.
pub(crate) fn flags_from_bytes(bytes: [u8; 3]) -> u32 {
    u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]])
}
