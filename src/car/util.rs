//! Length-delimited writes with unsigned LEB128 prefixes.

use std::io::Write;

use cid::Cid;

use crate::types::EdsResult;

/// Maximum encoded length of a u64 varint.
pub const MAX_VARINT_LEN: usize = 10;

/// Encode `value` as an unsigned varint into `buf`, returning the used prefix.
pub fn put_uvarint(buf: &mut [u8; MAX_VARINT_LEN], mut value: u64) -> &[u8] {
    let mut i = 0;
    while value >= 0x80 {
        buf[i] = (value as u8) | 0x80;
        value >>= 7;
        i += 1;
    }
    buf[i] = value as u8;
    &buf[..=i]
}

/// Number of bytes `value` takes as an unsigned varint.
pub fn uvarint_len(mut value: u64) -> usize {
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1;
    }
    len
}

/// Total bytes [`ld_write`] emits for `parts`.
pub fn ld_size(parts: &[&[u8]]) -> usize {
    let sum: usize = parts.iter().map(|p| p.len()).sum();
    uvarint_len(sum as u64) + sum
}

/// Write `varint(total length) ‖ parts…`.
pub fn ld_write(writer: &mut impl Write, parts: &[&[u8]]) -> EdsResult<usize> {
    let sum: usize = parts.iter().map(|p| p.len()).sum();
    let mut buf = [0u8; MAX_VARINT_LEN];
    let prefix = put_uvarint(&mut buf, sum as u64);
    writer.write_all(prefix)?;
    for part in parts {
        writer.write_all(part)?;
    }
    Ok(prefix.len() + sum)
}

/// Write one block section: `varint(len) ‖ cid ‖ data`.
pub fn write_block(writer: &mut impl Write, cid: &Cid, data: &[u8]) -> EdsResult<usize> {
    let cid_bytes = cid.to_bytes();
    ld_write(writer, &[cid_bytes.as_slice(), data])
}
