//! Big-endian value encoding.

use nclint_model::NcType;

/// Bytes needed to pad `len` to a 4-byte boundary.
pub const fn padding(len: usize) -> usize {
    (4 - len % 4) % 4
}

/// `len` rounded up to a 4-byte boundary.
pub const fn padded(len: usize) -> usize {
    len + padding(len)
}

/// Decode `bytes` as a run of `nc_type` values widened to `f64`.
///
/// Trailing bytes that do not form a whole element are ignored.
pub fn decode_values(bytes: &[u8], nc_type: NcType) -> Vec<f64> {
    let size = nc_type.size();
    bytes
        .chunks_exact(size)
        .map(|chunk| decode_one(chunk, nc_type))
        .collect()
}

fn decode_one(chunk: &[u8], nc_type: NcType) -> f64 {
    let mut buf = [0u8; 8];
    buf[..chunk.len()].copy_from_slice(chunk);
    match nc_type {
        NcType::Byte => f64::from(i8::from_be_bytes([buf[0]])),
        NcType::Char | NcType::UByte => f64::from(buf[0]),
        NcType::Short => f64::from(i16::from_be_bytes([buf[0], buf[1]])),
        NcType::UShort => f64::from(u16::from_be_bytes([buf[0], buf[1]])),
        NcType::Int => f64::from(i32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]])),
        NcType::UInt => f64::from(u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]])),
        NcType::Float => f64::from(f32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]])),
        NcType::Double => f64::from_be_bytes(buf),
        NcType::Int64 => i64::from_be_bytes(buf) as f64,
        NcType::UInt64 => u64::from_be_bytes(buf) as f64,
    }
}

/// Append `value` encoded as `nc_type`. Integer types round to nearest and
/// saturate at the type bounds.
pub fn encode_value(value: f64, nc_type: NcType, out: &mut Vec<u8>) {
    match nc_type {
        NcType::Byte => out.extend_from_slice(&(value.round() as i8).to_be_bytes()),
        NcType::Char | NcType::UByte => out.push(value.round() as u8),
        NcType::Short => out.extend_from_slice(&(value.round() as i16).to_be_bytes()),
        NcType::UShort => out.extend_from_slice(&(value.round() as u16).to_be_bytes()),
        NcType::Int => out.extend_from_slice(&(value.round() as i32).to_be_bytes()),
        NcType::UInt => out.extend_from_slice(&(value.round() as u32).to_be_bytes()),
        NcType::Float => out.extend_from_slice(&(value as f32).to_be_bytes()),
        NcType::Double => out.extend_from_slice(&value.to_be_bytes()),
        NcType::Int64 => out.extend_from_slice(&(value.round() as i64).to_be_bytes()),
        NcType::UInt64 => out.extend_from_slice(&(value.round() as u64).to_be_bytes()),
    }
}

/// Decode a character attribute, dropping trailing NUL padding.
pub fn decode_text(bytes: &[u8]) -> String {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |idx| idx + 1);
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding() {
        assert_eq!(padding(0), 0);
        assert_eq!(padding(1), 3);
        assert_eq!(padding(4), 0);
        assert_eq!(padded(5), 8);
    }

    #[test]
    fn test_encode_decode_types() {
        let cases = [
            (NcType::Byte, -5.0),
            (NcType::UByte, 200.0),
            (NcType::Short, -32000.0),
            (NcType::UShort, 65000.0),
            (NcType::Int, -2_000_000.0),
            (NcType::UInt, 4_000_000_000.0),
            (NcType::Float, 0.5),
            (NcType::Double, 1.0e300),
            (NcType::Int64, -1.0e15),
            (NcType::UInt64, 1.0e15),
        ];
        for (nc_type, value) in cases {
            let mut out = Vec::new();
            encode_value(value, nc_type, &mut out);
            assert_eq!(out.len(), nc_type.size());
            assert_eq!(decode_values(&out, nc_type), vec![value], "{nc_type}");
        }
    }

    #[test]
    fn test_big_endian_int() {
        assert_eq!(decode_values(&[0, 0, 1, 0], NcType::Int), vec![256.0]);
    }

    #[test]
    fn test_decode_text_trims_nul() {
        assert_eq!(decode_text(b"days\0\0"), "days");
        assert_eq!(decode_text(b"\0"), "");
    }
}
