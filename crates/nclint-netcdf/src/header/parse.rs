//! Header decoding.

use std::io::Read;

use nclint_model::{AttrValue, Attributes, NcType};

use super::{
    DimHeader, HDF5_MAGIC, Header, MAGIC, NC_ATTRIBUTE, NC_DIMENSION, NC_VARIABLE, STREAMING,
    VarHeader,
};
use crate::codec::{decode_text, decode_values, padding};
use crate::error::{NetcdfError, Result};
use crate::types::Version;

/// Read and decode the header from the start of `reader`.
///
/// On success the reader is positioned just past the header.
pub fn read_header<R: Read>(reader: &mut R) -> Result<Header> {
    let mut magic = [0u8; 4];
    reader
        .read_exact(&mut magic)
        .map_err(|e| NetcdfError::from_read(e, 0))?;
    if &magic == HDF5_MAGIC {
        return Err(NetcdfError::invalid_format(
            "NetCDF-4/HDF5 files are not supported",
        ));
    }
    if &magic[..3] != MAGIC {
        return Err(NetcdfError::invalid_format("missing CDF magic"));
    }
    let version = Version::from_byte(magic[3])
        .ok_or(NetcdfError::UnsupportedVersion { version: magic[3] })?;

    let mut fields = FieldReader {
        inner: reader,
        offset: 4,
        version,
    };

    let numrecs = fields.count_or_streaming()?;
    let dimensions = fields.dimensions()?;
    let attributes = fields.attributes()?;
    let variables = fields.variables()?;

    Ok(Header {
        version,
        numrecs,
        dimensions,
        attributes,
        variables,
    })
}

struct FieldReader<'a, R: Read> {
    inner: &'a mut R,
    offset: u64,
    version: Version,
}

impl<R: Read> FieldReader<'_, R> {
    fn bytes(&mut self, len: u64) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        (&mut *self.inner)
            .take(len)
            .read_to_end(&mut buf)
            .map_err(|e| NetcdfError::from_read(e, self.offset))?;
        if (buf.len() as u64) < len {
            return Err(NetcdfError::Truncated {
                offset: self.offset + buf.len() as u64,
            });
        }
        self.offset += len;
        Ok(buf)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.inner
            .read_exact(&mut buf)
            .map_err(|e| NetcdfError::from_read(e, self.offset))?;
        self.offset += N as u64;
        Ok(buf)
    }

    fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    fn u64(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.array()?))
    }

    /// An element count, length or dimension id.
    fn count(&mut self) -> Result<u64> {
        match self.version.count_width() {
            4 => self.u32().map(u64::from),
            _ => self.u64(),
        }
    }

    fn count_or_streaming(&mut self) -> Result<u64> {
        match self.version.count_width() {
            4 => {
                let value = self.u32()?;
                Ok(if value == u32::MAX {
                    STREAMING
                } else {
                    u64::from(value)
                })
            }
            _ => self.u64(),
        }
    }

    fn file_offset(&mut self) -> Result<u64> {
        match self.version.offset_width() {
            4 => self.u32().map(u64::from),
            _ => self.u64(),
        }
    }

    fn skip_padding(&mut self, len: u64) -> Result<()> {
        let pad = padding((len % 4) as usize) as u64;
        if pad > 0 {
            self.bytes(pad)?;
        }
        Ok(())
    }

    fn name(&mut self) -> Result<String> {
        let len = self.count()?;
        let bytes = self.bytes(len)?;
        self.skip_padding(len)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn nc_type(&mut self) -> Result<NcType> {
        let offset = self.offset;
        let code = self.u32()?;
        let nc_type = NcType::from_code(code).ok_or(NetcdfError::UnknownType { code, offset })?;
        if nc_type.is_extended() && !self.version.supports_extended_types() {
            return Err(NetcdfError::UnknownType { code, offset });
        }
        Ok(nc_type)
    }

    /// Read a list tag and its element count. `ABSENT` yields zero.
    fn list(&mut self, tag: u32, expected: &'static str) -> Result<u64> {
        let offset = self.offset;
        let found = self.u32()?;
        let count = self.count()?;
        match found {
            0 if count == 0 => Ok(0),
            found if found == tag => Ok(count),
            found => Err(NetcdfError::UnexpectedTag {
                expected,
                found,
                offset,
            }),
        }
    }

    fn dimensions(&mut self) -> Result<Vec<DimHeader>> {
        let count = self.list(NC_DIMENSION, "NC_DIMENSION")?;
        let mut dims = Vec::new();
        for _ in 0..count {
            let name = self.name()?;
            let len = self.count()?;
            dims.push(DimHeader { name, len });
        }
        if dims.iter().filter(|dim| dim.is_record()).count() > 1 {
            return Err(NetcdfError::invalid_format(
                "more than one record dimension",
            ));
        }
        Ok(dims)
    }

    fn attributes(&mut self) -> Result<Attributes> {
        let count = self.list(NC_ATTRIBUTE, "NC_ATTRIBUTE")?;
        let mut attributes = Attributes::new();
        for _ in 0..count {
            let name = self.name()?;
            let nc_type = self.nc_type()?;
            let nelems = self.count()?;
            let len = nelems
                .checked_mul(nc_type.size() as u64)
                .ok_or_else(|| NetcdfError::invalid_format("attribute size overflow"))?;
            let bytes = self.bytes(len)?;
            self.skip_padding(len)?;
            let value = match nc_type {
                NcType::Char => AttrValue::Text(decode_text(&bytes)),
                other => AttrValue::numbers(other, decode_values(&bytes, other)),
            };
            attributes.insert(name, value);
        }
        Ok(attributes)
    }

    fn variables(&mut self) -> Result<Vec<VarHeader>> {
        let count = self.list(NC_VARIABLE, "NC_VARIABLE")?;
        let mut variables = Vec::new();
        for _ in 0..count {
            let name = self.name()?;
            let ndims = self.count()?;
            let mut dim_ids = Vec::new();
            for _ in 0..ndims {
                dim_ids.push(self.count()?);
            }
            let attributes = self.attributes()?;
            let nc_type = self.nc_type()?;
            let vsize = self.count()?;
            let begin = self.file_offset()?;
            variables.push(VarHeader {
                name,
                dim_ids,
                attributes,
                nc_type,
                vsize,
                begin,
            });
        }
        Ok(variables)
    }
}
