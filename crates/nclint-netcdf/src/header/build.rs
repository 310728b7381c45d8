//! Header encoding.

use nclint_model::{AttrValue, Attributes, NcType};

use super::{Header, MAGIC, NC_ATTRIBUTE, NC_DIMENSION, NC_VARIABLE};
use crate::codec::{encode_value, padding};
use crate::error::{NetcdfError, Result};
use crate::types::Version;

/// Encode `header`. The output length does not depend on the `begin`
/// offsets, so writers can size the header before laying out data.
pub fn build_header(header: &Header) -> Result<Vec<u8>> {
    let mut fields = FieldWriter {
        buf: Vec::new(),
        version: header.version,
    };

    fields.buf.extend_from_slice(MAGIC);
    fields.buf.push(header.version.byte());
    fields.count("numrecs", header.numrecs)?;

    if header.dimensions.is_empty() {
        fields.absent();
    } else {
        fields.tag(NC_DIMENSION);
        fields.count("dimension count", header.dimensions.len() as u64)?;
        for dim in &header.dimensions {
            fields.name(&dim.name)?;
            fields.count(&dim.name, dim.len)?;
        }
    }

    fields.attributes("global", &header.attributes)?;

    if header.variables.is_empty() {
        fields.absent();
    } else {
        fields.tag(NC_VARIABLE);
        fields.count("variable count", header.variables.len() as u64)?;
        for var in &header.variables {
            fields.check_type(&var.name, var.nc_type)?;
            fields.name(&var.name)?;
            fields.count(&var.name, var.dim_ids.len() as u64)?;
            for &id in &var.dim_ids {
                fields.count(&var.name, id)?;
            }
            fields.attributes(&var.name, &var.attributes)?;
            fields.tag(var.nc_type.code());
            // vsize is informational; readers recompute it, and oversize
            // values are clamped as the format allows.
            let vsize = match header.version.count_width() {
                4 => var.vsize.min(u64::from(u32::MAX)),
                _ => var.vsize,
            };
            fields.count(&var.name, vsize)?;
            fields.file_offset(&var.name, var.begin)?;
        }
    }

    Ok(fields.buf)
}

struct FieldWriter {
    buf: Vec<u8>,
    version: Version,
}

impl FieldWriter {
    fn tag(&mut self, tag: u32) {
        self.buf.extend_from_slice(&tag.to_be_bytes());
    }

    fn absent(&mut self) {
        self.tag(0);
        self.buf
            .extend(std::iter::repeat_n(0u8, self.version.count_width()));
    }

    fn count(&mut self, what: &str, value: u64) -> Result<()> {
        match self.version.count_width() {
            4 => {
                let value = u32::try_from(value).map_err(|_| self.overflow(what))?;
                self.buf.extend_from_slice(&value.to_be_bytes());
            }
            _ => self.buf.extend_from_slice(&value.to_be_bytes()),
        }
        Ok(())
    }

    fn file_offset(&mut self, what: &str, value: u64) -> Result<()> {
        match self.version.offset_width() {
            4 => {
                let value = u32::try_from(value).map_err(|_| self.overflow(what))?;
                self.buf.extend_from_slice(&value.to_be_bytes());
            }
            _ => self.buf.extend_from_slice(&value.to_be_bytes()),
        }
        Ok(())
    }

    fn overflow(&self, what: &str) -> NetcdfError {
        NetcdfError::Overflow {
            what: what.to_string(),
            version: self.version,
        }
    }

    fn check_type(&self, name: &str, nc_type: NcType) -> Result<()> {
        if nc_type.is_extended() && !self.version.supports_extended_types() {
            return Err(NetcdfError::ExtendedType {
                name: name.to_string(),
                nc_type,
                version: self.version,
            });
        }
        Ok(())
    }

    fn pad(&mut self, len: usize) {
        self.buf.extend(std::iter::repeat_n(0u8, padding(len)));
    }

    fn name(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(NetcdfError::invalid_format("empty name"));
        }
        self.count(name, name.len() as u64)?;
        self.buf.extend_from_slice(name.as_bytes());
        self.pad(name.len());
        Ok(())
    }

    fn attributes(&mut self, owner: &str, attributes: &Attributes) -> Result<()> {
        if attributes.is_empty() {
            self.absent();
            return Ok(());
        }
        self.tag(NC_ATTRIBUTE);
        self.count(owner, attributes.len() as u64)?;
        for attr in attributes {
            let nc_type = attr.value.nc_type();
            self.check_type(&attr.name, nc_type)?;
            self.name(&attr.name)?;
            self.tag(nc_type.code());
            let start = self.buf.len();
            match &attr.value {
                AttrValue::Text(text) => {
                    self.count(&attr.name, text.len() as u64)?;
                    self.buf.extend_from_slice(text.as_bytes());
                }
                AttrValue::Numbers { nc_type, values } => {
                    self.count(&attr.name, values.len() as u64)?;
                    for &value in values {
                        encode_value(value, *nc_type, &mut self.buf);
                    }
                }
            }
            let written = self.buf.len() - start;
            self.pad(written);
        }
        Ok(())
    }
}
