//! NetCDF file reader.
//!
//! Provides read-only access to NetCDF classic files through the
//! [`Dataset`] trait.

use std::cell::RefCell;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use nclint_model::{
    Attributes, Dataset, DatasetError, Dimension, MaskedArray, Variable,
};

use crate::codec::{decode_values, padded};
use crate::error::{NetcdfError, Result};
use crate::header::{Header, read_header};
use crate::mask::MaskRules;
use crate::types::Version;

/// Where the bytes of one variable live.
#[derive(Debug, Clone)]
struct Layout {
    begin: u64,
    record: bool,
    /// Bytes of one record slab (record variables) or of the whole variable.
    slab_bytes: u64,
}

/// An open NetCDF classic file.
///
/// The header is decoded on open. Data reads seek into the underlying
/// source, which is released when the `NcFile` is dropped.
pub struct NcFile<R = File> {
    source: RefCell<R>,
    path: Option<PathBuf>,
    version: Version,
    numrecs: usize,
    record_size: u64,
    attributes: Attributes,
    dimensions: Vec<Dimension>,
    variables: Vec<Variable>,
    layouts: Vec<Layout>,
}

impl NcFile<File> {
    /// Open a NetCDF file for reading.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                NetcdfError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                NetcdfError::Io(e)
            }
        })?;
        let mut nc = Self::from_reader(file)?;
        nc.path = Some(path.to_path_buf());
        Ok(nc)
    }
}

impl<R: Read + Seek> NcFile<R> {
    /// Decode the header of `source` and keep it for data reads.
    pub fn from_reader(mut source: R) -> Result<Self> {
        source.seek(SeekFrom::Start(0))?;
        let header = {
            let mut buffered = BufReader::new(&mut source);
            read_header(&mut buffered)?
        };
        let file_len = source.seek(SeekFrom::End(0))?;
        Self::from_header(source, header, file_len)
    }

    fn from_header(source: R, header: Header, file_len: u64) -> Result<Self> {
        let record_dim = header.record_dimension();

        let mut layouts = Vec::with_capacity(header.variables.len());
        let mut shapes = Vec::with_capacity(header.variables.len());
        for var in &header.variables {
            let mut shape = Vec::with_capacity(var.dim_ids.len());
            for (pos, &id) in var.dim_ids.iter().enumerate() {
                let dim = usize::try_from(id)
                    .ok()
                    .and_then(|idx| header.dimensions.get(idx))
                    .ok_or_else(|| NetcdfError::DimensionId {
                        variable: var.name.clone(),
                        id,
                    })?;
                if dim.is_record() && pos != 0 {
                    return Err(NetcdfError::invalid_format(format!(
                        "record dimension is not the leftmost dimension of {}",
                        var.name
                    )));
                }
                shape.push(to_usize(dim.len)?);
            }
            let record = header.is_record_variable(var);
            let inner = if record { &shape[1..] } else { &shape[..] };
            let elements = checked_product(inner)?;
            let slab_bytes = (elements as u64)
                .checked_mul(var.nc_type.size() as u64)
                .ok_or_else(|| NetcdfError::invalid_format("variable size overflow"))?;
            layouts.push(Layout {
                begin: var.begin,
                record,
                slab_bytes,
            });
            shapes.push(shape);
        }

        let record_slabs: Vec<u64> = layouts
            .iter()
            .filter(|layout| layout.record)
            .map(|layout| layout.slab_bytes)
            .collect();
        let record_size = match record_slabs.as_slice() {
            [] => 0,
            [single] => *single,
            many => many.iter().map(|&len| padded(len as usize) as u64).sum(),
        };

        let numrecs = if header.is_streaming() {
            let first = layouts
                .iter()
                .filter(|layout| layout.record)
                .map(|layout| layout.begin)
                .min();
            match first {
                Some(begin) if record_size > 0 => file_len.saturating_sub(begin) / record_size,
                _ => 0,
            }
        } else {
            header.numrecs
        };
        let numrecs = to_usize(numrecs)?;

        let dimensions = header
            .dimensions
            .iter()
            .map(|dim| {
                if dim.is_record() {
                    Ok(Dimension::unlimited(dim.name.clone(), numrecs))
                } else {
                    Ok(Dimension::new(dim.name.clone(), to_usize(dim.len)?))
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let variables = header
            .variables
            .into_iter()
            .zip(shapes)
            .map(|(var, mut shape)| {
                if let (Some(record), Some(&first)) = (record_dim, var.dim_ids.first())
                    && first == record as u64
                {
                    shape[0] = numrecs;
                }
                Variable {
                    dimensions: var
                        .dim_ids
                        .iter()
                        .map(|&id| dimensions[id as usize].name.clone())
                        .collect(),
                    name: var.name,
                    shape,
                    nc_type: var.nc_type,
                    attributes: var.attributes,
                }
            })
            .collect();

        Ok(Self {
            source: RefCell::new(source),
            path: None,
            version: header.version,
            numrecs,
            record_size,
            attributes: header.attributes,
            dimensions,
            variables,
            layouts,
        })
    }

    /// Path the file was opened from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Number of records along the unlimited dimension.
    pub fn num_records(&self) -> usize {
        self.numrecs
    }

    /// Release the underlying source.
    pub fn into_inner(self) -> R {
        self.source.into_inner()
    }

    fn index_of(&self, variable: &Variable) -> Result<usize> {
        self.variables
            .iter()
            .position(|var| var.name == variable.name)
            .ok_or_else(|| DatasetError::variable_not_found(&variable.name).into())
    }

    fn read_bytes(&self, offset: u64, len: u64, buf: &mut Vec<u8>) -> Result<()> {
        let mut source = self.source.borrow_mut();
        source.seek(SeekFrom::Start(offset))?;
        let start = buf.len();
        (&mut *source)
            .take(len)
            .read_to_end(buf)
            .map_err(|e| NetcdfError::from_read(e, offset))?;
        if ((buf.len() - start) as u64) < len {
            return Err(NetcdfError::Truncated {
                offset: offset.saturating_add((buf.len() - start) as u64),
            });
        }
        Ok(())
    }

    /// Raw (packed) values of a whole variable.
    fn read_raw(&self, idx: usize) -> Result<Vec<u8>> {
        let layout = &self.layouts[idx];
        let mut buf = Vec::new();
        if layout.record {
            for record in 0..self.numrecs as u64 {
                let offset = slab_offset(layout.begin, record, self.record_size)?;
                self.read_bytes(offset, layout.slab_bytes, &mut buf)?;
            }
        } else {
            self.read_bytes(layout.begin, layout.slab_bytes, &mut buf)?;
        }
        Ok(buf)
    }

    fn read_raw_layer(&self, idx: usize, index: usize) -> Result<Vec<u8>> {
        let layout = &self.layouts[idx];
        let variable = &self.variables[idx];
        let mut buf = Vec::new();
        if layout.record {
            let offset = slab_offset(layout.begin, index as u64, self.record_size)?;
            self.read_bytes(offset, layout.slab_bytes, &mut buf)?;
        } else {
            let layer_bytes = layout.slab_bytes / variable.shape[0].max(1) as u64;
            let offset = slab_offset(layout.begin, index as u64, layer_bytes)?;
            self.read_bytes(offset, layer_bytes, &mut buf)?;
        }
        Ok(buf)
    }
}

fn masked(variable: &Variable, bytes: &[u8], shape: &[usize]) -> Result<MaskedArray> {
    let values = decode_values(bytes, variable.nc_type);
    MaskRules::for_variable(variable).apply(values, shape)
}

impl<R: Read + Seek> Dataset for NcFile<R> {
    fn global_attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    fn variables(&self) -> &[Variable] {
        &self.variables
    }

    fn read(&self, variable: &Variable) -> nclint_model::Result<MaskedArray> {
        let idx = self.index_of(variable)?;
        let variable = &self.variables[idx];
        let bytes = self.read_raw(idx)?;
        Ok(masked(variable, &bytes, &variable.shape)?)
    }

    fn read_layer(&self, variable: &Variable, index: usize) -> nclint_model::Result<MaskedArray> {
        let idx = self.index_of(variable)?;
        let variable = &self.variables[idx];
        let Some(len) = variable.len() else {
            return Err(DatasetError::ScalarVariable {
                name: variable.name.clone(),
            });
        };
        if index >= len {
            return Err(DatasetError::LayerOutOfBounds {
                name: variable.name.clone(),
                index,
                len,
            });
        }
        let bytes = self.read_raw_layer(idx, index)?;
        Ok(masked(variable, &bytes, &variable.shape[1..])?)
    }
}

impl<R> std::fmt::Debug for NcFile<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NcFile")
            .field("path", &self.path)
            .field("version", &self.version)
            .field("numrecs", &self.numrecs)
            .field("dimensions", &self.dimensions.len())
            .field("variables", &self.variables.len())
            .finish_non_exhaustive()
    }
}

fn to_usize(value: u64) -> Result<usize> {
    usize::try_from(value).map_err(|_| NetcdfError::invalid_format("length exceeds address space"))
}

/// `begin + index * stride`, rejecting offsets past `u64::MAX`.
fn slab_offset(begin: u64, index: u64, stride: u64) -> Result<u64> {
    index
        .checked_mul(stride)
        .and_then(|delta| begin.checked_add(delta))
        .ok_or_else(|| NetcdfError::invalid_format("data offset overflow"))
}

fn checked_product(shape: &[usize]) -> Result<usize> {
    shape.iter().try_fold(1usize, |acc, &len| {
        acc.checked_mul(len)
            .ok_or_else(|| NetcdfError::invalid_format("variable size overflow"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_product() {
        assert_eq!(checked_product(&[]).unwrap(), 1);
        assert_eq!(checked_product(&[2, 3, 4]).unwrap(), 24);
        assert!(checked_product(&[usize::MAX, 2]).is_err());
    }

    #[test]
    fn test_slab_offset() {
        assert_eq!(slab_offset(96, 2, 40).unwrap(), 176);
        let err = slab_offset(u64::MAX - 8, 1, 16).unwrap_err();
        assert!(matches!(err, NetcdfError::InvalidFormat { .. }));
        assert!(slab_offset(0, u64::MAX, 2).is_err());
    }

    #[test]
    fn test_open_missing_file() {
        let err = NcFile::open(Path::new("/nonexistent/nclint/file.nc")).unwrap_err();
        assert!(matches!(err, NetcdfError::FileNotFound { .. }));
    }
}
