//! NetCDF file writer.
//!
//! Writes any [`Dataset`] as a NetCDF classic file. Non-record variables
//! are laid out first in declaration order, followed by the record section
//! (one slab per record variable, record after record).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nclint_model::{Dataset, Variable};

use crate::codec::{encode_value, padded, padding};
use crate::error::{NetcdfError, Result};
use crate::header::{DimHeader, Header, VarHeader, build_header};
use crate::mask::MaskRules;
use crate::types::WriterOptions;

/// NetCDF classic writer.
pub struct NcWriter<W: Write> {
    writer: BufWriter<W>,
    options: WriterOptions,
}

impl<W: Write> NcWriter<W> {
    /// Create a new writer producing CDF-1 files.
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            options: WriterOptions::default(),
        }
    }

    /// Create a new writer with options.
    pub fn with_options(writer: W, options: WriterOptions) -> Self {
        Self {
            writer: BufWriter::new(writer),
            options,
        }
    }

    /// Write `dataset` header and data.
    pub fn write_dataset<D: Dataset + ?Sized>(mut self, dataset: &D) -> Result<()> {
        let mut header = plan_header(dataset, &self.options)?;
        let encoded = dataset
            .variables()
            .iter()
            .map(|var| encode_variable(dataset, var))
            .collect::<Result<Vec<_>>>()?;

        let record_vars: Vec<usize> = header
            .variables
            .iter()
            .enumerate()
            .filter(|(_, var)| header.is_record_variable(var))
            .map(|(idx, _)| idx)
            .collect();
        let single_record = record_vars.len() == 1;
        let numrecs = usize::try_from(header.numrecs).unwrap_or(0);

        let slab_len = |idx: usize| -> usize {
            if header.is_record_variable(&header.variables[idx]) {
                encoded[idx].len().checked_div(numrecs).unwrap_or(0)
            } else {
                encoded[idx].len()
            }
        };
        let slab_lens: Vec<usize> = (0..encoded.len()).map(slab_len).collect();

        let mut offset = build_header(&header)?.len() as u64;
        for (idx, var) in header.variables.iter_mut().enumerate() {
            var.vsize = padded(slab_lens[idx]) as u64;
            if !record_vars.contains(&idx) {
                var.begin = offset;
                offset += var.vsize;
            }
        }
        for &idx in &record_vars {
            let var = &mut header.variables[idx];
            var.begin = offset;
            offset += if single_record {
                slab_lens[idx] as u64
            } else {
                var.vsize
            };
        }

        self.writer.write_all(&build_header(&header)?)?;

        for (idx, bytes) in encoded.iter().enumerate() {
            if !record_vars.contains(&idx) {
                self.write_padded(bytes)?;
            }
        }
        for record in 0..numrecs {
            for &idx in &record_vars {
                let len = slab_lens[idx];
                let slab = &encoded[idx][record * len..(record + 1) * len];
                if single_record {
                    self.writer.write_all(slab)?;
                } else {
                    self.write_padded(slab)?;
                }
            }
        }

        self.writer.flush()?;
        Ok(())
    }

    fn write_padded(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.writer.write_all(&[0u8; 4][..padding(bytes.len())])?;
        Ok(())
    }
}

/// Header with dimension ids resolved and data offsets still unset.
fn plan_header<D: Dataset + ?Sized>(dataset: &D, options: &WriterOptions) -> Result<Header> {
    let dims = dataset.dimensions();
    let numrecs = dims
        .iter()
        .find(|dim| dim.unlimited)
        .map_or(0, |dim| dim.len as u64);

    let dimensions = dims
        .iter()
        .map(|dim| DimHeader {
            name: dim.name.clone(),
            len: if dim.unlimited { 0 } else { dim.len as u64 },
        })
        .collect();

    let variables = dataset
        .variables()
        .iter()
        .map(|var| {
            let dim_ids = var
                .dimensions
                .iter()
                .enumerate()
                .map(|(pos, name)| {
                    let id = dims
                        .iter()
                        .position(|dim| &dim.name == name)
                        .ok_or_else(|| nclint_model::DatasetError::dimension_not_found(name))?;
                    if dims[id].unlimited && pos != 0 {
                        return Err(NetcdfError::invalid_format(format!(
                            "record dimension {name} must be the leftmost dimension of {}",
                            var.name
                        )));
                    }
                    Ok(id as u64)
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(VarHeader {
                name: var.name.clone(),
                dim_ids,
                attributes: var.attributes.clone(),
                nc_type: var.nc_type,
                vsize: 0,
                begin: 0,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Header {
        version: options.version,
        numrecs,
        dimensions,
        attributes: dataset.global_attributes().clone(),
        variables,
    })
}

/// Encoded data of a whole variable; masked elements become the fill value.
fn encode_variable<D: Dataset + ?Sized>(dataset: &D, var: &Variable) -> Result<Vec<u8>> {
    let data = dataset.read(var)?;
    let rules = MaskRules::for_variable(var);
    let fill = MaskRules::fill_value(var);
    let mut out = Vec::with_capacity(data.len() * var.nc_type.size());
    for value in data.values() {
        let raw = value.map_or(fill, |value| rules.pack(value));
        encode_value(raw, var.nc_type, &mut out);
    }
    Ok(out)
}

/// Write `dataset` to `path` as a CDF-1 file.
pub fn write_netcdf<D: Dataset + ?Sized>(path: &Path, dataset: &D) -> Result<()> {
    write_netcdf_with_options(path, dataset, WriterOptions::default())
}

/// Write `dataset` to `path` with options.
pub fn write_netcdf_with_options<D: Dataset + ?Sized>(
    path: &Path,
    dataset: &D,
    options: WriterOptions,
) -> Result<()> {
    let file = File::create(path)?;
    NcWriter::with_options(file, options).write_dataset(dataset)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use nclint_model::{MaskedArray, MemoryDataset, NcType};

    use super::*;
    use crate::NcFile;

    fn write_to_vec<D: Dataset>(dataset: &D) -> Vec<u8> {
        let mut buf = Vec::new();
        NcWriter::new(&mut buf).write_dataset(dataset).unwrap();
        buf
    }

    #[test]
    fn test_empty_dataset() {
        let bytes = write_to_vec(&MemoryDataset::new());
        assert_eq!(&bytes[..4], b"CDF\x01");
        assert_eq!(bytes.len(), 32);
    }

    #[test]
    fn test_single_record_variable_is_unpadded() {
        let mut ds = MemoryDataset::new();
        ds.add_unlimited_dimension("time", 3).unwrap();
        let data = MaskedArray::from_shape_vec(&[3], vec![1.0, 2.0, 3.0]).unwrap();
        ds.add_variable("flag", &["time"], NcType::Short, data)
            .unwrap();

        let bytes = write_to_vec(&ds);
        let header_len = build_header(&plan_header(&ds, &WriterOptions::default()).unwrap())
            .unwrap()
            .len();
        assert_eq!(bytes.len(), header_len + 6);

        let nc = NcFile::from_reader(Cursor::new(bytes)).unwrap();
        let var = nc.variable("flag").unwrap();
        assert_eq!(nc.read(var).unwrap().compressed(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_record_dimension_must_lead() {
        let mut ds = MemoryDataset::new();
        ds.add_dimension("x", 2).unwrap();
        ds.add_unlimited_dimension("time", 1).unwrap();
        let data = MaskedArray::filled(&[2, 1], 0.0);
        ds.add_variable("v", &["x", "time"], NcType::Float, data)
            .unwrap();
        let mut buf = Vec::new();
        let err = NcWriter::new(&mut buf).write_dataset(&ds).unwrap_err();
        assert!(matches!(err, NetcdfError::InvalidFormat { .. }));
    }
}
