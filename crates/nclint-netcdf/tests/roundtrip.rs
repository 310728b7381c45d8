//! Write datasets to disk and read them back.

use std::fs;

use nclint_model::{AttrValue, Dataset, DatasetError, MaskedArray, MemoryDataset, NcType};
use nclint_netcdf::{NcFile, NetcdfError, Version, WriterOptions, write_netcdf, write_netcdf_with_options};
use proptest::prelude::*;
use tempfile::TempDir;

fn climate_dataset() -> MemoryDataset {
    let mut ds = MemoryDataset::new()
        .with_attribute("Conventions", "CF-1.4")
        .with_attribute("realization", 1);
    ds.add_unlimited_dimension("time", 3).unwrap();
    ds.add_dimension("lat", 2).unwrap();
    ds.add_dimension("lon", 2).unwrap();

    let time = MaskedArray::from_shape_vec(&[3], vec![0.0, 1.0, 2.0]).unwrap();
    ds.add_variable("time", &["time"], NcType::Double, time)
        .unwrap()
        .attributes
        .insert("units", "days since 1950-01-01");
    let lat = MaskedArray::from_shape_vec(&[2], vec![48.5, 49.5]).unwrap();
    ds.add_variable("lat", &["lat"], NcType::Double, lat).unwrap();
    let lon = MaskedArray::from_shape_vec(&[2], vec![-123.5, -122.5]).unwrap();
    ds.add_variable("lon", &["lon"], NcType::Double, lon).unwrap();

    let mut tas = MaskedArray::filled(&[3, 2, 2], 271.5);
    tas.set_masked(&[1, 0, 1], true);
    let var = ds
        .add_variable("tas", &["time", "lat", "lon"], NcType::Float, tas)
        .unwrap();
    var.attributes.insert("units", "K");
    var.attributes
        .insert("_FillValue", AttrValue::number(NcType::Float, 1e20));
    ds
}

#[test]
fn test_roundtrip_all_versions() {
    let dir = TempDir::new().unwrap();
    for version in [Version::Classic, Version::Offset64, Version::Data64] {
        let path = dir.path().join(format!("{version}.nc"));
        let ds = climate_dataset();
        write_netcdf_with_options(&path, &ds, WriterOptions::default().with_version(version))
            .unwrap();

        let nc = NcFile::open(&path).unwrap();
        assert_eq!(nc.version(), version);
        assert_eq!(nc.num_records(), 3);
        assert_eq!(nc.global_attributes().text("Conventions"), Some("CF-1.4"));
        assert_eq!(
            nc.global_attributes()
                .get("realization")
                .and_then(AttrValue::first_number),
            Some(1.0)
        );

        let names: Vec<&str> = nc.variables().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["time", "lat", "lon", "tas"]);

        let time_dim = nc.dimension("time").unwrap();
        assert!(time_dim.unlimited);
        assert_eq!(time_dim.len, 3);

        let tas = nc.variable("tas").unwrap();
        assert_eq!(tas.shape, [3, 2, 2]);
        let data = nc.read(tas).unwrap();
        assert_eq!(data.masked_count(), 1);
        assert!(data.is_masked_at(&[1, 0, 1]));

        let layer = nc.read_layer(tas, 1).unwrap();
        assert_eq!(layer.shape(), [2, 2]);
        assert!(layer.is_masked_at(&[0, 1]));
        assert_eq!(layer.compressed(), vec![271.5; 3]);

        let lon = nc.variable("lon").unwrap();
        assert_eq!(nc.read(lon).unwrap().compressed(), vec![-123.5, -122.5]);
    }
}

#[test]
fn test_layer_out_of_bounds() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bounds.nc");
    write_netcdf(&path, &climate_dataset()).unwrap();
    let nc = NcFile::open(&path).unwrap();
    let tas = nc.variable("tas").unwrap();
    let err = nc.read_layer(tas, 3).unwrap_err();
    assert!(matches!(
        err,
        DatasetError::LayerOutOfBounds { index: 3, len: 3, .. }
    ));
}

#[test]
fn test_packed_variable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("packed.nc");
    let mut ds = MemoryDataset::new();
    ds.add_dimension("x", 3).unwrap();
    let data = MaskedArray::from_shape_vec(&[3], vec![10.0, 10.5, 11.0]).unwrap();
    let var = ds.add_variable("pr", &["x"], NcType::Short, data).unwrap();
    var.attributes
        .insert("scale_factor", AttrValue::number(NcType::Float, 0.5));
    var.attributes
        .insert("add_offset", AttrValue::number(NcType::Float, 10.0));
    write_netcdf(&path, &ds).unwrap();

    let nc = NcFile::open(&path).unwrap();
    let pr = nc.variable("pr").unwrap();
    assert_eq!(nc.read(pr).unwrap().compressed(), vec![10.0, 10.5, 11.0]);
}

#[test]
fn test_truncated_data() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("short.nc");
    write_netcdf(&path, &climate_dataset()).unwrap();
    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() - 8]).unwrap();

    let nc = NcFile::open(&path).unwrap();
    let tas = nc.variable("tas").unwrap();
    let err = nc.read(tas).unwrap_err();
    let DatasetError::Backend(inner) = err else {
        panic!("expected a backend error, got {err:?}");
    };
    assert!(matches!(
        inner.downcast_ref::<NetcdfError>(),
        Some(NetcdfError::Truncated { .. })
    ));
}

#[test]
fn test_not_a_netcdf_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "tasmax,tasmin\n").unwrap();
    let err = NcFile::open(&path).unwrap_err();
    assert!(matches!(err, NetcdfError::InvalidFormat { .. }));
}

proptest! {
    #[test]
    fn prop_values_survive_roundtrip(
        values in prop::collection::vec(-1.0e6f64..1.0e6, 1..32),
        masked in prop::collection::vec(any::<bool>(), 32),
    ) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prop.nc");
        let len = values.len();
        let mut array = MaskedArray::from_shape_vec(&[len], values.clone()).unwrap();
        for (idx, &flag) in masked.iter().take(len).enumerate() {
            array.set_masked(&[idx], flag);
        }
        let mut ds = MemoryDataset::new();
        ds.add_dimension("x", len).unwrap();
        ds.add_variable("v", &["x"], NcType::Double, array.clone()).unwrap();
        write_netcdf(&path, &ds).unwrap();

        let nc = NcFile::open(&path).unwrap();
        let back = nc.read(nc.variable("v").unwrap()).unwrap();
        prop_assert_eq!(back.values().collect::<Vec<_>>(), array.values().collect::<Vec<_>>());
    }
}
