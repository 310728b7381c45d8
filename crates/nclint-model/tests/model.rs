use nclint_model::{AttrValue, Dataset, DatasetError, MaskedArray, MemoryDataset, NcType};

fn grid() -> MemoryDataset {
    let mut ds = MemoryDataset::new().with_attribute("title", "grid");
    ds.add_unlimited_dimension("time", 3).unwrap();
    ds.add_dimension("lat", 2).unwrap();
    ds.add_dimension("lon", 2).unwrap();
    ds.add_variable(
        "time",
        &["time"],
        NcType::Double,
        MaskedArray::from_shape_vec(&[3], vec![0.0, 1.0, 2.0]).unwrap(),
    )
    .unwrap()
    .attributes
    .insert("units", "days since 1950-01-01");
    ds.add_variable(
        "tas",
        &["time", "lat", "lon"],
        NcType::Float,
        MaskedArray::filled(&[3, 2, 2], 1.0),
    )
    .unwrap();
    ds
}

#[test]
fn variables_keep_insertion_order() {
    let ds = grid();
    let names: Vec<_> = ds.variables().iter().map(|var| var.name.as_str()).collect();
    assert_eq!(names, vec!["time", "tas"]);
    assert!(ds.variable("time").unwrap().is_coordinate());
    assert!(!ds.variable("tas").unwrap().is_coordinate());
}

#[test]
fn read_layer_returns_slab() {
    let ds = grid();
    let tas = ds.variable("tas").unwrap();
    let layer = ds.read_layer(tas, 2).unwrap();
    assert_eq!(layer.shape(), &[2, 2]);
    assert!(!layer.is_masked());

    let err = ds.read_layer(tas, 3).unwrap_err();
    assert!(matches!(err, DatasetError::LayerOutOfBounds { len: 3, .. }));
}

#[test]
fn remove_attribute() {
    let mut ds = grid();
    assert_eq!(ds.remove_attribute("title"), Some(AttrValue::text("grid")));
    assert!(!ds.has_global_attribute("title"));
}

#[test]
fn variable_metadata_serializes() {
    let ds = grid();
    let json = serde_json::to_value(ds.variable("time").unwrap()).unwrap();
    assert_eq!(json["name"], "time");
    assert_eq!(json["nc_type"], "double");
    assert_eq!(json["shape"][0], 3);
}
