//! Attribute sets.
//!
//! Base sets describe GCM output or a gridded dataset as referenced from a
//! downstream file. They are never required as is: in use every name bears
//! a prefix saying what it describes (`driving_` for the GCM input to
//! downscaling, `target_` for the calibration dataset of downscaling, and
//! so on).

use std::sync::LazyLock;

use serde::Serialize;

use crate::table::Table;

/// A named, ordered list of global attribute names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeSet {
    role: &'static str,
    table: Option<Table>,
    names: Vec<String>,
}

impl AttributeSet {
    pub fn new<S: Into<String>>(
        role: &'static str,
        table: Option<Table>,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            role,
            table,
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Symbolic role, e.g. `hydromodel_specific_optional`.
    pub fn role(&self) -> &'static str {
        self.role
    }

    /// Reference table, `None` for base sets.
    pub fn table(&self) -> Option<Table> {
        self.table
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn into_names(self) -> Vec<String> {
        self.names
    }
}

/// `base` with `prefix` prepended to every name. Role and table are kept.
pub fn prefixed(base: &AttributeSet, prefix: &str) -> AttributeSet {
    AttributeSet {
        role: base.role,
        table: base.table,
        names: base.iter().map(|name| format!("{prefix}{name}")).collect(),
    }
}

macro_rules! attribute_set {
    ($static:ident, $role:literal, $table:expr, [$($name:literal),* $(,)?]) => {
        pub static $static: LazyLock<AttributeSet> =
            LazyLock::new(|| AttributeSet::new($role, $table, [$($name),*]));
    };
}

attribute_set!(
    CMIP5,
    "cmip5",
    Some(Table::Cmip5),
    [
        "branch_time",
        "contact",
        "Conventions",
        "creation_date",
        "experiment",
        "experiment_id",
        "forcing",
        "frequency",
        "initialization_method",
        "institute_id",
        "institution",
        "model_id",
        "modeling_realm",
        "parent_experiment_id",
        "parent_experiment_rip",
        "physics_version",
        "product",
        "project_id",
        "realization",
        "source",
        "table_id",
        "tracking_id",
    ]
);

attribute_set!(
    CF,
    "cf",
    Some(Table::Cf),
    ["title", "institution", "source", "history", "references", "comment"]
);

attribute_set!(
    SUMMARY_GCM_MANDATORY,
    "summary_gcm_mandatory",
    None,
    [
        "experiment",
        "experiment_id",
        "initialization_method",
        "institute_id",
        "institution",
        "model_id",
        "physics_version",
        "realization",
    ]
);

attribute_set!(
    SUMMARY_GCM_OPTIONAL,
    "summary_gcm_optional",
    None,
    ["forcing", "frequency", "tracking_id"]
);

attribute_set!(
    GRIDDED_DATASET_MANDATORY,
    "gridded_dataset_mandatory",
    None,
    [
        "contact",
        "dataset",
        "dataset_id",
        "institute_id",
        "institution",
        "references",
        "version",
    ]
);

attribute_set!(
    GRIDDED_DATASET_OPTIONAL,
    "gridded_dataset_optional",
    None,
    ["frequency"]
);

attribute_set!(
    PCIC_COMMON_MANDATORY,
    "pcic_common_mandatory",
    Some(Table::A),
    [
        "contact",
        "Conventions",
        "creation_date",
        "frequency",
        "institute_id",
        "institution",
        "modeling_realm",
        "product",
        "project_id",
        "table_id",
        "title",
    ]
);

/// Downscaling-specific mandatory attributes. A complete downscaled output
/// file also needs [`PCIC_COMMON_MANDATORY`].
pub static DOWNSCALING_SPECIFIC_MANDATORY: LazyLock<AttributeSet> = LazyLock::new(|| {
    let names = prefixed(&SUMMARY_GCM_MANDATORY, "driving_")
        .into_names()
        .into_iter()
        .chain(prefixed(&GRIDDED_DATASET_MANDATORY, "target_").into_names())
        .chain(
            ["downscaling_method", "downscaling_method_id", "downscaling_package_id"]
                .map(String::from),
        );
    AttributeSet::new("downscaling_specific_mandatory", Some(Table::B), names)
});

pub static DOWNSCALING_SPECIFIC_OPTIONAL: LazyLock<AttributeSet> = LazyLock::new(|| {
    let names = prefixed(&SUMMARY_GCM_OPTIONAL, "driving_")
        .into_names()
        .into_iter()
        .chain(prefixed(&GRIDDED_DATASET_OPTIONAL, "target_").into_names());
    AttributeSet::new("downscaling_specific_optional", Some(Table::B), names)
});

/// Every optional attribute of a downscaled output file.
pub static DOWNSCALING_OPTIONAL: LazyLock<AttributeSet> = LazyLock::new(|| {
    let names = DOWNSCALING_SPECIFIC_OPTIONAL
        .names()
        .iter()
        .cloned()
        .chain(["domain", "tracking_id"].map(String::from));
    AttributeSet::new("downscaling_optional", Some(Table::B), names)
});

attribute_set!(
    MODEL_FORCING_GENERAL_MANDATORY,
    "model_forcing_general_mandatory",
    Some(Table::C1),
    ["forcing_type"]
);

attribute_set!(
    MODEL_FORCING_GENERAL_OPTIONAL,
    "model_forcing_general_optional",
    Some(Table::C1),
    ["forcing_domain"]
);

pub static MODEL_FORCING_OBSERVATIONAL_MANDATORY: LazyLock<AttributeSet> =
    LazyLock::new(|| {
        derived(
            "model_forcing_observational_mandatory",
            Table::C2,
            &GRIDDED_DATASET_MANDATORY,
            "forcing_obs_",
        )
    });

pub static MODEL_FORCING_OBSERVATIONAL_OPTIONAL: LazyLock<AttributeSet> = LazyLock::new(|| {
    derived(
        "model_forcing_observational_optional",
        Table::C2,
        &GRIDDED_DATASET_OPTIONAL,
        "forcing_obs_",
    )
});

pub static MODEL_FORCING_DOWNSCALED_GCM_MANDATORY: LazyLock<AttributeSet> =
    LazyLock::new(|| {
        derived(
            "model_forcing_downscaled_gcm_mandatory",
            Table::C3,
            &DOWNSCALING_SPECIFIC_MANDATORY,
            "forcing_",
        )
    });

pub static MODEL_FORCING_DOWNSCALED_GCM_OPTIONAL: LazyLock<AttributeSet> = LazyLock::new(|| {
    derived(
        "model_forcing_downscaled_gcm_optional",
        Table::C3,
        &DOWNSCALING_SPECIFIC_OPTIONAL,
        "forcing_",
    )
});

pub static MODEL_CALIBRATION_MANDATORY: LazyLock<AttributeSet> = LazyLock::new(|| {
    derived(
        "model_calibration_mandatory",
        Table::D,
        &GRIDDED_DATASET_MANDATORY,
        "calibration_",
    )
});

pub static MODEL_CALIBRATION_OPTIONAL: LazyLock<AttributeSet> = LazyLock::new(|| {
    derived(
        "model_calibration_optional",
        Table::D,
        &GRIDDED_DATASET_OPTIONAL,
        "calibration_",
    )
});

attribute_set!(
    HYDROMODEL_SPECIFIC_MANDATORY,
    "hydromodel_specific_mandatory",
    Some(Table::E),
    [
        "domain",
        "hydromodel_method",
        "hydromodel_method_id",
        "hydromodel_version",
        "hydromodel_resolution",
        "hydromodel_type",
    ]
);

attribute_set!(
    HYDROMODEL_SPECIFIC_OPTIONAL,
    "hydromodel_specific_optional",
    Some(Table::E),
    ["hydromodel_settings"]
);

fn derived(role: &'static str, table: Table, base: &AttributeSet, prefix: &str) -> AttributeSet {
    AttributeSet::new(role, Some(table), prefixed(base, prefix).into_names())
}
