//! Reference tables the attribute sets come from.

use std::fmt;

use serde::Serialize;

const CMIP5_URL: &str =
    "http://cmip-pcmdi.llnl.gov/cmip5/docs/CMIP5_output_metadata_requirements_22May14.pdf";
const CF_URL: &str =
    "http://cfconventions.org/cf-conventions/v1.6.0/cf-conventions.html#description-of-file-contents";
const PCIC_URL: &str = "https://pcic.uvic.ca/confluence/display/CSG/PCIC+metadata+standard+for+downscaled+data+and+hydrology+modelling+data";

/// Published metadata table a required attribute is defined by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Table {
    /// CMIP5 output metadata requirements.
    Cmip5,
    /// CF Conventions 1.6, description of file contents.
    Cf,
    /// PCIC Table A: common to all PCIC data files.
    A,
    /// PCIC Table B: downscaling.
    B,
    /// PCIC Table C1: general model forcing.
    C1,
    /// PCIC Table C2: model forcing by observational data.
    C2,
    /// PCIC Table C3: model forcing by downscaled GCM data.
    C3,
    /// PCIC Table D: model calibration.
    D,
    /// PCIC Table E: hydrological model.
    E,
}

impl Table {
    /// Short label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cmip5 => "CMIP5",
            Self::Cf => "CF",
            Self::A => "A",
            Self::B => "B",
            Self::C1 => "C1",
            Self::C2 => "C2",
            Self::C3 => "C3",
            Self::D => "D",
            Self::E => "E",
        }
    }

    /// Document the table is published in.
    pub fn reference(&self) -> &'static str {
        match self {
            Self::Cmip5 => CMIP5_URL,
            Self::Cf => CF_URL,
            _ => PCIC_URL,
        }
    }

    /// True for the PCIC metadata standard tables (A to E).
    pub fn is_pcic(&self) -> bool {
        !matches!(self, Self::Cmip5 | Self::Cf)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_pcic() {
            write!(f, "Table {}", self.label())
        } else {
            f.write_str(self.label())
        }
    }
}
