use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilingStatus {
    #[default]
    Single,
    #[serde(rename = "married", alias = "married_joint")]
    MarriedJoint,
}

impl FilingStatus {
    pub fn all() -> &'static [FilingStatus] {
        &[FilingStatus::Single, FilingStatus::MarriedJoint]
    }

    /// Code used in rule files and the persisted input store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::MarriedJoint => "married",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::MarriedJoint => "Married Filing Jointly",
        }
    }

    /// Accepts the store codes as well as the IRS abbreviations (`S`, `MFJ`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" | "s" => Some(Self::Single),
            "married" | "married_joint" | "mfj" => Some(Self::MarriedJoint),
            _ => None,
        }
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per supported filing status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerFilingStatus<T> {
    pub single: T,
    #[serde(rename = "married", alias = "married_joint")]
    pub married_joint: T,
}

impl<T> PerFilingStatus<T> {
    pub fn new(
        single: T,
        married_joint: T,
    ) -> Self {
        Self {
            single,
            married_joint,
        }
    }

    pub fn get(
        &self,
        status: FilingStatus,
    ) -> &T {
        match status {
            FilingStatus::Single => &self.single,
            FilingStatus::MarriedJoint => &self.married_joint,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (FilingStatus, &T)> {
        [
            (FilingStatus::Single, &self.single),
            (FilingStatus::MarriedJoint, &self.married_joint),
        ]
        .into_iter()
    }
}
