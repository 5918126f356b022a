//! Canonical target fields of the student schema.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A column of the backend's student schema that uploaded data maps onto.
///
/// The set is fixed configuration. Variants are declared in the order the
/// mapping form presents them, which is also the order the suggestion engine
/// lets fields claim columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    StudentId,
    Name,
    AttendancePercentage,
    Marks,
    Department,
    Semester,
    FamilyIncome,
    FamilySize,
    Region,
    Electricity,
    InternetAccess,
    DistanceFromCollege,
    Age,
    BatchYear,
}

/// Fields that must be mapped before a file can be processed.
pub const REQUIRED_FIELDS: [CanonicalField; 4] = [
    CanonicalField::StudentId,
    CanonicalField::Name,
    CanonicalField::AttendancePercentage,
    CanonicalField::Marks,
];

impl CanonicalField {
    /// Every field, in presentation order.
    pub const ALL: [CanonicalField; 14] = [
        Self::StudentId,
        Self::Name,
        Self::AttendancePercentage,
        Self::Marks,
        Self::Department,
        Self::Semester,
        Self::FamilyIncome,
        Self::FamilySize,
        Self::Region,
        Self::Electricity,
        Self::InternetAccess,
        Self::DistanceFromCollege,
        Self::Age,
        Self::BatchYear,
    ];

    /// Identifier used on the wire (`"attendance_percentage"`).
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::StudentId => "student_id",
            Self::Name => "name",
            Self::AttendancePercentage => "attendance_percentage",
            Self::Marks => "marks",
            Self::Department => "department",
            Self::Semester => "semester",
            Self::FamilyIncome => "family_income",
            Self::FamilySize => "family_size",
            Self::Region => "region",
            Self::Electricity => "electricity",
            Self::InternetAccess => "internet_access",
            Self::DistanceFromCollege => "distance_from_college",
            Self::Age => "age",
            Self::BatchYear => "batch_year",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::StudentId => "Student ID",
            Self::Name => "Student Name",
            Self::AttendancePercentage => "Attendance %",
            Self::Marks => "Marks",
            Self::Department => "Department",
            Self::Semester => "Semester",
            Self::FamilyIncome => "Family Income",
            Self::FamilySize => "Family Size",
            Self::Region => "Region (Urban/Rural)",
            Self::Electricity => "Electricity Access",
            Self::InternetAccess => "Internet Access",
            Self::DistanceFromCollege => "Distance from College",
            Self::Age => "Age",
            Self::BatchYear => "Batch Year",
        }
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        REQUIRED_FIELDS.contains(self)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for CanonicalField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ModelError::UnknownField(s.to_string()))
    }
}
