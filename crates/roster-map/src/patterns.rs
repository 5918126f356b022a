use std::collections::BTreeMap;

use roster_model::CanonicalField;

use crate::utils::normalize_text;

/// Header spellings the backend recognizes for each field.
fn raw_patterns(field: CanonicalField) -> &'static [&'static str] {
    match field {
        CanonicalField::StudentId => &["id", "student_id", "roll_no", "enrollment", "student_no"],
        CanonicalField::Name => &["name", "student_name", "full_name", "student"],
        CanonicalField::AttendancePercentage => &[
            "attendance_percentage",
            "attendance",
            "attend",
            "attendance_percent",
            "attendance%",
        ],
        CanonicalField::Marks => &["marks", "theory_marks", "score", "grade", "percentage"],
        CanonicalField::Department => &["department", "dept", "branch", "course"],
        CanonicalField::Semester => &["semester", "sem", "year", "class"],
        CanonicalField::FamilyIncome => &["income", "family_income", "annual_income"],
        CanonicalField::FamilySize => &["family_size", "family_members", "household_size"],
        CanonicalField::Region => &["region", "area", "location", "urban_rural"],
        CanonicalField::Electricity => &["electricity", "power", "electric"],
        CanonicalField::InternetAccess => &["internet", "internet_access", "wifi"],
        CanonicalField::DistanceFromCollege => &["distance", "commute", "travel_distance"],
        CanonicalField::Age => &["age"],
        CanonicalField::BatchYear => &["batch_year", "batch"],
    }
}

/// Normalized patterns for every field, keyed in canonical order.
pub fn build_field_patterns() -> BTreeMap<CanonicalField, Vec<String>> {
    CanonicalField::ALL
        .iter()
        .map(|field| {
            let mut values: Vec<String> = raw_patterns(*field)
                .iter()
                .map(|p| normalize_text(p))
                .collect();
            values.dedup();
            (*field, values)
        })
        .collect()
}
