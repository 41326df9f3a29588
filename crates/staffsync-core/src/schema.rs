use serde::Serialize;

/// The two directory collections that can be bulk-imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Employee,
    OfficeContact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Date,
}

/// One column of an entity kind, declared exactly once.
///
/// Normalizer, validator, diff engine, commit orchestrator and export all
/// consult these tables; no component carries its own field list.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Canonical field name; doubles as the database column name.
    pub name: &'static str,
    /// The fixed column header of the source spreadsheets.
    pub header: &'static str,
    pub field_type: FieldType,
    /// Missing values are reported by the validation collector. Advisory
    /// only; flagged rows still import.
    pub required: bool,
    /// Maintained by the backend; excluded from diffing and never sent in
    /// an import payload.
    pub server_managed: bool,
}

const EMPLOYEE_FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "employee_id", header: "الرقم الوظيفي", field_type: FieldType::Text, required: false, server_managed: false },
    FieldSpec { name: "full_name_ar", header: "الاسم باللغة العربية", field_type: FieldType::Text, required: true, server_managed: false },
    FieldSpec { name: "full_name_en", header: "الاسم باللغة الإنجليزية", field_type: FieldType::Text, required: false, server_managed: false },
    FieldSpec { name: "job_title", header: "المسمى الوظيفي", field_type: FieldType::Text, required: false, server_managed: false },
    FieldSpec { name: "department", header: "الإدارة", field_type: FieldType::Text, required: false, server_managed: true },
    FieldSpec { name: "center", header: "المركز", field_type: FieldType::Text, required: false, server_managed: false },
    FieldSpec { name: "phone_direct", header: "الهاتف المباشر", field_type: FieldType::Text, required: false, server_managed: false },
    FieldSpec { name: "email", header: "البريد الإلكتروني", field_type: FieldType::Text, required: false, server_managed: false },
    FieldSpec { name: "national_id", header: "رقم الهوية", field_type: FieldType::Text, required: false, server_managed: false },
    FieldSpec { name: "nationality", header: "الجنسية", field_type: FieldType::Text, required: false, server_managed: false },
    FieldSpec { name: "gender", header: "الجنس", field_type: FieldType::Text, required: false, server_managed: false },
    FieldSpec { name: "date_of_birth", header: "تاريخ الميلاد", field_type: FieldType::Date, required: false, server_managed: false },
    FieldSpec { name: "classification_id", header: "رقم التصنيف", field_type: FieldType::Text, required: false, server_managed: false },
];

const OFFICE_CONTACT_FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "name", header: "الاسم", field_type: FieldType::Text, required: true, server_managed: false },
    FieldSpec { name: "extension", header: "التحويلة", field_type: FieldType::Text, required: true, server_managed: false },
    FieldSpec { name: "location", header: "الموقع", field_type: FieldType::Text, required: false, server_managed: false },
    FieldSpec { name: "email", header: "البريد الإلكتروني", field_type: FieldType::Text, required: false, server_managed: false },
];

impl EntityKind {
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            EntityKind::Employee => EMPLOYEE_FIELDS,
            EntityKind::OfficeContact => OFFICE_CONTACT_FIELDS,
        }
    }

    /// The business key incoming rows are matched on.
    pub fn natural_key(&self) -> &'static str {
        match self {
            EntityKind::Employee => "employee_id",
            EntityKind::OfficeContact => "name",
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Employee => "employees",
            EntityKind::OfficeContact => "office_contacts",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Employee => "employee",
            EntityKind::OfficeContact => "office_contact",
        }
    }

    /// Fields that participate in diffing and import payloads.
    pub fn importable_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields().iter().filter(|spec| !spec.server_managed)
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|spec| spec.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_keys_are_part_of_the_schema() {
        for kind in [EntityKind::Employee, EntityKind::OfficeContact] {
            assert!(kind.field(kind.natural_key()).is_some());
        }
    }

    #[test]
    fn server_managed_fields_never_import() {
        assert!(EntityKind::Employee
            .importable_fields()
            .all(|spec| spec.name != "department"));
        assert!(EntityKind::Employee.field("department").is_some());
    }
}
