//! Registration draft records.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Main registration record. Every field is free text while drafting; see
/// [`crate::validation`] for the submission rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct RegistrationForm {
    pub name_english: String,
    pub gender: String,
    pub mobile_number: String,
    pub email: String,
    pub blood_group: String,
    pub t_shirt_size: String,
    pub present_address: String,
    pub permanent_address: String,
    pub ssc_batch: String,
    pub ssc_department: String,
    pub hsc_batch: String,
    pub hsc_department: String,
    pub occupation: String,
    pub organization: String,
    pub job_position: String,
    pub remarks: String,
}

/// Addressable field of [`RegistrationForm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum FormField {
    NameEnglish,
    Gender,
    MobileNumber,
    Email,
    BloodGroup,
    TShirtSize,
    PresentAddress,
    PermanentAddress,
    SscBatch,
    SscDepartment,
    HscBatch,
    HscDepartment,
    Occupation,
    Organization,
    JobPosition,
    Remarks,
}

impl FormField {
    /// Every field in form order.
    pub const ALL: [FormField; 16] = [
        Self::NameEnglish,
        Self::Gender,
        Self::MobileNumber,
        Self::Email,
        Self::BloodGroup,
        Self::TShirtSize,
        Self::PresentAddress,
        Self::PermanentAddress,
        Self::SscBatch,
        Self::SscDepartment,
        Self::HscBatch,
        Self::HscDepartment,
        Self::Occupation,
        Self::Organization,
        Self::JobPosition,
        Self::Remarks,
    ];

    /// Serialized (storage) name of the field.
    pub const fn key(self) -> &'static str {
        match self {
            Self::NameEnglish => "nameEnglish",
            Self::Gender => "gender",
            Self::MobileNumber => "mobileNumber",
            Self::Email => "email",
            Self::BloodGroup => "bloodGroup",
            Self::TShirtSize => "tShirtSize",
            Self::PresentAddress => "presentAddress",
            Self::PermanentAddress => "permanentAddress",
            Self::SscBatch => "sscBatch",
            Self::SscDepartment => "sscDepartment",
            Self::HscBatch => "hscBatch",
            Self::HscDepartment => "hscDepartment",
            Self::Occupation => "occupation",
            Self::Organization => "organization",
            Self::JobPosition => "jobPosition",
            Self::Remarks => "remarks",
        }
    }

    /// Looks a field up by its serialized name.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

impl RegistrationForm {
    /// Returns the value of `field`.
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::NameEnglish => &self.name_english,
            FormField::Gender => &self.gender,
            FormField::MobileNumber => &self.mobile_number,
            FormField::Email => &self.email,
            FormField::BloodGroup => &self.blood_group,
            FormField::TShirtSize => &self.t_shirt_size,
            FormField::PresentAddress => &self.present_address,
            FormField::PermanentAddress => &self.permanent_address,
            FormField::SscBatch => &self.ssc_batch,
            FormField::SscDepartment => &self.ssc_department,
            FormField::HscBatch => &self.hsc_batch,
            FormField::HscDepartment => &self.hsc_department,
            FormField::Occupation => &self.occupation,
            FormField::Organization => &self.organization,
            FormField::JobPosition => &self.job_position,
            FormField::Remarks => &self.remarks,
        }
    }

    /// Replaces the value of `field`.
    pub fn set(&mut self, field: FormField, value: String) {
        let slot = match field {
            FormField::NameEnglish => &mut self.name_english,
            FormField::Gender => &mut self.gender,
            FormField::MobileNumber => &mut self.mobile_number,
            FormField::Email => &mut self.email,
            FormField::BloodGroup => &mut self.blood_group,
            FormField::TShirtSize => &mut self.t_shirt_size,
            FormField::PresentAddress => &mut self.present_address,
            FormField::PermanentAddress => &mut self.permanent_address,
            FormField::SscBatch => &mut self.ssc_batch,
            FormField::SscDepartment => &mut self.ssc_department,
            FormField::HscBatch => &mut self.hsc_batch,
            FormField::HscDepartment => &mut self.hsc_department,
            FormField::Occupation => &mut self.occupation,
            FormField::Organization => &mut self.organization,
            FormField::JobPosition => &mut self.job_position,
            FormField::Remarks => &mut self.remarks,
        };
        *slot = value;
    }
}

/// A uniquely identified entry of a user-editable list.
pub trait DraftListItem: Clone + Serialize + DeserializeOwned + 'static {
    /// Editable field selector.
    type Field: Copy;

    /// Stable identifier assigned at creation.
    fn id(&self) -> &str;

    /// A new entry with the given id and empty fields.
    fn blank(id: String) -> Self;

    /// A copy with `field` replaced by `value`; the id is carried over unchanged.
    fn with_field(&self, field: Self::Field, value: String) -> Self;

    /// Values that must be non-blank for the entry to be submitted.
    fn required_values(&self) -> Vec<&str>;

    /// Returns whether every required value is non-blank after trimming.
    fn is_complete(&self) -> bool {
        self.required_values()
            .iter()
            .all(|value| !value.trim().is_empty())
    }
}

/// Returns the entries fit for review and submission, in list order.
///
/// Incomplete entries stay in the draft so the user can keep editing them.
pub fn valid_items<T: DraftListItem>(items: &[T]) -> Vec<T> {
    items
        .iter()
        .filter(|item| item.is_complete())
        .cloned()
        .collect()
}

/// A guest attending with the registrant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Guest {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub relation: String,
}

/// Editable [`Guest`] field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum GuestField {
    Name,
    Age,
    Relation,
}

impl DraftListItem for Guest {
    type Field = GuestField;

    fn id(&self) -> &str {
        &self.id
    }

    fn blank(id: String) -> Self {
        Self {
            id,
            name: String::new(),
            age: String::new(),
            relation: String::new(),
        }
    }

    fn with_field(&self, field: GuestField, value: String) -> Self {
        let mut next = self.clone();
        match field {
            GuestField::Name => next.name = value,
            GuestField::Age => next.age = value,
            GuestField::Relation => next.relation = value,
        }
        next
    }

    fn required_values(&self) -> Vec<&str> {
        vec![&self.name, &self.age, &self.relation]
    }
}

/// A child attending with the registrant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Child {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: String,
}

/// Editable [`Child`] field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ChildField {
    Name,
    Age,
}

impl DraftListItem for Child {
    type Field = ChildField;

    fn id(&self) -> &str {
        &self.id
    }

    fn blank(id: String) -> Self {
        Self {
            id,
            name: String::new(),
            age: String::new(),
        }
    }

    fn with_field(&self, field: ChildField, value: String) -> Self {
        let mut next = self.clone();
        match field {
            ChildField::Name => next.name = value,
            ChildField::Age => next.age = value,
        }
        next
    }

    fn required_values(&self) -> Vec<&str> {
        vec![&self.name, &self.age]
    }
}
