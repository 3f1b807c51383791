use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FormError;

/// The nine editable profile fields, addressed by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Username,
    FirstName,
    LastName,
    Email,
    IsDriver,
    PhoneNumber,
    NidPassport,
    Address,
    Password,
}

impl FieldKey {
    /// Wire name of the field, as the remote API expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Username => "username",
            FieldKey::FirstName => "first_name",
            FieldKey::LastName => "last_name",
            FieldKey::Email => "email",
            FieldKey::IsDriver => "is_driver",
            FieldKey::PhoneNumber => "phone_number",
            FieldKey::NidPassport => "nid_passport",
            FieldKey::Address => "address",
            FieldKey::Password => "password",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a field is captured and rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Secret,
    Flag,
}

/// A value for a single form field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

/// One form input: which field it edits, its label, and how it is rendered.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub key: FieldKey,
    pub label: &'static str,
    pub kind: FieldKind,
}

/// Ordered descriptor list a view iterates to build the form, top to bottom.
pub const FIELDS: [FieldDescriptor; 9] = [
    FieldDescriptor { key: FieldKey::Username, label: "username", kind: FieldKind::Text },
    FieldDescriptor { key: FieldKey::FirstName, label: "first name", kind: FieldKind::Text },
    FieldDescriptor { key: FieldKey::LastName, label: "last name", kind: FieldKind::Text },
    FieldDescriptor { key: FieldKey::Email, label: "email", kind: FieldKind::Text },
    FieldDescriptor { key: FieldKey::IsDriver, label: "Driver?", kind: FieldKind::Flag },
    FieldDescriptor { key: FieldKey::PhoneNumber, label: "phone number", kind: FieldKind::Text },
    FieldDescriptor { key: FieldKey::NidPassport, label: "nid passport", kind: FieldKind::Text },
    FieldDescriptor { key: FieldKey::Address, label: "address", kind: FieldKind::Text },
    FieldDescriptor { key: FieldKey::Password, label: "password", kind: FieldKind::Secret },
];

/// The in-progress, editable copy of a user profile during a single form
/// session.
///
/// Serializes to the nine-field JSON body the create endpoint expects.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserProfileForm {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_driver: bool,
    pub phone_number: String,
    pub nid_passport: String,
    pub address: String,
    pub password: String,
}

impl UserProfileForm {
    /// Read the current value of a field.
    #[allow(dead_code)]
    pub fn field(&self, key: FieldKey) -> FieldValue {
        match key {
            FieldKey::Username => FieldValue::Text(self.username.clone()),
            FieldKey::FirstName => FieldValue::Text(self.first_name.clone()),
            FieldKey::LastName => FieldValue::Text(self.last_name.clone()),
            FieldKey::Email => FieldValue::Text(self.email.clone()),
            FieldKey::IsDriver => FieldValue::Flag(self.is_driver),
            FieldKey::PhoneNumber => FieldValue::Text(self.phone_number.clone()),
            FieldKey::NidPassport => FieldValue::Text(self.nid_passport.clone()),
            FieldKey::Address => FieldValue::Text(self.address.clone()),
            FieldKey::Password => FieldValue::Text(self.password.clone()),
        }
    }

    /// Replace one field and leave the rest untouched. Returns a fresh
    /// snapshot rather than mutating in place, so the view layer re-renders
    /// from a whole new value on every edit.
    ///
    /// No validation happens here; empty or nonsense strings are accepted
    /// as-is. Only the value kind is checked: `is_driver` takes a flag,
    /// everything else takes text.
    pub fn with_field(&self, key: FieldKey, value: FieldValue) -> Result<Self, FormError> {
        let mut next = self.clone();
        match (key, value) {
            (FieldKey::Username, FieldValue::Text(v)) => next.username = v,
            (FieldKey::FirstName, FieldValue::Text(v)) => next.first_name = v,
            (FieldKey::LastName, FieldValue::Text(v)) => next.last_name = v,
            (FieldKey::Email, FieldValue::Text(v)) => next.email = v,
            (FieldKey::IsDriver, FieldValue::Flag(v)) => next.is_driver = v,
            (FieldKey::PhoneNumber, FieldValue::Text(v)) => next.phone_number = v,
            (FieldKey::NidPassport, FieldValue::Text(v)) => next.nid_passport = v,
            (FieldKey::Address, FieldValue::Text(v)) => next.address = v,
            (FieldKey::Password, FieldValue::Text(v)) => next.password = v,
            (FieldKey::IsDriver, FieldValue::Text(_)) => return Err(FormError::ExpectedFlag(key)),
            (_, FieldValue::Flag(_)) => return Err(FormError::ExpectedText(key)),
        }
        Ok(next)
    }

    /// Seed a form from a stored user record. The stored record never carries
    /// a usable password, so `password` starts empty.
    pub fn from_persisted(user: &PersistedUser) -> Self {
        Self {
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            is_driver: user.is_driver,
            phone_number: user.phone_number.clone(),
            nid_passport: user.nid_passport.clone(),
            address: user.address.clone(),
            password: String::new(),
        }
    }
}

/// A user record retained by the client after sign-in, used to prefill the
/// update form. The sign-in flow owns and writes it; this crate only reads.
///
/// `id` is required. The profile fields default when missing, so a partial
/// record still prefills whatever it has.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedUser {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_driver: bool,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub nid_passport: String,
    #[serde(default)]
    pub address: String,
}
