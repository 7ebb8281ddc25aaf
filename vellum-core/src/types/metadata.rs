//! Bibliographic metadata and its validating builder

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::{Person, PubDate, Role};
use crate::error::MetadataError;

/// How a metadata field's value is shaped and validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    /// Single free-text value
    Scalar,
    /// Single validated publication date
    Date,
    /// Repeatable person declaration
    Person,
    /// Repeatable postal address line
    Mailing,
}

/// The closed field registry: canonical name and kind, in declaration
/// order for STF output.
const FIELDS: [(&str, FieldKind); 12] = [
    ("title", FieldKind::Scalar),
    ("unique-url", FieldKind::Scalar),
    ("description", FieldKind::Scalar),
    ("publisher", FieldKind::Scalar),
    ("rights", FieldKind::Scalar),
    ("email", FieldKind::Scalar),
    ("website", FieldKind::Scalar),
    ("phone", FieldKind::Scalar),
    ("date", FieldKind::Date),
    ("creator", FieldKind::Person),
    ("contributor", FieldKind::Person),
    ("mailing", FieldKind::Mailing),
];

fn field_kind(name: &str) -> Option<FieldKind> {
    FIELDS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, kind)| *kind)
}

/// Validated manuscript metadata. Built once per codec session through
/// [`MetadataBuilder`] and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,
    pub unique_url: String,
    pub description: Option<String>,
    pub publisher: Option<String>,
    pub rights: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub date: Option<PubDate>,
    pub creator: Vec<Person>,
    pub contributor: Vec<Person>,
    pub mailing: Vec<String>,
}

impl Metadata {
    /// Create minimal metadata with the two required fields
    pub fn new(title: impl Into<String>, unique_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            unique_url: unique_url.into(),
            description: None,
            publisher: None,
            rights: None,
            email: None,
            website: None,
            phone: None,
            date: None,
            creator: Vec::new(),
            contributor: Vec::new(),
            mailing: Vec::new(),
        }
    }

    /// Add a creator
    pub fn with_creator(mut self, person: Person) -> Self {
        self.creator.push(person);
        self
    }

    /// Set the publication date
    pub fn with_date(mut self, date: PubDate) -> Self {
        self.date = Some(date);
        self
    }

    /// The field map written as the `meta` key of the container's
    /// metadata block. Person lists serialize as nested
    /// `[role, name, sort-name]` arrays, mailing as a string array.
    pub fn wire_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("title".into(), Value::String(self.title.clone()));
        map.insert("unique-url".into(), Value::String(self.unique_url.clone()));
        let scalars = [
            ("description", &self.description),
            ("publisher", &self.publisher),
            ("rights", &self.rights),
            ("email", &self.email),
            ("website", &self.website),
            ("phone", &self.phone),
        ];
        for (name, value) in scalars {
            if let Some(v) = value {
                map.insert(name.into(), Value::String(v.clone()));
            }
        }
        if let Some(date) = &self.date {
            map.insert("date".into(), Value::String(date.to_string()));
        }
        for (name, persons) in [("creator", &self.creator), ("contributor", &self.contributor)] {
            if !persons.is_empty() {
                let list: Vec<Value> = persons
                    .iter()
                    .map(|p| json!([p.role.code(), p.name, p.sort_name]))
                    .collect();
                map.insert(name.into(), Value::Array(list));
            }
        }
        if !self.mailing.is_empty() {
            let lines: Vec<Value> = self
                .mailing
                .iter()
                .map(|l| Value::String(l.clone()))
                .collect();
            map.insert("mailing".into(), Value::Array(lines));
        }
        map
    }
}

/// Accumulates validated field declarations and assembles a
/// [`Metadata`] once all of them are in.
///
/// Per-field validation runs at declaration time; the required-field
/// check runs exactly once, in [`finish`](Self::finish), independent of
/// declaration order.
#[derive(Debug, Default)]
pub struct MetadataBuilder {
    title: Option<String>,
    unique_url: Option<String>,
    description: Option<String>,
    publisher: Option<String>,
    rights: Option<String>,
    email: Option<String>,
    website: Option<String>,
    phone: Option<String>,
    date: Option<PubDate>,
    creator: Vec<Person>,
    contributor: Vec<Person>,
    mailing: Vec<String>,
}

impl MetadataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and record one raw field declaration, as read from an
    /// STF header. `name` is case-folded to the canonical registry name.
    /// Compound fields append; re-declaring any other field is an error.
    pub fn declare(&mut self, name: &str, raw: &str) -> Result<(), MetadataError> {
        let canonical = name.trim().to_ascii_lowercase();
        let kind = field_kind(&canonical)
            .ok_or_else(|| MetadataError::UnknownField(canonical.clone()))?;
        match kind {
            FieldKind::Scalar => {
                let value = nonempty(&canonical, raw)?;
                self.set_scalar(&canonical, value)
            }
            FieldKind::Date => {
                if self.date.is_some() {
                    return Err(MetadataError::DuplicateField(canonical));
                }
                self.date = Some(PubDate::parse(raw)?);
                Ok(())
            }
            FieldKind::Person => {
                let person = Person::parse(raw)?;
                self.push_person(&canonical, person);
                Ok(())
            }
            FieldKind::Mailing => {
                self.mailing.push(nonempty(&canonical, raw)?);
                Ok(())
            }
        }
    }

    /// Validate and record one field from a decoded metadata block.
    /// Scalar and date fields arrive as strings, person fields as
    /// arrays of `[role, name, sort-name]` triples, mailing as an
    /// array of strings.
    pub fn declare_json(&mut self, name: &str, value: &Value) -> Result<(), MetadataError> {
        let canonical = name.trim().to_ascii_lowercase();
        let kind = field_kind(&canonical)
            .ok_or_else(|| MetadataError::UnknownField(canonical.clone()))?;
        let wrong_shape = |reason: &'static str| MetadataError::InvalidFieldValue {
            field: canonical.clone(),
            reason,
        };
        match kind {
            FieldKind::Scalar | FieldKind::Date => {
                let raw = value.as_str().ok_or_else(|| wrong_shape("expected a string"))?;
                self.declare(&canonical, raw)
            }
            FieldKind::Person => {
                let list = value
                    .as_array()
                    .ok_or_else(|| wrong_shape("expected an array of person triples"))?;
                for entry in list {
                    let person = person_from_value(&canonical, entry)?;
                    self.push_person(&canonical, person);
                }
                Ok(())
            }
            FieldKind::Mailing => {
                let list = value
                    .as_array()
                    .ok_or_else(|| wrong_shape("expected an array of address lines"))?;
                for entry in list {
                    let line = entry
                        .as_str()
                        .ok_or_else(|| wrong_shape("expected an array of address lines"))?;
                    self.mailing.push(nonempty(&canonical, line)?);
                }
                Ok(())
            }
        }
    }

    /// Run the required-field check and assemble the metadata
    pub fn finish(self) -> Result<Metadata, MetadataError> {
        let title = self
            .title
            .ok_or(MetadataError::MissingRequiredField("title"))?;
        let unique_url = self
            .unique_url
            .ok_or(MetadataError::MissingRequiredField("unique-url"))?;
        Ok(Metadata {
            title,
            unique_url,
            description: self.description,
            publisher: self.publisher,
            rights: self.rights,
            email: self.email,
            website: self.website,
            phone: self.phone,
            date: self.date,
            creator: self.creator,
            contributor: self.contributor,
            mailing: self.mailing,
        })
    }

    fn set_scalar(&mut self, name: &str, value: String) -> Result<(), MetadataError> {
        let slot = match name {
            "title" => &mut self.title,
            "unique-url" => &mut self.unique_url,
            "description" => &mut self.description,
            "publisher" => &mut self.publisher,
            "rights" => &mut self.rights,
            "email" => &mut self.email,
            "website" => &mut self.website,
            "phone" => &mut self.phone,
            _ => unreachable!("scalar registry covers all scalar names"),
        };
        if slot.is_some() {
            return Err(MetadataError::DuplicateField(name.to_string()));
        }
        *slot = Some(value);
        Ok(())
    }

    fn push_person(&mut self, name: &str, person: Person) {
        match name {
            "creator" => self.creator.push(person),
            "contributor" => self.contributor.push(person),
            _ => unreachable!("person registry covers all person names"),
        }
    }
}

fn nonempty(name: &str, raw: &str) -> Result<String, MetadataError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(MetadataError::EmptyField(name.to_string()));
    }
    Ok(value.to_string())
}

fn person_from_value(field: &str, value: &Value) -> Result<Person, MetadataError> {
    let wrong_shape = || MetadataError::InvalidFieldValue {
        field: field.to_string(),
        reason: "person entries must be [role, name, sort-name] triples",
    };
    let triple = value.as_array().ok_or_else(wrong_shape)?;
    if triple.len() != 3 {
        return Err(wrong_shape());
    }
    let mut fields = triple.iter().map(|v| v.as_str());
    let role_code = fields.next().flatten().ok_or_else(wrong_shape)?;
    let name = fields.next().flatten().ok_or_else(wrong_shape)?;
    let sort_name = fields.next().flatten().ok_or_else(wrong_shape)?;
    let role = Role::from_code(role_code)
        .ok_or_else(|| MetadataError::UnknownRole(role_code.to_string()))?;
    Person::new(role, name, sort_name)
}
