//! Person declarations and the contributor role vocabulary

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::MetadataError;

/// The closed vocabulary of 3-letter contributor role codes
/// (OPF 2.0 contributor role set).
const ROLE_CODES: [&str; 29] = [
    "adp", "ann", "aqt", "aft", "arr", "art", "asn", "aui", "ant", "aut", "bkp", "clb", "cmm",
    "dsr", "edt", "ill", "lyr", "mdc", "mus", "nrt", "oth", "pht", "prt", "red", "rev", "spn",
    "ths", "trc", "trl",
];

/// A contributor role, guaranteed to be one of the known 3-letter codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Role(#[serde(skip)] &'static str);

impl Role {
    /// The default role, `aut` (author)
    pub const AUTHOR: Role = Role("aut");

    /// The illustrator role, `ill`
    pub const ILLUSTRATOR: Role = Role("ill");

    /// Look up a role by code, case-insensitively
    pub fn from_code(code: &str) -> Option<Role> {
        let folded = code.trim().to_ascii_lowercase();
        ROLE_CODES.iter().find(|c| **c == folded).map(|c| Role(c))
    }

    /// The canonical lowercase 3-letter code
    pub fn code(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> String {
        role.0.to_string()
    }
}

impl TryFrom<String> for Role {
    type Error = MetadataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Role::from_code(&value).ok_or(MetadataError::UnknownRole(value))
    }
}

/// One person credited on a manuscript: role, display name, and sort name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub role: Role,
    pub name: String,
    pub sort_name: String,
}

impl Person {
    /// Create a person, rejecting names containing line breaks
    pub fn new(
        role: Role,
        name: impl Into<String>,
        sort_name: impl Into<String>,
    ) -> Result<Self, MetadataError> {
        let name = name.into();
        let sort_name = sort_name.into();
        if has_line_break(&name) || has_line_break(&sort_name) {
            return Err(MetadataError::NameLineBreak);
        }
        Ok(Self {
            role,
            name,
            sort_name,
        })
    }

    /// Parse the composite header form `role; name; sort-name`.
    ///
    /// A value with no `;` separator is shorthand for an author whose
    /// display and sort names are both the whole value. Any separator
    /// count other than zero or two is malformed.
    pub fn parse(raw: &str) -> Result<Self, MetadataError> {
        let fields: Vec<&str> = raw.split(';').map(str::trim).collect();
        match fields.len() {
            1 => Person::new(Role::AUTHOR, fields[0], fields[0]),
            3 => {
                let role = Role::from_code(fields[0])
                    .ok_or_else(|| MetadataError::UnknownRole(fields[0].to_string()))?;
                Person::new(role, fields[1], fields[2])
            }
            _ => Err(MetadataError::MalformedPerson {
                value: raw.to_string(),
            }),
        }
    }

    /// Whether this person can be written back as a bare name
    /// (author role, identical display and sort names)
    pub fn is_bare_author(&self) -> bool {
        self.role == Role::AUTHOR && self.name == self.sort_name
    }
}

fn has_line_break(s: &str) -> bool {
    s.contains('\r') || s.contains('\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_lookup_case_folds() {
        assert_eq!(Role::from_code("AUT"), Some(Role::AUTHOR));
        assert_eq!(Role::from_code("Ill"), Some(Role::ILLUSTRATOR));
        assert_eq!(Role::from_code("xyz"), None);
    }

    #[test]
    fn test_parse_bare_name() {
        let person = Person::parse("Jim Smith").unwrap();
        assert_eq!(person.role, Role::AUTHOR);
        assert_eq!(person.name, "Jim Smith");
        assert_eq!(person.sort_name, "Jim Smith");
        assert!(person.is_bare_author());
    }

    #[test]
    fn test_parse_composite() {
        let person = Person::parse("ill; Jim Smith; Smith, Jim").unwrap();
        assert_eq!(person.role, Role::ILLUSTRATOR);
        assert_eq!(person.name, "Jim Smith");
        assert_eq!(person.sort_name, "Smith, Jim");
    }

    #[test]
    fn test_parse_wrong_separator_count() {
        let err = Person::parse("bad;only;two;fields").unwrap_err();
        assert!(matches!(err, MetadataError::MalformedPerson { .. }));

        let err = Person::parse("aut; lonely").unwrap_err();
        assert!(matches!(err, MetadataError::MalformedPerson { .. }));
    }

    #[test]
    fn test_parse_unknown_role() {
        let err = Person::parse("xyz; A; B").unwrap_err();
        assert!(matches!(err, MetadataError::UnknownRole(_)));
    }

    #[test]
    fn test_line_break_rejected() {
        let err = Person::new(Role::AUTHOR, "Jim\nSmith", "Smith, Jim").unwrap_err();
        assert!(matches!(err, MetadataError::NameLineBreak));
    }
}
