//! Header role inference.
//!
//! Registry exports rename their columns freely (`vaidya_name`, `Doctor Name`,
//! `name`), so columns are assigned to roles by case-insensitive keyword
//! containment instead of by position.

use std::collections::BTreeMap;
use std::fmt;

use csv::StringRecord;

/// The meaning of one registry column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HeaderRole {
    Username,
    Secret,
    Identity,
    Symptoms,
    Name,
    Specialty,
    Description,
    Rating,
    Location,
}

/// Roles in inference precedence order with their keywords.
///
/// Credentials come first so `username` is never read as a name column.
const VOCABULARY: &[(HeaderRole, &[&str])] = &[
    (HeaderRole::Username, &["username", "user_name", "login"]),
    (HeaderRole::Secret, &["password", "secret"]),
    (HeaderRole::Symptoms, &["symptom", "condition"]),
    (HeaderRole::Name, &["name"]),
    (HeaderRole::Specialty, &["special", "panchakarma", "therapy"]),
    (HeaderRole::Description, &["desc", "about", "bio"]),
    (HeaderRole::Rating, &["rating", "score"]),
    (HeaderRole::Location, &["address", "location", "city"]),
];

impl HeaderRole {
    /// Infers the role of a header, if any.
    pub fn infer(header: &str) -> Option<Self> {
        let lower = header.trim().to_lowercase();
        if lower.is_empty() {
            return None;
        }
        // Checked ahead of the keyword table: "vaidya" contains "id".
        let (credentials, rest) = VOCABULARY.split_at(2);
        if let Some(role) = match_keywords(credentials, &lower) {
            return Some(role);
        }
        if is_identity(&lower) {
            return Some(Self::Identity);
        }
        match_keywords(rest, &lower)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Secret => "secret",
            Self::Identity => "identity",
            Self::Symptoms => "symptoms",
            Self::Name => "name",
            Self::Specialty => "specialty",
            Self::Description => "description",
            Self::Rating => "rating",
            Self::Location => "location",
        }
    }
}

impl fmt::Display for HeaderRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn match_keywords(table: &[(HeaderRole, &[&str])], lower: &str) -> Option<HeaderRole> {
    table
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(role, _)| *role)
}

fn is_identity(lower: &str) -> bool {
    lower == "id" || lower.ends_with("_id") || lower.ends_with(" id") || lower.ends_with("-id")
}

/// Column index for each role found in a header row.
///
/// When several columns claim the same role, the leftmost one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    columns: BTreeMap<HeaderRole, usize>,
}

impl HeaderMap {
    pub fn from_headers(headers: &StringRecord) -> Self {
        let mut columns = BTreeMap::new();
        for (index, header) in headers.iter().enumerate() {
            let header = header.trim_matches('\u{feff}');
            let Some(role) = HeaderRole::infer(header) else {
                tracing::trace!(header = %header, "ignoring unrecognized registry column");
                continue;
            };
            columns.entry(role).or_insert(index);
        }
        Self { columns }
    }

    pub fn index_of(&self, role: HeaderRole) -> Option<usize> {
        self.columns.get(&role).copied()
    }

    pub fn contains(&self, role: HeaderRole) -> bool {
        self.columns.contains_key(&role)
    }

    /// Value of `role` in a parsed row, or `""` when absent.
    pub fn field<'a>(&self, row: &'a StringRecord, role: HeaderRole) -> &'a str {
        self.index_of(role).and_then(|i| row.get(i)).unwrap_or("")
    }

    pub fn roles(&self) -> impl Iterator<Item = (HeaderRole, usize)> + '_ {
        self.columns.iter().map(|(role, index)| (*role, *index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_common_headers() {
        assert_eq!(HeaderRole::infer("vaidya_name"), Some(HeaderRole::Name));
        assert_eq!(HeaderRole::infer("Panchakarma"), Some(HeaderRole::Specialty));
        assert_eq!(HeaderRole::infer("Specialization"), Some(HeaderRole::Specialty));
        assert_eq!(HeaderRole::infer("symptoms"), Some(HeaderRole::Symptoms));
        assert_eq!(HeaderRole::infer("Conditions Treated"), Some(HeaderRole::Symptoms));
        assert_eq!(HeaderRole::infer("vaidya_description"), Some(HeaderRole::Description));
        assert_eq!(HeaderRole::infer("Rating"), Some(HeaderRole::Rating));
        assert_eq!(HeaderRole::infer("Clinic Address"), Some(HeaderRole::Location));
        assert_eq!(HeaderRole::infer("city"), Some(HeaderRole::Location));
    }

    #[test]
    fn credentials_are_not_names() {
        assert_eq!(HeaderRole::infer("username"), Some(HeaderRole::Username));
        assert_eq!(HeaderRole::infer("Password"), Some(HeaderRole::Secret));
    }

    #[test]
    fn identity_requires_a_word_boundary() {
        assert_eq!(HeaderRole::infer("id"), Some(HeaderRole::Identity));
        assert_eq!(HeaderRole::infer("vaidya_id"), Some(HeaderRole::Identity));
        assert_eq!(HeaderRole::infer("Vaidya ID"), Some(HeaderRole::Identity));
        // "vaidya" contains "id" but is not an id column
        assert_eq!(HeaderRole::infer("vaidya"), None);
    }

    #[test]
    fn unknown_and_blank_headers() {
        assert_eq!(HeaderRole::infer("email"), None);
        assert_eq!(HeaderRole::infer("   "), None);
    }

    #[test]
    fn leftmost_column_wins() {
        let headers = StringRecord::from(vec!["vaidya_name", "hospital_name", "specialization"]);
        let map = HeaderMap::from_headers(&headers);
        assert_eq!(map.index_of(HeaderRole::Name), Some(0));
        assert_eq!(map.index_of(HeaderRole::Specialty), Some(2));
        assert!(!map.contains(HeaderRole::Rating));
    }

    #[test]
    fn field_returns_empty_for_short_rows() {
        let map = HeaderMap::from_headers(&StringRecord::from(vec!["\u{feff}name", "rating"]));
        let row = StringRecord::from(vec!["Dr. Rao"]);
        assert_eq!(map.field(&row, HeaderRole::Name), "Dr. Rao");
        assert_eq!(map.field(&row, HeaderRole::Rating), "");
        assert_eq!(map.field(&row, HeaderRole::Location), "");
    }
}
