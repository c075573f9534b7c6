//! Input schemas for every form the app accepts.
//!
//! Leaf fragments derive `validator::Validate`; composite forms embed their
//! fragments with `#[serde(flatten)]` and implement [`Form`] by validating
//! each fragment and list, collecting everything into one [`FieldErrors`].
//! Field paths use the wire (camelCase) names, e.g. `education[1].startDate`.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

pub mod contact;
pub mod education;
pub mod experience;
pub mod resume;
pub mod skills;

/// A submitted payload that can be checked before it reaches persistence.
pub trait Form {
    fn check(&self) -> Result<(), FieldErrors>;
}

/// Per-field validation failures, keyed by field path.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.entry(path.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.0.get(path).map(Vec::as_slice)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Folds `validator` output in under `prefix`.
    pub fn absorb(&mut self, prefix: &str, errors: &ValidationErrors) {
        for (field, kind) in errors.errors() {
            let path = join_path(prefix, &camel_case(field));
            match kind {
                ValidationErrorsKind::Field(list) => {
                    for error in list {
                        self.add(path.clone(), describe(error));
                    }
                }
                ValidationErrorsKind::Struct(inner) => self.absorb(&path, inner),
                ValidationErrorsKind::List(items) => {
                    for (index, inner) in items {
                        self.absorb(&format!("{path}[{index}]"), inner);
                    }
                }
                #[allow(unreachable_patterns)]
                _ => {}
            }
        }
    }

    /// Validates a single fragment, recording failures under `prefix`.
    pub fn check_fragment<T: Validate>(&mut self, prefix: &str, fragment: &T) {
        if let Err(errors) = fragment.validate() {
            self.absorb(prefix, &errors);
        }
    }

    /// Cardinality bound on a list plus validation of each entry.
    pub fn check_list<T: Validate>(&mut self, path: &str, entries: &[T], min: usize, max: usize) {
        self.check_count(path, entries.len(), min, max);
        for (index, entry) in entries.iter().enumerate() {
            self.check_fragment(&format!("{path}[{index}]"), entry);
        }
    }

    pub fn check_count(&mut self, path: &str, len: usize, min: usize, max: usize) {
        if len < min {
            self.add(path, format!("Must contain at least {min} {}", plural(min)));
        } else if len > max {
            self.add(path, format!("Must contain at most {max} {}", plural(max)));
        }
    }

    /// Pulls another error set in under `prefix`.
    pub fn merge(&mut self, prefix: &str, other: FieldErrors) {
        for (path, messages) in other.0 {
            let path = join_path(prefix, &path);
            self.0.entry(path).or_default().extend(messages);
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (path, messages) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{path}: {}", messages.join(", "))?;
        }
        Ok(())
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        out.absorb("", &errors);
        out
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        "entry"
    } else {
        "entries"
    }
}

fn join_path(prefix: &str, field: &str) -> String {
    match (prefix.is_empty(), field.is_empty()) {
        (true, _) => field.to_string(),
        (_, true) => prefix.to_string(),
        _ if field.starts_with('[') => format!("{prefix}{field}"),
        _ => format!("{prefix}.{field}"),
    }
}

/// `start_date` -> `startDate`, matching the serde wire names.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    let param = |key: &str| error.params.get(key).and_then(|v| v.as_u64());
    match error.code.as_ref() {
        "length" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("Must be between {min} and {max} characters"),
            (Some(min), None) => format!("Must be at least {min} characters"),
            (None, Some(max)) => format!("Must be less than {max} characters"),
            _ => "Invalid length".to_string(),
        },
        "email" => "Must be a valid email address".to_string(),
        code => format!("Invalid value ({code})"),
    }
}

/// Rejects strings that are present but blank.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("Must not be blank".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Leaf {
        #[validate(length(min = 3, max = 5))]
        start_date: String,
        #[validate(length(min = 1, message = "Required"))]
        name: String,
    }

    #[test]
    fn test_absorb_uses_camel_case_paths() {
        let leaf = Leaf {
            start_date: "x".into(),
            name: "ok".into(),
        };
        let errors = FieldErrors::from(leaf.validate().unwrap_err());
        assert_eq!(
            errors.get("startDate"),
            Some(&["Must be between 3 and 5 characters".to_string()][..])
        );
        assert!(!errors.contains("name"));
    }

    #[test]
    fn test_check_list_indexes_entries() {
        let entries = vec![
            Leaf {
                start_date: "2020".into(),
                name: "ok".into(),
            },
            Leaf {
                start_date: "2020".into(),
                name: String::new(),
            },
        ];
        let mut errors = FieldErrors::new();
        errors.check_list("education", &entries, 1, 4);
        assert_eq!(errors.paths().collect::<Vec<_>>(), vec!["education[1].name"]);
        assert_eq!(errors.get("education[1].name"), Some(&["Required".to_string()][..]));
    }

    #[test]
    fn test_check_count_bounds() {
        let mut errors = FieldErrors::new();
        errors.check_count("skills", 0, 1, 4);
        errors.check_count("education", 5, 1, 4);
        errors.check_count("experience", 3, 1, 5);
        assert_eq!(
            errors.get("skills"),
            Some(&["Must contain at least 1 entry".to_string()][..])
        );
        assert_eq!(
            errors.get("education"),
            Some(&["Must contain at most 4 entries".to_string()][..])
        );
        assert!(!errors.contains("experience"));
    }

    #[test]
    fn test_merge_prefixes_paths() {
        let mut inner = FieldErrors::new();
        inner.add("name", "Required");
        let mut outer = FieldErrors::new();
        outer.merge("education[0]", inner);
        assert!(outer.contains("education[0].name"));
        assert_eq!(outer.to_string(), "education[0].name: Required");
    }

    #[test]
    fn test_into_result() {
        assert!(FieldErrors::new().into_result().is_ok());
        let mut errors = FieldErrors::new();
        errors.add("location", "Must be at least 3 characters");
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("  ").is_err());
        assert!(not_blank("Acme").is_ok());
    }
}
