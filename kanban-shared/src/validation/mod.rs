/// Request validation
///
/// Write requests are plain serde structs annotated with `validator` rules
/// (see [`requests`]). Text fields are trimmed while deserializing, so every
/// rule sees the trimmed value and the trimmed value is what gets stored.
///
/// [`from_json`] is the entry point for request bodies. It first checks the
/// JSON type of every known field ([`FieldTypes`]), drops the mistyped ones,
/// then deserializes and runs [`check`]. Type and rule violations come back
/// together; nothing stops at the first failure. Nested arrays (`columns[]`,
/// `subtasks[]`) are checked with the same rules as their standalone
/// counterparts and their failures are reported under indexed paths such as
/// `columns[1].name`.
///
/// Nothing here knows about HTTP; the API crate maps the violations to a
/// 400 response.
///
/// # Example
///
/// ```
/// use kanban_shared::validation::{from_json, requests::CreateColumnRequest};
/// use serde_json::json;
///
/// let body = json!({ "name": "", "boardId": "nope", "order": "abc" });
/// let violations = from_json::<CreateColumnRequest>(body).unwrap_err();
///
/// let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
/// assert_eq!(fields, vec!["boardId", "name", "order"]);
/// ```

pub mod requests;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{borrow::Cow, cmp::Ordering};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

/// One failed rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// camelCase path of the offending field, e.g. `columns[0].color`
    pub field: String,

    /// Human-readable message
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// JSON type a body field must have when present
#[derive(Debug, Clone, Copy)]
pub enum Kind {
    Text,
    /// Whole number that fits in an `i32`
    Integer,
    Boolean,
    /// Array of objects, each with its own field types
    List(&'static [FieldType]),
}

/// Expected type of one body field
#[derive(Debug, Clone, Copy)]
pub struct FieldType {
    /// camelCase key in the JSON body
    pub name: &'static str,
    pub kind: Kind,
    /// Reported when the value has another type
    pub message: &'static str,
}

impl FieldType {
    pub const fn new(name: &'static str, kind: Kind, message: &'static str) -> Self {
        Self {
            name,
            kind,
            message,
        }
    }
}

/// Request bodies whose field types are checked before deserializing
pub trait FieldTypes {
    const FIELD_TYPES: &'static [FieldType];
}

/// Builds a request from a JSON body, reporting every type and rule
/// violation at once
///
/// `null` counts as absent. A body that is not a JSON object is reported
/// under `body`.
pub fn from_json<T>(body: Value) -> Result<T, Vec<FieldViolation>>
where
    T: DeserializeOwned + Validate + FieldTypes,
{
    let Value::Object(mut fields) = body else {
        return Err(vec![FieldViolation::new(
            "body",
            "Request body must be a JSON object",
        )]);
    };

    let mut violations = Vec::new();
    check_types("", &mut fields, T::FIELD_TYPES, &mut violations);
    let mistyped: Vec<String> = violations.iter().map(|v| v.field.clone()).collect();

    match serde_json::from_value::<T>(Value::Object(fields)) {
        Ok(request) => {
            if let Err(rule_violations) = check(&request) {
                violations.extend(
                    rule_violations
                        .into_iter()
                        .filter(|v| !mistyped.iter().any(|path| within(&v.field, path))),
                );
            }
            if violations.is_empty() {
                return Ok(request);
            }
        }
        Err(err) => violations.push(FieldViolation::new("body", err.to_string())),
    }

    sort_violations(&mut violations);
    Err(violations)
}

/// Runs every rule on `request`, collecting all violations ordered by field
pub fn check<T: Validate>(request: &T) -> Result<(), Vec<FieldViolation>> {
    request.validate().map_err(|errors| flatten(&errors))
}

/// Parses an identifier taken from a URL path
pub fn parse_id(raw: &str) -> Result<Uuid, Vec<FieldViolation>> {
    parse_hyphenated(raw).ok_or_else(|| vec![FieldViolation::new("id", "Invalid ID")])
}

/// Parses only the canonical `8-4-4-4-12` form
pub fn parse_hyphenated(raw: &str) -> Option<Uuid> {
    let bytes = raw.as_bytes();
    let canonical = bytes.len() == 36 && [8, 13, 18, 23].iter().all(|&i| bytes[i] == b'-');

    if !canonical {
        return None;
    }
    Uuid::parse_str(raw).ok()
}

fn check_types(
    prefix: &str,
    fields: &mut Map<String, Value>,
    types: &[FieldType],
    out: &mut Vec<FieldViolation>,
) {
    for field_type in types {
        let path = join(prefix, field_type.name);
        let keep = match fields.get_mut(field_type.name) {
            None => continue,
            Some(Value::Null) => false,
            Some(value) => has_kind(&path, value, field_type, out),
        };

        if !keep {
            fields.remove(field_type.name);
        }
    }
}

fn has_kind(
    path: &str,
    value: &mut Value,
    field_type: &FieldType,
    out: &mut Vec<FieldViolation>,
) -> bool {
    let matches = match field_type.kind {
        Kind::Text => value.is_string(),
        Kind::Integer => value.as_i64().and_then(|n| i32::try_from(n).ok()).is_some(),
        Kind::Boolean => value.is_boolean(),
        Kind::List(item_types) => match value.as_array_mut() {
            Some(items) => {
                for (index, item) in items.iter_mut().enumerate() {
                    let item_path = format!("{path}[{index}]");
                    match item.as_object_mut() {
                        Some(inner) => check_types(&item_path, inner, item_types, out),
                        None => {
                            out.push(FieldViolation::new(item_path, "Must be an object"));
                            *item = Value::Object(Map::new());
                        }
                    }
                }
                true
            }
            None => false,
        },
    };

    if !matches {
        out.push(FieldViolation::new(path, field_type.message));
    }
    matches
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

/// `field` is `path` itself or lies under it
fn within(field: &str, path: &str) -> bool {
    match field.strip_prefix(path) {
        Some(rest) => rest.is_empty() || rest.starts_with('.') || rest.starts_with('['),
        None => false,
    }
}

fn flatten(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    collect("", errors, &mut violations);
    sort_violations(&mut violations);
    violations
}

fn collect(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldViolation>) {
    for (field, kind) in errors.errors() {
        let path = join(prefix, &camel_case(field));

        match kind {
            ValidationErrorsKind::Field(failures) => {
                for failure in failures {
                    out.push(FieldViolation::new(path.clone(), message_for(failure)));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}

/// Path segment: a key, or an array index compared as a number
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Segment<'a> {
    Key(&'a str),
    Index(usize),
}

fn segments(field: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    for part in field.split('.') {
        let mut pieces = part.split('[');
        if let Some(key) = pieces.next() {
            out.push(Segment::Key(key));
        }
        for index in pieces {
            let digits = index.trim_end_matches(']');
            match digits.parse() {
                Ok(n) => out.push(Segment::Index(n)),
                Err(_) => out.push(Segment::Key(digits)),
            }
        }
    }
    out
}

fn sort_violations(violations: &mut [FieldViolation]) {
    violations.sort_by(|a, b| match segments(&a.field).cmp(&segments(&b.field)) {
        Ordering::Equal => a.message.cmp(&b.message),
        other => other,
    });
}

fn message_for(failure: &ValidationError) -> String {
    failure
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| format!("Invalid value ({})", failure.code))
}

/// `board_id` -> `boardId`
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

fn violation(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Non-empty text (values are already trimmed)
///
/// Callers pass the field's own message with `message = "..."`.
pub(crate) fn required(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(violation("required", "Field is required"));
    }
    Ok(())
}

/// `#RRGGBB`, case-insensitive
pub(crate) fn hex_color(value: &str) -> Result<(), ValidationError> {
    let valid = value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit());

    if !valid {
        return Err(violation("hex_color", "Color must be a valid hex color"));
    }
    Ok(())
}

fn id_text(
    value: &str,
    missing: &'static str,
    invalid: &'static str,
) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(violation("required", missing));
    }
    if parse_hyphenated(value).is_none() {
        return Err(violation("uuid", invalid));
    }
    Ok(())
}

/// `boardId` in a request body
pub(crate) fn board_id(value: &str) -> Result<(), ValidationError> {
    id_text(value, "Board ID is required", "Invalid board ID")
}

/// `columnId` in a request body
pub(crate) fn column_id(value: &str) -> Result<(), ValidationError> {
    id_text(value, "Column ID is required", "Invalid column ID")
}

/// Deserializers that trim text fields on the way in
pub(crate) mod trimmed {
    use serde::{Deserialize, Deserializer};

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(String::deserialize(deserializer)?.trim().to_string())
    }

    pub fn option<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.map(|s| s.trim().to_string()))
    }
}
