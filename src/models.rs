use serde::{
    Deserialize, Deserializer, Serialize,
    de::{DeserializeOwned, Error as _},
};
use serde_json::Value;

pub const DUPLICATE_MESSAGE: &str = "This movie is already in the database.";
pub const UNWATCHED_ADDED_MESSAGE: &str = "Unwatched movie added to the database.";
pub const WATCHED_ADDED_MESSAGE: &str = "Watched movie added to the database.";

/// A key that may be missing, explicitly null, or carry a value.
///
/// Pair with `#[serde(default)]` so a missing key lands on `Absent`.
#[derive(Clone, Debug, PartialEq)]
pub enum Field<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Field::Value(value),
            None => Field::Null,
        })
    }
}

/// Select references arrive from form dropdowns, which send `""` or `false`
/// when nothing is picked. Any falsy value is `Null`; only a truthy one has
/// to match the option shape.
fn select_field<'de, T, D>(deserializer: D) -> Result<Field<T>, D::Error>
where
    T: DeserializeOwned,
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_truthy() {
        return Ok(Field::Null);
    }
    serde_json::from_value(value).map(Field::Value).map_err(D::Error::custom)
}

/// Loose truthiness of a submitted value, as form clients send it.
pub trait Truthy {
    fn is_truthy(&self) -> bool;

    fn is_zero(&self) -> bool {
        false
    }
}

impl Truthy for Value {
    fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_none_or(|f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    fn is_zero(&self) -> bool {
        matches!(self, Value::Number(n) if n.as_f64() == Some(0.0))
    }
}

impl<T: Truthy> Field<T> {
    /// The value to forward, if any: included iff truthy or the number zero.
    pub fn included(&self) -> Option<&T> {
        match self {
            Field::Value(v) if v.is_truthy() || v.is_zero() => Some(v),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct NameRef {
    pub name: String,
}

impl Truthy for NameRef {
    fn is_truthy(&self) -> bool {
        true
    }
}

/// A select option referenced by id, by name, or both.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct OptionRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl Truthy for OptionRef {
    fn is_truthy(&self) -> bool {
        true
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieSubmission {
    pub title: String,
    pub genres: Vec<NameRef>,
    pub year: String,
    pub run_time: String,
    pub poster: String,
    #[serde(default)]
    pub rewatch: Option<bool>,
    #[serde(default)]
    pub rating: Option<OptionRef>,
    #[serde(default, deserialize_with = "select_field")]
    pub scare_factor: Field<OptionRef>,
    #[serde(default, deserialize_with = "select_field")]
    pub franchise: Field<NameRef>,
    #[serde(default)]
    pub chronological: Field<Value>,
    #[serde(default)]
    pub release: Field<Value>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeReason {
    Created,
    Duplicate,
    Failed,
}

/// Result of every write, sent back to the client as-is.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Outcome {
    pub result: bool,
    pub message: String,
    pub reason: OutcomeReason,
}

impl Outcome {
    pub fn created(message: &str) -> Self {
        Self { result: true, message: message.to_string(), reason: OutcomeReason::Created }
    }

    pub fn duplicate() -> Self {
        Self {
            result: false,
            message: DUPLICATE_MESSAGE.to_string(),
            reason: OutcomeReason::Duplicate,
        }
    }

    pub fn failed(err: impl std::fmt::Display) -> Self {
        Self {
            result: false,
            message: format!("The following error occured: {err}"),
            reason: OutcomeReason::Failed,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CatalogOption {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionCatalog {
    pub genres: Vec<CatalogOption>,
    pub ratings: Vec<CatalogOption>,
    pub scare_factors: Vec<CatalogOption>,
    pub franchises: Vec<CatalogOption>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::submission;

    #[test]
    fn missing_optional_keys_are_absent() {
        let s = submission(json!({}));
        assert_eq!(s.franchise, Field::Absent);
        assert_eq!(s.chronological, Field::Absent);
        assert_eq!(s.scare_factor, Field::Absent);
    }

    #[test]
    fn explicit_null_is_distinct_from_absent() {
        let s = submission(json!({ "franchise": null, "release": null }));
        assert_eq!(s.franchise, Field::Null);
        assert_eq!(s.release, Field::Null);
        assert_eq!(s.release.included(), None);
    }

    #[test]
    fn falsy_select_values_are_null() {
        for empty in [json!(""), json!(false), json!(0)] {
            let s = submission(json!({ "franchise": empty.clone(), "scareFactor": empty }));
            assert_eq!(s.franchise, Field::Null);
            assert_eq!(s.scare_factor, Field::Null);
        }
    }

    #[test]
    fn truthy_select_value_must_match_shape() {
        let body = crate::testing::submission_body(json!({ "franchise": "Alien" }));
        assert!(serde_json::from_value::<MovieSubmission>(body).is_err());
    }

    #[test]
    fn zero_is_included() {
        let s = submission(json!({ "chronological": 0 }));
        assert_eq!(s.chronological.included(), Some(&json!(0)));
    }

    #[test]
    fn inclusion_follows_truthy_or_zero() {
        let cases = [
            (json!(3), true),
            (json!(-1), true),
            (json!(0.0), true),
            (json!("0"), true),
            (json!(""), false),
            (json!(false), false),
            (json!(true), true),
        ];
        for (value, expected) in cases {
            let field = Field::Value(value.clone());
            assert_eq!(field.included().is_some(), expected, "value {value}");
        }
    }

    #[test]
    fn missing_required_field_fails() {
        let err = serde_json::from_value::<MovieSubmission>(json!({ "title": "Dune" }));
        assert!(err.is_err());
    }

    #[test]
    fn outcome_serializes_wire_shape() {
        let body = serde_json::to_value(Outcome::failed("rate limited")).unwrap();
        assert_eq!(
            body,
            json!({
                "result": false,
                "message": "The following error occured: rate limited",
                "reason": "failed",
            })
        );
    }

    #[test]
    fn catalog_uses_camel_case_keys() {
        let body = serde_json::to_value(OptionCatalog::default()).unwrap();
        assert!(body.get("scareFactors").is_some());
    }
}
