use serde_json::{Number, Value};
use std::fmt;

use super::client::Data;
use super::data::ResourceData;
use super::schema::{Attribute, AttributeType, ElementType, ResourceSchema};

/// A value did not have the attribute's declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    pub attribute: String,
    pub expected: AttributeType,
    pub found: String,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "attribute '{}' expected {}, found {}",
            self.attribute, self.expected, self.found
        )
    }
}

impl std::error::Error for DecodeError {}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Check `value` against `attribute`'s type and normalize it.
///
/// Integers are accepted as JSON numbers or numeric strings, which Vault
/// returns interchangeably; both come back as JSON numbers. `null` passes
/// through for every type.
///
/// # Errors
///
/// Returns a [`DecodeError`] naming the attribute on any mismatch.
pub fn decode_attribute(attribute: &Attribute, value: &Value) -> Result<Value, DecodeError> {
    let mismatch = |found: String| DecodeError {
        attribute: attribute.name.clone(),
        expected: attribute.ty,
        found,
    };

    match (attribute.ty, value) {
        (_, Value::Null) => Ok(Value::Null),
        (AttributeType::String, Value::String(_)) => Ok(value.clone()),
        (AttributeType::Bool, Value::Bool(_)) => Ok(value.clone()),
        (AttributeType::Int, Value::Number(n)) => n
            .as_i64()
            .map(|i| Value::Number(i.into()))
            .ok_or_else(|| mismatch(format!("non-integer number {n}"))),
        (AttributeType::Int, Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(|i| Value::Number(Number::from(i)))
            .map_err(|_| mismatch(format!("string '{s}'"))),
        (AttributeType::List(element), Value::Array(items)) => {
            for item in items {
                let ok = match element {
                    ElementType::String => item.is_string(),
                    ElementType::Object => item.is_object(),
                };
                if !ok {
                    return Err(mismatch(format!("array containing {}", json_kind(item))));
                }
            }
            Ok(value.clone())
        }
        _ => Err(mismatch(json_kind(value).to_string())),
    }
}

/// Decode every non-path attribute present in a Vault response.
///
/// Attributes the response does not mention are left out of the result.
pub fn decode_response(
    schema: &ResourceSchema,
    response: &Data,
) -> Result<Vec<(String, Value)>, DecodeError> {
    schema
        .attributes
        .iter()
        .filter(|a| !a.in_path)
        .filter_map(|a| response.get(&a.name).map(|v| (a, v)))
        .map(|(a, v)| decode_attribute(a, v).map(|value| (a.name.clone(), value)))
        .collect()
}

/// Build the request body from the input attributes configured in `data`.
///
/// Values are type-checked on the way out so a misconfigured attribute
/// fails before any request is sent.
pub fn encode_body(schema: &ResourceSchema, data: &ResourceData) -> Result<Data, DecodeError> {
    let mut body = Data::new();
    for attribute in schema.attributes.iter().filter(|a| a.is_input()) {
        if let Some(value) = data.get(&attribute.name) {
            body.insert(attribute.name.clone(), decode_attribute(attribute, value)?);
        }
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attr(ty: AttributeType) -> Attribute {
        Attribute::new("field", ty)
    }

    #[test]
    fn test_scalars() {
        assert_eq!(
            decode_attribute(&attr(AttributeType::String), &json!("x")).unwrap(),
            json!("x")
        );
        assert_eq!(
            decode_attribute(&attr(AttributeType::Bool), &json!(true)).unwrap(),
            json!(true)
        );
        assert_eq!(
            decode_attribute(&attr(AttributeType::Int), &json!(42)).unwrap(),
            json!(42)
        );
        assert_eq!(
            decode_attribute(&attr(AttributeType::Int), &json!("42")).unwrap(),
            json!(42)
        );
        assert_eq!(
            decode_attribute(&attr(AttributeType::String), &Value::Null).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_mismatches_name_attribute() {
        let err = decode_attribute(&attr(AttributeType::String), &json!(1)).unwrap_err();
        assert_eq!(err.attribute, "field");
        assert_eq!(err.found, "number");
        assert_eq!(err.to_string(), "attribute 'field' expected string, found number");

        assert!(decode_attribute(&attr(AttributeType::Int), &json!(1.5)).is_err());
        assert!(decode_attribute(&attr(AttributeType::Int), &json!("ten")).is_err());
        assert!(decode_attribute(&attr(AttributeType::Bool), &json!("true")).is_err());
    }

    #[test]
    fn test_lists() {
        let strings = attr(AttributeType::List(ElementType::String));
        assert!(decode_attribute(&strings, &json!(["a", "b"])).is_ok());
        let err = decode_attribute(&strings, &json!(["a", 1])).unwrap_err();
        assert_eq!(err.found, "array containing number");

        let objects = attr(AttributeType::List(ElementType::Object));
        assert!(decode_attribute(&objects, &json!([{"value": "x"}])).is_ok());
        assert!(decode_attribute(&objects, &json!(["x"])).is_err());
        assert!(decode_attribute(&objects, &json!({"value": "x"})).is_err());
    }

    #[test]
    fn test_encode_body_skips_path_and_computed() {
        let schema = ResourceSchema::resource("/transform/role/{name}")
            .with_attribute(Attribute::mount())
            .with_attribute(Attribute::new("name", AttributeType::String).required().in_path())
            .with_attribute(Attribute::new(
                "transformations",
                AttributeType::List(ElementType::String),
            ))
            .with_attribute(Attribute::new("encoded_value", AttributeType::String).computed());
        let data = ResourceData::new()
            .with("path", "tf")
            .with("name", "r1")
            .with("transformations", json!(["ccn"]))
            .with("encoded_value", "stale");
        let body = encode_body(&schema, &data).unwrap();
        assert_eq!(body.len(), 1);
        assert_eq!(body["transformations"], json!(["ccn"]));
    }
}
