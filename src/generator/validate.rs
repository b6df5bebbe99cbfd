use std::fmt;

use super::params::{TemplatableEndpoint, TemplatableParam};
use crate::provider::{AttributeType, ElementType};

/// Why an endpoint cannot be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Declared type is not string, boolean, integer or array
    UnsupportedType {
        parameter: String,
        found: String,
    },
    /// Array element type is not string or object
    UnsupportedArrayItems {
        parameter: String,
        found: Option<String>,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnsupportedType { parameter, found } => {
                write!(
                    f,
                    "parameter '{}' has unsupported type '{}'",
                    parameter, found
                )
            }
            ValidationError::UnsupportedArrayItems { parameter, found } => {
                write!(
                    f,
                    "parameter '{}' is an array of unsupported element type '{}'",
                    parameter,
                    found.as_deref().unwrap_or("<none>")
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl TemplatableParam {
    /// Map the declared OpenAPI type onto a supported attribute type.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming this parameter when the type or
    /// array element type is outside the supported set.
    pub fn attribute_type(&self) -> Result<AttributeType, ValidationError> {
        match self.oa_type.as_str() {
            "string" => Ok(AttributeType::String),
            "boolean" => Ok(AttributeType::Bool),
            "integer" => Ok(AttributeType::Int),
            "array" => match self.items_type.as_deref() {
                Some("string") => Ok(AttributeType::List(ElementType::String)),
                Some("object") => Ok(AttributeType::List(ElementType::Object)),
                other => Err(ValidationError::UnsupportedArrayItems {
                    parameter: self.name.clone(),
                    found: other.map(str::to_string),
                }),
            },
            other => Err(ValidationError::UnsupportedType {
                parameter: self.name.clone(),
                found: other.to_string(),
            }),
        }
    }
}

impl TemplatableEndpoint {
    /// Check every parameter before rendering.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] in parameter order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for param in &self.params {
            param.attribute_type()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::params::ParamLocation;
    use crate::provider::ResourceKind;

    fn param(name: &str, oa_type: &str, items: Option<&str>) -> TemplatableParam {
        TemplatableParam {
            name: name.to_string(),
            description: String::new(),
            oa_type: oa_type.to_string(),
            items_type: items.map(str::to_string),
            location: ParamLocation::Body,
            required: false,
            computed: false,
            deprecated: false,
            sensitive: false,
        }
    }

    fn endpoint(params: Vec<TemplatableParam>) -> TemplatableEndpoint {
        TemplatableEndpoint {
            endpoint: "/transform/role/{name}".to_string(),
            kind: ResourceKind::Resource,
            description: String::new(),
            params,
        }
    }

    #[test]
    fn test_supported_types_validate() {
        let ep = endpoint(vec![
            param("a", "string", None),
            param("b", "boolean", None),
            param("c", "integer", None),
            param("d", "array", Some("string")),
            param("e", "array", Some("object")),
        ]);
        assert!(ep.validate().is_ok());
    }

    #[test]
    fn test_unsupported_type_names_parameter() {
        let ep = endpoint(vec![param("ok", "string", None), param("weird", "object", None)]);
        let err = ep.validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnsupportedType {
                parameter: "weird".to_string(),
                found: "object".to_string(),
            }
        );
        assert!(err.to_string().contains("weird"));
    }

    #[test]
    fn test_unsupported_array_items() {
        let ep = endpoint(vec![param("nums", "array", Some("integer"))]);
        let err = ep.validate().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::UnsupportedArrayItems { ref parameter, .. } if parameter == "nums"
        ));

        let ep = endpoint(vec![param("bare", "array", None)]);
        assert!(ep.validate().unwrap_err().to_string().contains("<none>"));
    }

    #[test]
    fn test_number_is_unsupported() {
        let ep = endpoint(vec![param("ttl", "number", None)]);
        assert!(ep.validate().is_err());
    }
}
