use serde::{Deserialize, Serialize};
use std::fmt;

use crate::path::{PathError, PathTemplate, MOUNT_PARAMETER};

/// Whether an endpoint is exposed as a managed resource or a read-only data
/// source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Resource,
    DataSource,
}

impl ResourceKind {
    /// Directory under `generated/` holding this kind's code.
    #[must_use]
    pub fn code_dir(&self) -> &'static str {
        match self {
            ResourceKind::Resource => "resources",
            ResourceKind::DataSource => "datasources",
        }
    }

    /// Directory under `website/docs/` holding this kind's docs.
    #[must_use]
    pub fn doc_dir(&self) -> &'static str {
        match self {
            ResourceKind::Resource => "r",
            ResourceKind::DataSource => "d",
        }
    }

    /// Suffix of the generated constructor function.
    #[must_use]
    pub fn fn_suffix(&self) -> &'static str {
        match self {
            ResourceKind::Resource => "resource",
            ResourceKind::DataSource => "data_source",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Resource => write!(f, "resource"),
            ResourceKind::DataSource => write!(f, "data source"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    String,
    Object,
}

/// Value type of a resource attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Bool,
    Int,
    List(ElementType),
}

impl AttributeType {
    /// Rust expression constructing this type, used by generated code.
    #[must_use]
    pub fn rust_expr(&self) -> &'static str {
        match self {
            AttributeType::String => "AttributeType::String",
            AttributeType::Bool => "AttributeType::Bool",
            AttributeType::Int => "AttributeType::Int",
            AttributeType::List(ElementType::String) => "AttributeType::List(ElementType::String)",
            AttributeType::List(ElementType::Object) => "AttributeType::List(ElementType::Object)",
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AttributeType::String => "string",
            AttributeType::Bool => "bool",
            AttributeType::Int => "number",
            AttributeType::List(ElementType::String) => "list of string",
            AttributeType::List(ElementType::Object) => "list of object",
        };
        f.write_str(s)
    }
}

/// One attribute of a resource or data source.
///
/// Built with the chained constructors below; generated code reads as
/// `Attribute::new("name", AttributeType::String).required().in_path()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub ty: AttributeType,
    pub description: String,
    pub required: bool,
    pub computed: bool,
    /// Changing the value replaces the resource instead of updating it
    pub force_new: bool,
    /// Sourced from the endpoint path rather than the request body
    pub in_path: bool,
    pub sensitive: bool,
    pub deprecated: bool,
}

impl Attribute {
    pub fn new(name: impl Into<String>, ty: AttributeType) -> Self {
        Self {
            name: name.into(),
            ty,
            description: String::new(),
            required: false,
            computed: false,
            force_new: false,
            in_path: false,
            sensitive: false,
            deprecated: false,
        }
    }

    /// The mount-path attribute every generated resource carries.
    pub fn mount() -> Self {
        Self::new(MOUNT_PARAMETER, AttributeType::String)
            .with_description("Path to where the back-end is mounted within Vault.")
            .required()
            .in_path()
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    #[must_use]
    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    /// Marks a path parameter; path parameters are always ForceNew.
    #[must_use]
    pub fn in_path(mut self) -> Self {
        self.in_path = true;
        self.force_new = true;
        self
    }

    #[must_use]
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    #[must_use]
    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// Neither required nor purely computed.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        !self.required && !self.computed
    }

    /// Sent to Vault in the request body.
    #[must_use]
    pub fn is_input(&self) -> bool {
        !self.in_path && !self.computed
    }
}

/// Schema of one generated resource or data source.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSchema {
    pub kind: ResourceKind,
    pub endpoint: String,
    pub description: String,
    pub attributes: Vec<Attribute>,
}

impl ResourceSchema {
    pub fn resource(endpoint: impl Into<String>) -> Self {
        Self::new(ResourceKind::Resource, endpoint)
    }

    pub fn data_source(endpoint: impl Into<String>) -> Self {
        Self::new(ResourceKind::DataSource, endpoint)
    }

    fn new(kind: ResourceKind, endpoint: impl Into<String>) -> Self {
        Self {
            kind,
            endpoint: endpoint.into(),
            description: String::new(),
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Parse the endpoint template.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::InvalidTemplate`] for a malformed endpoint.
    pub fn template(&self) -> Result<PathTemplate, PathError> {
        PathTemplate::parse(&self.endpoint)
    }
}
