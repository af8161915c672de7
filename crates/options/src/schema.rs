use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Shape accepted for one option value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionKind {
    String,
    Integer,
    NonNegativeInteger,
    /// Any JSON number, integers included.
    Float,
    Boolean,
    Enum(&'static [&'static str]),
    List(Box<OptionKind>),
    /// Any JSON object.
    Map,
    /// A JSON object validated against its own schema.
    Nested(Arc<Schema>),
    OneOf(Vec<OptionKind>),
    Any,
}

impl OptionKind {
    pub fn list_of(inner: OptionKind) -> Self {
        OptionKind::List(Box::new(inner))
    }

    /// Shallow type check. `Nested` only checks for an object here; its
    /// entries are validated by the caller.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            OptionKind::String => value.is_string(),
            OptionKind::Integer => value.is_i64() || value.is_u64(),
            OptionKind::NonNegativeInteger => value.is_u64(),
            OptionKind::Float => value.is_number(),
            OptionKind::Boolean => value.is_boolean(),
            OptionKind::Enum(allowed) => value.as_str().is_some_and(|s| allowed.contains(&s)),
            OptionKind::List(inner) => value
                .as_array()
                .is_some_and(|items| items.iter().all(|v| inner.accepts(v))),
            OptionKind::Map | OptionKind::Nested(_) => value.is_object(),
            OptionKind::OneOf(kinds) => kinds.iter().any(|k| k.accepts(value)),
            OptionKind::Any => true,
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionKind::String => f.write_str("string"),
            OptionKind::Integer => f.write_str("integer"),
            OptionKind::NonNegativeInteger => f.write_str("non-negative integer"),
            OptionKind::Float => f.write_str("float"),
            OptionKind::Boolean => f.write_str("boolean"),
            OptionKind::Enum(allowed) => write!(f, "one of [{}]", allowed.join(", ")),
            OptionKind::List(inner) => write!(f, "list of {inner}"),
            OptionKind::Map => f.write_str("map"),
            OptionKind::Nested(_) => f.write_str("map of provider options"),
            OptionKind::OneOf(kinds) => {
                let parts: Vec<String> = kinds.iter().map(ToString::to_string).collect();
                f.write_str(&parts.join(" or "))
            }
            OptionKind::Any => f.write_str("any value"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionSpec {
    pub key: String,
    pub kind: OptionKind,
    pub required: bool,
    pub default: Option<Value>,
    pub doc: String,
}

impl OptionSpec {
    pub fn new(key: impl Into<String>, kind: OptionKind) -> Self {
        Self {
            key: key.into(),
            kind,
            required: false,
            default: None,
            doc: String::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }
}

/// Ordered set of option specs. Key order is the order validated options
/// come out in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    specs: Vec<OptionSpec>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a spec, replacing an earlier one with the same key in place.
    pub fn with(mut self, spec: OptionSpec) -> Self {
        self.insert(spec);
        self
    }

    pub fn insert(&mut self, spec: OptionSpec) {
        match self.specs.iter_mut().find(|s| s.key == spec.key) {
            Some(slot) => *slot = spec,
            None => self.specs.push(spec),
        }
    }

    pub fn get(&self, key: &str) -> Option<&OptionSpec> {
        self.specs.iter().find(|s| s.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(|s| s.key.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OptionSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl FromIterator<OptionSpec> for Schema {
    fn from_iter<I: IntoIterator<Item = OptionSpec>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for spec in iter {
            schema.insert(spec);
        }
        schema
    }
}
