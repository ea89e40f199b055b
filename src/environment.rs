use std::collections::BTreeMap;
use std::fmt;

use crate::ast::TypeSpec;
use crate::error::NameError;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Binding {
    pub declared: Option<TypeSpec>,
    pub value: Option<Value>,
}

/// Name to value table shared by every evaluation in a session.
///
/// Declarations and assignments live in the same namespace. The declared
/// type is recorded but never checked against assigned values.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: BTreeMap<String, Binding>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a declaration. Any value held under the name is dropped.
    pub fn declare(&mut self, name: &str, type_spec: TypeSpec) {
        self.bindings.insert(
            name.to_string(),
            Binding {
                declared: Some(type_spec),
                value: None,
            },
        );
    }

    pub fn assign(&mut self, name: &str, value: Value) {
        self.bindings.entry(name.to_string()).or_default().value = Some(value);
    }

    /// Current value of `name`; declared-only names count as undefined.
    pub fn lookup(&self, name: &str) -> Result<Value, NameError> {
        self.bindings
            .get(name)
            .and_then(|binding| binding.value)
            .ok_or_else(|| NameError {
                name: name.to_string(),
            })
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.bindings.iter().map(|(name, binding)| (name.as_str(), binding))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, binding)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match (binding.value, binding.declared) {
                (Some(value), _) => write!(f, "{name}: {value}")?,
                (None, Some(type_spec)) => write!(f, "{name}: {type_spec} (unassigned)")?,
                (None, None) => write!(f, "{name}: (unassigned)")?,
            }
        }
        write!(f, "}}")
    }
}
