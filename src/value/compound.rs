use std::ops::Index;

use crate::error::{Error, Result};
use crate::{NamedTag, Value};

#[cfg(not(feature = "preserve-order"))]
type Map = std::collections::HashMap<String, Value>;

#[cfg(feature = "preserve-order")]
type Map = indexmap::IndexMap<String, Value>;

/// An NBT compound: named children with unique, non-empty names.
///
/// Iteration order is unspecified, unless the `preserve-order` feature is
/// enabled in which case it is insertion order. Equality ignores order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Compound {
    map: Map,
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Add a child. Fails if the name is empty, already taken, or the value
    /// is `End`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let name = name.into();
        let value = value.into();
        check_child(&name, &value)?;

        if self.map.contains_key(&name) {
            return Err(Error::duplicate_name(&name));
        }
        self.map.insert(name, value);
        Ok(())
    }

    /// Add a tag read with its name, which must be present.
    pub fn insert_tag(&mut self, tag: NamedTag) -> Result<()> {
        match tag.name {
            Some(name) => self.insert(name, tag.value),
            None => Err(Error::unnamed_child()),
        }
    }

    /// Set a child, returning the value it displaced, if any.
    pub fn replace(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>> {
        let name = name.into();
        let value = value.into();
        check_child(&name, &value)?;
        Ok(self.map.insert(name, value))
    }

    /// Detach a child.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        #[cfg(feature = "preserve-order")]
        return self.map.shift_remove(name);

        #[cfg(not(feature = "preserve-order"))]
        return self.map.remove(name);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.map.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.map.get_mut(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.map.keys().map(String::as_str)
    }
}

fn check_child(name: &str, value: &Value) -> Result<()> {
    if name.is_empty() {
        return Err(Error::unnamed_child());
    }
    if matches!(value, Value::End) {
        return Err(Error::end_in_compound());
    }
    Ok(())
}

impl Index<&str> for Compound {
    type Output = Value;

    fn index(&self, name: &str) -> &Value {
        match self.map.get(name) {
            Some(v) => v,
            None => panic!("no child named {:?} in compound", name),
        }
    }
}
