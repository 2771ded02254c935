use std::ops::Index;

use crate::error::{Error, Result};
use crate::{NamedTag, Tag, Value};

/// An NBT list. All elements are unnamed and share the list's element type.
///
/// A list created with element type [`Tag::End`] is untyped until the first
/// push, which fixes the element type:
///
/// ```
/// use nbtcodec::{List, Tag};
///
/// let mut list = List::empty();
/// list.push(1i32).unwrap();
/// assert_eq!(list.element_tag(), Tag::Int);
/// assert!(list.push("two").is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    element: Tag,
    items: Vec<Value>,
}

impl List {
    pub fn new(element: Tag) -> Self {
        Self {
            element,
            items: Vec::new(),
        }
    }

    /// An empty list of `End`, what the game writes for empty lists.
    pub fn empty() -> Self {
        Self::new(Tag::End)
    }

    /// Build a list, checking that each value has the element type.
    pub fn from_values(element: Tag, values: Vec<Value>) -> Result<Self> {
        let list = Self {
            element,
            items: values,
        };
        list.validate()?;
        Ok(list)
    }

    /// Used by the decoder, which only ever produces elements of `element`.
    pub(crate) fn with_capacity(element: Tag, capacity: usize) -> Self {
        Self {
            element,
            items: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push_unchecked(&mut self, value: Value) {
        debug_assert_eq!(value.tag(), self.element);
        self.items.push(value);
    }

    pub fn element_tag(&self) -> Tag {
        self.element
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let tag = value.tag();

        if tag == Tag::End {
            return Err(Error::end_list_not_empty(self.items.len() + 1));
        }

        if self.element == Tag::End && self.items.is_empty() {
            self.element = tag;
        } else if tag != self.element {
            return Err(Error::child_type_mismatch(self.element, tag));
        }

        self.items.push(value);
        Ok(())
    }

    /// Push a tag that came with a name slot. It must be empty.
    pub fn push_tag(&mut self, tag: NamedTag) -> Result<()> {
        if tag.name.is_some() {
            return Err(Error::named_list_element());
        }
        self.push(tag.value)
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Mutable access to an element. Replacing it with a value of another
    /// type is caught when the list is next encoded.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.items.get_mut(index)
    }

    /// Detach an element, shifting the rest down.
    pub fn remove(&mut self, index: usize) -> Option<Value> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Value> {
        self.items.iter_mut()
    }

    pub fn into_values(self) -> Vec<Value> {
        self.items
    }

    /// Check the list's own invariants, not those of nested containers.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.element == Tag::End {
            if !self.items.is_empty() {
                return Err(Error::end_list_not_empty(self.items.len()));
            }
            return Ok(());
        }

        match self.items.iter().find(|v| v.tag() != self.element) {
            Some(bad) => Err(Error::child_type_mismatch(self.element, bad.tag())),
            None => Ok(()),
        }
    }
}

impl Default for List {
    fn default() -> Self {
        Self::empty()
    }
}

impl Index<usize> for List {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.items[index]
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for List {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
