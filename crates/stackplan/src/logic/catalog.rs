//! Object interning for cheap world snapshots
//!
//! Object names are interned once per problem into [`ObjectId`]s so that
//! stacks and arm contents are plain `u16` sequences. Every snapshot shares
//! the same [`Catalog`] through an `Arc`; the catalog never changes while a
//! plan is being computed.

use crate::error::{PlanError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Number of distinct [`ObjectId`]s
pub const MAX_OBJECTS: usize = u16::MAX as usize + 1;

/// ID for an interned object name
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u16);

impl ObjectId {
    /// Get the raw ID value (for debugging/serialization)
    pub fn as_u16(self) -> u16 {
        self.0
    }
}

/// Shape of an object
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Form {
    Brick,
    Plank,
    Ball,
    Pyramid,
    Box,
    Table,
}

impl Form {
    pub fn name(self) -> &'static str {
        match self {
            Form::Brick => "brick",
            Form::Plank => "plank",
            Form::Ball => "ball",
            Form::Pyramid => "pyramid",
            Form::Box => "box",
            Form::Table => "table",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Small,
    Large,
}

impl Size {
    pub fn name(self) -> &'static str {
        match self {
            Size::Small => "small",
            Size::Large => "large",
        }
    }
}

/// Immutable attributes of one object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectSpec {
    pub form: Form,
    pub size: Size,
    pub color: String,
}

impl ObjectSpec {
    pub fn new(form: Form, size: Size, color: impl Into<String>) -> Self {
        ObjectSpec {
            form,
            size,
            color: color.into(),
        }
    }
}

impl fmt::Display for ObjectSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "the {} {} {}", self.size.name(), self.color, self.form.name())
    }
}

/// Object catalog: names, attributes and the name lookup table
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    names: Vec<String>,
    specs: Vec<ObjectSpec>,
    lookup: HashMap<String, ObjectId>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Register an object, returning its ID. Re-registering a name replaces
    /// its attributes and keeps the ID.
    ///
    /// # Errors
    /// [`PlanError::InvalidWorld`] once every `u16` ID is taken.
    pub fn insert(&mut self, name: &str, spec: ObjectSpec) -> Result<ObjectId> {
        if let Some(&id) = self.lookup.get(name) {
            self.specs[id.0 as usize] = spec;
            return Ok(id);
        }
        let raw = u16::try_from(self.names.len()).map_err(|_| {
            PlanError::InvalidWorld(format!(
                "too many objects: at most {} can be named",
                MAX_OBJECTS
            ))
        })?;
        let id = ObjectId(raw);
        self.names.push(name.to_string());
        self.specs.push(spec);
        self.lookup.insert(name.to_string(), id);
        Ok(id)
    }

    /// Get the ID for a registered name (returns None if not found)
    pub fn get(&self, name: &str) -> Option<ObjectId> {
        self.lookup.get(name).copied()
    }

    /// Resolve an ID to its name
    pub fn name(&self, id: ObjectId) -> &str {
        &self.names[id.0 as usize]
    }

    pub fn spec(&self, id: ObjectId) -> &ObjectSpec {
        &self.specs[id.0 as usize]
    }

    /// Human-readable description, e.g. "the small white ball"
    pub fn describe(&self, id: ObjectId) -> String {
        self.spec(id).to_string()
    }

    /// Number of registered objects
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> {
        (0..self.names.len()).map(|i| ObjectId(i as u16))
    }
}
