//! Dimension key normalization.
//!
//! Every pattern and context passes through a [`Normalizer`] before it
//! reaches the registry or the resolution engine, so matching logic only
//! ever sees validated, canonical input.

use crate::{
    context::{Context, IntoDimensions, Pattern},
    dimension::{DimensionName, Scalar},
    error::InvalidDimensionError,
};
use std::collections::{BTreeMap, btree_map::Entry};

/// An ordered set of declared dimension names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionSchema {
    declared: Vec<DimensionName>,
}

impl DimensionSchema {
    /// Build a schema, validating every name. Repeated names collapse.
    pub fn new<I, S>(names: I) -> Result<Self, InvalidDimensionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut declared: Vec<DimensionName> = Vec::new();
        for name in names {
            let name = DimensionName::new(name)?;
            if !declared.contains(&name) {
                declared.push(name);
            }
        }
        Ok(Self { declared })
    }

    /// Returns true if the dimension is declared.
    pub fn declares(&self, name: &str) -> bool {
        self.declared.iter().any(|d| d.as_str() == name)
    }

    /// Declared names in declaration order.
    pub fn names(&self) -> &[DimensionName] {
        &self.declared
    }

    fn available(&self) -> Vec<String> {
        self.declared.iter().map(|d| d.to_string()).collect()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Pattern,
    Context,
}

/// Validates and canonicalizes patterns and contexts.
///
/// Without a schema every dimension name is accepted. With a schema,
/// patterns may only use declared dimensions and contexts are projected onto
/// the declared dimensions.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    schema: Option<DimensionSchema>,
}

impl Normalizer {
    /// A normalizer without a schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// A normalizer enforcing `schema`.
    pub fn with_schema(schema: DimensionSchema) -> Self {
        Self {
            schema: Some(schema),
        }
    }

    /// The active schema, if any.
    pub fn schema(&self) -> Option<&DimensionSchema> {
        self.schema.as_ref()
    }

    /// Normalize the dimensions of a dispatch call. An empty context is valid.
    pub fn normalize_context(
        &self,
        dimensions: impl IntoDimensions,
    ) -> Result<Context, InvalidDimensionError> {
        self.canonicalize(dimensions, Mode::Context)
            .map(Context::from_entries)
    }

    /// Normalize the dimensions of a scoped registration.
    ///
    /// Fails with [`InvalidDimensionError::EmptyPattern`] when no dimension
    /// is given; global registrations have no pattern.
    pub fn normalize_pattern(
        &self,
        dimensions: impl IntoDimensions,
    ) -> Result<Pattern, InvalidDimensionError> {
        let entries = self.canonicalize(dimensions, Mode::Pattern)?;
        if entries.is_empty() {
            return Err(InvalidDimensionError::EmptyPattern);
        }
        Ok(Pattern::from_entries(entries))
    }

    fn canonicalize(
        &self,
        dimensions: impl IntoDimensions,
        mode: Mode,
    ) -> Result<BTreeMap<DimensionName, Scalar>, InvalidDimensionError> {
        let mut entries = BTreeMap::new();
        for (name, value) in dimensions.into_dimensions() {
            let name = DimensionName::new(&name)?;
            if let Some(schema) = &self.schema {
                if !schema.declares(name.as_str()) {
                    match mode {
                        Mode::Context => continue,
                        Mode::Pattern => {
                            return Err(InvalidDimensionError::Undeclared {
                                name: name.to_string(),
                                available: schema.available(),
                            });
                        }
                    }
                }
            }
            let scalar = Scalar::from_value(&name, value)?;
            match entries.entry(name) {
                Entry::Vacant(slot) => {
                    slot.insert(scalar);
                }
                Entry::Occupied(slot) => {
                    if *slot.get() != scalar {
                        return Err(InvalidDimensionError::ConflictingValues {
                            name: slot.key().to_string(),
                            first: slot.get().clone(),
                            second: scalar,
                        });
                    }
                }
            }
        }
        Ok(entries)
    }
}
