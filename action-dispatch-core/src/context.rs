//! Contexts, patterns and scopes.
//!
//! A [`Context`] describes the situation of a single dispatch. A [`Pattern`]
//! is a registration-time partial context: it matches every context that
//! contains all of its dimensions with equal values. Both are canonical
//! (validated, de-duplicated, ordered by dimension name) and are produced by
//! the [`Normalizer`](crate::Normalizer).

use crate::{
    dimension::{DimensionName, Scalar, Value},
    error::InvalidDimensionError,
    normalize::Normalizer,
};
use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

type Entries = BTreeMap<DimensionName, Scalar>;

fn fmt_entries(entries: &Entries, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("{")?;
    for (i, (name, value)) in entries.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{name}={value}")?;
    }
    f.write_str("}")
}

/// The runtime dimensions of a dispatch call.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Context {
    entries: Entries,
}

impl Context {
    /// An empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize arbitrary dimensions into a context, without a schema.
    pub fn from_dimensions(dimensions: impl IntoDimensions) -> Result<Self, InvalidDimensionError> {
        Normalizer::new().normalize_context(dimensions)
    }

    pub(crate) fn from_entries(entries: Entries) -> Self {
        Self { entries }
    }

    /// Look up a dimension value.
    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.entries.get(name)
    }

    /// Returns true if the context carries the dimension.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterate over dimensions in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&DimensionName, &Scalar)> {
        self.entries.iter()
    }

    /// Number of dimensions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no dimension is set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_entries(&self.entries, f)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Context{self}")
    }
}

/// A non-empty set of required dimension values.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    entries: Entries,
}

impl Pattern {
    /// Normalize arbitrary dimensions into a pattern, without a schema.
    pub fn from_dimensions(dimensions: impl IntoDimensions) -> Result<Self, InvalidDimensionError> {
        Normalizer::new().normalize_pattern(dimensions)
    }

    /// Callers must guarantee `entries` is non-empty.
    pub(crate) fn from_entries(entries: Entries) -> Self {
        debug_assert!(!entries.is_empty());
        Self { entries }
    }

    /// Number of constrained dimensions.
    pub fn specificity(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if every constrained dimension is present in `context`
    /// with an equal value. Extra context dimensions are ignored.
    pub fn matches(&self, context: &Context) -> bool {
        self.entries.len() <= context.entries.len()
            && self
                .entries
                .iter()
                .all(|(name, value)| context.entries.get(name) == Some(value))
    }

    /// Returns true if every constraint of `self` also appears in `other`.
    pub fn is_subset_of(&self, other: &Pattern) -> bool {
        self.entries
            .iter()
            .all(|(name, value)| other.entries.get(name) == Some(value))
    }

    /// Look up a constrained value.
    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.entries.get(name)
    }

    /// Iterate over constraints in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&DimensionName, &Scalar)> {
        self.entries.iter()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_entries(&self.entries, f)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern{self}")
    }
}

/// Where a registration applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Applies to every context; specificity 0.
    Global,
    /// Applies to contexts matching the pattern.
    Pattern(Pattern),
}

impl Scope {
    /// Number of constrained dimensions.
    pub fn specificity(&self) -> usize {
        match self {
            Scope::Global => 0,
            Scope::Pattern(pattern) => pattern.specificity(),
        }
    }

    /// Returns true if the scope accepts `context`.
    pub fn matches(&self, context: &Context) -> bool {
        match self {
            Scope::Global => true,
            Scope::Pattern(pattern) => pattern.matches(context),
        }
    }

    /// Returns true for the global scope.
    pub fn is_global(&self) -> bool {
        matches!(self, Scope::Global)
    }

    /// The pattern, unless global.
    pub fn pattern(&self) -> Option<&Pattern> {
        match self {
            Scope::Global => None,
            Scope::Pattern(pattern) => Some(pattern),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => f.write_str("global scope"),
            Scope::Pattern(pattern) => write!(f, "pattern {pattern}"),
        }
    }
}

impl From<Pattern> for Scope {
    fn from(pattern: Pattern) -> Self {
        Scope::Pattern(pattern)
    }
}

/// Conversion into raw `(name, value)` pairs for normalization.
///
/// Implemented for pair arrays and vectors, maps, `()` (no dimensions) and
/// the canonical [`Context`] and [`Pattern`] types.
pub trait IntoDimensions {
    /// Produce the raw pairs, in any order.
    fn into_dimensions(self) -> Vec<(String, Value)>;
}

impl IntoDimensions for () {
    fn into_dimensions(self) -> Vec<(String, Value)> {
        Vec::new()
    }
}

impl<K, V> IntoDimensions for Vec<(K, V)>
where
    K: Into<String>,
    V: Into<Value>,
{
    fn into_dimensions(self) -> Vec<(String, Value)> {
        self.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}

impl<K, V, const N: usize> IntoDimensions for [(K, V); N]
where
    K: Into<String>,
    V: Into<Value>,
{
    fn into_dimensions(self) -> Vec<(String, Value)> {
        self.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}

impl<K, V, S> IntoDimensions for HashMap<K, V, S>
where
    K: Into<String>,
    V: Into<Value>,
{
    fn into_dimensions(self) -> Vec<(String, Value)> {
        self.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}

impl<K, V> IntoDimensions for BTreeMap<K, V>
where
    K: Into<String>,
    V: Into<Value>,
{
    fn into_dimensions(self) -> Vec<(String, Value)> {
        self.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}

fn canonical_pairs(entries: &Entries) -> Vec<(String, Value)> {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), Value::from(value.clone())))
        .collect()
}

impl IntoDimensions for Context {
    fn into_dimensions(self) -> Vec<(String, Value)> {
        canonical_pairs(&self.entries)
    }
}

impl IntoDimensions for &Context {
    fn into_dimensions(self) -> Vec<(String, Value)> {
        canonical_pairs(&self.entries)
    }
}

impl IntoDimensions for Pattern {
    fn into_dimensions(self) -> Vec<(String, Value)> {
        canonical_pairs(&self.entries)
    }
}

impl IntoDimensions for &Pattern {
    fn into_dimensions(self) -> Vec<(String, Value)> {
        canonical_pairs(&self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(pairs: &[(&str, &str)]) -> Context {
        Context::from_dimensions(pairs.to_vec()).unwrap()
    }

    fn pattern(pairs: &[(&str, &str)]) -> Pattern {
        Pattern::from_dimensions(pairs.to_vec()).unwrap()
    }

    #[test]
    fn test_pattern_matches_subset() {
        let p = pattern(&[("region", "EU")]);
        assert!(p.matches(&context(&[("region", "EU"), ("role", "admin")])));
        assert!(p.matches(&context(&[("region", "EU")])));
        assert!(!p.matches(&context(&[("region", "US")])));
        assert!(!p.matches(&context(&[("role", "admin")])));
        assert!(!p.matches(&Context::new()));
    }

    #[test]
    fn test_pattern_subset_relation() {
        let narrow = pattern(&[("region", "EU"), ("role", "admin")]);
        let wide = pattern(&[("region", "EU")]);
        assert!(wide.is_subset_of(&narrow));
        assert!(!narrow.is_subset_of(&wide));
        assert_eq!(narrow.specificity(), 2);
    }

    #[test]
    fn test_scope_specificity() {
        assert_eq!(Scope::Global.specificity(), 0);
        assert!(Scope::Global.matches(&Context::new()));
        let scope = Scope::from(pattern(&[("tenant", "acme")]));
        assert_eq!(scope.specificity(), 1);
        assert!(!scope.is_global());
    }

    #[test]
    fn test_display_is_ordered() {
        let ctx = Context::from_dimensions([("role", Value::from("admin")), ("tier", Value::from(3))])
            .unwrap();
        assert_eq!(ctx.to_string(), "{role=\"admin\", tier=3}");
        assert_eq!(Scope::Global.to_string(), "global scope");
    }
}
