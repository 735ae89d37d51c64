//! Parameter model: declarative specs, raw caller input, and resolution.
//!
//! # Design
//!
//! A snippet names its parameters with an enum implementing [`ParamKey`], so a
//! typo inside snippet code is a compile error rather than a silent `None`.
//! Callers still speak in strings ([`RawParams`]); those are checked exactly
//! once, at [`ParameterSet::resolve`], against the snippet's specs.
//!
//! ```text
//! RawParams ──ParameterSet::resolve──▶ ResolvedParams<K> ──passes()──▶ Vec<PassParams<K>>
//!  (strings)                            (validated lists)               (one per pass)
//! ```
//!
//! Resolution is pure: specs are never mutated and resolving the same input
//! twice yields equal output.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::error::DomainError;

/// Compile-time checked parameter name.
///
/// Implemented by a small `Copy` enum per snippet:
///
/// ```rust,ignore
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum PaymentParam { MethodName }
///
/// impl ParamKey for PaymentParam {
///     fn name(self) -> &'static str {
///         match self { Self::MethodName => "method_name" }
///     }
/// }
/// ```
pub trait ParamKey: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Wire name used by callers.
    fn name(self) -> &'static str;
}

// ── Values ───────────────────────────────────────────────────────────────────

/// A resolved, validated parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    Flag(bool),
}

impl ParamValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Flag(true) => f.write_str("yes"),
            Self::Flag(false) => f.write_str("no"),
        }
    }
}

/// Raw caller-supplied value for one parameter.
///
/// Deserializes from a scalar or an array of scalars, which is how run
/// manifests spell single and repeated values. Booleans become `yes`/`no`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Single(String),
    Many(Vec<String>),
}

impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Scalar {
            Text(String),
            Flag(bool),
            Integer(i64),
            Float(f64),
        }

        impl From<Scalar> for String {
            fn from(scalar: Scalar) -> Self {
                match scalar {
                    Scalar::Text(s) => s,
                    Scalar::Flag(b) => String::from(if b { "yes" } else { "no" }),
                    Scalar::Integer(n) => n.to_string(),
                    Scalar::Float(x) => x.to_string(),
                }
            }
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            One(Scalar),
            Many(Vec<Scalar>),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::One(scalar) => Self::Single(scalar.into()),
            Repr::Many(items) => Self::Many(items.into_iter().map(String::from).collect()),
        })
    }
}

impl RawValue {
    /// Supplied values, trimmed, with empty entries treated as absent.
    fn values(&self) -> Vec<&str> {
        let all: Vec<&str> = match self {
            Self::Single(s) => vec![s.as_str()],
            Self::Many(v) => v.iter().map(String::as_str).collect(),
        };
        all.into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Single(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::Single(s)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        Self::Single(if b { "yes" } else { "no" }.to_string())
    }
}

impl From<Vec<String>> for RawValue {
    fn from(v: Vec<String>) -> Self {
        Self::Many(v)
    }
}

impl From<Vec<&str>> for RawValue {
    fn from(v: Vec<&str>) -> Self {
        Self::Many(v.into_iter().map(str::to_string).collect())
    }
}

/// Caller-supplied mapping of parameter name to raw value(s).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawParams(BTreeMap<String, RawValue>);

impl RawParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any previous one for the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Fluent variant of [`Self::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.0.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ── Rules ────────────────────────────────────────────────────────────────────

/// A compiled full-match pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile `source` so that it must match the entire value.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{source})$"))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn is_full_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// How a raw value is checked and normalised.
#[derive(Debug, Clone)]
pub enum ValidationRule {
    /// Any non-empty text.
    Any,
    /// Text fully matching a pattern.
    Pattern(Pattern),
    /// A yes/no switch normalised to [`ParamValue::Flag`].
    Flag,
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Pattern(p) => write!(f, "pattern {}", p.as_str()),
            Self::Flag => f.write_str("yes/no"),
        }
    }
}

/// Parse the accepted flag spellings, case-insensitively.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" | "on" => Some(true),
        "no" | "n" | "false" | "0" | "off" => Some(false),
        _ => None,
    }
}

// ── Specs ────────────────────────────────────────────────────────────────────

/// Declarative description of one snippet parameter.
#[derive(Debug, Clone)]
pub struct ParameterSpec<K> {
    key: K,
    required: bool,
    default: Option<ParamValue>,
    rule: ValidationRule,
    description: String,
    error_message: Option<String>,
    repeatable: bool,
}

impl<K: ParamKey> ParameterSpec<K> {
    /// Free-text parameter, optional and single-valued until told otherwise.
    pub fn text(key: K) -> Self {
        Self {
            key,
            required: false,
            default: None,
            rule: ValidationRule::Any,
            description: String::new(),
            error_message: None,
            repeatable: false,
        }
    }

    /// Yes/no parameter. Unset and without default it resolves to `false`.
    pub fn flag(key: K) -> Self {
        Self {
            rule: ValidationRule::Flag,
            ..Self::text(key)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn default_text(mut self, value: impl Into<String>) -> Self {
        self.default = Some(ParamValue::Text(value.into()));
        self
    }

    pub fn default_flag(mut self, value: bool) -> Self {
        self.default = Some(ParamValue::Flag(value));
        self
    }

    /// Require values to fully match `pattern`.
    ///
    /// # Errors
    ///
    /// `InvalidPattern` if the pattern does not compile.
    pub fn matching(mut self, pattern: &str) -> Result<Self, DomainError> {
        let compiled = Pattern::new(pattern).map_err(|e| DomainError::InvalidPattern {
            parameter: self.key.name().to_string(),
            reason: e.to_string(),
        })?;
        self.rule = ValidationRule::Pattern(compiled);
        Ok(self)
    }

    pub fn key(&self) -> K {
        self.key
    }

    pub fn name(&self) -> &'static str {
        self.key.name()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_repeatable(&self) -> bool {
        self.repeatable
    }

    pub fn default_value(&self) -> Option<&ParamValue> {
        self.default.as_ref()
    }

    pub fn rule(&self) -> &ValidationRule {
        &self.rule
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// String-keyed view used for listings and JSON output.
    pub fn descriptor(&self) -> ParameterDescriptor {
        ParameterDescriptor {
            name: self.name().to_string(),
            required: self.required,
            repeatable: self.repeatable,
            default: self.default.as_ref().map(ToString::to_string),
            rule: self.rule.to_string(),
            description: self.description.clone(),
        }
    }

    fn parse_value(&self, raw: &str) -> Result<ParamValue, DomainError> {
        match &self.rule {
            ValidationRule::Any => Ok(ParamValue::Text(raw.to_string())),
            ValidationRule::Pattern(pattern) => {
                if pattern.is_full_match(raw) {
                    Ok(ParamValue::Text(raw.to_string()))
                } else {
                    Err(self.rejection(format!(
                        "'{}' does not match pattern {}",
                        raw,
                        pattern.as_str()
                    )))
                }
            }
            ValidationRule::Flag => parse_flag(raw)
                .map(ParamValue::Flag)
                .ok_or_else(|| self.rejection(format!("expected yes or no, got '{raw}'"))),
        }
    }

    /// Run the declared default through the parameter's own rule.
    ///
    /// # Errors
    ///
    /// `Validation` when the default would be rejected as caller input.
    pub fn check_default(&self) -> Result<(), DomainError> {
        match &self.default {
            Some(default) => self.parse_value(&default.to_string()).map(drop),
            None => Ok(()),
        }
    }

    /// Values used when the caller supplied nothing.
    fn fallback(&self) -> Result<Vec<ParamValue>, DomainError> {
        match (&self.default, self.required, &self.rule) {
            (Some(default), _, _) => Ok(vec![self.parse_value(&default.to_string())?]),
            (None, true, _) => Err(DomainError::MissingParameter {
                parameter: self.name().to_string(),
            }),
            (None, false, ValidationRule::Flag) => Ok(vec![ParamValue::Flag(false)]),
            (None, false, _) => Ok(Vec::new()),
        }
    }

    fn rejection(&self, generated: String) -> DomainError {
        DomainError::validation(
            self.name(),
            self.error_message.clone().unwrap_or(generated),
        )
    }
}

/// Serializable description of a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub required: bool,
    pub repeatable: bool,
    pub default: Option<String>,
    pub rule: String,
    pub description: String,
}

// ── Resolution ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
struct ResolvedEntry<K> {
    key: K,
    repeatable: bool,
    values: Vec<ParamValue>,
}

/// Validated parameters for one invocation, in spec order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParams<K> {
    entries: Vec<ResolvedEntry<K>>,
}

/// The ordered parameter declarations of one snippet.
#[derive(Debug, Clone)]
pub struct ParameterSet<K> {
    specs: Vec<ParameterSpec<K>>,
}

impl<K: ParamKey> ParameterSet<K> {
    pub fn new(specs: Vec<ParameterSpec<K>>) -> Self {
        Self { specs }
    }

    pub fn empty() -> Self {
        Self { specs: Vec::new() }
    }

    pub fn specs(&self) -> &[ParameterSpec<K>] {
        &self.specs
    }

    pub fn descriptors(&self) -> Vec<ParameterDescriptor> {
        self.specs.iter().map(ParameterSpec::descriptor).collect()
    }

    /// Name declared more than once, if any.
    pub fn duplicate_name(&self) -> Option<&'static str> {
        self.specs.iter().enumerate().find_map(|(i, spec)| {
            self.specs[..i]
                .iter()
                .any(|earlier| earlier.name() == spec.name())
                .then(|| spec.name())
        })
    }

    /// First default that breaks its own rule.
    ///
    /// # Errors
    ///
    /// `Validation` naming the offending parameter.
    pub fn check_defaults(&self) -> Result<(), DomainError> {
        self.specs.iter().try_for_each(ParameterSpec::check_default)
    }

    /// Validate `raw` against the declared specs.
    ///
    /// # Errors
    ///
    /// - `UnknownParameter` for a raw name no spec declares
    /// - `MissingParameter` for a required parameter with neither value nor default
    /// - `Validation` for a value breaking its rule, or several values given to a
    ///   non-repeatable parameter
    pub fn resolve(&self, raw: &RawParams) -> Result<ResolvedParams<K>, DomainError> {
        let specs = &self.specs;
        if let Some(unknown) = raw.names().find(|n| !specs.iter().any(|s| s.name() == *n)) {
            return Err(DomainError::UnknownParameter {
                parameter: unknown.to_string(),
                expected: specs.iter().map(|s| s.name().to_string()).collect(),
            });
        }

        let mut entries = Vec::with_capacity(specs.len());
        for spec in specs {
            let supplied = raw.get(spec.name()).map(RawValue::values).unwrap_or_default();

            if !spec.repeatable && supplied.len() > 1 {
                return Err(DomainError::validation(
                    spec.name(),
                    format!("accepts a single value, got {}", supplied.len()),
                ));
            }

            let values = if supplied.is_empty() {
                spec.fallback()?
            } else {
                supplied
                    .into_iter()
                    .map(|v| spec.parse_value(v))
                    .collect::<Result<Vec<_>, _>>()?
            };

            entries.push(ResolvedEntry {
                key: spec.key,
                repeatable: spec.repeatable,
                values,
            });
        }

        Ok(ResolvedParams { entries })
    }
}

impl<K: ParamKey> From<Vec<ParameterSpec<K>>> for ParameterSet<K> {
    fn from(specs: Vec<ParameterSpec<K>>) -> Self {
        Self::new(specs)
    }
}

impl<K: ParamKey> ResolvedParams<K> {
    /// All values resolved for `key` (empty when absent).
    pub fn values(&self, key: K) -> &[ParamValue] {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.values.as_slice())
            .unwrap_or(&[])
    }

    /// Expand repeatable parameters into generation passes.
    ///
    /// The longest repeatable list sets the pass count; lists of zero or one
    /// value apply to every pass.
    ///
    /// # Errors
    ///
    /// `Validation` when two repeatable lists have different lengths above one.
    pub fn passes(&self) -> Result<Vec<PassParams<K>>, DomainError> {
        let count = self
            .entries
            .iter()
            .filter(|e| e.repeatable)
            .map(|e| e.values.len())
            .max()
            .unwrap_or(1)
            .max(1);

        if let Some(odd) = self
            .entries
            .iter()
            .find(|e| e.values.len() > 1 && e.values.len() != count)
        {
            return Err(DomainError::validation(
                odd.key.name(),
                format!(
                    "has {} values but other repeated parameters have {}",
                    odd.values.len(),
                    count
                ),
            ));
        }

        Ok((0..count)
            .map(|index| PassParams {
                index,
                values: self
                    .entries
                    .iter()
                    .filter_map(|e| match e.values.len() {
                        0 => None,
                        1 => Some((e.key, e.values[0].clone())),
                        _ => Some((e.key, e.values[index].clone())),
                    })
                    .collect(),
            })
            .collect())
    }
}

/// Parameters for a single generation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PassParams<K> {
    index: usize,
    values: Vec<(K, ParamValue)>,
}

impl<K: ParamKey> PassParams<K> {
    /// Zero-based pass number within the invocation.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get(&self, key: K) -> Option<&ParamValue> {
        self.values.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn text(&self, key: K) -> Option<&str> {
        self.get(key).and_then(ParamValue::as_text)
    }

    pub fn text_or<'a>(&'a self, key: K, fallback: &'a str) -> &'a str {
        self.text(key).unwrap_or(fallback)
    }

    /// Text value that the snippet cannot work without.
    pub fn require_text(&self, key: K) -> Result<&str, DomainError> {
        self.text(key).ok_or_else(|| DomainError::MissingParameter {
            parameter: key.name().to_string(),
        })
    }

    /// Flag value; absent or non-flag values read as `false`.
    pub fn flag(&self, key: K) -> bool {
        self.get(key).and_then(ParamValue::as_flag).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum P {
        Frontname,
        Section,
        Action,
        Ajax,
        HasMenu,
    }

    impl ParamKey for P {
        fn name(self) -> &'static str {
            match self {
                Self::Frontname => "frontname",
                Self::Section => "section",
                Self::Action => "action",
                Self::Ajax => "ajax",
                Self::HasMenu => "has_menu",
            }
        }
    }

    const SLUG: &str = r"[a-z]{1}[a-z0-9_]+";
    const SLUG_MESSAGE: &str = "Only lowercase alphanumeric and underscore characters are allowed";

    fn specs() -> ParameterSet<P> {
        ParameterSet::new(vec![
            ParameterSpec::text(P::Frontname)
                .describe("On empty uses module name in lower case")
                .matching(SLUG)
                .unwrap()
                .error_message(SLUG_MESSAGE)
                .repeatable(),
            ParameterSpec::text(P::Section)
                .required()
                .matching(SLUG)
                .unwrap()
                .repeatable(),
            ParameterSpec::text(P::Action)
                .required()
                .default_text("index")
                .matching(SLUG)
                .unwrap(),
            ParameterSpec::flag(P::Ajax),
            ParameterSpec::flag(P::HasMenu).default_flag(true),
        ])
    }

    #[test]
    fn resolves_defaults_for_unset_parameters() {
        let raw = RawParams::new().with("section", "catalog");
        let resolved = specs().resolve(&raw).unwrap();

        assert_eq!(resolved.values(P::Action), &[ParamValue::Text("index".into())]);
        assert_eq!(resolved.values(P::Ajax), &[ParamValue::Flag(false)]);
        assert_eq!(resolved.values(P::HasMenu), &[ParamValue::Flag(true)]);
        assert!(resolved.values(P::Frontname).is_empty());
    }

    #[test]
    fn resolve_is_idempotent() {
        let raw = RawParams::new()
            .with("section", vec!["catalog", "orders"])
            .with("ajax", "YES");
        let first = specs().resolve(&raw).unwrap();
        let second = specs().resolve(&raw).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn repeatable_required_with_zero_values_is_missing() {
        let raw = RawParams::new().with("section", Vec::<String>::new());
        let err = specs().resolve(&raw).unwrap_err();
        assert_eq!(
            err,
            DomainError::MissingParameter {
                parameter: "section".into()
            }
        );
    }

    #[test]
    fn blank_values_count_as_absent() {
        let raw = RawParams::new().with("section", vec!["  ", ""]);
        assert!(matches!(
            specs().resolve(&raw),
            Err(DomainError::MissingParameter { .. })
        ));
    }

    #[test]
    fn three_values_produce_three_passes() {
        let raw = RawParams::new().with("section", vec!["catalog", "orders", "reports"]);
        let passes = specs().resolve(&raw).unwrap().passes().unwrap();

        assert_eq!(passes.len(), 3);
        let sections: Vec<_> = passes.iter().map(|p| p.text(P::Section).unwrap()).collect();
        assert_eq!(sections, ["catalog", "orders", "reports"]);
        // Single-valued parameters apply to every pass.
        assert!(passes.iter().all(|p| p.text(P::Action) == Some("index")));
        assert_eq!(passes[2].index(), 2);
    }

    #[test]
    fn every_repeated_value_is_validated() {
        let raw = RawParams::new().with("section", vec!["catalog", "Bad-Value", "reports"]);
        let err = specs().resolve(&raw).unwrap_err();
        match err {
            DomainError::Validation { parameter, message } => {
                assert_eq!(parameter, "section");
                assert!(message.contains("Bad-Value"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn pattern_failure_uses_configured_message() {
        let raw = RawParams::new()
            .with("section", "catalog")
            .with("frontname", "9lives");
        let err = specs().resolve(&raw).unwrap_err();
        assert_eq!(err, DomainError::validation("frontname", SLUG_MESSAGE));
    }

    #[test]
    fn pattern_must_match_whole_value() {
        let raw = RawParams::new().with("section", "catalog/extra");
        assert!(matches!(
            specs().resolve(&raw),
            Err(DomainError::Validation { .. })
        ));
    }

    #[test]
    fn flag_normalizes_regardless_of_case() {
        for (input, expected) in [("yes", true), ("YES", true), ("No", false), ("no", false)] {
            let raw = RawParams::new().with("section", "s1").with("ajax", input);
            let resolved = specs().resolve(&raw).unwrap();
            assert_eq!(resolved.values(P::Ajax), &[ParamValue::Flag(expected)], "{input}");
        }
    }

    #[test]
    fn flag_rejects_out_of_set_value() {
        let raw = RawParams::new().with("section", "s1").with("ajax", "maybe");
        let err = specs().resolve(&raw).unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref parameter, .. } if parameter == "ajax"));
    }

    #[test]
    fn unknown_parameter_is_rejected() {
        let raw = RawParams::new().with("section", "s1").with("credit_card", "x");
        match specs().resolve(&raw).unwrap_err() {
            DomainError::UnknownParameter { parameter, expected } => {
                assert_eq!(parameter, "credit_card");
                assert!(expected.contains(&"section".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn single_valued_parameter_rejects_lists() {
        let raw = RawParams::new()
            .with("section", "s1")
            .with("action", vec!["index", "view"]);
        assert!(matches!(
            specs().resolve(&raw),
            Err(DomainError::Validation { ref parameter, .. }) if parameter == "action"
        ));
    }

    #[test]
    fn mismatched_repeat_lengths_are_rejected() {
        let raw = RawParams::new()
            .with("section", vec!["a1", "b1", "c1"])
            .with("frontname", vec!["one", "two"]);
        let resolved = specs().resolve(&raw).unwrap();
        assert!(matches!(
            resolved.passes(),
            Err(DomainError::Validation { ref parameter, .. }) if parameter == "frontname"
        ));
    }

    #[test]
    fn duplicate_declarations_are_detected() {
        assert_eq!(specs().duplicate_name(), None);
        let twice = ParameterSet::new(vec![
            ParameterSpec::text(P::Section),
            ParameterSpec::flag(P::Ajax),
            ParameterSpec::text(P::Section),
        ]);
        assert_eq!(twice.duplicate_name(), Some("section"));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let result = ParameterSpec::text(P::Section).matching("([a-z");
        assert!(matches!(result, Err(DomainError::InvalidPattern { .. })));
    }

    #[test]
    fn descriptor_reflects_spec() {
        let spec = ParameterSpec::flag(P::HasMenu)
            .default_flag(true)
            .describe("Add a backend menu entry");
        let d = spec.descriptor();
        assert_eq!(d.name, "has_menu");
        assert_eq!(d.default.as_deref(), Some("yes"));
        assert_eq!(d.rule, "yes/no");
        assert!(!d.required);
    }

    #[test]
    fn pass_accessors() {
        let raw = RawParams::new().with("section", "s1");
        let pass = specs().resolve(&raw).unwrap().passes().unwrap().remove(0);

        assert_eq!(pass.text_or(P::Frontname, "vendor_module"), "vendor_module");
        assert!(pass.flag(P::HasMenu));
        assert!(!pass.flag(P::Ajax));
        assert!(matches!(
            pass.require_text(P::Frontname),
            Err(DomainError::MissingParameter { .. })
        ));
    }

    #[test]
    fn text_default_on_flag_resolves_to_flag() {
        let set = ParameterSet::new(vec![ParameterSpec::flag(P::Ajax).default_text("Yes")]);
        assert!(set.check_defaults().is_ok());

        let pass = set.resolve(&RawParams::new()).unwrap().passes().unwrap().remove(0);
        assert_eq!(pass.get(P::Ajax), Some(&ParamValue::Flag(true)));
        assert!(pass.flag(P::Ajax));
    }

    #[test]
    fn default_must_satisfy_pattern() {
        let set = ParameterSet::new(vec![
            ParameterSpec::text(P::Action)
                .default_text("Not A Slug!")
                .matching(SLUG)
                .unwrap(),
        ]);

        assert!(matches!(
            set.check_defaults(),
            Err(DomainError::Validation { ref parameter, .. }) if parameter == "action"
        ));
        assert!(matches!(
            set.resolve(&RawParams::new()),
            Err(DomainError::Validation { ref parameter, .. }) if parameter == "action"
        ));
    }

    #[test]
    fn flag_default_must_be_yes_or_no() {
        let set = ParameterSet::new(vec![ParameterSpec::flag(P::HasMenu).default_text("sometimes")]);
        assert!(set.check_defaults().is_err());
    }

    #[test]
    fn raw_values_accept_json_scalars() {
        let raw: RawParams = serde_json::from_str(
            r#"{ "section": ["index", 2], "ajax": true, "has_menu": false, "frontname": "shop" }"#,
        )
        .unwrap();

        assert_eq!(raw.get("section"), Some(&RawValue::from(vec!["index", "2"])));
        assert_eq!(raw.get("ajax"), Some(&RawValue::from("yes")));
        assert_eq!(raw.get("has_menu"), Some(&RawValue::from("no")));
    }
}
