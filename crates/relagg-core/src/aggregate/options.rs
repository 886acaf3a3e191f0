//! Aggregate request options.
//!
//! Requests arrive as loosely-typed `RawOptions` (an ordered list of
//! key/value entries, mirroring how aggregate declarations are written).
//! `RawOptions::validate` checks them against the option schema and produces
//! an `AggregateOptions` where every optional entry is an explicit `Option`.

use crate::{aggregate::scope::ScopeInput, expr::Expr, query::QueryOption};
use derive_more::{Deref, Display};
use relagg_schema::{
    error::ErrorTree,
    node::AggregateFieldModel,
    types::{Constraints, FieldType},
    value::Value,
};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    str::FromStr,
    sync::Arc,
};

///
/// OptionKey
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[remain::sorted]
pub enum OptionKey {
    #[display("agg_name")]
    AggName,
    #[display("arguments")]
    Arguments,
    #[display("authorize")]
    Authorize,
    #[display("constraints")]
    Constraints,
    #[display("default")]
    Default,
    #[display("expr")]
    Expr,
    #[display("expr_type")]
    ExprType,
    #[display("field")]
    Field,
    #[display("filterable")]
    Filterable,
    #[display("implementation")]
    Implementation,
    #[display("include_nil")]
    IncludeNil,
    #[display("join_filters")]
    JoinFilters,
    #[display("path")]
    Path,
    #[display("query")]
    Query,
    #[display("read_action")]
    ReadAction,
    #[display("sensitive")]
    Sensitive,
    #[display("sortable")]
    Sortable,
    #[display("tenant")]
    Tenant,
    #[display("type")]
    Type,
    #[display("uniq")]
    Uniq,
}

impl OptionKey {
    pub const ALL: [Self; 20] = [
        Self::AggName,
        Self::Arguments,
        Self::Authorize,
        Self::Constraints,
        Self::Default,
        Self::Expr,
        Self::ExprType,
        Self::Field,
        Self::Filterable,
        Self::Implementation,
        Self::IncludeNil,
        Self::JoinFilters,
        Self::Path,
        Self::Query,
        Self::ReadAction,
        Self::Sensitive,
        Self::Sortable,
        Self::Tenant,
        Self::Type,
        Self::Uniq,
    ];
}

impl FromStr for OptionKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.to_string() == s)
            .ok_or_else(|| s.to_string())
    }
}

///
/// DefaultProducer
/// Zero-argument function producing a default value at compile time.
///

#[derive(Clone)]
pub struct DefaultProducer(Arc<dyn Fn() -> Value + Send + Sync>);

impl DefaultProducer {
    #[must_use]
    pub fn new(f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    #[must_use]
    pub fn produce(&self) -> Value {
        (self.0)()
    }
}

impl fmt::Debug for DefaultProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DefaultProducer(..)")
    }
}

impl PartialEq for DefaultProducer {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

///
/// DefaultValue
///

#[derive(Clone, Debug, PartialEq)]
pub enum DefaultValue {
    Value(Value),
    Producer(DefaultProducer),
}

impl DefaultValue {
    /// The literal, or the producer's output.
    #[must_use]
    pub fn resolve(&self) -> Value {
        match self {
            Self::Value(value) => value.clone(),
            Self::Producer(producer) => producer.produce(),
        }
    }
}

///
/// OptionValue
///
/// Untyped option payload. `Null`, and a `Value` holding `Value::Null`,
/// mark an option explicitly set to no value, which is treated as unset.
///

#[derive(Clone, Debug, PartialEq)]
pub enum OptionValue {
    Null,
    Bool(bool),
    Ident(String),
    Path(Vec<String>),
    Value(Value),
    Producer(DefaultProducer),
    Expr(Expr),
    Type(FieldType),
    Constraints(Constraints),
    Query(ScopeInput),
    Arguments(BTreeMap<String, Value>),
    JoinFilters(Vec<(Vec<String>, Expr)>),
}

impl OptionValue {
    /// True when the entry carries no value and counts as unset.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Null | Self::Value(Value::Null))
    }

    const fn label(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Ident(_) => "identifier",
            Self::Path(_) => "path",
            Self::Value(_) => "value",
            Self::Producer(_) => "producer",
            Self::Expr(_) => "expression",
            Self::Type(_) => "type",
            Self::Constraints(_) => "constraints",
            Self::Query(_) => "query",
            Self::Arguments(_) => "arguments",
            Self::JoinFilters(_) => "join filters",
        }
    }
}

///
/// OptionErrors
/// Field-level option errors, keyed by option name.
///

#[derive(Clone, Debug, Default, Deref, Display, Eq, PartialEq)]
pub struct OptionErrors(ErrorTree);

impl OptionErrors {
    fn add(&mut self, key: impl Into<String>, message: impl fmt::Display) {
        self.0.add_at(key, message);
    }

    /// Messages recorded against `key`.
    #[must_use]
    pub fn messages_for(&self, key: &str) -> Vec<String> {
        self.0
            .flatten()
            .into_iter()
            .filter(|(route, _)| route == key)
            .map(|(_, message)| message)
            .collect()
    }
}

///
/// AggregateOptions
///
/// Validated options. Flags carry their schema defaults; everything that can
/// be omitted is an `Option` so "omitted" and "set to the default" stay
/// distinguishable.
///

#[derive(Clone, Debug, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct AggregateOptions {
    pub path: Vec<String>,
    pub agg_name: Option<String>,
    pub query: Option<ScopeInput>,
    pub field: Option<String>,
    pub expr: Option<Expr>,
    pub expr_type: Option<FieldType>,
    pub arguments: BTreeMap<String, Value>,
    pub default: Option<DefaultValue>,
    pub filterable: bool,
    pub sortable: bool,
    pub ty: Option<FieldType>,
    pub constraints: Option<Constraints>,
    pub implementation: Option<String>,
    pub read_action: Option<String>,
    pub uniq: bool,
    pub include_nil: bool,
    pub join_filters: Vec<(Vec<String>, Expr)>,
    pub sensitive: bool,
    pub tenant: Option<Value>,
    pub authorize: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            path: Vec::new(),
            agg_name: None,
            query: None,
            field: None,
            expr: None,
            expr_type: None,
            arguments: BTreeMap::new(),
            default: None,
            filterable: true,
            sortable: true,
            ty: None,
            constraints: None,
            implementation: None,
            read_action: None,
            uniq: false,
            include_nil: false,
            join_filters: Vec::new(),
            sensitive: false,
            tenant: None,
            authorize: true,
        }
    }
}

///
/// RawOptions
/// Ordered option entries as supplied by the caller.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawOptions {
    entries: Vec<(String, OptionValue)>,
}

impl RawOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[(String, OptionValue)] {
        &self.entries
    }

    /// Append an entry under an arbitrary key.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: OptionValue) -> Self {
        self.entries.push((key.into(), value));
        self
    }

    fn set(self, key: OptionKey, value: OptionValue) -> Self {
        self.with(key.to_string(), value)
    }

    /// True when `key` has at least one entry carrying a value.
    #[must_use]
    pub fn is_set(&self, key: OptionKey) -> bool {
        let name = key.to_string();

        self.entries
            .iter()
            .any(|(entry, value)| *entry == name && !value.is_unset())
    }

    /// Explicitly set `key` to no value.
    #[must_use]
    pub fn unset(self, key: OptionKey) -> Self {
        self.set(key, OptionValue::Null)
    }

    #[must_use]
    pub fn path<I, S>(self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path = path.into_iter().map(Into::into).collect();
        self.set(OptionKey::Path, OptionValue::Path(path))
    }

    #[must_use]
    pub fn agg_name(self, name: impl Into<String>) -> Self {
        self.set(OptionKey::AggName, OptionValue::Ident(name.into()))
    }

    #[must_use]
    pub fn query(self, scope: ScopeInput) -> Self {
        self.set(OptionKey::Query, OptionValue::Query(scope))
    }

    #[must_use]
    pub fn query_options(self, options: impl IntoIterator<Item = QueryOption>) -> Self {
        self.query(ScopeInput::Options(options.into_iter().collect()))
    }

    #[must_use]
    pub fn field(self, field: impl Into<String>) -> Self {
        self.set(OptionKey::Field, OptionValue::Ident(field.into()))
    }

    #[must_use]
    pub fn expr(self, expr: Expr) -> Self {
        self.set(OptionKey::Expr, OptionValue::Expr(expr))
    }

    #[must_use]
    pub fn expr_type(self, ty: FieldType) -> Self {
        self.set(OptionKey::ExprType, OptionValue::Type(ty))
    }

    #[must_use]
    pub fn arguments<I, K, V>(self, arguments: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let arguments = arguments
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        self.set(OptionKey::Arguments, OptionValue::Arguments(arguments))
    }

    #[must_use]
    pub fn default_value(self, value: impl Into<Value>) -> Self {
        self.set(OptionKey::Default, OptionValue::Value(value.into()))
    }

    #[must_use]
    pub fn default_with(self, f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.set(
            OptionKey::Default,
            OptionValue::Producer(DefaultProducer::new(f)),
        )
    }

    #[must_use]
    pub fn filterable(self, filterable: bool) -> Self {
        self.set(OptionKey::Filterable, OptionValue::Bool(filterable))
    }

    #[must_use]
    pub fn sortable(self, sortable: bool) -> Self {
        self.set(OptionKey::Sortable, OptionValue::Bool(sortable))
    }

    #[must_use]
    pub fn ty(self, ty: FieldType) -> Self {
        self.set(OptionKey::Type, OptionValue::Type(ty))
    }

    #[must_use]
    pub fn constraints(self, constraints: Constraints) -> Self {
        self.set(OptionKey::Constraints, OptionValue::Constraints(constraints))
    }

    #[must_use]
    pub fn implementation(self, implementation: impl Into<String>) -> Self {
        self.set(
            OptionKey::Implementation,
            OptionValue::Ident(implementation.into()),
        )
    }

    #[must_use]
    pub fn read_action(self, action: impl Into<String>) -> Self {
        self.set(OptionKey::ReadAction, OptionValue::Ident(action.into()))
    }

    #[must_use]
    pub fn uniq(self, uniq: bool) -> Self {
        self.set(OptionKey::Uniq, OptionValue::Bool(uniq))
    }

    #[must_use]
    pub fn include_nil(self, include_nil: bool) -> Self {
        self.set(OptionKey::IncludeNil, OptionValue::Bool(include_nil))
    }

    /// Add one join filter, extending an existing `join_filters` entry.
    #[must_use]
    pub fn join_filter<I, S>(mut self, path: I, expr: Expr) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path: Vec<String> = path.into_iter().map(Into::into).collect();
        let key = OptionKey::JoinFilters.to_string();

        if let Some((_, OptionValue::JoinFilters(filters))) =
            self.entries.iter_mut().rev().find(|(k, _)| *k == key)
        {
            filters.push((path, expr));
            return self;
        }

        self.set(
            OptionKey::JoinFilters,
            OptionValue::JoinFilters(vec![(path, expr)]),
        )
    }

    #[must_use]
    pub fn sensitive(self, sensitive: bool) -> Self {
        self.set(OptionKey::Sensitive, OptionValue::Bool(sensitive))
    }

    #[must_use]
    pub fn tenant(self, tenant: impl Into<Value>) -> Self {
        self.set(OptionKey::Tenant, OptionValue::Value(tenant.into()))
    }

    #[must_use]
    pub fn authorize(self, authorize: bool) -> Self {
        self.set(OptionKey::Authorize, OptionValue::Bool(authorize))
    }

    /// Check every entry against the option schema.
    ///
    /// Entries carrying no value are dropped first. All remaining problems are
    /// reported together.
    pub fn validate(self) -> Result<AggregateOptions, OptionErrors> {
        let mut errs = OptionErrors::default();
        let mut seen = BTreeSet::new();
        let mut options = AggregateOptions::default();

        for (name, value) in self.entries {
            if value.is_unset() {
                continue;
            }

            let Ok(key) = name.parse::<OptionKey>() else {
                errs.add(name, "unknown option");
                continue;
            };
            if !seen.insert(key) {
                errs.add(name, "option given more than once");
                continue;
            }

            if let Err(message) = apply(&mut options, key, value) {
                errs.add(name, message);
            }
        }

        if errs.is_empty() {
            Ok(options)
        } else {
            Err(errs)
        }
    }
}

// Store one option, checking its shape.
fn apply(options: &mut AggregateOptions, key: OptionKey, value: OptionValue) -> Result<(), String> {
    let wrong = |value: &OptionValue, expected: &str| {
        format!("expected {expected}, got {}", value.label())
    };

    match (key, value) {
        (OptionKey::Path, OptionValue::Path(path)) => {
            check_path(&path)?;
            options.path = path;
        }
        (OptionKey::Path, OptionValue::Ident(hop)) => {
            check_path(std::slice::from_ref(&hop))?;
            options.path = vec![hop];
        }
        (OptionKey::AggName, OptionValue::Ident(name)) => options.agg_name = Some(name),
        (OptionKey::Query, OptionValue::Query(scope)) => options.query = Some(scope),
        (OptionKey::Field, OptionValue::Ident(field)) => options.field = Some(field),
        (OptionKey::Expr, OptionValue::Expr(expr)) => options.expr = Some(expr),
        (OptionKey::ExprType, OptionValue::Type(ty)) => options.expr_type = Some(ty),
        (OptionKey::Arguments, OptionValue::Arguments(arguments)) => {
            options.arguments = arguments;
        }
        (OptionKey::Default, OptionValue::Value(value)) => {
            options.default = Some(DefaultValue::Value(value));
        }
        (OptionKey::Default, OptionValue::Producer(producer)) => {
            options.default = Some(DefaultValue::Producer(producer));
        }
        (OptionKey::Filterable, OptionValue::Bool(flag)) => options.filterable = flag,
        (OptionKey::Sortable, OptionValue::Bool(flag)) => options.sortable = flag,
        (OptionKey::Type, OptionValue::Type(ty)) => options.ty = Some(ty),
        (OptionKey::Constraints, OptionValue::Constraints(constraints)) => {
            options.constraints = Some(constraints);
        }
        (OptionKey::Implementation, OptionValue::Ident(name)) => {
            options.implementation = Some(name);
        }
        (OptionKey::ReadAction, OptionValue::Ident(action)) => options.read_action = Some(action),
        (OptionKey::Uniq, OptionValue::Bool(flag)) => options.uniq = flag,
        (OptionKey::IncludeNil, OptionValue::Bool(flag)) => options.include_nil = flag,
        (OptionKey::JoinFilters, OptionValue::JoinFilters(filters)) => {
            check_join_filters(&filters)?;
            options.join_filters = filters;
        }
        (OptionKey::Sensitive, OptionValue::Bool(flag)) => options.sensitive = flag,
        (OptionKey::Tenant, OptionValue::Value(tenant)) => options.tenant = Some(tenant),
        (OptionKey::Authorize, OptionValue::Bool(flag)) => options.authorize = flag,

        (key, value) => return Err(wrong(&value, expected_shape(key))),
    }

    Ok(())
}

const fn expected_shape(key: OptionKey) -> &'static str {
    match key {
        OptionKey::Authorize
        | OptionKey::Filterable
        | OptionKey::IncludeNil
        | OptionKey::Sensitive
        | OptionKey::Sortable
        | OptionKey::Uniq => "boolean",
        OptionKey::AggName
        | OptionKey::Field
        | OptionKey::Implementation
        | OptionKey::ReadAction => "identifier",
        OptionKey::Arguments => "arguments",
        OptionKey::Constraints => "constraints",
        OptionKey::Default => "value or producer",
        OptionKey::Expr => "expression",
        OptionKey::ExprType | OptionKey::Type => "type",
        OptionKey::JoinFilters => "join filters",
        OptionKey::Path => "path",
        OptionKey::Query => "query",
        OptionKey::Tenant => "value",
    }
}

fn check_path(path: &[String]) -> Result<(), String> {
    if path.iter().any(String::is_empty) {
        return Err("path segments must not be empty".to_string());
    }

    Ok(())
}

fn check_join_filters(filters: &[(Vec<String>, Expr)]) -> Result<(), String> {
    let mut seen = BTreeSet::new();

    for (path, _) in filters {
        if path.is_empty() {
            return Err("join filter paths must not be empty".to_string());
        }
        check_path(path)?;
        if !seen.insert(path) {
            return Err(format!("duplicate join filter path [{}]", path.join(", ")));
        }
    }

    Ok(())
}

impl From<&AggregateFieldModel> for RawOptions {
    fn from(model: &AggregateFieldModel) -> Self {
        let mut options = Self::new()
            .path(model.path.iter().cloned())
            .uniq(model.uniq)
            .include_nil(model.include_nil)
            .filterable(model.filterable)
            .sortable(model.sortable)
            .sensitive(model.sensitive)
            .authorize(model.authorize);

        if let Some(field) = &model.field {
            options = options.field(field.clone());
        }
        if let Some(ty) = &model.ty {
            options = options.ty(ty.clone());
        }
        if let Some(constraints) = &model.constraints {
            options = options.constraints(constraints.clone());
        }
        if let Some(default) = &model.default {
            options = options.default_value(default.clone());
        }
        if let Some(action) = &model.read_action {
            options = options.read_action(action.clone());
        }
        if let Some(implementation) = &model.implementation {
            options = options.implementation(implementation.clone());
        }

        options
    }
}
