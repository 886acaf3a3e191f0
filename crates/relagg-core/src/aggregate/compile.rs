use crate::{
    aggregate::{
        descriptor::{AggregateDescriptor, AggregateField, CalculationRef, CalculationSource},
        join_filter::parse_join_filters,
        kind::{ResolvedType, default_for_kind, parse_kind, resolve_result_type},
        options::{AggregateOptions, OptionKey, RawOptions},
        path::{resolve_relationship_chain, validate_path},
        scope::build_scoped_query,
    },
    error::CompileError,
    filter::FilterParser,
    obs::sink::{CompileEvent, CompileSink, GLOBAL_METRICS_SINK},
    query::QueryContext,
    traits::ResourceMetadata,
};
use relagg_schema::{
    node::{CalculationModel, FieldSource},
    types::{AggregateKind, Constraints},
    value::Value,
};
use std::collections::BTreeMap;

///
/// AggregateCompiler
///
/// Compiles aggregate requests into `AggregateDescriptor`s against a
/// read-only catalog. Holds no state of its own between calls, so a single
/// compiler can serve any number of requests.
///

pub struct AggregateCompiler<'a, M: ResourceMetadata, P: FilterParser> {
    metadata: &'a M,
    parser: &'a P,
    sink: &'a dyn CompileSink,
}

// (resource, field) pairs of aggregate fields currently being compiled
type Visiting = Vec<(String, String)>;

impl<'a, M: ResourceMetadata, P: FilterParser> AggregateCompiler<'a, M, P> {
    #[must_use]
    pub fn new(metadata: &'a M, parser: &'a P) -> Self {
        Self {
            metadata,
            parser,
            sink: &GLOBAL_METRICS_SINK,
        }
    }

    /// Route compile events to `sink` instead of the global metrics.
    #[must_use]
    pub fn with_sink(mut self, sink: &'a dyn CompileSink) -> Self {
        self.sink = sink;
        self
    }

    /// Compile an aggregate named `name` on `resource`.
    ///
    /// # Panics
    ///
    /// A `custom` aggregate without an explicit `type` or `implementation`
    /// is a programming error and panics.
    pub fn compile(
        &self,
        resource: &str,
        name: &str,
        kind: AggregateKind,
        options: RawOptions,
    ) -> Result<AggregateDescriptor, CompileError> {
        ensure_custom_preconditions(resource, name, kind, &options);

        self.observe(resource, name, || {
            self.compile_inner(resource, name, kind, options, &mut Visiting::new())
        })
    }

    /// As `compile`, with the kind given by name.
    ///
    /// # Panics
    ///
    /// Same as `compile`.
    pub fn compile_by_name(
        &self,
        resource: &str,
        name: &str,
        kind: &str,
        options: RawOptions,
    ) -> Result<AggregateDescriptor, CompileError> {
        let kind = parse_kind(kind);
        if let Ok(kind) = kind {
            ensure_custom_preconditions(resource, name, kind, &options);
        }

        self.observe(resource, name, || {
            let kind = kind?;
            self.compile_inner(resource, name, kind, options, &mut Visiting::new())
        })
    }

    /// Compile an aggregate field declared on `resource` in the catalog.
    ///
    /// # Panics
    ///
    /// Same as `compile`.
    pub fn compile_declared(
        &self,
        resource: &str,
        field: &str,
    ) -> Result<AggregateDescriptor, CompileError> {
        let declared = match self.metadata.field(resource, field).map(|model| &model.source) {
            Some(FieldSource::Aggregate(agg)) => {
                let options = RawOptions::from(agg);
                ensure_custom_preconditions(resource, field, agg.kind, &options);
                Some((agg.kind, options))
            }
            _ => None,
        };

        self.observe(resource, field, || {
            let Some((kind, options)) = declared else {
                return Err(CompileError::NoSuchField {
                    resource: resource.to_string(),
                    field: field.to_string(),
                });
            };

            let mut visiting = vec![(resource.to_string(), field.to_string())];
            self.compile_inner(resource, field, kind, options, &mut visiting)
        })
    }

    /// Compile, treating any failure as fatal.
    ///
    /// # Panics
    ///
    /// Panics with the rendered error when compilation fails.
    #[must_use]
    pub fn compile_or_fatal(
        &self,
        resource: &str,
        name: &str,
        kind: AggregateKind,
        options: RawOptions,
    ) -> AggregateDescriptor {
        match self.compile(resource, name, kind, options) {
            Ok(descriptor) => descriptor,
            Err(err) => panic!("cannot compile aggregate '{name}' on '{resource}': {err}"),
        }
    }

    fn observe(
        &self,
        resource: &str,
        name: &str,
        f: impl FnOnce() -> Result<AggregateDescriptor, CompileError>,
    ) -> Result<AggregateDescriptor, CompileError> {
        self.sink.record(CompileEvent::Start { resource, name });

        let result = f();
        match &result {
            Ok(descriptor) => self.sink.record(CompileEvent::Finish {
                resource,
                kind: descriptor.kind(),
                result_type: descriptor.result_type(),
            }),
            Err(error) => self.sink.record(CompileEvent::Failed { resource, error }),
        }

        result
    }

    fn compile_inner(
        &self,
        resource: &str,
        name: &str,
        kind: AggregateKind,
        options: RawOptions,
        visiting: &mut Visiting,
    ) -> Result<AggregateDescriptor, CompileError> {
        // Phase 1: option schema
        let options = options.validate().map_err(CompileError::Schema)?;

        if self.metadata.resource(resource).is_none() {
            return Err(CompileError::UnknownResource {
                resource: resource.to_string(),
            });
        }

        let AggregateOptions {
            path,
            agg_name,
            query,
            field,
            expr,
            expr_type,
            arguments,
            default,
            filterable,
            sortable,
            ty,
            constraints,
            implementation,
            read_action,
            uniq,
            include_nil,
            join_filters,
            sensitive,
            tenant,
            authorize,
        } = options;

        // Phase 2: destination and aggregated field
        let chain = resolve_relationship_chain(self.metadata, resource, &path)?;
        let related = chain
            .last()
            .map_or(resource, |rel| rel.destination.as_str())
            .to_string();

        let field = match (field, expr) {
            (Some(_), Some(_)) => return Err(CompileError::ConflictingFieldAndExpr),
            (None, Some(expr)) => {
                let ty = expr_type.ok_or(CompileError::MissingExprType)?;
                Some(AggregateField::Calculation(CalculationRef {
                    name: name.to_string(),
                    ty,
                    constraints: Constraints::new(),
                    arguments,
                    source: CalculationSource::Inline(expr),
                }))
            }
            (Some(field), None) => {
                Some(self.resolve_field(&related, &field, arguments, visiting)?)
            }
            (None, None) => None,
        };

        // Phase 3: read action, then kind and path checks
        let read_action =
            read_action.or_else(|| chain.last().and_then(|rel| rel.read_action.clone()));

        if uniq && !kind.supports_uniq() {
            return Err(CompileError::UnsupportedUniq { kind });
        }

        validate_path(self.metadata, resource, &path)?;

        // Phase 4: result type; an explicit type always wins
        let resolved = match ty {
            Some(ty) => ResolvedType::new(ty, constraints.unwrap_or_else(Constraints::new)),
            None => {
                let attribute = field.as_ref().map(AggregateField::resolved_type);
                let mut resolved = resolve_result_type(kind, None, attribute.as_ref())?;
                if let Some(constraints) = constraints {
                    resolved.constraints = constraints;
                }
                resolved
            }
        };

        // Phase 5: scope
        let ctx = QueryContext::new(self.metadata, self.parser);
        let mut scoped_query = build_scoped_query(&ctx, resource, &related, query.as_ref())?;
        if !scoped_query.is_valid() {
            return Err(CompileError::QueryBuild {
                errors: scoped_query.errors().to_vec(),
            });
        }
        if let Some(tenant) = tenant {
            scoped_query = scoped_query.set_tenant(tenant);
        }

        let join_filters = parse_join_filters(self.metadata, self.parser, resource, &join_filters)?;

        // Phase 6: assemble
        let default_value = default.map_or_else(|| default_for_kind(kind), |d| d.resolve());

        Ok(AggregateDescriptor {
            name: name.to_string(),
            resource: resource.to_string(),
            related,
            relationship_path: path,
            kind,
            field,
            result_type: resolved.ty,
            constraints: resolved.constraints,
            default_value,
            scoped_query,
            join_filters,
            implementation,
            read_action,
            agg_name,
            authorize,
            include_nil,
            uniq,
            filterable,
            sortable,
            sensitive,
        })
    }

    // Resolve `field` on the related resource. Aggregate fields compile
    // recursively with the same compiler.
    fn resolve_field(
        &self,
        related: &str,
        field: &str,
        arguments: BTreeMap<String, Value>,
        visiting: &mut Visiting,
    ) -> Result<AggregateField, CompileError> {
        let model =
            self.metadata
                .field(related, field)
                .ok_or_else(|| CompileError::NoSuchField {
                    resource: related.to_string(),
                    field: field.to_string(),
                })?;

        match &model.source {
            FieldSource::Attribute { ty, constraints } => Ok(AggregateField::Attribute {
                name: model.name.clone(),
                ty: ty.clone(),
                constraints: constraints.clone(),
            }),
            FieldSource::Calculation(calc) => Ok(AggregateField::Calculation(CalculationRef {
                name: model.name.clone(),
                ty: calc.ty.clone(),
                constraints: calc.constraints.clone(),
                arguments: merge_arguments(calc, arguments),
                source: CalculationSource::Declared {
                    implementation: calc.implementation.clone(),
                },
            })),
            FieldSource::Aggregate(agg) => {
                let key = (related.to_string(), field.to_string());
                if visiting.contains(&key) {
                    return Err(CompileError::RecursiveAggregateField {
                        resource: key.0,
                        field: key.1,
                    });
                }

                let options = RawOptions::from(agg);
                ensure_custom_preconditions(related, field, agg.kind, &options);

                visiting.push(key);
                let nested = self.compile_inner(related, field, agg.kind, options, visiting);
                visiting.pop();

                Ok(AggregateField::Aggregate(Box::new(nested?)))
            }
        }
    }
}

// Declared argument defaults, overlaid with the supplied arguments.
fn merge_arguments(
    calc: &CalculationModel,
    supplied: BTreeMap<String, Value>,
) -> BTreeMap<String, Value> {
    let mut merged: BTreeMap<String, Value> = calc
        .arguments
        .iter()
        .filter_map(|arg| Some((arg.name.clone(), arg.default.clone()?)))
        .collect();
    merged.extend(supplied);

    merged
}

// Runs before any compile event is emitted.
fn ensure_custom_preconditions(
    resource: &str,
    name: &str,
    kind: AggregateKind,
    options: &RawOptions,
) {
    if kind != AggregateKind::Custom {
        return;
    }

    assert!(
        options.is_set(OptionKey::Type),
        "custom aggregate '{name}' on '{resource}' requires an explicit type"
    );
    assert!(
        options.is_set(OptionKey::Implementation),
        "custom aggregate '{name}' on '{resource}' requires an implementation"
    );
}
