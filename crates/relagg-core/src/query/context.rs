use crate::{
    expr::Expr,
    filter::FilterParser,
    query::{Query, QueryError, QueryOption, SortKey},
    traits::ResourceMetadata,
};

///
/// QueryContext
///
/// Pairs catalog metadata with a filter parser so build options can be
/// checked against the resource they target.
///

pub struct QueryContext<'a, M: ResourceMetadata, P: FilterParser> {
    metadata: &'a M,
    parser: &'a P,
}

impl<'a, M: ResourceMetadata, P: FilterParser> QueryContext<'a, M, P> {
    #[must_use]
    pub const fn new(metadata: &'a M, parser: &'a P) -> Self {
        Self { metadata, parser }
    }

    #[must_use]
    pub const fn metadata(&self) -> &'a M {
        self.metadata
    }

    /// Build a query over `resource` from options. Invalid options are
    /// recorded on the returned query rather than failing the call.
    #[must_use]
    pub fn build(&self, resource: &str, options: &[QueryOption]) -> Query {
        let mut query = Query::new(resource);
        if self.metadata.resource(resource).is_none() {
            return query.with_error(QueryError::UnknownResource {
                resource: resource.to_string(),
            });
        }

        for option in options {
            query = match option {
                QueryOption::Filter(expr) => self.filter(query, expr, &[]),
                QueryOption::Sort(keys) => self.sort(query, keys),
                QueryOption::Limit(limit) => query.limit(*limit),
                QueryOption::Offset(offset) => query.offset(*offset),
                QueryOption::Load(names) => self.load(query, names),
                QueryOption::Tenant(tenant) => query.set_tenant(tenant.clone()),
            };
        }

        query
    }

    /// Parse `expr` against the query's resource and conjoin it.
    #[must_use]
    pub fn filter(&self, query: Query, expr: &Expr, parent_stack: &[String]) -> Query {
        match self.parser.parse(query.resource(), expr, parent_stack) {
            Ok(parsed) => query.filter(parsed),
            Err(err) => query.with_error(QueryError::Filter(err)),
        }
    }

    fn sort(&self, query: Query, keys: &[SortKey]) -> Query {
        let unknown: Vec<_> = keys
            .iter()
            .filter(|key| self.metadata.field(query.resource(), &key.field).is_none())
            .map(|key| QueryError::UnknownSortField {
                resource: query.resource().to_string(),
                field: key.field.clone(),
            })
            .collect();

        unknown
            .into_iter()
            .fold(query.sort(keys.iter().cloned()), Query::with_error)
    }

    fn load(&self, query: Query, names: &[String]) -> Query {
        let resource = query.resource().to_string();
        let mut query = query.load(names.iter().cloned());

        for name in names {
            let known = self.metadata.field(&resource, name).is_some()
                || self.metadata.relationship(&resource, name).is_some();
            if !known {
                query = query.with_error(QueryError::UnknownLoad {
                    resource: resource.clone(),
                    name: name.clone(),
                });
            }
        }

        query
    }
}
