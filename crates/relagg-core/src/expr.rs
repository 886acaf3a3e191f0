//! Expression AST shared by filters, join filters and inline calculations.
//!
//! The AST is schema-agnostic; field references are only bound to resources
//! when a `FilterParser` resolves them.

use relagg_schema::value::Value;
use std::{collections::BTreeSet, fmt};

///
/// FieldRef
///
/// Reference to a field, optionally through relationships, evaluated in the
/// scope `parent` levels up the ancestor stack (0 is the filtered resource).
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct FieldRef {
    pub parent: usize,
    pub path: Vec<String>,
    pub name: String,
}

impl FieldRef {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            parent: 0,
            path: Vec::new(),
            name: name.into(),
        }
    }

    /// Reference the same field one ancestor further out.
    #[must_use]
    pub const fn parent(mut self) -> Self {
        self.parent += 1;
        self
    }

    /// Reach the field through a relationship path first.
    #[must_use]
    pub fn through<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.path = path.into_iter().map(Into::into).collect();
        self
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.parent {
            write!(f, "parent(")?;
        }
        for hop in &self.path {
            write!(f, "{hop}.")?;
        }
        write!(f, "{}", self.name)?;
        for _ in 0..self.parent {
            write!(f, ")")?;
        }

        Ok(())
    }
}

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
}

///
/// ArithOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

///
/// Expr
///

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Literal(Value),
    Field(FieldRef),
    Compare {
        op: CompareOp,
        left: Box<Self>,
        right: Box<Self>,
    },
    Arith {
        op: ArithOp,
        left: Box<Self>,
        right: Box<Self>,
    },
    IsNull(Box<Self>),
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),
}

impl Expr {
    /// Conjoin two expressions, flattening nested `And`s.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::And(mut left), Self::And(right)) => {
                left.extend(right);
                Self::And(left)
            }
            (Self::And(mut left), right) => {
                left.push(right);
                Self::And(left)
            }
            (left, right) => Self::And(vec![left, right]),
        }
    }

    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::Or(vec![self, other])
    }

    /// Every field reference in the expression, in first-seen order.
    #[must_use]
    pub fn field_refs(&self) -> Vec<&FieldRef> {
        let mut seen = BTreeSet::new();
        let mut refs = Vec::new();
        self.collect_refs(&mut seen, &mut refs);

        refs
    }

    fn collect_refs<'a>(&'a self, seen: &mut BTreeSet<&'a FieldRef>, out: &mut Vec<&'a FieldRef>) {
        match self {
            Self::Literal(_) => {}
            Self::Field(field) => {
                if seen.insert(field) {
                    out.push(field);
                }
            }
            Self::Compare { left, right, .. } | Self::Arith { left, right, .. } => {
                left.collect_refs(seen, out);
                right.collect_refs(seen, out);
            }
            Self::IsNull(inner) | Self::Not(inner) => inner.collect_refs(seen, out),
            Self::And(children) | Self::Or(children) => {
                for child in children {
                    child.collect_refs(seen, out);
                }
            }
        }
    }
}

impl From<FieldRef> for Expr {
    fn from(field: FieldRef) -> Self {
        Self::Field(field)
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Self::Literal(Value::Bool(value))
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Self::Literal(Value::from(value))
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self::Literal(Value::Int(value))
    }
}

///
/// Builders
///

#[must_use]
pub fn field(name: impl Into<String>) -> Expr {
    Expr::Field(FieldRef::new(name))
}

/// Field on the immediate ancestor scope.
#[must_use]
pub fn parent_field(name: impl Into<String>) -> Expr {
    Expr::Field(FieldRef::new(name).parent())
}

#[must_use]
pub fn lit(value: impl Into<Value>) -> Expr {
    Expr::Literal(value.into())
}

fn compare(op: CompareOp, left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    Expr::Compare {
        op,
        left: Box::new(left.into()),
        right: Box::new(right.into()),
    }
}

#[must_use]
pub fn eq(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    compare(CompareOp::Eq, left, right)
}

#[must_use]
pub fn ne(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    compare(CompareOp::Ne, left, right)
}

#[must_use]
pub fn lt(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    compare(CompareOp::Lt, left, right)
}

#[must_use]
pub fn lte(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    compare(CompareOp::Lte, left, right)
}

#[must_use]
pub fn gt(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    compare(CompareOp::Gt, left, right)
}

#[must_use]
pub fn gte(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    compare(CompareOp::Gte, left, right)
}

#[must_use]
pub fn in_(left: impl Into<Expr>, values: Vec<Value>) -> Expr {
    compare(CompareOp::In, left, Value::List(values))
}

#[must_use]
pub fn is_null(operand: impl Into<Expr>) -> Expr {
    Expr::IsNull(Box::new(operand.into()))
}

#[must_use]
pub fn not(operand: impl Into<Expr>) -> Expr {
    Expr::Not(Box::new(operand.into()))
}

#[must_use]
pub fn arith(op: ArithOp, left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    Expr::Arith {
        op,
        left: Box::new(left.into()),
        right: Box::new(right.into()),
    }
}
