use crate::params::Params;

use relish_core::Value;

use std::fmt;

/// Comparison operator for a single predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    Like,
    In,
    NotIn,
    IsNull,
    IsNotNull,
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Comparator::Eq => "=",
            Comparator::Ne => "!=",
            Comparator::Gt => ">",
            Comparator::Lt => "<",
            Comparator::Ge => ">=",
            Comparator::Le => "<=",
            Comparator::Like => "LIKE",
            Comparator::In => "IN",
            Comparator::NotIn => "NOT IN",
            Comparator::IsNull => "IS NULL",
            Comparator::IsNotNull => "IS NOT NULL",
        })
    }
}

/// Logical connective joining sibling filters within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operator {
    #[default]
    And,
    Or,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operator::And => "AND",
            Operator::Or => "OR",
        })
    }
}

/// One node of a filter tree.
///
/// `Single` compares a column against one value, `Multi` against a value
/// list (`IN` / `NOT IN`), and `Group` nests a sub-tree with its own
/// connective.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Single {
        key: String,
        comparator: Comparator,
        value: Value,
    },
    Multi {
        key: String,
        comparator: Comparator,
        values: Vec<Value>,
    },
    Group(Group),
}

impl Filter {
    fn single(key: impl Into<String>, comparator: Comparator, value: impl Into<Value>) -> Filter {
        Filter::Single {
            key: key.into(),
            comparator,
            value: value.into(),
        }
    }

    pub fn eq(key: impl Into<String>, value: impl Into<Value>) -> Filter {
        Filter::single(key, Comparator::Eq, value)
    }

    pub fn ne(key: impl Into<String>, value: impl Into<Value>) -> Filter {
        Filter::single(key, Comparator::Ne, value)
    }

    pub fn gt(key: impl Into<String>, value: impl Into<Value>) -> Filter {
        Filter::single(key, Comparator::Gt, value)
    }

    pub fn lt(key: impl Into<String>, value: impl Into<Value>) -> Filter {
        Filter::single(key, Comparator::Lt, value)
    }

    pub fn ge(key: impl Into<String>, value: impl Into<Value>) -> Filter {
        Filter::single(key, Comparator::Ge, value)
    }

    pub fn le(key: impl Into<String>, value: impl Into<Value>) -> Filter {
        Filter::single(key, Comparator::Le, value)
    }

    pub fn like(key: impl Into<String>, value: impl Into<Value>) -> Filter {
        Filter::single(key, Comparator::Like, value)
    }

    pub fn is_null(key: impl Into<String>) -> Filter {
        Filter::single(key, Comparator::IsNull, Value::Null)
    }

    pub fn is_not_null(key: impl Into<String>) -> Filter {
        Filter::single(key, Comparator::IsNotNull, Value::Null)
    }

    pub fn in_list<I, V>(key: impl Into<String>, values: I) -> Filter
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Filter::Multi {
            key: key.into(),
            comparator: Comparator::In,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn not_in<I, V>(key: impl Into<String>, values: I) -> Filter
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Filter::Multi {
            key: key.into(),
            comparator: Comparator::NotIn,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Compiles this node, returning the emitted fragment. An empty string
    /// means the node was skipped and must not consume a connective.
    fn to_sql(&self, params: &mut impl Params) -> String {
        match self {
            Filter::Single {
                key,
                comparator,
                value,
            } => match comparator {
                Comparator::IsNull | Comparator::IsNotNull => format!("{key} {comparator}"),
                Comparator::In | Comparator::NotIn => {
                    tracing::warn!(
                        key = key.as_str(),
                        "single-value filter does not support {comparator}, use Filter::in_list / Filter::not_in",
                    );
                    String::new()
                }
                _ => {
                    let placeholder = params.push(value.clone());
                    format!("{key} {comparator} {placeholder}")
                }
            },
            Filter::Multi {
                key,
                comparator,
                values,
            } => match comparator {
                Comparator::In | Comparator::NotIn if !values.is_empty() => {
                    let mut fragment = format!("{key} {comparator} (");
                    for (i, value) in values.iter().enumerate() {
                        if i > 0 {
                            fragment.push_str(", ");
                        }
                        let placeholder = params.push(value.clone());
                        fragment.push_str(&placeholder.to_string());
                    }
                    fragment.push(')');
                    fragment
                }
                _ => String::new(),
            },
            Filter::Group(group) => {
                let fragment = group.to_sql(params);
                if fragment.is_empty() {
                    fragment
                } else {
                    format!("({fragment})")
                }
            }
        }
    }
}

/// A filter tree: sibling filters joined by one connective.
///
/// Sibling order is preserved in the compiled output, which makes the
/// generated SQL deterministic for a given tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    pub operator: Operator,
    pub filters: Vec<Filter>,
}

impl Group {
    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Group {
        Group {
            operator: Operator::And,
            filters: filters.into_iter().collect(),
        }
    }

    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Group {
        Group {
            operator: Operator::Or,
            filters: filters.into_iter().collect(),
        }
    }

    pub fn push(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Compiles the tree into a `WHERE`-clause fragment, pushing each bound
    /// value onto `params` in emission order. Returns the empty string when
    /// nothing was emitted; the caller then leaves the `WHERE` keyword out.
    pub fn to_sql(&self, params: &mut impl Params) -> String {
        let mut fragment = String::new();

        for filter in &self.filters {
            let part = filter.to_sql(params);
            if part.is_empty() {
                continue;
            }

            if !fragment.is_empty() {
                fragment.push(' ');
                fragment.push_str(&self.operator.to_string());
                fragment.push(' ');
            }

            fragment.push_str(&part);
        }

        fragment
    }

    /// Narrows this filter so rows with a non-null tombstone column are
    /// excluded: `(original) AND tombstone IS NULL`. An empty tree reduces
    /// to the tombstone predicate alone.
    pub fn excluding_soft_deleted(self, tombstone: &str) -> Group {
        if self.filters.is_empty() {
            return Group::and([Filter::is_null(tombstone)]);
        }

        Group::and([Filter::Group(self), Filter::is_null(tombstone)])
    }
}

impl From<Filter> for Group {
    fn from(filter: Filter) -> Group {
        Group::and([filter])
    }
}
