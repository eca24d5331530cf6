use serde_json::Value;
use std::cmp::Ordering;

use crate::gateway::Record;

/// Which records a listing returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Filter {
    #[default]
    All,
    /// `field == value` (`Null` matches missing or null fields).
    Eq { field: String, value: Value },
    /// Substring match of `needle`, OR-ed across `fields`.
    ///
    /// Only ASCII letters fold case, the same as SQLite's `LOWER` and `LIKE`.
    Contains { fields: Vec<String>, needle: String },
}

impl Filter {
    /// Evaluate the filter against a record.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Self::All => true,
            Self::Eq { field, value } => record.get(field).unwrap_or(&Value::Null) == value,
            Self::Contains { fields, needle } => {
                let needle = needle.to_ascii_lowercase();
                fields.iter().any(|field| {
                    record
                        .get(field)
                        .and_then(Value::as_str)
                        .is_some_and(|text| text.to_ascii_lowercase().contains(&needle))
                })
            }
        }
    }

    /// Field names the filter refers to.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Self::All => Vec::new(),
            Self::Eq { field, .. } => vec![field.as_str()],
            Self::Contains { fields, .. } => fields.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

/// A listing request: filter, ordering and an optional limit.
///
/// Records with a null or missing order field always sort last, whatever the
/// direction. Ties fall back to insertion order in the same direction, so a
/// descending listing shows the most recently inserted of equal records first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: Filter,
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn where_eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            filter: Filter::Eq {
                field: field.into(),
                value: value.into(),
            },
            ..Self::default()
        }
    }

    #[must_use]
    pub fn matching(fields: &[&str], needle: impl Into<String>) -> Self {
        Self {
            filter: Filter::Contains {
                fields: fields.iter().map(|f| (*f).to_string()).collect(),
                needle: needle.into(),
            },
            ..Self::default()
        }
    }

    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some((field.into(), direction));
        self
    }

    #[must_use]
    pub fn ascending(self, field: impl Into<String>) -> Self {
        self.order_by(field, Direction::Ascending)
    }

    #[must_use]
    pub fn descending(self, field: impl Into<String>) -> Self {
        self.order_by(field, Direction::Descending)
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Compare two records by this query's ordering.
    #[must_use]
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let Some((field, direction)) = &self.order_by else {
            return Ordering::Equal;
        };
        let left = a.get(field).filter(|v| !v.is_null());
        let right = b.get(field).filter(|v| !v.is_null());
        match (left, right) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(l), Some(r)) => {
                let ordering = compare_values(l, r);
                match direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            }
        }
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}
