use serde_json::Value;

/// One raw record as returned by the remote store.
pub type Row = serde_json::Map<String, Value>;

/// A single field predicate. Filter lists are AND-combined in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq { field: String, value: Value },
    IsNull { field: String },
    In { field: String, values: Vec<Value> },
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn is_null(field: impl Into<String>) -> Self {
        Self::IsNull {
            field: field.into(),
        }
    }

    pub fn one_of<V: Into<Value>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Self::Eq { field, .. } | Self::IsNull { field } | Self::In { field, .. } => field,
        }
    }

    /// Evaluates the predicate against a row. A missing field reads as null.
    pub fn matches(&self, row: &Row) -> bool {
        let actual = row.get(self.field()).unwrap_or(&Value::Null);
        match self {
            Self::Eq { value, .. } => !actual.is_null() && actual == value,
            Self::IsNull { .. } => actual.is_null(),
            Self::In { values, .. } => !actual.is_null() && values.iter().any(|v| v == actual),
        }
    }
}
