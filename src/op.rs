use core::{fmt, str::FromStr};

/// The kind of a tree operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Insert,
    Delete,
}

/// One insert or delete step of an exercise, with a fixed display form.
///
/// Operations are parsed or randomized by the surrounding tooling and
/// then replayed in order by a task engine; they are never mutated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Operation {
    kind: OperationKind,
    value: i64,
}

impl Operation {
    pub const fn new(kind: OperationKind, value: i64) -> Operation {
        Operation { kind, value }
    }

    /// Shorthand for an insert operation.
    pub const fn insert(value: i64) -> Operation {
        Operation::new(OperationKind::Insert, value)
    }

    /// Shorthand for a delete operation.
    pub const fn delete(value: i64) -> Operation {
        Operation::new(OperationKind::Delete, value)
    }

    pub const fn kind(&self) -> OperationKind {
        self.kind
    }

    pub const fn value(&self) -> i64 {
        self.value
    }

    /// Returns `true` if this operation is of the given kind.
    pub fn is_kind(&self, kind: OperationKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            OperationKind::Insert => write!(f, "insert {}", self.value),
            OperationKind::Delete => write!(f, "delete {}", self.value),
        }
    }
}

/// Error produced when parsing an operation from its `+value`/`-value`
/// notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOperationError {
    input: String,
}

impl fmt::Display for ParseOperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a valid operation: {:?}", self.input)
    }
}

impl std::error::Error for ParseOperationError {}

impl FromStr for Operation {
    type Err = ParseOperationError;

    /// Parses the `+5` (insert) / `-5` (delete) notation used by
    /// operation lists.
    fn from_str(s: &str) -> Result<Operation, ParseOperationError> {
        let err = || ParseOperationError {
            input: s.to_owned(),
        };

        let kind = match s.chars().next() {
            Some('+') => OperationKind::Insert,
            Some('-') => OperationKind::Delete,
            _ => return Err(err()),
        };
        let value = s[1..].trim().parse().map_err(|_| err())?;

        Ok(Operation::new(kind, value))
    }
}
