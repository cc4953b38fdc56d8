use std::fmt;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An error raised by the repository driver.
///
/// Each failure mode has a constructor and an `is_*` predicate so callers
/// can branch on the kind without destructuring. Driver, scan, and relation
/// failures keep their cause reachable through [`std::error::Error::source`].
pub struct Error {
    kind: ErrorKind,
}

enum ErrorKind {
    /// A single-row lookup matched nothing, or a hard delete removed no rows.
    RecordNotFound,

    /// The requested `ORDER BY` column is not in the repository whitelist.
    InvalidOrderColumn { column: String },

    /// A relation path names a loader that was never registered.
    UnknownRelation { name: String },

    /// An entity could not resolve a field by name.
    UnknownField { field: String },

    /// `add_relation` was called twice for the same name.
    DuplicateRelation { name: String },

    /// The opaque connection handle is not a PostgreSQL client.
    ConnectionHandle,

    /// The connection URL could not be parsed or is missing a component.
    InvalidConnectionUrl { message: String },

    /// A statement could not be built from its inputs.
    InvalidStatement { message: String },

    /// The database driver reported a failure.
    Driver { source: BoxError },

    /// A result row could not be decoded into an entity.
    Scan { message: String, source: Option<BoxError> },

    /// A relation loader failed while hydrating parents.
    Relation { name: String, source: Box<Error> },
}

impl Error {
    /// Creates a record not found error.
    pub fn record_not_found() -> Error {
        ErrorKind::RecordNotFound.into()
    }

    /// Returns `true` if this error is a record not found error.
    pub fn is_record_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::RecordNotFound)
    }

    /// Creates an invalid order column error.
    pub fn invalid_order_column(column: impl Into<String>) -> Error {
        ErrorKind::InvalidOrderColumn {
            column: column.into(),
        }
        .into()
    }

    pub fn is_invalid_order_column(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidOrderColumn { .. })
    }

    /// Creates an unknown relation error.
    pub fn unknown_relation(name: impl Into<String>) -> Error {
        ErrorKind::UnknownRelation { name: name.into() }.into()
    }

    pub fn is_unknown_relation(&self) -> bool {
        matches!(self.kind, ErrorKind::UnknownRelation { .. })
    }

    /// Creates an unknown field error.
    pub fn unknown_field(field: impl Into<String>) -> Error {
        ErrorKind::UnknownField {
            field: field.into(),
        }
        .into()
    }

    pub fn is_unknown_field(&self) -> bool {
        matches!(self.kind, ErrorKind::UnknownField { .. })
    }

    /// Creates a duplicate relation error.
    pub fn duplicate_relation(name: impl Into<String>) -> Error {
        ErrorKind::DuplicateRelation { name: name.into() }.into()
    }

    pub fn is_duplicate_relation(&self) -> bool {
        matches!(self.kind, ErrorKind::DuplicateRelation { .. })
    }

    /// Creates a connection handle assertion error.
    pub fn connection_handle() -> Error {
        ErrorKind::ConnectionHandle.into()
    }

    pub fn is_connection_handle(&self) -> bool {
        matches!(self.kind, ErrorKind::ConnectionHandle)
    }

    /// Creates an invalid connection URL error.
    pub fn invalid_connection_url(message: impl Into<String>) -> Error {
        ErrorKind::InvalidConnectionUrl {
            message: message.into(),
        }
        .into()
    }

    pub fn is_invalid_connection_url(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidConnectionUrl { .. })
    }

    /// Creates an invalid statement error.
    pub fn invalid_statement(message: impl Into<String>) -> Error {
        ErrorKind::InvalidStatement {
            message: message.into(),
        }
        .into()
    }

    pub fn is_invalid_statement(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidStatement { .. })
    }

    /// Wraps a driver-level failure.
    pub fn driver(source: impl Into<BoxError>) -> Error {
        ErrorKind::Driver {
            source: source.into(),
        }
        .into()
    }

    pub fn is_driver(&self) -> bool {
        matches!(self.kind, ErrorKind::Driver { .. })
    }

    /// Creates a row decode error.
    pub fn scan(message: impl Into<String>) -> Error {
        ErrorKind::Scan {
            message: message.into(),
            source: None,
        }
        .into()
    }

    /// Creates a row decode error with its underlying cause.
    pub fn scan_caused_by(message: impl Into<String>, source: impl Into<BoxError>) -> Error {
        ErrorKind::Scan {
            message: message.into(),
            source: Some(source.into()),
        }
        .into()
    }

    pub fn is_scan(&self) -> bool {
        matches!(self.kind, ErrorKind::Scan { .. })
    }

    /// Annotates a loader failure with the relation it was hydrating.
    pub fn relation(name: impl Into<String>, source: Error) -> Error {
        ErrorKind::Relation {
            name: name.into(),
            source: Box::new(source),
        }
        .into()
    }

    pub fn is_relation(&self) -> bool {
        matches!(self.kind, ErrorKind::Relation { .. })
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error { kind }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::RecordNotFound => f.write_str("record not found"),
            ErrorKind::InvalidOrderColumn { column } => {
                write!(f, "invalid order column: {column}")
            }
            ErrorKind::UnknownRelation { name } => {
                write!(f, "relation loader not found for relation: {name}")
            }
            ErrorKind::UnknownField { field } => {
                write!(f, "field not found on entity: {field}")
            }
            ErrorKind::DuplicateRelation { name } => {
                write!(f, "relation loader already exists for relation: {name}")
            }
            ErrorKind::ConnectionHandle => {
                f.write_str("connection handle is not a PostgreSQL client")
            }
            ErrorKind::InvalidConnectionUrl { message } => {
                write!(f, "invalid connection URL: {message}")
            }
            ErrorKind::InvalidStatement { message } => {
                write!(f, "invalid statement: {message}")
            }
            ErrorKind::Driver { source } => write!(f, "driver error: {source}"),
            ErrorKind::Scan { message, .. } => {
                write!(f, "failed to scan data: {message}")
            }
            ErrorKind::Relation { name, source } => {
                write!(f, "failed to load relation {name}: {source}")
            }
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error({self})")
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Driver { source } => Some(source.as_ref()),
            ErrorKind::Scan {
                source: Some(source),
                ..
            } => Some(source.as_ref()),
            ErrorKind::Relation { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates_match_constructors() {
        assert!(Error::record_not_found().is_record_not_found());
        assert!(Error::invalid_order_column("rank").is_invalid_order_column());
        assert!(Error::unknown_relation("user").is_unknown_relation());
        assert!(Error::unknown_field("user_id").is_unknown_field());
        assert!(Error::duplicate_relation("roles").is_duplicate_relation());
        assert!(Error::connection_handle().is_connection_handle());
        assert!(Error::invalid_statement("boom").is_invalid_statement());
        assert!(!Error::record_not_found().is_driver());
    }

    #[test]
    fn display_includes_context() {
        assert_eq!(Error::record_not_found().to_string(), "record not found");
        assert_eq!(
            Error::invalid_order_column("rank").to_string(),
            "invalid order column: rank"
        );
        let inner = Error::record_not_found();
        assert_eq!(
            Error::relation("user", inner).to_string(),
            "failed to load relation user: record not found"
        );
    }

    #[test]
    fn sources_chain() {
        use std::error::Error as _;

        let err = Error::relation("roles", Error::record_not_found());
        assert!(err.source().is_some());
        assert!(Error::record_not_found().source().is_none());
    }
}
