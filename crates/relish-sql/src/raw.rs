use std::fmt;

/// An opaque SQL fragment interpolated literally into an `UPDATE` SET
/// clause instead of being bound as a parameter.
///
/// No sanitization is performed; the caller owns the fragment's safety.
/// Typical use is a server-side expression such as `position + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSql(String);

impl RawSql {
    pub fn new(fragment: impl Into<String>) -> RawSql {
        RawSql(fragment.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RawSql {
    fn from(fragment: &str) -> RawSql {
        RawSql(fragment.to_string())
    }
}

impl From<String> for RawSql {
    fn from(fragment: String) -> RawSql {
        RawSql(fragment)
    }
}
