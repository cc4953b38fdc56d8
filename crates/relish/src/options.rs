use relish_sql::Direction;

/// Per-operation options.
///
/// The defaults mirror what callers want most of the time: project every
/// column, no paging, generate a `"id"` primary key on create, and stamp
/// `created_at` / `updated_at`.
#[derive(Debug, Clone)]
pub struct Options {
    /// Explicit projection; `None` selects `*`.
    pub columns: Option<Vec<String>>,

    /// Maximum rows returned; `0` leaves the keyword out.
    pub limit: u64,

    /// Rows skipped; `0` leaves the keyword out.
    pub offset: u64,

    /// Sort column, validated against the repository whitelist.
    pub order_column: Option<String>,

    pub order_dir: Direction,

    /// Dotted relation paths to hydrate, e.g. `"user.roles"`.
    pub relations: Vec<String>,

    /// Column receiving the generated id on create.
    pub primary_key: String,

    /// Whether create generates and inserts a primary key.
    pub insert_primary_key: bool,

    /// Whether create stamps `created_at` / `updated_at`.
    pub timestamp_fields: bool,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            columns: None,
            limit: 0,
            offset: 0,
            order_column: None,
            order_dir: Direction::Asc,
            relations: Vec::new(),
            primary_key: "id".to_string(),
            insert_primary_key: true,
            timestamp_fields: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = Options::default();
        assert_eq!(opts.primary_key, "id");
        assert!(opts.insert_primary_key);
        assert!(opts.timestamp_fields);
        assert_eq!(opts.limit, 0);
        assert_eq!(opts.offset, 0);
        assert_eq!(opts.order_dir, Direction::Asc);
        assert!(opts.columns.is_none());
        assert!(opts.relations.is_empty());
    }
}
