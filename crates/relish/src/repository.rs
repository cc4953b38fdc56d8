use crate::{
    connection::{client_from, Adapter},
    entity::Entity,
    options::Options,
    relation::{split_path, RelationLoader},
    scan::scan_row,
};

use chrono::Utc;
use relish_core::{Error, Result, Value};
use relish_sql::{
    Assignment, Count, Delete, Direction, Group, Insert, InsertMany, Payload, Select, Update,
};

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};

use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, Row};

/// Logs a statement and its argument vector when `SQL_DEBUG=true`.
pub(crate) fn debug_sql(sql: &str, params: &[Value]) {
    static SQL_DEBUG: OnceLock<bool> = OnceLock::new();

    let enabled = *SQL_DEBUG.get_or_init(|| {
        std::env::var("SQL_DEBUG")
            .map(|value| value == "true")
            .unwrap_or(false)
    });

    if enabled {
        tracing::debug!(target: "relish::sql", %sql, ?params, "executing statement");
    }
}

/// A typed repository over one table.
///
/// The repository owns no per-request state: it holds the shared client,
/// the table binding, the `ORDER BY` whitelist, the optional soft-delete
/// column, and the registered relation loaders. Operations run concurrently
/// from any number of callers; cancelling (dropping) an operation's future
/// aborts its in-flight round-trip.
pub struct Repository<T: Entity> {
    client: Arc<Client>,
    table: String,
    order_columns: HashSet<String>,
    soft_delete: Option<String>,
    loaders: HashMap<String, Arc<dyn RelationLoader<T>>>,
}

impl<T: Entity> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Repository {
            client: self.client.clone(),
            table: self.table.clone(),
            order_columns: self.order_columns.clone(),
            soft_delete: self.soft_delete.clone(),
            loaders: self.loaders.clone(),
        }
    }
}

/// Configures a [`Repository`] before binding it to a connection.
pub struct Builder<T: Entity> {
    table: String,
    order_columns: HashSet<String>,
    soft_delete: Option<String>,
    loaders: HashMap<String, Arc<dyn RelationLoader<T>>>,
}

impl<T: Entity> std::fmt::Debug for Builder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("table", &self.table)
            .field("order_columns", &self.order_columns)
            .field("soft_delete", &self.soft_delete)
            .field("loaders", &self.loaders.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<T: Entity> Builder<T> {
    /// Whitelists one column for `ORDER BY`.
    pub fn order_column(mut self, column: impl Into<String>) -> Self {
        self.order_columns.insert(column.into());
        self
    }

    /// Whitelists several columns for `ORDER BY`.
    pub fn order_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_columns
            .extend(columns.into_iter().map(Into::into));
        self
    }

    /// Enables soft deletes through the given tombstone column.
    pub fn soft_delete(mut self, column: impl Into<String>) -> Self {
        self.soft_delete = Some(column.into());
        self
    }

    /// Registers a relation loader. Registering the same name twice is an
    /// error.
    pub fn relation(
        mut self,
        name: impl Into<String>,
        loader: Arc<dyn RelationLoader<T>>,
    ) -> Result<Self> {
        let name = name.into();
        if self.loaders.contains_key(&name) {
            return Err(Error::duplicate_relation(name));
        }
        self.loaders.insert(name, loader);
        Ok(self)
    }

    /// Binds the repository to a live client handle.
    pub fn build(self, client: Arc<Client>) -> Repository<T> {
        Repository {
            client,
            table: self.table,
            order_columns: self.order_columns,
            soft_delete: self.soft_delete,
            loaders: self.loaders,
        }
    }

    /// Binds the repository through the connection collaborator, asserting
    /// that its opaque handle is a PostgreSQL client.
    pub fn bind(self, adapter: &dyn Adapter) -> Result<Repository<T>> {
        let client = client_from(adapter)?;
        Ok(self.build(client))
    }
}

impl<T: Entity> Repository<T> {
    pub fn builder(table: impl Into<String>) -> Builder<T> {
        Builder {
            table: table.into(),
            order_columns: HashSet::new(),
            soft_delete: None,
            loaders: HashMap::new(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn order_columns(&self) -> &HashSet<String> {
        &self.order_columns
    }

    pub fn soft_delete_column(&self) -> Option<&str> {
        self.soft_delete.as_deref()
    }

    /// The underlying client handle, opaque to callers.
    pub fn connection(&self) -> &Arc<Client> {
        &self.client
    }

    /// Registers a relation loader after construction. Registering the same
    /// name twice is an error.
    pub fn add_relation(
        &mut self,
        name: impl Into<String>,
        loader: Arc<dyn RelationLoader<T>>,
    ) -> Result<()> {
        let name = name.into();
        if self.loaders.contains_key(&name) {
            return Err(Error::duplicate_relation(name));
        }
        self.loaders.insert(name, loader);
        Ok(())
    }

    /// Fetches every row matching the filter.
    ///
    /// Zero matches is an empty list, not an error. Relation paths in
    /// `opts.relations` hydrate sequentially, in the order given, after the
    /// primary query; an empty result set issues no relation queries at
    /// all. The order column and every relation name are validated before
    /// any SQL goes out.
    pub async fn get(&self, filter: Group, opts: Options) -> Result<Vec<T>> {
        let order = self.validate_order(&opts)?;
        let plan = self.relation_plan(&opts)?;

        let scoped = self.scope(filter);

        let mut params: Vec<Value> = Vec::new();
        let sql = Select {
            table: &self.table,
            columns: opts.columns.as_deref(),
            filter: Some(&scoped),
            order,
            limit: opts.limit,
            offset: opts.offset,
        }
        .to_sql(&mut params);

        let rows = self.query(&sql, &params).await?;

        let mut entities = Vec::with_capacity(rows.len());
        for row in &rows {
            entities.push(scan_row::<T>(row)?);
        }

        if !entities.is_empty() {
            for (name, loader, nested) in plan {
                loader
                    .load(&mut entities, nested.as_deref())
                    .await
                    .map_err(|e| Error::relation(name, e))?;
            }
        }

        Ok(entities)
    }

    /// Fetches the first row matching the filter, or `record not found`.
    pub async fn get_one(&self, filter: Group, mut opts: Options) -> Result<T> {
        opts.limit = 1;

        let rows = self.get(filter, opts).await?;
        rows.into_iter().next().ok_or_else(Error::record_not_found)
    }

    /// Inserts one row and returns it as scanned from `RETURNING *`.
    ///
    /// Unless the options opt out, a time-ordered UUID lands in the primary
    /// key column and `created_at` / `updated_at` are stamped with the
    /// current UTC instant.
    pub async fn create(&self, payload: Payload, opts: Options) -> Result<T> {
        let payload = stamp_new_row(payload, &opts);

        let mut params: Vec<Value> = Vec::new();
        let sql = Insert {
            table: &self.table,
            payload: &payload,
        }
        .to_sql(&mut params)?;

        let rows = self.query(&sql, &params).await?;
        let row = rows.first().ok_or_else(Error::record_not_found)?;
        scan_row(row)
    }

    /// Inserts many rows in one statement and returns them.
    ///
    /// The first payload fixes the column list; ids and timestamps are not
    /// injected. An empty input returns an empty list without issuing SQL.
    pub async fn create_many(&self, payloads: Vec<Payload>, _opts: Options) -> Result<Vec<T>> {
        if payloads.is_empty() {
            return Ok(Vec::new());
        }

        let mut params: Vec<Value> = Vec::new();
        let sql = InsertMany {
            table: &self.table,
            payloads: &payloads,
        }
        .to_sql(&mut params)?;

        let rows = self.query(&sql, &params).await?;

        let mut entities = Vec::with_capacity(rows.len());
        for row in &rows {
            entities.push(scan_row::<T>(row)?);
        }

        Ok(entities)
    }

    /// Updates every row matching the filter and returns the first matching
    /// row re-read afterwards.
    ///
    /// `id` and `created_at` are stripped from the payload; `updated_at` is
    /// stamped. The row count of the UPDATE itself is ignored.
    pub async fn update(&self, filter: Group, payload: Payload) -> Result<T> {
        let payload = stamp_updated_row(payload);

        let scoped = self.scope(filter.clone());

        let mut params: Vec<Value> = Vec::new();
        let sql = Update {
            table: &self.table,
            payload: &payload,
            filter: Some(&scoped),
        }
        .to_sql(&mut params)?;

        self.execute(&sql, &params).await?;

        self.get_one(filter, Options::default()).await
    }

    /// Deletes every row matching the filter.
    ///
    /// With a soft-delete column configured this becomes an UPDATE stamping
    /// the tombstone; deleting rows that are already tombstoned (or match
    /// nothing) is a no-op success. A hard delete that removes zero rows is
    /// `record not found`.
    pub async fn delete(&self, filter: Group) -> Result<()> {
        if let Some(tombstone) = self.soft_delete.clone() {
            let mut payload = Payload::new();
            payload.insert(tombstone, Assignment::value(Utc::now()));

            return match self.update(filter, payload).await {
                Ok(_) => Ok(()),
                Err(err) if err.is_record_not_found() => Ok(()),
                Err(err) => Err(err),
            };
        }

        let mut params: Vec<Value> = Vec::new();
        let sql = Delete {
            table: &self.table,
            filter: Some(&filter),
        }
        .to_sql(&mut params);

        let affected = self.execute(&sql, &params).await?;
        if affected == 0 {
            return Err(Error::record_not_found());
        }

        Ok(())
    }

    /// Counts the rows matching the filter.
    pub async fn count(&self, filter: Group) -> Result<i64> {
        let scoped = self.scope(filter);

        let mut params: Vec<Value> = Vec::new();
        let sql = Count {
            table: &self.table,
            filter: Some(&scoped),
        }
        .to_sql(&mut params);

        let rows = self.query(&sql, &params).await?;
        let row = rows
            .first()
            .ok_or_else(|| Error::scan("count query returned no rows"))?;

        row.try_get(0)
            .map_err(|e| Error::scan_caused_by("count column", e))
    }

    fn validate_order<'a>(&self, opts: &'a Options) -> Result<Option<(&'a str, Direction)>> {
        validate_order(&self.order_columns, opts)
    }

    /// Resolves every relation path to its loader up front, so an unknown
    /// name fails before any SQL is issued.
    #[allow(clippy::type_complexity)]
    fn relation_plan(
        &self,
        opts: &Options,
    ) -> Result<Vec<(String, Arc<dyn RelationLoader<T>>, Option<String>)>> {
        let mut plan = Vec::with_capacity(opts.relations.len());

        for path in &opts.relations {
            let (name, nested) = split_path(path);
            let loader = self
                .loaders
                .get(name)
                .ok_or_else(|| Error::unknown_relation(name))?;
            plan.push((
                name.to_string(),
                loader.clone(),
                nested.map(str::to_string),
            ));
        }

        Ok(plan)
    }

    fn scope(&self, filter: Group) -> Group {
        match self.soft_delete.as_deref() {
            Some(tombstone) if !tombstone.is_empty() => filter.excluding_soft_deleted(tombstone),
            _ => filter,
        }
    }

    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        debug_sql(sql, params);

        let args: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();
        self.client.query(sql, &args).await.map_err(Error::driver)
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        debug_sql(sql, params);

        let args: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();
        self.client
            .execute(sql, &args)
            .await
            .map_err(Error::driver)
    }
}

/// Checks a requested sort column against the repository whitelist, the
/// sole guard against `ORDER BY` injection.
fn validate_order<'a>(
    whitelist: &HashSet<String>,
    opts: &'a Options,
) -> Result<Option<(&'a str, Direction)>> {
    let Some(column) = opts.order_column.as_deref() else {
        return Ok(None);
    };

    if !whitelist.contains(column) {
        return Err(Error::invalid_order_column(column));
    }

    Ok(Some((column, opts.order_dir)))
}

/// Applies the create-time defaults: generated primary key and creation
/// timestamps, unless the options opt out.
fn stamp_new_row(mut payload: Payload, opts: &Options) -> Payload {
    if opts.insert_primary_key {
        payload.insert(
            opts.primary_key.clone(),
            Assignment::Value(Value::Uuid(uuid::Uuid::now_v7())),
        );
    }

    if opts.timestamp_fields {
        let now = Utc::now();
        payload.insert("created_at".to_string(), Assignment::value(now));
        payload.insert("updated_at".to_string(), Assignment::value(now));
    }

    payload
}

/// Applies the update-time rules: the primary key and creation timestamp
/// never change, and `updated_at` always does.
fn stamp_updated_row(mut payload: Payload) -> Payload {
    payload.shift_remove("id");
    payload.shift_remove("created_at");
    payload.insert("updated_at".to_string(), Assignment::value(Utc::now()));
    payload
}
