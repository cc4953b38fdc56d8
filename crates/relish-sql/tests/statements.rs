use relish_core::Value;
use relish_sql::{
    Assignment, Count, Delete, Direction, Filter, Group, Insert, InsertMany, Payload, RawSql,
    Select, Update,
};

fn payload(entries: &[(&str, Assignment)]) -> Payload {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn select_with_filter_and_limit() {
    let filter = Group::and([Filter::eq("status", "active")]);
    let mut params: Vec<Value> = Vec::new();

    let sql = Select {
        table: "users",
        columns: None,
        filter: Some(&filter),
        order: None,
        limit: 10,
        offset: 0,
    }
    .to_sql(&mut params);

    assert_eq!(sql, "SELECT * FROM users WHERE status = $1 LIMIT 10");
    assert_eq!(params, vec![Value::from("active")]);
}

#[test]
fn select_with_in_filter() {
    let filter = Group::and([Filter::in_list("id", [1i64, 2, 3])]);
    let mut params: Vec<Value> = Vec::new();

    let sql = Select {
        table: "users",
        columns: None,
        filter: Some(&filter),
        order: None,
        limit: 0,
        offset: 0,
    }
    .to_sql(&mut params);

    assert_eq!(sql, "SELECT * FROM users WHERE id IN ($1, $2, $3)");
    assert_eq!(params, vec![Value::I64(1), Value::I64(2), Value::I64(3)]);
}

#[test]
fn select_empty_filter_has_no_where() {
    let filter = Group::default();
    let mut params: Vec<Value> = Vec::new();

    let sql = Select {
        table: "users",
        columns: None,
        filter: Some(&filter),
        order: None,
        limit: 0,
        offset: 0,
    }
    .to_sql(&mut params);

    assert_eq!(sql, "SELECT * FROM users");
    assert!(params.is_empty());
}

#[test]
fn select_zero_limit_and_offset_emit_nothing() {
    let mut params: Vec<Value> = Vec::new();
    let sql = Select {
        table: "users",
        columns: None,
        filter: None,
        order: None,
        limit: 0,
        offset: 0,
    }
    .to_sql(&mut params);

    assert!(!sql.contains("LIMIT"));
    assert!(!sql.contains("OFFSET"));
}

#[test]
fn select_projection_order_and_paging() {
    let columns = vec!["id".to_string(), "name".to_string()];
    let mut params: Vec<Value> = Vec::new();

    let sql = Select {
        table: "users",
        columns: Some(&columns),
        filter: None,
        order: Some(("created_at", Direction::Desc)),
        limit: 5,
        offset: 20,
    }
    .to_sql(&mut params);

    assert_eq!(
        sql,
        "SELECT id, name FROM users ORDER BY created_at DESC LIMIT 5 OFFSET 20"
    );
}

#[test]
fn insert_returns_inserted_row() {
    let payload = payload(&[
        ("name", Assignment::value("ada")),
        ("email", Assignment::value("ada@example.com")),
    ]);
    let mut params: Vec<Value> = Vec::new();

    let sql = Insert {
        table: "users",
        payload: &payload,
    }
    .to_sql(&mut params)
    .unwrap();

    assert_eq!(
        sql,
        "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING *"
    );
    assert_eq!(params.len(), 2);
}

#[test]
fn insert_rejects_raw_fragments() {
    let payload = payload(&[("position", Assignment::raw("position + 1"))]);
    let mut params: Vec<Value> = Vec::new();

    let err = Insert {
        table: "users",
        payload: &payload,
    }
    .to_sql(&mut params)
    .unwrap_err();

    assert!(err.is_invalid_statement());
}

#[test]
fn insert_rejects_empty_payload() {
    let payload = Payload::new();
    let mut params: Vec<Value> = Vec::new();

    let err = Insert {
        table: "users",
        payload: &payload,
    }
    .to_sql(&mut params)
    .unwrap_err();

    assert!(err.is_invalid_statement());
}

#[test]
fn insert_many_lays_out_rows_left_to_right() {
    let payloads = vec![
        payload(&[
            ("name", Assignment::value("ada")),
            ("email", Assignment::value("ada@example.com")),
        ]),
        payload(&[
            ("name", Assignment::value("grace")),
            ("email", Assignment::value("grace@example.com")),
        ]),
    ];
    let mut params: Vec<Value> = Vec::new();

    let sql = InsertMany {
        table: "users",
        payloads: &payloads,
    }
    .to_sql(&mut params)
    .unwrap();

    assert_eq!(
        sql,
        "INSERT INTO users (name, email) VALUES ($1, $2), ($3, $4) RETURNING *"
    );
    assert_eq!(
        params,
        vec![
            Value::from("ada"),
            Value::from("ada@example.com"),
            Value::from("grace"),
            Value::from("grace@example.com"),
        ]
    );
}

#[test]
fn insert_many_projects_later_rows_onto_first_columns() {
    // The second row lists its keys in a different order; the first row's
    // order wins.
    let payloads = vec![
        payload(&[
            ("name", Assignment::value("ada")),
            ("email", Assignment::value("ada@example.com")),
        ]),
        payload(&[
            ("email", Assignment::value("grace@example.com")),
            ("name", Assignment::value("grace")),
        ]),
    ];
    let mut params: Vec<Value> = Vec::new();

    InsertMany {
        table: "users",
        payloads: &payloads,
    }
    .to_sql(&mut params)
    .unwrap();

    assert_eq!(
        params,
        vec![
            Value::from("ada"),
            Value::from("ada@example.com"),
            Value::from("grace"),
            Value::from("grace@example.com"),
        ]
    );
}

#[test]
fn insert_many_rejects_missing_column() {
    let payloads = vec![
        payload(&[
            ("name", Assignment::value("ada")),
            ("email", Assignment::value("ada@example.com")),
        ]),
        payload(&[("name", Assignment::value("grace"))]),
    ];
    let mut params: Vec<Value> = Vec::new();

    let err = InsertMany {
        table: "users",
        payloads: &payloads,
    }
    .to_sql(&mut params)
    .unwrap_err();

    assert!(err.is_invalid_statement());
}

#[test]
fn update_interpolates_raw_and_keeps_placeholders_aligned() {
    let payload = payload(&[
        ("position", Assignment::raw(RawSql::new("position + 1"))),
        ("name", Assignment::value("x")),
    ]);
    let filter = Group::and([Filter::eq("id", 7i64)]);
    let mut params: Vec<Value> = Vec::new();

    let sql = Update {
        table: "items",
        payload: &payload,
        filter: Some(&filter),
    }
    .to_sql(&mut params)
    .unwrap();

    assert_eq!(
        sql,
        "UPDATE items SET position = position + 1, name = $1 WHERE id = $2"
    );
    assert_eq!(params, vec![Value::from("x"), Value::I64(7)]);
}

#[test]
fn update_where_continues_set_numbering() {
    let payload = payload(&[
        ("a", Assignment::value(1i64)),
        ("b", Assignment::value(2i64)),
    ]);
    let filter = Group::and([Filter::eq("id", 3i64)]);
    let mut params: Vec<Value> = Vec::new();

    let sql = Update {
        table: "items",
        payload: &payload,
        filter: Some(&filter),
    }
    .to_sql(&mut params)
    .unwrap();

    assert_eq!(sql, "UPDATE items SET a = $1, b = $2 WHERE id = $3");
    assert_eq!(params.len(), 3);
}

#[test]
fn update_rejects_empty_payload() {
    let payload = Payload::new();
    let mut params: Vec<Value> = Vec::new();

    let err = Update {
        table: "items",
        payload: &payload,
        filter: None,
    }
    .to_sql(&mut params)
    .unwrap_err();

    assert!(err.is_invalid_statement());
}

#[test]
fn delete_with_and_without_filter() {
    let filter = Group::and([Filter::eq("id", 1i64)]);
    let mut params: Vec<Value> = Vec::new();

    let sql = Delete {
        table: "users",
        filter: Some(&filter),
    }
    .to_sql(&mut params);
    assert_eq!(sql, "DELETE FROM users WHERE id = $1");

    let mut params: Vec<Value> = Vec::new();
    let sql = Delete {
        table: "users",
        filter: None,
    }
    .to_sql(&mut params);
    assert_eq!(sql, "DELETE FROM users");
}

#[test]
fn count_compiles_with_scoped_filter() {
    let filter =
        Group::and([Filter::eq("status", "active")]).excluding_soft_deleted("deleted_at");
    let mut params: Vec<Value> = Vec::new();

    let sql = Count {
        table: "users",
        filter: Some(&filter),
    }
    .to_sql(&mut params);

    assert_eq!(
        sql,
        "SELECT COUNT(*) FROM users WHERE (status = $1) AND deleted_at IS NULL"
    );
    assert_eq!(params, vec![Value::from("active")]);
}

#[test]
fn soft_delete_becomes_an_update_shape() {
    // A soft delete is an UPDATE stamping the tombstone, never a DELETE.
    let payload = payload(&[(
        "deleted_at",
        Assignment::value(chrono::Utc::now()),
    )]);
    let filter = Group::and([Filter::eq("id", 1i64)]).excluding_soft_deleted("deleted_at");
    let mut params: Vec<Value> = Vec::new();

    let sql = Update {
        table: "sessions",
        payload: &payload,
        filter: Some(&filter),
    }
    .to_sql(&mut params)
    .unwrap();

    assert_eq!(
        sql,
        "UPDATE sessions SET deleted_at = $1 WHERE (id = $2) AND deleted_at IS NULL"
    );
    assert_eq!(params.len(), 2);
}
