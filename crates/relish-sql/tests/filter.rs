use relish_core::Value;
use relish_sql::{Comparator, Filter, Group, Params};

fn compile(group: &Group) -> (String, Vec<Value>) {
    let mut params: Vec<Value> = Vec::new();
    let sql = group.to_sql(&mut params);
    (sql, params)
}

fn placeholder_count(sql: &str) -> usize {
    sql.matches('$').count()
}

#[test]
fn single_comparison() {
    let group = Group::and([Filter::eq("status", "active")]);
    let (sql, params) = compile(&group);

    assert_eq!(sql, "status = $1");
    assert_eq!(params, vec![Value::from("active")]);
}

#[test]
fn siblings_join_in_tree_order() {
    let group = Group::and([
        Filter::eq("status", "active"),
        Filter::gt("age", 21i64),
        Filter::like("name", "a%"),
    ]);
    let (sql, params) = compile(&group);

    assert_eq!(sql, "status = $1 AND age > $2 AND name LIKE $3");
    assert_eq!(
        params,
        vec![Value::from("active"), Value::I64(21), Value::from("a%")]
    );
}

#[test]
fn or_group_uses_or_between_siblings() {
    let group = Group::or([Filter::eq("a", 1i64), Filter::eq("b", 2i64)]);
    let (sql, _) = compile(&group);

    assert_eq!(sql, "a = $1 OR b = $2");
}

#[test]
fn null_comparators_bind_nothing() {
    let group = Group::and([
        Filter::is_null("deleted_at"),
        Filter::is_not_null("confirmed_at"),
    ]);
    let (sql, params) = compile(&group);

    assert_eq!(sql, "deleted_at IS NULL AND confirmed_at IS NOT NULL");
    assert!(params.is_empty());
}

#[test]
fn multi_value_in_expands_placeholders() {
    let group = Group::and([Filter::in_list("id", [1i64, 2, 3])]);
    let (sql, params) = compile(&group);

    assert_eq!(sql, "id IN ($1, $2, $3)");
    assert_eq!(params, vec![Value::I64(1), Value::I64(2), Value::I64(3)]);
}

#[test]
fn not_in_expands_like_in() {
    let group = Group::and([Filter::not_in("status", ["banned", "ghost"])]);
    let (sql, params) = compile(&group);

    assert_eq!(sql, "status NOT IN ($1, $2)");
    assert_eq!(params.len(), 2);
}

#[test]
fn single_value_in_is_skipped_entirely() {
    let group = Group::and([
        Filter::Single {
            key: "id".to_string(),
            comparator: Comparator::In,
            value: Value::I64(1),
        },
        Filter::eq("status", "active"),
    ]);
    let (sql, params) = compile(&group);

    // The malformed node is dropped and must not leave a dangling AND.
    assert_eq!(sql, "status = $1");
    assert_eq!(params.len(), 1);
}

#[test]
fn multi_value_with_scalar_comparator_emits_nothing() {
    let group = Group::and([
        Filter::Multi {
            key: "id".to_string(),
            comparator: Comparator::Eq,
            values: vec![Value::I64(1)],
        },
        Filter::eq("status", "active"),
    ]);
    let (sql, _) = compile(&group);

    assert_eq!(sql, "status = $1");
}

#[test]
fn empty_in_list_emits_nothing() {
    let group = Group::and([Filter::in_list("id", Vec::<i64>::new())]);
    let (sql, params) = compile(&group);

    assert!(sql.is_empty());
    assert!(params.is_empty());
}

#[test]
fn nested_group_is_parenthesized() {
    let group = Group::and([
        Filter::eq("id", 2i64),
        Filter::Group(Group::or([
            Filter::is_null("expires_at"),
            Filter::gt("expires_at", "2026-01-01"),
        ])),
    ]);
    let (sql, params) = compile(&group);

    assert_eq!(
        sql,
        "id = $1 AND (expires_at IS NULL OR expires_at > $2)"
    );
    assert_eq!(params, vec![Value::I64(2), Value::from("2026-01-01")]);
}

#[test]
fn empty_nested_group_does_not_leave_parentheses() {
    let group = Group::and([
        Filter::eq("id", 1i64),
        Filter::Group(Group::default()),
        Filter::eq("status", "active"),
    ]);
    let (sql, _) = compile(&group);

    assert_eq!(sql, "id = $1 AND status = $2");
}

#[test]
fn empty_group_compiles_to_empty_fragment() {
    let (sql, params) = compile(&Group::default());

    assert!(sql.is_empty());
    assert!(params.is_empty());
}

#[test]
fn placeholders_are_dense_and_match_argument_count() {
    let group = Group::and([
        Filter::eq("a", 1i64),
        Filter::in_list("b", [2i64, 3]),
        Filter::is_null("c"),
        Filter::Group(Group::or([Filter::ne("d", 4i64), Filter::le("e", 5i64)])),
    ]);
    let (sql, params) = compile(&group);

    assert_eq!(placeholder_count(&sql), params.len());
    for n in 1..=params.len() {
        assert!(sql.contains(&format!("${n}")), "missing ${n} in {sql}");
    }
}

#[test]
fn compilation_continues_from_preexisting_params() {
    // An UPDATE compiles its SET list first; the filter keeps counting.
    let mut params: Vec<Value> = Vec::new();
    Params::push(&mut params, Value::from("already-bound"));

    let group = Group::and([Filter::eq("id", 9i64)]);
    let sql = group.to_sql(&mut params);

    assert_eq!(sql, "id = $2");
    assert_eq!(params.len(), 2);
}

#[test]
fn soft_delete_scope_narrows_with_and() {
    let group = Group::or([Filter::eq("a", 1i64), Filter::eq("b", 2i64)]);
    let scoped = group.excluding_soft_deleted("deleted_at");
    let (sql, params) = compile(&scoped);

    assert_eq!(sql, "(a = $1 OR b = $2) AND deleted_at IS NULL");
    assert_eq!(params.len(), 2);
}

#[test]
fn soft_delete_scope_on_empty_filter_is_just_the_tombstone() {
    let scoped = Group::default().excluding_soft_deleted("deleted_at");
    let (sql, params) = compile(&scoped);

    assert_eq!(sql, "deleted_at IS NULL");
    assert!(params.is_empty());
}
