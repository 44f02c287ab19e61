use crate::testing::{Post, User, schema};
use crate::{
    Entity, JoinKind, LogicalOperator, OrmError, PredicateOptions, Specification,
    SpecificationBuilder, Wildcard,
};

fn sql<T: Entity>(spec: &Specification<T>) -> String {
    let schema = schema();
    spec.to_query(&schema).unwrap().to_sql()
}

fn users() -> SpecificationBuilder<User> {
    SpecificationBuilder::new()
}

fn posts() -> SpecificationBuilder<Post> {
    SpecificationBuilder::new()
}

// ==================== Omission ====================

#[test]
fn empty_builder_selects_everything() {
    let spec = users().build();
    assert!(spec.is_unrestricted());
    assert_eq!(sql(&spec), "SELECT t0.* FROM users t0");
}

#[test]
fn absent_values_leave_query_unchanged() {
    let spec = users()
        .equal("username", None::<String>)
        .in_list("id", Some(Vec::<i64>::new()))
        .like("email", Some(""))
        .between("age", None::<i32>, None)
        .is_null_if("profile.city", false)
        .or_inner(None::<Specification<User>>)
        .build();
    assert_eq!(sql(&spec), "SELECT t0.* FROM users t0");
}

// ==================== Scalar predicates ====================

#[test]
fn equal_on_root_column() {
    let spec = users().equal("username", Some("alice")).build();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.* FROM users t0 WHERE t0.username = $1"
    );
}

#[test]
fn field_name_maps_to_column() {
    let spec = users().equal("active", Some(true)).distinct(false).build();
    assert_eq!(sql(&spec), "SELECT t0.* FROM users t0 WHERE t0.is_active = $1");
}

#[test]
fn negated_equal_is_not_equal() {
    let a = users().not_equal("username", Some("alice")).build();
    let b = users()
        .equal_with("username", Some("alice"), |b| b.not())
        .build();
    let expected = "SELECT DISTINCT t0.* FROM users t0 WHERE t0.username != $1";
    assert_eq!(sql(&a), expected);
    assert_eq!(sql(&b), expected);
}

#[test]
fn in_list_and_not_in() {
    let spec = users().in_list("id", Some(vec![1i64, 2, 3])).build();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.* FROM users t0 WHERE t0.id IN ($1, $2, $3)"
    );
    let spec = users()
        .in_list_with("id", Some([7i64]), |b| b.not())
        .build();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.* FROM users t0 WHERE t0.id NOT IN ($1)"
    );
}

// ==================== Range ====================

#[test]
fn between_with_default_bounds_uses_two_inequalities() {
    let spec = users().between("age", Some(10), Some(20)).build();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.* FROM users t0 WHERE t0.age >= $1 AND t0.age <= $2"
    );
}

#[test]
fn between_with_exclusive_min() {
    let spec = users()
        .between_with("age", Some(10), Some(20), |b| b.min_exclusive())
        .build();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.* FROM users t0 WHERE t0.age > $1 AND t0.age <= $2"
    );
}

#[test]
fn between_with_both_exclusive_uses_between() {
    let spec = users()
        .between_with("age", Some(10), Some(20), |b| {
            b.min_exclusive().max_exclusive()
        })
        .build();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.* FROM users t0 WHERE t0.age BETWEEN $1 AND $2"
    );
}

#[test]
fn single_sided_ranges() {
    let spec = users().min("age", Some(18)).build();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.* FROM users t0 WHERE t0.age >= $1"
    );
    let spec = users().max_with("age", Some(65), |b| b.max_exclusive()).build();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.* FROM users t0 WHERE t0.age < $1"
    );
}

#[test]
fn negated_inequality_is_wrapped() {
    let spec = users().min_with("age", Some(18), |b| b.not()).build();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.* FROM users t0 WHERE NOT (t0.age >= $1)"
    );
}

#[test]
fn negated_closed_range_is_negated_as_a_whole() {
    let spec = users()
        .between_with("age", Some(10), Some(20), |b| b.not())
        .build();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.* FROM users t0 WHERE NOT (t0.age >= $1 AND t0.age <= $2)"
    );

    let spec = users()
        .equal("active", Some(true))
        .between_with("age", Some(10), Some(20), |b| b.min_exclusive().not().or())
        .build();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.* FROM users t0 \
         WHERE t0.is_active = $1 OR NOT (t0.age > $2 AND t0.age <= $3)"
    );

    let spec = users()
        .between_with("age", Some(10), Some(20), |b| {
            b.min_exclusive().max_exclusive().not()
        })
        .build();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.* FROM users t0 WHERE t0.age NOT BETWEEN $1 AND $2"
    );
}

// ==================== Pattern ====================

#[test]
fn like_threshold() {
    let spec = users().like("username", Some("ab")).build();
    assert!(spec.is_unrestricted());

    let spec = users()
        .like_with("username", Some("ab"), |b| b.min_chars(2))
        .build();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.* FROM users t0 WHERE UPPER(t0.username) LIKE $1"
    );
}

#[test]
fn like_pattern_is_upper_cased_and_wildcarded() {
    let schema = schema();
    let spec = posts()
        .like_with("title", Some("rust"), |b| b.wildcard(Wildcard::Both))
        .build();
    let (sql, params) = spec.to_query(&schema).unwrap().build();
    assert_eq!(
        sql,
        "SELECT DISTINCT t0.* FROM posts t0 WHERE UPPER(t0.title) LIKE $1"
    );
    let bound = format!("{:?}", params.iter().next().unwrap());
    assert_eq!(bound, "Param(\"%RUST%\")");
}

#[test]
fn case_sensitive_like() {
    let spec = posts()
        .like_with("title", Some("Rust"), |b| {
            b.case_sensitive().wildcard(Wildcard::Trailing).not()
        })
        .build();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.* FROM posts t0 WHERE t0.title NOT LIKE $1"
    );
}

// ==================== Null check ====================

#[test]
fn null_check_forces_left_join() {
    let spec = users().is_null("posts.title").build();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.* FROM users t0 \
         LEFT JOIN posts t1 ON t1.author_id = t0.id WHERE t1.title IS NULL"
    );

    let spec = users()
        .is_null_with("posts.title", true, |b| b.join(JoinKind::Inner))
        .build();
    assert!(sql(&spec).contains("LEFT JOIN posts t1"));
}

#[test]
fn not_null_on_association_checks_primary_key() {
    let spec = users().is_not_null("profile").build();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.* FROM users t0 \
         LEFT JOIN profiles t1 ON t1.user_id = t0.id WHERE t1.id IS NOT NULL"
    );

    let spec = users()
        .is_not_null_with("profile.city", true, |b| b.join(JoinKind::Inner))
        .build();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.* FROM users t0 \
         LEFT JOIN profiles t1 ON t1.user_id = t0.id WHERE t1.city IS NOT NULL"
    );
    let inactive = users().is_not_null_if("profile.city", false).build();
    assert_eq!(sql(&inactive), "SELECT t0.* FROM users t0");
}

// ==================== Paths and joins ====================

#[test]
fn shared_association_is_joined_once() {
    let schema = schema();
    let spec = posts()
        .equal("author.username", Some("alice"))
        .equal("author.email", Some("a@example.com"))
        .build();
    let query = spec.to_query(&schema).unwrap();
    assert_eq!(query.join_count(), 1);
    assert_eq!(
        query.to_sql(),
        "SELECT DISTINCT t0.* FROM posts t0 \
         INNER JOIN users t1 ON t1.id = t0.author_id \
         WHERE t1.username = $1 AND t1.email = $2"
    );
}

#[test]
fn first_join_kind_wins() {
    let spec = posts()
        .equal("author.username", Some("alice"))
        .equal_with("author.email", Some("x"), |b| b.join(JoinKind::Left))
        .build();
    let sql = sql(&spec);
    assert!(sql.contains("INNER JOIN users t1"));
    assert!(!sql.contains("LEFT JOIN"));
}

#[test]
fn nested_associations() {
    let spec = posts().equal("author.profile.city", Some("Oslo")).build();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.* FROM posts t0 \
         INNER JOIN users t1 ON t1.id = t0.author_id \
         INNER JOIN profiles t2 ON t2.user_id = t1.id \
         WHERE t2.city = $1"
    );
}

#[test]
fn explicit_segments_match_dotted_path() {
    let dotted = posts().equal("author.username", Some("a")).build();
    let explicit = posts().equal(["author", "username"], Some("a")).build();
    assert_eq!(sql(&dotted), sql(&explicit));
}

#[test]
fn path_ending_on_association_compares_primary_key() {
    let spec = posts().equal("author", Some(5i64)).build();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.* FROM posts t0 \
         INNER JOIN users t1 ON t1.id = t0.author_id WHERE t1.id = $1"
    );
}

#[test]
fn many_to_many_through_link_table() {
    let spec = users()
        .equal_with("groups.name", Some("admins"), |b| b.join(JoinKind::Left))
        .build();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.* FROM users t0 \
         LEFT JOIN user_groups t2 ON t2.user_id = t0.id \
         LEFT JOIN groups t1 ON t1.id = t2.group_id \
         WHERE t1.name = $1"
    );
}

#[test]
fn element_collection_ends_the_path() {
    let spec = users()
        .equal("nicknames", Some("bob"))
        .equal("nicknames.ignored", Some("rob"))
        .build();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.* FROM users t0 \
         INNER JOIN user_nicknames t1 ON t1.user_id = t0.id \
         INNER JOIN user_nicknames t2 ON t2.user_id = t0.id \
         WHERE t1.nickname = $1 AND t2.nickname = $2"
    );
}

#[test]
fn scalar_in_the_middle_stops_resolution() {
    let spec = posts().equal("title.length", Some(3)).build();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.* FROM posts t0 WHERE t0.title = $1"
    );
}

#[test]
fn fetch_join_adds_json_column() {
    let spec = posts()
        .equal_with("author.username", Some("alice"), |b| b.fetch())
        .build();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.*, to_jsonb(t1.*) AS \"author\" FROM posts t0 \
         INNER JOIN users t1 ON t1.id = t0.author_id WHERE t1.username = $1"
    );
}

#[test]
fn resolution_errors_surface() {
    let schema = schema();
    let spec = users().equal("nope", Some(1)).build();
    assert!(matches!(
        spec.to_query(&schema),
        Err(OrmError::UnknownField { .. })
    ));

    let spec = posts().equal("author..username", Some("a")).build();
    assert!(matches!(
        spec.to_query(&schema),
        Err(OrmError::InvalidPath(_))
    ));

    let spec = posts().equal("author.nope", Some(1)).build();
    let err = spec.to_query(&schema).unwrap_err();
    assert!(err.is_resolution_error());
    assert_eq!(err.to_string(), "Unknown field 'nope' on entity 'User'");
}

// ==================== Composition ====================

#[test]
fn fold_order_top_level_then_inner() {
    let inner = users().equal("email", Some("a@example.com")).build();
    let spec = users()
        .equal("username", Some("alice"))
        .equal_with("age", Some(30), |b| b.or())
        .and_inner(inner)
        .build();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.* FROM users t0 \
         WHERE (t0.username = $1 OR t0.age = $2) AND (t0.email = $3)"
    );
}

#[test]
fn first_connector_is_absorbed_by_identity() {
    let spec = users()
        .equal_with("username", Some("alice"), |b| b.connection(LogicalOperator::Or))
        .build();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.* FROM users t0 WHERE t0.username = $1"
    );
}

#[test]
fn or_inner_groups_composite() {
    let inner = users()
        .min("age", Some(18))
        .equal("active", Some(true))
        .build();
    let spec = users()
        .equal("username", Some("root"))
        .or_inner(inner)
        .build();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.* FROM users t0 \
         WHERE t0.username = $1 OR (t0.age >= $2 AND t0.is_active = $3)"
    );
}

#[test]
fn inner_only() {
    let inner = users().equal("username", Some("a")).build();
    let spec = users().and_inner(inner).build();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.* FROM users t0 WHERE (t0.username = $1)"
    );
}

#[test]
fn specification_combinators() {
    let a = users().equal("username", Some("a")).build();
    let b = users().equal("username", Some("b")).build();
    let spec = a.or(b).not();
    assert_eq!(
        sql(&spec),
        "SELECT DISTINCT t0.* FROM users t0 \
         WHERE NOT (t0.username = $1 OR t0.username = $2)"
    );

    let only = users().equal("username", Some("a")).build();
    let same = Specification::unrestricted().and(only.clone());
    assert_eq!(sql(&same), sql(&only));
    let same = only.clone().or(Specification::unrestricted());
    assert_eq!(sql(&same), sql(&only));
    assert!(Specification::<User>::unrestricted().not().is_unrestricted());
}

// ==================== Distinct ====================

#[test]
fn distinct_flag_follows_builder() {
    let schema = schema();
    let spec = users().distinct(false).equal("username", Some("a")).build();
    assert!(!spec.to_query(&schema).unwrap().is_distinct());

    let spec = users().equal("username", Some("a")).build();
    assert!(spec.to_query(&schema).unwrap().is_distinct());
}

#[test]
fn last_resolved_predicate_sets_distinct() {
    let schema = schema();
    let inner = users().equal("email", Some("x")).build();
    let spec = users()
        .distinct(false)
        .equal("username", Some("a"))
        .and_inner(inner)
        .build();
    assert!(spec.to_query(&schema).unwrap().is_distinct());

    let inner = users().distinct(false).equal("email", Some("x")).build();
    let spec = users()
        .distinct(false)
        .equal("username", Some("a"))
        .and_inner(inner)
        .build();
    let query = spec.to_query(&schema).unwrap();
    assert!(!query.is_distinct());
    assert!(query.to_sql().starts_with("SELECT t0.* FROM users t0"));
}

// ==================== Query rendering ====================

#[test]
fn order_by_reuses_joins() {
    let schema = schema();
    let spec = posts()
        .distinct(false)
        .equal("author.username", Some("alice"))
        .build();
    let query = spec
        .to_query(&schema)
        .unwrap()
        .order_by_desc("author.email")
        .unwrap()
        .order_by_asc("id")
        .unwrap();
    assert_eq!(query.join_count(), 1);
    assert_eq!(
        query.to_sql(),
        "SELECT t0.* FROM posts t0 \
         INNER JOIN users t1 ON t1.id = t0.author_id \
         WHERE t1.username = $1 ORDER BY t1.email DESC, t0.id ASC"
    );
}

#[test]
fn order_by_new_association_uses_left_join() {
    let schema = schema();
    let query = posts()
        .distinct(false)
        .build()
        .to_query(&schema)
        .unwrap()
        .order_by_asc("author.username")
        .unwrap();
    assert_eq!(
        query.to_sql(),
        "SELECT t0.* FROM posts t0 \
         LEFT JOIN users t1 ON t1.id = t0.author_id ORDER BY t1.username ASC"
    );
}

#[test]
fn count_wraps_select_without_order() {
    let schema = schema();
    let query = users()
        .min("age", Some(18))
        .build()
        .to_query(&schema)
        .unwrap()
        .order_by_asc("username")
        .unwrap();
    let (sql, params) = query.build_count();
    assert_eq!(
        sql,
        "SELECT COUNT(*) FROM (SELECT DISTINCT t0.* FROM users t0 WHERE t0.age >= $1) AS q"
    );
    assert_eq!(params.len(), 1);
}

#[test]
fn specification_is_reusable() {
    let schema = schema();
    let spec = posts().equal("author.username", Some("alice")).build();
    let first = spec.to_query(&schema).unwrap().to_sql();
    let second = spec.to_query(&schema).unwrap().to_sql();
    assert_eq!(first, second);
}
