//! Integration tests for rhtmx-paths
//!
//! Tests are organized by feature area and cover:
//! - Base accumulation and output shape
//! - Path parameter substitution (strict and lenient)
//! - Query strings and declared query keys
//! - Validation and prepend ordering
//! - Tree structure errors
//! - Route declaration files

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use rhtmx_paths::*;
use rstest::rstest;
use serde_json::json;
use std::io::Write;

fn api() -> Branch {
    Branch::new("/api")
        .leaf("Search", "/search")
        .leaf("Find", "/find?q={}&page={}")
        .branch(
            "Users",
            Branch::new("/users")
                .leaf("Add", "/add")
                .leaf("One", "/:id")
                .leaf("Post", "/:id/posts/:slug"),
        )
        .branch(
            "Posts",
            Branch::new("/posts")
                .leaf("Get", "/all")
                .branch("Private", Branch::new("/private").leaf("Delete", "/delete/:id")),
        )
}

fn compiled(options: &Options) -> CompiledBranch {
    compile(&api(), options).unwrap()
}

fn leaf<'a>(paths: &'a CompiledBranch, dotted: &str) -> &'a CompiledLeaf {
    paths.route(dotted).unwrap()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_scenario_users_tree() {
    init_tracing();
    let paths = compile_json(
        &json!({ "_": "/api", "Users": { "_": "/users", "One": "/:id" } }),
        &Options::default(),
    )
    .unwrap();
    let one = leaf(&paths, "Users.One");
    assert_eq!(one.with_path(values! { "id" => 42 }).unwrap(), "/api/users/42");
    assert_eq!(one.url().unwrap(), "/api/users/:id");
}

#[test]
fn test_scenario_search_with_array() {
    let search = compile_path("/search", &FormatOptions::default()).unwrap();
    let url = search
        .with_search(&values! { "q" => "foo", "tags" => vec![Value::from("a"), Value::from(1)] })
        .unwrap();
    assert_eq!(url, r#"/search?q=foo&tags=["a",1]"#);
}

#[test]
fn test_scenario_prepend_excluded_from_validation() {
    let tree = Branch::new("").leaf("One", "/users/:id");
    let options = Options::default()
        .with_prepend("http://host")
        .with_regex(UrlCheck::Default);
    let paths = compile(&tree, &options).unwrap();
    assert_eq!(
        leaf(&paths, "One").with_path(values! { "id" => 1 }).unwrap(),
        "http://host/users/1"
    );
}

#[test]
fn test_strict_accepts_keys_in_any_order() {
    let paths = compiled(&Options::default());
    let post = leaf(&paths, "Users.Post");
    assert_eq!(
        post.with_path(values! { "slug" => "hello", "id" => 3 }).unwrap(),
        "/api/users/3/posts/hello"
    );
}

// ============================================================================
// Base accumulation and shape
// ============================================================================

#[rstest]
#[case("", "/api")]
#[case("Users", "/api/users")]
#[case("Posts", "/api/posts")]
#[case("Posts.Private", "/api/posts/private")]
fn test_branch_bases(#[case] dotted: &str, #[case] expected: &str) {
    let paths = compiled(&Options::default());
    let branch = if dotted.is_empty() {
        &paths
    } else {
        paths.lookup(dotted).and_then(CompiledNode::as_branch).unwrap()
    };
    assert_eq!(branch.base(), expected);
}

#[rstest]
#[case("Search", "/api/search")]
#[case("Users.Add", "/api/users/add")]
#[case("Posts.Get", "/api/posts/all")]
fn test_constant_leaves(#[case] dotted: &str, #[case] expected: &str) {
    let paths = compiled(&Options::default());
    assert_eq!(leaf(&paths, dotted).kind(), LeafKind::Constant);
    assert_eq!(leaf(&paths, dotted).as_str(), Some(expected));
}

#[test]
fn test_output_mirrors_input_keys() {
    let tree = api();
    let paths = compile(&tree, &Options::default()).unwrap();

    let mut expected = vec![DEFAULT_BASE_KEY];
    expected.extend(tree.keys());
    assert_eq!(paths.keys().collect::<Vec<_>>(), expected);

    let users = paths.branch("Users").unwrap();
    assert_eq!(users.keys().collect::<Vec<_>>(), vec!["_", "Add", "One", "Post"]);
}

#[test]
fn test_compilation_is_repeatable() {
    let tree = api();
    let first = compile(&tree, &Options::default()).unwrap();
    let second = compile(&tree, &Options::default()).unwrap();

    let one = |paths: &CompiledBranch| leaf(paths, "Users.One").with_path(7).unwrap();
    assert_eq!(one(&first), one(&second));
    assert_eq!(first.branch("Posts").unwrap().base(), second.branch("Posts").unwrap().base());
    // Compiling again leaves the input tree untouched
    assert_eq!(tree, api());
}

#[test]
fn test_compiled_tree_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CompiledBranch>();

    let paths = std::sync::Arc::new(compiled(&Options::default()));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let paths = paths.clone();
            std::thread::spawn(move || leaf(&paths, "Users.One").with_path(i).unwrap())
        })
        .collect();
    let urls: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(urls, vec!["/api/users/0", "/api/users/1", "/api/users/2", "/api/users/3"]);
}

// ============================================================================
// Path parameters
// ============================================================================

#[test]
fn test_substitutes_path_values() {
    let paths = compiled(&Options::default());
    let one = leaf(&paths, "Users.One");
    assert_eq!(one.kind(), LeafKind::Path);
    assert_eq!(one.with_path(values! { "id" => 42 }).unwrap(), "/api/users/42");
}

#[test]
fn test_no_values_returns_template_shape() {
    let paths = compiled(&Options::default());
    assert_eq!(leaf(&paths, "Users.One").url().unwrap(), "/api/users/:id");
    assert_eq!(
        leaf(&paths, "Posts.Private.Delete").url().unwrap(),
        "/api/posts/private/delete/:id"
    );
}

#[test]
fn test_strict_count_mismatch() {
    let paths = compiled(&Options::default());
    let err = leaf(&paths, "Users.Post").with_path(values! { "id" => 1 }).unwrap_err();
    assert!(matches!(err, PathError::ParamCountMismatch { expected: 2, found: 1, .. }));
    assert!(err.to_string().contains("number of keys on the value object"));
}

#[test]
fn test_strict_missing_key() {
    let paths = compiled(&Options::default());
    let err = leaf(&paths, "Users.Post")
        .with_path(values! { "id" => 1, "name" => "x" })
        .unwrap_err();
    assert!(matches!(err, PathError::MissingParamKey { ref key, .. } if key == "slug"));
}

#[test]
fn test_lenient_keeps_placeholders() {
    let paths = compiled(&Options::default().with_strict_key_names(false));
    let post = leaf(&paths, "Users.Post");
    assert_eq!(post.with_path(values! { "id" => 1 }).unwrap(), "/api/users/1/posts/:slug");
    assert_eq!(
        post.with_path(values! { "slug" => "hi", "extra" => true }).unwrap(),
        "/api/users/:id/posts/hi"
    );
}

#[test]
fn test_scalar_broadcasts_to_every_slot() {
    let paths = compiled(&Options::default());
    assert_eq!(leaf(&paths, "Users.One").with_path(5).unwrap(), "/api/users/5");
    assert_eq!(leaf(&paths, "Users.Post").with_path("x").unwrap(), "/api/users/x/posts/x");
}

#[rstest]
#[case(Value::Null, "/api/users/null")]
#[case(Value::Undefined, "/api/users/undefined")]
#[case(Value::from(true), "/api/users/true")]
#[case(Value::from(1.5), "/api/users/1.5")]
#[case(
    Value::from(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
    "/api/users/2024-01-02T03:04:05.000Z"
)]
fn test_primitive_path_values(#[case] value: Value, #[case] expected: &str) {
    let paths = compiled(&Options::default());
    let url = leaf(&paths, "Users.One").with_path(values! { "id" => value }).unwrap();
    assert_eq!(url, expected);
}

#[test]
fn test_percent_encoding() {
    let paths = compiled(&Options::default().with_percent_encode(true));
    assert_eq!(
        leaf(&paths, "Users.One").with_path("a b/c").unwrap(),
        "/api/users/a%20b%2Fc"
    );
    assert_eq!(
        leaf(&paths, "Search").with_search(&values! { "q" => "a&b" }).unwrap(),
        "/api/search?q=a%26b"
    );
}

#[test]
fn test_custom_sigil() {
    let tree = Branch::new("/api").leaf("One", "/users/$id/:literal");
    let paths = compile(&tree, &Options::default().with_sigil('$')).unwrap();
    assert_eq!(
        leaf(&paths, "One").with_path(values! { "id" => 3 }).unwrap(),
        "/api/users/3/:literal"
    );
}

// ============================================================================
// Query strings
// ============================================================================

#[test]
fn test_constant_with_search_values() {
    let paths = compiled(&Options::default());
    let url = leaf(&paths, "Search")
        .with_search(&values! { "q" => "foo", "tags" => vec![Value::from("a"), Value::from(1)] })
        .unwrap();
    assert_eq!(url, r#"/api/search?q=foo&tags=["a",1]"#);
}

#[test]
fn test_nested_query_values_as_json() {
    let paths = compiled(&Options::default());
    let when = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let url = leaf(&paths, "Search")
        .with_search(&values! {
            "filter" => values! { "role" => "admin", "since" => when },
            "n" => Value::Null,
        })
        .unwrap();
    assert_eq!(
        url,
        r#"/api/search?filter={"role":"admin","since":"2024-01-02T03:04:05.000Z"}&n=null"#
    );
}

#[test]
fn test_declared_query_keys() {
    let paths = compiled(&Options::default());
    let find = leaf(&paths, "Find");
    assert_eq!(find.kind(), LeafKind::Query);
    assert_eq!(find.formatter().query_keys(), &["q".to_string(), "page".to_string()]);
    assert_eq!(
        find.with_search(&values! { "page" => 2, "q" => "rust" }).unwrap(),
        "/api/find?page=2&q=rust"
    );
    assert_eq!(find.url().unwrap(), "/api/find");
}

#[test]
fn test_declared_query_keys_strict() {
    let paths = compiled(&Options::default());
    let err = leaf(&paths, "Find").with_search(&values! { "q" => "rust" }).unwrap_err();
    assert!(matches!(err, PathError::QueryKeyMismatch { .. }));

    let lenient = compiled(&Options::default().with_strict_key_names(false));
    assert_eq!(
        leaf(&lenient, "Find").with_search(&values! { "q" => "rust" }).unwrap(),
        "/api/find?q=rust"
    );
}

#[test]
fn test_path_and_search_together() {
    let paths = compiled(&Options::default());
    let url = leaf(&paths, "Users.One")
        .with_path_and_search(values! { "id" => 9 }, &values! { "tab" => "profile" })
        .unwrap();
    assert_eq!(url, "/api/users/9?tab=profile");
}

// ============================================================================
// Validation and prepend
// ============================================================================

#[test]
fn test_prepend_after_validation() {
    let options = Options::default()
        .with_prepend("http://host")
        .with_regex(UrlCheck::Default);
    let paths = compiled(&options);
    assert_eq!(leaf(&paths, "Users.One").with_path(1).unwrap(), "http://host/api/users/1");
    assert_eq!(leaf(&paths, "Users.Add").as_str(), Some("http://host/api/users/add"));
    assert_eq!(paths.branch("Users").unwrap().base(), "http://host/api/users");
}

#[test]
fn test_validation_rejects_bad_values() {
    let paths = compiled(&Options::default().with_regex(UrlCheck::Default));
    let err = leaf(&paths, "Posts.Private.Delete")
        .with_path("bar 62 23*(&^")
        .unwrap_err();
    assert!(matches!(err, PathError::RegexValidationFailure { .. }));
    assert!(err.to_string().contains("failed to pass validation"));

    assert!(leaf(&paths, "Search").with_search(&values! { "q" => "ok" }).is_ok());
}

#[test]
fn test_validation_disabled_by_default() {
    let paths = compiled(&Options::default());
    assert_eq!(
        leaf(&paths, "Users.One").with_path("has space").unwrap(),
        "/api/users/has space"
    );
}

#[test]
fn test_custom_validation_pattern() {
    let tree = Branch::new("/api").branch("Users", Branch::new("/users").leaf("One", "/:id"));
    let options = Options::default().with_regex(UrlCheck::Pattern(r"^/api(/users(/\d+)?)?$".into()));
    let paths = compile(&tree, &options).unwrap();
    assert!(leaf(&paths, "Users.One").with_path(12).is_ok());
    assert!(leaf(&paths, "Users.One").with_path("abc").is_err());
    assert_eq!(leaf(&paths, "Users.One").url().unwrap(), "/api/users/:id");
}

#[test]
fn test_constant_fails_validation_at_compile_time() {
    let tree = Branch::new("/api").leaf("Bad", "/has space");
    let err = compile(&tree, &Options::default().with_regex(UrlCheck::Default)).unwrap_err();
    assert!(matches!(err, PathError::RegexValidationFailure { .. }));
}

#[test]
fn test_invalid_pattern_fails_compilation() {
    let err = compile(&api(), &Options::default().with_regex(UrlCheck::Pattern("[".into()))).unwrap_err();
    assert!(matches!(err, PathError::InvalidRegex { .. }));
}

// ============================================================================
// Tree structure errors
// ============================================================================

#[test]
fn test_missing_base_key_names_node() {
    let err = compile_json(
        &json!({ "_": "/api", "Users": { "Add": "/add" } }),
        &Options::default(),
    )
    .unwrap_err();
    assert!(matches!(err, PathError::MissingBaseKey { ref label } if label == "Users"));
    assert!(err.to_string().contains("Users"));
}

#[rstest]
#[case(json!({ "Users": "/users" }))]
#[case(json!({ "_": 5 }))]
#[case(json!("/api"))]
fn test_bad_root(#[case] root: serde_json::Value) {
    let err = compile_json(&root, &Options::default()).unwrap_err();
    assert!(matches!(err, PathError::MissingBaseKey { .. }));
}

#[test]
fn test_custom_base_key() {
    let options = Options::default().with_base_key("Root");
    let paths = compile_json(
        &json!({ "Root": "/api", "Users": { "Root": "/users", "One": "/:id" } }),
        &options,
    )
    .unwrap();
    assert_eq!(paths.base_key(), "Root");
    assert_eq!(paths.branch("Users").unwrap().base(), "/api/users");
    assert_eq!(leaf(&paths, "Users.Root").as_str(), Some("/api/users"));
}

#[test]
fn test_leading_slash_enforcement() {
    let options = Options::default().with_leading_slash_enforced(true);
    assert!(compile(&api(), &options).is_ok());

    let tree = Branch::new("/api").branch("Users", Branch::new("users"));
    let err = compile(&tree, &options).unwrap_err();
    assert!(matches!(err, PathError::ForwardSlashViolation { ref path, .. } if path == "users"));
}

// ============================================================================
// Standalone templates
// ============================================================================

#[test]
fn test_compile_path_standalone() {
    let leaf = compile_path("/:id/:slug", &FormatOptions::default()).unwrap();
    let err = leaf.with_path(values! { "id" => 1 }).unwrap_err();
    assert!(matches!(err, PathError::ParamCountMismatch { .. }));
    assert_eq!(
        leaf.with_path(values! { "slug" => "post", "id" => 1 }).unwrap(),
        "/1/post"
    );
}

// ============================================================================
// Route files
// ============================================================================

#[test]
fn test_load_toml_routes_file() {
    init_tracing();
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    write!(
        file,
        r#"
[options]
prepend = "http://host"
regex = true

[routes]
_ = "/api"
Health = "/health"

[routes.Users]
_ = "/users"
One = "/:id"
"#
    )
    .unwrap();

    let routes = RoutesFile::load(file.path()).unwrap();
    let paths = routes.compile().unwrap();
    assert_eq!(leaf(&paths, "Health").as_str(), Some("http://host/api/health"));
    assert_eq!(leaf(&paths, "Users.One").with_path(1).unwrap(), "http://host/api/users/1");
    assert_eq!(paths.keys().collect::<Vec<_>>(), vec!["_", "Health", "Users"]);
}

#[test]
fn test_load_json_routes_file() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"{{ "options": {{ "strict_key_names": false }}, "routes": {{ "_": "", "One": "/:a/:b" }} }}"#
    )
    .unwrap();

    let paths = RoutesFile::load(file.path()).unwrap().compile().unwrap();
    assert_eq!(leaf(&paths, "One").with_path(values! { "a" => 1 }).unwrap(), "/1/:b");
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = RoutesFile::load(dir.path().join("routes.toml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read routes file"));
}
