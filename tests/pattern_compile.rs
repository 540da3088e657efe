use pathrank::config::PathFlags;
use pathrank::location::{ParamValue, RouteParams};
use pathrank::pattern::{CompiledPath, InterpolateError, PatternError};

fn compile(template: &str) -> CompiledPath {
    CompiledPath::compile(template, &[], PathFlags::default()).expect("template should compile")
}

#[test]
fn compiles_static_and_parameter_template() {
    let compiled = compile("/users/:id");
    assert_eq!(compiled.expression(), "^/users/([^/]+?)/?$");
    assert_eq!(compiled.keys().len(), 1);
    assert_eq!(compiled.keys()[0].name, "id");

    let params = compiled.captures("/users/42").expect("path should match");
    assert_eq!(params.get("id"), Some(&ParamValue::Single("42".to_string())));
    assert!(compiled.captures("/users/42/extra").is_none());
}

#[test]
fn custom_expression_narrows_the_match() {
    let compiled = compile("/orders/:id(\\d+)");
    assert!(compiled.is_match("/orders/10"));
    assert!(!compiled.is_match("/orders/ten"));
}

#[test]
fn repeatable_parameter_collects_every_repetition() {
    let compiled = compile("/files/:parts+");
    let params = compiled.captures("/files/a/b/c").expect("path should match");
    assert_eq!(
        params.get("parts"),
        Some(&ParamValue::List(vec![
            "a".to_string(),
            "b".to_string(),
            "c".to_string()
        ]))
    );
    assert!(!compiled.is_match("/files"));
}

#[test]
fn optional_parameter_matches_with_and_without_a_value() {
    let compiled = compile("/pages/:slug?");
    assert_eq!(compiled.expression(), "^/pages(?:/([^/]+?))?/?$");

    let present = compiled.captures("/pages/home").expect("path should match");
    assert_eq!(
        present.get("slug"),
        Some(&ParamValue::Single("home".to_string()))
    );

    let absent = compiled.captures("/pages").expect("path should match");
    assert_eq!(absent.get("slug"), Some(&ParamValue::Single(String::new())));
}

#[test]
fn anonymous_group_captures_positionally() {
    let compiled = compile("/foo(/bar)?");
    assert!(compiled.is_match("/foo"));
    assert!(compiled.is_match("/foo/bar"));
    assert_eq!(compiled.keys()[0].name, "0");
}

#[test]
fn child_tokens_append_to_the_parent_chain() {
    let parent = compile("/user");
    let child = CompiledPath::compile("profile", parent.tokens(), PathFlags::default())
        .expect("child should compile");
    assert_eq!(child.expression(), "^/user/profile/?$");
}

#[test]
fn absolute_child_replaces_the_parent_chain() {
    let parent = compile("/user");
    let child = CompiledPath::compile("/admin", parent.tokens(), PathFlags::default())
        .expect("child should compile");
    assert_eq!(child.expression(), "^/admin/?$");
}

#[test]
fn empty_child_keeps_the_parent_chain() {
    let parent = compile("/user/:id");
    let child = CompiledPath::compile("", parent.tokens(), PathFlags::default())
        .expect("child should compile");
    assert_eq!(child.expression(), parent.expression());
    assert_eq!(child.keys().len(), 1);
}

#[test]
fn trailing_slash_join_does_not_double_the_separator() {
    let parent = compile("/user/");
    let child = CompiledPath::compile("list", parent.tokens(), PathFlags::default())
        .expect("child should compile");
    assert_eq!(child.expression(), "^/user/list/?$");
}

#[test]
fn strict_keeps_the_trailing_separator_mandatory() {
    let loose = compile("/user/");
    assert!(loose.is_match("/user"));
    assert!(loose.is_match("/user/"));

    let strict = CompiledPath::compile("/user/", &[], PathFlags::STRICT | PathFlags::END)
        .expect("template should compile");
    assert!(!strict.is_match("/user"));
    assert!(strict.is_match("/user/"));
}

#[test]
fn sensitive_compiles_a_case_sensitive_expression() {
    let insensitive = compile("/User");
    assert!(insensitive.is_match("/user"));

    let sensitive = CompiledPath::compile("/User", &[], PathFlags::SENSITIVE | PathFlags::END)
        .expect("template should compile");
    assert!(sensitive.is_match("/User"));
    assert!(!sensitive.is_match("/user"));
}

#[test]
fn unanchored_expression_matches_a_prefix() {
    let fallback = CompiledPath::compile("/a", &[], PathFlags::empty())
        .expect("template should compile");
    assert!(fallback.is_match("/a"));
    assert!(fallback.is_match("/a/"));
    assert!(fallback.is_match("/ab"));
    assert!(fallback.is_match("/a/b"));
}

#[test]
fn strict_prefix_expression_stops_at_segment_boundaries() {
    let fallback = CompiledPath::compile("/a", &[], PathFlags::STRICT)
        .expect("template should compile");
    assert!(fallback.is_match("/a"));
    assert!(fallback.is_match("/a/"));
    assert!(!fallback.is_match("/ab"));
    assert!(fallback.is_match("/a/b"));
}

#[test]
fn interpolate_substitutes_parameters() {
    let compiled = compile("/users/:id/posts/:post");
    let mut params = RouteParams::new();
    params.insert("id".to_string(), ParamValue::from("7"));
    params.insert("post".to_string(), ParamValue::from("42"));
    let path = compiled.interpolate(&params).expect("path should generate");
    assert_eq!(path, "/users/7/posts/42");
}

#[test]
fn interpolate_joins_repeatable_values() {
    let compiled = compile("/files/:parts+");
    let mut params = RouteParams::new();
    params.insert(
        "parts".to_string(),
        ParamValue::from(vec!["a".to_string(), "b".to_string()]),
    );
    let path = compiled.interpolate(&params).expect("path should generate");
    assert_eq!(path, "/files/a/b");
}

#[test]
fn interpolate_drops_an_absent_optional_segment() {
    let compiled = compile("/pages/:slug?");
    let path = compiled
        .interpolate(&RouteParams::new())
        .expect("path should generate");
    assert_eq!(path, "/pages");
}

#[test]
fn interpolate_reports_missing_required_parameter() {
    let compiled = compile("/users/:id");
    let err = compiled
        .interpolate(&RouteParams::new())
        .expect_err("expected missing parameter error");
    match err {
        InterpolateError::MissingParam { name } => assert_eq!(name, "id"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn interpolate_checks_custom_expressions() {
    let compiled = compile("/orders/:id(\\d+)");
    let mut params = RouteParams::new();
    params.insert("id".to_string(), ParamValue::from("abc"));
    let err = compiled
        .interpolate(&params)
        .expect_err("expected mismatch error");
    match err {
        InterpolateError::ParamMismatch { name, value } => {
            assert_eq!(name, "id");
            assert_eq!(value, "abc");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn interpolate_rejects_a_list_for_a_single_parameter() {
    let compiled = compile("/users/:id");
    let mut params = RouteParams::new();
    params.insert(
        "id".to_string(),
        ParamValue::from(vec!["1".to_string(), "2".to_string()]),
    );
    let err = compiled
        .interpolate(&params)
        .expect_err("expected list rejection");
    match err {
        InterpolateError::UnexpectedList { name } => assert_eq!(name, "id"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn invalid_custom_expression_fails_compilation() {
    let err = CompiledPath::compile("/users/:id([)", &[], PathFlags::default())
        .expect_err("invalid regex should fail");
    match err {
        PatternError::InvalidParamExpression { name, .. } => assert_eq!(name, "id"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn relative_template_without_a_parent_fails() {
    let err = CompiledPath::compile("profile", &[], PathFlags::default())
        .expect_err("relative root template should fail");
    match err {
        PatternError::MissingLeadingSlash { template } => assert_eq!(template, "profile"),
        other => panic!("unexpected error: {other:?}"),
    }
}
