use formwork_params::{ParamMap, Params, QueryError, parse_query};

fn text(value: &str) -> Params {
    Params::text(value)
}

#[test]
fn test_indexed_collection_submission() {
    let params = parse_query(
        "user[addresses][0][street]=Main&user[addresses][0][city]=Oslo&user[addresses][1][street]=Side",
    )
    .unwrap();
    let addresses = params
        .get("user")
        .and_then(|user| user.get("addresses"))
        .unwrap();
    let streets: Vec<_> = addresses
        .positional()
        .into_iter()
        .map(|address| address.get_or_null("street").clone())
        .collect();
    assert_eq!(streets, vec![text("Main"), text("Side")]);
}

#[test]
fn test_hidden_marker_then_values() {
    // A multi-select posts an empty marker before the chosen values.
    let params = parse_query("user[role_ids][]=&user[role_ids][]=2&user[role_ids][]=5").unwrap();
    assert_eq!(
        params.get("user").and_then(|user| user.get("role_ids")),
        Some(&Params::Array(vec![text(""), text("2"), text("5")]))
    );
}

#[test]
fn test_from_pairs_matches_parse_query() {
    let pairs = vec![
        ("post[title]", "Hello"),
        ("post[tags][]", "a"),
        ("post[tags][]", "b"),
    ];
    assert_eq!(
        Params::from_pairs(pairs).unwrap(),
        parse_query("post[title]=Hello&post[tags][]=a&post[tags][]=b").unwrap()
    );
}

#[test]
fn test_unicode_keys_and_values() {
    let params = parse_query("%C3%A9t%C3%A9[nom]=Z%C3%B6e").unwrap();
    let mut inner = ParamMap::new();
    inner.insert("nom", "Zöe");
    let mut root = ParamMap::new();
    root.insert("été", Params::Map(inner));
    assert_eq!(params, Params::Map(root));
}

#[test]
fn test_conflicting_shapes_report_key() {
    let err = parse_query("post[tags][]=a&post[tags][x]=b").unwrap_err();
    assert!(matches!(err, QueryError::TypeConflict { ref key, .. } if key == "tags"));
}
