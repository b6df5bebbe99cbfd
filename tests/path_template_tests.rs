use std::collections::{BTreeMap, HashMap};
use vault_provider_codegen::path::{parse_path, path_parameters, PathError, PathTemplate};

fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_resolve_then_extract_round_trip() {
    let cases = [
        ("tf", "/transform/role/{name}", values(&[("name", "payments")])),
        ("my-transform", "/transform/encode/{role_name}", values(&[("role_name", "ccn")])),
        ("jwt-prod", "/auth/jwt/config", values(&[])),
        ("approle", "/auth/approle/role/{role_name}/secret-id", values(&[("role_name", "ci")])),
        ("nested/mount", "/transform/alphabet/{name}", values(&[("name", "digits")])),
    ];

    for (mount, endpoint, vals) in cases {
        let path = parse_path(mount, endpoint, &vals).unwrap();
        let params = path_parameters(endpoint, &path).unwrap();
        assert_eq!(params["path"], mount, "{endpoint} -> {path}");
        for (k, v) in &vals {
            assert_eq!(&params[k], v, "{endpoint} -> {path}");
        }
        assert_eq!(params.len(), vals.len() + 1);
    }
}

#[test]
fn test_auth_mount_is_not_prefixed_twice() {
    let vals = values(&[("role_name", "ci")]);
    let expected = "/auth/approle-ci/role/ci";
    assert_eq!(
        parse_path("approle-ci", "/auth/approle/role/{role_name}", &vals).unwrap(),
        expected
    );
    assert_eq!(
        parse_path("auth/approle-ci", "/auth/approle/role/{role_name}", &vals).unwrap(),
        expected
    );
}

#[test]
fn test_btreemap_source() {
    let vals: BTreeMap<String, String> =
        BTreeMap::from([("name".to_string(), "r1".to_string())]);
    assert_eq!(
        parse_path("tf", "/transform/role/{name}", &vals).unwrap(),
        "/tf/role/r1"
    );
}

#[test]
fn test_extract_rejects_other_endpoint_paths() {
    let err = path_parameters("/transform/role/{name}", "/tf/template/r1").unwrap_err();
    assert!(matches!(err, PathError::PathMismatch { .. }));
    assert!(path_parameters("/transform/role/{name}", "/tf/role").is_err());
    assert!(path_parameters("/auth/jwt/config", "/jwt/config").is_err());
}

#[test]
fn test_strict_resolution_reports_missing_placeholders() {
    let template = PathTemplate::parse("/transform/decode/{role_name}").unwrap();
    let err = template
        .resolve_complete("tf", &values(&[]))
        .unwrap_err();
    match err {
        PathError::Unresolved { path, placeholders } => {
            assert_eq!(path, "/tf/decode/{role_name}");
            assert_eq!(placeholders, vec!["role_name".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_invalid_templates() {
    assert!(matches!(
        PathTemplate::parse("transform/role"),
        Err(PathError::InvalidTemplate { .. })
    ));
    assert!(PathTemplate::parse("/").is_err());
    assert!(PathTemplate::parse("/transform/role/{{name}}").is_err());
}
