//! Call-shape disambiguation and positional-to-named translation.

use serde_json::Value;

use crate::error::ApiError;
use crate::path::EndpointPath;
use crate::registry::EndpointRegistry;
use crate::transport::Params;

/// Shape of the arguments at a call site.
///
/// Built once where the arguments are gathered ([`Call::from_args`] or one of
/// the `From` impls) and matched exhaustively by [`resolve`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    /// No arguments: the request carries no parameters
    NoArgs,
    /// A single JSON object, already keyed by parameter name
    Keyed(Params),
    /// Values matched in order against the endpoint's registered argument names
    Positional(Vec<Value>),
}

impl Call {
    /// Classify a raw argument list.
    ///
    /// Exactly one JSON object becomes [`Call::Keyed`]; an empty list is
    /// [`Call::NoArgs`]; anything else (a lone scalar, array or `null`, or
    /// several values) is [`Call::Positional`].
    #[must_use]
    pub fn from_args(args: Vec<Value>) -> Self {
        let mut rest = args.into_iter();
        match (rest.next(), rest.next()) {
            (None, _) => Call::NoArgs,
            (Some(Value::Object(params)), None) => Call::Keyed(params),
            (Some(first), second) => Call::Positional(
                std::iter::once(first).chain(second).chain(rest).collect(),
            ),
        }
    }

    fn shape(&self) -> &'static str {
        match self {
            Call::NoArgs => "no_args",
            Call::Keyed(_) => "keyed",
            Call::Positional(_) => "positional",
        }
    }
}

impl From<Vec<Value>> for Call {
    fn from(args: Vec<Value>) -> Self {
        Call::from_args(args)
    }
}

impl From<Params> for Call {
    fn from(params: Params) -> Self {
        Call::Keyed(params)
    }
}

impl From<()> for Call {
    fn from((): ()) -> Self {
        Call::NoArgs
    }
}

/// Turn a call into the parameter set handed to the transport.
///
/// Returns `Ok(None)` for a parameterless request.
///
/// # Errors
///
/// Returns [`ApiError::MissingArgNames`] for a positional call when `path`
/// has no registry entry or its argument-name list is empty.
pub fn resolve(
    registry: &EndpointRegistry,
    path: &EndpointPath,
    call: Call,
) -> Result<Option<Params>, ApiError> {
    tracing::debug!(path = %path, shape = call.shape(), "resolving endpoint call");

    match call {
        Call::NoArgs => Ok(None),
        Call::Keyed(params) => Ok(Some(params)),
        Call::Positional(values) => {
            let config = registry
                .lookup(path.as_str())
                .filter(|config| !config.arg_names().is_empty())
                .ok_or_else(|| ApiError::MissingArgNames {
                    path: path.to_string(),
                })?;
            Ok(Some(bind_positional(config.arg_names(), values)))
        }
    }
}

/// Pair names with values by index. Extra values are dropped; missing ones
/// bind to `null`.
fn bind_positional(names: &[String], values: Vec<Value>) -> Params {
    let mut values = values.into_iter();
    names
        .iter()
        .map(|name| (name.clone(), values.next().unwrap_or(Value::Null)))
        .collect()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::registry::EndpointConfig;
    use serde_json::json;

    fn registry_with(path: &str, names: &[&str]) -> EndpointRegistry {
        let mut registry = EndpointRegistry::new();
        registry.register(
            EndpointPath::normalize(path),
            EndpointConfig::new(names.iter().copied()),
        );
        registry
    }

    #[test]
    fn test_from_args_shapes() {
        assert_eq!(Call::from_args(vec![]), Call::NoArgs);
        assert_eq!(
            Call::from_args(vec![json!({"a": 1})]),
            Call::Keyed(json!({"a": 1}).as_object().unwrap().clone())
        );
        assert_eq!(
            Call::from_args(vec![json!("x")]),
            Call::Positional(vec![json!("x")])
        );
        assert_eq!(
            Call::from_args(vec![json!(null)]),
            Call::Positional(vec![json!(null)])
        );
        assert_eq!(
            Call::from_args(vec![json!([1, 2])]),
            Call::Positional(vec![json!([1, 2])])
        );
        assert_eq!(
            Call::from_args(vec![json!({"a": 1}), json!(2)]),
            Call::Positional(vec![json!({"a": 1}), json!(2)])
        );
    }

    #[test]
    fn test_no_args_has_no_params() {
        let registry = EndpointRegistry::new();
        let path = EndpointPath::normalize("ping");
        assert_eq!(resolve(&registry, &path, Call::NoArgs).unwrap(), None);
    }

    #[test]
    fn test_keyed_skips_registry() {
        let registry = EndpointRegistry::new();
        let path = EndpointPath::normalize("user/login");
        let params = json!({"email": "a@b.com", "password": "pw"})
            .as_object()
            .unwrap()
            .clone();
        let resolved = resolve(&registry, &path, Call::Keyed(params.clone())).unwrap();
        assert_eq!(resolved, Some(params));
    }

    #[test]
    fn test_positional_binds_names_in_order() {
        let registry = registry_with("user/login", &["email", "password"]);
        let path = EndpointPath::normalize("user.login");
        let resolved = resolve(
            &registry,
            &path,
            Call::from_args(vec![json!("a@b.com"), json!("pw")]),
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            serde_json::Value::Object(resolved),
            json!({"email": "a@b.com", "password": "pw"})
        );
    }

    #[test]
    fn test_positional_drops_extra_and_nulls_missing() {
        let registry = registry_with("calc/add", &["a", "b", "c"]);
        let path = EndpointPath::normalize("calc/add");

        let short = resolve(&registry, &path, Call::Positional(vec![json!(1)]))
            .unwrap()
            .unwrap();
        assert_eq!(
            serde_json::Value::Object(short),
            json!({"a": 1, "b": null, "c": null})
        );

        let long = resolve(
            &registry,
            &path,
            Call::Positional(vec![json!(1), json!(2), json!(3), json!(4)]),
        )
        .unwrap()
        .unwrap();
        assert_eq!(long.len(), 3);
    }

    #[test]
    fn test_positional_without_registry_entry_fails() {
        let registry = EndpointRegistry::new();
        let path = EndpointPath::normalize("user/login");
        let err = resolve(&registry, &path, Call::from_args(vec![json!("a"), json!("b")]))
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingArgNames { ref path } if path == "user/login"));
    }

    #[test]
    fn test_positional_with_empty_names_fails() {
        let registry = registry_with("user/logout", &[]);
        let path = EndpointPath::normalize("user/logout");
        let err = resolve(&registry, &path, Call::from_args(vec![json!("now")])).unwrap_err();
        assert!(err.is_configuration());
    }
}
