#![deny(missing_docs)]

//! # Server URL Resolution
//!
//! Resolves relative server URLs against the retrieval location of the
//! document that declares them, substitutes server variables and derives the
//! server list of Swagger 2.0 documents from `host` / `basePath` / `schemes`.

use crate::error::{AppError, AppResult};
use crate::oas::models::{ServerInfo, ServerVariable};
use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;
use url::Url;

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([^}]+)}").expect("Invalid regex constant"))
}

fn scheme_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://").expect("Invalid regex constant"))
}

/// Names of `{placeholder}` segments in a server URL template, in order.
pub fn server_placeholders(url: &str) -> Vec<String> {
    placeholder_re()
        .captures_iter(url)
        .map(|cap| cap[1].to_string())
        .collect()
}

/// Resolves a (possibly relative) server URL against `base`.
///
/// Absolute URLs (including templated hosts) are returned as written. Only
/// `http(s)` bases are used; without one the URL is left relative. Template
/// braces survive resolution unescaped.
pub fn resolve_server_url(url: &str, base: Option<&Url>) -> String {
    if scheme_re().is_match(url) {
        return url.to_string();
    }
    let Some(base) = base.filter(|b| matches!(b.scheme(), "http" | "https")) else {
        return url.to_string();
    };
    match base.join(url) {
        Ok(joined) => joined
            .to_string()
            .replace("%7B", "{")
            .replace("%7D", "}"),
        Err(_) => url.to_string(),
    }
}

/// Substitutes `{name}` placeholders with supplied values or variable defaults.
///
/// Values for enum-constrained variables must be members of the enum.
pub fn substitute_server_variables(
    server: &ServerInfo,
    values: &HashMap<String, String>,
) -> AppResult<String> {
    let mut out = server.url.clone();
    for name in server_placeholders(&server.url) {
        let Some(var) = server.variables.get(&name) else {
            return Err(AppError::Validation(format!(
                "Server URL '{}' references undefined variable '{}'",
                server.url, name
            )));
        };
        let value = values.get(&name).unwrap_or(&var.default);
        if let Some(allowed) = &var.enum_values {
            if !allowed.contains(value) {
                return Err(AppError::Validation(format!(
                    "Server variable '{}' value '{}' is not one of [{}]",
                    name,
                    value,
                    allowed.join(", ")
                )));
            }
        }
        out = out.replace(&format!("{{{}}}", name), value);
    }
    Ok(out)
}

/// Parses a `servers` array into `ServerInfo`s, resolving URLs against `base`.
pub fn parse_servers(value: Option<&Value>, base: Option<&Url>) -> Vec<ServerInfo> {
    value
        .and_then(|v| v.as_array())
        .map(|servers| {
            servers
                .iter()
                .filter_map(|server| parse_server(server, base))
                .collect()
        })
        .unwrap_or_default()
}

fn parse_server(value: &Value, base: Option<&Url>) -> Option<ServerInfo> {
    let url = value.get("url")?.as_str()?;
    let variables = value
        .get("variables")
        .and_then(|v| v.as_object())
        .map(|vars| {
            vars.iter()
                .map(|(name, var)| (name.clone(), parse_variable(var)))
                .collect::<IndexMap<_, _>>()
        })
        .unwrap_or_default();

    Some(ServerInfo {
        url: resolve_server_url(url, base),
        description: value
            .get("description")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        name: value.get("name").and_then(|v| v.as_str()).map(str::to_string),
        variables,
    })
}

fn parse_variable(value: &Value) -> ServerVariable {
    ServerVariable {
        default: value
            .get("default")
            .map(|d| match d {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_default(),
        enum_values: value.get("enum").and_then(|v| v.as_array()).map(|vals| {
            vals.iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        }),
        description: value
            .get("description")
            .and_then(|v| v.as_str())
            .map(str::to_string),
    }
}

/// Derives servers for a Swagger 2.0 document.
///
/// An explicit `servers` array wins. Otherwise one server per scheme is built
/// from `host` + `basePath`, falling back to the fetch location's host and
/// scheme; with no host at all only a relative `basePath` server remains, and
/// with nothing the list is empty.
pub fn swagger_servers(spec: &Value, fetch_uri: Option<&Url>) -> Vec<ServerInfo> {
    if spec.get("servers").and_then(|v| v.as_array()).is_some() {
        return parse_servers(spec.get("servers"), fetch_uri);
    }

    let remote = fetch_uri.filter(|u| matches!(u.scheme(), "http" | "https"));
    let base_path = spec
        .get("basePath")
        .and_then(|v| v.as_str())
        .filter(|p| !p.is_empty());

    let host = spec
        .get("host")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .or_else(|| {
            remote.and_then(|u| {
                u.host_str().map(|h| match u.port() {
                    Some(port) => format!("{}:{}", h, port),
                    None => h.to_string(),
                })
            })
        });

    let Some(host) = host else {
        return base_path
            .map(|p| vec![ServerInfo::new(p)])
            .unwrap_or_default();
    };

    let schemes: Vec<String> = match spec.get("schemes").and_then(|v| v.as_array()) {
        Some(list) if !list.is_empty() => list
            .iter()
            .filter_map(|s| s.as_str())
            .map(str::to_string)
            .collect(),
        _ => vec![remote
            .map(|u| u.scheme().to_string())
            .unwrap_or_else(|| "https".to_string())],
    };

    let path = base_path.unwrap_or("");
    let path = if path.is_empty() || path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };

    schemes
        .into_iter()
        .map(|scheme| ServerInfo::new(format!("{}://{}{}", scheme, host, path)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Url {
        Url::parse("https://example.com/docs/openapi.json").unwrap()
    }

    #[test]
    fn test_relative_server_resolution() {
        assert_eq!(
            resolve_server_url("v1/api", Some(&base())),
            "https://example.com/docs/v1/api"
        );
        assert_eq!(
            resolve_server_url("/root/api", Some(&base())),
            "https://example.com/root/api"
        );
        assert_eq!(resolve_server_url("/", None), "/");
    }

    #[test]
    fn test_templates_survive_resolution() {
        assert_eq!(
            resolve_server_url("https://{tenant}.example.com/{version}", Some(&base())),
            "https://{tenant}.example.com/{version}"
        );
        assert_eq!(
            resolve_server_url("/api/{version}", Some(&base())),
            "https://example.com/api/{version}"
        );
    }

    #[test]
    fn test_file_base_is_not_used() {
        let file = Url::parse("file:///specs/openapi.yaml").unwrap();
        assert_eq!(resolve_server_url("v1", Some(&file)), "v1");
    }

    #[test]
    fn test_substitute_server_variables() {
        let servers = parse_servers(
            Some(&json!([{
                "url": "https://{env}.example.com/{version}",
                "variables": {
                    "env": {"default": "prod", "enum": ["prod", "staging"]},
                    "version": {"default": "v1"}
                }
            }])),
            None,
        );
        let server = &servers[0];
        assert_eq!(
            substitute_server_variables(server, &HashMap::new()).unwrap(),
            "https://prod.example.com/v1"
        );
        let values = HashMap::from([("env".to_string(), "staging".to_string())]);
        assert_eq!(
            substitute_server_variables(server, &values).unwrap(),
            "https://staging.example.com/v1"
        );
        let bad = HashMap::from([("env".to_string(), "dev".to_string())]);
        assert!(substitute_server_variables(server, &bad).is_err());
    }

    #[test]
    fn test_swagger_servers_one_per_scheme() {
        let spec = json!({"swagger": "2.0", "host": "api.example.com", "basePath": "/v2", "schemes": ["http", "https"]});
        let urls: Vec<String> = swagger_servers(&spec, None).into_iter().map(|s| s.url).collect();
        assert_eq!(urls, vec!["http://api.example.com/v2", "https://api.example.com/v2"]);
    }

    #[test]
    fn test_swagger_servers_fallbacks() {
        let no_host = json!({"swagger": "2.0", "basePath": "/v2"});
        let fetched = Url::parse("http://localhost:8080/swagger.json").unwrap();
        let urls: Vec<String> = swagger_servers(&no_host, Some(&fetched))
            .into_iter()
            .map(|s| s.url)
            .collect();
        assert_eq!(urls, vec!["http://localhost:8080/v2"]);

        let relative: Vec<String> = swagger_servers(&no_host, None).into_iter().map(|s| s.url).collect();
        assert_eq!(relative, vec!["/v2"]);

        assert!(swagger_servers(&json!({"swagger": "2.0"}), None).is_empty());
    }
}
