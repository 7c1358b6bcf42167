use http::Method;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost,https://localhost,http://127.0.0.1,https://127.0.0.1";

/// Build a CORS layer with the given allowed origin prefixes.
///
/// Pass "*" in the origins list to allow all origins (not recommended for production).
#[must_use]
pub fn build_cors_layer(cors_origins: Vec<String>) -> CorsLayer {
    let allow_all_origins = cors_origins.iter().any(|o| o == "*");

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin, _| {
            if allow_all_origins {
                return true;
            }
            origin.to_str().is_ok_and(|origin_str| {
                cors_origins
                    .iter()
                    .any(|allowed| origin_str.starts_with(allowed.as_str()))
            })
        }))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers(Any)
        .expose_headers(Any)
}

/// Trim, drop empties and split comma-separated entries.
#[must_use]
pub fn normalize_origins<I, S>(origins: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    origins
        .into_iter()
        .flat_map(|s| {
            s.as_ref()
                .split(',')
                .map(|part| part.trim().to_string())
                .collect::<Vec<_>>()
        })
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_origins_trims_and_splits() {
        let origins = normalize_origins(["http://a.test , ", "http://b.test,http://c.test"]);
        assert_eq!(origins, vec!["http://a.test", "http://b.test", "http://c.test"]);
    }

    #[test]
    fn test_default_origins_are_local() {
        let origins = normalize_origins([DEFAULT_CORS_ORIGINS]);
        assert!(origins.iter().all(|o| o.contains("localhost") || o.contains("127.0.0.1")));
    }
}
