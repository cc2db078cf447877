use super::*;
use serial_test::serial;
use std::env;
use std::net::IpAddr;
use std::time::Duration;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_scholarmatch_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("SCHOLARMATCH_PORT");
        env::remove_var("SCHOLARMATCH_BIND_ADDR");
        env::remove_var("SCHOLARMATCH_QDRANT_URL");
        env::remove_var("SCHOLARMATCH_COLLECTION");
        env::remove_var("SCHOLARMATCH_EMBEDDER_URL");
        env::remove_var("SCHOLARMATCH_EMBEDDER_MODEL");
        env::remove_var("SCHOLARMATCH_EMBEDDER_API_KEY");
        env::remove_var("SCHOLARMATCH_RERANK_MODEL");
        env::remove_var("SCHOLARMATCH_EMBED_TIMEOUT_MS");
        env::remove_var("SCHOLARMATCH_RETRIEVE_TIMEOUT_MS");
        env::remove_var("SCHOLARMATCH_RERANK_TIMEOUT_MS");
        env::remove_var("SCHOLARMATCH_RERANK_CACHE_TTL_SECS");
        env::remove_var("SCHOLARMATCH_RERANK_CACHE_CAPACITY");
        env::remove_var("SCHOLARMATCH_TELEMETRY_CAPACITY");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.port, 8080);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
    assert_eq!(config.qdrant_url, "http://localhost:6334");
    assert_eq!(config.collection, crate::store::DEFAULT_COLLECTION_NAME);
    assert_eq!(config.collection, "scholarships");
    assert!(config.embedder_api_key.is_none());
    assert_eq!(config.rerank_cache_ttl, Duration::from_secs(86_400));
    assert_eq!(config.rerank_cache_capacity, 10_000);
    assert_eq!(config.telemetry_capacity, 200);
}

#[test]
fn test_socket_addr() {
    let config = Config::default();
    assert_eq!(config.socket_addr(), "127.0.0.1:8080");

    let config = Config {
        port: 3000,
        bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)),
        ..Default::default()
    };
    assert_eq!(config.socket_addr(), "0.0.0.0:3000");
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_scholarmatch_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.port, 8080);
    assert_eq!(config.embedder_model, "text-embedding-3-small");
    assert_eq!(config.rerank_model, "gpt-4o-mini");
}

#[test]
#[serial]
fn test_from_env_custom_port() {
    clear_scholarmatch_env();

    with_env_vars(&[("SCHOLARMATCH_PORT", "3000")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.port, 3000);
    });
}

#[test]
#[serial]
fn test_from_env_ipv6_bind_addr() {
    clear_scholarmatch_env();

    with_env_vars(&[("SCHOLARMATCH_BIND_ADDR", "::1")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(
            config.bind_addr,
            IpAddr::V6(std::net::Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 1))
        );
    });
}

#[test]
#[serial]
fn test_invalid_port_zero() {
    clear_scholarmatch_env();

    with_env_vars(&[("SCHOLARMATCH_PORT", "0")], || {
        let result = Config::from_env();
        assert!(result.is_err());

        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
        assert!(err.to_string().contains("invalid port"));
    });
}

#[test]
#[serial]
fn test_invalid_port_not_number() {
    clear_scholarmatch_env();

    with_env_vars(&[("SCHOLARMATCH_PORT", "not_a_port")], || {
        let result = Config::from_env();
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::PortParseError { .. }
        ));
    });
}

#[test]
#[serial]
fn test_invalid_bind_addr() {
    clear_scholarmatch_env();

    with_env_vars(&[("SCHOLARMATCH_BIND_ADDR", "not.an.ip.address")], || {
        let result = Config::from_env();
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidBindAddr { .. }
        ));
    });
}

#[test]
#[serial]
fn test_from_env_timeouts_and_capacities() {
    clear_scholarmatch_env();

    with_env_vars(
        &[
            ("SCHOLARMATCH_EMBED_TIMEOUT_MS", "2500"),
            ("SCHOLARMATCH_RERANK_TIMEOUT_MS", "45000"),
            ("SCHOLARMATCH_RERANK_CACHE_TTL_SECS", "3600"),
            ("SCHOLARMATCH_RERANK_CACHE_CAPACITY", "500"),
            ("SCHOLARMATCH_TELEMETRY_CAPACITY", "64"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.embed_timeout, Duration::from_millis(2500));
            assert_eq!(config.rerank_timeout, Duration::from_millis(45_000));
            assert_eq!(config.rerank_cache_ttl, Duration::from_secs(3600));
            assert_eq!(config.rerank_cache_capacity, 500);
            assert_eq!(config.telemetry_capacity, 64);
        },
    );
}

#[test]
#[serial]
fn test_invalid_timeout_falls_back_to_default() {
    clear_scholarmatch_env();

    with_env_vars(&[("SCHOLARMATCH_EMBED_TIMEOUT_MS", "soon")], || {
        let config = Config::from_env().expect("should parse with fallback");
        assert_eq!(config.embed_timeout, Duration::from_millis(10_000));
    });
}

#[test]
#[serial]
fn test_empty_api_key_treated_as_absent() {
    clear_scholarmatch_env();

    with_env_vars(&[("SCHOLARMATCH_EMBEDDER_API_KEY", "  ")], || {
        let config = Config::from_env().expect("should parse");
        assert!(config.embedder_api_key.is_none());
    });
}

#[test]
fn test_validate_rejects_empty_qdrant_url() {
    let config = Config {
        qdrant_url: "".to_string(),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::EmptyUrl { .. }));
    assert!(err.to_string().contains("qdrant_url"));
}

#[test]
fn test_validate_rejects_zero_capacity() {
    let config = Config {
        rerank_cache_capacity: 0,
        ..Default::default()
    };

    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::ZeroCapacity { .. }
    ));
}

#[test]
fn test_validate_success_with_defaults() {
    assert!(Config::default().validate().is_ok());
}

#[test]
#[serial]
fn test_full_config_parse() {
    clear_scholarmatch_env();

    with_env_vars(
        &[
            ("SCHOLARMATCH_PORT", "8080"),
            ("SCHOLARMATCH_BIND_ADDR", "0.0.0.0"),
            ("SCHOLARMATCH_QDRANT_URL", "http://qdrant.cluster:6334"),
            ("SCHOLARMATCH_COLLECTION", "scholarships_v2"),
            ("SCHOLARMATCH_EMBEDDER_URL", "https://api.example.com"),
            ("SCHOLARMATCH_EMBEDDER_API_KEY", "sk-test"),
            ("SCHOLARMATCH_RERANK_MODEL", "gpt-4o"),
        ],
        || {
            let config = Config::from_env().expect("should parse full config");

            assert_eq!(config.qdrant_url, "http://qdrant.cluster:6334");
            assert_eq!(config.collection, "scholarships_v2");
            assert_eq!(config.embedder_url, "https://api.example.com");
            assert_eq!(config.embedder_api_key.as_deref(), Some("sk-test"));
            assert_eq!(config.rerank_model, "gpt-4o");
            assert_eq!(config.socket_addr(), "0.0.0.0:8080");
        },
    );
}
