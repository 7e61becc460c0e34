use super::*;

#[test]
fn defaults_are_sane() {
    let config = Config::default();
    assert_eq!(config.qdrant_url, DEFAULT_QDRANT_URL);
    assert_eq!(config.collection_name, "job_postings");
    assert_eq!(config.similarity_threshold, 60.0);
    assert_eq!(config.sites, vec!["indeed", "linkedin"]);
    assert!(config.rerank_enabled);
    assert_eq!(config.rerank_workers, 4);
}

#[test]
fn validate_rejects_missing_api_key() {
    let config = Config::default();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::MissingRequired { .. })
    ));
}

#[test]
fn validate_rejects_out_of_range_threshold() {
    let config = Config {
        gemini_api_key: "key".to_string(),
        similarity_threshold: 140.0,
        ..Config::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::OutOfRange { .. })
    ));
}

#[test]
fn validate_rejects_zero_workers() {
    let config = Config {
        gemini_api_key: "key".to_string(),
        rerank_workers: 0,
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn validate_accepts_complete_config() {
    let config = Config {
        gemini_api_key: "key".to_string(),
        ..Config::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn negative_heuristic_threshold_is_a_scoring_concern_not_config() {
    // The similarity threshold is a percentage; the heuristic inclusion
    // threshold (which may be negative) lives in ScoringConfig instead.
    let config = Config {
        gemini_api_key: "key".to_string(),
        similarity_threshold: 0.0,
        ..Config::default()
    };
    assert!(config.validate().is_ok());
}
