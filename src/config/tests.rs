use super::*;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::NamedTempFile;

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

fn clear_spotmatch_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("SPOTMATCH_FEATURE_DB_PATH");
        env::remove_var("FEATURE_DB_PATH");
        env::remove_var("SPOTMATCH_POLICY");
        env::remove_var("SPOTMATCH_SIMILARITY");
        env::remove_var("SPOTMATCH_HIGH_THRESHOLD");
        env::remove_var("SPOTMATCH_LOW_THRESHOLD");
        env::remove_var("SPOTMATCH_GAP_THRESHOLD");
        env::remove_var("SPOTMATCH_RATIO_THRESHOLD");
        env::remove_var("SPOTMATCH_ABSOLUTE_THRESHOLD");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(
        config.feature_db_path,
        PathBuf::from("/app/data/train_features.db")
    );
    assert_eq!(config.policy, DecisionPolicy::absolute_dual_threshold());
    assert_eq!(config.similarity_mode, SimilarityMode::Cosine);
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_spotmatch_env();

    let config = Config::from_env().expect("should parse with defaults");
    assert_eq!(config, Config::default());
}

#[test]
#[serial]
fn test_from_env_custom_path() {
    clear_spotmatch_env();

    with_env_vars(&[("SPOTMATCH_FEATURE_DB_PATH", "/srv/features.db")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.feature_db_path, PathBuf::from("/srv/features.db"));
    });
}

#[test]
#[serial]
fn test_from_env_legacy_path_variable() {
    clear_spotmatch_env();

    with_env_vars(&[("FEATURE_DB_PATH", "/legacy/train_features.db")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(
            config.feature_db_path,
            PathBuf::from("/legacy/train_features.db")
        );
    });
}

#[test]
#[serial]
fn test_from_env_prefixed_path_wins() {
    clear_spotmatch_env();

    with_env_vars(
        &[
            ("FEATURE_DB_PATH", "/legacy.db"),
            ("SPOTMATCH_FEATURE_DB_PATH", "/preferred.db"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.feature_db_path, PathBuf::from("/preferred.db"));
        },
    );
}

#[test]
#[serial]
fn test_from_env_blank_path_uses_default() {
    clear_spotmatch_env();

    with_env_vars(&[("SPOTMATCH_FEATURE_DB_PATH", "   ")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.feature_db_path, Config::default().feature_db_path);
    });
}

#[test]
#[serial]
fn test_from_env_ratio_policy() {
    clear_spotmatch_env();

    with_env_vars(&[("SPOTMATCH_POLICY", "ratio-and-absolute")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.policy, DecisionPolicy::ratio_and_absolute());
    });
}

#[test]
#[serial]
fn test_from_env_invalid_policy() {
    clear_spotmatch_env();

    with_env_vars(&[("SPOTMATCH_POLICY", "coin-flip")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPolicy(_)));
        assert!(err.to_string().contains("coin-flip"));
    });
}

#[test]
#[serial]
fn test_from_env_similarity_mode() {
    clear_spotmatch_env();

    with_env_vars(&[("SPOTMATCH_SIMILARITY", "normalized-dot")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.similarity_mode, SimilarityMode::NormalizedDot);
    });
}

#[test]
#[serial]
fn test_from_env_invalid_similarity_mode() {
    clear_spotmatch_env();

    with_env_vars(&[("SPOTMATCH_SIMILARITY", "manhattan")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidSimilarityMode(ref e) if e.value == "manhattan"
        ));
    });
}

#[test]
#[serial]
fn test_from_env_dual_threshold_overrides() {
    clear_spotmatch_env();

    with_env_vars(
        &[
            ("SPOTMATCH_HIGH_THRESHOLD", "0.9"),
            ("SPOTMATCH_LOW_THRESHOLD", "0.6"),
            ("SPOTMATCH_GAP_THRESHOLD", "0.05"),
            // Ignored: belongs to the other policy.
            ("SPOTMATCH_RATIO_THRESHOLD", "not-a-number"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(
                config.policy,
                DecisionPolicy::AbsoluteDualThreshold(DualThreshold {
                    high: 0.9,
                    low: 0.6,
                    gap: 0.05,
                })
            );
        },
    );
}

#[test]
#[serial]
fn test_from_env_ratio_threshold_overrides() {
    clear_spotmatch_env();

    with_env_vars(
        &[
            ("SPOTMATCH_POLICY", "ratio-and-absolute"),
            ("SPOTMATCH_RATIO_THRESHOLD", "1.05"),
            ("SPOTMATCH_ABSOLUTE_THRESHOLD", "0.75"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            let DecisionPolicy::RatioAndAbsolute(t) = config.policy else {
                panic!("expected ratio policy, got {:?}", config.policy);
            };
            assert_eq!(t.ratio, 1.05);
            assert_eq!(t.absolute, 0.75);
            assert_eq!(t.epsilon, RatioThreshold::default().epsilon);
        },
    );
}

#[test]
#[serial]
fn test_from_env_invalid_threshold() {
    clear_spotmatch_env();

    with_env_vars(&[("SPOTMATCH_HIGH_THRESHOLD", "high")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidThreshold { name: "SPOTMATCH_HIGH_THRESHOLD", .. }
        ));
    });

    with_env_vars(&[("SPOTMATCH_LOW_THRESHOLD", "NaN")], || {
        assert!(Config::from_env().is_err());
    });
}

#[test]
fn test_validate_missing_path() {
    let config = Config {
        feature_db_path: PathBuf::from("/nonexistent/spotmatch/features.db"),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::PathNotFound { .. })
    ));
}

#[test]
fn test_validate_directory_is_not_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        feature_db_path: dir.path().to_path_buf(),
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::NotAFile { .. })));
}

#[test]
fn test_validate_existing_file() {
    let file = NamedTempFile::new().unwrap();
    let config = Config {
        feature_db_path: file.path().to_path_buf(),
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_inverted_band() {
    let file = NamedTempFile::new().unwrap();
    let config = Config {
        feature_db_path: file.path().to_path_buf(),
        policy: DecisionPolicy::AbsoluteDualThreshold(DualThreshold {
            high: 0.6,
            low: 0.7,
            gap: 0.1,
        }),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidThreshold { name: "SPOTMATCH_LOW_THRESHOLD", .. })
    ));
}

#[test]
fn test_validate_non_positive_ratio() {
    let file = NamedTempFile::new().unwrap();
    let config = Config {
        feature_db_path: file.path().to_path_buf(),
        policy: DecisionPolicy::RatioAndAbsolute(RatioThreshold {
            ratio: 0.0,
            ..Default::default()
        }),
        ..Default::default()
    };
    assert!(config.validate().is_err());
}
