use std::time::Duration;

use bedrock_gate::{ErrorKind, GateError, Result};

#[test]
fn test_error_display() {
    let err = GateError::ResourceNotFound("GJAQ7CUOSJ".to_string());
    assert!(err.to_string().contains("GJAQ7CUOSJ"));

    let err = GateError::Api {
        status: 424,
        message: "ModelErrorException".into(),
    };
    assert_eq!(err.to_string(), "API error (424): ModelErrorException");
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(GateError::EmptyResponse)
    }
    assert!(returns_error().is_err());
}

#[test]
fn test_json_error_converts() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: GateError = json_err.into();
    assert!(matches!(err, GateError::Json(_)));
}

// ============================================================================
// Transient error classification
// ============================================================================

#[test]
fn transient_errors() {
    assert!(GateError::RateLimited { retry_after: None }.is_transient());
    assert!(GateError::Http("connection reset".into()).is_transient());
    assert!(GateError::EmptyResponse.is_transient());
    for status in [408, 424, 429, 500, 502, 503, 504] {
        let err = GateError::Api {
            status,
            message: "x".into(),
        };
        assert!(err.is_transient(), "{status} should be transient");
        assert_eq!(err.kind(), ErrorKind::Transient);
    }
}

#[test]
fn permanent_errors() {
    let permanent = [
        GateError::AuthenticationFailed("x".into()),
        GateError::ResourceNotFound("x".into()),
        GateError::Validation("x".into()),
        GateError::MalformedResponse("x".into()),
        GateError::InvalidInput("x".into()),
        GateError::Configuration("x".into()),
        GateError::Api {
            status: 409,
            message: "conflict".into(),
        },
    ];
    for err in permanent {
        assert!(!err.is_transient(), "{err} should be permanent");
        assert_eq!(err.kind(), ErrorKind::Permanent);
    }
}

#[test]
fn retry_after_only_from_rate_limits() {
    let hinted = GateError::RateLimited {
        retry_after: Some(Duration::from_secs(3)),
    };
    assert_eq!(hinted.retry_after(), Some(Duration::from_secs(3)));
    assert_eq!(GateError::Http("x".into()).retry_after(), None);
}
