//! Pass/fail policy for probe outcomes
//!
//! | has scope | status    | passed | message                      |
//! |-----------|-----------|--------|------------------------------|
//! | yes       | 200–299   | yes    | `OK (<status>)`              |
//! | yes       | 400–499   | yes    | `Auth OK (<status>)`         |
//! | yes       | otherwise | no     | `Unexpected <status>`        |
//! | no        | 401       | yes    | `Correctly denied (401)`     |
//! | no        | otherwise | no     | `Expected 401, got <status>` |
//!
//! With the scope held, any 4xx passes: the authorization layer let the
//! request through and the backend rejected it for another reason.
//! Without the scope, only 401 passes; 403 does not.

/// Verdict for one probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub passed: bool,
    pub message: String,
}

/// Classifies a status code given whether the token holds the scope
///
/// `status` may be the transport-failure sentinel `-1`, which never passes.
///
/// # Examples
///
/// ```
/// use scopecheck::harness::classifier::classify;
///
/// assert!(classify(true, 404).passed);
/// assert!(!classify(false, 403).passed);
/// assert_eq!(classify(false, 401).message, "Correctly denied (401)");
/// ```
pub fn classify(has_scope: bool, status: i32) -> Verdict {
    let (passed, message) = if has_scope {
        match status {
            200..=299 => (true, format!("OK ({})", status)),
            400..=499 => (true, format!("Auth OK ({})", status)),
            _ => (false, format!("Unexpected {}", status)),
        }
    } else if status == 401 {
        (true, "Correctly denied (401)".to_string())
    } else {
        (false, format!("Expected 401, got {}", status))
    };

    Verdict { passed, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_scope_success_passes() {
        assert_eq!(
            classify(true, 200),
            Verdict {
                passed: true,
                message: "OK (200)".to_string()
            }
        );
        assert!(classify(true, 201).passed);
        assert!(classify(true, 299).passed);
    }

    #[test]
    fn test_has_scope_client_error_passes() {
        let verdict = classify(true, 404);
        assert!(verdict.passed);
        assert_eq!(verdict.message, "Auth OK (404)");
        assert!(classify(true, 400).passed);
        assert!(classify(true, 401).passed);
        assert!(classify(true, 499).passed);
    }

    #[test]
    fn test_has_scope_server_error_fails() {
        let verdict = classify(true, 500);
        assert!(!verdict.passed);
        assert_eq!(verdict.message, "Unexpected 500");
    }

    #[test]
    fn test_has_scope_other_ranges_fail() {
        assert!(!classify(true, 302).passed);
        assert!(!classify(true, 100).passed);
        assert!(!classify(true, -1).passed);
        assert_eq!(classify(true, -1).message, "Unexpected -1");
    }

    #[test]
    fn test_missing_scope_401_passes() {
        let verdict = classify(false, 401);
        assert!(verdict.passed);
        assert_eq!(verdict.message, "Correctly denied (401)");
    }

    #[test]
    fn test_missing_scope_other_status_fails() {
        for status in [200, 204, 400, 403, 404, 500, -1] {
            let verdict = classify(false, status);
            assert!(!verdict.passed, "status {} must fail without scope", status);
            assert_eq!(verdict.message, format!("Expected 401, got {}", status));
        }
    }

    #[test]
    fn test_classifier_is_total_over_status_range() {
        for status in -1..=600 {
            let with_scope = classify(true, status);
            assert_eq!(
                with_scope.passed,
                (200..300).contains(&status) || (400..500).contains(&status)
            );

            let without_scope = classify(false, status);
            assert_eq!(without_scope.passed, status == 401);
        }
    }
}
