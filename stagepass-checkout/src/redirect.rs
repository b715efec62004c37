//! The success/cancel redirect targets handed to the gateway carry a
//! `payment=success|cancelled` query marker and, on success, the session
//! identifier. After the gateway bounces the user back, a fresh page load
//! parses the marker to know whether and what to re-resolve.

/// What a return URL says about the round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnMarker {
    Success { session_id: Option<String> },
    Cancelled,
    None,
}

pub fn build_success_url(base: &str) -> String {
    // The gateway substitutes its session id into the template
    format!("{}?payment=success&session_id={{CHECKOUT_SESSION_ID}}", base)
}

pub fn build_cancel_url(base: &str) -> String {
    format!("{}?payment=cancelled", base)
}

/// Parse the query marker out of a return URL. Anything unrecognised is
/// `None`: a plain page load, nothing to resolve.
pub fn parse_return_marker(url: &str) -> ReturnMarker {
    let query = match url.split_once('?') {
        Some((_, q)) => q,
        None => return ReturnMarker::None,
    };

    let mut payment = None;
    let mut session_id = None;
    for pair in query.split('&') {
        match pair.split_once('=') {
            Some(("payment", value)) => payment = Some(value),
            Some(("session_id", value)) if !value.is_empty() => {
                session_id = Some(value.to_string());
            }
            _ => {}
        }
    }

    match payment {
        Some("success") => ReturnMarker::Success { session_id },
        Some("cancelled") => ReturnMarker::Cancelled,
        _ => ReturnMarker::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_with_session_id() {
        let marker =
            parse_return_marker("https://app/checkout/return?payment=success&session_id=cs_123");
        assert_eq!(
            marker,
            ReturnMarker::Success {
                session_id: Some("cs_123".to_string())
            }
        );
    }

    #[test]
    fn test_cancelled() {
        let marker = parse_return_marker("https://app/checkout/return?payment=cancelled");
        assert_eq!(marker, ReturnMarker::Cancelled);
    }

    #[test]
    fn test_plain_load_has_no_marker() {
        assert_eq!(parse_return_marker("https://app/checkout/return"), ReturnMarker::None);
        assert_eq!(parse_return_marker("https://app/?foo=bar"), ReturnMarker::None);
    }

    #[test]
    fn test_url_templates() {
        assert_eq!(
            build_success_url("https://app/return"),
            "https://app/return?payment=success&session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(build_cancel_url("https://app/return"), "https://app/return?payment=cancelled");
    }
}
