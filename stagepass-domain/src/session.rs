use serde::{Deserialize, Serialize};

/// How a checkout session has resolved, as last observed by the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionResolution {
    Pending,
    Completed,
    Failed,
}

/// A payment-gateway transaction context. Created by the backend; the
/// client holds the reference and polls for the outcome after the
/// redirect round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Gateway session identifier. A bare-URL creation response carries no
    /// id; the post-return flow recovers it from the success redirect URL.
    pub id: Option<String>,
    pub redirect_url: String,
    pub resolution: SessionResolution,
    pub error_detail: Option<String>,
    /// Principal the gateway linked the payment to, when known
    pub principal: Option<String>,
}

impl CheckoutSession {
    pub fn pending(id: Option<String>, redirect_url: String) -> Self {
        Self {
            id,
            redirect_url,
            resolution: SessionResolution::Pending,
            error_detail: None,
            principal: None,
        }
    }
}
