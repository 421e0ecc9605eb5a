//! Request context captured for click analytics.

use crate::utils::utm::UtmParams;

/// Client-side metadata snapshotted from the redirect request.
///
/// Built in the redirect handler and handed to the analytics pipeline; all
/// fields are optional so missing headers degrade gracefully. Cloneable for
/// sending across async boundaries.
#[derive(Debug, Clone, Default)]
pub struct ClickContext {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub utm: UtmParams,
}

impl ClickContext {
    pub fn new(
        ip: Option<String>,
        user_agent: Option<&str>,
        referrer: Option<&str>,
        utm: UtmParams,
    ) -> Self {
        Self {
            ip,
            user_agent: user_agent.map(|s| s.to_string()),
            referrer: referrer.map(|s| s.to_string()),
            utm,
        }
    }
}
