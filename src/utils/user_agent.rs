//! Heuristic user-agent classification.
//!
//! Pure substring matching over the raw header value. Deliberately not a full
//! UA parser: the analytics pipeline only needs coarse device/browser/OS
//! buckets, and this function must never fail or allocate excessively on the
//! write path.

/// Coarse device classification derived from the user-agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    Mobile,
    Tablet,
    Desktop,
    Unknown,
}

impl DeviceType {
    /// Stable string form stored in the analytics table.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
            DeviceType::Desktop => "desktop",
            DeviceType::Unknown => "unknown",
        }
    }
}

/// Parsed user-agent classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgentInfo {
    pub device_type: DeviceType,
    pub browser: Option<String>,
    pub os: Option<String>,
}

/// Classifies a raw user-agent header value.
///
/// Always terminates, never fails. `None` yields an all-unknown result.
pub fn classify(user_agent: Option<&str>) -> UserAgentInfo {
    let Some(ua) = user_agent else {
        return UserAgentInfo {
            device_type: DeviceType::Unknown,
            browser: None,
            os: None,
        };
    };

    let lower = ua.to_ascii_lowercase();

    // Tablet checked before mobile: Android tablets carry "android" but not
    // "mobile", iPads carry "ipad".
    let device_type = if lower.contains("ipad") || lower.contains("tablet") {
        DeviceType::Tablet
    } else if lower.contains("mobile")
        || lower.contains("iphone")
        || lower.contains("android")
    {
        DeviceType::Mobile
    } else if lower.contains("windows")
        || lower.contains("macintosh")
        || lower.contains("x11")
        || lower.contains("linux")
    {
        DeviceType::Desktop
    } else {
        DeviceType::Unknown
    };

    // Order matters: Edge and Opera embed "chrome", Chrome embeds "safari".
    let browser = if lower.contains("edg/") || lower.contains("edge") {
        Some("Edge")
    } else if lower.contains("opr/") || lower.contains("opera") {
        Some("Opera")
    } else if lower.contains("firefox") {
        Some("Firefox")
    } else if lower.contains("chrome") || lower.contains("crios") {
        Some("Chrome")
    } else if lower.contains("safari") {
        Some("Safari")
    } else {
        None
    };

    let os = if lower.contains("windows") {
        Some("Windows")
    } else if lower.contains("iphone") || lower.contains("ipad") || lower.contains("ios") {
        Some("iOS")
    } else if lower.contains("mac os") || lower.contains("macintosh") {
        Some("macOS")
    } else if lower.contains("android") {
        Some("Android")
    } else if lower.contains("linux") {
        Some("Linux")
    } else {
        None
    };

    UserAgentInfo {
        device_type,
        browser: browser.map(str::to_string),
        os: os.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_DESKTOP: &str =
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";
    const SAFARI_IPHONE: &str =
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const IPAD: &str =
        "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Safari/604.1";
    const FIREFOX_LINUX: &str =
        "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";
    const ANDROID_PHONE: &str =
        "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Mobile Safari/537.36";

    #[test]
    fn test_classify_chrome_desktop() {
        let info = classify(Some(CHROME_DESKTOP));
        assert_eq!(info.device_type, DeviceType::Desktop);
        assert_eq!(info.browser.as_deref(), Some("Chrome"));
        assert_eq!(info.os.as_deref(), Some("Windows"));
    }

    #[test]
    fn test_classify_iphone_safari() {
        let info = classify(Some(SAFARI_IPHONE));
        assert_eq!(info.device_type, DeviceType::Mobile);
        assert_eq!(info.browser.as_deref(), Some("Safari"));
        assert_eq!(info.os.as_deref(), Some("iOS"));
    }

    #[test]
    fn test_classify_ipad_is_tablet() {
        let info = classify(Some(IPAD));
        assert_eq!(info.device_type, DeviceType::Tablet);
        assert_eq!(info.os.as_deref(), Some("iOS"));
    }

    #[test]
    fn test_classify_firefox_linux() {
        let info = classify(Some(FIREFOX_LINUX));
        assert_eq!(info.device_type, DeviceType::Desktop);
        assert_eq!(info.browser.as_deref(), Some("Firefox"));
        assert_eq!(info.os.as_deref(), Some("Linux"));
    }

    #[test]
    fn test_classify_android_phone() {
        let info = classify(Some(ANDROID_PHONE));
        assert_eq!(info.device_type, DeviceType::Mobile);
        assert_eq!(info.browser.as_deref(), Some("Chrome"));
        assert_eq!(info.os.as_deref(), Some("Android"));
    }

    #[test]
    fn test_classify_missing_header() {
        let info = classify(None);
        assert_eq!(info.device_type, DeviceType::Unknown);
        assert!(info.browser.is_none());
        assert!(info.os.is_none());
    }

    #[test]
    fn test_classify_garbage_never_panics() {
        let info = classify(Some("curl/8.4.0"));
        assert_eq!(info.device_type, DeviceType::Unknown);
        assert!(info.browser.is_none());
    }
}
