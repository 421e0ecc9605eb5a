//! UTM campaign parameter extraction from the redirect query string.

/// Campaign attribution parameters captured from the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UtmParams {
    pub source: Option<String>,
    pub medium: Option<String>,
    pub campaign: Option<String>,
}

/// Parses `utm_source` / `utm_medium` / `utm_campaign` from a raw query
/// string. Unknown parameters are ignored; repeated parameters keep the first
/// occurrence.
pub fn parse_utm(query: Option<&str>) -> UtmParams {
    let mut utm = UtmParams::default();

    let Some(query) = query else {
        return utm;
    };

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "utm_source" if utm.source.is_none() => utm.source = Some(value.into_owned()),
            "utm_medium" if utm.medium.is_none() => utm.medium = Some(value.into_owned()),
            "utm_campaign" if utm.campaign.is_none() => utm.campaign = Some(value.into_owned()),
            _ => {}
        }
    }

    utm
}
