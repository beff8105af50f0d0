//! Widget URL normalization.

use url::Url;

/// Strip the query string and fragment from a widget URL, returning the
/// canonical scheme + authority + path form.
///
/// Widget template URLs commonly carry placeholder variables in the query
/// string; stripping them lets permission rules match on origin and path
/// only.
///
/// # Errors
///
/// Returns a parse error if `widget_url` is not an absolute URL. Approvers
/// treat this as "no rule matches" rather than failing.
pub fn normalize_widget_url(widget_url: &str) -> Result<String, url::ParseError> {
    let mut url = Url::parse(widget_url)?;
    url.set_query(None);
    url.set_fragment(None);
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_query_and_fragment() {
        assert_eq!(
            normalize_widget_url("https://example.com?x=1#y").unwrap(),
            "https://example.com/"
        );
        assert_eq!(
            normalize_widget_url("https://example.com/widget?widgetId=$matrix_widget_id&theme=$org.matrix.msc2873.client_theme").unwrap(),
            "https://example.com/widget"
        );
    }

    #[test]
    fn keeps_scheme_authority_and_path() {
        assert_eq!(
            normalize_widget_url("https://user@example.com:8443/a/b#frag").unwrap(),
            "https://user@example.com:8443/a/b"
        );
    }

    #[test]
    fn rejects_relative_urls() {
        assert!(normalize_widget_url("/relative/path").is_err());
        assert!(normalize_widget_url("not a url").is_err());
    }
}
