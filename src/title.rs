/// Page title and URL helpers
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use url::Url;

/// Characters `encodeURIComponent` leaves alone
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a query component the way browsers' `encodeURIComponent` does
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

/// Extract the page title from an article URL
///
/// The `title` query parameter wins (`/w/index.php?title=Cat&oldid=1`),
/// otherwise the path after `/wiki/` is used. Titles are returned decoded.
pub fn parse_title_from_url(href: &str) -> Option<String> {
    let url = Url::parse(href).ok()?;

    if let Some((_, title)) = url.query_pairs().find(|(key, _)| key == "title") {
        return Some(title.into_owned());
    }

    let path = url.path().replacen("/wiki/", "", 1);
    let decoded = percent_decode_str(&path).decode_utf8().map(|title| title.into_owned());
    Some(decoded.unwrap_or_else(|e| {
        log::debug!("title {} is not valid UTF-8 once decoded ({}), keeping it encoded", path, e);
        path
    }))
}

/// Strip the mobile label from a wiki host (`en.m.wikipedia.org` -> `en.wikipedia.org`)
pub fn mobile_to_canonical_host(host: &str) -> String {
    let host = host.strip_prefix("m.").unwrap_or(host);
    host.replacen(".m.", ".", 1)
}

/// Origin of the desktop site, used as the reading list `project`
pub fn project_origin(url: &Url) -> String {
    let mut canonical = url.clone();
    if let Some(host) = url.host_str() {
        let desktop = mobile_to_canonical_host(host);
        if canonical.set_host(Some(&desktop)).is_err() {
            log::warn!("could not canonicalize host {}", host);
        }
    }
    canonical.origin().ascii_serialization()
}

/// `Special:UserLogin` URL that brings the user back to the current page
pub fn login_url(page: &Url, title: &str) -> String {
    let mut login = format!(
        "{}/wiki/Special:UserLogin?returnto={}",
        page.origin().ascii_serialization(),
        encode_component(title)
    );
    if let Some(query) = page.query().filter(|q| !q.is_empty()) {
        login.push_str("&returntoquery=");
        login.push_str(&encode_component(query));
    }
    login
}

/// Title as shown to the user
pub fn display_title(title: &str) -> String {
    title.replace('_', " ")
}
