/// Decides whether the page action icon is shown for a tab
use crate::config::ExtensionConfig;
use crate::host::{self, Tab, TabHost};
use url::Url;

/// True if `hostname` ends with one of `hosts`
///
/// This is a plain suffix test: `evilwikipedia.org` passes for `wikipedia.org`.
pub fn is_supported_host(hostname: &str, hosts: &[String]) -> bool {
    hosts.iter().any(|host| hostname.ends_with(host.as_str()))
}

pub fn is_supported_namespace(ns: i64, namespaces: &[i64]) -> bool {
    namespaces.contains(&ns)
}

/// Article view (`/wiki/...`) or `index.php` with a `title` parameter
pub fn is_savable_page(url: &Url) -> bool {
    let path = url.path();
    path.contains("/wiki/") || (path.contains("index.php") && url.query_pairs().any(|(key, _)| key == "title"))
}

pub fn should_show_page_action(url: &Url, ns: i64, config: &ExtensionConfig) -> bool {
    let hostname = url.host_str().unwrap_or_default();
    is_supported_host(hostname, &config.supported_hosts)
        && is_supported_namespace(ns, &config.supported_namespaces)
        && is_savable_page(url)
}

/// Background-script logic for the page action
pub struct PageActionGate<H> {
    host: H,
    config: ExtensionConfig,
}

impl<H: TabHost> PageActionGate<H> {
    pub fn new(host: H, config: ExtensionConfig) -> Self {
        PageActionGate { host, config }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Show or hide the action for one tab
    ///
    /// Any failure to reach the content script hides the action.
    pub async fn refresh_tab(&self, tab: &Tab) {
        let Some(raw_url) = tab.url.as_deref() else {
            return;
        };

        let visible = match Url::parse(raw_url) {
            Ok(url) => match host::page_namespace(&self.host, tab.id).await {
                Ok(ns) => should_show_page_action(&url, ns, &self.config),
                Err(e) => {
                    log::debug!("tab {}: no namespace reply ({}), hiding action", tab.id, e);
                    false
                }
            },
            Err(e) => {
                log::debug!("tab {}: unparseable url ({}), hiding action", tab.id, e);
                false
            }
        };

        if let Err(e) = self.host.set_action_visible(tab.id, visible).await {
            log::warn!("tab {}: could not update page action: {}", tab.id, e);
        }
    }

    /// Startup and install: walk every open tab
    pub async fn refresh_all_tabs(&self) {
        match self.host.all_tabs().await {
            Ok(tabs) => {
                for tab in &tabs {
                    self.refresh_tab(tab).await;
                }
            }
            Err(e) => log::warn!("could not list tabs: {}", e),
        }
    }

    pub async fn on_tab_created(&self, tab: &Tab) {
        self.refresh_tab(tab).await;
    }

    pub async fn on_tab_updated(&self, tab: &Tab, status: Option<&str>) {
        if status == Some("complete") {
            self.refresh_tab(tab).await;
        }
    }

    pub async fn on_tab_activated(&self, tab_id: i32) {
        match self.host.tab(tab_id).await {
            Ok(tab) => self.refresh_tab(&tab).await,
            Err(e) => log::warn!("could not look up activated tab {}: {}", tab_id, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockHost;
    use futures::executor::block_on;

    fn hosts() -> Vec<String> {
        ExtensionConfig::default().supported_hosts
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_supported_hosts() {
        assert!(is_supported_host("en.wikipedia.org", &hosts()));
        assert!(is_supported_host("wikipedia.org", &hosts()));
        assert!(is_supported_host("de.m.wikivoyage.org", &hosts()));
        assert!(!is_supported_host("wikipedia.org.evil.com", &hosts()));
        assert!(!is_supported_host("en.wiktionary.org", &hosts()));
    }

    #[test]
    fn test_suffix_match_admits_lookalike_domain() {
        assert!(is_supported_host("evilwikipedia.org", &hosts()));
    }

    #[test]
    fn test_supported_namespace() {
        assert!(is_supported_namespace(0, &[0]));
        assert!(!is_supported_namespace(1, &[0]));
        assert!(!is_supported_namespace(-1, &[0]));
    }

    #[test]
    fn test_savable_pages() {
        assert!(is_savable_page(&url("https://en.wikipedia.org/wiki/Cat")));
        assert!(!is_savable_page(&url("https://en.wikipedia.org/w/index.php")));
        assert!(!is_savable_page(&url("https://en.wikipedia.org/w/index.php?search=cat")));
        assert!(is_savable_page(&url("https://en.wikipedia.org/w/index.php?title=Cat&action=history")));
        assert!(!is_savable_page(&url("https://en.wikipedia.org/")));
    }

    #[test]
    fn test_should_show_page_action() {
        let config = ExtensionConfig::default();
        assert!(should_show_page_action(&url("https://en.wikipedia.org/wiki/Cat"), 0, &config));
        assert!(!should_show_page_action(&url("https://en.wikipedia.org/wiki/Talk:Cat"), 1, &config));
        assert!(!should_show_page_action(&url("https://example.org/wiki/Cat"), 0, &config));
        assert!(!should_show_page_action(&url("https://en.wikipedia.org/w/api.php"), 0, &config));
    }

    #[test]
    fn test_refresh_tab_shows_action() {
        let host = MockHost::new()
            .with_current_tab(1, "https://en.wikipedia.org/wiki/Cat")
            .with_namespace(1, 0);
        let gate = PageActionGate::new(host, ExtensionConfig::default());

        block_on(gate.refresh_all_tabs());

        assert_eq!(gate.host().action_visible(1), Some(true));
    }

    #[test]
    fn test_refresh_tab_hides_without_content_script() {
        let host = MockHost::new().with_current_tab(1, "https://en.wikipedia.org/wiki/Cat");
        let gate = PageActionGate::new(host, ExtensionConfig::default());

        block_on(gate.on_tab_activated(1));

        assert_eq!(gate.host().action_visible(1), Some(false));
    }

    #[test]
    fn test_refresh_tab_hides_non_article_namespace() {
        let host = MockHost::new()
            .with_current_tab(1, "https://en.wikipedia.org/wiki/User:Example")
            .with_namespace(1, 2);
        let gate = PageActionGate::new(host, ExtensionConfig::default());

        block_on(gate.on_tab_activated(1));

        assert_eq!(gate.host().action_visible(1), Some(false));
    }

    #[test]
    fn test_tab_without_url_is_skipped() {
        let gate = PageActionGate::new(MockHost::new(), ExtensionConfig::default());

        block_on(gate.refresh_tab(&Tab { id: 5, url: None }));

        assert_eq!(gate.host().action_visible(5), None);
    }

    #[test]
    fn test_updated_waits_for_complete() {
        let host = MockHost::new().with_namespace(1, 0);
        let gate = PageActionGate::new(host, ExtensionConfig::default());
        let tab = Tab {
            id: 1,
            url: Some("https://en.wikipedia.org/wiki/Cat".to_string()),
        };

        block_on(gate.on_tab_updated(&tab, Some("loading")));
        assert_eq!(gate.host().action_visible(1), None);

        block_on(gate.on_tab_updated(&tab, Some("complete")));
        assert_eq!(gate.host().action_visible(1), Some(true));
    }

    #[test]
    fn test_each_tab_decided_independently() {
        let host = MockHost::new()
            .with_tab(Tab { id: 1, url: Some("https://en.wikipedia.org/wiki/Cat".to_string()) })
            .with_tab(Tab { id: 2, url: Some("https://www.rust-lang.org/".to_string()) })
            .with_namespace(1, 0)
            .with_namespace(2, 0);
        let gate = PageActionGate::new(host, ExtensionConfig::default());

        block_on(gate.refresh_all_tabs());

        assert_eq!(gate.host().action_visible(1), Some(true));
        assert_eq!(gate.host().action_visible(2), Some(false));
    }
}
