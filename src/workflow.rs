/// The popup pipeline: token, lists, saved status, add entry
///
/// Each step returns a typed result and reports progress as `SessionAction`s,
/// which the popup feeds into its `PopupSession` reducer.
use crate::api::{AddEntryResult, WikiApi};
use crate::config::ExtensionConfig;
use crate::error::ApiError;
use crate::host::{self, Tab, TabHost};
use crate::http::HttpClient;
use crate::i18n::{self, Messages};
use crate::reading_list::ReadingList;
use crate::session::{
    FailureMessage, LearnMoreLink, LoginPrompt, Screen, SelectionContext, SessionAction, SuccessMessage,
};
use crate::title::{display_title, login_url, parse_title_from_url, project_origin};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

pub const NOT_SET_UP_ERROR: &str = "readinglists-db-error-not-set-up";
pub const ENTRY_LIMIT_ERROR: &str = "readinglists-db-error-entry-limit";

const TITLE_PLACEHOLDER: &str = "$1";
const DEFAULT_LIST_NAME: &str = "reading list";

static MARKUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid markup pattern"));

/// Result of the CSRF token step
#[derive(Debug, Clone, PartialEq)]
pub enum TokenOutcome {
    Authenticated(String),
    LoginRequired,
}

/// Build the success panel from the localized template
///
/// Markup is stripped, `[[$2|$3]]` and the bare `$2`/`$3` become the list name,
/// and the page title goes where `$1` was. This matches on the live template
/// text, so a reworded message on the wiki can break it.
pub fn format_success(template: &str, title: &str, list_name: Option<&str>) -> SuccessMessage {
    let list_name = list_name.filter(|n| !n.is_empty()).unwrap_or(DEFAULT_LIST_NAME);
    let message = MARKUP
        .replace_all(template, "")
        .replace("[[$2|$3]]", list_name)
        .replacen("$2", list_name, 1)
        .replacen("$3", list_name, 1);

    match message.split_once(TITLE_PLACEHOLDER) {
        Some((before, after)) => SuccessMessage {
            before: before.to_string(),
            title: Some(display_title(title)),
            after: after.to_string(),
        },
        None => SuccessMessage::plain(message),
    }
}

/// Pick the failure text for `error`
pub fn format_failure(messages: &Messages, error: &ApiError, max_entries: u64, learn_more_url: &str) -> FailureMessage {
    match error.title() {
        Some(NOT_SET_UP_ERROR) => FailureMessage {
            text: messages.get(i18n::ENABLE_SYNC).to_string(),
            learn_more: Some(LearnMoreLink {
                text: messages.get(i18n::INFO_LINK_TEXT).to_string(),
                url: learn_more_url.to_string(),
            }),
        },
        Some(ENTRY_LIMIT_ERROR) => FailureMessage {
            text: messages
                .get(i18n::ENTRY_LIMIT_EXCEEDED)
                .replacen(TITLE_PLACEHOLDER, &max_entries.to_string(), 1),
            learn_more: None,
        },
        _ => FailureMessage {
            text: messages
                .get(i18n::ERROR_INTRO)
                .replacen(TITLE_PLACEHOLDER, &error.describe(), 1),
            learn_more: None,
        },
    }
}

pub struct PopupWorkflow<C, H> {
    client: C,
    host: H,
    config: ExtensionConfig,
}

impl<C: HttpClient, H: TabHost> PopupWorkflow<C, H> {
    pub fn new(client: C, host: H, config: ExtensionConfig) -> Self {
        PopupWorkflow { client, host, config }
    }

    #[cfg(test)]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[cfg(test)]
    pub fn client(&self) -> &C {
        &self.client
    }

    fn api(&self, url: &Url) -> WikiApi<'_, C> {
        WikiApi::new(&self.client, &url.origin().ascii_serialization())
    }

    async fn messages(&self, url: &Url, keys: &[&str]) -> Messages {
        i18n::resolve(&self.api(url), keys, &self.config.fallback_language).await
    }

    pub async fn current_page(&self) -> Result<(Tab, Url), ApiError> {
        let tab = self.host.current_tab().await?;
        let raw = tab
            .url
            .as_deref()
            .ok_or_else(|| ApiError::Malformed("active tab has no URL".to_string()))?;
        let url = Url::parse(raw).map_err(|e| ApiError::Malformed(format!("{}: {}", raw, e)))?;
        Ok((tab, url))
    }

    pub async fn authenticate(&self, url: &Url) -> Result<TokenOutcome, ApiError> {
        let token = self.api(url).csrf_token().await?;
        if token == self.config.anonymous_token {
            Ok(TokenOutcome::LoginRequired)
        } else {
            Ok(TokenOutcome::Authenticated(token))
        }
    }

    /// Title from the content script's canonical URL, else from the tab URL
    pub async fn canonical_title(&self, tab: &Tab) -> String {
        let from_content_script = match host::page_href(&self.host, tab.id).await {
            Ok(href) => parse_title_from_url(&href),
            Err(e) => {
                log::debug!("tab {}: no canonical href ({}), using tab url", tab.id, e);
                None
            }
        };

        from_content_script
            .or_else(|| tab.url.as_deref().and_then(parse_title_from_url))
            .unwrap_or_default()
    }

    pub async fn login_prompt(&self, tab: &Tab, url: &Url) -> LoginPrompt {
        let messages = self.messages(url, &[i18n::LOGIN_PROMPT, i18n::LOGIN_BUTTON_TEXT]).await;
        let title = self.canonical_title(tab).await;
        LoginPrompt {
            text: messages.get(i18n::LOGIN_PROMPT).to_string(),
            button_text: messages.get(i18n::LOGIN_BUTTON_TEXT).to_string(),
            login_url: login_url(url, &title),
        }
    }

    pub async fn load_lists(&self, context: &SelectionContext) -> Result<Vec<ReadingList>, ApiError> {
        self.api(&context.url).all_reading_lists().await
    }

    /// Ids of the lists that already hold the current page
    pub async fn saved_list_ids(&self, context: &SelectionContext) -> Result<HashSet<i64>, ApiError> {
        let title = self.canonical_title(&context.tab).await;
        self.api(&context.url)
            .lists_containing(&project_origin(&context.url), &title)
            .await
    }

    async fn max_entries_per_list(&self, url: &Url) -> u64 {
        match self.api(url).max_entries_per_list().await {
            Ok(Some(max)) => max,
            Ok(None) => self.config.default_max_entries_per_list,
            Err(e) => {
                log::debug!("no site limit available: {}", e);
                self.config.default_max_entries_per_list
            }
        }
    }

    pub async fn failure_screen(&self, url: &Url, error: &ApiError) -> Screen {
        log::warn!("showing failure: {}", error);
        let messages = self
            .messages(
                url,
                &[i18n::ENABLE_SYNC, i18n::INFO_LINK_TEXT, i18n::ENTRY_LIMIT_EXCEEDED, i18n::ERROR_INTRO],
            )
            .await;
        let max_entries = if error.title() == Some(ENTRY_LIMIT_ERROR) {
            self.max_entries_per_list(url).await
        } else {
            self.config.default_max_entries_per_list
        };
        Screen::Failure(format_failure(&messages, error, max_entries, &self.config.learn_more_url))
    }

    fn bundled_failure_screen(&self, error: &ApiError) -> Screen {
        let messages = i18n::bundled_messages(&self.config.fallback_language, &[i18n::ERROR_INTRO]);
        Screen::Failure(format_failure(
            &messages,
            error,
            self.config.default_max_entries_per_list,
            &self.config.learn_more_url,
        ))
    }

    pub async fn success_screen(&self, context: &SelectionContext, list: &ReadingList) -> Screen {
        let messages = self.messages(&context.url, &[i18n::SUCCESS]).await;
        let title = self.canonical_title(&context.tab).await;
        Screen::Success(format_success(messages.get(i18n::SUCCESS), &title, Some(&list.name)))
    }

    /// POST the current page to `list` and build the resulting panel
    pub async fn add_to_list(&self, context: &SelectionContext, list: &ReadingList) -> Screen {
        let title = self.canonical_title(&context.tab).await;
        let project = project_origin(&context.url);
        let result = self
            .api(&context.url)
            .add_entry(list.id, &context.token, &project, &title)
            .await;

        match result {
            Ok(AddEntryResult::Added { id }) => {
                log::info!("added {} to list {} as entry {}", title, list.id, id);
                self.success_screen(context, list).await
            }
            Ok(AddEntryResult::Rejected(body)) => self.failure_screen(&context.url, &ApiError::Rejected(body)).await,
            Err(e) => self.failure_screen(&context.url, &e).await,
        }
    }

    /// Everything that happens when the popup opens
    pub async fn open<F: Fn(SessionAction)>(&self, dispatch: F) {
        let (tab, url) = match self.current_page().await {
            Ok(page) => page,
            Err(e) => {
                log::warn!("popup opened without a usable tab: {}", e);
                dispatch(SessionAction::Finished(self.bundled_failure_screen(&e)));
                return;
            }
        };

        let token = match self.authenticate(&url).await {
            Ok(TokenOutcome::Authenticated(token)) => token,
            Ok(TokenOutcome::LoginRequired) => {
                log::debug!("anonymous session, asking for login");
                let prompt = self.login_prompt(&tab, &url).await;
                dispatch(SessionAction::Finished(Screen::LoginPrompt(prompt)));
                return;
            }
            Err(e) => {
                dispatch(SessionAction::Finished(self.failure_screen(&url, &e).await));
                return;
            }
        };

        let context = SelectionContext { tab, url, token };
        dispatch(SessionAction::Authenticated(context.clone()));

        match self.load_lists(&context).await {
            Ok(lists) => dispatch(SessionAction::ListsLoaded(lists)),
            Err(e) => {
                dispatch(SessionAction::Finished(self.failure_screen(&context.url, &e).await));
                return;
            }
        }

        let saved = match self.saved_list_ids(&context).await {
            Ok(ids) => Some(ids),
            Err(e) => {
                log::debug!("saved status unavailable: {}", e);
                None
            }
        };
        dispatch(SessionAction::SavedStatusChecked(saved));
    }

    /// The login button: send the current tab to the login page
    pub async fn follow_login(&self, prompt: &LoginPrompt) {
        if let Err(e) = self.host.navigate_current_tab(&prompt.login_url).await {
            log::warn!("could not open login page: {}", e);
        }
    }

    /// The learn-more link opens in a new tab, leaving the article alone
    pub async fn open_learn_more(&self, link: &LearnMoreLink) {
        if let Err(e) = self.host.open_tab(&link.url).await {
            log::warn!("could not open {}: {}", link.url, e);
        }
    }

    /// A click on `list` in the list panel
    pub async fn select<F: Fn(SessionAction)>(&self, context: &SelectionContext, list: &ReadingList, dispatch: F) {
        dispatch(SessionAction::SaveStarted(list.name.clone()));
        let screen = self.add_to_list(context, list).await;
        dispatch(SessionAction::Finished(screen));
    }
}
