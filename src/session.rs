/// State of one popup invocation
use crate::host::Tab;
use crate::reading_list::{ReadingList, filter_by_name, mark_saved, sort_default_first};
use std::collections::HashSet;
use std::rc::Rc;
use url::Url;
use yew::Reducible;

pub const CHECKING_SAVED_STATUS: &str = "Checking saved status...";

/// Tab, site and CSRF token the popup is working against
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionContext {
    pub tab: Tab,
    pub url: Url,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginPrompt {
    pub text: String,
    pub button_text: String,
    pub login_url: String,
}

/// Success text split around the page title
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessMessage {
    pub before: String,
    pub title: Option<String>,
    pub after: String,
}

impl SuccessMessage {
    pub fn plain(text: String) -> Self {
        SuccessMessage {
            before: text,
            title: None,
            after: String::new(),
        }
    }

    /// The full sentence as plain text
    pub fn text(&self) -> String {
        format!("{}{}{}", self.before, self.title.as_deref().unwrap_or_default(), self.after)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LearnMoreLink {
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailureMessage {
    pub text: String,
    pub learn_more: Option<LearnMoreLink>,
}

/// The panel currently on screen. Exactly one at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Screen {
    #[default]
    Loading,
    ListSelection,
    LoginPrompt(LoginPrompt),
    Success(SuccessMessage),
    Failure(FailureMessage),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// Token obtained; start loading lists
    Authenticated(SelectionContext),
    ListsLoaded(Vec<ReadingList>),
    /// Ids of lists containing the page, `None` when the lookup failed
    SavedStatusChecked(Option<HashSet<i64>>),
    SetFilter(String),
    SaveStarted(String),
    /// Show a panel and release the controls
    Finished(Screen),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopupSession {
    pub screen: Screen,
    pub context: Option<SelectionContext>,
    pub lists: Vec<ReadingList>,
    pub filter: String,
    pub status: Option<String>,
    pub loading: bool,
    pub controls_disabled: bool,
}

impl PopupSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, action: SessionAction) {
        match action {
            SessionAction::Authenticated(context) => {
                self.context = Some(context);
                self.screen = Screen::ListSelection;
                self.lists.clear();
                self.loading = true;
                self.status = None;
                self.controls_disabled = true;
            }
            SessionAction::ListsLoaded(lists) => {
                self.lists = sort_default_first(lists);
                self.loading = false;
                self.controls_disabled = false;
                self.filter.clear();
                self.status = Some(CHECKING_SAVED_STATUS.to_string());
            }
            SessionAction::SavedStatusChecked(saved_ids) => {
                if let Some(ids) = saved_ids {
                    self.lists = mark_saved(&self.lists, &ids);
                }
                self.status = None;
            }
            SessionAction::SetFilter(filter) => {
                self.filter = filter;
            }
            SessionAction::SaveStarted(list_name) => {
                if self.context.is_some() {
                    self.controls_disabled = true;
                    self.status = Some(format!("Saving to \"{}\"...", list_name));
                }
            }
            SessionAction::Finished(screen) => {
                self.screen = screen;
                self.loading = false;
                self.controls_disabled = false;
                self.status = None;
            }
        }
    }

    /// Lists matching the current filter, in display order
    pub fn visible_lists(&self) -> Vec<&ReadingList> {
        filter_by_name(&self.lists, &self.filter)
    }

    /// Context and list for a click on `list_id`; `None` while no context is set
    pub fn selection(&self, list_id: i64) -> Option<(SelectionContext, ReadingList)> {
        let context = self.context.clone()?;
        let list = self.lists.iter().find(|l| l.id == list_id)?.clone();
        Some((context, list))
    }
}

impl Reducible for PopupSession {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        next.into()
    }
}
