/// Popup UI: one panel per `Screen`

use crate::config::ExtensionConfig;
use crate::host::BrowserHost;
use crate::http::FetchClient;
use crate::session::{FailureMessage, LoginPrompt, PopupSession, Screen, SessionAction, SuccessMessage};
use crate::ui::components::{ReadingListRow, StatusLine};
use crate::workflow::PopupWorkflow;
use patternfly_yew::prelude::*;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

type Workflow = PopupWorkflow<FetchClient, BrowserHost>;

#[function_component(App)]
pub fn app() -> Html {
    let session = use_reducer(PopupSession::new);
    let workflow: Rc<Workflow> = use_memo((), |_| {
        PopupWorkflow::new(FetchClient, BrowserHost, ExtensionConfig::bundled())
    });

    // Token, lists and saved status on open
    {
        let dispatcher = session.dispatcher();
        let workflow = workflow.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                workflow.open(move |action| dispatcher.dispatch(action)).await;
            });
            || ()
        });
    }

    let on_search_input = {
        let dispatcher = session.dispatcher();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                dispatcher.dispatch(SessionAction::SetFilter(input.value()));
            }
        })
    };

    let on_select = {
        let session = session.clone();
        let workflow = workflow.clone();
        Callback::from(move |list_id: i64| {
            let Some((context, list)) = session.selection(list_id) else {
                return;
            };
            let dispatcher = session.dispatcher();
            let workflow = workflow.clone();
            spawn_local(async move {
                workflow
                    .select(&context, &list, move |action| dispatcher.dispatch(action))
                    .await;
            });
        })
    };

    let body = match &session.screen {
        Screen::Loading => html! {
            <div class="loading-text-center">
                <Spinner />
            </div>
        },
        Screen::ListSelection => list_selection(&session, on_search_input, on_select),
        Screen::LoginPrompt(prompt) => login_prompt(prompt, workflow.clone()),
        Screen::Success(message) => success(message),
        Screen::Failure(failure) => failure_panel(failure, workflow.clone()),
    };

    html! {
        <div class="padding-20">
            {body}
        </div>
    }
}

fn list_selection(session: &PopupSession, on_search_input: Callback<InputEvent>, on_select: Callback<i64>) -> Html {
    let visible = session.visible_lists();

    html! {
        <div id="listSelectionContainer">
            <input
                id="listSearchInput"
                type="search"
                class="search-input"
                placeholder="Search lists"
                value={session.filter.clone()}
                disabled={session.controls_disabled}
                oninput={on_search_input}
            />
            <StatusLine text={session.status.clone()} />
            if session.loading {
                <div id="listLoading" class="loading-text-center">
                    <Spinner />
                </div>
            } else if visible.is_empty() {
                <p id="listEmpty" class="empty-state">{"No reading lists found."}</p>
            } else {
                <ul id="listResults">
                    {for visible.into_iter().map(|list| html! {
                        <ReadingListRow
                            key={list.id}
                            list={list.clone()}
                            disabled={session.controls_disabled}
                            onselect={on_select.clone()}
                        />
                    })}
                </ul>
            }
        </div>
    }
}

fn login_prompt(prompt: &LoginPrompt, workflow: Rc<Workflow>) -> Html {
    let on_login = {
        let prompt = prompt.clone();
        Callback::from(move |_: MouseEvent| {
            let prompt = prompt.clone();
            let workflow = workflow.clone();
            spawn_local(async move {
                workflow.follow_login(&prompt).await;
            });
        })
    };

    html! {
        <div id="loginPromptContainer" class="flex-column-gap">
            <p id="loginPromptText">{&prompt.text}</p>
            <Button onclick={on_login} variant={ButtonVariant::Primary} block={true}>
                {prompt.button_text.clone()}
            </Button>
        </div>
    }
}

fn success(message: &SuccessMessage) -> Html {
    html! {
        <div id="addToListSuccessContainer">
            <p id="successText">
                {&message.before}
                if let Some(title) = &message.title {
                    <span class="successTitle">{title}</span>
                }
                {&message.after}
            </p>
        </div>
    }
}

fn failure_panel(failure: &FailureMessage, workflow: Rc<Workflow>) -> Html {
    let learn_more = failure.learn_more.clone().map(|link| {
        let on_click = {
            let link = link.clone();
            Callback::from(move |e: MouseEvent| {
                e.prevent_default();
                let link = link.clone();
                let workflow = workflow.clone();
                spawn_local(async move {
                    workflow.open_learn_more(&link).await;
                });
            })
        };
        html! {
            <p id="learnMoreLinkContainer">
                <a id="learnMoreLink" href={link.url.clone()} onclick={on_click}>{link.text}</a>
            </p>
        }
    });

    html! {
        <div id="addToListFailedContainer">
            <Alert r#type={AlertType::Danger} title={failure.text.clone()} inline={true}>
                {for learn_more}
            </Alert>
        </div>
    }
}
