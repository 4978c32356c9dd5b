/// Reusable UI components

use crate::reading_list::ReadingList;
use yew::prelude::*;

pub const DEFAULT_TAG: &str = "Default";
pub const SAVED_TOOLTIP: &str = "Saved in this list";

#[derive(Properties, PartialEq)]
pub struct ReadingListRowProps {
    pub list: ReadingList,
    pub onselect: Callback<i64>,
    #[prop_or(false)]
    pub disabled: bool,
}

/// One selectable reading list: name, then default/size/saved markers
#[function_component(ReadingListRow)]
pub fn reading_list_row(props: &ReadingListRowProps) -> Html {
    let list = &props.list;
    let onclick = {
        let onselect = props.onselect.clone();
        let list_id = list.id;
        Callback::from(move |_: MouseEvent| onselect.emit(list_id))
    };
    let has_meta = list.default || list.size.is_some() || list.has_entry;

    html! {
        <li>
            <button
                type="button"
                class="listButton"
                data-list-id={list.id.to_string()}
                disabled={props.disabled}
                {onclick}
            >
                <span class="listName">{&list.name}</span>
                if has_meta {
                    <span class="listMeta">
                        if list.default {
                            <span class="listDefaultTag">{DEFAULT_TAG}</span>
                        }
                        if let Some(size) = list.size {
                            <span class="listSizeTag">{size}</span>
                        }
                        if list.has_entry {
                            <span class="listSavedIcon" title={SAVED_TOOLTIP}></span>
                        }
                    </span>
                }
            </button>
        </li>
    }
}

#[derive(Properties, PartialEq)]
pub struct StatusLineProps {
    #[prop_or_default]
    pub text: Option<String>,
}

/// Transient status under the list ("Saving to ...")
#[function_component(StatusLine)]
pub fn status_line(props: &StatusLineProps) -> Html {
    match &props.text {
        Some(text) if !text.is_empty() => html! {
            <p id="listStatus" class="list-status">{text}</p>
        },
        _ => html! {},
    }
}
