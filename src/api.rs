/// MediaWiki action API and REST calls for reading lists
use crate::error::ApiError;
use crate::http::HttpClient;
use crate::i18n::{self, Messages};
use crate::reading_list::ReadingList;
use crate::title::encode_component;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashSet;

pub fn reading_lists_url(origin: &str, rlcontinue: Option<&str>) -> String {
    let mut url = format!("{}/w/api.php?action=query&meta=readinglists&rllimit=max&format=json", origin);
    if let Some(cursor) = rlcontinue {
        url.push_str("&rlcontinue=");
        url.push_str(&encode_component(cursor));
    }
    url
}

pub fn entry_lookup_url(origin: &str, title: &str, project: &str) -> String {
    format!(
        "{}/w/api.php?action=query&meta=readinglists&rlproject={}&rltitle={}&format=json",
        origin,
        encode_component(project),
        encode_component(title)
    )
}

pub fn csrf_token_url(origin: &str) -> String {
    format!("{}/w/api.php?action=query&format=json&formatversion=2&meta=tokens&type=csrf", origin)
}

pub fn all_messages_url(origin: &str, keys: &[&str]) -> String {
    format!(
        "{}/w/api.php?action=query&format=json&formatversion=2&meta=allmessages&amenableparser=&ammessages={}",
        origin,
        keys.join("|")
    )
}

pub fn site_info_url(origin: &str) -> String {
    format!("{}/w/api.php?action=query&format=json&formatversion=2&meta=siteinfo&siprop=general", origin)
}

pub fn post_entry_url(origin: &str, list_id: i64, token: &str) -> String {
    format!(
        "{}/api/rest_v1/data/lists/{}/entries/?csrf_token={}",
        origin,
        list_id,
        encode_component(token)
    )
}

/// One page of `meta=readinglists`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingListsPage {
    pub lists: Vec<ReadingList>,
    /// Cursor for the next page, absent on the last one
    pub rlcontinue: Option<String>,
}

#[derive(Deserialize)]
struct ReadingListsBody {
    #[serde(default)]
    query: Option<ReadingListsQuery>,
    #[serde(default, rename = "continue")]
    cont: Option<ContinueBlock>,
}

#[derive(Deserialize)]
struct ReadingListsQuery {
    #[serde(default)]
    readinglists: Vec<ReadingList>,
}

#[derive(Deserialize)]
struct ContinueBlock {
    #[serde(default)]
    rlcontinue: Option<String>,
}

/// Reply to an entry POST
#[derive(Debug, Clone, PartialEq)]
pub enum AddEntryResult {
    Added { id: i64 },
    Rejected(crate::error::ErrorBody),
}

/// Action API errors arrive with HTTP 200 as `{"error": {...}}`
fn check_action_error(body: Value) -> Result<Value, ApiError> {
    if body.get("error").is_some_and(Value::is_object) {
        Err(ApiError::Rejected(crate::error::ErrorBody::from_json(body)))
    } else {
        Ok(body)
    }
}

/// Calls against one wiki origin
pub struct WikiApi<'a, C> {
    client: &'a C,
    origin: String,
}

impl<'a, C: HttpClient> WikiApi<'a, C> {
    pub fn new(client: &'a C, origin: &str) -> Self {
        WikiApi {
            client,
            origin: origin.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json(&self, url: &str) -> Result<Value, ApiError> {
        let body = self.client.get(url).await?.into_result()?;
        check_action_error(body)
    }

    pub async fn csrf_token(&self) -> Result<String, ApiError> {
        let body = self.get_json(&csrf_token_url(&self.origin)).await?;
        body.pointer("/query/tokens/csrftoken")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ApiError::Malformed("no csrftoken in response".to_string()))
    }

    pub async fn reading_lists_page(&self, rlcontinue: Option<&str>) -> Result<ReadingListsPage, ApiError> {
        let body = self.get_json(&reading_lists_url(&self.origin, rlcontinue)).await?;
        let parsed: ReadingListsBody =
            serde_json::from_value(body).map_err(|e| ApiError::Malformed(e.to_string()))?;

        Ok(ReadingListsPage {
            lists: parsed.query.map(|q| q.readinglists).unwrap_or_default(),
            rlcontinue: parsed.cont.and_then(|c| c.rlcontinue).filter(|c| !c.is_empty()),
        })
    }

    /// Every list the user owns, following `rlcontinue` one page at a time
    pub async fn all_reading_lists(&self) -> Result<Vec<ReadingList>, ApiError> {
        let mut lists = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self.reading_lists_page(cursor.as_deref()).await?;
            lists.extend(page.lists);
            match page.rlcontinue {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        log::debug!("loaded {} reading lists from {}", lists.len(), self.origin);
        Ok(lists)
    }

    /// Ids of the lists that already contain `title`
    pub async fn lists_containing(&self, project: &str, title: &str) -> Result<HashSet<i64>, ApiError> {
        let body = self.get_json(&entry_lookup_url(&self.origin, title, project)).await?;
        let ids = body
            .pointer("/query/readinglists")
            .and_then(Value::as_array)
            .map(|lists| {
                lists
                    .iter()
                    .filter_map(|list| list.get("id").and_then(Value::as_i64))
                    .collect()
            })
            .unwrap_or_default();
        Ok(ids)
    }

    pub async fn add_entry(&self, list_id: i64, token: &str, project: &str, title: &str) -> Result<AddEntryResult, ApiError> {
        let url = post_entry_url(&self.origin, list_id, token);
        let response = self
            .client
            .post_json(&url, &json!({ "project": project, "title": title }))
            .await?;

        Ok(match response.body.get("id").and_then(Value::as_i64) {
            Some(id) => AddEntryResult::Added { id },
            None => AddEntryResult::Rejected(crate::error::ErrorBody::from_json(response.body)),
        })
    }

    pub async fn all_messages(&self, keys: &[&str]) -> Result<Messages, ApiError> {
        let body = self.get_json(&all_messages_url(&self.origin, keys)).await?;
        Ok(i18n::parse_allmessages(&body))
    }

    /// `maxEntriesPerList` from the site's ReadingLists configuration
    pub async fn max_entries_per_list(&self) -> Result<Option<u64>, ApiError> {
        let body = self.get_json(&site_info_url(&self.origin)).await?;
        Ok(body
            .pointer("/query/general/readinglists-config/maxEntriesPerList")
            .and_then(Value::as_u64))
    }
}
