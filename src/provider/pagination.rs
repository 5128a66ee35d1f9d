//! Link-header pagination
//!
//! GitHub-style APIs return the next page URL in a `Link` header. Pages are
//! exposed as a lazy stream that ends when no `rel="next"` link remains;
//! callers concatenate it with `try_concat`.

use futures::Stream;
use reqwest::header::{HeaderMap, LINK};
use std::future::Future;

use crate::error::Result;

/// Page size requested from the API (GitHub's maximum)
pub const MAX_PAGE_SIZE: u32 = 100;

/// One page of results plus the URL of the following page
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

/// Extract the `rel="next"` target from a `Link` header.
///
/// Format: `<https://api.github.com/user/repos?page=2>; rel="next", <...>; rel="last"`
pub fn next_link(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(LINK)?.to_str().ok()?;
    parse_next_link(link)
}

fn parse_next_link(link: &str) -> Option<String> {
    link.split(',').find_map(|part| {
        let mut sections = part.split(';');
        let target = sections.next()?.trim();
        let is_next = sections.any(|param| {
            let param = param.trim();
            param == r#"rel="next""# || param == "rel=next"
        });
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}

/// Lazily walk pages starting at `first`, calling `fetch` once per page.
///
/// The stream is finite and cannot be restarted; each call to `fetch`
/// happens only when the previous page has been consumed.
pub fn paginate<T, F, Fut>(first: String, fetch: F) -> impl Stream<Item = Result<Vec<T>>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    futures::stream::try_unfold((Some(first), fetch), step::<T, F, Fut>)
}

async fn step<T, F, Fut>(
    (next, mut fetch): (Option<String>, F),
) -> Result<Option<(Vec<T>, (Option<String>, F))>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let Some(url) = next else {
        return Ok(None);
    };

    log::debug!("Fetching page {}", url);
    let page = fetch(url).await?;
    Ok(Some((page.items, (page.next, fetch))))
}
