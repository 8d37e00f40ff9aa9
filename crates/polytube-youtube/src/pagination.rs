//! Continuation-token pagination.
//!
//! List endpoints return up to one page of items plus a `nextPageToken`
//! when more exist. The next request repeats the call with that token;
//! a response without a token is the last page.

use std::future::Future;

use crate::error::YoutubeError;

/// Drive a token-paginated endpoint to completion.
///
/// `fetch` receives `None` for the first page and the previous page's token
/// afterwards, and returns the page items plus the next token. Items are
/// concatenated in response order. An empty-string token is treated as
/// absent.
///
/// # Errors
///
/// Propagates the first error returned by `fetch`, discarding earlier pages.
/// Returns [`YoutubeError::PaginationLimit`] once more than `max_pages`
/// pages have been requested.
pub async fn collect_pages<T, F, Fut>(
    context: &str,
    max_pages: usize,
    mut fetch: F,
) -> Result<Vec<T>, YoutubeError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<(Vec<T>, Option<String>), YoutubeError>>,
{
    let mut all_items = Vec::new();
    let mut token: Option<String> = None;
    let mut page_count = 0usize;

    loop {
        page_count += 1;
        if page_count > max_pages {
            return Err(YoutubeError::PaginationLimit {
                context: context.to_owned(),
                max_pages,
            });
        }

        let (items, next) = fetch(token.take()).await?;
        all_items.extend(items);

        token = next.filter(|t| !t.is_empty());
        if token.is_none() {
            break;
        }
    }

    tracing::debug!(context, pages = page_count, items = all_items.len(), "pagination complete");
    Ok(all_items)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// In-memory source: `pages` pages of `page_size`, the last one `shortfall` short.
    fn page_source(
        pages: usize,
        page_size: usize,
        shortfall: usize,
    ) -> impl Fn(Option<String>) -> (Vec<String>, Option<String>) {
        move |token| {
            let index: usize = token.map_or(0, |t| t.trim_start_matches("tok-").parse().unwrap());
            let len = if index + 1 == pages {
                page_size - shortfall
            } else {
                page_size
            };
            let items = (0..len).map(|i| format!("p{index}-c{i}")).collect();
            let next = (index + 1 < pages).then(|| format!("tok-{}", index + 1));
            (items, next)
        }
    }

    #[tokio::test]
    async fn concatenates_all_pages_in_order() {
        let source = page_source(3, 100, 40);
        let requested = RefCell::new(Vec::new());
        let items = collect_pages("test", 10, |token| {
            requested.borrow_mut().push(token.clone());
            let page = source(token);
            async move { Ok(page) }
        })
        .await
        .unwrap();

        assert_eq!(items.len(), 3 * 100 - 40);
        assert_eq!(items.first().map(String::as_str), Some("p0-c0"));
        assert_eq!(items[100], "p1-c0");
        assert_eq!(items.last().map(String::as_str), Some("p2-c59"));
        assert_eq!(
            *requested.borrow(),
            vec![None, Some("tok-1".to_string()), Some("tok-2".to_string())]
        );
    }

    #[tokio::test]
    async fn single_page_without_token_stops() {
        let items = collect_pages("test", 10, |_| async {
            Ok((vec![1, 2, 3], None))
        })
        .await
        .unwrap();
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn empty_token_is_last_page() {
        let items = collect_pages("test", 10, |_| async {
            Ok((vec!["a"], Some(String::new())))
        })
        .await
        .unwrap();
        assert_eq!(items, vec!["a"]);
    }

    #[tokio::test]
    async fn cycling_token_hits_page_limit() {
        let result = collect_pages("loop", 5, |_| async {
            Ok((vec![0u8], Some("same".to_string())))
        })
        .await;
        assert!(matches!(
            result,
            Err(YoutubeError::PaginationLimit { max_pages: 5, .. })
        ));
    }

    #[tokio::test]
    async fn error_on_later_page_propagates() {
        let result: Result<Vec<u8>, _> = collect_pages("err", 5, |token| async move {
            match token {
                None => Ok((vec![1], Some("next".to_string()))),
                Some(_) => Err(YoutubeError::VideoNotFound("v".to_string())),
            }
        })
        .await;
        assert!(matches!(result, Err(YoutubeError::VideoNotFound(_))));
    }
}
