//! `nextToken` pagination and describe batching

use anyhow::Result;
use std::future::Future;

/// Fetch pages until the service stops returning a token.
///
/// `fetch` gets the token of the previous page (`None` first) and returns
/// the page items plus the next token. An empty token ends the listing.
pub(super) async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<(Vec<T>, Option<String>)>>,
{
    let mut items = Vec::new();
    let mut next_token = None;

    loop {
        let (page, token) = fetch(next_token.take()).await?;
        items.extend(page);

        match token {
            Some(token) if !token.is_empty() => next_token = Some(token),
            _ => break,
        }
    }

    Ok(items)
}

/// Call `fetch` once per `batch_size` ARNs, keeping results in input order.
/// The first failing batch fails the whole call.
pub(super) async fn in_batches<T, F, Fut>(
    arns: &[String],
    batch_size: usize,
    mut fetch: F,
) -> Result<Vec<T>>
where
    F: FnMut(Vec<String>) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut items = Vec::with_capacity(arns.len());
    for batch in arns.chunks(batch_size) {
        items.extend(fetch(batch.to_vec()).await?);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use ecstatic_common::defaults::DESCRIBE_CONTAINER_INSTANCES_BATCH;

    fn arns(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("arn:ci/{i}")).collect()
    }

    #[tokio::test]
    async fn test_collect_pages_follows_tokens() {
        let mut pages = vec![
            (vec!["a", "b"], Some("t1".to_string())),
            (vec!["c"], Some("t2".to_string())),
            (vec!["d"], None),
        ]
        .into_iter();
        let mut seen = Vec::new();

        let items = collect_pages(|token| {
            seen.push(token);
            let page = pages.next();
            async move { page.ok_or_else(|| anyhow!("asked for a page past the end")) }
        })
        .await
        .unwrap();

        assert_eq!(items, vec!["a", "b", "c", "d"]);
        assert_eq!(seen, vec![None, Some("t1".to_string()), Some("t2".to_string())]);
    }

    #[tokio::test]
    async fn test_collect_pages_stops_on_empty_token() {
        let mut calls = 0;
        let items = collect_pages(|_| {
            calls += 1;
            async { Ok::<_, anyhow::Error>((vec![1, 2], Some(String::new()))) }
        })
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2]);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_collect_pages_error_on_later_page() {
        let mut calls = 0;
        let result: Result<Vec<u32>> = collect_pages(|_| {
            calls += 1;
            let call = calls;
            async move {
                if call == 1 {
                    Ok((vec![1], Some("t1".to_string())))
                } else {
                    Err(anyhow!("ThrottlingException"))
                }
            }
        })
        .await;

        assert_eq!(result.unwrap_err().to_string(), "ThrottlingException");
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn test_in_batches_splits_101_arns() {
        let input = arns(101);
        let mut batch_sizes = Vec::new();

        let items = in_batches(&input, DESCRIBE_CONTAINER_INSTANCES_BATCH, |batch| {
            batch_sizes.push(batch.len());
            async move { Ok::<_, anyhow::Error>(batch) }
        })
        .await
        .unwrap();

        assert_eq!(batch_sizes, vec![100, 1]);
        assert_eq!(items, input);
    }

    #[tokio::test]
    async fn test_in_batches_exact_multiple_and_empty() {
        let mut batch_sizes = Vec::new();
        in_batches(&arns(200), 100, |batch| {
            batch_sizes.push(batch.len());
            async move { Ok::<_, anyhow::Error>(batch) }
        })
        .await
        .unwrap();
        assert_eq!(batch_sizes, vec![100, 100]);

        let mut calls = 0;
        let items: Vec<String> = in_batches(&[], 100, |batch| {
            calls += 1;
            async move { Ok::<_, anyhow::Error>(batch) }
        })
        .await
        .unwrap();
        assert!(items.is_empty());
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_in_batches_failing_batch_fails_call() {
        let mut calls = 0;
        let result = in_batches(&arns(250), 100, |batch| {
            calls += 1;
            let call = calls;
            async move {
                if call == 2 {
                    Err(anyhow!("batch {call} failed"))
                } else {
                    Ok(batch)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap_err().to_string(), "batch 2 failed");
        assert_eq!(calls, 2);
    }
}
