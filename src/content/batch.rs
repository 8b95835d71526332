use futures::stream::{self, StreamExt};
use std::future::Future;

/// Run a batch of futures concurrently and wait for all of them.
///
/// At most `limit` futures are polled at once. The output is in input order
/// regardless of completion order: the batch is joined, never raced.
pub async fn join_ordered<I, F>(futures: I, limit: usize) -> Vec<F::Output>
where
    I: IntoIterator<Item = F>,
    F: Future,
{
    stream::iter(futures).buffered(limit.max(1)).collect().await
}
