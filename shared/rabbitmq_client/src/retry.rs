use std::{fmt::Display, future::Future, time::Duration};

///
/// Runs `async_fn` until it succeeds, sleeping `retry_interval` between attempts.
/// `action` is used only for logging.
///
pub async fn retry<F, Fut, T, E>(retry_interval: Duration, action: &'static str, mut async_fn: F) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        tracing::info!(attempt, action, "attempt started");
        match async_fn().await {
            Ok(output) => return output,
            Err(err) => tracing::warn!(attempt, action, %err, "attempt failed"),
        }

        tokio::time::sleep(retry_interval).await;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn retries_until_success() {
        let calls = AtomicU32::new(0);
        let calls = &calls;

        let output = retry(Duration::from_millis(1), "test", || async move {
            let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call < 3 {
                Err(format!("call {call} failed"))
            } else {
                Ok(call)
            }
        })
        .await;

        assert_eq!(output, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn first_success_returns_immediately() {
        let output: &str = retry(Duration::from_secs(60), "test", || async move {
            Ok::<_, String>("done")
        })
        .await;

        assert_eq!(output, "done");
    }
}
