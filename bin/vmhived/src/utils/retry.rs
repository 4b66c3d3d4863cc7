use std::future::Future;
use std::time::Duration;

/// Run an operation up to `attempts` times with a fixed delay in between.
/// Used at the substrate boundaries the reconciler owns, user facing calls
/// surface their error on the first failure instead.
pub async fn retry<F, Fut, T, E>(
  attempts: usize,
  delay: Duration,
  mut operation: F,
) -> Result<T, E>
where
  F: FnMut() -> Fut,
  Fut: Future<Output = Result<T, E>>,
  E: std::fmt::Display,
{
  let mut attempt = 1;
  loop {
    match operation().await {
      Ok(res) => return Ok(res),
      Err(err) => {
        if attempt >= attempts {
          return Err(err);
        }
        log::warn!("retry: attempt {attempt} failed: {err}");
        attempt += 1;
        ntex::time::sleep(delay).await;
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use std::cell::Cell;

  #[ntex::test]
  async fn succeeds_after_failures() {
    let calls = Cell::new(0);
    let res = retry(5, Duration::from_millis(1), || {
      calls.set(calls.get() + 1);
      let n = calls.get();
      async move {
        if n < 3 {
          Err("not yet")
        } else {
          Ok(n)
        }
      }
    })
    .await;
    assert_eq!(res, Ok(3));
  }

  #[ntex::test]
  async fn gives_up_after_budget() {
    let calls = Cell::new(0);
    let res: Result<(), &str> = retry(3, Duration::from_millis(1), || {
      calls.set(calls.get() + 1);
      async { Err("nope") }
    })
    .await;
    assert_eq!(res, Err("nope"));
    assert_eq!(calls.get(), 3);
  }
}
