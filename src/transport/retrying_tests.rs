//! Tests for `RetryingTransport` and the process-wide default transport.

use super::test_fixtures::{HangingTransport, RecordingSleeper, ScriptedTransport, response};
use super::{HttpError, HttpRequest, RetryPolicy, RetryingTransport, Transport, default_transport};
use crate::context::{Cancellation, Context};
use crate::time::{InstantSleeper, TokioSleeper};
use std::sync::Arc;
use std::time::Duration;

fn test_request() -> HttpRequest {
    HttpRequest::post(url::Url::parse("https://example.com/callback").unwrap())
        .with_body(b"payload".to_vec())
}

fn retrying(
    base: Arc<ScriptedTransport>,
    max_attempts: u32,
) -> RetryingTransport<Arc<ScriptedTransport>, InstantSleeper> {
    RetryingTransport::with_max_retries(base, max_attempts).with_sleeper(InstantSleeper)
}

mod construction {
    use super::*;

    #[test]
    fn new_uses_default_policy() {
        let transport = RetryingTransport::new(ScriptedTransport::success());
        assert_eq!(*transport.policy(), RetryPolicy::default());
    }

    #[test]
    fn with_max_retries_sets_attempts() {
        let transport = RetryingTransport::with_max_retries(ScriptedTransport::success(), 3);
        assert_eq!(transport.policy().max_attempts, 3);
    }

    #[test]
    fn with_max_retries_below_one_falls_back_to_five() {
        let transport = RetryingTransport::with_max_retries(ScriptedTransport::success(), 0);
        assert_eq!(transport.policy().max_attempts, 5);
    }

    #[test]
    fn default_transport_allows_five_attempts() {
        assert_eq!(default_transport().policy().max_attempts, 5);
    }

    #[test]
    fn default_transport_is_shared() {
        assert!(std::ptr::eq(default_transport(), default_transport()));
    }
}

mod attempts {
    use super::*;

    #[tokio::test]
    async fn success_on_first_attempt_calls_once() {
        let base = Arc::new(ScriptedTransport::success());
        let transport = retrying(base.clone(), 5);

        let result = transport.perform(test_request()).await;

        assert!(result.is_ok());
        assert_eq!(base.calls(), 1);
    }

    #[tokio::test]
    async fn retries_until_success() {
        let base = Arc::new(ScriptedTransport::failing_then_success(3));
        let transport = retrying(base.clone(), 5);

        let result = transport.perform(test_request()).await;

        assert_eq!(result.unwrap().status, http::StatusCode::OK);
        assert_eq!(base.calls(), 4);
    }

    #[tokio::test]
    async fn exhaustion_makes_exactly_max_attempts() {
        let base = Arc::new(ScriptedTransport::always_failing());
        let transport = retrying(base.clone(), 4);

        let result = transport.perform(test_request()).await;

        assert!(matches!(result, Err(HttpError::Timeout)));
        assert_eq!(base.calls(), 4);
    }

    #[tokio::test]
    async fn exhaustion_surfaces_last_error() {
        let base = Arc::new(ScriptedTransport::new(vec![
            Err(HttpError::Timeout),
            Err(HttpError::connection(std::io::Error::other("refused"))),
        ]));
        let transport = retrying(base.clone(), 2);

        let result = transport.perform(test_request()).await;

        assert!(matches!(result, Err(HttpError::Connection(_))));
    }

    #[tokio::test]
    async fn non_retryable_error_fails_immediately() {
        let base = Arc::new(ScriptedTransport::new(vec![Err(HttpError::InvalidUrl(
            "bad".to_string(),
        ))]));
        let transport = retrying(base.clone(), 5);

        let result = transport.perform(test_request()).await;

        assert!(matches!(result, Err(HttpError::InvalidUrl(_))));
        assert_eq!(base.calls(), 1);
    }

    #[tokio::test]
    async fn server_error_response_is_returned_without_retry() {
        let base = Arc::new(ScriptedTransport::new(vec![Ok(response(
            http::StatusCode::INTERNAL_SERVER_ERROR,
        ))]));
        let transport = retrying(base.clone(), 5);

        let result = transport.perform(test_request()).await.unwrap();

        assert_eq!(result.status, http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(base.calls(), 1);
    }

    #[tokio::test]
    async fn every_attempt_resends_full_request() {
        let base = Arc::new(ScriptedTransport::failing_then_success(2));
        let transport = retrying(base.clone(), 5);

        transport.perform(test_request()).await.unwrap();

        let requests = base.captured_requests();
        assert_eq!(requests.len(), 3);
        for req in requests {
            assert_eq!(req.method, http::Method::POST);
            assert_eq!(req.body.as_deref(), Some(&b"payload"[..]));
        }
    }
}

mod backoff {
    use super::*;

    #[tokio::test]
    async fn delays_follow_policy() {
        let base = Arc::new(ScriptedTransport::failing_then_success(3));
        let sleeper = RecordingSleeper::default();
        let transport = RetryingTransport::new(base.clone())
            .with_policy(
                RetryPolicy::new()
                    .with_initial_delay(Duration::from_secs(1))
                    .with_multiplier(2.0),
            )
            .with_sleeper(&sleeper);

        transport.perform(test_request()).await.unwrap();

        assert_eq!(
            sleeper.delays(),
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4),
            ]
        );
    }

    #[tokio::test]
    async fn no_delay_after_final_attempt() {
        let base = Arc::new(ScriptedTransport::always_failing());
        let sleeper = RecordingSleeper::default();
        let transport = RetryingTransport::with_max_retries(base.clone(), 3).with_sleeper(&sleeper);

        let _ = transport.perform(test_request()).await;

        assert_eq!(sleeper.delays().len(), 2);
    }
}

mod cancellation {
    use super::*;

    #[tokio::test]
    async fn already_cancelled_context_makes_no_attempt() {
        let base = Arc::new(ScriptedTransport::success());
        let transport = retrying(base.clone(), 5);
        let ctx = Context::background();
        ctx.cancel();

        let result = transport.perform(test_request().with_context(ctx)).await;

        assert!(matches!(
            result,
            Err(HttpError::Cancelled(Cancellation::Cancelled))
        ));
        assert_eq!(base.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_during_backoff_stops_retries() {
        let base = Arc::new(ScriptedTransport::always_failing());
        let transport = RetryingTransport::new(base.clone())
            .with_policy(RetryPolicy::new().with_initial_delay(Duration::from_secs(10)))
            .with_sleeper(TokioSleeper);
        let ctx = Context::with_timeout(Duration::from_secs(1));

        let result = transport.perform(test_request().with_context(ctx)).await;

        assert!(matches!(
            result,
            Err(HttpError::Cancelled(Cancellation::DeadlineExceeded))
        ));
        assert_eq!(base.calls(), 1);
    }

    #[tokio::test]
    async fn cancel_aborts_in_flight_attempt() {
        let base = Arc::new(HangingTransport::default());
        let transport = RetryingTransport::new(base.clone()).with_sleeper(InstantSleeper);
        let ctx = Context::background();

        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let result = transport.perform(test_request().with_context(ctx)).await;

        assert!(matches!(
            result,
            Err(HttpError::Cancelled(Cancellation::Cancelled))
        ));
        assert_eq!(base.calls(), 1);
    }
}
