pub mod llm;

use async_trait::async_trait;
use std::time::Duration;

use crate::config::Language;
use crate::error::Result;

/// Translates one piece of text into the target language. Stateless per
/// call; no batching is assumed.
#[async_trait]
pub trait TranslationClient: Send + Sync {
    async fn translate(&self, text: &str, target: Language) -> Result<String>;
}

/// Bounded attempts with exponential backoff between them.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

/// Retry wrapper around any translation client. Sits outside the timeline
/// logic so reconciliation stays pure.
pub struct Retrying<C> {
    inner: C,
    policy: RetryPolicy,
}

impl<C: TranslationClient> Retrying<C> {
    pub fn new(inner: C, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<C: TranslationClient> TranslationClient for Retrying<C> {
    async fn translate(&self, text: &str, target: Language) -> Result<String> {
        let mut delay = self.policy.base_delay;
        let mut attempt = 1;

        loop {
            match self.inner.translate(text, target).await {
                Ok(translated) => return Ok(translated),
                Err(err) if attempt < self.policy.max_attempts => {
                    log::warn!(
                        "translation attempt {attempt}/{} failed: {err}; retrying in {:?}",
                        self.policy.max_attempts,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SublateError;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Flaky {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl TranslationClient for Flaky {
        async fn translate(&self, text: &str, target: Language) -> Result<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(SublateError::Translation {
                    target: target.to_string(),
                    message: "service unavailable".to_string(),
                })
            } else {
                Ok(format!("{text} ({target})"))
            }
        }
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let client = Retrying::new(
            Flaky {
                failures: 2,
                calls: AtomicU32::new(0),
            },
            fast_policy(3),
        );

        let out = client.translate("bonjour", Language::English).await.unwrap();
        assert_eq!(out, "bonjour (en)");
        assert_eq!(client.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_bounded_attempts() {
        let client = Retrying::new(
            Flaky {
                failures: u32::MAX,
                calls: AtomicU32::new(0),
            },
            fast_policy(3),
        );

        let err = client
            .translate("bonjour", Language::English)
            .await
            .unwrap_err();
        assert!(matches!(err, SublateError::Translation { .. }));
        assert_eq!(client.inner.calls.load(Ordering::SeqCst), 3);
    }
}
