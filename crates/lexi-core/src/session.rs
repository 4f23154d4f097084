use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use lexi_types::{Credentials, Identity};
use tokio::sync::watch;

use crate::error::AuthError;

/// Hosted identity provider
#[async_trait::async_trait]
pub trait SessionProvider: Send + Sync {
    /// Identity of the current session, if any
    async fn current_session(&self) -> Result<Option<Identity>, AuthError>;

    async fn sign_in(&self, credentials: Credentials) -> Result<Identity, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Browser URL that starts the OAuth flow, when supported
    fn authorize_url(&self) -> Option<String>;
}

/// Shared identity state with change notifications.
///
/// Components that need identity get a [`SessionSubscription`]; dropping it
/// unsubscribes.
pub struct SessionContext {
    provider: Arc<dyn SessionProvider>,
    identity: watch::Sender<Option<Identity>>,
    subscribers: Arc<AtomicUsize>,
}

impl SessionContext {
    pub fn new(provider: Arc<dyn SessionProvider>) -> Self {
        let (identity, _) = watch::channel(None);
        Self {
            provider,
            identity,
            subscribers: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        self.identity.borrow().clone()
    }

    pub fn user_id(&self) -> Option<String> {
        self.identity.borrow().as_ref().map(|i| i.id.clone())
    }

    /// Ask the provider for the current session and publish it
    pub async fn refresh(&self) -> Result<Option<Identity>, AuthError> {
        let identity = self.provider.current_session().await?;
        self.publish(identity.clone());
        Ok(identity)
    }

    pub async fn sign_in(&self, credentials: Credentials) -> Result<Identity, AuthError> {
        let identity = self.provider.sign_in(credentials).await?;
        tracing::info!(user = %identity.id, "signed in");
        self.publish(Some(identity.clone()));
        Ok(identity)
    }

    /// Local identity is cleared even if the remote sign-out fails
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let result = self.provider.sign_out().await;
        self.publish(None);
        tracing::info!("signed out");
        result
    }

    pub fn authorize_url(&self) -> Option<String> {
        self.provider.authorize_url()
    }

    pub fn subscribe(&self) -> SessionSubscription {
        let count = self.subscribers.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(subscribers = count, "session subscription acquired");
        SessionSubscription {
            rx: self.identity.subscribe(),
            subscribers: self.subscribers.clone(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.load(Ordering::SeqCst)
    }

    fn publish(&self, identity: Option<Identity>) {
        self.identity.send_if_modified(|current| {
            if *current == identity {
                return false;
            }
            *current = identity;
            true
        });
    }
}

/// Live view of session changes, released on drop
pub struct SessionSubscription {
    rx: watch::Receiver<Option<Identity>>,
    subscribers: Arc<AtomicUsize>,
}

impl SessionSubscription {
    pub fn current(&self) -> Option<Identity> {
        self.rx.borrow().clone()
    }

    /// Next identity change; `None` once the context is gone
    pub async fn changed(&mut self) -> Option<Option<Identity>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        let count = self.subscribers.fetch_sub(1, Ordering::SeqCst) - 1;
        tracing::debug!(subscribers = count, "session subscription released");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use lexi_types::UserMetadata;
    use tokio::time::timeout;

    use super::*;

    struct FakeProvider {
        fail_sign_out: bool,
    }

    fn ada() -> Identity {
        Identity {
            id: "u1".into(),
            email: Some("ada@example.com".into()),
            metadata: UserMetadata {
                full_name: Some("Ada".into()),
                avatar_url: None,
            },
        }
    }

    #[async_trait::async_trait]
    impl SessionProvider for FakeProvider {
        async fn current_session(&self) -> Result<Option<Identity>, AuthError> {
            Ok(None)
        }

        async fn sign_in(&self, credentials: Credentials) -> Result<Identity, AuthError> {
            match credentials {
                Credentials::Password { password, .. } if password == "secret" => Ok(ada()),
                _ => Err(AuthError::InvalidCredentials("bad password".into())),
            }
        }

        async fn sign_out(&self) -> Result<(), AuthError> {
            if self.fail_sign_out {
                return Err(AuthError::Status {
                    status: 500,
                    message: "boom".into(),
                });
            }
            Ok(())
        }

        fn authorize_url(&self) -> Option<String> {
            None
        }
    }

    fn password(p: &str) -> Credentials {
        Credentials::Password {
            email: "ada@example.com".into(),
            password: p.into(),
        }
    }

    #[tokio::test]
    async fn subscribers_see_sign_in_and_out() {
        let ctx = SessionContext::new(Arc::new(FakeProvider {
            fail_sign_out: false,
        }));
        let mut sub = ctx.subscribe();
        assert_eq!(sub.current(), None);

        ctx.sign_in(password("secret")).await.unwrap();
        let next = timeout(Duration::from_secs(1), sub.changed()).await.unwrap();
        assert_eq!(next, Some(Some(ada())));
        assert_eq!(ctx.user_id().as_deref(), Some("u1"));

        ctx.sign_out().await.unwrap();
        let next = timeout(Duration::from_secs(1), sub.changed()).await.unwrap();
        assert_eq!(next, Some(None));
    }

    #[tokio::test]
    async fn failed_sign_in_keeps_prior_state() {
        let ctx = SessionContext::new(Arc::new(FakeProvider {
            fail_sign_out: false,
        }));
        assert!(ctx.sign_in(password("wrong")).await.is_err());
        assert_eq!(ctx.identity(), None);
    }

    #[tokio::test]
    async fn failed_remote_sign_out_still_clears_identity() {
        let ctx = SessionContext::new(Arc::new(FakeProvider {
            fail_sign_out: true,
        }));
        ctx.sign_in(password("secret")).await.unwrap();
        assert!(ctx.sign_out().await.is_err());
        assert_eq!(ctx.identity(), None);
    }

    #[tokio::test]
    async fn dropping_subscription_releases_it() {
        let ctx = SessionContext::new(Arc::new(FakeProvider {
            fail_sign_out: false,
        }));
        let a = ctx.subscribe();
        {
            let _b = ctx.subscribe();
            assert_eq!(ctx.subscriber_count(), 2);
        }
        assert_eq!(ctx.subscriber_count(), 1);
        drop(a);
        assert_eq!(ctx.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn subscription_ends_with_context() {
        let ctx = SessionContext::new(Arc::new(FakeProvider {
            fail_sign_out: false,
        }));
        let mut sub = ctx.subscribe();
        drop(ctx);
        assert_eq!(sub.changed().await, None);
    }
}
