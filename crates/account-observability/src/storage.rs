use async_trait::async_trait;
use tracing::{field, Instrument};

use account_core::{AccountError, SeedData, User};
use account_ports::{DynStorage, Storage};

use crate::telemetry::annotate_span_with_trace_ids;

/// A thin wrapper around a `DynStorage` that creates a tracing span for each storage call.
///
/// This lets request spans (created by actix middleware) extend naturally through
/// actors/handlers down into persistence calls.
pub struct ObservedStorage {
    inner: DynStorage,
    db_system: String,
}

impl ObservedStorage {
    pub fn new(inner: DynStorage, db_system: String) -> Self {
        Self { inner, db_system }
    }

    fn span(&self, operation: &'static str) -> tracing::Span {
        let span = tracing::info_span!(
            "db",
            trace_id = field::Empty,
            span_id = field::Empty,
            db_system = %self.db_system,
            db_operation = operation
        );
        annotate_span_with_trace_ids(&span);
        span
    }
}

#[async_trait]
impl Storage for ObservedStorage {
    async fn init(&self) -> Result<(), AccountError> {
        let span = self.span("init");
        async move { self.inner.init().await }
            .instrument(span)
            .await
    }

    async fn reset(&self) -> Result<(), AccountError> {
        let span = self.span("reset");
        async move { self.inner.reset().await }
            .instrument(span)
            .await
    }

    async fn save_user(&self, user: &User) -> Result<(), AccountError> {
        let span = tracing::info_span!(
            "db",
            trace_id = field::Empty,
            span_id = field::Empty,
            db_system = %self.db_system,
            db_operation = "save_user",
            user_id = %user.id,
            username = %user.username
        );
        annotate_span_with_trace_ids(&span);
        async move { self.inner.save_user(user).await }
            .instrument(span)
            .await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AccountError> {
        let span = tracing::info_span!(
            "db",
            trace_id = field::Empty,
            span_id = field::Empty,
            db_system = %self.db_system,
            db_operation = "get_user_by_username",
            username = %username
        );
        annotate_span_with_trace_ids(&span);
        async move { self.inner.get_user_by_username(username).await }
            .instrument(span)
            .await
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, AccountError> {
        let span = tracing::info_span!(
            "db",
            trace_id = field::Empty,
            span_id = field::Empty,
            db_system = %self.db_system,
            db_operation = "get_user_by_id",
            user_id = %id
        );
        annotate_span_with_trace_ids(&span);
        async move { self.inner.get_user_by_id(id).await }
            .instrument(span)
            .await
    }

    async fn drop_and_seed(&self, seed: &SeedData) -> Result<(), AccountError> {
        let span = tracing::info_span!(
            "db",
            trace_id = field::Empty,
            span_id = field::Empty,
            db_system = %self.db_system,
            db_operation = "drop_and_seed",
            seed_users = seed.users.len()
        );
        annotate_span_with_trace_ids(&span);
        async move {
            self.inner.drop_and_seed(seed).await?;
            tracing::info!("database dropped and seeded");
            Ok::<(), AccountError>(())
        }
        .instrument(span)
        .await
    }

    async fn healthcheck(&self) -> Result<(), AccountError> {
        let span = self.span("healthcheck");
        async move { self.inner.healthcheck().await }
            .instrument(span)
            .await
    }
}
