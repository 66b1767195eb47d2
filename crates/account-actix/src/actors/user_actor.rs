use account_core::password::verify_password;
use account_core::{AccountError, User};
use account_observability::annotate_span_with_trace_ids;
use account_ports::DynStorage;
use actix::prelude::*;
use tracing::Instrument;

/// Owns user lookups and credential checks for the HTTP layer.
pub struct UserActor {
    db: DynStorage,
}

impl UserActor {
    pub fn new(db: DynStorage) -> Self {
        Self { db }
    }
}

impl Actor for UserActor {
    type Context = Context<Self>;
}

/// Resolves to the user when the password matches, `None` otherwise.
#[derive(Message)]
#[rtype(result = "Result<Option<User>, AccountError>")]
pub struct Authenticate {
    pub username: String,
    pub password: String,
    pub span: tracing::Span,
}

impl Handler<Authenticate> for UserActor {
    type Result = ResponseFuture<Result<Option<User>, AccountError>>;

    fn handle(&mut self, msg: Authenticate, _: &mut Self::Context) -> Self::Result {
        let db = self.db.clone();

        let parent_span = msg.span.clone();
        let actor_span = tracing::info_span!(
            parent: &parent_span,
            "actor.user.authenticate",
            trace_id = tracing::field::Empty,
            span_id = tracing::field::Empty,
            username = %msg.username
        );
        annotate_span_with_trace_ids(&actor_span);

        Box::pin(
            async move {
                let Some(user) = db.get_user_by_username(&msg.username).await? else {
                    tracing::info!("login rejected: unknown user");
                    return Ok(None);
                };

                if !verify_password(&msg.password, &user.password_hash) {
                    tracing::info!(user_id = %user.id, "login rejected: password mismatch");
                    return Ok(None);
                }

                tracing::info!(user_id = %user.id, "login accepted");
                Ok(Some(user))
            }
            .instrument(actor_span),
        )
    }
}

#[derive(Message)]
#[rtype(result = "Result<Option<User>, AccountError>")]
pub struct GetUser {
    pub user_id: String,
    pub span: tracing::Span,
}

impl Handler<GetUser> for UserActor {
    type Result = ResponseFuture<Result<Option<User>, AccountError>>;

    fn handle(&mut self, msg: GetUser, _: &mut Self::Context) -> Self::Result {
        let db = self.db.clone();

        let parent_span = msg.span.clone();
        let actor_span = tracing::info_span!(
            parent: &parent_span,
            "actor.user.get",
            trace_id = tracing::field::Empty,
            span_id = tracing::field::Empty,
            user_id = %msg.user_id
        );
        annotate_span_with_trace_ids(&actor_span);

        Box::pin(async move { db.get_user_by_id(&msg.user_id).await }.instrument(actor_span))
    }
}
