//! Auth middleware.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::error;

use titan_app::{auth::AuthServiceError, domain::users::records::UserUuid};

use crate::{extensions::*, state::State};

/// Require a valid bearer session and record its user in the depot.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_bearer_token(req) else {
        res.render(StatusError::unauthorized().brief("Missing or invalid Authorization header"));

        return;
    };

    match authenticate(depot, token).await {
        Ok(Some(user)) => {
            depot.insert_user_uuid(user);

            ctrl.call_next(req, depot, res).await;
        }
        Ok(None) => {
            res.render(StatusError::unauthorized().brief("Invalid session token"));
        }
        Err(status) => res.render(status),
    }
}

/// Record the session user when a valid bearer token is present, and carry on
/// anonymously otherwise. Handlers decide what an anonymous caller may do.
#[salvo::handler]
pub(crate) async fn optional(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if let Some(token) = extract_bearer_token(req) {
        match authenticate(depot, token).await {
            Ok(Some(user)) => depot.insert_user_uuid(user),
            Ok(None) => {}
            Err(status) => {
                res.render(status);

                return;
            }
        }
    }

    ctrl.call_next(req, depot, res).await;
}

/// `Ok(None)` when the token does not belong to a live session.
async fn authenticate(depot: &Depot, token: &str) -> Result<Option<UserUuid>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    match state.app.auth.authenticate_bearer(token).await {
        Ok(user) => Ok(Some(user)),
        Err(AuthServiceError::NotFound | AuthServiceError::UnknownUser) => Ok(None),
        Err(AuthServiceError::Sql(source)) => {
            error!("failed to validate session token: {source}");

            Err(StatusError::internal_server_error())
        }
        Err(AuthServiceError::Token(source)) => {
            error!("failed to process session token: {source}");

            Err(StatusError::internal_server_error())
        }
    }
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}
