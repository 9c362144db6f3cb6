//! Admin guard.

use std::sync::Arc;

use salvo::prelude::*;

use crate::{extensions::*, state::State};

/// Only let admins through. Must run after [`super::middleware::handler`].
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    match require_admin(depot).await {
        Ok(()) => {
            ctrl.call_next(req, depot, res).await;
        }
        Err(status) => res.render(status),
    }
}

async fn require_admin(depot: &Depot) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let identity = state
        .app
        .users
        .identify(user)
        .await
        .or_500("failed to load caller identity")?
        .ok_or_else(|| StatusError::unauthorized().brief("Unknown user"))?;

    if !identity.is_admin {
        return Err(StatusError::forbidden().brief("Admin access required"));
    }

    Ok(())
}
