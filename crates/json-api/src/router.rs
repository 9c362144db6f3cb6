//! App Router

use salvo::Router;

use crate::{account, admin, auth, checkout, orders, products};

pub fn app_router() -> Router {
    Router::new()
        .push(
            Router::with_path("auth")
                .push(Router::with_path("register").post(account::register::handler))
                .push(Router::with_path("login").post(account::login::handler))
                .push(
                    Router::with_path("forgot-password").post(account::forgot_password::handler),
                )
                .push(
                    Router::with_path("verify-reset-code")
                        .post(account::verify_reset_code::handler),
                )
                .push(Router::with_path("reset-password").post(account::reset_password::handler))
                .push(
                    Router::new()
                        .hoop(auth::middleware::handler)
                        .push(
                            Router::with_path("send-verification")
                                .post(account::send_verification::handler),
                        )
                        .push(
                            Router::with_path("verify-email").post(account::verify_email::handler),
                        ),
                ),
        )
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(Router::with_path("{product}").get(products::get::handler)),
        )
        .push(Router::with_path("categories").get(products::categories::handler))
        .push(
            Router::with_path("checkout")
                .hoop(auth::middleware::optional)
                .post(checkout::create::handler),
        )
        .push(
            Router::with_path("orders")
                .hoop(auth::middleware::handler)
                .get(orders::index::handler)
                .push(Router::with_path("{order}").get(orders::get::handler)),
        )
        .push(
            Router::with_path("admin")
                .hoop(auth::middleware::handler)
                .hoop(auth::admin::handler)
                .push(Router::with_path("stats").get(admin::stats::handler))
                .push(
                    Router::with_path("products")
                        .get(admin::products::index::handler)
                        .post(admin::products::create::handler)
                        .push(
                            Router::with_path("{product}")
                                .put(admin::products::update::handler)
                                .delete(admin::products::archive::handler)
                                .push(
                                    Router::with_path("restore")
                                        .post(admin::products::restore::handler),
                                ),
                        ),
                ),
        )
}
