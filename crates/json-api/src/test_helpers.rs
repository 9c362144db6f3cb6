//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use titan_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        checkout::MockCheckoutService,
        orders::MockOrdersService,
        products::{
            MockProductsService,
            records::{ProductRecord, ProductUuid},
        },
        users::{MockUsersService, records::UserUuid},
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_user_uuid(TEST_USER_UUID);
    ctrl.call_next(req, depot, res).await;
}

/// Service mocks backing a test [`State`]. Any mock left at its default fails
/// the test when called.
#[derive(Default)]
pub(crate) struct MockServices {
    pub(crate) products: MockProductsService,
    pub(crate) orders: MockOrdersService,
    pub(crate) users: MockUsersService,
    pub(crate) auth: MockAuthService,
    pub(crate) checkout: MockCheckoutService,
}

impl MockServices {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            products: Arc::new(self.products),
            orders: Arc::new(self.orders),
            users: Arc::new(self.users),
            auth: Arc::new(self.auth),
            checkout: Arc::new(self.checkout),
        })
    }
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    MockServices {
        auth,
        ..MockServices::default()
    }
    .into_state()
}

pub(crate) fn state_with_users(users: MockUsersService) -> Arc<State> {
    MockServices {
        users,
        ..MockServices::default()
    }
    .into_state()
}

/// Serve `route` anonymously with the given catalog mock.
pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(
                MockServices {
                    products,
                    ..MockServices::default()
                }
                .into_state(),
            ))
            .push(route),
    )
}

/// Serve `route` as [`TEST_USER_UUID`] with the given catalog mock.
pub(crate) fn admin_products_service(products: MockProductsService, route: Router) -> Service {
    authenticated_service(
        MockServices {
            products,
            ..MockServices::default()
        },
        route,
    )
}

/// Serve `route` anonymously with the given users mock.
pub(crate) fn users_service(users: MockUsersService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_users(users)))
            .push(route),
    )
}

/// Serve `route` as [`TEST_USER_UUID`] with the given users mock.
pub(crate) fn signed_in_users_service(users: MockUsersService, route: Router) -> Service {
    authenticated_service(
        MockServices {
            users,
            ..MockServices::default()
        },
        route,
    )
}

/// Serve `route` as [`TEST_USER_UUID`] with the given orders mock.
pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
    authenticated_service(
        MockServices {
            orders,
            ..MockServices::default()
        },
        route,
    )
}

pub(crate) fn authenticated_service(mocks: MockServices, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(inject_user)
            .push(route),
    )
}

pub(crate) fn make_product(uuid: ProductUuid) -> ProductRecord {
    ProductRecord {
        uuid,
        name: "Titan Whey".to_string(),
        description: "Chocolate whey isolate".to_string(),
        price: 4_999,
        stock: 25,
        category: "protein".to_string(),
        image_url: "https://cdn.example.com/whey.png".to_string(),
        is_active: true,
        featured: false,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
