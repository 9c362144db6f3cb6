//! Account: signup, sign-in, email verification and password reset

mod errors;
mod handlers;

pub(crate) use handlers::*;
