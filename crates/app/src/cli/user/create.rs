use clap::Args;
use titan_app::{
    database,
    domain::users::{UsersService, data::NewUser, password::hash_password, records::UserUuid},
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Display name
    #[arg(long)]
    name: String,

    /// Email address, unique ignoring case
    #[arg(long)]
    email: String,

    /// Mark the email as already verified
    #[arg(long)]
    verified: bool,

    /// Grant access to the admin endpoints
    #[arg(long)]
    admin: bool,

    /// Password for signing in through the API; without one the user can only use issued sessions
    #[arg(long, env = "TITAN_USER_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Optional user UUID; generated when omitted
    #[arg(long)]
    user_uuid: Option<Uuid>,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let password_hash = args
        .password
        .as_deref()
        .map(hash_password)
        .transpose()
        .map_err(|error| format!("failed to hash password: {error}"))?;

    let service = super::users_service(pool);

    let user = service
        .create_user(NewUser {
            uuid: args.user_uuid.map_or_else(UserUuid::new, UserUuid::from_uuid),
            name: args.name,
            email: args.email,
            email_verified: args.verified,
            is_admin: args.admin,
            password_hash,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("user_name: {}", user.name);
    println!("user_email: {}", user.email);
    println!("email_verified: {}", user.email_verified);
    println!("is_admin: {}", user.is_admin);

    Ok(())
}
