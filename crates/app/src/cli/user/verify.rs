use clap::Args;
use titan_app::{
    database,
    domain::users::{UsersService, records::UserUuid},
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct VerifyUserArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// User whose email should be marked verified
    #[arg(long)]
    user_uuid: Uuid,
}

pub(crate) async fn run(args: VerifyUserArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = super::users_service(pool);

    let user = service
        .mark_email_verified(UserUuid::from_uuid(args.user_uuid))
        .await
        .map_err(|error| format!("failed to verify user: {error}"))?;

    println!("verified email {} for user {}", user.email, user.uuid);

    Ok(())
}
