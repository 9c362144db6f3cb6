use clap::Args;
use titan_app::{auth::PgAuthRepository, database, domain::users::records::UserUuid};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct ListSessionsArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// User whose sessions should be listed
    #[arg(long)]
    user_uuid: Uuid,
}

pub(crate) async fn run(args: ListSessionsArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let sessions = PgAuthRepository::new(pool)
        .list_sessions_by_user(UserUuid::from_uuid(args.user_uuid))
        .await
        .map_err(|error| format!("failed to list sessions: {error}"))?;

    if sessions.is_empty() {
        println!("no sessions found for user {}", args.user_uuid);
        return Ok(());
    }

    let describe = |value: Option<jiff::Timestamp>, fallback: &str| {
        value.map_or_else(|| fallback.to_string(), |value| value.to_string())
    };

    for session in sessions {
        println!("session_uuid: {}", session.uuid);
        println!("version: {}", session.version.segment());
        println!("created_at: {}", session.created_at);
        println!("last_used_at: {}", describe(session.last_used_at, "never"));
        println!("expires_at: {}", describe(session.expires_at, "none"));
        println!("revoked_at: {}", describe(session.revoked_at, "active"));
        println!();
    }

    Ok(())
}
