use std::sync::Arc;

use clap::{Args, Subcommand};
use sqlx::PgPool;
use titan_app::{
    database::Db,
    domain::users::PgUsersService,
    notifications::{LogMailer, MailerConfig},
};

mod create;
mod verify;

#[derive(Debug, Args)]
pub(crate) struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Debug, Subcommand)]
enum UserSubcommand {
    Create(create::CreateUserArgs),
    Verify(verify::VerifyUserArgs),
}

pub(crate) async fn run(command: UserCommand) -> Result<(), String> {
    match command.command {
        UserSubcommand::Create(args) => create::run(args).await,
        UserSubcommand::Verify(args) => verify::run(args).await,
    }
}

/// Administrative commands never email users, so account mail is only logged.
fn users_service(pool: PgPool) -> PgUsersService {
    let mail = MailerConfig::default().account_mailer(Arc::new(LogMailer));

    PgUsersService::new(Db::new(pool), mail)
}
