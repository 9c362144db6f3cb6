//! Users Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use jiff::Timestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::users::{
    codes::OneTimeCode,
    data::NewUser,
    records::{AccountRecord, UserRecord, UserUuid},
};

const CREATE_USER_SQL: &str = include_str!("sql/create_user.sql");
const GET_USER_SQL: &str = include_str!("sql/get_user.sql");
const MARK_EMAIL_VERIFIED_SQL: &str = include_str!("sql/mark_email_verified.sql");
const GET_ACCOUNT_SQL: &str = include_str!("sql/get_account.sql");
const FIND_ACCOUNT_BY_EMAIL_SQL: &str = include_str!("sql/find_account_by_email.sql");
const SET_VERIFICATION_CODE_SQL: &str = include_str!("sql/set_verification_code.sql");
const SET_RESET_CODE_SQL: &str = include_str!("sql/set_reset_code.sql");
const RESET_PASSWORD_SQL: &str = include_str!("sql/reset_password.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgUsersRepository;

impl PgUsersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: NewUser,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(CREATE_USER_SQL)
            .bind(user.uuid.into_uuid())
            .bind(user.name)
            .bind(user.email)
            .bind(user.email_verified)
            .bind(user.is_admin)
            .bind(user.password_hash)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        query_as::<Postgres, UserRecord>(GET_USER_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn mark_email_verified(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(MARK_EMAIL_VERIFIED_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_account(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<AccountRecord>, sqlx::Error> {
        query_as::<Postgres, AccountRecord>(GET_ACCOUNT_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Email lookup ignores case and surrounding whitespace, like the unique index.
    pub(crate) async fn find_account_by_email(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
    ) -> Result<Option<AccountRecord>, sqlx::Error> {
        query_as::<Postgres, AccountRecord>(FIND_ACCOUNT_BY_EMAIL_SQL)
            .bind(email)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn set_verification_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        code: &OneTimeCode,
    ) -> Result<(), sqlx::Error> {
        query(SET_VERIFICATION_CODE_SQL)
            .bind(user.into_uuid())
            .bind(&code.code)
            .bind(SqlxTimestamp::from(code.expires_at))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn set_reset_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        code: &OneTimeCode,
    ) -> Result<(), sqlx::Error> {
        query(SET_RESET_CODE_SQL)
            .bind(user.into_uuid())
            .bind(&code.code)
            .bind(SqlxTimestamp::from(code.expires_at))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Store a new password hash and retire the reset code that allowed it.
    pub(crate) async fn reset_password(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        password_hash: &str,
    ) -> Result<(), sqlx::Error> {
        query(RESET_PASSWORD_SQL)
            .bind(user.into_uuid())
            .bind(password_hash)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for AccountRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            user: UserRecord::from_row(row)?,
            password_hash: row.try_get("password_hash")?,
            verification: OneTimeCode::from_parts(
                row.try_get("verification_code")?,
                optional_timestamp(row, "verification_expires_at")?,
            ),
            reset: OneTimeCode::from_parts(
                row.try_get("reset_code")?,
                optional_timestamp(row, "reset_code_expires_at")?,
            ),
        })
    }
}

fn optional_timestamp(row: &PgRow, column: &str) -> sqlx::Result<Option<Timestamp>> {
    Ok(row
        .try_get::<Option<SqlxTimestamp>, _>(column)?
        .map(SqlxTimestamp::to_jiff))
}

impl<'r> FromRow<'r, PgRow> for UserRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            email_verified: row.try_get("email_verified")?,
            is_admin: row.try_get("is_admin")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
