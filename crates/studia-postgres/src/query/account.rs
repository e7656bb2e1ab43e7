//! Account repository for authentication and profile management.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::error::PgResult;
use crate::model::{Account, NewAccount, UpdateAccount};
use crate::{PgConnection, schema};

/// Repository for account database operations.
pub trait AccountRepository {
    /// Creates a new account.
    fn create_account(
        &mut self,
        account: NewAccount,
    ) -> impl Future<Output = PgResult<Account>> + Send;

    /// Finds an account by its unique identifier.
    fn find_account_by_id(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Finds an account by email address.
    fn find_account_by_email(
        &mut self,
        email: &str,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Returns whether another account already uses the given email.
    fn email_taken_by_other(
        &mut self,
        email: &str,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<bool>> + Send;

    /// Updates an existing account.
    fn update_account(
        &mut self,
        account_id: Uuid,
        changes: UpdateAccount,
    ) -> impl Future<Output = PgResult<Account>> + Send;

    /// Deletes an account. Owned analyses and chats cascade in the schema.
    fn delete_account(&mut self, account_id: Uuid) -> impl Future<Output = PgResult<()>> + Send;
}

impl AccountRepository for PgConnection {
    async fn create_account(&mut self, account: NewAccount) -> PgResult<Account> {
        use schema::accounts;

        let account = diesel::insert_into(accounts::table)
            .values(&account)
            .returning(Account::as_returning())
            .get_result(self)
            .await?;

        Ok(account)
    }

    async fn find_account_by_id(&mut self, account_id: Uuid) -> PgResult<Option<Account>> {
        use schema::accounts::dsl::*;

        let account = accounts
            .filter(id.eq(account_id))
            .select(Account::as_select())
            .first(self)
            .await
            .optional()?;

        Ok(account)
    }

    async fn find_account_by_email(&mut self, account_email: &str) -> PgResult<Option<Account>> {
        use schema::accounts::dsl::*;

        let account = accounts
            .filter(email.eq(account_email))
            .select(Account::as_select())
            .first(self)
            .await
            .optional()?;

        Ok(account)
    }

    async fn email_taken_by_other(
        &mut self,
        account_email: &str,
        account_id: Uuid,
    ) -> PgResult<bool> {
        use schema::accounts::dsl::*;

        let count: i64 = accounts
            .filter(email.eq(account_email))
            .filter(id.ne(account_id))
            .count()
            .get_result(self)
            .await?;

        Ok(count > 0)
    }

    async fn update_account(
        &mut self,
        account_id: Uuid,
        changes: UpdateAccount,
    ) -> PgResult<Account> {
        use schema::accounts::dsl::*;

        let account = diesel::update(accounts.filter(id.eq(account_id)))
            .set(&changes)
            .returning(Account::as_returning())
            .get_result(self)
            .await?;

        Ok(account)
    }

    async fn delete_account(&mut self, account_id: Uuid) -> PgResult<()> {
        use schema::accounts::dsl::*;

        diesel::delete(accounts.filter(id.eq(account_id)))
            .execute(self)
            .await?;

        Ok(())
    }
}
