//! Transfer state machine
//!
//! A transfer walks through five states inside one database transaction:
//!
//! ```text
//! FundedSource --debit--> DebitedSource --lock_destination--> LockedDestination
//!     --credit--> Credited --record--> TransferRecord
//! ```
//!
//! Each state is produced only by the previous step, so a debit cannot be
//! issued without the source row lock and the sufficiency check, and a record
//! cannot be written before both balances moved. The caller owns the
//! transaction and decides between commit and rollback.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgConnection;

use crate::domain::{AccountId, Amount, Balance, TransactionIdGenerator, TransferRecord, TransferStatus};

use super::LedgerError;

/// A validated transfer request: two account ids and a positive amount.
///
/// Source and destination may be the same account. That transfer locks the
/// row once, moves nothing net and still writes a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOrder {
    source: AccountId,
    destination: AccountId,
    amount: Amount,
}

impl TransferOrder {
    pub fn new(source: AccountId, destination: AccountId, amount: Amount) -> Self {
        Self {
            source,
            destination,
            amount,
        }
    }

    pub fn source(&self) -> &AccountId {
        &self.source
    }

    pub fn destination(&self) -> &AccountId {
        &self.destination
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

/// Step 1 result: source row is locked and covers the amount
#[derive(Debug)]
pub(super) struct FundedSource<'a> {
    order: &'a TransferOrder,
    balance: Balance,
}

/// Step 2 result: source row carries the debit (uncommitted)
#[derive(Debug)]
pub(super) struct DebitedSource<'a> {
    order: &'a TransferOrder,
    source_balance: Balance,
}

/// Step 3 result: destination row is locked as well
#[derive(Debug)]
pub(super) struct LockedDestination<'a> {
    order: &'a TransferOrder,
    source_balance: Balance,
    balance: Balance,
}

/// Step 4 result: both balances moved
#[derive(Debug)]
pub(super) struct Credited<'a> {
    order: &'a TransferOrder,
}

/// Run steps 1 to 5 on `conn`, which must be inside an open transaction.
pub(super) async fn execute(
    conn: &mut PgConnection,
    order: &TransferOrder,
    ids: &TransactionIdGenerator,
) -> Result<TransferRecord, LedgerError> {
    let funded = FundedSource::lock(conn, order).await?;
    let debited = funded.debit(conn).await?;
    let destination = debited.lock_destination(conn).await?;
    let credited = destination.credit(conn).await?;
    credited.record(conn, ids).await
}

/// `SELECT ... FOR UPDATE` on one account row
async fn lock_account(
    conn: &mut PgConnection,
    account_id: &AccountId,
) -> Result<Option<Balance>, sqlx::Error> {
    let balance: Option<Decimal> = sqlx::query_scalar(
        r#"
        SELECT balance FROM account
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(account_id.as_str())
    .fetch_optional(&mut *conn)
    .await?;

    Ok(balance.map(Balance::new))
}

/// Apply a signed delta to a locked row and return the new balance
async fn apply_delta(
    conn: &mut PgConnection,
    account_id: &AccountId,
    delta: Decimal,
) -> Result<Balance, sqlx::Error> {
    let balance: Decimal = sqlx::query_scalar(
        r#"
        UPDATE account
        SET balance = balance + $2
        WHERE id = $1
        RETURNING balance
        "#,
    )
    .bind(account_id.as_str())
    .bind(delta)
    .fetch_one(&mut *conn)
    .await?;

    Ok(Balance::new(balance))
}

impl<'a> FundedSource<'a> {
    async fn lock(conn: &mut PgConnection, order: &'a TransferOrder) -> Result<Self, LedgerError> {
        let balance = lock_account(conn, &order.source).await?;

        match balance {
            Some(balance) if balance.covers(&order.amount) => {
                tracing::debug!(source = %order.source, balance = %balance, "Source locked");
                Ok(Self { order, balance })
            }
            Some(balance) => {
                tracing::debug!(
                    source = %order.source,
                    balance = %balance,
                    amount = %order.amount,
                    "Source balance does not cover amount"
                );
                Err(LedgerError::InsufficientFundsOrUnknownSource(
                    order.source.to_string(),
                ))
            }
            None => Err(LedgerError::InsufficientFundsOrUnknownSource(
                order.source.to_string(),
            )),
        }
    }

    async fn debit(self, conn: &mut PgConnection) -> Result<DebitedSource<'a>, LedgerError> {
        let source_balance =
            apply_delta(conn, &self.order.source, -self.order.amount.value()).await?;

        debug_assert_eq!(source_balance, self.balance.debited(&self.order.amount));

        Ok(DebitedSource {
            order: self.order,
            source_balance,
        })
    }
}

impl<'a> DebitedSource<'a> {
    async fn lock_destination(
        self,
        conn: &mut PgConnection,
    ) -> Result<LockedDestination<'a>, LedgerError> {
        let balance = lock_account(conn, &self.order.destination)
            .await?
            .ok_or_else(|| LedgerError::DestinationNotFound(self.order.destination.to_string()))?;

        Ok(LockedDestination {
            order: self.order,
            source_balance: self.source_balance,
            balance,
        })
    }
}

impl<'a> LockedDestination<'a> {
    async fn credit(self, conn: &mut PgConnection) -> Result<Credited<'a>, LedgerError> {
        let destination_balance =
            apply_delta(conn, &self.order.destination, self.order.amount.value()).await?;

        debug_assert_eq!(destination_balance, self.balance.credited(&self.order.amount));

        tracing::debug!(
            source = %self.order.source,
            source_balance = %self.source_balance,
            destination = %self.order.destination,
            destination_balance = %destination_balance,
            "Balances staged"
        );

        Ok(Credited { order: self.order })
    }
}

impl<'a> Credited<'a> {
    async fn record(
        self,
        conn: &mut PgConnection,
        ids: &TransactionIdGenerator,
    ) -> Result<TransferRecord, LedgerError> {
        let transaction_id = ids.next_id();
        let status = TransferStatus::Confirmed;

        let created_at: DateTime<Utc> = sqlx::query_scalar(
            r#"
            INSERT INTO transfer_record (
                transaction_id, source_account_id, destination_account_id,
                amount, created_at, status
            )
            VALUES ($1, $2, $3, $4, clock_timestamp(), $5)
            RETURNING created_at
            "#,
        )
        .bind(&transaction_id)
        .bind(self.order.source.as_str())
        .bind(self.order.destination.as_str())
        .bind(self.order.amount.value())
        .bind(status.as_str())
        .fetch_one(&mut *conn)
        .await?;

        Ok(TransferRecord {
            transaction_id,
            source_account_id: self.order.source.clone(),
            destination_account_id: self.order.destination.clone(),
            amount: self.order.amount,
            created_at,
            status,
        })
    }
}
