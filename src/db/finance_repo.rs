// src/db/finance_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::finance::{JournalEntry, JournalEntryKind, Sale, Withdrawal},
};

// Vendas, retiradas e o diário contábil. Mesmo contrato do catálogo:
// uma chamada, uma linha, sem transação envolvendo múltiplas escritas.
#[derive(Clone)]
pub struct FinanceRepository {
    pool: PgPool,
}

impl FinanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Vendas
    // ---

    pub async fn list_sales(&self, store_id: Uuid) -> Result<Vec<Sale>, AppError> {
        sqlx::query_as::<_, Sale>(
            "SELECT * FROM sales WHERE store_id = $1 ORDER BY sold_at DESC, created_at DESC",
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::LookupError)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_sale(
        &self,
        store_id: Uuid,
        product_id: Option<Uuid>,
        description: &str,
        quantity: Decimal,
        unit_price: Decimal,
        total_amount: Decimal,
        sold_at: NaiveDate,
    ) -> Result<Sale, AppError> {
        sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (store_id, product_id, description, quantity, unit_price, total_amount, sold_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(store_id)
        .bind(product_id)
        .bind(description)
        .bind(quantity)
        .bind(unit_price)
        .bind(total_amount)
        .bind(sold_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::PersistenceError)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_sale(
        &self,
        sale_id: Uuid,
        store_id: Uuid,
        description: &str,
        quantity: Decimal,
        unit_price: Decimal,
        total_amount: Decimal,
        sold_at: NaiveDate,
    ) -> Result<Sale, AppError> {
        sqlx::query_as::<_, Sale>(
            r#"
            UPDATE sales
            SET description = $3, quantity = $4, unit_price = $5,
                total_amount = $6, sold_at = $7, updated_at = now()
            WHERE id = $1 AND store_id = $2
            RETURNING *
            "#,
        )
        .bind(sale_id)
        .bind(store_id)
        .bind(description)
        .bind(quantity)
        .bind(unit_price)
        .bind(total_amount)
        .bind(sold_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::PersistenceError)?
        .ok_or_else(|| AppError::ResourceNotFound("Venda".to_string()))
    }

    pub async fn delete_sale(&self, sale_id: Uuid, store_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM sales WHERE id = $1 AND store_id = $2")
            .bind(sale_id)
            .bind(store_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::PersistenceError)?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Venda".to_string()));
        }
        Ok(())
    }

    // ---
    // Retiradas
    // ---

    pub async fn list_withdrawals(&self, store_id: Uuid) -> Result<Vec<Withdrawal>, AppError> {
        sqlx::query_as::<_, Withdrawal>(
            "SELECT * FROM withdrawals WHERE store_id = $1 ORDER BY withdrawn_at DESC, created_at DESC",
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::LookupError)
    }

    pub async fn create_withdrawal(
        &self,
        store_id: Uuid,
        amount: Decimal,
        description: Option<&str>,
        withdrawn_at: NaiveDate,
    ) -> Result<Withdrawal, AppError> {
        sqlx::query_as::<_, Withdrawal>(
            r#"
            INSERT INTO withdrawals (store_id, amount, description, withdrawn_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(store_id)
        .bind(amount)
        .bind(description)
        .bind(withdrawn_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::PersistenceError)
    }

    pub async fn update_withdrawal(
        &self,
        withdrawal_id: Uuid,
        store_id: Uuid,
        amount: Decimal,
        description: Option<&str>,
        withdrawn_at: NaiveDate,
    ) -> Result<Withdrawal, AppError> {
        sqlx::query_as::<_, Withdrawal>(
            r#"
            UPDATE withdrawals
            SET amount = $3, description = $4, withdrawn_at = $5, updated_at = now()
            WHERE id = $1 AND store_id = $2
            RETURNING *
            "#,
        )
        .bind(withdrawal_id)
        .bind(store_id)
        .bind(amount)
        .bind(description)
        .bind(withdrawn_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::PersistenceError)?
        .ok_or_else(|| AppError::ResourceNotFound("Retirada".to_string()))
    }

    pub async fn delete_withdrawal(&self, withdrawal_id: Uuid, store_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM withdrawals WHERE id = $1 AND store_id = $2")
            .bind(withdrawal_id)
            .bind(store_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::PersistenceError)?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Retirada".to_string()));
        }
        Ok(())
    }

    // ---
    // Diário contábil
    // ---

    pub async fn list_journal_entries(&self, user_id: Uuid) -> Result<Vec<JournalEntry>, AppError> {
        sqlx::query_as::<_, JournalEntry>(
            "SELECT * FROM journal_entries WHERE user_id = $1 ORDER BY entry_date DESC, created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::LookupError)
    }

    pub async fn create_journal_entry(
        &self,
        user_id: Uuid,
        kind: JournalEntryKind,
        description: &str,
        amount: Decimal,
        entry_date: NaiveDate,
    ) -> Result<JournalEntry, AppError> {
        sqlx::query_as::<_, JournalEntry>(
            r#"
            INSERT INTO journal_entries (user_id, kind, description, amount, entry_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(kind)
        .bind(description)
        .bind(amount)
        .bind(entry_date)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::PersistenceError)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_journal_entry(
        &self,
        entry_id: Uuid,
        user_id: Uuid,
        kind: JournalEntryKind,
        description: &str,
        amount: Decimal,
        entry_date: NaiveDate,
    ) -> Result<JournalEntry, AppError> {
        sqlx::query_as::<_, JournalEntry>(
            r#"
            UPDATE journal_entries
            SET kind = $3, description = $4, amount = $5, entry_date = $6, updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(entry_id)
        .bind(user_id)
        .bind(kind)
        .bind(description)
        .bind(amount)
        .bind(entry_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::PersistenceError)?
        .ok_or_else(|| AppError::ResourceNotFound("Lançamento".to_string()))
    }

    pub async fn delete_journal_entry(&self, entry_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM journal_entries WHERE id = $1 AND user_id = $2")
            .bind(entry_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::PersistenceError)?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Lançamento".to_string()));
        }
        Ok(())
    }
}
