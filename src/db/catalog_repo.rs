// src/db/catalog_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::catalog::{Product, Store, Warehouse},
};

// O repositório do catálogo: lojas, armazéns e produtos.
// Cada operação é uma chamada independente: nenhuma invariante entre
// entidades é garantida aqui (apagar uma loja não apaga seus produtos).
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Lojas
    // ---

    pub async fn list_stores(&self, user_id: Uuid) -> Result<Vec<Store>, AppError> {
        sqlx::query_as::<_, Store>(
            "SELECT * FROM stores WHERE user_id = $1 ORDER BY name ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::LookupError)
    }

    /// Verifica se a loja pertence ao usuário. É a checagem de autorização
    /// usada por todas as rotas escopadas por X-Store-ID.
    pub async fn check_store_owner(&self, store_id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM stores WHERE id = $1 AND user_id = $2)",
        )
        .bind(store_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::LookupError)
    }

    pub async fn create_store(
        &self,
        user_id: Uuid,
        name: &str,
        marketplace: Option<&str>,
        description: Option<&str>,
    ) -> Result<Store, AppError> {
        sqlx::query_as::<_, Store>(
            r#"
            INSERT INTO stores (user_id, name, marketplace, description)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(marketplace)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::PersistenceError)
    }

    pub async fn update_store(
        &self,
        store_id: Uuid,
        user_id: Uuid,
        name: &str,
        marketplace: Option<&str>,
        description: Option<&str>,
    ) -> Result<Store, AppError> {
        sqlx::query_as::<_, Store>(
            r#"
            UPDATE stores
            SET name = $3, marketplace = $4, description = $5, updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(store_id)
        .bind(user_id)
        .bind(name)
        .bind(marketplace)
        .bind(description)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::PersistenceError)?
        .ok_or_else(|| AppError::ResourceNotFound("Loja".to_string()))
    }

    pub async fn delete_store(&self, store_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM stores WHERE id = $1 AND user_id = $2")
            .bind(store_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::PersistenceError)?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Loja".to_string()));
        }
        Ok(())
    }

    // ---
    // Armazéns
    // ---

    pub async fn list_warehouses(&self, user_id: Uuid) -> Result<Vec<Warehouse>, AppError> {
        sqlx::query_as::<_, Warehouse>(
            "SELECT * FROM warehouses WHERE user_id = $1 ORDER BY name ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::LookupError)
    }

    pub async fn create_warehouse(
        &self,
        user_id: Uuid,
        name: &str,
        location: Option<&str>,
    ) -> Result<Warehouse, AppError> {
        sqlx::query_as::<_, Warehouse>(
            r#"
            INSERT INTO warehouses (user_id, name, location)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(location)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::PersistenceError)
    }

    pub async fn update_warehouse(
        &self,
        warehouse_id: Uuid,
        user_id: Uuid,
        name: &str,
        location: Option<&str>,
    ) -> Result<Warehouse, AppError> {
        sqlx::query_as::<_, Warehouse>(
            r#"
            UPDATE warehouses
            SET name = $3, location = $4, updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(warehouse_id)
        .bind(user_id)
        .bind(name)
        .bind(location)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::PersistenceError)?
        .ok_or_else(|| AppError::ResourceNotFound("Armazém".to_string()))
    }

    pub async fn delete_warehouse(&self, warehouse_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM warehouses WHERE id = $1 AND user_id = $2")
            .bind(warehouse_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::PersistenceError)?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Armazém".to_string()));
        }
        Ok(())
    }

    // ---
    // Produtos
    // ---

    pub async fn list_products(&self, store_id: Uuid) -> Result<Vec<Product>, AppError> {
        sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE store_id = $1 ORDER BY name ASC",
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::LookupError)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_product(
        &self,
        store_id: Uuid,
        warehouse_id: Option<Uuid>,
        sku: &str,
        name: &str,
        price: Decimal,
        stock_quantity: Decimal,
        listing_code: Option<&str>,
    ) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (store_id, warehouse_id, sku, name, price, stock_quantity, listing_code)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(store_id)
        .bind(warehouse_id)
        .bind(sku)
        .bind(name)
        .bind(price)
        .bind(stock_quantity)
        .bind(listing_code)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::SkuAlreadyExists;
                }
            }
            AppError::PersistenceError(e)
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_product(
        &self,
        product_id: Uuid,
        store_id: Uuid,
        warehouse_id: Option<Uuid>,
        sku: &str,
        name: &str,
        price: Decimal,
        stock_quantity: Decimal,
        listing_code: Option<&str>,
    ) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET warehouse_id = $3, sku = $4, name = $5, price = $6,
                stock_quantity = $7, listing_code = $8, updated_at = now()
            WHERE id = $1 AND store_id = $2
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(store_id)
        .bind(warehouse_id)
        .bind(sku)
        .bind(name)
        .bind(price)
        .bind(stock_quantity)
        .bind(listing_code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::SkuAlreadyExists;
                }
            }
            AppError::PersistenceError(e)
        })?
        .ok_or_else(|| AppError::ResourceNotFound("Produto".to_string()))
    }

    pub async fn delete_product(&self, product_id: Uuid, store_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1 AND store_id = $2")
            .bind(product_id)
            .bind(store_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::PersistenceError)?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Produto".to_string()));
        }
        Ok(())
    }
}
