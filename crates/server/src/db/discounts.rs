//! Discount configuration repository.
//!
//! One method per store primitive. Multi-statement mutations run inside a
//! transaction; the product-union primitive is a single
//! `INSERT ... ON CONFLICT DO NOTHING` statement so concurrent unions on the
//! same group are both reflected rather than last-write-wins.
//!
//! Queries use the runtime-checked sqlx API so the crate builds without a
//! live database.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use seagrape_core::{FeaturedImage, GroupId, Percentage, ProductRef, ShopDomain};

use super::RepositoryError;
use crate::models::{DiscountConfiguration, DiscountGroup};

/// Repository for discount configuration storage.
pub struct DiscountRepository<'a> {
    pool: &'a PgPool,
}

#[derive(sqlx::FromRow)]
struct ConfigRow {
    shop_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct GroupRow {
    id: Uuid,
    name: String,
    percentage: f64,
}

#[derive(sqlx::FromRow)]
struct GroupProductRow {
    group_id: Uuid,
    product_id: String,
    title: String,
    description: Option<String>,
    image_url: Option<String>,
    image_alt: Option<String>,
}

#[derive(sqlx::FromRow)]
struct ExcludedProductRow {
    product_id: String,
    title: String,
    description: Option<String>,
    image_url: Option<String>,
    image_alt: Option<String>,
}

fn product_ref(
    product_id: String,
    title: String,
    description: Option<String>,
    image_url: Option<String>,
    image_alt: Option<String>,
) -> ProductRef {
    let featured_image = if image_url.is_some() || image_alt.is_some() {
        Some(FeaturedImage {
            url: image_url,
            alt_text: image_alt,
        })
    } else {
        None
    };

    ProductRef {
        product_id,
        title,
        description,
        featured_image,
    }
}

/// Map a unique-index violation to a `Conflict` with the invariant it
/// protects; pass every other error through.
fn map_constraint(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        let message = match db_err.constraint() {
            Some("discount_group_shop_name_key") => "Group names must be unique",
            Some("group_product_pkey") => "Product IDs must be unique within a group",
            Some("excluded_product_pkey") => "Product IDs must be unique in excluded products",
            _ => "Unique constraint violated",
        };
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}

impl<'a> DiscountRepository<'a> {
    /// Create a new discount repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch a shop's configuration. `None` if the shop has never stored
    /// one. No side effects.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `RepositoryError::DataCorruption` if stored values no longer satisfy
    /// the domain types.
    pub async fn get(
        &self,
        shop: &ShopDomain,
    ) -> Result<Option<DiscountConfiguration>, RepositoryError> {
        let config: Option<ConfigRow> = sqlx::query_as(
            "SELECT shop_id, created_at, updated_at
             FROM discount_configuration
             WHERE shop_id = $1",
        )
        .bind(shop.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(config) = config else {
            return Ok(None);
        };

        let group_rows: Vec<GroupRow> = sqlx::query_as(
            "SELECT id, name, percentage
             FROM discount_group
             WHERE shop_id = $1
             ORDER BY ord",
        )
        .bind(shop.as_str())
        .fetch_all(self.pool)
        .await?;

        let product_rows: Vec<GroupProductRow> = sqlx::query_as(
            "SELECT gp.group_id, gp.product_id, gp.title, gp.description,
                    gp.image_url, gp.image_alt
             FROM group_product gp
             JOIN discount_group g ON g.id = gp.group_id
             WHERE g.shop_id = $1
             ORDER BY gp.ord",
        )
        .bind(shop.as_str())
        .fetch_all(self.pool)
        .await?;

        let excluded_rows: Vec<ExcludedProductRow> = sqlx::query_as(
            "SELECT product_id, title, description, image_url, image_alt
             FROM excluded_product
             WHERE shop_id = $1
             ORDER BY ord",
        )
        .bind(shop.as_str())
        .fetch_all(self.pool)
        .await?;

        let mut products_by_group: HashMap<Uuid, Vec<ProductRef>> = HashMap::new();
        for row in product_rows {
            products_by_group.entry(row.group_id).or_default().push(product_ref(
                row.product_id,
                row.title,
                row.description,
                row.image_url,
                row.image_alt,
            ));
        }

        let groups = group_rows
            .into_iter()
            .map(|row| {
                let percentage = Percentage::new(row.percentage).map_err(|e| {
                    RepositoryError::DataCorruption(format!(
                        "invalid percentage in database: {e}"
                    ))
                })?;

                Ok(DiscountGroup {
                    id: GroupId::from_uuid(row.id),
                    discounted_products: products_by_group.remove(&row.id).unwrap_or_default(),
                    name: row.name,
                    percentage,
                })
            })
            .collect::<Result<Vec<_>, RepositoryError>>()?;

        let excluded_products = excluded_rows
            .into_iter()
            .map(|row| {
                product_ref(
                    row.product_id,
                    row.title,
                    row.description,
                    row.image_url,
                    row.image_alt,
                )
            })
            .collect();

        let shop_id = ShopDomain::parse(&config.shop_id).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid shop id in database: {e}"))
        })?;

        Ok(Some(DiscountConfiguration {
            shop_id,
            groups,
            excluded_products,
            created_at: Some(config.created_at),
            updated_at: Some(config.updated_at),
        }))
    }

    /// Replace the shop's groups wholesale (and the excluded set, when
    /// supplied), creating the configuration if absent.
    ///
    /// The whole replace commits or none of it does; a uniqueness violation
    /// surfaces as `Conflict` and leaves prior state untouched.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` on a constraint violation, `Database` otherwise.
    pub async fn upsert_replace(
        &self,
        shop: &ShopDomain,
        groups: &[DiscountGroup],
        excluded_products: Option<&[ProductRef]>,
    ) -> Result<DiscountConfiguration, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO discount_configuration (shop_id)
             VALUES ($1)
             ON CONFLICT (shop_id) DO UPDATE SET updated_at = now()",
        )
        .bind(shop.as_str())
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM discount_group WHERE shop_id = $1")
            .bind(shop.as_str())
            .execute(&mut *tx)
            .await?;

        for group in groups {
            sqlx::query(
                "INSERT INTO discount_group (id, shop_id, name, percentage)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(group.id.as_uuid())
            .bind(shop.as_str())
            .bind(&group.name)
            .bind(group.percentage.value())
            .execute(&mut *tx)
            .await
            .map_err(map_constraint)?;

            for product in &group.discounted_products {
                sqlx::query(
                    "INSERT INTO group_product
                         (group_id, product_id, title, description, image_url, image_alt)
                     VALUES ($1, $2, $3, $4, $5, $6)",
                )
                .bind(group.id.as_uuid())
                .bind(&product.product_id)
                .bind(&product.title)
                .bind(product.description.as_deref())
                .bind(product.featured_image.as_ref().and_then(|i| i.url.as_deref()))
                .bind(
                    product
                        .featured_image
                        .as_ref()
                        .and_then(|i| i.alt_text.as_deref()),
                )
                .execute(&mut *tx)
                .await
                .map_err(map_constraint)?;
            }
        }

        if let Some(excluded) = excluded_products {
            sqlx::query("DELETE FROM excluded_product WHERE shop_id = $1")
                .bind(shop.as_str())
                .execute(&mut *tx)
                .await?;

            for product in excluded {
                sqlx::query(
                    "INSERT INTO excluded_product
                         (shop_id, product_id, title, description, image_url, image_alt)
                     VALUES ($1, $2, $3, $4, $5, $6)",
                )
                .bind(shop.as_str())
                .bind(&product.product_id)
                .bind(&product.title)
                .bind(product.description.as_deref())
                .bind(product.featured_image.as_ref().and_then(|i| i.url.as_deref()))
                .bind(
                    product
                        .featured_image
                        .as_ref()
                        .and_then(|i| i.alt_text.as_deref()),
                )
                .execute(&mut *tx)
                .await
                .map_err(map_constraint)?;
            }
        }

        tx.commit().await?;

        self.get(shop).await?.ok_or_else(|| {
            RepositoryError::DataCorruption("configuration missing after upsert".to_owned())
        })
    }

    /// Remove one group by id, cascading its product list.
    ///
    /// Removing an unknown group id from an existing configuration is a
    /// successful no-op; `None` means the configuration itself does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn remove_group(
        &self,
        shop: &ShopDomain,
        group_id: GroupId,
    ) -> Result<Option<DiscountConfiguration>, RepositoryError> {
        if !self.exists(shop).await? {
            return Ok(None);
        }

        sqlx::query("DELETE FROM discount_group WHERE shop_id = $1 AND id = $2")
            .bind(shop.as_str())
            .bind(group_id.as_uuid())
            .execute(self.pool)
            .await?;

        self.touch(shop).await?;
        self.get(shop).await
    }

    /// Replace the shop's excluded set wholesale, creating the
    /// configuration if absent. Replaying the same list is idempotent.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` on a constraint violation, `Database` otherwise.
    pub async fn replace_excluded_products(
        &self,
        shop: &ShopDomain,
        products: &[ProductRef],
    ) -> Result<DiscountConfiguration, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO discount_configuration (shop_id)
             VALUES ($1)
             ON CONFLICT (shop_id) DO UPDATE SET updated_at = now()",
        )
        .bind(shop.as_str())
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM excluded_product WHERE shop_id = $1")
            .bind(shop.as_str())
            .execute(&mut *tx)
            .await?;

        for product in products {
            sqlx::query(
                "INSERT INTO excluded_product
                     (shop_id, product_id, title, description, image_url, image_alt)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(shop.as_str())
            .bind(&product.product_id)
            .bind(&product.title)
            .bind(product.description.as_deref())
            .bind(product.featured_image.as_ref().and_then(|i| i.url.as_deref()))
            .bind(
                product
                    .featured_image
                    .as_ref()
                    .and_then(|i| i.alt_text.as_deref()),
            )
            .execute(&mut *tx)
            .await
            .map_err(map_constraint)?;
        }

        tx.commit().await?;

        self.get(shop).await?.ok_or_else(|| {
            RepositoryError::DataCorruption("configuration missing after replace".to_owned())
        })
    }

    /// Remove one excluded product by reference. No-op if absent; `None` if
    /// the configuration does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn remove_excluded_product(
        &self,
        shop: &ShopDomain,
        product_id: &str,
    ) -> Result<Option<DiscountConfiguration>, RepositoryError> {
        if !self.exists(shop).await? {
            return Ok(None);
        }

        sqlx::query("DELETE FROM excluded_product WHERE shop_id = $1 AND product_id = $2")
            .bind(shop.as_str())
            .bind(product_id)
            .execute(self.pool)
            .await?;

        self.touch(shop).await?;
        self.get(shop).await
    }

    /// Union products into a group's list, de-duplicating by product id
    /// against the stored list.
    ///
    /// A single `ON CONFLICT DO NOTHING` insert keeps concurrent unions on
    /// the same group additive instead of lost-update-prone. `None` if the
    /// shop or group does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn add_products_to_group(
        &self,
        shop: &ShopDomain,
        group_id: GroupId,
        products: &[ProductRef],
    ) -> Result<Option<DiscountConfiguration>, RepositoryError> {
        if !self.group_exists(shop, group_id).await? {
            return Ok(None);
        }

        let product_ids: Vec<String> = products.iter().map(|p| p.product_id.clone()).collect();
        let titles: Vec<String> = products.iter().map(|p| p.title.clone()).collect();
        let descriptions: Vec<Option<String>> =
            products.iter().map(|p| p.description.clone()).collect();
        let image_urls: Vec<Option<String>> = products
            .iter()
            .map(|p| p.featured_image.as_ref().and_then(|i| i.url.clone()))
            .collect();
        let image_alts: Vec<Option<String>> = products
            .iter()
            .map(|p| p.featured_image.as_ref().and_then(|i| i.alt_text.clone()))
            .collect();

        sqlx::query(
            "INSERT INTO group_product
                 (group_id, product_id, title, description, image_url, image_alt)
             SELECT $1, u.product_id, u.title, u.description, u.image_url, u.image_alt
             FROM UNNEST($2::text[], $3::text[], $4::text[], $5::text[], $6::text[])
                 AS u (product_id, title, description, image_url, image_alt)
             ON CONFLICT (group_id, product_id) DO NOTHING",
        )
        .bind(group_id.as_uuid())
        .bind(&product_ids)
        .bind(&titles)
        .bind(&descriptions)
        .bind(&image_urls)
        .bind(&image_alts)
        .execute(self.pool)
        .await?;

        self.touch(shop).await?;
        self.get(shop).await
    }

    /// Remove one product from one group's list. No-op if absent; `None` if
    /// the shop or group does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn remove_product_from_group(
        &self,
        shop: &ShopDomain,
        group_id: GroupId,
        product_id: &str,
    ) -> Result<Option<DiscountConfiguration>, RepositoryError> {
        if !self.group_exists(shop, group_id).await? {
            return Ok(None);
        }

        sqlx::query("DELETE FROM group_product WHERE group_id = $1 AND product_id = $2")
            .bind(group_id.as_uuid())
            .bind(product_id)
            .execute(self.pool)
            .await?;

        self.touch(shop).await?;
        self.get(shop).await
    }

    async fn exists(&self, shop: &ShopDomain) -> Result<bool, RepositoryError> {
        let row: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM discount_configuration WHERE shop_id = $1")
                .bind(shop.as_str())
                .fetch_optional(self.pool)
                .await?;
        Ok(row.is_some())
    }

    async fn group_exists(
        &self,
        shop: &ShopDomain,
        group_id: GroupId,
    ) -> Result<bool, RepositoryError> {
        let row: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM discount_group WHERE shop_id = $1 AND id = $2")
                .bind(shop.as_str())
                .bind(group_id.as_uuid())
                .fetch_optional(self.pool)
                .await?;
        Ok(row.is_some())
    }

    async fn touch(&self, shop: &ShopDomain) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE discount_configuration SET updated_at = now() WHERE shop_id = $1")
            .bind(shop.as_str())
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
