//! Products service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::products::{
        data::{NewProduct, VariantUpdate},
        errors::ProductsServiceError,
        records::{ProductRecord, ProductUuid, VariantRecord, VariantUuid},
        repository::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    #[tracing::instrument(
        name = "products.service.create_product",
        skip(self, product),
        fields(product_uuid = %product.uuid, variant_count = product.variants.len()),
        err
    )]
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let mut created = self
            .repository
            .create_product(&mut tx, product.uuid, &product.name)
            .await?;

        for variant in &product.variants {
            let variant = self
                .repository
                .create_variant(&mut tx, product.uuid, variant)
                .await?;

            created.variants.push(variant);
        }

        tx.commit().await?;

        info!("created product");

        Ok(created)
    }

    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let mut record = self.repository.get_product(&mut tx, product).await?;

        record.variants = self.repository.list_variants(&mut tx, product).await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(
        name = "products.service.update_variant",
        skip(self, update),
        fields(product_uuid = %product, variant_uuid = %variant),
        err
    )]
    async fn update_variant(
        &self,
        product: ProductUuid,
        variant: VariantUuid,
        update: VariantUpdate,
    ) -> Result<VariantRecord, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let updated = self
            .repository
            .update_variant(&mut tx, product, variant, &update)
            .await?;

        tx.commit().await?;

        info!(
            stock_count = updated.stock_count,
            is_available = updated.is_available,
            "updated variant"
        );

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Creates a product together with its variants.
    async fn create_product(&self, product: NewProduct)
    -> Result<ProductRecord, ProductsServiceError>;

    /// Retrieve a single product with its variants.
    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, ProductsServiceError>;

    /// Replace the price, discount, availability and stock of a variant.
    async fn update_variant(
        &self,
        product: ProductUuid,
        variant: VariantUuid,
        update: VariantUpdate,
    ) -> Result<VariantRecord, ProductsServiceError>;
}
