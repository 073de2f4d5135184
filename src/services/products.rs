use serde::Deserialize;

use crate::domain::product::{Product, ProductListQuery};
use crate::forms::products::{AddProductForm, UpdateProductForm};
use crate::repository::{ProductReader, ProductWriter};
use crate::services::{ServiceError, ServiceResult, non_blank, not_found_as};

const PRODUCT_NOT_FOUND: &str = "Product not found";

/// Query parameters accepted by `GET /products`.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    /// Optional case-insensitive name substring.
    pub search: Option<String>,
}

/// Lists live products, optionally filtered by name.
pub fn list_products<R>(repo: &R, query: ProductsQuery) -> ServiceResult<Vec<Product>>
where
    R: ProductReader + ?Sized,
{
    let mut list_query = ProductListQuery::new();

    if let Some(term) = non_blank(query.search.as_deref()) {
        list_query = list_query.search(term);
    }

    repo.list_products(list_query).map_err(ServiceError::from)
}

pub fn get_product<R>(repo: &R, product_id: i32) -> ServiceResult<Product>
where
    R: ProductReader + ?Sized,
{
    repo.get_product_by_id(product_id)
        .map_err(ServiceError::from)?
        .ok_or_else(|| ServiceError::not_found(PRODUCT_NOT_FOUND))
}

/// Creates a product after validating name and price.
pub fn create_product<R>(repo: &R, form: AddProductForm) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    let new_product = form
        .into_new_product()
        .map_err(|err| ServiceError::Validation(err.to_string()))?;

    let product = repo
        .create_product(&new_product)
        .map_err(ServiceError::from)?;
    log::info!("Created product {} ({})", product.id, product.name);

    Ok(product)
}

/// Merges the present fields of `form` into the stored product. A missing
/// product is reported before the payload is validated.
pub fn update_product<R>(
    repo: &R,
    product_id: i32,
    form: UpdateProductForm,
) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    let current = get_product(repo, product_id)?;

    let updates = form
        .into_update_product()
        .map_err(|err| ServiceError::Validation(err.to_string()))?;

    if updates.is_empty() {
        return Ok(current);
    }

    repo.update_product(product_id, &updates)
        .map_err(|err| not_found_as(err.into(), PRODUCT_NOT_FOUND))
}

/// Soft-deletes a product.
pub fn delete_product<R>(repo: &R, product_id: i32) -> ServiceResult<()>
where
    R: ProductWriter + ?Sized,
{
    repo.delete_product(product_id)
        .map_err(|err| not_found_as(err.into(), PRODUCT_NOT_FOUND))?;
    log::info!("Deleted product {product_id}");
    Ok(())
}
