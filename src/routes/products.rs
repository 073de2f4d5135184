use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use serde_json::json;

use crate::forms::products::{AddProductForm, UpdateProductForm};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::products;

#[get("/products")]
pub async fn list_products(
    params: web::Query<products::ProductsQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products::list_products(repo.get_ref(), params.into_inner()) {
        Ok(products) => HttpResponse::Ok().json(products),
        Err(err) => error_response(&err),
    }
}

#[get("/products/{product_id}")]
pub async fn get_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products::get_product(repo.get_ref(), product_id.into_inner()) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(&err),
    }
}

#[post("/products")]
pub async fn create_product(
    repo: web::Data<DieselRepository>,
    form: web::Json<AddProductForm>,
) -> impl Responder {
    match products::create_product(repo.get_ref(), form.into_inner()) {
        Ok(product) => HttpResponse::Created().json(product),
        Err(err) => error_response(&err),
    }
}

#[put("/products/{product_id}")]
pub async fn update_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    form: web::Json<UpdateProductForm>,
) -> impl Responder {
    match products::update_product(repo.get_ref(), product_id.into_inner(), form.into_inner()) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(&err),
    }
}

#[delete("/products/{product_id}")]
pub async fn delete_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products::delete_product(repo.get_ref(), product_id.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(json!({ "message": "Product deleted" })),
        Err(err) => error_response(&err),
    }
}
