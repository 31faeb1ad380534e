use actix_multipart::form::MultipartForm;
use actix_web::{Responder, post, web};
use actix_web_flash_messages::FlashMessage;

use crate::forms::products::{AddProductForm, AdjustStockForm, UploadProductsForm};
use crate::repository::DieselRepository;
use crate::routes::redirect;
use crate::services::ServiceError;
use crate::services::products::{adjust_stock, create_product, import_products, remove_product};

#[post("/products/add")]
pub async fn add_product(
    repo: web::Data<DieselRepository>,
    form: web::Form<AddProductForm>,
) -> impl Responder {
    match create_product(repo.get_ref(), form.into_inner()) {
        Ok(product) => {
            FlashMessage::success(format!("Produkt „{}” dodany.", product.name)).send();
            redirect("/")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to create product: {err}");
            FlashMessage::error("Nie udało się dodać produktu.").send();
            redirect("/")
        }
    }
}

#[post("/products/{product_id}/adjust")]
pub async fn adjust_product(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    form: web::Form<AdjustStockForm>,
) -> impl Responder {
    let product_id = path.into_inner();

    match adjust_stock(repo.get_ref(), product_id, form.into_inner()) {
        Ok(product) => {
            FlashMessage::success(format!(
                "Stan „{}”: {} szt.",
                product.name, product.quantity
            ))
            .send();
            redirect("/")
        }
        Err(ServiceError::InsufficientStock { .. }) => {
            FlashMessage::warning("Nie ma tyle na stanie!").send();
            redirect("/")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Produkt nie znaleziony lub już usunięty.").send();
            redirect("/")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to adjust product {product_id}: {err}");
            FlashMessage::error("Nie udało się zmienić stanu.").send();
            redirect("/")
        }
    }
}

#[post("/products/{product_id}/delete")]
pub async fn delete_product(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let product_id = path.into_inner();

    match remove_product(repo.get_ref(), product_id) {
        Ok(()) => {
            FlashMessage::success("Produkt usunięty.").send();
            redirect("/")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Produkt nie znaleziony lub już usunięty.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to delete product {product_id}: {err}");
            FlashMessage::error("Nie udało się usunąć produktu.").send();
            redirect("/")
        }
    }
}

#[post("/products/upload")]
pub async fn upload_products(
    repo: web::Data<DieselRepository>,
    MultipartForm(mut form): MultipartForm<UploadProductsForm>,
) -> impl Responder {
    match import_products(repo.get_ref(), &mut form) {
        Ok(created) => {
            FlashMessage::success(format!("Zaimportowano {created} produktów.")).send();
            redirect("/")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to import products: {err}");
            FlashMessage::error("Nie udało się zaimportować produktów.").send();
            redirect("/")
        }
    }
}
