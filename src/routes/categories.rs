use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::category::Category;
use crate::forms::categories::AddCategoryForm;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::categories::{create_category, load_categories, remove_category};

#[get("/categories")]
pub async fn show_categories(
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(&flash_messages, "categories");

    match load_categories(repo.get_ref()) {
        Ok(data) => {
            context.insert("categories", &data.categories);
            context.insert("load_error", &false);
        }
        Err(err) => {
            log::error!("Failed to list categories: {err}");
            context.insert("categories", &Vec::<Category>::new());
            context.insert("load_error", &true);
        }
    }

    render_template(&tera, "categories/index.html", &context)
}

#[post("/categories/add")]
pub async fn add_category(
    repo: web::Data<DieselRepository>,
    form: web::Form<AddCategoryForm>,
) -> impl Responder {
    match create_category(repo.get_ref(), form.into_inner()) {
        Ok(category) => {
            FlashMessage::success(format!("Kategoria „{}” dodana.", category.name)).send();
            redirect("/categories")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/categories")
        }
        Err(err) => {
            log::error!("Failed to create category: {err}");
            FlashMessage::error("Nie udało się dodać kategorii.").send();
            redirect("/categories")
        }
    }
}

#[post("/categories/{category_id}/delete")]
pub async fn delete_category(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let category_id = path.into_inner();

    match remove_category(repo.get_ref(), category_id) {
        Ok(()) => {
            FlashMessage::success("Kategoria usunięta.").send();
            redirect("/categories")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Kategoria nie znaleziona lub już usunięta.").send();
            redirect("/categories")
        }
        Err(err) => {
            log::error!("Failed to delete category {category_id}: {err}");
            FlashMessage::error("Nie udało się usunąć kategorii.").send();
            redirect("/categories")
        }
    }
}
