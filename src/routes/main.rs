use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::DEFAULT_LOW_STOCK_THRESHOLD;
use crate::domain::category::Category;
use crate::repository::DieselRepository;
use crate::routes::{base_context, render_template};
use crate::services::main::{IndexQuery, load_index_page};
use crate::services::products::ProductView;

#[get("/")]
pub async fn show_index(
    params: web::Query<IndexQuery>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(&flash_messages, "index");

    match load_index_page(repo.get_ref(), params.0) {
        Ok(data) => {
            context.insert("products", &data.products);
            context.insert("alerts", &data.alerts);
            context.insert("categories", &data.categories);
            context.insert("threshold", &data.threshold);
            context.insert("load_error", &false);
        }
        Err(err) => {
            // The page still renders; it just shows empty lists and a banner.
            log::error!("Failed to load inventory overview: {err}");
            context.insert("products", &Vec::<ProductView>::new());
            context.insert("alerts", &Vec::<ProductView>::new());
            context.insert("categories", &Vec::<Category>::new());
            context.insert("threshold", &DEFAULT_LOW_STOCK_THRESHOLD);
            context.insert("load_error", &true);
        }
    }

    render_template(&tera, "main/index.html", &context)
}
