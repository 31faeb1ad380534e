use std::env;

use actix_files::Files;
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use dotenvy::dotenv;
use tera::Tera;

use magazyn::db::establish_connection_pool;
use magazyn::repository::DieselRepository;
use magazyn::routes::categories::{add_category, delete_category, show_categories};
use magazyn::routes::main::show_index;
use magazyn::routes::products::{add_product, adjust_product, delete_product, upload_products};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let database_url = env::var("DATABASE_URL").unwrap_or("magazyn.db".to_string());
    let port = env::var("PORT").unwrap_or("8080".to_string());
    let port = port.parse::<u16>().unwrap_or(8080);
    let address = env::var("ADDRESS").unwrap_or("127.0.0.1".to_string());

    let secret_key = match env::var("SECRET_KEY") {
        Ok(key) => Key::from(key.as_bytes()),
        Err(_) => Key::generate(),
    };

    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let message_store = CookieMessageStore::builder(secret_key).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = match Tera::new("templates/**/*") {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(show_index)
            .service(show_categories)
            .service(add_category)
            .service(delete_category)
            .service(add_product)
            .service(adjust_product)
            .service(delete_product)
            .service(upload_products)
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
    })
    .bind((address, port))?
    .run()
    .await
}
