use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use serde::Serialize;
use tera::{Context, Tera};

pub mod categories;
pub mod main;
pub mod products;

/// Flash message as handed to the templates.
#[derive(Serialize)]
struct FlashMessageView {
    level: &'static str,
    content: String,
}

/// See-other redirect used after every mutating request.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn render_template(tera: &Tera, name: &str, context: &Context) -> HttpResponse {
    match tera.render(name, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template {name}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Shared template context: pending flash messages and the active nav entry.
pub fn base_context(flash_messages: &IncomingFlashMessages, current_page: &str) -> Context {
    let messages: Vec<FlashMessageView> = flash_messages
        .iter()
        .map(|message| FlashMessageView {
            level: level_css_class(message.level()),
            content: message.content().to_string(),
        })
        .collect();

    let mut context = Context::new();
    context.insert("messages", &messages);
    context.insert("current_page", current_page);
    context
}

fn level_css_class(level: Level) -> &'static str {
    match level {
        Level::Debug => "debug",
        Level::Info => "info",
        Level::Success => "success",
        Level::Warning => "warning",
        Level::Error => "error",
    }
}
