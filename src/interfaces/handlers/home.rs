use actix_web::{get, http::header::ContentType, HttpResponse, Responder};

use crate::constants::{ROBOTS_TXT, WELCOME_HTML};

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(WELCOME_HTML)
}

#[get("/robots.txt")]
pub async fn robots_txt() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(ROBOTS_TXT)
}
