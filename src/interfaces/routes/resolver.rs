use actix_web::web;

use crate::handlers::resolver::serve_asset;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/{tail:.*}").route(web::get().to(serve_asset)));
}
