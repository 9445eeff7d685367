use actix_web::web;

use crate::handlers::assets;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(assets::upload_image)
        .service(assets::upload_file)
        .service(assets::delete_image)
        .service(assets::delete_file);
}
