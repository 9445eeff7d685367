use actix_web::web;

use crate::handlers::home::{home, robots_txt};

mod assets;
mod system;
mod resolver;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);
    cfg.service(robots_txt);

    cfg.configure(assets::config_routes)
        .configure(system::config_routes);

    // Must stay last: it matches every GET path.
    cfg.configure(resolver::config_routes);
}
