use actix_web::web;

use crate::{error::json_config, handlers};

/// | Method | Path          | Handler       |
/// |--------|---------------|---------------|
/// | POST   | /people       | create_person |
/// | GET    | /people       | get_people    |
/// | GET    | /people/{dni} | get_person    |
/// | PUT    | /people/{dni} | update_person |
/// | DELETE | /people/{dni} | delete_person |
///
/// Anything else falls through to the default not found response.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(handlers::create_person)
        .service(handlers::get_people)
        .service(handlers::get_person)
        .service(handlers::update_person)
        .service(handlers::delete_person);
}
