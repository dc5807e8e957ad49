#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate rocket;

use std::sync::Arc;

use crate::scheduler::Scheduler;

mod api;
mod config;
mod error;
mod expression;
mod scheduler;

#[rocket::main]
async fn main() {
    env_logger::init();

    let figment = config::figment();
    let config: config::Config = figment
        .extract()
        .expect("Failed to load operation time configuration");

    let result = rocket::custom(figment)
        .manage(Arc::new(Scheduler::new()))
        .manage(config.times)
        .mount("/", api::routes())
        .launch()
        .await;

    assert!(result.is_ok());
}
