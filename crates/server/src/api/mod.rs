pub mod composite;
pub mod handlers;
pub mod items;
pub mod middleware;
pub mod routes;
pub mod uploads;
pub mod watcher;

pub use routes::create_router;
