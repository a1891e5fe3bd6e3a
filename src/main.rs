mod api;
mod app;
mod balance;
mod browser;
mod cache;
mod components;
mod config;
mod error;
mod format;
mod logging;
mod models;
mod pages;
mod request;
mod route;
mod session;
mod transaction_service;

#[cfg(test)]
mod test_utils;

fn main() {
    logging::setup_logging();
    tracing::info!("Starting MoneyWise against {}", config::api_base_url());
    yew::Renderer::<app::App>::new().render();
}
