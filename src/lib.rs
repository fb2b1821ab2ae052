//! # stockdaily lib

use std::{env, sync::LazyLock};

use tokio::sync::RwLock;

use crate::config::SdConfig;

pub mod api;
pub mod config;
pub mod error;
pub mod utils;

pub static CHANNEL_BUFFER_DEFAULT: usize = 64;

pub fn init() {
    env_logger::Builder::new()
        .parse_filters(env::var("LOG").as_deref().unwrap_or("off"))
        .init();
}

mod crawl;
mod data;
mod ds;
mod extract;
mod registry;
mod store;

static CONFIG: LazyLock<RwLock<SdConfig>> = LazyLock::new(|| RwLock::new(config::load()));
