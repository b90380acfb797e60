mod alter;
mod crud;
mod defaults;
mod depot;
mod embedded;
mod foreign_keys;
mod indexes;
mod lifecycle;
mod nullability;
mod query;
mod sequences;

use crate::{
    alter::alter, crud::crud, defaults::defaults, depot::depot, embedded::embedded,
    foreign_keys::foreign_keys, indexes::indexes, lifecycle::lifecycle, nullability::nullability,
    query::query, sequences::sequences,
};
use log::LevelFilter;
use std::env;
use tabula::{Engine, EngineConfig, Executor};

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Run every scenario against an empty database reached through `executor`.
pub async fn execute_tests<E: Executor>(executor: E) {
    let config = EngineConfig {
        log_statements: true,
        ..Default::default()
    };
    let mut engine = Engine::with_config(executor, config).expect("Could not create the engine");
    lifecycle(&mut engine).await;
    depot(&mut engine).await;
    defaults(&mut engine).await;
    nullability(&mut engine).await;
    crud(&mut engine).await;
    embedded(&mut engine).await;
    indexes(&mut engine).await;
    query(&mut engine).await;
    sequences(&mut engine).await;
    alter(&mut engine).await;
    foreign_keys(&mut engine).await;
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
