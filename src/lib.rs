#![doc(test(attr(deny(warnings))))]

//! Coop Core keeps the books of a small poultry or quail farm: flocks,
//! daily production notes, income and expenses, and the production and
//! finance summaries built from them. Records live in a remote REST store
//! or a local JSON file, and an optional generative advisor helps with
//! feed formulation, finance, health and marketing.

pub mod advisory;
pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!(
            version = utils::build_info::CLI_VERSION,
            "Coop Core tracing initialized."
        );
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
