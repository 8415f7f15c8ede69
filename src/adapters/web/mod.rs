//! Web server adapter.
//!
//! Serves the momentum dashboard, the allocation form and the comparison page
//! through axum. Prices are fetched on a blocking task and shared through the
//! content-addressed cache.

mod error;
mod handlers;
mod templates;

pub use error::WebError;
pub use templates::*;

use axum::{
    Router,
    routing::{get, post},
};
use chrono::NaiveDate;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::error::MomentumError;
use crate::domain::fetch::{FetchOutcome, fetch_price_table};
use crate::domain::price_cache::PriceCache;
use crate::domain::settings::Settings;
use crate::ports::price_port::PricePort;

pub struct AppState {
    pub price_port: Arc<dyn PricePort + Send + Sync>,
    pub settings: Settings,
    pub cache: Mutex<PriceCache>,
    /// Fixed evaluation date; `None` means today.
    pub as_of: Option<NaiveDate>,
}

impl AppState {
    pub fn new(price_port: Arc<dyn PricePort + Send + Sync>, settings: Settings) -> Self {
        let cache = settings.new_cache();
        Self {
            price_port,
            settings,
            cache: Mutex::new(cache),
            as_of: None,
        }
    }

    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.as_of
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    fn lock_cache(&self) -> Result<MutexGuard<'_, PriceCache>, MomentumError> {
        self.cache.lock().map_err(|_| MomentumError::DataSource {
            reason: "price cache lock poisoned".to_string(),
        })
    }

    /// Prices for `symbols` over `[start, end]` and the symbols skipped while
    /// fetching them, from the cache when possible. The cache lock is not held
    /// while the price source is queried.
    pub fn load_prices(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchOutcome, MomentumError> {
        if let Some(hit) = self.lock_cache()?.get(symbols, start, end) {
            tracing::debug!(symbols = symbols.len(), %start, %end, "price cache hit");
            return Ok(hit);
        }
        tracing::debug!(symbols = symbols.len(), %start, %end, "price cache miss");

        let outcome = fetch_price_table(
            self.price_port.as_ref(),
            symbols,
            start,
            end,
            self.settings.on_error,
        )?;

        let mut cache = self.lock_cache()?;
        // Another request may have filled the entry while this one fetched.
        if let Some(hit) = cache.get(symbols, start, end) {
            return Ok(hit);
        }
        cache.insert(symbols, start, end, outcome.clone());
        Ok(outcome)
    }

    pub fn reset(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/allocate", post(handlers::allocate))
        .route("/compare", get(handlers::compare))
        .route("/refresh", post(handlers::refresh))
        .fallback(handlers::not_found)
        .with_state(Arc::new(state))
}
