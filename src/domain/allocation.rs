//! Equal-weight allocation across a symbol list.
//!
//! per_symbol = total / n; quantity = per_symbol / latest price.
//! A symbol with no usable price keeps its share but has no quantity.

use crate::domain::price_table::PriceTable;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AllocationError {
    #[error("total funds must be a number, got {0:?}")]
    InvalidFunds(String),

    #[error("total funds must be positive, got {0}")]
    NonPositiveFunds(f64),

    #[error("no symbols to allocate across")]
    NoSymbols,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub symbol: String,
    pub amount: f64,
    pub latest_price: Option<f64>,
    pub quantity: Option<f64>,
}

impl Allocation {
    pub fn is_available(&self) -> bool {
        self.quantity.is_some()
    }
}

pub fn parse_total_funds(input: &str) -> Result<f64, AllocationError> {
    let trimmed = input.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| AllocationError::InvalidFunds(trimmed.to_string()))?;
    if !value.is_finite() {
        return Err(AllocationError::InvalidFunds(trimmed.to_string()));
    }
    if value <= 0.0 {
        return Err(AllocationError::NonPositiveFunds(value));
    }
    Ok(value)
}

pub fn allocate_equal_weight<S: AsRef<str>>(
    symbols: &[S],
    total_funds: f64,
    prices: &PriceTable,
) -> Result<Vec<Allocation>, AllocationError> {
    if !total_funds.is_finite() || total_funds <= 0.0 {
        return Err(AllocationError::NonPositiveFunds(total_funds));
    }
    if symbols.is_empty() {
        return Err(AllocationError::NoSymbols);
    }

    let amount = total_funds / symbols.len() as f64;

    Ok(symbols
        .iter()
        .map(|symbol| {
            let symbol = symbol.as_ref();
            let latest_price = prices.latest_price(symbol).filter(|p| *p > 0.0);
            Allocation {
                symbol: symbol.to_string(),
                amount,
                latest_price,
                quantity: latest_price.map(|p| amount / p),
            }
        })
        .collect())
}

/// Allocation across the momentum list. An empty list yields no rows rather
/// than [`AllocationError::NoSymbols`].
pub fn allocate_momentum<S: AsRef<str>>(
    momentum: &[S],
    total_funds: f64,
    prices: &PriceTable,
) -> Result<Vec<Allocation>, AllocationError> {
    match allocate_equal_weight(momentum, total_funds, prices) {
        Err(AllocationError::NoSymbols) => {
            tracing::warn!("no momentum stocks to allocate");
            Ok(Vec::new())
        }
        other => other,
    }
}
