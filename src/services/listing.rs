//! Exchange candidates for a Universe symbol.

use crate::models::{Listing, Market, Symbol};

/// Crypto venues tried in order, with the quote currency each one uses.
pub const CRYPTO_VENUES: [(&str, &str); 4] = [
    ("BINANCE", "USDT"),
    ("BYBIT", "USDT"),
    ("COINBASE", "USD"),
    ("KRAKEN", "USD"),
];

/// US equity exchanges in rough order of likelihood.
pub const EQUITY_EXCHANGES: [&str; 3] = ["NASDAQ", "NYSE", "AMEX"];

/// Listings to try for `symbol`, most likely first.
///
/// Crypto tickers get each venue's quote currency appended unless the symbol
/// is marked as a pair; a pinned crypto venue is queried as-is. Equity class
/// shares (`BRK-B`) are also tried with a dot (`BRK.B`), on the pinned
/// exchange when there is one.
pub fn candidate_listings(symbol: &Symbol) -> Vec<Listing> {
    match symbol.market {
        Market::Crypto => {
            if let Some(exchange) = &symbol.exchange {
                return vec![Listing::new(exchange.clone(), symbol.ticker.clone(), Market::Crypto)];
            }
            let base: String = symbol
                .ticker
                .to_uppercase()
                .chars()
                .filter(|c| *c != '.' && *c != '-')
                .collect();
            CRYPTO_VENUES
                .iter()
                .map(|(venue, quote)| {
                    let pair = if symbol.paired {
                        base.clone()
                    } else {
                        format!("{}{}", base, quote)
                    };
                    Listing::new(*venue, pair, Market::Crypto)
                })
                .collect()
        }
        Market::America => {
            let variants = class_share_variants(&symbol.ticker);
            match &symbol.exchange {
                Some(exchange) => variants
                    .into_iter()
                    .map(|ticker| Listing::new(exchange.clone(), ticker, Market::America))
                    .collect(),
                None => variants
                    .iter()
                    .flat_map(|ticker| {
                        EQUITY_EXCHANGES
                            .iter()
                            .map(move |exchange| Listing::new(*exchange, ticker.clone(), Market::America))
                    })
                    .collect(),
            }
        }
    }
}

/// The ticker itself, then its `-`/`.` class-share spelling if it has one.
fn class_share_variants(ticker: &str) -> Vec<String> {
    let mut variants = vec![ticker.to_string()];
    if ticker.contains('-') {
        variants.push(ticker.replace('-', "."));
    }
    if ticker.contains('.') {
        variants.push(ticker.replace('.', "-"));
    }
    variants
}
