//! Symbol list parsing for batch runs.

use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SymbolListError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),
}

/// Normalise a single ticker: trimmed and upper-cased.
pub fn normalize_symbol(input: &str) -> String {
    input.trim().to_uppercase()
}

/// Parse tickers given as separate arguments and/or comma-separated lists.
pub fn parse_symbols<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<String>, SymbolListError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for input in inputs {
        for token in input.as_ref().split(',') {
            let symbol = normalize_symbol(token);
            if symbol.is_empty() {
                return Err(SymbolListError::EmptyToken);
            }
            if !seen.insert(symbol.clone()) {
                return Err(SymbolListError::DuplicateSymbol(symbol));
            }
            symbols.push(symbol);
        }
    }

    Ok(symbols)
}
