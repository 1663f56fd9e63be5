//! Kraken REST method registry.
//!
//! Maps method names (the last path segment, e.g. `Ticker` or `Balance`) to
//! the privacy class that decides the request path and whether it is signed.

use std::fmt;

/// Current REST API version, the first path segment.
pub const API_VERSION: u32 = 0;

/// Whether a method needs authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodPrivacy {
    /// No authentication, never signed.
    Public,
    /// Authenticated, signed with `API-Sign`.
    Private,
}

impl MethodPrivacy {
    /// Path segment for this class.
    pub fn as_str(self) -> &'static str {
        match self {
            MethodPrivacy::Public => "public",
            MethodPrivacy::Private => "private",
        }
    }

    /// True for [`MethodPrivacy::Private`].
    pub fn requires_signature(self) -> bool {
        matches!(self, MethodPrivacy::Private)
    }
}

impl fmt::Display for MethodPrivacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public methods (no authentication required).
const PUBLIC_METHODS: &[&str] = &[
    "Time",
    "SystemStatus",
    "Assets",
    "AssetPairs",
    "Ticker",
    "Depth",
    "Trades",
    "Spread",
    "OHLC",
];

/// Private methods (authentication required).
const PRIVATE_METHODS: &[&str] = &[
    // Account
    "Balance",
    "BalanceEx",
    "TradeBalance",
    "OpenOrders",
    "ClosedOrders",
    "QueryOrders",
    "OrderAmends",
    "TradesHistory",
    "QueryTrades",
    "OpenPositions",
    "Ledgers",
    "QueryLedgers",
    "TradeVolume",
    // Export
    "AddExport",
    "ExportStatus",
    "RetrieveExport",
    "RemoveExport",
    // Trading
    "AddOrder",
    "AddOrderBatch",
    "AmendOrder",
    "EditOrder",
    "CancelOrder",
    "CancelAll",
    "CancelAllOrdersAfter",
    "CancelOrderBatch",
    // Funding
    "DepositMethods",
    "DepositAddresses",
    "DepositStatus",
    "WithdrawMethods",
    "WithdrawAddresses",
    "WithdrawInfo",
    "Withdraw",
    "WithdrawStatus",
    "WithdrawCancel",
    "WalletTransfer",
    // WebSocket token
    "GetWebSocketsToken",
];

/// Classify a method name.
///
/// Returns `None` for names that are not in the registry. Matching is exact
/// and case sensitive.
///
/// ```rust
/// use kraken_rest_dispatch::methods::{classify, MethodPrivacy};
///
/// assert_eq!(classify("Ticker"), Some(MethodPrivacy::Public));
/// assert_eq!(classify("Balance"), Some(MethodPrivacy::Private));
/// assert_eq!(classify("Bogus"), None);
/// ```
pub fn classify(method: &str) -> Option<MethodPrivacy> {
    if PUBLIC_METHODS.contains(&method) {
        Some(MethodPrivacy::Public)
    } else if PRIVATE_METHODS.contains(&method) {
        Some(MethodPrivacy::Private)
    } else {
        None
    }
}

/// All registered public method names.
pub fn public_methods() -> &'static [&'static str] {
    PUBLIC_METHODS
}

/// All registered private method names.
pub fn private_methods() -> &'static [&'static str] {
    PRIVATE_METHODS
}

/// Request path for a method: `/{version}/{privacy}/{method}`.
pub fn method_path(version: u32, privacy: MethodPrivacy, method: &str) -> String {
    format!("/{version}/{privacy}/{method}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tables_are_disjoint() {
        let public: HashSet<_> = PUBLIC_METHODS.iter().collect();
        for name in PRIVATE_METHODS {
            assert!(!public.contains(name), "{name} is in both tables");
        }
    }

    #[test]
    fn test_tables_have_no_duplicates() {
        let all: Vec<_> = PUBLIC_METHODS.iter().chain(PRIVATE_METHODS).collect();
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(all.len(), unique.len());
    }

    #[test]
    fn test_classify_every_registered_name() {
        for name in public_methods() {
            assert_eq!(classify(name), Some(MethodPrivacy::Public));
        }
        for name in private_methods() {
            assert_eq!(classify(name), Some(MethodPrivacy::Private));
        }
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify("Bogus"), None);
        assert_eq!(classify(""), None);
        assert_eq!(classify("ticker"), None);
        assert_eq!(classify("/0/public/Ticker"), None);
    }

    #[test]
    fn test_method_path() {
        assert_eq!(
            method_path(API_VERSION, MethodPrivacy::Public, "Time"),
            "/0/public/Time"
        );
        assert_eq!(
            method_path(API_VERSION, MethodPrivacy::Private, "GetWebSocketsToken"),
            "/0/private/GetWebSocketsToken"
        );
        assert!(MethodPrivacy::Private.requires_signature());
        assert!(!MethodPrivacy::Public.requires_signature());
    }
}
