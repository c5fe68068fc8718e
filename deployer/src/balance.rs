// SPDX-License-Identifier: MIT

use alloy::primitives::U256;

/// How many configured accounts the balance check reports on.
pub const MAX_ACCOUNTS: usize = 5;

/// 0.01 ETH in wei.
pub const LOW_BALANCE_WEI: U256 = U256::from_limbs([10_000_000_000_000_000, 0, 0, 0]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceStatus {
    Empty,
    Low,
    Funded,
}

impl BalanceStatus {
    pub fn classify(balance: U256) -> Self {
        if balance.is_zero() {
            BalanceStatus::Empty
        } else if balance < LOW_BALANCE_WEI {
            BalanceStatus::Low
        } else {
            BalanceStatus::Funded
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            BalanceStatus::Empty => "⚠️  No funds! Fund this address before deploying.",
            BalanceStatus::Low => "⚠️  Low balance! Consider adding more funds.",
            BalanceStatus::Funded => "✅ Good balance for deployment.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::utils::parse_ether;

    #[test]
    fn thresholds() {
        assert_eq!(BalanceStatus::classify(U256::ZERO), BalanceStatus::Empty);
        assert_eq!(BalanceStatus::classify(U256::from(1u64)), BalanceStatus::Low);
        assert_eq!(BalanceStatus::classify(parse_ether("0.0099").unwrap()), BalanceStatus::Low);
        assert_eq!(BalanceStatus::classify(parse_ether("0.01").unwrap()), BalanceStatus::Funded);
        assert_eq!(BalanceStatus::classify(parse_ether("10000").unwrap()), BalanceStatus::Funded);
    }
}
