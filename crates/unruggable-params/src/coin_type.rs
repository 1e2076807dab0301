//! ENSIP-11 coin types

/// SLIP-44 coin type of Ethereum mainnet
pub const COIN_TYPE_ETH: u32 = 60;

/// High bit that marks an EVM chain id coin type
pub const EVM_BIT: u32 = 0x8000_0000;

/// Coin type shared by every EVM chain (ENSIP-19 default reverse)
pub const COIN_TYPE_DEFAULT: u32 = EVM_BIT;

/// Coin type for an EVM chain id.
///
/// Mainnet keeps its SLIP-44 value; every other chain is `EVM_BIT | chain_id`.
/// Chain ids that do not fit in 31 bits are truncated to their low 31 bits.
pub const fn evm_coin_type(chain_id: u64) -> u32 {
    if chain_id == 1 {
        COIN_TYPE_ETH
    } else {
        EVM_BIT | (chain_id as u32 & !EVM_BIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evm_coin_type() {
        assert_eq!(evm_coin_type(1), 60);
        assert_eq!(evm_coin_type(8453), 0x8000_2105);
        assert_eq!(evm_coin_type(10), 0x8000_000a);
    }
}
