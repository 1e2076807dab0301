//! ENSIP-19 reverse names

use crate::address::Address;
use unruggable_params::{COIN_TYPE_DEFAULT, COIN_TYPE_ETH};

/// Reverse name of `address` for `coin_type`.
///
/// Mainnet uses `addr.reverse`, the EVM-wide default uses `default.reverse`,
/// and every other coin type its lowercase hex: Base (`0x80002105`) gives
/// `<addr>.80002105.reverse`.
pub fn reverse_name(address: &Address, coin_type: u32) -> String {
    let namespace = match coin_type {
        COIN_TYPE_ETH => "addr".to_string(),
        COIN_TYPE_DEFAULT => "default".to_string(),
        other => format!("{:x}", other),
    };
    format!("{}.{}.reverse", address.to_lower_hex(), namespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use unruggable_params::Network;

    fn raffy() -> Address {
        Address::parse("0x51050ec063d393217b436747617ad1c2285aeeee").unwrap()
    }

    #[test]
    fn test_base_reverse_name() {
        assert_eq!(
            reverse_name(&raffy(), Network::base().coin_type()),
            "51050ec063d393217b436747617ad1c2285aeeee.80002105.reverse"
        );
    }

    #[test]
    fn test_mainnet_and_default_reverse_names() {
        assert_eq!(
            reverse_name(&raffy(), Network::mainnet().coin_type()),
            "51050ec063d393217b436747617ad1c2285aeeee.addr.reverse"
        );
        assert_eq!(
            reverse_name(&raffy(), COIN_TYPE_DEFAULT),
            "51050ec063d393217b436747617ad1c2285aeeee.default.reverse"
        );
    }
}
