//! Contract ABIs used by the workflows.
//!
//! Only the functions the workflows and inspection commands call are declared.
//! Encoding and decoding are generated by `sol!`.

use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_sol_types::{sol, SolValue};

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface ILiquidator {
        function isLiquidatable(address user) external view returns (bool);
    }

    #[derive(Debug, PartialEq, Eq)]
    interface ICounter {
        function number() external view returns (uint256);
        function increment() external;
    }

    #[derive(Debug, PartialEq, Eq)]
    interface IERC20 {
        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
    }

    #[derive(Debug, PartialEq, Eq)]
    interface IBalanceReader {
        function getNativeBalances(address[] addresses) external view returns (uint256[]);
    }

    #[derive(Debug, PartialEq, Eq)]
    interface IMessageEmitter {
        function getLastMessage(address emitter) external view returns (string);
    }

    #[derive(Debug, PartialEq, Eq)]
    interface IReserveManager {
        struct UpdateReserves {
            uint256 totalMinted;
            uint256 totalReserve;
        }

        function updateReserves(UpdateReserves data) external;
    }

    /// Strategy parameters an Aqua app is docked with.
    #[derive(Debug, PartialEq, Eq)]
    struct AquaStrategy {
        address maker;
        address token0;
        address token1;
        uint256 feeBps;
        bytes32 salt;
    }

    #[derive(Debug, PartialEq, Eq)]
    interface IAquaApp {
        function AQUA() external view returns (address);
    }

    #[derive(Debug, PartialEq, Eq)]
    interface IAqua {
        function rawBalances(address maker, address app, bytes32 strategyHash, address token)
            external view returns (uint248 balance, uint8 tokensCount);
        function safeBalances(address maker, address app, bytes32 strategyHash, address token0, address token1)
            external view returns (uint256 balance0, uint256 balance1);
    }
}

/// `keccak256(abi.encode(strategy))`, the key Aqua stores strategy balances under.
pub fn strategy_hash(strategy: &AquaStrategy) -> B256 {
    keccak256(strategy.abi_encode())
}

/// Collateral amount the liquidation bot assigns when opening a position.
pub const DEFAULT_COLLATERAL: u64 = 100;

/// Report payload for the set-position proxy: `abi.encode(user, true, collateral)`.
pub fn set_position_payload(user: Address, collateral: U256) -> Vec<u8> {
    (user, true, collateral).abi_encode_params()
}

/// Report payload for the liquidate-collateral proxy: `abi.encode(user)`.
pub fn liquidate_payload(user: Address) -> Vec<u8> {
    (user,).abi_encode_params()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_sol_types::SolCall;

    #[test]
    fn test_function_signatures() {
        assert_eq!(ILiquidator::isLiquidatableCall::SIGNATURE, "isLiquidatable(address)");
        assert_eq!(ICounter::incrementCall::SIGNATURE, "increment()");
        assert_eq!(
            IReserveManager::updateReservesCall::SIGNATURE,
            "updateReserves((uint256,uint256))"
        );
    }

    #[test]
    fn test_liquidator_is_read_only() {
        use alloy_sol_types::SolInterface;
        assert_eq!(<ILiquidator::ILiquidatorCalls as SolInterface>::COUNT, 1);
    }

    #[test]
    fn test_strategy_hash_covers_static_tuple() {
        let strategy = AquaStrategy {
            maker: Address::repeat_byte(0x95),
            token0: Address::repeat_byte(0x7b),
            token1: Address::repeat_byte(0x1c),
            feeBps: U256::ZERO,
            salt: B256::with_last_byte(0x13),
        };

        let mut encoded = Vec::with_capacity(160);
        for word in [
            strategy.maker.into_word(),
            strategy.token0.into_word(),
            strategy.token1.into_word(),
            B256::ZERO,
            strategy.salt,
        ] {
            encoded.extend_from_slice(word.as_slice());
        }

        assert_eq!(strategy.abi_encode(), encoded);
        assert_eq!(strategy_hash(&strategy), keccak256(&encoded));

        let other_salt = AquaStrategy {
            salt: B256::with_last_byte(0x10),
            ..strategy.clone()
        };
        assert_ne!(strategy_hash(&other_salt), strategy_hash(&strategy));
    }

    #[test]
    fn test_aqua_signatures() {
        assert_eq!(IAquaApp::AQUACall::SIGNATURE, "AQUA()");
        assert_eq!(
            IAqua::rawBalancesCall::SIGNATURE,
            "rawBalances(address,address,bytes32,address)"
        );
        assert_eq!(
            IAqua::safeBalancesCall::SIGNATURE,
            "safeBalances(address,address,bytes32,address,address)"
        );
    }

    #[test]
    fn test_set_position_payload_layout() {
        let user = Address::repeat_byte(0x42);
        let payload = set_position_payload(user, U256::from(DEFAULT_COLLATERAL));

        assert_eq!(payload.len(), 96);
        assert_eq!(&payload[12..32], user.as_slice());
        assert_eq!(payload[63], 1);
        assert_eq!(payload[95], 100);
    }

    #[test]
    fn test_liquidate_payload_layout() {
        let user = Address::repeat_byte(0x42);
        let payload = liquidate_payload(user);

        assert_eq!(payload.len(), 32);
        assert!(payload[..12].iter().all(|b| *b == 0));
        assert_eq!(&payload[12..], user.as_slice());
    }

    #[test]
    fn test_decode_bool_return() {
        let mut data = vec![0u8; 32];
        data[31] = 1;
        let decoded = ILiquidator::isLiquidatableCall::abi_decode_returns(&data, true).unwrap();
        assert!(decoded._0);
    }

    #[test]
    fn test_increment_calldata_is_selector_only() {
        let data = ICounter::incrementCall {}.abi_encode();
        assert_eq!(data.len(), 4);
        assert_eq!(data[..], ICounter::incrementCall::SELECTOR[..]);
    }
}
