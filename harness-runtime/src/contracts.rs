//! Solidity contract bindings for the four contract shapes the harness
//! drives: ERC-20 asset, share vault, teller, and roles authority.
//!
//! Uses alloy's `sol!` macro to generate type-safe ABI encoders and
//! RPC call builders. The multi-asset deposit lives in its own
//! interface, bound to the same vault address, so the canonical
//! `deposit(uint256,address)` keeps its plain name.

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function name() external view returns (string memory);
        function symbol() external view returns (string memory);
        function decimals() external view returns (uint8);
        function balanceOf(address account) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    #[sol(rpc)]
    interface IVault {
        function name() external view returns (string memory);
        function asset() external view returns (address);
        function totalAssets() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function maxWithdraw(address owner) external view returns (uint256);
        function deposit(uint256 assets, address receiver) external returns (uint256 shares);
        function withdraw(uint256 assets, address receiver, address owner) external returns (uint256 shares);
    }

    /// Secondary-asset entry point of the same vault: deposits `assets`
    /// of an accepted non-canonical token, converting to canonical
    /// shares. `minShareAmount` is a slippage floor; zero disables it.
    #[sol(rpc)]
    interface IMultiAssetVault {
        function deposit(address token, uint256 assets, address receiver, uint256 minShareAmount) external returns (uint256 shares);
    }

    #[sol(rpc)]
    interface ITeller {
        function deposit(address depositAsset, uint256 depositAmount, uint256 minimumMint) external returns (uint256 shares);
        function shareUnlockTime(address account) external view returns (uint256);
        function bulkWithdraw(address withdrawAsset, uint256 shareAmount, uint256 minimumAssets, address to) external returns (uint256 assetsOut);
    }

    #[sol(rpc)]
    interface IRolesAuthority {
        function setUserRole(address user, uint8 role, bool enabled) external;
        function setRoleCapability(uint8 role, address target, bytes4 functionSig, bool enabled) external;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, U256};
    use alloy::sol_types::SolCall;

    #[test]
    fn bulk_withdraw_selector_matches_granted_capability() {
        // The capability bound on the authority is this exact selector.
        assert_eq!(ITeller::bulkWithdrawCall::SELECTOR, [0x3e, 0x64, 0xce, 0x99]);
    }

    #[test]
    fn deposit_shapes_have_distinct_selectors() {
        // Canonical ERC-4626 deposit vs the multi-asset variant.
        assert_eq!(IVault::depositCall::SELECTOR, [0x6e, 0x55, 0x3f, 0x65]);
        assert_eq!(IMultiAssetVault::depositCall::SELECTOR, [0x90, 0xd2, 0x50, 0x74]);
        assert_eq!(ITeller::depositCall::SELECTOR, [0x0e, 0xfe, 0x6a, 0x8b]);
    }

    #[test]
    fn approve_encoding_round_trips() {
        let call = IERC20::approveCall {
            spender: Address::repeat_byte(0x11),
            amount: U256::from(1500u64),
        };
        let encoded = call.abi_encode();
        let decoded = IERC20::approveCall::abi_decode(&encoded).unwrap();
        assert_eq!(decoded.spender, Address::repeat_byte(0x11));
        assert_eq!(decoded.amount, U256::from(1500u64));
    }
}
