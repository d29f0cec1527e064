//! Human-readable amount conversion.
//!
//! All deposit/withdraw inputs are decimal strings (e.g. "0.000015")
//! and are converted to the asset's smallest unit with the decimals
//! resolved from chain state at the start of a cycle.

use alloy::primitives::U256;
use alloy::primitives::utils::{format_units, parse_units};

use crate::error::HarnessError;

/// Parse a decimal amount string into smallest units.
///
/// Amounts finer than the asset's precision are rejected rather than
/// rounded: a sub-unit deposit input is a configuration mistake.
pub fn to_base_units(amount: &str, decimals: u8) -> Result<U256, HarnessError> {
    if let Some((_, fraction)) = amount.split_once('.') {
        let significant = fraction.trim_end_matches('0');
        if significant.len() > usize::from(decimals) {
            return Err(HarnessError::Config(format!(
                "Invalid amount '{amount}': more than {decimals} fractional digits"
            )));
        }
    }
    let parsed = parse_units(amount, decimals)
        .map_err(|e| HarnessError::Config(format!("Invalid amount '{amount}': {e}")))?;
    Ok(parsed.into())
}

/// Format a smallest-unit amount for reporting. Falls back to the raw
/// integer if `decimals` is out of range for formatting.
pub fn from_base_units(amount: U256, decimals: u8) -> String {
    format_units(amount, decimals).unwrap_or_else(|_| amount.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_amounts_convert_to_expected_units() {
        // 8-decimal BTC-style asset, amounts from the reference scenario.
        assert_eq!(to_base_units("0.000015", 8).unwrap(), U256::from(1500u64));
        assert_eq!(to_base_units("0.000013", 8).unwrap(), U256::from(1300u64));
        assert_eq!(to_base_units("0.00015", 8).unwrap(), U256::from(15_000u64));
        assert_eq!(to_base_units("0.0001", 8).unwrap(), U256::from(10_000u64));
    }

    #[test]
    fn zero_amount_is_zero_units() {
        assert_eq!(to_base_units("0", 8).unwrap(), U256::ZERO);
    }

    #[test]
    fn too_many_fractional_digits_is_rejected() {
        assert!(to_base_units("0.000000001", 8).is_err());
        // A nonzero ninth digit must not round down to the eighth.
        assert!(to_base_units("0.000000019", 8).is_err());
    }

    #[test]
    fn trailing_zeros_do_not_count_as_precision() {
        assert_eq!(
            to_base_units("0.000015000", 8).unwrap(),
            U256::from(1500u64)
        );
    }

    #[test]
    fn garbage_amount_is_rejected() {
        assert!(to_base_units("fifteen", 8).is_err());
    }

    #[test]
    fn formatting_round_trips_through_parsing() {
        let units = U256::from(1500u64);
        let rendered = from_base_units(units, 8);
        assert_eq!(to_base_units(&rendered, 8).unwrap(), units);
    }
}
