//! Role/capability grant sequence unblocking the teller's bulk
//! withdrawal.
//!
//! Bulk withdrawal is gated by a roles authority: the depositor needs
//! a role, and that role needs the `bulkWithdraw` selector enabled on
//! the teller. Both grants run under the authority owner's
//! impersonated identity and each must settle before the next step —
//! calling `bulkWithdraw` before the second grant lands reverts with
//! an authorization error.

use alloy::primitives::{Address, FixedBytes};
use alloy::sol_types::SolCall;

use crate::chain::ForkClient;
use crate::contracts::ITeller;
use crate::error::HarnessError;
use crate::proxy::AuthorityProxy;

/// Role id granted to the depositor for bulk withdrawal.
pub const BULK_WITHDRAW_ROLE: u8 = 18;

/// Runs the privileged grant sequence on a roles authority.
pub struct AuthorizationGrantor<'a> {
    client: &'a ForkClient,
    authority: Address,
    teller: Address,
}

impl<'a> AuthorizationGrantor<'a> {
    pub fn new(client: &'a ForkClient, authority: Address, teller: Address) -> Self {
        Self {
            client,
            authority,
            teller,
        }
    }

    /// Grant [`BULK_WITHDRAW_ROLE`] to `depositor` and bind the
    /// teller's `bulkWithdraw` selector to that role, under the
    /// impersonated authority `owner`.
    pub async fn grant_bulk_withdraw(
        &self,
        owner: &str,
        depositor: Address,
    ) -> Result<(), HarnessError> {
        let owner_address = self.client.impersonate(owner).await?;
        let authority = AuthorityProxy::bind(
            self.authority,
            self.client.provider().clone(),
            owner_address,
        );

        authority
            .set_user_role(depositor, BULK_WITHDRAW_ROLE, true)
            .await?;
        tracing::info!(role = BULK_WITHDRAW_ROLE, %depositor, "granted withdrawal role");

        let selector = FixedBytes::from(ITeller::bulkWithdrawCall::SELECTOR);
        authority
            .set_role_capability(BULK_WITHDRAW_ROLE, self.teller, selector, true)
            .await?;
        tracing::info!(
            role = BULK_WITHDRAW_ROLE,
            teller = %self.teller,
            selector = %format!("0x{}", hex::encode(selector)),
            "bound bulkWithdraw capability to role"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_selector_is_the_teller_bulk_withdraw() {
        let selector = FixedBytes::<4>::from(ITeller::bulkWithdrawCall::SELECTOR);
        assert_eq!(hex::encode(selector), "3e64ce99");
    }
}
