//! Usage report settlement and terminal burn/withdraw settlement.
//!
//! A report batch first deducts every user's usage, then pays each data proxy
//! the total it is owed across the whole batch. Payouts happen in ascending
//! raw public-key order so that every node performs the same transfers and
//! emits the same events. A proxy that is unregistered or has an unparsable
//! payout address is skipped with a diagnostic event; its share stays with
//! the client as used credits.

use std::collections::{BTreeMap, BTreeSet};

use fast_types::{AccountAddress, Amount, Coin, PubKey};
use tracing::{debug, info, warn};

use crate::error::FastError;
use crate::events::FastEvent;
use crate::keeper::{require_role, Context, Keeper};
use crate::msgs::{MsgSettleCredits, MsgSubmitReports, SettleType, UserReport};

/// Sum what each data proxy is owed across `reports`, keyed by public key.
///
/// The map iterates in raw public-key order regardless of report order.
pub fn aggregate_proxy_charges(
    reports: &[UserReport],
) -> Result<BTreeMap<PubKey, Amount>, FastError> {
    let mut owed: BTreeMap<PubKey, Amount> = BTreeMap::new();
    for report in reports {
        for proxy in &report.data_proxy_reports {
            let charge = proxy
                .price
                .checked_mul(Amount::new(u128::from(proxy.amount)))
                .ok_or(FastError::Overflow)?;
            let entry = owed.entry(proxy.data_proxy_pubkey.clone()).or_default();
            *entry = entry.checked_add(charge).ok_or(FastError::Overflow)?;
        }
    }
    Ok(owed)
}

impl Keeper {
    pub(crate) fn submit_reports(
        &self,
        ctx: &mut Context<'_>,
        msg: &MsgSubmitReports,
    ) -> Result<(), FastError> {
        let mut client = self.get_client(&*ctx.kv, &msg.fast_client_public_key)?;
        require_role("settlement address", &client.settlement_address, &msg.address)?;

        let params = self.params(&*ctx.kv)?;
        if msg.reports.len() > params.max_reports_per_submission as usize {
            return Err(FastError::InvalidRequest(format!(
                "{} reports submitted, limit is {}",
                msg.reports.len(),
                params.max_reports_per_submission
            )));
        }

        let mut seen = BTreeSet::new();
        let mut total_used = Amount::ZERO;
        for report in &msg.reports {
            if !seen.insert(report.user_id.as_str()) {
                return Err(FastError::InvalidRequest(format!(
                    "duplicate report for user {}",
                    report.user_id
                )));
            }
            let mut user = self.get_user(&*ctx.kv, client.id, &report.user_id)?;
            user.use_credits(report.used_credits)?;
            self.set_user(ctx.kv, client.id, &user)?;
            total_used = total_used
                .checked_add(report.used_credits)
                .ok_or(FastError::Overflow)?;

            debug!(
                fast_client_id = client.id,
                user_id = %user.user_id,
                used = %report.used_credits,
                "user credits used"
            );
            ctx.emit(FastEvent::UseUserCredits {
                fast_client_id: client.id,
                fast_client_pubkey: client.public_key.clone(),
                user_id: user.user_id.clone(),
                credits: report.used_credits,
            });
            ctx.emit(FastEvent::user_snapshot(&client, &user));
        }

        let owed = aggregate_proxy_charges(&msg.reports)?;
        let denom = ctx.bank.bond_denom();
        let mut paid = Amount::ZERO;
        for (proxy, amount) in owed {
            let Some(config) = ctx.proxies.get_config(&proxy) else {
                warn!(data_proxy = %proxy, %amount, "skipping unregistered data proxy");
                ctx.emit(FastEvent::UnregisteredDataProxy {
                    data_proxy_pubkey: proxy,
                });
                continue;
            };
            let payout_address = match AccountAddress::parse(&config.payout_address) {
                Ok(address) => address,
                Err(e) => {
                    warn!(data_proxy = %proxy, %amount, error = %e, "skipping data proxy with invalid payout address");
                    ctx.emit(FastEvent::InvalidDataProxyPayoutAddress {
                        data_proxy_pubkey: proxy,
                        payout_address: config.payout_address,
                        amount,
                    });
                    continue;
                }
            };

            ctx.bank
                .send_from_escrow(&payout_address, &Coin::new(denom.clone(), amount))?;
            paid = paid.checked_add(amount).ok_or(FastError::Overflow)?;

            debug!(data_proxy = %proxy, payout = %payout_address, %amount, "data proxy paid");
            ctx.emit(FastEvent::DataProxyPayout {
                data_proxy_pubkey: proxy,
                payout_address,
                amount,
            });
        }

        if paid > total_used {
            return Err(FastError::InvalidRequest(format!(
                "data proxy payouts of {paid} exceed the {total_used} credits used"
            )));
        }
        client.apply_usage(total_used, paid)?;
        self.set_client(ctx.kv, &client)?;

        info!(
            fast_client_id = client.id,
            reports = msg.reports.len(),
            %total_used,
            %paid,
            "usage reports settled"
        );
        ctx.emit(FastEvent::SubmitReports {
            fast_client_id: client.id,
            fast_client_pubkey: client.public_key.clone(),
        });
        ctx.emit(FastEvent::FastClient(client));
        Ok(())
    }

    pub(crate) fn settle_credits(
        &self,
        ctx: &mut Context<'_>,
        msg: &MsgSettleCredits,
    ) -> Result<(), FastError> {
        let mut client = self.get_client(&*ctx.kv, &msg.fast_client_public_key)?;
        require_role("admin", &client.admin_address, &msg.admin_address)?;

        client.settle(msg.amount)?;

        let coin = Coin::new(ctx.bank.bond_denom(), msg.amount);
        match msg.settle_type {
            SettleType::Burn => ctx.bank.burn_from_escrow(&coin)?,
            SettleType::Withdraw => ctx.bank.send_from_escrow(&msg.admin_address, &coin)?,
        }
        self.set_client(ctx.kv, &client)?;

        info!(
            fast_client_id = client.id,
            amount = %msg.amount,
            settle_type = ?msg.settle_type,
            "credits settled"
        );
        ctx.emit(FastEvent::SettleCredits {
            fast_client_id: client.id,
            fast_client_pubkey: client.public_key.clone(),
            settle_type: msg.settle_type,
            credits: msg.amount,
        });
        ctx.emit(FastEvent::FastClient(client));
        Ok(())
    }
}
