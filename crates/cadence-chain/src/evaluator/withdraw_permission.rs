//! Withdraw permission state transitions
//!
//! The four evaluate/apply pairs for recurring withdrawal permissions.
//! Predicate order and the period-rollover arithmetic are consensus
//! rules; changing either forks the chain.

use crate::context::ChainContext;
use crate::database::Database;
use crate::evaluator::OperationEvaluator;
use crate::object::WithdrawPermission;
use crate::operations::{
    WithdrawPermissionClaim, WithdrawPermissionCreate, WithdrawPermissionDelete,
    WithdrawPermissionUpdate,
};
use cadence_core::{ensure, Error, Result, WithdrawPermissionId};
use tracing::debug;

/// Evaluator for [`WithdrawPermissionCreate`]
#[derive(Debug, Clone, Copy, Default)]
pub struct WithdrawPermissionCreateEvaluator;

impl OperationEvaluator for WithdrawPermissionCreateEvaluator {
    type Operation = WithdrawPermissionCreate;
    type Output = WithdrawPermissionId;

    fn evaluate(&self, db: &Database, ctx: &ChainContext, op: &Self::Operation) -> Result<()> {
        ensure!(
            db.find_account(op.withdraw_from_account).is_some(),
            "withdraw_from_account exists",
            op
        );
        ensure!(
            db.find_account(op.authorized_account).is_some(),
            "authorized_account exists",
            op
        );
        ensure!(
            db.find_asset(op.withdrawal_limit.asset_id).is_some(),
            "withdrawal_limit.asset_id exists",
            op
        );
        ensure!(
            op.period_start_time > ctx.head_block_time,
            "period_start_time > head_block_time",
            op
        );
        ensure!(
            op.expiration()? > ctx.head_block_time,
            "period_start_time + periods_until_expiration * withdrawal_period_sec > head_block_time",
            op
        );
        ensure!(
            op.withdrawal_period_sec >= ctx.min_withdrawal_period_sec(),
            "withdrawal_period_sec >= block_interval",
            op
        );
        Ok(())
    }

    fn apply(
        &self,
        db: &mut Database,
        _ctx: &ChainContext,
        op: &Self::Operation,
    ) -> Result<Self::Output> {
        let expiration = op.expiration()?;
        let id = db.withdraw_permissions.create(|_| WithdrawPermission {
            withdraw_from_account: op.withdraw_from_account,
            authorized_account: op.authorized_account,
            withdrawal_limit: op.withdrawal_limit,
            withdrawal_period_sec: op.withdrawal_period_sec,
            period_start_time: op.period_start_time,
            expiration,
            claimed_this_period: 0,
        });
        debug!(permission = %id, "created withdraw permission");
        Ok(id)
    }
}

/// Evaluator for [`WithdrawPermissionClaim`]
#[derive(Debug, Clone, Copy, Default)]
pub struct WithdrawPermissionClaimEvaluator;

impl OperationEvaluator for WithdrawPermissionClaimEvaluator {
    type Operation = WithdrawPermissionClaim;
    type Output = ();

    fn evaluate(&self, db: &Database, ctx: &ChainContext, op: &Self::Operation) -> Result<()> {
        ensure!(
            op.amount_to_withdraw.amount > 0,
            "amount_to_withdraw > 0",
            op
        );
        let permit = db.withdraw_permission(op.withdraw_permission)?;
        ensure!(
            permit.expiration > ctx.head_block_time,
            "permission has not expired",
            op
        );
        ensure!(
            permit.authorized_account == op.withdraw_to_account,
            "withdraw_to_account matches the permission's authorized_account",
            op
        );
        ensure!(
            permit.withdraw_from_account == op.withdraw_from_account,
            "withdraw_from_account matches the permission's withdraw_from_account",
            op
        );
        ensure!(
            op.amount_to_withdraw.asset_id == permit.withdrawal_limit.asset_id,
            "amount_to_withdraw is denominated in the permission's asset",
            op
        );
        ensure!(
            op.amount_to_withdraw.amount <= permit.available_this_period(ctx.head_block_time)?,
            "amount_to_withdraw <= available_this_period",
            op
        );
        ensure!(
            db.get_balance(op.withdraw_from_account, op.amount_to_withdraw.asset_id)
                >= op.amount_to_withdraw.amount,
            "withdraw_from_account balance >= amount_to_withdraw",
            op
        );

        let asset = db.asset(op.amount_to_withdraw.asset_id)?;
        if asset.is_transfer_restricted() {
            ensure!(
                asset.issuer == permit.authorized_account
                    || asset.issuer == permit.withdraw_from_account,
                "transfer-restricted asset: either endpoint is the issuer",
                op
            );
        }
        if asset.enforce_white_list() {
            let from = db.account(op.withdraw_from_account)?;
            let to = db.account(op.withdraw_to_account)?;
            ensure!(
                from.is_authorized_asset(op.amount_to_withdraw.asset_id, asset),
                "withdraw_from_account is whitelist-authorized for the asset",
                op
            );
            ensure!(
                to.is_authorized_asset(op.amount_to_withdraw.asset_id, asset),
                "withdraw_to_account is whitelist-authorized for the asset",
                op
            );
        }
        Ok(())
    }

    fn apply(
        &self,
        db: &mut Database,
        ctx: &ChainContext,
        op: &Self::Operation,
    ) -> Result<Self::Output> {
        let now = ctx.head_block_time;
        db.withdraw_permissions
            .modify(op.withdraw_permission, |p| -> Result<()> {
                let periods = p.elapsed_periods(now)?;
                if periods > 0 {
                    // Rolled over at least once: the counter collapses to
                    // exactly this claim, regardless of how many periods
                    // were skipped. Unused past-period allowance does not
                    // carry over.
                    let advance = periods.checked_mul(p.withdrawal_period_sec).ok_or_else(
                        || Error::internal("overflow advancing withdrawal period start"),
                    )?;
                    p.period_start_time =
                        p.period_start_time.checked_add_secs(advance).ok_or_else(|| {
                            Error::internal("overflow advancing withdrawal period start")
                        })?;
                    p.claimed_this_period = op.amount_to_withdraw.amount;
                } else {
                    p.claimed_this_period = p
                        .claimed_this_period
                        .checked_add(op.amount_to_withdraw.amount)
                        .ok_or_else(|| {
                            Error::internal("overflow accumulating claimed_this_period")
                        })?;
                }
                Ok(())
            })??;

        // Debit and credit form an atomic pair; a failure in either is a
        // contract breach since evaluate proved solvency.
        let debit = op
            .amount_to_withdraw
            .negated()
            .ok_or_else(|| Error::internal("overflow negating amount_to_withdraw"))?;
        db.adjust_balance(op.withdraw_from_account, debit)?;
        db.adjust_balance(op.withdraw_to_account, op.amount_to_withdraw)?;
        debug!(
            permission = %op.withdraw_permission,
            amount = %op.amount_to_withdraw,
            "claimed against withdraw permission"
        );
        Ok(())
    }
}

/// Evaluator for [`WithdrawPermissionUpdate`]
#[derive(Debug, Clone, Copy, Default)]
pub struct WithdrawPermissionUpdateEvaluator;

impl OperationEvaluator for WithdrawPermissionUpdateEvaluator {
    type Operation = WithdrawPermissionUpdate;
    type Output = ();

    fn evaluate(&self, db: &Database, ctx: &ChainContext, op: &Self::Operation) -> Result<()> {
        let permit = db.withdraw_permission(op.permission_to_update)?;
        ensure!(
            permit.authorized_account == op.authorized_account,
            "authorized_account matches the permission's authorized_account",
            op
        );
        ensure!(
            permit.withdraw_from_account == op.withdraw_from_account,
            "withdraw_from_account matches the permission's withdraw_from_account",
            op
        );
        ensure!(
            db.find_asset(op.withdrawal_limit.asset_id).is_some(),
            "withdrawal_limit.asset_id exists",
            op
        );
        ensure!(
            op.period_start_time >= ctx.head_block_time,
            "period_start_time >= head_block_time",
            op
        );
        ensure!(
            op.expiration()? > ctx.head_block_time,
            "period_start_time + periods_until_expiration * withdrawal_period_sec > head_block_time",
            op
        );
        ensure!(
            op.withdrawal_period_sec >= ctx.min_withdrawal_period_sec(),
            "withdrawal_period_sec >= block_interval",
            op
        );
        Ok(())
    }

    fn apply(
        &self,
        db: &mut Database,
        _ctx: &ChainContext,
        op: &Self::Operation,
    ) -> Result<Self::Output> {
        let expiration = op.expiration()?;
        // claimed_this_period is deliberately untouched; only claims and
        // rollovers move it.
        db.withdraw_permissions.modify(op.permission_to_update, |p| {
            p.period_start_time = op.period_start_time;
            p.expiration = expiration;
            p.withdrawal_limit = op.withdrawal_limit;
            p.withdrawal_period_sec = op.withdrawal_period_sec;
        })?;
        debug!(permission = %op.permission_to_update, "updated withdraw permission");
        Ok(())
    }
}

/// Evaluator for [`WithdrawPermissionDelete`]
#[derive(Debug, Clone, Copy, Default)]
pub struct WithdrawPermissionDeleteEvaluator;

impl OperationEvaluator for WithdrawPermissionDeleteEvaluator {
    type Operation = WithdrawPermissionDelete;
    type Output = ();

    fn evaluate(&self, db: &Database, _ctx: &ChainContext, op: &Self::Operation) -> Result<()> {
        let permit = db.withdraw_permission(op.withdrawal_permission)?;
        ensure!(
            permit.authorized_account == op.authorized_account,
            "authorized_account matches the permission's authorized_account",
            op
        );
        ensure!(
            permit.withdraw_from_account == op.withdraw_from_account,
            "withdraw_from_account matches the permission's withdraw_from_account",
            op
        );
        Ok(())
    }

    fn apply(
        &self,
        db: &mut Database,
        _ctx: &ChainContext,
        op: &Self::Operation,
    ) -> Result<Self::Output> {
        db.withdraw_permissions.remove(op.withdrawal_permission)?;
        debug!(permission = %op.withdrawal_permission, "deleted withdraw permission");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::{AccountId, AssetAmount, AssetId, ChainParameters, ChainTime, ObjectId};

    fn test_context(head_secs: u64) -> ChainContext {
        ChainContext::new(ChainTime::from_secs(head_secs), ChainParameters::default())
    }

    fn seeded_db() -> (Database, cadence_core::AccountId, cadence_core::AccountId, cadence_core::AssetId)
    {
        let mut db = Database::new();
        let alice = db.create_account("alice");
        let bob = db.create_account("bob");
        let core = db.create_asset("CORE", alice, false, false);
        db.adjust_balance(alice, AssetAmount::new(1_000, core))
            .expect("seed balance");
        (db, alice, bob, core)
    }

    fn create_op(
        from: cadence_core::AccountId,
        to: cadence_core::AccountId,
        asset: cadence_core::AssetId,
    ) -> WithdrawPermissionCreate {
        WithdrawPermissionCreate {
            withdraw_from_account: from,
            authorized_account: to,
            withdrawal_limit: AssetAmount::new(100, asset),
            withdrawal_period_sec: 3_600,
            period_start_time: ChainTime::from_secs(1_010),
            periods_until_expiration: 2,
        }
    }

    #[test]
    fn create_rejects_past_period_start() {
        let (db, alice, bob, core) = seeded_db();
        let ctx = test_context(1_010);
        let op = create_op(alice, bob, core);

        let err = WithdrawPermissionCreateEvaluator
            .evaluate(&db, &ctx, &op)
            .unwrap_err();
        match err {
            Error::Validation { predicate, .. } => {
                assert_eq!(predicate, "period_start_time > head_block_time");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn create_rejects_sub_block_interval_period() {
        let (db, alice, bob, core) = seeded_db();
        let ctx = test_context(1_000);
        let op = WithdrawPermissionCreate {
            withdrawal_period_sec: 4,
            ..create_op(alice, bob, core)
        };

        assert!(WithdrawPermissionCreateEvaluator
            .evaluate(&db, &ctx, &op)
            .is_err());
    }

    #[test]
    fn create_rejects_unknown_accounts_and_assets() {
        let (db, alice, bob, core) = seeded_db();
        let ctx = test_context(1_000);

        let op = WithdrawPermissionCreate {
            authorized_account: AccountId::from_sequence(99),
            ..create_op(alice, bob, core)
        };
        assert!(WithdrawPermissionCreateEvaluator
            .evaluate(&db, &ctx, &op)
            .is_err());

        let op = WithdrawPermissionCreate {
            withdrawal_limit: AssetAmount::new(100, AssetId::from_sequence(99)),
            ..create_op(alice, bob, core)
        };
        assert!(WithdrawPermissionCreateEvaluator
            .evaluate(&db, &ctx, &op)
            .is_err());
    }

    #[test]
    fn create_apply_zeroes_the_claim_counter() {
        let (mut db, alice, bob, core) = seeded_db();
        let ctx = test_context(1_000);
        let op = create_op(alice, bob, core);

        WithdrawPermissionCreateEvaluator
            .evaluate(&db, &ctx, &op)
            .expect("valid create");
        let id = WithdrawPermissionCreateEvaluator
            .apply(&mut db, &ctx, &op)
            .expect("apply create");

        let permit = db.withdraw_permission(id).expect("permission stored");
        assert_eq!(permit.claimed_this_period, 0);
        assert_eq!(permit.expiration, ChainTime::from_secs(1_010 + 2 * 3_600));
        assert_eq!(permit.period_start_time, ChainTime::from_secs(1_010));
    }

    #[test]
    fn claim_requires_exact_account_match() {
        let (mut db, alice, bob, core) = seeded_db();
        let ctx = test_context(1_000);
        let op = create_op(alice, bob, core);
        let id = WithdrawPermissionCreateEvaluator
            .apply(&mut db, &ctx, &op)
            .expect("apply create");

        // bob redirecting the payout to a third account must fail even
        // though the permission itself is valid.
        let mallory = db.create_account("mallory");
        let claim = WithdrawPermissionClaim {
            withdraw_permission: id,
            withdraw_from_account: alice,
            withdraw_to_account: mallory,
            amount_to_withdraw: AssetAmount::new(10, core),
        };
        let err = WithdrawPermissionClaimEvaluator
            .evaluate(&db, &test_context(1_020), &claim)
            .unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn claim_rejects_non_positive_amounts() {
        let (mut db, alice, bob, core) = seeded_db();
        let ctx = test_context(1_000);
        let id = WithdrawPermissionCreateEvaluator
            .apply(&mut db, &ctx, &create_op(alice, bob, core))
            .expect("apply create");

        // A negative claim would move funds from bob back to alice and
        // set a negative counter; zero is equally meaningless.
        for amount in [-500, 0] {
            let claim = WithdrawPermissionClaim {
                withdraw_permission: id,
                withdraw_from_account: alice,
                withdraw_to_account: bob,
                amount_to_withdraw: AssetAmount::new(amount, core),
            };
            let err = WithdrawPermissionClaimEvaluator
                .evaluate(&db, &test_context(1_020), &claim)
                .unwrap_err();
            match err {
                Error::Validation { predicate, .. } => {
                    assert_eq!(predicate, "amount_to_withdraw > 0");
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn claim_rejects_wrong_asset_denomination() {
        let (mut db, alice, bob, core) = seeded_db();
        let ctx = test_context(1_000);
        let other = db.create_asset("OTHER", alice, false, false);
        let id = WithdrawPermissionCreateEvaluator
            .apply(&mut db, &ctx, &create_op(alice, bob, core))
            .expect("apply create");

        let claim = WithdrawPermissionClaim {
            withdraw_permission: id,
            withdraw_from_account: alice,
            withdraw_to_account: bob,
            amount_to_withdraw: AssetAmount::new(10, other),
        };
        assert!(WithdrawPermissionClaimEvaluator
            .evaluate(&db, &test_context(1_020), &claim)
            .is_err());
    }

    #[test]
    fn claim_respects_transfer_restriction() {
        let mut db = Database::new();
        let issuer = db.create_account("issuer");
        let alice = db.create_account("alice");
        let bob = db.create_account("bob");
        let restricted = db.create_asset("RSTR", issuer, true, false);
        db.adjust_balance(alice, AssetAmount::new(1_000, restricted))
            .expect("seed balance");

        let ctx = test_context(1_000);
        let op = WithdrawPermissionCreate {
            withdrawal_limit: AssetAmount::new(100, restricted),
            ..create_op(alice, bob, restricted)
        };
        let id = WithdrawPermissionCreateEvaluator
            .apply(&mut db, &ctx, &op)
            .expect("apply create");

        // Neither endpoint is the issuer.
        let claim = WithdrawPermissionClaim {
            withdraw_permission: id,
            withdraw_from_account: alice,
            withdraw_to_account: bob,
            amount_to_withdraw: AssetAmount::new(10, restricted),
        };
        assert!(WithdrawPermissionClaimEvaluator
            .evaluate(&db, &test_context(1_020), &claim)
            .is_err());
    }

    #[test]
    fn claim_enforces_whitelist_on_both_endpoints() {
        let mut db = Database::new();
        let issuer = db.create_account("issuer");
        let alice = db.create_account("alice");
        let bob = db.create_account("bob");
        let gated = db.create_asset("GATE", issuer, false, true);
        db.adjust_balance(alice, AssetAmount::new(1_000, gated))
            .expect("seed balance");

        let ctx = test_context(1_000);
        let op = WithdrawPermissionCreate {
            withdrawal_limit: AssetAmount::new(100, gated),
            ..create_op(alice, bob, gated)
        };
        let id = WithdrawPermissionCreateEvaluator
            .apply(&mut db, &ctx, &op)
            .expect("apply create");

        let claim = WithdrawPermissionClaim {
            withdraw_permission: id,
            withdraw_from_account: alice,
            withdraw_to_account: bob,
            amount_to_withdraw: AssetAmount::new(10, gated),
        };
        let eval_ctx = test_context(1_020);

        assert!(WithdrawPermissionClaimEvaluator
            .evaluate(&db, &eval_ctx, &claim)
            .is_err());

        db.authorize_asset(alice, gated).expect("authorize alice");
        assert!(WithdrawPermissionClaimEvaluator
            .evaluate(&db, &eval_ctx, &claim)
            .is_err());

        db.authorize_asset(bob, gated).expect("authorize bob");
        assert!(WithdrawPermissionClaimEvaluator
            .evaluate(&db, &eval_ctx, &claim)
            .is_ok());
    }

    #[test]
    fn claim_fails_after_expiration() {
        let (mut db, alice, bob, core) = seeded_db();
        let ctx = test_context(1_000);
        let id = WithdrawPermissionCreateEvaluator
            .apply(&mut db, &ctx, &create_op(alice, bob, core))
            .expect("apply create");

        let claim = WithdrawPermissionClaim {
            withdraw_permission: id,
            withdraw_from_account: alice,
            withdraw_to_account: bob,
            amount_to_withdraw: AssetAmount::new(10, core),
        };
        // expiration = 1_010 + 2 * 3_600 = 8_210; claims at or past it fail
        assert!(WithdrawPermissionClaimEvaluator
            .evaluate(&db, &test_context(8_210), &claim)
            .is_err());
        assert!(WithdrawPermissionClaimEvaluator
            .evaluate(&db, &test_context(8_209), &claim)
            .is_ok());
    }

    #[test]
    fn update_cannot_redirect_the_permission() {
        let (mut db, alice, bob, core) = seeded_db();
        let ctx = test_context(1_000);
        let id = WithdrawPermissionCreateEvaluator
            .apply(&mut db, &ctx, &create_op(alice, bob, core))
            .expect("apply create");

        let mallory = db.create_account("mallory");
        let update = WithdrawPermissionUpdate {
            permission_to_update: id,
            withdraw_from_account: alice,
            authorized_account: mallory,
            withdrawal_limit: AssetAmount::new(50, core),
            withdrawal_period_sec: 3_600,
            period_start_time: ChainTime::from_secs(2_000),
            periods_until_expiration: 2,
        };
        assert!(WithdrawPermissionUpdateEvaluator
            .evaluate(&db, &test_context(1_500), &update)
            .is_err());
    }

    #[test]
    fn update_allows_period_start_equal_to_head_time() {
        let (mut db, alice, bob, core) = seeded_db();
        let ctx = test_context(1_000);
        let id = WithdrawPermissionCreateEvaluator
            .apply(&mut db, &ctx, &create_op(alice, bob, core))
            .expect("apply create");

        let update = WithdrawPermissionUpdate {
            permission_to_update: id,
            withdraw_from_account: alice,
            authorized_account: bob,
            withdrawal_limit: AssetAmount::new(50, core),
            withdrawal_period_sec: 3_600,
            period_start_time: ChainTime::from_secs(1_500),
            periods_until_expiration: 1,
        };
        assert!(WithdrawPermissionUpdateEvaluator
            .evaluate(&db, &test_context(1_500), &update)
            .is_ok());
    }

    #[test]
    fn update_preserves_claimed_this_period() {
        let (mut db, alice, bob, core) = seeded_db();
        let ctx = test_context(1_000);
        let id = WithdrawPermissionCreateEvaluator
            .apply(&mut db, &ctx, &create_op(alice, bob, core))
            .expect("apply create");

        let claim = WithdrawPermissionClaim {
            withdraw_permission: id,
            withdraw_from_account: alice,
            withdraw_to_account: bob,
            amount_to_withdraw: AssetAmount::new(30, core),
        };
        let claim_ctx = test_context(1_020);
        WithdrawPermissionClaimEvaluator
            .evaluate(&db, &claim_ctx, &claim)
            .expect("valid claim");
        WithdrawPermissionClaimEvaluator
            .apply(&mut db, &claim_ctx, &claim)
            .expect("apply claim");

        let update = WithdrawPermissionUpdate {
            permission_to_update: id,
            withdraw_from_account: alice,
            authorized_account: bob,
            withdrawal_limit: AssetAmount::new(200, core),
            withdrawal_period_sec: 7_200,
            period_start_time: ChainTime::from_secs(2_000),
            periods_until_expiration: 3,
        };
        let update_ctx = test_context(1_900);
        WithdrawPermissionUpdateEvaluator
            .evaluate(&db, &update_ctx, &update)
            .expect("valid update");
        WithdrawPermissionUpdateEvaluator
            .apply(&mut db, &update_ctx, &update)
            .expect("apply update");

        let permit = db.withdraw_permission(id).expect("permission stored");
        assert_eq!(permit.claimed_this_period, 30);
        assert_eq!(permit.withdrawal_limit.amount, 200);
        assert_eq!(permit.withdrawal_period_sec, 7_200);
        assert_eq!(permit.expiration, ChainTime::from_secs(2_000 + 3 * 7_200));
    }

    #[test]
    fn delete_requires_exact_account_match_and_removes_the_row() {
        let (mut db, alice, bob, core) = seeded_db();
        let ctx = test_context(1_000);
        let id = WithdrawPermissionCreateEvaluator
            .apply(&mut db, &ctx, &create_op(alice, bob, core))
            .expect("apply create");

        let mallory = db.create_account("mallory");
        let bad = WithdrawPermissionDelete {
            withdrawal_permission: id,
            withdraw_from_account: alice,
            authorized_account: mallory,
        };
        assert!(WithdrawPermissionDeleteEvaluator
            .evaluate(&db, &ctx, &bad)
            .is_err());
        // Store unchanged after the rejected delete.
        assert!(db.withdraw_permission(id).is_ok());

        let good = WithdrawPermissionDelete {
            withdrawal_permission: id,
            withdraw_from_account: alice,
            authorized_account: bob,
        };
        WithdrawPermissionDeleteEvaluator
            .evaluate(&db, &ctx, &good)
            .expect("valid delete");
        WithdrawPermissionDeleteEvaluator
            .apply(&mut db, &ctx, &good)
            .expect("apply delete");
        assert!(db.withdraw_permission(id).is_err());
    }
}
