//! Procurement from the shopping list and weekly stock-up.

use campaign_finances::{FinanceError, TransactionType};
use campaign_types::{Part, PartId, PersonnelRole, ReportCategory, ShoppingItem};
use rust_decimal::Decimal;
use tracing::debug;

use super::{PhaseError, TickContext};
use crate::report::ReportSink;
use crate::state::CampaignState;

/// Quality grade of procured parts.
const PROCURED_QUALITY: u8 = 3;

/// Attempt to acquire every item on the shopping list.
///
/// Requires an active logistics administrator. Each item rolls against the
/// acquisition chance; a success is paid for and shipped as a spare that
/// arrives after the configured delivery time. Items that fail the roll or
/// cannot be afforded stay on the list.
///
/// # Errors
///
/// Returns [`PhaseError::Finance`] if the ledger rejects a purchase for a
/// reason other than a shortfall.
pub fn procure(state: &mut CampaignState, ctx: &TickContext) -> Result<(), PhaseError> {
    if state.shopping_list.is_empty() {
        return Ok(());
    }
    if !state.has_active(PersonnelRole::AdminLogistics) {
        state.report(
            ReportCategory::Acquisitions,
            "No logistics administrator is available to work the shopping list.",
        );
        return Ok(());
    }

    let logistics = &ctx.options.logistics;
    let items = std::mem::take(&mut state.shopping_list);
    let mut remaining = Vec::with_capacity(items.len());
    let mut acquired = 0_usize;

    for item in items {
        if !state.roll_percent(logistics.acquisition_percent) {
            remaining.push(item);
            continue;
        }
        let total = item.cost.saturating_mul(Decimal::from(item.quantity));
        if total > Decimal::ZERO {
            let paid = state
                .finances
                .debit(
                    ctx.today,
                    TransactionType::Purchase,
                    total,
                    format!("Purchased {} x{}", item.name, item.quantity),
                )
                .map(|_| ());
            match paid {
                Ok(()) => {}
                Err(FinanceError::InsufficientFunds { needed, available }) => {
                    state.report(
                        ReportCategory::Acquisitions,
                        format!(
                            "Cannot afford {} x{}: {needed} due, {available} available.",
                            item.name, item.quantity
                        ),
                    );
                    remaining.push(item);
                    continue;
                }
                Err(source) => {
                    remaining.push(item);
                    state.shopping_list = remaining;
                    return Err(source.into());
                }
            }
        }

        let id = PartId::from_random_bytes(state.mint_bytes());
        let mut part = Part::spare(id, item.name.clone(), PROCURED_QUALITY, item.quantity);
        part.days_to_arrival = logistics.delivery_days;
        part.cost = item.cost;
        state.add_part(part);
        state.report(
            ReportCategory::Acquisitions,
            format!(
                "Found {} x{}; delivery in {} days.",
                item.name, item.quantity, logistics.delivery_days
            ),
        );
        acquired = acquired.saturating_add(1);
    }

    state.shopping_list = remaining;
    debug!(
        acquired,
        outstanding = state.shopping_list.len(),
        "Procurement pass complete"
    );
    Ok(())
}

/// Queue purchases that bring spare stock up to the configured targets.
///
/// Stock on hand, stock in transit and quantities already on the shopping
/// list all count toward a target.
pub fn stock_up(state: &mut CampaignState, ctx: &TickContext) {
    let mut queued = Vec::new();
    for target in &ctx.options.logistics.stock_targets {
        let held = state
            .parts
            .values()
            .filter(|part| part.is_spare() && !part.damaged && part.name == target.name)
            .fold(0_u32, |sum, part| sum.saturating_add(part.quantity));
        let listed = state
            .shopping_list
            .iter()
            .filter(|item| item.name == target.name)
            .fold(0_u32, |sum, item| sum.saturating_add(item.quantity));
        let deficit = target.quantity.saturating_sub(held.saturating_add(listed));
        if deficit > 0 {
            queued.push(ShoppingItem {
                name: target.name.clone(),
                quantity: deficit,
                cost: Decimal::from(target.cost),
            });
        }
    }

    for item in queued {
        let notice = format!("Added {} x{} to the shopping list.", item.name, item.quantity);
        state.shopping_list.push(item);
        state.report(ReportCategory::Acquisitions, notice);
    }
}
