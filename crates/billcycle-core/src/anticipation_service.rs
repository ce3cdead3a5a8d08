//! Anticipation: pulling unpaid future installments into an earlier statement.
//!
//! A moved installment keeps its provenance. `original_statement` is set once
//! and survives any number of moves, while `anticipated_from` records the
//! statement of the latest move. Invoice amounts are never adjusted here; both
//! statements pick up the change the next time they are read.

use tracing::{debug, info};
use uuid::Uuid;

use billcycle_domain::{Book, CreditCard};

use crate::{
    cycle_service::{CycleService, OpenStatement},
    Clock, CoreError,
};

/// Outcome of [`AnticipationService::anticipate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnticipationReport {
    pub moved: usize,
    pub skipped: usize,
    pub target: OpenStatement,
}

pub struct AnticipationService;

impl AnticipationService {
    /// The statement anticipated installments move into: the one still open
    /// for changes on `clock`'s current day.
    pub fn suggest_target(
        card: &CreditCard,
        clock: &dyn Clock,
    ) -> Result<OpenStatement, CoreError> {
        CycleService::open_statement(card, clock.today())
    }

    /// Moves the listed installments of `purchase_id` into the suggested target statement.
    ///
    /// Paid installments and installments already on or before the target are
    /// counted as skipped. An installment without a statement aborts the whole
    /// request and nothing is changed.
    pub fn anticipate(
        book: &mut Book,
        purchase_id: Uuid,
        installment_ids: &[Uuid],
        clock: &dyn Clock,
    ) -> Result<AnticipationReport, CoreError> {
        if installment_ids.is_empty() {
            return Err(CoreError::Validation(
                "at least one installment id is required".into(),
            ));
        }
        let purchase = book
            .purchase(purchase_id)
            .ok_or_else(|| CoreError::not_found("purchase", purchase_id))?;
        let card = book
            .card(purchase.card_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("card", purchase.card_id))?;
        let target = Self::suggest_target(&card, clock)?;
        let now = clock.now();

        let report = book.transact(|draft| -> Result<AnticipationReport, CoreError> {
            let mut report = AnticipationReport {
                moved: 0,
                skipped: 0,
                target,
            };
            for &id in installment_ids {
                let installment = draft
                    .installment_mut(id)
                    .filter(|installment| installment.purchase_id == purchase_id)
                    .ok_or_else(|| CoreError::not_found("installment", id))?;
                if installment.paid {
                    debug!(installment = %id, "paid installment not anticipated");
                    report.skipped += 1;
                    continue;
                }
                let current = installment.statement.ok_or_else(|| {
                    CoreError::Precondition(format!(
                        "installment {id} has no statement; run the statement backfill first"
                    ))
                })?;
                if current <= target.statement {
                    debug!(installment = %id, %current, "installment already on or before target");
                    report.skipped += 1;
                    continue;
                }
                installment.remember_original_statement(current);
                installment.anticipated_at = Some(now);
                installment.anticipated_from = Some(current);
                installment.statement = Some(target.statement);
                installment.due_date = CycleService::due_date_for(&card, target.statement);
                report.moved += 1;
            }
            Ok(report)
        })?;

        info!(
            purchase = %purchase_id,
            moved = report.moved,
            skipped = report.skipped,
            target = %report.target.statement,
            "installments anticipated"
        );
        Ok(report)
    }
}
