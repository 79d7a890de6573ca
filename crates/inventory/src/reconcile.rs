//! Reconciliation: from (snapshot, desired state, location, mode) to the ordered list of
//! transactions that moves stock to the user's target.
//!
//! Pure and total over its numeric domain. The only refusal is a submission with no
//! resolvable location; every numeric edge case yields a well-defined (possibly empty)
//! plan.
//!
//! Ordering contract for callers: relocation steps come first and must each be
//! acknowledged before the next is sent; the quantity step applies at the target
//! location after the move.

use pantry_core::{DomainError, DomainResult, LocationId};

use crate::adjustment::{Adjustment, QuantityChange};
use crate::intent::{IntentContext, TransactionIntent, TransactionKind};
use crate::snapshot::{DesiredState, StockSnapshot};

pub const MISSING_LOCATION: &str = "Please select a location before saving.";

/// What the operator asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionMode {
    /// Move stock to the desired quantity and location.
    #[default]
    Reconcile,
    /// Write off everything on hand. Ignores the desired quantity.
    Expire,
}

/// Which part of a plan a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Relocation,
    Quantity,
    Expiry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedIntent {
    pub phase: Phase,
    pub intent: TransactionIntent,
}

/// Everything reconciliation needs for one submission.
#[derive(Debug, Clone, Copy)]
pub struct ReconcileRequest<'a> {
    pub snapshot: &'a StockSnapshot,
    pub desired: &'a DesiredState,
    /// Where the item currently lives.
    pub origin_location: Option<LocationId>,
    /// Location chosen in the form, if any.
    pub form_location: Option<LocationId>,
    pub context: IntentContext,
    pub mode: SubmissionMode,
}

/// Ordered transactions for one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationPlan {
    adjustment: Adjustment,
    target_location: LocationId,
    steps: Vec<PlannedIntent>,
}

impl ReconciliationPlan {
    pub fn adjustment(&self) -> &Adjustment {
        &self.adjustment
    }

    pub fn target_location(&self) -> LocationId {
        self.target_location
    }

    pub fn steps(&self) -> &[PlannedIntent] {
        &self.steps
    }

    /// Intents in submission order.
    pub fn intents(&self) -> impl Iterator<Item = &TransactionIntent> {
        self.steps.iter().map(|s| &s.intent)
    }

    pub fn into_intents(self) -> Vec<TransactionIntent> {
        self.steps.into_iter().map(|s| s.intent).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// `true` when the quantity field held no usable number, so nothing was planned.
    pub fn no_change_requested(&self) -> bool {
        self.adjustment.is_incomplete() && self.steps.is_empty()
    }
}

/// Compute the plan for one submission.
pub fn reconcile(request: &ReconcileRequest<'_>) -> DomainResult<ReconciliationPlan> {
    let adjustment = Adjustment::compute(
        request.snapshot,
        request.desired,
        request.form_location,
        request.origin_location,
    );
    let target = adjustment
        .target_location
        .ok_or_else(|| DomainError::validation(MISSING_LOCATION))?;

    let steps = match request.mode {
        SubmissionMode::Expire => expiry_steps(&adjustment, target, request.context),
        SubmissionMode::Reconcile if adjustment.is_incomplete() => Vec::new(),
        SubmissionMode::Reconcile => {
            let mut steps = relocation_steps(&adjustment, request.origin_location, target, request.context);
            steps.extend(quantity_step(&adjustment, target, request.context));
            steps
        }
    };

    tracing::debug!(
        food_item_id = %request.context.food_item_id,
        mode = ?request.mode,
        delta = ?adjustment.delta_base_units,
        steps = steps.len(),
        "reconciliation planned"
    );

    Ok(ReconciliationPlan {
        adjustment,
        target_location: target,
        steps,
    })
}

fn relocation_steps(
    adjustment: &Adjustment,
    origin: Option<LocationId>,
    target: LocationId,
    context: IntentContext,
) -> Vec<PlannedIntent> {
    if origin == Some(target) {
        return Vec::new();
    }

    let on_hand = adjustment.current_base_units.max(0.0);
    let step = |kind, quantity, location| PlannedIntent {
        phase: Phase::Relocation,
        intent: TransactionIntent::new(kind, quantity, location, context),
    };

    match origin {
        Some(origin) if on_hand > 0.0 => vec![
            step(TransactionKind::TransferOut, on_hand, origin),
            step(TransactionKind::TransferIn, on_hand, target),
        ],
        // Nothing to move: still record the item's new home.
        _ => vec![step(TransactionKind::TransferIn, 0.0, target)],
    }
}

fn quantity_step(adjustment: &Adjustment, target: LocationId, context: IntentContext) -> Option<PlannedIntent> {
    let (kind, quantity) = match adjustment.quantity_change()? {
        QuantityChange::Increase(q) => (TransactionKind::Add, q),
        QuantityChange::Decrease(q) => (TransactionKind::Remove, q),
    };
    Some(PlannedIntent {
        phase: Phase::Quantity,
        intent: TransactionIntent::new(kind, quantity, target, context),
    })
}

fn expiry_steps(adjustment: &Adjustment, target: LocationId, context: IntentContext) -> Vec<PlannedIntent> {
    if adjustment.current_base_units <= 0.0 {
        return Vec::new();
    }
    vec![PlannedIntent {
        phase: Phase::Expiry,
        intent: TransactionIntent::new(TransactionKind::Expire, adjustment.current_base_units, target, context),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::PackageSizeSources;
    use pantry_core::{FoodItemId, UserId};
    use proptest::prelude::*;

    const A: LocationId = LocationId::new(1);
    const B: LocationId = LocationId::new(2);

    fn context() -> IntentContext {
        IntentContext::new(FoodItemId::new(10), UserId::new(20))
    }

    fn plan(
        snapshot: StockSnapshot,
        desired_packages: &str,
        origin: Option<LocationId>,
        form: Option<LocationId>,
        mode: SubmissionMode,
    ) -> DomainResult<ReconciliationPlan> {
        let sources = PackageSizeSources::for_form("", &snapshot, None);
        let desired = DesiredState::from_input(desired_packages, &sources);
        reconcile(&ReconcileRequest {
            snapshot: &snapshot,
            desired: &desired,
            origin_location: origin,
            form_location: form,
            context: context(),
            mode,
        })
    }

    fn summary(plan: &ReconciliationPlan) -> Vec<(TransactionKind, f64, LocationId)> {
        plan.intents().map(|i| (i.kind, i.quantity, i.location_id)).collect()
    }

    #[test]
    fn restock_at_same_location_adds_difference() {
        let plan = plan(StockSnapshot::new(10.0, 5.0), "5", Some(A), None, SubmissionMode::Reconcile).unwrap();

        assert_eq!(plan.adjustment().desired_base_units, Some(25.0));
        assert_eq!(plan.adjustment().delta_base_units, Some(15.0));
        assert_eq!(summary(&plan), vec![(TransactionKind::Add, 15.0, A)]);
        assert_eq!(plan.steps()[0].phase, Phase::Quantity);
    }

    #[test]
    fn reduce_and_relocate_moves_then_removes_at_target() {
        let plan = plan(StockSnapshot::new(20.0, 10.0), "1", Some(A), Some(B), SubmissionMode::Reconcile).unwrap();

        assert_eq!(
            summary(&plan),
            vec![
                (TransactionKind::TransferOut, 20.0, A),
                (TransactionKind::TransferIn, 20.0, B),
                (TransactionKind::Remove, 10.0, B),
            ]
        );
        assert_eq!(plan.target_location(), B);
    }

    #[test]
    fn pure_relocation_conserves_stock() {
        let plan = plan(StockSnapshot::new(8.0, 4.0), "2", Some(A), Some(B), SubmissionMode::Reconcile).unwrap();

        assert_eq!(
            summary(&plan),
            vec![(TransactionKind::TransferOut, 8.0, A), (TransactionKind::TransferIn, 8.0, B)]
        );
        assert!(plan.steps().iter().all(|s| s.phase == Phase::Relocation));
    }

    #[test]
    fn relocation_of_empty_stock_records_new_home() {
        let plan = plan(StockSnapshot::new(0.0, 4.0), "0", Some(A), Some(B), SubmissionMode::Reconcile).unwrap();
        assert_eq!(summary(&plan), vec![(TransactionKind::TransferIn, 0.0, B)]);
    }

    #[test]
    fn relocation_without_known_origin_records_new_home() {
        let plan = plan(StockSnapshot::new(6.0, 0.0), "6", None, Some(B), SubmissionMode::Reconcile).unwrap();
        assert_eq!(summary(&plan), vec![(TransactionKind::TransferIn, 0.0, B)]);
    }

    #[test]
    fn expire_writes_off_everything_on_hand() {
        let plan = plan(StockSnapshot::new(7.5, 0.0), "100", Some(A), Some(B), SubmissionMode::Expire).unwrap();
        assert_eq!(summary(&plan), vec![(TransactionKind::Expire, 7.5, B)]);
        assert_eq!(plan.steps()[0].phase, Phase::Expiry);
    }

    #[test]
    fn expire_with_nothing_on_hand_is_empty() {
        let plan = plan(StockSnapshot::empty(), "", Some(A), None, SubmissionMode::Expire).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn missing_location_is_refused() {
        let err = plan(StockSnapshot::new(3.0, 1.0), "4", None, None, SubmissionMode::Reconcile).unwrap_err();
        match err {
            DomainError::Validation(msg) if msg == MISSING_LOCATION => {}
            other => panic!("expected missing-location validation error, got {other:?}"),
        }
    }

    #[test]
    fn incomplete_quantity_plans_nothing_even_when_relocating() {
        let plan = plan(StockSnapshot::new(3.0, 1.0), "", Some(A), Some(B), SubmissionMode::Reconcile).unwrap();
        assert!(plan.is_empty());
        assert!(plan.no_change_requested());
    }

    #[test]
    fn zero_package_size_treats_packages_as_base_units() {
        let plan = plan(StockSnapshot::new(3.0, 0.0), "5", Some(A), None, SubmissionMode::Reconcile).unwrap();
        assert_eq!(summary(&plan), vec![(TransactionKind::Add, 2.0, A)]);
    }

    #[test]
    fn negative_desired_quantity_passes_through() {
        let plan = plan(StockSnapshot::new(2.0, 1.0), "-1", Some(A), None, SubmissionMode::Reconcile).unwrap();
        assert_eq!(summary(&plan), vec![(TransactionKind::Remove, 3.0, A)]);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: a desired quantity within the noise threshold of current stock
        /// never produces add/remove.
        #[test]
        fn noise_never_produces_quantity_intents(
            base in 0.0f64..10_000.0,
            size in 0.01f64..500.0,
            noise in -0.00009f64..0.00009,
        ) {
            let snapshot = StockSnapshot::new(base, size);
            let desired = DesiredState::new(
                Some((base + noise) / size),
                &PackageSizeSources::new(None, Some(size), None),
            );
            let plan = reconcile(&ReconcileRequest {
                snapshot: &snapshot,
                desired: &desired,
                origin_location: Some(A),
                form_location: None,
                context: context(),
                mode: SubmissionMode::Reconcile,
            }).unwrap();
            prop_assert!(plan.is_empty());
        }

        /// Property: relocating B > 0 base units emits exactly transfer_out(B) then
        /// transfer_in(B), and the quantity step never re-applies B.
        #[test]
        fn relocation_conserves_stock(
            base in 0.001f64..10_000.0,
            size in 0.01f64..500.0,
            desired_packages in 0.0f64..1_000.0,
        ) {
            let snapshot = StockSnapshot::new(base, size);
            let desired = DesiredState::new(
                Some(desired_packages),
                &PackageSizeSources::new(None, Some(size), None),
            );
            let plan = reconcile(&ReconcileRequest {
                snapshot: &snapshot,
                desired: &desired,
                origin_location: Some(A),
                form_location: Some(B),
                context: context(),
                mode: SubmissionMode::Reconcile,
            }).unwrap();

            let relocation: Vec<_> = plan.steps().iter().filter(|s| s.phase == Phase::Relocation).collect();
            prop_assert_eq!(relocation.len(), 2);
            prop_assert_eq!(relocation[0].intent.kind, TransactionKind::TransferOut);
            prop_assert_eq!(relocation[0].intent.location_id, A);
            prop_assert_eq!(relocation[0].intent.quantity, base);
            prop_assert_eq!(relocation[1].intent.kind, TransactionKind::TransferIn);
            prop_assert_eq!(relocation[1].intent.location_id, B);
            prop_assert_eq!(relocation[1].intent.quantity, base);

            // Whatever follows the move is the desired-minus-moved delta, at the target.
            let expected_delta = desired_packages * size - base;
            for step in plan.steps().iter().filter(|s| s.phase == Phase::Quantity) {
                prop_assert_eq!(step.intent.location_id, B);
                prop_assert!((step.intent.quantity - expected_delta.abs()).abs() < 1e-6);
            }
        }
    }
}
