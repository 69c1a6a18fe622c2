//! Assembles receipts (payment events with their allocation items).

use std::collections::HashMap;

use bursar_core::catalog::{FeeFrequency, month_label};
use bursar_core::reports::{CollectionAggregator, HistoryEvent, HistoryItem, PaymentHistoryEntry};
use bursar_shared::types::PaymentEventId;
use chrono::Utc;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::{fee_heads, fee_structures, payment_allocations, payment_events, users};

/// Display names of the given users.
pub async fn user_names<C: ConnectionTrait>(
    db: &C,
    user_ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, String>, DbErr> {
    let ids: Vec<Uuid> = user_ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(users::Entity::find()
        .filter(users::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u.full_name))
        .collect())
}

/// Loads allocation items for `events` and groups them, newest first.
pub async fn history_entries<C: ConnectionTrait>(
    db: &C,
    events: Vec<payment_events::Model>,
) -> Result<Vec<PaymentHistoryEntry>, DbErr> {
    if events.is_empty() {
        return Ok(Vec::new());
    }

    let event_ids: Vec<Uuid> = events.iter().map(|e| e.id).collect();
    let allocations = payment_allocations::Entity::find()
        .filter(payment_allocations::Column::PaymentEventId.is_in(event_ids))
        .all(db)
        .await?;

    let structure_ids: Vec<Uuid> = allocations.iter().map(|a| a.fee_structure_id).collect();
    let structures: HashMap<Uuid, fee_structures::Model> = fee_structures::Entity::find()
        .filter(fee_structures::Column::Id.is_in(structure_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    let head_ids: Vec<Uuid> = structures.values().map(|s| s.fee_head_id).collect();
    let head_names: HashMap<Uuid, String> = fee_heads::Entity::find()
        .filter(fee_heads::Column::Id.is_in(head_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|h| (h.id, h.name))
        .collect();

    let collectors = user_names(db, events.iter().map(|e| e.collected_by)).await?;

    let items = allocations
        .into_iter()
        .filter_map(|alloc| {
            let structure = structures.get(&alloc.fee_structure_id)?;
            let frequency = FeeFrequency::from(structure.frequency);
            Some((
                PaymentEventId::from(alloc.payment_event_id),
                HistoryItem {
                    fee_structure_id: alloc.fee_structure_id.into(),
                    head_name: head_names
                        .get(&structure.fee_head_id)
                        .cloned()
                        .unwrap_or_default(),
                    month_label: (frequency == FeeFrequency::Monthly)
                        .then(|| month_label(structure.due_date)),
                    amount_paid: alloc.amount_paid,
                },
            ))
        })
        .collect();

    let headers = events
        .into_iter()
        .map(|event| HistoryEvent {
            payment_event_id: event.id.into(),
            receipt_number: event.receipt_number,
            payment_date: event.payment_date.with_timezone(&Utc),
            mode: event.mode.into(),
            transaction_reference: event.transaction_reference,
            remarks: event.remarks,
            total_amount: event.total_amount,
            collected_by: collectors.get(&event.collected_by).cloned(),
        })
        .collect();

    Ok(CollectionAggregator::group_history(headers, items))
}
