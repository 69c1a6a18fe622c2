//! Collection aggregation.

use std::collections::{BTreeMap, HashMap};

use bursar_shared::types::{PaymentEventId, round_money};
use chrono::{NaiveDate, Timelike};
use chrono_tz::Tz;
use rust_decimal::Decimal;

use super::types::{
    BalanceStatement, ClassTotal, CollectionBreakdown, CollectionRecord, CollectionReport,
    DailyEntry, DailyReport, DateRange, DayTotal, GroupBy, HeadSubtotal, HistoryEvent,
    HistoryItem, HourBreakdown, HourTotal, HourWindow, ModeTotal, PaymentHistoryEntry,
    StatementTotals, UNKNOWN_CLASS,
};
use crate::ledger::StudentLedger;
use crate::payment::PaymentMode;

/// Sum and count accumulator.
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    amount: Decimal,
    count: u32,
}

impl Tally {
    fn add(&mut self, amount: Decimal) {
        self.amount += amount;
        self.count += 1;
    }
}

/// Pure reporting over persisted payment events.
pub struct CollectionAggregator;

impl CollectionAggregator {
    /// Totals per payment mode, in fixed mode order; modes with no payments
    /// are omitted.
    #[must_use]
    pub fn by_mode(records: &[CollectionRecord]) -> Vec<ModeTotal> {
        let mut tallies: HashMap<PaymentMode, Tally> = HashMap::new();
        for record in records {
            tallies.entry(record.mode).or_default().add(record.total_amount);
        }
        let grand_total = Self::total(records);

        PaymentMode::ALL
            .into_iter()
            .filter_map(|mode| {
                tallies.get(&mode).map(|tally| ModeTotal {
                    mode,
                    amount: tally.amount,
                    count: tally.count,
                    share: Self::share(tally.amount, grand_total),
                })
            })
            .collect()
    }

    /// Totals per local hour within `window`; everything else is summed into
    /// `outside_window`.
    #[must_use]
    pub fn by_hour(records: &[CollectionRecord], tz: Tz, window: HourWindow) -> HourBreakdown {
        let mut hours: BTreeMap<u32, Tally> = (window.start()..=window.end())
            .map(|h| (h, Tally::default()))
            .collect();
        let mut outside = Tally::default();

        for record in records {
            let hour = record.payment_date.with_timezone(&tz).hour();
            if window.contains(hour) {
                hours.entry(hour).or_default().add(record.total_amount);
            } else {
                outside.add(record.total_amount);
            }
        }

        HourBreakdown {
            buckets: hours
                .into_iter()
                .map(|(hour, tally)| HourTotal {
                    hour,
                    label: format!("{hour:02}:00"),
                    amount: tally.amount,
                    count: tally.count,
                })
                .collect(),
            outside_window: outside.amount,
            outside_window_count: outside.count,
        }
    }

    /// Totals per current class label, alphabetical with "Unknown" last.
    #[must_use]
    pub fn by_class(records: &[CollectionRecord]) -> Vec<ClassTotal> {
        let mut classes: BTreeMap<String, Tally> = BTreeMap::new();
        let mut unknown = Tally::default();
        for record in records {
            match &record.class_label {
                Some(label) => classes
                    .entry(label.clone())
                    .or_default()
                    .add(record.total_amount),
                None => unknown.add(record.total_amount),
            }
        }

        let mut totals: Vec<ClassTotal> = classes
            .into_iter()
            .map(|(class_label, tally)| ClassTotal {
                class_label,
                amount: tally.amount,
                count: tally.count,
            })
            .collect();
        if unknown.count > 0 {
            totals.push(ClassTotal {
                class_label: UNKNOWN_CLASS.to_string(),
                amount: unknown.amount,
                count: unknown.count,
            });
        }
        totals
    }

    /// Totals per local calendar date, ascending.
    #[must_use]
    pub fn by_day(records: &[CollectionRecord], tz: Tz) -> Vec<DayTotal> {
        let mut days: BTreeMap<NaiveDate, Tally> = BTreeMap::new();
        for record in records {
            let date = record.payment_date.with_timezone(&tz).date_naive();
            days.entry(date).or_default().add(record.total_amount);
        }
        days.into_iter()
            .map(|(date, tally)| DayTotal {
                date,
                amount: tally.amount,
                count: tally.count,
            })
            .collect()
    }

    /// Builds a grouped collection report over `range`.
    #[must_use]
    pub fn collection_report(
        range: DateRange,
        group_by: GroupBy,
        records: &[CollectionRecord],
        tz: Tz,
        window: HourWindow,
    ) -> CollectionReport {
        let breakdown = match group_by {
            GroupBy::Mode => CollectionBreakdown::Mode(Self::by_mode(records)),
            GroupBy::Hour => CollectionBreakdown::Hour(Self::by_hour(records, tz, window)),
            GroupBy::Class => CollectionBreakdown::Class(Self::by_class(records)),
            GroupBy::Day => CollectionBreakdown::Day(Self::by_day(records, tz)),
        };
        CollectionReport {
            from: range.from,
            to: range.to,
            total_amount: Self::total(records),
            payment_count: Self::count(records),
            breakdown,
        }
    }

    /// Lists every payment in `range` in time order, with totals.
    #[must_use]
    pub fn daily_report(range: DateRange, records: &[CollectionRecord], tz: Tz) -> DailyReport {
        let mut sorted: Vec<&CollectionRecord> = records.iter().collect();
        sorted.sort_by(|a, b| {
            a.payment_date
                .cmp(&b.payment_date)
                .then_with(|| a.receipt_number.cmp(&b.receipt_number))
        });

        let entries = sorted
            .into_iter()
            .map(|record| DailyEntry {
                payment_event_id: record.payment_event_id,
                receipt_number: record.receipt_number.clone(),
                student_id: record.student_id,
                student_name: record.student_name.clone(),
                admission_no: record.admission_no.clone(),
                class_label: record
                    .class_label
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_CLASS.to_string()),
                mode: record.mode,
                transaction_reference: record.transaction_reference.clone(),
                amount: record.total_amount,
                paid_at: record.payment_date.with_timezone(&tz).naive_local(),
                collected_by: record.collected_by.clone(),
            })
            .collect();

        DailyReport {
            from: range.from,
            to: range.to,
            entries,
            total_amount: Self::total(records),
            payment_count: Self::count(records),
            by_mode: Self::by_mode(records),
        }
    }

    /// Attaches allocation items to their events, newest event first.
    ///
    /// Items whose event is not in `events` are dropped.
    #[must_use]
    pub fn group_history(
        events: Vec<HistoryEvent>,
        items: Vec<(PaymentEventId, HistoryItem)>,
    ) -> Vec<PaymentHistoryEntry> {
        let mut by_event: HashMap<PaymentEventId, Vec<HistoryItem>> = HashMap::new();
        for (event_id, item) in items {
            by_event.entry(event_id).or_default().push(item);
        }

        let mut entries: Vec<PaymentHistoryEntry> = events
            .into_iter()
            .map(|event| PaymentHistoryEntry {
                items: by_event.remove(&event.payment_event_id).unwrap_or_default(),
                payment_event_id: event.payment_event_id,
                receipt_number: event.receipt_number,
                payment_date: event.payment_date,
                mode: event.mode,
                transaction_reference: event.transaction_reference,
                remarks: event.remarks,
                total_amount: event.total_amount,
                collected_by: event.collected_by,
            })
            .collect();
        entries.sort_by(|a, b| {
            b.payment_date
                .cmp(&a.payment_date)
                .then_with(|| b.payment_event_id.cmp(&a.payment_event_id))
        });
        entries
    }

    /// Combines a ledger with its payment history.
    #[must_use]
    pub fn balance_statement(
        ledger: &StudentLedger,
        payments: Vec<PaymentHistoryEntry>,
    ) -> BalanceStatement {
        let mut heads: Vec<HeadSubtotal> = Vec::new();
        for group in &ledger.heads {
            match heads.iter_mut().find(|h| h.fee_head_id == group.fee_head_id) {
                Some(head) => {
                    head.amount += group.amount;
                    head.total_paid += group.total_paid;
                    head.balance += group.balance;
                }
                None => heads.push(HeadSubtotal {
                    fee_head_id: group.fee_head_id,
                    head_name: group.head_name.clone(),
                    amount: group.amount,
                    total_paid: group.total_paid,
                    balance: group.balance,
                }),
            }
        }

        let mut lines: Vec<_> = ledger.lines().cloned().collect();
        lines.sort_by(|a, b| {
            a.due_date
                .cmp(&b.due_date)
                .then_with(|| a.head_name.cmp(&b.head_name))
        });

        BalanceStatement {
            student_id: ledger.student_id,
            academic_year_id: ledger.academic_year_id,
            lines,
            heads,
            totals: StatementTotals {
                total_demand: ledger.summary.total_demand,
                total_paid: ledger.summary.total_paid,
                total_balance: ledger.summary.total_due,
            },
            payments,
        }
    }

    fn total(records: &[CollectionRecord]) -> Decimal {
        records.iter().map(|r| r.total_amount).sum()
    }

    fn count(records: &[CollectionRecord]) -> u32 {
        u32::try_from(records.len()).unwrap_or(u32::MAX)
    }

    fn share(amount: Decimal, total: Decimal) -> Decimal {
        if total.is_zero() {
            Decimal::ZERO
        } else {
            round_money(amount / total * Decimal::ONE_HUNDRED)
        }
    }
}
