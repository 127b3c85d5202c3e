//! Pairwise settlement: who pays whom how much.
//!
//! Greedy matching of the largest remaining creditor against the largest
//! remaining debtor. Output is deterministic: amounts sort descending and
//! ties break on roster declaration order, so the same balances always
//! produce the same transfer list, byte for byte.
use serde::Serialize;

use crate::{ledger::Ledger, money::MoneyWon, roster::MemberId, stats::MemberBalance};

/// A directed transfer that resolves part of the group's balances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Transfer {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: MoneyWon,
}

/// One transfer as seen from a single member's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SettlementLine {
    pub direction: Direction,
    pub counterpart: MemberId,
    pub amount: MoneyWon,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Send,
    Receive,
}

#[derive(Clone, Copy)]
struct Party {
    member: MemberId,
    remaining: i64,
}

/// Nets the members' diffs to zero with greedy largest-against-largest
/// matching.
///
/// Floor-division shares leave the summed diffs with a small non-negative
/// remainder, so the debtor side exhausts first; whatever the creditors still
/// hold at that point is dropped silently rather than billed to anyone.
#[must_use]
pub fn settle(balances: &[MemberBalance]) -> Vec<Transfer> {
    let mut creditors: Vec<Party> = balances
        .iter()
        .filter(|balance| balance.diff.is_positive())
        .map(|balance| Party {
            member: balance.member,
            remaining: balance.diff.won(),
        })
        .collect();
    let mut debtors: Vec<Party> = balances
        .iter()
        .filter(|balance| balance.diff.is_negative())
        .map(|balance| Party {
            member: balance.member,
            remaining: -balance.diff.won(),
        })
        .collect();

    let mut transfers = Vec::new();
    while !creditors.is_empty() && !debtors.is_empty() {
        let creditor = largest(&creditors);
        let debtor = largest(&debtors);
        let amount = creditors[creditor]
            .remaining
            .min(debtors[debtor].remaining);

        transfers.push(Transfer {
            from: debtors[debtor].member,
            to: creditors[creditor].member,
            amount: MoneyWon::new(amount),
        });

        creditors[creditor].remaining -= amount;
        debtors[debtor].remaining -= amount;
        if creditors[creditor].remaining == 0 {
            creditors.remove(creditor);
        }
        if debtors[debtor].remaining == 0 {
            debtors.remove(debtor);
        }
    }

    transfers
}

/// Index of the party with the largest remaining amount; ties go to the
/// earlier roster member.
fn largest(parties: &[Party]) -> usize {
    let mut best = 0;
    for (i, party) in parties.iter().enumerate().skip(1) {
        let leader = &parties[best];
        if party.remaining > leader.remaining
            || (party.remaining == leader.remaining && party.member < leader.member)
        {
            best = i;
        }
    }
    best
}

/// The transfers touching one member, tagged send/receive, in the order
/// [`settle`] emitted them.
#[must_use]
pub fn settlement_for(balances: &[MemberBalance], member: MemberId) -> Vec<SettlementLine> {
    settle(balances)
        .into_iter()
        .filter_map(|transfer| {
            if transfer.from == member {
                Some(SettlementLine {
                    direction: Direction::Send,
                    counterpart: transfer.to,
                    amount: transfer.amount,
                })
            } else if transfer.to == member {
                Some(SettlementLine {
                    direction: Direction::Receive,
                    counterpart: transfer.from,
                    amount: transfer.amount,
                })
            } else {
                None
            }
        })
        .collect()
}

impl Ledger {
    /// Full settlement instruction list for the current collection.
    #[must_use]
    pub fn settlement(&self) -> Vec<Transfer> {
        settle(&self.member_stats())
    }

    /// Settlement detail for one member.
    #[must_use]
    pub fn settlement_for(&self, member: MemberId) -> Vec<SettlementLine> {
        settlement_for(&self.member_stats(), member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Roster;

    fn balances(roster: &Roster, diffs: &[i64]) -> Vec<MemberBalance> {
        roster
            .members()
            .zip(diffs)
            .map(|(member, diff)| MemberBalance {
                member,
                share: MoneyWon::ZERO,
                paid: MoneyWon::ZERO,
                diff: MoneyWon::new(*diff),
            })
            .collect()
    }

    #[test]
    fn single_creditor_collects_from_everyone() {
        let roster = Roster::new(["ME", "A", "B", "C"]).unwrap();
        let transfers = settle(&balances(&roster, &[75, -25, -25, -25]));

        assert_eq!(transfers.len(), 3);
        for transfer in &transfers {
            assert_eq!(roster.code(transfer.to), "ME");
            assert_eq!(transfer.amount, MoneyWon::new(25));
        }
        // Equal debts resolve in roster order.
        let froms: Vec<&str> = transfers.iter().map(|t| roster.code(t.from)).collect();
        assert_eq!(froms, vec!["A", "B", "C"]);
    }

    #[test]
    fn largest_pairs_against_largest() {
        let roster = Roster::new(["ME", "A", "B"]).unwrap();
        let transfers = settle(&balances(&roster, &[60, -40, -20]));

        assert_eq!(
            transfers,
            vec![
                Transfer {
                    from: roster.member("A").unwrap(),
                    to: roster.member("ME").unwrap(),
                    amount: MoneyWon::new(40),
                },
                Transfer {
                    from: roster.member("B").unwrap(),
                    to: roster.member("ME").unwrap(),
                    amount: MoneyWon::new(20),
                },
            ]
        );
    }

    #[test]
    fn rounding_remainder_is_dropped() {
        let roster = Roster::new(["ME", "A", "B"]).unwrap();
        // Diffs sum to +2: the floor-division residue stays with the creditor.
        let transfers = settle(&balances(&roster, &[35, -16, -17]));

        let moved: i64 = transfers.iter().map(|t| t.amount.won()).sum();
        assert_eq!(moved, 33);
        assert!(transfers.iter().all(|t| roster.code(t.to) == "ME"));
    }

    #[test]
    fn settle_is_deterministic() {
        let roster = Roster::new(["ME", "A", "B", "C"]).unwrap();
        let input = balances(&roster, &[50, -30, 10, -30]);
        assert_eq!(settle(&input), settle(&input));
    }

    #[test]
    fn detail_tags_direction() {
        let roster = Roster::new(["ME", "A", "B"]).unwrap();
        let input = balances(&roster, &[30, -30, 0]);
        let me = roster.member("ME").unwrap();
        let a = roster.member("A").unwrap();

        assert_eq!(
            settlement_for(&input, me),
            vec![SettlementLine {
                direction: Direction::Receive,
                counterpart: a,
                amount: MoneyWon::new(30),
            }]
        );
        assert_eq!(
            settlement_for(&input, a),
            vec![SettlementLine {
                direction: Direction::Send,
                counterpart: me,
                amount: MoneyWon::new(30),
            }]
        );
        assert!(settlement_for(&input, roster.member("B").unwrap()).is_empty());
    }

    #[test]
    fn no_transfers_for_settled_group() {
        let roster = Roster::new(["ME", "A"]).unwrap();
        assert!(settle(&balances(&roster, &[0, 0])).is_empty());
        assert!(settle(&[]).is_empty());
    }
}
