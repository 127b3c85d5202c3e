use chrono::NaiveDate;

use engine::{
    Category, DateFilter, ExpenseDraft, Ledger, Memory, MoneyWon, PayMethod, PersistOutcome,
    Roster, Storage, StorageError,
};

fn trip_roster() -> Roster {
    Roster::new(["ME", "A", "B", "C"]).expect("roster")
}

fn open_ledger() -> Ledger {
    Ledger::open(trip_roster(), Box::new(Memory::new())).expect("ledger")
}

fn date(s: &str) -> NaiveDate {
    s.parse().expect("date")
}

fn draft(ledger: &Ledger, day: &str, cost: i64, payer: &str, involved: &[&str]) -> ExpenseDraft {
    let roster = ledger.roster();
    ExpenseDraft {
        date: date(day),
        title: "expense".to_string(),
        cost: MoneyWon::new(cost),
        category: Category::Food,
        payer: roster.member(payer).expect("payer"),
        method: PayMethod::Card,
        involved: involved
            .iter()
            .map(|code| roster.member(code).expect("member"))
            .collect(),
        receipt: None,
    }
}

#[test]
fn one_payer_four_way_split() {
    // Spec'd scenario: 100 paid by ME, split four ways.
    let mut ledger = open_ledger();
    ledger
        .add(draft(&ledger, "2025-12-24", 100, "ME", &["ME", "A", "B", "C"]))
        .expect("add");

    let stats = ledger.member_stats();
    assert_eq!(stats.len(), 4);
    for balance in &stats {
        assert_eq!(balance.share, MoneyWon::new(25));
    }
    let me = &stats[0];
    assert_eq!(me.paid, MoneyWon::new(100));
    assert_eq!(me.diff, MoneyWon::new(75));
    for other in &stats[1..] {
        assert_eq!(other.paid, MoneyWon::ZERO);
        assert_eq!(other.diff, MoneyWon::new(-25));
    }

    let transfers = ledger.settlement();
    assert_eq!(transfers.len(), 3);
    for transfer in &transfers {
        assert_eq!(ledger.roster().code(transfer.to), "ME");
        assert_eq!(transfer.amount, MoneyWon::new(25));
    }
}

#[test]
fn diffs_sum_to_bounded_remainder() {
    // Odd costs force floor-division loss on every record.
    let mut ledger = open_ledger();
    ledger
        .add(draft(&ledger, "2025-12-24", 1003, "ME", &["ME", "A", "B"]))
        .expect("add");
    ledger
        .add(draft(&ledger, "2025-12-24", 777, "A", &["ME", "A", "B", "C"]))
        .expect("add");
    ledger
        .add(draft(&ledger, "2025-12-25", 50, "B", &["B", "C"]))
        .expect("add");

    let remainder: i64 = ledger.member_stats().iter().map(|b| b.diff.won()).sum();
    assert!(remainder >= 0);
    // At most |involved| - 1 lost per record, so < one won per involved
    // member per record.
    assert!(remainder <= 3 + 4 + 2, "remainder {remainder} out of bound");
}

#[test]
fn applying_transfers_zeroes_every_debtor() {
    let mut ledger = open_ledger();
    ledger
        .add(draft(&ledger, "2025-12-24", 1003, "ME", &["ME", "A", "B"]))
        .expect("add");
    ledger
        .add(draft(&ledger, "2025-12-25", 777, "A", &["A", "B", "C"]))
        .expect("add");
    ledger
        .add(draft(&ledger, "2025-12-26", 4999, "C", &["ME", "A", "B", "C"]))
        .expect("add");

    let balances = ledger.member_stats();
    let mut net: Vec<i64> = balances.iter().map(|b| b.diff.won()).collect();
    let records = ledger.records().len() as i64;

    for transfer in ledger.settlement() {
        // from pays, to receives
        let from = balances
            .iter()
            .position(|b| b.member == transfer.from)
            .expect("from");
        let to = balances
            .iter()
            .position(|b| b.member == transfer.to)
            .expect("to");
        net[from] += transfer.amount.won();
        net[to] -= transfer.amount.won();
    }

    for (balance, residual) in balances.iter().zip(net) {
        if balance.diff.is_negative() {
            // Debtors repay exactly what they owe.
            assert_eq!(residual, 0, "debtor left at {residual}");
        } else {
            // Creditors may keep the dropped rounding remainder.
            assert!(
                (0..=records * 3).contains(&residual),
                "residual {residual} outside rounding bound"
            );
        }
    }
}

#[test]
fn settlement_is_deterministic_across_calls() {
    let mut ledger = open_ledger();
    ledger
        .add(draft(&ledger, "2025-12-24", 900, "ME", &["ME", "A", "B"]))
        .expect("add");
    ledger
        .add(draft(&ledger, "2025-12-24", 900, "A", &["ME", "A", "B"]))
        .expect("add");
    ledger
        .add(draft(&ledger, "2025-12-25", 600, "C", &["ME", "C"]))
        .expect("add");

    assert_eq!(ledger.settlement(), ledger.settlement());
    assert_eq!(ledger.member_stats(), ledger.member_stats());
}

#[test]
fn deletion_is_indistinguishable_from_never_adding() {
    let mut with_deleted = open_ledger();
    with_deleted
        .add(draft(&with_deleted, "2025-12-24", 300, "ME", &["ME", "A"]))
        .expect("add");
    let (doomed, _) = with_deleted
        .add(draft(&with_deleted, "2025-12-25", 999, "B", &["B", "C"]))
        .expect("add");
    with_deleted.delete(doomed).expect("delete");

    let mut never_added = open_ledger();
    never_added
        .add(draft(&never_added, "2025-12-24", 300, "ME", &["ME", "A"]))
        .expect("add");

    assert_eq!(with_deleted.member_stats(), never_added.member_stats());
    assert_eq!(with_deleted.settlement(), never_added.settlement());
    assert_eq!(
        with_deleted.summary(MoneyWon::new(10_000), DateFilter::All),
        never_added.summary(MoneyWon::new(10_000), DateFilter::All)
    );
    assert_eq!(
        with_deleted.category_stats(DateFilter::All),
        never_added.category_stats(DateFilter::All)
    );
}

#[test]
fn date_filter_scopes_totals_but_not_balances() {
    // Spec'd scenario: filtering by the first day hides the second record
    // from totals while member balances still reflect both.
    let mut ledger = open_ledger();
    ledger
        .add(draft(&ledger, "2025-12-24", 100, "ME", &["ME", "A"]))
        .expect("add");
    ledger
        .add(draft(&ledger, "2025-12-25", 200, "A", &["ME", "A"]))
        .expect("add");

    let filter = DateFilter::On(date("2025-12-24"));
    let visible: Vec<_> = ledger.filtered(filter).collect();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].cost, MoneyWon::new(100));

    let summary = ledger.summary(MoneyWon::new(1000), filter);
    assert_eq!(summary.total_spent, MoneyWon::new(100));
    assert_eq!(summary.remaining, MoneyWon::new(900));

    let stats = ledger.member_stats();
    assert_eq!(stats[0].paid, MoneyWon::new(100));
    assert_eq!(stats[1].paid, MoneyWon::new(200));
    assert_eq!(stats[0].share, MoneyWon::new(150));
    assert_eq!(stats[1].share, MoneyWon::new(150));
}

#[test]
fn category_percentages_sum_near_hundred() {
    let mut ledger = open_ledger();
    let categories = [
        Category::Food,
        Category::Transport,
        Category::Stay,
        Category::Shopping,
        Category::Ticket,
        Category::Etc,
    ];
    for (i, category) in categories.iter().enumerate() {
        let mut d = draft(&ledger, "2025-12-24", 1000 + i as i64 * 317, "ME", &["ME", "A"]);
        d.category = *category;
        ledger.add(d).expect("add");
    }

    let stats = ledger.category_stats(DateFilter::All);
    assert_eq!(stats.len(), categories.len());
    let percent_sum: i64 = stats.iter().map(|s| s.percent as i64).sum();
    assert!(
        (100 - categories.len() as i64..=100 + categories.len() as i64).contains(&percent_sum),
        "percent sum {percent_sum} drifted too far"
    );
}

#[test]
fn category_stats_omit_untouched_categories() {
    let mut ledger = open_ledger();
    let mut d = draft(&ledger, "2025-12-24", 300, "ME", &["ME"]);
    d.category = Category::Stay;
    ledger.add(d).expect("add");

    let stats = ledger.category_stats(DateFilter::All);
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].category, Category::Stay);
    assert_eq!(stats[0].amount, MoneyWon::new(300));
    assert_eq!(stats[0].percent, 100);
}

#[test]
fn empty_ledger_resolves_to_zeroes() {
    let ledger = open_ledger();

    let summary = ledger.summary(MoneyWon::new(500_000), DateFilter::All);
    assert_eq!(summary.total_spent, MoneyWon::ZERO);
    assert_eq!(summary.remaining, MoneyWon::new(500_000));

    assert!(ledger.category_stats(DateFilter::All).is_empty());
    assert!(ledger.settlement().is_empty());
    assert!(ledger.dates().is_empty());

    let stats = ledger.member_stats();
    assert_eq!(stats.len(), 4);
    for balance in stats {
        assert_eq!(balance.share, MoneyWon::ZERO);
        assert_eq!(balance.paid, MoneyWon::ZERO);
        assert_eq!(balance.diff, MoneyWon::ZERO);
    }
}

#[test]
fn ledger_round_trips_through_json_file() {
    let dir = std::env::temp_dir().join(format!("moim_ledger_{}", std::process::id()));
    let path = dir.join("ledger.json");

    let mut ledger = Ledger::open(trip_roster(), Box::new(engine::JsonFile::new(&path)))
        .expect("ledger");
    let (id, outcome) = ledger
        .add(draft(&ledger, "2025-12-24", 48000, "A", &["ME", "A", "B", "C"]))
        .expect("add");
    assert!(outcome.is_saved());

    let reopened = Ledger::open(trip_roster(), Box::new(engine::JsonFile::new(&path)))
        .expect("reopen");
    assert_eq!(reopened.records().len(), 1);
    assert_eq!(reopened.records()[0].id, id);
    assert_eq!(reopened.records()[0].cost, MoneyWon::new(48000));
    assert_eq!(reopened.member_stats(), ledger.member_stats());

    std::fs::remove_dir_all(&dir).expect("cleanup");
}

struct BrokenStorage;

impl Storage for BrokenStorage {
    fn load(&self) -> Result<Vec<engine::RecordModel>, StorageError> {
        Ok(Vec::new())
    }

    fn save(&self, _records: &[engine::RecordModel]) -> Result<(), StorageError> {
        Err(StorageError::Corrupt("disk full".to_string()))
    }
}

#[test]
fn persist_failure_is_a_warning_not_a_rollback() {
    let mut ledger = Ledger::open(trip_roster(), Box::new(BrokenStorage)).expect("ledger");
    let (_, outcome) = ledger
        .add(draft(&ledger, "2025-12-24", 100, "ME", &["ME", "A"]))
        .expect("add");

    assert!(matches!(outcome, PersistOutcome::Warned(_)));
    // In-memory state is still the source of truth.
    assert_eq!(ledger.records().len(), 1);
    assert_eq!(
        ledger.summary(MoneyWon::ZERO, DateFilter::All).total_spent,
        MoneyWon::new(100)
    );
}
