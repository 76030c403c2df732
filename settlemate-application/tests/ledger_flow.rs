use std::{collections::HashMap, sync::Mutex};

use chrono::NaiveDate;
use rstest::rstest;
use settlemate_application::{
    AppError, BalanceSheet, ExpenseProcessor, LedgerStore, StoreError, TransactionRecord,
};
use settlemate_domain::{
    DebtGraph, ExpenseValidationError, Money, PersonId, Settlement, Shares, SplitType,
};

struct InMemoryStore {
    graph: Mutex<DebtGraph>,
    records: Mutex<Vec<TransactionRecord>>,
}

impl InMemoryStore {
    fn new(graph: DebtGraph) -> Self {
        Self {
            graph: Mutex::new(graph),
            records: Mutex::new(Vec::new()),
        }
    }
}

impl LedgerStore for InMemoryStore {
    fn load_graph(&self) -> Result<DebtGraph, StoreError> {
        Ok(self.graph.lock().unwrap().clone())
    }

    fn save_graph(&self, graph: &DebtGraph) -> Result<(), StoreError> {
        *self.graph.lock().unwrap() = graph.clone();
        Ok(())
    }

    fn append_record(&self, record: &TransactionRecord) -> Result<(), StoreError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    fn history(&self) -> Result<Vec<TransactionRecord>, StoreError> {
        Ok(self.records.lock().unwrap().clone())
    }
}

fn person(name: &str) -> PersonId {
    PersonId::new(name)
}

fn cents(amount: i64) -> Money {
    Money::new(amount, 2)
}

fn members_abc() -> Vec<PersonId> {
    vec![person("A"), person("B"), person("C")]
}

fn group_store(members: &[PersonId]) -> InMemoryStore {
    InMemoryStore::new(DebtGraph::for_members(members.to_vec()))
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

#[test]
fn equal_dinner_flows_into_balances_and_plan() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let members = members_abc();
    let store = group_store(&members);
    let processor = ExpenseProcessor::new(&store, members);

    let mut draft = processor.new_draft(None).expect("group has members");
    draft.purpose = "dinner".to_owned();
    draft.amount = cents(30000);
    draft.date = date();

    let record = processor
        .record_expense(&draft, SplitType::Equal)
        .expect("valid expense");

    assert_eq!(record.payer, person("A"));
    assert_eq!(record.shares.len(), 2);
    assert_eq!(record.shares[&person("B")], cents(10000));
    assert_eq!(record.shares[&person("C")], cents(10000));
    assert_eq!(record.split_type, SplitType::Equal);

    let graph = store.load_graph().unwrap();
    assert_eq!(graph.entry(&person("A"), &person("B")), Some(cents(10000)));
    assert_eq!(graph.entry(&person("B"), &person("A")), Some(cents(-10000)));
    assert_eq!(graph.entry(&person("A"), &person("C")), Some(cents(10000)));
    assert_eq!(graph.entry(&person("C"), &person("A")), Some(cents(-10000)));

    let sheet = processor.balance_sheet().unwrap();
    assert_eq!(sheet.balances[&person("A")], cents(20000));
    assert_eq!(sheet.balances[&person("B")], cents(-10000));
    assert_eq!(sheet.balances[&person("C")], cents(-10000));
    assert_eq!(
        sheet.settlements,
        vec![
            Settlement {
                from: person("B"),
                to: person("A"),
                amount: cents(10000),
            },
            Settlement {
                from: person("C"),
                to: person("A"),
                amount: cents(10000),
            },
        ]
    );

    assert_eq!(store.history().unwrap(), vec![record]);
}

#[rstest]
#[case::custom_overflow(
    cents(9000),
    &[("B", 5000), ("C", 6000)],
    ExpenseValidationError::CustomSplitOverflow {
        total: Money::new(11000, 2),
        amount: Money::new(9000, 2),
    },
)]
#[case::zero_amount(
    cents(0),
    &[("B", 0), ("C", 0)],
    ExpenseValidationError::InvalidAmount,
)]
fn rejected_expenses_leave_the_store_untouched(
    #[case] amount: Money,
    #[case] split: &[(&str, i64)],
    #[case] expected: ExpenseValidationError,
) {
    let members = members_abc();
    let store = group_store(&members);
    let processor = ExpenseProcessor::new(&store, members);

    let mut draft = processor.new_draft(None).unwrap();
    draft.amount = amount;
    draft.split_among = split
        .iter()
        .map(|(name, minor)| (person(name), cents(*minor)))
        .collect::<Shares>();

    let err = processor
        .record_expense(&draft, SplitType::Custom)
        .unwrap_err();
    match err {
        AppError::Validation(actual) => assert_eq!(actual, expected),
        other => panic!("expected validation rejection, got {other}"),
    }

    assert_eq!(store.load_graph().unwrap(), DebtGraph::for_members(members_abc()));
    assert!(store.history().unwrap().is_empty());
}

#[test]
fn forgive_clears_one_pair_and_writes_no_record() {
    let members = members_abc();
    let store = group_store(&members);
    let processor = ExpenseProcessor::new(&store, members);

    let mut draft = processor.new_draft(None).unwrap();
    draft.amount = cents(12000);
    draft.date = date();
    processor
        .record_expense(&draft, SplitType::Equal)
        .expect("valid expense");
    let records_before = store.history().unwrap().len();

    processor.forgive(&person("A"), &person("B")).unwrap();

    let graph = store.load_graph().unwrap();
    assert_eq!(graph.entry(&person("A"), &person("B")), Some(Money::ZERO));
    assert_eq!(graph.entry(&person("B"), &person("A")), Some(Money::ZERO));
    // The other pair keeps its debt.
    assert_eq!(graph.entry(&person("A"), &person("C")), Some(cents(4000)));
    assert_eq!(store.history().unwrap().len(), records_before);
}

#[test]
fn custom_split_records_caller_shares() {
    let members = members_abc();
    let store = group_store(&members);
    let processor = ExpenseProcessor::new(&store, members);

    let mut draft = processor.new_draft(Some(&person("C"))).unwrap();
    draft.purpose = "taxi".to_owned();
    draft.amount = cents(10000);
    draft.date = date();
    draft.split_among =
        Shares::from_iter([(person("A"), cents(2500)), (person("B"), cents(5000))]);

    let record = processor
        .record_expense(&draft, SplitType::Custom)
        .expect("valid expense");

    assert_eq!(record.payer, person("C"));
    assert_eq!(record.shares, draft.split_among);

    let sheet = processor.balance_sheet().unwrap();
    assert_eq!(sheet.balances[&person("C")], cents(7500));
    assert_eq!(sheet.balances[&person("A")], cents(-2500));
    assert_eq!(sheet.balances[&person("B")], cents(-5000));
}

#[test]
fn transaction_record_round_trips_through_json() {
    let members = members_abc();
    let store = group_store(&members);
    let processor = ExpenseProcessor::new(&store, members);

    let mut draft = processor.new_draft(None).unwrap();
    draft.purpose = "groceries".to_owned();
    draft.amount = cents(4500);
    draft.date = date();

    let record = processor
        .record_expense(&draft, SplitType::Equal)
        .expect("valid expense");

    let json = serde_json::to_string(&record).unwrap();
    let restored: TransactionRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, record);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["split_type"], "equal");
    assert_eq!(value["payer"], "A");
    assert_eq!(value["date"], "2024-06-01");
    assert!(value["shares"].get("B").is_some());
    assert!(value["shares"].get("C").is_some());
}

#[test]
fn settlement_lines_resolve_display_names() {
    let sheet = BalanceSheet {
        balances: [(person("A"), cents(5000)), (person("B"), cents(-5000))]
            .into_iter()
            .collect(),
        settlements: vec![Settlement {
            from: person("B"),
            to: person("A"),
            amount: cents(5000),
        }],
    };

    let mut directory = HashMap::new();
    directory.insert(person("A"), "Alice".to_owned());
    directory.insert(person("B"), "Bob".to_owned());

    assert_eq!(sheet.settlement_lines(&directory), vec!["Bob pays Alice 50.00"]);
}
