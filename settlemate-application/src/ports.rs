use std::collections::HashMap;

use settlemate_domain::{DebtGraph, PersonId};

use crate::{error::StoreError, model::TransactionRecord};

/// Boundary to the external group store.
///
/// The engine never owns storage; every operation loads a graph value in and
/// stores a new one out. Concurrent read-modify-write against the same group
/// must be serialized by the implementor (single-writer discipline); no
/// compare-and-swap is provided here.
pub trait LedgerStore: Send + Sync {
    fn load_graph(&self) -> Result<DebtGraph, StoreError>;
    fn save_graph(&self, graph: &DebtGraph) -> Result<(), StoreError>;
    fn append_record(&self, record: &TransactionRecord) -> Result<(), StoreError>;
    fn history(&self) -> Result<Vec<TransactionRecord>, StoreError>;
}

/// Boundary to the presentation layer's name resolution.
pub trait MemberDirectory: Send + Sync {
    fn display_name(&self, member: &PersonId) -> Option<&str>;
}

impl MemberDirectory for HashMap<PersonId, String> {
    fn display_name(&self, member: &PersonId) -> Option<&str> {
        self.get(member).map(String::as_str)
    }
}
