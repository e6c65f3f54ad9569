use serde_json::Value;
use std::collections::HashMap;

use crate::debt::ClientDebtSummary;
use crate::error::Result;
use crate::sales::ClientRef;

pub trait ClientLookup {
    fn fetch_client(&self, client_id: i64) -> Result<Value>;
}

/// Client display names fetched by id, memoized for the life of the
/// directory. Failed lookups are cached as misses; nothing is invalidated.
pub struct ClientDirectory<'a, L: ClientLookup + ?Sized> {
    lookup: &'a L,
    names: HashMap<i64, Option<String>>,
}

impl<'a, L: ClientLookup + ?Sized> ClientDirectory<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        Self {
            lookup,
            names: HashMap::new(),
        }
    }

    pub fn name_of(&mut self, client_id: i64) -> Option<String> {
        let lookup = self.lookup;
        self.names
            .entry(client_id)
            .or_insert_with(|| match lookup.fetch_client(client_id) {
                // some endpoints wrap the record in {"data": {...}}
                Ok(value) => {
                    let record = value.get("data").filter(|d| d.is_object()).unwrap_or(&value);
                    ClientRef::from_json(record).and_then(|c| c.display_name())
                }
                Err(e) => {
                    tracing::warn!(client_id, error = %e, "client lookup failed");
                    None
                }
            })
            .clone()
    }

    pub fn cached(&self) -> usize {
        self.names.len()
    }
}

/// Replace "Client {id}" placeholders with names from the directory.
pub fn fill_placeholder_names<L: ClientLookup + ?Sized>(
    summaries: &mut [ClientDebtSummary],
    directory: &mut ClientDirectory<'_, L>,
) {
    for summary in summaries.iter_mut().filter(|s| s.has_placeholder_name()) {
        if let Some(name) = directory.name_of(summary.client_id) {
            summary.name = name;
        }
    }
}
