//! Immutable, queryable wrapper over captured records.
//!
//! Query methods (`order_by`, `with_fields`) never touch the captured list;
//! each returns a new view sharing the same records. Materialization copies,
//! stable-sorts, then projects.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use plumb_core::compare::{RecordComparator, SortKey};
use plumb_core::error::{Error, Result};
use plumb_core::hash::{hash_records, Hash256};
use plumb_core::schema::{merge_cols, Col, Schema};
use plumb_core::types::{Entry, Record};

use crate::pretty::PrettyPrinter;

/// Column selection for a [`ResultSet`] view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Selection {
    /// Every declared column, in declared order.
    #[default]
    All,
    /// The listed columns, in the listed order.
    Only(Vec<Col>),
}

impl Selection {
    pub fn only<I, C>(items: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Col>,
    {
        Selection::Only(items.into_iter().map(Into::into).collect())
    }

    /// Merge several selections; any `All` wins, otherwise columns are
    /// concatenated with repeats removed.
    pub fn merge<I>(groups: I) -> Self
    where
        I: IntoIterator<Item = Selection>,
    {
        let mut lists = Vec::new();
        for g in groups {
            match g {
                Selection::All => return Selection::All,
                Selection::Only(c) => lists.push(c),
            }
        }
        Selection::Only(merge_cols(lists.iter().map(|c| c.as_slice())))
    }
}

impl From<Vec<Col>> for Selection {
    fn from(cols: Vec<Col>) -> Self {
        Selection::Only(merge_cols([cols.as_slice()]))
    }
}

impl From<&[Col]> for Selection {
    fn from(cols: &[Col]) -> Self {
        Selection::Only(merge_cols([cols]))
    }
}

impl From<&Schema> for Selection {
    fn from(schema: &Schema) -> Self {
        Selection::Only(schema.columns())
    }
}

#[derive(Debug, Clone)]
pub struct ResultSet {
    schema: Schema,
    records: Arc<[Record]>,
    order_by: Vec<SortKey>,
    selection: Selection,
}

impl ResultSet {
    /// Wrap `records`; every record must be as wide as `schema`.
    pub fn new(schema: Schema, records: Vec<Record>) -> Result<Self> {
        if let Some(bad) = records.iter().find(|r| r.len() != schema.len()) {
            return Err(Error::Arity(format!(
                "record {} has {} values but schema {} has {} columns",
                bad,
                bad.len(),
                schema,
                schema.len()
            )));
        }
        Ok(Self {
            schema,
            records: records.into(),
            order_by: Vec::new(),
            selection: Selection::All,
        })
    }

    pub fn empty(schema: Schema) -> Self {
        Self {
            schema,
            records: Vec::<Record>::new().into(),
            order_by: Vec::new(),
            selection: Selection::All,
        }
    }

    /// Declared schema of the captured records.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Captured records in capture order, ignoring any query state.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn sort_keys(&self) -> &[SortKey] {
        &self.order_by
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// View ordered by `keys` (natural ordering, nulls first, stable).
    ///
    /// Repeated keys are merged; an empty key list leaves the view unchanged.
    pub fn order_by<I, K>(&self, keys: I) -> ResultSet
    where
        I: IntoIterator<Item = K>,
        K: Into<SortKey>,
    {
        let mut merged: Vec<SortKey> = Vec::new();
        for k in keys.into_iter().map(Into::into) {
            if !merged.iter().any(|m| m.col == k.col) {
                merged.push(k);
            }
        }
        let mut view = self.clone();
        if !merged.is_empty() {
            view.order_by = merged;
        }
        view
    }

    /// View restricted to (and reordered by) `selection`.
    pub fn with_fields(&self, selection: impl Into<Selection>) -> ResultSet {
        let mut view = self.clone();
        view.selection = selection.into();
        view
    }

    pub fn with_all_fields(&self) -> ResultSet {
        self.with_fields(Selection::All)
    }

    pub fn selected_schema(&self) -> Result<Schema> {
        match &self.selection {
            Selection::All => Ok(self.schema.clone()),
            Selection::Only(cols) => self.schema.select(cols),
        }
    }

    fn selected_positions(&self) -> Result<Vec<usize>> {
        match &self.selection {
            Selection::All => Ok((0..self.schema.len()).collect()),
            Selection::Only(cols) => {
                self.schema.select(cols)?;
                self.schema.positions(cols)
            }
        }
    }

    /// Copy, sort, and project the captured records.
    pub fn as_record_list(&self) -> Result<Arc<[Record]>> {
        let mut rows: Vec<Record> = self.records.to_vec();
        if !self.order_by.is_empty() {
            RecordComparator::new(&self.schema, &self.order_by)?.sort(&mut rows);
        }
        let positions = self.selected_positions()?;
        let projected = rows
            .iter()
            .map(|r| r.pick(&positions))
            .collect::<Result<Vec<Record>>>()?;
        Ok(projected.into())
    }

    /// As [`as_record_list`](Self::as_record_list), each record paired with the selected schema.
    pub fn as_entry_list(&self) -> Result<Arc<[Entry]>> {
        let schema = self.selected_schema()?;
        let entries = self
            .as_record_list()?
            .iter()
            .map(|r| Entry::new(schema.clone(), r.clone()))
            .collect::<Result<Vec<_>>>()?;
        Ok(entries.into())
    }

    /// Stable digest of the materialized view (selected schema + records).
    pub fn fingerprint(&self) -> Result<Hash256> {
        let schema = self.selected_schema()?;
        let rows = self.as_record_list()?;
        hash_records(&schema, &rows)
    }

    pub fn pretty(&self) -> PrettyPrinter<'_> {
        PrettyPrinter::new(self)
    }
}

impl PartialEq for ResultSet {
    fn eq(&self, other: &Self) -> bool {
        self.schema == other.schema && self.records == other.records
    }
}

impl Eq for ResultSet {}

impl fmt::Display for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pretty())
    }
}
