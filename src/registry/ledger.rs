use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use log::debug;

use crate::emitter::EventSink;
use crate::error::{Error, Result};
use crate::model::{Election, Event, Member, Vote};

use super::Record;

/// The shared ledger: one registry per entity kind.
///
/// Transactions are serialised by a single writer lock. Each transaction
/// observes a consistent snapshot of all three registries, stages its
/// writes privately, and commits them together or not at all; an aborted
/// transaction leaves no trace. Events emitted during a transaction reach
/// the sink only after the commit.
#[derive(Debug, Default)]
pub struct Ledger {
    tables: Mutex<Tables>,
}

impl Ledger {
    /// Run one transaction against the ledger.
    ///
    /// The closure performs registry reads and writes through the [`Txn`]
    /// handle. If it returns `Ok`, every staged write is committed and any
    /// emitted events are published to `emitter`; if it returns `Err`, the
    /// ledger is untouched and nothing is published.
    pub fn transact<R>(
        &self,
        emitter: &dyn EventSink,
        f: impl FnOnce(&mut Txn<'_>) -> Result<R>,
    ) -> Result<R> {
        let mut tables = self.lock();
        let mut txn = Txn {
            base: &*tables,
            staged: Tables::default(),
            events: Vec::new(),
        };
        let value = f(&mut txn)?;
        let Txn { staged, events, .. } = txn;

        let records = staged.len();
        tables.merge(staged);
        drop(tables);
        debug!("transaction committed {records} record(s)");

        for event in events {
            emitter.publish(event);
        }
        Ok(value)
    }

    /// Run one read-only transaction against the ledger.
    ///
    /// The shared [`Txn`] handle permits no writes, so the closure sees a
    /// consistent snapshot and cannot leave a trace.
    pub fn read<R>(&self, f: impl FnOnce(&Txn<'_>) -> Result<R>) -> Result<R> {
        let tables = self.lock();
        let txn = Txn {
            base: &*tables,
            staged: Tables::default(),
            events: Vec::new(),
        };
        f(&txn)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        // A poisoned lock means a panic inside `transact`; the staged
        // overlay was dropped with it, so the base tables are intact.
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Default)]
pub(crate) struct Tables {
    members: BTreeMap<String, Member>,
    elections: BTreeMap<String, Election>,
    votes: BTreeMap<String, Vote>,
}

impl Tables {
    fn len(&self) -> usize {
        self.members.len() + self.elections.len() + self.votes.len()
    }

    fn merge(&mut self, staged: Tables) {
        self.members.extend(staged.members);
        self.elections.extend(staged.elections);
        self.votes.extend(staged.votes);
    }
}

mod sealed {
    use std::collections::BTreeMap;

    use super::Tables;

    pub trait Slot: Sized {
        fn slot(tables: &Tables) -> &BTreeMap<String, Self>;
        fn slot_mut(tables: &mut Tables) -> &mut BTreeMap<String, Self>;
    }
}

/// A [`Record`] kind the ledger has a registry for.
pub trait Stored: Record + sealed::Slot {}

macro_rules! stored {
    ($record:ty, $table:ident) => {
        impl sealed::Slot for $record {
            fn slot(tables: &Tables) -> &BTreeMap<String, Self> {
                &tables.$table
            }

            fn slot_mut(tables: &mut Tables) -> &mut BTreeMap<String, Self> {
                &mut tables.$table
            }
        }

        impl Stored for $record {}
    };
}

stored!(Member, members);
stored!(Election, elections);
stored!(Vote, votes);

/// A transaction over the ledger.
///
/// Reads observe the snapshot the transaction opened on, with this
/// transaction's own staged writes shadowing it; writes stay private
/// until the transaction commits.
pub struct Txn<'a> {
    base: &'a Tables,
    staged: Tables,
    events: Vec<Event>,
}

impl Txn<'_> {
    pub fn exists<T: Stored>(&self, id: &str) -> bool {
        T::slot(&self.staged).contains_key(id) || T::slot(self.base).contains_key(id)
    }

    pub fn get<T: Stored>(&self, id: &str) -> Result<T> {
        T::slot(&self.staged)
            .get(id)
            .or_else(|| T::slot(self.base).get(id))
            .cloned()
            .ok_or_else(|| Error::not_found(T::KIND, id))
    }

    /// All records of one kind. Staged writes shadow their base
    /// counterparts; iteration order is not meaningful.
    pub fn get_all<T: Stored>(&self) -> Vec<T> {
        let staged = T::slot(&self.staged);
        T::slot(self.base)
            .values()
            .filter(|record| !staged.contains_key(record.key()))
            .chain(staged.values())
            .cloned()
            .collect()
    }

    pub fn add<T: Stored>(&mut self, record: T) -> Result<()> {
        if self.exists::<T>(record.key()) {
            return Err(Error::conflict(T::KIND, record.key()));
        }
        T::slot_mut(&mut self.staged).insert(record.key().to_string(), record);
        Ok(())
    }

    /// Replace the full record under its key.
    pub fn update<T: Stored>(&mut self, record: T) -> Result<()> {
        if !self.exists::<T>(record.key()) {
            return Err(Error::not_found(T::KIND, record.key()));
        }
        T::slot_mut(&mut self.staged).insert(record.key().to_string(), record);
        Ok(())
    }

    /// Queue an event for publication once this transaction commits.
    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use crate::emitter::BufferSink;
    use crate::model::{NewVoteEvent, Vote};

    use super::*;

    #[test]
    fn add_then_get_returns_the_record() {
        let ledger = Ledger::default();
        let sink = BufferSink::default();

        ledger
            .transact(&sink, |txn| txn.add(Member::example1()))
            .unwrap();

        let member = ledger
            .read(|txn| txn.get::<Member>("M1"))
            .unwrap();
        assert_eq!(Member::example1(), member);
        assert!(ledger.read(|txn| Ok(txn.exists::<Member>("M1"))).unwrap());
    }

    #[test]
    fn duplicate_add_is_a_conflict() {
        let ledger = Ledger::default();
        let sink = BufferSink::default();

        ledger
            .transact(&sink, |txn| txn.add(Member::example1()))
            .unwrap();
        let err = ledger
            .transact(&sink, |txn| txn.add(Member::example1()))
            .unwrap_err();

        assert_eq!(Error::conflict("member", "M1"), err);
    }

    #[test]
    fn duplicate_add_within_one_transaction_is_a_conflict() {
        let ledger = Ledger::default();
        let sink = BufferSink::default();

        let err = ledger
            .transact(&sink, |txn| {
                txn.add(Member::example1())?;
                txn.add(Member::example1())
            })
            .unwrap_err();

        assert_eq!(Error::conflict("member", "M1"), err);
    }

    #[test]
    fn update_replaces_the_full_record() {
        let ledger = Ledger::default();
        let sink = BufferSink::default();

        ledger
            .transact(&sink, |txn| txn.add(Member::example1()))
            .unwrap();
        ledger
            .transact(&sink, |txn| {
                let mut member = txn.get::<Member>("M1")?;
                member.voted = true;
                txn.update(member)
            })
            .unwrap();

        let member = ledger.read(|txn| txn.get::<Member>("M1")).unwrap();
        assert!(member.voted);
    }

    #[test]
    fn update_of_a_missing_record_is_not_found() {
        let ledger = Ledger::default();
        let sink = BufferSink::default();

        let err = ledger
            .transact(&sink, |txn| txn.update(Member::example1()))
            .unwrap_err();

        assert_eq!(Error::not_found("member", "M1"), err);
    }

    #[test]
    fn get_all_sees_staged_writes_shadowing_the_base() {
        let ledger = Ledger::default();
        let sink = BufferSink::default();

        ledger
            .transact(&sink, |txn| {
                txn.add(Member::example1())?;
                txn.add(Member::example2())
            })
            .unwrap();

        ledger
            .transact(&sink, |txn| {
                let mut member = txn.get::<Member>("M1")?;
                member.voted = true;
                txn.update(member)?;

                let members = txn.get_all::<Member>();
                assert_eq!(2, members.len());
                let updated = members.iter().find(|m| m.id == "M1").unwrap();
                assert!(updated.voted);
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn aborted_transaction_leaves_no_trace() {
        let ledger = Ledger::default();
        let sink = BufferSink::default();

        let err = ledger
            .transact(&sink, |txn| {
                txn.add(Member::example1())?;
                txn.add(Election::example())?;
                txn.emit(Event::NewVote(NewVoteEvent {
                    first_name: "Parry".to_string(),
                    last_name: "Hotter".to_string(),
                    election_id: "E1".to_string(),
                    candidate: "Alice".to_string(),
                }));
                Err::<(), Error>(Error::InvalidInput("nope".to_string()))
            })
            .unwrap_err();
        assert_eq!(Error::InvalidInput("nope".to_string()), err);

        ledger
            .read(|txn| {
                assert!(!txn.exists::<Member>("M1"));
                assert!(!txn.exists::<Election>("E1"));
                assert!(txn.get_all::<Vote>().is_empty());
                Ok(())
            })
            .unwrap();
        assert!(sink.drain().is_empty());
    }

    #[test]
    fn events_are_published_only_after_commit() {
        let ledger = Ledger::default();
        let sink = BufferSink::default();

        ledger
            .transact(&sink, |txn| {
                txn.add(Member::example1())?;
                txn.emit(Event::NewVote(NewVoteEvent {
                    first_name: "Parry".to_string(),
                    last_name: "Hotter".to_string(),
                    election_id: "E1".to_string(),
                    candidate: "Alice".to_string(),
                }));
                // Nothing must reach the sink while the transaction is
                // still in flight.
                assert!(sink.drain().is_empty());
                Ok(())
            })
            .unwrap();

        assert_eq!(1, sink.drain().len());
    }
}
