use std::collections::BTreeMap;

use crate::vmm::types::SimTime;

/// Errors raised by the process registry
#[derive(Debug, PartialEq, Eq)]
pub enum ProcessRegistryError {
    /// The id is already registered and still active
    AlreadyActive(String),
}

/// Accounting record for one scripted process. Records survive being freed
/// so the end-of-run report can still show them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRecord {
    pub arrival_time: SimTime,
    pub end_time: Option<SimTime>,
    pub page_count: usize,
    pub byte_size: u64,
    pub page_faults: u64,
    pub swap_ins: u64,
    pub swap_outs: u64,
    pub active: bool,
}

impl ProcessRecord {
    fn new(page_count: usize, byte_size: u64, arrival_time: SimTime) -> ProcessRecord {
        ProcessRecord {
            arrival_time,
            end_time: None,
            page_count,
            byte_size,
            page_faults: 0,
            swap_ins: 0,
            swap_outs: 0,
            active: true,
        }
    }

    /// Time from admission to free, available once the process was freed.
    pub fn turnaround(&self) -> Option<SimTime> {
        self.end_time.map(|end| end - self.arrival_time)
    }
}

/// All processes the engine has ever admitted, keyed by id.
///
/// A `BTreeMap` keeps report iteration in a stable id order. Registering
/// an id whose previous incarnation was freed replaces the old record;
/// the counter methods expect registered ids and panic otherwise.
#[derive(Debug, Default)]
pub struct ProcessRegistry {
    records: BTreeMap<String, ProcessRecord>,
}

impl ProcessRegistry {
    pub fn new() -> ProcessRegistry {
        ProcessRegistry::default()
    }

    /// Admits a process. Fails if the id is currently active; a freed
    /// record under the same id is discarded and replaced.
    pub fn register(
        &mut self,
        pid: &str,
        page_count: usize,
        byte_size: u64,
        arrival_time: SimTime,
    ) -> Result<(), ProcessRegistryError> {
        if self.is_active(pid) {
            return Err(ProcessRegistryError::AlreadyActive(pid.to_string()));
        }
        self.records.insert(
            pid.to_string(),
            ProcessRecord::new(page_count, byte_size, arrival_time),
        );
        Ok(())
    }

    /// Stamps the end time and clears the active flag.
    pub fn deactivate(&mut self, pid: &str, end_time: SimTime) {
        let record = self.record_mut(pid);
        record.active = false;
        record.end_time = Some(end_time);
    }

    pub fn record_fault(&mut self, pid: &str) {
        self.record_mut(pid).page_faults += 1;
    }

    pub fn record_swap_in(&mut self, pid: &str) {
        self.record_mut(pid).swap_ins += 1;
    }

    pub fn record_swap_out(&mut self, pid: &str) {
        self.record_mut(pid).swap_outs += 1;
    }

    pub fn get(&self, pid: &str) -> Option<&ProcessRecord> {
        self.records.get(pid)
    }

    pub fn is_active(&self, pid: &str) -> bool {
        self.records.get(pid).map_or(false, |record| record.active)
    }

    /// All records in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ProcessRecord)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn record_mut(&mut self, pid: &str) -> &mut ProcessRecord {
        match self.records.get_mut(pid) {
            Some(record) => record,
            None => panic!("no record for process {}", pid),
        }
    }
}
