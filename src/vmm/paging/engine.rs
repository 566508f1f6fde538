use std::fmt;

use log::debug;

use crate::vmm::command::Command;
use crate::vmm::config::{EngineConfig, ReplacementPolicy};
use crate::vmm::event::Event;
use crate::vmm::frame::FramePool;
use crate::vmm::paging::page_table::{PageLocation, PageTable};
use crate::vmm::paging::relocation::RelocationQueue;
use crate::vmm::process::{ProcessRegistry, ProcessRegistryError};
use crate::vmm::types::{FrameIndex, PageKey, SimTime, TICKS_PER_UNIT};

/// Errors raised when the engine refuses a command. The run always
/// continues after one of these; broken internal invariants panic instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Allocate for an id that is still resident
    AlreadyActive { pid: String },
    /// Allocate that is non-positive, larger than RAM, or beyond the free
    /// backing store
    InsufficientMemory { pid: String, bytes: i64 },
    /// Access against a process that is not active
    SegFault { pid: String },
    /// Access past the end of the process's address space
    BadAddress { pid: String, addr: i64 },
    /// Free for a process that is unregistered or already freed
    NotFound { pid: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::AlreadyActive { pid } => write!(
                f,
                "process {} is already in memory, free it before loading it again",
                pid
            ),
            EngineError::InsufficientMemory { pid, bytes } => {
                write!(f, "cannot allocate {} bytes for process {}", bytes, pid)
            }
            EngineError::SegFault { pid } => {
                write!(f, "segmentation fault, process {} is not active", pid)
            }
            EngineError::BadAddress { pid, addr } => write!(
                f,
                "address {} is outside the address space of process {}",
                addr, pid
            ),
            EngineError::NotFound { pid } => write!(f, "could not find process {}", pid),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<ProcessRegistryError> for EngineError {
    fn from(error: ProcessRegistryError) -> EngineError {
        match error {
            ProcessRegistryError::AlreadyActive(pid) => EngineError::AlreadyActive { pid },
        }
    }
}

/// The paging engine. Owns both frame pools, the page table, the
/// relocation queue, the process registry and the simulation clock, and
/// advances them one command at a time.
pub struct PagingEngine {
    config: EngineConfig,
    ram: FramePool,
    disk: FramePool,
    page_table: PageTable,
    queue: RelocationQueue,
    registry: ProcessRegistry,
    clock: SimTime,
    stopped: bool,
}

impl PagingEngine {
    pub fn new(config: EngineConfig) -> PagingEngine {
        let ram = FramePool::new(config.ram_frames());
        // RAM and swap number their frames independently from zero, so the
        // two index ranges overlap without referring to the same storage.
        let disk = FramePool::new(config.disk_frames());
        PagingEngine {
            config,
            ram,
            disk,
            page_table: PageTable::new(),
            queue: RelocationQueue::new(),
            registry: ProcessRegistry::new(),
            clock: SimTime::ZERO,
            stopped: false,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> SimTime {
        self.clock
    }

    /// True once a terminate command has been consumed.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Decodes one command into engine operations. A refused operation
    /// becomes an [`Event::Rejected`] record; after termination every
    /// command is ignored.
    pub fn execute(&mut self, command: Command) -> Vec<Event> {
        if self.stopped {
            return Vec::new();
        }
        let result = match command {
            Command::Allocate { bytes, pid } => self.allocate(&pid, bytes),
            Command::Access { addr, pid, write } => self.access(&pid, addr, write),
            Command::Free { pid } => self.free(&pid),
            Command::Comment(text) => Ok(vec![Event::Comment(text)]),
            Command::EndReport => Ok(self.report()),
            Command::Terminate => {
                self.stopped = true;
                Ok(vec![Event::Terminated])
            }
        };
        result.unwrap_or_else(|error| vec![Event::Rejected(error)])
    }

    /// Admits a process and backs every one of its pages with a frame.
    ///
    /// Pages are installed from the highest page number down. Free RAM
    /// frames are used first; each page beyond them takes the frame of the
    /// current eviction victim, whose content moves to the swap area.
    pub fn allocate(&mut self, pid: &str, bytes: i64) -> Result<Vec<Event>, EngineError> {
        if bytes <= 0 {
            return Err(EngineError::InsufficientMemory {
                pid: pid.to_string(),
                bytes,
            });
        }
        let byte_size = bytes as u64;
        let pages = self.config.pages_for(byte_size);
        if byte_size > self.config.ram_size
            || pages > self.ram.count() + self.disk.count()
            || pages == 0
        {
            return Err(EngineError::InsufficientMemory {
                pid: pid.to_string(),
                bytes,
            });
        }
        self.registry.register(pid, pages, byte_size, self.clock)?;
        debug!("admitting process {} with {} pages", pid, pages);

        let (ram_frames, swap_events) = self.install_pages(pid, pages);
        let mut events = vec![Event::Allocated {
            pid: pid.to_string(),
            bytes: byte_size,
            pages,
            ram_frames,
        }];
        events.extend(swap_events);
        Ok(events)
    }

    /// Translates one virtual address, servicing a page fault first when
    /// the page is not resident.
    pub fn access(&mut self, pid: &str, addr: i64, write: bool) -> Result<Vec<Event>, EngineError> {
        let byte_size = match self.registry.get(pid) {
            Some(record) if record.active => record.byte_size,
            _ => {
                return Err(EngineError::SegFault {
                    pid: pid.to_string(),
                })
            }
        };
        if addr < 0 || addr as u64 >= byte_size {
            return Err(EngineError::BadAddress {
                pid: pid.to_string(),
                addr,
            });
        }
        let addr = addr as u64;
        let page = (addr / self.config.page_size) as usize;
        let key = PageKey::new(pid, page);

        if write {
            self.page_table.set_dirty(&key);
        }
        let location = match self.page_table.get(&key) {
            Some(entry) => entry.location,
            None => panic!("active process {} has no entry for page {}", pid, key),
        };

        let mut events = Vec::new();
        let ram_frame = match location {
            PageLocation::Ram(frame) => {
                if self.config.policy == ReplacementPolicy::Lru {
                    self.queue.touch(&key);
                }
                frame
            }
            PageLocation::Disk(disk_frame) => {
                debug!("page fault on {}", key);
                events.push(Event::PageFault { key: key.clone() });
                self.registry.record_fault(pid);
                // The faulting page's swap frame comes back to the pool
                // before the victim claims one, so fault service still
                // works with a fully occupied swap area.
                self.disk.release(disk_frame);
                let frame = match self.ram.allocate() {
                    Some(frame) => frame,
                    None => self.evict_victim(&mut events),
                };
                self.page_table.mark_swapped_in(&key, frame);
                self.queue.push_back(key.clone());
                self.registry.record_swap_in(pid);
                self.clock.advance_units(1);
                events.push(Event::SwappedIn {
                    key: key.clone(),
                    ram_frame: frame,
                });
                frame
            }
        };

        self.clock.advance_units(1);
        let real_address = ram_frame as u64 * self.config.page_size + addr % self.config.page_size;
        events.push(Event::Accessed {
            pid: pid.to_string(),
            addr,
            real_address,
            write,
        });
        Ok(events)
    }

    /// Ends a process, returning every frame it holds to the pools. The
    /// registry record stays behind for the end-of-run report.
    pub fn free(&mut self, pid: &str) -> Result<Vec<Event>, EngineError> {
        let pages = match self.registry.get(pid) {
            Some(record) if record.active => record.page_count,
            _ => {
                return Err(EngineError::NotFound {
                    pid: pid.to_string(),
                })
            }
        };
        // Releasing costs a tick per page, charged before the end time is
        // stamped so the cost lands inside the turnaround.
        self.clock.advance_ticks(pages as u64);
        self.registry.deactivate(pid, self.clock);

        let mut ram_frames = Vec::new();
        let mut disk_frames = Vec::new();
        for page in 0..pages {
            let key = PageKey::new(pid, page);
            let entry = match self.page_table.remove(&key) {
                Some(entry) => entry,
                None => panic!("active process {} has no entry for page {}", pid, key),
            };
            match entry.location {
                PageLocation::Ram(frame) => {
                    self.ram.release(frame);
                    ram_frames.push(frame);
                }
                PageLocation::Disk(frame) => {
                    self.disk.release(frame);
                    disk_frames.push(frame);
                }
            }
            self.queue.remove(&key);
        }
        debug!(
            "freed process {}: {} RAM frames, {} swap frames",
            pid,
            ram_frames.len(),
            disk_frames.len()
        );
        Ok(vec![Event::Freed {
            pid: pid.to_string(),
            ram_frames,
            disk_frames,
        }])
    }

    /// Builds the end-of-run statistics: one row per process the engine
    /// has ever admitted, in id order, then a summary over the freed ones.
    pub fn report(&self) -> Vec<Event> {
        let mut events = Vec::new();
        let mut freed = 0usize;
        let mut total_ticks = 0u64;
        for (pid, record) in self.registry.iter() {
            let turnaround = record.turnaround();
            if let Some(time) = turnaround {
                freed += 1;
                total_ticks += time.ticks();
            }
            events.push(Event::StatsRow {
                pid: pid.clone(),
                faults: record.page_faults,
                swap_ins: record.swap_ins,
                swap_outs: record.swap_outs,
                turnaround,
            });
        }
        let mean_turnaround = if freed > 0 {
            Some(total_ticks as f64 / freed as f64 / TICKS_PER_UNIT as f64)
        } else {
            None
        };
        events.push(Event::StatsSummary {
            freed,
            mean_turnaround,
        });
        events
    }

    /// Installs `pages` pages for a fresh process, highest page number
    /// first. Returns the frames taken from the free pool and the swap-out
    /// records for the pages placed by eviction.
    fn install_pages(&mut self, pid: &str, pages: usize) -> (Vec<FrameIndex>, Vec<Event>) {
        let mut assigned = Vec::new();
        let mut events = Vec::new();
        let mut remaining = pages;

        // 1. Take free RAM frames while they last.
        while remaining > 0 {
            let frame = match self.ram.allocate() {
                Some(frame) => frame,
                None => break,
            };
            let key = PageKey::new(pid, remaining - 1);
            self.page_table.insert(key.clone(), frame);
            self.queue.push_back(key);
            self.clock.advance_units(1);
            assigned.push(frame);
            remaining -= 1;
        }

        // 2. Each leftover page takes the current victim's frame. The
        //    admission check guarantees a swap frame for every victim.
        while remaining > 0 {
            let key = PageKey::new(pid, remaining - 1);
            let frame = self.evict_victim(&mut events);
            self.page_table.insert(key.clone(), frame);
            self.queue.push_back(key);
            self.clock.advance_units(1);
            remaining -= 1;
        }

        (assigned, events)
    }

    /// Swaps the front of the relocation queue out to the swap area and
    /// returns the RAM frame it vacated.
    fn evict_victim(&mut self, events: &mut Vec<Event>) -> FrameIndex {
        let victim = match self.queue.pop_front() {
            Some(victim) => victim,
            None => panic!("RAM is full but the relocation queue is empty"),
        };
        let frame = match self.page_table.get(&victim) {
            Some(entry) => match entry.location {
                PageLocation::Ram(frame) => frame,
                PageLocation::Disk(_) => {
                    panic!("queued page {} is not resident", victim)
                }
            },
            None => panic!("queued page {} has no page table entry", victim),
        };
        let disk_frame = match self.disk.allocate() {
            Some(disk_frame) => disk_frame,
            None => panic!("no swap frame free for victim page {}", victim),
        };
        self.page_table.mark_swapped_out(&victim, disk_frame);
        self.registry.record_swap_out(&victim.pid);
        self.clock.advance_units(1);
        debug!("evicted {} to swap frame {}", victim, disk_frame);
        events.push(Event::SwappedOut { victim, disk_frame });
        frame
    }
}
