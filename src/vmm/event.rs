use std::io;

#[cfg(test)]
use mockall::automock;

use crate::script::ScriptError;
use crate::vmm::paging::engine::EngineError;
use crate::vmm::types::{FrameIndex, PageKey, SimTime};

/// Structured record emitted while replaying a script.
///
/// The engine produces most of these; the driver adds [`Event::Malformed`]
/// for lines that never decoded into a command. Events carry raw data
/// only, all human-readable wording lives in the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A process was admitted. `ram_frames` lists the frames taken straight
    /// from the free pool, in allocation order; pages placed by evicting a
    /// victim are covered by the accompanying [`Event::SwappedOut`] records.
    Allocated {
        pid: String,
        bytes: u64,
        pages: usize,
        ram_frames: Vec<FrameIndex>,
    },
    /// A resident page was moved out to the given swap frame.
    SwappedOut {
        victim: PageKey,
        disk_frame: FrameIndex,
    },
    /// A faulted page became resident in the given RAM frame.
    SwappedIn {
        key: PageKey,
        ram_frame: FrameIndex,
    },
    /// An access touched a page that was not resident.
    PageFault { key: PageKey },
    /// A successful access, with the translated real address.
    Accessed {
        pid: String,
        addr: u64,
        real_address: u64,
        write: bool,
    },
    /// A process was freed, listing the frames it held in each tier.
    Freed {
        pid: String,
        ram_frames: Vec<FrameIndex>,
        disk_frames: Vec<FrameIndex>,
    },
    /// Script comment passed through for display.
    Comment(String),
    /// Per-process statistics row. `turnaround` is present once the
    /// process has been freed.
    StatsRow {
        pid: String,
        faults: u64,
        swap_ins: u64,
        swap_outs: u64,
        turnaround: Option<SimTime>,
    },
    /// End-of-run summary. `mean_turnaround` is in time units and absent
    /// while no process has been freed.
    StatsSummary {
        freed: usize,
        mean_turnaround: Option<f64>,
    },
    /// A well-formed command the engine refused; the run continues.
    Rejected(EngineError),
    /// A script line that did not decode; the run continues.
    Malformed(ScriptError),
    /// The engine stopped consuming commands.
    Terminated,
}

/// Consumer of replay events. The production implementation renders text;
/// tests substitute a mock.
#[cfg_attr(test, automock)]
pub trait EventSink {
    /// Receives one event. An error aborts the run.
    fn emit(&mut self, event: &Event) -> Result<(), io::Error>;
}
