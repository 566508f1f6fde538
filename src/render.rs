use std::io::{self, Write};

use crate::vmm::event::{Event, EventSink};
use crate::vmm::frame::merge_frame_ranges;

/// Renders events as the human-readable simulation transcript.
///
/// All wording lives here; the engine only produces structured records.
/// Frame lists are condensed into contiguous ranges on the way out.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> TextRenderer<W> {
        TextRenderer { out }
    }

    /// Hands the underlying writer back, mainly so tests can inspect it.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> EventSink for TextRenderer<W> {
    fn emit(&mut self, event: &Event) -> Result<(), io::Error> {
        match event {
            Event::Allocated {
                pid,
                bytes,
                pages,
                ram_frames,
            } => {
                writeln!(
                    self.out,
                    "Allocate {} bytes ({} pages) to process {}",
                    bytes, pages, pid
                )?;
                if !ram_frames.is_empty() {
                    writeln!(
                        self.out,
                        "Assigned page frames {} to process {}",
                        merge_frame_ranges(ram_frames),
                        pid
                    )?;
                }
                Ok(())
            }
            Event::SwappedOut { victim, disk_frame } => writeln!(
                self.out,
                "Page {} of process {} swapped out to frame {} of the swap area",
                victim.page, victim.pid, disk_frame
            ),
            Event::SwappedIn { key, ram_frame } => writeln!(
                self.out,
                "Page {} of process {} swapped in to frame {} of real memory",
                key.page, key.pid, ram_frame
            ),
            Event::PageFault { key } => writeln!(
                self.out,
                "Page fault on page {} of process {}",
                key.page, key.pid
            ),
            Event::Accessed {
                pid,
                addr,
                real_address,
                write,
            } => {
                let verb = if *write { "Write to" } else { "Read from" };
                writeln!(
                    self.out,
                    "{} virtual address {} of process {}: real address {}",
                    verb, addr, pid, real_address
                )
            }
            Event::Freed {
                pid: _,
                ram_frames,
                disk_frames,
            } => {
                if !ram_frames.is_empty() {
                    writeln!(
                        self.out,
                        "Freed real memory frames: {}",
                        merge_frame_ranges(ram_frames)
                    )?;
                }
                if !disk_frames.is_empty() {
                    writeln!(
                        self.out,
                        "Freed swap area frames: {}",
                        merge_frame_ranges(disk_frames)
                    )?;
                }
                Ok(())
            }
            Event::Comment(text) => writeln!(self.out, "{}", text),
            Event::StatsRow {
                pid,
                faults,
                swap_ins,
                swap_outs,
                turnaround,
            } => match turnaround {
                Some(turnaround) => writeln!(
                    self.out,
                    "Process {}: {} page faults, {} swap-ins, {} swap-outs, turnaround {}",
                    pid, faults, swap_ins, swap_outs, turnaround
                ),
                None => writeln!(
                    self.out,
                    "Process {}: {} page faults, {} swap-ins, {} swap-outs, still active",
                    pid, faults, swap_ins, swap_outs
                ),
            },
            Event::StatsSummary {
                freed,
                mean_turnaround,
            } => match mean_turnaround {
                Some(mean) => writeln!(
                    self.out,
                    "Average turnaround over {} freed processes: {:.2}",
                    freed, mean
                ),
                None => writeln!(self.out, "No processes have been freed, no turnaround to report"),
            },
            Event::Rejected(error) => writeln!(self.out, "Error: {}", error),
            Event::Malformed(error) => writeln!(self.out, "Error: {}", error),
            Event::Terminated => writeln!(self.out, "End of program"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use crate::script::{ScriptError, ScriptErrorKind};
    use crate::vmm::paging::engine::EngineError;
    use crate::vmm::types::{PageKey, SimTime};

    fn render(events: &[Event]) -> String {
        let mut renderer = TextRenderer::new(Vec::new());
        for event in events {
            renderer.emit(event).unwrap();
        }
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[rstest]
    fn test_allocation_prints_the_assigned_ranges() {
        let out = render(&[Event::Allocated {
            pid: "p1".to_string(),
            bytes: 40,
            pages: 3,
            ram_frames: vec![7, 6, 5, 10],
        }]);
        assert_eq!(
            out,
            "Allocate 40 bytes (3 pages) to process p1\n\
             Assigned page frames 5-7, 10 to process p1\n"
        );
    }

    #[rstest]
    fn test_allocation_without_free_frames_skips_the_range_line() {
        let out = render(&[Event::Allocated {
            pid: "p1".to_string(),
            bytes: 32,
            pages: 2,
            ram_frames: vec![],
        }]);
        assert_eq!(out, "Allocate 32 bytes (2 pages) to process p1\n");
    }

    #[rstest]
    fn test_swap_and_fault_lines() {
        let out = render(&[
            Event::PageFault {
                key: PageKey::new("p1", 2),
            },
            Event::SwappedOut {
                victim: PageKey::new("p2", 0),
                disk_frame: 9,
            },
            Event::SwappedIn {
                key: PageKey::new("p1", 2),
                ram_frame: 4,
            },
        ]);
        assert_eq!(
            out,
            "Page fault on page 2 of process p1\n\
             Page 0 of process p2 swapped out to frame 9 of the swap area\n\
             Page 2 of process p1 swapped in to frame 4 of real memory\n"
        );
    }

    #[rstest]
    #[case(false, "Read from virtual address 35 of process p1: real address 3\n")]
    #[case(true, "Write to virtual address 35 of process p1: real address 3\n")]
    fn test_access_lines(#[case] write: bool, #[case] expected: &str) {
        let out = render(&[Event::Accessed {
            pid: "p1".to_string(),
            addr: 35,
            real_address: 3,
            write,
        }]);
        assert_eq!(out, expected);
    }

    #[rstest]
    fn test_free_prints_one_line_per_occupied_tier() {
        let out = render(&[Event::Freed {
            pid: "p1".to_string(),
            ram_frames: vec![1, 0],
            disk_frames: vec![3],
        }]);
        assert_eq!(
            out,
            "Freed real memory frames: 0-1\n\
             Freed swap area frames: 3\n"
        );

        let out = render(&[Event::Freed {
            pid: "p1".to_string(),
            ram_frames: vec![2],
            disk_frames: vec![],
        }]);
        assert_eq!(out, "Freed real memory frames: 2\n");
    }

    #[rstest]
    fn test_stats_rows_distinguish_freed_from_active() {
        let out = render(&[
            Event::StatsRow {
                pid: "a".to_string(),
                faults: 2,
                swap_ins: 1,
                swap_outs: 3,
                turnaround: Some(SimTime::from_ticks(32)),
            },
            Event::StatsRow {
                pid: "b".to_string(),
                faults: 0,
                swap_ins: 0,
                swap_outs: 0,
                turnaround: None,
            },
        ]);
        assert_eq!(
            out,
            "Process a: 2 page faults, 1 swap-ins, 3 swap-outs, turnaround 3.2\n\
             Process b: 0 page faults, 0 swap-ins, 0 swap-outs, still active\n"
        );
    }

    #[rstest]
    fn test_summary_with_and_without_data() {
        let out = render(&[Event::StatsSummary {
            freed: 2,
            mean_turnaround: Some(2.25),
        }]);
        assert_eq!(out, "Average turnaround over 2 freed processes: 2.25\n");

        let out = render(&[Event::StatsSummary {
            freed: 0,
            mean_turnaround: None,
        }]);
        assert_eq!(out, "No processes have been freed, no turnaround to report\n");
    }

    #[rstest]
    fn test_errors_render_their_message() {
        let out = render(&[
            Event::Rejected(EngineError::AlreadyActive {
                pid: "p1".to_string(),
            }),
            Event::Malformed(ScriptError {
                line: 3,
                kind: ScriptErrorKind::UnknownCommand("Q".to_string()),
            }),
        ]);
        assert_eq!(
            out,
            "Error: process p1 is already in memory, free it before loading it again\n\
             Error: line 3: unknown command 'Q'\n"
        );
    }

    #[rstest]
    fn test_comment_and_termination() {
        let out = render(&[
            Event::Comment("first load".to_string()),
            Event::Terminated,
        ]);
        assert_eq!(out, "first load\nEnd of program\n");
    }
}
