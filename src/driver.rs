use std::io;

use log::{debug, info};

use crate::script::ScriptError;
use crate::vmm::command::Command;
use crate::vmm::event::{Event, EventSink};
use crate::vmm::paging::engine::PagingEngine;

/// Counters describing one completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Commands decoded and handed to the engine.
    pub commands: usize,
    /// Script lines skipped as malformed.
    pub malformed: usize,
    /// Well-formed commands the engine refused.
    pub rejected: usize,
}

/// Replays a command feed against the engine, forwarding every event to
/// the sink.
///
/// Malformed lines become [`Event::Malformed`] records and the replay
/// keeps going. The replay ends at the end of the feed or as soon as the
/// engine consumes a terminate command; only a sink error aborts it.
pub fn run<I, S>(engine: &mut PagingEngine, commands: I, sink: &mut S) -> Result<RunSummary, io::Error>
where
    I: IntoIterator<Item = Result<Command, ScriptError>>,
    S: EventSink,
{
    let mut summary = RunSummary::default();
    for item in commands {
        match item {
            Ok(command) => {
                debug!("executing {:?}", command);
                summary.commands += 1;
                for event in engine.execute(command) {
                    if let Event::Rejected(_) = event {
                        summary.rejected += 1;
                    }
                    sink.emit(&event)?;
                }
                if engine.is_stopped() {
                    break;
                }
            }
            Err(error) => {
                debug!("skipping line {}: {}", error.line, error.kind);
                summary.malformed += 1;
                sink.emit(&Event::Malformed(error))?;
            }
        }
    }
    info!(
        "replay finished: {} commands, {} malformed lines, {} rejected",
        summary.commands, summary.malformed, summary.rejected
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use mockall::Sequence;
    use rstest::rstest;

    use crate::render::TextRenderer;
    use crate::script::ScriptReader;
    use crate::vmm::config::ReplacementPolicy;
    use crate::vmm::event::MockEventSink;
    use crate::vmm::paging::testing::create_testing_engine;

    #[rstest]
    fn test_events_reach_the_sink_in_order() {
        let mut engine = create_testing_engine(2, 4, ReplacementPolicy::Fifo);
        let mut sink = MockEventSink::new();
        let mut sequence = Sequence::new();
        sink.expect_emit()
            .with(eq(Event::Allocated {
                pid: "a".to_string(),
                bytes: 16,
                pages: 1,
                ram_frames: vec![1],
            }))
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| Ok(()));
        sink.expect_emit()
            .with(eq(Event::Comment("done".to_string())))
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| Ok(()));

        let commands = vec![
            Ok(Command::Allocate {
                bytes: 16,
                pid: "a".to_string(),
            }),
            Ok(Command::Comment("done".to_string())),
        ];
        let summary = run(&mut engine, commands, &mut sink).unwrap();
        assert_eq!(
            summary,
            RunSummary {
                commands: 2,
                malformed: 0,
                rejected: 0,
            }
        );
    }

    #[rstest]
    fn test_rejected_commands_are_counted_but_not_fatal() {
        let mut engine = create_testing_engine(2, 4, ReplacementPolicy::Fifo);
        let mut sink = MockEventSink::new();
        sink.expect_emit().times(2).returning(|_| Ok(()));

        let commands = vec![
            Ok(Command::Allocate {
                bytes: -1,
                pid: "a".to_string(),
            }),
            Ok(Command::Allocate {
                bytes: 16,
                pid: "a".to_string(),
            }),
        ];
        let summary = run(&mut engine, commands, &mut sink).unwrap();
        assert_eq!(summary.commands, 2);
        assert_eq!(summary.rejected, 1);
    }

    #[rstest]
    fn test_nothing_is_consumed_after_terminate() {
        let mut engine = create_testing_engine(2, 4, ReplacementPolicy::Fifo);
        let mut sink = MockEventSink::new();
        sink.expect_emit()
            .with(eq(Event::Terminated))
            .times(1)
            .returning(|_| Ok(()));

        let commands = vec![
            Ok(Command::Terminate),
            Ok(Command::Allocate {
                bytes: 16,
                pid: "late".to_string(),
            }),
        ];
        let summary = run(&mut engine, commands, &mut sink).unwrap();
        assert_eq!(summary.commands, 1);
        assert!(engine.is_stopped());
    }

    #[rstest]
    fn test_a_sink_error_aborts_the_replay() {
        let mut engine = create_testing_engine(2, 4, ReplacementPolicy::Fifo);
        let mut sink = MockEventSink::new();
        sink.expect_emit()
            .returning(|_| Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed")));

        let commands = vec![Ok(Command::Comment("x".to_string()))];
        assert!(run(&mut engine, commands, &mut sink).is_err());
    }

    #[rstest]
    fn test_full_script_replay_produces_the_expected_transcript() {
        let script = "C demo\nP 32 a\nX nope\nA 0 a 1\nL a\nF\nE\nP 16 zombie\n";
        let mut engine = create_testing_engine(2, 4, ReplacementPolicy::Fifo);
        let mut renderer = TextRenderer::new(Vec::new());

        let summary = run(&mut engine, ScriptReader::new(script), &mut renderer).unwrap();
        assert_eq!(
            summary,
            RunSummary {
                commands: 6,
                malformed: 1,
                rejected: 0,
            }
        );

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(
            out,
            "demo\n\
             Allocate 32 bytes (2 pages) to process a\n\
             Assigned page frames 0-1 to process a\n\
             Error: line 3: unknown command 'X'\n\
             Write to virtual address 0 of process a: real address 0\n\
             Freed real memory frames: 0-1\n\
             Process a: 0 page faults, 0 swap-ins, 0 swap-outs, turnaround 3.2\n\
             Average turnaround over 1 freed processes: 3.20\n\
             End of program\n"
        );
    }
}
