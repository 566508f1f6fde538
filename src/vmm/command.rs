/// One decoded command from the script feed.
///
/// Commands arrive as single-letter opcodes and are decoded once at the
/// boundary; the engine only ever sees these typed variants. Numeric
/// fields keep their signed script representation so the engine itself
/// can reject non-positive sizes and out-of-range addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `P <bytes> <pid>`: create a process and back `bytes` of address space.
    Allocate { bytes: i64, pid: String },
    /// `A <addr> <pid> <0|1>`: touch one virtual address, optionally writing.
    Access { addr: i64, pid: String, write: bool },
    /// `L <pid>`: end the process and release everything it holds.
    Free { pid: String },
    /// `C <text>`: free-form comment, passed through to the report.
    Comment(String),
    /// `F`: emit the end-of-run statistics.
    EndReport,
    /// `E`: stop consuming commands.
    Terminate,
}
