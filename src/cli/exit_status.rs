use std::process::ExitCode;

/// Exit status of a run, following the BSD `sysexits.h` conventions.
///
/// - `Success` (0): catalogs are in sync (or were updated outside of strict mode)
/// - `Input` (64): bad command line input (missing path, no project root, unparsable source)
/// - `Software` (70): errors were found, strict mode caught a change, or an internal failure
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Input,
    Software,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Input => 64,
            ExitStatus::Software => 70,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}
