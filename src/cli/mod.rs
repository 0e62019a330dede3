use std::io;

use anyhow::Result;

mod args;
mod exit_status;
mod report;
mod run;

pub use args::Arguments;
pub use exit_status::ExitStatus;
pub use run::{RunSummary, run};

use report::print_summary;

/// Run popie and print the final verdict.
pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let summary = {
        let mut stdout = io::stdout().lock();
        run(&args, &mut stdout)?
    };

    Ok(conclude(&summary, args.strict))
}

fn conclude(summary: &RunSummary, strict: bool) -> ExitStatus {
    if strict && summary.updated_files > 0 {
        print_summary(&format!(
            "{} files updated in strict mode.",
            summary.updated_files
        ));
        ExitStatus::Software
    } else if summary.error_count > 0 {
        print_summary(&format!("{} errors found.", summary.error_count));
        ExitStatus::Software
    } else {
        print_summary(&format!(
            "{} files have been updated.",
            summary.updated_files
        ));
        ExitStatus::Success
    }
}
