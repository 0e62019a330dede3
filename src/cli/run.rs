use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Result;
use log::debug;

use super::{
    args::Arguments,
    report::{display_path, print_diff_to, print_error_to, print_info_to, print_warning_to},
};
use crate::{
    config::{Config, load_config},
    core::{
        Analyzer, Catalog, StringPool,
        discovery::{ROOT_MARKER_FILE, find_directories, python_files, resolve_paths},
        parsers::python::parse_python_file,
    },
};

/// Outcome of a run over all i18n directories.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Analyzer errors plus catalog validation errors.
    pub error_count: usize,
    /// Catalog files whose content changed.
    pub updated_files: usize,
}

/// Synchronize the catalogs of every i18n directory the given paths belong to.
pub fn run<W: Write>(args: &Arguments, writer: &mut W) -> Result<RunSummary> {
    let paths = resolve_paths(&args.paths)?;
    let discovery = find_directories(&paths, args.detached)?;
    debug!("Project root: {}", discovery.root.display());

    let config = load_config(&discovery.root)?;
    if config.from_file {
        debug!("Using configuration from {}", discovery.root.display());
    }
    let config = config.config.with_languages(args.languages.clone());
    config.validate()?;

    for path in &discovery.ignored {
        print_warning_to(
            &format!(
                "Ignoring '{}': directory criteria not matched (could not find '{}' script).",
                display_path(path),
                ROOT_MARKER_FILE
            ),
            writer,
        )?;
    }

    let mut summary = RunSummary::default();
    for directory in &discovery.directories {
        let run = DirectoryRun {
            directory,
            config: &config,
            show_diff: args.diff,
        };
        run.execute(writer, &mut summary)?;
    }

    Ok(summary)
}

struct DirectoryRun<'a> {
    directory: &'a Path,
    config: &'a Config,
    show_diff: bool,
}

impl DirectoryRun<'_> {
    fn execute<W: Write>(&self, writer: &mut W, summary: &mut RunSummary) -> Result<()> {
        let (pool, error_count) = self.collect_strings(writer)?;
        let directory = display_path(self.directory);

        if error_count > 0 {
            summary.error_count += error_count;
            print_error_to(
                &format!(
                    "Directory '{}' contains {} errors, .popie files will not be updated.",
                    directory, error_count
                ),
                writer,
            )?;
            return Ok(());
        }

        print_info_to(
            &format!("Found {} strings in '{}'.", pool.len(), directory),
            writer,
        )?;

        for language in &self.config.languages {
            self.sync_catalog(language, &pool, writer, summary)?;
        }

        Ok(())
    }

    /// Analyze every Python file, printing diagnostics as they are found.
    fn collect_strings<W: Write>(&self, writer: &mut W) -> Result<(StringPool, usize)> {
        let mut pool = StringPool::new();
        let mut error_count = 0;

        for file in python_files(self.directory)? {
            let source_file = PathBuf::from(display_path(&file));
            debug!("Opening {}", source_file.display());

            let module = parse_python_file(&file)?;
            let mut analyzer = Analyzer::new(&source_file, &self.config.contexts);
            analyzer.analyze(&module);
            debug!(
                "{} strings found in {}",
                analyzer.strings().len(),
                source_file.display()
            );

            analyzer.report_errors(writer)?;
            analyzer.report_warnings(writer)?;
            error_count += analyzer.errors().len();
            pool.add_strings(analyzer.strings());
        }

        Ok((pool, error_count))
    }

    fn sync_catalog<W: Write>(
        &self,
        language: &str,
        pool: &StringPool,
        writer: &mut W,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let mut catalog = Catalog::for_language(self.directory, language)?;
        catalog.update(pool);
        catalog.save()?;

        if catalog.is_updated() {
            summary.updated_files += 1;
            let label = display_path(catalog.path());
            if let Some(diff) = catalog.diff(&label).filter(|_| self.show_diff) {
                print_diff_to(&diff, writer)?;
            }
        }

        for error in catalog.errors() {
            print_error_to(error, writer)?;
        }
        summary.error_count += catalog.errors().len();

        print_info_to(
            &format!(
                "Saving {} translated strings to '{}'.",
                catalog.translated_count(),
                display_path(catalog.path())
            ),
            writer,
        )?;

        Ok(())
    }
}
