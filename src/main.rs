use clap::Parser;
use extract_text::config::default_config_path;
use extract_text::ui::prompt::{confirm, CONFIRM_QUESTION};
use extract_text::{
    build_info, logging, Cli, DocumentFile, ExtractTextError, ExtractionProgress,
    ExtractionReport, OutputFormatter, TextExtract, UserFriendlyError,
};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let app = match TextExtract::from_cli(&cli) {
        Ok(app) => app,
        Err(e) => {
            print_startup_error(&cli, &e);
            return 1;
        }
    };

    if cli.dry_run {
        return handle_dry_run(&cli, &app);
    }

    let result = match cli.file {
        Some(ref path) => app.process_single(path).map(Some),
        None => run_batch(&cli, &app),
    };

    match result {
        Ok(Some(progress)) => {
            let report = ExtractionReport::from_progress(&progress);
            app.output_formatter().print_extraction_report(&report);

            if report.has_failures() {
                2
            } else {
                0
            }
        }
        Ok(None) => 0,
        Err(e) => {
            app.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

/// Scan, list, confirm, then extract. `None` when nothing was processed.
fn run_batch(cli: &Cli, app: &TextExtract) -> extract_text::Result<Option<ExtractionProgress>> {
    let formatter = app.output_formatter();
    let root = cli.scan_root();
    let documents = app.discover(&root)?;

    if documents.is_empty() {
        formatter.info(&format!(
            "No supported files found in {} or its subdirectories.",
            root.display()
        ));
        return Ok(None);
    }

    formatter.print_file_list(&documents);

    if !cli.yes && !confirm(CONFIRM_QUESTION)? {
        formatter.info("No files were processed.");
        return Ok(None);
    }

    app.process_batch(&documents).map(Some)
}

fn exit_code_for(error: &ExtractTextError) -> i32 {
    match error {
        ExtractTextError::MissingCapability { .. } => 3,
        _ => 1,
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);

    match TextExtract::generate_sample_config(&config_path) {
        Ok(()) => {
            println!(
                "Generated sample configuration file: {}",
                config_path.display()
            );
            println!("\nTo use this configuration:");
            println!("  extract-text --config {}", config_path.display());
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(cli: &Cli, app: &TextExtract) -> i32 {
    let formatter = app.output_formatter();

    formatter.info("DRY RUN MODE - No files will be written");
    formatter.print_separator();

    let documents = match cli.file {
        Some(ref path) => match path.metadata() {
            Ok(metadata) => vec![DocumentFile::new(path.clone(), path.clone(), metadata.len())],
            Err(_) => {
                formatter.error(&format!("File '{}' does not exist.", path.display()));
                return 2;
            }
        },
        None => match app.discover(&cli.scan_root()) {
            Ok(documents) => documents,
            Err(e) => {
                app.handle_error(&e);
                return exit_code_for(&e);
            }
        },
    };

    let config = app.config();
    formatter.debug(&format!("Build: {}", build_info()));
    formatter.debug(&format!("Extensions: {}", config.scan.extensions.join(", ")));
    formatter.debug(&format!("Output extension: {}", config.output.extension));

    let unsupported = documents.iter().any(|d| !d.kind.is_supported());
    let to_extract = app.dry_run(&documents);

    formatter.print_separator();
    formatter.success(&format!(
        "{} of {} files would be extracted",
        to_extract,
        documents.len()
    ));
    formatter.info("Run without --dry-run to perform actual extraction");

    if unsupported {
        2
    } else {
        0
    }
}

fn print_startup_error(cli: &Cli, error: &ExtractTextError) {
    let formatter = OutputFormatter::new(cli.output_mode(), 0, false);
    formatter.print_user_friendly_error(error);
}
