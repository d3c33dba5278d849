use cropscan::imaging::RustBackend;
use cropscan::{config, output, process, scan};
use std::process::ExitCode;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

/// Diagnostics go to stderr so they never mix with the per-file report.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::WARN)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let version = version_string();

    let args: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    let parsed = config::from_args(&args);
    if parsed.value().show_help {
        output::print_usage(version);
        return ExitCode::SUCCESS;
    }
    let config = match parsed.into_result() {
        Ok(config) => config,
        Err(faults) => {
            output::print_faults(version, &faults);
            return ExitCode::FAILURE;
        }
    };

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            eprintln!("Cannot determine the current directory: {e}");
            return ExitCode::FAILURE;
        }
    };

    let search = scan::resolve_files(&config.search_specs, &cwd);
    output::print_search_errors(&search.errors);

    let backend = RustBackend::new();
    let summary = process::process(&backend, &search.files, &config, output::print_outcome);
    output::print_summary(&summary, config.what_if);

    ExitCode::SUCCESS
}
