use anyhow::Result;
use sentimap::cli::{parse_args, Commands};
use sentimap::commands::{AnalyzeConfig, LabelFilter};
use sentimap::observability::{init_tracing, install_panic_hook};

fn main() -> Result<()> {
    install_panic_hook();
    let cli = parse_args();

    match cli.command {
        Commands::Analyze {
            comments,
            verdicts,
            platform,
            locator,
            format,
            output,
            filter_axis,
            filter_label,
            limit,
            history,
            config,
            no_parallel,
            verbosity,
        } => {
            init_tracing(verbosity);
            let filter = build_filter(filter_axis, filter_label, limit);
            sentimap::commands::handle_analyze(AnalyzeConfig {
                comments,
                verdicts,
                platform,
                locator,
                format,
                output,
                filter,
                history,
                config,
                parallel: !no_parallel,
            })
        }
        Commands::Init { force } => {
            init_tracing(0);
            sentimap::commands::init_config(force)
        }
    }
}

// clap guarantees axis and label arrive together
fn build_filter(axis: Option<String>, label: Option<String>, limit: i64) -> Option<LabelFilter> {
    match (axis, label) {
        (Some(axis), Some(label)) => Some(LabelFilter { axis, label, limit }),
        _ => None,
    }
}
