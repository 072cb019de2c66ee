use clap::FromArgMatches;
use std::process::ExitCode;
use tfc::cli::{self, Cli};
use tfc::core::error::CliError;
use tfc::core::registry::Registry;

fn main() -> ExitCode {
    // Install miette's fancy error handler for beautiful diagnostics
    let _ = miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }));

    // The catalog is validated before any argument is looked at
    let registry = match Registry::global() {
        Ok(registry) => registry,
        Err(e) => return report(e.into()),
    };

    let matches = cli::command(registry).get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };
    cli::init_logging(&cli.global);

    match cli::run(&cli, registry) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(e),
    }
}

fn report(error: CliError) -> ExitCode {
    let code = error.exit_code();
    eprintln!("{:?}", miette::Report::new(error));
    ExitCode::from(code)
}
