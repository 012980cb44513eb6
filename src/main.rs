use clap::Parser;
use regtool::cli::{self, Cli};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset. Lifecycle messages show by default.
fn default_directive(debug: bool) -> &'static str {
    if debug {
        "regtool=debug"
    } else {
        "regtool=info"
    }
}

fn init_logging(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let mut stdout = std::io::stdout().lock();
    match cli::run(cli, &mut stdout) {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_shows_lifecycle_messages() {
        assert_eq!(default_directive(false), "regtool=info");
        assert_eq!(default_directive(true), "regtool=debug");
    }

    #[test]
    fn test_default_directives_parse() {
        for debug in [false, true] {
            assert!(EnvFilter::try_new(default_directive(debug)).is_ok());
        }
    }
}
