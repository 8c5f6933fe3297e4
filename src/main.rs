use std::sync::Arc;

use anyhow::Result;

use reposetup::executor::{RemoteExecutor, SshExecutor};
use reposetup::probe::{HttpProber, RepoProber};
use reposetup::{cli, init_logging, run_apply, run_teardown, run_validate};

fn main() -> Result<()> {
    let args = cli::parse_args()?;
    init_logging(args.log_level())?;

    match &args.command {
        cli::Commands::Apply(opts) => {
            let executor: Arc<dyn RemoteExecutor> = Arc::new(SshExecutor {
                dry_run: opts.dry_run,
            });
            // Probing is read-only, so it runs even in dry-run mode.
            let prober: Arc<dyn RepoProber> = Arc::new(HttpProber::new());
            run_apply(opts, executor, prober)
        }
        cli::Commands::Teardown(opts) => {
            let executor: Arc<dyn RemoteExecutor> = Arc::new(SshExecutor {
                dry_run: opts.dry_run,
            });
            run_teardown(opts, executor)
        }
        cli::Commands::Validate(opts) => run_validate(opts),
    }
}
