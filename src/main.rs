use vault_provider_codegen::{cli, logging};

fn main() -> anyhow::Result<()> {
    let _guard = logging::init_logging()?;
    cli::run_cli()
}
