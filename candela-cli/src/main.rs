use anyhow::Result;
use candela_cli::app;

fn main() -> Result<()> {
    app::run()
}
