mod config;
mod db;
mod models;
mod report;
mod run;

use anyhow::Result;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();
    let (config, args) = config::Config::from_args(&args)?;
    let mut db = db::Database::open(&config.db_path)?;

    match args.len() {
        0 | 1 => run::as_menu(&mut db, &config),
        _ => run::as_cli(&args, &mut db, &config),
    }
}
