use anyhow::{Context, Result};
use std::path::PathBuf;

pub(crate) const DB_ENV: &str = "BUDGET_TRACKER_DB";
pub(crate) const EXPORT_ENV: &str = "BUDGET_TRACKER_EXPORT";
pub(crate) const DEFAULT_EXPORT_FILE: &str = "transactions_export.csv";

/// Where the store lives and where CSV exports go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) db_path: PathBuf,
    pub(crate) export_path: PathBuf,
}

impl Config {
    /// Resolve the configuration from `--db`/`--export-path` flags, then the
    /// environment, then defaults. Returns the arguments with those flags
    /// removed.
    pub(crate) fn from_args(args: &[String]) -> Result<(Self, Vec<String>)> {
        Self::resolve(args, |key| std::env::var(key).ok(), default_db_path)
    }

    fn resolve(
        args: &[String],
        env: impl Fn(&str) -> Option<String>,
        default_db: impl FnOnce() -> Result<PathBuf>,
    ) -> Result<(Self, Vec<String>)> {
        let (db_flag, rest) = take_flag(args, "--db")?;
        let (export_flag, rest) = take_flag(&rest, "--export-path")?;

        let db_path = match db_flag.or_else(|| env(DB_ENV)) {
            Some(p) => PathBuf::from(shellexpand(&p)),
            None => default_db()?,
        };
        let export_path = export_flag
            .or_else(|| env(EXPORT_ENV))
            .map(|p| PathBuf::from(shellexpand(&p)))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE));

        log::debug!(
            "Using database {} and export path {}",
            db_path.display(),
            export_path.display()
        );
        Ok((
            Self {
                db_path,
                export_path,
            },
            rest,
        ))
    }
}

/// Remove `flag <value>` from the arguments, returning the value if present.
fn take_flag(args: &[String], flag: &str) -> Result<(Option<String>, Vec<String>)> {
    let Some(pos) = args.iter().position(|a| a == flag) else {
        return Ok((None, args.to_vec()));
    };
    let value = args
        .get(pos + 1)
        .filter(|v| !v.starts_with("--"))
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Missing value for {flag}"))?;
    let mut rest = args.to_vec();
    rest.drain(pos..=pos + 1);
    Ok((Some(value), rest))
}

fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "budget-tracker", "BudgetTracker")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("transactions.db"))
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn fixed_default() -> Result<PathBuf> {
        Ok(PathBuf::from("/data/transactions.db"))
    }

    #[test]
    fn test_defaults() {
        let (config, rest) =
            Config::resolve(&args(&["budget-tracker"]), no_env, fixed_default).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/data/transactions.db"));
        assert_eq!(config.export_path, PathBuf::from(DEFAULT_EXPORT_FILE));
        assert_eq!(rest, args(&["budget-tracker"]));
    }

    #[test]
    fn test_flags_are_removed() {
        let input = args(&[
            "budget-tracker",
            "--db",
            "/tmp/a.db",
            "report",
            "--export-path",
            "/tmp/out.csv",
            "--sort",
            "amount",
        ]);
        let (config, rest) = Config::resolve(&input, no_env, fixed_default).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/a.db"));
        assert_eq!(config.export_path, PathBuf::from("/tmp/out.csv"));
        assert_eq!(rest, args(&["budget-tracker", "report", "--sort", "amount"]));
    }

    #[test]
    fn test_env_used_when_no_flag() {
        let env = |key: &str| match key {
            DB_ENV => Some("/env/db.sqlite".to_string()),
            EXPORT_ENV => Some("/env/out.csv".to_string()),
            _ => None,
        };
        let (config, _) = Config::resolve(&args(&["bt"]), env, fixed_default).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/env/db.sqlite"));
        assert_eq!(config.export_path, PathBuf::from("/env/out.csv"));
    }

    #[test]
    fn test_flag_beats_env() {
        let env = |_: &str| Some("/env/value".to_string());
        let (config, _) =
            Config::resolve(&args(&["bt", "--db", "/flag.db"]), env, fixed_default).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/flag.db"));
        assert_eq!(config.export_path, PathBuf::from("/env/value"));
    }

    #[test]
    fn test_default_not_consulted_when_db_given() {
        let (config, _) = Config::resolve(&args(&["bt", "--db", "x.db"]), no_env, || {
            anyhow::bail!("default should not be resolved")
        })
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("x.db"));
    }

    #[test]
    fn test_missing_flag_value() {
        assert!(Config::resolve(&args(&["bt", "--db"]), no_env, fixed_default).is_err());
        assert!(
            Config::resolve(&args(&["bt", "--db", "--export-path", "x"]), no_env, fixed_default)
                .is_err()
        );
    }

    #[test]
    fn test_shellexpand() {
        assert_eq!(shellexpand("/abs/path.csv"), "/abs/path.csv");
        assert_eq!(shellexpand("relative.csv"), "relative.csv");
        assert!(!shellexpand("~/out.csv").starts_with('~'));
    }
}
