use chrono::{ Local, NaiveDate };
use std::error::Error;
use std::fs::{ self, OpenOptions };
use std::io::Write;
use std::path::{ Path, PathBuf };

use crate::cli::Args;

pub fn log_file_name(date: NaiveDate) -> String {
    format!("grok_query_{}.log", date.format("%Y%m%d"))
}

/// Without a log directory only warnings reach the terminal so they don't
/// interleave with the conversation. With one, the daily file gets `info`.
/// `RUST_LOG` overrides both.
pub fn init(args: &Args) -> Result<Option<PathBuf>, Box<dyn Error + Send + Sync>> {
    let level = match (&args.log_dir, args.debug) {
        (_, true) => "debug",
        (Some(_), false) => "info",
        (None, false) => "warn",
    };
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level)
    );

    let path = match &args.log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let path = Path::new(dir).join(log_file_name(Local::now().date_naive()));
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            builder
                .target(env_logger::Target::Pipe(Box::new(file)))
                .format(|buf, record| {
                    writeln!(
                        buf,
                        "{} - {} - {}",
                        Local::now().format("%Y-%m-%d %H:%M:%S"),
                        record.level(),
                        record.args()
                    )
                });
            Some(path)
        }
        None => None,
    };

    builder.try_init()?;
    Ok(path)
}
