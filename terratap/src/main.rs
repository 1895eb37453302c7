//! Feed recorded observer state messages through the decode pipeline and
//! dump the resulting subject table.
//!
//! Input is one serialized token-stream message per line; the messages are
//! applied in order to a single cache, so the dump shows the final state
//! after the whole recording. With `--log`, every intermediate update is
//! also appended to a JSONL file through the log-file observer.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use terraobs::{
    BlackBoard, DecodeOptions, Decoder, LogFileObserver, ObserverRegistry, SubjectSnapshot,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File of serialized state messages, one per line ("-" for stdin)
    input: PathBuf,

    /// Protocol separator the producer was configured with
    #[arg(long, default_value_t = terrawire::DEFAULT_SEPARATOR)]
    separator: char,

    /// Append per-update subject snapshots to this JSONL file
    #[arg(long)]
    log: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = std::str::FromStr::from_str(&args.log_level).unwrap_or(log::LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    let contents = if args.input.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        buffer
    } else {
        std::fs::read_to_string(&args.input)
            .with_context(|| format!("failed to read {}", args.input.display()))?
    };

    let mut board = BlackBoard::new();
    let mut registry = ObserverRegistry::new();
    if let Some(path) = &args.log {
        let observer = LogFileObserver::file(path)
            .with_context(|| format!("failed to open log sink {}", path.display()))?;
        registry.register(Box::new(observer));
    }

    let options = DecodeOptions {
        separator: args.separator,
    };
    let applied = replay(&mut board, &registry, &options, &contents)?;
    log::info!("applied {} messages, {} subjects cached", applied, board.len());

    dump(&board)
}

/// Apply each non-empty line as one message; returns how many were applied.
fn replay(
    board: &mut BlackBoard,
    registry: &ObserverRegistry,
    options: &DecodeOptions,
    contents: &str,
) -> Result<usize> {
    let mut applied = 0;
    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        board.reset_changed_subjects();
        let root = Decoder::with_options(board, options.clone())
            .decode(line)
            .with_context(|| format!("malformed message on line {}", index + 1))?;
        log::debug!(
            "line {}: applied subject {} ({} nested changed)",
            index + 1,
            root,
            board.changed_subjects()
        );
        registry.notify(board, root);
        applied += 1;
    }
    Ok(applied)
}

/// Print the final subject table as JSON lines, ordered by id.
fn dump(board: &BlackBoard) -> Result<()> {
    let mut records: Vec<_> = board.subjects().collect();
    records.sort_by_key(|record| record.id);
    for record in records {
        println!("{}", serde_json::to_string(&SubjectSnapshot::of(record))?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_applies_messages_in_order() {
        let mut board = BlackBoard::new();
        let registry = ObserverRegistry::new();
        let contents = "1;2;0;1;2;1;1;0;temp;1;20\n\n1;2;0;1;3;1;0;0\n";

        let applied = replay(&mut board, &registry, &DecodeOptions::default(), contents).unwrap();

        assert_eq!(applied, 2);
        // Second message replaced the first one's nested membership.
        assert_eq!(board.subject(1).unwrap().nested(), &[3]);
        assert_eq!(board.subject(2).unwrap().number("temp"), Some(20.0));
    }

    #[test]
    fn test_replay_reports_failing_line() {
        let mut board = BlackBoard::new();
        let registry = ObserverRegistry::new();
        let contents = "1;1;0;0\n7;1;2;0;hp;1\n";

        let err = replay(&mut board, &registry, &DecodeOptions::default(), contents).unwrap_err();
        assert!(err.to_string().contains("line 2"));
        // The first message stayed applied.
        assert!(board.subject(1).is_some());
    }

    #[test]
    fn test_replay_logs_to_sink() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("updates.jsonl");

        let mut board = BlackBoard::new();
        let mut registry = ObserverRegistry::new();
        registry.register(Box::new(LogFileObserver::file(&path).unwrap()));

        replay(
            &mut board,
            &registry,
            &DecodeOptions::default(),
            "7;1;1;0;temp;1;36.6\n",
        )
        .unwrap();
        registry.shutdown();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.contains(r#""id":7"#));
    }
}
