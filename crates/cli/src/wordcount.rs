use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use shardmr_engine::{Emitter, MapReduce, ReduceContext, RunReport};
use tracing::warn;

pub type WordCounts = BTreeMap<String, u64>;

/// Emits `(word, "1")` for every whitespace-separated word in the file.
/// Invalid UTF-8 is replaced rather than rejected. Unreadable files are
/// logged and contribute nothing.
fn map_file(path: &PathBuf, emit: &Emitter<'_>) {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "skipping unreadable input");
            return;
        }
    };
    for word in String::from_utf8_lossy(&bytes).split_whitespace() {
        emit.emit(word, "1");
    }
}

/// Reducer that drains a key's values and records their sum.
fn summing_reducer(
    counts: Arc<Mutex<WordCounts>>,
) -> impl Fn(&str, &mut ReduceContext<'_>) + Send + Sync + 'static {
    move |word: &str, ctx: &mut ReduceContext<'_>| {
        let total: u64 = ctx.values(word).filter_map(|v| v.parse::<u64>().ok()).sum();
        counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(word.to_string(), total);
    }
}

/// Count words across `paths`.
pub fn count_files(engine: &MapReduce, paths: Vec<PathBuf>) -> Result<(WordCounts, RunReport)> {
    let counts = Arc::new(Mutex::new(WordCounts::new()));
    let report = engine.run_files(paths, map_file, summing_reducer(Arc::clone(&counts)))?;

    let counts = std::mem::take(&mut *counts.lock().unwrap_or_else(PoisonError::into_inner));
    Ok((counts, report))
}

pub fn write_counts(counts: &WordCounts, out: &mut impl Write) -> io::Result<()> {
    for (word, count) in counts {
        writeln!(out, "{word} {count}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use shardmr_core::EngineConfig;

    use super::*;

    #[test]
    fn counts_words_across_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.txt");
        let second = dir.path().join("b.txt");
        fs::write(&first, "to be or not to be").unwrap();
        fs::write(&second, "be quick\n\tbe  done").unwrap();

        let engine = MapReduce::new(EngineConfig::new(2, 3)).unwrap();
        let (counts, report) = count_files(&engine, vec![first, second]).unwrap();

        assert_eq!(counts.get("be"), Some(&4));
        assert_eq!(counts.get("to"), Some(&2));
        assert_eq!(counts.get("done"), Some(&1));
        assert_eq!(counts.len(), 6);
        assert_eq!(report.total_pairs(), 10);
    }

    #[test]
    fn unreadable_file_contributes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("present.txt");
        fs::write(&present, "alpha alpha").unwrap();

        let engine = MapReduce::new(EngineConfig::new(1, 2)).unwrap();
        let (counts, report) =
            count_files(&engine, vec![dir.path().join("gone.txt"), present]).unwrap();

        assert_eq!(counts.into_iter().collect::<Vec<_>>(), vec![("alpha".to_string(), 2)]);
        assert_eq!(report.map.jobs, 2);
    }

    #[test]
    fn invalid_utf8_does_not_drop_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.bin");
        fs::write(&path, b"good words \xff\xfe good\n").unwrap();

        let engine = MapReduce::new(EngineConfig::new(1, 2)).unwrap();
        let (counts, _) = count_files(&engine, vec![path]).unwrap();

        assert_eq!(counts.get("good"), Some(&2));
        assert_eq!(counts.get("words"), Some(&1));
        assert_eq!(counts.values().sum::<u64>(), 4);
    }

    #[test]
    fn output_is_sorted_word_count_lines() {
        let counts: WordCounts = [("zeta", 1), ("alpha", 3), ("Mid", 2)]
            .into_iter()
            .map(|(w, c)| (w.to_string(), c))
            .collect();
        let mut out = Vec::new();
        write_counts(&counts, &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Mid 2\nalpha 3\nzeta 1\n");
    }
}
