use std::fs;
use std::io;
use std::path::Path;

/// Supplies the map-phase scheduling weight for one input.
///
/// The value only orders map jobs. A failed probe schedules the input with
/// weight 0 and the map job still runs.
pub trait SizeProbe<I: ?Sized> {
    fn probe(&self, input: &I) -> io::Result<u64>;
}

impl<I: ?Sized, F> SizeProbe<I> for F
where
    F: Fn(&I) -> io::Result<u64>,
{
    fn probe(&self, input: &I) -> io::Result<u64> {
        self(input)
    }
}

/// Byte length of a file, from its metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSizeProbe;

impl<P: AsRef<Path> + ?Sized> SizeProbe<P> for FileSizeProbe {
    fn probe(&self, input: &P) -> io::Result<u64> {
        Ok(fs::metadata(input.as_ref())?.len())
    }
}

/// An input together with a weight the caller already knows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Weighted<T> {
    pub weight: u64,
    pub item: T,
}

impl<T> Weighted<T> {
    pub fn new(weight: u64, item: T) -> Self {
        Self { weight, item }
    }
}

/// Probe for [`Weighted`] inputs: reports the attached weight.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedWeights;

impl<T> SizeProbe<Weighted<T>> for FixedWeights {
    fn probe(&self, input: &Weighted<T>) -> io::Result<u64> {
        Ok(input.weight)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn file_size_probe_reads_length() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello world").unwrap();
        file.flush().unwrap();

        assert_eq!(FileSizeProbe.probe(file.path()).unwrap(), 11);
    }

    #[test]
    fn file_size_probe_fails_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        assert!(FileSizeProbe.probe(&missing).is_err());
    }

    #[test]
    fn fixed_weights_report_attached_weight() {
        let input = Weighted::new(42, "text");
        assert_eq!(FixedWeights.probe(&input).unwrap(), 42);
    }

    #[test]
    fn closures_are_probes() {
        let probe = |s: &String| -> io::Result<u64> { Ok(s.len() as u64) };
        assert_eq!(probe.probe(&"abc".to_string()).unwrap(), 3);
    }
}
