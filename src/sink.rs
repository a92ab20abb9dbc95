//! Tabular output for benchmark results.

use crate::error::Result;
use crate::harness::BenchmarkResult;
use csv::Writer;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub const CSV_HEADER: &str = "Approach,MatrixSize,AverageWall,AverageCPU,PeakMemoryKB,Threads,Speedup_vs_Basic,Efficiency_per_thread,Extra";

/// Consumer of finished benchmark results.
pub trait ResultSink {
    fn write(&mut self, result: &BenchmarkResult) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl ResultSink for Vec<BenchmarkResult> {
    fn write(&mut self, result: &BenchmarkResult) -> Result<()> {
        self.push(result.clone());
        Ok(())
    }
}

/// CSV writer. The header goes out once, when the sink is created.
///
/// Times are seconds with 6 decimals, memory is whole KB, speed-up and
/// efficiency have 3 decimals. Anything unsupported or not applicable is an
/// empty cell. Quoting is left to the `csv` writer.
pub struct CsvSink<W: Write> {
    out: Writer<W>,
}

impl CsvSink<File> {
    /// Creates (or truncates) `path`, making parent directories as needed.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        CsvSink::new(File::create(path)?)
    }
}

impl<W: Write> CsvSink<W> {
    pub fn new(out: W) -> Result<Self> {
        let mut out = Writer::from_writer(out);
        out.write_record(CSV_HEADER.split(','))?;
        Ok(CsvSink { out })
    }

    /// Flushes buffered rows and hands back the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.out.into_inner().map_err(|e| e.into_error().into())
    }
}

impl<W: Write> ResultSink for CsvSink<W> {
    fn write(&mut self, result: &BenchmarkResult) -> Result<()> {
        self.out.write_record(&row_fields(result))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// The nine cells of one result row, formatted but not quoted.
pub fn row_fields(r: &BenchmarkResult) -> [String; 9] {
    let opt = |v: Option<String>| v.unwrap_or_default();
    [
        r.strategy().to_string(),
        r.size().to_string(),
        format!("{:.6}", r.avg_wall_secs()),
        opt(r.avg_cpu_secs().map(|c| format!("{:.6}", c))),
        opt(r.peak_memory_kb().map(|kb| kb.to_string())),
        opt(r.threads().map(|t| t.to_string())),
        opt(r.speedup().map(|s| format!("{:.3}", s))),
        opt(r.efficiency().map(|e| format!("{:.3}", e))),
        r.note().unwrap_or("").to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::RunSample;
    use std::time::Duration;

    fn result(wall_ms: u64, cpu: bool) -> BenchmarkResult {
        BenchmarkResult::from_samples(
            "Blocked",
            128,
            vec![RunSample {
                wall: Duration::from_millis(wall_ms),
                cpu: cpu.then(|| Duration::from_millis(wall_ms)),
                memory_bytes: Some(20 * 1024),
            }],
        )
    }

    fn render(rows: &[BenchmarkResult]) -> String {
        let mut sink = CsvSink::new(Vec::new()).unwrap();
        for r in rows {
            sink.write(r).unwrap();
        }
        String::from_utf8(sink.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_row_with_unsupported_cpu() {
        let text = render(&[result(250, false)]);
        assert_eq!(text.lines().nth(1), Some("Blocked,128,0.250000,,20,,,,"));
    }

    #[test]
    fn test_row_with_derived_fields() {
        let base = result(500, true);
        let r = result(250, true)
            .with_threads(4)
            .with_baseline(&base)
            .with_note("block_size=64");
        let text = render(&[r]);
        assert_eq!(
            text.lines().nth(1),
            Some("Blocked,128,0.250000,0.250000,20,4,2.000,0.500,block_size=64")
        );
    }

    #[test]
    fn test_fields_are_unquoted() {
        let r = result(250, false).with_note("a,b");
        assert_eq!(row_fields(&r)[8], "a,b");
        assert_eq!(row_fields(&r)[3], "");
    }

    #[test]
    fn test_quotes_in_note_are_doubled() {
        let text = render(&[result(1, false).with_note("say \"hi\"")]);
        assert!(text.lines().nth(1).unwrap().ends_with(",\"say \"\"hi\"\"\""));
    }

    #[test]
    fn test_header_written_once() {
        let text = render(&[result(1, true), result(2, true)]);
        assert_eq!(text.lines().filter(|l| *l == CSV_HEADER).count(), 1);
        assert_eq!(text.lines().count(), 3);
    }
}
