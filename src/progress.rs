//! Progress bars that share the terminal with log output
//!
//! Every bar is registered with one process-wide [`MultiProgress`]. Log lines
//! written through [`LogWriter`] clear the bars, print, and redraw them, so a
//! per-file log line never tears the bar apart.

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::sync::OnceLock;

fn bars() -> &'static MultiProgress {
    static BARS: OnceLock<MultiProgress> = OnceLock::new();
    BARS.get_or_init(MultiProgress::new)
}

/// A file-count bar drawn alongside the log output.
pub fn file_bar(total: u64) -> ProgressBar {
    let pb = bars().add(ProgressBar::new(total));
    if let Ok(style) = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({eta})")
    {
        pb.set_style(style.progress_chars("█▓░"));
    }
    pb
}

/// Stderr writer for the tracing subscriber that suspends active bars.
///
/// ```rust,no_run
/// tracing_subscriber::fmt()
///     .with_writer(riccar_fetch::progress::LogWriter::default)
///     .init();
/// ```
#[derive(Debug, Default)]
pub struct LogWriter;

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        bars().suspend(|| io::stderr().write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}
