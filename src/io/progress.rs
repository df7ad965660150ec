//! Stage progress bars for the parallel parts of a run
//!
//! Log records are routed through the same display so a line printed while
//! bars are drawn does not tear them.

use crate::io::configuration::{MAX_INDIVIDUAL_PROGRESS_BARS, PROGRESS_BAR_WIDTH};
use env_logger::{Builder, Env, Target};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::sync::LazyLock;

static STAGE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    let template = format!(
        "{{prefix:>20}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} ({{elapsed}})"
    );
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_template_error| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Owns one bar per pipeline stage
///
/// At most [`MAX_INDIVIDUAL_PROGRESS_BARS`] bars stay on screen; starting a
/// further stage removes the oldest finished one. A quiet manager hands out
/// hidden bars that still count but draw nothing.
pub struct ProgressManager {
    multi_progress: Option<MultiProgress>,
    stages: Vec<ProgressBar>,
}

impl ProgressManager {
    /// Create a manager that draws bars when `visible`
    pub fn new(visible: bool) -> Self {
        Self {
            multi_progress: visible.then(MultiProgress::new),
            stages: Vec::new(),
        }
    }

    /// Manager whose bars are never drawn
    pub fn hidden() -> Self {
        Self::new(false)
    }

    /// Whether bars are drawn
    pub const fn is_visible(&self) -> bool {
        self.multi_progress.is_some()
    }

    /// Start a bar labelled `name`
    ///
    /// Its length is set by the stage once the amount of work is known.
    pub fn start_stage(&mut self, name: &'static str) -> ProgressBar {
        let Some(multi_progress) = &self.multi_progress else {
            let bar = ProgressBar::hidden();
            self.stages.push(bar.clone());
            return bar;
        };

        if self.stages.len() >= MAX_INDIVIDUAL_PROGRESS_BARS
            && let Some(position) = self.stages.iter().position(ProgressBar::is_finished)
        {
            let finished = self.stages.remove(position);
            multi_progress.remove(&finished);
        }

        let bar = multi_progress.add(ProgressBar::new(0));
        bar.set_style(STAGE_STYLE.clone());
        bar.set_prefix(name);
        self.stages.push(bar.clone());
        bar
    }

    /// Writer that clears the bars around every write
    pub fn log_writer<W: Write>(&self, inner: W) -> SuspendingWriter<W> {
        SuspendingWriter::new(self.multi_progress.clone(), inner)
    }

    /// Install the global logger, defaulting to `default_filter` unless
    /// `RUST_LOG` is set
    ///
    /// Records share stderr with the bars when they are visible. A logger that
    /// is already installed is left in place.
    pub fn init_logging(&self, default_filter: &str) {
        let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter));
        if self.is_visible() {
            builder.target(Target::Pipe(Box::new(self.log_writer(io::stderr()))));
        }
        if let Err(error) = builder.try_init() {
            log::debug!("Keeping existing logger: {error}");
        }
    }

    /// Number of bars currently tracked
    pub const fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Finish every bar and clear the display
    pub fn finish(&self) {
        for bar in &self.stages {
            if !bar.is_finished() {
                bar.finish();
            }
        }
        if let Some(multi_progress) = &self.multi_progress
            && let Err(error) = multi_progress.clear()
        {
            log::debug!("Could not clear progress display: {error}");
        }
    }
}

/// Forwards writes to `inner` with the progress display suspended
pub struct SuspendingWriter<W> {
    multi_progress: Option<MultiProgress>,
    inner: W,
}

impl<W: Write> SuspendingWriter<W> {
    /// Wrap `inner`; without a display the writer passes straight through
    pub const fn new(multi_progress: Option<MultiProgress>, inner: W) -> Self {
        Self {
            multi_progress,
            inner,
        }
    }

    /// Underlying writer
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for SuspendingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &self.multi_progress {
            Some(multi_progress) => multi_progress.suspend(|| self.inner.write(buf)),
            None => self.inner.write(buf),
        }
    }

    // One record is written in a single suspension
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match &self.multi_progress {
            Some(multi_progress) => multi_progress.suspend(|| self.inner.write_all(buf)),
            None => self.inner.write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
