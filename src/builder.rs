/*!
 * Build orchestration with a memoized result
 */

use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::info;

use crate::config::Config;
use crate::document;
use crate::error::Result;
use crate::walker::{WalkStatistics, Walker};
use crate::writer::XmlWriter;

/// Runs a build once and serves its output to every consumer
pub struct Builder {
    config: Config,
    progress: Arc<ProgressBar>,
    /// Serialized output of the last build
    output: Option<Vec<u8>>,
    statistics: WalkStatistics,
}

impl Builder {
    /// Create a new builder
    pub fn new(config: Config, progress: Arc<ProgressBar>) -> Self {
        Self {
            config,
            progress,
            output: None,
            statistics: WalkStatistics::default(),
        }
    }

    /// Serialized document, built on first use
    pub fn build(&mut self) -> Result<&[u8]> {
        let output = match self.output.take() {
            Some(output) => output,
            None => self.run()?,
        };
        Ok(self.output.insert(output).as_slice())
    }

    /// Build if needed and write the result to the configured output file
    pub fn write_output(&mut self) -> Result<usize> {
        let writer = XmlWriter::new(self.config.clone());
        let path = self.config.output.clone();
        let output = self.build()?;
        writer.write(output)?;
        info!(output = %path.display(), bytes = output.len(), "wrote model");
        Ok(output.len())
    }

    /// Statistics of the cached build
    pub fn statistics(&self) -> &WalkStatistics {
        &self.statistics
    }

    /// Whether a build result is cached
    pub fn is_built(&self) -> bool {
        self.output.is_some()
    }

    fn run(&mut self) -> Result<Vec<u8>> {
        let mut walker = Walker::new(Arc::clone(&self.progress));
        let root = document::assemble(&self.config.input, &mut walker)?;
        let output = XmlWriter::serialize(&root)?;
        self.statistics = walker.into_statistics();
        Ok(output)
    }
}
