//! # Run Pipeline
//!
//! One run is a single sequential pass:
//!
//! 1. Check the source image against the array capacity.
//! 2. Create `main.hex` and every bank file.
//! 3. Demultiplex every source line into them.
//! 4. Flush and close all files.
//! 5. Render the bank listing.
//!
//! Nothing is written until the capacity and template checks pass. A
//! failure after step 2 still closes every file that was opened.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::decompose::AddressDecomposer;
use crate::demux::LineDemultiplexer;
use crate::error::{ConfigError, HexcutError, HexcutResult};
use crate::layout::CutLayout;
use crate::output::{BankFileNaming, OutputSet};
use crate::report::RunReport;
use crate::size::ByteSize;
use crate::template::{Template, TemplateRenderer};

/// A validated run.
#[derive(Debug, Clone)]
pub struct Job {
    source: PathBuf,
    output: PathBuf,
    layout: CutLayout,
    template: Template,
}

impl Job {
    /// Bundle a validated layout with its paths and listing template.
    ///
    /// # Errors
    ///
    /// [`ConfigError::TemplateTooManyPlaceholders`] if the template cannot be
    /// rendered against the layout's shape.
    pub fn new(
        source: PathBuf,
        output: PathBuf,
        layout: CutLayout,
        template: Template,
    ) -> Result<Self, ConfigError> {
        template.check_dimensions(layout.shape().size())?;
        Ok(Self {
            source,
            output,
            layout,
            template,
        })
    }

    /// Source image path.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Output folder.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Validated geometry.
    pub fn layout(&self) -> &CutLayout {
        &self.layout
    }

    /// Listing template.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Write the cut files, then the bank listing to `listing`.
    pub fn execute<W: Write>(&self, listing: &mut W) -> HexcutResult<RunReport> {
        self.log_parameters();

        let decomposer = AddressDecomposer::new(&self.layout);
        let naming = BankFileNaming::new(&self.output, self.layout.norm());
        let renderer = TemplateRenderer::new(self.template.clone(), &decomposer, &naming)?;

        let report = self.split(&naming)?;

        tracing::info!(template = self.template.as_str(), "rendering bank listing");
        renderer.render_all(listing)?;

        tracing::info!(
            output = %self.output.display(),
            lines = report.lines_written,
            "done"
        );
        Ok(report)
    }

    /// Capacity check, file creation and the demultiplexing pass.
    pub fn split(&self, naming: &BankFileNaming) -> HexcutResult<RunReport> {
        let source_len = self.source_len()?;
        tracing::info!(
            "bin size : {:#x} = {}",
            source_len,
            ByteSize(source_len)
        );
        if source_len > self.layout.capacity() {
            return Err(HexcutError::Capacity {
                source_len,
                capacity: self.layout.capacity(),
            });
        }

        let file = File::open(&self.source).map_err(|e| HexcutError::file_io(&self.source, e))?;
        let source = BufReader::new(file);

        tracing::info!(
            "creating {} cut files of {} bytes",
            self.layout.norm(),
            self.layout.cut_size()
        );
        let mut outputs = OutputSet::create(naming, self.layout.norm())?;

        let report = LineDemultiplexer::new(&self.layout).run(source, &mut outputs)?;
        outputs.finish()?;
        Ok(report)
    }

    fn source_len(&self) -> HexcutResult<u64> {
        match std::fs::metadata(&self.source) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(HexcutError::SourceNotFound {
                path: self.source.clone(),
            }),
            Err(e) => Err(HexcutError::file_io(&self.source, e)),
        }
    }

    fn log_parameters(&self) {
        let l = &self.layout;
        tracing::info!("binpath     : {}", self.source.display());
        tracing::info!("respath     : {}", self.output.display());
        tracing::info!("ecc         : {}", if l.ecc() { "TRUE" } else { "FALSE" });
        tracing::info!("tensor      : {}", l.shape());
        tracing::info!("tensor mode : {}", l.mode());
        tracing::info!("width       : {} bytes", l.width());
        tracing::info!("height      : {}", l.height());
        tracing::info!("num cut     : {}", l.norm());
        tracing::info!("cut size    : {:#x} = {}", l.cut_size(), ByteSize(l.cut_size()));
        tracing::info!("mem size    : {:#x} = {}", l.capacity(), ByteSize(l.capacity()));
        tracing::info!("template    : {}", self.template.as_str());
    }
}
