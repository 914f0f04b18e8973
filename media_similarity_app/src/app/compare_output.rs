use std::io::{self, prelude::*};

use media_similarity_lib::SimilarityResult;

use super::OutputFormat;

#[derive(Debug, Clone)]
pub struct CompareOutput {
    result: SimilarityResult,
    threshold: Option<f64>,
}

impl CompareOutput {
    pub fn new(result: SimilarityResult, threshold: Option<f64>) -> Self {
        Self { result, threshold }
    }

    pub fn result(&self) -> &SimilarityResult {
        &self.result
    }

    /// False only when a threshold was given and the overall score falls below it.
    pub fn meets_threshold(&self) -> bool {
        match self.threshold {
            Some(threshold) => self.result.is_duplicate(threshold),
            None => true,
        }
    }

    pub fn write(&self, format: OutputFormat, w: impl Write) -> io::Result<()> {
        match format {
            OutputFormat::Normal => self.write_normal(w),
            OutputFormat::Json => self.write_json(w),
        }
    }

    fn write_normal(&self, mut w: impl Write) -> io::Result<()> {
        let result = &self.result;
        let (first, second) = result.source_descriptors();

        writeln!(w, "{} ({}, {} bytes)", first.name, first.mime_type, first.byte_size)?;
        writeln!(w, "{} ({}, {} bytes)", second.name, second.mime_type, second.byte_size)?;
        writeln!(w)?;
        writeln!(w, "Profile:            {}", result.profile())?;
        writeln!(w, "Overall similarity: {:.2}%", result.overall_similarity())?;
        writeln!(w, "Identical:          {}", result.is_identical())?;
        writeln!(w, "Processing time:    {} ms", result.processing_time_ms())?;

        if let Some(threshold) = self.threshold {
            writeln!(
                w,
                "Duplicate:          {} (threshold {threshold:.2}%)",
                result.is_duplicate(threshold)
            )?;
        }

        writeln!(w)?;
        for (metric, score) in result.metrics().iter() {
            writeln!(w, "  {:<20}{score:>6.2}", metric.name())?;
        }

        w.flush()
    }

    fn write_json(&self, mut w: impl Write) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut w, &self.result)?;
        writeln!(w)?;
        w.flush()
    }
}
