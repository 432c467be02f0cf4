//! Verdict presentation: plain-text reports and image overlays.
//!
//! Reports are one-shot text artifacts written to the local filesystem;
//! nothing round-trips through a server.

pub mod agencies;
pub mod overlay;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::types::Verdict;

/// Render the verdict as a plain-text field report.
pub fn render(verdict: &Verdict) -> String {
    let contacts = agencies::DIRECTORY
        .iter()
        .map(|a| format!("  {} ({}): {}", a.name, a.region, a.contact))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "HARMFUL ALGAL BLOOM SCREENING REPORT\n\
         ====================================\n\
         Date:              {timestamp}\n\
         Location:          {location}\n\
         Status:            {status}\n\
         Confidence:        {confidence}\n\
         Primary indicator: {symptom}\n\
         \n\
         Description:\n\
         {description}\n\
         \n\
         Guidance:\n\
         {guidance}\n\
         \n\
         EMERGENCY CONTACTS\n\
         {contacts}\n",
        timestamp = verdict.timestamp,
        location = verdict.location.as_deref().unwrap_or("Unknown"),
        status = verdict.status,
        confidence = verdict.display_confidence(),
        symptom = verdict.primary_symptom.as_deref().unwrap_or("NONE"),
        description = verdict.description,
        guidance = verdict.guidance,
        contacts = contacts,
    )
}

/// Write the rendered report to a timestamp-named text file in `dir`.
pub fn export(verdict: &Verdict, dir: &Path) -> io::Result<PathBuf> {
    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    let path = dir.join(format!("hab-report-{stamp}.txt"));
    fs::write(&path, render(verdict))?;
    info!("report exported to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EncodedImage, SampleStatus};

    fn test_verdict(status: SampleStatus) -> Verdict {
        Verdict {
            status,
            confidence: 0.823,
            description: "Detected lesion with 82% confidence.".to_string(),
            guidance: "Do not consume or sell this catch.".to_string(),
            timestamp: "02/03/26, 04:05:06 PM".to_string(),
            image: EncodedImage::Jpeg(vec![0xFF, 0xD8]),
            location: Some("Test Harbor".to_string()),
            primary_symptom: Some("LESION".to_string()),
            bounding_boxes: Vec::new(),
        }
    }

    #[test]
    fn test_report_contains_every_field() {
        let text = render(&test_verdict(SampleStatus::Contaminated));
        for needle in [
            "02/03/26, 04:05:06 PM",
            "Test Harbor",
            "CONTAMINATED",
            "82.3%",
            "LESION",
            "Detected lesion with 82% confidence.",
            "Do not consume or sell this catch.",
            "EMERGENCY CONTACTS",
        ] {
            assert!(text.contains(needle), "report is missing {needle:?}:\n{text}");
        }
    }

    #[test]
    fn test_every_status_renders_a_banner() {
        for (status, banner) in [
            (SampleStatus::Safe, "SAFE"),
            (SampleStatus::Contaminated, "CONTAMINATED"),
            (SampleStatus::Inconclusive, "INCONCLUSIVE"),
            (SampleStatus::NoFishDetected, "NO FISH DETECTED"),
        ] {
            assert!(render(&test_verdict(status)).contains(banner));
        }
    }

    #[test]
    fn test_export_writes_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = export(&test_verdict(SampleStatus::Safe), dir.path()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("hab-report-") && name.ends_with(".txt"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("SAFE"));
    }
}
