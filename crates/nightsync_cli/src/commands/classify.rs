//! Classify command implementation.

use super::CliResult;
use nightsync_protocol::{EventType, Vocabulary};
use std::io::Write;

/// Runs the classify command.
pub fn run(tag: &str, out: &mut impl Write) -> CliResult<()> {
    let event_type: EventType = tag.parse()?;
    let vocabulary = match event_type.vocabulary() {
        Vocabulary::Pump => "pump",
        Vocabulary::Remote => "remote",
    };

    match event_type.lifecycle() {
        Some(lifecycle) => writeln!(out, "{event_type} ({vocabulary}): {lifecycle}")?,
        None => writeln!(out, "{event_type} ({vocabulary}): unclassified")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CliError;

    fn classify(tag: &str) -> String {
        let mut out = Vec::new();
        run(tag, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn classified_types() {
        assert_eq!(classify("Rewind"), "Rewind (pump): rewind\n");
        assert_eq!(
            classify("Site Change"),
            "Site Change (remote): replace-component(infusion-set)\n"
        );
    }

    #[test]
    fn unclassified_type() {
        assert_eq!(classify("Bolus"), "Bolus (pump): unclassified\n");
    }

    #[test]
    fn unknown_type() {
        let mut out = Vec::new();
        assert!(matches!(run("Nap", &mut out), Err(CliError::Protocol(_))));
    }
}
