use std::io::Write;

use anyhow::Context;

use crate::analyze_session::GaitSession;
use crate::types::{Sample, SessionReport};

/// Mottaker av rapporter (dashboard, lagring, ...). Selve protokollen ligger utenfor kjernen.
pub trait GaitPublisher {
    fn publish(&mut self, report: &SessionReport) -> anyhow::Result<()>;
}

/// Én JSON-linje per rapport.
pub struct JsonLinesPublisher<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesPublisher<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> GaitPublisher for JsonLinesPublisher<W> {
    fn publish(&mut self, report: &SessionReport) -> anyhow::Result<()> {
        serde_json::to_writer(&mut self.out, report).context("serialisering av rapport feilet")?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Holder rapportene i minnet (test/replay).
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    pub reports: Vec<SessionReport>,
}

impl GaitPublisher for MemoryPublisher {
    fn publish(&mut self, report: &SessionReport) -> anyhow::Result<()> {
        self.reports.push(report.clone());
        Ok(())
    }
}

/// Oppdaterer økten og leverer rapporten til publisher.
pub fn update_and_publish(
    session: &mut GaitSession,
    stream: &[Sample],
    publisher: &mut dyn GaitPublisher,
) -> anyhow::Result<SessionReport> {
    let report = session.update(stream);
    publisher
        .publish(&report)
        .with_context(|| format!("publisering feilet for økt {}", report.session_id))?;
    Ok(report)
}
