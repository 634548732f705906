use std::fmt;

/// One of the three isolated analysis flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PipelineKind {
    Scan,
    Osint,
    IpTrace,
}

impl PipelineKind {
    pub const ALL: [PipelineKind; 3] = [PipelineKind::Scan, PipelineKind::Osint, PipelineKind::IpTrace];

    pub fn label(self) -> &'static str {
        match self {
            PipelineKind::Scan => "SCAN",
            PipelineKind::Osint => "OSINT",
            PipelineKind::IpTrace => "IP_TRACE",
        }
    }

    pub fn page(self) -> Page {
        match self {
            PipelineKind::Scan => Page::Scanner,
            PipelineKind::Osint => Page::Osint,
            PipelineKind::IpTrace => Page::IpExplorer,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            PipelineKind::Scan => 0,
            PipelineKind::Osint => 1,
            PipelineKind::IpTrace => 2,
        }
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    #[default]
    Scanner,
    Osint,
    IpExplorer,
    Assistant,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Scanner, Page::Osint, Page::IpExplorer, Page::Assistant];

    /// The pipeline driven from this page, `None` for the assistant.
    pub fn pipeline_kind(self) -> Option<PipelineKind> {
        match self {
            Page::Scanner => Some(PipelineKind::Scan),
            Page::Osint => Some(PipelineKind::Osint),
            Page::IpExplorer => Some(PipelineKind::IpTrace),
            Page::Assistant => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Page::Scanner => "SCANNER",
            Page::Osint => "OSINT",
            Page::IpExplorer => "IP_EXPLORER",
            Page::Assistant => "ASSISTANT",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
