//! Knobs for ingestion and encoding.

/// What to do when a `.net` index is declared a second time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateNetPolicy {
    /// Fail with [`DeviceError::DuplicateNet`](crate::DeviceError::DuplicateNet).
    #[default]
    Reject,
    /// Replace the earlier net. Wire occurrences it added to tiles remain.
    Overwrite,
}

/// What to do with a chipdb section label nobody recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownSectionPolicy {
    /// Fail with [`DeviceError::UnknownSection`](crate::DeviceError::UnknownSection).
    #[default]
    Reject,
    /// Skip the section with a warning.
    Skip,
}

/// Options for chipdb ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestOptions {
    /// Duplicate net handling.
    pub duplicate_nets: DuplicateNetPolicy,
    /// Unknown section handling.
    pub unknown_sections: UnknownSectionPolicy,
}

impl IngestOptions {
    /// Accepts everything the legacy reader accepted.
    pub fn lenient() -> Self {
        Self {
            duplicate_nets: DuplicateNetPolicy::Overwrite,
            unknown_sections: UnknownSectionPolicy::Skip,
        }
    }
}

/// Options for bitstream encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Emit a `.device <type>` line before the tiles.
    pub device_line: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self { device_line: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_strict() {
        let options = IngestOptions::default();
        assert_eq!(options.duplicate_nets, DuplicateNetPolicy::Reject);
        assert_eq!(options.unknown_sections, UnknownSectionPolicy::Reject);
        assert!(EncodeOptions::default().device_line);
    }

    #[test]
    fn lenient_accepts_legacy_input() {
        let options = IngestOptions::lenient();
        assert_eq!(options.duplicate_nets, DuplicateNetPolicy::Overwrite);
        assert_eq!(options.unknown_sections, UnknownSectionPolicy::Skip);
    }
}
