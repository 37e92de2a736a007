//! Dump configuration.

use std::env;

/// Environment variable enabling ABI redaction in [`DumpOptions::from_env`].
pub const SKIP_ABI_ENV: &str = "TDUMP_SKIP_ABI";

/// Environment variable enabling minimal dumps in [`DumpOptions::from_env`].
pub const MINIMAL_ENV: &str = "TDUMP_MINIMAL";

/// Flags controlling a dump.
///
/// - `skip_abi`: replace sizes, alignments and offsets with a placeholder so
///   dumps from different platforms compare equal.
/// - `minimal`: emit only the identifying fields of the root node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpOptions
{
    pub skip_abi: bool,
    pub minimal: bool,
}

impl DumpOptions
{
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Options used for cross-reader comparison: ABI redaction on, full depth.
    #[must_use]
    pub fn comparison() -> Self
    {
        Self {
            skip_abi: true,
            minimal: false,
        }
    }

    #[must_use]
    pub fn with_skip_abi(mut self, skip_abi: bool) -> Self
    {
        self.skip_abi = skip_abi;
        self
    }

    #[must_use]
    pub fn with_minimal(mut self, minimal: bool) -> Self
    {
        self.minimal = minimal;
        self
    }

    /// Read `TDUMP_SKIP_ABI` and `TDUMP_MINIMAL`.
    ///
    /// Unset or unrecognized values leave the flag off.
    #[must_use]
    pub fn from_env() -> Self
    {
        let flag = |name: &str| env::var(name).ok().and_then(|value| parse_flag(&value)).unwrap_or(false);
        Self {
            skip_abi: flag(SKIP_ABI_ENV),
            minimal: flag(MINIMAL_ENV),
        }
    }
}

/// Parse a boolean environment value.
#[must_use]
pub fn parse_flag(value: &str) -> Option<bool>
{
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
