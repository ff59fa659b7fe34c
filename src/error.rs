//! Error types for the USB front-end.
//!
//! We avoid `alloc` - every variant carries only fixed-size data. The
//! transient conditions of the report path (endpoint busy, not yet
//! configured, wrong personality) are deliberately not errors: they
//! surface as `send` returning `false` and the caller's periodic loop is
//! the retry policy.

/// Fatal failure while opening the vendor interface during enumeration.
///
/// Both variants indicate a descriptor-table authoring bug, not a runtime
/// condition to recover from; enumeration must be aborted rather than
/// continued with a partially opened interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OpenError {
    /// The stack offered fewer bytes than the interface, its endpoints,
    /// and the vendor sub-block occupy.
    Capacity,
    /// The stack refused to open one of the interface's endpoints.
    Endpoint,
    /// The descriptor stream ended before every declared endpoint was
    /// found.
    Truncated,
}
