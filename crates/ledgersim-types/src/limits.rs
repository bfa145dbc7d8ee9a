//! System-wide field limits shared by builders and the reference ledger.

/// Maximum length of any metadata field, in bytes.
///
/// The service rejects longer values at submission; builders must never
/// construct one.
pub const MAX_METADATA_LEN: usize = 256;

/// Default lower bound for generated metadata lengths.
pub const DEFAULT_MIN_METADATA_LEN: usize = 10;
