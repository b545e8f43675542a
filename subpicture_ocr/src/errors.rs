//! Custom error types, declared using `failure`.

/// Errors specific to subpicture recognition.  Most of the pipeline degrades
/// to "skip the packet" or "ask the operator" instead of failing, so this
/// list is short.
#[derive(Debug, Fail)]
pub enum OcrError {
    /// A decoded packet's pixel buffer does not match its stated dimensions.
    /// The engine logs this and skips the packet.
    #[fail(
        display = "pixel buffer is {} bytes, but {}x{} pixels need {}",
        actual, width, height, expected
    )]
    PixelBufferSizeMismatch {
        /// Stated width in pixels.
        width: usize,
        /// Stated height in pixels.
        height: usize,
        /// The byte count the stated dimensions imply.
        expected: usize,
        /// The byte count actually received.
        actual: usize,
    },

    /// An operation that needs a run awaiting manual resolution was called
    /// while no such run was pending.
    #[fail(display = "no piece is awaiting manual resolution")]
    NoPendingRun,
}
