//! Unified error type for the outcheck pipeline.
//!
//! All fatal per-unit conditions are represented here as `miette` diagnostics
//! so the CLI boundary can render them with source context and help text. An
//! output mismatch is *not* an error: it is the `Validity::Fail` value
//! returned by classification.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OutcheckError>;

#[derive(Debug, Error, Diagnostic)]
pub enum OutcheckError {
    /// The artifact handed to `Duet::new` is not a recognized capture file.
    #[error("artifact '{path}' does not use an .out or .err suffix")]
    #[diagnostic(
        code(outcheck::artifact_name),
        help("captured output is named <Example>.out, with an optional <Example>.err sibling")
    )]
    ArtifactName { path: PathBuf },

    /// No readable companion source file could be derived for an artifact.
    #[error("no readable source file for artifact '{artifact}' (tried '{candidate}')")]
    #[diagnostic(
        code(outcheck::missing_source),
        help("the source file is derived from the artifact name; check the corpus layout and the file-name translation table")
    )]
    SourceUnresolved {
        artifact: PathBuf,
        candidate: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read '{path}'")]
    #[diagnostic(code(outcheck::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A DeleteLines rule referenced a line past the end of the text.
    #[error("line deletion targets line {line}, but the text has only {available} lines")]
    #[diagnostic(
        code(outcheck::line_range),
        help("line numbers are 1-based and counted against the text before any other adjustment")
    )]
    LineOutOfRange { line: usize, available: usize },

    /// An embedded block was tagged "(None)". Upstream tooling is expected to
    /// strip such blocks before capture, so seeing one here is an authoring
    /// inconsistency, not a recoverable condition.
    #[error("output tag '(None)' found in '{path}'")]
    #[diagnostic(
        code(outcheck::none_tag),
        help("a '(None)' tag means the example declares it produces no output; it must not carry an embedded block")
    )]
    NoneTag { path: PathBuf },
}
