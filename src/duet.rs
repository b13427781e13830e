//! Pairing of embedded expected output with captured output.
//!
//! A [`Duet`] is built from one captured `.out` artifact. Construction does
//! all the work eagerly: locate the companion source file, extract the
//! embedded `/* Output: ... */` block, load the captured text (re-wrapped to
//! the documentation width), and run both sides through the adjustment chain
//! resolved for the source file. The finished value is immutable;
//! [`Duet::validate`] classifies it without further I/O.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::adjust::apply_chain;
use crate::errors::{OutcheckError, Result};
use crate::strategy::ValidationConfig;
use crate::varying::strip_varying;

/// Literal marker that opts a source file out of output checking entirely.
pub const IGNORE_OUTPUT_MARKER: &str = "{IgnoreOutput}";

/// The embedded expected-output block: an `Output:` comment running to the
/// final comment terminator in the file.
static OUTPUT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\* (Output:.*)\*/").expect("output-block pattern"));

/// Classification of one expected/captured pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Validity {
    /// Adjusted texts match exactly.
    Exact,
    /// Adjusted texts match once volatile substrings are stripped.
    Varying,
    /// Tagged as non-reproducible at validation time; always accepted.
    ExecuteToSee,
    /// The embedded block documents only a prefix of the real output.
    SelectedLines,
    Fail,
}

impl fmt::Display for Validity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Validity::Exact => "exact",
            Validity::Varying => "varying",
            Validity::ExecuteToSee => "execute to see",
            Validity::SelectedLines => "selected lines",
            Validity::Fail => "fail",
        };
        write!(f, "{}", label)
    }
}

/// One example unit: the source file, its embedded expected output, and the
/// captured output, with adjusted forms of both.
#[derive(Debug)]
pub struct Duet {
    pub source_path: PathBuf,
    pub out_path: PathBuf,
    pub err_path: PathBuf,
    /// First line of the source file, its human-identifying marker.
    pub slug_line: String,
    /// First line of the embedded block; routes special-case classification.
    pub output_tag: Option<String>,
    /// Embedded expected text, without the tag line. Absent means the source
    /// declares no output to check.
    pub embedded: Option<String>,
    /// Captured output, trimmed and re-wrapped to the documentation width.
    pub generated: Option<String>,
    /// Captured error text, when a sibling `.err` artifact exists.
    pub errors: Option<String>,
    /// Set when the source contains the opt-out marker; all comparison
    /// fields stay empty.
    pub ignore: bool,
    pub embedded_adjusted: Option<String>,
    pub generated_adjusted: Option<String>,
}

impl Duet {
    /// Builds the pair for one captured artifact. The artifact must use an
    /// `.out` or `.err` suffix; a missing or unreadable companion source
    /// file is fatal for this unit.
    pub fn new(artifact: &Path, config: &ValidationConfig) -> Result<Self> {
        match artifact.extension().and_then(|e| e.to_str()) {
            Some("out") | Some("err") => {}
            _ => {
                return Err(OutcheckError::ArtifactName {
                    path: artifact.to_path_buf(),
                })
            }
        }
        let out_path = artifact.with_extension("out");
        let err_path = artifact.with_extension("err");

        let source_path = companion_source_path(&out_path, config);
        let source_text =
            fs::read_to_string(&source_path).map_err(|e| OutcheckError::SourceUnresolved {
                artifact: out_path.clone(),
                candidate: source_path.clone(),
                source: e,
            })?;
        let slug_line = source_text
            .trim()
            .lines()
            .next()
            .unwrap_or_default()
            .to_string();
        let (output_tag, embedded) = extract_embedded_output(&source_text);

        let mut duet = Self {
            source_path,
            out_path,
            err_path,
            slug_line,
            output_tag,
            embedded,
            generated: None,
            errors: None,
            ignore: false,
            embedded_adjusted: None,
            generated_adjusted: None,
        };

        if source_text.contains(IGNORE_OUTPUT_MARKER) {
            duet.ignore = true;
            return Ok(duet);
        }

        if duet.out_path.exists() {
            let raw = fs::read_to_string(&duet.out_path).map_err(|e| OutcheckError::Io {
                path: duet.out_path.clone(),
                source: e,
            })?;
            duet.generated = Some(fill_to_width(raw.trim(), config.wrap_width));
        }
        if duet.err_path.exists() {
            duet.errors = Some(fs::read_to_string(&duet.err_path).map_err(|e| {
                OutcheckError::Io {
                    path: duet.err_path.clone(),
                    source: e,
                }
            })?);
        }

        let file_key = duet
            .source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let chain = config.strategies.resolve(&file_key);
        duet.embedded_adjusted = match &duet.embedded {
            Some(text) => Some(apply_chain(chain, &text.replace('\0', "NUL"))?),
            None => None,
        };
        duet.generated_adjusted = match &duet.generated {
            Some(text) => Some(apply_chain(chain, &text.replace('\0', "NUL"))?),
            None => None,
        };
        Ok(duet)
    }

    /// Classifies the pair. Returns `None` when the unit opted out or has no
    /// embedded block; both cases are vacuously accepted by the caller.
    pub fn validate(&self) -> Result<Option<Validity>> {
        if self.ignore {
            return Ok(None);
        }
        let Some(tag) = &self.output_tag else {
            return Ok(None);
        };
        if tag.contains("(Execute to see)") {
            return Ok(Some(Validity::ExecuteToSee));
        }
        if tag.contains("(None)") {
            return Err(OutcheckError::NoneTag {
                path: self.source_path.clone(),
            });
        }
        if tag.contains("Output: (First") {
            return Ok(Some(Validity::SelectedLines));
        }
        match (&self.generated_adjusted, &self.embedded_adjusted) {
            (Some(generated), Some(embedded)) if generated == embedded => {
                Ok(Some(Validity::Exact))
            }
            (Some(generated), Some(embedded))
                if strip_varying(generated) == strip_varying(embedded) =>
            {
                Ok(Some(Validity::Varying))
            }
            _ => Ok(Some(Validity::Fail)),
        }
    }
}

/// Derives the companion source path for a captured artifact.
///
/// The artifact stem may embed package components as dots
/// (`operators.Bool.out` lives beside `operators/Bool.java`), so every dot
/// but the last becomes a path separator. Two layout heuristics follow: a
/// leading component duplicated by the expansion is dropped, as is a leading
/// component naming the invoking directory. Finally the translation table
/// maps harness and inner-class stems onto their real source files.
fn companion_source_path(out_path: &Path, config: &ValidationConfig) -> PathBuf {
    let derived = out_path.with_extension("java");
    let name = derived
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut pieces: Vec<String> = name.split('.').map(str::to_string).collect();
    let simple_name = if pieces.len() >= 2 {
        let ext = pieces.pop().unwrap_or_default();
        let stem = pieces.pop().unwrap_or_default();
        format!("{}.{}", stem, ext)
    } else {
        pieces.pop().unwrap_or_default()
    };

    let mut components: Vec<String> = out_path
        .parent()
        .map(|p| {
            p.iter()
                .map(|c| c.to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    components.extend(pieces);
    components.push(simple_name);

    if components.len() > 1 && components[0] == components[1] {
        components.remove(0);
    }
    if let Some(dir) = &config.invoking_dir {
        if components.len() > 1 && components[0] == *dir {
            components.remove(0);
        }
    }
    if let Some(last) = components.last_mut() {
        if let Some(actual) = config.translations.translate(last) {
            *last = actual.to_string();
        }
    }
    components.iter().collect()
}

/// Splits off the tag line from the embedded block, if the source has one.
fn extract_embedded_output(source_text: &str) -> (Option<String>, Option<String>) {
    let Some(caps) = OUTPUT_BLOCK.captures(source_text) else {
        return (None, None);
    };
    let block = caps[1].trim();
    let mut lines = block.lines();
    let tag = lines.next().unwrap_or_default().to_string();
    let rest = lines.collect::<Vec<_>>().join("\n").trim().to_string();
    (Some(tag), Some(rest))
}

/// Re-wraps each line at the documentation width. The embedded block is
/// already wrapped this way, so wrap-position differences alone never fail
/// a comparison.
fn fill_to_width(text: &str, width: usize) -> String {
    let mut result = String::new();
    for line in text.lines() {
        result.push_str(&textwrap::fill(line, width));
        result.push('\n');
    }
    result.trim().to_string()
}

fn center(text: &str, width: usize, fill: char) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let pad = width - len;
    let left = fill.to_string().repeat(pad / 2);
    let right = fill.to_string().repeat(pad - pad / 2);
    format!("{}{}{}", left, text, right)
}

const HEADER_WIDTH: usize = 60;

impl fmt::Display for Duet {
    /// Diagnostic rendering: raw and adjusted versions of both sides, then a
    /// pairwise line diff of the adjusted texts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let absent = "(none)";
        let source_label = self.source_path.display().to_string();
        let out_label = self.out_path.display().to_string();

        writeln!(f, "{}", center(&source_label, HEADER_WIDTH, '='))?;
        writeln!(f, "{}", self.embedded.as_deref().unwrap_or(absent))?;
        writeln!(f, "{}", center(&out_label, HEADER_WIDTH, '-'))?;
        writeln!(f, "{}", self.generated.as_deref().unwrap_or(absent))?;
        let adjusted_source = format!("{}(adjusted)", source_label);
        writeln!(f, "{}", center(&adjusted_source, HEADER_WIDTH, '-'))?;
        writeln!(f, "{}", self.embedded_adjusted.as_deref().unwrap_or(absent))?;
        let adjusted_out = format!("{}(adjusted)", out_label);
        writeln!(f, "{}", center(&adjusted_out, HEADER_WIDTH, '-'))?;
        writeln!(
            f,
            "{}",
            self.generated_adjusted.as_deref().unwrap_or(absent)
        )?;

        if let Some(errors) = &self.errors {
            let err_label = self.err_path.display().to_string();
            writeln!(f, "{}", center(&err_label, HEADER_WIDTH, '-'))?;
            writeln!(f, "{}", errors.trim_end())?;
        }

        let embedded_lines: Vec<&str> = self
            .embedded_adjusted
            .as_deref()
            .map(|t| t.lines().collect())
            .unwrap_or_default();
        let generated_lines: Vec<&str> = self
            .generated_adjusted
            .as_deref()
            .map(|t| t.lines().collect())
            .unwrap_or_default();
        for (n, line) in embedded_lines.iter().enumerate() {
            let Some(generated) = generated_lines.get(n) else {
                continue;
            };
            if line != generated {
                writeln!(f, ">--------<")?;
                writeln!(f, "embedded  (adjusted): {}", line)?;
                writeln!(f, "generated (adjusted): {}", generated)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{FileNameTranslation, StrategyTable, MAX_LINE_WIDTH};

    fn bare_config() -> ValidationConfig {
        ValidationConfig {
            strategies: StrategyTable::new(),
            translations: FileNameTranslation::new(),
            wrap_width: MAX_LINE_WIDTH,
            invoking_dir: None,
        }
    }

    #[test]
    fn fill_rewraps_long_lines_at_the_documentation_width() {
        let long = "word ".repeat(30);
        for line in fill_to_width(long.trim(), MAX_LINE_WIDTH).lines() {
            assert!(line.len() <= MAX_LINE_WIDTH);
        }
    }

    #[test]
    fn fill_leaves_short_lines_alone() {
        assert_eq!(fill_to_width("a\nb", MAX_LINE_WIDTH), "a\nb");
    }

    #[test]
    fn center_pads_evenly() {
        assert_eq!(center("ab", 6, '='), "==ab==");
        assert_eq!(center("abc", 6, '-'), "-abc--");
    }

    #[test]
    fn companion_path_expands_embedded_package_components() {
        let config = bare_config();
        let path = companion_source_path(Path::new("operators/operators.Bool.out"), &config);
        assert_eq!(path, PathBuf::from("operators/Bool.java"));
    }

    #[test]
    fn companion_path_plain_stem_swaps_suffix_only() {
        let config = bare_config();
        let path = companion_source_path(Path::new("operators/Bool.out"), &config);
        assert_eq!(path, PathBuf::from("operators/Bool.java"));
    }

    #[test]
    fn companion_path_drops_component_matching_invoking_dir() {
        let mut config = bare_config();
        config.invoking_dir = Some("operators".to_string());
        let path = companion_source_path(Path::new("operators/Bool.out"), &config);
        assert_eq!(path, PathBuf::from("Bool.java"));
    }

    #[test]
    fn companion_path_applies_translation_last() {
        let mut config = bare_config();
        config
            .translations
            .insert("ApplyTest.java", "Apply.java");
        let path = companion_source_path(Path::new("generics/ApplyTest.out"), &config);
        assert_eq!(path, PathBuf::from("generics/Apply.java"));
    }

    #[test]
    fn embedded_block_splits_tag_from_body() {
        let source = "// first\nclass C {}\n/* Output:\nline one\nline two\n*/\n";
        let (tag, body) = extract_embedded_output(source);
        assert_eq!(tag.as_deref(), Some("Output:"));
        assert_eq!(body.as_deref(), Some("line one\nline two"));
    }

    #[test]
    fn missing_embedded_block_is_not_an_error() {
        let (tag, body) = extract_embedded_output("class C {}\n");
        assert_eq!(tag, None);
        assert_eq!(body, None);
    }

    #[test]
    fn tag_line_carries_special_case_markers() {
        let source = "/* Output: (Execute to see)\n*/\n";
        let (tag, _) = extract_embedded_output(source);
        assert_eq!(tag.as_deref(), Some("Output: (Execute to see)"));
    }
}
