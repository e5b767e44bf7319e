//! Include directive extraction and resolution.
//!
//! Extraction is line oriented: each physical line yields at most one
//! directive, and continuation lines are not joined. Lines end at `\n`,
//! `\r\n` or a lone `\r`. A directive is
//! `#include`, whitespace, then a name delimited by `"..."` or `<...>`.
//! Mismatched delimiters (`"name>` or `<name"`) are ignored.
//!
//! Resolution joins each include-search root with the `/`-separated segments
//! of the name and accepts the first candidate that is a cataloged file. Roots
//! are tried in the order they were supplied; later roots are not consulted
//! once one matches. Names that match nowhere are external headers and produce
//! no edge.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::catalog::FileCatalog;
use crate::error::{Error, Result};
use crate::types::FileId;

static INCLUDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"#include\s+(["<])([^"^>]+)([">])"#).expect("include pattern is valid")
});

/// How an include name was delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `#include "name"`
    Quote,
    /// `#include <name>`
    Angle,
}

/// One include directive found in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDirective {
    /// The name between the delimiters, as written
    pub name: String,
    /// The delimiter kind
    pub delimiter: Delimiter,
    /// 1-based line number
    pub line: usize,
}

/// Parse a single line.
///
/// Only the first `#include` match on the line is considered.
#[must_use]
pub fn parse_include(line: &str) -> Option<(String, Delimiter)> {
    let caps = INCLUDE_RE.captures(line)?;
    let delimiter = match (&caps[1], &caps[3]) {
        ("\"", "\"") => Delimiter::Quote,
        ("<", ">") => Delimiter::Angle,
        _ => return None,
    };
    Some((caps[2].to_string(), delimiter))
}

/// Extract every include directive from `content`.
#[must_use]
pub fn extract_from_str(content: &str) -> Vec<IncludeDirective> {
    physical_lines(content)
        .enumerate()
        .filter_map(|(idx, line)| {
            parse_include(line).map(|(name, delimiter)| IncludeDirective {
                name,
                delimiter,
                line: idx + 1,
            })
        })
        .collect()
}

/// Split on `\n`, `\r\n` and lone `\r`, like a universal-newline reader.
fn physical_lines(content: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(content);
    std::iter::from_fn(move || {
        let text = rest?;
        let Some(pos) = text.find(['\n', '\r']) else {
            rest = None;
            return (!text.is_empty()).then_some(text);
        };
        let width = if text[pos..].starts_with("\r\n") { 2 } else { 1 };
        rest = Some(&text[pos + width..]);
        Some(&text[..pos])
    })
}

/// Read `path` and extract its include directives.
///
/// Content that is not valid UTF-8 is decoded lossily.
///
/// # Errors
///
/// Returns [`Error::Read`] naming the file if it cannot be read.
pub fn extract_includes(path: &Path) -> Result<Vec<IncludeDirective>> {
    let content = std::fs::read(path).map_err(|e| Error::read(path.to_path_buf(), e))?;
    Ok(extract_from_str(&String::from_utf8_lossy(&content)))
}

/// Maps include names to cataloged files using ordered search roots.
#[derive(Debug, Clone)]
pub struct IncludeResolver {
    roots: Vec<PathBuf>,
}

impl IncludeResolver {
    /// Create a resolver over the given roots, tried in order.
    #[must_use]
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// The include-search roots.
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Resolve `name` to a cataloged file; first root wins.
    #[must_use]
    pub fn resolve(&self, name: &str, catalog: &FileCatalog) -> Option<FileId> {
        let resolved = self
            .roots
            .iter()
            .find_map(|root| catalog.id_of(&candidate_path(root, name)));
        if resolved.is_none() {
            trace!(name, "Include not found under any include root");
        }
        resolved
    }
}

/// Join `root` with each `/`-separated segment of `name`.
fn candidate_path(root: &Path, name: &str) -> PathBuf {
    name.split('/')
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Blacklist;
    use rstest::rstest;

    #[rstest]
    #[case::quoted(r#"#include "a.h""#, Some(("a.h", Delimiter::Quote)))]
    #[case::angled("#include <sys/types.h>", Some(("sys/types.h", Delimiter::Angle)))]
    #[case::tab_separated("#include\t\"b.h\"", Some(("b.h", Delimiter::Quote)))]
    #[case::leading_whitespace(r#"   #include "c.h" // note"#, Some(("c.h", Delimiter::Quote)))]
    #[case::inside_comment(r#"// #include "d.h""#, Some(("d.h", Delimiter::Quote)))]
    #[case::quote_then_angle(r#"#include "e.h>"#, None)]
    #[case::angle_then_quote(r#"#include <f.h""#, None)]
    #[case::no_whitespace(r#"#include"g.h""#, None)]
    #[case::space_after_hash(r#"# include "h.h""#, None)]
    #[case::empty_name(r#"#include """#, None)]
    #[case::macro_include("#include HEADER_NAME", None)]
    #[case::not_a_directive("int x = 0;", None)]
    fn parse_include_cases(#[case] line: &str, #[case] expected: Option<(&str, Delimiter)>) {
        let parsed = parse_include(line);
        assert_eq!(
            parsed.as_ref().map(|(n, d)| (n.as_str(), *d)),
            expected,
            "line: {line}"
        );
    }

    #[test]
    fn only_first_directive_on_a_line_counts() {
        let parsed = parse_include(r#"#include "a.h" #include "b.h""#);

        assert_eq!(parsed, Some(("a.h".to_string(), Delimiter::Quote)));
    }

    #[test]
    fn extract_records_line_numbers() {
        let content = "#include \"a.h\"\n\nint main() {}\n#include <b/c.h>\n";

        let directives = extract_from_str(content);

        assert_eq!(
            directives,
            vec![
                IncludeDirective {
                    name: "a.h".to_string(),
                    delimiter: Delimiter::Quote,
                    line: 1,
                },
                IncludeDirective {
                    name: "b/c.h".to_string(),
                    delimiter: Delimiter::Angle,
                    line: 4,
                },
            ]
        );
    }

    #[rstest]
    #[case::unix("#include \"a.h\"\nint x;\n#include \"b.h\"\n")]
    #[case::windows("#include \"a.h\"\r\nint x;\r\n#include \"b.h\"\r\n")]
    #[case::classic_mac("#include \"a.h\"\rint x;\r#include \"b.h\"\r")]
    #[case::mixed("#include \"a.h\"\r\nint x;\r#include \"b.h\"")]
    fn line_endings_all_split_lines(#[case] content: &str) {
        let found: Vec<(String, usize)> = extract_from_str(content)
            .into_iter()
            .map(|d| (d.name, d.line))
            .collect();

        assert_eq!(found, vec![("a.h".to_string(), 1), ("b.h".to_string(), 3)]);
    }

    #[test]
    fn continuation_lines_are_not_joined() {
        let directives = extract_from_str("#include \\\n\"a.h\"\n");

        assert!(directives.is_empty());
    }

    #[test]
    fn extract_includes_reports_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.h");

        let err = extract_includes(&missing).unwrap_err();

        match err {
            Error::Read { path, .. } => assert_eq!(path, missing),
            other => panic!("expected read error, got {other:?}"),
        }
    }

    #[test]
    fn extract_includes_tolerates_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.c");
        let mut content = b"/* caf\xe9 */\n".to_vec();
        content.extend_from_slice(b"#include \"a.h\"\n");
        std::fs::write(&path, content).unwrap();

        let directives = extract_includes(&path).unwrap();

        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].name, "a.h");
    }

    fn catalog(paths: &[&str]) -> FileCatalog {
        FileCatalog::from_paths(
            Path::new("/proj"),
            paths.iter().map(PathBuf::from).collect(),
            &Blacklist::default(),
        )
    }

    #[test]
    fn resolve_joins_name_segments_onto_root() {
        let catalog = catalog(&["/proj/include/net/socket.h"]);
        let resolver = IncludeResolver::new(vec![PathBuf::from("/proj/include")]);

        assert_eq!(
            resolver.resolve("net/socket.h", &catalog),
            Some(FileId::new(0))
        );
    }

    #[test]
    fn resolve_first_root_wins() {
        let catalog = catalog(&["/proj/a/config.h", "/proj/b/config.h"]);
        let resolver = IncludeResolver::new(vec![PathBuf::from("/proj/b"), PathBuf::from("/proj/a")]);

        assert_eq!(resolver.resolve("config.h", &catalog), Some(FileId::new(1)));
    }

    #[test]
    fn resolve_falls_through_to_later_roots() {
        let catalog = catalog(&["/proj/a/config.h"]);
        let resolver = IncludeResolver::new(vec![PathBuf::from("/proj/b"), PathBuf::from("/proj/a")]);

        assert_eq!(resolver.resolve("config.h", &catalog), Some(FileId::new(0)));
    }

    #[test]
    fn resolve_unknown_name_is_none() {
        let catalog = catalog(&["/proj/a.h"]);
        let resolver = IncludeResolver::new(vec![PathBuf::from("/proj")]);

        assert_eq!(resolver.resolve("stdio.h", &catalog), None);
    }

    #[test]
    fn resolve_with_no_roots_is_none() {
        let catalog = catalog(&["/proj/a.h"]);
        let resolver = IncludeResolver::new(Vec::new());

        assert_eq!(resolver.resolve("a.h", &catalog), None);
    }
}
