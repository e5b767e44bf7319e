//! Parallel include extraction.
//!
//! Reading and scanning files is independent per file, so it runs on the
//! rayon pool. Edge assembly stays sequential so the graph is identical to a
//! single-threaded build.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     DependencyGraph::build                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Phase 1  (Sequential):  catalog walk + blacklist           │
//! │  Phase 2  (Parallel):    rayon par_iter() directive scan    │
//! │  Phase 3  (Sequential):  resolution + mirrored edges,       │
//! │                          in catalog order                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use rayon::prelude::*;

use crate::catalog::FileCatalog;
use crate::error::Result;
use crate::resolver::{IncludeDirective, extract_includes};
use crate::types::FileId;

/// Directives extracted from one cataloged file.
#[derive(Debug)]
pub struct ParsedFile {
    /// The source file
    pub file_id: FileId,
    /// Its directives in line order
    pub directives: Vec<IncludeDirective>,
}

/// Extract directives from every cataloged file.
///
/// The result is in catalog order regardless of scheduling.
///
/// # Errors
///
/// Fails with [`Error::Read`](crate::Error::Read) if any file cannot be read;
/// no partial result is returned.
pub fn extract_all(catalog: &FileCatalog) -> Result<Vec<ParsedFile>> {
    catalog
        .files()
        .par_iter()
        .enumerate()
        .map(|(index, path)| {
            Ok(ParsedFile {
                file_id: FileId::new(index),
                directives: extract_includes(path)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Blacklist;
    use std::fs;
    use std::path::Path;

    #[test]
    fn extract_all_preserves_catalog_order() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..32 {
            fs::write(
                dir.path().join(format!("f{i:02}.h")),
                format!("#include \"dep{i}.h\"\n"),
            )
            .unwrap();
        }
        let catalog =
            FileCatalog::build(dir.path(), &[".h".to_string()], &Blacklist::default()).unwrap();

        let parsed = extract_all(&catalog).unwrap();

        assert_eq!(parsed.len(), 32);
        for (i, file) in parsed.iter().enumerate() {
            assert_eq!(file.file_id, FileId::new(i));
            assert_eq!(file.directives[0].name, format!("dep{i}.h"));
        }
    }

    #[test]
    fn extract_all_fails_when_a_file_disappears() {
        let catalog = FileCatalog::from_paths(
            Path::new("/nonexistent"),
            vec![Path::new("/nonexistent/gone.h").to_path_buf()],
            &Blacklist::default(),
        );

        let err = extract_all(&catalog).unwrap_err();

        assert_eq!(err.kind(), crate::ErrorKind::Io);
    }
}
