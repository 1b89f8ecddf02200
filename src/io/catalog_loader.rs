use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use crate::core::{Catalog, CatalogError};
use crate::utils::file_parsing::{parse_metadata, split_fields};

/// Metadata key carrying the lens redshift in a text catalog.
pub const ZLENS_KEY: &str = "zlens";

/// Source of per-halo catalogs, addressed by the identifier from a stack list.
pub trait CatalogLoader {
    fn load(&self, identifier: &str) -> Result<Catalog, CatalogError>;
}

/// Reads plain-text tables: a header row of column names, one numeric row
/// per object and a `# zlens = <z>` comment.
///
/// ```text
/// # zlens = 0.25
/// r_mpc  ghat    beta_s
/// 0.12   0.031   0.61
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextCatalogLoader {
    root: Option<PathBuf>,
    default_z_lens: Option<f64>,
}

impl TextCatalogLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves relative identifiers against `root`.
    pub fn with_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Redshift for catalogs without a `zlens` comment.
    pub fn with_default_z_lens(mut self, z_lens: f64) -> Self {
        self.default_z_lens = Some(z_lens);
        self
    }

    pub fn resolve(&self, identifier: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(identifier),
            None => PathBuf::from(identifier),
        }
    }

    pub fn parse<R: BufRead>(&self, name: &str, reader: R) -> Result<Catalog, CatalogError> {
        let mut z_lens = self.default_z_lens;
        let mut header: Option<Vec<String>> = None;
        let mut columns: Vec<Vec<f64>> = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let lineno = i + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('#') {
                if let Some((key, value)) = parse_metadata(trimmed) {
                    if key.eq_ignore_ascii_case(ZLENS_KEY) || key.eq_ignore_ascii_case("z_lens") {
                        z_lens = Some(parse_value(value, lineno)?);
                    }
                }
                continue;
            }

            let fields = split_fields(trimmed);
            match &header {
                None => {
                    let names = read_header(fields, lineno)?;
                    columns = vec![Vec::new(); names.len()];
                    header = Some(names);
                }
                Some(names) => {
                    if fields.len() != names.len() {
                        return Err(CatalogError::Parse {
                            line: lineno,
                            message: format!(
                                "expected {} fields, found {}",
                                names.len(),
                                fields.len()
                            ),
                        });
                    }
                    for (col, field) in columns.iter_mut().zip(&fields) {
                        col.push(parse_value(field, lineno)?);
                    }
                }
            }
        }

        let names = header.ok_or_else(|| CatalogError::Parse {
            line: 0,
            message: "no header row".to_string(),
        })?;
        let z_lens = z_lens.ok_or(CatalogError::MissingRedshift)?;

        names
            .into_iter()
            .zip(columns)
            .try_fold(Catalog::new(name, z_lens), |cat, (n, values)| {
                cat.with_column(n, values)
            })
    }
}

impl CatalogLoader for TextCatalogLoader {
    fn load(&self, identifier: &str) -> Result<Catalog, CatalogError> {
        let file = File::open(self.resolve(identifier))?;
        self.parse(identifier, BufReader::new(file))
    }
}

fn read_header(fields: Vec<String>, line: usize) -> Result<Vec<String>, CatalogError> {
    for (i, name) in fields.iter().enumerate() {
        if name.is_empty() {
            return Err(CatalogError::Parse {
                line,
                message: format!("empty column name at position {}", i + 1),
            });
        }
        if fields[..i].contains(name) {
            return Err(CatalogError::Parse {
                line,
                message: format!("duplicate column '{name}'"),
            });
        }
    }
    Ok(fields)
}

fn parse_value(field: &str, line: usize) -> Result<f64, CatalogError> {
    field.trim().parse::<f64>().map_err(|e| CatalogError::Parse {
        line,
        message: format!("'{field}': {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BETA_S, GHAT, R_MPC};
    use std::io::{Cursor, Write};
    use tempfile::tempdir;

    fn parse(text: &str) -> Result<Catalog, CatalogError> {
        TextCatalogLoader::new().parse("mem", Cursor::new(text))
    }

    #[test]
    fn whitespace_table_with_redshift_comment() {
        let cat = parse(
            "# simulated shear\n# zlens = 0.25\nr_mpc ghat beta_s\n\n0.1 0.02 0.5\n0.2 0.01 0.6\n",
        )
        .unwrap();
        assert_eq!(cat.len(), 2);
        assert_eq!(cat.z_lens(), 0.25);
        assert_eq!(cat.column(R_MPC).unwrap(), &[0.1, 0.2]);
        assert_eq!(cat.column(GHAT).unwrap(), &[0.02, 0.01]);
        assert_eq!(cat.column(BETA_S).unwrap(), &[0.5, 0.6]);
    }

    #[test]
    fn comma_table_with_quoted_header() {
        let cat = parse("#z_lens: 0.4\n\"r_mpc\",'ghat'\n1.5, -0.25\n").unwrap();
        assert_eq!(cat.z_lens(), 0.4);
        assert_eq!(cat.column(GHAT).unwrap(), &[-0.25]);
    }

    #[test]
    fn header_only_gives_empty_catalog() {
        let cat = parse("# zlens = 0.3\nr_mpc ghat\n").unwrap();
        assert!(cat.is_empty());
        assert_eq!(cat.column_names().count(), 2);
    }

    #[test]
    fn reports_line_of_bad_rows() {
        let err = parse("# zlens = 0.3\nr_mpc ghat\n0.1 0.2\n0.3\n").unwrap_err();
        assert!(matches!(err, CatalogError::Parse { line: 4, .. }));

        let err = parse("# zlens = 0.3\nr_mpc ghat\n0.1 abc\n").unwrap_err();
        assert!(matches!(err, CatalogError::Parse { line: 3, .. }));

        let err = parse("# zlens = 0.3\nr_mpc r_mpc\n").unwrap_err();
        assert!(matches!(err, CatalogError::Parse { line: 2, .. }));
    }

    #[test]
    fn redshift_is_required_unless_defaulted() {
        let text = "r_mpc ghat\n0.1 0.2\n";
        assert!(matches!(parse(text), Err(CatalogError::MissingRedshift)));

        let cat = TextCatalogLoader::new()
            .with_default_z_lens(0.5)
            .parse("mem", Cursor::new(text))
            .unwrap();
        assert_eq!(cat.z_lens(), 0.5);
    }

    #[test]
    fn empty_input_has_no_header() {
        assert!(matches!(
            parse("# zlens = 0.3\n"),
            Err(CatalogError::Parse { line: 0, .. })
        ));
    }

    #[test]
    fn loads_relative_to_root() {
        let dir = tempdir().unwrap();
        let mut f = File::create(dir.path().join("halo_cid7")).unwrap();
        writeln!(f, "# zlens = 0.2\nr_mpc ghat beta_s\n0.5 0.1 1.0").unwrap();

        let loader = TextCatalogLoader::new().with_root(dir.path());
        let cat = loader.load("halo_cid7").unwrap();
        assert_eq!(cat.name(), "halo_cid7");
        assert_eq!(cat.len(), 1);

        assert!(matches!(loader.load("missing"), Err(CatalogError::Io(_))));
    }
}
