use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::core::HaloId;
use crate::io::{IoError, replace_file};
use crate::stacking::StackAssignment;

/// Placeholder replaced by the halo id in a catalog path template.
pub const HALO_ID_PLACEHOLDER: &str = "{id}";

/// Catalog identifiers in a stack list, one per line.
///
/// Only the first token of each line is used; blank lines and `#` comments
/// are skipped.
pub fn read_stack_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>, IoError> {
    let reader = BufReader::new(File::open(path)?);
    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some(first) = trimmed.split_whitespace().next() {
            out.push(first.to_string());
        }
    }
    Ok(out)
}

pub fn write_stack_list<P, I, S>(path: P, identifiers: I) -> Result<(), IoError>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut text = String::new();
    for id in identifiers {
        text.push_str(id.as_ref());
        text.push('\n');
    }
    replace_file(path.as_ref(), text.as_bytes())
}

pub fn catalog_path(template: &str, halo_id: HaloId) -> String {
    template.replace(HALO_ID_PLACEHOLDER, &halo_id.to_string())
}

/// Writes `<prefix>.<label>.list` and `<prefix>.<label>.dat` per stack.
///
/// The list names one catalog per halo via `template`; the summary holds the
/// stack's mean mass, concentration and redshift. Returns the list paths.
pub fn write_assignments<P: AsRef<Path>>(
    dir: P,
    prefix: &str,
    template: &str,
    assignments: &[StackAssignment],
) -> Result<Vec<PathBuf>, IoError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(assignments.len());
    for stack in assignments {
        let label = stack.label();
        let list = dir.join(format!("{prefix}.{label}.list"));
        write_stack_list(
            &list,
            stack.halo_ids.iter().map(|&id| catalog_path(template, id)),
        )?;

        let summary = format!(
            "# m200 concen redshift\n{} {} {}\n",
            stack.mean_m200, stack.mean_concen, stack.mean_redshift
        );
        replace_file(&dir.join(format!("{prefix}.{label}.dat")), summary.as_bytes())?;
        written.push(list);
    }
    Ok(written)
}
