use std::io::Write;
use std::path::Path;

use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};
use tracing::warn;

use crate::binning::BinnedProfile;
use crate::io::{IoError, replace_file};
use crate::stacking::StackedProfile;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProfileFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl ProfileFormat {
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref().extension()?.to_str()?.parse().ok()
    }
}

/// Writes a stacked profile, replacing `path` atomically.
///
/// Empty bins are kept so rows line up with the bin edges.
pub fn write_profile<P: AsRef<Path>>(
    profile: &StackedProfile,
    path: P,
    fmt: ProfileFormat,
) -> Result<(), IoError> {
    let empty = profile.bins.iter().filter(|b| b.is_empty()).count();
    if empty > 0 {
        warn!(empty, bins = profile.bins.len(), "stacked profile has empty bins");
    }
    let bytes = match fmt {
        ProfileFormat::Csv => stacked_delimited(profile, ',')?,
        ProfileFormat::Tsv => stacked_delimited(profile, '\t')?,
        ProfileFormat::Json => stacked_json(profile)?,
    };
    replace_file(path.as_ref(), &bytes)
}

/// Writes the profile of a single catalog, replacing `path` atomically.
pub fn write_binned_profile<P: AsRef<Path>>(
    profile: &BinnedProfile,
    path: P,
    fmt: ProfileFormat,
) -> Result<(), IoError> {
    let bytes = match fmt {
        ProfileFormat::Csv => binned_delimited(profile, ',')?,
        ProfileFormat::Tsv => binned_delimited(profile, '\t')?,
        ProfileFormat::Json => binned_json(profile)?,
    };
    replace_file(path.as_ref(), &bytes)
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) => format!("{x:.12}"),
        None => "nan".to_string(),
    }
}

fn stacked_delimited(p: &StackedProfile, d: char) -> Result<Vec<u8>, IoError> {
    let mut out = Vec::new();
    writeln!(out, "# mean_redshift = {:.12}", p.mean_redshift)?;
    writeln!(out, "# catalogs = {}", p.catalogs)?;
    writeln!(out, "# mean_m200 = {:e}", p.mean_m200)?;
    writeln!(out, "# mean_concen = {:.6}", p.mean_concen)?;
    writeln!(
        out,
        "radius{d}shear{d}shear_error{d}count{d}beta_mean{d}beta2_mean"
    )?;
    for b in &p.bins {
        writeln!(
            out,
            "{:.12}{d}{:.12}{d}{}{d}{}{d}{:.12}{d}{:.12}",
            b.radius,
            b.shear,
            fmt_opt(b.shear_error()),
            b.count,
            b.beta_mean,
            b.beta2_mean,
        )?;
    }
    Ok(out)
}

#[derive(Serialize)]
struct StackedRow {
    radius: f64,
    shear: f64,
    shear_error: Option<f64>,
    count: u64,
    beta_mean: f64,
    beta2_mean: f64,
}

#[derive(Serialize)]
struct StackedDocument<'a> {
    mean_redshift: Option<f64>,
    catalogs: u64,
    mean_m200: Option<f64>,
    mean_concen: Option<f64>,
    edges: &'a [f64],
    bins: Vec<StackedRow>,
}

fn finite(x: f64) -> Option<f64> {
    x.is_finite().then_some(x)
}

fn stacked_json(p: &StackedProfile) -> Result<Vec<u8>, IoError> {
    let doc = StackedDocument {
        mean_redshift: finite(p.mean_redshift),
        catalogs: p.catalogs,
        mean_m200: finite(p.mean_m200),
        mean_concen: finite(p.mean_concen),
        edges: &p.edges,
        bins: p
            .bins
            .iter()
            .map(|b| StackedRow {
                radius: b.radius,
                shear: b.shear,
                shear_error: b.shear_error(),
                count: b.count,
                beta_mean: b.beta_mean,
                beta2_mean: b.beta2_mean,
            })
            .collect(),
    };
    let mut out = serde_json::to_vec_pretty(&doc)?;
    out.push(b'\n');
    Ok(out)
}

fn binned_delimited(p: &BinnedProfile, d: char) -> Result<Vec<u8>, IoError> {
    let mut out = Vec::new();
    writeln!(out, "radius{d}value{d}error{d}count")?;
    for i in 0..p.len() {
        writeln!(
            out,
            "{:.12}{d}{:.12}{d}{:.12}{d}{}",
            p.radii[i], p.values[i], p.errors[i], p.counts[i]
        )?;
    }
    Ok(out)
}

#[derive(Serialize)]
struct BinnedRow {
    radius: f64,
    value: f64,
    error: f64,
    count: usize,
}

fn binned_json(p: &BinnedProfile) -> Result<Vec<u8>, IoError> {
    let rows: Vec<BinnedRow> = (0..p.len())
        .map(|i| BinnedRow {
            radius: p.radii[i],
            value: p.values[i],
            error: p.errors[i],
            count: p.counts[i],
        })
        .collect();
    let mut out = serde_json::to_vec_pretty(&rows)?;
    out.push(b'\n');
    Ok(out)
}
