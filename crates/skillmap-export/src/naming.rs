//! Output file naming

use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// `{stem}_{YYYYMMDD_HHMMSS}.{extension}`, so repeated exports never collide
pub fn timestamped_file_name<Tz>(stem: &str, extension: &str, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("{}_{}.{}", stem, at.format("%Y%m%d_%H%M%S"), extension)
}

pub fn timestamped_path<Tz>(dir: &Path, stem: &str, extension: &str, at: &DateTime<Tz>) -> PathBuf
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    dir.join(timestamped_file_name(stem, extension, at))
}

/// `timestamped_path`, with `_1`, `_2`, ... appended to the stamp while a file
/// of that name already exists in `dir`
pub fn unused_timestamped_path<Tz>(
    dir: &Path,
    stem: &str,
    extension: &str,
    at: &DateTime<Tz>,
) -> PathBuf
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let first = timestamped_path(dir, stem, extension, at);
    if !first.exists() {
        return first;
    }

    let stamp = at.format("%Y%m%d_%H%M%S");
    (1u32..)
        .map(|n| dir.join(format!("{}_{}_{}.{}", stem, stamp, n, extension)))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_timestamped_file_name() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 8, 5, 9).unwrap();
        assert_eq!(
            timestamped_file_name("skill_matrix", "xlsx", &at),
            "skill_matrix_20261019_080509.xlsx"
        );
        assert_eq!(
            timestamped_path(Path::new("out"), "skill_report", "pdf", &at),
            Path::new("out").join("skill_report_20261019_080509.pdf")
        );
    }

    #[test]
    fn test_unused_path_skips_existing_files() {
        let dir = TempDir::new().unwrap();
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 8, 5, 9).unwrap();

        let first = unused_timestamped_path(dir.path(), "skill_matrix", "xlsx", &at);
        assert_eq!(first, dir.path().join("skill_matrix_20261019_080509.xlsx"));
        fs::write(&first, b"first").unwrap();

        let second = unused_timestamped_path(dir.path(), "skill_matrix", "xlsx", &at);
        assert_eq!(second, dir.path().join("skill_matrix_20261019_080509_1.xlsx"));
        fs::write(&second, b"second").unwrap();

        let third = unused_timestamped_path(dir.path(), "skill_matrix", "xlsx", &at);
        assert_eq!(third, dir.path().join("skill_matrix_20261019_080509_2.xlsx"));
        assert_eq!(fs::read(&first).unwrap(), b"first");
    }
}
