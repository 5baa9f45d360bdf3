//! Generate command implementation
//!
//! Builds a point set, randomises it and prints its points.

use std::io::Write;

use qmc_pointsets::{PointSet, PointSetIterator, ScramblablePointSet, ShiftablePointSet};
use tracing::info;

use super::{
    randomise_scramblable, randomise_shiftable, PointSetArgs, PointSetVisitor, RandomisationKind,
};
use crate::config::{OutputFormat, QmcConfig};
use crate::Result;

/// Run the generate command
pub fn run(
    args: &PointSetArgs,
    randomise: RandomisationKind,
    max_points: Option<usize>,
    config: &QmcConfig,
) -> Result<()> {
    info!(kind = ?args.kind, dim = args.dim, ?randomise, seed = config.seed, "generating points");
    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    args.build()?.accept(Generate {
        randomise,
        max_points,
        config,
        out: &mut out,
    })?;
    out.flush()?;
    Ok(())
}

struct Generate<'a> {
    randomise: RandomisationKind,
    max_points: Option<usize>,
    config: &'a QmcConfig,
    out: &'a mut dyn Write,
}

impl PointSetVisitor for Generate<'_> {
    type Output = Result<()>;

    fn visit_scramblable<P>(self, mut point_set: P) -> Result<()>
    where
        P: ScramblablePointSet + Clone + Send + Sync,
    {
        randomise_scramblable(&mut point_set, self.randomise, self.config.seed)?;
        write_points(
            &point_set,
            self.max_points,
            self.config.format,
            self.config.precision,
            self.out,
        )
    }

    fn visit_shiftable<P>(self, mut point_set: P) -> Result<()>
    where
        P: ShiftablePointSet + Clone + Send + Sync,
    {
        randomise_shiftable(&mut point_set, self.randomise, self.config.seed)?;
        write_points(
            &point_set,
            self.max_points,
            self.config.format,
            self.config.precision,
            self.out,
        )
    }
}

/// Writes the first `max_points` points (all by default) through the
/// point set's own iterator.
pub fn write_points<P: PointSet + ?Sized>(
    point_set: &P,
    max_points: Option<usize>,
    format: OutputFormat,
    precision: usize,
    out: &mut dyn Write,
) -> Result<()> {
    let dim = point_set.dimension();
    let count = max_points.map_or(point_set.num_points(), |m| m.min(point_set.num_points()));
    let width = precision + 3;

    if format == OutputFormat::Table {
        write!(out, "{:>10}", "i")?;
        for j in 0..dim {
            write!(out, " {:>width$}", format!("x{}", j))?;
        }
        writeln!(out)?;
    }

    let mut it = point_set.iter();
    let mut point = vec![0.0; dim];
    match format {
        OutputFormat::Csv => {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(out);
            for _ in 0..count {
                it.next_point(&mut point)?;
                writer.write_record(point.iter().map(|x| format!("{:.precision$}", x)))?;
            }
            writer.flush()?;
        }
        OutputFormat::Table => {
            for i in 0..count {
                it.next_point(&mut point)?;
                write!(out, "{:>10}", i)?;
                for x in &point {
                    write!(out, " {:>width$.precision$}", x)?;
                }
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qmc_pointsets::lattice::Rank1Lattice;

    fn render(format: OutputFormat, max_points: Option<usize>) -> String {
        let lattice = Rank1Lattice::new(4, &[1, 3]).unwrap();
        let mut buffer = Vec::new();
        write_points(&lattice, max_points, format, 3, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_csv_rows() {
        let text = render(OutputFormat::Csv, None);
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows, ["0.000,0.000", "0.250,0.750", "0.500,0.500", "0.750,0.250"]);
    }

    #[test]
    fn test_table_has_header_and_index() {
        let text = render(OutputFormat::Table, Some(2));
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].contains("x0") && rows[0].contains("x1"));
        assert!(rows[2].trim_start().starts_with('1'));
        assert!(rows[2].ends_with("0.750"));
    }

    #[test]
    fn test_max_points_is_capped_by_set_size() {
        assert_eq!(render(OutputFormat::Csv, Some(100)).lines().count(), 4);
    }
}
