// Copyright @yucwang 2026

use crate::core::histogram::TransientHistogram;

use std::fs::File;
use std::io::{BufWriter, Write};

/// Dump a transient histogram as CSV, one row per bounce depth with a
/// trailing header row of bin-center distances.
pub fn write_histogram_csv(histogram: &TransientHistogram,
                           file_path: &str) -> std::io::Result<()> {
    log::info!("Writing transient histogram: {}.", file_path);

    let file = File::create(file_path)?;
    let mut writer = BufWriter::new(file);

    let cfg = histogram.config();
    let bin_width = (cfg.dist_max - cfg.dist_min) / cfg.bin_num as f32;

    write!(writer, "distance")?;
    for bin in 0..cfg.bin_num {
        let center = cfg.dist_min + (bin as f32 + 0.5) * bin_width;
        write!(writer, ",{}", center)?;
    }
    writeln!(writer)?;

    for depth in 0..histogram.max_depth() {
        write!(writer, "depth_{}", depth)?;
        for bin in 0..cfg.bin_num {
            write!(writer, ",{}", histogram.value(depth, bin))?;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    log::info!("Histogram written to: {}.", file_path);
    Ok(())
}
