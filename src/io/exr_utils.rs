// Copyright @yucwang 2026

use crate::math::constants::Float;

use exr::prelude::*;

/// Write a linear RGB image to an OpenEXR file.
pub fn write_exr_to_file(image: &[(Float, Float, Float)],
                         width: usize,
                         height: usize,
                         file_path: &str) -> std::result::Result<(), Error> {
    log::info!("Writing OpenEXR image: {}.", file_path);

    write_rgb_file(file_path, width, height, |x, y| {
        (
            image[y * width + x].0,
            image[y * width + x].1,
            image[y * width + x].2
        )
    })?;

    log::info!("EXR written to: {}.", file_path);
    Ok(())
}
