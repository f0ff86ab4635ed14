// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Single-band GeoTIFF reader

use super::{GeoTransform, GridSource};
use crate::error::RasterError;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;
use tiff::ColorType;

const GT_RASTER_TYPE_KEY: u32 = 1025;
const RASTER_PIXEL_IS_POINT: u32 = 2;
const PLANAR_SEPARATE: u32 = 2;

/// Load band 1 of a GeoTIFF together with its geotransform and nodata value
pub fn open(path: &Path) -> Result<GridSource, RasterError> {
    let file = File::open(path).map_err(|e| open_error(path, e))?;
    decode(BufReader::new(file), path)
}

pub(super) fn decode<R: Read + Seek>(reader: R, path: &Path) -> Result<GridSource, RasterError> {
    let mut decoder = Decoder::new(reader).map_err(|e| open_error(path, e))?;

    let (width, height) = decoder.dimensions().map_err(|e| open_error(path, e))?;
    let samples = match decoder.colortype().map_err(|e| open_error(path, e))? {
        ColorType::Gray(_) => 1,
        ColorType::GrayA(_) => 2,
        ColorType::RGB(_) => 3,
        ColorType::RGBA(_) => 4,
        other => {
            return Err(RasterError::UnsupportedLayout(format!(
                "color type {:?}",
                other
            )))
        }
    };

    let planar = decoder
        .find_tag(Tag::PlanarConfiguration)
        .map_err(|e| open_error(path, e))?
        .map(|value| value.into_u32())
        .transpose()
        .map_err(|e| open_error(path, e))?;
    check_interleaved(planar, samples)?;

    let transform = read_geo_transform(&mut decoder, path)?;
    let nodata = read_nodata(&mut decoder, path)?;

    let image = decoder.read_image().map_err(|e| open_error(path, e))?;
    let values: Vec<f64> = match image {
        DecodingResult::U8(data) => data.into_iter().step_by(samples).map(f64::from).collect(),
        DecodingResult::U16(data) => data.into_iter().step_by(samples).map(f64::from).collect(),
        DecodingResult::U32(data) => data.into_iter().step_by(samples).map(f64::from).collect(),
        DecodingResult::U64(data) => data.into_iter().step_by(samples).map(|v| v as f64).collect(),
        DecodingResult::I8(data) => data.into_iter().step_by(samples).map(f64::from).collect(),
        DecodingResult::I16(data) => data.into_iter().step_by(samples).map(f64::from).collect(),
        DecodingResult::I32(data) => data.into_iter().step_by(samples).map(f64::from).collect(),
        DecodingResult::I64(data) => data.into_iter().step_by(samples).map(|v| v as f64).collect(),
        DecodingResult::F32(data) => data.into_iter().step_by(samples).map(f64::from).collect(),
        DecodingResult::F64(data) => data.into_iter().step_by(samples).collect(),
        #[allow(unreachable_patterns)]
        _ => {
            return Err(RasterError::UnsupportedLayout(
                "unsupported sample format".to_string(),
            ))
        }
    };

    let grid = GridSource::new(width as usize, height as usize, values, transform)?;
    Ok(match nodata {
        Some(nodata) => grid.with_nodata(nodata),
        None => grid,
    })
}

/// Band 1 is taken as every `samples`-th value, which only holds for
/// pixel-interleaved data
fn check_interleaved(planar: Option<u32>, samples: usize) -> Result<(), RasterError> {
    if samples > 1 && planar == Some(PLANAR_SEPARATE) {
        return Err(RasterError::UnsupportedLayout(format!(
            "planar configuration with {} samples per pixel",
            samples
        )));
    }
    Ok(())
}

/// Geotransform from ModelTransformationTag, or from the tiepoint and pixel
/// scale pair. PixelIsPoint rasters are shifted half a pixel so that the
/// transform always addresses cell corners.
fn read_geo_transform<R: Read + Seek>(
    decoder: &mut Decoder<R>,
    path: &Path,
) -> Result<GeoTransform, RasterError> {
    let matrix = find_f64s(decoder, Tag::ModelTransformationTag, path)?;
    let tiepoint = find_f64s(decoder, Tag::ModelTiepointTag, path)?;
    let scale = find_f64s(decoder, Tag::ModelPixelScaleTag, path)?;

    let mut gt = match (matrix, tiepoint, scale) {
        (Some(m), _, _) if m.len() >= 8 => [m[3], m[0], m[1], m[7], m[4], m[5]],
        (_, Some(tp), Some(sc)) if tp.len() >= 6 && sc.len() >= 2 => [
            tp[3] - tp[0] * sc[0],
            sc[0],
            0.0,
            tp[4] + tp[1] * sc[1],
            0.0,
            -sc[1],
        ],
        _ => return Err(RasterError::MissingGeoTransform(path.to_path_buf())),
    };

    if raster_type(decoder, path)? == Some(RASTER_PIXEL_IS_POINT) {
        gt[0] -= 0.5 * gt[1] + 0.5 * gt[2];
        gt[3] -= 0.5 * gt[4] + 0.5 * gt[5];
    }

    Ok(GeoTransform(gt))
}

fn raster_type<R: Read + Seek>(
    decoder: &mut Decoder<R>,
    path: &Path,
) -> Result<Option<u32>, RasterError> {
    let Some(value) = decoder
        .find_tag(Tag::GeoKeyDirectoryTag)
        .map_err(|e| open_error(path, e))?
    else {
        return Ok(None);
    };
    let keys = value.into_u32_vec().map_err(|e| open_error(path, e))?;

    // Header of four shorts, then (key, location, count, value) entries
    Ok(keys
        .get(4..)
        .unwrap_or_default()
        .chunks_exact(4)
        .find(|entry| entry[0] == GT_RASTER_TYPE_KEY && entry[1] == 0)
        .map(|entry| entry[3]))
}

fn read_nodata<R: Read + Seek>(
    decoder: &mut Decoder<R>,
    path: &Path,
) -> Result<Option<f64>, RasterError> {
    let Some(value) = decoder
        .find_tag(Tag::GdalNodata)
        .map_err(|e| open_error(path, e))?
    else {
        return Ok(None);
    };
    let text = value.into_string().map_err(|e| open_error(path, e))?;
    let text = text.trim_matches(char::from(0)).trim();
    match text.to_lowercase().as_str() {
        "nan" | "-nan" => Ok(Some(f64::NAN)),
        _ => text
            .parse()
            .map(Some)
            .map_err(|_| RasterError::UnsupportedLayout(format!("nodata value '{}'", text))),
    }
}

fn find_f64s<R: Read + Seek>(
    decoder: &mut Decoder<R>,
    tag: Tag,
    path: &Path,
) -> Result<Option<Vec<f64>>, RasterError> {
    decoder
        .find_tag(tag)
        .map_err(|e| open_error(path, e))?
        .map(|value| value.into_f64_vec())
        .transpose()
        .map_err(|e| open_error(path, e))
}

fn open_error(path: &Path, err: impl std::fmt::Display) -> RasterError {
    RasterError::Open {
        path: path.to_path_buf(),
        details: err.to_string(),
    }
}
