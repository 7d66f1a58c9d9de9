//! GeoParquet reading operations.

use anyhow::{Context, Result, anyhow, bail};
use arrow_array::{Array, RecordBatch};
use arrow_schema::Field;
use bytes::Bytes;
use geo::{Geometry, MultiPolygon};
use geo_traits::to_geo::{ToGeoGeometry, ToGeoMultiPolygon, ToGeoPolygon};
use geoarrow_array::{
    GeoArrowArrayAccessor,
    array::{GeometryArray, MultiPolygonArray, PolygonArray},
};
use geoparquet::reader::{GeoParquetReaderBuilder, GeoParquetRecordBatchReader};
use parquet::{arrow::arrow_reader::ParquetRecordBatchReaderBuilder, file::reader::ChunkReader};

/// Read the primary geometry column of GeoParquet bytes as MultiPolygons.
/// Polygon columns are widened; non-areal rows and nulls are skipped.
pub fn read_geoparquet_bytes(bytes: &[u8]) -> Result<Vec<MultiPolygon<f64>>> {
    read_geoparquet(Bytes::copy_from_slice(bytes))
}

/// Internal helper: read from any ChunkReader-compatible source.
fn read_geoparquet<R: ChunkReader + 'static>(reader: R) -> Result<Vec<MultiPolygon<f64>>> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(reader)
        .context("[io::geoparquet::read] Failed to open parquet")?;

    let gp_meta = builder
        .geoparquet_metadata()
        .ok_or_else(|| anyhow!("[io::geoparquet::read] Not a GeoParquet file (missing 'geo' metadata)"))??;
    let primary = gp_meta.primary_column.clone();

    let ga_schema =
        builder.geoarrow_schema(&gp_meta, /*parse_to_geoarrow=*/ true, Default::default())?;

    let parquet_reader = builder.with_batch_size(64 * 1024).build()?;
    let geo_reader = GeoParquetRecordBatchReader::try_new(parquet_reader, ga_schema)?;

    let mut shapes = Vec::new();
    for batch in geo_reader {
        let batch = batch.context("[io::geoparquet::read] Failed to read record batch")?;
        read_batch(&batch, &primary, &mut shapes)?;
    }

    Ok(shapes)
}

/// Append the areal geometries of one batch to `out`.
fn read_batch(batch: &RecordBatch, column: &str, out: &mut Vec<MultiPolygon<f64>>) -> Result<()> {
    let schema = batch.schema();
    let idx = schema.index_of(column)
        .with_context(|| format!("[io::geoparquet::read] missing geometry column '{column}'"))?;
    let arr: &dyn Array = batch.column(idx).as_ref();
    let field: &Field = schema.field(idx);

    if let Ok(multi) = MultiPolygonArray::try_from((arr, field)) {
        for scalar in multi.iter().flatten() {
            out.push(scalar?.to_multi_polygon());
        }
    } else if let Ok(single) = PolygonArray::try_from((arr, field)) {
        for scalar in single.iter().flatten() {
            out.push(MultiPolygon(vec![scalar?.to_polygon()]));
        }
    } else if let Ok(mixed) = GeometryArray::try_from((arr, field)) {
        for scalar in mixed.iter().flatten() {
            match scalar?.to_geometry() {
                Geometry::Polygon(p) => out.push(MultiPolygon(vec![p])),
                Geometry::MultiPolygon(mp) => out.push(mp),
                _ => {}
            }
        }
    } else {
        bail!("[io::geoparquet::read] column '{column}' is not a polygon geometry column");
    }

    Ok(())
}
