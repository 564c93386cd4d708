//! Encoding and decoding of [Google encoded
//! polylines](https://developers.google.com/maps/documentation/utilities/polylinealgorithm),
//! the compact route geometry format returned by the Directions API.

use std::str::Bytes;

use crate::error::{AppError, Result};
use crate::models::Coordinates;

/// Coordinates are scaled by 1e5 before delta encoding.
const PRECISION: f64 = 1e5;

/// Decode an encoded polyline into its coordinate sequence.
///
/// An empty string decodes to an empty path. Malformed input (a chunk
/// sequence cut off mid-value, a latitude with no matching longitude, or
/// accumulated values outside valid coordinate ranges) is rejected.
pub fn decode(encoded: &str) -> Result<Vec<Coordinates>> {
    let mut bytes = encoded.bytes();
    let mut points = Vec::new();
    let mut lat: i32 = 0;
    let mut lng: i32 = 0;

    while let Some(delta_lat) = read_value(&mut bytes)? {
        let delta_lng = read_value(&mut bytes)?.ok_or_else(|| {
            AppError::Decode("latitude chunk without matching longitude".to_string())
        })?;

        // Each point is encoded as a delta from the previous one
        lat += delta_lat;
        lng += delta_lng;

        let point = Coordinates::new(f64::from(lat) / PRECISION, f64::from(lng) / PRECISION)
            .map_err(AppError::Decode)?;
        points.push(point);
    }

    Ok(points)
}

/// Encode coordinates as a polyline string.
///
/// Inverse of [`decode`]: coordinates are scaled to five decimal places,
/// so anything finer is lost in a round trip.
pub fn encode(points: &[Coordinates]) -> String {
    let mut encoded = String::new();
    let mut prev_lat: i32 = 0;
    let mut prev_lng: i32 = 0;

    for point in points {
        let lat = (point.lat * PRECISION).round() as i32;
        let lng = (point.lng * PRECISION).round() as i32;
        write_value(lat - prev_lat, &mut encoded);
        write_value(lng - prev_lng, &mut encoded);
        prev_lat = lat;
        prev_lng = lng;
    }

    encoded
}

/// Read one signed value from the byte stream.
///
/// Returns `Ok(None)` when the stream is exhausted at a value boundary,
/// and an error when it ends mid-value or contains a byte outside the
/// printable encoding range.
fn read_value(bytes: &mut Bytes) -> Result<Option<i32>> {
    let mut result: u32 = 0;
    let mut shift = 0;
    let mut started = false;

    loop {
        let byte = match bytes.next() {
            Some(byte) => byte,
            None if started => {
                return Err(AppError::Decode(
                    "chunk sequence truncated mid-value".to_string(),
                ))
            }
            None => return Ok(None),
        };
        started = true;

        let value = byte
            .checked_sub(63)
            .filter(|v| *v < 64)
            .map(u32::from)
            .ok_or_else(|| {
                AppError::Decode(format!("invalid byte 0x{:02x} in encoded polyline", byte))
            })?;

        if shift > 30 {
            return Err(AppError::Decode(
                "chunk sequence does not fit a coordinate".to_string(),
            ));
        }
        result |= (value & 0x1f) << shift;

        // Bit 0x20 marks a continuation chunk
        if value & 0x20 == 0 {
            let mut value = result as i32;
            if value & 1 == 1 {
                value = !value;
            }
            return Ok(Some(value >> 1));
        }
        shift += 5;
    }
}

/// Append one signed value to the output in 5-bit chunks.
fn write_value(value: i32, out: &mut String) {
    let mut value = {
        let shifted = value << 1;
        if value < 0 {
            !shifted
        } else {
            shifted
        }
    } as u32;

    loop {
        let mut chunk = (value & 0x1f) as u8;
        value >>= 5;
        if value != 0 {
            chunk |= 0x20;
        }
        out.push(char::from(chunk + 63));
        if value == 0 {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Worked example from the polyline algorithm reference
    const SIERRA_ROUTE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    fn sierra_points() -> Vec<Coordinates> {
        vec![
            Coordinates::new(38.5, -120.2).unwrap(),
            Coordinates::new(40.7, -120.95).unwrap(),
            Coordinates::new(43.252, -126.453).unwrap(),
        ]
    }

    #[test]
    fn test_decode_reference_polyline() {
        let points = decode(SIERRA_ROUTE).unwrap();
        assert_eq!(points, sierra_points());
    }

    #[test]
    fn test_decode_single_point() {
        let points = decode("_p~iF~ps|U").unwrap();
        assert_eq!(points, vec![Coordinates::new(38.5, -120.2).unwrap()]);
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode("").unwrap(), vec![]);
    }

    #[test]
    fn test_encode_reference_points() {
        assert_eq!(encode(&sierra_points()), SIERRA_ROUTE);
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn test_round_trip() {
        let decoded = decode(SIERRA_ROUTE).unwrap();
        assert_eq!(encode(&decoded), SIERRA_ROUTE);
    }

    #[test]
    fn test_negative_deltas_round_trip() {
        let points = vec![
            Coordinates::new(-35.27801, 149.12958).unwrap(),
            Coordinates::new(-35.28032, 149.12907).unwrap(),
            Coordinates::new(-35.28099, 149.12929).unwrap(),
        ];
        assert_eq!(decode(&encode(&points)).unwrap(), points);
    }

    #[test]
    fn test_decode_truncated_mid_value() {
        // Dropping the final byte of "_p~iF" leaves a dangling continuation chunk
        let err = decode("_p~i").unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[test]
    fn test_decode_missing_longitude() {
        let err = decode("_p~iF").unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
        assert!(err.to_string().contains("longitude"));
    }

    #[test]
    fn test_decode_invalid_byte() {
        // Space is below the printable encoding range
        assert!(decode("_p~iF~ps|U _ulLnnqC").is_err());
    }

    #[test]
    fn test_decode_out_of_range_coordinate() {
        let over_the_pole = encode(&[Coordinates {
            lat: 91.0,
            lng: 0.0,
        }]);
        assert!(decode(&over_the_pole).is_err());
    }
}
