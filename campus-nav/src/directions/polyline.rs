//! Encoded polyline codec.
//!
//! Coordinates are scaled by 1e5, delta-encoded against the previous point,
//! zigzag-signed and written as 5-bit groups offset by 63 into printable
//! ASCII. Each group except the last has the 0x20 continuation bit set.

use crate::domain::Coordinate;

const SCALE: f64 = 1e5;

/// Error returned when decoding a malformed polyline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolylineError {
    #[error("polyline ends mid-value at byte {0}")]
    Truncated(usize),

    #[error("invalid polyline character {ch:?} at byte {index}")]
    InvalidChar { index: usize, ch: char },

    #[error("polyline value overflows at byte {0}")]
    Overflow(usize),
}

/// Read one zigzag-encoded value starting at `*pos`.
fn read_value(bytes: &[u8], pos: &mut usize) -> Result<i64, PolylineError> {
    let mut result: i64 = 0;
    let mut shift = 0u32;

    loop {
        let Some(&b) = bytes.get(*pos) else {
            return Err(PolylineError::Truncated(*pos));
        };
        if !(63..=126).contains(&b) {
            return Err(PolylineError::InvalidChar {
                index: *pos,
                ch: b as char,
            });
        }
        if shift > 55 {
            return Err(PolylineError::Overflow(*pos));
        }

        let chunk = (b - 63) as i64;
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        *pos += 1;

        if chunk < 0x20 {
            break;
        }
    }

    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

/// Decode an encoded polyline into coordinates.
///
/// ```
/// use campus_nav::directions::decode_polyline;
///
/// let points = decode_polyline("_p~iF~ps|U_ulLnnqC").unwrap();
/// assert_eq!(points.len(), 2);
/// assert!((points[0].latitude - 38.5).abs() < 1e-9);
/// assert!((points[1].longitude + 120.95).abs() < 1e-9);
/// ```
pub fn decode_polyline(encoded: &str) -> Result<Vec<Coordinate>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut pos = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut points = Vec::new();

    while pos < bytes.len() {
        lat = lat
            .checked_add(read_value(bytes, &mut pos)?)
            .ok_or(PolylineError::Overflow(pos))?;
        lng = lng
            .checked_add(read_value(bytes, &mut pos)?)
            .ok_or(PolylineError::Overflow(pos))?;
        points.push(Coordinate::new(lat as f64 / SCALE, lng as f64 / SCALE));
    }

    Ok(points)
}

fn write_value(value: i64, out: &mut String) {
    let mut v = if value < 0 { !(value << 1) } else { value << 1 };
    while v >= 0x20 {
        out.push((((v & 0x1f) | 0x20) as u8 + 63) as char);
        v >>= 5;
    }
    out.push((v as u8 + 63) as char);
}

/// Encode coordinates as a polyline, rounding to five decimal places.
pub fn encode_polyline(points: &[Coordinate]) -> String {
    let mut out = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for p in points {
        let lat = (p.latitude * SCALE).round() as i64;
        let lng = (p.longitude * SCALE).round() as i64;
        write_value(lat - prev_lat, &mut out);
        write_value(lng - prev_lng, &mut out);
        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    fn fixture_points() -> Vec<Coordinate> {
        vec![
            Coordinate::new(38.5, -120.2),
            Coordinate::new(40.7, -120.95),
            Coordinate::new(43.252, -126.453),
        ]
    }

    fn assert_close(a: &[Coordinate], b: &[Coordinate]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x.latitude - y.latitude).abs() < 1e-9, "{x:?} vs {y:?}");
            assert!((x.longitude - y.longitude).abs() < 1e-9, "{x:?} vs {y:?}");
        }
    }

    #[test]
    fn decode_known_fixture() {
        let points = decode_polyline(FIXTURE).unwrap();
        assert_close(&points, &fixture_points());
    }

    #[test]
    fn encode_known_fixture() {
        assert_eq!(encode_polyline(&fixture_points()), FIXTURE);
    }

    #[test]
    fn empty_polyline() {
        assert!(decode_polyline("").unwrap().is_empty());
        assert_eq!(encode_polyline(&[]), "");
    }

    #[test]
    fn campus_fixture() {
        // Walking path used by the mock provider fixtures.
        let points = decode_polyline("w{ttGnpa`MwB~CwChB").unwrap();
        assert_close(
            &points,
            &[
                Coordinate::new(45.4958, -73.5772),
                Coordinate::new(45.4964, -73.578),
                Coordinate::new(45.49716, -73.57853),
            ],
        );
    }

    #[test]
    fn truncated_input() {
        // Drop the final character: the last longitude is incomplete.
        let cut = &FIXTURE[..FIXTURE.len() - 1];
        assert!(matches!(
            decode_polyline(cut),
            Err(PolylineError::Truncated(_))
        ));

        // A latitude with no longitude.
        assert!(matches!(
            decode_polyline("_p~iF"),
            Err(PolylineError::Truncated(5))
        ));
    }

    #[test]
    fn invalid_character() {
        assert_eq!(
            decode_polyline("_p~iF ps|U"),
            Err(PolylineError::InvalidChar { index: 5, ch: ' ' })
        );
    }

    #[test]
    fn accumulated_overflow_is_rejected() {
        // Each value is the widest positive delta (2^59 - 1); enough of them
        // overflow the running latitude.
        let widest = format!("}}{}^", "~".repeat(10));
        let encoded = widest.repeat(40);
        assert!(matches!(
            decode_polyline(&encoded),
            Err(PolylineError::Overflow(_))
        ));
    }

    #[test]
    fn overflow_is_rejected() {
        let endless = "~".repeat(20);
        assert!(matches!(
            decode_polyline(&endless),
            Err(PolylineError::Overflow(_))
        ));
    }
}
