//! Open Location Code ("Plus Code") validation, decoding, encoding, and
//! short-code recovery.
//!
//! Pair digits are accumulated as integers in units of 1/8000 degree and the
//! grid refinement in units of 1/25,000,000 (latitude) and 1/8,192,000
//! (longitude) degree, so decoding is exact up to the final division.

use footprint_core::Coordinate;

const SEPARATOR: char = '+';
const SEPARATOR_POSITION: usize = 8;
const PADDING: char = '0';
const ALPHABET: &[u8; 20] = b"23456789CFGHJMPQRVWX";
const ENCODING_BASE: i64 = 20;

const LATITUDE_MAX: f64 = 90.0;
const LONGITUDE_MAX: f64 = 180.0;

const MAX_DIGIT_COUNT: usize = 15;
const PAIR_CODE_LENGTH: usize = 10;
const GRID_CODE_LENGTH: usize = 5;
const GRID_COLUMNS: i64 = 4;
const GRID_ROWS: i64 = 5;

/// Place value of the first pair digit, in pair-precision units (20^4).
const PAIR_FIRST_PLACE_VALUE: i64 = 160_000;
/// Pair-precision units per degree (20^3).
const PAIR_PRECISION: i64 = 8_000;
const GRID_LAT_FIRST_PLACE_VALUE: i64 = 625;
const GRID_LNG_FIRST_PLACE_VALUE: i64 = 256;
/// Grid-precision units per degree: 8000 * 5^5 and 8000 * 4^5.
const FINAL_LAT_PRECISION: i64 = 25_000_000;
const FINAL_LNG_PRECISION: i64 = 8_192_000;

/// The rectangle a full code denotes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodeArea {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
    /// Number of significant digits (separator and padding excluded).
    pub code_length: usize,
}

impl CodeArea {
    /// Midpoint of the area, clamped to the valid coordinate range.
    #[must_use]
    pub fn center(&self) -> Coordinate {
        let latitude = (self.south + (self.north - self.south) / 2.0).min(LATITUDE_MAX);
        let longitude = (self.west + (self.east - self.west) / 2.0).min(LONGITUDE_MAX);
        Coordinate::new(latitude, longitude)
    }
}

fn digit_value(c: char) -> Option<i64> {
    let upper = c.to_ascii_uppercase();
    ALPHABET
        .iter()
        .position(|&d| char::from(d) == upper)
        .and_then(|i| i64::try_from(i).ok())
}

fn digit_char(value: i64) -> char {
    usize::try_from(value)
        .ok()
        .and_then(|i| ALPHABET.get(i))
        .map_or(PADDING, |&d| char::from(d))
}

/// Whether `code` is syntactically a full or short Plus Code.
#[must_use]
pub fn is_valid(code: &str) -> bool {
    if !code.is_ascii() || code.len() <= 1 {
        return false;
    }
    if code.matches(SEPARATOR).count() != 1 {
        return false;
    }
    let Some(sep) = code.find(SEPARATOR) else {
        return false;
    };
    if sep > SEPARATOR_POSITION || sep % 2 == 1 {
        return false;
    }

    if let (Some(first_pad), Some(last_pad)) = (code.find(PADDING), code.rfind(PADDING)) {
        // Padding only appears in full-length prefixes, never first, in an
        // even-length run, and nothing may follow the separator.
        if sep < SEPARATOR_POSITION || first_pad == 0 {
            return false;
        }
        let run = &code[first_pad..=last_pad];
        if run.len() % 2 == 1 || run.chars().any(|c| c != PADDING) {
            return false;
        }
        if !code.ends_with(SEPARATOR) {
            return false;
        }
    }

    // A single digit after the separator is never valid.
    if code.len() - sep - 1 == 1 {
        return false;
    }

    code.chars()
        .all(|c| c == SEPARATOR || c == PADDING || digit_value(c).is_some())
}

/// Whether `code` is a valid code with leading digits removed.
#[must_use]
pub fn is_short(code: &str) -> bool {
    is_valid(code) && code.find(SEPARATOR).is_some_and(|sep| sep < SEPARATOR_POSITION)
}

/// Whether `code` is a valid code that denotes an area on its own.
#[must_use]
pub fn is_full(code: &str) -> bool {
    if !is_valid(code) || is_short(code) {
        return false;
    }
    let mut chars = code.chars();
    let first_lat = chars.next().and_then(digit_value);
    let first_lng = chars.next().and_then(digit_value);
    // The leading pair must fall within +/-90 latitude and +/-180 longitude.
    matches!(
        (first_lat, first_lng),
        (Some(lat), Some(lng)) if lat * ENCODING_BASE < 180 && lng * ENCODING_BASE < 360
    )
}

/// Decodes a full code into the area it denotes. `None` for anything else.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn decode(code: &str) -> Option<CodeArea> {
    if !is_full(code) {
        return None;
    }
    let digits = code
        .chars()
        .filter(|&c| c != SEPARATOR && c != PADDING)
        .take(MAX_DIGIT_COUNT)
        .map(digit_value)
        .collect::<Option<Vec<i64>>>()?;

    let mut normal_lat = -90 * PAIR_PRECISION;
    let mut normal_lng = -180 * PAIR_PRECISION;
    let mut grid_lat = 0_i64;
    let mut grid_lng = 0_i64;

    let pair_digits = digits.len().min(PAIR_CODE_LENGTH);
    let pair_count = pair_digits / 2;
    let mut place_value = PAIR_FIRST_PLACE_VALUE;
    for (n, pair) in digits[..pair_digits].chunks_exact(2).enumerate() {
        normal_lat += pair[0] * place_value;
        normal_lng += pair[1] * place_value;
        if n + 1 < pair_count {
            place_value /= ENCODING_BASE;
        }
    }
    let mut lat_precision = place_value as f64 / PAIR_PRECISION as f64;
    let mut lng_precision = lat_precision;

    if digits.len() > PAIR_CODE_LENGTH {
        let grid = &digits[PAIR_CODE_LENGTH..];
        let mut row_value = GRID_LAT_FIRST_PLACE_VALUE;
        let mut col_value = GRID_LNG_FIRST_PLACE_VALUE;
        for (n, digit) in grid.iter().enumerate() {
            grid_lat += (digit / GRID_COLUMNS) * row_value;
            grid_lng += (digit % GRID_COLUMNS) * col_value;
            if n + 1 < grid.len() {
                row_value /= GRID_ROWS;
                col_value /= GRID_COLUMNS;
            }
        }
        lat_precision = row_value as f64 / FINAL_LAT_PRECISION as f64;
        lng_precision = col_value as f64 / FINAL_LNG_PRECISION as f64;
    }

    let south =
        normal_lat as f64 / PAIR_PRECISION as f64 + grid_lat as f64 / FINAL_LAT_PRECISION as f64;
    let west =
        normal_lng as f64 / PAIR_PRECISION as f64 + grid_lng as f64 / FINAL_LNG_PRECISION as f64;

    Some(CodeArea {
        south,
        west,
        north: south + lat_precision,
        east: west + lng_precision,
        code_length: digits.len(),
    })
}

fn clip_latitude(latitude: f64) -> f64 {
    latitude.clamp(-LATITUDE_MAX, LATITUDE_MAX)
}

fn normalize_longitude(longitude: f64) -> f64 {
    (longitude + LONGITUDE_MAX).rem_euclid(2.0 * LONGITUDE_MAX) - LONGITUDE_MAX
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn latitude_precision(code_length: usize) -> f64 {
    if code_length <= PAIR_CODE_LENGTH {
        return 20_f64.powi(2 - (code_length / 2) as i32);
    }
    20_f64.powi(-3) / 5_f64.powi((code_length - PAIR_CODE_LENGTH) as i32)
}

/// Rounds to six decimals then truncates, keeping float noise out of the
/// integer digit arithmetic.
#[allow(clippy::cast_possible_truncation)]
fn to_units(degrees: f64, units_per_degree: i64) -> i64 {
    #[allow(clippy::cast_precision_loss)]
    let scaled = degrees * units_per_degree as f64;
    ((scaled * 1e6).round() / 1e6).floor() as i64
}

/// Encodes a coordinate as a full code of `code_length` digits.
///
/// `None` when the length is below 2 or an odd length below 10.
#[must_use]
pub fn encode(latitude: f64, longitude: f64, code_length: usize) -> Option<String> {
    if code_length < 2 || (code_length < PAIR_CODE_LENGTH && code_length % 2 == 1) {
        return None;
    }
    let code_length = code_length.min(MAX_DIGIT_COUNT);

    let mut latitude = clip_latitude(latitude);
    let longitude = normalize_longitude(longitude);
    if (latitude - LATITUDE_MAX).abs() < f64::EPSILON {
        latitude -= latitude_precision(code_length);
    }

    let mut lat_val = to_units(latitude + LATITUDE_MAX, FINAL_LAT_PRECISION);
    let mut lng_val = to_units(longitude + LONGITUDE_MAX, FINAL_LNG_PRECISION);

    // Digits are produced least significant first.
    let mut reversed = Vec::with_capacity(MAX_DIGIT_COUNT);
    if code_length > PAIR_CODE_LENGTH {
        for _ in 0..GRID_CODE_LENGTH {
            let index = (lat_val % GRID_ROWS) * GRID_COLUMNS + lng_val % GRID_COLUMNS;
            reversed.push(digit_char(index));
            lat_val /= GRID_ROWS;
            lng_val /= GRID_COLUMNS;
        }
    } else {
        lat_val /= GRID_ROWS.pow(5);
        lng_val /= GRID_COLUMNS.pow(5);
    }
    for _ in 0..PAIR_CODE_LENGTH / 2 {
        reversed.push(digit_char(lng_val % ENCODING_BASE));
        reversed.push(digit_char(lat_val % ENCODING_BASE));
        lat_val /= ENCODING_BASE;
        lng_val /= ENCODING_BASE;
    }
    let digits: String = reversed.into_iter().rev().collect();

    let mut code = String::with_capacity(MAX_DIGIT_COUNT + 1);
    if code_length >= SEPARATOR_POSITION {
        code.push_str(&digits[..SEPARATOR_POSITION]);
        code.push(SEPARATOR);
        code.push_str(&digits[SEPARATOR_POSITION..code_length]);
    } else {
        code.push_str(&digits[..code_length]);
        code.extend(std::iter::repeat_n(PADDING, SEPARATOR_POSITION - code_length));
        code.push(SEPARATOR);
    }
    Some(code)
}

/// Recovers the full code nearest to a reference location for a short code.
///
/// A full code is returned upper-cased and unchanged. `None` for invalid input.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn recover_nearest(code: &str, ref_latitude: f64, ref_longitude: f64) -> Option<String> {
    if !is_short(code) {
        return is_full(code).then(|| code.to_ascii_uppercase());
    }
    let ref_latitude = clip_latitude(ref_latitude);
    let ref_longitude = normalize_longitude(ref_longitude);

    let code = code.to_ascii_uppercase();
    let padding_length = SEPARATOR_POSITION - code.find(SEPARATOR)?;
    let resolution = 20_f64.powf(2.0 - padding_length as f64 / 2.0);
    let half_resolution = resolution / 2.0;

    let reference = encode(ref_latitude, ref_longitude, PAIR_CODE_LENGTH)?;
    let area = decode(&format!("{}{code}", &reference[..padding_length]))?;
    let center = area.center();
    let mut latitude = center.latitude;
    let mut longitude = center.longitude;

    // Shift by one resolution step when the reference sits more than half a
    // cell away, keeping latitude inside +/-90.
    if ref_latitude + half_resolution < latitude && latitude - resolution >= -LATITUDE_MAX {
        latitude -= resolution;
    } else if ref_latitude - half_resolution > latitude && latitude + resolution <= LATITUDE_MAX
    {
        latitude += resolution;
    }
    if ref_longitude + half_resolution < longitude {
        longitude -= resolution;
    } else if ref_longitude - half_resolution > longitude {
        longitude += resolution;
    }

    encode(latitude, longitude, area.code_length)
}
