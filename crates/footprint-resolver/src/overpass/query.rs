//! Overpass QL builders.

use footprint_core::Coordinate;

/// Buildings and industrial/commercial land use within `radius_m` of a point.
#[must_use]
pub fn nearest_feature_query(coordinate: Coordinate, radius_m: u32) -> String {
    let around = format!(
        "(around:{radius_m},{},{})",
        coordinate.latitude, coordinate.longitude
    );
    format!(
        "[out:json];\n(\n  way[\"building\"]{around};\n  relation[\"building\"]{around};\n  \
         way[\"landuse\"~\"industrial|commercial\"]{around};\n  \
         relation[\"landuse\"~\"industrial|commercial\"]{around};\n);\nout geom;\n"
    )
}

/// Non-highway ways and relations in `region` whose `brand` or `name` matches
/// `pattern`.
#[must_use]
pub fn brand_search_query(region: &str, pattern: &str, timeout_secs: u64) -> String {
    let pattern = escape(pattern);
    let mut query = format!(
        "[out:json][timeout:{timeout_secs}];\narea[\"ISO3166-2\"=\"{region}\"]->.searchArea;\n(\n"
    );
    for kind in ["way", "relation"] {
        for key in ["brand", "name"] {
            query.push_str(&format!(
                "  {kind}[\"{key}\"~\"{pattern}\"][\"highway\"!~\".\"](area.searchArea);\n"
            ));
        }
    }
    query.push_str(");\nout geom;\n");
    query
}

/// Escapes a value for use inside a double-quoted Overpass string.
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
