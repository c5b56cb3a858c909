//! Geography and geometry literals

use super::literals::{Digits5, DoubleValue};
use super::punctuation::{Close, Comma, Eq, Open, Semi, Sp, Squote};
use crate::combinator::Many1;

literals! {
    GeographyPrefix = "geographyPrefix", Insensitive ["geography"];
    GeometryPrefix = "geometryPrefix", Insensitive ["geometry"];
    SridKw = "\"SRID\"", Insensitive ["SRID"];
    CollectionOpen = "\"Collection(\"", Insensitive ["Collection("];
    LineStringKw = "\"LineString\"", Insensitive ["LineString"];
    MultiLineStringOpen = "\"MultiLineString(\"", Insensitive ["MultiLineString("];
    MultiPointOpen = "\"MultiPoint(\"", Insensitive ["MultiPoint("];
    MultiPolygonOpen = "\"MultiPolygon(\"", Insensitive ["MultiPolygon("];
    PointKw = "\"Point\"", Insensitive ["Point"];
    PolygonKw = "\"Polygon\"", Insensitive ["Polygon"];
}

alternations! {
    GeoLiteral = "geoLiteral" {
        Collection(Box<CollectionLiteral>),
        LineString(Box<LineStringLiteral>),
        MultiPoint(Box<MultiPointLiteral>),
        MultiLineString(Box<MultiLineStringLiteral>),
        MultiPolygon(Box<MultiPolygonLiteral>),
        Point(Box<PointLiteral>),
        Polygon(Box<PolygonLiteral>),
    }
}

sequences! {
    SridLiteral = "sridLiteral" {
        keyword: SridKw,
        eq: Eq,
        srid: Digits5,
        semi: Semi,
    }

    PositionLiteral = "positionLiteral" {
        longitude: DoubleValue,
        sp: Sp,
        latitude: DoubleValue,
    }

    PointData = "pointData" {
        open: Open,
        position: PositionLiteral,
        close: Close,
    }

    PointLiteral = "pointLiteral" {
        keyword: PointKw,
        data: PointData,
    }

    LineStringData = "lineStringData" {
        open: Open,
        first: PositionLiteral,
        rest: Many1<(Comma, PositionLiteral)>,
        close: Close,
    }

    LineStringLiteral = "lineStringLiteral" {
        keyword: LineStringKw,
        data: LineStringData,
    }

    RingLiteral = "ringLiteral" {
        open: Open,
        first: PositionLiteral,
        rest: Vec<(Comma, PositionLiteral)>,
        close: Close,
    }

    PolygonData = "polygonData" {
        open: Open,
        first: RingLiteral,
        rest: Vec<(Comma, RingLiteral)>,
        close: Close,
    }

    PolygonLiteral = "polygonLiteral" {
        keyword: PolygonKw,
        data: PolygonData,
    }

    MultiPointLiteral = "multiPointLiteral" {
        open: MultiPointOpen,
        points: Option<(PointData, Vec<(Comma, PointData)>)>,
        close: Close,
    }

    MultiLineStringLiteral = "multiLineStringLiteral" {
        open: MultiLineStringOpen,
        lines: Option<(LineStringData, Vec<(Comma, LineStringData)>)>,
        close: Close,
    }

    MultiPolygonLiteral = "multiPolygonLiteral" {
        open: MultiPolygonOpen,
        polygons: Option<(PolygonData, Vec<(Comma, PolygonData)>)>,
        close: Close,
    }

    CollectionLiteral = "collectionLiteral" {
        open: CollectionOpen,
        first: GeoLiteral,
        rest: Vec<(Comma, GeoLiteral)>,
        close: Close,
    }

    FullCollectionLiteral = "fullCollectionLiteral" {
        srid: SridLiteral,
        literal: CollectionLiteral,
    }

    FullLineStringLiteral = "fullLineStringLiteral" {
        srid: SridLiteral,
        literal: LineStringLiteral,
    }

    FullMultiLineStringLiteral = "fullMultiLineStringLiteral" {
        srid: SridLiteral,
        literal: MultiLineStringLiteral,
    }

    FullMultiPointLiteral = "fullMultiPointLiteral" {
        srid: SridLiteral,
        literal: MultiPointLiteral,
    }

    FullMultiPolygonLiteral = "fullMultiPolygonLiteral" {
        srid: SridLiteral,
        literal: MultiPolygonLiteral,
    }

    FullPointLiteral = "fullPointLiteral" {
        srid: SridLiteral,
        literal: PointLiteral,
    }

    FullPolygonLiteral = "fullPolygonLiteral" {
        srid: SridLiteral,
        literal: PolygonLiteral,
    }
}

macro_rules! prefixed_geo {
    ($($name:ident = $rule:literal, $prefix:ident, $full:ident;)*) => {
        sequences! {
            $($name = $rule {
                prefix: $prefix,
                open: Squote,
                literal: $full,
                close: Squote,
            })*
        }
    };
}

prefixed_geo! {
    GeographyCollection = "geographyCollection", GeographyPrefix, FullCollectionLiteral;
    GeographyLineString = "geographyLineString", GeographyPrefix, FullLineStringLiteral;
    GeographyMultiLineString = "geographyMultiLineString", GeographyPrefix, FullMultiLineStringLiteral;
    GeographyMultiPoint = "geographyMultiPoint", GeographyPrefix, FullMultiPointLiteral;
    GeographyMultiPolygon = "geographyMultiPolygon", GeographyPrefix, FullMultiPolygonLiteral;
    GeographyPoint = "geographyPoint", GeographyPrefix, FullPointLiteral;
    GeographyPolygon = "geographyPolygon", GeographyPrefix, FullPolygonLiteral;
    GeometryCollection = "geometryCollection", GeometryPrefix, FullCollectionLiteral;
    GeometryLineString = "geometryLineString", GeometryPrefix, FullLineStringLiteral;
    GeometryMultiLineString = "geometryMultiLineString", GeometryPrefix, FullMultiLineStringLiteral;
    GeometryMultiPoint = "geometryMultiPoint", GeometryPrefix, FullMultiPointLiteral;
    GeometryMultiPolygon = "geometryMultiPolygon", GeometryPrefix, FullMultiPolygonLiteral;
    GeometryPoint = "geometryPoint", GeometryPrefix, FullPointLiteral;
    GeometryPolygon = "geometryPolygon", GeometryPrefix, FullPolygonLiteral;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::PrimitiveLiteral;
    use crate::native_parser::parse_complete;
    use crate::printer::print;

    #[test]
    fn test_point() {
        let input = "geography'SRID=0;Point(142.1 64.1)'";
        let lit = parse_complete::<PrimitiveLiteral>(input).unwrap().node;
        assert_eq!(lit.variant_name(), "GeographyPoint");
        assert_eq!(print(&lit), input);
    }

    #[test]
    fn test_line_string_needs_two_positions() {
        assert!(parse_complete::<LineStringLiteral>("LineString(1 1)").is_err());
        assert!(parse_complete::<LineStringLiteral>("LineString(1 1,2 2)").is_ok());
    }

    #[test]
    fn test_nested_collection() {
        let input = "geometry'SRID=0;Collection(Point(1 2),Collection(MultiPoint()))'";
        let lit = parse_complete::<PrimitiveLiteral>(input).unwrap().node;
        assert_eq!(lit.variant_name(), "GeometryCollection");
    }

    #[test]
    fn test_polygon() {
        let input = "SRID=4326;Polygon((0 0,1 0,1 1,0 0))";
        let full = parse_complete::<FullPolygonLiteral>(input).unwrap().node;
        assert_eq!(full.srid.srid.as_str(), "4326");
        assert!(full.literal.data.rest.is_empty());
    }
}
