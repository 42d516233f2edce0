//! Minimal GeoJSON types for segmentation output.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::coord::GeoImage;

/// A GeoJSON geometry. Positions are `[lng, lat]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Vec<[f64; 2]>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<[f64; 2]>>> },
}

/// A GeoJSON feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Feature {
    /// Builds a polygon feature from rings traced in image pixel space.
    ///
    /// The first ring is the outer boundary, any further rings are holes.
    /// Rings are closed if their last point differs from the first.
    pub fn from_pixel_rings(rings: &[Vec<(f64, f64)>], image: &GeoImage, class_id: u32) -> Self {
        let coordinates = rings
            .iter()
            .filter(|ring| !ring.is_empty())
            .map(|ring| {
                let mut geo: Vec<[f64; 2]> = ring
                    .iter()
                    .map(|&(x, y)| {
                        let (lng, lat) = image.image_pixel_to_lng_lat(x, y);
                        [lng, lat]
                    })
                    .collect();
                if geo.first() != geo.last() {
                    geo.push(geo[0]);
                }
                geo
            })
            .collect();

        let mut properties = Map::new();
        properties.insert("class_id".to_string(), Value::from(class_id));

        Self {
            geometry: Geometry::Polygon { coordinates },
            properties,
        }
    }
}

/// A GeoJSON feature collection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Serializes to a GeoJSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{tile_to_lng_lat, GeoExtent};

    fn tile_image() -> GeoImage {
        let (west, north) = tile_to_lng_lat(10, 20, 6);
        let (east, south) = tile_to_lng_lat(11, 21, 6);
        GeoImage::new(GeoExtent::new(west, south, east, north), 256, 256).unwrap()
    }

    #[test]
    fn test_feature_collection_serializes_as_geojson() {
        let collection = FeatureCollection::new(vec![Feature {
            geometry: Geometry::Polygon {
                coordinates: vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
            },
            properties: Map::new(),
        }]);

        let json: Value = serde_json::from_str(&collection.to_json().unwrap()).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"][0]["type"], "Feature");
        assert_eq!(json["features"][0]["geometry"]["type"], "Polygon");
        assert_eq!(json["features"][0]["geometry"]["coordinates"][0][1][0], 1.0);
    }

    #[test]
    fn test_geojson_roundtrip_parse() {
        let text = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"class_id":1},
             "geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[0,1],[0,0]]]}}]}"#;
        let collection: FeatureCollection = serde_json::from_str(text).unwrap();
        assert_eq!(collection.features.len(), 1);
        assert_eq!(collection.features[0].properties["class_id"], 1);
    }

    #[test]
    fn test_from_pixel_rings_closes_and_projects() {
        let image = tile_image();
        let ring = vec![(0.0, 0.0), (256.0, 0.0), (256.0, 256.0)];

        let feature = Feature::from_pixel_rings(&[ring], &image, 1);

        let Geometry::Polygon { coordinates } = &feature.geometry else {
            panic!("expected polygon");
        };
        assert_eq!(coordinates[0].len(), 4);
        assert_eq!(coordinates[0][0], coordinates[0][3]);

        let [lng, lat] = coordinates[0][2];
        assert!((lng - image.extent.east).abs() < 1e-9);
        assert!((lat - image.extent.south).abs() < 1e-9);
        assert_eq!(feature.properties["class_id"], 1);
    }
}
