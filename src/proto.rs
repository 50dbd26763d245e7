//! Protobuf messages for `google.cloud.vision.v1.ImageAnnotator/BatchAnnotateImages`.
//!
//! Only the fields used for text detection are declared; prost skips unknown
//! fields while decoding, so the rest of the response is ignored.

// --- Request ---

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BatchAnnotateImagesRequest {
    #[prost(message, repeated, tag = "1")]
    pub requests: Vec<AnnotateImageRequest>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AnnotateImageRequest {
    #[prost(message, optional, tag = "1")]
    pub image: Option<Image>,
    #[prost(message, repeated, tag = "2")]
    pub features: Vec<Feature>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Image {
    #[prost(bytes = "bytes", tag = "1")]
    pub content: ::bytes::Bytes,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Feature {
    #[prost(enumeration = "FeatureType", tag = "1")]
    pub r#type: i32,
    #[prost(int32, tag = "2")]
    pub max_results: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum FeatureType {
    Unspecified = 0,
    TextDetection = 5,
}

// --- Response ---

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BatchAnnotateImagesResponse {
    #[prost(message, repeated, tag = "1")]
    pub responses: Vec<AnnotateImageResponse>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AnnotateImageResponse {
    #[prost(message, repeated, tag = "5")]
    pub text_annotations: Vec<EntityAnnotation>,
    #[prost(message, optional, tag = "9")]
    pub error: Option<Status>,
    #[prost(message, optional, tag = "12")]
    pub full_text_annotation: Option<TextAnnotation>,
}

/// `google.rpc.Status`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Status {
    #[prost(int32, tag = "1")]
    pub code: i32,
    #[prost(string, tag = "2")]
    pub message: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EntityAnnotation {
    #[prost(string, tag = "2")]
    pub locale: String,
    #[prost(string, tag = "3")]
    pub description: String,
    #[prost(message, optional, tag = "7")]
    pub bounding_poly: Option<BoundingPoly>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BoundingPoly {
    #[prost(message, repeated, tag = "1")]
    pub vertices: Vec<Vertex>,
}

#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
pub struct Vertex {
    #[prost(int32, tag = "1")]
    pub x: i32,
    #[prost(int32, tag = "2")]
    pub y: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TextAnnotation {
    #[prost(message, repeated, tag = "1")]
    pub pages: Vec<Page>,
    #[prost(string, tag = "2")]
    pub text: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Page {
    #[prost(int32, tag = "2")]
    pub width: i32,
    #[prost(int32, tag = "3")]
    pub height: i32,
    #[prost(message, repeated, tag = "4")]
    pub blocks: Vec<Block>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Block {
    #[prost(message, optional, tag = "2")]
    pub bounding_box: Option<BoundingPoly>,
    #[prost(message, repeated, tag = "3")]
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Paragraph {
    #[prost(message, optional, tag = "2")]
    pub bounding_box: Option<BoundingPoly>,
    #[prost(message, repeated, tag = "3")]
    pub words: Vec<Word>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Word {
    #[prost(message, optional, tag = "2")]
    pub bounding_box: Option<BoundingPoly>,
    #[prost(message, repeated, tag = "3")]
    pub symbols: Vec<Symbol>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Symbol {
    #[prost(message, optional, tag = "2")]
    pub bounding_box: Option<BoundingPoly>,
    #[prost(string, tag = "3")]
    pub text: String,
}

impl BoundingPoly {
    pub fn from_points(points: &[(i32, i32)]) -> Self {
        Self {
            vertices: points.iter().map(|&(x, y)| Vertex { x, y }).collect(),
        }
    }
}

impl Word {
    /// The word's text: every symbol joined with no separator.
    pub fn text(&self) -> String {
        self.symbols.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Vertices of an optional polygon; an absent polygon has none.
pub fn vertices_of(poly: Option<&BoundingPoly>) -> &[Vertex] {
    poly.map(|p| p.vertices.as_slice()).unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn word_text_concatenates_symbols() {
        let word = Word {
            bounding_box: None,
            symbols: ["H", "i", "!"]
                .iter()
                .map(|t| Symbol {
                    bounding_box: None,
                    text: t.to_string(),
                })
                .collect(),
        };
        assert_eq!(word.text(), "Hi!");
    }

    #[test]
    fn missing_coordinates_decode_as_zero() {
        // Vertex { x: 7 } with y omitted on the wire.
        let vertex = Vertex::decode(&[0x08, 0x07][..]).unwrap();
        assert_eq!(vertex, Vertex { x: 7, y: 0 });
    }

    #[test]
    fn unknown_response_fields_are_skipped() {
        // field 4 (label_annotations) is not declared here
        let mut buf = Vec::new();
        let label = EntityAnnotation {
            locale: String::new(),
            description: "cat".into(),
            bounding_poly: None,
        };
        prost::encoding::message::encode(4, &label, &mut buf);
        let text = EntityAnnotation {
            locale: "en".into(),
            description: "HELLO".into(),
            bounding_poly: None,
        };
        prost::encoding::message::encode(5, &text, &mut buf);

        let response = AnnotateImageResponse::decode(buf.as_slice()).unwrap();
        assert_eq!(response.text_annotations, vec![text]);
        assert!(response.error.is_none());
    }

    #[test]
    fn absent_polygon_has_no_vertices() {
        assert!(vertices_of(None).is_empty());
        let poly = BoundingPoly::from_points(&[(1, 2)]);
        assert_eq!(vertices_of(Some(&poly)), &[Vertex { x: 1, y: 2 }]);
    }
}
